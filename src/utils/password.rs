use sha2::{Digest, Sha256};

// Unsalted SHA-256 hex digest. Illustrative only, not a credential store.
pub fn hash_password(password: &str) -> String {
    hex::encode(Sha256::digest(password.as_bytes()))
}

#[cfg(test)]
mod tests {
    use crate::utils::password::hash_password;

    #[tokio::test]
    async fn test_should_hash_to_fixed_length_hex() {
        let hash = hash_password("pswrd12345");
        assert_eq!(64, hash.len());
        assert!(hash.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
        assert_eq!(hash, hash_password("pswrd12345"));
        assert_ne!(hash, hash_password("pswrd12346"));
    }

    #[tokio::test]
    async fn test_should_match_known_digest() {
        assert_eq!("e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855", hash_password(""));
    }
}
