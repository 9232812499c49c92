use std::fmt;
use std::fmt::{Display, Formatter};
use reqwest::StatusCode;

// LibraryError covers the lending rules and the scrape. None of the variants ends the
// program: the scraper logs them per page and the menu prints them.
#[derive(Debug)]
pub enum LibraryError {
    // connection failures and http statuses without a more specific variant
    Network {
        message: String,
        status: Option<u16>,
    },
    Timeout {
        message: String,
    },
    AccessDenied {
        message: String,
        status: u16,
    },
    DuplicateKey {
        message: String,
    },
    NotFound {
        message: String,
    },
    // the book is out on loan
    CurrentlyUnavailable {
        message: String,
    },
    Validation {
        message: String,
    },
    Serialization {
        message: String,
    },
    Runtime {
        message: String,
    },
}

impl LibraryError {
    pub fn network(message: &str, status: Option<u16>) -> LibraryError {
        LibraryError::Network { message: message.to_string(), status }
    }

    pub fn timeout(message: &str) -> LibraryError {
        LibraryError::Timeout { message: message.to_string() }
    }

    pub fn access_denied(message: &str, status: u16) -> LibraryError {
        LibraryError::AccessDenied { message: message.to_string(), status }
    }

    pub fn duplicate_key(message: &str) -> LibraryError {
        LibraryError::DuplicateKey { message: message.to_string() }
    }

    pub fn not_found(message: &str) -> LibraryError {
        LibraryError::NotFound { message: message.to_string() }
    }

    pub fn unavailable(message: &str) -> LibraryError {
        LibraryError::CurrentlyUnavailable { message: message.to_string() }
    }

    pub fn validation(message: &str) -> LibraryError {
        LibraryError::Validation { message: message.to_string() }
    }

    pub fn serialization(message: &str) -> LibraryError {
        LibraryError::Serialization { message: message.to_string() }
    }

    pub fn runtime(message: &str) -> LibraryError {
        LibraryError::Runtime { message: message.to_string() }
    }

    /// Maps an http status that `error_for_status` rejected.
    pub fn from_status(message: &str, status: StatusCode) -> LibraryError {
        match status {
            StatusCode::NOT_FOUND => LibraryError::not_found(message),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => LibraryError::access_denied(message, status.as_u16()),
            _ => LibraryError::network(message, Some(status.as_u16())),
        }
    }
}

impl From<std::io::Error> for LibraryError {
    fn from(err: std::io::Error) -> Self {
        LibraryError::runtime(format!("io {}", err).as_str())
    }
}

impl From<serde_json::Error> for LibraryError {
    fn from(err: serde_json::Error) -> Self {
        LibraryError::serialization(format!("json {}", err).as_str())
    }
}

impl From<reqwest::Error> for LibraryError {
    fn from(err: reqwest::Error) -> Self {
        let message = err.to_string();
        match err.status() {
            Some(status) => LibraryError::from_status(message.as_str(), status),
            None if err.is_timeout() => LibraryError::timeout(message.as_str()),
            None => LibraryError::network(message.as_str(), None),
        }
    }
}

impl From<url::ParseError> for LibraryError {
    fn from(err: url::ParseError) -> Self {
        LibraryError::validation(format!("invalid url: {}", err).as_str())
    }
}

impl Display for LibraryError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            LibraryError::Network { message, status: Some(status) } => {
                write!(f, "{} (status {})", message, status)
            }
            LibraryError::AccessDenied { message, status } => {
                write!(f, "{} (status {})", message, status)
            }
            LibraryError::Network { message, .. }
            | LibraryError::Timeout { message }
            | LibraryError::DuplicateKey { message }
            | LibraryError::NotFound { message }
            | LibraryError::CurrentlyUnavailable { message }
            | LibraryError::Validation { message }
            | LibraryError::Serialization { message }
            | LibraryError::Runtime { message } => {
                write!(f, "{}", message)
            }
        }
    }
}

impl std::error::Error for LibraryError {}

/// A specialized Result type for the lending and scraping operations.
pub type LibraryResult<T> = Result<T, LibraryError>;
