// serializer writes naive loan timestamps as RFC 3339 in UTC
pub mod serializer {
    use chrono::{DateTime, NaiveDateTime, Utc};
    use serde::{Serialize, Serializer};

    pub fn serialize<S: Serializer>(time: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error> {
        time_to_json(*time).serialize(serializer)
    }

    fn time_to_json(t: NaiveDateTime) -> String {
        DateTime::<Utc>::from_naive_utc_and_offset(t, Utc).to_rfc3339()
    }
}
