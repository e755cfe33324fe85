//! Helpers shared by the collection modules.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::models::Owner;
use crate::Result;

pub(crate) fn encode<T: Serialize>(doc: &T) -> Result<String> {
    Ok(serde_json::to_string(doc)?)
}

pub(crate) fn decode<T: DeserializeOwned>(raw: &str) -> Result<T> {
    Ok(serde_json::from_str(raw)?)
}

pub(crate) fn decode_all<T: DeserializeOwned>(rows: Vec<(String,)>) -> Result<Vec<T>> {
    rows.iter().map(|(raw,)| decode(raw)).collect()
}

/// Fixed-width timestamp so string order matches time order.
pub(crate) fn sort_key(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Column and value that restrict a query to one owner.
pub(crate) fn owner_filter(owner: &Owner) -> (&'static str, String) {
    match owner {
        Owner::User(id) => ("user_id", id.to_hex()),
        Owner::Session(sid) => ("session_id", sid.clone()),
    }
}

/// `?, ?, ?` for an `IN (...)` clause.
pub(crate) fn placeholders(n: usize) -> String {
    vec!["?"; n].join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ObjectId;
    use chrono::TimeZone;

    #[test]
    fn test_sort_key_is_fixed_width() {
        let a = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
        let b = a + chrono::Duration::milliseconds(1500);
        assert_eq!(sort_key(&a), "2024-01-02T03:04:05.000000Z");
        assert!(sort_key(&a) < sort_key(&b));
        assert_eq!(sort_key(&a).len(), sort_key(&b).len());
    }

    #[test]
    fn test_owner_filter() {
        let id = ObjectId::parse_str("65a1f0c2e4b0a1b2c3d4e5f6").unwrap();
        assert_eq!(
            owner_filter(&Owner::User(id)),
            ("user_id", "65a1f0c2e4b0a1b2c3d4e5f6".to_string())
        );
        assert_eq!(
            owner_filter(&Owner::Session("abc".into())),
            ("session_id", "abc".to_string())
        );
    }

    #[test]
    fn test_placeholders() {
        assert_eq!(placeholders(3), "?, ?, ?");
        assert_eq!(placeholders(1), "?");
    }
}
