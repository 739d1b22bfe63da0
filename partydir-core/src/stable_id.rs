//! Deterministic ids for parties that don't carry one.
//!
//! The id is the first 8 hex characters of the MD5 digest of the JSON array
//! `[title, date, venue]`. Ids already published on the site were produced
//! this way, so the canonical form must not change. A missing title or date
//! appears as `null` in the array, a missing venue as `""`.

use md5::{Digest, Md5};
use serde_json::Value;

use crate::constants::STABLE_ID_LEN;

/// Derive the id for a party from its title, date and venue.
///
/// Empty `title` and `date` count as missing.
pub fn stable_id(title: &str, date: &str, venue: &str) -> String {
    let key = Value::from(vec![or_null(title), or_null(date), Value::from(venue)]).to_string();
    let digest = Md5::digest(key.as_bytes());

    digest
        .iter()
        .take(STABLE_ID_LEN / 2)
        .map(|b| format!("{:02x}", b))
        .collect()
}

fn or_null(field: &str) -> Value {
    if field.is_empty() {
        Value::Null
    } else {
        Value::from(field)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stable_id_known_values() {
        assert_eq!(stable_id("T", "2025-06-01", "V"), "756df167");
        assert_eq!(stable_id("Foo", "2025-06-01", "Bar"), "579ac733");
        assert_eq!(stable_id("T", "2025-06-01", ""), "65f08418");
    }

    #[test]
    fn test_stable_id_escapes_like_json() {
        assert_eq!(stable_id("Nachtschicht", "2025-06-01", "Gewölbe"), "bb015dc5");
        assert_eq!(stable_id("Say \"Hi\"", "2025-06-01", "V"), "85ac8ceb");
    }

    #[test]
    fn test_missing_title_or_date_hash_as_null() {
        assert_eq!(stable_id("", "2025-06-01", "V"), "39f5a78f");
        assert_eq!(stable_id("T", "", "V"), "ef534b18");
    }

    #[test]
    fn test_stable_id_changes_with_each_field() {
        let base = stable_id("T", "2025-06-01", "V");

        assert_ne!(stable_id("T2", "2025-06-01", "V"), base);
        assert_ne!(stable_id("T", "2025-06-02", "V"), base);
        assert_ne!(stable_id("T", "2025-06-01", "V2"), base);
    }

    #[test]
    fn test_stable_id_format() {
        let id = stable_id("T", "2025-06-01", "V");

        assert_eq!(id.len(), STABLE_ID_LEN);
        assert!(id.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn test_field_boundaries_are_unambiguous() {
        assert_ne!(stable_id("ab", "c", ""), stable_id("a", "bc", ""));
    }
}
