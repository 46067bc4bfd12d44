use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

/// A lead exactly as it appeared in the input document's `leads` list.
pub type RawLead = serde_json::Map<String, serde_json::Value>;

/// A lead that passed every field rule, with its fields normalized.
///
/// Serializes back to the external shape (`_id`, camelCase keys) with
/// `entryDate` rendered as `YYYY-MM-DDTHH:MM:SS±HH:MM`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lead {
    #[serde(rename = "_id")]
    pub id: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub address: String,
    #[serde(with = "entry_date")]
    pub entry_date: DateTime<FixedOffset>,
}

impl Lead {
    /// The entry date in its canonical output form
    pub fn entry_date_string(&self) -> String {
        self.entry_date
            .format(crate::constants::ENTRY_DATE_FORMAT)
            .to_string()
    }
}

mod entry_date {
    use chrono::{DateTime, FixedOffset};
    use serde::{Deserialize, Deserializer, Serializer};

    use crate::constants::ENTRY_DATE_FORMAT;

    pub fn serialize<S>(value: &DateTime<FixedOffset>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(&value.format(ENTRY_DATE_FORMAT))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<FixedOffset>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&raw).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_lead() -> Lead {
        Lead {
            id: "jkj238238jdsnfsj23".to_string(),
            email: "foo@bar.com".to_string(),
            first_name: "John".to_string(),
            last_name: "Smith".to_string(),
            address: "123 Street St".to_string(),
            entry_date: DateTime::parse_from_rfc3339("2014-05-07T17:30:20+00:00").unwrap(),
        }
    }

    #[test]
    fn test_lead_serializes_with_external_keys_in_order() {
        let value = serde_json::to_value(sample_lead()).unwrap();
        let keys: Vec<&str> = value.as_object().unwrap().keys().map(String::as_str).collect();
        assert_eq!(
            keys,
            vec!["_id", "email", "firstName", "lastName", "address", "entryDate"]
        );
        assert_eq!(value["entryDate"], json!("2014-05-07T17:30:20+00:00"));
    }

    #[test]
    fn test_lead_deserializes_from_its_own_output() {
        let lead = sample_lead();
        let text = serde_json::to_string(&lead).unwrap();
        let back: Lead = serde_json::from_str(&text).unwrap();
        assert_eq!(back, lead);
    }

    #[test]
    fn test_entry_date_keeps_non_utc_offset() {
        let mut lead = sample_lead();
        lead.entry_date = DateTime::parse_from_rfc3339("2014-05-07T17:30:20-07:00").unwrap();
        assert_eq!(lead.entry_date_string(), "2014-05-07T17:30:20-07:00");
    }
}
