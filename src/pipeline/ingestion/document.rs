use jsonschema::JSONSchema;
use once_cell::sync::Lazy;
use serde_json::{Map, Value};

use crate::constants::LEADS_KEY;
use crate::domain::{Lead, RawLead};
use crate::error::{CleanerError, Result};

static DOCUMENT_SCHEMA: Lazy<Value> = Lazy::new(|| {
    serde_json::from_str(include_str!("../../../schemas/lead_document.v1.json"))
        .expect("bundled lead document schema is valid JSON")
});

/// A loaded input document: its top-level object plus the `leads` list.
#[derive(Debug, Clone)]
pub struct LeadDocument {
    root: Map<String, Value>,
    leads: Option<Vec<RawLead>>,
}

impl LeadDocument {
    /// Check the document's structure and split out its leads.
    ///
    /// A missing `leads` key is not an error. Anything else that breaks the
    /// document schema (non-object root, non-array `leads`, non-object entries)
    /// is fatal.
    pub fn from_value(document: Value) -> Result<Self> {
        check_structure(&document)?;

        let Value::Object(root) = document else {
            return Err(CleanerError::Structure(
                "top-level value must be an object".to_string(),
            ));
        };

        let leads = match root.get(LEADS_KEY) {
            None => None,
            Some(Value::Array(items)) => Some(
                items
                    .iter()
                    .enumerate()
                    .map(|(index, item)| {
                        item.as_object().cloned().ok_or_else(|| {
                            CleanerError::Structure(format!("lead {} is not an object", index))
                        })
                    })
                    .collect::<Result<Vec<_>>>()?,
            ),
            Some(_) => {
                return Err(CleanerError::Structure(format!(
                    "'{}' must be an array",
                    LEADS_KEY
                )))
            }
        };

        Ok(Self { root, leads })
    }

    /// The raw leads, or `None` when the document has no `leads` key
    pub fn leads(&self) -> Option<&[RawLead]> {
        self.leads.as_deref()
    }

    pub fn lead_count(&self) -> usize {
        self.leads.as_ref().map_or(0, Vec::len)
    }

    /// The output document: the original top-level object with `leads`
    /// replaced by `cleaned`. Other keys keep their order. A document that had
    /// no `leads` key is returned without one.
    pub fn with_leads(&self, cleaned: &[Lead]) -> Result<Value> {
        let mut root = self.root.clone();
        if self.leads.is_some() {
            root.insert(LEADS_KEY.to_string(), serde_json::to_value(cleaned)?);
        }
        Ok(Value::Object(root))
    }
}

/// Validate a document against the bundled lead document schema
pub fn check_structure(document: &Value) -> Result<()> {
    let compiled = JSONSchema::options()
        .compile(&DOCUMENT_SCHEMA)
        .map_err(|e| CleanerError::Structure(format!("lead document schema is invalid: {}", e)))?;

    let messages: Vec<String> = match compiled.validate(document) {
        Ok(()) => return Ok(()),
        Err(errors) => errors.map(|e| e.to_string()).collect(),
    };
    Err(CleanerError::Structure(messages.join("; ")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::DateTime;
    use serde_json::json;

    fn lead() -> Lead {
        Lead {
            id: "1".to_string(),
            email: "a@x.com".to_string(),
            first_name: "Jo".to_string(),
            last_name: "Doe".to_string(),
            address: "1 Main St".to_string(),
            entry_date: DateTime::parse_from_rfc3339("2014-05-07T17:32:20+00:00").unwrap(),
        }
    }

    #[test]
    fn test_missing_leads_is_not_an_error() {
        let document = LeadDocument::from_value(json!({"source": "crm"})).unwrap();
        assert!(document.leads().is_none());
        assert_eq!(document.lead_count(), 0);
        assert_eq!(document.with_leads(&[]).unwrap(), json!({"source": "crm"}));
    }

    #[test]
    fn test_non_object_root_is_fatal() {
        let err = LeadDocument::from_value(json!([1, 2])).unwrap_err();
        assert!(matches!(err, CleanerError::Structure(_)));
    }

    #[test]
    fn test_non_array_leads_is_fatal() {
        assert!(LeadDocument::from_value(json!({"leads": {"a": 1}})).is_err());
        assert!(LeadDocument::from_value(json!({"leads": null})).is_err());
    }

    #[test]
    fn test_non_object_lead_is_fatal() {
        let err = LeadDocument::from_value(json!({"leads": [{"_id": "1"}, "oops"]})).unwrap_err();
        assert!(matches!(err, CleanerError::Structure(_)));
    }

    #[test]
    fn test_with_leads_replaces_leads_in_place() {
        let document = LeadDocument::from_value(json!({
            "meta": {"exported": "2015-01-01"},
            "leads": [{"_id": "1"}, {"_id": "2"}],
            "tail": true
        }))
        .unwrap();
        assert_eq!(document.lead_count(), 2);

        let output = document.with_leads(&[lead()]).unwrap();

        let keys: Vec<&str> = output.as_object().unwrap().keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["meta", "leads", "tail"]);
        assert_eq!(output["leads"].as_array().unwrap().len(), 1);
        assert_eq!(output["leads"][0]["entryDate"], "2014-05-07T17:32:20+00:00");
    }
}
