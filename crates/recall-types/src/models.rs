use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A person from the contact directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    pub given_name: String,
    pub family_name: String,
    pub phone_numbers: Vec<String>,
}

impl Contact {
    pub fn new(
        given_name: impl Into<String>,
        family_name: impl Into<String>,
        phone_numbers: Vec<String>,
    ) -> Self {
        Self {
            given_name: given_name.into(),
            family_name: family_name.into(),
            phone_numbers,
        }
    }

    /// "Given Family", trimmed so a missing half leaves no stray space.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.given_name, self.family_name)
            .trim()
            .to_string()
    }
}

/// Sender identifier used when a message has no handle (sent from this device).
pub const SELF_SENDER: &str = "Me";

/// A message as presented to callers, assembled from one archive row.
///
/// Field names on the wire are fixed: consumers of the flat representation
/// key on `rowid`, `datetime`, `phone_number` and so on. Optional fields
/// serialize as `null`, never omitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageRecord {
    #[serde(rename = "rowid")]
    pub row_id: i64,
    #[serde(rename = "datetime")]
    pub timestamp: DateTime<Utc>,
    pub body: String,
    #[serde(rename = "phone_number")]
    pub sender_identifier: String,
    pub is_from_me: bool,
    #[serde(rename = "cache_roomname")]
    pub room_name: String,
    #[serde(rename = "group_chat_name")]
    pub group_display_name: Option<String>,
    #[serde(rename = "full_name")]
    pub resolved_name: Option<String>,
}

impl MessageRecord {
    /// Sender name for display: the resolved contact name if any, else the raw identifier.
    pub fn display_sender(&self) -> &str {
        self.resolved_name
            .as_deref()
            .unwrap_or(&self.sender_identifier)
    }

    /// Flat key/value form for transport to a presentation layer.
    pub fn to_flat_map(&self) -> Result<Map<String, Value>, serde_json::Error> {
        match serde_json::to_value(self)? {
            Value::Object(map) => Ok(map),
            other => Err(serde::ser::Error::custom(format!(
                "message record serialized to {} instead of an object",
                json_kind(&other)
            ))),
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn record() -> MessageRecord {
        MessageRecord {
            row_id: 7,
            timestamp: Utc.timestamp_millis_opt(1738899785633).unwrap(),
            body: "Hello".into(),
            sender_identifier: "+1234567890".into(),
            is_from_me: false,
            room_name: String::new(),
            group_display_name: None,
            resolved_name: Some("Ada Lovelace".into()),
        }
    }

    #[test]
    fn full_name_trims_missing_parts() {
        assert_eq!(Contact::new("Ada", "Lovelace", vec![]).full_name(), "Ada Lovelace");
        assert_eq!(Contact::new("Ada", "", vec![]).full_name(), "Ada");
        assert_eq!(Contact::new("", "Lovelace", vec![]).full_name(), "Lovelace");
        assert_eq!(Contact::new("", "", vec![]).full_name(), "");
    }

    #[test]
    fn flat_map_uses_wire_names_and_keeps_nulls() {
        let map = record().to_flat_map().unwrap();

        let mut keys: Vec<&str> = map.keys().map(String::as_str).collect();
        keys.sort_unstable();
        assert_eq!(
            keys,
            vec![
                "body",
                "cache_roomname",
                "datetime",
                "full_name",
                "group_chat_name",
                "is_from_me",
                "phone_number",
                "rowid",
            ]
        );

        assert_eq!(map["rowid"], Value::from(7));
        assert_eq!(map["group_chat_name"], Value::Null);
        assert_eq!(map["full_name"], Value::from("Ada Lovelace"));
        assert_eq!(map["datetime"], Value::from("2025-02-07T03:43:05.633Z"));
    }

    #[test]
    fn json_kind_names_non_objects() {
        assert_eq!(json_kind(&Value::Null), "null");
        assert_eq!(json_kind(&Value::from(vec![1, 2])), "an array");
        assert_eq!(json_kind(&Value::from("x")), "a string");
    }

    #[test]
    fn display_sender_prefers_resolved_name() {
        let mut r = record();
        assert_eq!(r.display_sender(), "Ada Lovelace");
        r.resolved_name = None;
        assert_eq!(r.display_sender(), "+1234567890");
    }
}
