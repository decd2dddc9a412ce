use serde::{Deserialize, Deserializer};

/// Accept a string, number or boolean and render it as text.
///
/// Vendors are inconsistent about identifier types (`"123"` vs `123`);
/// anything else, including `null`, becomes an empty string.
pub fn string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::String(s) => s,
        serde_json::Value::Number(n) => n.to_string(),
        serde_json::Value::Bool(b) => b.to_string(),
        _ => String::new(),
    })
}

/// Accept a boolean, a 0/1 number or a `"true"`/`"1"` string.
pub fn flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::Bool(b) => b,
        serde_json::Value::Number(n) => n.as_i64() == Some(1),
        serde_json::Value::String(s) => matches!(s.to_lowercase().as_str(), "true" | "1"),
        _ => false,
    })
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;

    #[derive(Deserialize)]
    struct Probe {
        #[serde(default, deserialize_with = "super::string")]
        id: String,
        #[serde(default, deserialize_with = "super::flag")]
        on: bool,
    }

    fn probe(json: &str) -> Probe {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn numbers_become_strings() {
        assert_eq!(probe(r#"{"id": 12345}"#).id, "12345");
        assert_eq!(probe(r#"{"id": "abc"}"#).id, "abc");
    }

    #[test]
    fn null_and_missing_become_empty() {
        assert_eq!(probe(r#"{"id": null}"#).id, "");
        assert_eq!(probe("{}").id, "");
    }

    #[test]
    fn flags_accept_common_encodings() {
        assert!(probe(r#"{"on": true}"#).on);
        assert!(probe(r#"{"on": 1}"#).on);
        assert!(probe(r#"{"on": "true"}"#).on);
        assert!(!probe(r#"{"on": 0}"#).on);
        assert!(!probe(r#"{"on": null}"#).on);
        assert!(!probe("{}").on);
    }
}
