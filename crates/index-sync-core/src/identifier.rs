//! Primitive document identifiers captured for deletion.
//!
//! Deletions are queued as identifiers rather than entity handles because
//! the entity may no longer be readable once the store has removed it.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Identifier of an indexed document.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DocumentId {
    Int(i64),
    Text(String),
}

impl DocumentId {
    /// Convert an extracted field value into an identifier.
    ///
    /// Returns `None` for falsy values (null, false, 0, empty string,
    /// empty array or object). Non-scalar values are coerced to their
    /// compact JSON text so the deletion queue only holds primitives.
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Null | Value::Bool(false) => None,
            Value::Bool(true) => Some(DocumentId::Text("true".to_string())),
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    (i != 0).then_some(DocumentId::Int(i))
                } else if n.as_f64() == Some(0.0) {
                    None
                } else {
                    Some(DocumentId::Text(n.to_string()))
                }
            }
            Value::String(s) if s.is_empty() => None,
            Value::String(s) => Some(DocumentId::Text(s.clone())),
            Value::Array(items) if items.is_empty() => None,
            Value::Object(map) if map.is_empty() => None,
            other => Some(DocumentId::Text(other.to_string())),
        }
    }

    /// Text form used as an index term.
    pub fn as_term(&self) -> String {
        self.to_string()
    }
}

impl std::fmt::Display for DocumentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DocumentId::Int(i) => write!(f, "{}", i),
            DocumentId::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<&str> for DocumentId {
    fn from(s: &str) -> Self {
        DocumentId::Text(s.to_string())
    }
}

impl From<String> for DocumentId {
    fn from(s: String) -> Self {
        DocumentId::Text(s)
    }
}

impl From<i64> for DocumentId {
    fn from(i: i64) -> Self {
        DocumentId::Int(i)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_falsy_values_yield_nothing() {
        assert_eq!(DocumentId::from_value(&json!(null)), None);
        assert_eq!(DocumentId::from_value(&json!(false)), None);
        assert_eq!(DocumentId::from_value(&json!(0)), None);
        assert_eq!(DocumentId::from_value(&json!(0.0)), None);
        assert_eq!(DocumentId::from_value(&json!("")), None);
        assert_eq!(DocumentId::from_value(&json!([])), None);
        assert_eq!(DocumentId::from_value(&json!({})), None);
    }

    #[test]
    fn test_scalars() {
        assert_eq!(DocumentId::from_value(&json!(42)), Some(DocumentId::Int(42)));
        assert_eq!(
            DocumentId::from_value(&json!("abc")),
            Some(DocumentId::Text("abc".into()))
        );
        assert_eq!(
            DocumentId::from_value(&json!(1.5)),
            Some(DocumentId::Text("1.5".into()))
        );
    }

    #[test]
    fn test_non_scalar_coerced_to_text() {
        let id = DocumentId::from_value(&json!({"tenant": "a"})).unwrap();
        assert_eq!(id, DocumentId::Text(r#"{"tenant":"a"}"#.into()));

        let id = DocumentId::from_value(&json!([1, 2])).unwrap();
        assert_eq!(id.as_term(), "[1,2]");
    }

    #[test]
    fn test_display() {
        assert_eq!(DocumentId::Int(43).to_string(), "43");
        assert_eq!(DocumentId::from("42").to_string(), "42");
    }
}
