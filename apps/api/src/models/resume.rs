use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Raw form payload as posted by the UI. Every field is optional and untrusted.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResumeInput {
    #[serde(default, deserialize_with = "lenient_text")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub email: Option<String>,
    #[serde(default)]
    pub skills: Option<FieldValue>,
    #[serde(default)]
    pub experience: Option<FieldValue>,
}

/// A form field that arrives either as free text or as an already-split list.
///
/// Collapsed into `Vec<String>` by the normalizer; nothing downstream matches on it.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    List(Vec<Value>),
    Other(Value),
}

impl FieldValue {
    /// Items of a list field in their string form. Numbers and booleans are
    /// stringified; nulls, nested arrays and objects are skipped.
    pub fn list_items(items: &[Value]) -> impl Iterator<Item = String> + '_ {
        items.iter().filter_map(scalar_to_string)
    }
}

/// Canonical resume record returned to the UI and fed to the formatter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResumeRecord {
    pub name: String,
    pub email: String,
    pub skills: Vec<String>,
    pub experience: Vec<String>,
    pub summary: String,
}

pub(crate) fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(scalar_to_string(&value))
}
