use std::collections::BTreeMap;

use serde_json::{Map, Value};

/// A create form ("new item", "new category") ready to be posted to its
/// own action URL as a flat JSON object.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormSubmission {
    pub action: String,
    pub fields: BTreeMap<String, String>,
}

impl FormSubmission {
    pub fn new(action: impl Into<String>) -> Self {
        Self {
            action: action.into(),
            fields: BTreeMap::new(),
        }
    }

    pub fn field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    /// Flat field map with `removed: false` injected
    pub fn to_body(&self) -> Value {
        let mut body: Map<String, Value> = self
            .fields
            .iter()
            .map(|(name, value)| (name.clone(), Value::String(value.clone())))
            .collect();
        body.insert("removed".to_string(), Value::Bool(false));
        Value::Object(body)
    }
}
