use serde_json::{Map, Value, json};

use super::error::GetentError;
use super::records::ResultSet;

/// Successful result of a query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryOutcome {
    /// Name the records are published under, e.g. `getent_passwd`.
    pub name: String,
    pub records: ResultSet,
    /// Set when a missing key was tolerated instead of failing.
    pub msg: Option<String>,
}

impl QueryOutcome {
    /// Lookups never modify the system.
    pub fn changed(&self) -> bool {
        false
    }

    pub fn is_degraded(&self) -> bool {
        self.msg.is_some()
    }

    pub fn to_payload(&self) -> Value {
        let mut tree = Map::new();
        tree.insert("collection".to_string(), Value::Bool(true));
        tree.insert(self.name.clone(), json!(self.records));

        match &self.msg {
            None => {
                tree.insert("changed".to_string(), Value::Bool(self.changed()));
                Value::Object(tree)
            }
            Some(msg) => json!({
                "changed": self.changed(),
                "msg": msg,
                "results": Value::Object(tree),
            }),
        }
    }
}

pub fn failure_payload(err: &GetentError) -> Value {
    let mut payload = json!({
        "failed": true,
        "msg": err.to_string(),
    });
    if let Some(exception) = err.exception() {
        payload["exception"] = Value::String(exception);
    }
    payload
}
