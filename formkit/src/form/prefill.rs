use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::form_state::FormState;
use super::path::label_of;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserRecord {
    pub username: String,
    pub email: String,
    pub bio: String,
    pub gender: String,
    pub dob: String,
    pub country: String,
}

impl UserRecord {
    pub fn new<S: Into<String>>(username: S) -> Self {
        Self {
            username: username.into(),
            ..Default::default()
        }
    }

    fn properties(&self) -> Vec<(String, Value)> {
        match serde_json::to_value(self) {
            Ok(Value::Object(map)) => map.into_iter().collect(),
            _ => Vec::new(),
        }
    }
}

/// Copies a chosen record into an already built form.
#[derive(Debug, Clone, Default)]
pub struct RecordPrefill {
    records: Vec<UserRecord>,
}

impl RecordPrefill {
    pub fn new(records: Vec<UserRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[UserRecord] {
        &self.records
    }

    pub fn keys(&self) -> Vec<&str> {
        self.records.iter().map(|r| r.username.as_str()).collect()
    }

    pub fn find(&self, key: &str) -> Option<&UserRecord> {
        self.records.iter().find(|r| r.username == key)
    }

    /// Overwrites every control named like a property of the first record
    /// matching `key`. Other controls keep their values. Returns `false`, and
    /// leaves the form alone, when no record matches.
    pub fn apply(&self, key: &str, state: &mut FormState) -> bool {
        let Some(record) = self.find(key) else {
            log::debug!("No record for {:?}, form unchanged", key);
            return false;
        };
        let mut patched = 0;
        for (name, value) in record.properties() {
            if let Some(control) = state.get_mut(&name) {
                control.set_value(label_of(&value));
                patched += 1;
            }
        }
        log::info!("Prefilled {} fields from record {:?}", patched, key);
        true
    }
}
