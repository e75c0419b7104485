//! Step domain types

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::null_as_default;

/// One ordered unit of build execution within a pipeline
///
/// Zero values mean "unset": empty strings, maps and lists and zero integers
/// are left off the wire, and missing or `null` fields decode to zero values.
/// This keeps a step equal to itself after a create/read round-trip.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Step {
    /// Step kind, e.g. "script"
    #[serde(rename = "type")]
    pub step_type: String,
    #[serde(
        default,
        skip_serializing_if = "String::is_empty",
        deserialize_with = "null_as_default"
    )]
    pub name: String,
    #[serde(
        default,
        skip_serializing_if = "String::is_empty",
        deserialize_with = "null_as_default"
    )]
    pub command: String,
    #[serde(
        default,
        skip_serializing_if = "BTreeMap::is_empty",
        deserialize_with = "null_as_default"
    )]
    pub env: BTreeMap<String, String>,
    #[serde(
        default,
        skip_serializing_if = "is_zero",
        deserialize_with = "null_as_default"
    )]
    pub timeout_in_minutes: u32,
    /// Agent label selectors, order preserved
    #[serde(
        default,
        skip_serializing_if = "Vec::is_empty",
        deserialize_with = "null_as_default"
    )]
    pub agent_query_rules: Vec<String>,
    #[serde(
        default,
        skip_serializing_if = "String::is_empty",
        deserialize_with = "null_as_default"
    )]
    pub branch_configuration: String,
    #[serde(
        default,
        skip_serializing_if = "String::is_empty",
        deserialize_with = "null_as_default"
    )]
    pub artifact_paths: String,
    #[serde(
        default,
        skip_serializing_if = "is_zero",
        deserialize_with = "null_as_default"
    )]
    pub concurrency: u32,
    #[serde(
        default,
        skip_serializing_if = "is_zero",
        deserialize_with = "null_as_default"
    )]
    pub parallelism: u32,
}

impl Step {
    /// Create a script step running a single command
    pub fn script(name: impl Into<String>, command: impl Into<String>) -> Self {
        Self {
            step_type: "script".to_string(),
            name: name.into(),
            command: command.into(),
            ..Default::default()
        }
    }
}

fn is_zero(value: &u32) -> bool {
    *value == 0
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_unset_fields_are_not_serialized() {
        let step = Step::script("test", "echo 'Hello World'");
        let value = serde_json::to_value(&step).unwrap();

        assert_eq!(
            value,
            json!({"type": "script", "name": "test", "command": "echo 'Hello World'"})
        );
    }

    #[test]
    fn test_set_fields_are_serialized() {
        let step = Step {
            step_type: "script".to_string(),
            timeout_in_minutes: 10,
            parallelism: 3,
            agent_query_rules: vec!["queue=default".to_string(), "os=linux".to_string()],
            env: BTreeMap::from([("CI".to_string(), "true".to_string())]),
            ..Default::default()
        };
        let value = serde_json::to_value(&step).unwrap();

        assert_eq!(value["timeout_in_minutes"], 10);
        assert_eq!(value["parallelism"], 3);
        assert_eq!(value["agent_query_rules"], json!(["queue=default", "os=linux"]));
        assert_eq!(value["env"], json!({"CI": "true"}));
        assert!(value.get("concurrency").is_none());
    }

    #[test]
    fn test_server_step_decodes_to_zero_values() {
        let step: Step = serde_json::from_value(json!({
            "type": "script",
            "name": "test",
            "command": "echo 'Hello World'",
            "artifact_paths": null,
            "branch_configuration": null,
            "env": {},
            "timeout_in_minutes": null,
            "agent_query_rules": [],
            "concurrency": null,
            "parallelism": null
        }))
        .unwrap();

        assert_eq!(step, Step::script("test", "echo 'Hello World'"));
    }
}
