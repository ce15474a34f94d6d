use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Outcome of querying one configured endpoint.
///
/// A non-2xx answer is a `Failure` that still carries the status and payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum RemoteResult {
    Success {
        data: Value,
        status: u16,
        status_text: String,
        headers: BTreeMap<String, String>,
    },
    Failure {
        message: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        status: Option<u16>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        status_text: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        data: Option<Value>,
    },
}

impl RemoteResult {
    pub fn failure(message: impl Into<String>) -> Self {
        RemoteResult::Failure {
            message: message.into(),
            status: None,
            status_text: None,
            data: None,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, RemoteResult::Success { .. })
    }
}

/// Endpoint name to outcome; replaced wholesale on every fetch.
pub type RemoteResponses = BTreeMap<String, RemoteResult>;

/// The object templates see as `API`: successful payloads by endpoint name.
/// Failed endpoints are left out so `API.name` is simply nil.
pub fn template_data(responses: &RemoteResponses) -> Map<String, Value> {
    responses
        .iter()
        .filter_map(|(name, result)| match result {
            RemoteResult::Success { data, .. } => Some((name.clone(), data.clone())),
            RemoteResult::Failure { .. } => None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn template_data_skips_failures() {
        let mut responses = RemoteResponses::new();
        responses.insert(
            "product".to_string(),
            RemoteResult::Success {
                data: json!({ "name": "Lamp" }),
                status: 200,
                status_text: "OK".to_string(),
                headers: BTreeMap::new(),
            },
        );
        responses.insert("weather".to_string(), RemoteResult::failure("timed out"));

        let data = template_data(&responses);
        assert_eq!(data.len(), 1);
        assert_eq!(data["product"]["name"], "Lamp");
    }

    #[test]
    fn failure_omits_absent_fields_on_the_wire() {
        let json = serde_json::to_value(RemoteResult::failure("boom")).unwrap();
        assert_eq!(json, json!({ "outcome": "failure", "message": "boom" }));
    }
}
