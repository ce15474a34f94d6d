use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

/// HTTP verbs an endpoint descriptor may use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl HttpMethod {
    pub const ALL: [HttpMethod; 5] = [
        HttpMethod::Get,
        HttpMethod::Post,
        HttpMethod::Put,
        HttpMethod::Patch,
        HttpMethod::Delete,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
        }
    }

    /// Parses a verb case-insensitively, as typed into the configuration form.
    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|m| m.as_str().eq_ignore_ascii_case(value.trim()))
    }

    /// GET requests never carry the configured body.
    pub fn sends_body(&self) -> bool {
        !matches!(self, HttpMethod::Get)
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A saved external data source whose response is exposed to templates as
/// `API.<name>`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EndpointDescriptor {
    pub id: String,
    pub name: String,
    pub url: String,
    pub method: HttpMethod,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub headers: Option<BTreeMap<String, String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
}

impl EndpointDescriptor {
    /// Returns the body parsed as JSON when this request should send one.
    ///
    /// `Ok(None)` means nothing is sent (GET, or no body configured).
    pub fn json_body(&self) -> Result<Option<Value>, String> {
        match self.body.as_deref().map(str::trim) {
            Some(body) if !body.is_empty() && self.method.sends_body() => {
                serde_json::from_str(body)
                    .map(Some)
                    .map_err(|e| format!("Invalid JSON in request body for \"{}\": {}", self.name, e))
            }
            _ => Ok(None),
        }
    }
}

/// The user-editable part of a descriptor, as submitted by the configuration
/// form. Fields are loose on purpose so every problem can be reported at once.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EndpointDraft {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub method: Option<HttpMethod>,
    #[serde(default)]
    pub headers: Option<Value>,
    #[serde(default)]
    pub body: Option<String>,
}

impl EndpointDraft {
    /// Collects every validation message for this draft.
    ///
    /// `existing` is the currently saved list; `editing_id` names the
    /// descriptor being edited so it does not collide with itself.
    pub fn validate(&self, existing: &[EndpointDescriptor], editing_id: Option<&str>) -> Vec<String> {
        let mut errors = Vec::new();

        let name = self.name.trim();
        if name.is_empty() {
            errors.push("Endpoint name is required".to_string());
        } else if existing
            .iter()
            .filter(|e| Some(e.id.as_str()) != editing_id)
            .any(|e| e.name.trim().to_lowercase() == name.to_lowercase())
        {
            errors.push(format!("An endpoint named \"{}\" already exists", name));
        }

        let url = self.url.trim();
        if url.is_empty() {
            errors.push("URL is required".to_string());
        } else if url::Url::parse(url).is_err() {
            errors.push("Invalid URL format".to_string());
        }

        if self.method.is_none() {
            errors.push("HTTP method is required".to_string());
        }

        if let Some(body) = self.body.as_deref().map(str::trim) {
            if !body.is_empty() && serde_json::from_str::<Value>(body).is_err() {
                errors.push("Request body must be valid JSON".to_string());
            }
        }

        if let Some(headers) = &self.headers {
            if header_map(headers).is_none() {
                errors.push("Headers must be a JSON object with string values".to_string());
            }
        }

        errors
    }

    /// Validates and converts the draft into a descriptor carrying `id`.
    pub fn into_descriptor(
        self,
        id: String,
        existing: &[EndpointDescriptor],
    ) -> Result<EndpointDescriptor, Vec<String>> {
        let errors = self.validate(existing, Some(id.as_str()));
        if !errors.is_empty() {
            return Err(errors);
        }
        let method = self.method.ok_or_else(|| vec!["HTTP method is required".to_string()])?;
        let headers = match &self.headers {
            Some(value) => header_map(value).filter(|map| !map.is_empty()),
            None => None,
        };
        let body = self
            .body
            .map(|b| b.trim().to_string())
            .filter(|b| !b.is_empty());

        Ok(EndpointDescriptor {
            id,
            name: self.name.trim().to_string(),
            url: self.url.trim().to_string(),
            method,
            headers,
            body,
        })
    }
}

impl From<&EndpointDescriptor> for EndpointDraft {
    fn from(descriptor: &EndpointDescriptor) -> Self {
        Self {
            name: descriptor.name.clone(),
            url: descriptor.url.clone(),
            method: Some(descriptor.method),
            headers: descriptor.headers.as_ref().map(|h| {
                Value::Object(
                    h.iter()
                        .map(|(k, v)| (k.clone(), Value::String(v.clone())))
                        .collect(),
                )
            }),
            body: descriptor.body.clone(),
        }
    }
}

/// Null counts as "no headers"; anything else must be an object of strings.
fn header_map(value: &Value) -> Option<BTreeMap<String, String>> {
    match value {
        Value::Null => Some(BTreeMap::new()),
        Value::Object(map) => map
            .iter()
            .map(|(k, v)| v.as_str().map(|s| (k.clone(), s.to_string())))
            .collect(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn draft(name: &str, url: &str, method: Option<HttpMethod>) -> EndpointDraft {
        EndpointDraft {
            name: name.to_string(),
            url: url.to_string(),
            method,
            headers: None,
            body: None,
        }
    }

    fn saved(id: &str, name: &str) -> EndpointDescriptor {
        EndpointDescriptor {
            id: id.to_string(),
            name: name.to_string(),
            url: "https://example.com/data".to_string(),
            method: HttpMethod::Get,
            headers: None,
            body: None,
        }
    }

    #[test]
    fn accepts_a_complete_draft() {
        let d = draft("product", "https://api.example.com/p/1", Some(HttpMethod::Get));
        assert!(d.validate(&[], None).is_empty());
    }

    #[test]
    fn rejects_relative_url() {
        let d = draft("product", "not-a-url", Some(HttpMethod::Get));
        assert_eq!(d.validate(&[], None), vec!["Invalid URL format".to_string()]);
    }

    #[test]
    fn rejects_invalid_json_body_for_post() {
        let mut d = draft("order", "https://api.example.com/orders", Some(HttpMethod::Post));
        d.body = Some("{invalid".to_string());
        assert_eq!(
            d.validate(&[], None),
            vec!["Request body must be valid JSON".to_string()]
        );
    }

    #[test]
    fn names_are_unique_ignoring_case() {
        let existing = vec![saved("1", "Product")];
        let d = draft("product", "https://api.example.com/p", Some(HttpMethod::Get));
        let errors = d.validate(&existing, None);
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("already exists"));
    }

    #[test]
    fn editing_a_descriptor_does_not_collide_with_itself() {
        let existing = vec![saved("1", "Product")];
        let d = draft("PRODUCT", "https://api.example.com/p", Some(HttpMethod::Get));
        assert!(d.validate(&existing, Some("1")).is_empty());
    }

    #[test]
    fn reports_every_missing_field() {
        let errors = EndpointDraft::default().validate(&[], None);
        assert_eq!(
            errors,
            vec![
                "Endpoint name is required".to_string(),
                "URL is required".to_string(),
                "HTTP method is required".to_string(),
            ]
        );
    }

    #[test]
    fn headers_must_be_string_valued() {
        let mut d = draft("x", "https://example.com", Some(HttpMethod::Get));
        d.headers = Some(json!({ "X-Count": 3 }));
        assert_eq!(d.validate(&[], None).len(), 1);

        d.headers = Some(json!({ "Authorization": "Bearer abc" }));
        let descriptor = d.into_descriptor("id-1".to_string(), &[]).unwrap();
        assert_eq!(
            descriptor.headers.unwrap().get("Authorization").map(String::as_str),
            Some("Bearer abc")
        );
    }

    #[test]
    fn get_requests_never_send_a_body() {
        let mut descriptor = saved("1", "list");
        descriptor.body = Some("{\"a\":1}".to_string());
        assert_eq!(descriptor.json_body().unwrap(), None);

        descriptor.method = HttpMethod::Put;
        assert_eq!(descriptor.json_body().unwrap(), Some(json!({ "a": 1 })));
    }

    #[test]
    fn method_parses_case_insensitively() {
        assert_eq!(HttpMethod::parse("patch"), Some(HttpMethod::Patch));
        assert_eq!(HttpMethod::parse("TRACE"), None);
    }
}
