//! Text fields of the endpoint form and their conversion into a draft.

use common::model::endpoint::{EndpointDescriptor, EndpointDraft, HttpMethod};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Name,
    Url,
    Method,
    Headers,
    Body,
}

/// The form exactly as typed.
#[derive(Debug, Clone, PartialEq)]
pub struct EndpointForm {
    pub name: String,
    pub url: String,
    pub method: String,
    /// JSON object text; empty means no headers.
    pub headers: String,
    pub body: String,
}

impl Default for EndpointForm {
    fn default() -> Self {
        Self {
            name: String::new(),
            url: String::new(),
            method: HttpMethod::Get.as_str().to_string(),
            headers: String::new(),
            body: String::new(),
        }
    }
}

impl EndpointForm {
    pub fn set(&mut self, field: Field, value: String) {
        match field {
            Field::Name => self.name = value,
            Field::Url => self.url = value,
            Field::Method => self.method = value,
            Field::Headers => self.headers = value,
            Field::Body => self.body = value,
        }
    }

    /// Prefills the form from a saved descriptor.
    pub fn from_descriptor(descriptor: &EndpointDescriptor) -> Self {
        let headers = descriptor
            .headers
            .as_ref()
            .filter(|h| !h.is_empty())
            .and_then(|h| serde_json::to_string_pretty(h).ok())
            .unwrap_or_default();
        Self {
            name: descriptor.name.clone(),
            url: descriptor.url.clone(),
            method: descriptor.method.as_str().to_string(),
            headers,
            body: descriptor.body.clone().unwrap_or_default(),
        }
    }

    /// Builds the draft and checks it against the saved list.
    ///
    /// Returns every problem found; the headers text must parse as JSON before
    /// the shared rules can look at it.
    pub fn to_draft(
        &self,
        existing: &[EndpointDescriptor],
        editing_id: Option<&str>,
    ) -> Result<EndpointDraft, Vec<String>> {
        let mut errors = Vec::new();

        let headers = match self.headers.trim() {
            "" => None,
            text => match serde_json::from_str::<Value>(text) {
                Ok(value) => Some(value),
                Err(_) => {
                    errors.push("Headers must be valid JSON".to_string());
                    None
                }
            },
        };

        let body = Some(self.body.trim())
            .filter(|b| !b.is_empty())
            .map(str::to_string);

        let draft = EndpointDraft {
            name: self.name.trim().to_string(),
            url: self.url.trim().to_string(),
            method: HttpMethod::parse(&self.method),
            headers,
            body,
        };
        errors.extend(draft.validate(existing, editing_id));

        if errors.is_empty() {
            Ok(draft)
        } else {
            Err(errors)
        }
    }
}
