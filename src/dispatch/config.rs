use crate::error::DispatchError;

use http::HeaderValue;

/// Dispatcher settings.
#[derive(Debug, Clone)]
pub struct DispatchConfig {
    default_content_type: Option<HeaderValue>,
    not_found_body: Option<String>,
    not_acceptable_body: Option<String>,
    internal_error_body: Option<String>,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            default_content_type: None,
            not_found_body: Some("404 Not Found".to_owned()),
            not_acceptable_body: Some("406 Not Acceptable".to_owned()),
            internal_error_body: Some("500 Internal Server Error".to_owned()),
        }
    }
}

impl DispatchConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set on responses that carry a body but no `Content-Type`.
    pub fn default_content_type(mut self, value: HeaderValue) -> Self {
        self.default_content_type = Some(value);
        self
    }

    pub fn not_found_body(mut self, body: Option<String>) -> Self {
        self.not_found_body = body;
        self
    }

    pub fn not_acceptable_body(mut self, body: Option<String>) -> Self {
        self.not_acceptable_body = body;
        self
    }

    pub fn internal_error_body(mut self, body: Option<String>) -> Self {
        self.internal_error_body = body;
        self
    }

    pub(crate) fn content_type(&self) -> Option<&HeaderValue> {
        self.default_content_type.as_ref()
    }

    pub(crate) fn body_for(&self, err: &DispatchError) -> Option<&str> {
        let body = match err {
            DispatchError::NoRouteMatched { .. } => &self.not_found_body,
            DispatchError::NoAcceptableRepresentation { .. } => &self.not_acceptable_body,
            DispatchError::HandlerFailure { .. } => &self.internal_error_body,
        };
        body.as_deref()
    }
}
