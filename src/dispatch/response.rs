use std::borrow::Cow;

use http::header::{HeaderMap, HeaderName, HeaderValue, InvalidHeaderValue};
use http::header::{CONTENT_TYPE, LOCATION};
use http::StatusCode;

/// Response under construction, shared by every stage of one dispatch.
#[derive(Debug, Clone)]
pub struct Response {
    status: StatusCode,
    headers: HeaderMap,
    body: Option<Vec<u8>>,
}

impl Default for Response {
    fn default() -> Self {
        Self::new()
    }
}

impl Response {
    pub fn new() -> Self {
        Self {
            status: StatusCode::OK,
            headers: HeaderMap::new(),
            body: None,
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn set_status(&mut self, status: StatusCode) {
        self.status = status;
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn headers_mut(&mut self) -> &mut HeaderMap {
        &mut self.headers
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    pub fn set_header(&mut self, name: HeaderName, value: &str) -> Result<(), InvalidHeaderValue> {
        let value = HeaderValue::from_str(value)?;
        self.headers.insert(name, value);
        Ok(())
    }

    pub fn content_type(&self) -> Option<&str> {
        self.header(CONTENT_TYPE.as_str())
    }

    pub fn set_content_type(&mut self, value: &str) -> Result<(), InvalidHeaderValue> {
        self.set_header(CONTENT_TYPE, value)
    }

    pub fn body(&self) -> Option<&[u8]> {
        self.body.as_deref()
    }

    pub fn body_string(&self) -> Option<Cow<'_, str>> {
        self.body.as_deref().map(String::from_utf8_lossy)
    }

    pub fn has_body(&self) -> bool {
        self.body.is_some()
    }

    pub fn set_body(&mut self, body: impl Into<Vec<u8>>) {
        self.body = Some(body.into());
    }

    pub fn clear_body(&mut self) {
        self.body = None;
    }

    pub fn take_body(&mut self) -> Option<Vec<u8>> {
        self.body.take()
    }

    /// Points the client at `location`. Does not halt the chain.
    pub fn redirect(&mut self, location: &str, status: StatusCode) -> Result<(), InvalidHeaderValue> {
        self.set_header(LOCATION, location)?;
        self.status = status;
        Ok(())
    }

    pub fn into_parts(self) -> (StatusCode, HeaderMap, Option<Vec<u8>>) {
        (self.status, self.headers, self.body)
    }
}
