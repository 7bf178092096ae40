use super::request::Request;
use super::response::Response;

use crate::error::BoxError;

use std::error::Error as StdError;

use http::{HeaderValue, StatusCode};

/// Deliberate short-circuit of the dispatch chain.
///
/// `Halt` is flow control, not a failure. Without a status the response
/// keeps whatever status it already has.
#[derive(Debug, Clone, Default)]
pub struct Halt {
    status: Option<StatusCode>,
    body: Option<Vec<u8>>,
    location: Option<HeaderValue>,
}

impl Halt {
    pub fn stop() -> Self {
        Self::default()
    }

    pub fn new(status: StatusCode) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    pub fn redirect(location: HeaderValue, status: StatusCode) -> Self {
        Self {
            status: Some(status),
            location: Some(location),
            body: None,
        }
    }

    pub fn with_body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = Some(body.into());
        self
    }

    pub fn status(&self) -> Option<StatusCode> {
        self.status
    }

    pub fn body(&self) -> Option<&[u8]> {
        self.body.as_deref()
    }

    pub(crate) fn apply(self, res: &mut Response) {
        if let Some(status) = self.status {
            res.set_status(status);
        }
        if let Some(location) = self.location {
            res.headers_mut().insert(http::header::LOCATION, location);
        }
        if let Some(body) = self.body {
            res.set_body(body);
        }
    }
}

/// Early exit from a handler: either a halt or a failure.
#[derive(Debug)]
pub enum Interrupt {
    Halt(Halt),
    Failure(BoxError),
}

impl Interrupt {
    pub fn failure(e: impl Into<BoxError>) -> Self {
        Self::Failure(e.into())
    }
}

impl From<Halt> for Interrupt {
    fn from(h: Halt) -> Self {
        Self::Halt(h)
    }
}

impl<E> From<E> for Interrupt
where
    E: StdError + Send + Sync + 'static,
{
    fn from(e: E) -> Self {
        Self::Failure(Box::new(e))
    }
}

/// Values a route may return as its body.
///
/// `None` leaves the response body as the handler wrote it.
pub trait IntoBody {
    fn into_body(self) -> Option<Vec<u8>>;
}

impl IntoBody for () {
    fn into_body(self) -> Option<Vec<u8>> {
        None
    }
}

impl IntoBody for String {
    fn into_body(self) -> Option<Vec<u8>> {
        Some(self.into_bytes())
    }
}

impl IntoBody for &str {
    fn into_body(self) -> Option<Vec<u8>> {
        Some(self.as_bytes().to_vec())
    }
}

impl IntoBody for Vec<u8> {
    fn into_body(self) -> Option<Vec<u8>> {
        Some(self)
    }
}

impl IntoBody for serde_json::Value {
    fn into_body(self) -> Option<Vec<u8>> {
        Some(self.to_string().into_bytes())
    }
}

impl<T: IntoBody> IntoBody for Option<T> {
    fn into_body(self) -> Option<Vec<u8>> {
        self.and_then(IntoBody::into_body)
    }
}

pub trait RouteHandler: Send + Sync {
    fn call(&self, req: &Request, res: &mut Response) -> Result<Option<Vec<u8>>, Interrupt>;
}

pub trait FilterHandler: Send + Sync {
    fn call(&self, req: &Request, res: &mut Response) -> Result<(), Interrupt>;
}

impl<F, B> RouteHandler for F
where
    F: Fn(&Request, &mut Response) -> Result<B, Interrupt> + Send + Sync,
    B: IntoBody,
{
    fn call(&self, req: &Request, res: &mut Response) -> Result<Option<Vec<u8>>, Interrupt> {
        (self)(req, res).map(IntoBody::into_body)
    }
}

impl<F> FilterHandler for F
where
    F: Fn(&Request, &mut Response) -> Result<(), Interrupt> + Send + Sync,
{
    fn call(&self, req: &Request, res: &mut Response) -> Result<(), Interrupt> {
        (self)(req, res)
    }
}
