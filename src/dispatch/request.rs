use crate::accept::AcceptType;
use crate::captures::Captures;

use std::str::FromStr;

use http::header::{HeaderMap, ACCEPT};
use http::Method;

/// Incoming request as seen by routes and filters.
///
/// Path parameters are rebound by the dispatcher before each handler runs,
/// so a filter sees the bindings of its own pattern.
#[derive(Debug, Clone)]
pub struct Request {
    method: Method,
    path: String,
    query: Option<String>,
    headers: HeaderMap,
    body: Vec<u8>,
    params: Params,
    accept_type: Option<AcceptType>,
}

impl Request {
    /// `target` is the request target as received, optionally with a query.
    pub fn new(method: Method, target: &str) -> Self {
        Self::from_parts(method, target, HeaderMap::new(), Vec::new())
    }

    pub fn from_parts(method: Method, target: &str, headers: HeaderMap, body: Vec<u8>) -> Self {
        let (path, query) = match target.find('?') {
            Some(i) => (&target[..i], Some(target[i + 1..].to_owned())),
            None => (target, None),
        };
        Self {
            method,
            path: path.to_owned(),
            query,
            headers,
            body,
            params: Params::empty(),
            accept_type: None,
        }
    }

    pub fn with_header(mut self, name: http::header::HeaderName, value: http::HeaderValue) -> Self {
        self.headers.append(name, value);
        self
    }

    pub fn with_body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = body.into();
        self
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn query(&self) -> Option<&str> {
        self.query.as_deref()
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Raw `Accept` header, all occurrences joined.
    pub fn accept(&self) -> Option<String> {
        let mut values = self
            .headers
            .get_all(ACCEPT)
            .iter()
            .filter_map(|v| v.to_str().ok());
        let first = values.next()?;
        Some(values.fold(first.to_owned(), |mut acc, v| {
            acc.push_str(", ");
            acc.push_str(v);
            acc
        }))
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    pub fn params(&self) -> &Params {
        &self.params
    }

    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name)
    }

    pub fn splat(&self) -> Option<&str> {
        self.params.splat()
    }

    /// Accept type of the route that was selected, once routing is done.
    pub fn matched_accept_type(&self) -> Option<&AcceptType> {
        self.accept_type.as_ref()
    }

    pub(crate) fn set_params(&mut self, params: Params) {
        self.params = params;
    }

    pub(crate) fn set_matched_accept_type(&mut self, accept: AcceptType) {
        self.accept_type = Some(accept);
    }
}

/// Owned path bindings.
#[derive(Debug, Clone, Default)]
pub struct Params {
    path: Option<String>,
    offset: Vec<(Box<str>, usize, usize)>, // (name, start, end)
    splat: Option<(usize, usize)>,
}

impl Params {
    pub fn get(&self, name: &str) -> Option<&str> {
        let path = self.path.as_ref()?;
        self.offset
            .iter()
            .find_map(|&(ref n, s, e)| some_if(&**n == name, || &path[s..e]))
    }

    pub fn parse<T: FromStr>(&self, name: &str) -> Option<Result<T, T::Err>> {
        self.get(name).map(T::from_str)
    }

    pub fn splat(&self) -> Option<&str> {
        let path = self.path.as_ref()?;
        self.splat.map(|(s, e)| &path[s..e])
    }

    pub fn len(&self) -> usize {
        self.offset.len()
    }

    pub fn is_empty(&self) -> bool {
        self.offset.is_empty() && self.splat.is_none()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        let path = self.path.as_deref().unwrap_or_default();
        self.offset
            .iter()
            .map(move |&(ref n, s, e)| (&**n, &path[s..e]))
    }
}

impl Params {
    pub(crate) fn empty() -> Self {
        Self::default()
    }

    /// `caps` must borrow its values from `path`.
    pub(crate) fn new(path: &str, caps: &Captures<'_>) -> Self {
        let base = path.as_ptr() as usize;
        let span = |value: &str| {
            let start = (value.as_ptr() as usize) - base;
            (start, start + value.len())
        };

        let mut offset: Vec<(Box<str>, usize, usize)> = Vec::with_capacity(caps.len());
        offset.extend(caps.iter().map(|&(name, value)| {
            let (start, end) = span(value);
            (name.into(), start, end)
        }));
        let splat = caps.splat().map(span);

        let path = some_if(!offset.is_empty() || splat.is_some(), || path.to_owned());
        Self {
            path,
            offset,
            splat,
        }
    }
}

#[inline(always)]
fn some_if<T>(cond: bool, f: impl FnOnce() -> T) -> Option<T> {
    if cond {
        Some(f())
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pattern::PathPattern;

    use http::HeaderValue;

    #[test]
    fn target_split() {
        let req = Request::new(Method::GET, "/search?q=rust&page=2");
        assert_eq!(req.path(), "/search");
        assert_eq!(req.query(), Some("q=rust&page=2"));

        let req = Request::new(Method::GET, "/plain");
        assert_eq!(req.query(), None);
    }

    #[test]
    fn accept_joins_values() {
        let req = Request::new(Method::GET, "/")
            .with_header(ACCEPT, HeaderValue::from_static("text/html"))
            .with_header(ACCEPT, HeaderValue::from_static("application/json"));
        assert_eq!(req.accept().unwrap(), "text/html, application/json");
        assert!(Request::new(Method::GET, "/").accept().is_none());
    }

    #[test]
    fn params_from_captures() {
        let pattern = PathPattern::compile("/u/:uid/p/:pid/*").unwrap();
        let path = "/u/alice/p/42/a/b";
        let caps = pattern.match_path(path).unwrap();
        let params = Params::new(path, &caps);
        drop(caps);

        assert_eq!(params.get("uid"), Some("alice"));
        assert_eq!(params.parse::<u64>("pid").unwrap().unwrap(), 42);
        assert_eq!(params.splat(), Some("a/b"));
        assert_eq!(params.get("missing"), None);
        let all: Vec<_> = params.iter().collect();
        assert_eq!(all, [("uid", "alice"), ("pid", "42")]);
    }

    #[test]
    fn empty_params() {
        let pattern = PathPattern::compile("/static").unwrap();
        let caps = pattern.match_path("/static").unwrap();
        let params = Params::new("/static", &caps);
        assert!(params.is_empty());
        assert_eq!(params.splat(), None);
    }
}
