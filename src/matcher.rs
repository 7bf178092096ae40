//! Route and filter resolution over a [`Routes`] snapshot.
//!
//! Registration order is the only precedence rule: the first route whose
//! path and accept type both fit wins, and filters run in the order they
//! were added. There is no specificity scoring.

use crate::accept::{accepts, AcceptType};
use crate::captures::Captures;
use crate::error::DispatchError;
use crate::registry::{Entry, Phase, Routes, Target};

use http::Method;
use smallvec::SmallVec;

#[derive(Debug)]
pub struct RouteMatch<'a> {
    pub entry: &'a Entry,
    pub captures: Captures<'a>,
    pub accept_type: &'a AcceptType,
}

#[derive(Debug)]
pub struct FilterMatch<'a> {
    pub entry: &'a Entry,
    pub captures: Captures<'a>,
}

pub type FilterMatches<'a> = SmallVec<[FilterMatch<'a>; 4]>;

/// Why no route was selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Miss {
    NoRoute,
    NotAcceptable,
}

impl Miss {
    pub fn into_error(self, method: &Method, path: &str, accept: Option<&str>) -> DispatchError {
        match self {
            Self::NoRoute => DispatchError::NoRouteMatched {
                method: method.clone(),
                path: path.to_owned(),
            },
            Self::NotAcceptable => DispatchError::NoAcceptableRepresentation {
                method: method.clone(),
                path: path.to_owned(),
                accept: accept.unwrap_or_default().to_owned(),
            },
        }
    }
}

impl Routes {
    pub fn find_route<'a>(
        &'a self,
        method: &Method,
        path: &'a str,
        accept: Option<&str>,
    ) -> Option<RouteMatch<'a>> {
        self.resolve_route(method, path, accept).ok()
    }

    /// Like [`find_route`](Self::find_route) but tells a path miss from a
    /// negotiation miss.
    pub fn resolve_route<'a>(
        &'a self,
        method: &Method,
        path: &'a str,
        accept: Option<&str>,
    ) -> Result<RouteMatch<'a>, Miss> {
        let mut candidates = self.candidates_for(&Target::Method(method.clone()));
        if candidates.is_empty() && *method == Method::HEAD {
            candidates = self.candidates_for(&Target::Method(Method::GET));
        }

        let mut path_matched = false;
        for entry in candidates {
            let captures = match entry.pattern().match_path(path) {
                Some(c) => c,
                None => continue,
            };
            path_matched = true;
            if !accepts(accept, entry.accept_type()) {
                continue;
            }
            return Ok(RouteMatch {
                entry,
                captures,
                accept_type: entry.accept_type(),
            });
        }

        if path_matched {
            Err(Miss::NotAcceptable)
        } else {
            Err(Miss::NoRoute)
        }
    }

    pub fn find_filters<'a>(
        &'a self,
        phase: Phase,
        path: &'a str,
        accept: Option<&str>,
    ) -> FilterMatches<'a> {
        self.candidates_for(&Target::Phase(phase))
            .iter()
            .filter_map(|entry| {
                let captures = entry.pattern().match_path(path)?;
                if accepts(accept, entry.accept_type()) {
                    Some(FilterMatch {
                        entry: &**entry,
                        captures,
                    })
                } else {
                    None
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::{Interrupt, Request, Response};
    use crate::registry::Registry;

    fn ok(_: &Request, _: &mut Response) -> Result<(), Interrupt> {
        Ok(())
    }

    fn template<'a>(m: &RouteMatch<'a>) -> &'a str {
        m.entry.pattern().template()
    }

    #[test]
    fn registration_order_wins() {
        let registry = Registry::new();
        registry
            .register_route(Method::GET, "/users/new", AcceptType::Any, ok)
            .register_route(Method::GET, "/users/:id", AcceptType::Any, ok);
        let routes = registry.snapshot();
        let m = routes.find_route(&Method::GET, "/users/new", None).unwrap();
        assert_eq!(template(&m), "/users/new");
        let m = routes.find_route(&Method::GET, "/users/7", None).unwrap();
        assert_eq!(m.captures.get("id"), Some("7"));

        let registry = Registry::new();
        registry
            .register_route(Method::GET, "/users/:id", AcceptType::Any, ok)
            .register_route(Method::GET, "/users/new", AcceptType::Any, ok);
        let routes = registry.snapshot();
        let m = routes.find_route(&Method::GET, "/users/new", None).unwrap();
        assert_eq!(template(&m), "/users/:id");
        assert_eq!(m.captures.get("id"), Some("new"));
    }

    #[test]
    fn method_scoped() {
        let registry = Registry::new();
        registry.register_route(Method::POST, "/a", AcceptType::Any, ok);
        let routes = registry.snapshot();
        assert!(routes.find_route(&Method::POST, "/a", None).is_some());
        assert_eq!(
            routes.resolve_route(&Method::GET, "/a", None).unwrap_err(),
            Miss::NoRoute
        );
    }

    #[test]
    fn negotiation() {
        let registry = Registry::new();
        registry.register_route(Method::GET, "/data", "application/json", ok);
        let routes = registry.snapshot();

        let m = routes
            .find_route(&Method::GET, "/data", Some("application/json"))
            .unwrap();
        assert_eq!(m.accept_type.as_str(), "application/json");
        assert!(routes
            .find_route(&Method::GET, "/data", Some("*/*"))
            .is_some());
        assert_eq!(
            routes
                .resolve_route(&Method::GET, "/data", Some("text/html"))
                .unwrap_err(),
            Miss::NotAcceptable
        );
        assert_eq!(
            routes
                .resolve_route(&Method::GET, "/other", Some("text/html"))
                .unwrap_err(),
            Miss::NoRoute
        );
    }

    #[test]
    fn negotiation_falls_through_in_order() {
        let registry = Registry::new();
        registry
            .register_route(Method::GET, "/doc", "application/json", ok)
            .register_route(Method::GET, "/doc", "text/html", ok);
        let routes = registry.snapshot();
        let m = routes
            .find_route(&Method::GET, "/doc", Some("text/html"))
            .unwrap();
        assert_eq!(m.accept_type.as_str(), "text/html");
        let m = routes
            .find_route(&Method::GET, "/doc", Some("text/*, application/json"))
            .unwrap();
        assert_eq!(m.accept_type.as_str(), "application/json");
    }

    #[test]
    fn head_falls_back_to_get() {
        let registry = Registry::new();
        registry.register_route(Method::GET, "/items/:id", AcceptType::Any, ok);
        let routes = registry.snapshot();
        let m = routes.find_route(&Method::HEAD, "/items/3", None).unwrap();
        assert_eq!(m.captures.get("id"), Some("3"));
        assert_eq!(m.entry.target(), &Target::Method(Method::GET));

        registry.register_route(Method::HEAD, "/only-head", AcceptType::Any, ok);
        let routes = registry.snapshot();
        assert!(routes.find_route(&Method::HEAD, "/items/3", None).is_none());
    }

    #[test]
    fn filters_all_in_order() {
        let registry = Registry::new();
        registry
            .register_filter(Phase::Before, Some("/api/*"), AcceptType::Any, ok)
            .register_filter(Phase::Before, None, AcceptType::Any, ok)
            .register_filter(Phase::Before, Some("/web/*"), AcceptType::Any, ok)
            .register_filter(Phase::Before, Some("/api/:v/x"), "application/json", ok)
            .register_filter(Phase::After, None, AcceptType::Any, ok);
        let routes = registry.snapshot();

        let found = routes.find_filters(Phase::Before, "/api/v1/x", Some("text/html"));
        let names: Vec<_> = found
            .iter()
            .map(|m| m.entry.pattern().template())
            .collect();
        assert_eq!(names, ["/api/*", "+/*paths"]);
        assert_eq!(found[0].captures.splat(), Some("v1/x"));

        let found = routes.find_filters(Phase::Before, "/api/v1/x", None);
        assert_eq!(found.len(), 3);
        assert_eq!(found[2].captures.get("v"), Some("v1"));

        assert_eq!(routes.find_filters(Phase::After, "/", None).len(), 1);
    }
}
