//! Route and filter dispatch core for embedded HTTP servers.
//!
//! Routes are bound to a method, a path template and an optional accept
//! type. Filters are bound to a phase (`before` or `after`) instead of a
//! method. For every request the [`Dispatcher`] runs the matching
//! before-filters, the first matching route, then the matching
//! after-filters, all in registration order.
//!
//! ```
//! use spur::{Dispatcher, Halt, Method, Registry, Request, StatusCode};
//! use std::sync::Arc;
//!
//! let registry = Arc::new(Registry::new());
//! registry
//!     .before("/admin/*", |req, _| match req.header("authorization") {
//!         Some(_) => Ok(()),
//!         None => Err(Halt::new(StatusCode::UNAUTHORIZED).into()),
//!     })
//!     .get("/users/new", |_, _| Ok("form"))
//!     .get("/users/:id", |req, _| Ok(format!("user {}", req.param("id").unwrap_or(""))))
//!     .get_with_accept("/users/:id", "application/json", |_, _| Ok("{}"));
//!
//! let dispatcher = Dispatcher::new(registry);
//! let done = dispatcher.dispatch(Request::new(Method::GET, "/users/42"));
//! assert_eq!(done.response.body_string().unwrap(), "user 42");
//!
//! let done = dispatcher.dispatch(Request::new(Method::GET, "/admin/panel"));
//! assert_eq!(done.response.status(), StatusCode::UNAUTHORIZED);
//! ```

#![forbid(unsafe_code)]

mod accept;
mod captures;
mod dispatch;
mod error;
mod matcher;
mod pattern;
mod registry;
mod routable;
mod template;

#[cfg(feature = "hyper-service")]
mod hyper_service;

pub use crate::accept::{accepts, media_ranges, AcceptType};
pub use crate::captures::Captures;
pub use crate::dispatch::{
    CancelToken, DispatchConfig, Dispatched, Dispatcher, FilterHandler, Halt, Interrupt,
    IntoBody, Outcome, Params, Request, Response, RouteHandler, Stage,
};
pub use crate::error::{BoxError, DispatchError, RouterError};
pub use crate::matcher::{FilterMatch, FilterMatches, Miss, RouteMatch};
pub use crate::pattern::{PathPattern, Segment};
pub use crate::registry::{Entry, Handler, Phase, Registry, Routes, Target};
pub use crate::template::{template_route, Model, ModelAndView, TemplateEngine, TemplateRoute};

#[cfg(feature = "hyper-service")]
pub use crate::hyper_service::DispatchService;

pub use http::{HeaderMap, HeaderValue, Method, StatusCode};
