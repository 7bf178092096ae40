mod config;
mod handler;
mod request;
mod response;

pub use self::config::DispatchConfig;
pub use self::handler::{FilterHandler, Halt, Interrupt, IntoBody, RouteHandler};
pub use self::request::{Params, Request};
pub use self::response::Response;

use crate::error::{BoxError, DispatchError};
use crate::matcher::FilterMatches;
use crate::registry::{Entry, Phase, Registry, Routes};

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use http::header::CONTENT_TYPE;
use tracing::{error, trace, warn};

/// States of a single request lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Received,
    BeforeFilters,
    RouteMatching,
    RouteExecuting,
    AfterFilters,
    Complete,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Received => "received",
            Self::BeforeFilters => "before-filters",
            Self::RouteMatching => "route-matching",
            Self::RouteExecuting => "route-executing",
            Self::AfterFilters => "after-filters",
            Self::Complete => "complete",
        };
        f.write_str(s)
    }
}

/// How a dispatch ended.
///
/// When several stages fail, the first classified error is kept here while
/// the response status follows the latest one. A 404 followed by a failing
/// after-filter reports `Failed(NoRouteMatched)` with a 500 response.
#[derive(Debug)]
pub enum Outcome {
    Complete,
    Halted(Stage),
    Failed(DispatchError),
    Cancelled(Stage),
}

impl Outcome {
    pub fn is_complete(&self) -> bool {
        matches!(self, Self::Complete)
    }

    pub fn error(&self) -> Option<&DispatchError> {
        match self {
            Self::Failed(e) => Some(e),
            _ => None,
        }
    }
}

#[derive(Debug)]
pub struct Dispatched {
    pub request: Request,
    pub response: Response,
    pub outcome: Outcome,
}

/// Cancellation signal checked between stages.
///
/// A handler that has already started always runs to completion.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Release)
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// Runs before-filters, the selected route and after-filters for a request.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    registry: Arc<Registry>,
    config: DispatchConfig,
}

struct Exchange {
    request: Request,
    response: Response,
    outcome: Outcome,
}

enum Flow {
    Continue,
    Stop,
}

impl Dispatcher {
    pub fn new(registry: Arc<Registry>) -> Self {
        Self::with_config(registry, DispatchConfig::default())
    }

    pub fn with_config(registry: Arc<Registry>, config: DispatchConfig) -> Self {
        Self { registry, config }
    }

    pub fn registry(&self) -> &Arc<Registry> {
        &self.registry
    }

    pub fn config(&self) -> &DispatchConfig {
        &self.config
    }

    pub fn dispatch(&self, request: Request) -> Dispatched {
        self.dispatch_with(request, &CancelToken::new())
    }

    pub fn dispatch_with(&self, request: Request, cancel: &CancelToken) -> Dispatched {
        let routes: Arc<Routes> = self.registry.snapshot();
        let method = request.method().clone();
        let path = request.path().to_owned();
        let accept = request.accept();
        let accept = accept.as_deref();
        let config = &self.config;

        let mut ex = Exchange {
            request,
            response: Response::new(),
            outcome: Outcome::Complete,
        };

        trace!(%method, %path, stage = %Stage::Received);

        macro_rules! checkpoint {
            ($stage:expr) => {{
                trace!(%method, %path, stage = %$stage);
                if cancel.is_cancelled() {
                    trace!(%method, %path, stage = %$stage, "dispatch cancelled");
                    ex.outcome = Outcome::Cancelled($stage);
                    return ex.finish(config);
                }
            }};
        }

        checkpoint!(Stage::BeforeFilters);
        let before = routes.find_filters(Phase::Before, &path, accept);
        let flow = self.run_filters(Stage::BeforeFilters, before, &path, &mut ex);

        if let Flow::Continue = flow {
            checkpoint!(Stage::RouteMatching);
            match routes.resolve_route(&method, &path, accept) {
                Ok(m) => {
                    checkpoint!(Stage::RouteExecuting);
                    ex.request.set_params(Params::new(&path, &m.captures));
                    ex.request.set_matched_accept_type(m.accept_type.clone());
                    self.run_route(m.entry, &mut ex);
                }
                Err(miss) => {
                    let err = miss.into_error(&method, &path, accept);
                    warn!(%method, %path, error = %err, "no route selected");
                    self.classify(err, &mut ex);
                }
            }
        }

        checkpoint!(Stage::AfterFilters);
        let after = routes.find_filters(Phase::After, &path, accept);
        self.run_filters(Stage::AfterFilters, after, &path, &mut ex);

        trace!(%method, %path, stage = %Stage::Complete, status = %ex.response.status());
        ex.finish(config)
    }
}

impl Dispatcher {
    fn run_filters(
        &self,
        stage: Stage,
        filters: FilterMatches<'_>,
        path: &str,
        ex: &mut Exchange,
    ) -> Flow {
        for m in filters {
            let handler = match m.entry.as_filter() {
                Some(h) => h,
                None => continue,
            };
            ex.request.set_params(Params::new(path, &m.captures));
            match handler.call(&ex.request, &mut ex.response) {
                Ok(()) => {}
                Err(Interrupt::Halt(halt)) => {
                    trace!(stage = %stage, entry = %m.entry, "halted");
                    halt.apply(&mut ex.response);
                    ex.halted(stage);
                    return Flow::Stop;
                }
                Err(Interrupt::Failure(source)) => {
                    self.fail(stage, m.entry, source, ex);
                    return Flow::Stop;
                }
            }
        }
        Flow::Continue
    }

    fn run_route(&self, entry: &Entry, ex: &mut Exchange) {
        let handler = match entry.as_route() {
            Some(h) => h,
            None => return,
        };
        match handler.call(&ex.request, &mut ex.response) {
            Ok(Some(body)) => ex.response.set_body(body),
            Ok(None) => {}
            Err(Interrupt::Halt(halt)) => {
                trace!(entry = %entry, "halted");
                halt.apply(&mut ex.response);
                ex.halted(Stage::RouteExecuting);
            }
            Err(Interrupt::Failure(source)) => {
                self.fail(Stage::RouteExecuting, entry, source, ex);
            }
        }
    }

    fn fail(&self, stage: Stage, entry: &Entry, source: BoxError, ex: &mut Exchange) {
        let err = DispatchError::HandlerFailure {
            stage,
            entry: entry.to_string(),
            source,
        };
        error!(
            method = %ex.request.method(),
            path = ex.request.path(),
            error = %err,
            "handler failed"
        );
        ex.response.clear_body();
        self.classify(err, ex);
    }

    fn classify(&self, err: DispatchError, ex: &mut Exchange) {
        ex.response.set_status(err.status());
        if !ex.response.has_body() {
            if let Some(body) = self.config.body_for(&err) {
                ex.response.set_body(body);
            }
        }
        if let Outcome::Failed(_) = ex.outcome {
            return;
        }
        ex.outcome = Outcome::Failed(err);
    }
}

impl Exchange {
    fn halted(&mut self, stage: Stage) {
        if let Outcome::Complete = self.outcome {
            self.outcome = Outcome::Halted(stage);
        }
    }

    fn finish(mut self, config: &DispatchConfig) -> Dispatched {
        if let Some(ct) = config.content_type() {
            if self.response.has_body() && !self.response.headers().contains_key(CONTENT_TYPE) {
                self.response.headers_mut().insert(CONTENT_TYPE, ct.clone());
            }
        }
        Dispatched {
            request: self.request,
            response: self.response,
            outcome: self.outcome,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::accept::AcceptType;

    use http::{Method, StatusCode};

    fn hello(_: &Request, _: &mut Response) -> Result<&'static str, Interrupt> {
        Ok("hello")
    }

    #[test]
    fn simple_route() {
        let registry = Arc::new(Registry::new());
        registry.register_route(Method::GET, "/hello", AcceptType::Any, hello);
        let d = Dispatcher::new(registry).dispatch(Request::new(Method::GET, "/hello"));
        assert!(d.outcome.is_complete());
        assert_eq!(d.response.status(), StatusCode::OK);
        assert_eq!(d.response.body_string().unwrap(), "hello");
    }

    #[test]
    fn not_found_body_and_status() {
        let registry = Arc::new(Registry::new());
        let d = Dispatcher::new(registry).dispatch(Request::new(Method::GET, "/nope"));
        assert_eq!(d.response.status(), StatusCode::NOT_FOUND);
        assert_eq!(d.response.body_string().unwrap(), "404 Not Found");
        assert!(matches!(
            d.outcome.error(),
            Some(DispatchError::NoRouteMatched { .. })
        ));
    }

    #[test]
    fn default_content_type() {
        let registry = Arc::new(Registry::new());
        registry.register_route(Method::GET, "/hello", AcceptType::Any, hello);
        let config = DispatchConfig::new()
            .default_content_type(http::HeaderValue::from_static("text/html"));
        let d = Dispatcher::with_config(registry, config)
            .dispatch(Request::new(Method::GET, "/hello"));
        assert_eq!(d.response.content_type(), Some("text/html"));
    }

    #[test]
    fn cancelled_before_start() {
        let registry = Arc::new(Registry::new());
        registry.register_route(Method::GET, "/hello", AcceptType::Any, hello);
        let cancel = CancelToken::new();
        cancel.cancel();
        let d = Dispatcher::new(registry)
            .dispatch_with(Request::new(Method::GET, "/hello"), &cancel);
        assert!(matches!(d.outcome, Outcome::Cancelled(Stage::BeforeFilters)));
        assert!(!d.response.has_body());
    }
}
