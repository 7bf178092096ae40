use super::target::Target;

use crate::accept::AcceptType;
use crate::dispatch::{FilterHandler, RouteHandler};
use crate::pattern::PathPattern;

use std::fmt;
use std::sync::Arc;

/// Registered route or filter. Immutable once added to a registry.
pub struct Entry {
    target: Target,
    pattern: PathPattern,
    accept: AcceptType,
    handler: Handler,
}

/// Route handlers produce a body; filters only act on the response.
#[derive(Clone)]
pub enum Handler {
    Route(Arc<dyn RouteHandler>),
    Filter(Arc<dyn FilterHandler>),
}

impl Entry {
    pub(crate) fn new(
        target: Target,
        pattern: PathPattern,
        accept: AcceptType,
        handler: Handler,
    ) -> Self {
        Self {
            target,
            pattern,
            accept,
            handler,
        }
    }

    pub fn target(&self) -> &Target {
        &self.target
    }

    pub fn pattern(&self) -> &PathPattern {
        &self.pattern
    }

    pub fn accept_type(&self) -> &AcceptType {
        &self.accept
    }

    pub fn handler(&self) -> &Handler {
        &self.handler
    }

    pub fn as_route(&self) -> Option<&dyn RouteHandler> {
        match &self.handler {
            Handler::Route(h) => Some(&**h),
            Handler::Filter(_) => None,
        }
    }

    pub fn as_filter(&self) -> Option<&dyn FilterHandler> {
        match &self.handler {
            Handler::Filter(h) => Some(&**h),
            Handler::Route(_) => None,
        }
    }
}

impl fmt::Display for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} [{}]", self.target, self.pattern, self.accept)
    }
}

impl fmt::Debug for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Entry")
            .field("target", &self.target)
            .field("pattern", &self.pattern.template())
            .field("accept", &self.accept)
            .field("handler", &self.handler)
            .finish()
    }
}

impl fmt::Debug for Handler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Route(_) => f.write_str("Route(..)"),
            Self::Filter(_) => f.write_str("Filter(..)"),
        }
    }
}
