mod entry;
mod target;

pub use self::entry::{Entry, Handler};
pub use self::target::{Phase, Target};

use crate::accept::AcceptType;
use crate::dispatch::{FilterHandler, RouteHandler};
use crate::error::RouterError;
use crate::pattern::PathPattern;

use std::collections::HashMap;
use std::sync::Arc;

use arc_swap::ArcSwap;
use http::Method;
use tracing::debug;

/// Append-only table of routes and filters.
///
/// Lookups work on an immutable [`Routes`] snapshot. Every registration
/// swaps in a new snapshot, so a match that is already running never sees
/// a half-written entry list.
#[derive(Debug, Default)]
pub struct Registry {
    routes: ArcSwap<Routes>,
}

/// Immutable view of a registry, keyed by method or phase.
#[derive(Debug, Default, Clone)]
pub struct Routes {
    table: HashMap<Target, Vec<Arc<Entry>>>,
}

impl Routes {
    /// Entries for `target` in registration order.
    pub fn candidates_for(&self, target: &Target) -> &[Arc<Entry>] {
        self.table.get(target).map(|v| &**v).unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.table.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.table.values().all(Vec::is_empty)
    }

    fn push(&mut self, entry: Arc<Entry>) {
        self.table
            .entry(entry.target().clone())
            .or_insert_with(Vec::new)
            .push(entry)
    }
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> Arc<Routes> {
        self.routes.load_full()
    }

    pub fn clear(&self) {
        self.routes.store(Arc::new(Routes::default()));
        debug!("registry cleared");
    }

    /// Removes every entry for `target` whose template text is `template`.
    ///
    /// Returns the number of removed entries.
    pub fn remove(&self, target: &Target, template: &str) -> usize {
        let mut removed = 0;
        self.routes.rcu(|current| {
            let mut next = Routes::clone(current);
            removed = 0;
            if let Some(entries) = next.table.get_mut(target) {
                let before = entries.len();
                entries.retain(|e| e.pattern().template() != template);
                removed = before - entries.len();
            }
            next
        });
        debug!(%target, template, removed, "entries removed");
        removed
    }

    pub(crate) fn add(&self, entry: Entry) {
        debug!(
            target = %entry.target(),
            template = entry.pattern().template(),
            accept = %entry.accept_type(),
            "entry registered"
        );
        let entry = Arc::new(entry);
        self.routes.rcu(|current| {
            let mut next = Routes::clone(current);
            next.push(Arc::clone(&entry));
            next
        });
    }

    pub fn try_register_route(
        &self,
        method: Method,
        template: &str,
        accept: impl Into<AcceptType>,
        handler: impl RouteHandler + 'static,
    ) -> Result<&Self, RouterError> {
        let target = Target::method(method)?;
        let pattern = PathPattern::compile(template)?;
        let handler = Handler::Route(Arc::new(handler));
        self.add(Entry::new(target, pattern, accept.into(), handler));
        Ok(self)
    }

    pub fn register_route(
        &self,
        method: Method,
        template: &str,
        accept: impl Into<AcceptType>,
        handler: impl RouteHandler + 'static,
    ) -> &Self {
        if let Err(e) = self.try_register_route(method, template, accept, handler) {
            panic!("{}: template = {:?}", e, template);
        }
        self
    }

    /// Registers a filter; `None` as template applies it to every path.
    pub fn try_register_filter(
        &self,
        phase: Phase,
        template: Option<&str>,
        accept: impl Into<AcceptType>,
        handler: impl FilterHandler + 'static,
    ) -> Result<&Self, RouterError> {
        let pattern = match template {
            Some(t) => PathPattern::compile(t)?,
            None => PathPattern::all_paths(),
        };
        let handler = Handler::Filter(Arc::new(handler));
        self.add(Entry::new(phase.into(), pattern, accept.into(), handler));
        Ok(self)
    }

    pub fn register_filter(
        &self,
        phase: Phase,
        template: Option<&str>,
        accept: impl Into<AcceptType>,
        handler: impl FilterHandler + 'static,
    ) -> &Self {
        if let Err(e) = self.try_register_filter(phase, template, accept, handler) {
            panic!("{}: template = {:?}", e, template);
        }
        self
    }
}
