//! Template-rendered routes.
//!
//! The dispatcher treats rendered output as an opaque body.

use crate::dispatch::{Interrupt, Request, Response, RouteHandler};
use crate::error::BoxError;

use std::sync::Arc;

use serde_json::{Map, Value};

pub type Model = Map<String, Value>;

pub trait TemplateEngine: Send + Sync {
    fn render(&self, template_path: &str, model: &Model) -> Result<String, BoxError>;
}

impl<E: TemplateEngine + ?Sized> TemplateEngine for Arc<E> {
    fn render(&self, template_path: &str, model: &Model) -> Result<String, BoxError> {
        (**self).render(template_path, model)
    }
}

/// A view name plus the model to render it with.
#[derive(Debug, Clone, Default)]
pub struct ModelAndView {
    view: String,
    model: Model,
}

impl ModelAndView {
    pub fn new(view: impl Into<String>) -> Self {
        Self {
            view: view.into(),
            model: Model::new(),
        }
    }

    pub fn with_model(view: impl Into<String>, model: Model) -> Self {
        Self {
            view: view.into(),
            model,
        }
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.model.insert(key.into(), value.into());
        self
    }

    pub fn view(&self) -> &str {
        &self.view
    }

    pub fn model(&self) -> &Model {
        &self.model
    }
}

pub struct TemplateRoute<E, F> {
    engine: E,
    handler: F,
}

/// Route whose body is `engine`'s rendering of the view `handler` returns.
pub fn template_route<E, F>(engine: E, handler: F) -> TemplateRoute<E, F>
where
    E: TemplateEngine,
    F: Fn(&Request, &mut Response) -> Result<ModelAndView, Interrupt> + Send + Sync,
{
    TemplateRoute { engine, handler }
}

impl<E, F> RouteHandler for TemplateRoute<E, F>
where
    E: TemplateEngine,
    F: Fn(&Request, &mut Response) -> Result<ModelAndView, Interrupt> + Send + Sync,
{
    fn call(&self, req: &Request, res: &mut Response) -> Result<Option<Vec<u8>>, Interrupt> {
        let mv = (self.handler)(req, res)?;
        let html = self
            .engine
            .render(&mv.view, &mv.model)
            .map_err(Interrupt::Failure)?;
        Ok(Some(html.into_bytes()))
    }
}
