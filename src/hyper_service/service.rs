use super::BoxFuture;

use crate::dispatch::{Dispatcher, Request, Response};

use std::sync::Arc;
use std::task::{Context, Poll};

use http::{Method, StatusCode};
use hyper::service::Service;
use hyper::Body;
use tracing::{debug, error};

/// Hyper service driving a [`Dispatcher`].
///
/// The request body is collected before dispatch. Handlers run on the
/// blocking pool, so they may block without stalling the runtime.
#[derive(Debug, Clone)]
pub struct DispatchService {
    dispatcher: Arc<Dispatcher>,
}

impl DispatchService {
    pub fn new(dispatcher: Dispatcher) -> Self {
        Self::from_shared(Arc::new(dispatcher))
    }

    pub fn from_shared(dispatcher: Arc<Dispatcher>) -> Self {
        Self { dispatcher }
    }
}

impl Dispatcher {
    pub fn into_service(self) -> DispatchService {
        DispatchService::new(self)
    }
}

impl Service<hyper::Request<Body>> for DispatchService {
    type Response = hyper::Response<Body>;
    type Error = hyper::Error;
    type Future = BoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: hyper::Request<Body>) -> Self::Future {
        let dispatcher = Arc::clone(&self.dispatcher);
        Box::pin(async move {
            let (parts, body) = req.into_parts();
            let body = hyper::body::to_bytes(body).await?;

            let head = parts.method == Method::HEAD;
            let target = match parts.uri.path_and_query() {
                Some(pq) => pq.as_str(),
                None => parts.uri.path(),
            };
            let request = Request::from_parts(parts.method, target, parts.headers, body.to_vec());

            let task = tokio::task::spawn_blocking(move || dispatcher.dispatch(request));
            let dispatched = match task.await {
                Ok(dispatched) => dispatched,
                Err(e) => {
                    error!(error = %e, "dispatch task aborted");
                    let mut res = hyper::Response::new(Body::empty());
                    *res.status_mut() = StatusCode::INTERNAL_SERVER_ERROR;
                    return Ok(res);
                }
            };
            debug!(
                method = %dispatched.request.method(),
                path = dispatched.request.path(),
                status = %dispatched.response.status(),
                "request served"
            );
            Ok(into_hyper(dispatched.response, head))
        })
    }
}

fn into_hyper(res: Response, head: bool) -> hyper::Response<Body> {
    let (status, headers, body) = res.into_parts();
    let mut out = hyper::Response::new(Body::empty());
    *out.status_mut() = status;
    *out.headers_mut() = headers;
    if let Some(body) = body {
        if !head {
            *out.body_mut() = Body::from(body);
        }
    }
    out
}
