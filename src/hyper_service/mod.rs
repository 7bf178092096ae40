#![forbid(unsafe_code)]

mod service;

pub use self::service::DispatchService;

use std::future::Future;
use std::pin::Pin;

type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;
