#![cfg(feature = "hyper-service")]

use spur::{Dispatcher, Registry};

use std::sync::{mpsc, Arc, Mutex};

use hyper::service::Service;
use hyper::{Body, Request};

#[tokio::test]
async fn serves_requests() {
    let registry = Arc::new(Registry::new());
    registry
        .get("/hello/:name", |req, _| {
            Ok(format!("hello, {}!", req.param("name").unwrap_or("")))
        })
        .post("/echo", |req, _| Ok(req.body().to_vec()));
    let mut service = Dispatcher::new(registry).into_service();

    let req = Request::get("/hello/world").body(Body::empty()).unwrap();
    let res = service.call(req).await.unwrap();
    assert_eq!(res.status(), 200);
    let body = hyper::body::to_bytes(res.into_body()).await.unwrap();
    assert_eq!(&body[..], b"hello, world!");

    let req = Request::post("/echo").body(Body::from("ping")).unwrap();
    let res = service.call(req).await.unwrap();
    let body = hyper::body::to_bytes(res.into_body()).await.unwrap();
    assert_eq!(&body[..], b"ping");

    let req = Request::get("/missing").body(Body::empty()).unwrap();
    let res = service.call(req).await.unwrap();
    assert_eq!(res.status(), 404);
}

#[tokio::test]
async fn head_suppresses_body() {
    let registry = Arc::new(Registry::new());
    registry.get("/page", |_, res| {
        res.set_content_type("text/plain")?;
        Ok("content")
    });
    let mut service = Dispatcher::new(registry).into_service();

    let req = Request::head("/page").body(Body::empty()).unwrap();
    let res = service.call(req).await.unwrap();
    assert_eq!(res.status(), 200);
    assert_eq!(res.headers()["content-type"], "text/plain");
    let body = hyper::body::to_bytes(res.into_body()).await.unwrap();
    assert!(body.is_empty());
}

#[tokio::test]
async fn blocking_handler_leaves_runtime_free() {
    let (tx, rx) = mpsc::channel::<&'static str>();
    let rx = Mutex::new(rx);
    let registry = Arc::new(Registry::new());
    registry.get("/wait", move |_, _| {
        let msg = rx.lock().unwrap().recv()?;
        Ok(msg)
    });
    let mut service = Dispatcher::new(registry).into_service();

    let req = Request::get("/wait").body(Body::empty()).unwrap();
    let pending = tokio::spawn(service.call(req));
    tokio::task::yield_now().await;
    tx.send("released").unwrap();

    let res = pending.await.unwrap().unwrap();
    let body = hyper::body::to_bytes(res.into_body()).await.unwrap();
    assert_eq!(&body[..], b"released");
}
