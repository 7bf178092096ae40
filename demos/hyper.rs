use spur::{template_route, BoxError, Dispatcher, Halt, Model, ModelAndView, Registry, StatusCode};
use spur::{HeaderValue, TemplateEngine};

use std::convert::Infallible as Never;
use std::sync::Arc;

use hyper::service::make_service_fn;
use tracing_subscriber::EnvFilter;

struct Inline;

impl TemplateEngine for Inline {
    fn render(&self, template_path: &str, model: &Model) -> Result<String, BoxError> {
        let name = model.get("name").and_then(|v| v.as_str()).unwrap_or("stranger");
        Ok(format!("<h1>{}</h1><p>hello, {}!</p>", template_path, name))
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let registry = Arc::new(Registry::new());
    registry
        .before("/private/*", |req, _| match req.header("authorization") {
            Some(_) => Ok(()),
            None => Err(Halt::new(StatusCode::UNAUTHORIZED).with_body("login first").into()),
        })
        .get("/hello/:name", |req, _| {
            Ok(format!("hello, {}!", req.param("name").unwrap_or("")))
        })
        .get_with_accept("/hello/:name", "application/json", |req, _| {
            Ok(serde_json::json!({ "hello": req.param("name") }))
        })
        .get("/file/*", |req, _| Ok(format!("access file: {}", req.splat().unwrap_or(""))))
        .get("/private/data", |_, _| Ok("secret"))
        .after_all(|_, res| {
            res.headers_mut()
                .insert(http::header::SERVER, HeaderValue::from_static("spur"));
            Ok(())
        });
    registry.register_route(
        spur::Method::GET,
        "/page/:name",
        spur::AcceptType::Any,
        template_route(Inline, |req, _| {
            Ok(ModelAndView::new("page").with("name", req.param("name").unwrap_or("")))
        }),
    );

    let service = Dispatcher::new(registry).into_service();
    let make = make_service_fn(move |_| {
        let service = service.clone();
        async move { Ok::<_, Never>(service) }
    });

    let addr = ([127, 0, 0, 1], 3000).into();
    let server = hyper::Server::bind(&addr).serve(make);

    println!("Server is listening on: http://{}", addr);
    println!("hello: http://{}/hello/world", addr);
    println!("file: http://{}/file/path/to/public/file", addr);
    println!("page: http://{}/page/world", addr);
    println!("401: http://{}/private/data", addr);
    println!("404: http://{}/other/path", addr);
    println!();

    if let Err(e) = server.await {
        eprintln!("server error: {}", e);
    }
}
