use crate::accept::AcceptType;
use crate::dispatch::{Interrupt, IntoBody, Request, Response};
use crate::registry::{Phase, Registry};

use http::Method;

macro_rules! define_method {
    ($name:ident, $with_accept:ident, $method:ident) => {
        pub fn $name<F, B>(&self, path: &str, f: F) -> &Self
        where
            F: Fn(&Request, &mut Response) -> Result<B, Interrupt> + Send + Sync + 'static,
            B: IntoBody,
        {
            self.register_route(Method::$method, path, AcceptType::Any, f)
        }

        pub fn $with_accept<F, B>(&self, path: &str, accept_type: &str, f: F) -> &Self
        where
            F: Fn(&Request, &mut Response) -> Result<B, Interrupt> + Send + Sync + 'static,
            B: IntoBody,
        {
            self.register_route(Method::$method, path, accept_type, f)
        }
    };
}

macro_rules! define_phase {
    ($all:ident, $name:ident, $with_accept:ident, $phase:ident) => {
        pub fn $all<F>(&self, f: F) -> &Self
        where
            F: Fn(&Request, &mut Response) -> Result<(), Interrupt> + Send + Sync + 'static,
        {
            self.register_filter(Phase::$phase, None, AcceptType::Any, f)
        }

        pub fn $name<F>(&self, path: &str, f: F) -> &Self
        where
            F: Fn(&Request, &mut Response) -> Result<(), Interrupt> + Send + Sync + 'static,
        {
            self.register_filter(Phase::$phase, Some(path), AcceptType::Any, f)
        }

        pub fn $with_accept<F>(&self, path: &str, accept_type: &str, f: F) -> &Self
        where
            F: Fn(&Request, &mut Response) -> Result<(), Interrupt> + Send + Sync + 'static,
        {
            self.register_filter(Phase::$phase, Some(path), accept_type, f)
        }
    };
}

impl Registry {
    define_method!(get, get_with_accept, GET);
    define_method!(post, post_with_accept, POST);
    define_method!(put, put_with_accept, PUT);
    define_method!(patch, patch_with_accept, PATCH);
    define_method!(delete, delete_with_accept, DELETE);
    define_method!(head, head_with_accept, HEAD);
    define_method!(trace, trace_with_accept, TRACE);
    define_method!(connect, connect_with_accept, CONNECT);
    define_method!(options, options_with_accept, OPTIONS);

    define_phase!(before_all, before, before_with_accept, Before);
    define_phase!(after_all, after, after_with_accept, After);
}

/// Registers routes and filters in table form.
///
/// ```
/// use spur::{routes, Registry};
///
/// let registry = Registry::new();
/// routes! { registry;
///     before "/admin/*" => |_, _| Ok(()),
///     GET "/hello/:name" => |req, _| Ok(format!("hello, {}!", req.param("name").unwrap_or(""))),
///     POST "/upload" => |_, _| Ok(()),
///     after * => |_, _| Ok(())
/// }
/// ```
#[macro_export]
macro_rules! routes {
    {@entry $r:expr, before, *, $h:expr} => { $r.before_all($h) };
    {@entry $r:expr, after, *, $h:expr} => { $r.after_all($h) };
    {@entry $r:expr, before, $p:expr, $h:expr} => { $r.before($p, $h) };
    {@entry $r:expr, after, $p:expr, $h:expr} => { $r.after($p, $h) };
    {@entry $r:expr, GET, $p:expr, $h:expr} => { $r.get($p, $h) };
    {@entry $r:expr, POST, $p:expr, $h:expr} => { $r.post($p, $h) };
    {@entry $r:expr, PUT, $p:expr, $h:expr} => { $r.put($p, $h) };
    {@entry $r:expr, PATCH, $p:expr, $h:expr} => { $r.patch($p, $h) };
    {@entry $r:expr, DELETE, $p:expr, $h:expr} => { $r.delete($p, $h) };
    {@entry $r:expr, HEAD, $p:expr, $h:expr} => { $r.head($p, $h) };
    {@entry $r:expr, TRACE, $p:expr, $h:expr} => { $r.trace($p, $h) };
    {@entry $r:expr, CONNECT, $p:expr, $h:expr} => { $r.connect($p, $h) };
    {@entry $r:expr, OPTIONS, $p:expr, $h:expr} => { $r.options($p, $h) };

    {$registry:expr; $($target:ident $pattern:tt => $handler:expr),+ $(,)?} => {{
        let __registry: &$crate::Registry = &$registry;
        $($crate::routes!(@entry __registry, $target, $pattern, $handler);)+
    }};
}

#[cfg(test)]
mod tests {
    use crate::registry::{Registry, Target};

    use http::Method;

    #[test]
    fn wrappers_register() {
        let registry = Registry::new();
        registry
            .get("/a", |_, _| Ok("a"))
            .post_with_accept("/a", "application/json", |_, _| Ok(()))
            .options("/a", |_, _| Ok(()))
            .before_all(|_, _| Ok(()))
            .after("/a", |_, _| Ok(()));

        let routes = registry.snapshot();
        assert_eq!(routes.candidates_for(&Target::Method(Method::GET)).len(), 1);
        let post = &routes.candidates_for(&Target::Method(Method::POST))[0];
        assert_eq!(post.accept_type().as_str(), "application/json");
        assert_eq!(routes.len(), 5);
    }

    #[test]
    fn macro_registers_in_order() {
        let registry = Registry::new();
        routes! { registry;
            GET "/x" => |_, _| Ok("x"),
            GET "/:y" => |_, _| Ok("y"),
            before * => |_, _| Ok(()),
            after "/x" => |_, _| Ok(()),
        }

        let routes = registry.snapshot();
        let get: Vec<_> = routes
            .candidates_for(&Target::Method(Method::GET))
            .iter()
            .map(|e| e.pattern().template().to_owned())
            .collect();
        assert_eq!(get, ["/x", "/:y"]);
        assert_eq!(routes.len(), 4);
    }
}
