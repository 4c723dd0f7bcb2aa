//! Radix-tree request router.
//!
//! One tree per HTTP method. O(path-length) lookup. A path that matches no
//! tree gets `404 Not Found`; one that matches only other methods' trees gets
//! `405 Method Not Allowed`.

use std::collections::HashMap;
use std::sync::Arc;

use matchit::Router as MatchitRouter;

use crate::handler::{BoxedHandler, Handler};
use crate::method::Method;
use crate::request::Request;
use crate::response::Response;
use crate::status::Status;

/// The application router.
///
/// Build it once at startup and pass it to [`Server::serve`](crate::Server::serve).
/// Registrations return `self` so they chain:
///
/// ```rust,no_run
/// # use contacts::{Request, Response, Router};
/// # async fn get_contact(_: Request) -> Response { Response::text("") }
/// # async fn create_contact(_: Request) -> Response { Response::text("") }
/// Router::new()
///     .get("/contacts/{id}", get_contact)
///     .post("/contacts",     create_contact);
/// ```
pub struct Router {
    routes: HashMap<Method, MatchitRouter<BoxedHandler>>,
}

impl Router {
    pub fn new() -> Self {
        Self { routes: HashMap::new() }
    }

    /// Register a handler for a method + path pair.
    ///
    /// Path parameters use `{name}` syntax; `req.param("name")` retrieves them.
    ///
    /// # Panics
    ///
    /// Panics if `path` is not a valid route or conflicts with one already
    /// registered for `method`. Routes are fixed at startup, so this is a
    /// programming error.
    pub fn on(mut self, method: Method, path: &str, handler: impl Handler) -> Self {
        self.routes
            .entry(method)
            .or_default()
            .insert(path, handler.into_boxed_handler())
            .unwrap_or_else(|e| panic!("invalid route `{method} {path}`: {e}"));
        self
    }

    pub fn get(self, path: &str, handler: impl Handler) -> Self {
        self.on(Method::Get, path, handler)
    }

    pub fn post(self, path: &str, handler: impl Handler) -> Self {
        self.on(Method::Post, path, handler)
    }

    pub fn put(self, path: &str, handler: impl Handler) -> Self {
        self.on(Method::Put, path, handler)
    }

    pub fn delete(self, path: &str, handler: impl Handler) -> Self {
        self.on(Method::Delete, path, handler)
    }

    fn lookup(
        &self,
        method: Method,
        path: &str,
    ) -> Option<(BoxedHandler, HashMap<String, String>)> {
        let tree = self.routes.get(&method)?;
        let matched = tree.at(path).ok()?;
        let handler = Arc::clone(matched.value);
        let params = matched.params.iter()
            .map(|(k, v)| (k.to_owned(), v.to_owned()))
            .collect();
        Some((handler, params))
    }

    /// Methods with a route matching `path`, sorted, for an `allow` header.
    fn allowed(&self, path: &str) -> Vec<Method> {
        let mut methods: Vec<Method> = self.routes.iter()
            .filter(|(_, tree)| tree.at(path).is_ok())
            .map(|(m, _)| *m)
            .collect();
        if methods.contains(&Method::Get) && !methods.contains(&Method::Head) {
            methods.push(Method::Head);
        }
        methods.sort_by_key(|m| m.as_str());
        methods
    }

    /// Routes one request to its handler.
    ///
    /// `HEAD` without its own route runs the `GET` handler and drops the
    /// body. A path registered only under other methods gets
    /// `405 Method Not Allowed` with an `allow` header; an unknown path gets
    /// `404 Not Found`.
    pub(crate) async fn route(&self, mut req: Request) -> Response {
        let head = req.method == Method::Head;
        let found = self.lookup(req.method, &req.path)
            .or_else(|| if head { self.lookup(Method::Get, &req.path) } else { None });

        match found {
            Some((handler, params)) => {
                req.params = params;
                let mut res = handler.call(req).await;
                if head {
                    res.body.clear();
                }
                res
            }
            None => {
                let allowed = self.allowed(&req.path);
                if allowed.is_empty() {
                    return Response::status(Status::NotFound);
                }
                let allow = allowed.iter().map(|m| m.as_str()).collect::<Vec<_>>().join(", ");
                let mut res = Response::status(Status::MethodNotAllowed);
                res.headers.push(("allow".to_owned(), allow));
                res
            }
        }
    }
}

impl Default for Router {
    fn default() -> Self { Self::new() }
}
