use crate::error::Result;
use crate::http::{Request, Response};
use crate::routing::{HandlerFunc, Router};
use hyper::StatusCode;
use serde::Serialize;
use std::any::Any;
use std::collections::HashMap;

/// Per-request dispatch state
///
/// A context carries the request, the response being written, the path
/// parameters bound by the router and the handler chain with its cursor.
/// Handlers run one after another only as long as each of them calls
/// [`Context::next`]; returning without calling it ends the chain.
pub struct Context<'r> {
    pub req: Request,
    pub res: Response,
    params: HashMap<String, String>,
    handlers: Vec<HandlerFunc>,
    index: usize,
    router: &'r Router,
    /// Storage for middleware data
    data: HashMap<String, Box<dyn Any + Send + Sync>>,
}

impl<'r> Context<'r> {
    pub fn new(request: Request, router: &'r Router) -> Self {
        Self {
            req: request,
            res: Response::ok(),
            params: HashMap::new(),
            handlers: Vec::new(),
            index: 0,
            router,
            data: HashMap::new(),
        }
    }

    pub fn method(&self) -> &str {
        &self.req.method
    }

    pub fn path(&self) -> &str {
        self.req.path()
    }

    /// The router dispatching this request
    pub fn router(&self) -> &'r Router {
        self.router
    }

    // Chain control

    pub(crate) fn set_handlers(&mut self, handlers: Vec<HandlerFunc>) {
        self.handlers = handlers;
        self.index = 0;
    }

    /// Run the next handler of the chain.
    ///
    /// Code after `ctx.next()` in a middleware runs once every later
    /// handler has returned. Errors stop the chain and propagate back
    /// through the middleware that called `next`.
    pub fn next(&mut self) -> Result<()> {
        if let Some(handler) = self.handlers.get(self.index).cloned() {
            self.index += 1;
            handler(self)?;
        }
        Ok(())
    }

    /// Number of handlers in the chain, middleware included
    pub fn chain_len(&self) -> usize {
        self.handlers.len()
    }

    /// Whether every handler of the chain has been entered
    pub fn is_chain_complete(&self) -> bool {
        self.index >= self.handlers.len()
    }

    // Path parameters

    pub(crate) fn set_params(&mut self, params: HashMap<String, String>) {
        self.params = params;
    }

    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }

    pub fn params(&self) -> &HashMap<String, String> {
        &self.params
    }

    pub fn query(&self, key: &str) -> Option<&str> {
        self.req.query.get(key).map(String::as_str)
    }

    // Middleware data storage methods

    /// Store data for middleware communication
    pub fn set<T: Any + Send + Sync + 'static>(&mut self, key: &str, value: T) {
        self.data.insert(key.to_string(), Box::new(value));
    }

    /// Retrieve data stored by middleware
    pub fn get<T: Any + Send + Sync + 'static>(&self, key: &str) -> Option<&T> {
        self.data
            .get(key)
            .and_then(|boxed| boxed.downcast_ref::<T>())
    }

    // Response writing

    pub fn response(&self) -> &Response {
        &self.res
    }

    pub fn set_response(&mut self, response: Response) {
        self.res = response;
    }

    pub(crate) fn into_response(self) -> Response {
        self.res
    }

    pub fn status(&mut self, status: StatusCode) {
        self.res.status = status;
    }

    pub fn set_header(&mut self, name: &str, value: &str) {
        self.res.set_header(name, value);
    }

    /// Write a plain-text body
    pub fn string(&mut self, status: StatusCode, body: impl Into<String>) {
        self.write_body(status, "text/plain; charset=utf-8", body.into().into_bytes());
    }

    /// Serialize `data` as the JSON body
    pub fn json<T: Serialize>(&mut self, status: StatusCode, data: &T) -> Result<()> {
        let body = serde_json::to_vec(data)?;
        self.write_body(status, "application/json", body);
        Ok(())
    }

    pub fn html(&mut self, status: StatusCode, html: impl Into<String>) {
        self.write_body(status, "text/html; charset=utf-8", html.into().into_bytes());
    }

    /// Write raw bytes without touching the content type
    pub fn data(&mut self, status: StatusCode, data: Vec<u8>) {
        self.res.status = status;
        self.res.body = data;
    }

    fn write_body(&mut self, status: StatusCode, content_type: &str, body: Vec<u8>) {
        self.res.status = status;
        self.res.set_header("Content-Type", content_type);
        self.res.body = body;
    }
}
