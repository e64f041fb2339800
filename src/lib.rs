//! geo - a small gin-style HTTP router
//!
//! geo provides:
//! - A per-method segment trie with `:name` parameters and `*name` catch-alls
//! - Route groups that scope middleware to a URL prefix
//! - A synchronous handler chain advanced explicitly with `ctx.next()`
//! - An optional hyper-backed server
//!
//! ```rust,ignore
//! use geo::prelude::*;
//!
//! let mut builder = Router::builder();
//! builder.use_middleware(handlers![middleware::logger]);
//! builder.get("/hello/:name", |ctx| {
//!     let body = format!("hello {}\n", ctx.param("name").unwrap_or("stranger"));
//!     ctx.string(StatusCode::OK, body);
//!     Ok(())
//! })?;
//!
//! let router = builder.build();
//! let response = router.handle_request(Request::new("GET", "/hello/world"));
//! ```

// Enforce error handling best practices
#![cfg_attr(
    not(test),
    warn(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::panic,
        clippy::unimplemented,
        clippy::todo,
    )
)]
// Allow in tests
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used,))]

pub mod config;
pub mod context;
pub mod error;
pub mod http;
pub mod middleware;
pub mod routing;

pub use config::AppConfig;
pub use context::Context;
pub use error::{Error, Result};
pub use http::{Request, Response, Server};
pub use routing::{handler, HandlerFunc, RouteGroup, Router, RouterBuilder};

// Re-export commonly used external types
pub use hyper::StatusCode;

/// Prelude module for common imports
pub mod prelude {
    pub use crate::middleware;
    pub use crate::routing::{handler, HandlerFunc, RouteGroup, Router, RouterBuilder};
    pub use crate::{handlers, AppConfig, Context, Error, Request, Response, Result, Server};
    pub use hyper::StatusCode;
    pub use serde_json::json;
}
