//! Built-in middleware
//!
//! Middleware are ordinary handlers that call [`Context::next`] to run the
//! rest of the chain, so they can act both before and after it:
//!
//! ```rust,ignore
//! use geo::prelude::*;
//!
//! let mut builder = Router::builder();
//! builder.use_middleware(handlers![middleware::recovery, middleware::logger]);
//! ```

use crate::context::Context;
use crate::error::Result;
use crate::http::Response;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::time::Instant;

/// Log method, path, status and elapsed time of every request
pub fn logger(ctx: &mut Context<'_>) -> Result<()> {
    let start = Instant::now();
    let result = ctx.next();

    if log::log_enabled!(log::Level::Info) {
        log::info!(
            "{} {} - {} ({:.2}ms)",
            ctx.method(),
            ctx.path(),
            ctx.response().status.as_u16(),
            start.elapsed().as_secs_f64() * 1000.0
        );
    }
    result
}

/// Turn a panicking handler into a 500 response
pub fn recovery(ctx: &mut Context<'_>) -> Result<()> {
    match catch_unwind(AssertUnwindSafe(|| ctx.next())) {
        Ok(result) => result,
        Err(panic) => {
            let message = panic
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| panic.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "unknown panic".to_string());
            log::error!(
                "Handler panicked on {} {}: {}",
                ctx.method(),
                ctx.path(),
                message
            );
            ctx.set_response(Response::internal_error());
            Ok(())
        }
    }
}
