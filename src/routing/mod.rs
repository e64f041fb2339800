pub mod group;
pub mod router;
pub mod segment;
pub mod tree;
pub mod trie;

use crate::context::Context;
use crate::error::Result;
use std::sync::Arc;

pub use group::{GroupScope, RouteGroup};
pub use router::{Router, RouterBuilder};
pub use tree::RouteMatch;

/// A route handler or middleware. Runs synchronously against the request
/// context; middleware continues the chain by calling [`Context::next`].
pub type HandlerFunc = Arc<dyn Fn(&mut Context<'_>) -> Result<()> + Send + Sync>;

/// Wrap a closure or function as a [`HandlerFunc`]
pub fn handler<F>(f: F) -> HandlerFunc
where
    F: Fn(&mut Context<'_>) -> Result<()> + Send + Sync + 'static,
{
    Arc::new(f)
}

/// A registered route as listed by [`Router::routes`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteInfo {
    pub method: String,
    pub path: String,
}

impl RouteInfo {
    pub fn new(method: &str, path: &str) -> Self {
        Self {
            method: method.to_string(),
            path: path.to_string(),
        }
    }
}

// Utility macro for building a middleware list
#[macro_export]
macro_rules! handlers {
    ($($handler:expr),* $(,)?) => {
        vec![
            $(
                $crate::routing::handler($handler)
            ),*
        ]
    };
}
