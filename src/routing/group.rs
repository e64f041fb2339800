//! Route groups: URL-prefix scopes carrying middleware.
//!
//! Groups form their own hierarchy, separate from the method tries. A group
//! snapshots its parent's middleware when created and appends its own; at
//! dispatch time every group whose scope covers the request path takes part
//! in building the handler chain.

use super::router::RouterBuilder;
use super::HandlerFunc;
use crate::context::Context;
use crate::error::Result;

/// A prefix scope owned by the router
#[derive(Clone)]
pub struct GroupScope {
    base_path: String,
    scope: Vec<String>,
    middleware: Vec<HandlerFunc>,
    /// Number of leading middleware copied from the parent
    inherited: usize,
    parent: Option<usize>,
    is_root: bool,
}

impl GroupScope {
    pub(crate) fn root() -> Self {
        Self {
            base_path: "/".to_string(),
            scope: Vec::new(),
            middleware: Vec::new(),
            inherited: 0,
            parent: None,
            is_root: true,
        }
    }

    pub(crate) fn child(
        parent_index: usize,
        parent: &GroupScope,
        relative_path: &str,
        middleware: Vec<HandlerFunc>,
    ) -> Self {
        let base_path = join_paths(&parent.base_path, relative_path);
        let inherited = parent.middleware.len();
        let mut merged = Vec::with_capacity(inherited + middleware.len());
        merged.extend(parent.middleware.iter().cloned());
        merged.extend(middleware);

        Self {
            scope: split_segments(&base_path),
            base_path,
            middleware: merged,
            inherited,
            parent: Some(parent_index),
            is_root: false,
        }
    }

    /// Absolute prefix of this group
    pub fn base_path(&self) -> &str {
        &self.base_path
    }

    /// Inherited middleware followed by the group's own
    pub fn middleware(&self) -> &[HandlerFunc] {
        &self.middleware
    }

    /// Middleware added by this group itself
    pub fn local_middleware(&self) -> &[HandlerFunc] {
        &self.middleware[self.inherited..]
    }

    pub fn parent(&self) -> Option<usize> {
        self.parent
    }

    pub fn is_root(&self) -> bool {
        self.is_root
    }

    pub(crate) fn push_middleware(&mut self, middleware: Vec<HandlerFunc>) {
        self.middleware.extend(middleware);
    }

    /// Whether this group's scope contains a request path.
    ///
    /// Containment is decided segment by segment: `/api` covers `/api` and
    /// `/api/users` but not `/apibase`.
    pub fn covers(&self, path_segments: &[&str]) -> bool {
        self.scope.len() <= path_segments.len()
            && self
                .scope
                .iter()
                .zip(path_segments)
                .all(|(scope, segment)| scope == segment)
    }
}

impl std::fmt::Debug for GroupScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GroupScope")
            .field("base_path", &self.base_path)
            .field("middleware", &self.middleware.len())
            .field("inherited", &self.inherited)
            .field("is_root", &self.is_root)
            .finish()
    }
}

pub(crate) fn split_segments(path: &str) -> Vec<String> {
    path.split('/')
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Join a group base path and a relative route path.
///
/// The result is cleaned like a slash-separated file path. A trailing slash
/// on `relative_path` survives the join.
pub fn join_paths(base_path: &str, relative_path: &str) -> String {
    if relative_path.is_empty() {
        return base_path.to_string();
    }

    let final_path = clean_path(&format!("{}/{}", base_path, relative_path));
    if relative_path.ends_with('/') && !final_path.ends_with('/') {
        final_path + "/"
    } else {
        final_path
    }
}

/// Lexically normalize a slash-separated path: collapse repeated slashes,
/// drop `.` segments, resolve `..` and strip any trailing slash.
pub fn clean_path(path: &str) -> String {
    let rooted = path.starts_with('/');
    let mut stack: Vec<&str> = Vec::new();

    for part in path.split('/') {
        match part {
            "" | "." => {}
            ".." => {
                if stack.last().is_some_and(|last| *last != "..") {
                    stack.pop();
                } else if !rooted {
                    stack.push("..");
                }
            }
            _ => stack.push(part),
        }
    }

    let body = stack.join("/");
    if rooted {
        format!("/{}", body)
    } else if body.is_empty() {
        ".".to_string()
    } else {
        body
    }
}

/// Handle to a non-root group, used to register routes below its prefix
pub struct RouteGroup<'b> {
    builder: &'b mut RouterBuilder,
    index: usize,
}

impl<'b> RouteGroup<'b> {
    pub(crate) fn new(builder: &'b mut RouterBuilder, index: usize) -> Self {
        Self { builder, index }
    }

    fn scope(&self) -> &GroupScope {
        self.builder.group_scope(self.index)
    }

    pub fn base_path(&self) -> &str {
        self.scope().base_path()
    }

    pub fn middleware(&self) -> &[HandlerFunc] {
        self.scope().middleware()
    }

    /// Create a nested group below this one
    pub fn group(&mut self, relative_path: &str, middleware: Vec<HandlerFunc>) -> RouteGroup<'_> {
        let index = self.builder.create_group(self.index, relative_path, middleware);
        RouteGroup::new(&mut *self.builder, index)
    }

    /// Append middleware to this group
    pub fn use_middleware(&mut self, middleware: Vec<HandlerFunc>) -> &mut Self {
        self.builder.append_middleware(self.index, middleware);
        self
    }

    pub fn handle<F>(&mut self, method: &str, relative_path: &str, handler: F) -> Result<&mut Self>
    where
        F: Fn(&mut Context<'_>) -> Result<()> + Send + Sync + 'static,
    {
        self.builder
            .register(self.index, method, relative_path, handler)?;
        Ok(self)
    }

    pub fn get<F>(&mut self, relative_path: &str, handler: F) -> Result<&mut Self>
    where
        F: Fn(&mut Context<'_>) -> Result<()> + Send + Sync + 'static,
    {
        self.handle("GET", relative_path, handler)
    }

    pub fn post<F>(&mut self, relative_path: &str, handler: F) -> Result<&mut Self>
    where
        F: Fn(&mut Context<'_>) -> Result<()> + Send + Sync + 'static,
    {
        self.handle("POST", relative_path, handler)
    }

    pub fn put<F>(&mut self, relative_path: &str, handler: F) -> Result<&mut Self>
    where
        F: Fn(&mut Context<'_>) -> Result<()> + Send + Sync + 'static,
    {
        self.handle("PUT", relative_path, handler)
    }

    pub fn delete<F>(&mut self, relative_path: &str, handler: F) -> Result<&mut Self>
    where
        F: Fn(&mut Context<'_>) -> Result<()> + Send + Sync + 'static,
    {
        self.handle("DELETE", relative_path, handler)
    }

    pub fn patch<F>(&mut self, relative_path: &str, handler: F) -> Result<&mut Self>
    where
        F: Fn(&mut Context<'_>) -> Result<()> + Send + Sync + 'static,
    {
        self.handle("PATCH", relative_path, handler)
    }

    pub fn head<F>(&mut self, relative_path: &str, handler: F) -> Result<&mut Self>
    where
        F: Fn(&mut Context<'_>) -> Result<()> + Send + Sync + 'static,
    {
        self.handle("HEAD", relative_path, handler)
    }

    pub fn options<F>(&mut self, relative_path: &str, handler: F) -> Result<&mut Self>
    where
        F: Fn(&mut Context<'_>) -> Result<()> + Send + Sync + 'static,
    {
        self.handle("OPTIONS", relative_path, handler)
    }
}
