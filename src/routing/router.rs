//! Route registration and request dispatch.
//!
//! Routes are collected on a [`RouterBuilder`] and frozen into an immutable
//! [`Router`] by [`RouterBuilder::build`]. The router is `Send + Sync` and is
//! shared by reference between concurrently served requests.

use super::group::{join_paths, GroupScope, RouteGroup};
use super::tree::{MethodTrees, RouteMatch};
use super::{handler, HandlerFunc, RouteInfo};
use crate::context::Context;
use crate::error::Result;
use crate::http::{Request, Response};
use hyper::StatusCode;
use std::collections::HashMap;

fn handler_key(method: &str, pattern: &str) -> String {
    format!("{}-{}", method, pattern)
}

/// Fallback appended to the chain when no route matches
fn not_found(ctx: &mut Context<'_>) -> Result<()> {
    let body = format!("404 NOT FOUND: {}\n", ctx.path());
    ctx.string(StatusCode::NOT_FOUND, body);
    Ok(())
}

/// Collects routes, groups and middleware before serving
pub struct RouterBuilder {
    groups: Vec<GroupScope>,
    trees: MethodTrees,
    handlers: HashMap<String, HandlerFunc>,
}

impl Default for RouterBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl RouterBuilder {
    /// Create a builder holding only the root group at `/`
    pub fn new() -> Self {
        Self {
            groups: vec![GroupScope::root()],
            trees: MethodTrees::new(),
            handlers: HashMap::new(),
        }
    }

    pub(crate) fn group_scope(&self, index: usize) -> &GroupScope {
        &self.groups[index]
    }

    pub(crate) fn create_group(
        &mut self,
        parent: usize,
        relative_path: &str,
        middleware: Vec<HandlerFunc>,
    ) -> usize {
        let group = GroupScope::child(parent, &self.groups[parent], relative_path, middleware);
        log::debug!(
            "Created route group {} ({} middleware)",
            group.base_path(),
            group.middleware().len()
        );
        self.groups.push(group);
        self.groups.len() - 1
    }

    pub(crate) fn append_middleware(&mut self, index: usize, middleware: Vec<HandlerFunc>) {
        self.groups[index].push_middleware(middleware);
    }

    pub(crate) fn register<F>(
        &mut self,
        group: usize,
        method: &str,
        relative_path: &str,
        handler: F,
    ) -> Result<()>
    where
        F: Fn(&mut Context<'_>) -> Result<()> + Send + Sync + 'static,
    {
        let absolute_path = join_paths(self.groups[group].base_path(), relative_path);
        self.add_route(method, &absolute_path, super::handler(handler))
    }

    fn add_route(&mut self, method: &str, absolute_path: &str, handler: HandlerFunc) -> Result<()> {
        let root = self.trees.get_or_create(method);
        if let Some(previous) = root.add_route(absolute_path)? {
            log::warn!(
                "Route {} {} replaces previously registered {} {}",
                method,
                absolute_path,
                method,
                previous
            );
        }
        self.handlers
            .insert(handler_key(method, absolute_path), handler);
        log::debug!("Registered route {} {}", method, absolute_path);
        Ok(())
    }

    /// Create a group below the root
    pub fn group(&mut self, relative_path: &str, middleware: Vec<HandlerFunc>) -> RouteGroup<'_> {
        let index = self.create_group(0, relative_path, middleware);
        RouteGroup::new(self, index)
    }

    /// Append middleware to the root group, applied to every request
    pub fn use_middleware(&mut self, middleware: Vec<HandlerFunc>) -> &mut Self {
        self.append_middleware(0, middleware);
        self
    }

    pub fn handle<F>(&mut self, method: &str, path: &str, handler: F) -> Result<&mut Self>
    where
        F: Fn(&mut Context<'_>) -> Result<()> + Send + Sync + 'static,
    {
        self.register(0, method, path, handler)?;
        Ok(self)
    }

    pub fn get<F>(&mut self, path: &str, handler: F) -> Result<&mut Self>
    where
        F: Fn(&mut Context<'_>) -> Result<()> + Send + Sync + 'static,
    {
        self.handle("GET", path, handler)
    }

    pub fn post<F>(&mut self, path: &str, handler: F) -> Result<&mut Self>
    where
        F: Fn(&mut Context<'_>) -> Result<()> + Send + Sync + 'static,
    {
        self.handle("POST", path, handler)
    }

    pub fn put<F>(&mut self, path: &str, handler: F) -> Result<&mut Self>
    where
        F: Fn(&mut Context<'_>) -> Result<()> + Send + Sync + 'static,
    {
        self.handle("PUT", path, handler)
    }

    pub fn delete<F>(&mut self, path: &str, handler: F) -> Result<&mut Self>
    where
        F: Fn(&mut Context<'_>) -> Result<()> + Send + Sync + 'static,
    {
        self.handle("DELETE", path, handler)
    }

    pub fn patch<F>(&mut self, path: &str, handler: F) -> Result<&mut Self>
    where
        F: Fn(&mut Context<'_>) -> Result<()> + Send + Sync + 'static,
    {
        self.handle("PATCH", path, handler)
    }

    pub fn head<F>(&mut self, path: &str, handler: F) -> Result<&mut Self>
    where
        F: Fn(&mut Context<'_>) -> Result<()> + Send + Sync + 'static,
    {
        self.handle("HEAD", path, handler)
    }

    pub fn options<F>(&mut self, path: &str, handler: F) -> Result<&mut Self>
    where
        F: Fn(&mut Context<'_>) -> Result<()> + Send + Sync + 'static,
    {
        self.handle("OPTIONS", path, handler)
    }

    /// Freeze the configuration into a router ready to serve requests
    pub fn build(self) -> Router {
        log::info!(
            "Router built with {} route(s) across {} method tree(s) and {} group(s)",
            self.handlers.len(),
            self.trees.len(),
            self.groups.len()
        );
        Router {
            groups: self.groups,
            trees: self.trees,
            handlers: self.handlers,
            not_found: handler(not_found),
        }
    }
}

/// Immutable routing table and dispatcher
pub struct Router {
    groups: Vec<GroupScope>,
    trees: MethodTrees,
    handlers: HashMap<String, HandlerFunc>,
    not_found: HandlerFunc,
}

impl std::fmt::Debug for Router {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Router")
            .field("groups", &self.groups)
            .field("trees", &self.trees)
            .field("handlers", &self.handlers.len())
            .finish()
    }
}

impl Router {
    pub fn builder() -> RouterBuilder {
        RouterBuilder::new()
    }

    /// All groups in creation order, the root group first
    pub fn groups(&self) -> &[GroupScope] {
        &self.groups
    }

    /// Every registered route, grouped by method in registration order
    pub fn routes(&self) -> Vec<RouteInfo> {
        self.trees
            .iter()
            .flat_map(|tree| {
                tree.root
                    .patterns()
                    .into_iter()
                    .map(move |pattern| RouteInfo::new(&tree.method, pattern))
            })
            .collect()
    }

    /// Resolve a method and path to a terminal node and its parameters
    pub fn get_route(&self, method: &str, path: &str) -> Option<RouteMatch<'_>> {
        self.trees.get_route(method, path)
    }

    /// Middleware of every group covering `path`, in group creation order.
    ///
    /// A group whose parent also covers the path contributes only the
    /// middleware it added itself; its inherited prefix already ran as part
    /// of an ancestor.
    pub fn middleware_for(&self, path: &str) -> Vec<HandlerFunc> {
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        let covering: Vec<bool> = self
            .groups
            .iter()
            .map(|group| group.covers(&segments))
            .collect();

        let mut middleware = Vec::new();
        for (group, _) in self
            .groups
            .iter()
            .zip(&covering)
            .filter(|(_, covers)| **covers)
        {
            let parent_covers = group.parent().is_some_and(|parent| covering[parent]);
            if parent_covers {
                middleware.extend(group.local_middleware().iter().cloned());
            } else {
                middleware.extend(group.middleware().iter().cloned());
            }
        }
        middleware
    }

    /// Dispatch `request` through its handler chain, writing into `response`
    pub fn serve(&self, request: Request, response: &mut Response) {
        let mut chain = self.middleware_for(request.path());
        let mut ctx = Context::new(request, self);

        match self.trees.get_route(ctx.method(), ctx.path()) {
            Some(matched) => {
                let key = handler_key(ctx.method(), matched.pattern());
                let route_handler = self
                    .handlers
                    .get(&key)
                    .cloned()
                    .unwrap_or_else(|| self.not_found.clone());
                ctx.set_params(matched.params);
                chain.push(route_handler);
            }
            None => {
                log::debug!("No route for {} {}", ctx.method(), ctx.path());
                chain.push(self.not_found.clone());
            }
        }

        ctx.set_handlers(chain);
        if let Err(e) = ctx.next() {
            log::error!(
                "Request handling error for {} {}: {}",
                ctx.method(),
                ctx.path(),
                e
            );
            ctx.set_response(Response::internal_error());
        }

        *response = ctx.into_response();
    }

    /// Dispatch `request` and return the written response
    pub fn handle_request(&self, request: Request) -> Response {
        let mut response = Response::ok();
        self.serve(request, &mut response);
        response
    }
}
