//! One trie per HTTP method.

use super::segment::{parse_pattern, SegmentKind};
use super::trie::Node;
use std::collections::HashMap;

/// Root of the trie holding every route registered for `method`
#[derive(Debug)]
pub struct MethodTree {
    pub method: String,
    pub root: Node,
}

/// Result of a successful route lookup
#[derive(Debug)]
pub struct RouteMatch<'a> {
    /// The terminal node whose pattern matched
    pub node: &'a Node,
    /// Parameters bound from the request path
    pub params: HashMap<String, String>,
}

impl RouteMatch<'_> {
    /// The registered pattern that matched
    pub fn pattern(&self) -> &str {
        self.node.pattern().unwrap_or_default()
    }
}

/// Method trees in registration order
#[derive(Debug, Default)]
pub struct MethodTrees {
    trees: Vec<MethodTree>,
}

impl MethodTrees {
    pub fn new() -> Self {
        Self::default()
    }

    /// Find the root for `method`, comparing method names exactly
    pub fn get(&self, method: &str) -> Option<&Node> {
        self.trees
            .iter()
            .find(|tree| tree.method == method)
            .map(|tree| &tree.root)
    }

    /// Find the root for `method`, creating an empty tree on first use
    pub fn get_or_create(&mut self, method: &str) -> &mut Node {
        let index = match self.trees.iter().position(|tree| tree.method == method) {
            Some(index) => index,
            None => {
                log::debug!("Creating method tree for {}", method);
                self.trees.push(MethodTree {
                    method: method.to_string(),
                    root: Node::root(),
                });
                self.trees.len() - 1
            }
        };
        &mut self.trees[index].root
    }

    pub fn iter(&self) -> impl Iterator<Item = &MethodTree> {
        self.trees.iter()
    }

    pub fn len(&self) -> usize {
        self.trees.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trees.is_empty()
    }

    /// Resolve `path` in the tree of `method`
    pub fn get_route(&self, method: &str, path: &str) -> Option<RouteMatch<'_>> {
        let search_parts = parse_pattern(path);
        let root = self.get(method)?;
        let node = root.search(&search_parts, 0)?;
        let params = extract_params(node.pattern().unwrap_or_default(), &search_parts);
        Some(RouteMatch { node, params })
    }
}

/// Bind the wildcards of `pattern` to the index-aligned request segments
fn extract_params(pattern: &str, search_parts: &[&str]) -> HashMap<String, String> {
    let mut params = HashMap::new();
    for (index, part) in parse_pattern(pattern).into_iter().enumerate() {
        match SegmentKind::of(part) {
            SegmentKind::Param => {
                if let Some(value) = search_parts.get(index) {
                    params.insert(part[1..].to_string(), value.to_string());
                }
            }
            SegmentKind::CatchAll => {
                if part.len() > 1 {
                    let rest = search_parts.get(index..).unwrap_or_default();
                    params.insert(part[1..].to_string(), rest.join("/"));
                }
                break;
            }
            SegmentKind::Static => {}
        }
    }
    params
}
