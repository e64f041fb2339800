//! Segment trie used to resolve request paths for a single HTTP method.
//!
//! Every node owns one path segment. Literal children are keyed by their
//! text; a parent has at most one wildcard child (`:name` or `*name`).
//! Only nodes where a route terminates carry a `pattern`.
//!
//! Lookup backtracks: at every depth the literal child is tried first, then
//! the named parameter, then the catch-all, and the first subtree that
//! yields a terminal node wins.

use super::segment::{parse_pattern, SegmentKind};
use crate::error::{Error, Result};

/// A node of a method tree
#[derive(Debug)]
pub struct Node {
    part: String,
    kind: SegmentKind,
    children: Vec<Node>,
    pattern: Option<String>,
    full_path: String,
}

impl Default for Node {
    fn default() -> Self {
        Self::root()
    }
}

impl Node {
    /// Create the synthetic root of a method tree
    pub fn root() -> Self {
        Self {
            part: String::new(),
            kind: SegmentKind::Static,
            children: Vec::new(),
            pattern: None,
            full_path: "/".to_string(),
        }
    }

    fn child_of(parent_path: &str, part: &str) -> Self {
        let full_path = if parent_path.ends_with('/') {
            format!("{}{}", parent_path, part)
        } else {
            format!("{}/{}", parent_path, part)
        };
        Self {
            part: part.to_string(),
            kind: SegmentKind::of(part),
            children: Vec::new(),
            pattern: None,
            full_path,
        }
    }

    pub fn part(&self) -> &str {
        &self.part
    }

    pub fn kind(&self) -> SegmentKind {
        self.kind
    }

    pub fn is_wildcard(&self) -> bool {
        self.kind.is_wildcard()
    }

    /// The registered route path, set only on terminal nodes
    pub fn pattern(&self) -> Option<&str> {
        self.pattern.as_deref()
    }

    /// Segment path from the tree root to this node
    pub fn full_path(&self) -> &str {
        &self.full_path
    }

    pub fn children(&self) -> &[Node] {
        &self.children
    }

    /// Register `pattern` below this node.
    ///
    /// Returns the previously stored pattern when the route replaces an
    /// existing one at the same terminal node.
    pub fn add_route(&mut self, pattern: &str) -> Result<Option<String>> {
        let parts = parse_pattern(pattern);
        self.insert(pattern, &parts, 0)
    }

    fn insert(&mut self, pattern: &str, parts: &[&str], height: usize) -> Result<Option<String>> {
        if parts.len() == height {
            return Ok(self.pattern.replace(pattern.to_string()));
        }

        let part = parts[height];
        // Conflicts can only surface on nodes that already exist, so a
        // failed insert never leaves freshly created nodes behind.
        let index = match self.match_insert(part, pattern)? {
            Some(index) => index,
            None => {
                let child = Node::child_of(&self.full_path, part);
                self.children.push(child);
                self.children.len() - 1
            }
        };

        self.children[index].insert(pattern, parts, height + 1)
    }

    /// Find the child an inserted segment continues into
    fn match_insert(&self, part: &str, pattern: &str) -> Result<Option<usize>> {
        if !SegmentKind::of(part).is_wildcard() {
            return Ok(self
                .children
                .iter()
                .position(|child| !child.is_wildcard() && child.part == part));
        }

        match self.children.iter().position(|child| child.is_wildcard()) {
            Some(index) if self.children[index].part == part => Ok(Some(index)),
            Some(index) => Err(Error::ConflictingWildcard {
                path: pattern.to_string(),
                existing: self.children[index].part.clone(),
                conflicting: part.to_string(),
            }),
            None => Ok(None),
        }
    }

    /// Children a request segment may continue into, in priority order
    fn match_search<'a>(&'a self, part: &str) -> impl Iterator<Item = &'a Node> + 'a {
        let literal = self
            .children
            .iter()
            .find(|child| child.kind == SegmentKind::Static && child.part == part);
        let param = self
            .children
            .iter()
            .find(|child| child.kind == SegmentKind::Param);
        let catch_all = self
            .children
            .iter()
            .find(|child| child.kind == SegmentKind::CatchAll);

        literal.into_iter().chain(param).chain(catch_all)
    }

    /// Find the terminal node matching `parts` from `height` on
    pub fn search(&self, parts: &[&str], height: usize) -> Option<&Node> {
        if parts.len() == height || self.kind == SegmentKind::CatchAll {
            return self.pattern.is_some().then_some(self);
        }

        let part = parts[height];
        self.match_search(part)
            .find_map(|child| child.search(parts, height + 1))
    }

    /// Collect every registered pattern below this node, depth first
    pub fn patterns(&self) -> Vec<&str> {
        let mut out = Vec::new();
        self.collect_patterns(&mut out);
        out
    }

    fn collect_patterns<'a>(&'a self, out: &mut Vec<&'a str>) {
        if let Some(pattern) = self.pattern.as_deref() {
            out.push(pattern);
        }
        for child in &self.children {
            child.collect_patterns(out);
        }
    }
}
