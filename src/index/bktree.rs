//! BK-tree over vocabulary entries
//!
//! Nodes live in an arena and link to children by edit distance. Keys are
//! lower-cased, so every lookup is case-insensitive. The tree only grows
//! while it is being built; searches never write to it.

use std::collections::{BTreeMap, HashMap};

use super::distance::{canonical_key, edit_distance};
use crate::text::{normalize_level1, normalize_level2, normalize_level3};

/// Index of a node in the arena
pub type NodeId = usize;

#[derive(Debug, Clone)]
struct Node {
    /// Canonical (lower-cased) key
    key: String,
    /// Entry that created the node, in its original casing
    original: String,
    /// Children keyed by their distance to this node
    children: BTreeMap<usize, NodeId>,
}

impl Node {
    fn new(key: String, original: &str) -> Self {
        Self {
            key,
            original: original.to_string(),
            children: BTreeMap::new(),
        }
    }
}

/// A key found by a bounded search
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hit<'a> {
    /// Canonical key of the matching node
    pub key: &'a str,
    /// Vocabulary entry stored on the node
    pub original: &'a str,
    /// Edit distance between the key and the query
    pub distance: usize,
}

/// Metric tree of vocabulary keys under edit distance
#[derive(Debug, Clone, Default)]
pub struct BkTree {
    nodes: Vec<Node>,
    /// Normalized spellings that differ from their entry's key, mapped to
    /// the first entry that produced them
    originals: HashMap<String, String>,
    /// Insertions that landed on an existing key
    duplicates: usize,
}

impl BkTree {
    /// Create an empty tree
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a tree holding every entry of `vocabulary`, in order
    pub fn build<I, S>(vocabulary: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut tree = Self::new();
        for word in vocabulary {
            tree.add(word.as_ref());
        }
        tree
    }

    /// Insert `word`, returning `false` if its key was already present.
    pub fn add(&mut self, word: &str) -> bool {
        let key = canonical_key(word);
        self.record_forms(word, &key);

        if self.nodes.is_empty() {
            self.nodes.push(Node::new(key, word));
            return true;
        }

        let mut current = 0;
        loop {
            let d = edit_distance(&self.nodes[current].key, &key);
            if d == 0 {
                self.duplicates += 1;
                return false;
            }
            match self.nodes[current].children.get(&d) {
                Some(&child) => current = child,
                None => {
                    let id = self.nodes.len();
                    self.nodes.push(Node::new(key, word));
                    self.nodes[current].children.insert(d, id);
                    return true;
                }
            }
        }
    }

    /// All keys within `max_distance` of `query`.
    ///
    /// Only children whose edge distance lies in `[d - max, d + max]` can
    /// hold a match (triangle inequality), so every other subtree is skipped.
    pub fn search_with_distance(&self, query: &str, max_distance: usize) -> Vec<Hit<'_>> {
        let mut hits = Vec::new();
        if !self.nodes.is_empty() {
            let query = canonical_key(query);
            self.search_node(0, &query, max_distance, &mut hits);
        }
        hits
    }

    fn search_node<'a>(
        &'a self,
        id: NodeId,
        query: &str,
        max_distance: usize,
        hits: &mut Vec<Hit<'a>>,
    ) {
        let node = &self.nodes[id];
        let d = edit_distance(&node.key, query);
        if d <= max_distance {
            hits.push(Hit {
                key: &node.key,
                original: &node.original,
                distance: d,
            });
        }

        let low = d.saturating_sub(max_distance);
        let high = d.saturating_add(max_distance);
        for &child in node.children.range(low..=high).map(|(_, child)| child) {
            self.search_node(child, query, max_distance, hits);
        }
    }

    /// Entry a normalized spelling was derived from.
    ///
    /// Canonical keys are not recorded here; a hit carries its own entry.
    pub fn original_for(&self, form: &str) -> Option<&str> {
        self.originals.get(form).map(String::as_str)
    }

    /// Whether `word` is present, ignoring case
    pub fn contains(&self, word: &str) -> bool {
        !self.search_with_distance(word, 0).is_empty()
    }

    /// Number of distinct keys in the tree
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Insertions skipped as duplicates
    pub fn duplicates(&self) -> usize {
        self.duplicates
    }

    /// Number of nodes on the longest root-to-leaf path
    pub fn depth(&self) -> usize {
        if self.nodes.is_empty() {
            return 0;
        }
        let mut deepest = 0;
        let mut stack = vec![(0, 1)];
        while let Some((id, level)) = stack.pop() {
            deepest = deepest.max(level);
            stack.extend(self.nodes[id].children.values().map(|&child| (child, level + 1)));
        }
        deepest
    }

    /// Mean number of children over nodes that have any
    pub fn average_branching(&self) -> f64 {
        let internal: Vec<usize> = self
            .nodes
            .iter()
            .map(|n| n.children.len())
            .filter(|&c| c > 0)
            .collect();
        if internal.is_empty() {
            return 0.0;
        }
        internal.iter().sum::<usize>() as f64 / internal.len() as f64
    }

    /// Number of normalized spellings mapped back to an original entry
    pub fn normalized_form_count(&self) -> usize {
        self.originals.len()
    }

    /// Drop every node and mapping
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.originals.clear();
        self.duplicates = 0;
    }

    fn record_forms(&mut self, word: &str, key: &str) {
        let forms = [
            normalize_level1(word).to_lowercase(),
            normalize_level2(word).to_lowercase(),
            normalize_level3(word),
        ];
        for form in forms {
            if !form.is_empty() && form != key {
                self.originals.entry(form).or_insert_with(|| word.to_string());
            }
        }
    }
}
