//! Variation reference graph
//!
//! A variation option may point at another menu item, so items form a
//! directed graph (item -> items it offers as options). Cycles are refused
//! at write time, including an item listing itself and A <-> B pairs.

use shared::models::MenuItem;
use std::collections::{BTreeMap, BTreeSet};

#[derive(Debug, Clone, Default)]
pub struct VariationGraph {
    edges: BTreeMap<i64, BTreeSet<i64>>,
}

impl VariationGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_items<'a>(items: impl IntoIterator<Item = &'a MenuItem>) -> Self {
        let mut graph = Self::new();
        for item in items {
            graph.upsert(item);
        }
        graph
    }

    /// Replace the outgoing edges of `item`
    pub fn upsert(&mut self, item: &MenuItem) {
        let targets: BTreeSet<i64> = item.referenced_items().collect();
        if targets.is_empty() {
            self.edges.remove(&item.id);
        } else {
            self.edges.insert(item.id, targets);
        }
    }

    pub fn references(&self, item_id: i64) -> impl Iterator<Item = i64> + '_ {
        self.edges.get(&item_id).into_iter().flatten().copied()
    }

    /// A path `[start, .., start]` if `start` can reach itself
    pub fn find_cycle_from(&self, start: i64) -> Option<Vec<i64>> {
        let mut path = vec![start];
        let mut visited = BTreeSet::new();
        if self.walk(start, start, &mut path, &mut visited) {
            Some(path)
        } else {
            None
        }
    }

    fn walk(&self, start: i64, node: i64, path: &mut Vec<i64>, visited: &mut BTreeSet<i64>) -> bool {
        for next in self.references(node) {
            if next == start {
                path.push(next);
                return true;
            }
            if !visited.insert(next) {
                continue;
            }
            path.push(next);
            if self.walk(start, next, path, visited) {
                return true;
            }
            path.pop();
        }
        false
    }
}
