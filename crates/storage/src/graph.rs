// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Bidirectional dependency graph over a relation store
//!
//! Forward edges live under `parent:<url>`, the inverted relation under
//! `child:<url>`. Both indexes are kept in step: for every forward edge
//! `(p, c)` there is a matching inverse entry and vice versa.

use crate::store::{RelationStore, StoreError};
use parking_lot::Mutex;
use skiff_core::RepoPath;
use std::collections::{HashSet, VecDeque};
use std::sync::Arc;
use tracing::warn;

fn parent_key(url: &str) -> String {
    format!("parent:{url}")
}

fn child_key(url: &str) -> String {
    format!("child:{url}")
}

/// The persisted parent→children / child→roots relation.
pub struct DependencyGraph {
    store: Arc<dyn RelationStore>,
    /// Serializes writers; readers go straight to the store.
    write: Mutex<()>,
}

impl DependencyGraph {
    pub fn new(store: Arc<dyn RelationStore>) -> Self {
        Self {
            store,
            write: Mutex::new(()),
        }
    }

    /// Atomically replace `parent`'s outgoing edges.
    ///
    /// Departed children lose the parent from their inverse entry, new
    /// children gain it. This is the linearization point of a render: a
    /// canceled render never reaches it.
    pub fn set_children(&self, parent: &RepoPath, children: &[RepoPath]) -> Result<(), StoreError> {
        let _guard = self.write.lock();
        let parent_url = parent.encode_url();

        let mut next: Vec<String> = Vec::with_capacity(children.len());
        for child in children {
            let url = child.encode_url();
            if !next.contains(&url) {
                next.push(url);
            }
        }

        let prev = self.store.get(&parent_key(&parent_url))?;

        for departed in prev.iter().filter(|c| !next.contains(c)) {
            let mut parents = self.store.get(&child_key(departed))?;
            parents.retain(|p| p != &parent_url);
            self.store.put(&child_key(departed), parents)?;
        }

        for added in next.iter().filter(|c| !prev.contains(c)) {
            let mut parents = self.store.get(&child_key(added))?;
            if !parents.contains(&parent_url) {
                parents.push(parent_url.clone());
            }
            self.store.put(&child_key(added), parents)?;
        }

        self.store.put(&parent_key(&parent_url), next)
    }

    /// Every root manifest that transitively depends on `path`.
    ///
    /// Walks the inverse relation upward; ancestors with no parents of
    /// their own are the roots. A visited set keeps cyclic graphs
    /// terminating; order is deterministic within one call.
    pub fn get_roots(&self, path: &RepoPath) -> Result<Vec<RepoPath>, StoreError> {
        let start = path.encode_url();
        let mut visited: HashSet<String> = HashSet::from([start.clone()]);
        let mut queue: VecDeque<String> = VecDeque::from([start.clone()]);
        let mut roots = Vec::new();

        while let Some(url) = queue.pop_front() {
            let parents = self.store.get(&child_key(&url))?;
            if parents.is_empty() {
                if url != start {
                    match RepoPath::decode_url(&url) {
                        Ok(root) => roots.push(root),
                        Err(e) => warn!(url = %url, error = %e, "undecodable root url in store"),
                    }
                }
                continue;
            }
            for parent in parents {
                if visited.insert(parent.clone()) {
                    queue.push_back(parent);
                }
            }
        }

        Ok(roots)
    }

    /// Drop all edges whose parent is `root`.
    pub fn remove_root(&self, root: &RepoPath) -> Result<(), StoreError> {
        let _guard = self.write.lock();
        let root_url = root.encode_url();

        let children = self.store.get(&parent_key(&root_url))?;
        for child in children {
            let mut parents = self.store.get(&child_key(&child))?;
            parents.retain(|p| p != &root_url);
            self.store.put(&child_key(&child), parents)?;
        }
        self.store.remove(&parent_key(&root_url))
    }
}

#[cfg(test)]
#[path = "graph_tests.rs"]
mod tests;
