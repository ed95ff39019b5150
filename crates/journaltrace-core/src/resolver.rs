//! File-reference to full-path resolution.
//!
//! MFT enumeration yields one `(parent, name)` link per record. This module
//! turns that map into fully qualified paths rooted at the drive letter,
//! memoising every intermediate result so resolving the whole volume is
//! linear in the number of records.
//!
//! Orphaned references are common in practice — the parent may live in a
//! reserved MFT region, may have been purged, or may simply never appear in
//! the enumeration — and collapse to the drive root, which keeps every
//! descendant whose chain does terminate at root correct.

use crate::types::{file_index, ROOT_FILE_INDEX};
use std::collections::HashMap;

/// Cap on the parent-chain length, guarding against cycles and
/// pathological link chains.
const MAX_RESOLVE_DEPTH: usize = 100;

/// Join a parent path and a trailing component with the NTFS separator.
///
/// An empty component yields the parent path unchanged.
pub fn join_path(parent: &str, name: &str) -> String {
    if name.is_empty() {
        parent.to_string()
    } else if parent.ends_with('\\') {
        format!("{parent}{name}")
    } else {
        format!("{parent}\\{name}")
    }
}

/// Per-volume path cache built from MFT parent links.
pub struct PathResolver {
    root: String,
    parents: HashMap<u64, (u64, String)>,
    paths: HashMap<u64, String>,
}

impl PathResolver {
    /// Create a resolver for one volume, pre-seeded with the root directory.
    pub fn new(drive_letter: char) -> Self {
        let root = format!("{}:\\", drive_letter.to_ascii_uppercase());
        let mut paths = HashMap::new();
        paths.insert(ROOT_FILE_INDEX, root.clone());
        PathResolver {
            root,
            parents: HashMap::new(),
            paths,
        }
    }

    /// The drive root, e.g. `"C:\"`.
    pub fn root(&self) -> &str {
        &self.root
    }

    /// Record one parent link observed during MFT enumeration.
    pub fn record(&mut self, index: u64, parent_index: u64, name: String) {
        self.parents.insert(index, (parent_index, name));
    }

    /// Number of parent links recorded so far.
    pub fn link_count(&self) -> usize {
        self.parents.len()
    }

    /// Resolve every recorded link into the path cache.
    pub fn resolve_all(&mut self) {
        let indices: Vec<u64> = self.parents.keys().copied().collect();
        for index in indices {
            self.resolve(index);
        }
    }

    /// Resolve one record index to its full path, memoising the whole chain.
    ///
    /// The parent chain is walked iteratively up to a cached path, an
    /// unknown parent (which attaches at the drive root), or the depth cap,
    /// then unwound joining one component per level.
    pub fn resolve(&mut self, index: u64) -> String {
        if let Some(path) = self.paths.get(&index) {
            return path.clone();
        }

        let mut chain: Vec<u64> = Vec::new();
        let mut current = index;
        let mut path = loop {
            if chain.len() > MAX_RESOLVE_DEPTH {
                break self.root.clone();
            }
            if let Some(cached) = self.paths.get(&current) {
                break cached.clone();
            }
            let Some((parent, _)) = self.parents.get(&current) else {
                break self.root.clone();
            };
            let parent = *parent;
            chain.push(current);
            current = parent;
        };

        while let Some(link) = chain.pop() {
            let name = &self.parents[&link].1;
            let joined = join_path(&path, name);
            self.paths.insert(link, joined.clone());
            path = joined;
        }
        path
    }

    /// Look up the cached path for a raw 64-bit reference, falling back to
    /// the drive root. Masks down to the 48-bit index first.
    pub fn path_of(&self, reference: u64) -> &str {
        self.paths
            .get(&file_index(reference))
            .map(String::as_str)
            .unwrap_or(&self.root)
    }
}
