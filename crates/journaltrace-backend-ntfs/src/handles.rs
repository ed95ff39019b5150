//! The per-scan volume handle registry.

use crate::error::NtfsError;
use crate::winapi_utils::{open_volume, SafeHandle};
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use tracing::debug;

/// Keyed cache of raw volume handles: one per drive letter per scan
/// session. Handles open lazily on first use and close when the registry
/// is dropped, which the owning scanner guarantees on every exit path.
#[derive(Default)]
pub struct HandleRegistry {
    handles: HashMap<char, SafeHandle>,
}

impl HandleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The cached handle for `letter`, opening the volume on first use.
    pub fn get(&mut self, letter: char) -> Result<&SafeHandle, NtfsError> {
        match self.handles.entry(letter) {
            Entry::Occupied(entry) => Ok(entry.into_mut()),
            Entry::Vacant(slot) => {
                let handle = open_volume(letter)?;
                debug!(drive = %letter, "Opened volume handle");
                Ok(slot.insert(handle))
            }
        }
    }
}
