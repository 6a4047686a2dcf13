//! Memoised outline generation.

use crate::errors::GeometryError;
use crate::gear::{GearOutline, GearSpec, SpecKey, generate_gear_outline};
use hashbrown::{HashMap, hash_map::Entry};

/// Remembers generated outlines so a wheel is only rebuilt when one of its
/// parameters actually changes.
#[derive(Debug, Default, Clone)]
pub struct OutlineCache {
    entries: HashMap<SpecKey, GearOutline>,
    hits: usize,
    misses: usize,
}

impl OutlineCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the outline for `spec`, generating it on first request.
    ///
    /// Failed generations are not cached.
    pub fn get_or_generate(&mut self, spec: &GearSpec) -> Result<&GearOutline, GeometryError> {
        match self.entries.entry(spec.cache_key()) {
            Entry::Occupied(entry) => {
                self.hits += 1;
                tracing::trace!(tooth_count = spec.tooth_count(), "outline cache hit");
                Ok(entry.into_mut())
            },
            Entry::Vacant(entry) => {
                self.misses += 1;
                tracing::debug!(tooth_count = spec.tooth_count(), "outline cache miss");
                let outline = generate_gear_outline(spec)?;
                Ok(entry.insert(outline))
            },
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub const fn hits(&self) -> usize {
        self.hits
    }

    pub const fn misses(&self) -> usize {
        self.misses
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
