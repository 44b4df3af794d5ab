//! Domain color assignment.
//!
//! Colors keep a domain recognizable across forms, pages, and batches
//! within one document render. The state is threaded explicitly by the
//! caller; there is no module-level color registry.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// An RGB triple with components in [0, 1].
pub type Rgb = [f64; 3];

/// The cyclic annotation palette: pale orange, green, yellow, blue.
pub const PALETTE: [Rgb; 4] = [
    [1.0, 0.745, 0.608],
    [0.588, 1.0, 0.588],
    [1.0, 1.0, 0.588],
    [0.749, 1.0, 1.0],
];

/// Domain→color assignments accumulated over one document render.
///
/// The first occurrence of a domain takes the next palette entry (cycling
/// when the palette is exhausted); later occurrences reuse it, even across
/// different forms or generation batches.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DomainColorState {
    map: IndexMap<String, Rgb>,
    next_index: usize,
}

impl DomainColorState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the domain's color, assigning the next palette entry on
    /// first sight.
    pub fn color_for(&mut self, domain: &str) -> Rgb {
        if let Some(color) = self.map.get(domain) {
            return *color;
        }
        let color = PALETTE[self.next_index % PALETTE.len()];
        self.map.insert(domain.to_string(), color);
        self.next_index += 1;
        color
    }

    /// Looks up a domain without assigning.
    pub fn get(&self, domain: &str) -> Option<Rgb> {
        self.map.get(domain).copied()
    }

    /// Number of domains assigned so far.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}
