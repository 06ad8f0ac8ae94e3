// src/mix.rs
//! Mixing pattern: the fixed, cyclic sequence of slots that decides which
//! provider (and which fallback) fills each position of the feed.

use serde::Deserialize;
use std::collections::BTreeSet;

use crate::content::ProviderId;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum MixError {
    #[error("mixing pattern must contain at least one slot")]
    Empty,
}

/// One position of the pattern.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SlotSpec {
    pub primary: ProviderId,
    #[serde(default)]
    pub fallback: Option<ProviderId>,
}

impl SlotSpec {
    pub fn new(primary: impl Into<ProviderId>) -> Self {
        Self {
            primary: primary.into(),
            fallback: None,
        }
    }

    pub fn with_fallback(primary: impl Into<ProviderId>, fallback: impl Into<ProviderId>) -> Self {
        Self {
            primary: primary.into(),
            fallback: Some(fallback.into()),
        }
    }
}

/// Non-empty, immutable slot sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MixingPattern {
    slots: Vec<SlotSpec>,
}

impl MixingPattern {
    pub fn new(slots: Vec<SlotSpec>) -> Result<Self, MixError> {
        if slots.is_empty() {
            return Err(MixError::Empty);
        }
        Ok(Self { slots })
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    // Always false; kept for clippy's len_without_is_empty.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn slots(&self) -> &[SlotSpec] {
        &self.slots
    }

    /// Slot for an absolute feed position, wrapping around the cycle.
    pub fn slot_at(&self, position: usize) -> &SlotSpec {
        &self.slots[position % self.slots.len()]
    }

    /// Every provider named anywhere in the pattern, as primary or fallback.
    pub fn providers(&self) -> BTreeSet<ProviderId> {
        self.slots
            .iter()
            .flat_map(|s| std::iter::once(&s.primary).chain(s.fallback.as_ref()))
            .cloned()
            .collect()
    }

    /// The blend the service ships with: providers "1", "2", "3" over an
    /// 8-slot cycle (6 parts "1", 6 parts "2", 3 parts "3" in demand terms).
    pub fn default_blend() -> Self {
        let slots = vec![
            SlotSpec::with_fallback("1", "2"),
            SlotSpec::with_fallback("1", "2"),
            SlotSpec::with_fallback("2", "3"),
            SlotSpec::with_fallback("3", "1"),
            SlotSpec::new("1"),
            SlotSpec::with_fallback("1", "2"),
            SlotSpec::with_fallback("1", "2"),
            SlotSpec::with_fallback("2", "3"),
        ];
        Self { slots }
    }
}
