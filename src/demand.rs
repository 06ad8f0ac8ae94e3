// src/demand.rs
//! Demand scheduler.
//!
//! Answers "how many items must each provider supply to fill `count`
//! consecutive feed positions starting at `offset`" in time independent of
//! `count`. The table built from the pattern holds, per slot `i`, the running
//! number of primary + fallback occurrences over slots `[0, i]`. Since the
//! pattern repeats, the cumulative demand up to any absolute position `x` is
//!
//! ```text
//! C(x) = (x / L) * table[L-1] + table[x % L - 1]      (second term only if x % L > 0)
//! ```
//!
//! and the demand of a window is `C(offset + count) - C(offset)`, with the
//! offset first reduced modulo `L`.

use std::collections::BTreeMap;

use crate::content::ProviderId;
use crate::mix::MixingPattern;

/// Provider -> number of items to request. Zero entries are never present.
pub type Demand = BTreeMap<ProviderId, usize>;

/// Cumulative demand snapshots, one per pattern slot. Read-only once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DemandTable {
    cumulative: Vec<Demand>,
}

impl DemandTable {
    pub fn build(pattern: &MixingPattern) -> Self {
        let cumulative = pattern
            .slots()
            .iter()
            .scan(Demand::new(), |running, slot| {
                *running.entry(slot.primary.clone()).or_default() += 1;
                if let Some(fb) = &slot.fallback {
                    *running.entry(fb.clone()).or_default() += 1;
                }
                Some(running.clone())
            })
            .collect();
        Self { cumulative }
    }

    /// Cumulative snapshot after slot `i` (inclusive).
    pub fn entry(&self, i: usize) -> &Demand {
        &self.cumulative[i]
    }

    /// Demand of one full pass over the pattern.
    pub fn per_cycle(&self) -> &Demand {
        &self.cumulative[self.cumulative.len() - 1]
    }

    /// Per-provider demand for the window `[offset, offset + count)`.
    pub fn demand(&self, count: usize, offset: usize) -> Demand {
        let len = self.cumulative.len();
        let offset = offset % len;
        let end = offset + count;
        let full_cycles = end / len;
        let rem = end % len;

        let trailing = rem.checked_sub(1).map(|i| &self.cumulative[i]);
        let before = offset.checked_sub(1).map(|i| &self.cumulative[i]);

        // Every provider appears in the per-cycle entry, so iterating it
        // covers all keys of the partial snapshots too.
        let out: Demand = self
            .per_cycle()
            .iter()
            .filter_map(|(provider, &per_cycle)| {
                let lookup = |d: Option<&Demand>| {
                    d.and_then(|d| d.get(provider)).copied().unwrap_or(0)
                };
                let through_end = full_cycles
                    .saturating_mul(per_cycle)
                    .saturating_add(lookup(trailing));
                let n = through_end - lookup(before);
                (n > 0).then(|| (provider.clone(), n))
            })
            .collect();

        tracing::debug!(count, offset, demand = ?out, "window demand");
        out
    }
}
