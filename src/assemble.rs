// src/assemble.rs
//! Window assembler: walks the requested window through the pattern and
//! pulls one item per position from the provider queues.

use std::collections::VecDeque;
use std::ops::ControlFlow;

use crate::content::ContentItem;
use crate::fetch::Queues;
use crate::mix::{MixingPattern, SlotSpec};

/// Build the window `[offset, offset + count)` from the fetched queues.
///
/// Each position takes from its primary queue, or from its fallback queue
/// when the primary is exhausted. The first position that can be served by
/// neither ends the walk, so the result is always a prefix of the full
/// window and never has gaps.
pub fn assemble(
    count: usize,
    offset: usize,
    pattern: &MixingPattern,
    mut queues: Queues,
) -> Vec<ContentItem> {
    let start = offset % pattern.len();
    let walk = (0..count).try_fold(Vec::new(), |mut out, j| {
        match take_for_slot(pattern.slot_at(start + j), &mut queues) {
            Some(item) => {
                out.push(item);
                ControlFlow::Continue(out)
            }
            None => ControlFlow::Break(out),
        }
    });

    match walk {
        ControlFlow::Continue(out) => out,
        ControlFlow::Break(out) => {
            tracing::debug!(count, offset, served = out.len(), "window cut short");
            out
        }
    }
}

fn take_for_slot(slot: &SlotSpec, queues: &mut Queues) -> Option<ContentItem> {
    queues
        .get_mut(&slot.primary)
        .and_then(VecDeque::pop_front)
        .or_else(|| {
            slot.fallback
                .as_ref()
                .and_then(|fb| queues.get_mut(fb))
                .and_then(VecDeque::pop_front)
        })
}
