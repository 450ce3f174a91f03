//! Dead-temporary elimination for typed sift programs.
//!
//! A variable written once and read once, where the read directly follows
//! the write, is a temporary: `Vaw S; Var S` pops a value into the slot and
//! pushes it straight back. Both instructions are removed.
//!
//! # Algorithm
//!
//! 1. Count writes and reads of every slot over the whole program, nested
//!    blocks included. Any reference from a closure counts, which keeps
//!    variables shared with generator bodies intact.
//! 2. Walk every block back to front, nested blocks first, and drop each
//!    adjacent `Vaw S; Var S` pair whose slot has exactly one write and one
//!    read.
//!
//! Nothing else is reordered or changed.

use rustc_hash::FxHashMap;
use sift_ir::{Block, Op};

#[derive(Default)]
struct Usage {
    writes: u32,
    reads: u32,
}

/// Remove temporaries from `block` and its closures. Returns the number of
/// removed pairs.
#[tracing::instrument(level = "debug", skip_all)]
pub fn optimize(block: &mut Block) -> usize {
    let mut usage = FxHashMap::default();
    count(block, &mut usage);
    let removed = eliminate(block, &usage);
    if removed > 0 {
        tracing::debug!(pairs = removed, "eliminated temporaries");
    }
    removed
}

fn count(block: &Block, usage: &mut FxHashMap<u32, Usage>) {
    for instr in block {
        if let Some(slot) = instr.slot() {
            let entry = usage.entry(slot).or_default();
            match instr.op {
                Op::Var => entry.reads += 1,
                // Generators and recursors write their loop variable.
                _ => entry.writes += 1,
            }
        }
        for closure in &instr.closures {
            count(closure, usage);
        }
    }
}

fn eliminate(block: &mut Block, usage: &FxHashMap<u32, Usage>) -> usize {
    let mut removed = 0;
    for instr in block.iter_mut() {
        for closure in &mut instr.closures {
            removed += eliminate(closure, usage);
        }
    }

    let mut i = block.len();
    while i >= 2 {
        i -= 1;
        let (write, read) = (&block[i - 1], &block[i]);
        let temporary = write.op == Op::Vaw
            && read.op == Op::Var
            && write.slot().is_some_and(|slot| {
                read.slot() == Some(slot)
                    && usage
                        .get(&slot)
                        .is_some_and(|u| u.writes == 1 && u.reads == 1)
            });
        if temporary {
            tracing::trace!(slot = write.slot(), "removing temporary");
            block.drain(i - 1..=i);
            removed += 1;
            i -= 1;
        }
    }
    removed
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    reason = "tests use unwrap to panic on unexpected state"
)]
mod tests;
