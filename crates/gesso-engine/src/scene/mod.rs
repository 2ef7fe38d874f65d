//! Per-frame draw queue.
//!
//! Responsibilities:
//! - store queued entries in call order (painter's algorithm)
//! - provide the flush batch plan (maximal runs of line entries grouped
//!   into a single batched draw)

mod queue;

pub use queue::{Batch, DrawQueue, QueueEntry};
