use core::ops::Range;

use crate::coords::Vec3;
use crate::geometry::MeshKind;
use crate::paint::{Color, StrokeCap, StrokeJoin};

/// One queued draw request, fully owned by the queue from append until
/// flush. Vertices are already in final canvas space: the renderer bakes
/// the current and per-shape transforms before enqueueing.
#[derive(Debug, Clone)]
pub enum QueueEntry {
    Mesh {
        kind: MeshKind,
        vertices: Vec<Vec3>,
        indices: Vec<u32>,
        color: Color,
    },
    Line {
        vertices: Vec<Vec3>,
        polylines: Vec<Vec<u32>>,
        color: Color,
        weight: f32,
        cap: StrokeCap,
        join: StrokeJoin,
    },
}

/// One flush-time draw group, in paint order.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum Batch {
    /// A single mesh entry, dispatched individually.
    Mesh(usize),
    /// A maximal run of consecutive line entries, expanded together into
    /// one line-mesh draw.
    Lines(Range<usize>),
}

/// Recorded draw stream for one frame.
///
/// Entries append in call order; order is semantically significant —
/// later shapes render on top of earlier ones. The queue is cleared
/// atomically when a flush completes.
#[derive(Debug, Default)]
pub struct DrawQueue {
    entries: Vec<QueueEntry>,
}

impl DrawQueue {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn push(&mut self, entry: QueueEntry) {
        self.entries.push(entry);
    }

    #[inline]
    pub fn entries(&self) -> &[QueueEntry] {
        &self.entries
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Clears recorded entries, keeping allocated capacity for reuse.
    #[inline]
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Walks the entries once and produces the flush plan: each maximal
    /// run of consecutive `Line` entries collapses into one batch, every
    /// `Mesh` entry stands alone. Empty queue → empty plan.
    pub fn batches(&self) -> Vec<Batch> {
        let mut plan = Vec::new();
        let mut i = 0;

        while i < self.entries.len() {
            match self.entries[i] {
                QueueEntry::Mesh { .. } => {
                    plan.push(Batch::Mesh(i));
                    i += 1;
                }
                QueueEntry::Line { .. } => {
                    let start = i;
                    while i < self.entries.len()
                        && matches!(self.entries[i], QueueEntry::Line { .. })
                    {
                        i += 1;
                    }
                    plan.push(Batch::Lines(start..i));
                }
            }
        }

        plan
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mesh() -> QueueEntry {
        QueueEntry::Mesh {
            kind: MeshKind::Triangles,
            vertices: vec![Vec3::zero(); 3],
            indices: vec![0, 1, 2],
            color: Color::WHITE,
        }
    }

    fn line() -> QueueEntry {
        QueueEntry::Line {
            vertices: vec![Vec3::zero(), Vec3::xy(1.0, 0.0)],
            polylines: vec![vec![0, 1]],
            color: Color::BLACK,
            weight: 1.0,
            cap: StrokeCap::Round,
            join: StrokeJoin::Miter,
        }
    }

    #[test]
    fn empty_queue_plans_nothing() {
        assert!(DrawQueue::new().batches().is_empty());
    }

    #[test]
    fn insertion_order_is_preserved() {
        let mut q = DrawQueue::new();
        q.push(mesh());
        q.push(line());
        q.push(mesh());
        assert_eq!(
            q.batches(),
            vec![Batch::Mesh(0), Batch::Lines(1..2), Batch::Mesh(2)]
        );
    }

    #[test]
    fn consecutive_lines_collapse_into_one_batch() {
        let mut q = DrawQueue::new();
        q.push(line());
        q.push(line());
        q.push(line());
        q.push(mesh());
        q.push(line());
        assert_eq!(
            q.batches(),
            vec![Batch::Lines(0..3), Batch::Mesh(3), Batch::Lines(4..5)]
        );
    }

    #[test]
    fn clear_empties_but_keeps_nothing_stale() {
        let mut q = DrawQueue::new();
        q.push(mesh());
        q.push(line());
        q.clear();
        assert!(q.is_empty());
        assert!(q.batches().is_empty());
    }
}
