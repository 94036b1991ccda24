//! Undo snapshots of the annotation layer

use std::collections::VecDeque;

use image::RgbaImage;

/// Last-in-first-out stack of full bitmap snapshots
///
/// Unbounded unless a capacity is given, in which case the oldest snapshot is
/// dropped once the stack is full.
#[derive(Debug, Default)]
pub struct History {
    snapshots: VecDeque<RgbaImage>,
    capacity: Option<usize>,
}

impl History {
    pub fn new(capacity: Option<usize>) -> Self {
        Self {
            snapshots: VecDeque::new(),
            capacity: capacity.map(|c| c.max(1)),
        }
    }

    pub fn push(&mut self, snapshot: RgbaImage) {
        if let Some(capacity) = self.capacity
            && self.snapshots.len() >= capacity
        {
            self.snapshots.pop_front();
            log::debug!("Undo history full ({capacity}), dropped oldest snapshot");
        }
        self.snapshots.push_back(snapshot);
    }

    pub fn pop(&mut self) -> Option<RgbaImage> {
        self.snapshots.pop_back()
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn clear(&mut self) {
        self.snapshots.clear();
    }
}
