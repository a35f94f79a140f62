#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Backward,
}

/// Next slot on the ring of `slot_count` slots.
///
/// The count is read at the moment of the key press, never cached. A current
/// index past the end (the ring shrank) is clamped to the last slot first;
/// an empty ring always yields slot 0.
pub fn next_index(current: usize, direction: Direction, slot_count: usize) -> usize {
    if slot_count == 0 {
        return 0;
    }
    let current = current.min(slot_count - 1);
    match direction {
        Direction::Forward => (current + 1) % slot_count,
        Direction::Backward => (current + slot_count - 1) % slot_count,
    }
}

/// Which slot holds keyboard focus. `None` means nothing is focused.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct FocusState {
    index: Option<usize>,
}

impl FocusState {
    pub fn index(&self) -> Option<usize> {
        self.index
    }

    pub fn is_focused(&self) -> bool {
        self.index.is_some()
    }

    pub fn focus(&mut self, index: usize) {
        self.index = Some(index);
    }

    pub fn blur(&mut self) -> bool {
        self.index.take().is_some()
    }

    pub fn step(&mut self, direction: Direction, slot_count: usize) -> Option<usize> {
        let current = self.index?;
        let next = next_index(current, direction, slot_count);
        self.index = Some(next);
        Some(next)
    }

    /// Sends focus back to slot 0 when the focused slot no longer exists.
    pub fn reconcile(&mut self, slot_count: usize) -> bool {
        match self.index {
            Some(current) if current >= slot_count => {
                self.index = Some(0);
                true
            }
            _ => false,
        }
    }
}
