use crate::state::PointerTarget;

/// Screen regions of the last rendered frame, used to resolve pointer
/// presses. The widget occupies `width` columns of its first rows; anything
/// else on screen counts as outside.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WidgetLayout {
    width: u16,
    rows: Vec<Option<usize>>,
    clear_button: Option<(u16, u16)>,
}

impl WidgetLayout {
    pub fn new(width: u16) -> Self {
        Self {
            width,
            rows: Vec::new(),
            clear_button: None,
        }
    }

    pub fn push_slot_row(&mut self, slot: usize) {
        self.rows.push(Some(slot));
    }

    pub fn push_inert_row(&mut self) {
        self.rows.push(None);
    }

    /// Columns `start..end` of the first row hold the clear button.
    pub fn set_clear_button(&mut self, start: u16, end: u16) {
        self.clear_button = Some((start, end));
    }

    pub fn height(&self) -> u16 {
        self.rows.len().min(u16::MAX as usize) as u16
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn contains(&self, col: u16, row: u16) -> bool {
        col < self.width && row < self.height()
    }

    pub fn hit_test(&self, col: u16, row: u16) -> PointerTarget {
        if !self.contains(col, row) {
            return PointerTarget::Outside;
        }
        if row == 0
            && self
                .clear_button
                .is_some_and(|(start, end)| col >= start && col < end)
        {
            return PointerTarget::ClearButton;
        }
        match self.rows[row as usize] {
            Some(slot) => PointerTarget::Slot(slot),
            None => PointerTarget::Inside,
        }
    }
}
