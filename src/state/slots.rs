use serde::Serialize;

/// A keyboard-focusable element of the widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "result", rename_all = "snake_case")]
pub enum Slot {
    Input,
    /// Position within the filtered results.
    Result(usize),
    SearchFooter,
}

/// Layout of the focus ring: `[input] ++ results ++ [footer]?`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavigableSlots {
    pub result_count: usize,
    pub has_search_footer: bool,
}

impl NavigableSlots {
    pub fn new(result_count: usize, has_search_footer: bool) -> Self {
        Self {
            result_count,
            has_search_footer,
        }
    }

    pub fn len(&self) -> usize {
        1 + self.result_count + usize::from(self.has_search_footer)
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn get(&self, index: usize) -> Option<Slot> {
        if index == 0 {
            Some(Slot::Input)
        } else if index <= self.result_count {
            Some(Slot::Result(index - 1))
        } else if self.has_search_footer && index == self.result_count + 1 {
            Some(Slot::SearchFooter)
        } else {
            None
        }
    }

    pub fn index_of(&self, slot: Slot) -> Option<usize> {
        match slot {
            Slot::Input => Some(0),
            Slot::Result(position) if position < self.result_count => Some(position + 1),
            Slot::SearchFooter if self.has_search_footer => Some(self.result_count + 1),
            _ => None,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = Slot> + '_ {
        (0..self.len()).filter_map(|index| self.get(index))
    }
}
