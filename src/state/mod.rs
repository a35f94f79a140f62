pub mod combobox;
pub mod focus;
pub mod slots;

pub use combobox::{
    Combobox, ComboboxOptions, ComboboxView, InteractionResult, PointerTarget, ResultItem,
    Selection,
};
pub use focus::{Direction, FocusState, next_index};
pub use slots::{NavigableSlots, Slot};
