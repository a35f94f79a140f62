use crate::state::PointerTarget;
use crate::terminal::KeyEvent;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Exit,
    Open,
    Dismiss,
    Clear,
    FocusNext,
    FocusPrev,
    Activate,
    InputKey(KeyEvent),
    Pointer(PointerTarget),
    Tick,
}
