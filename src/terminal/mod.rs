pub mod backend;

pub use backend::{
    CursorPos, KeyCode, KeyEvent, KeyModifiers, PointerEvent, Terminal, TerminalEvent,
    TerminalSize,
};
