pub mod command;
pub mod effect;
pub mod event;
pub mod key_bindings;
pub mod reducer;
pub mod replay;
pub mod runner;

pub use replay::{Replay, ReplayOutcome, ReplayStep, parse_script};
pub use runner::Runtime;
