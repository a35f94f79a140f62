pub mod config;
pub mod core;
pub mod data;
pub mod error;
pub mod input;
pub mod logging;
pub mod runtime;
pub mod state;
pub mod terminal;
pub mod ui;

pub use config::Config;
pub use self::core::debounce::Debouncer;
pub use data::CandidateSet;
pub use error::{Result, SearchboxError};
pub use state::{Combobox, ComboboxOptions, ComboboxView, Selection};
