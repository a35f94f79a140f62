pub mod debounce;
pub mod search;
