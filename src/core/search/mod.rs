pub mod substring;

pub use substring::{SubstringMatch, filter};
