pub mod frame_json;
pub mod layout;
pub mod renderer;
pub mod span;
pub mod style;
