use crate::state::Selection;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    RequestRender,
    Select(Selection),
    Exit,
}
