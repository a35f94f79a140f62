use crate::runtime::command::Command;
use crate::runtime::effect::Effect;
use crate::state::{Combobox, Direction, InteractionResult};
use std::time::Instant;

pub struct Reducer;

impl Reducer {
    pub fn reduce(state: &mut Combobox, command: Command, now: Instant) -> Vec<Effect> {
        match command {
            Command::Exit => vec![Effect::Exit],
            Command::Open => collect_effects(state.open()),
            Command::Dismiss => collect_effects(state.dismiss()),
            Command::Clear => collect_effects(state.clear(now)),
            Command::FocusNext => collect_effects(state.navigate(Direction::Forward)),
            Command::FocusPrev => collect_effects(state.navigate(Direction::Backward)),
            Command::Activate => collect_effects(state.activate()),
            Command::InputKey(key) => collect_effects(state.input_key(key, now)),
            Command::Pointer(target) => collect_effects(state.pointer_down(target, now)),
            Command::Tick => collect_effects(state.tick(now)),
        }
    }
}

fn collect_effects(result: InteractionResult) -> Vec<Effect> {
    let mut effects = Vec::new();
    if result.request_render {
        effects.push(Effect::RequestRender);
    }
    if let Some(selection) = result.selection {
        effects.push(Effect::Select(selection));
    }
    effects
}
