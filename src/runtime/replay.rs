use crate::error::{Result, SearchboxError};
use crate::runtime::command::Command;
use crate::runtime::effect::Effect;
use crate::runtime::key_bindings::{KeyBinding, KeyBindings};
use crate::runtime::reducer::Reducer;
use crate::state::{Combobox, ComboboxView, PointerTarget, Selection};
use crate::terminal::{KeyCode, KeyEvent, TerminalSize};
use crate::ui::frame_json::frame_to_json;
use crate::ui::renderer::Renderer;
use serde::Serialize;
use std::time::{Duration, Instant};
use tracing::debug;

/// Screen size the replay renders its final frame against.
pub const REPLAY_SIZE: TerminalSize = TerminalSize {
    width: 80,
    height: 24,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplayStep {
    Key(KeyEvent),
    Type(String),
    Wait(Duration),
    Click(PointerTarget),
}

impl ReplayStep {
    /// Parses one step: a hotkey string, `type:<text>`, `wait:<ms>` or
    /// `click:<outside|inside|clear|slot>`.
    pub fn parse(step: &str) -> Result<Self> {
        let trimmed = step.trim();
        let invalid = |reason: String| SearchboxError::ReplayStep {
            step: trimmed.to_string(),
            reason,
        };

        if let Some(text) = trimmed.strip_prefix("type:") {
            return Ok(Self::Type(text.to_string()));
        }
        if let Some(ms) = trimmed.strip_prefix("wait:") {
            let ms = ms
                .trim()
                .parse::<u64>()
                .map_err(|err| invalid(format!("bad duration: {err}")))?;
            return Ok(Self::Wait(Duration::from_millis(ms)));
        }
        if let Some(target) = trimmed.strip_prefix("click:") {
            let target = match target.trim() {
                "outside" => PointerTarget::Outside,
                "inside" => PointerTarget::Inside,
                "clear" => PointerTarget::ClearButton,
                slot => PointerTarget::Slot(
                    slot.parse::<usize>()
                        .map_err(|_| invalid(format!("unknown click target '{slot}'")))?,
                ),
            };
            return Ok(Self::Click(target));
        }

        let binding = KeyBinding::parse(trimmed).map_err(|err| invalid(err.to_string()))?;
        Ok(Self::Key(binding.to_event()))
    }
}

/// Splits a comma separated script into steps. Empty entries are skipped.
pub fn parse_script(script: &str) -> Result<Vec<ReplayStep>> {
    script
        .split(',')
        .filter(|step| !step.trim().is_empty())
        .map(ReplayStep::parse)
        .collect()
}

#[derive(Debug, Clone, Serialize)]
pub struct ReplayOutcome {
    pub elapsed_ms: u64,
    pub view: ComboboxView,
    pub selection: Option<Selection>,
    pub frame: serde_json::Value,
}

/// Runs steps against a combobox with a virtual clock, no terminal involved.
/// Processing stops at the first selection or exit, as the live loop does.
pub struct Replay {
    state: Combobox,
    key_bindings: KeyBindings,
    renderer: Renderer,
    start: Instant,
    now: Instant,
    selection: Option<Selection>,
    finished: bool,
}

impl Replay {
    pub fn new(state: Combobox, key_bindings: KeyBindings, renderer: Renderer) -> Self {
        let start = Instant::now();
        Self {
            state,
            key_bindings,
            renderer,
            start,
            now: start,
            selection: None,
            finished: false,
        }
    }

    pub fn state(&self) -> &Combobox {
        &self.state
    }

    pub fn elapsed(&self) -> Duration {
        self.now.duration_since(self.start)
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn apply(&mut self, step: &ReplayStep) {
        if self.finished {
            return;
        }
        debug!(?step, elapsed_ms = self.elapsed().as_millis() as u64, "replay step");

        match step {
            ReplayStep::Key(key) => {
                let command = self.key_bindings.command_for(*key);
                self.process(command);
            }
            ReplayStep::Type(text) => {
                for ch in text.chars() {
                    self.process(Command::InputKey(KeyEvent::plain(KeyCode::Char(ch))));
                    if self.finished {
                        break;
                    }
                }
            }
            ReplayStep::Wait(duration) => {
                self.now += *duration;
                self.process(Command::Tick);
            }
            ReplayStep::Click(target) => self.process(Command::Pointer(*target)),
        }
    }

    pub fn run(mut self, steps: &[ReplayStep]) -> ReplayOutcome {
        for step in steps {
            self.apply(step);
        }
        self.finish()
    }

    pub fn finish(self) -> ReplayOutcome {
        let view = self.state.view();
        let frame = self.renderer.render(&view, REPLAY_SIZE);
        let elapsed_ms = self.elapsed().as_millis() as u64;
        self.state.unmount();
        ReplayOutcome {
            elapsed_ms,
            view,
            selection: self.selection,
            frame: frame_to_json(&frame, REPLAY_SIZE),
        }
    }

    fn process(&mut self, command: Command) {
        for effect in Reducer::reduce(&mut self.state, command, self.now) {
            match effect {
                Effect::RequestRender => {}
                Effect::Select(selection) => {
                    self.selection = Some(selection);
                    self.finished = true;
                }
                Effect::Exit => self.finished = true,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Replay, ReplayStep, parse_script};
    use crate::data::CandidateSet;
    use crate::error::SearchboxError;
    use crate::runtime::key_bindings::KeyBindings;
    use crate::state::{Combobox, ComboboxOptions, PointerTarget, Selection};
    use crate::terminal::{KeyCode, KeyEvent, KeyModifiers};
    use crate::ui::renderer::Renderer;
    use std::time::Duration;

    fn replay() -> Replay {
        Replay::new(
            Combobox::mount(CandidateSet::builtin(), ComboboxOptions::default()),
            KeyBindings::new(),
            Renderer::default(),
        )
    }

    #[test]
    fn parses_every_step_kind() {
        let steps = parse_script("ctrl+k, type:gh ,wait:300,down,click:outside,click:clear,click:2")
            .expect("script parses");
        assert_eq!(
            steps,
            vec![
                ReplayStep::Key(KeyEvent::new(KeyCode::Char('k'), KeyModifiers::CONTROL)),
                ReplayStep::Type("gh".to_string()),
                ReplayStep::Wait(Duration::from_millis(300)),
                ReplayStep::Key(KeyEvent::plain(KeyCode::Down)),
                ReplayStep::Click(PointerTarget::Outside),
                ReplayStep::Click(PointerTarget::ClearButton),
                ReplayStep::Click(PointerTarget::Slot(2)),
            ]
        );
    }

    #[test]
    fn rejects_malformed_steps() {
        for bad in ["wait:soon", "click:nowhere", "ctrl+"] {
            assert!(matches!(
                ReplayStep::parse(bad),
                Err(SearchboxError::ReplayStep { .. })
            ));
        }
    }

    #[test]
    fn typed_query_filters_after_wait() {
        let steps = parse_script("ctrl+k,type:gh,wait:300").expect("script parses");
        let outcome = replay().run(&steps);
        assert!(outcome.view.open);
        assert_eq!(outcome.view.query, "gh");
        let texts: Vec<&str> = outcome
            .view
            .results
            .iter()
            .map(|item| item.text.as_str())
            .collect();
        assert_eq!(texts, vec!["Afghanistan", "Ghana"]);
        assert_eq!(outcome.elapsed_ms, 300);
        assert_eq!(outcome.selection, None);
    }

    #[test]
    fn stops_at_first_selection() {
        let steps = parse_script("ctrl+k,down,enter,ctrl+k").expect("script parses");
        let outcome = replay().run(&steps);
        assert_eq!(
            outcome.selection,
            Some(Selection::Candidate {
                text: "Afghanistan".to_string()
            })
        );
        assert!(!outcome.view.open);
    }

    #[test]
    fn outcome_serializes_with_frame() {
        let outcome = replay().run(&[]);
        let json = serde_json::to_value(&outcome).expect("serializes");
        assert_eq!(json["view"]["open"], false);
        assert_eq!(json["selection"], serde_json::Value::Null);
        assert!(json["frame"]["lines"].is_array());
    }
}
