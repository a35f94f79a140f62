use crate::core::debounce::Debouncer;
use crate::core::search::{self, SubstringMatch};
use crate::data::CandidateSet;
use crate::input::{KeyResult, TextInput};
use crate::state::focus::{Direction, FocusState};
use crate::state::slots::{NavigableSlots, Slot};
use crate::terminal::KeyEvent;
use serde::Serialize;
use std::time::{Duration, Instant};
use tracing::{debug, trace};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComboboxOptions {
    pub debounce: Duration,
    pub max_results: usize,
    /// Prepended to the query to build the search footer's target.
    pub search_target_prefix: String,
}

impl Default for ComboboxOptions {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(250),
            max_results: 5,
            search_target_prefix: "/search?q=".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Selection {
    Candidate { text: String },
    Search { query: String, target: String },
}

/// Where a pointer press landed, resolved by the layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerTarget {
    Outside,
    /// Inside the widget but on nothing interactive.
    Inside,
    ClearButton,
    Slot(usize),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InteractionResult {
    pub request_render: bool,
    pub selection: Option<Selection>,
}

impl InteractionResult {
    pub fn handled() -> Self {
        Self {
            request_render: true,
            selection: None,
        }
    }

    pub fn ignored() -> Self {
        Self::default()
    }

    pub fn selected(selection: Selection) -> Self {
        Self {
            request_render: true,
            selection: Some(selection),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResultItem {
    pub text: String,
    /// Matched char range, highlighted by the renderer.
    pub highlight: Option<(usize, usize)>,
}

/// Everything a view needs to draw one frame.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComboboxView {
    pub open: bool,
    pub query: String,
    pub cursor: usize,
    pub results: Vec<ResultItem>,
    pub has_search_footer: bool,
    pub focus: Option<usize>,
}

/// The search combobox controller.
///
/// Owns the query, its debounced copy, the filtered results and the focus
/// ring. The widget is open exactly while some slot holds focus. Results are
/// recomputed only from the debounced query; the search footer follows the
/// live query.
#[derive(Debug)]
pub struct Combobox {
    candidates: CandidateSet,
    options: ComboboxOptions,
    input: TextInput,
    debouncer: Debouncer<String>,
    results: Vec<SubstringMatch>,
    focus: FocusState,
}

impl Combobox {
    pub fn mount(candidates: CandidateSet, options: ComboboxOptions) -> Self {
        let results = search::filter(candidates.as_slice(), "", options.max_results);
        debug!(
            candidates = candidates.len(),
            max_results = options.max_results,
            debounce_ms = options.debounce.as_millis() as u64,
            "combobox mounted"
        );
        Self {
            candidates,
            options,
            input: TextInput::new(),
            debouncer: Debouncer::new(String::new()),
            results,
            focus: FocusState::default(),
        }
    }

    /// Tears the widget down. The pending debounced emission is dropped with
    /// it; ownership rules out any later event.
    pub fn unmount(mut self) {
        let cancelled = self.debouncer.cancel();
        debug!(cancelled_pending = cancelled, "combobox unmounted");
    }

    pub fn options(&self) -> &ComboboxOptions {
        &self.options
    }

    pub fn is_open(&self) -> bool {
        self.focus.is_focused()
    }

    pub fn query(&self) -> &str {
        self.input.value()
    }

    pub fn debounced_query(&self) -> &str {
        self.debouncer.value()
    }

    pub fn results(&self) -> Vec<&str> {
        self.results
            .iter()
            .filter_map(|item| self.candidates.get(item.index))
            .collect()
    }

    pub fn result_count(&self) -> usize {
        self.results.len()
    }

    pub fn has_search_footer(&self) -> bool {
        !self.input.is_empty()
    }

    pub fn slots(&self) -> NavigableSlots {
        NavigableSlots::new(self.results.len(), self.has_search_footer())
    }

    pub fn slot_count(&self) -> usize {
        self.slots().len()
    }

    pub fn focus_index(&self) -> Option<usize> {
        self.focus.index()
    }

    pub fn focused_slot(&self) -> Option<Slot> {
        self.focus.index().and_then(|index| self.slots().get(index))
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.debouncer.deadline()
    }

    pub fn poll_timeout(&self, now: Instant, default_timeout: Duration) -> Duration {
        self.debouncer.poll_timeout(now, default_timeout)
    }

    /// Hotkey: focus the input, whatever was focused before.
    pub fn open(&mut self) -> InteractionResult {
        let was_open = self.is_open();
        self.focus.focus(0);
        debug!(was_open, query = self.query(), "combobox opened");
        InteractionResult::handled()
    }

    /// Escape: drop focus from whichever slot holds it.
    pub fn dismiss(&mut self) -> InteractionResult {
        if !self.focus.blur() {
            return InteractionResult::ignored();
        }
        debug!("combobox dismissed");
        InteractionResult::handled()
    }

    /// Clear button: empty the query and close, from any state.
    pub fn clear(&mut self, now: Instant) -> InteractionResult {
        if !self.input.is_empty() {
            self.input.clear();
            self.query_changed(now);
        }
        self.focus.blur();
        debug!("combobox cleared");
        InteractionResult::handled()
    }

    /// Replaces the query text, as an input change event would.
    pub fn set_query(&mut self, text: &str, now: Instant) -> InteractionResult {
        if !self.is_open() {
            return InteractionResult::ignored();
        }
        if self.input.value() != text {
            self.input.set_value(text);
            self.query_changed(now);
        }
        self.focus.focus(0);
        InteractionResult::handled()
    }

    /// Editing keys go to the input. A key that edits while a result or the
    /// footer is focused brings focus back to the input first.
    pub fn input_key(&mut self, key: KeyEvent, now: Instant) -> InteractionResult {
        if !self.is_open() {
            return InteractionResult::ignored();
        }

        match self.input.handle_key(key) {
            KeyResult::Edited => {
                self.focus.focus(0);
                self.query_changed(now);
                InteractionResult::handled()
            }
            KeyResult::Moved => {
                self.focus.focus(0);
                InteractionResult::handled()
            }
            KeyResult::NotHandled => InteractionResult::ignored(),
        }
    }

    pub fn navigate(&mut self, direction: Direction) -> InteractionResult {
        let slot_count = self.slot_count();
        let from = self.focus.index();
        let Some(to) = self.focus.step(direction, slot_count) else {
            return InteractionResult::ignored();
        };
        trace!(?direction, ?from, to, slot_count, "focus moved");
        InteractionResult::handled()
    }

    /// Enter on a result or the footer selects it and closes the widget.
    pub fn activate(&mut self) -> InteractionResult {
        let selection = match self.focused_slot() {
            Some(Slot::Result(position)) => {
                let Some(text) = self
                    .results
                    .get(position)
                    .and_then(|item| self.candidates.get(item.index))
                else {
                    return InteractionResult::ignored();
                };
                Selection::Candidate {
                    text: text.to_string(),
                }
            }
            Some(Slot::SearchFooter) => {
                let query = self.query().to_string();
                Selection::Search {
                    target: format!("{}{}", self.options.search_target_prefix, query),
                    query,
                }
            }
            Some(Slot::Input) | None => return InteractionResult::ignored(),
        };

        self.focus.blur();
        debug!(?selection, "combobox selection");
        InteractionResult::selected(selection)
    }

    pub fn pointer_down(&mut self, target: PointerTarget, now: Instant) -> InteractionResult {
        match target {
            PointerTarget::Outside => {
                if !self.focus.blur() {
                    return InteractionResult::ignored();
                }
                debug!("combobox closed by outside press");
                InteractionResult::handled()
            }
            PointerTarget::ClearButton => self.clear(now),
            PointerTarget::Slot(index) if index < self.slot_count() => {
                self.focus.focus(index);
                InteractionResult::handled()
            }
            PointerTarget::Slot(_) | PointerTarget::Inside => InteractionResult::ignored(),
        }
    }

    /// Delivers a due debounced emission and recomputes the results from it.
    pub fn tick(&mut self, now: Instant) -> InteractionResult {
        if self.debouncer.poll(now).is_none() {
            return InteractionResult::ignored();
        }

        self.results = search::filter(
            self.candidates.as_slice(),
            self.debouncer.value(),
            self.options.max_results,
        );
        if self.focus.reconcile(self.slot_count()) {
            debug!("focused slot disappeared, focus returned to input");
        }
        debug!(
            query = self.debouncer.value().as_str(),
            results = self.results.len(),
            "results recomputed"
        );
        InteractionResult::handled()
    }

    pub fn view(&self) -> ComboboxView {
        let results = self
            .results
            .iter()
            .filter_map(|item| {
                self.candidates.get(item.index).map(|text| ResultItem {
                    text: text.to_string(),
                    highlight: item.range,
                })
            })
            .collect();

        ComboboxView {
            open: self.is_open(),
            query: self.query().to_string(),
            cursor: self.input.cursor_offset(),
            results,
            has_search_footer: self.has_search_footer(),
            focus: self.focus.index(),
        }
    }

    fn query_changed(&mut self, now: Instant) {
        self.debouncer
            .observe(self.input.value().to_string(), self.options.debounce, now);
        self.focus.reconcile(self.slot_count());
        trace!(query = self.input.value(), "query changed");
    }
}

#[cfg(test)]
mod tests {
    use super::{Combobox, ComboboxOptions, PointerTarget, Selection};
    use crate::data::CandidateSet;
    use crate::state::focus::Direction;
    use crate::state::slots::Slot;
    use crate::terminal::{KeyCode, KeyEvent};
    use std::time::{Duration, Instant};

    fn mounted() -> Combobox {
        Combobox::mount(CandidateSet::builtin(), ComboboxOptions::default())
    }

    fn settle(combobox: &mut Combobox, now: Instant) -> Instant {
        let later = now + Duration::from_millis(300);
        combobox.tick(later);
        later
    }

    fn type_text(combobox: &mut Combobox, text: &str, now: Instant) {
        for ch in text.chars() {
            combobox.input_key(KeyEvent::plain(KeyCode::Char(ch)), now);
        }
    }

    #[test]
    fn mounts_closed_with_default_results() {
        let combobox = mounted();
        assert!(!combobox.is_open());
        assert_eq!(combobox.focus_index(), None);
        assert_eq!(combobox.query(), "");
        assert_eq!(
            combobox.results(),
            vec!["Afghanistan", "Albania", "Algeria", "Andorra", "Angola"]
        );
        assert!(!combobox.has_search_footer());
    }

    #[test]
    fn open_focuses_input_even_from_a_result() {
        let mut combobox = mounted();
        combobox.open();
        combobox.navigate(Direction::Forward);
        combobox.navigate(Direction::Forward);
        assert_eq!(combobox.focus_index(), Some(2));

        combobox.open();
        assert_eq!(combobox.focus_index(), Some(0));
        assert_eq!(combobox.focused_slot(), Some(Slot::Input));
    }

    #[test]
    fn typing_while_closed_is_ignored() {
        let mut combobox = mounted();
        let now = Instant::now();
        let result = combobox.input_key(KeyEvent::plain(KeyCode::Char('a')), now);
        assert!(!result.request_render);
        assert_eq!(combobox.query(), "");
        assert!(!combobox.set_query("Gh", now).request_render);
        assert_eq!(combobox.next_deadline(), None);
    }

    #[test]
    fn results_follow_debounced_query_only() {
        let mut combobox = mounted();
        let now = Instant::now();
        combobox.open();
        type_text(&mut combobox, "Gh", now);

        assert_eq!(combobox.query(), "Gh");
        assert_eq!(combobox.debounced_query(), "");
        assert_eq!(combobox.result_count(), 5);
        assert!(combobox.has_search_footer());
        assert_eq!(combobox.slot_count(), 7);

        assert!(!combobox.tick(now + Duration::from_millis(249)).request_render);
        assert_eq!(combobox.result_count(), 5);

        assert!(combobox.tick(now + Duration::from_millis(250)).request_render);
        assert_eq!(combobox.results(), vec!["Afghanistan", "Ghana"]);
        assert_eq!(combobox.slot_count(), 4);
    }

    #[test]
    fn focus_past_shrunken_results_returns_to_input() {
        let mut combobox = mounted();
        let now = Instant::now();
        combobox.open();
        type_text(&mut combobox, "Gh", now);
        combobox.navigate(Direction::Backward);
        assert_eq!(combobox.focused_slot(), Some(Slot::SearchFooter));
        assert_eq!(combobox.focus_index(), Some(6));

        settle(&mut combobox, now);
        assert_eq!(combobox.focus_index(), Some(0));
        assert!(combobox.is_open());
    }

    #[test]
    fn escape_closes_from_any_slot() {
        let mut combobox = mounted();
        combobox.open();
        combobox.navigate(Direction::Forward);
        assert!(combobox.dismiss().request_render);
        assert!(!combobox.is_open());
        assert!(!combobox.dismiss().request_render);
        assert!(!combobox.navigate(Direction::Forward).request_render);
    }

    #[test]
    fn outside_press_closes_and_inside_press_does_not() {
        let mut combobox = mounted();
        let now = Instant::now();
        combobox.open();
        assert!(!combobox.pointer_down(PointerTarget::Inside, now).request_render);
        assert!(combobox.is_open());
        combobox.pointer_down(PointerTarget::Outside, now);
        assert!(!combobox.is_open());
    }

    #[test]
    fn pressing_a_slot_focuses_it() {
        let mut combobox = mounted();
        let now = Instant::now();
        combobox.pointer_down(PointerTarget::Slot(3), now);
        assert_eq!(combobox.focus_index(), Some(3));
        assert!(!combobox.pointer_down(PointerTarget::Slot(9), now).request_render);
        assert_eq!(combobox.focus_index(), Some(3));
    }

    #[test]
    fn clear_resets_query_and_closes() {
        let mut combobox = mounted();
        let now = Instant::now();
        combobox.open();
        type_text(&mut combobox, "Gh", now);
        let now = settle(&mut combobox, now);
        assert_eq!(combobox.result_count(), 2);

        combobox.pointer_down(PointerTarget::ClearButton, now);
        assert_eq!(combobox.query(), "");
        assert!(!combobox.is_open());
        assert!(!combobox.has_search_footer());

        settle(&mut combobox, now);
        assert_eq!(combobox.debounced_query(), "");
        assert_eq!(combobox.result_count(), 5);
    }

    #[test]
    fn editing_from_a_result_refocuses_input() {
        let mut combobox = mounted();
        let now = Instant::now();
        combobox.open();
        combobox.navigate(Direction::Forward);
        combobox.input_key(KeyEvent::plain(KeyCode::Char('u')), now);
        assert_eq!(combobox.focus_index(), Some(0));
        assert_eq!(combobox.query(), "u");
    }

    #[test]
    fn activation_selects_result_or_search() {
        let mut combobox = mounted();
        let now = Instant::now();
        combobox.open();
        type_text(&mut combobox, "gh", now);
        settle(&mut combobox, now);

        combobox.navigate(Direction::Forward);
        combobox.navigate(Direction::Forward);
        let result = combobox.activate();
        assert_eq!(
            result.selection,
            Some(Selection::Candidate {
                text: "Ghana".to_string()
            })
        );
        assert!(!combobox.is_open());

        combobox.open();
        combobox.navigate(Direction::Backward);
        assert_eq!(
            combobox.activate().selection,
            Some(Selection::Search {
                query: "gh".to_string(),
                target: "/search?q=gh".to_string(),
            })
        );

        combobox.open();
        assert_eq!(combobox.activate().selection, None);
        assert!(combobox.is_open());
    }

    #[test]
    fn empty_results_keep_input_and_footer() {
        let mut combobox = mounted();
        let now = Instant::now();
        combobox.open();
        type_text(&mut combobox, "xyz", now);
        settle(&mut combobox, now);

        assert_eq!(combobox.result_count(), 0);
        assert_eq!(combobox.slot_count(), 2);
        combobox.navigate(Direction::Forward);
        assert_eq!(combobox.focused_slot(), Some(Slot::SearchFooter));
        combobox.navigate(Direction::Forward);
        assert_eq!(combobox.focused_slot(), Some(Slot::Input));
    }

    #[test]
    fn view_reports_rendered_contract() {
        let mut combobox = mounted();
        let now = Instant::now();
        combobox.open();
        type_text(&mut combobox, "land", now);
        settle(&mut combobox, now);
        combobox.navigate(Direction::Forward);

        let view = combobox.view();
        assert!(view.open);
        assert_eq!(view.query, "land");
        assert_eq!(view.cursor, 4);
        assert_eq!(view.results.len(), 5);
        assert_eq!(view.results[0].text, "Finland");
        assert_eq!(view.results[0].highlight, Some((3, 7)));
        assert!(view.has_search_footer);
        assert_eq!(view.focus, Some(1));
    }

    #[test]
    fn unmount_drops_pending_emission() {
        let mut combobox = mounted();
        let now = Instant::now();
        combobox.open();
        type_text(&mut combobox, "a", now);
        assert!(combobox.next_deadline().is_some());
        combobox.unmount();
    }
}
