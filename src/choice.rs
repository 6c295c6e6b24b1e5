//! Filterable choice list behind every autocomplete field of the form.
//!
//! The list never owns the text of its field. The caller passes its current
//! value into [`ChoiceList::handle`] and applies the [`Effect::Change`]
//! requests it gets back; the list only mirrors that value to know when the
//! filtered rows must be recomputed.

use crate::{Matcher, SubstringMatcher};

/// Navigation keys the list reacts to while it is open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavKey {
    Down,
    Up,
    Enter,
    Escape,
}

/// Everything that can happen to an autocomplete field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChoiceEvent {
    /// The text input received focus.
    Focus,
    /// The user edited the text; carries the whole new text.
    Edit(String),
    Key(NavKey),
    /// The pointer moved over a row of the filtered list.
    Hover(usize),
    /// A row of the filtered list was clicked.
    Click(usize),
    /// A pointer went down somewhere outside both the input and the list.
    PointerDownOutside,
    /// The clear control was activated.
    Clear,
}

/// Requests for the host, in the order they should be applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Replace the field value. The host decides whether to accept it.
    Change(String),
    /// Put the keyboard focus back on the text input.
    FocusInput,
    /// The key was handled here and must not reach the enclosing form.
    Consumed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Row<'a> {
    pub text: &'a str,
    pub highlighted: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListView<'a> {
    Hidden,
    NoResults,
    Rows(Vec<Row<'a>>),
}

/// Render snapshot of a choice list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChoiceView<'a> {
    pub list: ListView<'a>,
    pub show_clear: bool,
}

pub struct ChoiceList {
    candidates: Vec<String>,
    matcher: Box<dyn Matcher>,
    query: String,
    filtered: Vec<usize>,
    open: bool,
    highlight: Option<usize>,
}

impl ChoiceList {
    pub fn new(candidates: Vec<String>) -> Self {
        Self::with_matcher(candidates, Box::new(SubstringMatcher))
    }

    pub fn with_matcher(candidates: Vec<String>, matcher: Box<dyn Matcher>) -> Self {
        let filtered = (0..candidates.len()).collect();

        Self {
            candidates,
            matcher,
            query: String::new(),
            filtered,
            open: false,
            highlight: None,
        }
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn candidates(&self) -> &[String] {
        &self.candidates
    }

    /// Highlighted row of the filtered list, if any.
    pub fn highlight(&self) -> Option<usize> {
        self.highlight
    }

    /// Highlighted row as an integer where `-1` means no highlight.
    pub fn highlight_index(&self) -> isize {
        self.highlight.map_or(-1, |row| row as isize)
    }

    pub fn filtered(&self) -> impl Iterator<Item = &str> + '_ {
        self.filtered.iter().map(|&idx| self.candidates[idx].as_str())
    }

    pub fn filtered_len(&self) -> usize {
        self.filtered.len()
    }

    /// Replaces the candidate set, recomputing the filtered rows if it changed.
    pub fn set_candidates(&mut self, candidates: Vec<String>) {
        if candidates != self.candidates {
            self.candidates = candidates;
            self.refilter();
        }
    }

    /// Mirrors the value owned by the caller, recomputing the filtered rows if
    /// it changed since the last call.
    pub fn sync(&mut self, value: &str) {
        if value != self.query {
            self.query = value.to_string();
            self.refilter();
        }
    }

    pub fn handle(&mut self, value: &str, event: ChoiceEvent) -> Vec<Effect> {
        self.sync(value);

        match event {
            ChoiceEvent::Focus => {
                self.open = true;
                Vec::new()
            }

            ChoiceEvent::Edit(text) => {
                self.open = true;
                self.sync(&text);
                vec![Effect::Change(text)]
            }

            ChoiceEvent::Key(_) if !self.open => Vec::new(),

            ChoiceEvent::Key(NavKey::Down) => {
                let last = self.filtered.len().checked_sub(1);
                self.highlight = match (self.highlight, last) {
                    (_, None) => None,
                    (None, Some(_)) => Some(0),
                    (Some(row), Some(last)) => Some((row + 1).min(last)),
                };
                vec![Effect::Consumed]
            }

            ChoiceEvent::Key(NavKey::Up) => {
                self.highlight = self.highlight.and_then(|row| row.checked_sub(1));
                vec![Effect::Consumed]
            }

            ChoiceEvent::Key(NavKey::Enter) => {
                let mut effects = match self.highlight {
                    Some(row) if row < self.filtered.len() => self.select(row),
                    _ => Vec::new(),
                };
                effects.push(Effect::Consumed);
                effects
            }

            ChoiceEvent::Key(NavKey::Escape) => {
                self.close();
                vec![Effect::Consumed]
            }

            ChoiceEvent::Hover(row) => {
                if self.open && row < self.filtered.len() {
                    self.highlight = Some(row);
                }
                Vec::new()
            }

            ChoiceEvent::Click(row) => {
                if self.open && row < self.filtered.len() {
                    self.select(row)
                } else {
                    Vec::new()
                }
            }

            ChoiceEvent::PointerDownOutside => {
                self.close();
                Vec::new()
            }

            ChoiceEvent::Clear => {
                self.open = true;
                self.sync("");
                vec![Effect::Change(String::new()), Effect::FocusInput]
            }
        }
    }

    pub fn view(&self) -> ChoiceView<'_> {
        let list = if !self.open {
            ListView::Hidden
        } else if self.filtered.is_empty() {
            ListView::NoResults
        } else {
            ListView::Rows(
                self.filtered()
                    .enumerate()
                    .map(|(row, text)| Row {
                        text,
                        highlighted: self.highlight == Some(row),
                    })
                    .collect(),
            )
        };

        ChoiceView {
            list,
            show_clear: self.open && !self.query.is_empty(),
        }
    }

    fn select(&mut self, row: usize) -> Vec<Effect> {
        let text = self.candidates[self.filtered[row]].clone();
        self.sync(&text);
        self.close();
        vec![Effect::Change(text)]
    }

    fn close(&mut self) {
        self.open = false;
        self.highlight = None;
    }

    fn refilter(&mut self) {
        self.filtered = self.matcher.matches(&self.query, &self.candidates);
        self.highlight = None;
    }
}

/// Last value requested by a batch of effects.
pub fn requested_change(effects: &[Effect]) -> Option<&str> {
    effects.iter().rev().find_map(|effect| match effect {
        Effect::Change(value) => Some(value.as_str()),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn emails() -> Vec<String> {
        ["ana@example.com", "bruno@escola.pt", "carla@example.com", "diana@escola.pt"]
            .into_iter()
            .map(String::from)
            .collect()
    }

    /// Caller-owned value plus the list, the way a form field drives it.
    struct Field {
        value: String,
        list: ChoiceList,
    }

    impl Field {
        fn new() -> Self {
            Self { value: String::new(), list: ChoiceList::new(emails()) }
        }

        fn send(&mut self, event: ChoiceEvent) -> Vec<Effect> {
            let effects = self.list.handle(&self.value, event);
            if let Some(value) = requested_change(&effects) {
                self.value = value.to_string();
            }
            effects
        }

        fn rows(&self) -> Vec<&str> {
            self.list.filtered().collect()
        }
    }

    #[test]
    fn starts_closed_with_every_candidate() {
        let field = Field::new();
        assert!(!field.list.is_open());
        assert_eq!(field.rows(), emails());
        assert_eq!(field.list.view().list, ListView::Hidden);
    }

    #[test]
    fn focus_and_typing_open_the_list() {
        let mut field = Field::new();
        field.send(ChoiceEvent::Focus);
        assert!(field.list.is_open());

        let mut field = Field::new();
        let effects = field.send(ChoiceEvent::Edit("ESCOLA".into()));
        assert!(field.list.is_open());
        assert_eq!(effects, vec![Effect::Change("ESCOLA".into())]);
        assert_eq!(field.rows(), vec!["bruno@escola.pt", "diana@escola.pt"]);
    }

    #[test]
    fn every_recomputation_resets_the_highlight() {
        let mut field = Field::new();
        field.send(ChoiceEvent::Focus);
        field.send(ChoiceEvent::Key(NavKey::Down));
        field.send(ChoiceEvent::Key(NavKey::Down));
        assert_eq!(field.list.highlight_index(), 1);

        field.send(ChoiceEvent::Edit("a".into()));
        assert_eq!(field.list.highlight_index(), -1);

        field.send(ChoiceEvent::Key(NavKey::Down));
        field.list.set_candidates(vec!["x".into(), "ya".into()]);
        assert_eq!(field.list.highlight_index(), -1);
        assert_eq!(field.rows(), vec!["ya"]);
    }

    #[test]
    fn caller_side_changes_are_picked_up_on_the_next_event() {
        let mut field = Field::new();
        field.send(ChoiceEvent::Focus);
        field.send(ChoiceEvent::Key(NavKey::Down));

        field.value = "carla".into();
        field.list.sync(&field.value);
        assert_eq!(field.rows(), vec!["carla@example.com"]);
        assert_eq!(field.list.highlight(), None);
    }

    #[test]
    fn arrow_down_saturates_at_the_last_row() {
        let mut field = Field::new();
        field.send(ChoiceEvent::Edit("escola".into()));

        for expected in [0, 1, 1, 1] {
            field.send(ChoiceEvent::Key(NavKey::Down));
            assert_eq!(field.list.highlight_index(), expected);
        }
    }

    #[test]
    fn arrow_up_stops_at_no_highlight() {
        let mut field = Field::new();
        field.send(ChoiceEvent::Focus);
        field.send(ChoiceEvent::Key(NavKey::Down));
        field.send(ChoiceEvent::Key(NavKey::Down));

        for expected in [0, -1, -1] {
            field.send(ChoiceEvent::Key(NavKey::Up));
            assert_eq!(field.list.highlight_index(), expected);
        }
    }

    #[test]
    fn arrows_stay_in_range_for_any_key_sequence() {
        let keys = [NavKey::Down, NavKey::Up];
        for query in ["", "a", "escola", "zzz"] {
            let mut field = Field::new();
            field.send(ChoiceEvent::Edit(query.into()));

            for step in 0..40usize {
                field.send(ChoiceEvent::Key(keys[(step * 7 / 3) % 2]));
                let idx = field.list.highlight_index();
                assert!(idx >= -1 && idx < field.list.filtered_len() as isize, "{query:?} {idx}");
            }
        }
    }

    #[test]
    fn arrows_do_nothing_on_an_empty_list() {
        let mut field = Field::new();
        field.send(ChoiceEvent::Edit("zzz".into()));
        field.send(ChoiceEvent::Key(NavKey::Down));
        assert_eq!(field.list.highlight_index(), -1);
        assert_eq!(field.list.view().list, ListView::NoResults);
    }

    #[test]
    fn enter_selects_the_highlighted_row() {
        let mut field = Field::new();
        field.send(ChoiceEvent::Edit("EXAMPLE".into()));
        field.send(ChoiceEvent::Key(NavKey::Down));
        field.send(ChoiceEvent::Key(NavKey::Down));

        let effects = field.send(ChoiceEvent::Key(NavKey::Enter));
        assert_eq!(
            effects,
            vec![Effect::Change("carla@example.com".into()), Effect::Consumed]
        );
        assert_eq!(field.value, "carla@example.com");
        assert!(!field.list.is_open());
        assert_eq!(field.list.highlight_index(), -1);
    }

    #[test]
    fn enter_without_highlight_changes_nothing_but_swallows_the_key() {
        let mut field = Field::new();
        field.send(ChoiceEvent::Edit("ana".into()));

        let effects = field.send(ChoiceEvent::Key(NavKey::Enter));
        assert_eq!(effects, vec![Effect::Consumed]);
        assert_eq!(field.value, "ana");
        assert!(field.list.is_open());
    }

    #[test]
    fn keys_are_ignored_while_closed() {
        let mut field = Field::new();
        assert_eq!(field.send(ChoiceEvent::Key(NavKey::Down)), Vec::<Effect>::new());
        assert_eq!(field.send(ChoiceEvent::Key(NavKey::Enter)), Vec::<Effect>::new());
        assert_eq!(field.list.highlight_index(), -1);
    }

    #[test]
    fn escape_closes_and_clears_the_highlight() {
        let mut field = Field::new();
        field.send(ChoiceEvent::Edit("a".into()));
        field.send(ChoiceEvent::Key(NavKey::Down));

        field.send(ChoiceEvent::Key(NavKey::Escape));
        assert!(!field.list.is_open());
        assert_eq!(field.list.highlight_index(), -1);
        assert_eq!(field.value, "a");
    }

    #[test]
    fn hover_and_keyboard_share_one_cursor() {
        let mut field = Field::new();
        field.send(ChoiceEvent::Focus);
        field.send(ChoiceEvent::Hover(2));
        assert_eq!(field.list.highlight_index(), 2);

        field.send(ChoiceEvent::Key(NavKey::Down));
        assert_eq!(field.list.highlight_index(), 3);

        field.send(ChoiceEvent::Hover(17));
        assert_eq!(field.list.highlight_index(), 3);
    }

    #[test]
    fn clicking_a_row_selects_it() {
        let mut field = Field::new();
        field.send(ChoiceEvent::Edit("escola".into()));

        let effects = field.send(ChoiceEvent::Click(1));
        assert_eq!(effects, vec![Effect::Change("diana@escola.pt".into())]);
        assert_eq!(field.value, "diana@escola.pt");
        assert!(!field.list.is_open());
        assert_eq!(field.rows(), vec!["diana@escola.pt"]);
    }

    #[test]
    fn outside_click_closes_without_touching_the_value() {
        let mut field = Field::new();
        field.send(ChoiceEvent::Edit("bru".into()));

        let effects = field.send(ChoiceEvent::PointerDownOutside);
        assert!(effects.is_empty());
        assert!(!field.list.is_open());
        assert_eq!(field.value, "bru");
    }

    #[test]
    fn clear_empties_the_value_and_stays_open() {
        let mut field = Field::new();
        field.send(ChoiceEvent::Edit("bru".into()));
        assert!(field.list.view().show_clear);

        let effects = field.send(ChoiceEvent::Clear);
        assert_eq!(effects, vec![Effect::Change(String::new()), Effect::FocusInput]);
        assert_eq!(field.value, "");
        assert!(field.list.is_open());
        assert_eq!(field.rows(), emails());
        assert!(!field.list.view().show_clear);
    }

    #[test]
    fn view_marks_the_highlighted_row() {
        let mut field = Field::new();
        field.send(ChoiceEvent::Edit("escola".into()));
        field.send(ChoiceEvent::Key(NavKey::Down));

        assert_eq!(
            field.list.view(),
            ChoiceView {
                list: ListView::Rows(vec![
                    Row { text: "bruno@escola.pt", highlighted: true },
                    Row { text: "diana@escola.pt", highlighted: false },
                ]),
                show_clear: true,
            }
        );
    }
}
