use crate::matcher;
use crate::model::{Candidate, RankedMatch};
use crate::sources::desktop::is_printable;

/// Rows moved by a page up / page down.
pub const PAGE_STEP: usize = 10;

/// A discrete user input, already decoded from the terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Input {
    Char(char),
    Backspace,
    Up,
    Down,
    PageUp,
    PageDown,
    Confirm,
    Cancel,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    Continue,
    Confirmed(Candidate),
    Cancelled,
}

/// Query text, the ranked list it produces and the highlighted row.
///
/// The ranked list is always rebuilt from the full candidate set after a
/// query edit. `selected_index` stays within the list bounds, and is `0`
/// when the list is empty.
pub struct SelectionState {
    candidates: Vec<Candidate>,
    query: String,
    matches: Vec<RankedMatch>,
    selected_index: usize,
}

impl SelectionState {
    pub fn new(candidates: Vec<Candidate>) -> Self {
        Self::with_query(candidates, "")
    }

    pub fn with_query(candidates: Vec<Candidate>, query: &str) -> Self {
        let mut state = Self {
            candidates,
            query: query.to_string(),
            matches: Vec::new(),
            selected_index: 0,
        };
        state.update_filter();
        state
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn matches(&self) -> &[RankedMatch] {
        &self.matches
    }

    pub fn selected_index(&self) -> usize {
        self.selected_index
    }

    pub fn candidate_count(&self) -> usize {
        self.candidates.len()
    }

    pub fn selected(&self) -> Option<&Candidate> {
        self.matches.get(self.selected_index).map(|m| &m.candidate)
    }

    pub fn handle(&mut self, input: Input) -> Transition {
        match input {
            Input::Char(ch) => {
                // Every printable character is query text, including ones
                // other launchers treat as quit keys.
                if is_printable(ch) {
                    self.query.push(ch);
                    self.update_filter();
                }
            }
            Input::Backspace => {
                if self.query.pop().is_some() {
                    self.update_filter();
                }
            }
            Input::Up => self.move_selection(-1),
            Input::Down => self.move_selection(1),
            Input::PageUp => self.move_selection(-(PAGE_STEP as isize)),
            Input::PageDown => self.move_selection(PAGE_STEP as isize),
            Input::Confirm => {
                if let Some(candidate) = self.selected() {
                    return Transition::Confirmed(candidate.clone());
                }
            }
            Input::Cancel => return Transition::Cancelled,
        }
        Transition::Continue
    }

    fn update_filter(&mut self) {
        self.matches = matcher::rank(&self.query, &self.candidates);
        self.selected_index = self.selected_index.min(self.last_index());
        log::debug!(
            "SelectionState: query='{}', filtered_count={}, selected={}",
            self.query,
            self.matches.len(),
            self.selected_index
        );
    }

    fn move_selection(&mut self, delta: isize) {
        self.selected_index = self
            .selected_index
            .saturating_add_signed(delta)
            .min(self.last_index());
    }

    fn last_index(&self) -> usize {
        self.matches.len().saturating_sub(1)
    }
}
