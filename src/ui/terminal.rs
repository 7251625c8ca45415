use std::io;

use anyhow::Result;
use ratatui::Terminal;
use ratatui::backend::Backend;
use ratatui::crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::model::Candidate;
use crate::state::{Input, SelectionState, Transition};
use crate::ui::render::Renderer;

/// Runs the launcher on the real terminal until the user confirms or cancels.
pub fn run(state: &mut SelectionState, renderer: &mut Renderer) -> Result<Option<Candidate>> {
    let mut terminal = ratatui::init();
    let result = drive(&mut terminal, state, renderer, std::iter::repeat_with(event::read));
    ratatui::restore();
    result
}

/// One event is fully handled and redrawn before the next is read. Returns
/// `None` on cancel or when `events` runs dry.
pub fn drive<B, I>(
    terminal: &mut Terminal<B>,
    state: &mut SelectionState,
    renderer: &mut Renderer,
    events: I,
) -> Result<Option<Candidate>>
where
    B: Backend,
    I: IntoIterator<Item = io::Result<Event>>,
{
    terminal.draw(|frame| renderer.draw(frame, state))?;

    for event in events {
        let key = match event? {
            Event::Key(key) => key,
            Event::Resize(..) => {
                terminal.draw(|frame| renderer.draw(frame, state))?;
                continue;
            }
            _ => continue,
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }
        let Some(input) = map_key(key) else {
            continue;
        };

        match state.handle(input) {
            Transition::Continue => {}
            Transition::Confirmed(candidate) => return Ok(Some(candidate)),
            Transition::Cancelled => return Ok(None),
        }
        terminal.draw(|frame| renderer.draw(frame, state))?;
    }

    Ok(None)
}

pub fn map_key(key: KeyEvent) -> Option<Input> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Char('c') if ctrl => Some(Input::Cancel),
        KeyCode::Char('h') if ctrl => Some(Input::Backspace),
        KeyCode::Char(_) if ctrl || key.modifiers.contains(KeyModifiers::ALT) => None,
        KeyCode::Char(ch) => Some(Input::Char(ch)),
        KeyCode::Backspace => Some(Input::Backspace),
        KeyCode::Up => Some(Input::Up),
        KeyCode::Down => Some(Input::Down),
        KeyCode::PageUp => Some(Input::PageUp),
        KeyCode::PageDown => Some(Input::PageDown),
        KeyCode::Enter => Some(Input::Confirm),
        KeyCode::Esc => Some(Input::Cancel),
        _ => None,
    }
}
