use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::symbols::border;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::config::ThemeConfig;
use crate::sources::desktop::clean_text;
use crate::state::SelectionState;

const PROMPT: &str = "filter: ";
const LABEL: &str = " tlaunch ";
const MIN_PANE_WIDTH: u16 = 20;

struct Palette {
    prompt: Color,
    exec: Color,
    status_fg: Color,
    status_bg: Color,
}

impl From<&ThemeConfig> for Palette {
    fn from(theme: &ThemeConfig) -> Self {
        Self {
            prompt: ThemeConfig::parse_color(&theme.prompt),
            exec: ThemeConfig::parse_color(&theme.exec),
            status_fg: ThemeConfig::parse_color(&theme.status_fg),
            status_bg: ThemeConfig::parse_color(&theme.status_bg),
        }
    }
}

/// Draws a [`SelectionState`]. Only the list scroll offset lives here; the
/// state itself is never modified.
pub struct Renderer {
    palette: Palette,
    list_state: ListState,
}

impl Renderer {
    pub fn new(theme: &ThemeConfig) -> Self {
        Self {
            palette: Palette::from(theme),
            list_state: ListState::default(),
        }
    }

    pub fn draw(&mut self, frame: &mut Frame, state: &SelectionState) {
        let [input, body, _footer, status] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Min(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .areas(frame.area());

        self.draw_input(frame, input, state);
        self.draw_body(frame, body, state);
        self.draw_status(frame, status, state);
    }

    fn draw_input(&self, frame: &mut Frame, area: Rect, state: &SelectionState) {
        let prompt_width = PROMPT.width() as u16;
        let room = (area.width.saturating_sub(prompt_width + 1)) as usize;
        let query = tail(state.query(), room);
        let cursor_x = area.x + prompt_width + query.width() as u16;

        let line = Line::from(vec![
            Span::styled(
                PROMPT,
                Style::default().fg(self.palette.prompt).add_modifier(Modifier::BOLD),
            ),
            Span::raw(query),
        ]);
        frame.render_widget(Paragraph::new(line), area);
        frame.set_cursor_position((cursor_x.min(area.right().saturating_sub(1)), area.y));
    }

    fn draw_body(&mut self, frame: &mut Frame, area: Rect, state: &SelectionState) {
        let [list_area, preview_area] =
            Layout::horizontal([Constraint::Length(list_width(area.width)), Constraint::Fill(1)])
                .areas(area);

        if state.matches().is_empty() {
            self.list_state.select(None);
            frame.render_widget(Paragraph::new(" nothing found"), list_area);
        } else {
            let items: Vec<ListItem> = state
                .matches()
                .iter()
                .map(|m| ListItem::new(format!(" {}", m.candidate.name)))
                .collect();
            let list = List::new(items).highlight_style(Style::default().add_modifier(Modifier::REVERSED));
            self.list_state.select(Some(state.selected_index()));
            frame.render_stateful_widget(list, list_area, &mut self.list_state);
        }

        let separator = border::Set {
            vertical_left: "|",
            ..border::PLAIN
        };
        let block = Block::default().borders(Borders::LEFT).border_set(separator);
        let exec = state.selected().map(|c| c.exec.as_str()).unwrap_or("-");
        let preview = Paragraph::new(format!(" {exec}"))
            .style(Style::default().fg(self.palette.exec))
            .wrap(Wrap { trim: false })
            .block(block);
        frame.render_widget(preview, preview_area);
    }

    fn draw_status(&self, frame: &mut Frame, area: Rect, state: &SelectionState) {
        let style = Style::default()
            .fg(self.palette.status_fg)
            .bg(self.palette.status_bg)
            .add_modifier(Modifier::BOLD);

        let exec = state
            .selected()
            .map(|c| clean_text(&c.exec))
            .filter(|e| !e.is_empty())
            .unwrap_or_else(|| "-".to_string());
        let label_width = LABEL.width();
        let room = (area.width as usize).saturating_sub(label_width + 4);
        let exec = truncate(&exec, room);

        let pad = (area.width as usize)
            .saturating_sub(1 + label_width + exec.width() + 2)
            .max(1);
        let line = Line::from(vec![
            Span::raw(" "),
            Span::raw(LABEL),
            Span::raw(" ".repeat(pad)),
            Span::raw(exec),
        ]);
        frame.render_widget(Paragraph::new(line).style(style), area);
    }
}

/// About 45% of the width, never narrower than 20 columns unless the
/// screen is, and leaving 20 columns for the preview when possible.
fn list_width(total: u16) -> u16 {
    let wanted = (total as u32 * 45 / 100) as u16;
    wanted
        .max(MIN_PANE_WIDTH)
        .min(total.saturating_sub(MIN_PANE_WIDTH).max(MIN_PANE_WIDTH))
        .min(total)
}

/// Cuts `text` to `max` columns, marking the cut with `...` when it fits.
fn truncate(text: &str, max: usize) -> String {
    if text.width() <= max {
        return text.to_string();
    }
    let (budget, suffix) = if max >= 4 { (max - 3, "...") } else { (max, "") };
    let mut out = String::new();
    let mut used = 0;
    for ch in text.chars() {
        let w = ch.width().unwrap_or(0);
        if used + w > budget {
            break;
        }
        used += w;
        out.push(ch);
    }
    out.push_str(suffix);
    out
}

/// Last `max` columns of `text`, so the cursor end of a long query stays visible.
fn tail(text: &str, max: usize) -> String {
    let mut used = 0;
    let mut chars = Vec::new();
    for ch in text.chars().rev() {
        let w = ch.width().unwrap_or(0);
        if used + w > max {
            break;
        }
        used += w;
        chars.push(ch);
    }
    chars.into_iter().rev().collect()
}
