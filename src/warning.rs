use crate::command::Command;
use crate::consts;
use crate::util::center_rect;
use crossterm::event::Event;
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Margin, Rect, Size},
    text::{Line, Span, Text},
    widgets::{
        Block, Clear, Scrollbar, ScrollbarOrientation, ScrollbarState, StatefulWidget, Widget,
    },
};
use std::borrow::Cow;
use std::error::Error;

/// A pop-up reporting an error that the game carried on past.  The error is
/// shown along with everything in its `source()` chain.
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct Warning {
    lines: Vec<String>,
    /// Index of the first line in view
    top: usize,
}

impl Warning {
    const VISIBLE_LINES: usize = 14;
    const TEXT_WIDTH: u16 = 50;

    /// Lay out an error message followed by the messages of its causes,
    /// outermost first
    fn new<I: IntoIterator<Item = String>>(messages: I) -> Warning {
        let mut messages = messages.into_iter();
        let mut lines = Vec::new();
        if let Some(msg) = messages.next() {
            wrap_into(&mut lines, &msg, "", "");
        }
        let causes = messages.collect::<Vec<_>>();
        if !causes.is_empty() {
            lines.push(String::new());
            lines.push(String::from("Caused by:"));
        }
        if let [cause] = causes.as_slice() {
            wrap_into(&mut lines, cause, "    ", "    ");
        } else {
            for (i, cause) in causes.iter().enumerate() {
                wrap_into(&mut lines, cause, &format!("{i:>4}: "), "      ");
            }
        }
        Warning { lines, top: 0 }
    }

    pub(crate) fn handle_event(&mut self, event: Event) -> Option<WarningOutcome> {
        match Command::from_key_event(event.as_key_press_event()?)? {
            Command::Enter | Command::Esc => return Some(WarningOutcome::Dismissed),
            Command::Quit => return Some(WarningOutcome::Quit),
            Command::Up => self.top = self.top.saturating_sub(1),
            Command::Down => self.top = (self.top + 1).min(self.max_top()),
            Command::Home => self.top = 0,
            Command::End => self.top = self.max_top(),
            _ => (),
        }
        None
    }

    fn scrollable(&self) -> bool {
        self.lines.len() > Warning::VISIBLE_LINES
    }

    fn max_top(&self) -> usize {
        self.lines.len().saturating_sub(Warning::VISIBLE_LINES)
    }
}

fn wrap_into(lines: &mut Vec<String>, text: &str, first_indent: &str, rest_indent: &str) {
    let opts = textwrap::Options::new(usize::from(Warning::TEXT_WIDTH))
        .break_words(true)
        .initial_indent(first_indent)
        .subsequent_indent(rest_indent);
    lines.extend(textwrap::wrap(text, opts).into_iter().map(Cow::into_owned));
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum WarningOutcome {
    Dismissed,
    Quit,
}

impl<E: Error> From<E> for Warning {
    fn from(e: E) -> Warning {
        let outermost: &dyn Error = &e;
        let chain = std::iter::successors(Some(outermost), |&err| err.source());
        Warning::new(chain.map(ToString::to_string))
    }
}

impl Widget for &Warning {
    // `area` is the whole display; the pop-up centers itself within it.
    fn render(self, area: Rect, buf: &mut Buffer) {
        let text_height =
            u16::try_from(self.lines.len().min(Warning::VISIBLE_LINES)).unwrap_or(u16::MAX);
        let scrollbar_width = if self.scrollable() { 2 } else { 0 };
        let popup = center_rect(
            area,
            Size::new(
                Warning::TEXT_WIDTH + 4 + scrollbar_width,
                text_height.saturating_add(4),
            ),
        );
        Clear.render(popup, buf);
        Block::bordered()
            .title(Line::from(" WARNING ").centered())
            .render(popup, buf);
        let [body_area, _, hint_area] = Layout::vertical([
            Constraint::Length(text_height),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .areas(popup.inner(Margin::new(2, 1)));
        let text_area = if self.scrollable() {
            let [text_area, _, scrollbar_area] = Layout::horizontal([
                Constraint::Length(Warning::TEXT_WIDTH),
                Constraint::Length(1),
                Constraint::Length(1),
            ])
            .areas(body_area);
            let mut state = ScrollbarState::new(self.max_top()).position(self.top);
            Scrollbar::new(ScrollbarOrientation::VerticalRight)
                .track_symbol(Some(ratatui::symbols::shade::MEDIUM))
                .render(scrollbar_area, buf, &mut state);
            text_area
        } else {
            body_area
        };
        Text::from_iter(
            self.lines
                .iter()
                .skip(self.top)
                .take(Warning::VISIBLE_LINES)
                .map(String::as_str),
        )
        .render(text_area, buf);
        Line::from_iter([
            Span::raw("Dismiss ("),
            Span::styled("Enter", consts::KEY_STYLE),
            Span::raw(")"),
        ])
        .centered()
        .render(hint_area, buf);
    }
}
