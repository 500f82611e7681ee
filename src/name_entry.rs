use crate::app::Transition;
use crate::consts;
use crate::util::{center_rect, get_display_area};
use crossterm::event::{read, Event, KeyCode, KeyModifiers};
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Margin, Position, Rect, Size},
    text::{Line, Span},
    widgets::{Block, Widget},
    Frame,
};
use unicode_properties::{GeneralCategory, GeneralCategoryGroup, UnicodeGeneralCategory};
use unicode_segmentation::UnicodeSegmentation;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Screen asking the player for a name to record with their high score
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct NameEntry {
    score: u32,
    name: String,
}

impl NameEntry {
    pub(crate) fn new(score: u32) -> NameEntry {
        NameEntry {
            score,
            name: String::new(),
        }
    }

    pub(crate) fn draw(&self, frame: &mut Frame<'_>) {
        frame.render_widget(self, frame.area());
        let text_area = self.areas(frame.area()).input.inner(Margin::new(1, 1));
        let width = u16::try_from(self.name.width()).unwrap_or(u16::MAX);
        frame.set_cursor_position(Position::new(
            text_area.x.saturating_add(width.min(consts::NAME_WIDTH - 1)),
            text_area.y,
        ));
    }

    pub(crate) fn process_input(&mut self) -> std::io::Result<Option<Transition>> {
        Ok(self.handle_event(read()?))
    }

    pub(crate) fn handle_event(&mut self, event: Event) -> Option<Transition> {
        let key = event.as_key_press_event()?;
        match (key.modifiers, key.code) {
            (KeyModifiers::CONTROL, KeyCode::Char('c')) => return Some(Transition::Quit),
            (_, KeyCode::Enter) => {
                let name = self.name.trim();
                let name = if name.is_empty() {
                    consts::ANONYMOUS
                } else {
                    name
                };
                return Some(Transition::Submit {
                    name: name.to_owned(),
                    score: self.score,
                });
            }
            (_, KeyCode::Backspace) => {
                if let Some((i, _)) = self.name.grapheme_indices(true).next_back() {
                    self.name.truncate(i);
                }
            }
            (m, KeyCode::Char(ch)) if m.difference(KeyModifiers::SHIFT).is_empty() => {
                self.push(ch);
            }
            _ => (),
        }
        None
    }

    /// Append `ch` to the name if it is printable and there is room for it
    fn push(&mut self, ch: char) {
        let printable = match ch.general_category_group() {
            GeneralCategoryGroup::Other => false,
            GeneralCategoryGroup::Separator => ch.general_category() == GeneralCategory::SpaceSeparator,
            _ => true,
        };
        let width = self.name.width() + ch.width().unwrap_or(0);
        if printable && width <= usize::from(consts::NAME_WIDTH) {
            self.name.push(ch);
        }
    }

    fn areas(&self, area: Rect) -> Areas {
        let display = get_display_area(area);
        let area = center_rect(display, Size::new(display.width, 10));
        let [title, _, score, _, prompt, input, _, hint] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .areas(area);
        let input = center_rect(input, Size::new(consts::NAME_WIDTH + 2, 3));
        Areas {
            title,
            score,
            prompt,
            input,
            hint,
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
struct Areas {
    title: Rect,
    score: Rect,
    prompt: Rect,
    input: Rect,
    hint: Rect,
}

impl Widget for &NameEntry {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let areas = self.areas(area);
        Line::from(Span::styled("New High Score!", consts::TITLE_STYLE))
            .centered()
            .render(areas.title, buf);
        Line::from(format!("Your Score: {}", self.score))
            .centered()
            .render(areas.score, buf);
        Line::from("Enter your name:")
            .centered()
            .render(areas.prompt, buf);
        let block = Block::bordered();
        let text_area = block.inner(areas.input);
        block.render(areas.input, buf);
        Line::from(self.name.as_str()).render(text_area, buf);
        Line::from_iter([
            Span::raw("Save ("),
            Span::styled("Enter", consts::KEY_STYLE),
            Span::raw(")"),
        ])
        .centered()
        .render(areas.hint, buf);
    }
}
