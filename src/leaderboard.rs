use crate::app::Transition;
use crate::command::Command;
use crate::consts;
use crate::highscores::HighScoreEntry;
use crate::util::{center_rect, get_display_area};
use crossterm::event::{read, Event};
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect, Size},
    text::{Line, Span},
    widgets::Widget,
    Frame,
};

/// Screen shown after a game: the player's score, the best scores on
/// record, and a choice between playing again and quitting
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct Leaderboard {
    score: u32,
    entries: Vec<HighScoreEntry>,
}

impl Leaderboard {
    pub(crate) fn new(score: u32, entries: Vec<HighScoreEntry>) -> Leaderboard {
        Leaderboard { score, entries }
    }

    pub(crate) fn draw(&self, frame: &mut Frame<'_>) {
        frame.render_widget(self, frame.area());
    }

    pub(crate) fn process_input(&mut self) -> std::io::Result<Option<Transition>> {
        Ok(self.handle_event(read()?))
    }

    pub(crate) fn handle_event(&mut self, event: Event) -> Option<Transition> {
        match Command::from_key_event(event.as_key_press_event()?)? {
            Command::R | Command::Enter => Some(Transition::Restart),
            Command::Q | Command::Quit => Some(Transition::Quit),
            _ => None,
        }
    }
}

impl Widget for &Leaderboard {
    /*
     *              Your Score: 12
     *
     *               Leaderboard
     *              1. Bob: 30
     *              2. Alice: 12
     *
     *       Restart (r) — Quit (q)
     */

    fn render(self, area: Rect, buf: &mut Buffer) {
        let display = get_display_area(area);
        let rows = u16::try_from(self.entries.len()).unwrap_or(u16::MAX).max(1);
        let area = center_rect(display, Size::new(display.width, rows.saturating_add(5)));
        let [score_area, _, title_area, entries_area, _, hint_area] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(rows),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .areas(area);
        Line::from(format!("Your Score: {}", self.score))
            .centered()
            .render(score_area, buf);
        Line::from(Span::styled("Leaderboard", consts::TITLE_STYLE))
            .centered()
            .render(title_area, buf);
        if self.entries.is_empty() {
            Line::from("No high scores yet")
                .centered()
                .render(entries_area, buf);
        }
        for ((i, entry), row) in self.entries.iter().enumerate().zip(entries_area.rows()) {
            Line::from(format!("{}. {}: {}", i + 1, entry.name, entry.score))
                .centered()
                .render(row, buf);
        }
        Line::from_iter([
            Span::raw("Restart ("),
            Span::styled("r", consts::KEY_STYLE),
            Span::raw(") — Quit ("),
            Span::styled("q", consts::KEY_STYLE),
            Span::raw(")"),
        ])
        .centered()
        .render(hint_area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case(KeyEvent::new(KeyCode::Char('r'), KeyModifiers::NONE), Some(Transition::Restart))]
    #[case(KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE), Some(Transition::Restart))]
    #[case(KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE), Some(Transition::Quit))]
    #[case(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL), Some(Transition::Quit))]
    #[case(KeyEvent::new(KeyCode::Char('x'), KeyModifiers::NONE), None)]
    #[case(KeyEvent::new(KeyCode::Up, KeyModifiers::NONE), None)]
    fn test_handle_event(#[case] key: KeyEvent, #[case] outcome: Option<Transition>) {
        let mut board = Leaderboard::new(3, Vec::new());
        assert_eq!(board.handle_event(Event::Key(key)), outcome);
    }

    #[test]
    fn render() {
        let board = Leaderboard::new(
            12,
            vec![
                HighScoreEntry::new("Bob", 30),
                HighScoreEntry::new("Alice", 12),
                HighScoreEntry::new("Dee", 9),
            ],
        );
        let area = Rect::new(0, 0, 80, 24);
        let mut buffer = Buffer::empty(area);
        board.render(area, &mut buffer);
        let mut expected = Buffer::with_lines([
            "",
            "",
            "",
            "",
            "",
            "",
            "",
            "",
            "                                 Your Score: 12                                 ",
            "",
            "                                  Leaderboard                                   ",
            "                                   1. Bob: 30                                   ",
            "                                  2. Alice: 12                                  ",
            "                                   3. Dee: 9                                    ",
            "",
            "                             Restart (r) — Quit (q)                             ",
            "",
            "",
            "",
            "",
            "",
            "",
            "",
            "",
        ]);
        expected.set_style(Rect::new(34, 10, 11, 1), consts::TITLE_STYLE);
        expected.set_style(Rect::new(38, 15, 1, 1), consts::KEY_STYLE);
        expected.set_style(Rect::new(49, 15, 1, 1), consts::KEY_STYLE);
        assert_eq!(buffer, expected);
    }

    #[test]
    fn render_empty() {
        let board = Leaderboard::new(2, Vec::new());
        let area = Rect::new(0, 0, 80, 24);
        let mut buffer = Buffer::empty(area);
        board.render(area, &mut buffer);
        let mut expected = Buffer::with_lines([
            "",
            "",
            "",
            "",
            "",
            "",
            "",
            "",
            "",
            "                                 Your Score: 2                                  ",
            "",
            "                                  Leaderboard                                   ",
            "                               No high scores yet                               ",
            "",
            "                             Restart (r) — Quit (q)                             ",
            "",
            "",
            "",
            "",
            "",
            "",
            "",
            "",
            "",
        ]);
        expected.set_style(Rect::new(34, 11, 11, 1), consts::TITLE_STYLE);
        expected.set_style(Rect::new(38, 14, 1, 1), consts::KEY_STYLE);
        expected.set_style(Rect::new(49, 14, 1, 1), consts::KEY_STYLE);
        assert_eq!(buffer, expected);
    }
}
