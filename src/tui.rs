//! Full-screen terminal frontend.
//!
//! Renders the daily board (committed guesses colored from their feedback,
//! plus the row being typed), an A-Z keyboard hint line, and the streak.
//! Input is raw-mode crossterm; the alternate screen is restored on drop.

use std::collections::BTreeMap;
use std::io;

use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};

use crate::game::{GameUi, UserAction};
use crate::session::{GameSession, GuessError, GuessOutcome, LetterFeedback, feedback_for};
use crate::wordbank::{MAX_ATTEMPTS, WORD_LENGTH};

const EVENT_POLL_TIMEOUT_MS: u64 = 100;
const ROW_SPACING: u16 = 2;

const HEADER_STYLE: Style = Style::new().fg(Color::Cyan).add_modifier(Modifier::BOLD);
const ERROR_STYLE: Style = Style::new().fg(Color::Red);
const MESSAGE_STYLE: Style = Style::new().fg(Color::Cyan);

#[derive(Clone, Copy, PartialEq, Debug)]
enum CellState {
    Empty,
    Entered,
    Exact,   // green
    Present, // yellow
    Absent,  // gray
}

impl CellState {
    fn colors(self) -> (Color, Color) {
        match self {
            Self::Empty | Self::Entered => (Color::DarkGray, Color::White),
            Self::Exact => (Color::Green, Color::Black),
            Self::Present => (Color::Yellow, Color::Black),
            Self::Absent => (Color::Gray, Color::White),
        }
    }

    fn from_feedback(feedback: LetterFeedback) -> Self {
        match feedback {
            LetterFeedback::Exact => Self::Exact,
            LetterFeedback::Present => Self::Present,
            LetterFeedback::Absent => Self::Absent,
        }
    }
}

#[derive(Debug)]
struct GuessRow {
    letters: [char; WORD_LENGTH],
    states: [CellState; WORD_LENGTH],
}

impl GuessRow {
    fn scored(guess: &str, feedback: &[LetterFeedback]) -> Self {
        let mut letters = [' '; WORD_LENGTH];
        let mut states = [CellState::Empty; WORD_LENGTH];
        for (i, ch) in guess.chars().enumerate().take(WORD_LENGTH) {
            letters[i] = ch;
            states[i] = feedback
                .get(i)
                .copied()
                .map_or(CellState::Entered, CellState::from_feedback);
        }
        Self { letters, states }
    }
}

pub struct TuiInterface {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
    rows: Vec<GuessRow>,
    current_input: String,
    hints: BTreeMap<char, LetterFeedback>,
    date_label: String,
    streak: u32,
    attempts_left: usize,
    message: String,
    error_message: String,
    game_over: bool,
}

impl TuiInterface {
    pub fn new() -> Result<Self, io::Error> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, cursor::Hide)?;
        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;

        Ok(Self {
            terminal,
            rows: Vec::new(),
            current_input: String::new(),
            hints: BTreeMap::new(),
            date_label: String::new(),
            streak: 0,
            attempts_left: MAX_ATTEMPTS,
            message: String::new(),
            error_message: String::new(),
            game_over: false,
        })
    }

    pub fn cleanup(&mut self) -> Result<(), io::Error> {
        disable_raw_mode()?;
        execute!(
            self.terminal.backend_mut(),
            LeaveAlternateScreen,
            cursor::Show
        )?;
        Ok(())
    }

    fn sync_from_session(&mut self, session: &GameSession, streak: u32) {
        self.rows = session
            .guesses
            .iter()
            .map(|guess| GuessRow::scored(guess, &feedback_for(guess, &session.word)))
            .collect();
        self.hints = session.keyboard_hints();
        self.date_label = session.date.to_string();
        self.streak = streak;
        self.attempts_left = session.attempts_left();
        self.game_over = session.game_over;
    }

    fn draw(&mut self) -> Result<(), io::Error> {
        let rows = &self.rows;
        let current_input = &self.current_input;
        let hints = &self.hints;
        let date_label = &self.date_label;
        let streak = self.streak;
        let attempts_left = self.attempts_left;
        let message = &self.message;
        let error_message = &self.error_message;
        let game_over = self.game_over;

        self.terminal.draw(|f| {
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([
                    Constraint::Length(3),  // Title
                    Constraint::Length(14), // Board
                    Constraint::Length(3),  // Keyboard hints
                    Constraint::Min(5),     // Info
                    Constraint::Length(3),  // Instructions
                ])
                .split(f.area());

            render_title(f, chunks[0], date_label);
            render_board(f, chunks[1], rows, current_input, game_over);
            render_keyboard(f, chunks[2], hints);
            render_info(f, chunks[3], streak, attempts_left, message, error_message);
            render_instructions(f, chunks[4], game_over);
        })?;
        Ok(())
    }

    fn draw_or_log(&mut self) {
        if let Err(e) = self.draw() {
            log::debug!("draw error: {e}");
        }
    }

    /// Block until a key press; used on the win/loss/unavailable screens so
    /// the final board stays visible until the player acknowledges it.
    fn wait_for_key(&mut self) {
        loop {
            self.draw_or_log();
            match event::poll(std::time::Duration::from_millis(EVENT_POLL_TIMEOUT_MS)) {
                Ok(false) => {}
                Ok(true) => {
                    if let Ok(Event::Key(key)) = event::read()
                        && key.kind == KeyEventKind::Press
                    {
                        return;
                    }
                }
                Err(_) => return,
            }
        }
    }

    fn handle_key(&mut self, key: KeyEvent) -> Option<UserAction> {
        self.error_message.clear();
        let has_modifier = key.modifiers.contains(KeyModifiers::ALT)
            || key.modifiers.contains(KeyModifiers::CONTROL);

        match key.code {
            KeyCode::Esc => return Some(UserAction::Exit),
            KeyCode::Char(c)
                if c.is_ascii_alphabetic()
                    && !has_modifier
                    && self.current_input.len() < WORD_LENGTH =>
            {
                self.current_input.push(c.to_ascii_uppercase());
            }
            KeyCode::Backspace if !self.current_input.is_empty() => {
                self.current_input.pop();
            }
            KeyCode::Enter if self.current_input.len() == WORD_LENGTH => {
                let guess = self.current_input.clone();
                self.current_input.clear();
                return Some(UserAction::Guess(guess));
            }
            KeyCode::Enter => {
                self.error_message = "Guess must be exactly 5 letters!".to_string();
            }
            KeyCode::Char(c) if !c.is_ascii_alphabetic() => {
                self.error_message = format!("Only letters are allowed! ('{c}' is not a letter)");
            }
            _ => {}
        }
        None
    }
}

fn render_title(f: &mut Frame, area: Rect, date_label: &str) {
    let title = Paragraph::new(format!("WORD OF THE DAY — {date_label}"))
        .style(HEADER_STYLE)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(title, area);
}

fn render_board(
    f: &mut Frame,
    area: Rect,
    rows: &[GuessRow],
    current_input: &str,
    game_over: bool,
) {
    let block = Block::default().title("Board").borders(Borders::ALL);
    let inner = block.inner(area);
    f.render_widget(block, area);

    for (index, row) in rows.iter().enumerate() {
        render_row(f, inner, index, &row.letters, &row.states);
    }

    if !game_over && rows.len() < MAX_ATTEMPTS {
        let mut letters = [' '; WORD_LENGTH];
        for (i, ch) in current_input.chars().enumerate().take(WORD_LENGTH) {
            letters[i] = ch;
        }
        render_row(f, inner, rows.len(), &letters, &[CellState::Entered; WORD_LENGTH]);
    }
}

#[allow(clippy::cast_possible_truncation)]
fn render_row(
    f: &mut Frame,
    area: Rect,
    row_index: usize,
    letters: &[char; WORD_LENGTH],
    states: &[CellState; WORD_LENGTH],
) {
    let y = area.y + (row_index as u16 * ROW_SPACING);
    if y >= area.y + area.height {
        return;
    }

    let mut spans = vec![Span::raw("  ")];
    for i in 0..WORD_LENGTH {
        let (bg, fg) = states[i].colors();
        spans.push(Span::styled(
            format!(" {} ", letters[i]),
            Style::default().fg(fg).bg(bg),
        ));
        spans.push(Span::raw(" "));
    }

    let paragraph = Paragraph::new(Line::from(spans));
    f.render_widget(
        paragraph,
        Rect {
            x: area.x,
            y,
            width: area.width,
            height: 1,
        },
    );
}

fn render_keyboard(f: &mut Frame, area: Rect, hints: &BTreeMap<char, LetterFeedback>) {
    let block = Block::default().title("Letters").borders(Borders::ALL);
    let inner = block.inner(area);
    f.render_widget(block, area);

    let mut spans = Vec::with_capacity(26 * 2);
    for letter in 'A'..='Z' {
        let style = match hints.get(&letter) {
            Some(LetterFeedback::Exact) => Style::default().fg(Color::Black).bg(Color::Green),
            Some(LetterFeedback::Present) => Style::default().fg(Color::Black).bg(Color::Yellow),
            Some(LetterFeedback::Absent) => Style::default().fg(Color::DarkGray),
            None => Style::default().fg(Color::White),
        };
        spans.push(Span::styled(letter.to_string(), style));
        spans.push(Span::raw(" "));
    }
    f.render_widget(Paragraph::new(Line::from(spans)), inner);
}

fn render_info(
    f: &mut Frame,
    area: Rect,
    streak: u32,
    attempts_left: usize,
    message: &str,
    error_message: &str,
) {
    let mut lines = vec![Line::from(format!("Current streak: {streak}"))];
    lines.push(Line::from(format!("Attempts left: {attempts_left}")));
    if !message.is_empty() {
        lines.push(Line::from(Span::styled(message.to_string(), MESSAGE_STYLE)));
    }
    if !error_message.is_empty() {
        lines.push(Line::from(Span::styled(
            error_message.to_string(),
            ERROR_STYLE,
        )));
    }

    let paragraph = Paragraph::new(lines)
        .block(Block::default().title("Game").borders(Borders::ALL))
        .wrap(Wrap { trim: true });
    f.render_widget(paragraph, area);
}

fn render_instructions(f: &mut Frame, area: Rect, game_over: bool) {
    let text = if game_over {
        "Press any key to leave"
    } else {
        "Type your 5-letter guess | ENTER: Submit | ESC: Quit"
    };
    let paragraph = Paragraph::new(text)
        .style(Style::default().fg(Color::Gray))
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(paragraph, area);
}

impl GameUi for TuiInterface {
    fn show_session(&mut self, session: &GameSession, streak: u32) {
        self.sync_from_session(session, streak);
        self.message = if session.guesses.is_empty() {
            "Enter your first guess".to_string()
        } else {
            "Board restored from earlier today".to_string()
        };
        self.draw_or_log();
    }

    fn read_action(&mut self) -> UserAction {
        loop {
            self.draw_or_log();
            match event::poll(std::time::Duration::from_millis(EVENT_POLL_TIMEOUT_MS)) {
                Ok(false) => {}
                Ok(true) => match event::read() {
                    Ok(Event::Key(key)) if key.kind == KeyEventKind::Press => {
                        if let Some(action) = self.handle_key(key) {
                            return action;
                        }
                    }
                    Ok(_) => {}
                    Err(e) => {
                        log::debug!("input error: {e}");
                        return UserAction::Exit;
                    }
                },
                Err(e) => {
                    log::debug!("poll error: {e}");
                    return UserAction::Exit;
                }
            }
        }
    }

    fn show_guess_error(&mut self, error: &GuessError) {
        self.error_message = error.to_string();
        self.draw_or_log();
    }

    fn show_outcome(&mut self, session: &GameSession, _outcome: &GuessOutcome, streak: u32) {
        self.sync_from_session(session, streak);
        self.message = String::new();
        self.draw_or_log();
    }

    fn show_win(&mut self, session: &GameSession, streak: u32) {
        self.sync_from_session(session, streak);
        self.message = format!(
            "You got it in {}/{MAX_ATTEMPTS}! Streak: {streak}",
            session.guesses.len()
        );
        self.wait_for_key();
    }

    fn show_loss(&mut self, session: &GameSession, streak: u32) {
        self.sync_from_session(session, streak);
        self.message = format!("Out of attempts. The word was {}.", session.word);
        self.wait_for_key();
    }

    fn show_unavailable(&mut self) {
        self.message = "The word list is unavailable. Try again later.".to_string();
        self.game_over = true;
        self.wait_for_key();
    }
}

impl Drop for TuiInterface {
    fn drop(&mut self) {
        let _ = self.cleanup();
    }
}
