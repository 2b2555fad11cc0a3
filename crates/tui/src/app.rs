use std::{
    io, thread,
    time::{Duration, Instant},
};

use anyhow::{Context, Result};
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use pairs_core::{
    AppConfig, Card, GameSession, GameStats, IgnoreReason, Invitation, Outcome, Phase, Selection,
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame, Terminal,
};
use tokio::sync::mpsc;
use tracing::{error, info};

use crate::block_font;

const TICK_RATE: Duration = Duration::from_millis(50);

#[derive(Debug, Clone)]
struct Theme {
    primary_fg: Color,
    accent: Color,
    muted: Color,
    success: Color,
    warning: Color,
    danger: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            primary_fg: Color::White,
            accent: Color::Cyan,
            muted: Color::DarkGray,
            success: Color::Green,
            warning: Color::Yellow,
            danger: Color::Magenta,
        }
    }
}

enum AppEvent {
    Input(Event),
    Tick,
}

/// Terminal front end for the invitation: the board, then the itinerary.
pub struct PairsApp {
    config: AppConfig,
    invitation: Invitation,
    session: GameSession,
    started: Instant,
    state: UiState,
    theme: Theme,
}

impl PairsApp {
    pub fn new(config: AppConfig, invitation: Invitation, session: GameSession) -> Self {
        Self {
            config,
            invitation,
            session,
            started: Instant::now(),
            state: UiState::default(),
            theme: Theme::default(),
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        let mut stdout = io::stdout();
        enable_raw_mode().context("failed to enter raw mode")?;
        execute!(stdout, EnterAlternateScreen).context("failed to enter alternate screen")?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend).context("failed to create terminal")?;
        terminal.hide_cursor()?;
        terminal.clear()?;

        let (event_tx, mut event_rx) = mpsc::channel::<AppEvent>(128);
        spawn_input_thread(event_tx);
        self.started = Instant::now();
        info!("Game started");

        loop {
            terminal.draw(|frame| self.draw(frame))?;
            if self.state.should_quit {
                break;
            }

            let maybe_event = event_rx.recv().await;
            if !self.process_app_event(maybe_event) {
                break;
            }
        }

        restore_terminal(&mut terminal)?;
        let stats = self.session.stats();
        let cancelled = self.session.teardown();
        info!(
            pairs = stats.pairs_found,
            attempts = stats.attempts,
            cancelled,
            "Game closed"
        );
        Ok(())
    }

    fn process_app_event(&mut self, maybe_event: Option<AppEvent>) -> bool {
        match maybe_event {
            Some(AppEvent::Input(event)) => {
                if let Err(err) = self.handle_input(event) {
                    error!(?err, "Input handling failed");
                    self.state.set_status(format!("Error: {err}"));
                }
                true
            }
            Some(AppEvent::Tick) => {
                if let Err(err) = self.handle_tick() {
                    error!(?err, "Timer handling failed");
                    self.state.set_status(format!("Error: {err}"));
                }
                true
            }
            None => false,
        }
    }

    fn handle_tick(&mut self) -> Result<()> {
        let gate_was_open = self.session.state().can_flip();
        let applied = self.session.tick(self.started.elapsed())?;
        if applied > 0 && !gate_was_open && self.session.state().can_flip() {
            self.state
                .set_status("Go! Find the cards that look the same.".to_string());
        }
        Ok(())
    }

    fn handle_input(&mut self, event: Event) -> Result<()> {
        let Event::Key(key) = event else {
            return Ok(());
        };
        if key.kind != KeyEventKind::Press {
            return Ok(());
        }
        if self.handle_global_shortcut(&key) {
            return Ok(());
        }
        match self.session.phase() {
            Phase::Playing => self.handle_play_key(key),
            Phase::Finished => {
                self.handle_itinerary_key(key);
                Ok(())
            }
        }
    }

    fn handle_global_shortcut(&mut self, key: &KeyEvent) -> bool {
        let quit = matches!(key.code, KeyCode::Char('q') | KeyCode::Esc)
            || (key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL));
        if quit {
            self.state.should_quit = true;
        }
        quit
    }

    fn handle_play_key(&mut self, key: KeyEvent) -> Result<()> {
        let width = usize::from(self.config.board.width);
        let total = self.session.state().cards().len();
        match key.code {
            KeyCode::Left | KeyCode::Char('h') => self.state.move_cursor(-1, 0, width, total),
            KeyCode::Right | KeyCode::Char('l') => self.state.move_cursor(1, 0, width, total),
            KeyCode::Up | KeyCode::Char('k') => self.state.move_cursor(0, -1, width, total),
            KeyCode::Down | KeyCode::Char('j') => self.state.move_cursor(0, 1, width, total),
            KeyCode::Enter | KeyCode::Char(' ') => self.flip_selected()?,
            KeyCode::Char('c') => self.continue_to_itinerary(),
            KeyCode::Char('n') => self.new_game()?,
            _ => {}
        }
        Ok(())
    }

    fn handle_itinerary_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => {
                self.state.itinerary_scroll = self.state.itinerary_scroll.saturating_sub(1)
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.state.itinerary_scroll = self.state.itinerary_scroll.saturating_add(1)
            }
            KeyCode::Home => self.state.itinerary_scroll = 0,
            _ => {}
        }
    }

    fn flip_selected(&mut self) -> Result<()> {
        let Some(card) = self.session.state().cards().get(self.state.cursor) else {
            return Ok(());
        };
        let id = card.id;
        let outcome = self.session.click(id, self.started.elapsed())?;
        let message = describe_outcome(outcome, self.session.stats());
        self.state.set_status(message);
        Ok(())
    }

    fn continue_to_itinerary(&mut self) {
        match self.session.continue_to_itinerary() {
            Ok(_) => {
                self.state.itinerary_scroll = 0;
                self.state.set_status("See you there!".to_string());
            }
            Err(err) => self.state.set_status(format!("Not yet: {err}")),
        }
    }

    fn new_game(&mut self) -> Result<()> {
        self.session = GameSession::from_config(&self.config)?;
        self.started = Instant::now();
        self.state.cursor = 0;
        self.state.set_status("New cards dealt. Memorise them!".to_string());
        info!("New game dealt on request");
        Ok(())
    }

    fn draw(&mut self, frame: &mut Frame) {
        match self.session.phase() {
            Phase::Playing => self.draw_play(frame),
            Phase::Finished => self.draw_itinerary(frame),
        }
    }

    fn draw_play(&self, frame: &mut Frame) {
        let area = frame.size();
        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(4),
                Constraint::Min(5),
                Constraint::Length(4),
            ])
            .split(area);

        self.render_intro(frame, layout[0]);
        self.render_board(frame, layout[1]);
        self.render_status(frame, layout[2]);
    }

    fn render_intro(&self, frame: &mut Frame, area: Rect) {
        let intro = &self.invitation.intro;
        let lines = vec![
            Line::from(Span::styled(
                intro.title.clone(),
                Style::default()
                    .fg(self.theme.accent)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(intro.prompt.clone()),
        ];
        let paragraph = Paragraph::new(lines)
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::BOTTOM));
        frame.render_widget(paragraph, area);
    }

    fn render_board(&self, frame: &mut Frame, area: Rect) {
        let width = usize::from(self.config.board.width).max(1);
        let cards = self.session.state().cards();
        let rows = cards.len().div_ceil(width).max(1);

        let row_areas = Layout::default()
            .direction(Direction::Vertical)
            .constraints(vec![Constraint::Ratio(1, rows as u32); rows])
            .split(area);

        for (row_idx, row_area) in row_areas.iter().enumerate() {
            let col_areas = Layout::default()
                .direction(Direction::Horizontal)
                .constraints(vec![Constraint::Ratio(1, width as u32); width])
                .split(*row_area);
            for (col_idx, card_area) in col_areas.iter().enumerate() {
                let index = row_idx * width + col_idx;
                if let Some(card) = cards.get(index) {
                    self.render_card(frame, *card_area, card, index);
                }
            }
        }
    }

    fn render_card(&self, frame: &mut Frame, area: Rect, card: &Card, index: usize) {
        let pending = self.session.state().selection() == Selection::One(card.id);

        let mut border = Style::default().fg(self.theme.muted);
        if card.is_matched() {
            border = Style::default().fg(self.theme.success);
        }
        if pending {
            border = Style::default().fg(self.theme.warning);
        }
        if index == self.state.cursor {
            border = Style::default()
                .fg(self.theme.accent)
                .add_modifier(Modifier::BOLD);
        }
        let block = Block::default().borders(Borders::ALL).border_style(border);
        let inner = block.inner(area);

        let lines: Vec<Line> = if card.shows_picture() {
            let mut style = Style::default().fg(self.theme.primary_fg);
            if card.is_matched() {
                style = style.fg(self.theme.success).add_modifier(Modifier::DIM);
            }
            let mut lines = vec![Line::from(""); usize::from(inner.height.saturating_sub(1) / 2)];
            lines.push(Line::from(Span::styled(card.image.label().to_string(), style)));
            lines
        } else {
            let back = &self.invitation.intro.card_back;
            let style = Style::default().fg(self.theme.danger);
            let fits = usize::from(inner.height) >= block_font::FONT_HEIGHT
                && usize::from(inner.width) >= block_font::width(back);
            if fits {
                let pad = usize::from(inner.height).saturating_sub(block_font::FONT_HEIGHT) / 2;
                let mut lines = vec![Line::from(""); pad];
                lines.extend(
                    block_font::render(back)
                        .into_iter()
                        .map(|row| Line::from(Span::styled(row, style))),
                );
                lines
            } else {
                let mut lines = vec![Line::from(""); usize::from(inner.height.saturating_sub(1) / 2)];
                lines.push(Line::from(Span::styled(format!("{back} years"), style)));
                lines
            }
        };

        let paragraph = Paragraph::new(lines)
            .alignment(Alignment::Center)
            .block(block);
        frame.render_widget(paragraph, area);
    }

    fn render_status(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default().borders(Borders::ALL).title("Status");
        let stats = self.session.stats();
        let gate = if self.session.state().can_flip() {
            format!(
                "Pairs {}/{} · Attempts {}",
                stats.pairs_found, stats.total_pairs, stats.attempts
            )
        } else {
            "Memorise the board...".to_string()
        };
        let help = if self.session.state().all_resolved() {
            "c continue · n new game · q quit"
        } else {
            "←↑↓→/hjkl move · Enter flip · n new game · q quit"
        };
        let paragraph = Paragraph::new(vec![
            Line::from(self.state.status.clone()),
            Line::from(vec![
                Span::raw(gate),
                Span::raw("  "),
                Span::styled(help, Style::default().fg(self.theme.muted)),
            ]),
        ])
        .block(block)
        .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, area);
    }

    fn draw_itinerary(&self, frame: &mut Frame) {
        let area = frame.size();
        let itinerary = &self.invitation.itinerary;
        let accent = Style::default()
            .fg(self.theme.accent)
            .add_modifier(Modifier::BOLD);
        let muted = Style::default().fg(self.theme.muted);

        let stats = self.session.stats();
        let mut lines = vec![
            Line::from(Span::styled(itinerary.title.clone(), accent)),
            Line::from(itinerary.display_date()),
            Line::from(Span::styled(
                format!(
                    "All {} pairs found in {} attempts",
                    stats.total_pairs, stats.attempts
                ),
                Style::default().fg(self.theme.success),
            )),
            Line::from(""),
            Line::from(Span::styled(
                itinerary.heading.clone(),
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
        ];

        for day in &itinerary.days {
            lines.push(Line::from(Span::styled(day.heading(), accent)));
            for entry in &day.entries {
                lines.push(Line::from(format!(
                    "  {}  {}",
                    entry.display_time(),
                    entry.label
                )));
                if let Some(link) = &entry.link {
                    lines.push(Line::from(Span::styled(format!("            {link}"), muted)));
                }
            }
            lines.push(Line::from(""));
        }

        if !itinerary.photos.is_empty() {
            lines.push(Line::from(Span::styled("Photos", accent)));
            lines.extend(
                itinerary
                    .photos
                    .iter()
                    .map(|photo| Line::from(Span::styled(format!("  {photo}"), muted))),
            );
        }

        let paragraph = Paragraph::new(lines)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title("Weekend")
                    .title_alignment(Alignment::Center),
            )
            .wrap(Wrap { trim: false })
            .scroll((self.state.itinerary_scroll, 0));
        frame.render_widget(paragraph, area);
    }
}

fn describe_outcome(outcome: Outcome, stats: GameStats) -> String {
    match outcome {
        Outcome::Ignored(IgnoreReason::GateClosed) => "Wait until every card is turned over.".to_string(),
        Outcome::Ignored(IgnoreReason::CardLocked) => "That pair is already found.".to_string(),
        Outcome::Ignored(IgnoreReason::AlreadySelected) => "Pick a different card.".to_string(),
        Outcome::Ignored(IgnoreReason::Finished) => "The game is over.".to_string(),
        Outcome::Selected(_) => "Now pick its twin.".to_string(),
        Outcome::Matched {
            all_resolved: true, ..
        } => "All pairs found! Press c to continue.".to_string(),
        Outcome::Matched { .. } => format!(
            "Pair found ({}/{}).",
            stats.pairs_found, stats.total_pairs
        ),
        Outcome::Mismatched { .. } => "Not a pair. Try again.".to_string(),
        Outcome::TurnedOver(_) | Outcome::GateOpened | Outcome::Phase(_) => String::new(),
    }
}

fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
    disable_raw_mode().context("failed to disable raw mode")?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)
        .context("failed to leave alternate screen")?;
    terminal.show_cursor()?;
    Ok(())
}

fn spawn_input_thread(sender: mpsc::Sender<AppEvent>) {
    thread::spawn(move || loop {
        match event::poll(TICK_RATE) {
            Ok(true) => match event::read() {
                Ok(evt) => {
                    if sender.blocking_send(AppEvent::Input(evt)).is_err() {
                        break;
                    }
                }
                Err(_) => break,
            },
            Ok(false) => {
                if sender.blocking_send(AppEvent::Tick).is_err() {
                    break;
                }
            }
            Err(_) => break,
        }
    });
}

struct UiState {
    cursor: usize,
    status: String,
    itinerary_scroll: u16,
    should_quit: bool,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            cursor: 0,
            status: "Memorise the cards before they turn over.".to_string(),
            itinerary_scroll: 0,
            should_quit: false,
        }
    }
}

impl UiState {
    fn set_status(&mut self, message: String) {
        self.status = message;
    }

    /// Move the board cursor, clamping to the grid edges.
    fn move_cursor(&mut self, dx: isize, dy: isize, width: usize, total: usize) {
        if width == 0 || total == 0 {
            self.cursor = 0;
            return;
        }
        let rows = total.div_ceil(width);
        let row = (self.cursor / width) as isize + dy;
        let col = (self.cursor % width) as isize + dx;
        let row = row.clamp(0, rows as isize - 1) as usize;
        let col = col.clamp(0, width as isize - 1) as usize;
        self.cursor = (row * width + col).min(total - 1);
    }
}
