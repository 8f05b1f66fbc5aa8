//! Full-screen board page.
//!
//! One screen, ratatui-rendered:
//!   - Header: board title + sync indicator
//!   - Progress bar colored by completion tier
//!   - Banner line when everything is done
//!   - Scrollable task list (toggle / delete / reload)
//!   - Input line at the bottom (Enter to add, Ctrl+C to quit)
//!
//! The loop owns the [`TaskStore`]: keys mutate it directly, remote results
//! are folded in via `pump()` once per frame. Nothing here ever awaits a
//! request, so the page stays responsive while calls are in flight.

pub mod celebration;

use anyhow::{Context, Result};
use crossterm::{
    event::{self, Event, KeyCode, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
    Terminal,
};
use std::io;
use std::sync::Arc;
use std::time::Duration;

use crate::api::HttpTaskApi;
use crate::board::store::{Effect, TaskStore};
use crate::board::{BoardState, ProgressTier};
use crate::config::BoardConfig;
use celebration::Celebration;

/// Which pane owns the keyboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Focus {
    Input,
    List,
}

/// ratatui-based board TUI.
pub struct BoardUi {
    config: BoardConfig,
}

impl BoardUi {
    pub fn new(config: &BoardConfig) -> Self {
        Self {
            config: config.clone(),
        }
    }

    /// Start the interactive board loop.
    pub async fn run(self) -> Result<()> {
        // Set up terminal.
        enable_raw_mode().context("enable raw mode")?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen).context("enter alternate screen")?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend).context("create terminal")?;

        let result = self.event_loop(&mut terminal).await;

        // Restore terminal regardless of result.
        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;

        result
    }

    async fn event_loop(
        &self,
        terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    ) -> Result<()> {
        let api = HttpTaskApi::new(&self.config.server_url).context("build http client")?;
        let mut store = TaskStore::new(Arc::new(api));
        let mut focus = Focus::Input;
        let mut selected: usize = 0;
        let mut celebration = Celebration::new();

        // First paint happens before the server answers; the list fills in
        // whenever the response lands.
        store.request_reload();

        loop {
            store.pump();
            for effect in store.take_effects() {
                match effect {
                    Effect::Celebrate => celebration.start(),
                }
            }
            selected = selected.min(store.state().total().saturating_sub(1));

            // Draw UI.
            terminal.draw(|f| {
                draw_ui(f, &store, focus, selected, &celebration);
            })?;

            // Poll for terminal events (non-blocking, 50ms timeout).
            if event::poll(Duration::from_millis(50))? {
                if let Event::Key(key) = event::read()? {
                    match (focus, key.code, key.modifiers) {
                        // Ctrl+C — quit from anywhere.
                        (_, KeyCode::Char('c'), KeyModifiers::CONTROL) => break,

                        // Input pane.
                        (Focus::Input, KeyCode::Enter, _) => store.submit(),
                        (Focus::Input, KeyCode::Tab | KeyCode::Esc, _) => focus = Focus::List,
                        (Focus::Input, KeyCode::Backspace, _) => store.input_backspace(),
                        (Focus::Input, KeyCode::Char(c), _) => store.input_char(c),

                        // List pane.
                        (Focus::List, KeyCode::Char('q') | KeyCode::Esc, _) => break,
                        (Focus::List, KeyCode::Tab | KeyCode::Char('i'), _) => {
                            focus = Focus::Input
                        }
                        (Focus::List, KeyCode::Up | KeyCode::Char('k'), _) => {
                            selected = selected.saturating_sub(1)
                        }
                        (Focus::List, KeyCode::Down | KeyCode::Char('j'), _) => {
                            selected = (selected + 1)
                                .min(store.state().total().saturating_sub(1))
                        }
                        (Focus::List, KeyCode::Enter | KeyCode::Char(' '), _) => {
                            let id = store.state().tasks().get(selected).map(|t| t.id.clone());
                            if let Some(id) = id {
                                store.toggle(&id);
                            }
                        }
                        (Focus::List, KeyCode::Char('d') | KeyCode::Delete, _) => {
                            let id = store.state().tasks().get(selected).map(|t| t.id.clone());
                            if let Some(id) = id {
                                store.remove(&id);
                            }
                        }
                        (Focus::List, KeyCode::Char('r'), _) => store.request_reload(),
                        _ => {}
                    }
                }
            }
        }

        Ok(())
    }
}

// ─── UI rendering ─────────────────────────────────────────────────────────────

fn draw_ui(
    f: &mut ratatui::Frame,
    store: &TaskStore,
    focus: Focus,
    selected: usize,
    celebration: &Celebration,
) {
    let area = f.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // header
            Constraint::Length(3), // progress bar
            Constraint::Length(1), // all-done banner (blank otherwise)
            Constraint::Min(3),    // task list
            Constraint::Length(3), // input area
            Constraint::Length(1), // help line
        ])
        .split(area);

    let state = store.state();
    render_header(f, chunks[0], store.pending_remote() > 0);
    render_progress(f, chunks[1], state);
    render_banner(f, chunks[2], state);
    render_tasks(f, chunks[3], state, focus, selected);
    render_input(f, chunks[4], state.input(), focus);
    render_help(f, chunks[5], focus);

    // Confetti falls over the task list, above whatever was drawn there.
    celebration.render(f, chunks[3]);
}

fn render_header(f: &mut ratatui::Frame, area: Rect, syncing: bool) {
    let indicator = if syncing { "  ⠋ syncing" } else { "" };
    let header = Paragraph::new(format!(" Vibe Board — Clear your mind.{indicator}"))
        .style(Style::default().bg(Color::Rgb(28, 28, 40)).fg(Color::White));
    f.render_widget(header, area);
}

fn render_progress(f: &mut ratatui::Frame, area: Rect, state: &BoardState) {
    let progress = state.progress();
    let (from, to) = tier_gradient(state.tier());

    let block = Block::default().borders(Borders::ALL).title(format!(
        "Progress — {}/{} done · {}%",
        state.completed_count(),
        state.total(),
        progress
    ));
    let inner = block.inner(area);
    f.render_widget(block, area);
    if inner.width == 0 || inner.height == 0 {
        return;
    }

    let width = inner.width as usize;
    let filled = width * usize::from(progress) / 100;
    let mut spans: Vec<Span> = Vec::with_capacity(width);
    for i in 0..filled {
        // The gradient spans the filled part, like the page's fill bar.
        let t = if filled > 1 {
            i as f64 / (filled - 1) as f64
        } else {
            0.0
        };
        spans.push(Span::styled("█", Style::default().fg(lerp_rgb(from, to, t))));
    }
    for _ in filled..width {
        spans.push(Span::styled("░", Style::default().fg(Color::Rgb(50, 50, 66))));
    }
    f.render_widget(Paragraph::new(Line::from(spans)), inner);
}

fn render_banner(f: &mut ratatui::Frame, area: Rect, state: &BoardState) {
    if state.tier() != ProgressTier::Complete {
        return;
    }
    let banner = Paragraph::new(" Yay!! You completed all the tasks! 🎉").style(
        Style::default()
            .fg(Color::Rgb(0xFB, 0x92, 0x3C))
            .add_modifier(Modifier::BOLD),
    );
    f.render_widget(banner, area);
}

fn render_tasks(
    f: &mut ratatui::Frame,
    area: Rect,
    state: &BoardState,
    focus: Focus,
    selected: usize,
) {
    let focused = focus == Focus::List;
    let block = Block::default()
        .borders(Borders::ALL)
        .title("Tasks")
        .border_style(if focused {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default()
        });

    if state.total() == 0 {
        let empty = Paragraph::new("No tasks yet. Start the vibe.")
            .block(block)
            .style(Style::default().fg(Color::DarkGray));
        f.render_widget(empty, area);
        return;
    }

    let items: Vec<ListItem> = state
        .tasks()
        .iter()
        .map(|t| {
            let line = if t.completed {
                Line::from(vec![
                    Span::styled(" ✔ ", Style::default().fg(Color::Green)),
                    Span::styled(
                        t.title.as_str(),
                        Style::default()
                            .fg(Color::DarkGray)
                            .add_modifier(Modifier::CROSSED_OUT),
                    ),
                ])
            } else {
                Line::from(vec![Span::raw(" ○ "), Span::raw(t.title.as_str())])
            };
            ListItem::new(line)
        })
        .collect();

    let list = List::new(items)
        .block(block)
        .style(Style::default().fg(Color::White))
        .highlight_style(
            Style::default()
                .bg(Color::Rgb(40, 40, 60))
                .add_modifier(Modifier::BOLD),
        );

    let mut list_state = ListState::default();
    if focused {
        list_state.select(Some(selected));
    }
    f.render_stateful_widget(list, area, &mut list_state);
}

fn render_input(f: &mut ratatui::Frame, area: Rect, input: &str, focus: Focus) {
    let focused = focus == Focus::Input;
    let cursor = if focused { "▌" } else { "" };
    let text = Paragraph::new(format!("> {input}{cursor}"))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("New task")
                .border_style(if focused {
                    Style::default().fg(Color::Cyan)
                } else {
                    Style::default()
                }),
        )
        .wrap(Wrap { trim: false })
        .style(Style::default().fg(Color::White));
    f.render_widget(text, area);
}

fn render_help(f: &mut ratatui::Frame, area: Rect, focus: Focus) {
    let help = match focus {
        Focus::Input => " Enter: add  |  Tab: to list  |  Ctrl+C: quit",
        Focus::List => {
            " Space/Enter: toggle  |  d: delete  |  r: reload  |  ↑/↓: move  |  Tab: to input  |  q: quit"
        }
    };
    let help = Paragraph::new(help).style(Style::default().fg(Color::DarkGray));
    f.render_widget(help, area);
}

// ─── Tier gradients ───────────────────────────────────────────────────────────

type Rgb = (u8, u8, u8);

/// Gradient endpoints for the progress bar, one pair per completion tier:
/// blue/cyan while untouched, indigo below half, fuchsia/purple above half,
/// rose/orange when complete.
fn tier_gradient(tier: ProgressTier) -> (Rgb, Rgb) {
    match tier {
        ProgressTier::Untouched => ((0x3B, 0x82, 0xF6), (0x22, 0xD3, 0xEE)),
        ProgressTier::UnderHalf => ((0x63, 0x66, 0xF1), (0x60, 0xA5, 0xFA)),
        ProgressTier::OverHalf => ((0xD9, 0x46, 0xEF), (0xA8, 0x55, 0xF7)),
        ProgressTier::Complete => ((0xF4, 0x3F, 0x5E), (0xFB, 0x92, 0x3C)),
    }
}

fn lerp_rgb(from: Rgb, to: Rgb, t: f64) -> Color {
    let channel = |a: u8, b: u8| (f64::from(a) + (f64::from(b) - f64::from(a)) * t).round() as u8;
    Color::Rgb(
        channel(from.0, to.0),
        channel(from.1, to.1),
        channel(from.2, to.2),
    )
}
