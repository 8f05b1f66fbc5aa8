//! Confetti overlay shown when a task is checked off.
//!
//! Purely visual: the board never blocks on it, and restarting it mid-fall
//! just deals a fresh set of pieces.

use std::time::{Duration, Instant};

use ratatui::layout::Rect;
use ratatui::Frame;
use ratatui::style::Color;

/// Confetti colors, warmest first.
const PALETTE: [Color; 5] = [
    Color::Rgb(0xFF, 0xE4, 0x00),
    Color::Rgb(0xFF, 0xBD, 0x00),
    Color::Rgb(0xE8, 0x94, 0x00),
    Color::Rgb(0xFF, 0xCA, 0x6C),
    Color::Rgb(0xFD, 0xFF, 0xB8),
];

const GLYPHS: [char; 4] = ['▪', '•', '◆', '▫'];

const PIECE_COUNT: usize = 24;
/// How long the shower stays on screen.
const LIFETIME: Duration = Duration::from_millis(2500);
/// Pieces start falling staggered within this window.
const MAX_DELAY_MS: u64 = 600;
/// Fall speed: one row per this many milliseconds.
const FALL_MS_PER_ROW: u128 = 120;

#[derive(Debug, Clone, Copy)]
struct Piece {
    /// Horizontal position as a fraction of the area width, in 0..1000.
    col_permille: u16,
    delay: Duration,
    color: Color,
    glyph: char,
}

pub struct Celebration {
    pieces: Vec<Piece>,
    started: Option<Instant>,
    seed: u64,
}

impl Celebration {
    pub fn new() -> Self {
        Self {
            pieces: Vec::with_capacity(PIECE_COUNT),
            started: None,
            seed: clock_seed(),
        }
    }

    /// Deal a fresh set of pieces and start the fall.
    pub fn start(&mut self) {
        self.pieces.clear();
        for _ in 0..PIECE_COUNT {
            let r = next_rand(&mut self.seed);
            self.pieces.push(Piece {
                col_permille: (r % 1000) as u16,
                delay: Duration::from_millis((r >> 10) % MAX_DELAY_MS),
                color: PALETTE[((r >> 20) % PALETTE.len() as u64) as usize],
                glyph: GLYPHS[((r >> 32) % GLYPHS.len() as u64) as usize],
            });
        }
        self.started = Some(Instant::now());
    }

    pub fn active(&self) -> bool {
        matches!(self.started, Some(t) if t.elapsed() < LIFETIME)
    }

    /// Paint falling pieces over `area`. Cells already rendered underneath
    /// keep their background; only the glyph and its color change.
    pub fn render(&self, f: &mut Frame, area: Rect) {
        let Some(started) = self.started else {
            return;
        };
        let elapsed = started.elapsed();
        if elapsed >= LIFETIME || area.width == 0 || area.height == 0 {
            return;
        }

        let buf = f.buffer_mut();
        for piece in &self.pieces {
            let Some(falling) = elapsed.checked_sub(piece.delay) else {
                continue;
            };
            let row = (falling.as_millis() / FALL_MS_PER_ROW) as u16;
            if row >= area.height {
                continue;
            }
            let span = u32::from(area.width.saturating_sub(1));
            let x = area.x + ((u32::from(piece.col_permille) * span) / 1000) as u16;
            let y = area.y + row;
            buf.get_mut(x, y)
                .set_char(piece.glyph)
                .set_fg(piece.color);
        }
    }
}

impl Default for Celebration {
    fn default() -> Self {
        Self::new()
    }
}

// Non-crypto scatter, same spirit as the id helpers elsewhere: clock-seeded
// xorshift, good enough to place confetti.
fn clock_seed() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    let ns = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .subsec_nanos();
    (u64::from(ns))
        .wrapping_mul(1_000_003)
        .wrapping_add(u64::from(std::process::id()))
        | 1
}

fn next_rand(seed: &mut u64) -> u64 {
    *seed ^= *seed << 13;
    *seed ^= *seed >> 7;
    *seed ^= *seed << 17;
    *seed
}
