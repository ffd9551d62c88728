//! Terminal LED display.
//!
//! Packs two LED rows into one text row using the upper half block `▀`: the
//! foreground colour paints the top LED, the background colour the bottom
//! one. A 32x128 grid therefore needs a 16x128 terminal plus one status line.
//!
//! The terminal is switched to raw mode on an alternate screen; `q`, `Esc`
//! or `Ctrl-C` ends the run.

use async_trait::async_trait;
use crossterm::{
    cursor::{Hide, MoveTo, Show},
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute, queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{disable_raw_mode, enable_raw_mode, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen},
};
use std::io::{self, Stdout, Write};
use std::time::{Duration, Instant};

use super::Display;
use crate::error::TickerError;
use crate::render::{Frame, Rgb};
use crate::ticker::TickerBoard;

const HALF_BLOCK: char = '▀';

/// One text row: (top LED, bottom LED) per column.
pub type CellRow = Vec<(Rgb, Rgb)>;

/// Fold a frame into half-block text rows. An odd last row is paired with
/// the frame background.
pub fn half_block_rows(frame: &Frame, background: Rgb) -> Vec<CellRow> {
    (0..frame.rows())
        .step_by(2)
        .map(|top| {
            (0..frame.cols())
                .map(|col| {
                    let upper = frame.get(top, col);
                    let lower = if top + 1 < frame.rows() {
                        frame.get(top + 1, col)
                    } else {
                        background
                    };
                    (upper, lower)
                })
                .collect()
        })
        .collect()
}

#[inline]
fn color(c: Rgb) -> Color {
    Color::Rgb {
        r: c.r,
        g: c.g,
        b: c.b,
    }
}

fn display_err(e: io::Error) -> TickerError {
    TickerError::Display(format!("terminal: {}", e))
}

pub struct TerminalDisplay {
    out: Stdout,
    active: bool,
    quit: bool,
}

impl TerminalDisplay {
    /// Take over the terminal.
    pub fn open() -> Result<Self, TickerError> {
        enable_raw_mode().map_err(display_err)?;
        let mut out = io::stdout();
        execute!(out, EnterAlternateScreen, Hide, Clear(ClearType::All)).map_err(display_err)?;
        Ok(Self {
            out,
            active: true,
            quit: false,
        })
    }

    fn draw(&mut self, board: &TickerBoard) -> io::Result<()> {
        let frame = board.render();
        let rows = half_block_rows(&frame, board.grid().background());

        for (y, row) in rows.iter().enumerate() {
            queue!(self.out, MoveTo(0, y as u16))?;
            let mut current: Option<(Rgb, Rgb)> = None;
            for &(upper, lower) in row {
                // only emit colour changes
                if current != Some((upper, lower)) {
                    queue!(self.out, SetForegroundColor(color(upper)), SetBackgroundColor(color(lower)))?;
                    current = Some((upper, lower));
                }
                queue!(self.out, Print(HALF_BLOCK))?;
            }
            queue!(self.out, ResetColor)?;
        }

        let status = format!(
            " {}  [{}/{}]  next refresh in {}s  (q to quit)",
            board.message(),
            board.current_index() + 1,
            board.tickers().len(),
            board.until_refresh(Instant::now()).as_secs()
        );
        queue!(
            self.out,
            MoveTo(0, rows.len() as u16 + 1),
            Clear(ClearType::CurrentLine),
            Print(status)
        )?;
        self.out.flush()
    }

    fn poll_quit(&mut self) -> io::Result<bool> {
        while event::poll(Duration::ZERO)? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                let ctrl_c = key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL);
                if ctrl_c || matches!(key.code, KeyCode::Char('q') | KeyCode::Esc) {
                    return Ok(true);
                }
            }
        }
        Ok(false)
    }

    fn restore(&mut self) -> io::Result<()> {
        if !self.active {
            return Ok(());
        }
        self.active = false;
        execute!(self.out, ResetColor, Show, LeaveAlternateScreen)?;
        disable_raw_mode()
    }
}

#[async_trait]
impl Display for TerminalDisplay {
    fn name(&self) -> &'static str {
        "terminal"
    }

    async fn present(&mut self, board: &TickerBoard) -> Result<(), TickerError> {
        self.draw(board).map_err(display_err)
    }

    fn should_quit(&mut self) -> bool {
        if !self.quit {
            self.quit = self.poll_quit().unwrap_or_else(|e| {
                tracing::warn!("terminal input error: {e}");
                true
            });
        }
        self.quit
    }

    fn close(&mut self) -> Result<(), TickerError> {
        self.restore().map_err(display_err)
    }
}

impl Drop for TerminalDisplay {
    fn drop(&mut self) {
        let _ = self.restore();
    }
}
