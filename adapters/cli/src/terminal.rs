//! Character-cell renderer drawn with `crossterm`, and the raw-mode guard
//! that keeps the terminal usable while it runs.

use std::io::{self, Write};

use anyhow::{Context, Result};
use crossterm::{
    cursor, execute, queue,
    style::{self, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{self, ClearType, EnterAlternateScreen, LeaveAlternateScreen},
};
use grid_tactics_core::{Cell, CellCoord, Team};
use grid_tactics_rendering::{Color, GridPresentation, Renderer, SceneUnit, UnitStyle};

const HEALTH_BAR_WIDTH: usize = 10;
const LINE_BREAK: &str = "\r\n";

/// Raw mode and the alternate screen, restored when dropped.
#[derive(Debug)]
pub(crate) struct TerminalGuard;

impl TerminalGuard {
    /// Switches the terminal to raw mode on the alternate screen.
    pub(crate) fn enter() -> Result<Self> {
        terminal::enable_raw_mode().context("failed to enable raw mode")?;
        let guard = Self;
        execute!(io::stdout(), EnterAlternateScreen, cursor::Hide)
            .context("failed to enter the alternate screen")?;
        Ok(guard)
    }
}

fn restore() -> io::Result<()> {
    let screen = execute!(io::stdout(), cursor::Show, LeaveAlternateScreen);
    let raw = terminal::disable_raw_mode();
    screen.and(raw)
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = restore();
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct Glyph {
    symbol: char,
    foreground: Option<Color>,
    background: Option<Color>,
    cursor: Option<Color>,
}

impl Glyph {
    const BLANK: Self = Self {
        symbol: ' ',
        foreground: None,
        background: None,
        cursor: None,
    };
}

/// Run of text drawn with one pair of colors.
#[derive(Clone, Debug, PartialEq)]
struct Span {
    text: String,
    foreground: Option<Color>,
    background: Option<Color>,
}

impl Span {
    fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            foreground: None,
            background: None,
        }
    }

    fn tinted(text: impl Into<String>, foreground: Color) -> Self {
        Self {
            foreground: Some(foreground),
            ..Self::plain(text)
        }
    }
}

fn terminal_color(color: Color) -> style::Color {
    let [r, g, b] = color.to_rgb_u8();
    style::Color::Rgb { r, g, b }
}

fn write_line<W: Write>(writer: &mut W, colored: bool, spans: &[Span]) -> io::Result<()> {
    for span in spans {
        let mut styled = false;
        if colored {
            if let Some(color) = span.foreground {
                queue!(writer, SetForegroundColor(terminal_color(color)))?;
                styled = true;
            }
            if let Some(color) = span.background {
                queue!(writer, SetBackgroundColor(terminal_color(color)))?;
                styled = true;
            }
        }
        queue!(writer, Print(&span.text))?;
        if styled {
            queue!(writer, ResetColor)?;
        }
    }
    queue!(writer, Print(LINE_BREAK))
}

/// Renders scenes as text, one glyph per grid cell.
///
/// Terrain is drawn as `.` or `#`, highlighted cells as `+`, units as `P` or
/// `E`, and the cursor cell is bracketed. Colors and screen clearing are only
/// emitted when enabled, so frames can also be captured as plain text.
#[derive(Debug)]
pub(crate) struct TerminalRenderer<W: Write> {
    writer: W,
    colored: bool,
    clears_screen: bool,
    size: u32,
    glyphs: Vec<Glyph>,
    legend: Vec<Vec<Span>>,
    text: Vec<String>,
}

impl<W: Write> TerminalRenderer<W> {
    /// Creates a renderer writing to `writer`.
    pub(crate) fn new(writer: W, colored: bool) -> Self {
        Self {
            writer,
            colored,
            clears_screen: false,
            size: 0,
            glyphs: Vec::new(),
            legend: Vec::new(),
            text: Vec::new(),
        }
    }

    /// Clears the screen and homes the cursor before every frame.
    pub(crate) fn clearing_screen(mut self) -> Self {
        self.clears_screen = true;
        self
    }

    fn glyph_mut(&mut self, grid: &GridPresentation, cell: CellCoord) -> Option<&mut Glyph> {
        if self.size != grid.size {
            self.size = grid.size;
            self.glyphs = vec![Glyph::BLANK; (grid.size as usize).pow(2)];
        }
        if !cell.is_within(self.size) {
            return None;
        }
        let index = cell.row() as usize * self.size as usize + cell.column() as usize;
        self.glyphs.get_mut(index)
    }

    fn grid_rows(&self) -> Vec<Vec<Span>> {
        self.glyphs
            .chunks((self.size as usize).max(1))
            .map(|row| {
                row.iter()
                    .map(|glyph| Span {
                        text: match glyph.cursor {
                            Some(_) => format!("[{}]", glyph.symbol),
                            None => format!(" {} ", glyph.symbol),
                        },
                        foreground: glyph.cursor.or(glyph.foreground),
                        background: glyph.background,
                    })
                    .collect()
            })
            .collect()
    }

    fn write_frame(&mut self) -> io::Result<()> {
        if self.clears_screen {
            queue!(
                self.writer,
                terminal::Clear(ClearType::All),
                cursor::MoveTo(0, 0)
            )?;
        }
        let rows = self.grid_rows();
        for line in rows.iter().chain(&self.legend) {
            write_line(&mut self.writer, self.colored, line)?;
        }
        for line in &self.text {
            write_line(&mut self.writer, self.colored, &[Span::plain(line.as_str())])?;
        }
        self.writer.flush()
    }
}

fn unit_symbol(team: Team) -> char {
    match team {
        Team::Player => 'P',
        Team::Enemy => 'E',
    }
}

fn cell_under(grid: &GridPresentation, unit: &SceneUnit) -> CellCoord {
    let last = grid.size.saturating_sub(1) as f32;
    let column = (unit.position.x / grid.cell_length).floor().clamp(0.0, last);
    let row = (unit.position.y / grid.cell_length).floor().clamp(0.0, last);
    CellCoord::new(column as u32, row as u32)
}

impl<W: Write> Renderer for TerminalRenderer<W> {
    fn draw_cell(&mut self, grid: &GridPresentation, cell: Cell, color: Color) {
        let symbol = if cell.kind().is_traversable() { '.' } else { '#' };
        if let Some(glyph) = self.glyph_mut(grid, cell.coord()) {
            *glyph = Glyph {
                symbol,
                foreground: None,
                background: Some(color),
                cursor: None,
            };
        }
    }

    fn draw_highlight(&mut self, grid: &GridPresentation, cells: &[CellCoord], color: Color) {
        for cell in cells {
            if let Some(glyph) = self.glyph_mut(grid, *cell) {
                if glyph.symbol == '.' {
                    glyph.symbol = '+';
                }
                glyph.background = Some(color);
            }
        }
    }

    fn draw_unit(&mut self, grid: &GridPresentation, unit: &SceneUnit, style: UnitStyle) {
        let cell = cell_under(grid, unit);
        if let Some(glyph) = self.glyph_mut(grid, cell) {
            glyph.symbol = unit_symbol(unit.team);
            glyph.foreground = Some(style.body);
            if let Some(backdrop) = style.backdrop {
                glyph.background = Some(backdrop);
            }
        }

        let filled = (unit.health_ratio() * HEALTH_BAR_WIDTH as f32).round() as usize;
        let marker = if unit.is_selected { ">" } else { " " };
        self.legend.push(vec![
            Span::plain(marker),
            Span::tinted(
                format!("{}{}", unit_symbol(unit.team), unit.id.get()),
                style.body,
            ),
            Span::plain(format!(" ({},{}) [", unit.cell.column(), unit.cell.row())),
            Span::tinted("=".repeat(filled), style.health_remaining),
            Span::tinted("-".repeat(HEALTH_BAR_WIDTH - filled), style.health_lost),
            Span::plain(format!("] {}", unit.health)),
        ]);
    }

    fn draw_cursor(&mut self, grid: &GridPresentation, cell: CellCoord, color: Color) {
        if let Some(glyph) = self.glyph_mut(grid, cell) {
            glyph.cursor = Some(color);
        }
    }

    fn draw_text(&mut self, lines: &[String], _color: Color) {
        self.text.extend(lines.iter().cloned());
    }

    fn present_frame(&mut self) -> Result<()> {
        let written = self.write_frame();
        self.glyphs.fill(Glyph::BLANK);
        self.legend.clear();
        self.text.clear();
        written.context("failed to write frame to terminal")
    }
}
