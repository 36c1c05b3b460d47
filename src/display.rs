/// Rendering layer — all terminal I/O lives here.
///
/// `TerminalSurface` implements the simulation's `Surface` by rasterising
/// playfield pixels into a grid of terminal cells, then flushing the grid
/// with crossterm in one pass.  No game logic is performed here.

use std::io::Write;
use std::ops::Range;

use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal, QueueableCommand,
};
use glam::Vec2;

use flight_shooter::entities::{Assets, Rect, Rgb, Sprite, SpriteKind};
use flight_shooter::surface::Surface;

// ── Colour palette ────────────────────────────────────────────────────────────

const C_PLAYER: Rgb = Rgb::hex(0x37474F);
const C_ENEMY: Rgb = Rgb::hex(0xB71C1C);
const C_WRECK: Rgb = Rgb::hex(0x424242);
const C_SCREEN_BG: Color = Color::Black;
const C_TITLE: Color = Color::Cyan;
const C_HINT: Color = Color::DarkGrey;
const C_SCORE: Color = Color::Yellow;

/// Sprite dimensions in source pixels.  Only the aspect ratio reaches the
/// simulation, through each craft's derived height.
pub fn sprite_assets() -> Assets {
    Assets {
        player: Sprite::new(SpriteKind::Player, 512, 256),
        enemy: Sprite::new(SpriteKind::Enemy, 512, 256),
        enemy_destroyed: Sprite::new(SpriteKind::EnemyDestroyed, 512, 256),
    }
}

fn term(c: Rgb) -> Color {
    Color::Rgb {
        r: c.r,
        g: c.g,
        b: c.b,
    }
}

// ── Cell buffer ───────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq)]
struct Cell {
    ch: char,
    fg: Rgb,
    bg: Rgb,
}

const BLANK: Cell = Cell {
    ch: ' ',
    fg: Rgb::WHITE,
    bg: Rgb::hex(0x000000),
};

pub struct TerminalSurface {
    cols: u16,
    rows: u16,
    playfield: Vec2,
    /// Cells per playfield pixel on each axis.
    scale: Vec2,
    cells: Vec<Cell>,
}

impl TerminalSurface {
    pub fn new(cols: u16, rows: u16, playfield: Vec2) -> Self {
        let mut surface = Self {
            cols: 0,
            rows: 0,
            playfield,
            scale: Vec2::ZERO,
            cells: Vec::new(),
        };
        surface.resize(cols, rows);
        surface
    }

    pub fn resize(&mut self, cols: u16, rows: u16) {
        self.cols = cols.max(1);
        self.rows = rows.max(1);
        self.scale = Vec2::new(
            self.cols as f32 / self.playfield.x,
            self.rows as f32 / self.playfield.y,
        );
        self.cells = vec![BLANK; self.cols as usize * self.rows as usize];
    }

    fn cell_mut(&mut self, col: u16, row: u16) -> &mut Cell {
        &mut self.cells[row as usize * self.cols as usize + col as usize]
    }

    fn to_cell(&self, p: Vec2) -> Option<(u16, u16)> {
        let c = p * self.scale;
        if c.x < 0.0 || c.y < 0.0 || c.x >= self.cols as f32 || c.y >= self.rows as f32 {
            return None;
        }
        Some((c.x as u16, c.y as u16))
    }

    /// Cells covered by `rect`.  Anything with a positive size covers at
    /// least one cell so thin shots and health bars stay visible.
    fn span(&self, rect: Rect) -> Option<(Range<u16>, Range<u16>)> {
        if rect.size.x <= 0.0 || rect.size.y <= 0.0 {
            return None;
        }
        let axis = |lo: f32, hi: f32, scale: f32, limit: u16| -> Option<Range<u16>> {
            let start = (lo * scale).floor().max(0.0);
            let end = (hi * scale).ceil().min(limit as f32).max(start + 1.0);
            if start >= limit as f32 || hi * scale <= 0.0 {
                return None;
            }
            Some(start as u16..end.min(limit as f32) as u16)
        };
        let cols = axis(rect.left(), rect.right(), self.scale.x, self.cols)?;
        let rows = axis(rect.top(), rect.bottom(), self.scale.y, self.rows)?;
        Some((cols, rows))
    }

    /// Write the whole buffer to the terminal, emitting colour changes only
    /// where they happen.
    pub fn present<W: Write>(&self, out: &mut W) -> std::io::Result<()> {
        let mut last: Option<(Rgb, Rgb)> = None;
        for row in 0..self.rows {
            out.queue(cursor::MoveTo(0, row))?;
            let start = row as usize * self.cols as usize;
            for cell in &self.cells[start..start + self.cols as usize] {
                if last != Some((cell.fg, cell.bg)) {
                    out.queue(style::SetForegroundColor(term(cell.fg)))?;
                    out.queue(style::SetBackgroundColor(term(cell.bg)))?;
                    last = Some((cell.fg, cell.bg));
                }
                out.queue(Print(cell.ch))?;
            }
        }
        out.queue(style::ResetColor)?;
        out.flush()?;
        Ok(())
    }
}

impl Surface for TerminalSurface {
    fn fill_rect(&mut self, rect: Rect, color: Rgb) {
        let Some((cols, rows)) = self.span(rect) else {
            return;
        };
        for row in rows {
            for col in cols.clone() {
                *self.cell_mut(col, row) = Cell {
                    ch: ' ',
                    fg: color,
                    bg: color,
                };
            }
        }
    }

    fn draw_image(&mut self, sprite: &Sprite, dest: Rect) {
        let Some((cols, rows)) = self.span(dest) else {
            return;
        };
        let (body, nose, fg) = match sprite.kind {
            SpriteKind::Player => ('█', Some((cols.end - 1, '▶')), C_PLAYER),
            SpriteKind::Enemy => ('█', Some((cols.start, '◀')), C_ENEMY),
            SpriteKind::EnemyDestroyed => ('▒', None, C_WRECK),
        };
        let mid = rows.start + (rows.end - rows.start) / 2;
        for row in rows {
            for col in cols.clone() {
                let cell = self.cell_mut(col, row);
                cell.fg = fg;
                cell.ch = match nose {
                    Some((nose_col, glyph)) if col == nose_col && row == mid => glyph,
                    // Nose column is blank except on the middle row.
                    Some((nose_col, _)) if col == nose_col => ' ',
                    _ => body,
                };
            }
        }
    }

    /// Tints every cell whose centre lies inside the circle.  The cell under
    /// `center` is always tinted so small glows stay visible.
    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Rgb, alpha: f32) {
        let home = self.to_cell(center);
        let extent = Vec2::splat(radius.max(0.0));
        let area = Rect {
            origin: center - extent,
            size: extent * 2.0,
        };
        let tint = |surface: &mut Self, col: u16, row: u16| {
            let cell = surface.cell_mut(col, row);
            cell.bg = color.blend_over(cell.bg, alpha);
        };

        if let Some((cols, rows)) = self.span(area) {
            for row in rows {
                for col in cols.clone() {
                    let mid = Vec2::new(col as f32 + 0.5, row as f32 + 0.5) / self.scale;
                    if home == Some((col, row)) || mid.distance(center) <= radius {
                        tint(self, col, row);
                    }
                }
            }
        } else if let Some((col, row)) = home {
            tint(self, col, row);
        }
    }

    fn fill_text(&mut self, text: &str, at: Vec2, color: Rgb) {
        let Some((col, row)) = self.to_cell(at) else {
            return;
        };
        for (i, ch) in text.chars().enumerate() {
            let c = col as usize + i;
            if c >= self.cols as usize {
                break;
            }
            let cell = self.cell_mut(c as u16, row);
            cell.ch = ch;
            cell.fg = color;
        }
    }
}

// ── Menus ─────────────────────────────────────────────────────────────────────

fn centered<W: Write>(out: &mut W, row: u16, text: &str, color: Color) -> std::io::Result<()> {
    let (width, _) = terminal::size()?;
    let col = (width / 2).saturating_sub(text.chars().count() as u16 / 2);
    out.queue(cursor::MoveTo(col, row))?;
    out.queue(style::SetForegroundColor(color))?;
    out.queue(Print(text))?;
    Ok(())
}

fn blank_screen<W: Write>(out: &mut W) -> std::io::Result<u16> {
    out.queue(style::SetBackgroundColor(C_SCREEN_BG))?;
    out.queue(terminal::Clear(terminal::ClearType::All))?;
    let (_, height) = terminal::size()?;
    Ok(height / 2)
}

pub fn title_screen<W: Write>(out: &mut W) -> std::io::Result<()> {
    let cy = blank_screen(out)?;
    centered(out, cy.saturating_sub(4), "✈  FLIGHT SHOOTER  ✈", C_TITLE)?;
    centered(out, cy.saturating_sub(1), "↑ ↓ / W S : Climb & dive", C_HINT)?;
    centered(out, cy, "Z / SPACE : Fire", C_HINT)?;
    centered(out, cy + 2, "ENTER : Start    Q : Quit", Color::White)?;
    out.queue(style::ResetColor)?;
    out.flush()
}

pub fn summary_screen<W: Write>(out: &mut W, score: u32) -> std::io::Result<()> {
    let cy = blank_screen(out)?;
    centered(out, cy.saturating_sub(3), "G A M E   O V E R", Color::Red)?;
    centered(out, cy.saturating_sub(1), &format!("Enemies downed: {score}"), C_SCORE)?;
    centered(out, cy + 2, "R : Fly again    Q : Quit", Color::White)?;
    out.queue(style::ResetColor)?;
    out.flush()
}

#[cfg(test)]
mod tests {
    use super::*;

    // 1 cell per 10 pixels on both axes
    fn surface() -> TerminalSurface {
        TerminalSurface::new(10, 10, Vec2::new(100.0, 100.0))
    }

    fn tinted(s: &TerminalSurface) -> Vec<(u16, u16)> {
        let mut out = Vec::new();
        for row in 0..s.rows {
            for col in 0..s.cols {
                if s.cells[row as usize * s.cols as usize + col as usize].bg != BLANK.bg {
                    out.push((col, row));
                }
            }
        }
        out
    }

    #[test]
    fn glow_covers_cells_within_radius() {
        let mut s = surface();
        s.fill_circle(Vec2::new(50.0, 50.0), 20.0, Rgb::RED, 1.0);
        let cells = tinted(&s);

        assert!(cells.len() > 1, "{cells:?}");
        for (col, row) in [(5, 5), (4, 4), (3, 5), (5, 6)] {
            assert!(cells.contains(&(col, row)), "({col}, {row}) missing: {cells:?}");
        }
        // Corners of the bounding square lie outside the circle
        for (col, row) in [(3, 3), (6, 6), (3, 6), (6, 3)] {
            assert!(!cells.contains(&(col, row)), "({col}, {row}) tinted: {cells:?}");
        }
    }

    #[test]
    fn small_glow_still_tints_its_own_cell() {
        let mut s = surface();
        s.fill_circle(Vec2::new(12.0, 37.0), 1.0, Rgb::RED, 0.75);
        assert_eq!(tinted(&s), vec![(1, 3)]);
    }

    #[test]
    fn glow_off_the_playfield_draws_nothing() {
        let mut s = surface();
        s.fill_circle(Vec2::new(-40.0, 50.0), 5.0, Rgb::RED, 1.0);
        assert!(tinted(&s).is_empty());
    }
}
