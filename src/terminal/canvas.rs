//! Scene rasterization to terminal cells
//!
//! The 800x800 field is squeezed onto a character grid. A cell is roughly
//! twice as tall as it is wide, so the grid is laid out with twice as many
//! columns as rows to keep the field square on screen.

use ratatui::Frame;
use ratatui::layout::Rect as Area;
use ratatui::style::{Color as TermColor, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::consts::{FIELD_HEIGHT, FIELD_WIDTH};
use crate::renderer::vertex::colors as sprite_colors;
use crate::scene::{Color, DrawCmd, Scene, SpriteKind, TextRole};
use crate::sim::Rect;

/// One character cell
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cell {
    pub symbol: char,
    pub fg: [f32; 3],
    pub bg: [f32; 3],
    pub bold: bool,
}

impl Default for Cell {
    fn default() -> Self {
        Self {
            symbol: ' ',
            fg: [1.0; 3],
            bg: [0.0; 3],
            bold: false,
        }
    }
}

fn blend(top: Color, under: [f32; 3]) -> [f32; 3] {
    let a = top[3].clamp(0.0, 1.0);
    [
        top[0] * a + under[0] * (1.0 - a),
        top[1] * a + under[1] * (1.0 - a),
        top[2] * a + under[2] * (1.0 - a),
    ]
}

fn to_term(c: [f32; 3]) -> TermColor {
    let byte = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
    TermColor::Rgb(byte(c[0]), byte(c[1]), byte(c[2]))
}

/// Glyph hinting at an asteroid's spin
fn spin_glyph(angle_deg: f32, flip: bool) -> char {
    let angle = angle_deg + if flip { 180.0 } else { 0.0 };
    const GLYPHS: [char; 4] = ['|', '/', '-', '\\'];
    let step = ((angle.rem_euclid(180.0) + 22.5) / 45.0) as usize;
    GLYPHS[step % GLYPHS.len()]
}

/// Field contents as a grid of cells, row-major
#[derive(Debug, Clone, PartialEq)]
pub struct CellGrid {
    cols: usize,
    rows: usize,
    cells: Vec<Cell>,
}

impl CellGrid {
    pub fn new(cols: usize, rows: usize) -> Self {
        Self {
            cols,
            rows,
            cells: vec![Cell::default(); cols * rows],
        }
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn get(&self, col: usize, row: usize) -> Option<&Cell> {
        if col < self.cols && row < self.rows {
            self.cells.get(row * self.cols + col)
        } else {
            None
        }
    }

    fn get_mut(&mut self, col: usize, row: usize) -> Option<&mut Cell> {
        if col < self.cols && row < self.rows {
            self.cells.get_mut(row * self.cols + col)
        } else {
            None
        }
    }

    fn col_of(&self, x: f32) -> i64 {
        (x * self.cols as f32 / FIELD_WIDTH).floor() as i64
    }

    fn row_of(&self, y: f32) -> i64 {
        (y * self.rows as f32 / FIELD_HEIGHT).floor() as i64
    }

    /// Cells a field rectangle touches. Anything non-empty covers at least
    /// one cell so small sprites never vanish.
    fn span(&self, r: &Rect) -> (std::ops::Range<usize>, std::ops::Range<usize>) {
        let clamp_col = |c: i64| c.clamp(0, self.cols as i64) as usize;
        let clamp_row = |c: i64| c.clamp(0, self.rows as i64) as usize;

        let c0 = self.col_of(r.x());
        let r0 = self.row_of(r.y());
        let c1 = (r.right() * self.cols as f32 / FIELD_WIDTH).ceil() as i64;
        let r1 = (r.bottom() * self.rows as f32 / FIELD_HEIGHT).ceil() as i64;
        (
            clamp_col(c0)..clamp_col(c1.max(c0 + 1)),
            clamp_row(r0)..clamp_row(r1.max(r0 + 1)),
        )
    }

    fn fill(&mut self, r: &Rect, color: Color) {
        let (cols, rows) = self.span(r);
        for row in rows {
            for col in cols.clone() {
                if let Some(cell) = self.get_mut(col, row) {
                    cell.bg = blend(color, cell.bg);
                    cell.symbol = ' ';
                }
            }
        }
    }

    fn put(&mut self, col: i64, row: i64, symbol: char, color: Color) {
        if col < 0 || row < 0 {
            return;
        }
        if let Some(cell) = self.get_mut(col as usize, row as usize) {
            cell.fg = blend(color, cell.bg);
            cell.symbol = symbol;
        }
    }

    fn sprite(&mut self, kind: SpriteKind, r: &Rect, angle_deg: f32, flip: bool, alpha: f32) {
        let faded = |c: Color| [c[0], c[1], c[2], c[3] * alpha];
        let center = r.center();
        let (cc, cr) = (self.col_of(center.x), self.row_of(center.y));

        match kind {
            SpriteKind::Asteroid(variant) => {
                let color = faded(sprite_colors::asteroid(variant));
                let radius = r.size.x / 2.0;
                let glyph = spin_glyph(angle_deg, flip);
                let (cols, rows) = self.span(r);
                let cell_w = FIELD_WIDTH / self.cols as f32;
                let cell_h = FIELD_HEIGHT / self.rows as f32;
                let mut covered = false;
                for row in rows {
                    for col in cols.clone() {
                        let x = (col as f32 + 0.5) * cell_w;
                        let y = (row as f32 + 0.5) * cell_h;
                        let (dx, dy) = (x - center.x, y - center.y);
                        if dx * dx + dy * dy <= radius * radius {
                            if let Some(cell) = self.get_mut(col, row) {
                                cell.bg = blend(color, cell.bg);
                                cell.symbol = ' ';
                            }
                            covered = true;
                        }
                    }
                }
                if !covered {
                    self.fill(&Rect::new(center.x, center.y, 0.0, 0.0), color);
                }
                self.put(cc, cr, glyph, [0.0, 0.0, 0.0, 0.6 * alpha]);
            }
            SpriteKind::Player => {
                self.fill(r, faded(sprite_colors::SHIP_HULL));
                self.put(cc, cr, '^', faded(sprite_colors::SHIP_COCKPIT));
            }
            SpriteKind::Bullet => {
                self.put(cc, cr, '|', faded(sprite_colors::BULLET));
            }
            SpriteKind::Package => {
                self.fill(r, faded(sprite_colors::PACKAGE));
                self.put(cc, cr, '+', faded(sprite_colors::PACKAGE_STRAP));
            }
        }
    }

    fn line(&mut self, from: (f32, f32), to: (f32, f32), color: Color) {
        let (x0, y0) = (self.col_of(from.0), self.row_of(from.1));
        let (x1, y1) = (self.col_of(to.0), self.row_of(to.1));
        let symbol = if y0 == y1 {
            '─'
        } else if x0 == x1 {
            '│'
        } else {
            '·'
        };
        for (col, row) in line_cells(x0, y0, x1, y1) {
            self.put(col, row, symbol, color);
        }
    }

    fn text(&mut self, row: usize, col: usize, text: &str, color: Color, bold: bool) {
        for (i, ch) in text.chars().enumerate() {
            if let Some(cell) = self.get_mut(col + i, row) {
                cell.symbol = ch;
                cell.fg = blend(color, cell.bg);
                cell.bold = bold;
            }
        }
    }

    fn centered_text(&mut self, row: usize, text: &str, color: Color, bold: bool) {
        let width = text.chars().count();
        let col = self.cols.saturating_sub(width) / 2;
        self.text(row, col, text, color, bold);
    }

    /// Styled lines ready for a `Paragraph`
    pub fn to_lines(&self) -> Vec<Line<'static>> {
        self.cells
            .chunks(self.cols.max(1))
            .take(self.rows)
            .map(|row| {
                let spans: Vec<Span<'static>> = row
                    .iter()
                    .map(|cell| {
                        let mut style = Style::default().fg(to_term(cell.fg)).bg(to_term(cell.bg));
                        if cell.bold {
                            style = style.add_modifier(Modifier::BOLD);
                        }
                        Span::styled(String::from(cell.symbol), style)
                    })
                    .collect();
                Line::from(spans)
            })
            .collect()
    }
}

/// Bresenham walk between two cells, both ends included
fn line_cells(x0: i64, y0: i64, x1: i64, y1: i64) -> Vec<(i64, i64)> {
    let mut cells = Vec::new();
    let dx = (x1 - x0).abs();
    let dy = -(y1 - y0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;
    let (mut cx, mut cy) = (x0, y0);
    loop {
        cells.push((cx, cy));
        if cx == x1 && cy == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            cx += sx;
        }
        if e2 <= dx {
            err += dx;
            cy += sy;
        }
    }
    cells
}

/// Row for a text label on a grid `rows` high
fn text_row(role: TextRole, rows: usize) -> usize {
    let mid = rows / 2;
    match role {
        TextRole::Status => 0,
        TextRole::MenuLine(i) => (mid + i * 2).saturating_sub(4),
        TextRole::Banner(i) => (mid + i * 2).saturating_sub(1),
    }
}

/// Paint a scene onto a fresh grid
pub fn rasterize(scene: &Scene, cols: usize, rows: usize) -> CellGrid {
    let mut grid = CellGrid::new(cols, rows);
    if cols == 0 || rows == 0 {
        return grid;
    }

    for cmd in &scene.commands {
        match cmd {
            DrawCmd::Clear(color) => {
                grid.fill(&Rect::new(0.0, 0.0, FIELD_WIDTH, FIELD_HEIGHT), *color);
            }
            DrawCmd::FillRect { rect, color } => grid.fill(rect, *color),
            DrawCmd::Sprite {
                kind,
                rect,
                angle_deg,
                flip,
                alpha,
            } => grid.sprite(*kind, rect, *angle_deg, *flip, *alpha),
            DrawCmd::Line { from, to, color } => {
                grid.line((from.x, from.y), (to.x, to.y), *color);
            }
            DrawCmd::Text {
                role,
                text,
                color,
                selected,
                ..
            } => {
                let row = text_row(*role, rows);
                match role {
                    TextRole::Status => grid.text(row, 1, text, *color, false),
                    TextRole::MenuLine(_) | TextRole::Banner(_) => {
                        grid.centered_text(row, text, *color, *selected)
                    }
                }
            }
        }
    }
    grid
}

/// Largest area with a 2:1 column-to-row ratio, centered in `area`
pub fn field_area(area: Area) -> Area {
    let rows = area.height.min(area.width / 2);
    let cols = rows * 2;
    Area {
        x: area.x + (area.width - cols) / 2,
        y: area.y + (area.height - rows) / 2,
        width: cols,
        height: rows,
    }
}

/// Draw a scene into the whole frame
pub fn draw(frame: &mut Frame, scene: &Scene) {
    let area = field_area(frame.area());
    let grid = rasterize(scene, area.width as usize, area.height as usize);
    frame.render_widget(Paragraph::new(grid.to_lines()), area);
}
