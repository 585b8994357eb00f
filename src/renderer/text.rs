//! Character-grid renderer for terminals and logs
//!
//! One character per 20x20 arena cell, 24 columns by 32 rows, with the HUD
//! on a line above the grid and overlay text stamped into fixed rows.

use std::io::Write;

use super::{DrawItem, Frame, Overlay, Renderer, Sprite};
use crate::consts::{CELL_SIZE, COLS, ROWS};

// ── Overlay rows ────────────────────────────────────────────────────────────

const ROW_TITLE: usize = 10;
const ROW_LEADING: usize = 13;
const ROW_BEST: usize = 15;
const ROW_GAME_OVER: usize = 11;
const ROW_THANKS: usize = 17;
const ROW_START: usize = 28;

fn glyph(sprite: Sprite) -> char {
    match sprite {
        Sprite::Player => 'A',
        Sprite::Laser => '|',
        Sprite::Mushroom => 'o',
        Sprite::PoisonMushroom => '%',
        Sprite::SegmentVertical => '8',
        Sprite::SegmentHorizontal => '=',
        Sprite::Spider => 'X',
        Sprite::Flea => 'v',
        Sprite::ScorpionLeft => '<',
        Sprite::ScorpionRight => '>',
    }
}

/// Draws one in every `every` frames to `out`
pub struct TextRenderer<W: Write> {
    out: W,
    every: u64,
    frames_seen: u64,
}

impl<W: Write> TextRenderer<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            every: 1,
            frames_seen: 0,
        }
    }

    /// Only draw every `n`th frame (frames carrying a transition overlay are
    /// always drawn)
    pub fn every(mut self, n: u64) -> Self {
        self.every = n.max(1);
        self
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    /// Rasterise a frame into grid rows plus an optional HUD line
    pub fn compose(frame: &Frame) -> (Option<String>, Vec<String>) {
        let mut grid = vec![vec![' '; COLS as usize]; ROWS as usize];
        for item in &frame.items {
            if let Some((col, row)) = cell(item) {
                grid[row][col] = glyph(item.sprite);
            }
        }

        let mut hud = None;
        for overlay in &frame.overlays {
            match *overlay {
                Overlay::Hud {
                    score,
                    lives,
                    leading,
                } => {
                    hud = Some(format!("SCORE {score:>7}  LIVES {lives}  LEAD {leading:>7}"));
                }
                Overlay::Menu { leading, best } => {
                    stamp(&mut grid, ROW_TITLE, "CENTIPEDE");
                    stamp(&mut grid, ROW_LEADING, &format!("LEADERBOARD: {leading}"));
                    stamp(&mut grid, ROW_BEST, &format!("YOUR HIGHSCORE: {best}"));
                    stamp(&mut grid, ROW_START, "PRESS SPACE TO START");
                }
                Overlay::GameOver => stamp(&mut grid, ROW_GAME_OVER, "GAME OVER"),
                Overlay::Thanks { score_saved } => {
                    stamp(&mut grid, ROW_THANKS, "THANK YOU FOR PLAYING!");
                    if score_saved {
                        stamp(&mut grid, ROW_THANKS + 2, "YOUR SCORE HAS BEEN");
                        stamp(&mut grid, ROW_THANKS + 3, "ADDED TO THE");
                        stamp(&mut grid, ROW_THANKS + 4, "LEADERBOARD.");
                    }
                }
            }
        }

        let rows = grid.into_iter().map(|r| r.into_iter().collect()).collect();
        (hud, rows)
    }
}

/// Grid cell under an item's centre, if on screen
fn cell(item: &DrawItem) -> Option<(usize, usize)> {
    let col = item.pos.x.div_euclid(CELL_SIZE);
    let row = item.pos.y.div_euclid(CELL_SIZE);
    if (0..COLS).contains(&col) && (0..ROWS).contains(&row) {
        Some((col as usize, row as usize))
    } else {
        None
    }
}

/// Write `text` centred on `row`, clipped to the grid width
fn stamp(grid: &mut [Vec<char>], row: usize, text: &str) {
    let Some(line) = grid.get_mut(row) else {
        return;
    };
    let width = line.len();
    let chars: Vec<char> = text.chars().take(width).collect();
    let start = (width - chars.len()) / 2;
    line[start..start + chars.len()].copy_from_slice(&chars);
}

impl<W: Write> Renderer for TextRenderer<W> {
    fn draw(&mut self, frame: &Frame) -> std::io::Result<()> {
        let transition = frame
            .overlays
            .iter()
            .any(|o| matches!(o, Overlay::GameOver | Overlay::Thanks { .. }));
        let due = self.frames_seen % self.every == 0;
        self.frames_seen += 1;
        if !due && !transition {
            return Ok(());
        }

        log::debug!("Drawing text frame {}", self.frames_seen);
        let (hud, rows) = Self::compose(frame);
        if let Some(hud) = hud {
            writeln!(self.out, "{hud}")?;
        }
        let border = "-".repeat(COLS as usize);
        writeln!(self.out, "+{border}+")?;
        for row in rows {
            writeln!(self.out, "|{row}|")?;
        }
        writeln!(self.out, "+{border}+")?;
        self.out.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::IVec2;

    fn item(sprite: Sprite, x: i32, y: i32) -> DrawItem {
        DrawItem {
            sprite,
            pos: IVec2::new(x, y),
        }
    }

    #[test]
    fn test_compose_places_glyphs() {
        let frame = Frame {
            items: vec![
                item(Sprite::Player, 240, 625),
                item(Sprite::Mushroom, 30, 30),
                item(Sprite::SegmentHorizontal, 10, -10),
            ],
            overlays: vec![Overlay::Hud {
                score: 50,
                lives: 2,
                leading: 900,
            }],
            background: None,
        };
        let (hud, rows) = TextRenderer::<Vec<u8>>::compose(&frame);
        assert_eq!(rows.len(), ROWS as usize);
        assert_eq!(rows[31].chars().nth(12), Some('A'));
        assert_eq!(rows[1].chars().nth(1), Some('o'));
        // Off-screen segment is skipped
        assert!(rows.iter().all(|r| !r.contains('=')));
        let hud = hud.unwrap_or_default();
        assert!(hud.contains("50"));
        assert!(hud.contains("LIVES 2"));
        assert!(hud.contains("900"));
    }

    #[test]
    fn test_later_items_paint_over() {
        let frame = Frame {
            items: vec![
                item(Sprite::SegmentVertical, 50, 50),
                item(Sprite::Mushroom, 50, 50),
            ],
            ..Default::default()
        };
        let (_, rows) = TextRenderer::<Vec<u8>>::compose(&frame);
        assert_eq!(rows[2].chars().nth(2), Some('o'));
    }

    #[test]
    fn test_menu_text() {
        let frame = Frame::default().with_overlay(Overlay::Menu {
            leading: 1234,
            best: 56,
        });
        let (hud, rows) = TextRenderer::<Vec<u8>>::compose(&frame);
        assert!(hud.is_none());
        assert!(rows[ROW_TITLE].contains("CENTIPEDE"));
        assert!(rows[ROW_LEADING].contains("1234"));
        assert!(rows[ROW_BEST].contains("56"));
        assert!(rows[ROW_START].contains("START"));
    }

    #[test]
    fn test_draw_skips_frames_but_not_transitions() {
        let mut r = TextRenderer::new(Vec::new()).every(10);
        r.draw(&Frame::default()).unwrap();
        let first = r.out.len();
        assert!(first > 0);
        r.draw(&Frame::default()).unwrap();
        assert_eq!(r.out.len(), first);
        r.draw(&Frame::default().with_overlay(Overlay::GameOver)).unwrap();
        let text = String::from_utf8(r.into_inner()).unwrap();
        assert!(text.contains("GAME OVER"));
    }
}
