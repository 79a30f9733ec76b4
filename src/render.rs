use std::io::{self, Stdout, Write};

use crossterm::cursor::MoveTo;
use crossterm::style::{Color, Print, ResetColor, SetForegroundColor};
use crossterm::terminal::{self, Clear, ClearType};
use crossterm::QueueableCommand;
use unicode_width::UnicodeWidthStr;

use maze_chase::{Cell, Game, GameState, Outcome, Tile};

const CELL_W: usize = 2;

#[derive(Clone, Copy, PartialEq, Eq)]
enum Glyph {
    Player,
    Pursuer,
    Frightened,
    Wall,
    Empty,
    Pellet,
    Power,
}

#[derive(Clone, Copy, PartialEq)]
struct Sprite {
    glyph: Glyph,
    color: Color,
}

const BLANK: Sprite = Sprite {
    glyph: Glyph::Empty,
    color: Color::Reset,
};

/// Diffing terminal renderer: only cells that changed since the last frame
/// are redrawn.
pub struct Renderer {
    last: Vec<Sprite>,
    last_hud: String,
    last_state: Option<GameState>,
    needs_full: bool,
    origin_x: u16,
    origin_y: u16,
}

impl Renderer {
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            last: vec![BLANK; rows * cols],
            last_hud: String::new(),
            last_state: None,
            needs_full: true,
            origin_x: 0,
            origin_y: 1,
        }
    }

    pub fn draw(&mut self, stdout: &mut Stdout, game: &Game) -> io::Result<()> {
        let grid = game.grid();
        let (rows, cols) = (grid.rows(), grid.cols());
        if self.last.len() != rows * cols {
            self.last = vec![BLANK; rows * cols];
            self.needs_full = true;
        }
        let needed_h = (rows + 3) as u16;
        let needed_w = (cols * CELL_W) as u16;

        stdout.queue(MoveTo(0, 0))?;
        let (term_w, term_h) = terminal::size()?;
        if term_w < needed_w || term_h < needed_h {
            stdout.queue(Clear(ClearType::All))?;
            stdout.queue(Print(format!(
                "Terminal too small. Need at least {needed_w}x{needed_h} (cols x rows). Current: {term_w}x{term_h}."
            )))?;
            stdout.flush()?;
            self.needs_full = true;
            return Ok(());
        }

        let origin_x = (term_w - needed_w) / 2;
        let origin_y = (term_h - needed_h) / 2 + 1;
        if origin_x != self.origin_x || origin_y != self.origin_y {
            self.origin_x = origin_x;
            self.origin_y = origin_y;
            self.needs_full = true;
        }
        if self.last_state != Some(game.state()) {
            self.last_state = Some(game.state());
            stdout.queue(Clear(ClearType::All))?;
            self.needs_full = true;
        }

        match game.state() {
            GameState::StartScreen => self.draw_start_screen(stdout)?,
            GameState::Playing => self.draw_board(stdout, game)?,
            GameState::GameOver(outcome) => {
                self.draw_board(stdout, game)?;
                self.draw_game_over(stdout, game, outcome, rows)?;
            }
        }
        self.needs_full = false;
        stdout.flush()
    }

    fn draw_start_screen(&mut self, stdout: &mut Stdout) -> io::Result<()> {
        if !self.needs_full {
            return Ok(());
        }
        let lines = [
            "M A Z E   C H A S E",
            "",
            "Enter / Space  start",
            "Arrows, WASD or hjkl  steer",
            "m  mute    Esc  menu    q  quit",
        ];
        for (offset, line) in lines.iter().enumerate() {
            stdout.queue(MoveTo(self.origin_x, self.origin_y + 2 + offset as u16))?;
            stdout.queue(SetForegroundColor(Color::Yellow))?;
            stdout.queue(Print(line))?;
        }
        stdout.queue(ResetColor)?;
        Ok(())
    }

    fn draw_board(&mut self, stdout: &mut Stdout, game: &Game) -> io::Result<()> {
        let power = game.player().power.is_active();
        let hud = format!(
            "Score: {}  Lives: {}  Pellets: {}  Power: {}{}",
            game.score(),
            game.lives(),
            game.grid().remaining_pellets(),
            if power { "ON" } else { "off" },
            if game.is_muted() { "  [muted]" } else { "" },
        );
        if self.needs_full || hud != self.last_hud {
            stdout.queue(MoveTo(self.origin_x, self.origin_y - 1))?;
            stdout.queue(SetForegroundColor(Color::White))?;
            stdout.queue(Clear(ClearType::CurrentLine))?;
            stdout.queue(Print(&hud))?;
            stdout.queue(ResetColor)?;
            self.last_hud = hud;
        }

        let cols = game.grid().cols();
        for (cell, tile) in game.grid().tiles() {
            let sprite = sprite_for(game, cell, tile, power);
            let idx = cell.row * cols + cell.col;
            if self.needs_full || sprite != self.last[idx] {
                self.last[idx] = sprite;
                self.draw_cell(stdout, cell, sprite)?;
            }
        }
        Ok(())
    }

    fn draw_cell(&self, stdout: &mut Stdout, cell: Cell, sprite: Sprite) -> io::Result<()> {
        let text = match sprite.glyph {
            Glyph::Player => "😃",
            Glyph::Pursuer => "👻",
            Glyph::Frightened => "😱",
            Glyph::Wall => "██",
            Glyph::Empty => "  ",
            Glyph::Pellet => "· ",
            Glyph::Power => "● ",
        };
        let x = self.origin_x + (cell.col * CELL_W) as u16;
        let y = self.origin_y + cell.row as u16;
        stdout.queue(MoveTo(x, y))?;
        stdout.queue(SetForegroundColor(sprite.color))?;
        stdout.queue(Print(text))?;
        let w = UnicodeWidthStr::width(text);
        for _ in w..CELL_W {
            stdout.queue(Print(' '))?;
        }
        stdout.queue(ResetColor)?;
        Ok(())
    }

    fn draw_game_over(
        &self,
        stdout: &mut Stdout,
        game: &Game,
        outcome: Outcome,
        rows: usize,
    ) -> io::Result<()> {
        let headline = match outcome {
            Outcome::Won => "YOU WIN",
            Outcome::Lost => "GAME OVER",
        };
        stdout.queue(MoveTo(self.origin_x, self.origin_y + rows as u16))?;
        stdout.queue(Clear(ClearType::CurrentLine))?;
        stdout.queue(Print(format!(
            "{headline} - Final Score: {} (Enter to play again, q to quit)",
            game.score()
        )))?;
        Ok(())
    }
}

fn sprite_for(game: &Game, cell: Cell, tile: Tile, power: bool) -> Sprite {
    let grid = game.grid();
    if game.player().body.cell(grid) == cell {
        return Sprite {
            glyph: Glyph::Player,
            color: Color::Yellow,
        };
    }
    if game.pursuers().iter().any(|p| p.body.cell(grid) == cell) {
        return if power {
            Sprite {
                glyph: Glyph::Frightened,
                color: Color::Blue,
            }
        } else {
            Sprite {
                glyph: Glyph::Pursuer,
                color: Color::Red,
            }
        };
    }
    match tile {
        Tile::Wall => Sprite {
            glyph: Glyph::Wall,
            color: Color::Blue,
        },
        Tile::Empty | Tile::Consumed => BLANK,
        Tile::Pellet => Sprite {
            glyph: Glyph::Pellet,
            color: Color::White,
        },
        Tile::PowerPellet => Sprite {
            glyph: Glyph::Power,
            color: Color::Magenta,
        },
    }
}
