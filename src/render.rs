use std::io::{self, Stdout, Write};
use std::thread;
use std::time::{Duration, Instant};

use crossterm::cursor::MoveTo;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseEventKind};
use crossterm::style::{Color, Print, ResetColor, SetForegroundColor};
use crossterm::terminal::{self, Clear, ClearType};
use crossterm::QueueableCommand;
use unicode_width::UnicodeWidthStr;

use maze_chase::components::{Direction, PickupKind, Tint};
use maze_chase::config::Config;
use maze_chase::game::{Control, Frame, Frontend};
use maze_chase::grid::Cell;
use maze_chase::Result;

const CELL_W: usize = 2;

/// What occupies one board cell this frame.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Glyph {
    Empty,
    Wall,
    Pickup(PickupKind),
    Player(Tint),
    Pursuer(Tint),
}

impl Glyph {
    fn look(self) -> (&'static str, Color) {
        match self {
            Glyph::Empty => ("  ", Color::Reset),
            Glyph::Wall => ("██", Color::Blue),
            Glyph::Pickup(PickupKind::Point) => (
                "· ",
                Color::Rgb {
                    r: 255,
                    g: 215,
                    b: 0,
                },
            ),
            Glyph::Pickup(PickupKind::Bonus) => ("🍒", Color::Red),
            Glyph::Pickup(PickupKind::Power) => ("● ", Color::Magenta),
            Glyph::Player(tint) => ("😃", tint_color(tint)),
            Glyph::Pursuer(Tint::Vulnerable) => ("😱", tint_color(Tint::Vulnerable)),
            Glyph::Pursuer(tint) => ("👻", tint_color(tint)),
        }
    }
}

struct Renderer {
    last: Vec<Glyph>,
    last_hud: String,
    needs_full: bool,
    origin_x: u16,
    origin_y: u16,
}

impl Renderer {
    fn new() -> Self {
        Self {
            last: Vec::new(),
            last_hud: String::new(),
            needs_full: true,
            origin_x: 0,
            origin_y: 1,
        }
    }
}

enum Answer {
    Continue,
    Quit,
}

/// Crossterm frontend: keyboard intents, diffed redraws and modal prompts.
pub struct Terminal<'a> {
    stdout: &'a mut Stdout,
    renderer: Renderer,
    tick: Duration,
    frame_time: Duration,
    last_tick: Instant,
    pending: Option<Direction>,
}

impl<'a> Terminal<'a> {
    pub fn new(stdout: &'a mut Stdout, config: &Config) -> Self {
        Self {
            stdout,
            renderer: Renderer::new(),
            tick: config.tick(),
            frame_time: config.frame_time(),
            last_tick: Instant::now(),
            pending: None,
        }
    }

    fn prompt(&mut self, title: &str, action: &str, score: u32) -> Result<bool> {
        let (term_w, term_h) = terminal::size()?;
        let lines = [
            title.to_string(),
            format!("Score: {score}"),
            format!("Enter or click to {action}, q to quit"),
        ];
        self.stdout.queue(Clear(ClearType::All))?;
        for (i, line) in lines.iter().enumerate() {
            let w = UnicodeWidthStr::width(line.as_str()) as u16;
            let x = term_w.saturating_sub(w) / 2;
            let y = (term_h / 2).saturating_sub(1) + i as u16;
            self.stdout.queue(MoveTo(x, y))?;
            self.stdout.queue(SetForegroundColor(Color::White))?;
            self.stdout.queue(Print(line))?;
        }
        self.stdout.queue(ResetColor)?;
        self.stdout.flush()?;
        self.renderer.needs_full = true;

        loop {
            let answer = match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => match key.code {
                    KeyCode::Enter | KeyCode::Char(' ') => Some(Answer::Continue),
                    _ if is_quit(&key) => Some(Answer::Quit),
                    _ => None,
                },
                Event::Mouse(mouse) if matches!(mouse.kind, MouseEventKind::Down(_)) => {
                    Some(Answer::Continue)
                }
                _ => None,
            };
            if let Some(answer) = answer {
                self.last_tick = Instant::now();
                self.pending = None;
                return Ok(matches!(answer, Answer::Continue));
            }
        }
    }
}

impl Frontend for Terminal<'_> {
    fn poll(&mut self) -> Result<Control> {
        loop {
            let frame_start = Instant::now();
            while event::poll(Duration::from_millis(0))? {
                match event::read()? {
                    Event::Key(key)
                        if matches!(key.kind, KeyEventKind::Press | KeyEventKind::Repeat) =>
                    {
                        if is_quit(&key) {
                            return Ok(Control::Quit);
                        }
                        if let Some(dir) = dir_for_key(key.code) {
                            self.pending = Some(dir);
                        }
                    }
                    Event::Resize(_, _) => self.renderer.needs_full = true,
                    _ => {}
                }
            }

            if self.last_tick.elapsed() >= self.tick {
                self.last_tick = Instant::now();
                return Ok(Control::Intent(self.pending.take()));
            }

            let elapsed = frame_start.elapsed();
            if elapsed < self.frame_time {
                thread::sleep(self.frame_time - elapsed);
            }
        }
    }

    fn render(&mut self, frame: &Frame<'_>) -> Result<()> {
        draw(self.stdout, &mut self.renderer, frame)?;
        Ok(())
    }

    fn level_complete(&mut self, level: u32, score: u32) -> Result<bool> {
        self.prompt(&format!("LEVEL {level} COMPLETE"), "continue", score)
    }

    fn game_over(&mut self, _level: u32, score: u32) -> Result<bool> {
        self.prompt("GAME OVER", "replay", score)
    }
}

fn is_quit(key: &KeyEvent) -> bool {
    matches!(key.code, KeyCode::Char('q') | KeyCode::Esc)
        || (key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL))
}

fn dir_for_key(code: KeyCode) -> Option<Direction> {
    match code {
        KeyCode::Up | KeyCode::Char('k') => Some(Direction::Up),
        KeyCode::Down | KeyCode::Char('j') => Some(Direction::Down),
        KeyCode::Left | KeyCode::Char('h') => Some(Direction::Left),
        KeyCode::Right | KeyCode::Char('l') => Some(Direction::Right),
        _ => None,
    }
}

/// Column and row of the board's top-left corner, or the size the terminal
/// must grow to when the board plus HUD does not fit.
fn fit(cols: usize, rows: usize, term: (u16, u16)) -> std::result::Result<(u16, u16), (u16, u16)> {
    let need = ((cols * CELL_W) as u16, (rows + 2) as u16);
    if term.0 < need.0 || term.1 < need.1 {
        return Err(need);
    }
    Ok(((term.0 - need.0) / 2, (term.1 - need.1) / 2 + 1))
}

/// Paints the board back to front: tiles, pickups, pursuers, then the player.
fn compose(frame: &Frame<'_>) -> Vec<Glyph> {
    let cols = frame.grid.cols();
    let index = |cell: Cell| cell.row * cols + cell.col;
    let mut board: Vec<Glyph> = (0..frame.grid.rows())
        .flat_map(|row| (0..cols).map(move |col| Cell::new(row, col)))
        .map(|cell| {
            if frame.grid.is_walkable(cell) {
                Glyph::Empty
            } else {
                Glyph::Wall
            }
        })
        .collect();
    for pickup in frame.pickups {
        board[index(pickup.cell)] = Glyph::Pickup(pickup.kind);
    }
    // Earlier roster entries end up on top when pursuers share a cell.
    for sprite in frame.pursuers.iter().rev() {
        board[index(sprite.rect.cell())] = Glyph::Pursuer(sprite.tint);
    }
    board[index(frame.player.rect.cell())] = Glyph::Player(frame.player.tint);
    board
}

fn draw(stdout: &mut Stdout, renderer: &mut Renderer, frame: &Frame<'_>) -> io::Result<()> {
    let cols = frame.grid.cols();
    let (term_w, term_h) = terminal::size()?;
    let (origin_x, origin_y) = match fit(cols, frame.grid.rows(), (term_w, term_h)) {
        Ok(origin) => origin,
        Err((need_w, need_h)) => {
            stdout
                .queue(Clear(ClearType::All))?
                .queue(MoveTo(0, 0))?
                .queue(Print(format!(
                    "Terminal too small: {need_w}x{need_h} needed, {term_w}x{term_h} available."
                )))?;
            renderer.needs_full = true;
            return stdout.flush();
        }
    };

    let board = compose(frame);
    if (origin_x, origin_y) != (renderer.origin_x, renderer.origin_y)
        || board.len() != renderer.last.len()
    {
        renderer.origin_x = origin_x;
        renderer.origin_y = origin_y;
        renderer.last = vec![Glyph::Empty; board.len()];
        renderer.needs_full = true;
    }
    if renderer.needs_full {
        stdout.queue(Clear(ClearType::All))?;
    }

    let hud = format!(
        "Level {}  Score {}  Pickups left {}{}  q quits",
        frame.level,
        frame.score,
        frame.pickups.len(),
        match frame.power_remaining {
            0 => String::new(),
            ticks => format!("  Power {ticks}"),
        }
    );
    if renderer.needs_full || hud != renderer.last_hud {
        stdout
            .queue(MoveTo(origin_x, origin_y - 1))?
            .queue(Clear(ClearType::CurrentLine))?
            .queue(SetForegroundColor(Color::White))?
            .queue(Print(&hud))?
            .queue(ResetColor)?;
        renderer.last_hud = hud;
    }

    let full = renderer.needs_full;
    for (idx, (&glyph, last)) in board.iter().zip(renderer.last.iter_mut()).enumerate() {
        if full || glyph != *last {
            *last = glyph;
            let x = origin_x + ((idx % cols) * CELL_W) as u16;
            let y = origin_y + (idx / cols) as u16;
            put(stdout, x, y, glyph)?;
        }
    }
    renderer.needs_full = false;
    stdout.flush()
}

fn tint_color(tint: Tint) -> Color {
    match tint {
        Tint::Yellow => Color::Yellow,
        Tint::White => Color::White,
        Tint::Pink => Color::Rgb {
            r: 255,
            g: 192,
            b: 203,
        },
        Tint::Red => Color::Red,
        Tint::Purple => Color::Rgb {
            r: 160,
            g: 32,
            b: 240,
        },
        Tint::Vulnerable => Color::Blue,
    }
}

/// Writes one board cell, padded to `CELL_W` columns.
fn put(stdout: &mut Stdout, x: u16, y: u16, glyph: Glyph) -> io::Result<()> {
    let (text, color) = glyph.look();
    let pad = CELL_W.saturating_sub(UnicodeWidthStr::width(text));
    stdout
        .queue(MoveTo(x, y))?
        .queue(SetForegroundColor(color))?
        .queue(Print(format!("{text}{}", " ".repeat(pad))))?
        .queue(ResetColor)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use maze_chase::game::Session;
    use maze_chase::ghost::{Pursuer, PursuerSpec};
    use maze_chase::grid::Grid;
    use maze_chase::level::{Maze, Pickup};
    use maze_chase::pathing::Strategy;
    use maze_chase::player::Player;

    use super::*;

    fn session(empowered: bool) -> Session {
        let maze = Maze {
            grid: Grid::parse(
                "#####\n\
                 #...#\n\
                 #####",
            )
            .unwrap(),
            pickups: vec![
                Pickup {
                    cell: Cell::new(1, 1),
                    kind: PickupKind::Point,
                },
                Pickup {
                    cell: Cell::new(1, 2),
                    kind: PickupKind::Bonus,
                },
            ],
        };
        let mut player = Player::new(Cell::new(1, 1));
        if empowered {
            player.empower();
        }
        let pursuer = Pursuer::new(&PursuerSpec {
            name: "red",
            spawn: Cell::new(1, 3),
            tint: Tint::Red,
            strategy: Strategy::ShortestPath,
            speed: 1,
        });
        Session::from_parts(1, maze, player, vec![pursuer], 10_000)
    }

    #[test]
    fn sprites_cover_tiles_and_pickups() {
        let session = session(false);
        let board = compose(&session.frame());
        assert_eq!(board.len(), 15);
        assert!(board[..5].iter().all(|&g| g == Glyph::Wall));
        assert_eq!(board[6], Glyph::Player(Tint::Yellow));
        assert_eq!(board[7], Glyph::Pickup(PickupKind::Bonus));
        assert_eq!(board[8], Glyph::Pursuer(Tint::Red));
    }

    #[test]
    fn vulnerable_pursuers_change_face_and_color() {
        let session = session(true);
        let board = compose(&session.frame());
        assert_eq!(board[8], Glyph::Pursuer(Tint::Vulnerable));
        assert_eq!(board[8].look(), ("😱", Color::Blue));
        assert_eq!(Glyph::Pursuer(Tint::Red).look(), ("👻", Color::Red));
    }

    #[test]
    fn board_is_centered_below_the_hud() {
        assert_eq!(fit(16, 12, (40, 20)), Ok((4, 4)));
        assert_eq!(fit(16, 12, (31, 20)), Err((32, 14)));
        assert_eq!(fit(16, 12, (32, 14)), Ok((0, 1)));
    }
}
