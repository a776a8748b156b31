// games/adventure.rs
//
// UnderTheBoard Adventure
// - 20x10 maze with walls, obstacles and four treasures.
// - Moves come from a compiled-in script (w/a/s/d, `q` quits); no keyboard.
// - Every move redraws the whole screen through the VGA writer.

use core::fmt::Write;

use crate::arch::x86_64::vga::{Color, TextBuffer, Writer};
use crate::config::KernelConfig;

pub const FIELD_WIDTH: usize = 20;
pub const FIELD_HEIGHT: usize = 10;
pub const TREASURE_POINTS: u32 = 100;

const START: (usize, usize) = (1, 1);
const TREASURES: [(usize, usize); 4] = [(5, 3), (15, 7), (10, 5), (8, 2)];
const OBSTACLES: [(usize, usize); 3] = [(4, 4), (12, 6), (7, 8)];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Tile {
    Wall = b'#',
    Floor = b'.',
    Treasure = b'$',
    Player = b'@',
}

impl Tile {
    pub const fn glyph(self) -> u8 {
        self as u8
    }

    pub const fn color(self) -> Color {
        match self {
            Tile::Wall => Color::LightBlue,
            Tile::Floor => Color::DarkGray,
            Tile::Treasure => Color::Yellow,
            Tile::Player => Color::LightGreen,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub fn from_key(key: u8) -> Option<Self> {
        match key.to_ascii_lowercase() {
            b'w' => Some(Direction::Up),
            b's' => Some(Direction::Down),
            b'a' => Some(Direction::Left),
            b'd' => Some(Direction::Right),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    Moved,
    Treasure,
    /// Wall, edge of the field, or a key that is not a direction.
    Stayed,
}

pub struct Adventure {
    player_x: usize,
    player_y: usize,
    score: u32,
    level: u32,
    field: [[Tile; FIELD_WIDTH]; FIELD_HEIGHT],
}

impl Adventure {
    pub fn new() -> Self {
        let mut game = Self {
            player_x: START.0,
            player_y: START.1,
            score: 0,
            level: 1,
            field: [[Tile::Floor; FIELD_WIDTH]; FIELD_HEIGHT],
        };
        game.generate_level();
        game
    }

    fn generate_level(&mut self) {
        for (y, row) in self.field.iter_mut().enumerate() {
            for (x, tile) in row.iter_mut().enumerate() {
                let border = y == 0 || y == FIELD_HEIGHT - 1 || x == 0 || x == FIELD_WIDTH - 1;
                *tile = if border { Tile::Wall } else { Tile::Floor };
            }
        }
        for (x, y) in TREASURES {
            self.field[y][x] = Tile::Treasure;
        }
        for (x, y) in OBSTACLES {
            self.field[y][x] = Tile::Wall;
        }
        self.field[self.player_y][self.player_x] = Tile::Player;
    }

    pub fn player(&self) -> (usize, usize) {
        (self.player_x, self.player_y)
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn tile(&self, x: usize, y: usize) -> Option<Tile> {
        self.field.get(y).and_then(|row| row.get(x)).copied()
    }

    pub fn move_player(&mut self, dir: Direction) -> MoveOutcome {
        let (x, y) = (self.player_x, self.player_y);
        let target = match dir {
            Direction::Up => y.checked_sub(1).map(|ny| (x, ny)),
            Direction::Down => Some((x, y + 1)),
            Direction::Left => x.checked_sub(1).map(|nx| (nx, y)),
            Direction::Right => Some((x + 1, y)),
        };
        let Some((nx, ny)) = target else {
            return MoveOutcome::Stayed;
        };

        let outcome = match self.tile(nx, ny) {
            None | Some(Tile::Wall) => return MoveOutcome::Stayed,
            Some(Tile::Treasure) => {
                self.score += TREASURE_POINTS;
                MoveOutcome::Treasure
            }
            Some(_) => MoveOutcome::Moved,
        };

        self.field[y][x] = Tile::Floor;
        self.player_x = nx;
        self.player_y = ny;
        self.field[ny][nx] = Tile::Player;
        outcome
    }

    /// Full-screen redraw: header, score line, field, legend.
    pub fn draw<B: TextBuffer>(&self, w: &mut Writer<B>) {
        w.clear();
        w.write_colored("=== UNDERTHEBOARD ADVENTURE ===\n", Color::Pink, Color::Black);

        w.write_colored("Score: ", Color::Yellow, Color::Black);
        write!(w, "{}", self.score).ok();
        w.write_colored("  Level: ", Color::Yellow, Color::Black);
        write!(w, "{}\n\n", self.level).ok();

        for row in self.field.iter() {
            for tile in row.iter() {
                w.with_color(tile.color(), Color::Black, |w| w.put_char(tile.glyph()));
            }
            w.put_char(b'\n');
        }

        w.write_string("\nLegend:\n");
        for (tile, what) in [
            (Tile::Player, "- Player\n"),
            (Tile::Treasure, "- Treasure\n"),
            (Tile::Wall, "- Wall/Obstacle\n"),
            (Tile::Floor, "- Empty space\n"),
        ] {
            w.with_color(tile.color(), Color::Black, |w| {
                w.put_char(tile.glyph());
                w.put_char(b' ');
            });
            w.write_string(what);
        }
    }

    /// Replays `moves` until `q` or the end of the script.
    pub fn run<B: TextBuffer>(&mut self, moves: &str, delay_spins: u32, w: &mut Writer<B>) {
        for key in moves.bytes().take_while(|&k| k != b'q') {
            let outcome = match Direction::from_key(key) {
                Some(dir) => self.move_player(dir),
                None => MoveOutcome::Stayed,
            };
            log::debug!("adventure: {:?} -> {:?} at {:?}", key as char, outcome, self.player());
            self.draw(w);

            if outcome == MoveOutcome::Treasure {
                w.write_colored("\nTreasure collected! +100 points", Color::Yellow, Color::Black);
            }
            w.write_string("\n[Simulated move: ");
            w.put_char(key);
            w.write_string("]\n");

            for _ in 0..delay_spins {
                core::hint::spin_loop();
            }
        }

        w.write_colored("\nGame Over!\n", Color::LightRed, Color::Black);
        w.write_colored("Final Score: ", Color::Yellow, Color::Black);
        writeln!(w, "{}", self.score).ok();
        w.write_string("Thanks for playing UnderTheBoard Adventure!\n");
        log::info!("adventure: finished with score {}", self.score);
    }
}

impl Default for Adventure {
    fn default() -> Self {
        Self::new()
    }
}

/// The `game` command: intro screen, then the scripted playthrough.
pub fn launch<B: TextBuffer>(w: &mut Writer<B>, config: &KernelConfig) {
    w.clear();
    w.write_colored("=== UNDERTHEBOARD ADVENTURE ===\n", Color::Pink, Color::Black);
    w.write_string("A simple text-based adventure game\n\n");

    w.write_string("Game Story:\n");
    w.write_string("You are an explorer in the UnderTheBoard realm.\n");
    w.write_string("Navigate through the maze and collect treasures!\n\n");

    w.write_string("Controls (simulated for demo):\n");
    w.write_string("W - Move Up\n");
    w.write_string("S - Move Down\n");
    w.write_string("A - Move Left\n");
    w.write_string("D - Move Right\n");
    w.write_string("Q - Quit Game\n\n");

    let mut game = Adventure::new();
    game.draw(w);
    game.run(config.game_moves, config.move_delay_spins, w);

    w.write_string("\nReturning to console...\n");
}
