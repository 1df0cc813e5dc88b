use crate::direction::Position;
use serde::{Deserialize, Serialize};

/// Cell symbol alphabet shared with the game host
pub const CH_VOID: char = ' ';
pub const CH_STONE: char = '#';
pub const CH_HEAD: char = '@';
pub const CH_BODY: char = 'o';
pub const CH_TAIL: char = '+';
pub const CH_DEAD_HEAD: char = 'x';
pub const CH_DEAD_BODY: char = '%';
pub const CH_DEAD_TAIL: char = ';';

/// Live snake segment symbols (any owner)
pub fn is_body_char(symbol: char) -> bool {
    matches!(symbol, CH_HEAD | CH_BODY | CH_TAIL)
}

/// Debris left behind by an eliminated snake
pub fn is_dead_body_char(symbol: char) -> bool {
    matches!(symbol, CH_DEAD_HEAD | CH_DEAD_BODY | CH_DEAD_TAIL)
}

/// Symbols treated as impassable: stone, live segments, dead debris
pub fn blocks(symbol: char) -> bool {
    symbol == CH_STONE || is_body_char(symbol) || is_dead_body_char(symbol)
}

/// Contents of a single grid cell: a symbol plus the owning snake's
/// color, if the symbol is a live snake segment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    pub symbol: char,
    pub owner: Option<u8>,
}

impl Cell {
    pub fn empty() -> Self {
        Cell {
            symbol: CH_VOID,
            owner: None,
        }
    }

    pub fn stone() -> Self {
        Cell {
            symbol: CH_STONE,
            owner: None,
        }
    }

    pub fn reward(value: u8) -> Self {
        debug_assert!(value <= 9);
        Cell {
            symbol: (b'0' + value) as char,
            owner: None,
        }
    }

    pub fn segment(symbol: char, owner: u8) -> Self {
        Cell {
            symbol,
            owner: Some(owner),
        }
    }

    /// Reward digit value, if this cell carries one
    pub fn reward_value(&self) -> Option<u8> {
        self.symbol.to_digit(10).map(|d| d as u8)
    }
}

/// Immutable-per-tick snapshot of the shared game grid
#[derive(Clone)]
pub struct World {
    pub rows: i32,
    pub cols: i32,
    cells: Vec<Cell>,
    /// Revision number - incremented whenever cells change
    revision: u64,
}

impl World {
    /// Create a world with every cell empty
    pub fn new(rows: i32, cols: i32) -> Self {
        World {
            rows,
            cols,
            cells: vec![Cell::empty(); (rows * cols) as usize],
            revision: 0,
        }
    }

    pub fn in_bounds(&self, pos: Position) -> bool {
        pos.x >= 0 && pos.x < self.cols && pos.y >= 0 && pos.y < self.rows
    }

    /// Cell lookup; out-of-bounds reads as stone so callers see it blocked
    pub fn get(&self, pos: Position) -> Cell {
        if !self.in_bounds(pos) {
            return Cell::stone();
        }
        self.cells[self.index(pos)]
    }

    pub fn set(&mut self, pos: Position, cell: Cell) {
        if self.in_bounds(pos) {
            let idx = self.index(pos);
            if self.cells[idx] != cell {
                self.cells[idx] = cell;
                self.revision += 1;
            }
        }
    }

    pub fn get_revision(&self) -> u64 {
        self.revision
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    fn index(&self, pos: Position) -> usize {
        (pos.x + pos.y * self.cols) as usize
    }

    /// Parse a world from an ASCII layout.
    ///
    /// Symbols: `#` stone, `0`-`9` rewards, `.` or space empty,
    /// `@`/`o`/`+` head/body/tail owned by `own_color`,
    /// `E` a foreign body segment, `x`/`%`/`;` dead debris.
    /// All rows must have the same width.
    pub fn from_layout(layout: &str, own_color: u8) -> Result<World, String> {
        let lines: Vec<&str> = lines_of(layout);
        if lines.is_empty() {
            return Err("Layout has no rows".to_string());
        }

        let cols = lines[0].chars().count() as i32;
        let rows = lines.len() as i32;
        let mut world = World::new(rows, cols);

        for (y, line) in lines.iter().enumerate() {
            if line.chars().count() as i32 != cols {
                return Err(format!("Row {} width differs from row 0", y));
            }
            for (x, ch) in line.chars().enumerate() {
                let pos = Position::new(x as i32, y as i32);
                let cell = match ch {
                    '.' | CH_VOID => Cell::empty(),
                    CH_STONE => Cell::stone(),
                    '0'..='9' => Cell::reward(ch.to_digit(10).unwrap() as u8),
                    CH_HEAD | CH_BODY | CH_TAIL => Cell::segment(ch, own_color),
                    'E' => Cell::segment(CH_BODY, own_color.wrapping_add(1)),
                    CH_DEAD_HEAD | CH_DEAD_BODY | CH_DEAD_TAIL => Cell {
                        symbol: ch,
                        owner: None,
                    },
                    other => return Err(format!("Unknown layout symbol '{}' at ({}, {})", other, x, y)),
                };
                world.set(pos, cell);
            }
        }

        Ok(world)
    }

    /// Render the world back to an ASCII layout (empty cells as '.')
    pub fn to_layout(&self) -> String {
        let mut result = String::new();
        for y in 0..self.rows {
            for x in 0..self.cols {
                let cell = self.get(Position::new(x, y));
                result.push(if cell.symbol == CH_VOID { '.' } else { cell.symbol });
            }
            result.push('\n');
        }
        result
    }
}

fn lines_of(layout: &str) -> Vec<&str> {
    layout
        .lines()
        .filter(|line| !line.trim().is_empty())
        .collect()
}
