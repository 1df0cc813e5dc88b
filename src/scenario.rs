use crate::world::{Cell, World};
use serde::{Deserialize, Serialize};
use std::fs;

/// Snapshot of a full game world, restorable for replay
#[derive(Debug, Serialize, Deserialize)]
pub struct Scenario {
    /// Grid revision number at capture time
    pub grid_revision: u64,
    /// Grid dimensions
    pub grid_cols: i32,
    pub grid_rows: i32,
    /// Row-major cell contents
    pub cells: Vec<Cell>,
    /// Game tick at capture time
    pub tick: u64,
}

impl Scenario {
    /// Capture a scenario from the current world
    pub fn from_world(world: &World, tick: u64) -> Self {
        Scenario {
            grid_revision: world.get_revision(),
            grid_cols: world.cols,
            grid_rows: world.rows,
            cells: world.cells().to_vec(),
            tick,
        }
    }

    /// Save to file
    pub fn save_to_file(&self, path: &str) -> Result<(), String> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| format!("Failed to serialize scenario: {}", e))?;

        fs::write(path, json).map_err(|e| format!("Failed to write scenario file: {}", e))?;

        Ok(())
    }

    /// Load from file
    pub fn load_from_file(path: &str) -> Result<Self, String> {
        let json =
            fs::read_to_string(path).map_err(|e| format!("Failed to read scenario file: {}", e))?;

        let scenario: Scenario =
            serde_json::from_str(&json).map_err(|e| format!("Failed to parse scenario file: {}", e))?;

        Ok(scenario)
    }

    /// Rebuild the world this scenario captured
    pub fn restore_world(&self) -> Result<World, String> {
        let expected = (self.grid_rows * self.grid_cols) as usize;
        if self.cells.len() != expected {
            return Err(format!(
                "Scenario has {} cells, expected {}x{}={}",
                self.cells.len(),
                self.grid_rows,
                self.grid_cols,
                expected
            ));
        }

        let mut world = World::new(self.grid_rows, self.grid_cols);
        for y in 0..self.grid_rows {
            for x in 0..self.grid_cols {
                let idx = (x + y * self.grid_cols) as usize;
                world.set(crate::direction::Position::new(x, y), self.cells[idx]);
            }
        }
        Ok(world)
    }
}
