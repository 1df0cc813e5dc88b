use crate::direction::Direction;
use serde::{Deserialize, Serialize};
use std::time::Instant;

/// Event phase - whether the event is starting or finishing
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum EventPhase {
    Start,
    Finish,
}

/// Game events worth journaling, one entry per occurrence
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum GameEvent {
    /// A snake's decision cycle ran (direction is None when enclosed)
    Decided { color: u8, direction: Option<Direction> },
    /// A reward digit appeared (x, y, value)
    RewardSpawned { x: i32, y: i32, value: u8 },
    /// A snake consumed a reward
    RewardEaten { color: u8, value: u8 },
    /// A snake was eliminated and left debris behind
    SnakeEliminated { color: u8 },
    /// A stone was toggled by the user (x, y)
    StoneToggled { x: i32, y: i32 },
}

/// Logged event with tick, timestamp and phase
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LoggedEvent {
    /// Milliseconds since session start
    pub timestamp_ms: u64,
    /// Game tick the event belongs to
    pub tick: u64,
    pub event: GameEvent,
    pub phase: EventPhase,
}

/// Per-session decision journal, dumped to JSON on exit
pub struct DecisionLog {
    start_time: Instant,
    events: Vec<LoggedEvent>,
}

impl DecisionLog {
    pub fn new() -> Self {
        DecisionLog {
            start_time: Instant::now(),
            events: Vec::new(),
        }
    }

    /// Log an event with the current timestamp and given phase
    pub fn log(&mut self, tick: u64, event: GameEvent, phase: EventPhase) {
        let timestamp_ms = self.start_time.elapsed().as_millis() as u64;
        self.events.push(LoggedEvent {
            timestamp_ms,
            tick,
            event,
            phase,
        });
    }

    /// Log the start of a decision cycle
    pub fn log_start(&mut self, tick: u64, event: GameEvent) {
        self.log(tick, event, EventPhase::Start);
    }

    /// Log the finish of a decision cycle
    pub fn log_finish(&mut self, tick: u64, event: GameEvent) {
        self.log(tick, event, EventPhase::Finish);
    }

    pub fn events(&self) -> &[LoggedEvent] {
        &self.events
    }

    /// Save log to JSON file
    pub fn save_to_file(&self, path: &str) -> Result<(), Box<dyn std::error::Error>> {
        let json = serde_json::to_string_pretty(&self.events)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Print log to console
    pub fn print(&self) {
        println!("\n=== Decision Log ({} events) ===", self.events.len());
        for (i, logged) in self.events.iter().enumerate() {
            let phase_str = match logged.phase {
                EventPhase::Start => "START ",
                EventPhase::Finish => "FINISH",
            };
            println!(
                "[{:6}ms] tick {:4} #{:3} {} {:?}",
                logged.timestamp_ms, logged.tick, i + 1, phase_str, logged.event
            );
        }
        println!("=== End of Log ===\n");
    }

    /// Get summary statistics
    pub fn summary(&self) -> String {
        let mut decisions = 0;
        let mut no_moves = 0;
        let mut rewards_spawned = 0;
        let mut rewards_eaten = 0;
        let mut total_value_eaten: u64 = 0;
        let mut eliminations = 0;

        // Only count finish events to get actual completed counts
        for logged in &self.events {
            if matches!(logged.phase, EventPhase::Finish) {
                match &logged.event {
                    GameEvent::Decided { direction, .. } => {
                        decisions += 1;
                        if direction.is_none() {
                            no_moves += 1;
                        }
                    }
                    GameEvent::RewardSpawned { .. } => rewards_spawned += 1,
                    GameEvent::RewardEaten { value, .. } => {
                        rewards_eaten += 1;
                        total_value_eaten += *value as u64;
                    }
                    GameEvent::SnakeEliminated { .. } => eliminations += 1,
                    GameEvent::StoneToggled { .. } => {}
                }
            }
        }

        let duration = self.events.last().map(|e| e.timestamp_ms).unwrap_or(0);

        format!(
            "Session Duration: {}ms\n\
             Decisions: {} ({} returned no move)\n\
             Rewards: {} spawned, {} eaten ({} total value)\n\
             Eliminations: {}",
            duration,
            decisions,
            no_moves,
            rewards_spawned,
            rewards_eaten,
            total_value_eaten,
            eliminations
        )
    }
}

impl Default for DecisionLog {
    fn default() -> Self {
        Self::new()
    }
}
