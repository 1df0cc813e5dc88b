use arboard::Clipboard;
use macroquad::prelude::*;
use numbersnake::config::Config;
use numbersnake::decision_log::{DecisionLog, GameEvent};
use numbersnake::scenario::Scenario;
use numbersnake::world::{self, Cell, World};
use numbersnake::{Direction, Position, SnakeBot};
// Leading :: keeps the rand crate from clashing with the macroquad prelude
use ::rand::rngs::StdRng;
use ::rand::{Rng, SeedableRng};
use std::collections::VecDeque;

/// One live snake: the decision core plus the host-side body bookkeeping
struct SnakeRuntime {
    bot: SnakeBot,
    /// Body cells, head at the front
    body: VecDeque<Position>,
    /// Cells still owed from eaten rewards
    pending_growth: u32,
    alive: bool,
}

struct GameState {
    config: Config,
    world: World,
    snakes: Vec<SnakeRuntime>,
    tick: u64,
    rng: StdRng,
    log: DecisionLog,
    paused: bool,
    last_step_time: f64,
}

impl GameState {
    fn new(config: Config) -> Self {
        let mut rng = match config.snakes.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let mut world = World::new(config.grid.rows, config.grid.cols);

        // Seed each snake as a short horizontal body facing right
        let mut snakes = Vec::new();
        for i in 0..config.snakes.count {
            let color = (i + 1) as u8;
            let y = (2 + i as i32 * 4).min(world.rows - 1);
            let body: VecDeque<Position> = (0..3)
                .map(|k| Position::new(3 - k, y))
                .collect();
            let bot = match config.snakes.seed {
                Some(seed) => SnakeBot::with_seed(color, seed.wrapping_add(color as u64)),
                None => SnakeBot::new(color),
            };
            snakes.push(SnakeRuntime {
                bot,
                body,
                pending_growth: 0,
                alive: true,
            });
        }

        // Scatter stones on cells nothing else occupies
        let mut placed = 0;
        while placed < config.grid.stone_count {
            let pos = Position::new(rng.gen_range(0..world.cols), rng.gen_range(0..world.rows));
            let occupied = snakes.iter().any(|s| s.body.contains(&pos));
            if !occupied && world.get(pos).symbol == world::CH_VOID {
                world.set(pos, Cell::stone());
                placed += 1;
            }
        }

        let mut state = GameState {
            config,
            world,
            snakes,
            tick: 0,
            rng,
            log: DecisionLog::new(),
            paused: false,
            last_step_time: 0.0,
        };
        for i in 0..state.snakes.len() {
            state.write_snake_cells(i);
        }
        state
    }

    /// Rewrite a snake's cells into the world (head, middle, tail symbols)
    fn write_snake_cells(&mut self, idx: usize) {
        let color = self.snakes[idx].bot.color();
        let body = &self.snakes[idx].body;
        let last = body.len() - 1;
        for (i, &pos) in body.iter().enumerate() {
            let symbol = if i == 0 {
                world::CH_HEAD
            } else if i == last {
                world::CH_TAIL
            } else {
                world::CH_BODY
            };
            self.world.set(pos, Cell::segment(symbol, color));
        }
    }

    /// Replace an eliminated snake's segments with dead-body debris
    fn eliminate(&mut self, idx: usize) {
        let color = self.snakes[idx].bot.color();
        let body: Vec<Position> = self.snakes[idx].body.iter().copied().collect();
        let last = body.len() - 1;
        for (i, &pos) in body.iter().enumerate() {
            let symbol = if i == 0 {
                world::CH_DEAD_HEAD
            } else if i == last {
                world::CH_DEAD_TAIL
            } else {
                world::CH_DEAD_BODY
            };
            self.world.set(pos, Cell { symbol, owner: None });
        }
        self.snakes[idx].alive = false;
        self.log
            .log_finish(self.tick, GameEvent::SnakeEliminated { color });
        println!("Snake {} eliminated at tick {}", color, self.tick);
    }

    fn active_rewards(&self) -> usize {
        self.world
            .cells()
            .iter()
            .filter(|cell| cell.reward_value().is_some())
            .count()
    }

    fn spawn_reward(&mut self) {
        // A few placement attempts are enough on a mostly-open grid
        for _ in 0..32 {
            let pos = Position::new(
                self.rng.gen_range(0..self.world.cols),
                self.rng.gen_range(0..self.world.rows),
            );
            if self.world.get(pos).symbol == world::CH_VOID {
                let value = self
                    .rng
                    .gen_range(self.config.rewards.min_value..=self.config.rewards.max_value);
                self.world.set(pos, Cell::reward(value));
                self.log.log_finish(
                    self.tick,
                    GameEvent::RewardSpawned {
                        x: pos.x,
                        y: pos.y,
                        value,
                    },
                );
                return;
            }
        }
    }

    /// Advance the game by one tick: spawn rewards, then let each living
    /// snake decide and move in turn
    fn step(&mut self) {
        self.tick += 1;

        if self.tick % self.config.rewards.spawn_interval_ticks == 0
            && self.active_rewards() < self.config.rewards.max_active
        {
            self.spawn_reward();
        }

        for idx in 0..self.snakes.len() {
            if !self.snakes[idx].alive {
                continue;
            }
            let color = self.snakes[idx].bot.color();

            self.log.log_start(
                self.tick,
                GameEvent::Decided {
                    color,
                    direction: None,
                },
            );
            let direction = self.snakes[idx].bot.decide(&self.world);
            self.log
                .log_finish(self.tick, GameEvent::Decided { color, direction });

            let direction = match direction {
                Some(direction) => direction,
                None => {
                    // Fully enclosed: no legal move
                    self.eliminate(idx);
                    continue;
                }
            };

            self.apply_move(idx, direction);
        }
    }

    fn apply_move(&mut self, idx: usize, direction: Direction) {
        let head = self.snakes[idx].body[0];
        let next = head.step(direction);
        let cell = self.world.get(next);

        // The core avoids blocked cells; the host still enforces the rule
        if world::blocks(cell.symbol) {
            self.eliminate(idx);
            return;
        }

        if let Some(value) = cell.reward_value() {
            self.snakes[idx].pending_growth += value as u32;
            let color = self.snakes[idx].bot.color();
            self.log
                .log_finish(self.tick, GameEvent::RewardEaten { color, value });
        }

        self.snakes[idx].body.push_front(next);
        if self.snakes[idx].pending_growth > 0 {
            self.snakes[idx].pending_growth -= 1;
        } else if let Some(tail) = self.snakes[idx].body.pop_back() {
            self.world.set(tail, Cell::empty());
        }
        self.write_snake_cells(idx);
    }

    fn handle_click(&mut self, mouse_x: f32, mouse_y: f32) {
        let cell_size = self.config.visual.cell_size;
        let pos = Position::new((mouse_x / cell_size) as i32, (mouse_y / cell_size) as i32);
        if !self.world.in_bounds(pos) {
            return;
        }

        // Left click: toggle stone on empty cells only
        let cell = self.world.get(pos);
        if cell.symbol == world::CH_VOID {
            self.world.set(pos, Cell::stone());
        } else if cell.symbol == world::CH_STONE {
            self.world.set(pos, Cell::empty());
        } else {
            return;
        }
        self.log
            .log_finish(self.tick, GameEvent::StoneToggled { x: pos.x, y: pos.y });
    }

    fn copy_to_clipboard(&self) {
        let layout = self.world.to_layout();
        match Clipboard::new() {
            Ok(mut clipboard) => {
                if let Err(e) = clipboard.set_text(&layout) {
                    println!("Failed to copy to clipboard: {}", e);
                } else {
                    println!("World layout copied to clipboard!");
                    // Keep clipboard alive for a moment so clipboard managers can capture it
                    std::thread::sleep(std::time::Duration::from_millis(100));
                }
            }
            Err(e) => {
                println!("Failed to access clipboard: {}", e);
            }
        }
    }

    fn save_scenario(&self) {
        let scenario = Scenario::from_world(&self.world, self.tick);
        match scenario.save_to_file("scenario.json") {
            Ok(()) => println!("Scenario saved to scenario.json"),
            Err(e) => eprintln!("{}", e),
        }
    }

    fn draw(&self) {
        let v = &self.config.visual;
        clear_background(Color::from_rgba(v.background_r, v.background_g, v.background_b, 255));

        let palette = [GREEN, SKYBLUE, ORANGE, PINK];
        let cell_size = v.cell_size;

        for y in 0..self.world.rows {
            for x in 0..self.world.cols {
                let pos = Position::new(x, y);
                let cell = self.world.get(pos);
                let px = x as f32 * cell_size;
                let py = y as f32 * cell_size;

                let color = match cell.symbol {
                    world::CH_STONE => Color::from_rgba(120, 120, 120, 255),
                    world::CH_HEAD | world::CH_BODY | world::CH_TAIL => {
                        let base = cell
                            .owner
                            .map(|c| palette[(c as usize).saturating_sub(1) % palette.len()])
                            .unwrap_or(WHITE);
                        if cell.symbol == world::CH_HEAD {
                            base
                        } else {
                            Color::new(base.r * 0.7, base.g * 0.7, base.b * 0.7, 1.0)
                        }
                    }
                    world::CH_DEAD_HEAD | world::CH_DEAD_BODY | world::CH_DEAD_TAIL => {
                        Color::from_rgba(70, 60, 60, 255)
                    }
                    '0'..='9' => GOLD,
                    _ => Color::from_rgba(45, 45, 45, 255),
                };
                draw_rectangle(px, py, cell_size - 1.0, cell_size - 1.0, color);

                if let Some(value) = cell.reward_value() {
                    draw_text(
                        &value.to_string(),
                        px + cell_size * 0.3,
                        py + cell_size * 0.75,
                        cell_size * 0.8,
                        BLACK,
                    );
                }
            }
        }

        let alive = self.snakes.iter().filter(|s| s.alive).count();
        let lengths: Vec<String> = self
            .snakes
            .iter()
            .map(|s| format!("{}:{}", s.bot.color(), s.body.len()))
            .collect();
        let info = format!(
            "Tick: {}  Alive: {}/{}  Lengths: {}\nLeft click: toggle stone  Space: pause  C: copy layout  S: save scenario  Esc: quit{}",
            self.tick,
            alive,
            self.snakes.len(),
            lengths.join(" "),
            if self.paused { "  [PAUSED]" } else { "" }
        );
        draw_text(
            &info,
            10.0,
            self.world.rows as f32 * cell_size + 20.0,
            18.0,
            WHITE,
        );
    }
}

/// Run a fixed number of ticks without a window and print the results
fn run_headless(config: Config, ticks: u64) {
    let mut state = GameState::new(config);
    for _ in 0..ticks {
        state.step();
        if state.snakes.iter().all(|s| !s.alive) {
            break;
        }
    }

    println!("\nFinal world after {} ticks:", state.tick);
    print!("{}", state.world.to_layout());
    println!("\n{}", state.log.summary());

    if state.config.logging.enable_decision_log {
        let path = state.config.logging.decision_log_path.clone();
        if let Err(e) = state.log.save_to_file(&path) {
            eprintln!("Failed to save decision log: {}", e);
        } else {
            println!("Decision log saved to {}", path);
        }
    }
}

#[macroquad::main("NumberSnake")]
async fn main() {
    let config = Config::load();

    // Headless mode: numbersnake --headless [ticks]
    let args: Vec<String> = std::env::args().collect();
    if args.len() > 1 && args[1] == "--headless" {
        let ticks = args
            .get(2)
            .and_then(|s| s.parse().ok())
            .unwrap_or(200);
        run_headless(config, ticks);
        return;
    }

    let mut state = GameState::new(config);

    loop {
        if is_mouse_button_pressed(MouseButton::Left) {
            let (mouse_x, mouse_y) = mouse_position();
            state.handle_click(mouse_x, mouse_y);
        }

        if is_key_pressed(KeyCode::Space) {
            state.paused = !state.paused;
        }
        if is_key_pressed(KeyCode::C) {
            state.copy_to_clipboard();
        }
        if is_key_pressed(KeyCode::S) {
            state.save_scenario();
        }
        if is_key_pressed(KeyCode::Escape) {
            break;
        }

        let now = get_time();
        if !state.paused && now - state.last_step_time >= state.config.visual.tick_seconds {
            state.step();
            state.last_step_time = now;
        }

        state.draw();
        next_frame().await
    }

    println!("\n{}", state.log.summary());
    if state.config.logging.enable_decision_log {
        let path = state.config.logging.decision_log_path.clone();
        match state.log.save_to_file(&path) {
            Ok(()) => println!("Decision log saved to {}", path),
            Err(e) => eprintln!("Failed to save decision log: {}", e),
        }
    }
}
