#![allow(dead_code)]

use numbersnake::world::{self, Cell, World};
use numbersnake::{Position, SnakeBot};

/// Build a seeded bot standing on the given layout, already refreshed
pub fn seeded_bot_on(layout: &str, seed: u64) -> (SnakeBot, World) {
    let world = World::from_layout(layout, 1).expect("test layout must parse");
    let mut bot = SnakeBot::with_seed(1, seed);
    bot.refresh(&world);
    (bot, world)
}

/// Minimal host for a single-cell snake: applies one decided direction,
/// moving the head marker and consuming any reward under the new cell.
/// Returns the reward value eaten, if any.
pub fn apply_move(
    world: &mut World,
    bot: &SnakeBot,
    direction: numbersnake::Direction,
) -> Result<Option<u8>, String> {
    let head = bot.head();
    let next = head.step(direction);
    let cell = world.get(next);
    if world::blocks(cell.symbol) {
        return Err(format!(
            "Move {:?} from ({}, {}) runs into '{}'",
            direction, head.x, head.y, cell.symbol
        ));
    }
    let eaten = cell.reward_value();
    world.set(head, Cell::empty());
    world.set(next, Cell::segment(world::CH_HEAD, bot.color()));
    Ok(eaten)
}

/// Render a plan over the world layout for failure diagnostics
pub fn visualize_plan(world: &World, steps: &[(Position, numbersnake::Direction)]) -> String {
    let mut result = String::new();
    for y in 0..world.rows {
        for x in 0..world.cols {
            let pos = Position::new(x, y);
            let cell = world.get(pos);
            let symbol = if steps.iter().any(|(p, _)| *p == pos) {
                '*'
            } else if cell.symbol == world::CH_VOID {
                '.'
            } else {
                cell.symbol
            };
            result.push(symbol);
        }
        result.push('\n');
    }
    result
}
