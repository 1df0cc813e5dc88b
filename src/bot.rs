use crate::direction::{Direction, Position};
use crate::world::{self, World};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::collections::{HashMap, HashSet};
use std::fmt;

/// Planner failure: greedy stepping ran out of safe directions before
/// reaching the target. Always recovered by falling back to `backup()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Unreachable;

impl fmt::Display for Unreachable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "no safe step toward target")
    }
}

impl std::error::Error for Unreachable {}

/// Blocked-cell memo over one world snapshot.
///
/// Built fresh at the start of every decision cycle and dropped with it,
/// so stale answers can never leak across ticks.
pub struct Oracle<'a> {
    world: &'a World,
    cache: HashMap<Position, bool>,
}

impl<'a> Oracle<'a> {
    pub fn new(world: &'a World) -> Self {
        Oracle {
            world,
            cache: HashMap::new(),
        }
    }

    /// True for out-of-bounds positions and for any cell whose symbol is
    /// in the blocked set (stone, live segments, dead debris)
    pub fn is_blocked(&mut self, pos: Position) -> bool {
        if let Some(&blocked) = self.cache.get(&pos) {
            return blocked;
        }
        let blocked = !self.world.in_bounds(pos) || world::blocks(self.world.get(pos).symbol);
        self.cache.insert(pos, blocked);
        blocked
    }
}

/// Fraction of `limit` open cells reachable from `start`, in (0, 1].
///
/// Stack-based flood fill over 4-connected neighbors, visiting each
/// position at most once and never expanding blocked cells. Returns 1.0
/// as soon as `limit` open cells have been counted; the exact size of a
/// large region past that threshold is irrelevant. A blocked `start`
/// yields 0.
pub fn free_room(oracle: &mut Oracle<'_>, start: Position, limit: usize) -> f64 {
    if limit == 0 {
        return 1.0;
    }
    let mut to_check = vec![start];
    let mut done: HashSet<Position> = HashSet::new();
    let mut count = 0usize;

    while let Some(current) = to_check.pop() {
        if !done.insert(current) {
            continue;
        }
        if oracle.is_blocked(current) {
            continue;
        }
        count += 1;
        if count >= limit {
            return 1.0;
        }
        for direction in Direction::ALL {
            let next = current.step(direction);
            if !done.contains(&next) {
                to_check.push(next);
            }
        }
    }

    count as f64 / limit as f64
}

/// A committed sequence of forward steps toward a target, valid for the
/// current cycle only. Only the first direction is ever consumed before
/// the whole cycle is recomputed.
#[derive(Debug, Default)]
pub struct Plan {
    steps: Vec<(Position, Direction)>,
}

impl Plan {
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Whether a position is already committed earlier in this plan
    pub fn contains(&self, pos: Position) -> bool {
        self.steps.iter().any(|(p, _)| *p == pos)
    }

    pub fn first_direction(&self) -> Option<Direction> {
        self.steps.first().map(|(_, d)| *d)
    }

    pub fn steps(&self) -> &[(Position, Direction)] {
        &self.steps
    }

    fn push(&mut self, pos: Position, direction: Direction) {
        self.steps.push((pos, direction));
    }
}

/// The decision core of one snake.
///
/// Holds no world state across ticks: head, tail, body and length are
/// rebuilt from the snapshot on every `decide()` call.
pub struct SnakeBot {
    color: u8,
    length: usize,
    head: Position,
    tail: Position,
    body: Vec<Position>,
    rng: StdRng,
}

impl SnakeBot {
    pub fn new(color: u8) -> Self {
        Self::with_rng(color, StdRng::from_entropy())
    }

    /// Deterministic variant for tests and replays
    pub fn with_seed(color: u8, seed: u64) -> Self {
        Self::with_rng(color, StdRng::seed_from_u64(seed))
    }

    fn with_rng(color: u8, rng: StdRng) -> Self {
        SnakeBot {
            color,
            length: 0,
            head: Position::new(0, 0),
            tail: Position::new(0, 0),
            body: Vec::new(),
            rng,
        }
    }

    pub fn color(&self) -> u8 {
        self.color
    }

    pub fn head(&self) -> Position {
        self.head
    }

    pub fn tail(&self) -> Position {
        self.tail
    }

    pub fn length(&self) -> usize {
        self.length
    }

    pub fn body(&self) -> &[Position] {
        &self.body
    }

    /// Rescan the world for cells we own, recovering head, tail, body and
    /// length. Must run before anything else consults our position in a
    /// cycle.
    pub fn refresh(&mut self, world: &World) {
        self.body.clear();
        self.length = 0;
        for y in 0..world.rows {
            for x in 0..world.cols {
                let pos = Position::new(x, y);
                let cell = world.get(pos);
                if cell.owner == Some(self.color) {
                    match cell.symbol {
                        world::CH_HEAD => self.head = pos,
                        world::CH_TAIL => self.tail = pos,
                        _ => {}
                    }
                    self.body.push(pos);
                    self.length += 1;
                }
            }
        }
    }

    /// Pick the reward with the best value/distance score, or None when
    /// no digit is on the grid.
    ///
    /// Row-major scan; the first maximal score wins. A digit sitting under
    /// our own head has no distance to score by and is skipped.
    pub fn find_best(&self, world: &World) -> Option<Position> {
        let mut best: Option<(f64, Position)> = None;
        for y in 0..world.rows {
            for x in 0..world.cols {
                let pos = Position::new(x, y);
                let value = match world.get(pos).reward_value() {
                    Some(v) => v,
                    None => continue,
                };
                let distance = self.head.distance(&pos);
                if distance == 0 {
                    continue;
                }
                let score = value as f64 / distance as f64;
                if best.map_or(true, |(best_score, _)| score > best_score) {
                    best = Some((score, pos));
                }
            }
        }
        best.map(|(_, pos)| pos)
    }

    /// Build a step sequence from our head to `target` with a greedy
    /// directional heuristic.
    ///
    /// Each step tries the direction pointing along the dominant axis
    /// toward the target first, then the backup direction(s) in random
    /// order. A step is accepted only if the next cell is open, not
    /// already in the plan, and leaves at least our own length of free
    /// room behind it. No backtracking: the first dead end fails the
    /// whole call.
    pub fn plan_to(
        &mut self,
        oracle: &mut Oracle<'_>,
        target: Position,
    ) -> Result<Plan, Unreachable> {
        let mut plan = Plan::default();
        let mut current = self.head;

        while current != target {
            let dx = current.x - target.x;
            let dy = current.y - target.y;
            let vertical = if dy > 0 { Direction::Up } else { Direction::Down };
            let horizontal = if dx > 0 { Direction::Left } else { Direction::Right };

            let (preferred, mut backups) = if dx == 0 {
                (vertical, vec![Direction::Right, Direction::Left])
            } else if dy == 0 {
                (horizontal, vec![Direction::Up, Direction::Down])
            } else if dx.abs() > dy.abs() {
                (horizontal, vec![vertical])
            } else {
                (vertical, vec![horizontal])
            };
            backups.shuffle(&mut self.rng);

            let mut advanced = false;
            for direction in std::iter::once(preferred).chain(backups) {
                let next = current.step(direction);
                if oracle.is_blocked(next) || plan.contains(next) {
                    continue;
                }
                if free_room(oracle, next, self.length) < 1.0 {
                    continue;
                }
                plan.push(next, direction);
                current = next;
                advanced = true;
                break;
            }
            if !advanced {
                return Err(Unreachable);
            }
        }

        Ok(plan)
    }

    /// Space-maximizing single step for when no plan is viable.
    ///
    /// Directions are tried in random order so no fixed direction is
    /// systematically preferred. The first open neighbor with full free
    /// room wins outright; otherwise the open neighbor with the most room.
    /// None only when all four neighbors are blocked.
    pub fn backup(&mut self, oracle: &mut Oracle<'_>) -> Option<Direction> {
        let mut directions = Direction::ALL.to_vec();
        directions.shuffle(&mut self.rng);

        let mut unblocked: Vec<(f64, Direction)> = Vec::new();
        for direction in directions {
            let next = self.head.step(direction);
            if oracle.is_blocked(next) {
                continue;
            }
            let room = free_room(oracle, next, self.length);
            if room >= 1.0 {
                return Some(direction);
            }
            unblocked.push((room, direction));
        }

        unblocked
            .into_iter()
            .max_by(|(a, _), (b, _)| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal))
            .map(|(_, direction)| direction)
    }

    /// One full decision cycle: refresh our position, select a target,
    /// plan toward it, and fall back to the space-maximizing move when
    /// there is no target or no viable plan. Returns None only when we
    /// are fully enclosed.
    pub fn decide(&mut self, world: &World) -> Option<Direction> {
        // Fresh memo per cycle; the previous tick's answers are stale
        let mut oracle = Oracle::new(world);
        self.refresh(world);

        let target = match self.find_best(world) {
            Some(target) => target,
            None => return self.backup(&mut oracle),
        };

        match self.plan_to(&mut oracle, target) {
            Ok(plan) => match plan.first_direction() {
                Some(direction) => Some(direction),
                None => self.backup(&mut oracle),
            },
            Err(Unreachable) => self.backup(&mut oracle),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bot_on(layout: &str, seed: u64) -> (SnakeBot, World) {
        let world = World::from_layout(layout, 1).unwrap();
        let mut bot = SnakeBot::with_seed(1, seed);
        bot.refresh(&world);
        (bot, world)
    }

    #[test]
    fn test_oracle_blocks_out_of_bounds() {
        let world = World::new(4, 4);
        let mut oracle = Oracle::new(&world);
        assert!(oracle.is_blocked(Position::new(-1, 0)));
        assert!(oracle.is_blocked(Position::new(0, -1)));
        assert!(oracle.is_blocked(Position::new(4, 0)));
        assert!(oracle.is_blocked(Position::new(0, 4)));
        assert!(!oracle.is_blocked(Position::new(0, 0)));
    }

    #[test]
    fn test_free_room_blocked_start_is_zero() {
        let world = World::from_layout("###\n###\n###", 1).unwrap();
        let mut oracle = Oracle::new(&world);
        assert_eq!(free_room(&mut oracle, Position::new(1, 1), 5), 0.0);
    }

    #[test]
    fn test_free_room_short_circuits_at_limit() {
        let world = World::new(10, 10);
        let mut oracle = Oracle::new(&world);
        assert_eq!(free_room(&mut oracle, Position::new(5, 5), 1), 1.0);
        assert_eq!(free_room(&mut oracle, Position::new(5, 5), 100), 1.0);
    }

    #[test]
    fn test_free_room_partial_fraction() {
        // A 1x2 pocket: exactly two open cells reachable
        let layout = "\
#####
#..##
#####";
        let world = World::from_layout(layout, 1).unwrap();
        let mut oracle = Oracle::new(&world);
        assert_eq!(free_room(&mut oracle, Position::new(1, 1), 4), 0.5);
        assert_eq!(free_room(&mut oracle, Position::new(1, 1), 2), 1.0);
    }

    #[test]
    fn test_refresh_recovers_head_tail_and_length() {
        let (bot, _world) = bot_on(
            "\
.....
.+oo.
...@.
.....",
            7,
        );
        assert_eq!(bot.length(), 4);
        assert_eq!(bot.head(), Position::new(3, 2));
        assert_eq!(bot.tail(), Position::new(1, 1));
        assert!(bot.body().contains(&bot.head()));
        assert!(bot.body().contains(&bot.tail()));
    }

    #[test]
    fn test_find_best_prefers_value_over_distance() {
        // '3' at distance 1 scores 3.0; '9' at distance 5 scores 1.8
        let (bot, world) = bot_on(
            "\
.........
.@3....9.
.........",
            7,
        );
        assert_eq!(bot.find_best(&world), Some(Position::new(2, 1)));
    }

    #[test]
    fn test_find_best_skips_digit_under_head() {
        // The only digit shares the head cell; selection must not divide
        // by zero and must report no target
        let mut world = World::from_layout("...\n.@.\n...", 1).unwrap();
        let mut bot = SnakeBot::with_seed(1, 7);
        bot.refresh(&world);
        world.set(bot.head(), crate::world::Cell::reward(5));
        assert_eq!(bot.find_best(&world), None);
    }

    #[test]
    fn test_straight_plan_up() {
        let layout = "\
..........
..........
.....9....
..........
..........
.....@....
..........
..........
..........
..........";
        let (mut bot, world) = bot_on(layout, 7);
        let mut oracle = Oracle::new(&world);
        let target = bot.find_best(&world).unwrap();
        assert_eq!(target, Position::new(5, 2));

        let plan = bot.plan_to(&mut oracle, target).unwrap();
        assert_eq!(plan.len(), 3);
        for (_, direction) in plan.steps() {
            assert_eq!(*direction, Direction::Up);
        }
        assert_eq!(bot.decide(&world), Some(Direction::Up));
    }

    #[test]
    fn test_unreachable_walled_target() {
        // Reward boxed in by stone: selection still returns it, planning
        // must fail rather than loop
        let layout = "\
.......
..###..
..#5#..
..###..
.@.....";
        let (mut bot, world) = bot_on(layout, 7);
        let target = bot.find_best(&world).unwrap();
        assert_eq!(target, Position::new(3, 2));

        let mut oracle = Oracle::new(&world);
        assert!(matches!(bot.plan_to(&mut oracle, target), Err(Unreachable)));
    }

    #[test]
    fn test_backup_none_when_enclosed() {
        let layout = "\
.#.
#@#
.#.";
        let (mut bot, world) = bot_on(layout, 7);
        let mut oracle = Oracle::new(&world);
        assert_eq!(bot.backup(&mut oracle), None);
        assert_eq!(bot.decide(&world), None);
    }

    #[test]
    fn test_backup_picks_most_room() {
        // Left of the head is a 2-cell pocket, right is wide open; with a
        // claimed length of 6 only the right side offers full free room.
        // Must hold for any shuffle order, so try many seeds.
        let layout = "\
####.......
#..@.......
####.......";
        let world = World::from_layout(layout, 1).unwrap();
        for seed in 0..20 {
            let mut bot = SnakeBot::with_seed(1, seed);
            bot.refresh(&world);
            bot.length = 6;
            let mut oracle = Oracle::new(&world);
            assert_eq!(bot.backup(&mut oracle), Some(Direction::Right));
        }
    }
}
