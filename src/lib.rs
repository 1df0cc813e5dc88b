pub mod bot;
pub mod config;
pub mod decision_log;
pub mod direction;
pub mod scenario;
pub mod world;

pub use bot::{free_room, Oracle, Plan, SnakeBot, Unreachable};
pub use direction::{Direction, Position};
pub use world::{Cell, World};
