// E-paper generation: planner + renderer orchestration and the HTTP handlers.

pub mod generator;
pub mod handlers;
