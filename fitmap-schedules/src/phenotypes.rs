//! Phenotypes are the concrete weekly plans chromosomes
//! decode into, evaluated against a weight goal.

mod exercise;
mod objective;
mod schedule;

pub use exercise::Exercise;
pub use objective::{weight_loss, WeightGoal, LOSS_COEFFICIENT};
pub use schedule::Schedule;
