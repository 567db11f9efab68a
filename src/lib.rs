#[macro_use]
extern crate serde_derive;

mod config;
mod data;
mod encoding;
mod error;
mod losses;
mod math;
mod matrix;
mod model;
mod train;

pub use crate::config::*;
pub use crate::data::*;
pub use crate::encoding::*;
pub use crate::error::*;
pub use crate::losses::*;
pub use crate::math::*;
pub use crate::matrix::*;
pub use crate::model::*;
pub use crate::train::*;

/// Name of the constant feature prepended to every encoded row.
pub static BIAS_FEATURE: &str = "Ones";

pub(crate) static DEFAULT_LEARNING_RATE: f64 = 0.1;
pub(crate) static DEFAULT_ITERATIONS: usize = 10_000;
pub(crate) static DEFAULT_CATEGORY_MAX: usize = 3;
pub(crate) static DEFAULT_STOP_THRESHOLD: f64 = 1e-4;
