#![forbid(unsafe_code)]

pub mod model;
pub mod normalize;
pub mod progress;
pub mod time;
pub mod wire;

pub use progress::{DocumentProgress, percentage, ratio_percent};
pub use time::Clock;
