pub mod game_metrics;

pub use game_metrics::{GameMetrics, describe_collision};
