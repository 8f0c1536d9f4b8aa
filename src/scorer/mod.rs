pub mod pump_score;

pub use pump_score::{compute_score, is_pump, round_to};
