//! Score derivation: smoothed frequencies to log-likelihood-ratio weights.

pub mod deriver;
pub mod model;

pub use deriver::ScoreDeriver;
pub use model::ScoreModel;
