//! Risk scoring for transaction intents
//!
//! The scorer turns an intent plus a recent-activity snapshot into a
//! bounded, explainable [`RiskAssessment`]. Scoring is a weighted sum of
//! independently capped contributions; given the same intent, clock
//! reading, and history snapshot it is fully reproducible. The score
//! parameterizes policy resolution and never approves or rejects anything
//! by itself.

#![forbid(unsafe_code)]

mod config;
mod scorer;

pub use config::RiskConfig;
pub use scorer::{
    RiskScorer, AMOUNT_CAP, NOVELTY_CAP, TIME_OF_DAY_CAP, VELOCITY_CAP,
};
