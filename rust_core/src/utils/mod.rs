//! Scoring helpers shared by the name policies.

pub mod similarity;
