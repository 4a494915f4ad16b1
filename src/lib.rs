//! Risk MC - Monte Carlo odds for dice-attrition territory battles

pub mod campaign;
pub mod combat;
pub mod core;
pub mod simulation;
