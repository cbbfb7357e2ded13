//! Permission gate adapters

mod risk_gate;

pub use risk_gate::RiskBasedGate;
