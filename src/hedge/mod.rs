pub mod report;
pub mod simulator;
