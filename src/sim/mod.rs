// Simulation engines: odds, result processing, outcome generation, the
// playoff bracket, season driving, and Monte Carlo aggregation.

pub mod aggregate;
pub mod odds;
pub mod outcome;
pub mod playoffs;
pub mod results;
pub mod season;
