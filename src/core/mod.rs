pub mod agent;
pub mod memory;
pub mod steps;

pub use agent::ItineraryAgent;
pub use memory::PlanHistory;
pub use steps::SessionStep;
