pub mod elevio;
pub mod hardware;
pub mod simulator;
mod simulator_tests;

pub use elevio::ElevioHardware;
pub use hardware::{Command, DoorsClosedHandler, FloorArrivalHandler, Hardware, HandlerRegistry};
pub use simulator::SimulatedHardware;
