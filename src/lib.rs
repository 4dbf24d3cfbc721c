/*
 * Dispatch for a single elevator cabin.
 *
 * Hardware events and button presses feed the `Controller`, which keeps the pending requests
 * in ordered sets and asks a `DispatchPolicy` which way to go and where to stop.
 */

/* Modules */
pub mod config;
pub mod elevator;
pub mod hardware;
pub mod policy;
pub mod requests;
pub mod shared;

pub use elevator::Controller;
pub use hardware::{ElevioHardware, Hardware, SimulatedHardware};
pub use policy::DispatchPolicy;
pub use requests::{RequestSet, RequestStore};
pub use shared::{Behaviour, CabinStatus, Direction, Floor};
