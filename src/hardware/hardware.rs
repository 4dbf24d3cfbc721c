/***************************************/
/*        3rd party libraries          */
/***************************************/
use std::sync::{Mutex, MutexGuard};

/***************************************/
/*           Local modules             */
/***************************************/
use crate::shared::{Direction, Floor};

/***************************************/
/*       Public data structures        */
/***************************************/
pub type FloorArrivalHandler = Box<dyn Fn(Floor) + Send + Sync>;
pub type DoorsClosedHandler = Box<dyn Fn() + Send + Sync>;

/**
 * The cabin hardware as seen by the controller.
 *
 * Commands are fire-and-forget. Implementations deliver events from their own threads and
 * must never invoke a handler synchronously from inside a command.
 */
pub trait Hardware: Send + Sync + 'static {
    fn register_floor_arrival_handler(&self, handler: FloorArrivalHandler);
    fn register_doors_closed_handler(&self, handler: DoorsClosedHandler);

    fn move_up(&self);
    fn move_down(&self);
    fn stop_and_open_doors(&self);

    /// Lights or clears the lamp of a pending request. `Direction::Stop` is the cabin button.
    /// Bindings without lamps keep the default.
    fn set_request_lamp(&self, _floor: Floor, _call: Direction, _lit: bool) {}

    /// Latest physical position. Never cached by callers.
    fn current_floor(&self) -> Floor;
}

/// A command issued to the hardware, as mirrored to observers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    MoveUp,
    MoveDown,
    StopAndOpen(Floor),
}

/// Registered event handlers, shared between a binding and its worker threads.
#[derive(Default)]
pub struct HandlerRegistry {
    floor_arrival: Mutex<Vec<FloorArrivalHandler>>,
    doors_closed: Mutex<Vec<DoorsClosedHandler>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl HandlerRegistry {
    pub fn new() -> HandlerRegistry {
        HandlerRegistry::default()
    }

    pub fn register_floor_arrival(&self, handler: FloorArrivalHandler) {
        lock(&self.floor_arrival).push(handler);
    }

    pub fn register_doors_closed(&self, handler: DoorsClosedHandler) {
        lock(&self.doors_closed).push(handler);
    }

    pub fn floor_arrived(&self, floor: Floor) {
        for handler in lock(&self.floor_arrival).iter() {
            handler(floor);
        }
    }

    pub fn doors_closed(&self) {
        for handler in lock(&self.doors_closed).iter() {
            handler();
        }
    }
}
