/***************************************/
/*        3rd party libraries          */
/***************************************/
use log::{debug, info};
use std::sync::{Arc, Mutex, MutexGuard};

/***************************************/
/*           Local modules             */
/***************************************/
use crate::hardware::Hardware;
use crate::policy::DispatchPolicy;
use crate::requests::RequestStore;
use crate::shared::{Behaviour, CabinStatus, Direction, Floor};

/**
 * Live state of the cabin. The floor is not stored here; it is always read from the hardware.
 *
 * # Fields
 * - `direction`:       Committed direction of travel, `Stop` when idle.
 * - `doors_closed`:    Set by the doors closed event, cleared on stop-and-open.
 * - `moving`:          A move command is outstanding and no stop has been issued since.
 */
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct CabinState {
    direction: Direction,
    doors_closed: bool,
    moving: bool,
}

impl CabinState {
    fn new() -> CabinState {
        CabinState {
            direction: Direction::Stop,
            doors_closed: false,
            moving: false,
        }
    }
}

/**
 * Dispatches a single cabin.
 *
 * The controller owns the request store and the cabin state. Button presses may arrive on any
 * thread; hardware events arrive on the hardware's threads. Every event is handled under
 * `decision_lock`, so racing events cannot issue duplicate or contradictory commands, and no
 * movement command is issued while the doors are open.
 *
 * Pending requests are only mutated through the button and hardware events. Callers outside
 * the crate observe them through `status`.
 *
 * Lock order: `decision_lock`, then `cabin`, then the request sets.
 *
 * # Fields
 * - `hardware`:        The cabin hardware. Receives commands, supplies the current floor.
 * - `policy`:          Scheduling strategy consulted at every decision point.
 * - `requests`:        Pending cabin and hall calls.
 * - `cabin`:           Direction and door state.
 * - `decision_lock`:   Serializes decision passes.
 */
pub struct Controller<H: Hardware> {
    hardware: H,
    policy: DispatchPolicy,
    requests: RequestStore,
    cabin: Mutex<CabinState>,
    decision_lock: Mutex<()>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl<H: Hardware> Controller<H> {
    /// Builds the controller and subscribes it to the hardware events.
    pub fn new(hardware: H, policy: DispatchPolicy) -> Arc<Controller<H>> {
        let controller = Arc::new(Controller {
            hardware,
            policy,
            requests: RequestStore::new(),
            cabin: Mutex::new(CabinState::new()),
            decision_lock: Mutex::new(()),
        });
        controller.subscribe();
        info!("Controller started with {} policy", policy);
        controller
    }

    // The handlers only hold a weak reference, the hardware is owned by the controller
    fn subscribe(self: &Arc<Self>) {
        let weak = Arc::downgrade(self);
        self.hardware.register_floor_arrival_handler(Box::new(move |floor| {
            if let Some(controller) = weak.upgrade() {
                controller.on_floor_arrived(floor);
            }
        }));

        let weak = Arc::downgrade(self);
        self.hardware.register_doors_closed_handler(Box::new(move || {
            if let Some(controller) = weak.upgrade() {
                controller.on_doors_closed();
            }
        }));
    }

    pub fn hardware(&self) -> &H {
        &self.hardware
    }

    pub(crate) fn requests(&self) -> &RequestStore {
        &self.requests
    }

    pub fn direction(&self) -> Direction {
        lock(&self.cabin).direction
    }

    /***************************************/
    /*             User input              */
    /***************************************/

    /**
     * A hall button was pressed at `floor` by a passenger going `direction`.
     *
     * # Panics
     * If `direction` is `Direction::Stop`; hall buttons always carry a direction.
     */
    pub fn hall_call_pressed(&self, floor: Floor, direction: Direction) {
        assert!(
            direction != Direction::Stop,
            "hall call at floor {} has no direction",
            floor
        );
        let _decision = lock(&self.decision_lock);
        if self.requests.add_hall(floor, direction) {
            info!("Hall call: floor {} going {:?}", floor, direction);
            self.hardware.set_request_lamp(floor, direction, true);
        }
        self.start_if_parked();
    }

    pub fn cabin_call_pressed(&self, floor: Floor) {
        let _decision = lock(&self.decision_lock);
        if self.requests.add_cab(floor) {
            info!("Cabin call: floor {}", floor);
            self.hardware.set_request_lamp(floor, Direction::Stop, true);
        }
        self.start_if_parked();
    }

    // Caller holds `decision_lock`
    fn start_if_parked(&self) {
        let cabin = *lock(&self.cabin);
        if cabin.direction == Direction::Stop && cabin.doors_closed {
            self.start();
        }
    }

    /***************************************/
    /*           Hardware events           */
    /***************************************/
    pub fn on_doors_closed(&self) {
        let _decision = lock(&self.decision_lock);
        lock(&self.cabin).doors_closed = true;
        debug!("Doors closed");
        self.start();
    }

    pub fn on_floor_arrived(&self, floor: Floor) {
        let _decision = lock(&self.decision_lock);
        let direction = lock(&self.cabin).direction;

        if !self.policy.should_stop(floor, direction, &self.requests) {
            debug!("Passing floor {} going {:?}", floor, direction);
            return;
        }

        self.clear_at(floor, direction);
        let next = self.policy.next_direction(floor, direction, &self.requests);
        if next == Direction::Stop {
            // Idle here now, so everyone waiting at this floor boards
            self.clear_at(floor, Direction::Stop);
        }

        {
            let mut cabin = lock(&self.cabin);
            cabin.direction = next;
            cabin.doors_closed = false;
            cabin.moving = false;
        }
        info!("Stopping at floor {}, next direction {:?}", floor, next);
        self.hardware.stop_and_open_doors();
        self.log_status();
    }

    /***************************************/
    /*           Start sequence            */
    /***************************************/
    // Caller holds `decision_lock`
    fn start(&self) {
        let floor = self.hardware.current_floor();
        let cabin = *lock(&self.cabin);

        if !cabin.doors_closed {
            debug!("Doors open at floor {}, waiting for them to close", floor);
            return;
        }

        if !cabin.moving && self.clear_at(floor, cabin.direction) {
            // Someone called the cabin to where it is parked
            {
                let mut cabin = lock(&self.cabin);
                cabin.doors_closed = false;
                if self.requests.is_empty() {
                    cabin.direction = Direction::Stop;
                }
            }
            info!("Request at resting floor {}, opening doors", floor);
            self.hardware.stop_and_open_doors();
            self.log_status();
            return;
        }

        if cabin.moving {
            debug!("Already moving {:?}, no new command", cabin.direction);
            return;
        }

        let mut direction = self.policy.next_direction(floor, cabin.direction, &self.requests);
        if direction == Direction::Stop && cabin.direction != Direction::Stop {
            direction = self.policy.next_direction(floor, Direction::Stop, &self.requests);
        }

        {
            let mut cabin = lock(&self.cabin);
            cabin.direction = direction;
            cabin.moving = direction != Direction::Stop;
        }

        match direction {
            Direction::Up => {
                info!("Moving up from floor {}", floor);
                self.hardware.move_up();
            }
            Direction::Down => {
                info!("Moving down from floor {}", floor);
                self.hardware.move_down();
            }
            Direction::Stop => debug!("Parked at floor {}", floor),
        }
        self.log_status();
    }

    // Removes the requests served at `floor` and switches their lamps off
    fn clear_at(&self, floor: Floor, direction: Direction) -> bool {
        let cleared = self.requests.clear_at(floor, direction);
        for &call in &cleared {
            self.hardware.set_request_lamp(floor, call, false);
        }
        !cleared.is_empty()
    }

    /***************************************/
    /*               Status                */
    /***************************************/
    /**
     * Snapshot of the cabin and its pending requests.
     *
     * ```
     * use dispatch::{Controller, DispatchPolicy, SimulatedHardware};
     * use std::time::Duration;
     *
     * let hardware = SimulatedHardware::new(4, 0, Duration::from_millis(10), Duration::from_millis(10));
     * let controller = Controller::new(hardware, DispatchPolicy::KeepDirection);
     * controller.cabin_call_pressed(3);
     * assert_eq!(controller.status().cab_requests, vec![3]);
     * ```
     *
     * The request store itself is not reachable from outside the crate, so a request can only
     * be placed through a button event:
     *
     * ```compile_fail
     * use dispatch::{Controller, DispatchPolicy, SimulatedHardware};
     * use std::time::Duration;
     *
     * let hardware = SimulatedHardware::new(4, 0, Duration::from_millis(10), Duration::from_millis(10));
     * let controller = Controller::new(hardware, DispatchPolicy::KeepDirection);
     * controller.requests().add_cab(3);
     * ```
     */
    pub fn status(&self) -> CabinStatus {
        let cabin = *lock(&self.cabin);
        let behaviour = if cabin.moving {
            Behaviour::Moving
        } else if cabin.doors_closed {
            Behaviour::Idle
        } else {
            Behaviour::DoorOpen
        };

        CabinStatus {
            floor: self.hardware.current_floor(),
            direction: cabin.direction,
            behaviour,
            doors_closed: cabin.doors_closed,
            cab_requests: self.requests.cab().floors(),
            hall_up: self.requests.hall(Direction::Up).floors(),
            hall_down: self.requests.hall(Direction::Down).floors(),
        }
    }

    fn log_status(&self) {
        if log::log_enabled!(log::Level::Debug) {
            match serde_json::to_string(&self.status()) {
                Ok(json) => debug!("Status: {}", json),
                Err(e) => debug!("Status unavailable: {}", e),
            }
        }
    }
}
