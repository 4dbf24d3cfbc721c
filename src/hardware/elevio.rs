/***************************************/
/*        3rd party libraries          */
/***************************************/
use crossbeam_channel as cbc;
use driver_rust::elevio::elev::{Elevator, CAB, HALL_DOWN, HALL_UP};
use driver_rust::elevio::poll;
use log::{debug, info, warn};
use std::sync::atomic::{AtomicI32, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::Builder;
use std::time::Duration;

/***************************************/
/*           Local modules             */
/***************************************/
use crate::config::HardwareConfig;
use crate::hardware::hardware::{DoorsClosedHandler, FloorArrivalHandler, Hardware, HandlerRegistry};
use crate::shared::{Direction, Floor};

/**
 * # Elevio Hardware
 * Binds the controller to an elevio server (the lab elevator or its simulator) through
 * `driver-rust`.
 *
 * Floor arrivals are polled on a dedicated thread and forwarded to the registered handlers.
 * Stop-and-open stops the motor and lights the door lamp; the doors are reported closed once
 * the door open time has passed. Call button lamps follow the pending requests.
 *
 * # Fields
 *
 * - `elevator`:            Connection to the elevio server.
 * - `last_floor`:          Last floor the sensor reported, used while between floors.
 * - `handlers`:            Registered floor arrival and doors closed handlers.
 * - `door_open_tx`:        Arms the door timer on the event thread.
 * - `event_loop`:          Worker state, moved onto its threads by `start`.
 */
pub struct ElevioHardware {
    elevator: Elevator,
    last_floor: Arc<AtomicI32>,
    handlers: Arc<HandlerRegistry>,
    door_open_tx: cbc::Sender<()>,
    event_loop: Mutex<Option<EventLoop>>,
}

struct EventLoop {
    elevator: Elevator,
    last_floor: Arc<AtomicI32>,
    handlers: Arc<HandlerRegistry>,
    poll_period: Duration,
    door_open_time: Duration,
    door_open_rx: cbc::Receiver<()>,
}

impl ElevioHardware {
    pub fn init(config: &HardwareConfig, door_open_time: Duration) -> std::io::Result<ElevioHardware> {
        let elevator = Elevator::init(&config.driver_address, config.n_floors)?;
        info!(
            "Connected to elevio server at {} ({} floors)",
            config.driver_address, config.n_floors
        );

        let last_floor = Arc::new(AtomicI32::new(0));
        let handlers = Arc::new(HandlerRegistry::new());
        let (door_open_tx, door_open_rx) = cbc::unbounded::<()>();

        let event_loop = EventLoop {
            elevator: elevator.clone(),
            last_floor: Arc::clone(&last_floor),
            handlers: Arc::clone(&handlers),
            poll_period: Duration::from_millis(config.hw_thread_sleep_time),
            door_open_time,
            door_open_rx,
        };

        Ok(ElevioHardware {
            elevator,
            last_floor,
            handlers,
            door_open_tx,
            event_loop: Mutex::new(Some(event_loop)),
        })
    }

    /// The underlying connection, for polling buttons and driving lights.
    pub fn elevator(&self) -> &Elevator {
        &self.elevator
    }

    /**
     * Starts the worker threads and brings the cabin to a known state.
     *
     * Call after the handlers are registered. A cabin resting at a floor runs one door cycle;
     * a cabin between floors drives down until the sensor reports a floor. Either way the
     * controller receives the events it needs to leave its initial state.
     */
    pub fn start(&self) -> std::io::Result<()> {
        let event_loop = match self
            .event_loop
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .take()
        {
            Some(event_loop) => event_loop,
            None => {
                warn!("Elevio hardware already started");
                return Ok(());
            }
        };

        for floor in 0..self.elevator.num_floors {
            for call in [HALL_UP, HALL_DOWN, CAB] {
                self.elevator.call_button_light(floor, call, false);
            }
        }

        let (floor_tx, floor_rx) = cbc::unbounded::<u8>();
        {
            let elevator = self.elevator.clone();
            let period = event_loop.poll_period;
            Builder::new()
                .name("elevio_floor_sensor".into())
                .spawn(move || poll::floor_sensor(elevator, floor_tx, period))?;
        }

        match self.elevator.floor_sensor() {
            Some(floor) => {
                self.last_floor.store(Floor::from(floor), Ordering::SeqCst);
                self.elevator.floor_indicator(floor);
                self.stop_and_open_doors();
            }
            None => {
                info!("Cabin between floors, moving down to find a floor");
                self.elevator.motor_direction(Direction::Down.to_u8());
            }
        }

        Builder::new()
            .name("elevio_events".into())
            .spawn(move || event_loop.run(floor_rx))?;
        Ok(())
    }
}

impl EventLoop {
    fn run(self, floor_rx: cbc::Receiver<u8>) {
        let mut door_timer = cbc::never();

        loop {
            cbc::select! {
                recv(floor_rx) -> floor => {
                    match floor {
                        Ok(floor) => {
                            self.elevator.floor_indicator(floor);
                            self.last_floor.store(Floor::from(floor), Ordering::SeqCst);
                            debug!("Floor sensor: {}", floor);
                            self.handlers.floor_arrived(Floor::from(floor));
                        }
                        Err(e) => {
                            warn!("Floor sensor channel closed: {}", e);
                            return;
                        }
                    }
                }
                recv(self.door_open_rx) -> msg => {
                    if msg.is_err() {
                        return;
                    }
                    door_timer = cbc::after(self.door_open_time);
                }
                recv(door_timer) -> _ => {
                    door_timer = cbc::never();
                    self.elevator.door_light(false);
                    debug!("Doors closed");
                    self.handlers.doors_closed();
                }
            }
        }
    }
}

impl Hardware for ElevioHardware {
    fn register_floor_arrival_handler(&self, handler: FloorArrivalHandler) {
        self.handlers.register_floor_arrival(handler);
    }

    fn register_doors_closed_handler(&self, handler: DoorsClosedHandler) {
        self.handlers.register_doors_closed(handler);
    }

    fn move_up(&self) {
        self.elevator.motor_direction(Direction::Up.to_u8());
    }

    fn move_down(&self) {
        self.elevator.motor_direction(Direction::Down.to_u8());
    }

    fn stop_and_open_doors(&self) {
        self.elevator.motor_direction(Direction::Stop.to_u8());
        self.elevator.door_light(true);
        if self.door_open_tx.send(()).is_err() {
            warn!("Door timer not running, doors will not report closed");
        }
    }

    fn set_request_lamp(&self, floor: Floor, call: Direction, lit: bool) {
        let button = match call {
            Direction::Up => HALL_UP,
            Direction::Down => HALL_DOWN,
            Direction::Stop => CAB,
        };
        match u8::try_from(floor) {
            Ok(floor) if floor < self.elevator.num_floors => {
                self.elevator.call_button_light(floor, button, lit)
            }
            _ => warn!("No call button lamp at floor {}", floor),
        }
    }

    fn current_floor(&self) -> Floor {
        match self.elevator.floor_sensor() {
            Some(floor) => Floor::from(floor),
            None => self.last_floor.load(Ordering::SeqCst),
        }
    }
}
