/***************************************/
/*        3rd party libraries          */
/***************************************/
use crossbeam_channel as cbc;
use log::{debug, info, warn};
use std::sync::atomic::{AtomicI32, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::Builder;
use std::time::Duration;

/***************************************/
/*           Local modules             */
/***************************************/
use crate::hardware::hardware::{
    Command, DoorsClosedHandler, FloorArrivalHandler, Hardware, HandlerRegistry,
};
use crate::shared::{Direction, Floor};

/**
 * # Simulated Hardware
 * An in-process shaft with floors `0..n_floors`.
 *
 * A worker thread moves the cabin one floor per `travel_time` while a move is active and
 * reports every floor passed. Doors stay open for `door_open_time` before the doors closed
 * event fires. The cabin halts with a warning instead of leaving the shaft.
 *
 * Every command is mirrored, in issue order, to the observer channel when one is attached.
 */
pub struct SimulatedHardware {
    floor: Arc<AtomicI32>,
    handlers: Arc<HandlerRegistry>,
    command_tx: cbc::Sender<Command>,
    observer: Option<cbc::Sender<Command>>,
    shaft: Mutex<Option<Shaft>>,
}

struct Shaft {
    floor: Arc<AtomicI32>,
    handlers: Arc<HandlerRegistry>,
    command_rx: cbc::Receiver<Command>,
    n_floors: Floor,
    travel_time: Duration,
    door_open_time: Duration,
    motion: Direction,
    travel_timer: cbc::Receiver<std::time::Instant>,
    door_timer: cbc::Receiver<std::time::Instant>,
}

impl SimulatedHardware {
    pub fn new(
        n_floors: u8,
        start_floor: Floor,
        travel_time: Duration,
        door_open_time: Duration,
    ) -> SimulatedHardware {
        let floor = Arc::new(AtomicI32::new(start_floor));
        let handlers = Arc::new(HandlerRegistry::new());
        let (command_tx, command_rx) = cbc::unbounded::<Command>();

        let shaft = Shaft {
            floor: Arc::clone(&floor),
            handlers: Arc::clone(&handlers),
            command_rx,
            n_floors: Floor::from(n_floors),
            travel_time,
            door_open_time,
            motion: Direction::Stop,
            travel_timer: cbc::never(),
            door_timer: cbc::never(),
        };

        SimulatedHardware {
            floor,
            handlers,
            command_tx,
            observer: None,
            shaft: Mutex::new(Some(shaft)),
        }
    }

    /// Mirrors every issued command to the returned channel.
    pub fn with_observer(mut self) -> (SimulatedHardware, cbc::Receiver<Command>) {
        let (observer_tx, observer_rx) = cbc::unbounded::<Command>();
        self.observer = Some(observer_tx);
        (self, observer_rx)
    }

    /// Starts the shaft thread. The cabin begins with its doors open and runs one door cycle.
    pub fn start(&self) -> std::io::Result<()> {
        let shaft = self
            .shaft
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .take();
        match shaft {
            Some(mut shaft) => {
                shaft.door_timer = cbc::after(shaft.door_open_time);
                Builder::new()
                    .name("simulated_shaft".into())
                    .spawn(move || shaft.run())?;
                info!("Simulated shaft started at floor {}", self.current_floor());
            }
            None => warn!("Simulated shaft already started"),
        }
        Ok(())
    }

    fn issue(&self, command: Command) {
        if let Some(observer) = &self.observer {
            let _ = observer.send(command);
        }
        if self.command_tx.send(command).is_err() {
            warn!("Simulated shaft stopped, dropping {:?}", command);
        }
    }
}

impl Shaft {
    fn run(mut self) {
        loop {
            let command_rx = self.command_rx.clone();
            let travel_timer = self.travel_timer.clone();
            let door_timer = self.door_timer.clone();

            cbc::select! {
                recv(command_rx) -> command => {
                    match command {
                        Ok(command) => self.apply(command),
                        Err(_) => return,
                    }
                }
                recv(travel_timer) -> _ => self.advance(),
                recv(door_timer) -> _ => {
                    self.door_timer = cbc::never();
                    debug!("Simulated doors closed");
                    self.handlers.doors_closed();
                    self.drain_commands();
                }
            }
        }
    }

    fn apply(&mut self, command: Command) {
        match command {
            Command::MoveUp => self.set_motion(Direction::Up),
            Command::MoveDown => self.set_motion(Direction::Down),
            Command::StopAndOpen(_) => {
                self.motion = Direction::Stop;
                self.travel_timer = cbc::never();
                self.door_timer = cbc::after(self.door_open_time);
            }
        }
    }

    fn set_motion(&mut self, direction: Direction) {
        if self.motion != direction {
            self.motion = direction;
            self.travel_timer = cbc::after(self.travel_time);
        }
    }

    fn advance(&mut self) {
        let floor = self.floor.load(Ordering::SeqCst);
        let next = match self.motion {
            Direction::Up => floor + 1,
            Direction::Down => floor - 1,
            Direction::Stop => return,
        };

        if next < 0 || next >= self.n_floors {
            warn!("Simulated cabin reached the end of the shaft at floor {}, halting", floor);
            self.motion = Direction::Stop;
            self.travel_timer = cbc::never();
            return;
        }

        self.floor.store(next, Ordering::SeqCst);
        debug!("Simulated cabin at floor {}", next);
        self.handlers.floor_arrived(next);

        // Commands issued by the handlers decide whether the cabin keeps going
        self.drain_commands();
        self.travel_timer = match self.motion {
            Direction::Stop => cbc::never(),
            _ => cbc::after(self.travel_time),
        };
    }

    fn drain_commands(&mut self) {
        while let Ok(command) = self.command_rx.try_recv() {
            self.apply(command);
        }
    }
}

impl Hardware for SimulatedHardware {
    fn register_floor_arrival_handler(&self, handler: FloorArrivalHandler) {
        self.handlers.register_floor_arrival(handler);
    }

    fn register_doors_closed_handler(&self, handler: DoorsClosedHandler) {
        self.handlers.register_doors_closed(handler);
    }

    fn move_up(&self) {
        self.issue(Command::MoveUp);
    }

    fn move_down(&self) {
        self.issue(Command::MoveDown);
    }

    fn stop_and_open_doors(&self) {
        self.issue(Command::StopAndOpen(self.current_floor()));
    }

    fn current_floor(&self) -> Floor {
        self.floor.load(Ordering::SeqCst)
    }
}
