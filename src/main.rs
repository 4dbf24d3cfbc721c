/* 3rd party libraries */
use clap::Parser;
use crossbeam_channel as cbc;
use driver_rust::elevio::elev::{CAB, HALL_DOWN, HALL_UP};
use driver_rust::elevio::poll;
use log::{info, warn};
use std::thread::Builder;
use std::time::Duration;

/* Custom libraries */
use dispatch::config::{self, Config};
use dispatch::unwrap_or_exit;
use dispatch::{Controller, Direction, DispatchPolicy, ElevioHardware, Floor, SimulatedHardware};

/* Command line */
#[derive(Parser, Debug)]
#[clap(name = "dispatch", about = "Single cabin elevator dispatcher")]
struct Args {
    /// Path to the TOML configuration file
    #[clap(long, default_value = "config.toml")]
    config: String,

    /// Dispatch policy, overrides the configuration (keep-direction, drop-off-priority, equal-priority)
    #[clap(long)]
    policy: Option<DispatchPolicy>,

    /// Run against the built-in shaft simulator instead of an elevio server
    #[clap(long)]
    simulate: bool,

    /// Cabin call to place at start-up (simulator only, repeatable)
    #[clap(long = "call")]
    calls: Vec<Floor>,
}

/* Main */
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let config = unwrap_or_exit!(config::load_config(&args.config));
    let policy = args.policy.unwrap_or(config.elevator.policy);
    let door_open_time = Duration::from_millis(config.elevator.door_open_time);

    if args.simulate {
        run_simulated(&config, policy, door_open_time, &args.calls);
    } else {
        if !args.calls.is_empty() {
            warn!("--call is only used with --simulate, ignoring");
        }
        run_elevio(&config, policy, door_open_time);
    }
}

fn run_simulated(config: &Config, policy: DispatchPolicy, door_open_time: Duration, calls: &[Floor]) {
    let hardware = SimulatedHardware::new(
        config.hardware.n_floors,
        0,
        Duration::from_millis(config.hardware.travel_time),
        door_open_time,
    );
    let controller = Controller::new(hardware, policy);
    unwrap_or_exit!(controller.hardware().start());

    for &floor in calls {
        controller.cabin_call_pressed(floor);
    }

    loop {
        std::thread::sleep(Duration::from_secs(1));
    }
}

fn run_elevio(config: &Config, policy: DispatchPolicy, door_open_time: Duration) {
    let hardware = unwrap_or_exit!(ElevioHardware::init(&config.hardware, door_open_time));
    let elevator = hardware.elevator().clone();
    let controller = Controller::new(hardware, policy);
    unwrap_or_exit!(controller.hardware().start());

    let (call_button_tx, call_button_rx) = cbc::unbounded::<poll::CallButton>();
    {
        let period = Duration::from_millis(config.hardware.hw_thread_sleep_time);
        let call_button_thread = Builder::new().name("elevio_call_buttons".into());
        unwrap_or_exit!(call_button_thread.spawn(move || poll::call_buttons(elevator, call_button_tx, period)));
    }

    info!("Listening for call buttons");
    for button in call_button_rx.iter() {
        let floor = Floor::from(button.floor);
        match button.call {
            HALL_UP => controller.hall_call_pressed(floor, Direction::Up),
            HALL_DOWN => controller.hall_call_pressed(floor, Direction::Down),
            CAB => controller.cabin_call_pressed(floor),
            other => warn!("Unknown call button type {} at floor {}", other, floor),
        }
    }
    warn!("Call button poller stopped");
}
