/*
 * Tests for the simulated shaft
 *
 * The unit tests follows the Arrange, Act, Assert pattern.
 *
 * These run real threads with short timings, so every wait is bounded by a timeout.
 *
 * Tests:
 * - arrivals are reported floor by floor and the cabin halts at the shaft end
 * - a controller on the simulator serves a cabin call and settles idle
 */

/***************************************/
/*             Unit tests              */
/***************************************/
#[cfg(test)]
mod simulator_tests {
    use crate::elevator::Controller;
    use crate::hardware::{Command, Hardware, SimulatedHardware};
    use crate::policy::DispatchPolicy;
    use crate::shared::{Behaviour, Direction};
    use crossbeam_channel::unbounded;
    use std::thread::sleep;
    use std::time::{Duration, Instant};

    const TRAVEL_TIME: Duration = Duration::from_millis(5);
    const DOOR_OPEN_TIME: Duration = Duration::from_millis(5);
    const TIMEOUT: Duration = Duration::from_secs(3);

    #[test]
    fn test_simulator_reports_arrivals_and_halts_at_shaft_end() {
        // Purpose: Verify floor by floor arrivals and that the cabin never leaves the shaft

        // Arrange
        let hardware = SimulatedHardware::new(3, 0, TRAVEL_TIME, Duration::from_secs(60));
        let (arrival_tx, arrival_rx) = unbounded();
        hardware.register_floor_arrival_handler(Box::new(move |floor| {
            let _ = arrival_tx.send(floor);
        }));
        hardware.start().unwrap();

        // Act
        hardware.move_up();

        // Assert
        assert_eq!(arrival_rx.recv_timeout(TIMEOUT), Ok(1));
        assert_eq!(arrival_rx.recv_timeout(TIMEOUT), Ok(2));
        assert!(arrival_rx.recv_timeout(Duration::from_millis(100)).is_err());
        assert_eq!(hardware.current_floor(), 2);
    }

    #[test]
    fn test_controller_serves_cabin_call_on_simulator() {
        // Purpose: Verify the whole loop: call, travel, stop, doors closing, settling idle

        // Arrange
        let (hardware, command_rx) =
            SimulatedHardware::new(6, 0, TRAVEL_TIME, DOOR_OPEN_TIME).with_observer();
        let controller = Controller::new(hardware, DispatchPolicy::KeepDirection);
        controller.hardware().start().unwrap();

        // Act
        controller.cabin_call_pressed(3);

        // Assert
        assert_eq!(command_rx.recv_timeout(TIMEOUT), Ok(Command::MoveUp));
        assert_eq!(command_rx.recv_timeout(TIMEOUT), Ok(Command::StopAndOpen(3)));

        let deadline = Instant::now() + TIMEOUT;
        loop {
            let status = controller.status();
            if status.behaviour == Behaviour::Idle {
                assert_eq!(status.floor, 3);
                assert_eq!(status.direction, Direction::Stop);
                assert!(status.cab_requests.is_empty());
                break;
            }
            assert!(Instant::now() < deadline, "cabin never settled: {:?}", status);
            sleep(Duration::from_millis(5));
        }
        assert!(command_rx.try_recv().is_err());
    }
}
