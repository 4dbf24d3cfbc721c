/***************************************/
/*        3rd party libraries          */
/***************************************/
use driver_rust::elevio::elev::{DIRN_DOWN, DIRN_STOP, DIRN_UP};
use serde::Deserialize;
use serde::Serialize;
use std::fmt;

/***************************************/
/*       Public data structures        */
/***************************************/

/// A physical level. Only the ordering matters; floors need not start at zero or be contiguous.
pub type Floor = i32;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Behaviour {
    #[serde(rename = "idle")]
    Idle,
    #[serde(rename = "moving")]
    Moving,
    #[serde(rename = "doorOpen")]
    DoorOpen,
}

/**
 * Direction of travel, or of a hall call.
 *
 * `Stop` means idle/undecided and is never a spatial direction. It is also the bucket
 * that cabin requests are stored under.
 */
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
    Stop,
}

impl Direction {
    pub fn to_u8(&self) -> u8 {
        match *self {
            Direction::Up => DIRN_UP,
            Direction::Down => DIRN_DOWN,
            Direction::Stop => DIRN_STOP,
        }
    }

    pub fn opposite(&self) -> Direction {
        match *self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Stop => Direction::Stop,
        }
    }

    /// Direction to travel from `from` to reach `to`.
    pub fn towards(from: Floor, to: Floor) -> Direction {
        if to > from {
            Direction::Up
        } else if to < from {
            Direction::Down
        } else {
            Direction::Stop
        }
    }
}

impl TryFrom<u8> for Direction {
    type Error = InvalidDirection;

    fn try_from(item: u8) -> Result<Self, Self::Error> {
        match item {
            DIRN_UP => Ok(Direction::Up),
            DIRN_DOWN => Ok(Direction::Down),
            DIRN_STOP => Ok(Direction::Stop),
            other => Err(InvalidDirection(other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidDirection(pub u8);

impl fmt::Display for InvalidDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid motor direction value {}", self.0)
    }
}

impl std::error::Error for InvalidDirection {}

/**
 * Snapshot of the controller, used for status logging.
 *
 * # Fields
 * - `floor`:           Floor reported by the hardware when the snapshot was taken.
 * - `direction`:       Committed direction of travel.
 * - `behaviour`:       Idle, moving or standing with the doors open.
 * - `doors_closed`:    Whether the last door event was a close.
 * - `cab_requests`:    Pending cabin calls, ascending.
 * - `hall_up`:         Pending hall calls going up, ascending.
 * - `hall_down`:       Pending hall calls going down, ascending.
 */
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct CabinStatus {
    pub floor: Floor,
    pub direction: Direction,
    pub behaviour: Behaviour,
    #[serde(rename = "doorsClosed")]
    pub doors_closed: bool,
    #[serde(rename = "cabRequests")]
    pub cab_requests: Vec<Floor>,
    #[serde(rename = "hallUp")]
    pub hall_up: Vec<Floor>,
    #[serde(rename = "hallDown")]
    pub hall_down: Vec<Floor>,
}

/***************************************/
/*             Unit tests              */
/***************************************/
