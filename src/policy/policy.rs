/***************************************/
/*        3rd party libraries          */
/***************************************/
use serde::Deserialize;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/***************************************/
/*           Local modules             */
/***************************************/
use crate::requests::RequestStore;
use crate::shared::{Direction, Floor};

/**
 * Scheduling strategy for a single cabin.
 *
 * The variants differ only in which calls may interrupt travel and which calls justify
 * continuing in the current direction.
 *
 * # Variants
 * - `KeepDirection`:   Stops for cabin calls and hall calls going the same way. Keeps going
 *                      while a cabin call or same-direction hall call lies ahead.
 * - `DropOffPriority`: While a cabin call lies ahead, opposite hall calls are skipped and
 *                      picked up on the return leg. Otherwise any hall call stops the cabin.
 * - `EqualPriority`:   Stops like `KeepDirection`, but hall calls of either direction
 *                      justify continuing.
 *
 * For every variant a moving cabin also stops once nothing at all lies ahead, so it never
 * runs past the last pending request.
 */
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum DispatchPolicy {
    KeepDirection,
    DropOffPriority,
    EqualPriority,
}

impl Default for DispatchPolicy {
    fn default() -> Self {
        DispatchPolicy::KeepDirection
    }
}

impl DispatchPolicy {
    pub const NAMES: [&'static str; 3] = ["keep-direction", "drop-off-priority", "equal-priority"];

    pub fn name(&self) -> &'static str {
        match self {
            DispatchPolicy::KeepDirection => Self::NAMES[0],
            DispatchPolicy::DropOffPriority => Self::NAMES[1],
            DispatchPolicy::EqualPriority => Self::NAMES[2],
        }
    }

    /**
     * Decides the direction of travel from `floor`.
     *
     * An idle cabin heads for the nearest pending request (ties go up) and stays idle when
     * nothing is pending or the nearest request is at `floor`. A moving cabin keeps its
     * direction while a request justifies it and otherwise returns `Direction::Stop`; calling
     * again with `Direction::Stop` derives a fresh direction.
     */
    pub fn next_direction(&self, floor: Floor, direction: Direction, store: &RequestStore) -> Direction {
        if direction == Direction::Stop {
            return match store.nearest(floor) {
                Some(target) => Direction::towards(floor, target),
                None => Direction::Stop,
            };
        }

        match self {
            DispatchPolicy::KeepDirection => {
                if store.cab_ahead(floor, direction)
                    || store.hall(direction).next_in_direction(floor, direction).is_some()
                {
                    direction
                } else {
                    Direction::Stop
                }
            }
            DispatchPolicy::DropOffPriority => {
                if store.cab_ahead(floor, direction) {
                    return direction;
                }
                match store.nearest_hall(floor) {
                    Some(target) => Direction::towards(floor, target),
                    None => Direction::Stop,
                }
            }
            DispatchPolicy::EqualPriority => {
                if store.any_ahead(floor, direction) {
                    direction
                } else {
                    Direction::Stop
                }
            }
        }
    }

    /// Decides whether a cabin arriving at `floor` while travelling `direction` stops there.
    pub fn should_stop(&self, floor: Floor, direction: Direction, store: &RequestStore) -> bool {
        if direction == Direction::Stop {
            return true;
        }
        if !store.any_ahead(floor, direction) {
            return true;
        }

        let cab_here = store.cab().contains(floor);
        let same_here = store.hall(direction).contains(floor);

        match self {
            DispatchPolicy::KeepDirection | DispatchPolicy::EqualPriority => cab_here || same_here,
            DispatchPolicy::DropOffPriority => {
                if store.cab_ahead(floor, direction) {
                    cab_here || same_here
                } else {
                    cab_here || same_here || store.hall(direction.opposite()).contains(floor)
                }
            }
        }
    }
}

impl fmt::Display for DispatchPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DispatchPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "keep-direction" => Ok(DispatchPolicy::KeepDirection),
            "drop-off-priority" => Ok(DispatchPolicy::DropOffPriority),
            "equal-priority" => Ok(DispatchPolicy::EqualPriority),
            other => Err(format!(
                "unknown dispatch policy '{}', expected one of: {}",
                other,
                Self::NAMES.join(", ")
            )),
        }
    }
}
