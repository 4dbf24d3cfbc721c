/***************************************/
/*        3rd party libraries          */
/***************************************/
use std::collections::BTreeSet;
use std::ops::Bound::{Excluded, Unbounded};
use std::sync::{Mutex, MutexGuard};

/***************************************/
/*           Local modules             */
/***************************************/
use crate::shared::{Direction, Floor};

/**
 * Ordered set of floors with pending requests.
 *
 * The set is internally locked, so every operation is atomic with respect to the others and
 * the set can be shared between the button and hardware event threads by reference.
 */
#[derive(Debug, Default)]
pub struct RequestSet {
    floors: Mutex<BTreeSet<Floor>>,
}

/// Picks whichever candidate is closer to `from`. Equal distances go to `up`.
///
/// This is the only place the upward tie-break is decided; every nearest-floor query goes
/// through it.
pub fn closest(from: Floor, up: Option<Floor>, down: Option<Floor>) -> Option<Floor> {
    match (up, down) {
        (Some(up), Some(down)) => {
            if up.abs_diff(from) <= down.abs_diff(from) {
                Some(up)
            } else {
                Some(down)
            }
        }
        (up, None) => up,
        (None, down) => down,
    }
}

impl RequestSet {
    pub fn new() -> RequestSet {
        RequestSet::default()
    }

    // A poisoned lock still holds a valid set of integers
    fn lock(&self) -> MutexGuard<'_, BTreeSet<Floor>> {
        self.floors.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Returns `true` if the floor was not already pending.
    pub fn insert(&self, floor: Floor) -> bool {
        self.lock().insert(floor)
    }

    /// Returns `true` if the floor was pending.
    pub fn remove(&self, floor: Floor) -> bool {
        self.lock().remove(&floor)
    }

    pub fn contains(&self, floor: Floor) -> bool {
        self.lock().contains(&floor)
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Sorted copy of the pending floors.
    pub fn floors(&self) -> Vec<Floor> {
        self.lock().iter().copied().collect()
    }

    /// Member closest to `from`, `from` itself included. Ties go upward.
    pub fn nearest(&self, from: Floor) -> Option<Floor> {
        let floors = self.lock();
        if floors.contains(&from) {
            return Some(from);
        }
        let up = floors.range((Excluded(from), Unbounded)).next().copied();
        let down = floors.range(..from).next_back().copied();
        closest(from, up, down)
    }

    /// First member strictly beyond `from` in `direction`. `Direction::Stop` has no
    /// "beyond" and always yields `None`.
    pub fn next_in_direction(&self, from: Floor, direction: Direction) -> Option<Floor> {
        let floors = self.lock();
        match direction {
            Direction::Up => floors.range((Excluded(from), Unbounded)).next().copied(),
            Direction::Down => floors.range(..from).next_back().copied(),
            Direction::Stop => None,
        }
    }
}
