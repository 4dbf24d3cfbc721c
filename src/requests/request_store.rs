/***************************************/
/*        3rd party libraries          */
/***************************************/
use log::debug;

/***************************************/
/*           Local modules             */
/***************************************/
use crate::requests::request_set::{closest, RequestSet};
use crate::shared::{Direction, Floor};

/**
 * The three request sets of a cabin, indexed by direction.
 *
 * # Fields
 * - `cab`:     Cabin calls (the `Direction::Stop` bucket).
 * - `up`:      Hall calls from passengers going up.
 * - `down`:    Hall calls from passengers going down.
 *
 * The same floor may be pending in several sets at once.
 */
#[derive(Debug, Default)]
pub struct RequestStore {
    cab: RequestSet,
    up: RequestSet,
    down: RequestSet,
}

impl RequestStore {
    pub fn new() -> RequestStore {
        RequestStore::default()
    }

    fn set(&self, direction: Direction) -> &RequestSet {
        match direction {
            Direction::Stop => &self.cab,
            Direction::Up => &self.up,
            Direction::Down => &self.down,
        }
    }

    pub fn cab(&self) -> &RequestSet {
        &self.cab
    }

    /// Hall calls tagged `direction`.
    ///
    /// # Panics
    /// If `direction` is `Direction::Stop`, which no hall button can produce.
    pub fn hall(&self, direction: Direction) -> &RequestSet {
        assert!(
            direction != Direction::Stop,
            "hall requests are always tagged up or down"
        );
        self.set(direction)
    }

    pub fn add_cab(&self, floor: Floor) -> bool {
        self.cab.insert(floor)
    }

    /// # Panics
    /// If `direction` is `Direction::Stop`.
    pub fn add_hall(&self, floor: Floor, direction: Direction) -> bool {
        self.hall(direction).insert(floor)
    }

    pub fn is_empty(&self) -> bool {
        self.cab.is_empty() && self.up.is_empty() && self.down.is_empty()
    }

    /// Nearest pending request of any class, with the upward tie-break.
    pub fn nearest(&self, from: Floor) -> Option<Floor> {
        [&self.cab, &self.up, &self.down]
            .iter()
            .filter_map(|set| set.nearest(from))
            .fold(None, |best, candidate| match best {
                None => Some(candidate),
                Some(best) => pick(from, best, candidate),
            })
    }

    /// Nearest pending hall call of either direction, with the upward tie-break.
    pub fn nearest_hall(&self, from: Floor) -> Option<Floor> {
        match (self.up.nearest(from), self.down.nearest(from)) {
            (Some(a), Some(b)) => pick(from, a, b),
            (a, b) => a.or(b),
        }
    }

    /// `true` if any request of any class lies strictly beyond `floor` in `direction`.
    pub fn any_ahead(&self, floor: Floor, direction: Direction) -> bool {
        self.cab_ahead(floor, direction) || self.hall_ahead(floor, direction)
    }

    pub fn cab_ahead(&self, floor: Floor, direction: Direction) -> bool {
        self.cab.next_in_direction(floor, direction).is_some()
    }

    /// `true` if a hall call of either direction lies strictly beyond `floor` in `direction`.
    pub fn hall_ahead(&self, floor: Floor, direction: Direction) -> bool {
        self.up.next_in_direction(floor, direction).is_some()
            || self.down.next_in_direction(floor, direction).is_some()
    }

    /**
     * Removes the requests a stop at `floor` satisfies: the cabin call there, plus the hall
     * call matching `direction`, or both hall calls when `direction` is `Direction::Stop`.
     *
     * Returns the buckets that held a request, `Direction::Stop` standing for the cabin call.
     */
    pub fn clear_at(&self, floor: Floor, direction: Direction) -> Vec<Direction> {
        let candidates: &[Direction] = match direction {
            Direction::Stop => &[Direction::Stop, Direction::Up, Direction::Down],
            Direction::Up => &[Direction::Stop, Direction::Up],
            Direction::Down => &[Direction::Stop, Direction::Down],
        };
        let cleared: Vec<Direction> = candidates
            .iter()
            .copied()
            .filter(|&bucket| self.set(bucket).remove(floor))
            .collect();
        if !cleared.is_empty() {
            debug!("Cleared {:?} at floor {} (direction {:?})", cleared, floor, direction);
        }
        cleared
    }
}

// Combines two nearest-candidates through the canonical tie-break.
fn pick(from: Floor, a: Floor, b: Floor) -> Option<Floor> {
    if a == b {
        return Some(a);
    }
    let (up, down) = if a > b { (a, b) } else { (b, a) };
    // A candidate on the floor itself beats everything
    if down >= from {
        return Some(down);
    }
    if up <= from {
        return Some(up);
    }
    closest(from, Some(up), Some(down))
}
