/*
 * Unit tests for the requests module
 *
 * The unit tests follows the Arrange, Act, Assert pattern.
 *
 * Tests:
 * - RequestSet insert/remove/contains, nearest and next_in_direction
 * - RequestStore bucketing, cross-set nearest and clearing at a floor
 */

/***************************************/
/*             Unit tests              */
/***************************************/
#[cfg(test)]
mod request_tests {
    use crate::requests::request_set::closest;
    use crate::requests::{RequestSet, RequestStore};
    use crate::shared::Direction::{Down, Stop, Up};
    use std::sync::Arc;
    use std::thread::spawn;

    fn set_of(floors: &[i32]) -> RequestSet {
        let set = RequestSet::new();
        for &floor in floors {
            set.insert(floor);
        }
        set
    }

    #[test]
    fn test_insert_is_idempotent() {
        // Purpose: Verify that inserting a floor twice leaves exactly one entry

        // Arrange
        let set = RequestSet::new();

        // Act
        let first = set.insert(4);
        let second = set.insert(4);

        // Assert
        assert!(first);
        assert!(!second);
        assert_eq!(set.len(), 1);
        assert!(set.contains(4));
    }

    #[test]
    fn test_remove_absent_is_noop() {
        // Arrange
        let set = set_of(&[1, 3]);

        // Act
        let removed_absent = set.remove(2);
        let removed_present = set.remove(3);

        // Assert
        assert!(!removed_absent);
        assert!(removed_present);
        assert_eq!(set.floors(), vec![1]);
    }

    #[test]
    fn test_nearest() {
        // Purpose: Verify nearest by absolute distance, including the floor itself

        // Arrange
        let set = set_of(&[-2, 3, 10]);

        // Act & Assert
        assert_eq!(set.nearest(4), Some(3));
        assert_eq!(set.nearest(8), Some(10));
        assert_eq!(set.nearest(-5), Some(-2));
        assert_eq!(set.nearest(3), Some(3));
        assert_eq!(RequestSet::new().nearest(0), None);
    }

    #[test]
    fn test_nearest_tie_goes_up() {
        // Purpose: Verify that equidistant members resolve to the one above

        // Arrange
        let set = set_of(&[2, 6]);

        // Act & Assert
        assert_eq!(set.nearest(4), Some(6));
        assert_eq!(closest(4, Some(6), Some(2)), Some(6));
        assert_eq!(closest(4, None, Some(2)), Some(2));
        assert_eq!(closest(4, None, None), None);
    }

    #[test]
    fn test_next_in_direction_is_strict() {
        // Purpose: Verify that the floor itself is never "next"

        // Arrange
        let set = set_of(&[1, 4, 7]);

        // Act & Assert
        assert_eq!(set.next_in_direction(4, Up), Some(7));
        assert_eq!(set.next_in_direction(4, Down), Some(1));
        assert_eq!(set.next_in_direction(7, Up), None);
        assert_eq!(set.next_in_direction(1, Down), None);
        assert_eq!(set.next_in_direction(4, Stop), None);
    }

    #[test]
    fn test_concurrent_inserts() {
        // Purpose: Verify that inserts from several threads all land exactly once

        // Arrange
        let set = Arc::new(RequestSet::new());

        // Act
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let set = Arc::clone(&set);
                spawn(move || {
                    for floor in 0..50 {
                        set.insert(floor);
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        // Assert
        assert_eq!(set.len(), 50);
    }

    #[test]
    fn test_hall_calls_are_tracked_per_direction() {
        // Purpose: Verify that opposite hall calls at one floor are independent entries

        // Arrange
        let store = RequestStore::new();

        // Act
        store.add_hall(5, Up);
        store.add_hall(5, Up);
        store.add_hall(5, Down);

        // Assert
        assert_eq!(store.hall(Up).floors(), vec![5]);
        assert_eq!(store.hall(Down).floors(), vec![5]);
        assert!(store.cab().is_empty());
    }

    #[test]
    #[should_panic(expected = "hall requests are always tagged up or down")]
    fn test_hall_call_without_direction_panics() {
        let store = RequestStore::new();
        store.add_hall(3, Stop);
    }

    #[test]
    fn test_store_nearest_across_sets() {
        // Purpose: Verify that the store-wide nearest uses the same upward tie-break

        // Arrange
        let store = RequestStore::new();
        store.add_cab(2);
        store.add_hall(6, Down);

        // Act & Assert
        assert_eq!(store.nearest(4), Some(6));
        assert_eq!(store.nearest(3), Some(2));
        store.add_hall(4, Up);
        assert_eq!(store.nearest(4), Some(4));
        assert_eq!(store.nearest_hall(5), Some(6));
        assert_eq!(RequestStore::new().nearest(0), None);
    }

    #[test]
    fn test_store_ahead() {
        // Arrange
        let store = RequestStore::new();
        store.add_cab(3);
        store.add_hall(8, Down);

        // Act & Assert
        assert!(store.cab_ahead(1, Up));
        assert!(!store.cab_ahead(3, Up));
        assert!(store.hall_ahead(3, Up));
        assert!(!store.any_ahead(8, Up));
        assert!(store.any_ahead(8, Down));
    }

    #[test]
    fn test_clear_at_moving_keeps_opposite_hall_call() {
        // Purpose: Verify that a stop while moving up leaves the down call for the return leg

        // Arrange
        let store = RequestStore::new();
        store.add_cab(5);
        store.add_hall(5, Up);
        store.add_hall(5, Down);

        // Act
        let cleared = store.clear_at(5, Up);

        // Assert
        assert_eq!(cleared, vec![Stop, Up]);
        assert!(!store.cab().contains(5));
        assert!(!store.hall(Up).contains(5));
        assert!(store.hall(Down).contains(5));
    }

    #[test]
    fn test_clear_at_idle_clears_both_hall_calls() {
        // Arrange
        let store = RequestStore::new();
        store.add_hall(2, Up);
        store.add_hall(2, Down);

        // Act
        let cleared = store.clear_at(2, Stop);
        let cleared_again = store.clear_at(2, Stop);

        // Assert
        assert_eq!(cleared, vec![Up, Down]);
        assert!(cleared_again.is_empty());
        assert!(store.is_empty());
    }
}
