//! Navigation cursor over the message index

use super::types::Direction;

/// Selected position in the message index, or none
///
/// Wraps in both directions. "None" behaves like position −1 when stepping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NavigationCursor {
    position: Option<usize>,
}

impl NavigationCursor {
    pub fn none() -> Self {
        Self { position: None }
    }

    pub fn at(position: usize) -> Self {
        Self {
            position: Some(position),
        }
    }

    pub fn position(&self) -> Option<usize> {
        self.position
    }

    pub fn is_none(&self) -> bool {
        self.position.is_none()
    }

    /// Position a step in `direction` would land on, without moving
    ///
    /// `None` when the index is empty.
    pub fn target(&self, direction: Direction, len: usize) -> Option<usize> {
        if len == 0 {
            return None;
        }
        let target = match (direction, self.position) {
            (Direction::Next, None) => 0,
            (Direction::Next, Some(current)) => (current + 1) % len,
            (Direction::Previous, None) | (Direction::Previous, Some(0)) => len - 1,
            (Direction::Previous, Some(current)) => current - 1,
        };
        Some(target.min(len - 1))
    }

    /// Move one step and return the new position
    pub fn step(&mut self, direction: Direction, len: usize) -> Option<usize> {
        let target = self.target(direction, len)?;
        self.position = Some(target);
        Some(target)
    }

    pub fn select(&mut self, position: usize) {
        self.position = Some(position);
    }

    pub fn clear(&mut self) {
        self.position = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_next_from_none_selects_first() {
        let mut cursor = NavigationCursor::none();
        assert_eq!(cursor.step(Direction::Next, 2), Some(0));
        assert_eq!(cursor.step(Direction::Next, 2), Some(1));
        assert_eq!(cursor.step(Direction::Next, 2), Some(0));
    }

    #[test]
    fn test_previous_from_none_selects_last() {
        let mut cursor = NavigationCursor::none();
        assert_eq!(cursor.step(Direction::Previous, 3), Some(2));
    }

    #[test]
    fn test_previous_wraps_from_first() {
        let mut cursor = NavigationCursor::at(0);
        assert_eq!(cursor.step(Direction::Previous, 3), Some(2));
        assert_eq!(cursor.step(Direction::Previous, 3), Some(1));
    }

    #[test]
    fn test_empty_index_is_noop() {
        let mut cursor = NavigationCursor::at(1);
        assert_eq!(cursor.step(Direction::Next, 0), None);
        assert_eq!(cursor.step(Direction::Previous, 0), None);
        assert_eq!(cursor.position(), Some(1));

        let mut none = NavigationCursor::none();
        assert_eq!(none.step(Direction::Next, 0), None);
        assert!(none.is_none());
    }

    #[test]
    fn test_target_does_not_move() {
        let cursor = NavigationCursor::at(1);
        assert_eq!(cursor.target(Direction::Next, 2), Some(0));
        assert_eq!(cursor.position(), Some(1));
    }

    proptest! {
        #[test]
        fn prop_next_len_times_is_identity(len in 1usize..64, start in 0usize..64) {
            let start = start % len;
            let mut cursor = NavigationCursor::at(start);
            for _ in 0..len {
                cursor.step(Direction::Next, len);
            }
            prop_assert_eq!(cursor.position(), Some(start));
        }

        #[test]
        fn prop_previous_inverts_next(len in 1usize..64, start in 0usize..64) {
            let start = start % len;
            let mut cursor = NavigationCursor::at(start);
            cursor.step(Direction::Next, len);
            cursor.step(Direction::Previous, len);
            prop_assert_eq!(cursor.position(), Some(start));

            cursor.step(Direction::Previous, len);
            cursor.step(Direction::Next, len);
            prop_assert_eq!(cursor.position(), Some(start));
        }

        #[test]
        fn prop_target_always_in_bounds(len in 1usize..64, start in proptest::option::of(0usize..64)) {
            let cursor = match start {
                Some(p) => NavigationCursor::at(p % len),
                None => NavigationCursor::none(),
            };
            for direction in [Direction::Next, Direction::Previous] {
                let target = cursor.target(direction, len);
                prop_assert!(matches!(target, Some(t) if t < len));
            }
        }
    }
}
