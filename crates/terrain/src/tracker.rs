//! Change detection on the viewpoint's grid coordinate.

use engine_core::GridCoordinate;

/// Remembers the grid coordinate of the last synthesis pass.
#[derive(Debug, Default)]
pub struct GridTracker {
    last: Option<GridCoordinate>,
}

impl GridTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `coord` and return `true` if it differs from the last recorded one.
    /// The first observation always returns `true`.
    pub fn observe(&mut self, coord: GridCoordinate) -> bool {
        if self.last == Some(coord) {
            return false;
        }
        self.last = Some(coord);
        true
    }

    pub fn last(&self) -> Option<GridCoordinate> {
        self.last
    }

    /// Forget the last coordinate so the next observation triggers again.
    pub fn reset(&mut self) {
        self.last = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_observation_triggers() {
        let mut tracker = GridTracker::new();
        assert!(tracker.observe(GridCoordinate::new(32, 32)));
        assert_eq!(tracker.last(), Some(GridCoordinate::new(32, 32)));
    }

    #[test]
    fn unchanged_coordinate_triggers_once() {
        let mut tracker = GridTracker::new();
        let triggers = (0..100)
            .filter(|_| tracker.observe(GridCoordinate::new(7, 9)))
            .count();
        assert_eq!(triggers, 1);
    }

    #[test]
    fn back_and_forth_triggers_every_time() {
        let mut tracker = GridTracker::new();
        let a = GridCoordinate::new(10, 10);
        let b = a.offset(1, 0);
        let triggers = [a, b, a, b, b, a]
            .into_iter()
            .filter(|&c| tracker.observe(c))
            .count();
        assert_eq!(triggers, 5);
    }

    #[test]
    fn reset_rearms_the_tracker() {
        let mut tracker = GridTracker::new();
        let c = GridCoordinate::new(1, 2);
        tracker.observe(c);
        tracker.reset();
        assert!(tracker.observe(c));
    }
}
