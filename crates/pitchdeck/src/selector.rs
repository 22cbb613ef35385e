use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SelectError {
    #[error("point {index} does not exist (slide has {count})")]
    InvalidIndex { index: usize, count: usize },
}

/// Which point of the mounted slide is shown enlarged. A fresh selector
/// starts at the first point.
#[derive(Debug, Clone)]
pub struct PointSelector {
    point_count: usize,
    selected: usize,
}

impl PointSelector {
    pub fn new(point_count: usize) -> Self {
        Self {
            point_count,
            selected: 0,
        }
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn point_count(&self) -> usize {
        self.point_count
    }

    /// Returns whether the selection changed.
    pub fn select(&mut self, index: usize) -> Result<bool, SelectError> {
        if index >= self.point_count {
            return Err(SelectError::InvalidIndex {
                index,
                count: self.point_count,
            });
        }
        if index == self.selected {
            return Ok(false);
        }
        log::debug!("point {} -> {index}", self.selected);
        self.selected = index;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_at_first_point() {
        assert_eq!(PointSelector::new(4).selected(), 0);
    }

    #[test]
    fn test_select_valid() {
        let mut selector = PointSelector::new(3);
        assert_eq!(selector.select(2), Ok(true));
        assert_eq!(selector.selected(), 2);
    }

    #[test]
    fn test_reselect_is_idempotent() {
        let mut selector = PointSelector::new(3);
        selector.select(1).unwrap();
        assert_eq!(selector.select(1), Ok(false));
        assert_eq!(selector.selected(), 1);
    }

    #[test]
    fn test_out_of_range_rejected() {
        let mut selector = PointSelector::new(3);
        selector.select(1).unwrap();
        assert_eq!(
            selector.select(3),
            Err(SelectError::InvalidIndex { index: 3, count: 3 })
        );
        assert_eq!(selector.selected(), 1);
    }

    #[test]
    fn test_empty_selector_rejects_everything() {
        let mut selector = PointSelector::new(0);
        assert!(selector.select(0).is_err());
    }
}
