use crate::maze::Position;

/// Copy of the runner registry taken under the session lock
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrySnapshot {
    registered: usize,
    positions: Vec<Position>,
}

impl RegistrySnapshot {
    pub fn new(registered: usize, positions: Vec<Position>) -> Self {
        Self {
            registered,
            positions,
        }
    }

    /// Number of claimed slots
    pub fn registered(&self) -> usize {
        self.registered
    }

    pub fn capacity(&self) -> usize {
        self.positions.len()
    }

    /// Position held in `slot`, claimed or not
    pub fn position(&self, slot: usize) -> Option<Position> {
        self.positions.get(slot).copied()
    }

    /// Positions of the claimed slots, in slot order
    pub fn registered_positions(&self) -> &[Position] {
        &self.positions[..self.registered.min(self.positions.len())]
    }

    /// Every slot, including unclaimed start positions
    pub fn all_positions(&self) -> &[Position] {
        &self.positions
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registered_positions_stop_at_count() {
        let snapshot = RegistrySnapshot::new(
            2,
            vec![Position::new(1, 1), Position::new(2, 1), Position::new(3, 1)],
        );
        assert_eq!(snapshot.capacity(), 3);
        assert_eq!(
            snapshot.registered_positions(),
            &[Position::new(1, 1), Position::new(2, 1)]
        );
        assert_eq!(snapshot.position(2), Some(Position::new(3, 1)));
        assert_eq!(snapshot.position(3), None);
    }
}
