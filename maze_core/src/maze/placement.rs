//! Random start placement for registry slots

use super::geometry::{MazeGeometry, Position};
use crate::error::{MazeError, MazeResult};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

/// Draw `count` start positions uniformly from the empty cells.
///
/// Draws are independent, so two slots may share a start cell.
pub fn random_starts<R: Rng + ?Sized>(
    maze: &MazeGeometry,
    count: usize,
    rng: &mut R,
) -> MazeResult<Vec<Position>> {
    let empty = maze.empty_cells();
    if empty.is_empty() {
        return Err(MazeError::NoEmptyCells);
    }

    let mut starts = Vec::with_capacity(count);
    for _ in 0..count {
        if let Some(pos) = empty.choose(rng) {
            starts.push(*pos);
        }
    }
    Ok(starts)
}

/// Seeded placement when `seed` is set, entropy otherwise
pub fn seeded_starts(
    maze: &MazeGeometry,
    count: usize,
    seed: Option<u64>,
) -> MazeResult<Vec<Position>> {
    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    random_starts(maze, count, &mut rng)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::maze::Cell;

    fn maze() -> MazeGeometry {
        MazeGeometry::from_rows(&["#######", "#  *  #", "# ### #", "#    E#", "#######"]).unwrap()
    }

    #[test]
    fn test_starts_land_on_empty_cells() {
        let maze = maze();
        let starts = seeded_starts(&maze, 200, Some(1)).unwrap();

        assert_eq!(starts.len(), 200);
        for pos in starts {
            assert_eq!(maze.get(pos), Some(Cell::Empty), "bad start {}", pos);
        }
    }

    #[test]
    fn test_same_seed_same_starts() {
        let maze = maze();
        let a = seeded_starts(&maze, 20, Some(99)).unwrap();
        let b = seeded_starts(&maze, 20, Some(99)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_no_empty_cells() {
        let maze = MazeGeometry::from_rows(&["###", "#E#", "###"]).unwrap();
        let err = seeded_starts(&maze, 3, Some(0)).unwrap_err();
        assert!(matches!(err, MazeError::NoEmptyCells));
    }
}
