//! Plain-text maze loading
//!
//! One row per line, the longest line sets the width. Space is open floor,
//! `#` (or `X`) is a wall, `E` is an exit, anything else is a traversable marker.
//! Blank lines are skipped.

use super::geometry::MazeGeometry;
use crate::error::{MazeError, MazeResult};
use std::path::Path;

/// Parse maze text into a geometry
pub fn parse_maze(text: &str) -> MazeResult<MazeGeometry> {
    let rows: Vec<&str> = text
        .lines()
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .filter(|line| !line.is_empty())
        .collect();

    if rows.is_empty() {
        return Err(MazeError::InvalidMaze("maze text has no rows".to_string()));
    }

    MazeGeometry::from_rows(&rows)
}

/// Read and parse a maze file
pub fn load_maze<P: AsRef<Path>>(path: P) -> MazeResult<MazeGeometry> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).map_err(|e| {
        MazeError::InvalidMaze(format!("cannot read {}: {}", path.display(), e))
    })?;

    let maze = parse_maze(&text)?;
    log::info!(
        "Loaded {}x{} maze from {} ({} exit cell(s))",
        maze.cols(),
        maze.rows(),
        path.display(),
        maze.exits().len()
    );
    Ok(maze)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::maze::{Cell, Position};
    use std::io::Write;

    #[test]
    fn test_longest_line_defines_width() {
        let maze = parse_maze("####\n#  E#####\n####\n").unwrap();
        assert_eq!(maze.cols(), 9);
        assert_eq!(maze.rows(), 3);
        assert_eq!(maze.get(Position::new(8, 0)), Some(Cell::Empty));
        assert_eq!(maze.get(Position::new(3, 1)), Some(Cell::Exit));
    }

    #[test]
    fn test_blank_lines_and_carriage_returns_are_ignored() {
        let maze = parse_maze("###\r\n\r\n#E#\r\n\n###").unwrap();
        assert_eq!(maze.rows(), 3);
        assert_eq!(maze.cols(), 3);
        assert_eq!(maze.get(Position::new(1, 1)), Some(Cell::Exit));
    }

    #[test]
    fn test_wall_alias_and_markers() {
        let maze = parse_maze("XX#\nX*E").unwrap();
        assert_eq!(maze.get(Position::new(0, 0)), Some(Cell::Wall));
        assert_eq!(maze.get(Position::new(2, 0)), Some(Cell::Wall));
        assert_eq!(maze.get(Position::new(1, 1)), Some(Cell::Marker(b'*')));
    }

    #[test]
    fn test_empty_text_is_rejected() {
        assert!(matches!(parse_maze(""), Err(MazeError::InvalidMaze(_))));
        assert!(matches!(parse_maze("\n\n"), Err(MazeError::InvalidMaze(_))));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "#####\n#  E#\n#####").unwrap();

        let maze = load_maze(file.path()).unwrap();
        assert_eq!(maze.exits(), vec![Position::new(3, 1)]);
        assert!(load_maze("/definitely/not/here.txt").is_err());
    }
}
