//! Text tile maps: one character per cell, one line per row.
//! `'0'` marks an open (air) cell; every other character is solid.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use crate::error::Result;
use crate::generate::Cell;

const OPEN_TILE: char = '0';

#[derive(Debug, Clone, Default)]
pub struct TileMap {
    open: HashSet<Cell>,
    width: usize,
    height: usize,
}

impl TileMap {
    /// Parse a map. Ragged rows are fine; the width is the longest row.
    pub fn parse(text: &str) -> Self {
        let mut open = HashSet::new();
        let mut width = 0;
        let mut height = 0;

        for (y, row) in text.split('\n').enumerate() {
            let row = row.strip_suffix('\r').unwrap_or(row);
            let mut len = 0;
            for (x, ch) in row.chars().enumerate() {
                if ch == OPEN_TILE {
                    open.insert((x as i32, y as i32));
                }
                len = x + 1;
            }
            width = width.max(len);
            if len > 0 {
                height = y + 1;
            }
        }

        Self {
            open,
            width,
            height,
        }
    }

    /// Read and parse a map file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)?;
        let map = Self::parse(&text);
        log::debug!(
            "loaded tile map {} ({}x{}, {} open cells)",
            path.display(),
            map.width,
            map.height,
            map.open.len()
        );
        Ok(map)
    }

    pub fn open_cells(&self) -> &HashSet<Cell> {
        &self.open
    }

    pub fn is_open(&self, x: i32, y: i32) -> bool {
        self.open.contains(&(x, y))
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_marks_zero_as_open() {
        let map = TileMap::parse("000\n010\n000");
        assert_eq!(map.open_cells().len(), 8);
        assert!(!map.is_open(1, 1));
        assert!(map.is_open(2, 2));
        assert_eq!((map.width(), map.height()), (3, 3));
    }

    #[test]
    fn test_unknown_characters_are_solid() {
        let map = TileMap::parse("0x#\n 0?");
        assert!(map.is_open(0, 0));
        assert!(!map.is_open(1, 0));
        assert!(!map.is_open(0, 1));
        assert!(map.is_open(1, 1));
    }

    #[test]
    fn test_ragged_rows_and_crlf() {
        let map = TileMap::parse("00000\r\n0\r\n000\r\n");
        assert_eq!(map.width(), 5);
        assert_eq!(map.height(), 3);
        assert_eq!(map.open_cells().len(), 9);
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let err = TileMap::load("/nonexistent/tilelight/map.txt").unwrap_err();
        assert!(matches!(err, crate::error::LightingError::Io(_)));
    }
}
