use thiserror::Error;

/// Material code for one grid cell. 0 is open floor; any nonzero value
/// identifies a wall and selects its texture.
pub type WallType = u8;

#[derive(Debug, Error)]
pub enum MapError {
    #[error("map must have at least one row and one column")]
    Empty,
    #[error("map row {row} has {len} cells, expected {expected}")]
    Ragged {
        row: usize,
        len: usize,
        expected: usize,
    },
}

/// Rectangular tile map, row-major, indexed (column, row).
///
/// Read-only while a frame is being cast; edits between frames go through
/// `set`.
#[derive(Debug)]
pub struct GridMap {
    cells: Vec<WallType>,
    cols: usize,
    rows: usize,
}

impl GridMap {
    pub fn new(rows: Vec<Vec<WallType>>) -> Result<Self, MapError> {
        let row_count = rows.len();
        let cols = rows.first().map_or(0, Vec::len);
        if row_count == 0 || cols == 0 {
            return Err(MapError::Empty);
        }
        let mut cells = Vec::with_capacity(row_count * cols);
        for (row, r) in rows.into_iter().enumerate() {
            if r.len() != cols {
                return Err(MapError::Ragged {
                    row,
                    len: r.len(),
                    expected: cols,
                });
            }
            cells.extend_from_slice(&r);
        }
        Ok(Self {
            cells,
            cols,
            rows: row_count,
        })
    }

    /// Open rectangle with a one-cell wall border, the usual starting level.
    pub fn bordered(cols: usize, rows: usize, wall: WallType) -> Self {
        let mut cells = vec![0; cols * rows];
        for y in 0..rows {
            for x in 0..cols {
                if x == 0 || x == cols - 1 || y == 0 || y == rows - 1 {
                    cells[y * cols + x] = wall;
                }
            }
        }
        Self { cells, cols, rows }
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Cell lookup with signed indices; anything outside the grid is `None`.
    #[inline]
    pub fn at(&self, col: i64, row: i64) -> Option<WallType> {
        if col < 0 || row < 0 || col as usize >= self.cols || row as usize >= self.rows {
            return None;
        }
        Some(self.cells[row as usize * self.cols + col as usize])
    }

    pub fn set(&mut self, col: usize, row: usize, wall: WallType) {
        if col < self.cols && row < self.rows {
            self.cells[row * self.cols + col] = wall;
        }
    }
}
