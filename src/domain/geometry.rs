//! Pixel <-> square mapping for a fixed-size board.
//!
//! Screen row 0 is drawn at the top. Two independent inversions apply: when the
//! board is flipped both column and row are mirrored first, then the row is
//! turned into a rank (`rank = 7 - row`).

use shakmaty::{File, Rank, Square};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoardGeometry {
    /// Top-left corner of the board in panel coordinates
    pub origin_x: f32,
    pub origin_y: f32,
    pub square_size: f32,
    pub flipped: bool,
}

impl BoardGeometry {
    pub fn new(origin_x: f32, origin_y: f32, square_size: f32, flipped: bool) -> Self {
        Self {
            origin_x,
            origin_y,
            square_size,
            flipped,
        }
    }

    pub fn board_size(&self) -> f32 {
        self.square_size * 8.0
    }

    /// Screen cell (row, col) under a point, if the point is on the board
    pub fn cell_at(&self, x: f32, y: f32) -> Option<(usize, usize)> {
        let board_x = x - self.origin_x;
        let board_y = y - self.origin_y;
        if board_x < 0.0 || board_y < 0.0 {
            return None;
        }

        let col = (board_x / self.square_size) as usize;
        let row = (board_y / self.square_size) as usize;
        (row < 8 && col < 8).then_some((row, col))
    }

    /// Square drawn in screen cell (row, col)
    pub fn square_in_cell(&self, row: usize, col: usize) -> Square {
        let (row, col) = if self.flipped {
            (7 - row, 7 - col)
        } else {
            (row, col)
        };
        Square::from_coords(File::new(col as u32), Rank::new(7 - row as u32))
    }

    pub fn square_at(&self, x: f32, y: f32) -> Option<Square> {
        self.cell_at(x, y)
            .map(|(row, col)| self.square_in_cell(row, col))
    }

    /// Screen cell (row, col) where a square is drawn
    pub fn cell_of(&self, square: Square) -> (usize, usize) {
        let col = u32::from(square.file()) as usize;
        let row = 7 - u32::from(square.rank()) as usize;
        if self.flipped {
            (7 - row, 7 - col)
        } else {
            (row, col)
        }
    }

    /// Top-left pixel of a square
    pub fn square_origin(&self, square: Square) -> (f32, f32) {
        let (row, col) = self.cell_of(square);
        (
            self.origin_x + col as f32 * self.square_size,
            self.origin_y + row as f32 * self.square_size,
        )
    }

    #[cfg(test)]
    pub fn square_center(&self, square: Square) -> (f32, f32) {
        let (x, y) = self.square_origin(square);
        let half = self.square_size / 2.0;
        (x + half, y + half)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn geometry(flipped: bool) -> BoardGeometry {
        BoardGeometry::new(20.0, 20.0, 64.0, flipped)
    }

    #[test]
    fn test_round_trip_standard_orientation() {
        let geo = geometry(false);
        for square in Square::ALL {
            let (x, y) = geo.square_center(square);
            assert_eq!(geo.square_at(x, y), Some(square));
        }
    }

    #[test]
    fn test_round_trip_flipped_orientation() {
        let geo = geometry(true);
        for square in Square::ALL {
            let (x, y) = geo.square_center(square);
            assert_eq!(geo.square_at(x, y), Some(square));
        }
    }

    #[test]
    fn test_corners_standard() {
        let geo = geometry(false);
        assert_eq!(geo.square_at(21.0, 21.0), Some(Square::A8));
        assert_eq!(geo.square_at(20.0 + 511.0, 20.0 + 511.0), Some(Square::H1));
        assert_eq!(geo.square_at(21.0, 20.0 + 511.0), Some(Square::A1));
    }

    #[test]
    fn test_corners_flipped() {
        let geo = geometry(true);
        assert_eq!(geo.square_at(21.0, 21.0), Some(Square::H1));
        assert_eq!(geo.square_at(20.0 + 511.0, 20.0 + 511.0), Some(Square::A8));
        assert_eq!(geo.square_at(21.0, 20.0 + 511.0), Some(Square::H8));
    }

    #[test]
    fn test_outside_board() {
        let geo = geometry(false);
        assert_eq!(geo.square_at(5.0, 100.0), None);
        assert_eq!(geo.square_at(100.0, 5.0), None);
        assert_eq!(geo.square_at(20.0 + 512.0, 100.0), None);
        assert_eq!(geo.square_at(100.0, 20.0 + 600.0), None);
    }

    #[test]
    fn test_cell_of_matches_square_in_cell() {
        for flipped in [false, true] {
            let geo = geometry(flipped);
            for row in 0..8 {
                for col in 0..8 {
                    let square = geo.square_in_cell(row, col);
                    assert_eq!(geo.cell_of(square), (row, col));
                }
            }
        }
    }
}
