//! Zero-based `(column, row)` grid coordinate.

use std::ops::{Add, AddAssign, Sub, SubAssign};

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Position {
    pub column: usize,
    pub row: usize,
}

impl Position {
    pub fn new(column: usize, row: usize) -> Self {
        Position { column, row }
    }

    pub fn with_row(self, row: usize) -> Position {
        Position { column: self.column, row }
    }

    pub fn with_column(self, column: usize) -> Position {
        Position { column, row: self.row }
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "(col: {}, row: {})", self.column, self.row)
    }
}

impl Add<(isize, isize)> for Position {
    type Output = Position;
    fn add(self, (dc, dr): (isize, isize)) -> Position {
        Position {
            column: (self.column as isize + dc).max(0) as usize,
            row: (self.row as isize + dr).max(0) as usize,
        }
    }
}

impl AddAssign<(isize, isize)> for Position {
    fn add_assign(&mut self, rhs: (isize, isize)) {
        *self = *self + rhs;
    }
}

impl Sub<Position> for Position {
    type Output = (isize, isize);
    fn sub(self, rhs: Position) -> (isize, isize) {
        (self.column as isize - rhs.column as isize, self.row as isize - rhs.row as isize)
    }
}

impl SubAssign<(isize, isize)> for Position {
    fn sub_assign(&mut self, rhs: (isize, isize)) {
        *self = *self + (-rhs.0, -rhs.1);
    }
}

impl From<(usize, usize)> for Position {
    fn from((column, row): (usize, usize)) -> Self {
        Position { column, row }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn saturates_at_zero() {
        let p = Position::new(0, 0) + (-5, -5);
        assert_eq!(p, Position::new(0, 0));
    }

    #[test]
    fn difference_is_signed() {
        assert_eq!(Position::new(2, 3) - Position::new(5, 1), (-3, 2));
    }
}
