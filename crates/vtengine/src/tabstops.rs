//! Horizontal tab stop set.

#[derive(Debug, Clone)]
pub struct TabStops {
    stops: Vec<bool>,
}

impl TabStops {
    /// Default stops every 8 columns, matching every DEC terminal's reset state.
    pub fn new(columns: usize) -> Self {
        let mut stops = vec![false; columns];
        let mut col = 8;
        while col < columns {
            stops[col] = true;
            col += 8;
        }
        TabStops { stops }
    }

    pub fn resize(&mut self, columns: usize) {
        self.stops.resize(columns, false);
    }

    pub fn set(&mut self, column: usize) {
        if column < self.stops.len() {
            self.stops[column] = true;
        }
    }

    pub fn is_set(&self, column: usize) -> bool {
        self.stops.get(column).copied().unwrap_or(false)
    }

    pub fn clear(&mut self, column: usize) {
        if column < self.stops.len() {
            self.stops[column] = false;
        }
    }

    pub fn clear_all(&mut self) {
        self.stops.iter_mut().for_each(|s| *s = false);
    }

    /// Column of the next tab stop strictly after `from`, or the last column
    /// if none remain.
    pub fn next_stop(&self, from: usize) -> usize {
        ((from + 1)..self.stops.len()).find(|&c| self.stops[c]).unwrap_or(self.stops.len().saturating_sub(1))
    }

    /// Column of the previous tab stop strictly before `from`, or `0`.
    pub fn previous_stop(&self, from: usize) -> usize {
        (0..from).rev().find(|&c| self.stops[c]).unwrap_or(0)
    }
}
