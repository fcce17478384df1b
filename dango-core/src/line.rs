//! Line representation for the terminal grid.
//!
//! A line is a dense row of cells. Every slot always holds a cell;
//! erasing writes styled blanks rather than leaving holes.

use serde::{Deserialize, Serialize};

use crate::cell::Cell;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Line {
    cells: Vec<Cell>,
}

impl Line {
    /// A row of default cells.
    pub fn new(columns: usize) -> Self {
        Line {
            cells: vec![Cell::default(); columns],
        }
    }

    /// A row filled with copies of the given cell.
    pub fn filled(columns: usize, cell: &Cell) -> Self {
        Line {
            cells: vec![cell.clone(); columns],
        }
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn get(&self, column: usize) -> Option<&Cell> {
        self.cells.get(column)
    }

    pub fn get_mut(&mut self, column: usize) -> Option<&mut Cell> {
        self.cells.get_mut(column)
    }

    pub fn set(&mut self, column: usize, cell: Cell) {
        if column < self.cells.len() {
            self.cells[column] = cell;
        }
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn cells_mut(&mut self) -> &mut [Cell] {
        &mut self.cells
    }

    /// Overwrite every cell with copies of `fill`.
    pub fn fill(&mut self, fill: &Cell) {
        for cell in &mut self.cells {
            *cell = fill.clone();
        }
    }

    /// Overwrite cells in `[start, end)` with copies of `fill`.
    pub fn fill_range(&mut self, start: usize, end: usize, fill: &Cell) {
        let end = end.min(self.cells.len());
        for column in start..end {
            self.cells[column] = fill.clone();
        }
    }

    /// Insert `count` copies of `fill` at `column`, pushing the rest of
    /// the row right; cells shifted past the end are dropped.
    pub fn insert_cells(&mut self, column: usize, count: usize, fill: &Cell) {
        if column >= self.cells.len() {
            return;
        }
        let count = count.min(self.cells.len() - column);
        for _ in 0..count {
            self.cells.pop();
            self.cells.insert(column, fill.clone());
        }
    }

    /// Delete `count` cells at `column`, pulling the rest of the row
    /// left; exposed cells at the end are copies of `fill`.
    pub fn delete_cells(&mut self, column: usize, count: usize, fill: &Cell) {
        if column >= self.cells.len() {
            return;
        }
        let count = count.min(self.cells.len() - column);
        for _ in 0..count {
            self.cells.remove(column);
            self.cells.push(fill.clone());
        }
    }

    /// Drop `count` columns from the left edge.
    pub fn drop_left(&mut self, count: usize) {
        let count = count.min(self.cells.len());
        self.cells.drain(..count);
    }

    /// Append default columns on the right edge.
    pub fn grow_right(&mut self, count: usize) {
        let target = self.cells.len() + count;
        self.cells.resize(target, Cell::default());
    }

    /// The row as a display string: one position per column, with wide
    /// characters covering their stub slot.
    pub fn text(&self) -> String {
        let mut out = String::with_capacity(self.cells.len());
        for cell in &self.cells {
            if cell.is_wide_spacer() {
                continue;
            }
            if cell.data.is_empty() {
                out.push(' ');
            } else {
                out.push_str(&cell.data);
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spell(line: &Line) -> String {
        line.text()
    }

    fn alphabet_line(len: usize) -> Line {
        let mut line = Line::new(len);
        for i in 0..len {
            line.set(i, Cell::new((b'A' + i as u8) as char));
        }
        line
    }

    #[test]
    fn test_new_line() {
        let line = Line::new(80);
        assert_eq!(line.len(), 80);
        assert_eq!(line.text(), " ".repeat(80));
    }

    #[test]
    fn test_insert_cells() {
        let mut line = alphabet_line(10);
        line.insert_cells(3, 2, &Cell::default());
        assert_eq!(spell(&line), "ABC  DEFGH");
        assert_eq!(line.len(), 10);
    }

    #[test]
    fn test_delete_cells() {
        let mut line = alphabet_line(10);
        line.delete_cells(3, 2, &Cell::default());
        assert_eq!(spell(&line), "ABCFGHIJ  ");
        assert_eq!(line.len(), 10);
    }

    #[test]
    fn test_fill_range() {
        let mut line = alphabet_line(10);
        line.fill_range(2, 5, &Cell::default());
        assert_eq!(spell(&line), "AB   FGHIJ");
    }

    #[test]
    fn test_fill_range_clamps() {
        let mut line = alphabet_line(5);
        line.fill_range(3, 100, &Cell::default());
        assert_eq!(spell(&line), "ABC  ");
    }

    #[test]
    fn test_drop_left_and_grow_right() {
        let mut line = alphabet_line(6);
        line.drop_left(2);
        assert_eq!(spell(&line), "CDEF");
        line.grow_right(2);
        assert_eq!(spell(&line), "CDEF  ");
    }

    #[test]
    fn test_insert_past_end_is_noop() {
        let mut line = alphabet_line(4);
        line.insert_cells(4, 2, &Cell::default());
        assert_eq!(spell(&line), "ABCD");
    }
}
