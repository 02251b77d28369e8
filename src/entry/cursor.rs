//! Cursor positions on the entry screen.
//!
//! Absolute positions match the touch layout: grid cells are
//! `row * 12 + column` (0..=143), the menu row below the grid maps
//! 144..=149 to Cancel and 150..=155 to Confirm.

use crate::core::grid::{COLUMNS, SeedLength, WORDS_PER_PAGE};

pub const GRID_CELLS: usize = WORDS_PER_PAGE * COLUMNS;
pub const CANCEL_START: usize = GRID_CELLS;
pub const CANCEL_END: usize = CANCEL_START + 5;
pub const CONFIRM_END: usize = CANCEL_START + 11;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cursor {
    /// Editable cell.
    Data { row: usize, column: usize },
    /// Checksum cell: shown, never edited.
    Reserved { row: usize, column: usize },
    Cancel,
    Confirm,
}

impl Cursor {
    /// Absolute position; Cancel and Confirm report the last slot of their
    /// touch span.
    pub fn position(self) -> usize {
        match self {
            Cursor::Data { row, column } | Cursor::Reserved { row, column } => {
                row * COLUMNS + column
            }
            Cursor::Cancel => CANCEL_END,
            Cursor::Confirm => CONFIRM_END,
        }
    }

    pub fn cell(self) -> Option<(usize, usize)> {
        match self {
            Cursor::Data { row, column } | Cursor::Reserved { row, column } => Some((row, column)),
            _ => None,
        }
    }
}

/// Cells in row-major order, then Cancel, then Confirm.
impl Ord for Cursor {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        let key = |c: &Cursor| (c.position(), matches!(c, Cursor::Reserved { .. }));
        key(self).cmp(&key(other))
    }
}

impl PartialOrd for Cursor {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

/// Which cells of a page are editable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageCells {
    last_editable: usize,
}

impl PageCells {
    /// Page 0 of a 24-word seed has no checksum yet; the checksum page
    /// reserves the low 4 (12 words) or 8 (24 words) columns of row 11.
    pub fn for_page(length: SeedLength, page: usize) -> Self {
        let reserved = if length.has_checksum_on(page) {
            match length {
                SeedLength::Twelve => 4,
                SeedLength::TwentyFour => 8,
            }
        } else {
            0
        };
        Self {
            last_editable: GRID_CELLS - 1 - reserved,
        }
    }

    pub fn last_editable(&self) -> usize {
        self.last_editable
    }

    /// First reserved column of row 11, if the page has any.
    pub fn reserved_from(&self) -> Option<usize> {
        (self.last_editable < GRID_CELLS - 1).then_some(self.last_editable % COLUMNS + 1)
    }

    pub fn first(&self) -> Cursor {
        self.cell_at(0)
    }

    pub fn last(&self) -> Cursor {
        self.cell_at(self.last_editable)
    }

    /// Cursor for an absolute position, `None` past the menu row.
    pub fn cursor_at(&self, position: usize) -> Option<Cursor> {
        match position {
            p if p < GRID_CELLS => Some(self.cell_at(p)),
            p if p <= CANCEL_END => Some(Cursor::Cancel),
            p if p <= CONFIRM_END => Some(Cursor::Confirm),
            _ => None,
        }
    }

    /// Step forward: editable cells in row-major order, then Cancel, then
    /// Confirm, then wrap to the first cell. Reserved cells are skipped.
    pub fn next(&self, cursor: Cursor) -> Cursor {
        match cursor {
            Cursor::Data { .. } | Cursor::Reserved { .. } => {
                let position = cursor.position();
                if position >= self.last_editable {
                    Cursor::Cancel
                } else {
                    self.cell_at(position + 1)
                }
            }
            Cursor::Cancel => Cursor::Confirm,
            Cursor::Confirm => self.first(),
        }
    }

    /// Exact inverse of [`PageCells::next`].
    pub fn prev(&self, cursor: Cursor) -> Cursor {
        match cursor {
            Cursor::Data { .. } | Cursor::Reserved { .. } => {
                let position = cursor.position();
                if position == 0 {
                    Cursor::Confirm
                } else if position > self.last_editable {
                    self.last()
                } else {
                    self.cell_at(position - 1)
                }
            }
            Cursor::Cancel => self.last(),
            Cursor::Confirm => Cursor::Cancel,
        }
    }

    fn cell_at(&self, position: usize) -> Cursor {
        let (row, column) = (position / COLUMNS, position % COLUMNS);
        if position <= self.last_editable {
            Cursor::Data { row, column }
        } else {
            Cursor::Reserved { row, column }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn editable_ranges_match_checksum_width() {
        let twelve = PageCells::for_page(SeedLength::Twelve, 0);
        let front = PageCells::for_page(SeedLength::TwentyFour, 0);
        let back = PageCells::for_page(SeedLength::TwentyFour, 1);
        assert_eq!(twelve.last_editable(), 139);
        assert_eq!(front.last_editable(), 143);
        assert_eq!(back.last_editable(), 135);
        assert_eq!(twelve.reserved_from(), Some(8));
        assert_eq!(back.reserved_from(), Some(4));
        assert_eq!(front.reserved_from(), None);
    }

    #[test]
    fn navigation_wraps_through_menu() {
        let cells = PageCells::for_page(SeedLength::Twelve, 0);
        let last = cells.last();
        assert_eq!(last, Cursor::Data { row: 11, column: 7 });
        assert_eq!(cells.next(last), Cursor::Cancel);
        assert_eq!(cells.next(Cursor::Cancel), Cursor::Confirm);
        assert_eq!(
            cells.next(Cursor::Confirm),
            Cursor::Data { row: 0, column: 0 }
        );
        assert_eq!(cells.prev(cells.first()), Cursor::Confirm);
        assert_eq!(cells.prev(Cursor::Confirm), Cursor::Cancel);
        assert_eq!(cells.prev(Cursor::Cancel), last);
    }

    #[test]
    fn full_cycle_visits_every_editable_cell_once() {
        for (length, page) in [
            (SeedLength::Twelve, 0),
            (SeedLength::TwentyFour, 0),
            (SeedLength::TwentyFour, 1),
        ] {
            let cells = PageCells::for_page(length, page);
            let mut cursor = cells.first();
            let mut forward = vec![cursor];
            loop {
                cursor = cells.next(cursor);
                if cursor == cells.first() {
                    break;
                }
                forward.push(cursor);
            }
            assert_eq!(forward.len(), cells.last_editable() + 1 + 2);
            let mut backward = vec![cells.first()];
            let mut cursor = cells.first();
            for _ in 1..forward.len() {
                cursor = cells.prev(cursor);
                backward.push(cursor);
            }
            backward[1..].reverse();
            assert_eq!(backward, forward);
        }
    }

    #[test]
    fn order_follows_positions() {
        let cells = PageCells::for_page(SeedLength::TwentyFour, 1);
        assert!(cells.first() < cells.last());
        assert!(cells.last() < Cursor::Reserved { row: 11, column: 4 });
        assert!(Cursor::Reserved { row: 11, column: 11 } < Cursor::Cancel);
        assert!(Cursor::Cancel < Cursor::Confirm);
    }

    #[test]
    fn touch_positions_resolve() {
        let cells = PageCells::for_page(SeedLength::Twelve, 0);
        assert_eq!(
            cells.cursor_at(13),
            Some(Cursor::Data { row: 1, column: 1 })
        );
        assert_eq!(
            cells.cursor_at(140),
            Some(Cursor::Reserved { row: 11, column: 8 })
        );
        assert_eq!(cells.cursor_at(144), Some(Cursor::Cancel));
        assert_eq!(cells.cursor_at(149), Some(Cursor::Cancel));
        assert_eq!(cells.cursor_at(150), Some(Cursor::Confirm));
        assert_eq!(cells.cursor_at(155), Some(Cursor::Confirm));
        assert_eq!(cells.cursor_at(156), None);
        let reserved = Cursor::Reserved { row: 11, column: 9 };
        assert_eq!(cells.next(reserved), Cursor::Cancel);
        assert_eq!(cells.prev(reserved), cells.last());
    }
}
