use std::fmt::{self, Write};

use crate::core::grid::{COLUMNS, PunchGrid, WORDS_PER_PAGE};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenderStyle {
    /// Use 'X' to mark punched holes
    #[default]
    AsciiX,
    /// Use '1'/'0' to mark punched/unpunched
    Ascii01,
}

impl fmt::Display for RenderStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderStyle::AsciiX => write!(f, "ascii-x"),
            RenderStyle::Ascii01 => write!(f, "ascii-01"),
        }
    }
}

/// Optional cursor highlight for terminal rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Marker {
    pub row: usize,
    pub column: usize,
}

/// Text picture of one card page with a bit-weight ruler, word numbers
/// and the word value at the end of each row.
pub fn render_page(
    grid: &PunchGrid,
    page: usize,
    style: RenderStyle,
    reserved_from: Option<usize>,
    marker: Option<Marker>,
) -> String {
    let (mark, blank) = match style {
        RenderStyle::AsciiX => ('X', ' '),
        RenderStyle::Ascii01 => ('1', '0'),
    };
    let mut out = String::new();

    // Weights as four-row vertical digits, right aligned.
    let weights: Vec<String> = (0..COLUMNS)
        .map(|c| format!("{:>4}", 1u32 << (COLUMNS - 1 - c)))
        .collect();
    for digit in 0..4 {
        write!(&mut out, "     ").ok();
        for weight in &weights {
            out.push(weight.as_bytes()[digit] as char);
            out.push(' ');
        }
        writeln!(&mut out).ok();
    }

    let separator = "-".repeat(COLUMNS * 2 + 1);
    writeln!(&mut out, "    {}", separator).ok();
    for row in 0..WORDS_PER_PAGE {
        write!(&mut out, "{:>3} |", page * WORDS_PER_PAGE + row + 1).ok();
        let last_row = row == WORDS_PER_PAGE - 1;
        for column in 0..COLUMNS {
            let reserved = last_row && reserved_from.is_some_and(|from| column >= from);
            let cell = if grid.is_punched(row, column) {
                mark
            } else if reserved {
                '.'
            } else {
                blank
            };
            out.push(cell);
            let here = marker.is_some_and(|m| m.row == row && m.column == column);
            out.push(if here { '<' } else { ' ' });
        }
        writeln!(&mut out, "| {:>4}", grid.word(row)).ok();
    }
    writeln!(&mut out, "    {}", separator).ok();
    out
}
