use core::fmt;

use serde::{Deserialize, Serialize};

/// Maximum number of rows in a sheet.
pub const MAX_ROWS: i32 = 16_384;

/// Maximum number of columns in a sheet.
pub const MAX_COLS: i32 = 16_384;

/// Maximum length of a cell address string (letters plus digits).
pub const MAX_POSITION_LENGTH: usize = 17;

/// Maximum number of column letters in a cell address (`XFD` is the last column).
pub const MAX_POS_LETTER_COUNT: usize = 3;

const LETTERS: i32 = 26;
const MAX_ROW_DIGIT_COUNT: usize = MAX_POSITION_LENGTH - MAX_POS_LETTER_COUNT;

/// A reference to a single cell within a sheet.
///
/// Rows and columns are **0-indexed**:
/// - `row = 0` is display row `1`
/// - `col = 0` is column `A`
///
/// Out-of-range coordinates are representable (and compare/order normally) so
/// that callers can carry around addresses that failed validation; the
/// [`Position::NONE`] sentinel is the canonical "no position" value. Anything
/// that is not [`is_valid`](Position::is_valid) renders as the empty string.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Position {
    /// 0-indexed row.
    pub row: i32,
    /// 0-indexed column.
    pub col: i32,
}

impl Position {
    /// Sentinel for "no position".
    pub const NONE: Position = Position { row: -1, col: -1 };

    /// Construct a new [`Position`].
    #[inline]
    pub const fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }

    /// Returns true if this position addresses a cell inside the sheet bounds.
    #[inline]
    pub const fn is_valid(self) -> bool {
        self.row >= 0 && self.col >= 0 && self.row < MAX_ROWS && self.col < MAX_COLS
    }

    /// Parse an address like `A1` or `BC32`.
    ///
    /// The accepted syntax is a run of 1 to [`MAX_POS_LETTER_COUNT`] uppercase
    /// ASCII letters followed by a run of ASCII digits, with nothing before,
    /// between or after, and at most [`MAX_POSITION_LENGTH`] characters in
    /// total. Returns [`Position::NONE`] when the input does not match the
    /// syntax or the decoded cell lies outside the sheet bounds.
    pub fn from_string(s: &str) -> Self {
        if s.len() > MAX_POSITION_LENGTH {
            return Self::NONE;
        }

        let bytes = s.as_bytes();
        let mut idx = 0usize;
        while idx < bytes.len() && bytes[idx].is_ascii_uppercase() {
            idx += 1;
        }
        if idx == 0 || idx > MAX_POS_LETTER_COUNT {
            return Self::NONE;
        }

        let digits = &s[idx..];
        if digits.is_empty()
            || digits.len() > MAX_ROW_DIGIT_COUNT
            || !digits.bytes().all(|b| b.is_ascii_digit())
        {
            return Self::NONE;
        }

        let col = match column_index(&s[..idx]) {
            Some(col) => col,
            None => return Self::NONE,
        };
        // At most 14 digits, so the parse cannot overflow u64.
        let row_1_based: u64 = match digits.parse() {
            Ok(n) => n,
            Err(_) => return Self::NONE,
        };
        if row_1_based == 0 || row_1_based > MAX_ROWS as u64 {
            return Self::NONE;
        }

        let pos = Self::new(row_1_based as i32 - 1, col);
        if pos.is_valid() {
            pos
        } else {
            Self::NONE
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.is_valid() {
            return Ok(());
        }
        write!(f, "{}{}", column_name(self.col), self.row + 1)
    }
}

/// Encode a 0-indexed column as bijective base-26 letters (`0` → `A`,
/// `25` → `Z`, `26` → `AA`).
pub fn column_name(col: i32) -> String {
    if col < 0 {
        return String::new();
    }
    let mut n = col + 1;
    let mut out = Vec::<u8>::new();
    while n > 0 {
        let rem = (n - 1) % LETTERS;
        out.push(b'A' + rem as u8);
        n = (n - 1) / LETTERS;
    }
    out.reverse();
    String::from_utf8(out).expect("column letters are always valid UTF-8")
}

/// Decode bijective base-26 column letters to a 0-indexed column.
///
/// Returns `None` for an empty string or non-uppercase input. The result may
/// exceed [`MAX_COLS`]; bounds are the caller's concern.
fn column_index(letters: &str) -> Option<i32> {
    if letters.is_empty() {
        return None;
    }
    let mut col: i32 = 0;
    for b in letters.bytes() {
        if !b.is_ascii_uppercase() {
            return None;
        }
        let v = (b - b'A') as i32 + 1;
        col = col.checked_mul(LETTERS)?.checked_add(v)?;
    }
    Some(col - 1)
}

/// Dimensions of the printable region of a sheet.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Size {
    pub rows: i32,
    pub cols: i32,
}

impl Size {
    /// Construct a new [`Size`].
    #[inline]
    pub const fn new(rows: i32, cols: i32) -> Self {
        Self { rows, cols }
    }
}

const COL_BITS: u32 = 14; // 2^14 = 16,384 columns.
const COL_MASK: u64 = (1u64 << COL_BITS) - 1;

/// Compact key used for sparse cell storage.
///
/// The key packs a valid `(row, col)` pair into a `u64`:
///
/// ```text
/// key = (row << 14) | col
/// ```
///
/// Only valid positions are representable, so a `CellKey` always round-trips
/// through [`CellKey::to_position`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct CellKey(u64);

impl CellKey {
    /// Encode a position into a key, or `None` if the position is invalid.
    #[inline]
    pub fn try_from_position(pos: Position) -> Option<Self> {
        if pos.is_valid() {
            Some(Self(((pos.row as u64) << COL_BITS) | pos.col as u64))
        } else {
            None
        }
    }

    /// Decode the row component (0-indexed).
    #[inline]
    pub const fn row(self) -> i32 {
        (self.0 >> COL_BITS) as i32
    }

    /// Decode the column component (0-indexed).
    #[inline]
    pub const fn col(self) -> i32 {
        (self.0 & COL_MASK) as i32
    }

    /// Convert back to a [`Position`].
    #[inline]
    pub const fn to_position(self) -> Position {
        Position::new(self.row(), self.col())
    }

    /// Raw packed value.
    #[inline]
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}
