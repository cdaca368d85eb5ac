//! The dihedral group of the square.

use std::fmt;

/// One of the eight symmetries of an `n x n` board.
///
/// Each variant is described by where output cell `(row, col)` reads
/// from in the input; see [`source_cell`](Symmetry::source_cell).
/// Discriminants are the stable integer tags used in logs and
/// configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum Symmetry {
    /// Leaves the board unchanged.
    Identity = 0,
    /// Transpose, then flip rows (quarter turn).
    Rotate90 = 1,
    /// Flip both axes (half turn).
    Rotate180 = 2,
    /// Transpose, then flip columns (three-quarter turn).
    Rotate270 = 3,
    /// Mirror in the main diagonal.
    Transpose = 4,
    /// Left-right mirror.
    FlipCols = 5,
    /// Transpose, then flip both axes (mirror in the anti-diagonal).
    AntiTranspose = 6,
    /// Top-bottom mirror.
    FlipRows = 7,
}

impl Symmetry {
    /// All eight elements, in tag order.
    pub const ALL: [Symmetry; 8] = [
        Symmetry::Identity,
        Symmetry::Rotate90,
        Symmetry::Rotate180,
        Symmetry::Rotate270,
        Symmetry::Transpose,
        Symmetry::FlipCols,
        Symmetry::AntiTranspose,
        Symmetry::FlipRows,
    ];

    /// The subset drawn from for training augmentation.
    ///
    /// Only these four keep the feature encoding's left/right semantics
    /// intact. The side-swap rule of [`swaps_sides`](Self::swaps_sides)
    /// is defined for this subset only.
    pub const AUGMENTATIONS: [Symmetry; 4] = [
        Symmetry::Identity,
        Symmetry::FlipCols,
        Symmetry::FlipRows,
        Symmetry::Rotate180,
    ];

    /// Look up a symmetry by tag.
    pub fn from_tag(tag: u8) -> Option<Symmetry> {
        Self::ALL.get(usize::from(tag)).copied()
    }

    /// The integer tag, 0 through 7.
    pub fn tag(self) -> u8 {
        self as u8
    }

    /// The element undoing `self`.
    pub fn inverse(self) -> Symmetry {
        match self {
            Symmetry::Rotate90 => Symmetry::Rotate270,
            Symmetry::Rotate270 => Symmetry::Rotate90,
            other => other,
        }
    }

    /// Whether the near and far sides of the board trade places.
    ///
    /// When true, own/opponent feature planes must be exchanged and the
    /// side-to-move indicator complemented alongside the geometric
    /// transform.
    pub fn swaps_sides(self) -> bool {
        matches!(self, Symmetry::Rotate180 | Symmetry::FlipRows)
    }

    /// Input cell that output cell `(row, col)` of an `n x n` board
    /// reads from.
    ///
    /// # Examples
    ///
    /// ```
    /// use tessel_symmetry::Symmetry;
    ///
    /// assert_eq!(Symmetry::FlipCols.source_cell(0, 0, 3), (0, 2));
    /// assert_eq!(Symmetry::Rotate90.source_cell(0, 0, 3), (0, 2));
    /// assert_eq!(Symmetry::Rotate90.source_cell(0, 2, 3), (2, 2));
    /// ```
    #[inline]
    pub fn source_cell(self, row: usize, col: usize, n: usize) -> (usize, usize) {
        let (fr, fc) = (n - 1 - row, n - 1 - col);
        match self {
            Symmetry::Identity => (row, col),
            Symmetry::Rotate90 => (col, fr),
            Symmetry::Rotate180 => (fr, fc),
            Symmetry::Rotate270 => (fc, row),
            Symmetry::Transpose => (col, row),
            Symmetry::FlipCols => (row, fc),
            Symmetry::AntiTranspose => (fc, fr),
            Symmetry::FlipRows => (fr, col),
        }
    }

    /// Flat source index for every flat output index of an `n x n` plane.
    pub fn permutation(self, n: usize) -> Vec<usize> {
        let mut perm = Vec::with_capacity(n * n);
        for row in 0..n {
            for col in 0..n {
                let (r, c) = self.source_cell(row, col, n);
                perm.push(r * n + c);
            }
        }
        perm
    }
}

impl fmt::Display for Symmetry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tag())
    }
}
