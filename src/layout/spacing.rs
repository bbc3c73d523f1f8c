//! Spacing between two consecutive atoms, following the inter-atom table of TeX.
//! This is what gives "f(" less room than "f +", and "a = b" more than "a + b".
use crate::font::AtomType;
use super::constants::NORMALSIZE;

/// Row/column of an atom type in [`TABLE`]; `None` for atoms which never get spaced.
fn class(atom: AtomType) -> Option<usize> {
    match atom {
        AtomType::Alpha | AtomType::Ordinary | AtomType::Fence => Some(0),
        AtomType::Operator(_) => Some(1),
        AtomType::Binary      => Some(2),
        AtomType::Relation    => Some(3),
        AtomType::Open        => Some(4),
        AtomType::Close       => Some(5),
        AtomType::Punctuation => Some(6),
        AtomType::Inner       => Some(7),
        AtomType::Transparent => None,
    }
}

// 0: none, 1: thin, 2: medium, 3: thick; negative entries only apply at text sizes.
#[rustfmt::skip]
const TABLE: [[i8; 8]; 8] = [
    //ord  op  bin  rel open close punct inner
    [  0,  1,  -2,  -3,  0,   0,   0,   -1 ], // ord
    [  1,  1,   0,  -3,  0,   0,   0,   -1 ], // op
    [ -2, -2,   0,   0, -2,   0,   0,   -2 ], // bin
    [ -3, -3,   0,   0, -3,   0,   0,   -3 ], // rel
    [  0,  0,   0,   0,  0,   0,   0,    0 ], // open
    [  0,  1,  -2,  -3,  0,   0,   0,   -1 ], // close
    [ -1, -1,   0,  -1, -1,  -1,  -1,   -1 ], // punct
    [ -1,  1,  -2,  -3, -1,   0,  -1,   -1 ], // inner
];

/// Given the type of two subsequent atoms and the current size level,
/// determines how much spacing should occur between the two symbols.
/// Below [`NORMALSIZE`] (scripts) only thin spaces around operators survive.
pub fn atom_space(left: AtomType, right: AtomType, size: u8) -> Spacing {
    let (row, col) = match (class(left), class(right)) {
        (Some(row), Some(col)) => (row, col),
        _ => return Spacing::None,
    };
    let entry = TABLE[row][col];
    if entry < 0 && size < NORMALSIZE {
        return Spacing::None;
    }
    match entry.abs() {
        1 => Spacing::Thin,
        2 => Spacing::Medium,
        3 => Spacing::Thick,
        _ => Spacing::None,
    }
}

/// A binary operator with nothing to operate on to its left (`-x`, `(+1`, `a = -b`) is
/// spaced as an ordinary symbol.
pub fn demote_binary(prev: AtomType, current: AtomType) -> AtomType {
    if current != AtomType::Binary {
        return current;
    }
    match prev {
        AtomType::Transparent | AtomType::Binary | AtomType::Relation |
        AtomType::Open | AtomType::Punctuation | AtomType::Operator(_) => AtomType::Ordinary,
        _ => current,
    }
}

/// Different types of space
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Spacing {
    /// no space
    None,
    /// thin space
    Thin,
    /// medium space
    Medium,
    /// thick space
    Thick,
}

impl Spacing {
    /// Width of the space in pixels, for glyphs `em` pixels high
    pub fn to_pixels(self, em: usize) -> usize {
        match self {
            Spacing::None   => 0,
            Spacing::Thin   => (em / 6).max(1),
            Spacing::Medium => (em * 2 / 9).max(1),
            Spacing::Thick  => (em / 3).max(1),
        }
    }
}
