//! A self-contained symbol table backed by a 5x7 bitmap font.
//!
//! Every glyph is stored as five column bytes, bit 0 being the top row and bit 6 the row sitting
//! on the baseline. Glyphs are scaled by nearest neighbour to the height of each size level.
//! Math italic letters are slanted, bold faces are smeared one column to the right, and
//! characters the font does not know are drawn as a hollow box.

use log::trace;

use super::{delim, AtomType, Family, Symbol, SymbolDef, SymbolTable};
use crate::raster::{BoxKind, PixelDepth, Raster, Subraster};

/// Glyph height in pixels of each size level, `\tiny` (0) to `\Huge` (7).
pub const EM_HEIGHTS: [usize; 8] = [7, 9, 11, 14, 17, 21, 25, 30];

const GLYPH_COLUMNS: usize = 5;
const GLYPH_ROWS: usize = 7;

#[cfg_attr(rustfmt, rustfmt_skip)]
const ASCII: [[u8; GLYPH_COLUMNS]; 95] = [
    [0x00, 0x00, 0x00, 0x00, 0x00], // ' '
    [0x00, 0x00, 0x5f, 0x00, 0x00], // !
    [0x00, 0x07, 0x00, 0x07, 0x00], // "
    [0x14, 0x7f, 0x14, 0x7f, 0x14], // #
    [0x24, 0x2a, 0x7f, 0x2a, 0x12], // $
    [0x23, 0x13, 0x08, 0x64, 0x62], // %
    [0x36, 0x49, 0x55, 0x22, 0x50], // &
    [0x00, 0x05, 0x03, 0x00, 0x00], // '
    [0x00, 0x1c, 0x22, 0x41, 0x00], // (
    [0x00, 0x41, 0x22, 0x1c, 0x00], // )
    [0x14, 0x08, 0x3e, 0x08, 0x14], // *
    [0x08, 0x08, 0x3e, 0x08, 0x08], // +
    [0x00, 0x50, 0x30, 0x00, 0x00], // ,
    [0x08, 0x08, 0x08, 0x08, 0x08], // -
    [0x00, 0x60, 0x60, 0x00, 0x00], // .
    [0x20, 0x10, 0x08, 0x04, 0x02], // /
    [0x3e, 0x51, 0x49, 0x45, 0x3e], // 0
    [0x00, 0x42, 0x7f, 0x40, 0x00], // 1
    [0x42, 0x61, 0x51, 0x49, 0x46], // 2
    [0x21, 0x41, 0x45, 0x4b, 0x31], // 3
    [0x18, 0x14, 0x12, 0x7f, 0x10], // 4
    [0x27, 0x45, 0x45, 0x45, 0x39], // 5
    [0x3c, 0x4a, 0x49, 0x49, 0x30], // 6
    [0x01, 0x71, 0x09, 0x05, 0x03], // 7
    [0x36, 0x49, 0x49, 0x49, 0x36], // 8
    [0x06, 0x49, 0x49, 0x29, 0x1e], // 9
    [0x00, 0x36, 0x36, 0x00, 0x00], // :
    [0x00, 0x56, 0x36, 0x00, 0x00], // ;
    [0x08, 0x14, 0x22, 0x41, 0x00], // <
    [0x14, 0x14, 0x14, 0x14, 0x14], // =
    [0x00, 0x41, 0x22, 0x14, 0x08], // >
    [0x02, 0x01, 0x51, 0x09, 0x06], // ?
    [0x32, 0x49, 0x79, 0x41, 0x3e], // @
    [0x7e, 0x11, 0x11, 0x11, 0x7e], // A
    [0x7f, 0x49, 0x49, 0x49, 0x36], // B
    [0x3e, 0x41, 0x41, 0x41, 0x22], // C
    [0x7f, 0x41, 0x41, 0x22, 0x1c], // D
    [0x7f, 0x49, 0x49, 0x49, 0x41], // E
    [0x7f, 0x09, 0x09, 0x09, 0x01], // F
    [0x3e, 0x41, 0x49, 0x49, 0x7a], // G
    [0x7f, 0x08, 0x08, 0x08, 0x7f], // H
    [0x00, 0x41, 0x7f, 0x41, 0x00], // I
    [0x20, 0x40, 0x41, 0x3f, 0x01], // J
    [0x7f, 0x08, 0x14, 0x22, 0x41], // K
    [0x7f, 0x40, 0x40, 0x40, 0x40], // L
    [0x7f, 0x02, 0x0c, 0x02, 0x7f], // M
    [0x7f, 0x04, 0x08, 0x10, 0x7f], // N
    [0x3e, 0x41, 0x41, 0x41, 0x3e], // O
    [0x7f, 0x09, 0x09, 0x09, 0x06], // P
    [0x3e, 0x41, 0x51, 0x21, 0x5e], // Q
    [0x7f, 0x09, 0x19, 0x29, 0x46], // R
    [0x46, 0x49, 0x49, 0x49, 0x31], // S
    [0x01, 0x01, 0x7f, 0x01, 0x01], // T
    [0x3f, 0x40, 0x40, 0x40, 0x3f], // U
    [0x1f, 0x20, 0x40, 0x20, 0x1f], // V
    [0x3f, 0x40, 0x38, 0x40, 0x3f], // W
    [0x63, 0x14, 0x08, 0x14, 0x63], // X
    [0x07, 0x08, 0x70, 0x08, 0x07], // Y
    [0x61, 0x51, 0x49, 0x45, 0x43], // Z
    [0x00, 0x7f, 0x41, 0x41, 0x00], // [
    [0x02, 0x04, 0x08, 0x10, 0x20], // \
    [0x00, 0x41, 0x41, 0x7f, 0x00], // ]
    [0x04, 0x02, 0x01, 0x02, 0x04], // ^
    [0x40, 0x40, 0x40, 0x40, 0x40], // _
    [0x00, 0x01, 0x02, 0x04, 0x00], // `
    [0x20, 0x54, 0x54, 0x54, 0x78], // a
    [0x7f, 0x48, 0x44, 0x44, 0x38], // b
    [0x38, 0x44, 0x44, 0x44, 0x20], // c
    [0x38, 0x44, 0x44, 0x48, 0x7f], // d
    [0x38, 0x54, 0x54, 0x54, 0x18], // e
    [0x08, 0x7e, 0x09, 0x01, 0x02], // f
    [0x0c, 0x52, 0x52, 0x52, 0x3e], // g
    [0x7f, 0x08, 0x04, 0x04, 0x78], // h
    [0x00, 0x44, 0x7d, 0x40, 0x00], // i
    [0x20, 0x40, 0x44, 0x3d, 0x00], // j
    [0x7f, 0x10, 0x28, 0x44, 0x00], // k
    [0x00, 0x41, 0x7f, 0x40, 0x00], // l
    [0x7c, 0x04, 0x18, 0x04, 0x78], // m
    [0x7c, 0x08, 0x04, 0x04, 0x78], // n
    [0x38, 0x44, 0x44, 0x44, 0x38], // o
    [0x7c, 0x14, 0x14, 0x14, 0x08], // p
    [0x08, 0x14, 0x14, 0x18, 0x7c], // q
    [0x7c, 0x08, 0x04, 0x04, 0x08], // r
    [0x48, 0x54, 0x54, 0x54, 0x20], // s
    [0x04, 0x3f, 0x44, 0x40, 0x20], // t
    [0x3c, 0x40, 0x40, 0x20, 0x7c], // u
    [0x1c, 0x20, 0x40, 0x20, 0x1c], // v
    [0x3c, 0x40, 0x30, 0x40, 0x3c], // w
    [0x44, 0x28, 0x10, 0x28, 0x44], // x
    [0x0c, 0x50, 0x50, 0x50, 0x3c], // y
    [0x44, 0x64, 0x54, 0x4c, 0x44], // z
    [0x00, 0x08, 0x36, 0x41, 0x00], // {
    [0x00, 0x00, 0x7f, 0x00, 0x00], // |
    [0x00, 0x41, 0x36, 0x08, 0x00], // }
    [0x10, 0x08, 0x08, 0x10, 0x08], // ~
];

#[cfg_attr(rustfmt, rustfmt_skip)]
fn math_columns(codepoint: char) -> Option<[u8; GLYPH_COLUMNS]> {
    let columns = match codepoint {
        '\u{3B1}' => [0x38, 0x44, 0x44, 0x38, 0x44], // alpha
        '\u{3B2}' => [0x7e, 0x49, 0x49, 0x4e, 0x30], // beta
        '\u{3B3}' => [0x0c, 0x10, 0x60, 0x10, 0x0c], // gamma
        '\u{3B4}' => [0x30, 0x4a, 0x4d, 0x49, 0x30], // delta
        '\u{3F5}' | '\u{3B5}' => [0x38, 0x54, 0x54, 0x44, 0x00], // epsilon
        '\u{3B6}' => [0x01, 0x41, 0x5d, 0x63, 0x41], // zeta
        '\u{3B7}' => [0x7c, 0x08, 0x04, 0x04, 0x78], // eta
        '\u{3B8}' | '\u{3D1}' | '\u{398}' => [0x3e, 0x49, 0x49, 0x49, 0x3e], // theta
        '\u{3B9}' => [0x00, 0x3c, 0x40, 0x20, 0x00], // iota
        '\u{3BA}' => [0x7c, 0x10, 0x28, 0x44, 0x00], // kappa
        '\u{3BB}' => [0x40, 0x21, 0x16, 0x18, 0x60], // lambda
        '\u{3BC}' => [0x7e, 0x20, 0x20, 0x10, 0x3e], // mu
        '\u{3BD}' => [0x1c, 0x20, 0x40, 0x20, 0x1c], // nu
        '\u{3BE}' => [0x01, 0x49, 0x55, 0x63, 0x41], // xi
        '\u{3C0}' | '\u{3D6}' => [0x04, 0x7c, 0x04, 0x7c, 0x04], // pi
        '\u{3C1}' | '\u{3F1}' => [0x7c, 0x12, 0x12, 0x12, 0x0c], // rho
        '\u{3C3}' | '\u{3C2}' => [0x38, 0x44, 0x44, 0x3c, 0x04], // sigma
        '\u{3C4}' => [0x04, 0x3c, 0x44, 0x04, 0x00], // tau
        '\u{3C5}' => [0x3c, 0x40, 0x40, 0x20, 0x1c], // upsilon
        '\u{3D5}' | '\u{3C6}' => [0x18, 0x24, 0x7e, 0x24, 0x18], // phi
        '\u{3C7}' => [0x44, 0x28, 0x10, 0x28, 0x44], // chi
        '\u{3C8}' => [0x0c, 0x10, 0x7c, 0x10, 0x0c], // psi
        '\u{3C9}' => [0x3c, 0x40, 0x30, 0x40, 0x3c], // omega
        '\u{393}' => [0x7f, 0x01, 0x01, 0x01, 0x03], // Gamma
        '\u{394}' => [0x70, 0x4c, 0x43, 0x4c, 0x70], // Delta
        '\u{39B}' => [0x70, 0x0c, 0x03, 0x0c, 0x70], // Lambda
        '\u{39E}' => [0x41, 0x49, 0x49, 0x49, 0x41], // Xi
        '\u{3A0}' => [0x7f, 0x01, 0x01, 0x01, 0x7f], // Pi
        '\u{3A3}' => [0x63, 0x55, 0x49, 0x41, 0x41], // Sigma
        '\u{3A5}' => [0x07, 0x08, 0x70, 0x08, 0x07], // Upsilon
        '\u{3A6}' => [0x1c, 0x22, 0x7f, 0x22, 0x1c], // Phi
        '\u{3A8}' => [0x0f, 0x10, 0x7f, 0x10, 0x0f], // Psi
        '\u{3A9}' => [0x5e, 0x61, 0x01, 0x61, 0x5e], // Omega

        '\u{2211}' => [0x63, 0x55, 0x49, 0x41, 0x41], // sum
        '\u{220F}' => [0x7f, 0x01, 0x01, 0x01, 0x7f], // prod
        '\u{2210}' => [0x7f, 0x40, 0x40, 0x40, 0x7f], // coprod
        '\u{22C3}' => [0x1f, 0x20, 0x40, 0x20, 0x1f], // bigcup
        '\u{22C2}' => [0x7c, 0x02, 0x01, 0x02, 0x7c], // bigcap
        '\u{222B}' | '\u{222C}' | '\u{222E}' => [0x40, 0x40, 0x3e, 0x01, 0x01], // integrals

        '\u{B1}'   => [0x44, 0x44, 0x5f, 0x44, 0x44], // pm
        '\u{2213}' => [0x41, 0x41, 0x5f, 0x41, 0x41], // mp
        '\u{D7}'   => [0x22, 0x14, 0x08, 0x14, 0x22], // times
        '\u{F7}'   => [0x08, 0x08, 0x2a, 0x08, 0x08], // div
        '\u{22C5}' => [0x00, 0x00, 0x08, 0x00, 0x00], // cdot
        '\u{2217}' | '\u{22C6}' => [0x14, 0x08, 0x3e, 0x08, 0x14], // ast
        '\u{2218}' => [0x00, 0x1c, 0x14, 0x1c, 0x00], // circ
        '\u{2219}' => [0x00, 0x1c, 0x1c, 0x1c, 0x00], // bullet
        '\u{2212}' => [0x08, 0x08, 0x08, 0x08, 0x08], // minus
        '\u{222A}' => [0x1e, 0x20, 0x20, 0x20, 0x1e], // cup
        '\u{2229}' => [0x3c, 0x02, 0x02, 0x02, 0x3c], // cap
        '\u{2228}' => [0x06, 0x18, 0x60, 0x18, 0x06], // vee
        '\u{2227}' => [0x60, 0x18, 0x06, 0x18, 0x60], // wedge
        '\u{2295}' | '\u{2A01}' => [0x3e, 0x49, 0x7f, 0x49, 0x3e], // oplus
        '\u{2296}' => [0x3e, 0x49, 0x49, 0x49, 0x3e], // ominus
        '\u{2297}' | '\u{2A02}' => [0x3e, 0x55, 0x49, 0x55, 0x3e], // otimes
        '\u{2216}' => [0x02, 0x04, 0x08, 0x10, 0x20], // setminus

        '\u{2264}' => [0x40, 0x44, 0x4a, 0x51, 0x40], // leq
        '\u{2265}' => [0x40, 0x51, 0x4a, 0x44, 0x40], // geq
        '\u{2260}' => [0x54, 0x34, 0x1c, 0x16, 0x15], // neq
        '\u{2261}' => [0x2a, 0x2a, 0x2a, 0x2a, 0x2a], // equiv
        '\u{2248}' | '\u{2245}' | '\u{2243}' => [0x24, 0x12, 0x24, 0x48, 0x24], // approx
        '\u{223C}' => [0x10, 0x08, 0x08, 0x10, 0x08], // sim
        '\u{221D}' => [0x1c, 0x22, 0x14, 0x22, 0x22], // propto
        '\u{226A}' => [0x08, 0x14, 0x2a, 0x55, 0x22], // ll
        '\u{226B}' => [0x22, 0x55, 0x2a, 0x14, 0x08], // gg
        '\u{2208}' => [0x1c, 0x2a, 0x49, 0x49, 0x41], // in
        '\u{2209}' => [0x5c, 0x3a, 0x49, 0x4d, 0x43], // notin
        '\u{220B}' => [0x41, 0x49, 0x49, 0x2a, 0x1c], // ni
        '\u{2282}' => [0x1c, 0x22, 0x22, 0x22, 0x22], // subset
        '\u{2283}' => [0x22, 0x22, 0x22, 0x22, 0x1c], // supset
        '\u{2286}' => [0x4c, 0x52, 0x52, 0x52, 0x52], // subseteq
        '\u{2287}' => [0x52, 0x52, 0x52, 0x52, 0x4c], // supseteq
        '\u{22A5}' => [0x40, 0x40, 0x7f, 0x40, 0x40], // perp
        '\u{22A4}' => [0x01, 0x01, 0x7f, 0x01, 0x01], // top
        '\u{2225}' | '\u{2016}' => [0x00, 0x7f, 0x00, 0x7f, 0x00], // parallel
        '\u{2223}' => [0x00, 0x00, 0x7f, 0x00, 0x00], // mid

        '\u{2192}' => [0x08, 0x08, 0x2a, 0x1c, 0x08], // rightarrow
        '\u{2190}' => [0x08, 0x1c, 0x2a, 0x08, 0x08], // leftarrow
        '\u{2194}' => [0x08, 0x1c, 0x08, 0x1c, 0x08], // leftrightarrow
        '\u{21D2}' => [0x14, 0x14, 0x55, 0x36, 0x14], // Rightarrow
        '\u{21D0}' => [0x14, 0x36, 0x55, 0x14, 0x14], // Leftarrow
        '\u{21D4}' => [0x14, 0x36, 0x14, 0x36, 0x14], // Leftrightarrow
        '\u{21A6}' => [0x1c, 0x08, 0x2a, 0x1c, 0x08], // mapsto
        '\u{2191}' => [0x04, 0x02, 0x7f, 0x02, 0x04], // uparrow
        '\u{2193}' => [0x10, 0x20, 0x7f, 0x20, 0x10], // downarrow

        '\u{27E8}' => [0x08, 0x14, 0x22, 0x41, 0x00], // langle
        '\u{27E9}' => [0x00, 0x41, 0x22, 0x14, 0x08], // rangle
        '\u{230A}' => [0x00, 0x7f, 0x40, 0x40, 0x00], // lfloor
        '\u{230B}' => [0x00, 0x40, 0x40, 0x7f, 0x00], // rfloor
        '\u{2308}' => [0x00, 0x7f, 0x01, 0x01, 0x00], // lceil
        '\u{2309}' => [0x00, 0x01, 0x01, 0x7f, 0x00], // rceil

        '\u{221E}' => [0x18, 0x24, 0x18, 0x24, 0x18], // infty
        '\u{2202}' => [0x30, 0x49, 0x49, 0x4a, 0x3c], // partial
        '\u{2207}' => [0x07, 0x19, 0x61, 0x19, 0x07], // nabla
        '\u{2200}' => [0x03, 0x1c, 0x64, 0x1c, 0x03], // forall
        '\u{2203}' => [0x41, 0x49, 0x49, 0x49, 0x7f], // exists
        '\u{AC}'   => [0x04, 0x04, 0x04, 0x04, 0x0c], // neg
        '\u{2205}' => [0x5e, 0x31, 0x29, 0x25, 0x1e], // emptyset
        '\u{2220}' => [0x60, 0x50, 0x48, 0x44, 0x40], // angle
        '\u{2032}' => [0x00, 0x00, 0x07, 0x00, 0x00], // prime
        '\u{210F}' => [0x7f, 0x0a, 0x06, 0x04, 0x78], // hbar
        '\u{2113}' => [0x30, 0x48, 0x3e, 0x01, 0x00], // ell
        '\u{2135}' => [0x41, 0x26, 0x1c, 0x32, 0x41], // aleph
        '\u{211C}' => [0x7f, 0x09, 0x19, 0x29, 0x46], // Re
        '\u{2111}' => [0x00, 0x41, 0x7f, 0x41, 0x00], // Im
        '\u{2026}' => [0x40, 0x00, 0x40, 0x00, 0x40], // ldots
        '\u{22EF}' => [0x08, 0x00, 0x08, 0x00, 0x08], // cdots
        '\u{22EE}' => [0x00, 0x00, 0x49, 0x00, 0x00], // vdots
        '\u{22F1}' => [0x01, 0x00, 0x08, 0x00, 0x40], // ddots
        '\u{B0}'   => [0x00, 0x06, 0x09, 0x06, 0x00], // degree
        _ => return None,
    };
    Some(columns)
}

fn columns(codepoint: char) -> Option<[u8; GLYPH_COLUMNS]> {
    match codepoint {
        ' ' ..= '~' => Some(ASCII[codepoint as usize - ' ' as usize]),
        c => math_columns(c).or_else(|| lookalike(c).and_then(columns)),
    }
}

/// Characters drawn with the glyph of another one.
fn lookalike(codepoint: char) -> Option<char> {
    let similar = match codepoint {
        '\u{391}' => 'A', '\u{392}' => 'B', '\u{395}' => 'E', '\u{396}' => 'Z',
        '\u{397}' => 'H', '\u{399}' => 'I', '\u{39A}' => 'K', '\u{39C}' => 'M',
        '\u{39D}' => 'N', '\u{39F}' => 'O', '\u{3A1}' => 'P', '\u{3A4}' => 'T',
        '\u{3A7}' => 'X', '\u{3BF}' => 'o',
        '\u{2018}' | '\u{2019}' => '\'',
        '\u{201C}' | '\u{201D}' => '"',
        '\u{2013}' | '\u{2014}' => '-',
        _ => return None,
    };
    Some(similar)
}

/// The bitmap symbol table.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinFont {
    depth: PixelDepth,
}

impl BuiltinFont {
    /// A font producing monochrome glyphs.
    pub fn new() -> Self {
        Self::default()
    }

    /// A font producing glyphs of the given depth.
    pub fn with_depth(depth: PixelDepth) -> Self {
        Self { depth }
    }

    fn glyph_width(em: usize) -> usize {
        ((GLYPH_COLUMNS * em + GLYPH_ROWS / 2) / GLYPH_ROWS).max(1)
    }

    fn glyph_gap(em: usize) -> usize {
        (em / 7).max(1)
    }

    /// Scales a 5x7 bitmap to `em` rows, slanting and emboldening as asked.
    fn scale(&self, columns: [u8; GLYPH_COLUMNS], em: usize, slant: usize, bold: bool) -> Option<Raster> {
        let width = Self::glyph_width(em);
        let gap   = Self::glyph_gap(em);
        let total = width + slant + gap + bold as usize;
        let mut raster = Raster::new(total, em, self.depth).ok()?;

        for row in 0 .. em {
            let source_row = row * GLYPH_ROWS / em;
            let shift = if em > 1 { slant * (em - 1 - row) / (em - 1) } else { 0 };
            for col in 0 .. width {
                let source_col = col * GLYPH_COLUMNS / width;
                if (columns[source_col] >> source_row) & 1 == 0 {
                    continue;
                }
                let col = (col + shift) as isize;
                raster.ink(row as isize, col).ok()?;
                if bold {
                    raster.ink(row as isize, col + 1).ok()?;
                }
            }
        }
        Some(raster)
    }

    /// Hollow box standing in for glyphs the font lacks.
    fn tofu(&self, em: usize) -> Option<Raster> {
        let width = Self::glyph_width(em);
        let mut raster = Raster::new(width + Self::glyph_gap(em), em, self.depth).ok()?;
        let top = em * 2 / 7;
        for row in top .. em {
            for col in 0 .. width {
                if row == top || row == em - 1 || col == 0 || col == width - 1 {
                    raster.ink(row as isize, col as isize).ok()?;
                }
            }
        }
        Some(raster)
    }
}

impl SymbolTable for BuiltinFont {
    fn lookup_symbol(&self, token: &str, family: Family) -> Option<SymbolDef> {
        let symbol = match token.strip_prefix('\\') {
            Some(name) => Symbol::from_name(name)?,
            None => {
                let mut chars = token.chars();
                let c = chars.next()?;
                if chars.next().is_some() {
                    return None;
                }
                Symbol::from_char(c)
            }
        };
        Some(SymbolDef {
            codepoint: symbol.codepoint,
            atom_type: symbol.atom_type,
            family,
        })
    }

    fn render_glyph(&self, symbol: &SymbolDef, size: u8) -> Option<Subraster> {
        let em = self.em_height(size);
        let letter = symbol.atom_type == AtomType::Alpha;
        let slant = match symbol.family {
            Family::Math | Family::Calligraphic if letter => em / 7,
            _ => 0,
        };
        let bold = matches!(symbol.family, Family::Bold | Family::Blackboard | Family::Calligraphic);

        let raster = match columns(symbol.codepoint) {
            Some(columns) => self.scale(columns, em, slant, bold)?,
            None => {
                trace!("no bitmap for {:?}, drawing a box", symbol.codepoint);
                self.tofu(em)?
            }
        };
        let mut glyph = Subraster::new(raster, em - 1, size, BoxKind::Glyph);
        glyph.symbol = Some(*symbol);
        Some(glyph)
    }

    fn sized_delimiter(&self, name: &str, min_height: usize, size: u8) -> Option<Subraster> {
        let shape = delim::DelimShape::from_name(name)?;
        let em = self.em_height(size);
        if min_height <= em {
            if let Some(symbol) = shape.codepoint().and_then(|c| self.lookup_symbol(&c.to_string(), Family::Roman)) {
                if columns(symbol.codepoint).is_some() {
                    return self.render_glyph(&symbol, size);
                }
            }
        }
        let raster = delim::make_delim(shape, min_height.max(em), self.depth).ok()?;
        let height = raster.height();
        Some(Subraster::new(raster, height - 1, size, BoxKind::Glyph))
    }

    fn em_height(&self, size: u8) -> usize {
        EM_HEIGHTS[(size as usize).min(EM_HEIGHTS.len() - 1)]
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    fn glyph(token: &str, family: Family, size: u8) -> Subraster {
        let font = BuiltinFont::new();
        let symbol = font.lookup_symbol(token, family).unwrap();
        font.render_glyph(&symbol, size).unwrap()
    }

    #[test]
    fn unscaled_glyph_matches_bitmap() {
        let a = glyph("A", Family::Roman, 0);
        assert_eq!(a.height(), 7);
        assert_eq!(a.baseline, 6);
        assert_eq!(a.kind, BoxKind::Glyph);
        assert_eq!(
            a.raster.to_string(),
            ".***..\n\
             *...*.\n\
             *...*.\n\
             *...*.\n\
             *****.\n\
             *...*.\n\
             *...*.\n"
        );
    }

    #[test]
    fn sizes_grow() {
        let widths: Vec<usize> = (0 .. 8).map(|size| glyph("x", Family::Roman, size).width()).collect();
        assert!(widths.windows(2).all(|w| w[0] <= w[1]), "{:?}", widths);
        assert_eq!(glyph("x", Family::Roman, 3).height(), 14);
    }

    #[test]
    fn math_letters_slant_and_bold_smears() {
        let upright = glyph("x", Family::Roman, 3);
        let italic  = glyph("x", Family::Math, 3);
        let bold    = glyph("x", Family::Bold, 3);
        assert_eq!(italic.width(), upright.width() + 2);
        assert_eq!(bold.width(), upright.width() + 1);
        // digits are never slanted
        assert_eq!(glyph("1", Family::Math, 3).width(), upright.width());
    }

    #[test]
    fn unknown_glyph_is_a_box() {
        let font = BuiltinFont::new();
        let symbol = SymbolDef { codepoint: '\u{4E00}', atom_type: AtomType::Ordinary, family: Family::Roman };
        let tofu = font.render_glyph(&symbol, 3).unwrap();
        assert!(!tofu.raster.is_blank());
        assert!(!tofu.raster.is_set(8, 4));
        assert!(tofu.raster.is_set(13, 0));
    }

    #[test]
    fn named_and_escaped_tokens() {
        let font = BuiltinFont::new();
        assert_eq!(font.lookup_symbol(r"\alpha", Family::Math).unwrap().codepoint, '\u{3B1}');
        assert_eq!(font.lookup_symbol(r"\{", Family::Math).unwrap().atom_type, AtomType::Open);
        assert_eq!(font.lookup_symbol(r"\frac", Family::Math), None);
        assert_eq!(font.lookup_symbol("ab", Family::Math), None);
    }

    #[test]
    fn tall_delimiters_are_drawn() {
        let font = BuiltinFont::new();
        let small = font.sized_delimiter("(", 10, 3).unwrap();
        assert_eq!(small.height(), 14);
        let tall = font.sized_delimiter("(", 40, 3).unwrap();
        assert_eq!(tall.height(), 40);
        assert!(font.sized_delimiter(r"\foo", 40, 3).is_none());
    }
}
