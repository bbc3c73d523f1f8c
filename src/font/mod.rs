//! Glyphs and symbols.
//!
//! The layout engine never synthesizes a glyph itself: it asks a [`SymbolTable`] to resolve a
//! token into a [`SymbolDef`], to rasterize that symbol at a given size, and to produce delimiters
//! of at least a given height. [`BuiltinFont`] is a self-contained implementation drawing from a
//! small bitmap font and from the vector primitives in [`crate::raster::draw`].

pub mod builtin;
pub mod delim;
pub mod symbols;

pub use builtin::BuiltinFont;
pub use symbols::Symbol;

use crate::raster::Subraster;

/// Category of a symbol, deciding spacing and script placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AtomType {
    /// letters
    Alpha,
    /// digits and other ordinary symbols
    Ordinary,
    /// binary operators, e.g. `+`
    Binary,
    /// relations, e.g. `=`
    Relation,
    /// opening delimiters
    Open,
    /// closing delimiters
    Close,
    /// punctuation, e.g. `,`
    Punctuation,
    /// delimiters which are both opening and closing, e.g. `|`
    Fence,
    /// large operators; `true` if they take limits above and below in display style
    Operator(bool),
    /// a delimited subformula
    Inner,
    /// takes the type of what surrounds it
    Transparent,
}

/// Font family in effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Family {
    /// math italic, the default for letters
    Math,
    /// upright
    Roman,
    /// bold
    Bold,
    /// calligraphic
    Calligraphic,
    /// blackboard bold
    Blackboard,
}

impl Default for Family {
    fn default() -> Self {
        Family::Math
    }
}

/// A resolved symbol: what to draw and how it behaves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SymbolDef {
    /// The Unicode symbol
    pub codepoint: char,
    /// Category of the symbol
    pub atom_type: AtomType,
    /// Family the symbol is drawn in
    pub family:    Family,
}

impl SymbolDef {
    /// Whether the symbol takes limits above and below in display style
    pub fn takes_limits(&self) -> bool {
        self.atom_type == AtomType::Operator(true)
    }
}

/// Everything the layout engine needs to know about glyphs.
pub trait SymbolTable {
    /// Resolves a token, either a single character (`"x"`) or a control sequence (`"\alpha"`).
    fn lookup_symbol(&self, token: &str, family: Family) -> Option<SymbolDef>;
    /// Rasterizes a symbol at a size level (0 to 7).
    fn render_glyph(&self, symbol: &SymbolDef, size: u8) -> Option<Subraster>;
    /// A delimiter (e.g. `"("`, `"\{"`, `"\langle"`) at least `min_height` pixels tall.
    fn sized_delimiter(&self, name: &str, min_height: usize, size: u8) -> Option<Subraster>;
    /// Height in pixels of an ordinary glyph at a size level; every size-dependent
    /// distance of the layout engine is derived from it.
    fn em_height(&self, size: u8) -> usize;
}
