//! Mathematical symbols from TeX commands.

use super::AtomType;

/// A LaTeX symbol is simply a Unicode symbol and a certain category
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Symbol {
    /// The Unicode symbol
    pub codepoint: char,
    /// Category of the symbol (e.g. open delimiters, alphanumeric, etc.)
    pub atom_type: AtomType,
}

impl Symbol {
    /// Given a LaTeX name without its backslash (e.g. "alpha"), returns the corresponding symbol
    pub fn from_name(name: &str) -> Option<Self> {
        named(name).map(|(codepoint, atom_type)| Symbol { codepoint, atom_type })
    }

    /// Category of a character typed directly in an expression.
    pub fn from_char(codepoint: char) -> Self {
        let atom_type = match codepoint {
            'a' ..= 'z' | 'A' ..= 'Z' => AtomType::Alpha,
            '+' | '-' | '*'           => AtomType::Binary,
            '=' | '<' | '>' | ':'     => AtomType::Relation,
            ',' | ';'                 => AtomType::Punctuation,
            '(' | '['                 => AtomType::Open,
            ')' | ']'                 => AtomType::Close,
            '|'                       => AtomType::Fence,
            _                         => AtomType::Ordinary,
        };
        let codepoint = match codepoint {
            '-'  => '\u{2212}',
            '*'  => '\u{2217}',
            '\'' => '\u{2032}',
            c    => c,
        };
        Symbol { codepoint, atom_type }
    }

    const NULL_DELIMITER : char = '.';

    /// Checks if symbol is an open delimiter
    pub fn is_open_delimiter(&self) -> bool {
        self.atom_type == AtomType::Open || self.atom_type == AtomType::Fence || self.codepoint == Self::NULL_DELIMITER
    }

    /// Checks if symbol is a closing delimiter
    pub fn is_close_delimiter(&self) -> bool {
        self.atom_type == AtomType::Close || self.atom_type == AtomType::Fence || self.codepoint == Self::NULL_DELIMITER
    }
}

#[cfg_attr(rustfmt, rustfmt_skip)]
fn named(name: &str) -> Option<(char, AtomType)> {
    use AtomType::*;
    let sym = match name {
        // Greek
        "alpha"      => ('\u{3B1}', Alpha),
        "beta"       => ('\u{3B2}', Alpha),
        "gamma"      => ('\u{3B3}', Alpha),
        "delta"      => ('\u{3B4}', Alpha),
        "epsilon"    => ('\u{3F5}', Alpha),
        "varepsilon" => ('\u{3B5}', Alpha),
        "zeta"       => ('\u{3B6}', Alpha),
        "eta"        => ('\u{3B7}', Alpha),
        "theta"      => ('\u{3B8}', Alpha),
        "vartheta"   => ('\u{3D1}', Alpha),
        "iota"       => ('\u{3B9}', Alpha),
        "kappa"      => ('\u{3BA}', Alpha),
        "lambda"     => ('\u{3BB}', Alpha),
        "mu"         => ('\u{3BC}', Alpha),
        "nu"         => ('\u{3BD}', Alpha),
        "xi"         => ('\u{3BE}', Alpha),
        "omicron"    => ('\u{3BF}', Alpha),
        "pi"         => ('\u{3C0}', Alpha),
        "varpi"      => ('\u{3D6}', Alpha),
        "rho"        => ('\u{3C1}', Alpha),
        "varrho"     => ('\u{3F1}', Alpha),
        "sigma"      => ('\u{3C3}', Alpha),
        "varsigma"   => ('\u{3C2}', Alpha),
        "tau"        => ('\u{3C4}', Alpha),
        "upsilon"    => ('\u{3C5}', Alpha),
        "phi"        => ('\u{3D5}', Alpha),
        "varphi"     => ('\u{3C6}', Alpha),
        "chi"        => ('\u{3C7}', Alpha),
        "psi"        => ('\u{3C8}', Alpha),
        "omega"      => ('\u{3C9}', Alpha),
        "Gamma"      => ('\u{393}', Alpha),
        "Delta"      => ('\u{394}', Alpha),
        "Theta"      => ('\u{398}', Alpha),
        "Lambda"     => ('\u{39B}', Alpha),
        "Xi"         => ('\u{39E}', Alpha),
        "Pi"         => ('\u{3A0}', Alpha),
        "Sigma"      => ('\u{3A3}', Alpha),
        "Upsilon"    => ('\u{3A5}', Alpha),
        "Phi"        => ('\u{3A6}', Alpha),
        "Psi"        => ('\u{3A8}', Alpha),
        "Omega"      => ('\u{3A9}', Alpha),

        // Large operators
        "sum"        => ('\u{2211}', Operator(true)),
        "prod"       => ('\u{220F}', Operator(true)),
        "coprod"     => ('\u{2210}', Operator(true)),
        "bigcup"     => ('\u{22C3}', Operator(true)),
        "bigcap"     => ('\u{22C2}', Operator(true)),
        "bigoplus"   => ('\u{2A01}', Operator(true)),
        "bigotimes"  => ('\u{2A02}', Operator(true)),
        "int"        => ('\u{222B}', Operator(false)),
        "iint"       => ('\u{222C}', Operator(false)),
        "oint"       => ('\u{222E}', Operator(false)),

        // Binary operators
        "pm"         => ('\u{B1}',   Binary),
        "mp"         => ('\u{2213}', Binary),
        "times"      => ('\u{D7}',   Binary),
        "div"        => ('\u{F7}',   Binary),
        "cdot"       => ('\u{22C5}', Binary),
        "ast"        => ('\u{2217}', Binary),
        "star"       => ('\u{22C6}', Binary),
        "circ"       => ('\u{2218}', Binary),
        "bullet"     => ('\u{2219}', Binary),
        "cup"        => ('\u{222A}', Binary),
        "cap"        => ('\u{2229}', Binary),
        "vee"        => ('\u{2228}', Binary),
        "lor"        => ('\u{2228}', Binary),
        "wedge"      => ('\u{2227}', Binary),
        "land"       => ('\u{2227}', Binary),
        "oplus"      => ('\u{2295}', Binary),
        "ominus"     => ('\u{2296}', Binary),
        "otimes"     => ('\u{2297}', Binary),
        "setminus"   => ('\u{2216}', Binary),

        // Relations
        "leq"        => ('\u{2264}', Relation),
        "le"         => ('\u{2264}', Relation),
        "geq"        => ('\u{2265}', Relation),
        "ge"         => ('\u{2265}', Relation),
        "neq"        => ('\u{2260}', Relation),
        "ne"         => ('\u{2260}', Relation),
        "equiv"      => ('\u{2261}', Relation),
        "approx"     => ('\u{2248}', Relation),
        "sim"        => ('\u{223C}', Relation),
        "simeq"      => ('\u{2243}', Relation),
        "cong"       => ('\u{2245}', Relation),
        "propto"     => ('\u{221D}', Relation),
        "ll"         => ('\u{226A}', Relation),
        "gg"         => ('\u{226B}', Relation),
        "in"         => ('\u{2208}', Relation),
        "notin"      => ('\u{2209}', Relation),
        "ni"         => ('\u{220B}', Relation),
        "subset"     => ('\u{2282}', Relation),
        "supset"     => ('\u{2283}', Relation),
        "subseteq"   => ('\u{2286}', Relation),
        "supseteq"   => ('\u{2287}', Relation),
        "perp"       => ('\u{22A5}', Relation),
        "parallel"   => ('\u{2225}', Relation),
        "mid"        => ('\u{2223}', Relation),
        "to"         => ('\u{2192}', Relation),
        "rightarrow" => ('\u{2192}', Relation),
        "leftarrow"  => ('\u{2190}', Relation),
        "gets"       => ('\u{2190}', Relation),
        "leftrightarrow" => ('\u{2194}', Relation),
        "Rightarrow" => ('\u{21D2}', Relation),
        "Leftarrow"  => ('\u{21D0}', Relation),
        "Leftrightarrow" => ('\u{21D4}', Relation),
        "implies"    => ('\u{21D2}', Relation),
        "iff"        => ('\u{21D4}', Relation),
        "mapsto"     => ('\u{21A6}', Relation),
        "uparrow"    => ('\u{2191}', Relation),
        "downarrow"  => ('\u{2193}', Relation),

        // Delimiters
        "{"          => ('{',        Open),
        "lbrace"     => ('{',        Open),
        "}"          => ('}',        Close),
        "rbrace"     => ('}',        Close),
        "langle"     => ('\u{27E8}', Open),
        "rangle"     => ('\u{27E9}', Close),
        "lfloor"     => ('\u{230A}', Open),
        "rfloor"     => ('\u{230B}', Close),
        "lceil"      => ('\u{2308}', Open),
        "rceil"      => ('\u{2309}', Close),
        "|"          => ('\u{2016}', Fence),
        "Vert"       => ('\u{2016}', Fence),
        "vert"       => ('|',        Fence),
        "backslash"  => ('\\',       Ordinary),

        // Ordinary symbols
        "infty"      => ('\u{221E}', Ordinary),
        "partial"    => ('\u{2202}', Ordinary),
        "nabla"      => ('\u{2207}', Ordinary),
        "forall"     => ('\u{2200}', Ordinary),
        "exists"     => ('\u{2203}', Ordinary),
        "neg"        => ('\u{AC}',   Ordinary),
        "lnot"       => ('\u{AC}',   Ordinary),
        "emptyset"   => ('\u{2205}', Ordinary),
        "varnothing" => ('\u{2205}', Ordinary),
        "angle"      => ('\u{2220}', Ordinary),
        "prime"      => ('\u{2032}', Ordinary),
        "hbar"       => ('\u{210F}', Alpha),
        "ell"        => ('\u{2113}', Alpha),
        "aleph"      => ('\u{2135}', Alpha),
        "Re"         => ('\u{211C}', Ordinary),
        "Im"         => ('\u{2111}', Ordinary),
        "ldots"      => ('\u{2026}', Ordinary),
        "dots"       => ('\u{2026}', Ordinary),
        "cdots"      => ('\u{22EF}', Ordinary),
        "vdots"      => ('\u{22EE}', Ordinary),
        "ddots"      => ('\u{22F1}', Ordinary),
        "top"        => ('\u{22A4}', Ordinary),
        "bot"        => ('\u{22A5}', Ordinary),
        "degree"     => ('\u{B0}',   Ordinary),

        // Escaped characters
        "$"          => ('$', Ordinary),
        "%"          => ('%', Ordinary),
        "&"          => ('&', Ordinary),
        "#"          => ('#', Ordinary),
        "_"          => ('_', Ordinary),

        _ => return None,
    };
    Some(sym)
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn named_symbols() {
        let sum = Symbol::from_name("sum").unwrap();
        assert_eq!(sum.atom_type, AtomType::Operator(true));
        assert!(Symbol::from_name("langle").unwrap().is_open_delimiter());
        assert!(Symbol::from_name("rfloor").unwrap().is_close_delimiter());
        assert_eq!(Symbol::from_name("frac"), None);
    }

    #[test]
    fn typed_characters() {
        assert_eq!(Symbol::from_char('x').atom_type, AtomType::Alpha);
        assert_eq!(Symbol::from_char('-').codepoint, '\u{2212}');
        assert_eq!(Symbol::from_char('=').atom_type, AtomType::Relation);
        assert_eq!(Symbol::from_char('7').atom_type, AtomType::Ordinary);
        assert!(Symbol::from_char('|').is_open_delimiter());
    }
}
