//! Size levels and pixel distances used throughout layout

/// Size level of ordinary text
pub const NORMALSIZE  : u8 = 3;
/// Largest size level
pub const LARGESTSIZE : u8 = 7;

/// Default minimal distance kept between the inks of two smashed boxes
pub const SMASHMARGIN : i32 = 3;

/// Default recursion cap of the compiler
pub const MAX_DEPTH          : usize = 64;
/// Default cap on the length of an expression, in bytes
pub const MAX_EXPRESSION_LEN : usize = 8192;
/// Default cap on the number of pixels of a single raster
pub const MAX_PIXELS         : usize = 1 << 24;
/// Most copies of one element `\multiput` draws
pub const MAX_REPEAT         : usize = 1 << 12;

/// Rendered in place of anything that could not be understood
pub const PLACEHOLDER : &str = "[?]";

/// Blank rows between a script and its base when stacked as limits
pub const LIMITS_GAP  : usize = 1;
/// Blank rows between a superscript and a subscript on the same base
pub const SCRIPT_GAP  : usize = 2;

/// Blank rows between the rule of a fraction and its numerator or denominator
pub const FRACTION_GAP : usize = 1;

/// Blank rows between the top of a radicand and the overbar of its surd
pub const OVERSPACE : usize = 2;

/// Blank rows between the lines of an expression broken with `\\`
pub const LINE_GAP : usize = 2;

/// Extra columns reserved around a vertical rule of an array
pub const VLINE_MARGIN : usize = 2;
/// Extra rows reserved around a horizontal rule of an array
pub const HLINE_MARGIN : usize = 2;
