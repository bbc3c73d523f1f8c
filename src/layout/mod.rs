//! Compiling expressions into [`Subraster`]s.
//!
//! Layout happens in a single recursive pass: [`rasterize`] renders an expression term by term,
//! each command rendering its own arguments through [`rasterize`] again and composing the
//! resulting boxes with the primitives of [`crate::raster`]. All distances are in pixels and derive
//! from the em height the [`SymbolTable`](crate::font::SymbolTable) reports for a size level.
//!
//! The state threaded through the recursion (current size, font family, smash margin, ...) is a
//! [`RenderContext`]; every level of [`rasterize`] restores it on return.

pub mod accents;
pub mod array;
pub mod commands;
pub mod constants;
pub mod context;
pub mod delimiters;
pub mod engine;
pub mod fractions;
pub mod picture;
pub mod scripts;
pub mod spacing;
pub mod transforms;

pub use self::context::{DisplayStyle, PictureOrigin, RenderContext, RenderSettings, Smash};
pub use self::engine::rasterize;

use crate::error::RasterResult;
use crate::raster::Subraster;

/// What every command handler returns: a box, nothing (switches, empty arguments),
/// or an allocation failure.
pub type Rendered = RasterResult<Option<Subraster>>;

/// Rows between the baseline and the math axis, for glyphs `em` rows tall.
pub fn axis_height(em: usize) -> usize {
    em / 2
}

/// Baseline centering a box `height` rows tall on the math axis.
pub fn centered_baseline(height: usize, em: usize) -> usize {
    height.saturating_sub(1) / 2 + axis_height(em)
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_em_box_keeps_its_baseline() {
        // a glyph is em rows tall with its baseline on the last row
        for &em in &[7, 14, 30] {
            let baseline = centered_baseline(em, em);
            assert!(baseline + 1 >= em && baseline <= em, "{} {}", em, baseline);
        }
    }
}
