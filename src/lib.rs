/*! # Rendering LaTeX-style math directly into pixel rasters.

This crate takes a formula written in TeX syntax (e.g. `\cos\frac{\pi}{4}`) and compiles it into
a [`Subraster`]: a bitmap of the typeset formula together with the row of its baseline.
There is no intermediate layout tree: every construct is rendered into pixels as soon as it is
read, and composed with its neighbours by copying pixels around.

## Basic usage

```
let formula = rastex::render(r"e = \lim_{n \to \infty} \left(1 + \frac{1}{n}\right)^n").expect("Allocation failed");
println!("{}x{} pixels, baseline on row {}", formula.width(), formula.height(), formula.baseline);
// ASCII dump of the pixels
println!("{}", formula.raster);
```

An expression may start with a preamble giving its size (0 to 7, or relative with `+`/`-`),
optionally forcing display (`D`) or text (`T`) style: `5,D$\sum_{i=1}^n i`.

Malformed input is not an error: unknown commands and missing operands are replaced by a visible
`[?]` so that the rest of the formula still renders. So is a term too large for the pixel budget.
[`render`] only fails when there is nothing to render at all, or when not even the `[?]` fits in
the budget. With strict drawing, a clipped drawing primitive is an error as well.

## More control

[`render_with`] takes the glyph source and the [`RenderSettings`](crate::layout::RenderSettings):

```
use rastex::font::BuiltinFont;
use rastex::layout::RenderSettings;
use rastex::raster::PixelDepth;

let settings = RenderSettings::new()
    .with_size(5)
    .with_display()
    .with_pixel_depth(PixelDepth::Eight);
let formula = rastex::render_with(r"\sqrt{x^2+y^2}", &BuiltinFont::new(), settings).unwrap();
assert_eq!(formula.raster.depth(), PixelDepth::Eight);
```

The glyphs come from a [`SymbolTable`](crate::font::SymbolTable). [`BuiltinFont`](crate::font::BuiltinFont)
is a small self-contained bitmap font; any other glyph source can be plugged in by implementing the trait.

## Exporting

[`Subraster::into_export`](crate::raster::Subraster::into_export) pads a box with a margin (and
byte-aligns the rows of 1-bit rasters), and [`Raster::color_index`](crate::raster::Raster::color_index)
gives the color of every pixel to an image encoder.
Alternatively, a [`Renderer`](crate::render::Renderer) draws the box onto a graphical backend;
the features `tinyskia-renderer` and `raqote-renderer` provide backends for
[tiny-skia](https://docs.rs/tiny-skia) and [raqote](https://docs.rs/raqote).
*/

#[macro_use]
extern crate serde_derive;

#[macro_use]
extern crate log;

#[deny(missing_docs)]
pub mod error;
#[warn(missing_docs)]
pub mod raster;
#[warn(missing_docs)]
pub mod parser;
pub mod font;
#[warn(missing_docs)]
pub mod layout;
pub mod render;

pub use error::Error;
pub use raster::Subraster;

use font::{BuiltinFont, SymbolTable};
use layout::{RenderContext, RenderSettings};

/// Renders `expression` with the builtin font and default settings.
pub fn render(expression: &str) -> Result<Subraster, Error> {
    render_with(expression, &BuiltinFont::new(), RenderSettings::default())
}

/// Renders `expression` with the glyphs of `symbols`.
///
/// Expressions longer than [`RenderSettings::max_expression_len`] bytes are truncated.
pub fn render_with<S: SymbolTable + ?Sized>(expression: &str, symbols: &S, settings: RenderSettings) -> Result<Subraster, Error> {
    let mut expression = expression;
    let max_len = settings.max_expression_len;
    if expression.len() > max_len {
        let mut end = max_len;
        while !expression.is_char_boundary(end) {
            end -= 1;
        }
        warn!("expression of {} bytes truncated to {}", expression.len(), end);
        expression = &expression[.. end];
    }

    let mut ctx = RenderContext::new(symbols, settings);
    let size = ctx.size;
    match layout::rasterize(expression, size, &mut ctx)? {
        Some(boxed) => Ok(boxed),
        None => Err(Error::EmptyExpression),
    }
}
