//! Attaching sub- and superscripts to a base, either beside it or stacked as limits.

use std::cmp::max;

use crate::error::RasterResult;
use crate::font::SymbolTable;
use crate::raster::compose::{blit, concat_horizontal, concat_vertical, StackBaseline};
use crate::raster::{BoxKind, Subraster};
use super::constants::*;
use super::context::RenderContext;

/// Attaches the scripts to `base`. With `limits`, they are centered above and below it.
pub fn attach<S: SymbolTable + ?Sized>(base: Subraster, sub: Option<Subraster>, sup: Option<Subraster>, limits: bool, ctx: &mut RenderContext<S>) -> RasterResult<Subraster> {
    if sub.is_none() && sup.is_none() {
        return Ok(base);
    }
    if limits {
        return stack(base, sub, sup, ctx.pixel_limit());
    }
    beside(base, sub, sup, ctx)
}

fn stack(base: Subraster, sub: Option<Subraster>, sup: Option<Subraster>, limit: usize) -> RasterResult<Subraster> {
    let mut stacked = base;
    if let Some(sup) = sup {
        stacked = concat_vertical(sup, stacked, StackBaseline::Bottom, LIMITS_GAP, true, limit)?;
    }
    if let Some(sub) = sub {
        stacked = concat_vertical(stacked, sub, StackBaseline::Top, LIMITS_GAP, true, limit)?;
    }
    Ok(stacked)
}

/// Builds the column of scripts, then sets it right of the base.
fn beside<S: SymbolTable + ?Sized>(base: Subraster, sub: Option<Subraster>, sup: Option<Subraster>, ctx: &mut RenderContext<S>) -> RasterResult<Subraster> {
    // rows kept between the scripts and the top, bottom and baseline of the base
    let vabove  = ctx.size as usize + 1;
    let vbelow  = vabove;
    let vbottom = vabove;

    let baseht   = base.height();
    let baseln   = base.baseline;
    let bdescend = base.descent();

    let (width, height, baseline) = match (&sub, &sup) {
        (Some(sub), Some(sup)) => {
            let height = max(sub.height() + SCRIPT_GAP + sup.height(), vbelow + baseht + vabove);
            (max(sub.width(), sup.width()), height, baseln + (height - baseht) / 2)
        },
        (None, Some(sup)) => {
            let suph = sup.height();
            let height = max(max(baseln + 1 + vabove, suph + vbottom), (suph + vabove).saturating_sub(bdescend));
            (sup.width(), height, height - 1)
        },
        (Some(sub), None) => {
            let subh = sub.height();
            let sdescend = bdescend + vbelow;
            if subh > sdescend {
                (sub.width(), subh, (subh - (sdescend + 1)).min(baseln.saturating_sub(vbelow)))
            } else {
                (sub.width(), sdescend + 1, 0)
            }
        },
        (None, None) => return Ok(base),
    };

    let mut raster = ctx.raster(width, height)?;
    if let Some(sup) = &sup {
        blit(&mut raster, &sup.raster, 0, 0, false);
    }
    if let Some(sub) = &sub {
        blit(&mut raster, &sub.raster, (height - sub.height()) as isize, 0, false);
    }
    let scripts = Subraster::new(raster, baseline, ctx.size.saturating_sub(1), BoxKind::ComposedImage);
    concat_horizontal(base, scripts, 0, None, ctx.pixel_limit())
}
