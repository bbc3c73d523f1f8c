//! Randomized checks of the invariants every rendered box and drawing primitive keeps.

extern crate rastex;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use rastex::font::BuiltinFont;
use rastex::layout::{rasterize, RenderContext, RenderSettings};
use rastex::raster::draw::{bezier_raster, border_raster, circle_raster, line_raster, line_recurse, Arc, Plot};
use rastex::raster::{PixelDepth, Raster, MAX_RASTER_PIXELS};

const SEED: u64 = 0x5eed;
const ROUNDS: usize = 200;

const FRAGMENTS: &[&str] = &[
    "x", "a^2", "b_i", "y_i^2", "+", "=", r"\alpha", r"\infty",
    r"\frac{1}{2}", r"\sqrt{y}", r"\sqrt[3]{z}", r"\left(z\right)",
    r"\sum_{i=1}^n", r"\int_0^1", r"\hat{x}", r"\, ", r"\quad ", r"\hspace{-2}",
    r"\tiny ", r"\Large ", r"\rm ", r"\bf ", r"\displaystyle ", r"\nosmash ",
    r"\fbox{q}", r"\rotatebox{90}{ab}", r"\raisebox{-4}{k}", r"\\",
];

fn random_formula(rng: &mut StdRng) -> String {
    let terms = rng.gen_range(1 ..= 6);
    let mut formula = String::new();
    for _ in 0 .. terms {
        let fragment = FRAGMENTS.choose(rng).unwrap();
        if rng.gen_bool(0.2) {
            formula.push('{');
            formula.push_str(fragment);
            formula.push('}');
        } else {
            formula.push_str(fragment);
        }
    }
    // always something to draw
    formula.push('x');
    formula
}

fn inked(raster: &Raster) -> usize {
    (0 .. raster.height())
        .flat_map(|row| (0 .. raster.width()).map(move |col| (row, col)))
        .filter(|&(row, col)| raster.is_set(row as isize, col as isize))
        .count()
}

#[test]
fn baselines_stay_inside_random_formulas() {
    let _ = env_logger::builder().is_test(true).try_init();
    let mut rng = StdRng::seed_from_u64(SEED);
    for _ in 0 .. ROUNDS {
        let formula = random_formula(&mut rng);
        let boxed = rastex::render(&formula).unwrap_or_else(|err| panic!("{}: {}", formula, err));
        assert!(boxed.height() > 0, "{}", formula);
        assert!(boxed.baseline < boxed.height(), "{}: baseline {} of {}", formula, boxed.baseline, boxed.height());

        // rendering is a pure function of its input
        let again = rastex::render(&formula).unwrap();
        assert_eq!(again.raster, boxed.raster, "{}", formula);
        assert_eq!(again.baseline, boxed.baseline, "{}", formula);
    }
}

#[test]
fn grey_rendering_keeps_the_geometry() {
    let mut rng = StdRng::seed_from_u64(SEED + 1);
    let font = BuiltinFont::new();
    for _ in 0 .. ROUNDS / 4 {
        let formula = random_formula(&mut rng);
        let mono = rastex::render(&formula).unwrap();
        let settings = RenderSettings::new().with_pixel_depth(PixelDepth::Eight);
        let grey = rastex::render_with(&formula, &font, settings).unwrap();
        assert_eq!((grey.width(), grey.height(), grey.baseline), (mono.width(), mono.height(), mono.baseline), "{}", formula);
        assert_eq!(grey.raster.depth(), PixelDepth::Eight);
    }
}

#[test]
fn rasterize_restores_random_switches() {
    let mut rng = StdRng::seed_from_u64(SEED + 2);
    let font = BuiltinFont::new();
    let mut ctx = RenderContext::new(&font, RenderSettings::default());
    let before = (ctx.size, ctx.family, ctx.display_style, ctx.smash, ctx.unit_length, ctx.depth);

    for _ in 0 .. ROUNDS {
        let formula = random_formula(&mut rng);
        let size = rng.gen_range(0 ..= 7);
        rasterize(&formula, size, &mut ctx).unwrap();
        let after = (ctx.size, ctx.family, ctx.display_style, ctx.smash, ctx.unit_length, ctx.depth);
        assert_eq!(before, after, "{}", formula);
        assert!(ctx.left_expression.is_none(), "{}", formula);
    }
}

#[test]
fn borders_of_aligned_rasters_are_identities() {
    let mut rng = StdRng::seed_from_u64(SEED + 3);
    for _ in 0 .. ROUNDS {
        let width = 8 * rng.gen_range(1 ..= 6);
        let height = rng.gen_range(1 ..= 20);
        let mut raster = Raster::new(width, height, PixelDepth::One).unwrap();
        for _ in 0 .. rng.gen_range(0 .. width * height) {
            let row = rng.gen_range(0 .. height) as isize;
            let col = rng.gen_range(0 .. width) as isize;
            raster.ink(row, col).unwrap();
        }
        let bordered = border_raster(&raster, 0, 0, 0, false, MAX_RASTER_PIXELS).unwrap();
        assert_eq!(bordered, raster);

        // widening keeps the ink and realigns the rows
        let side = rng.gen_range(1 ..= 5);
        let bordered = border_raster(&raster, 1, 1, side, false, MAX_RASTER_PIXELS).unwrap();
        assert_eq!(bordered.width() % 8, 0);
        assert_eq!(inked(&bordered), inked(&raster));
    }
}

#[test]
fn lines_converge_without_gaps() {
    let mut rng = StdRng::seed_from_u64(SEED + 4);
    const SIDE: usize = 64;
    for _ in 0 .. ROUNDS {
        let from = (rng.gen_range(0 .. SIDE) as f64, rng.gen_range(0 .. SIDE) as f64);
        let to = (rng.gen_range(0 .. SIDE) as f64, rng.gen_range(0 .. SIDE) as f64);

        let mut raster = Raster::new(SIDE, SIDE, PixelDepth::One).unwrap();
        assert_eq!(line_raster(&mut raster, from, to, 1), 0);
        assert!(raster.is_set(from.0 as isize, from.1 as isize));
        assert!(raster.is_set(to.0 as isize, to.1 as isize));

        // every column (or row) spanned by the line gets ink
        let horizontal = (to.1 - from.1).abs() >= (to.0 - from.0).abs();
        let (lo, hi) = if horizontal {
            (from.1.min(to.1) as usize, from.1.max(to.1) as usize)
        } else {
            (from.0.min(to.0) as usize, from.0.max(to.0) as usize)
        };
        for k in lo ..= hi {
            let hit = (0 .. SIDE).any(|j| {
                if horizontal { raster.is_set(j as isize, k as isize) } else { raster.is_set(k as isize, j as isize) }
            });
            assert!(hit, "gap at {} on {:?} -> {:?}\n{}", k, from, to, raster);
        }

        let mut plot = Plot::default();
        let mut scratch = Raster::new(SIDE, SIDE, PixelDepth::One).unwrap();
        line_recurse(&mut scratch, from, to, 0, &mut plot);
        assert!(plot.max_depth <= 9, "{:?} -> {:?}: depth {}", from, to, plot.max_depth);
        assert_eq!(plot.clipped, 0);
    }
}

#[test]
fn curves_stay_in_their_bounds() {
    let mut rng = StdRng::seed_from_u64(SEED + 5);
    const SIDE: usize = 48;
    for _ in 0 .. ROUNDS {
        let top = rng.gen_range(0 .. SIDE / 2) as isize;
        let left = rng.gen_range(0 .. SIDE / 2) as isize;
        let bottom = rng.gen_range(SIDE / 2 .. SIDE) as isize;
        let right = rng.gen_range(SIDE / 2 .. SIDE) as isize;
        let mut raster = Raster::new(SIDE, SIDE, PixelDepth::One).unwrap();
        assert_eq!(circle_raster(&mut raster, top, left, bottom, right, 1, Arc::FULL), 0);
        assert!(inked(&raster) > 0);

        let mut point = || (rng.gen_range(0 .. SIDE) as f64, rng.gen_range(0 .. SIDE) as f64);
        let (start, end, control) = (point(), point(), point());
        let mut raster = Raster::new(SIDE, SIDE, PixelDepth::One).unwrap();
        assert_eq!(bezier_raster(&mut raster, start, end, control), 0);
        assert!(raster.is_set(start.0 as isize, start.1 as isize));
        assert!(raster.is_set(end.0 as isize, end.1 as isize));
    }
}
