use rastex::{
    font::BuiltinFont,
    layout::RenderSettings,
    raster::PixelDepth,
    render::{tinyskia::TinySkiaBackend, Renderer},
};
use clap::Parser;

const DEFAULT_OUTPUT_FILE : &str = "formula.png";
const DEFAULT_FORMULA: &str = r"\sqrt{1 + f^2(x,t)} = \sum_{i=1}^n \frac{\xi_i}{i}";
const DEFAULT_SCALE : f64 = 4.;

#[derive(Parser)]
struct Options {
    #[arg(default_value_t = DEFAULT_FORMULA.to_string(), help = "Formula to render")]
    formula : String,

    #[arg(short = 'i', long, conflicts_with("formula"))]
    formula_path : Option<std::path::PathBuf>,

    #[arg(short = 'o', long = "output", help = "PNG output file")]
    output_file_path : Option<std::path::PathBuf>,

    #[arg(short, long, default_value_t = false, help = "Display debug bounding boxes")]
    debug   : bool,

    #[arg(short = 'a', long, default_value_t = false, help = "Anti-aliased 8-bit rendering")]
    antialias : bool,

    #[arg(short, long, default_value_t = DEFAULT_SCALE, help = "Output pixels per raster pixel")]
    scale : f64,
}

fn main() {
    env_logger::init();
    // -- Parse command-line options
    let Options { mut formula, formula_path, output_file_path, debug, antialias, scale } = Options::parse();
    let output_file_path = output_file_path.unwrap_or_else(|| DEFAULT_OUTPUT_FILE.into());
    if let Some(formula_path) = formula_path {
        formula = String::from_utf8(std::fs::read(&formula_path).unwrap()).unwrap();
    }

    // -- Rasterize
    let mut settings = RenderSettings::new();
    if antialias {
        settings = settings.with_pixel_depth(PixelDepth::Eight);
    }
    let boxed = rastex::render_with(formula.trim(), &BuiltinFont::new(), settings).unwrap();
    println!("{}x{} pixels, baseline on row {}", boxed.width(), boxed.height(), boxed.baseline);

    // -- Draw onto a pixmap
    let mut backend = TinySkiaBackend::new(&boxed, scale).expect("empty canvas");
    let mut renderer = Renderer::new();
    renderer.debug = debug;
    renderer.render(&boxed, &mut backend);

    backend.pixmap().save_png(output_file_path).unwrap();
}
