/// This executable rasterizes a very large number of formulas
/// Its performance is monitored with `perf` to find out the main
/// cost centers of the `layout` module
///
/// Takes path to a .json file representing a list of strings (as below)
/// and renders each of them ; prints number of successes
///
/// ```json
/// [
///   "",
///   "X(3823)",
///   "\\mathrm{TERM}_T",
///   "m_\\alpha n_\\alpha = 3",
///   "\\sqrt{s^g/N} \\sqrt{s^m/N} \\ll N^{-1/2} \\Leftrightarrow s^g s^m \\ll N",
///   ...
///  ]
///  ```
///
///
/// Run with:
///
/// ```bash
/// CARGO_PROFILE_RELEASE_DEBUG=true cargo flamegraph --root --example stress-test -- PATH_TO_FILE
/// ```

use clap::Parser;
use rastex::font::BuiltinFont;
use rastex::layout::RenderSettings;

#[derive(Parser)]
struct Options {
	#[arg(help = "JSON list of formulas")]
	formulas_path : std::path::PathBuf,

	#[arg(short = 'n', long, default_value_t = 1, help = "Times each formula is rendered")]
	repeat : usize,

	#[arg(short, long, help = "Size level (0 to 7)")]
	size : Option<u8>,
}

fn main() {
	env_logger::init();
	let Options { formulas_path, repeat, size } = Options::parse();
	eprintln!("Formulas from: {}", formulas_path.display());

	let formulas_file = std::fs::File::open(&formulas_path).unwrap();
	let formulas_buffer = std::io::BufReader::new(formulas_file);
	let formulas : Vec<String> = serde_json::from_reader(formulas_buffer).unwrap();

	let font = BuiltinFont::new();
	let mut settings = RenderSettings::new();
	if let Some(size) = size {
		settings = settings.with_size(size);
	}

	let mut n_successes = 0;
	let mut n_compiles  = 0;
	for formula in formulas.iter() {
		for _ in 0 .. repeat {
			if rastex::render_with(formula, &font, settings.clone()).is_ok() {
				n_successes += 1;
			}
			n_compiles += 1;
		}
	}
	eprintln!("{} / {}", n_successes, n_compiles);
}
