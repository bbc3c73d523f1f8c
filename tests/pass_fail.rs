extern crate rastex;
#[macro_use]
extern crate serde_derive;
extern crate serde_yaml;

use std::cell::Cell;
use std::fs::File;
use std::io::BufReader;

use rastex::error::Error;
use rastex::font::{BuiltinFont, Family, SymbolDef, SymbolTable};
use rastex::layout::RenderSettings;
use rastex::Subraster;

#[derive(Debug, Serialize, Deserialize)]
struct Tests {
    #[serde(rename="Pass")]
    pass: Vec<String>,
    #[serde(rename="Fail")]
    fail: Vec<String>,
}

/// The builtin font, counting how many times the `[?]` placeholder was set.
struct Watched {
    font:         BuiltinFont,
    placeholders: Cell<usize>,
}

impl SymbolTable for Watched {
    fn lookup_symbol(&self, token: &str, family: Family) -> Option<SymbolDef> {
        if token == "?" && family == Family::Roman {
            self.placeholders.set(self.placeholders.get() + 1);
        }
        self.font.lookup_symbol(token, family)
    }

    fn render_glyph(&self, symbol: &SymbolDef, size: u8) -> Option<Subraster> {
        self.font.render_glyph(symbol, size)
    }

    fn sized_delimiter(&self, name: &str, min_height: usize, size: u8) -> Option<Subraster> {
        self.font.sized_delimiter(name, min_height, size)
    }

    fn em_height(&self, size: u8) -> usize {
        self.font.em_height(size)
    }
}

/// Renders `formula`, returning the number of placeholders in the result.
fn render(formula: &str) -> Result<usize, Error> {
    let watched = Watched { font: BuiltinFont::new(), placeholders: Cell::new(0) };
    let boxed = rastex::render_with(formula, &watched, RenderSettings::default())?;
    assert!(boxed.baseline < boxed.height().max(1), "{}: baseline outside the box", formula);
    Ok(watched.placeholders.get())
}

#[test]
fn pass_fail() {
    let _ = env_logger::builder().is_test(true).try_init();
    let file = File::open("tests/data/passfail.yaml").expect("failed to open passfail yaml");
    let reader = BufReader::new(file);
    let tests: Tests = serde_yaml::from_reader(reader).expect("failed to parse passfail.yaml");
    let mut fail = 0;

    for test in tests.pass {
        match render(&test) {
            Ok(0) => continue,
            Ok(n) => {
                println!("Tex: {}", test);
                println!("Should have passed, rendered {} placeholders", n);
                fail += 1;
            },
            Err(err) => {
                println!("Tex: {}", test);
                println!("Should have passed, failed with: {:?}", err);
                fail += 1;
            },
        }
    }

    for test in tests.fail {
        match render(&test) {
            Ok(0) => {
                println!("Tex: {}", test);
                println!("Should have failed");
                fail += 1;
            },
            Ok(_) | Err(Error::EmptyExpression) => continue,
            Err(err) => {
                println!("Tex: {}", test);
                println!("Should have rendered a placeholder, failed with: {:?}", err);
                fail += 1;
            },
        }
    }

    if fail > 0 {
        panic!("{} Pass/Fail tests failed.", fail);
    }
}

#[test]
fn deep_nesting_is_a_placeholder() {
    let formula = format!("{}x{}", "{".repeat(100), "}".repeat(100));
    assert!(render(&formula).unwrap() > 0);
}
