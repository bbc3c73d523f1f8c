//! Producing tokens and arguments from the expression text.
//!
//! The lexer never allocates for the text it hands out: tokens, groups and arguments are slices of
//! the input. The only exception are primes (`x''`), which are rewritten into `\prime` superscripts.
use std::borrow::Cow;
use std::fmt;


/// A token of an expression
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Token<'a> {
    /// A TeX command without its backslash, e.g. `frac` for `\frac`
    Command(&'a str),
    /// The contents of a brace group, braces stripped
    Group(&'a str),
    /// Any other character
    Symbol(char),
    /// End of input
    EOF,
}

impl<'a> fmt::Display for Token<'a> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Token::Command(cmd) => write!(f, r#""\{}""#, cmd),
            Token::Group(inner) => write!(f, "{{{}}}", inner),
            Token::Symbol(c)    => write!(f, r"'{}'", c),
            Token::EOF          => write!(f, "EOF"),
        }
    }
}

/// Sub- and superscripts following a term, e.g. `_i^2` or `'`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Scripts<'a> {
    /// text of the subscript
    pub sub:    Option<Cow<'a, str>>,
    /// text of the superscript, primes included
    pub sup:    Option<Cow<'a, str>>,
    /// `Some(true)` after `\limits`, `Some(false)` after `\nolimits`
    pub limits: Option<bool>,
}

impl<'a> Scripts<'a> {
    /// No sub- nor superscript
    pub fn is_empty(&self) -> bool {
        self.sub.is_none() && self.sup.is_none()
    }
}

/// A `\left ... \middle ... \right` construct, `\left` already consumed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LeftRight<'a> {
    /// delimiter after `\left`
    pub left:     &'a str,
    /// delimiters after each `\middle`
    pub middles:  Vec<&'a str>,
    /// the delimited expression, cut at each `\middle`; one more segment than middles
    pub segments: Vec<&'a str>,
    /// delimiter after `\right`, `None` when the input ended first
    pub right:    Option<&'a str>,
}

/// Font size requested by a preamble
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SizeChange {
    /// `N$`
    Absolute(u8),
    /// `+N$` or `-N$`
    Relative(i8),
}

/// Display mode forced by a preamble
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StyleFlag {
    /// `,D`
    Display,
    /// `,T`
    Text,
}

/// Options given in front of an expression, terminated by `$`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Preamble {
    /// requested size
    pub size:  Option<SizeChange>,
    /// requested display mode
    pub style: Option<StyleFlag>,
}

/// The main structure for producing tokens from an input string
#[derive(Clone, Debug)]
pub struct Lexer<'a> {
    input : &'a str,
}

impl<'a> Lexer<'a> {
    /// Create a new lexer over `input`.
    pub fn new(input: &'a str) -> Lexer<'a> {
        Self { input }
    }

    /// Returns the input not consumed yet
    pub fn input(&self) -> &'a str {
        self.input
    }

    /// Consumes and returns everything left.
    pub fn rest(&mut self) -> &'a str {
        std::mem::take(&mut self.input)
    }

    /// Whether only whitespace remains
    pub fn is_empty(&self) -> bool {
        self.input.trim_start().is_empty()
    }

    /// Number of bytes consumed since the lexer was created over `origin`.
    fn offset_in(&self, origin: &'a str) -> usize {
        origin.len() - self.input.len()
    }

    /// Advances through the input so that the first character pointed to
    /// is not a whitespace
    pub fn consume_whitespace(&mut self) {
        self.input = self.input.trim_start();
    }

    /// Next non-whitespace character, not consumed.
    pub fn peek(&self) -> Option<char> {
        self.input.trim_start().chars().next()
    }

    /// Consumes `c` if it is the next non-whitespace character.
    pub fn eat(&mut self, c: char) -> bool {
        self.consume_whitespace();
        match self.input.strip_prefix(c) {
            Some(rest) => {
                self.input = rest;
                true
            },
            None => false,
        }
    }

    /// Attempts parsing a control sequence like `\bla`, returning `bla`.
    pub fn control_sequence(&mut self) -> Option<&'a str> {
        let mut chars = self.input.chars();
        if chars.next() != Some('\\') {
            return None;
        }

        let start_command = chars.as_str();

        // A \ at the end of input is considered the same as a slash followed by a space
        let character = chars.next().unwrap_or(' ');

        // If the first character is non-alphabetic, that is the command and we return it
        if !character.is_ascii_alphabetic() {
            let suffix = chars.as_str();
            self.input = suffix;
            return Some(diff_slices(start_command, suffix));
        }

        // Otherwise, we keep looping while characters are ASCII alphabetic
        let mut end_command = chars.as_str();
        while chars.next().map_or(false, |c| c.is_ascii_alphabetic()) {
            end_command = chars.as_str();
        }

        self.input = end_command;
        Some(diff_slices(start_command, end_command))
    }

    /// Produces the next token, skipping whitespace. A `{` yields the whole balanced group.
    pub fn next_token(&mut self) -> Token<'a> {
        self.consume_whitespace();
        let mut chars = self.input.chars();
        match chars.next() {
            None => Token::EOF,
            Some('{') => self.group().map_or(Token::EOF, Token::Group),
            Some('\\') => Token::Command(self.control_sequence().unwrap_or("")),
            Some(c) => {
                self.input = chars.as_str();
                Token::Symbol(c)
            },
        }
    }

    /// If the next non-whitespace character is `open`, consumes everything up to the balancing
    /// `close` and returns what lies in between. Escaped characters (`\{`) are not counted.
    /// An unbalanced group extends to the end of input.
    pub fn subexpression(&mut self, open: char, close: char) -> Option<&'a str> {
        let rest = self.input.trim_start();
        let mut chars = rest.char_indices();
        match chars.next() {
            Some((_, c)) if c == open => (),
            _ => return None,
        }

        let start = open.len_utf8();
        let mut depth = 1usize;
        let mut escaped = false;
        for (idx, c) in chars {
            if escaped {
                escaped = false;
                continue;
            }
            if c == '\\' {
                escaped = true;
            } else if c == close {
                depth -= 1;
                if depth == 0 {
                    self.input = &rest[idx + c.len_utf8() ..];
                    return Some(&rest[start .. idx]);
                }
            } else if c == open {
                depth += 1;
            }
        }

        self.input = "";
        Some(&rest[start ..])
    }

    /// `{...}`
    pub fn group(&mut self) -> Option<&'a str> {
        self.subexpression('{', '}')
    }

    /// `[...]`
    pub fn optional_arg(&mut self) -> Option<&'a str> {
        self.subexpression('[', ']')
    }

    /// `(...)`
    pub fn paren_args(&mut self) -> Option<&'a str> {
        self.subexpression('(', ')')
    }

    /// A command argument: the contents of a group, or else a single command or character.
    /// `None` at the end of input.
    pub fn argument(&mut self) -> Option<&'a str> {
        self.consume_whitespace();
        let rest = self.input;
        match rest.chars().next()? {
            '{'  => self.group(),
            '\\' => {
                self.control_sequence();
                Some(diff_slices(rest, self.input))
            },
            c => {
                self.input = &rest[c.len_utf8() ..];
                Some(&rest[.. c.len_utf8()])
            },
        }
    }

    /// A delimiter as written after `\left`: a control sequence (backslash included) or a
    /// single character, braces included.
    pub fn delimiter(&mut self) -> Option<&'a str> {
        self.consume_whitespace();
        let rest = self.input;
        match rest.chars().next()? {
            '\\' => {
                self.control_sequence();
                Some(diff_slices(rest, self.input))
            },
            c => {
                self.input = &rest[c.len_utf8() ..];
                Some(&rest[.. c.len_utf8()])
            },
        }
    }

    /// Consumes the sub- and superscripts, primes and `\limits`/`\nolimits` following a term.
    pub fn scripts(&mut self) -> Scripts<'a> {
        let mut scripts = Scripts::default();
        let mut primes = 0;

        loop {
            self.consume_whitespace();
            let rest = self.input;
            if let Some(after) = rest.strip_prefix('\'') {
                primes += 1;
                self.input = after;
            } else if rest.starts_with('_') && scripts.sub.is_none() {
                self.input = &rest[1 ..];
                scripts.sub = Some(Cow::Borrowed(self.argument().unwrap_or("")));
            } else if rest.starts_with('^') && scripts.sup.is_none() {
                self.input = &rest[1 ..];
                scripts.sup = Some(Cow::Borrowed(self.argument().unwrap_or("")));
            } else {
                let mut ahead = self.clone();
                match ahead.control_sequence() {
                    Some("limits")   => scripts.limits = Some(true),
                    Some("nolimits") => scripts.limits = Some(false),
                    _ => break,
                }
                *self = ahead;
            }
        }

        if primes > 0 {
            let mut sup = r"\prime".repeat(primes);
            if let Some(explicit) = scripts.sup.take() {
                sup.push('{');
                sup.push_str(&explicit);
                sup.push('}');
            }
            scripts.sup = Some(Cow::Owned(sup));
        }
        scripts
    }

    /// Parses the rest of a `\left` construct, up to the matching `\right`.
    /// Nested `\left ... \right` pairs are kept inside the segments.
    pub fn left_right(&mut self) -> LeftRight<'a> {
        let left = self.delimiter().unwrap_or(".");
        let body = self.input;
        let mut scan = Lexer::new(body);
        let mut middles  = Vec::new();
        let mut segments = Vec::new();
        let mut seg_start = 0;
        let mut depth = 0usize;

        loop {
            let pos = scan.offset_in(body);
            match scan.next_token() {
                Token::EOF => {
                    segments.push(&body[seg_start ..]);
                    self.input = "";
                    return LeftRight { left, middles, segments, right: None };
                },
                Token::Command("left") => {
                    scan.delimiter();
                    depth += 1;
                },
                Token::Command("middle") if depth == 0 => {
                    segments.push(&body[seg_start .. pos]);
                    middles.push(scan.delimiter().unwrap_or("."));
                    seg_start = scan.offset_in(body);
                },
                Token::Command("right") if depth == 0 => {
                    segments.push(&body[seg_start .. pos]);
                    let right = scan.delimiter().unwrap_or(".");
                    self.input = scan.input;
                    return LeftRight { left, middles, segments, right: Some(right) };
                },
                Token::Command("right") => {
                    scan.delimiter();
                    depth -= 1;
                },
                _ => (),
            }
        }
    }

    /// After `\begin{name}`, returns the body up to the matching `\end{name}` and moves past it.
    /// Leaves the lexer untouched and returns `None` when there is no matching `\end`.
    pub fn environment(&mut self, name: &str) -> Option<&'a str> {
        let body = self.input;
        let mut scan = Lexer::new(body);
        let mut depth = 0usize;

        loop {
            let pos = scan.offset_in(body);
            match scan.next_token() {
                Token::EOF => return None,
                Token::Command("begin") => {
                    if scan.group().map(str::trim) == Some(name) {
                        depth += 1;
                    }
                },
                Token::Command("end") => {
                    if scan.group().map(str::trim) == Some(name) {
                        if depth == 0 {
                            self.input = scan.input;
                            return Some(&body[.. pos]);
                        }
                        depth -= 1;
                    }
                },
                _ => (),
            }
        }
    }
}

/// Assuming `slice2` is a suffix of `slice1`,
/// returns the prefix of `slice1` that ends just before the first character of `slice2`
fn diff_slices<'a>(slice : &'a str, suffix : &'a str) -> &'a str {
    &slice[.. (slice.len() - suffix.len())]
}

/// Parses a possibly signed decimal number, surrounding whitespace allowed.
pub fn parse_number(text: &str) -> Option<f64> {
    text.trim().parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Parses `x,y`.
pub fn parse_pair(text: &str) -> Option<(f64, f64)> {
    let (x, y) = text.split_once(',')?;
    Some((parse_number(x)?, parse_number(y)?))
}

/// Cuts the body of an array into rows (at `\\`) and cells (at `&`).
/// Separators inside groups and nested environments are left alone.
pub fn split_array(input: &str) -> Vec<Vec<&str>> {
    let mut rows = Vec::new();
    let mut row  = Vec::new();
    let mut scan = Lexer::new(input);
    let mut cell_start = 0;
    let mut depth = 0usize;

    loop {
        let pos = scan.offset_in(input);
        match scan.next_token() {
            Token::EOF => break,
            Token::Symbol('&') if depth == 0 => {
                row.push(&input[cell_start .. pos]);
                cell_start = scan.offset_in(input);
            },
            Token::Command("\\") if depth == 0 => {
                row.push(&input[cell_start .. pos]);
                rows.push(std::mem::take(&mut row));
                cell_start = scan.offset_in(input);
            },
            Token::Command("begin") => depth += 1,
            Token::Command("end")   => depth = depth.saturating_sub(1),
            _ => (),
        }
    }

    row.push(&input[cell_start ..]);
    rows.push(row);
    rows
}

/// Splits an optional `size$` preamble off the front of an expression.
///
/// The preamble is `[+-]?N` (absolute or relative size), optionally followed by `,D` or `,T`.
/// Text before the first `$` that does not have this shape is not a preamble.
pub fn extract_preamble(input: &str) -> (Preamble, &str) {
    let not_a_preamble = (Preamble::default(), input);
    let (head, body) = match input.split_once('$') {
        Some(split) => split,
        None => return not_a_preamble,
    };

    let mut parts = head.split(',');
    let size  = parts.next().unwrap_or("").trim();
    let style = parts.next().map(str::trim);
    if parts.next().is_some() {
        return not_a_preamble;
    }

    let size = if size.is_empty() {
        None
    } else if size.starts_with('+') || size.starts_with('-') {
        match size.parse::<i8>() {
            Ok(delta) => Some(SizeChange::Relative(delta)),
            Err(_) => return not_a_preamble,
        }
    } else {
        match size.parse::<u8>() {
            Ok(size) => Some(SizeChange::Absolute(size)),
            Err(_) => return not_a_preamble,
        }
    };

    let style = match style {
        None | Some("")      => None,
        Some("D") | Some("d") => Some(StyleFlag::Display),
        Some("T") | Some("t") => Some(StyleFlag::Text),
        Some(_) => return not_a_preamble,
    };

    (Preamble { size, style }, body)
}
