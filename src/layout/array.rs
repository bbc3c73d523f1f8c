//! Arrays, and the matrix-like environments built on them.
//!
//! Layout takes two passes. The cells are rendered first and only their extents are kept to
//! compute an [`ArrayLayout`]: column widths and left edges, row heights and top edges, and the
//! positions of the requested rules. The cells are then blitted into a raster of the final size.

use std::cmp::max;

use crate::font::SymbolTable;
use crate::parser::{split_array, Lexer};
use crate::raster::compose::blit;
use crate::raster::draw::{rule_raster, RuleStyle};
use crate::raster::{BoxKind, Subraster};
use super::constants::*;
use super::context::RenderContext;
use super::delimiters::enclose;
use super::engine::rasterize;
use super::{centered_baseline, Rendered};

/// Horizontal placement of the cells of a column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Justify {
    /// flush left
    Left,
    /// centered
    Center,
    /// flush right
    Right,
}

/// Vertical placement of the cells of a row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowAlign {
    /// baselines on a common row
    Baseline,
    /// centered in the row
    Center,
}

/// A rule between columns or rows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineStyle {
    /// no rule
    None,
    /// `|` or `\hline`
    Solid,
    /// `.` or `\hdash`
    Dashed,
}

/// Column options of an array preamble
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnSpec {
    /// `l`, `c` or `r`
    pub justify:     Justify,
    /// minimal width in pixels
    pub width:       Option<usize>,
    /// rule on the left of the column
    pub rule_before: LineStyle,
    /// columns between this one and the previous, instead of the default
    pub gap:         Option<usize>,
}

impl Default for ColumnSpec {
    fn default() -> Self {
        ColumnSpec {
            justify:     Justify::Center,
            width:       None,
            rule_before: LineStyle::None,
            gap:         None,
        }
    }
}

/// Row options of an array preamble
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowSpec {
    /// `B` or `C`
    pub align:  RowAlign,
    /// minimal height in pixels
    pub height: Option<usize>,
}

impl Default for RowSpec {
    fn default() -> Self {
        RowSpec { align: RowAlign::Baseline, height: None }
    }
}

/// A parsed array preamble such as `l|c5+` or `rcl B C20`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArrayPreamble {
    columns:         Vec<ColumnSpec>,
    propagate_column: bool,
    rows:            Vec<RowSpec>,
    propagate_row:   bool,
    /// rule right of the last column
    pub rule_after:  LineStyle,
}

impl Default for ArrayPreamble {
    fn default() -> Self {
        ArrayPreamble {
            columns:          Vec::new(),
            propagate_column: false,
            rows:             Vec::new(),
            propagate_row:    false,
            rule_after:       LineStyle::None,
        }
    }
}

fn number(chars: &mut std::iter::Peekable<std::str::Chars>) -> Option<usize> {
    let mut value: Option<usize> = None;
    while let Some(digit) = chars.peek().and_then(|c| c.to_digit(10)) {
        chars.next();
        value = Some(value.unwrap_or(0).saturating_mul(10).saturating_add(digit as usize));
    }
    value
}

fn plus(chars: &mut std::iter::Peekable<std::str::Chars>) -> bool {
    chars.next_if_eq(&'+').is_some()
}

impl ArrayPreamble {
    /// Parses the preamble grammar; unknown characters are skipped.
    pub fn parse(text: &str) -> Self {
        let mut preamble = ArrayPreamble::default();
        let mut rule = LineStyle::None;
        let mut gap = None;
        let mut chars = text.chars().peekable();

        while let Some(c) = chars.next() {
            match c {
                'l' | 'c' | 'r' => {
                    let justify = match c {
                        'l' => Justify::Left,
                        'r' => Justify::Right,
                        _   => Justify::Center,
                    };
                    let width = number(&mut chars);
                    preamble.propagate_column = plus(&mut chars);
                    preamble.columns.push(ColumnSpec {
                        justify,
                        width,
                        rule_before: std::mem::replace(&mut rule, LineStyle::None),
                        gap: gap.take(),
                    });
                },
                'B' | 'C' => {
                    let align = if c == 'B' { RowAlign::Baseline } else { RowAlign::Center };
                    let height = number(&mut chars);
                    preamble.propagate_row = plus(&mut chars);
                    preamble.rows.push(RowSpec { align, height });
                },
                '|' => rule = LineStyle::Solid,
                '.' => rule = LineStyle::Dashed,
                'G' => gap = number(&mut chars),
                c if c.is_whitespace() => (),
                c => debug!("ignoring {:?} in array preamble", c),
            }
        }
        preamble.rule_after = rule;
        preamble
    }

    /// Options of column `index`, the last column repeating when it ended with `+`.
    pub fn column(&self, index: usize) -> ColumnSpec {
        match self.columns.get(index) {
            Some(spec) => *spec,
            None if self.propagate_column => self.columns.last().copied().unwrap_or_default(),
            None => ColumnSpec::default(),
        }
    }

    /// Options of row `index`, the last row repeating when it ended with `+`.
    pub fn row(&self, index: usize) -> RowSpec {
        match self.rows.get(index) {
            Some(spec) => *spec,
            None if self.propagate_row => self.rows.last().copied().unwrap_or_default(),
            None => RowSpec::default(),
        }
    }
}

/// Extent of a rendered cell around its baseline.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CellSize {
    /// columns
    pub width: usize,
    /// rows down to the baseline, included
    pub above: usize,
    /// rows below the baseline
    pub below: usize,
}

impl CellSize {
    /// Extent of a box
    pub fn of(boxed: &Subraster) -> Self {
        CellSize {
            width: boxed.width(),
            above: boxed.baseline + 1,
            below: boxed.descent(),
        }
    }

    fn height(self) -> usize {
        self.above + self.below
    }
}

/// Geometry of an array, in pixels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArrayLayout {
    /// width of each column
    pub col_widths:  Vec<usize>,
    /// first pixel column of each column
    pub col_lefts:   Vec<usize>,
    /// height of each row
    pub row_heights: Vec<usize>,
    /// first pixel row of each row
    pub row_tops:    Vec<usize>,
    /// rows of each row above and including its baseline
    pub row_above:   Vec<usize>,
    /// column of each vertical rule
    pub vrules:      Vec<(usize, LineStyle)>,
    /// row of each horizontal rule
    pub hrules:      Vec<(usize, LineStyle)>,
    /// total width
    pub width:       usize,
    /// total height
    pub height:      usize,
}

impl ArrayLayout {
    /// Lays out `cells[row][col]`.
    ///
    /// `hlines` holds the rule above each row followed by the rule below the last one;
    /// missing entries mean no rule.
    pub fn new(cells: &[Vec<CellSize>], preamble: &ArrayPreamble, hlines: &[LineStyle], colsep: usize, rowsep: usize) -> Self {
        let ncols = cells.iter().map(Vec::len).max().unwrap_or(0);
        let nrows = cells.len();

        let mut col_widths = vec![0; ncols];
        for row in cells {
            for (j, cell) in row.iter().enumerate() {
                col_widths[j] = max(col_widths[j], cell.width);
            }
        }

        let mut col_lefts = Vec::with_capacity(ncols);
        let mut vrules = Vec::new();
        let mut x = 0;
        for (j, width) in col_widths.iter_mut().enumerate() {
            let spec = preamble.column(j);
            *width = max(*width, spec.width.unwrap_or(0));
            let gap = if j == 0 { 0 } else { spec.gap.unwrap_or(colsep) };
            let margin = if spec.rule_before != LineStyle::None { VLINE_MARGIN } else { 0 };
            if spec.rule_before != LineStyle::None {
                vrules.push((x + (gap + margin) / 2, spec.rule_before));
            }
            x += gap + margin;
            col_lefts.push(x);
            x += *width;
        }
        if preamble.rule_after != LineStyle::None {
            vrules.push((x + VLINE_MARGIN / 2, preamble.rule_after));
            x += VLINE_MARGIN;
        }
        let width = x;

        let hline = |i: usize| hlines.get(i).copied().unwrap_or(LineStyle::None);
        let mut row_heights = Vec::with_capacity(nrows);
        let mut row_tops = Vec::with_capacity(nrows);
        let mut row_above = Vec::with_capacity(nrows);
        let mut hrules = Vec::new();
        let mut y = 0;
        for (i, row) in cells.iter().enumerate() {
            let mut above = row.iter().map(|cell| cell.above).max().unwrap_or(0);
            let mut below = row.iter().map(|cell| cell.below).max().unwrap_or(0);
            if let Some(height) = preamble.row(i).height {
                let extra = height.saturating_sub(above + below);
                above += extra / 2;
                below += extra - extra / 2;
            }

            let gap = if i == 0 { 0 } else { rowsep };
            let margin = if hline(i) != LineStyle::None { HLINE_MARGIN } else { 0 };
            if hline(i) != LineStyle::None {
                hrules.push((y + (gap + margin) / 2, hline(i)));
            }
            y += gap + margin;
            row_tops.push(y);
            row_above.push(above);
            row_heights.push(above + below);
            y += above + below;
        }
        if hline(nrows) != LineStyle::None {
            hrules.push((y + HLINE_MARGIN / 2, hline(nrows)));
            y += HLINE_MARGIN;
        }

        ArrayLayout { col_widths, col_lefts, row_heights, row_tops, row_above, vrules, hrules, width, height: y }
    }

    /// Top-left corner of a cell of extent `cell` at (`row`, `col`).
    pub fn place(&self, preamble: &ArrayPreamble, row: usize, col: usize, cell: CellSize) -> (usize, usize) {
        let room = self.col_widths[col].saturating_sub(cell.width);
        let left = self.col_lefts[col] + match preamble.column(col).justify {
            Justify::Left   => 0,
            Justify::Center => room / 2,
            Justify::Right  => room,
        };
        let top = self.row_tops[row] + match preamble.row(row).align {
            RowAlign::Baseline => self.row_above[row].saturating_sub(cell.above),
            RowAlign::Center   => self.row_heights[row].saturating_sub(cell.height()) / 2,
        };
        (top, left)
    }
}

/// Splits leading `\hline`/`\hdash` off a cell.
fn strip_hlines(cell: &str) -> (LineStyle, &str) {
    let mut lex = Lexer::new(cell);
    let mut style = LineStyle::None;
    loop {
        lex.consume_whitespace();
        let mut ahead = lex.clone();
        match ahead.control_sequence() {
            Some("hline") => style = LineStyle::Solid,
            Some("hdash") if style == LineStyle::None => style = LineStyle::Dashed,
            Some("hdash") => (),
            _ => return (style, lex.input()),
        }
        lex = ahead;
    }
}

/// Splits a trailing `\hline`/`\hdash` off a cell.
fn strip_trailing_hline(cell: &str) -> (LineStyle, &str) {
    let trimmed = cell.trim_end();
    if let Some(rest) = trimmed.strip_suffix(r"\hline") {
        (LineStyle::Solid, rest)
    } else if let Some(rest) = trimmed.strip_suffix(r"\hdash") {
        (LineStyle::Dashed, rest)
    } else {
        (LineStyle::None, cell)
    }
}

/// Renders the cells of `body` (separated by `&` and `\\`) as laid out by `preamble`.
pub fn render_array<S: SymbolTable + ?Sized>(body: &str, preamble: &ArrayPreamble, ctx: &mut RenderContext<S>) -> Rendered {
    let mut rows = split_array(body);
    let mut hlines = Vec::with_capacity(rows.len() + 1);
    for row in rows.iter_mut() {
        let style = match row.first_mut() {
            Some(first) => {
                let (style, rest) = strip_hlines(first);
                *first = rest;
                style
            },
            None => LineStyle::None,
        };
        hlines.push(style);
    }

    // `\\` ending the last row leaves a blank row behind, carrying only the rule below
    let blank = |row: &Vec<&str>| row.iter().all(|cell| cell.trim().is_empty());
    if rows.len() > 1 && rows.last().map_or(false, blank) {
        rows.pop();
    } else {
        let last = rows.last_mut().and_then(|row| row.last_mut());
        let style = match last {
            Some(cell) => {
                let (style, rest) = strip_trailing_hline(cell);
                *cell = rest;
                style
            },
            None => LineStyle::None,
        };
        hlines.push(style);
    }
    if rows.iter().all(blank) {
        return Ok(None);
    }

    let mut cells = Vec::with_capacity(rows.len());
    for row in &rows {
        let mut rendered = Vec::with_capacity(row.len());
        for cell in row {
            rendered.push(rasterize(cell, ctx.size, ctx)?);
        }
        cells.push(rendered);
    }
    let sizes: Vec<Vec<CellSize>> = cells.iter()
        .map(|row| row.iter().map(|cell| cell.as_ref().map_or_else(CellSize::default, CellSize::of)).collect())
        .collect();

    let em = ctx.em(ctx.size);
    let colsep = max(em * 2 / 3, 2);
    let rowsep = max(em / 4, 1);
    let layout = ArrayLayout::new(&sizes, preamble, &hlines, colsep, rowsep);
    debug!("array of {}x{} cells, {}x{} pixels", sizes.len(), layout.col_widths.len(), layout.width, layout.height);

    let mut raster = ctx.raster(layout.width, layout.height)?;
    for (i, row) in cells.iter().enumerate() {
        for (j, cell) in row.iter().enumerate() {
            if let Some(cell) = cell {
                let (top, left) = layout.place(preamble, i, j, CellSize::of(cell));
                blit(&mut raster, &cell.raster, top as isize, left as isize, false);
            }
        }
    }

    let mut clipped = 0;
    for &(col, style) in &layout.vrules {
        let style = if style == LineStyle::Dashed { RuleStyle::VerticalDash } else { RuleStyle::Solid };
        clipped += rule_raster(&mut raster, 0, col as isize, 1, layout.height, style);
    }
    for &(row, style) in &layout.hrules {
        let style = if style == LineStyle::Dashed { RuleStyle::HorizontalDash } else { RuleStyle::Solid };
        clipped += rule_raster(&mut raster, row as isize, 0, layout.width, 1, style);
    }
    ctx.check_clipped(clipped)?;

    let baseline = centered_baseline(layout.height, em);
    Ok(Some(Subraster::new(raster, baseline, ctx.size, BoxKind::ComposedImage)))
}

/// `\array[preamble]{body}`
pub fn array_command<S: SymbolTable + ?Sized>(lex: &mut Lexer, ctx: &mut RenderContext<S>) -> Rendered {
    let preamble = ArrayPreamble::parse(lex.optional_arg().unwrap_or(""));
    match lex.argument() {
        Some(body) => render_array(body, &preamble, ctx),
        None => {
            warn!("\\array without a body");
            Ok(None)
        },
    }
}

/// `\begin{name} ... \end{name}`
///
/// An environment without its `\end` renders nothing; only `\begin{name}` is consumed.
pub fn begin<S: SymbolTable + ?Sized>(lex: &mut Lexer, ctx: &mut RenderContext<S>) -> Rendered {
    let name = match lex.group() {
        Some(name) => name.trim(),
        None => {
            warn!("\\begin without an environment name");
            return Ok(None);
        },
    };
    let body = match lex.environment(name) {
        Some(body) => body,
        None => {
            warn!("\\begin{{{}}} without \\end", name);
            return Ok(None);
        },
    };

    let mut spec = "";
    let mut body = body;
    let (left, right) = match name {
        "matrix" | "smallmatrix" => (".", "."),
        "pmatrix" => ("(", ")"),
        "bmatrix" => ("[", "]"),
        "Bmatrix" => (r"\{", r"\}"),
        "vmatrix" => ("|", "|"),
        "Vmatrix" => (r"\|", r"\|"),
        "cases" => {
            spec = "l+";
            (r"\{", ".")
        },
        "array" => {
            let mut inner = Lexer::new(body);
            spec = inner.group().unwrap_or("");
            body = inner.rest();
            (".", ".")
        },
        "eqnarray" | "eqnarray*" => {
            spec = "rcl";
            (".", ".")
        },
        "align" | "align*" | "aligned" => {
            spec = "rlrlrlrl";
            (".", ".")
        },
        "gather" | "gather*" | "gathered" => (".", "."),
        other => {
            warn!("unknown environment {}, laid out as a matrix", other);
            (".", ".")
        },
    };

    let preamble = ArrayPreamble::parse(spec);
    let array = match render_array(body, &preamble, ctx)? {
        Some(array) => array,
        None => return Ok(None),
    };
    if left == "." && right == "." {
        return Ok(Some(array));
    }
    enclose(vec![Some(array)], left, &[], right, ctx).map(Some)
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::BuiltinFont;
    use crate::layout::RenderSettings;

    fn render(expression: &str) -> Subraster {
        let font = BuiltinFont::new();
        let mut ctx = RenderContext::new(&font, RenderSettings::default());
        rasterize(expression, NORMALSIZE, &mut ctx).unwrap().unwrap()
    }

    fn cell(width: usize) -> CellSize {
        CellSize { width, above: 10, below: 2 }
    }

    #[test]
    fn preamble_grammar() {
        let preamble = ArrayPreamble::parse("l|c5 G4r. C20+");
        assert_eq!(preamble.column(0), ColumnSpec { justify: Justify::Left, ..ColumnSpec::default() });
        assert_eq!(preamble.column(1), ColumnSpec {
            justify: Justify::Center,
            width: Some(5),
            rule_before: LineStyle::Solid,
            gap: None,
        });
        assert_eq!(preamble.column(2), ColumnSpec {
            justify: Justify::Right,
            gap: Some(4),
            ..ColumnSpec::default()
        });
        assert_eq!(preamble.column(3), ColumnSpec::default());
        assert_eq!(preamble.rule_after, LineStyle::Dashed);
        assert_eq!(preamble.row(0), RowSpec { align: RowAlign::Center, height: Some(20) });
        assert_eq!(preamble.row(7), preamble.row(0));
    }

    #[test]
    fn propagated_columns() {
        let preamble = ArrayPreamble::parse("lr+");
        assert_eq!(preamble.column(5).justify, Justify::Right);
        let preamble = ArrayPreamble::parse("lr");
        assert_eq!(preamble.column(5).justify, Justify::Center);
    }

    #[test]
    fn columns_take_their_widest_cell() {
        let cells = vec![vec![cell(10), cell(5)], vec![cell(20), cell(30)]];
        let layout = ArrayLayout::new(&cells, &ArrayPreamble::default(), &[], 6, 3);
        assert_eq!(layout.col_widths, vec![20, 30]);
        assert_eq!(layout.col_lefts, vec![0, 26]);
        assert_eq!(layout.width, 56);
        assert_eq!(layout.row_tops, vec![0, 15]);
        assert_eq!(layout.height, 27);
        assert!(layout.vrules.is_empty() && layout.hrules.is_empty());

        // centered by default
        assert_eq!(layout.place(&ArrayPreamble::default(), 0, 0, cell(10)), (0, 5));
        assert_eq!(layout.place(&ArrayPreamble::default(), 1, 1, cell(30)), (15, 26));
    }

    #[test]
    fn rules_reserve_margins() {
        let cells = vec![vec![cell(10), cell(5)], vec![cell(20), cell(30)]];
        let preamble = ArrayPreamble::parse("|c|c|");
        let hlines = [LineStyle::Solid, LineStyle::None, LineStyle::Dashed];
        let layout = ArrayLayout::new(&cells, &preamble, &hlines, 6, 3);
        assert_eq!(layout.col_lefts, vec![VLINE_MARGIN, VLINE_MARGIN + 20 + 6 + VLINE_MARGIN]);
        assert_eq!(layout.width, layout.col_lefts[1] + 30 + VLINE_MARGIN);
        assert_eq!(layout.vrules.len(), 3);
        assert_eq!(layout.vrules[0], (1, LineStyle::Solid));
        assert_eq!(layout.hrules, vec![(1, LineStyle::Solid), (layout.height - 1, LineStyle::Dashed)]);
    }

    #[test]
    fn justification_and_row_modes() {
        let cells = vec![vec![CellSize { width: 4, above: 4, below: 0 }, CellSize { width: 10, above: 12, below: 4 }]];
        let preamble = ArrayPreamble::parse("rl C");
        let layout = ArrayLayout::new(&cells, &preamble, &[], 2, 2);
        assert_eq!(layout.col_widths, vec![4, 10]);
        assert_eq!(layout.row_heights, vec![16]);
        // centered: (16 - 4) / 2
        assert_eq!(layout.place(&preamble, 0, 0, cells[0][0]), (6, 0));

        let baseline = ArrayPreamble::parse("r10l");
        let layout = ArrayLayout::new(&cells, &baseline, &[], 2, 2);
        assert_eq!(layout.col_widths, vec![10, 10]);
        assert_eq!(layout.place(&baseline, 0, 0, cells[0][0]), (8, 6));
    }

    #[test]
    fn hlines_are_stripped() {
        assert_eq!(strip_hlines(r" \hline a"), (LineStyle::Solid, "a"));
        assert_eq!(strip_hlines(r"\hdash\hline b"), (LineStyle::Solid, "b"));
        assert_eq!(strip_hlines("c"), (LineStyle::None, "c"));
        assert_eq!(strip_trailing_hline(r"d \hline "), (LineStyle::Solid, "d "));
    }

    #[test]
    fn matrix_has_no_rules() {
        let matrix = render(r"\begin{matrix}a&a\\a&a\end{matrix}");
        let a = render("a");
        // two glyph columns 9 pixels apart, two glyph rows 3 pixels apart
        assert_eq!(matrix.width(), 2 * a.width() + 9);
        assert_eq!(matrix.height(), 2 * a.height() + 3);
        let full_rows = (0 .. matrix.height())
            .filter(|&row| (0 .. matrix.width()).all(|col| matrix.raster.is_set(row as isize, col as isize)))
            .count();
        assert_eq!(full_rows, 0);
    }

    #[test]
    fn hline_draws_across() {
        let array = render(r"\begin{array}{c}a\\\hline b\end{array}");
        let full_rows = (0 .. array.height())
            .filter(|&row| (0 .. array.width()).all(|col| array.raster.is_set(row as isize, col as isize)))
            .count();
        assert!(full_rows >= 1);
    }

    #[test]
    fn delimited_matrices() {
        let plain = render(r"\begin{matrix}a&b\\c&d\end{matrix}");
        let parens = render(r"\begin{pmatrix}a&b\\c&d\end{pmatrix}");
        assert!(parens.width() > plain.width());
        assert!(parens.height() >= plain.height());
        let cases = render(r"\begin{cases}1 & x\\0 & y\end{cases}");
        assert!(cases.width() > 0);
    }

    #[test]
    fn unmatched_begin_renders_the_rest() {
        let unmatched = render(r"\begin{matrix}a");
        assert_eq!(unmatched.width(), render("a").width());
    }

    #[test]
    fn array_command_with_preamble() {
        let array = render(r"\array[l|r]{1&2\\3&4}");
        let matrix = render(r"\begin{matrix}1&2\\3&4\end{matrix}");
        assert_eq!(array.width(), matrix.width() + VLINE_MARGIN);
    }
}
