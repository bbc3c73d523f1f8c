//! Tokenizing expressions.
//!
//! There is no parse tree: the layout engine pulls tokens and arguments straight from a
//! [`Lexer`] and renders them as it goes, so each construct only consumes the syntax it owns.

pub mod lexer;

pub use self::lexer::{extract_preamble, parse_number, parse_pair, split_array, LeftRight, Lexer, Preamble, Scripts, SizeChange, StyleFlag, Token};
