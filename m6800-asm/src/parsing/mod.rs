//! Source parsing for the 6800 assembly dialect.
//!
//! The dialect is line-oriented: each physical line is
//! `[LABEL[:]] (MNEMONIC | PSEUDO) [OPERAND] [; COMMENT]`. The lexer turns a
//! physical line into a [`SourceLine`]; operand surface forms are classified
//! by the [`operand`] module.

pub mod lexer;
pub mod operand;

use std::fmt;

use crate::error::AsmResult;
use crate::instructions::Mnemonic;

pub use lexer::lex_line;
pub use operand::{Operand, Value, parse_literal};

/// Pseudo-instructions understood by the assembler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PseudoOp {
	/// Set the location counter
	Org,
	/// Define a symbol from an expression (label mandatory)
	Equ,
	/// Emit constant bytes
	Fcb,
	/// Emit constant words, big-endian
	Fdb,
	/// End of source; later lines only warn
	End,
}

impl PseudoOp {
	/// Parse a pseudo-op keyword, case-insensitively.
	///
	/// A leading `.` is accepted (`.ORG` means `ORG`); the caller is
	/// responsible for turning an unknown dotted keyword into
	/// [`AsmError::UnknownPseudoOp`].
	pub fn parse(s: &str) -> Option<Self> {
		let name = s.strip_prefix('.').unwrap_or(s);
		match name.to_ascii_uppercase().as_str() {
			"ORG" => Some(Self::Org),
			"EQU" => Some(Self::Equ),
			"FCB" => Some(Self::Fcb),
			"FDB" => Some(Self::Fdb),
			"END" => Some(Self::End),
			_ => None,
		}
	}
}

impl fmt::Display for PseudoOp {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let name = match self {
			Self::Org => "ORG",
			Self::Equ => "EQU",
			Self::Fcb => "FCB",
			Self::Fdb => "FDB",
			Self::End => "END",
		};
		write!(f, "{}", name)
	}
}

/// The executable payload of a source line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineBody {
	/// Blank or comment-only line
	Empty,
	/// A CPU instruction
	Instruction {
		/// Canonical mnemonic, accumulator forms already folded
		mnemonic: Mnemonic,
		/// Classified operand surface form
		operand: Operand,
	},
	/// An assembler directive
	Pseudo {
		/// Directive keyword
		op: PseudoOp,
		/// Comma-separated operand values
		args: Vec<Value>,
	},
}

/// One lexed line of source, never mutated after lexing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLine {
	/// The original text, untrimmed
	pub raw_text: String,
	/// 1-based line number
	pub line_number: usize,
	/// Label defined on this line, if any
	pub label: Option<String>,
	/// Instruction, pseudo-op, or nothing
	pub body: LineBody,
	/// Comment text after `;`, if any
	pub comment: Option<String>,
}

/// Lex an entire source text into lines.
///
/// Stops at nothing: a line that fails to lex is returned as the `Err` arm
/// for that slot so the caller can collect the error and keep going.
pub fn parse_source(source: &str) -> Vec<AsmResult<SourceLine>> {
	source
		.lines()
		.enumerate()
		.map(|(index, text)| lex_line(text, index + 1))
		.collect()
}

/// Check that a name is a valid identifier: leading alphabetic or `_`,
/// then alphanumerics or `_`.
pub fn is_identifier(name: &str) -> bool {
	let mut chars = name.chars();
	match chars.next() {
		Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
		_ => return false,
	}
	chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::error::AsmError;

	#[test]
	fn test_pseudo_op_parse() {
		assert_eq!(PseudoOp::parse("ORG"), Some(PseudoOp::Org));
		assert_eq!(PseudoOp::parse("org"), Some(PseudoOp::Org));
		assert_eq!(PseudoOp::parse(".FCB"), Some(PseudoOp::Fcb));
		assert_eq!(PseudoOp::parse("END"), Some(PseudoOp::End));
		assert_eq!(PseudoOp::parse("DB"), None);
	}

	#[test]
	fn test_is_identifier() {
		assert!(is_identifier("LOOP"));
		assert!(is_identifier("_tmp"));
		assert!(is_identifier("A1_B2"));
		assert!(!is_identifier("1ABC"));
		assert!(!is_identifier(""));
		assert!(!is_identifier("X+Y"));
	}

	#[test]
	fn test_parse_source_counts_lines() {
		let lines = parse_source("NOP\n\nNOP\n");
		assert_eq!(lines.len(), 3);
		let second = lines[1].as_ref().unwrap();
		assert_eq!(second.line_number, 2);
		assert_eq!(second.body, LineBody::Empty);
	}

	#[test]
	fn test_parse_source_keeps_going_past_errors() {
		let lines = parse_source("FROB #1\nNOP\n");
		assert!(matches!(lines[0], Err(AsmError::UnknownMnemonic { .. })));
		assert!(lines[1].is_ok());
	}
}
