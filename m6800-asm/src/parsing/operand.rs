//! Operand surface forms and numeric literals.
//!
//! The operand text decides the addressing mode: `#value` is immediate,
//! `value,X` is indexed, a lone `A` or `B` selects the accumulator form of a
//! read-modify-write mnemonic, and a bare value or label is direct, extended,
//! or relative depending on the mnemonic and the resolved value.

use std::fmt;

use crate::error::{AsmError, AsmResult};
use crate::instructions::Mnemonic;

/// A literal number or a symbol reference, resolved in pass two.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
	/// Numeric literal, already folded to its value
	Literal(i32),
	/// Identifier to be resolved against the symbol table
	Symbol(String),
}

impl fmt::Display for Value {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Literal(v) => write!(f, "{}", v),
			Self::Symbol(name) => write!(f, "{}", name),
		}
	}
}

/// Classified operand surface form of an instruction line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operand {
	/// No operand text
	None,
	/// `#value`
	Immediate(Value),
	/// `value,X`
	Indexed(Value),
	/// Lone `A` or `B`, already folded into the mnemonic
	Accumulator(char),
	/// Bare value or label; direct/extended/relative is decided by pass one
	Address(Value),
}

impl Operand {
	/// The value carried by this operand, if any.
	pub fn value(&self) -> Option<&Value> {
		match self {
			Self::Immediate(v) | Self::Indexed(v) | Self::Address(v) => Some(v),
			Self::None | Self::Accumulator(_) => None,
		}
	}
}

/// Check whether operand text starts like a number literal.
fn looks_numeric(text: &str) -> bool {
	text.starts_with('$')
		|| text.starts_with('%')
		|| text.starts_with('+')
		|| text.starts_with('-')
		|| text.starts_with(|c: char| c.is_ascii_digit())
}

/// Parse a `$hex`, `%binary`, or signed decimal literal.
///
/// Hex literals carry 1-4 digits, binary 1-16 digits; decimals accept an
/// optional leading sign. The result is range-checked against the word
/// domain (negative values down to -32768 are kept for later
/// width-dependent folding).
pub fn parse_literal(text: &str, line: usize) -> AsmResult<i32> {
	let bad = || AsmError::bad_number(line, text);

	if let Some(digits) = text.strip_prefix('$') {
		if digits.is_empty() || digits.len() > 4 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
			return Err(bad());
		}
		return i32::from_str_radix(digits, 16).map_err(|_| bad());
	}

	if let Some(digits) = text.strip_prefix('%') {
		if digits.is_empty() || digits.len() > 16 || !digits.bytes().all(|b| b == b'0' || b == b'1')
		{
			return Err(bad());
		}
		return i32::from_str_radix(digits, 2).map_err(|_| bad());
	}

	let value: i32 = text.parse().map_err(|_| bad())?;
	if !(-0x8000..=0xFFFF).contains(&value) {
		return Err(bad());
	}
	Ok(value)
}

/// Parse a literal or symbol reference.
pub fn parse_value(text: &str, line: usize) -> AsmResult<Value> {
	let text = text.trim();
	if text.is_empty() {
		return Err(AsmError::malformed_operand(line, text));
	}
	if looks_numeric(text) {
		return Ok(Value::Literal(parse_literal(text, line)?));
	}
	if super::is_identifier(text) {
		return Ok(Value::Symbol(text.to_string()));
	}
	Err(AsmError::malformed_operand(line, text))
}

/// Parse a comma-separated list of values (FCB/FDB operands).
pub fn parse_value_list(text: &str, line: usize) -> AsmResult<Vec<Value>> {
	text.split(',').map(|item| parse_value(item, line)).collect()
}

/// Classify an instruction operand and fold accumulator forms.
///
/// Returns the possibly-rewritten mnemonic (`ASL` + `A` becomes `ASLA`)
/// together with the classified operand.
pub fn parse_instruction_operand(
	mnemonic: Mnemonic,
	text: Option<&str>,
	line: usize,
) -> AsmResult<(Mnemonic, Operand)> {
	let Some(text) = text else {
		return Ok((mnemonic, Operand::None));
	};
	let text = text.trim();
	if text.is_empty() {
		return Ok((mnemonic, Operand::None));
	}

	// Lone accumulator letter selects the ASLA/ASLB-style encoding. A and B
	// stay usable as plain labels for every other mnemonic.
	if text.len() == 1 {
		let letter = text.chars().next().unwrap();
		if let Some(folded) = mnemonic.for_accumulator(letter) {
			return Ok((folded, Operand::Accumulator(letter.to_ascii_uppercase())));
		}
	}

	if let Some(rest) = text.strip_prefix('#') {
		return Ok((mnemonic, Operand::Immediate(parse_value(rest, line)?)));
	}

	if let Some((base, index)) = text.rsplit_once(',') {
		let index = index.trim();
		if !index.eq_ignore_ascii_case("X") {
			return Err(AsmError::malformed_operand(line, text));
		}
		return Ok((mnemonic, Operand::Indexed(parse_value(base, line)?)));
	}

	Ok((mnemonic, Operand::Address(parse_value(text, line)?)))
}
