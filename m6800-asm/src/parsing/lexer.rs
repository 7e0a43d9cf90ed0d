//! Line lexer for the 6800 assembly dialect.
//!
//! A token in the first position is a label when it is not a known mnemonic
//! or pseudo-op keyword (or when it carries a trailing colon); this is what
//! lets both flush-left labels and flush-left instructions coexist.

use crate::error::{AsmError, AsmResult};
use crate::instructions::Mnemonic;
use crate::parsing::operand::{parse_instruction_operand, parse_value_list};
use crate::parsing::{LineBody, PseudoOp, SourceLine, is_identifier};

/// Split off the `;` comment, returning (code, comment).
fn split_comment(text: &str) -> (&str, Option<String>) {
	match text.split_once(';') {
		Some((code, comment)) => (code, Some(comment.trim().to_string())),
		None => (text, None),
	}
}

/// Split the leading token from a code fragment.
fn split_token(code: &str) -> (&str, Option<&str>) {
	match code.split_once(char::is_whitespace) {
		Some((first, rest)) => {
			let rest = rest.trim();
			(first, (!rest.is_empty()).then_some(rest))
		}
		None => (code, None),
	}
}

/// Lex one physical line into a [`SourceLine`].
pub fn lex_line(text: &str, line_number: usize) -> AsmResult<SourceLine> {
	let raw_text = text.trim_end_matches('\r').to_string();
	let (code, comment) = split_comment(&raw_text);
	let code = code.trim();

	if code.is_empty() {
		return Ok(SourceLine {
			raw_text,
			line_number,
			label: None,
			body: LineBody::Empty,
			comment,
		});
	}

	let (first, mut remainder) = split_token(code);
	let mut label = None;
	let mut keyword = Some(first);

	let is_keyword = |token: &str| {
		PseudoOp::parse(token).is_some() || Mnemonic::parse(token).is_some()
	};

	if let Some(name) = first.strip_suffix(':') {
		if !is_identifier(name) {
			return Err(AsmError::BadLabel {
				line: line_number,
				name: name.to_string(),
			});
		}
		label = Some(name.to_string());
		(keyword, remainder) = match remainder {
			Some(rest) => {
				let (next, tail) = split_token(rest);
				(Some(next), tail)
			}
			None => (None, None),
		};
	} else if !is_keyword(first) {
		if !is_identifier(first) {
			return Err(AsmError::BadLabel {
				line: line_number,
				name: first.to_string(),
			});
		}
		label = Some(first.to_string());
		(keyword, remainder) = match remainder {
			Some(rest) => {
				let (next, tail) = split_token(rest);
				(Some(next), tail)
			}
			None => (None, None),
		};
	}

	let body = match keyword {
		None => LineBody::Empty,
		Some(token) => {
			if let Some(op) = PseudoOp::parse(token) {
				let args = match remainder {
					Some(text) => parse_value_list(text, line_number)?,
					None => Vec::new(),
				};
				LineBody::Pseudo {
					op,
					args,
				}
			} else if let Some(mnemonic) = Mnemonic::parse(token) {
				let (mnemonic, operand) =
					parse_instruction_operand(mnemonic, remainder, line_number)?;
				LineBody::Instruction {
					mnemonic,
					operand,
				}
			} else if token.starts_with('.') {
				return Err(AsmError::UnknownPseudoOp {
					line: line_number,
					name: token.to_string(),
				});
			} else {
				return Err(AsmError::unknown_mnemonic(line_number, token));
			}
		}
	};

	Ok(SourceLine {
		raw_text,
		line_number,
		label,
		body,
		comment,
	})
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::parsing::operand::{Operand, Value};

	fn lex(text: &str) -> SourceLine {
		lex_line(text, 1).unwrap()
	}

	#[test]
	fn test_blank_and_comment_lines() {
		assert_eq!(lex("").body, LineBody::Empty);
		assert_eq!(lex("   \t ").body, LineBody::Empty);

		let line = lex("; just a note");
		assert_eq!(line.body, LineBody::Empty);
		assert_eq!(line.comment.as_deref(), Some("just a note"));
	}

	#[test]
	fn test_plain_instruction() {
		let line = lex("LDA #$05");
		assert_eq!(line.label, None);
		assert_eq!(line.body, LineBody::Instruction {
			mnemonic: Mnemonic::Ldaa,
			operand: Operand::Immediate(Value::Literal(5)),
		});
	}

	#[test]
	fn test_label_with_instruction() {
		let line = lex("LOOP DECA");
		assert_eq!(line.label.as_deref(), Some("LOOP"));
		assert_eq!(line.body, LineBody::Instruction {
			mnemonic: Mnemonic::Deca,
			operand: Operand::None,
		});
	}

	#[test]
	fn test_label_with_colon() {
		let line = lex("start: NOP");
		assert_eq!(line.label.as_deref(), Some("start"));
		assert!(matches!(line.body, LineBody::Instruction { .. }));

		let bare = lex("start:");
		assert_eq!(bare.label.as_deref(), Some("start"));
		assert_eq!(bare.body, LineBody::Empty);
	}

	#[test]
	fn test_label_only_line() {
		let line = lex("TARGET");
		assert_eq!(line.label.as_deref(), Some("TARGET"));
		assert_eq!(line.body, LineBody::Empty);
	}

	#[test]
	fn test_flush_left_instruction_is_not_a_label() {
		let line = lex("ORG $1000");
		assert_eq!(line.label, None);
		assert_eq!(line.body, LineBody::Pseudo {
			op: PseudoOp::Org,
			args: vec![Value::Literal(0x1000)],
		});
	}

	#[test]
	fn test_pseudo_with_label() {
		let line = lex("COUNT EQU $10");
		assert_eq!(line.label.as_deref(), Some("COUNT"));
		assert_eq!(line.body, LineBody::Pseudo {
			op: PseudoOp::Equ,
			args: vec![Value::Literal(0x10)],
		});
	}

	#[test]
	fn test_fcb_list() {
		let line = lex("DATA FCB $DE,$AD");
		assert_eq!(line.label.as_deref(), Some("DATA"));
		assert_eq!(line.body, LineBody::Pseudo {
			op: PseudoOp::Fcb,
			args: vec![Value::Literal(0xDE), Value::Literal(0xAD)],
		});
	}

	#[test]
	fn test_comment_after_operand() {
		let line = lex("LDA #$05 ; seed the counter");
		assert_eq!(line.comment.as_deref(), Some("seed the counter"));
		assert!(matches!(line.body, LineBody::Instruction { .. }));
	}

	#[test]
	fn test_unknown_mnemonic_after_label() {
		let err = lex_line("FOO BARBAZ", 7).unwrap_err();
		assert_eq!(err, AsmError::unknown_mnemonic(7, "BARBAZ"));
	}

	#[test]
	fn test_unknown_dotted_directive() {
		let err = lex_line(".BYTE 1", 3).unwrap_err();
		assert!(matches!(err, AsmError::UnknownPseudoOp { .. }));
	}

	#[test]
	fn test_bad_label() {
		let err = lex_line("1ABC NOP", 2).unwrap_err();
		assert!(matches!(err, AsmError::BadLabel { .. }));
	}
}
