//! Pass two: opcode and operand encoding.
//!
//! Runs over the address-assigned lines with the symbol table frozen,
//! resolving identifiers and emitting machine code. Pass two always runs,
//! even when pass one collected errors, so one assembly reports every
//! diagnostic it can; the program is only considered valid when the error
//! count is zero.

use crate::core::pass1::AssemblyLine;
use crate::core::program::Program;
use crate::error::{AsmError, AsmResult, ErrorCollector, Warning};
use crate::instructions::{AddressingMode, lookup};
use crate::parsing::{LineBody, PseudoOp, Value};
use crate::symbols::SymbolTable;

/// Resolve a value to its numeric form against the frozen symbol table.
fn resolve(value: &Value, symbols: &SymbolTable, line: usize) -> AsmResult<i32> {
	match value {
		Value::Literal(v) => Ok(*v),
		Value::Symbol(name) => Ok(i32::from(symbols.resolve(name, line)?)),
	}
}

/// Range-check and fold a value into a byte.
///
/// Data and immediate operands accept small negatives and store their two's
/// complement; address operands are strictly unsigned.
fn fold_byte(value: i32, line: usize, mode: &str, signed_ok: bool) -> AsmResult<u8> {
	let min = if signed_ok {
		-128
	} else {
		0
	};
	if value < min || value > 0xFF {
		return Err(AsmError::OperandOutOfRange {
			line,
			mode: mode.to_string(),
			value,
			max: 0xFF,
		});
	}
	Ok((value & 0xFF) as u8)
}

/// Range-check and fold a value into a word.
fn fold_word(value: i32, line: usize, mode: &str, signed_ok: bool) -> AsmResult<u16> {
	let min = if signed_ok {
		-0x8000
	} else {
		0
	};
	if value < min || value > 0xFFFF {
		return Err(AsmError::OperandOutOfRange {
			line,
			mode: mode.to_string(),
			value,
			max: 0xFFFF,
		});
	}
	Ok((value & 0xFFFF) as u16)
}

/// Encode one instruction line; `machine_code` is left empty on error.
fn encode_instruction(
	line: &mut AssemblyLine,
	symbols: &SymbolTable,
) -> AsmResult<()> {
	let LineBody::Instruction {
		mnemonic,
		operand,
	} = &line.source.body
	else {
		return Ok(());
	};
	let number = line.source.line_number;
	let Some(mode) = line.mode else {
		return Ok(());
	};
	// Pass one already reported unsupported pairs.
	let Some(entry) = lookup(*mnemonic, mode) else {
		return Ok(());
	};

	let mut bytes = vec![entry.opcode];
	match mode {
		AddressingMode::Inherent | AddressingMode::Accumulator => {}
		AddressingMode::Immediate => {
			let value = resolve(operand.value().unwrap(), symbols, number)?;
			if entry.size == 3 {
				let word = fold_word(value, number, "immediate", true)?;
				bytes.extend_from_slice(&word.to_be_bytes());
				line.resolved_operand = Some(word);
			} else {
				let byte = fold_byte(value, number, "immediate", true)?;
				bytes.push(byte);
				line.resolved_operand = Some(u16::from(byte));
			}
		}
		AddressingMode::Direct => {
			let value = resolve(operand.value().unwrap(), symbols, number)?;
			let byte = fold_byte(value, number, "direct", false)?;
			bytes.push(byte);
			line.resolved_operand = Some(u16::from(byte));
		}
		AddressingMode::Extended => {
			let value = resolve(operand.value().unwrap(), symbols, number)?;
			let word = fold_word(value, number, "extended", false)?;
			bytes.extend_from_slice(&word.to_be_bytes());
			line.resolved_operand = Some(word);
		}
		AddressingMode::Indexed => {
			let value = resolve(operand.value().unwrap(), symbols, number)?;
			let byte = fold_byte(value, number, "indexed", false)?;
			bytes.push(byte);
			line.resolved_operand = Some(u16::from(byte));
		}
		AddressingMode::Relative => {
			let value = resolve(operand.value().unwrap(), symbols, number)?;
			let target = fold_word(value, number, "relative", false)?;
			let displacement =
				i32::from(target) - (i32::from(line.address) + i32::from(entry.size));
			if !(-128..=127).contains(&displacement) {
				return Err(AsmError::BranchOutOfRange {
					line: number,
					target,
					displacement,
				});
			}
			bytes.push(displacement as u8);
			line.resolved_operand = Some(target);
		}
	}

	line.machine_code = bytes;
	debug_assert_eq!(usize::from(line.size), line.machine_code.len());
	Ok(())
}

/// Encode an FCB/FDB data line.
fn encode_data(line: &mut AssemblyLine, symbols: &SymbolTable) -> AsmResult<()> {
	// Size zero means pass one skipped this line (non-emitting directive,
	// arity error, or text after END).
	if line.size == 0 {
		return Ok(());
	}
	let LineBody::Pseudo {
		op,
		args,
	} = &line.source.body
	else {
		return Ok(());
	};
	let number = line.source.line_number;

	let mut bytes = Vec::with_capacity(usize::from(line.size));
	match op {
		PseudoOp::Fcb => {
			for arg in args {
				let value = resolve(arg, symbols, number)?;
				bytes.push(fold_byte(value, number, "FCB", true)?);
			}
		}
		PseudoOp::Fdb => {
			for arg in args {
				let value = resolve(arg, symbols, number)?;
				let word = fold_word(value, number, "FDB", true)?;
				bytes.extend_from_slice(&word.to_be_bytes());
			}
		}
		PseudoOp::Org | PseudoOp::Equ | PseudoOp::End => return Ok(()),
	}

	line.machine_code = bytes;
	Ok(())
}

/// Run the encoding pass and collect the emitted bytes into a [`Program`].
pub fn encode(
	lines: &mut [AssemblyLine],
	symbols: &SymbolTable,
	entry_address: u16,
	errors: &mut ErrorCollector,
) -> Program {
	let mut program = Program::new(entry_address);

	for line in lines.iter_mut() {
		let is_org = matches!(&line.source.body, LineBody::Pseudo {
			op: PseudoOp::Org,
			..
		});
		if is_org {
			program.break_segment();
		}

		let result = match &line.source.body {
			LineBody::Empty => Ok(()),
			LineBody::Instruction {
				..
			} => encode_instruction(line, symbols),
			LineBody::Pseudo {
				..
			} => encode_data(line, symbols),
		};
		if let Err(error) = result {
			errors.add(error);
			continue;
		}
		if line.machine_code.is_empty() {
			continue;
		}
		if program.overlaps(line.address, line.machine_code.len()) {
			errors.warn(Warning::new(
				line.source.line_number,
				format!("code at ${:04X} overlaps previously emitted bytes", line.address),
			));
		}
		program.push_bytes(line.address, &line.machine_code);
	}

	log::debug!("pass two: {} bytes emitted, {} errors", program.len(), errors.len());
	program
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::core::pass1::assign_addresses;

	fn assemble(source: &str) -> (Vec<AssemblyLine>, Program, ErrorCollector) {
		let mut symbols = SymbolTable::new();
		let mut errors = ErrorCollector::new();
		let pass1 = assign_addresses(source, &mut symbols, &mut errors);
		let mut lines = pass1.lines;
		let program = encode(&mut lines, &symbols, pass1.entry_address, &mut errors);
		(lines, program, errors)
	}

	#[test]
	fn test_counter_loop_encoding() {
		let source = "ORG $1000\nLDA #$05\nLOOP DECA\nBNE LOOP\nSWI\nEND\n";
		let (lines, program, errors) = assemble(source);

		assert!(errors.is_empty(), "{:?}", errors.errors());
		assert_eq!(lines[1].machine_code, [0x86, 0x05]);
		assert_eq!(lines[2].machine_code, [0x4A]);
		assert_eq!(lines[3].machine_code, [0x26, 0xFD]);
		assert_eq!(lines[4].machine_code, [0x3F]);

		let segments: Vec<_> = program.segments().collect();
		assert_eq!(segments, [(0x1000, [0x86, 0x05, 0x4A, 0x26, 0xFD, 0x3F].as_slice())]);
		assert_eq!(program.entry_address, 0x1000);
	}

	#[test]
	fn test_forward_reference_extended_encoding() {
		let source = "ORG $0100\nJMP TARGET\nORG $0200\nTARGET NOP\nEND\n";
		let (lines, program, errors) = assemble(source);

		assert!(errors.is_empty());
		assert_eq!(lines[1].machine_code, [0x7E, 0x02, 0x00]);
		assert_eq!(lines[3].machine_code, [0x01]);
		let segments: Vec<_> = program.segments().collect();
		assert_eq!(segments.len(), 2);
	}

	#[test]
	fn test_fcb_fdb_round_trip() {
		let source = "ORG $0500\nDATA FCB $DE,$AD\nWORD FDB $BEEF\nEND\n";
		let (lines, program, errors) = assemble(source);

		assert!(errors.is_empty());
		assert_eq!(lines[1].machine_code, [0xDE, 0xAD]);
		assert_eq!(lines[2].machine_code, [0xBE, 0xEF]);
		let segments: Vec<_> = program.segments().collect();
		assert_eq!(segments, [(0x0500, [0xDE, 0xAD, 0xBE, 0xEF].as_slice())]);
	}

	#[test]
	fn test_branch_out_of_range() {
		let source = "ORG $1000\nBEQ FAR\nORG $10D0\nFAR NOP\nEND\n";
		let (_, _, errors) = assemble(source);

		assert_eq!(errors.len(), 1);
		match &errors.errors()[0] {
			AsmError::BranchOutOfRange {
				line,
				displacement,
				..
			} => {
				assert_eq!(*line, 2);
				assert_eq!(*displacement, 0x10D0 - 0x1002);
			}
			other => panic!("expected BranchOutOfRange, got {other:?}"),
		}
	}

	#[test]
	fn test_size_matches_encoding() {
		let source = "ORG $0010\nLDX #$2000\nLDA #$01\nSTA 0,X\nINX\nCMPA #$0B\nRTS\n";
		let (lines, _, errors) = assemble(source);

		assert!(errors.is_empty());
		for line in &lines {
			if !line.machine_code.is_empty() {
				assert_eq!(usize::from(line.size), line.machine_code.len());
			}
		}
	}

	#[test]
	fn test_word_immediate_big_endian() {
		let (lines, _, errors) = assemble("LDX #$2000\n");
		assert!(errors.is_empty());
		assert_eq!(lines[0].machine_code, [0xCE, 0x20, 0x00]);
		assert_eq!(lines[0].resolved_operand, Some(0x2000));
	}

	#[test]
	fn test_immediate_range_checked() {
		let (_, _, errors) = assemble("LDA #$1FF\n");
		assert!(matches!(errors.errors()[0], AsmError::OperandOutOfRange { .. }));
	}

	#[test]
	fn test_negative_data_folds() {
		let (lines, _, errors) = assemble("FCB -1,-128\n");
		assert!(errors.is_empty());
		assert_eq!(lines[0].machine_code, [0xFF, 0x80]);
	}

	#[test]
	fn test_undefined_symbol_reported() {
		let (_, _, errors) = assemble("JMP NOWHERE\n");
		assert!(matches!(errors.errors()[0], AsmError::UndefinedSymbol { .. }));
	}

	#[test]
	fn test_overlap_warns() {
		let source = "ORG $0100\nFCB 1,2,3,4\nORG $0102\nFCB 9\n";
		let (_, _, errors) = assemble(source);
		assert!(errors.is_empty());
		assert_eq!(errors.warnings().len(), 1);
	}
}
