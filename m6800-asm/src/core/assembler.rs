//! The two-pass assembler engine.
//!
//! Pass one assigns addresses and collects symbols, the symbol table freezes,
//! pass two encodes. Errors from both passes are accumulated rather than
//! aborting, so one run yields the full diagnostic list.

use std::path::Path;

use crate::config::Config;
use crate::core::pass1::{AssemblyLine, assign_addresses};
use crate::core::pass2::encode;
use crate::core::program::Program;
use crate::error::{AsmError, AsmResult, ErrorCollector, Warning};
use crate::symbols::SymbolTable;

/// Counters describing one assembly run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AssemblyStats {
	/// Physical source lines processed
	pub lines: usize,
	/// Symbols defined
	pub symbols: usize,
	/// Machine-code bytes emitted
	pub bytes: usize,
	/// Errors collected across both passes
	pub errors: usize,
}

/// Everything one assembly run produces.
///
/// The program is present even when errors were collected (maximising
/// diagnostic yield), but must be treated as invalid unless [`Assembly::is_ok`].
#[derive(Debug)]
pub struct Assembly {
	/// Per-line results, in source order
	pub lines: Vec<AssemblyLine>,
	/// The frozen symbol table
	pub symbols: SymbolTable,
	/// Encoded segments and entry address
	pub program: Program,
	/// Collected errors, in source order
	pub errors: Vec<AsmError>,
	/// Collected warnings, in source order
	pub warnings: Vec<Warning>,
}

impl Assembly {
	/// Check whether assembly succeeded without errors.
	pub fn is_ok(&self) -> bool {
		self.errors.is_empty()
	}

	/// Run statistics.
	pub fn stats(&self) -> AssemblyStats {
		AssemblyStats {
			lines: self.lines.len(),
			symbols: self.symbols.len(),
			bytes: self.program.len(),
			errors: self.errors.len(),
		}
	}

	/// Convert into the program, failing when any error was collected.
	pub fn into_result(self) -> AsmResult<Program> {
		if self.errors.is_empty() {
			Ok(self.program)
		} else {
			Err(AsmError::multiple(self.errors))
		}
	}
}

/// The assembler engine.
#[derive(Debug, Default)]
pub struct Assembler {
	config: Config,
}

impl Assembler {
	/// Create an assembler with the given configuration.
	#[must_use]
	pub fn new(config: Config) -> Self {
		Self {
			config,
		}
	}

	/// The active configuration.
	pub fn config(&self) -> &Config {
		&self.config
	}

	/// Assemble source text.
	pub fn assemble_source(&self, source: &str) -> Assembly {
		let mut symbols = SymbolTable::new();
		let mut errors = ErrorCollector::new();

		log::debug!("pass one starting ({} bytes of source)", source.len());
		let pass1 = assign_addresses(source, &mut symbols, &mut errors);

		log::debug!("pass two starting (entry ${:04X})", pass1.entry_address);
		let mut lines = pass1.lines;
		let program = encode(&mut lines, &symbols, pass1.entry_address, &mut errors);

		let (errors, warnings) = errors.into_parts();
		Assembly {
			lines,
			symbols,
			program,
			errors,
			warnings,
		}
	}

	/// Assemble a source file from disk.
	pub fn assemble_file(&self, path: &Path) -> AsmResult<Assembly> {
		let source = std::fs::read_to_string(path)?;
		Ok(self.assemble_source(&source))
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_assemble_source_ok() {
		let assembler = Assembler::default();
		let assembly = assembler.assemble_source("ORG $1000\nNOP\nEND\n");

		assert!(assembly.is_ok());
		assert_eq!(assembly.program.entry_address, 0x1000);
		assert_eq!(assembly.stats().bytes, 1);
		assert!(assembly.into_result().is_ok());
	}

	#[test]
	fn test_errors_do_not_stop_pass_two() {
		let assembler = Assembler::default();
		// Line 1 fails, lines 2-3 still assemble and resolve.
		let assembly = assembler.assemble_source("LDA #$999\nHERE NOP\nJMP HERE\n");

		assert_eq!(assembly.errors.len(), 1);
		assert_eq!(assembly.lines[2].machine_code, [0x7E, 0x00, 0x02]);
		assert!(assembly.into_result().is_err());
	}

	#[test]
	fn test_idempotent_output() {
		let assembler = Assembler::default();
		let source = "ORG $0200\nSTART LDX #$2000\nLOOP STA 0,X\nINX\nBNE LOOP\nSWI\nEND\n";

		let first = assembler.assemble_source(source);
		let second = assembler.assemble_source(source);

		assert!(first.is_ok());
		assert_eq!(first.program, second.program);
		let names: Vec<_> = first.symbols.iter().map(|s| (s.name.clone(), s.value)).collect();
		let names2: Vec<_> = second.symbols.iter().map(|s| (s.name.clone(), s.value)).collect();
		assert_eq!(names, names2);
	}
}
