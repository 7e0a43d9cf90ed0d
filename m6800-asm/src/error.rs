//! Error handling for the 6800 assembler.
//!
//! Assembly errors are line-scoped and accumulated across the whole source
//! file: the assembler keeps going after an error so that a single run
//! reports as many diagnostics as possible.

use std::fmt;
use thiserror::Error;

/// Result type for assembly operations.
pub type AsmResult<T> = Result<T, AsmError>;

/// Errors produced while assembling 6800 source.
///
/// Every variant that originates from a source line carries its 1-based line
/// number; the `Display` form is the user-visible `line N: ...` message.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AsmError {
	/// Malformed `$`, `%`, or decimal literal.
	#[error("line {line}: bad number literal '{text}' (expected $hex, %binary, or decimal)")]
	BadNumberLiteral {
		line: usize,
		text: String,
	},

	/// Operand text does not match any addressing-mode surface form.
	#[error("line {line}: malformed operand '{text}'")]
	MalformedOperand {
		line: usize,
		text: String,
	},

	/// Mnemonic is not in the opcode table.
	#[error("line {line}: unknown mnemonic '{name}'")]
	UnknownMnemonic {
		line: usize,
		name: String,
	},

	/// Mnemonic exists but has no encoding for the inferred addressing mode.
	#[error("line {line}: {mnemonic} does not support {mode} addressing")]
	UnsupportedMode {
		line: usize,
		mnemonic: String,
		mode: String,
	},

	/// Directive-looking token that is not a known pseudo-op.
	#[error("line {line}: unknown pseudo-op '{name}'")]
	UnknownPseudoOp {
		line: usize,
		name: String,
	},

	/// Label token that is not a valid identifier.
	#[error("line {line}: invalid label '{name}'")]
	BadLabel {
		line: usize,
		name: String,
	},

	/// Symbol defined more than once.
	#[error("line {line}: duplicate symbol '{name}' (first defined at line {first_line})")]
	DuplicateSymbol {
		line: usize,
		name: String,
		first_line: usize,
	},

	/// Reference to a symbol that is never defined.
	#[error("line {line}: undefined symbol '{name}'")]
	UndefinedSymbol {
		line: usize,
		name: String,
	},

	/// Operand value does not fit the width of the addressing mode.
	#[error("line {line}: value {value} out of range for {mode} operand (0..={max})")]
	OperandOutOfRange {
		line: usize,
		mode: String,
		value: i32,
		max: u32,
	},

	/// Relative branch displacement outside `[-128, 127]`.
	#[error("line {line}: branch target ${target:04X} out of range (displacement {displacement})")]
	BranchOutOfRange {
		line: usize,
		target: u16,
		displacement: i32,
	},

	/// Pseudo-op misuse that has no more specific kind.
	#[error("line {line}: {message}")]
	Directive {
		line: usize,
		message: String,
	},

	/// I/O failure while reading source or writing output.
	#[error("I/O error: {message}")]
	Io {
		message: String,
	},

	/// Multiple errors collected during assembly.
	#[error("assembly failed with {} errors", errors.len())]
	Multiple {
		errors: Vec<AsmError>,
	},
}

impl AsmError {
	/// Create a bad-number-literal error.
	pub fn bad_number(line: usize, text: impl Into<String>) -> Self {
		Self::BadNumberLiteral {
			line,
			text: text.into(),
		}
	}

	/// Create a malformed-operand error.
	pub fn malformed_operand(line: usize, text: impl Into<String>) -> Self {
		Self::MalformedOperand {
			line,
			text: text.into(),
		}
	}

	/// Create an unknown-mnemonic error.
	pub fn unknown_mnemonic(line: usize, name: impl Into<String>) -> Self {
		Self::UnknownMnemonic {
			line,
			name: name.into(),
		}
	}

	/// Create an unsupported-mode error.
	pub fn unsupported_mode(
		line: usize,
		mnemonic: impl Into<String>,
		mode: impl Into<String>,
	) -> Self {
		Self::UnsupportedMode {
			line,
			mnemonic: mnemonic.into(),
			mode: mode.into(),
		}
	}

	/// Create a directive-misuse error.
	pub fn directive(line: usize, message: impl Into<String>) -> Self {
		Self::Directive {
			line,
			message: message.into(),
		}
	}

	/// Get the source line this error is scoped to, if any.
	pub fn line(&self) -> Option<usize> {
		match self {
			Self::BadNumberLiteral {
				line, ..
			}
			| Self::MalformedOperand {
				line, ..
			}
			| Self::UnknownMnemonic {
				line, ..
			}
			| Self::UnsupportedMode {
				line, ..
			}
			| Self::UnknownPseudoOp {
				line, ..
			}
			| Self::BadLabel {
				line, ..
			}
			| Self::DuplicateSymbol {
				line, ..
			}
			| Self::UndefinedSymbol {
				line, ..
			}
			| Self::OperandOutOfRange {
				line, ..
			}
			| Self::BranchOutOfRange {
				line, ..
			}
			| Self::Directive {
				line, ..
			} => Some(*line),
			Self::Io {
				..
			}
			| Self::Multiple {
				..
			} => None,
		}
	}

	/// Combine a list of errors into a single error value.
	pub fn multiple(errors: Vec<AsmError>) -> Self {
		if errors.len() == 1 {
			errors.into_iter().next().unwrap()
		} else {
			Self::Multiple {
				errors,
			}
		}
	}
}

impl From<std::io::Error> for AsmError {
	fn from(error: std::io::Error) -> Self {
		Self::Io {
			message: error.to_string(),
		}
	}
}

/// A non-fatal diagnostic attached to a source line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Warning {
	/// 1-based source line number.
	pub line: usize,
	/// Human-readable message.
	pub message: String,
}

impl Warning {
	/// Create a new warning.
	pub fn new(line: usize, message: impl Into<String>) -> Self {
		Self {
			line,
			message: message.into(),
		}
	}
}

impl fmt::Display for Warning {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "line {}: warning: {}", self.line, self.message)
	}
}

/// Collector for gathering per-line errors across both passes.
#[derive(Debug, Default)]
pub struct ErrorCollector {
	errors: Vec<AsmError>,
	warnings: Vec<Warning>,
}

impl ErrorCollector {
	/// Create a new empty collector.
	pub fn new() -> Self {
		Self::default()
	}

	/// Record an error.
	pub fn add(&mut self, error: AsmError) {
		log::debug!("collected: {error}");
		self.errors.push(error);
	}

	/// Record a warning.
	pub fn warn(&mut self, warning: Warning) {
		log::debug!("collected: {warning}");
		self.warnings.push(warning);
	}

	/// Check whether any errors were recorded.
	pub fn has_errors(&self) -> bool {
		!self.errors.is_empty()
	}

	/// Number of errors recorded so far.
	pub fn len(&self) -> usize {
		self.errors.len()
	}

	/// Check if the collector holds no errors.
	pub fn is_empty(&self) -> bool {
		self.errors.is_empty()
	}

	/// All recorded errors, in source order.
	pub fn errors(&self) -> &[AsmError] {
		&self.errors
	}

	/// All recorded warnings, in source order.
	pub fn warnings(&self) -> &[Warning] {
		&self.warnings
	}

	/// Consume the collector, yielding its errors and warnings.
	pub fn into_parts(self) -> (Vec<AsmError>, Vec<Warning>) {
		(self.errors, self.warnings)
	}

	/// Convert to a result, failing if any errors were collected.
	pub fn into_result<T>(self, value: T) -> AsmResult<T> {
		if self.errors.is_empty() {
			Ok(value)
		} else {
			Err(AsmError::multiple(self.errors))
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_error_display_carries_line() {
		let err = AsmError::unknown_mnemonic(12, "FROB");
		assert_eq!(err.to_string(), "line 12: unknown mnemonic 'FROB'");
		assert_eq!(err.line(), Some(12));
	}

	#[test]
	fn test_range_error_display() {
		let err = AsmError::OperandOutOfRange {
			line: 3,
			mode: "immediate".to_string(),
			value: 300,
			max: 255,
		};
		assert_eq!(err.to_string(), "line 3: value 300 out of range for immediate operand (0..=255)");
	}

	#[test]
	fn test_collector_accumulates() {
		let mut collector = ErrorCollector::new();
		assert!(collector.is_empty());

		collector.add(AsmError::unknown_mnemonic(1, "XYZ"));
		collector.add(AsmError::UndefinedSymbol {
			line: 2,
			name: "TARGET".to_string(),
		});
		collector.warn(Warning::new(9, "code after END"));

		assert_eq!(collector.len(), 2);
		assert_eq!(collector.warnings().len(), 1);

		let result: AsmResult<()> = collector.into_result(());
		assert!(matches!(result, Err(AsmError::Multiple { .. })));
	}

	#[test]
	fn test_multiple_collapses_single() {
		let err = AsmError::multiple(vec![AsmError::unknown_mnemonic(1, "XYZ")]);
		assert!(matches!(err, AsmError::UnknownMnemonic { .. }));
	}
}
