//! Configuration for the assembler and its companion tools.
//!
//! A `Config` can be built programmatically through the `with_*` methods or
//! loaded from a TOML project file; unspecified sections fall back to their
//! defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{AsmError, AsmResult};

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
	/// Input settings
	pub input: InputConfig,
	/// Output settings
	pub output: OutputConfig,
	/// Assembly behaviour
	pub assembly: AssemblyConfig,
	/// Simulation behaviour (used by the runner)
	pub simulation: SimulationConfig,
	/// Diagnostics
	pub debug: DebugConfig,
}

/// Input file settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
	/// Main assembly source file
	pub source_file: Option<PathBuf>,
}

/// Output file settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
	/// Object file path; derived from the source name when absent
	pub object_file: Option<PathBuf>,
	/// Object file format
	pub format: OutputFormat,
	/// Listing file path, written when present
	pub listing_file: Option<PathBuf>,
	/// Symbol export path, written when present
	pub symbol_file: Option<PathBuf>,
}

/// Object file formats.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OutputFormat {
	/// Raw memory image from the lowest to the highest emitted address,
	/// gaps zero-filled
	#[default]
	Binary,
	/// Intel HEX records
	IntelHex,
}

/// Assembly behaviour settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AssemblyConfig {
	/// Treat warnings as errors
	pub warnings_as_errors: bool,
}

impl Default for AssemblyConfig {
	fn default() -> Self {
		Self {
			warnings_as_errors: false,
		}
	}
}

/// Simulation settings consumed by the runner.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
	/// Runaway-instruction cap for `run()`
	pub instruction_limit: u64,
	/// Breakpoint addresses armed before the first step
	pub breakpoints: Vec<u16>,
}

impl Default for SimulationConfig {
	fn default() -> Self {
		Self {
			instruction_limit: 1_000_000,
			breakpoints: Vec::new(),
		}
	}
}

/// Diagnostic settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DebugConfig {
	/// Verbosity level (0 = errors only)
	pub verbose: u8,
	/// Print each executed instruction while running
	pub trace_execution: bool,
}

impl Config {
	/// Create a default configuration.
	pub fn new() -> Self {
		Self::default()
	}

	/// Load configuration from a TOML file.
	pub fn from_toml_file(path: &Path) -> AsmResult<Self> {
		let text = std::fs::read_to_string(path)?;
		toml::from_str(&text).map_err(|e| AsmError::Io {
			message: format!("{}: {e}", path.display()),
		})
	}

	/// Set the source file.
	#[must_use]
	pub fn with_source_file(mut self, path: PathBuf) -> Self {
		self.input.source_file = Some(path);
		self
	}

	/// Set the object file path.
	#[must_use]
	pub fn with_object_file(mut self, path: PathBuf) -> Self {
		self.output.object_file = Some(path);
		self
	}

	/// Set the object file format.
	#[must_use]
	pub fn with_format(mut self, format: OutputFormat) -> Self {
		self.output.format = format;
		self
	}

	/// Enable listing output.
	#[must_use]
	pub fn with_listing(mut self, path: PathBuf) -> Self {
		self.output.listing_file = Some(path);
		self
	}

	/// Enable symbol export.
	#[must_use]
	pub fn with_symbol_export(mut self, path: PathBuf) -> Self {
		self.output.symbol_file = Some(path);
		self
	}

	/// Set the simulator's instruction cap.
	#[must_use]
	pub fn with_instruction_limit(mut self, limit: u64) -> Self {
		self.simulation.instruction_limit = limit;
		self
	}

	/// The object file path, derived from the source when not set.
	pub fn object_path(&self) -> Option<PathBuf> {
		if let Some(path) = &self.output.object_file {
			return Some(path.clone());
		}
		let mut path = self.input.source_file.clone()?;
		path.set_extension(match self.output.format {
			OutputFormat::Binary => "bin",
			OutputFormat::IntelHex => "hex",
		});
		Some(path)
	}
}
