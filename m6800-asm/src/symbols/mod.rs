//! Symbol table for labels and EQU constants.
//!
//! Names are stored as declared but matched case-insensitively, so `loop`
//! and `LOOP` are the same symbol. Redefinition is an error. The table is
//! populated by pass one and frozen before pass two reads it.

use std::collections::HashMap;

use serde::Serialize;

use crate::error::{AsmError, AsmResult};

/// One defined symbol.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SymbolEntry {
	/// Name as written in the source
	pub name: String,
	/// 16-bit value (an address for labels, arbitrary for EQU)
	pub value: u16,
	/// 1-based line of the defining occurrence
	pub defined_at_line: usize,
}

/// Name -> value mapping with duplicate detection.
#[derive(Debug, Default)]
pub struct SymbolTable {
	/// Entries in definition order
	entries: Vec<SymbolEntry>,
	/// Uppercased name -> index into `entries`
	index: HashMap<String, usize>,
}

impl SymbolTable {
	/// Create an empty table.
	pub fn new() -> Self {
		Self::default()
	}

	/// Define a symbol, failing on redefinition.
	pub fn define(&mut self, name: &str, value: u16, line: usize) -> AsmResult<()> {
		let key = name.to_ascii_uppercase();
		if let Some(&existing) = self.index.get(&key) {
			return Err(AsmError::DuplicateSymbol {
				line,
				name: name.to_string(),
				first_line: self.entries[existing].defined_at_line,
			});
		}
		log::trace!("symbol {name} = ${value:04X} (line {line})");
		self.index.insert(key, self.entries.len());
		self.entries.push(SymbolEntry {
			name: name.to_string(),
			value,
			defined_at_line: line,
		});
		Ok(())
	}

	/// Look up a symbol's value, case-insensitively.
	pub fn lookup(&self, name: &str) -> Option<u16> {
		self.get(name).map(|entry| entry.value)
	}

	/// Look up a symbol, failing with `UndefinedSymbol` scoped to `line`.
	pub fn resolve(&self, name: &str, line: usize) -> AsmResult<u16> {
		self.lookup(name).ok_or_else(|| AsmError::UndefinedSymbol {
			line,
			name: name.to_string(),
		})
	}

	/// Full entry for a symbol, if defined.
	pub fn get(&self, name: &str) -> Option<&SymbolEntry> {
		let key = name.to_ascii_uppercase();
		self.index.get(&key).map(|&i| &self.entries[i])
	}

	/// Check whether a symbol is defined.
	pub fn contains(&self, name: &str) -> bool {
		self.index.contains_key(&name.to_ascii_uppercase())
	}

	/// Number of defined symbols.
	pub fn len(&self) -> usize {
		self.entries.len()
	}

	/// Check if the table is empty.
	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	/// Iterate entries in definition order.
	pub fn iter(&self) -> impl Iterator<Item = &SymbolEntry> {
		self.entries.iter()
	}
}
