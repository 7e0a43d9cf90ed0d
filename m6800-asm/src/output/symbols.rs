//! Symbol table export for debuggers.
//!
//! Symbols are dumped as a JSON array in definition order, each with its
//! declared name, value, and defining line.

use std::io::Write;

use crate::error::{AsmError, AsmResult};
use crate::symbols::{SymbolEntry, SymbolTable};

/// Render the symbol table as pretty-printed JSON.
pub fn to_json(table: &SymbolTable) -> AsmResult<String> {
	let entries: Vec<&SymbolEntry> = table.iter().collect();
	serde_json::to_string_pretty(&entries).map_err(|e| AsmError::Io {
		message: e.to_string(),
	})
}

/// Write the symbol export to a stream.
pub fn write_json<W: Write>(table: &SymbolTable, writer: &mut W) -> AsmResult<()> {
	writer.write_all(to_json(table)?.as_bytes())?;
	writer.write_all(b"\n")?;
	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_json_round_trip() {
		let mut table = SymbolTable::new();
		table.define("START", 0x1000, 2).unwrap();
		table.define("LIMIT", 0x0B, 1).unwrap();

		let json = to_json(&table).unwrap();
		let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
		assert_eq!(parsed[0]["name"], "START");
		assert_eq!(parsed[0]["value"], 0x1000);
		assert_eq!(parsed[1]["defined_at_line"], 1);
	}
}
