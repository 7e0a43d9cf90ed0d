//! Assembly listing generation.
//!
//! One listing line per physical source line: address, emitted bytes, then
//! the original text. Pseudo-ops that emit data (FCB/FDB) show their bytes
//! just like instructions; directives and blank lines leave the byte column
//! empty.

use std::fmt::Write as FmtWrite;
use std::io::Write;

use crate::core::assembler::Assembly;
use crate::error::AsmResult;

/// Width of the byte column before the source text starts.
const BYTES_WIDTH: usize = 12;

/// Format one line of the listing.
fn format_line(address: u16, bytes: &[u8], emits: bool, source: &str) -> String {
	let mut out = String::new();
	if emits {
		write!(out, "{:04X}  ", address).unwrap();
	} else {
		out.push_str("      ");
	}

	let mut column = String::new();
	for (index, byte) in bytes.iter().enumerate() {
		if index > 0 {
			column.push(' ');
		}
		write!(column, "{}", hex::encode_upper([*byte])).unwrap();
	}
	write!(out, "{:<width$}  ", column, width = BYTES_WIDTH).unwrap();
	out.push_str(source);
	out
}

/// Render the whole listing, ending with an error/warning summary.
pub fn generate_listing(assembly: &Assembly) -> String {
	let mut out = String::new();
	for line in &assembly.lines {
		let emits = !line.machine_code.is_empty();
		out.push_str(&format_line(
			line.address,
			&line.machine_code,
			emits,
			&line.source.raw_text,
		));
		out.push('\n');
	}

	for warning in &assembly.warnings {
		out.push_str(&warning.to_string());
		out.push('\n');
	}
	for error in &assembly.errors {
		out.push_str(&error.to_string());
		out.push('\n');
	}
	writeln!(
		out,
		"{} errors, {} warnings, {} bytes",
		assembly.errors.len(),
		assembly.warnings.len(),
		assembly.program.len()
	)
	.unwrap();
	out
}

/// Write the listing to a stream.
pub fn write_listing<W: Write>(assembly: &Assembly, writer: &mut W) -> AsmResult<()> {
	writer.write_all(generate_listing(assembly).as_bytes())?;
	Ok(())
}
