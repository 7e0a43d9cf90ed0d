//! Intel HEX object output.
//!
//! Records are `:LLAAAATT<data>CC` with at most 16 data bytes each; the
//! checksum is the two's complement of the byte sum. The file ends with the
//! standard `:00000001FF` record.

use std::io::Write;

use crate::core::program::Program;
use crate::error::AsmResult;

/// Maximum data bytes per record.
const RECORD_LEN: usize = 16;

/// Format one data record.
fn data_record(address: u16, data: &[u8]) -> String {
	debug_assert!(!data.is_empty() && data.len() <= RECORD_LEN);
	let [hi, lo] = address.to_be_bytes();
	let mut sum = data.len() as u8;
	sum = sum.wrapping_add(hi).wrapping_add(lo);
	for &byte in data {
		sum = sum.wrapping_add(byte);
	}
	let checksum = sum.wrapping_neg();
	format!(
		":{:02X}{:04X}00{}{:02X}",
		data.len(),
		address,
		hex::encode_upper(data),
		checksum
	)
}

/// Render a program as Intel HEX text, including the end-of-file record.
pub fn to_ihex(program: &Program) -> String {
	let mut out = String::new();
	for (start, bytes) in program.segments() {
		for (index, chunk) in bytes.chunks(RECORD_LEN).enumerate() {
			let address = start.wrapping_add((index * RECORD_LEN) as u16);
			out.push_str(&data_record(address, chunk));
			out.push('\n');
		}
	}
	out.push_str(":00000001FF\n");
	out
}

/// Write a program as Intel HEX records.
pub fn write_ihex<W: Write>(program: &Program, writer: &mut W) -> AsmResult<()> {
	writer.write_all(to_ihex(program).as_bytes())?;
	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_single_record() {
		let mut program = Program::new(0x0500);
		program.push_bytes(0x0500, &[0xDE, 0xAD, 0xBE, 0xEF]);

		let text = to_ihex(&program);
		// 04 + 05 + 00 + 00 + DE + AD + BE + EF wraps to 0x41; -0x41 = 0xBF
		assert_eq!(text, ":04050000DEADBEEFBF\n:00000001FF\n");
	}

	#[test]
	fn test_long_segment_splits_at_sixteen() {
		let mut program = Program::new(0);
		program.push_bytes(0x1000, &[0xAA; 20]);

		let lines: Vec<_> = to_ihex(&program).lines().map(String::from).collect();
		assert_eq!(lines.len(), 3);
		assert!(lines[0].starts_with(":10100000"));
		assert!(lines[1].starts_with(":04101000"));
		assert_eq!(lines[2], ":00000001FF");
	}

	#[test]
	fn test_empty_program_is_just_eof() {
		let program = Program::new(0);
		assert_eq!(to_ihex(&program), ":00000001FF\n");
	}

	#[test]
	fn test_checksum_zero_sum() {
		// One zero byte at address 0: record sums to 0x01, checksum 0xFF.
		let mut program = Program::new(0);
		program.push_bytes(0x0000, &[0x00]);
		assert_eq!(to_ihex(&program).lines().next().unwrap(), ":0100000000FF");
	}
}
