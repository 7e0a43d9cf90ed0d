//! Raw binary object output.
//!
//! Two variants exist: [`image_bytes`] renders one contiguous memory image
//! from the lowest to the highest emitted address with gaps zero-filled
//! (this is what the CLI writes), while [`packed_bytes`] concatenates the
//! occupied segments in ascending address order without padding.

use std::io::Write;

use crate::core::program::Program;
use crate::error::AsmResult;

/// Flatten a program into a zero-filled memory image.
///
/// Returns `(origin, bytes)`; the image covers `origin..origin + bytes.len()`.
pub fn image_bytes(program: &Program) -> (u16, Vec<u8>) {
	program.to_image().unwrap_or((0, Vec::new()))
}

/// Concatenate occupied segments without gap filling.
pub fn packed_bytes(program: &Program) -> Vec<u8> {
	let mut out = Vec::with_capacity(program.len());
	for (_, bytes) in program.segments() {
		out.extend_from_slice(bytes);
	}
	out
}

/// Write the zero-filled image form.
pub fn write_image<W: Write>(program: &Program, writer: &mut W) -> AsmResult<()> {
	let (_, bytes) = image_bytes(program);
	writer.write_all(&bytes)?;
	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;

	fn sample() -> Program {
		let mut program = Program::new(0x0100);
		program.push_bytes(0x0100, &[0x7E, 0x02, 0x00]);
		program.break_segment();
		program.push_bytes(0x0106, &[0x01]);
		program
	}

	#[test]
	fn test_image_fills_gap() {
		let (origin, bytes) = image_bytes(&sample());
		assert_eq!(origin, 0x0100);
		assert_eq!(bytes, [0x7E, 0x02, 0x00, 0x00, 0x00, 0x00, 0x01]);
	}

	#[test]
	fn test_packed_skips_gap() {
		assert_eq!(packed_bytes(&sample()), [0x7E, 0x02, 0x00, 0x01]);
	}

	#[test]
	fn test_write_image() {
		let mut out = Vec::new();
		write_image(&sample(), &mut out).unwrap();
		assert_eq!(out.len(), 7);
	}
}
