//! The Motorola 6800 opcode catalogue.
//!
//! A static table of every (mnemonic, addressing mode) pair the 6800
//! supports, with its opcode byte and encoded length. The table backs both
//! directions of the toolchain: the assembler encodes through
//! [`lookup`], the simulator decodes through [`decode`].

use std::collections::HashMap;
use std::fmt;
use std::sync::OnceLock;

use crate::instructions::addressing::AddressingMode;

/// 6800 instruction mnemonics.
///
/// Accumulator-specific forms (`ASLA`, `INCB`, ...) are distinct variants so
/// that a fetched opcode byte maps back to exactly one mnemonic. The old
/// Motorola spellings `LDA`/`LDB`/`STA`/`STB`/`ORA`/`ORB` are accepted on
/// input and canonicalised by [`Mnemonic::parse`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mnemonic {
	// Accumulator and memory arithmetic
	/// Add B to A
	Aba,
	/// Add with Carry to A
	Adca,
	/// Add with Carry to B
	Adcb,
	/// Add to A
	Adda,
	/// Add to B
	Addb,
	/// Compare B to A
	Cba,
	/// Compare A
	Cmpa,
	/// Compare B
	Cmpb,
	/// Compare Index Register
	Cpx,
	/// Decimal Adjust A
	Daa,
	/// Subtract B from A
	Sba,
	/// Subtract with Carry from A
	Sbca,
	/// Subtract with Carry from B
	Sbcb,
	/// Subtract from A
	Suba,
	/// Subtract from B
	Subb,

	// Logic
	/// AND A
	Anda,
	/// AND B
	Andb,
	/// Bit Test A
	Bita,
	/// Bit Test B
	Bitb,
	/// Exclusive OR A
	Eora,
	/// Exclusive OR B
	Eorb,
	/// Inclusive OR A
	Oraa,
	/// Inclusive OR B
	Orab,

	// Loads and stores
	/// Load Accumulator A
	Ldaa,
	/// Load Accumulator B
	Ldab,
	/// Load Stack Pointer
	Lds,
	/// Load Index Register
	Ldx,
	/// Store Accumulator A
	Staa,
	/// Store Accumulator B
	Stab,
	/// Store Stack Pointer
	Sts,
	/// Store Index Register
	Stx,

	// Read-modify-write, memory forms
	/// Arithmetic Shift Left (memory)
	Asl,
	/// Arithmetic Shift Right (memory)
	Asr,
	/// Clear (memory)
	Clr,
	/// Complement (memory)
	Com,
	/// Decrement (memory)
	Dec,
	/// Increment (memory)
	Inc,
	/// Logical Shift Right (memory)
	Lsr,
	/// Negate (memory)
	Neg,
	/// Rotate Left (memory)
	Rol,
	/// Rotate Right (memory)
	Ror,
	/// Test (memory)
	Tst,

	// Read-modify-write, accumulator forms
	/// Arithmetic Shift Left A
	Asla,
	/// Arithmetic Shift Left B
	Aslb,
	/// Arithmetic Shift Right A
	Asra,
	/// Arithmetic Shift Right B
	Asrb,
	/// Clear A
	Clra,
	/// Clear B
	Clrb,
	/// Complement A
	Coma,
	/// Complement B
	Comb,
	/// Decrement A
	Deca,
	/// Decrement B
	Decb,
	/// Increment A
	Inca,
	/// Increment B
	Incb,
	/// Logical Shift Right A
	Lsra,
	/// Logical Shift Right B
	Lsrb,
	/// Negate A
	Nega,
	/// Negate B
	Negb,
	/// Rotate Left A
	Rola,
	/// Rotate Left B
	Rolb,
	/// Rotate Right A
	Rora,
	/// Rotate Right B
	Rorb,
	/// Test A
	Tsta,
	/// Test B
	Tstb,

	// Index register and stack pointer
	/// Decrement Stack Pointer
	Des,
	/// Decrement Index Register
	Dex,
	/// Increment Stack Pointer
	Ins,
	/// Increment Index Register
	Inx,
	/// Transfer Stack Pointer to X
	Tsx,
	/// Transfer X to Stack Pointer
	Txs,

	// Stack push/pull
	/// Push A
	Psha,
	/// Push B
	Pshb,
	/// Pull A
	Pula,
	/// Pull B
	Pulb,

	// Transfers
	/// Transfer A to B
	Tab,
	/// Transfer A to CCR
	Tap,
	/// Transfer B to A
	Tba,
	/// Transfer CCR to A
	Tpa,

	// Jumps and subroutines
	/// Jump
	Jmp,
	/// Jump to Subroutine
	Jsr,
	/// Branch to Subroutine
	Bsr,
	/// Return from Subroutine
	Rts,
	/// Return from Interrupt
	Rti,

	// Branches
	/// Branch if Carry Clear
	Bcc,
	/// Branch if Carry Set
	Bcs,
	/// Branch if Equal
	Beq,
	/// Branch if >= (signed)
	Bge,
	/// Branch if > (signed)
	Bgt,
	/// Branch if Higher (unsigned)
	Bhi,
	/// Branch if <= (signed)
	Ble,
	/// Branch if Lower or Same (unsigned)
	Bls,
	/// Branch if < (signed)
	Blt,
	/// Branch if Minus
	Bmi,
	/// Branch if Not Equal
	Bne,
	/// Branch if Plus
	Bpl,
	/// Branch Always
	Bra,
	/// Branch if Overflow Clear
	Bvc,
	/// Branch if Overflow Set
	Bvs,

	// Condition code operations
	/// Clear Carry
	Clc,
	/// Clear Interrupt Mask
	Cli,
	/// Clear Overflow
	Clv,
	/// Set Carry
	Sec,
	/// Set Interrupt Mask
	Sei,
	/// Set Overflow
	Sev,

	// System
	/// No Operation
	Nop,
	/// Software Interrupt
	Swi,
	/// Wait for Interrupt
	Wai,
}

impl Mnemonic {
	/// Parse a mnemonic from source text, case-insensitively.
	///
	/// Accepts the old Motorola accumulator spellings (`LDA` for `LDAA`,
	/// `ORB` for `ORAB`, ...) and returns the canonical variant.
	pub fn parse(s: &str) -> Option<Self> {
		match s.to_ascii_uppercase().as_str() {
			"ABA" => Some(Self::Aba),
			"ADCA" => Some(Self::Adca),
			"ADCB" => Some(Self::Adcb),
			"ADDA" => Some(Self::Adda),
			"ADDB" => Some(Self::Addb),
			"ANDA" => Some(Self::Anda),
			"ANDB" => Some(Self::Andb),
			"ASL" => Some(Self::Asl),
			"ASLA" => Some(Self::Asla),
			"ASLB" => Some(Self::Aslb),
			"ASR" => Some(Self::Asr),
			"ASRA" => Some(Self::Asra),
			"ASRB" => Some(Self::Asrb),
			"BCC" => Some(Self::Bcc),
			"BCS" => Some(Self::Bcs),
			"BEQ" => Some(Self::Beq),
			"BGE" => Some(Self::Bge),
			"BGT" => Some(Self::Bgt),
			"BHI" => Some(Self::Bhi),
			"BITA" => Some(Self::Bita),
			"BITB" => Some(Self::Bitb),
			"BLE" => Some(Self::Ble),
			"BLS" => Some(Self::Bls),
			"BLT" => Some(Self::Blt),
			"BMI" => Some(Self::Bmi),
			"BNE" => Some(Self::Bne),
			"BPL" => Some(Self::Bpl),
			"BRA" => Some(Self::Bra),
			"BSR" => Some(Self::Bsr),
			"BVC" => Some(Self::Bvc),
			"BVS" => Some(Self::Bvs),
			"CBA" => Some(Self::Cba),
			"CLC" => Some(Self::Clc),
			"CLI" => Some(Self::Cli),
			"CLR" => Some(Self::Clr),
			"CLRA" => Some(Self::Clra),
			"CLRB" => Some(Self::Clrb),
			"CLV" => Some(Self::Clv),
			"CMPA" => Some(Self::Cmpa),
			"CMPB" => Some(Self::Cmpb),
			"COM" => Some(Self::Com),
			"COMA" => Some(Self::Coma),
			"COMB" => Some(Self::Comb),
			"CPX" => Some(Self::Cpx),
			"DAA" => Some(Self::Daa),
			"DEC" => Some(Self::Dec),
			"DECA" => Some(Self::Deca),
			"DECB" => Some(Self::Decb),
			"DES" => Some(Self::Des),
			"DEX" => Some(Self::Dex),
			"EORA" => Some(Self::Eora),
			"EORB" => Some(Self::Eorb),
			"INC" => Some(Self::Inc),
			"INCA" => Some(Self::Inca),
			"INCB" => Some(Self::Incb),
			"INS" => Some(Self::Ins),
			"INX" => Some(Self::Inx),
			"JMP" => Some(Self::Jmp),
			"JSR" => Some(Self::Jsr),
			"LDA" | "LDAA" => Some(Self::Ldaa),
			"LDB" | "LDAB" => Some(Self::Ldab),
			"LDS" => Some(Self::Lds),
			"LDX" => Some(Self::Ldx),
			"LSR" => Some(Self::Lsr),
			"LSRA" => Some(Self::Lsra),
			"LSRB" => Some(Self::Lsrb),
			"NEG" => Some(Self::Neg),
			"NEGA" => Some(Self::Nega),
			"NEGB" => Some(Self::Negb),
			"NOP" => Some(Self::Nop),
			"ORA" | "ORAA" => Some(Self::Oraa),
			"ORB" | "ORAB" => Some(Self::Orab),
			"PSHA" => Some(Self::Psha),
			"PSHB" => Some(Self::Pshb),
			"PULA" => Some(Self::Pula),
			"PULB" => Some(Self::Pulb),
			"ROL" => Some(Self::Rol),
			"ROLA" => Some(Self::Rola),
			"ROLB" => Some(Self::Rolb),
			"ROR" => Some(Self::Ror),
			"RORA" => Some(Self::Rora),
			"RORB" => Some(Self::Rorb),
			"RTI" => Some(Self::Rti),
			"RTS" => Some(Self::Rts),
			"SBA" => Some(Self::Sba),
			"SBCA" => Some(Self::Sbca),
			"SBCB" => Some(Self::Sbcb),
			"SEC" => Some(Self::Sec),
			"SEI" => Some(Self::Sei),
			"SEV" => Some(Self::Sev),
			"STA" | "STAA" => Some(Self::Staa),
			"STB" | "STAB" => Some(Self::Stab),
			"STS" => Some(Self::Sts),
			"STX" => Some(Self::Stx),
			"SUBA" => Some(Self::Suba),
			"SUBB" => Some(Self::Subb),
			"SWI" => Some(Self::Swi),
			"TAB" => Some(Self::Tab),
			"TAP" => Some(Self::Tap),
			"TBA" => Some(Self::Tba),
			"TPA" => Some(Self::Tpa),
			"TST" => Some(Self::Tst),
			"TSTA" => Some(Self::Tsta),
			"TSTB" => Some(Self::Tstb),
			"TSX" => Some(Self::Tsx),
			"TXS" => Some(Self::Txs),
			"WAI" => Some(Self::Wai),
			_ => None,
		}
	}

	/// Fold a read-modify-write mnemonic onto an accumulator.
	///
	/// `ASL A` means `ASLA`; this maps the memory-form mnemonic plus the
	/// accumulator letter to the dedicated accumulator variant.
	pub fn for_accumulator(self, acc: char) -> Option<Self> {
		let a = acc.eq_ignore_ascii_case(&'A');
		let b = acc.eq_ignore_ascii_case(&'B');
		if !a && !b {
			return None;
		}
		let pair = match self {
			Self::Asl => (Self::Asla, Self::Aslb),
			Self::Asr => (Self::Asra, Self::Asrb),
			Self::Clr => (Self::Clra, Self::Clrb),
			Self::Com => (Self::Coma, Self::Comb),
			Self::Dec => (Self::Deca, Self::Decb),
			Self::Inc => (Self::Inca, Self::Incb),
			Self::Lsr => (Self::Lsra, Self::Lsrb),
			Self::Neg => (Self::Nega, Self::Negb),
			Self::Rol => (Self::Rola, Self::Rolb),
			Self::Ror => (Self::Rora, Self::Rorb),
			Self::Tst => (Self::Tsta, Self::Tstb),
			_ => return None,
		};
		Some(if a {
			pair.0
		} else {
			pair.1
		})
	}

	/// Check if this mnemonic is a relative branch (including BSR).
	pub fn is_branch(self) -> bool {
		matches!(
			self,
			Self::Bcc
				| Self::Bcs | Self::Beq
				| Self::Bge | Self::Bgt
				| Self::Bhi | Self::Ble
				| Self::Bls | Self::Blt
				| Self::Bmi | Self::Bne
				| Self::Bpl | Self::Bra
				| Self::Bsr | Self::Bvc
				| Self::Bvs
		)
	}
}

impl fmt::Display for Mnemonic {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let name = match self {
			Self::Aba => "ABA",
			Self::Adca => "ADCA",
			Self::Adcb => "ADCB",
			Self::Adda => "ADDA",
			Self::Addb => "ADDB",
			Self::Anda => "ANDA",
			Self::Andb => "ANDB",
			Self::Asl => "ASL",
			Self::Asla => "ASLA",
			Self::Aslb => "ASLB",
			Self::Asr => "ASR",
			Self::Asra => "ASRA",
			Self::Asrb => "ASRB",
			Self::Bcc => "BCC",
			Self::Bcs => "BCS",
			Self::Beq => "BEQ",
			Self::Bge => "BGE",
			Self::Bgt => "BGT",
			Self::Bhi => "BHI",
			Self::Bita => "BITA",
			Self::Bitb => "BITB",
			Self::Ble => "BLE",
			Self::Bls => "BLS",
			Self::Blt => "BLT",
			Self::Bmi => "BMI",
			Self::Bne => "BNE",
			Self::Bpl => "BPL",
			Self::Bra => "BRA",
			Self::Bsr => "BSR",
			Self::Bvc => "BVC",
			Self::Bvs => "BVS",
			Self::Cba => "CBA",
			Self::Clc => "CLC",
			Self::Cli => "CLI",
			Self::Clr => "CLR",
			Self::Clra => "CLRA",
			Self::Clrb => "CLRB",
			Self::Clv => "CLV",
			Self::Cmpa => "CMPA",
			Self::Cmpb => "CMPB",
			Self::Com => "COM",
			Self::Coma => "COMA",
			Self::Comb => "COMB",
			Self::Cpx => "CPX",
			Self::Daa => "DAA",
			Self::Dec => "DEC",
			Self::Deca => "DECA",
			Self::Decb => "DECB",
			Self::Des => "DES",
			Self::Dex => "DEX",
			Self::Eora => "EORA",
			Self::Eorb => "EORB",
			Self::Inc => "INC",
			Self::Inca => "INCA",
			Self::Incb => "INCB",
			Self::Ins => "INS",
			Self::Inx => "INX",
			Self::Jmp => "JMP",
			Self::Jsr => "JSR",
			Self::Ldaa => "LDAA",
			Self::Ldab => "LDAB",
			Self::Lds => "LDS",
			Self::Ldx => "LDX",
			Self::Lsr => "LSR",
			Self::Lsra => "LSRA",
			Self::Lsrb => "LSRB",
			Self::Neg => "NEG",
			Self::Nega => "NEGA",
			Self::Negb => "NEGB",
			Self::Nop => "NOP",
			Self::Oraa => "ORAA",
			Self::Orab => "ORAB",
			Self::Psha => "PSHA",
			Self::Pshb => "PSHB",
			Self::Pula => "PULA",
			Self::Pulb => "PULB",
			Self::Rol => "ROL",
			Self::Rola => "ROLA",
			Self::Rolb => "ROLB",
			Self::Ror => "ROR",
			Self::Rora => "RORA",
			Self::Rorb => "RORB",
			Self::Rti => "RTI",
			Self::Rts => "RTS",
			Self::Sba => "SBA",
			Self::Sbca => "SBCA",
			Self::Sbcb => "SBCB",
			Self::Sec => "SEC",
			Self::Sei => "SEI",
			Self::Sev => "SEV",
			Self::Staa => "STAA",
			Self::Stab => "STAB",
			Self::Sts => "STS",
			Self::Stx => "STX",
			Self::Suba => "SUBA",
			Self::Subb => "SUBB",
			Self::Swi => "SWI",
			Self::Tab => "TAB",
			Self::Tap => "TAP",
			Self::Tba => "TBA",
			Self::Tpa => "TPA",
			Self::Tst => "TST",
			Self::Tsta => "TSTA",
			Self::Tstb => "TSTB",
			Self::Tsx => "TSX",
			Self::Txs => "TXS",
			Self::Wai => "WAI",
		};
		write!(f, "{}", name)
	}
}

/// One row of the opcode table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpcodeEntry {
	/// Canonical mnemonic
	pub mnemonic: Mnemonic,
	/// Addressing mode of this encoding
	pub mode: AddressingMode,
	/// The opcode byte
	pub opcode: u8,
	/// Total encoded length including the opcode (1..=3)
	pub size: u8,
}

const fn e(mnemonic: Mnemonic, mode: AddressingMode, opcode: u8, size: u8) -> OpcodeEntry {
	OpcodeEntry {
		mnemonic,
		mode,
		opcode,
		size,
	}
}

use AddressingMode::{Accumulator, Extended, Immediate, Indexed, Inherent, Relative};
use AddressingMode::Direct;
use Mnemonic as M;

/// Every opcode of the base 6800: 197 encodings.
static OPCODES: &[OpcodeEntry] = &[
	// Inherent
	e(M::Aba, Inherent, 0x1B, 1),
	e(M::Cba, Inherent, 0x11, 1),
	e(M::Clc, Inherent, 0x0C, 1),
	e(M::Cli, Inherent, 0x0E, 1),
	e(M::Clv, Inherent, 0x0A, 1),
	e(M::Daa, Inherent, 0x19, 1),
	e(M::Des, Inherent, 0x34, 1),
	e(M::Dex, Inherent, 0x09, 1),
	e(M::Ins, Inherent, 0x31, 1),
	e(M::Inx, Inherent, 0x08, 1),
	e(M::Nop, Inherent, 0x01, 1),
	e(M::Psha, Inherent, 0x36, 1),
	e(M::Pshb, Inherent, 0x37, 1),
	e(M::Pula, Inherent, 0x32, 1),
	e(M::Pulb, Inherent, 0x33, 1),
	e(M::Rti, Inherent, 0x3B, 1),
	e(M::Rts, Inherent, 0x39, 1),
	e(M::Sba, Inherent, 0x10, 1),
	e(M::Sec, Inherent, 0x0D, 1),
	e(M::Sei, Inherent, 0x0F, 1),
	e(M::Sev, Inherent, 0x0B, 1),
	e(M::Swi, Inherent, 0x3F, 1),
	e(M::Tab, Inherent, 0x16, 1),
	e(M::Tap, Inherent, 0x06, 1),
	e(M::Tba, Inherent, 0x17, 1),
	e(M::Tpa, Inherent, 0x07, 1),
	e(M::Tsx, Inherent, 0x30, 1),
	e(M::Txs, Inherent, 0x35, 1),
	e(M::Wai, Inherent, 0x3E, 1),
	// Accumulator
	e(M::Asla, Accumulator, 0x48, 1),
	e(M::Aslb, Accumulator, 0x58, 1),
	e(M::Asra, Accumulator, 0x47, 1),
	e(M::Asrb, Accumulator, 0x57, 1),
	e(M::Clra, Accumulator, 0x4F, 1),
	e(M::Clrb, Accumulator, 0x5F, 1),
	e(M::Coma, Accumulator, 0x43, 1),
	e(M::Comb, Accumulator, 0x53, 1),
	e(M::Deca, Accumulator, 0x4A, 1),
	e(M::Decb, Accumulator, 0x5A, 1),
	e(M::Inca, Accumulator, 0x4C, 1),
	e(M::Incb, Accumulator, 0x5C, 1),
	e(M::Lsra, Accumulator, 0x44, 1),
	e(M::Lsrb, Accumulator, 0x54, 1),
	e(M::Nega, Accumulator, 0x40, 1),
	e(M::Negb, Accumulator, 0x50, 1),
	e(M::Rola, Accumulator, 0x49, 1),
	e(M::Rolb, Accumulator, 0x59, 1),
	e(M::Rora, Accumulator, 0x46, 1),
	e(M::Rorb, Accumulator, 0x56, 1),
	e(M::Tsta, Accumulator, 0x4D, 1),
	e(M::Tstb, Accumulator, 0x5D, 1),
	// Relative branches
	e(M::Bcc, Relative, 0x24, 2),
	e(M::Bcs, Relative, 0x25, 2),
	e(M::Beq, Relative, 0x27, 2),
	e(M::Bge, Relative, 0x2C, 2),
	e(M::Bgt, Relative, 0x2E, 2),
	e(M::Bhi, Relative, 0x22, 2),
	e(M::Ble, Relative, 0x2F, 2),
	e(M::Bls, Relative, 0x23, 2),
	e(M::Blt, Relative, 0x2D, 2),
	e(M::Bmi, Relative, 0x2B, 2),
	e(M::Bne, Relative, 0x26, 2),
	e(M::Bpl, Relative, 0x2A, 2),
	e(M::Bra, Relative, 0x20, 2),
	e(M::Bsr, Relative, 0x8D, 2),
	e(M::Bvc, Relative, 0x28, 2),
	e(M::Bvs, Relative, 0x29, 2),
	// Accumulator A column
	e(M::Suba, Immediate, 0x80, 2),
	e(M::Suba, Direct, 0x90, 2),
	e(M::Suba, Indexed, 0xA0, 2),
	e(M::Suba, Extended, 0xB0, 3),
	e(M::Cmpa, Immediate, 0x81, 2),
	e(M::Cmpa, Direct, 0x91, 2),
	e(M::Cmpa, Indexed, 0xA1, 2),
	e(M::Cmpa, Extended, 0xB1, 3),
	e(M::Sbca, Immediate, 0x82, 2),
	e(M::Sbca, Direct, 0x92, 2),
	e(M::Sbca, Indexed, 0xA2, 2),
	e(M::Sbca, Extended, 0xB2, 3),
	e(M::Anda, Immediate, 0x84, 2),
	e(M::Anda, Direct, 0x94, 2),
	e(M::Anda, Indexed, 0xA4, 2),
	e(M::Anda, Extended, 0xB4, 3),
	e(M::Bita, Immediate, 0x85, 2),
	e(M::Bita, Direct, 0x95, 2),
	e(M::Bita, Indexed, 0xA5, 2),
	e(M::Bita, Extended, 0xB5, 3),
	e(M::Ldaa, Immediate, 0x86, 2),
	e(M::Ldaa, Direct, 0x96, 2),
	e(M::Ldaa, Indexed, 0xA6, 2),
	e(M::Ldaa, Extended, 0xB6, 3),
	e(M::Staa, Direct, 0x97, 2),
	e(M::Staa, Indexed, 0xA7, 2),
	e(M::Staa, Extended, 0xB7, 3),
	e(M::Eora, Immediate, 0x88, 2),
	e(M::Eora, Direct, 0x98, 2),
	e(M::Eora, Indexed, 0xA8, 2),
	e(M::Eora, Extended, 0xB8, 3),
	e(M::Adca, Immediate, 0x89, 2),
	e(M::Adca, Direct, 0x99, 2),
	e(M::Adca, Indexed, 0xA9, 2),
	e(M::Adca, Extended, 0xB9, 3),
	e(M::Oraa, Immediate, 0x8A, 2),
	e(M::Oraa, Direct, 0x9A, 2),
	e(M::Oraa, Indexed, 0xAA, 2),
	e(M::Oraa, Extended, 0xBA, 3),
	e(M::Adda, Immediate, 0x8B, 2),
	e(M::Adda, Direct, 0x9B, 2),
	e(M::Adda, Indexed, 0xAB, 2),
	e(M::Adda, Extended, 0xBB, 3),
	// Accumulator B column
	e(M::Subb, Immediate, 0xC0, 2),
	e(M::Subb, Direct, 0xD0, 2),
	e(M::Subb, Indexed, 0xE0, 2),
	e(M::Subb, Extended, 0xF0, 3),
	e(M::Cmpb, Immediate, 0xC1, 2),
	e(M::Cmpb, Direct, 0xD1, 2),
	e(M::Cmpb, Indexed, 0xE1, 2),
	e(M::Cmpb, Extended, 0xF1, 3),
	e(M::Sbcb, Immediate, 0xC2, 2),
	e(M::Sbcb, Direct, 0xD2, 2),
	e(M::Sbcb, Indexed, 0xE2, 2),
	e(M::Sbcb, Extended, 0xF2, 3),
	e(M::Andb, Immediate, 0xC4, 2),
	e(M::Andb, Direct, 0xD4, 2),
	e(M::Andb, Indexed, 0xE4, 2),
	e(M::Andb, Extended, 0xF4, 3),
	e(M::Bitb, Immediate, 0xC5, 2),
	e(M::Bitb, Direct, 0xD5, 2),
	e(M::Bitb, Indexed, 0xE5, 2),
	e(M::Bitb, Extended, 0xF5, 3),
	e(M::Ldab, Immediate, 0xC6, 2),
	e(M::Ldab, Direct, 0xD6, 2),
	e(M::Ldab, Indexed, 0xE6, 2),
	e(M::Ldab, Extended, 0xF6, 3),
	e(M::Stab, Direct, 0xD7, 2),
	e(M::Stab, Indexed, 0xE7, 2),
	e(M::Stab, Extended, 0xF7, 3),
	e(M::Eorb, Immediate, 0xC8, 2),
	e(M::Eorb, Direct, 0xD8, 2),
	e(M::Eorb, Indexed, 0xE8, 2),
	e(M::Eorb, Extended, 0xF8, 3),
	e(M::Adcb, Immediate, 0xC9, 2),
	e(M::Adcb, Direct, 0xD9, 2),
	e(M::Adcb, Indexed, 0xE9, 2),
	e(M::Adcb, Extended, 0xF9, 3),
	e(M::Orab, Immediate, 0xCA, 2),
	e(M::Orab, Direct, 0xDA, 2),
	e(M::Orab, Indexed, 0xEA, 2),
	e(M::Orab, Extended, 0xFA, 3),
	e(M::Addb, Immediate, 0xCB, 2),
	e(M::Addb, Direct, 0xDB, 2),
	e(M::Addb, Indexed, 0xEB, 2),
	e(M::Addb, Extended, 0xFB, 3),
	// 16-bit register operations; immediates carry a word operand
	e(M::Cpx, Immediate, 0x8C, 3),
	e(M::Cpx, Direct, 0x9C, 2),
	e(M::Cpx, Indexed, 0xAC, 2),
	e(M::Cpx, Extended, 0xBC, 3),
	e(M::Lds, Immediate, 0x8E, 3),
	e(M::Lds, Direct, 0x9E, 2),
	e(M::Lds, Indexed, 0xAE, 2),
	e(M::Lds, Extended, 0xBE, 3),
	e(M::Ldx, Immediate, 0xCE, 3),
	e(M::Ldx, Direct, 0xDE, 2),
	e(M::Ldx, Indexed, 0xEE, 2),
	e(M::Ldx, Extended, 0xFE, 3),
	e(M::Sts, Direct, 0x9F, 2),
	e(M::Sts, Indexed, 0xAF, 2),
	e(M::Sts, Extended, 0xBF, 3),
	e(M::Stx, Direct, 0xDF, 2),
	e(M::Stx, Indexed, 0xEF, 2),
	e(M::Stx, Extended, 0xFF, 3),
	// Read-modify-write on memory
	e(M::Neg, Indexed, 0x60, 2),
	e(M::Neg, Extended, 0x70, 3),
	e(M::Com, Indexed, 0x63, 2),
	e(M::Com, Extended, 0x73, 3),
	e(M::Lsr, Indexed, 0x64, 2),
	e(M::Lsr, Extended, 0x74, 3),
	e(M::Ror, Indexed, 0x66, 2),
	e(M::Ror, Extended, 0x76, 3),
	e(M::Asr, Indexed, 0x67, 2),
	e(M::Asr, Extended, 0x77, 3),
	e(M::Asl, Indexed, 0x68, 2),
	e(M::Asl, Extended, 0x78, 3),
	e(M::Rol, Indexed, 0x69, 2),
	e(M::Rol, Extended, 0x79, 3),
	e(M::Dec, Indexed, 0x6A, 2),
	e(M::Dec, Extended, 0x7A, 3),
	e(M::Inc, Indexed, 0x6C, 2),
	e(M::Inc, Extended, 0x7C, 3),
	e(M::Tst, Indexed, 0x6D, 2),
	e(M::Tst, Extended, 0x7D, 3),
	e(M::Clr, Indexed, 0x6F, 2),
	e(M::Clr, Extended, 0x7F, 3),
	// Jumps and subroutine calls
	e(M::Jmp, Indexed, 0x6E, 2),
	e(M::Jmp, Extended, 0x7E, 3),
	e(M::Jsr, Indexed, 0xAD, 2),
	e(M::Jsr, Extended, 0xBD, 3),
];

struct OpcodeTable {
	by_key: HashMap<(Mnemonic, AddressingMode), &'static OpcodeEntry>,
	by_byte: [Option<&'static OpcodeEntry>; 256],
}

fn table() -> &'static OpcodeTable {
	static TABLE: OnceLock<OpcodeTable> = OnceLock::new();
	TABLE.get_or_init(|| {
		let mut by_key = HashMap::with_capacity(OPCODES.len());
		let mut by_byte = [None; 256];
		for entry in OPCODES {
			let _clash = by_key.insert((entry.mnemonic, entry.mode), entry);
			debug_assert!(_clash.is_none(), "duplicate table row {} {}", entry.mnemonic, entry.mode);
			debug_assert!(by_byte[entry.opcode as usize].is_none());
			by_byte[entry.opcode as usize] = Some(entry);
		}
		OpcodeTable {
			by_key,
			by_byte,
		}
	})
}

/// Look up the encoding for a (mnemonic, mode) pair.
pub fn lookup(mnemonic: Mnemonic, mode: AddressingMode) -> Option<&'static OpcodeEntry> {
	table().by_key.get(&(mnemonic, mode)).copied()
}

/// Decode a fetched opcode byte back to its table entry.
pub fn decode(opcode: u8) -> Option<&'static OpcodeEntry> {
	table().by_byte[opcode as usize]
}

/// Check whether a mnemonic has an encoding in the given mode.
pub fn supports_mode(mnemonic: Mnemonic, mode: AddressingMode) -> bool {
	lookup(mnemonic, mode).is_some()
}

/// All addressing modes a mnemonic supports.
pub fn modes_of(mnemonic: Mnemonic) -> Vec<AddressingMode> {
	OPCODES.iter().filter(|entry| entry.mnemonic == mnemonic).map(|entry| entry.mode).collect()
}
