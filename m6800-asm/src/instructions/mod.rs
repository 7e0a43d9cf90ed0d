//! Instruction set definitions for the Motorola 6800.
//!
//! Submodules cover the seven addressing modes and the static opcode
//! catalogue shared by the assembler and the simulator.

pub mod addressing;
pub mod opcodes;

pub use addressing::AddressingMode;
pub use opcodes::{Mnemonic, OpcodeEntry, decode, lookup, modes_of, supports_mode};
