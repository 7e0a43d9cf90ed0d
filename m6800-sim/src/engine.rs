//! The execution engine: program loading, stepping, running, breakpoints.
//!
//! The engine owns the CPU and its memory. `step()` is the cooperative unit
//! of work; `run()` just steps until something stops it: a halt, a
//! breakpoint, or the runaway-instruction cap. Arriving at a breakpoint is
//! reported once; the next step executes the instruction under it.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use m6800_asm::core::program::Program;
use m6800_asm::core::Assembly;

use crate::cpu::{Cpu, CpuStatus};
use crate::registers::{Ccr, Registers};
use crate::MEMORY_SIZE;

/// Default runaway-instruction cap for [`Engine::run`].
pub const DEFAULT_INSTRUCTION_LIMIT: u64 = 1_000_000;

/// How a step or run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionStatus {
	/// Instruction executed, more to come
	Running,
	/// CPU halted (SWI, WAI, or unknown opcode)
	Halted,
	/// PC sits on a breakpoint; nothing was executed
	Breakpoint,
	/// Engine-level failure, e.g. the instruction cap
	Error,
}

/// Result of a step or run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionResult {
	/// Final status
	pub status: ExecutionStatus,
	/// Program counter after the operation
	pub pc: u16,
	/// Human-readable detail for non-running statuses
	pub message: Option<String>,
	/// Source line for `pc`, when a line map was loaded
	pub source_line: Option<usize>,
}

/// Serialisable CPU state for external debuggers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CpuSnapshot {
	/// Accumulator A
	pub a: u8,
	/// Accumulator B
	pub b: u8,
	/// Index register
	pub x: u16,
	/// Stack pointer
	pub sp: u16,
	/// Program counter
	pub pc: u16,
	/// CCR architectural byte
	pub ccr: u8,
	/// Instructions executed since reset
	pub instructions: u64,
	/// Full 64 KiB memory image
	pub memory: Vec<u8>,
}

/// A snapshot blob that does not describe a 6800.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("snapshot memory is {len} bytes, expected 65536")]
pub struct InvalidSnapshot {
	/// Length of the rejected memory blob
	pub len: usize,
}

/// Drives the CPU in step/run modes with breakpoint support.
#[derive(Debug)]
pub struct Engine {
	cpu: Cpu,
	breakpoints: HashSet<u16>,
	instruction_limit: u64,
	source_lines: HashMap<u16, usize>,
	paused_at: Option<u16>,
}

impl Engine {
	/// Create an engine with the default instruction cap.
	pub fn new() -> Self {
		Self::with_limit(DEFAULT_INSTRUCTION_LIMIT)
	}

	/// Create an engine with a custom instruction cap.
	pub fn with_limit(instruction_limit: u64) -> Self {
		Self {
			cpu: Cpu::new(),
			breakpoints: HashSet::new(),
			instruction_limit: instruction_limit.max(1),
			source_lines: HashMap::new(),
			paused_at: None,
		}
	}

	/// Reset the CPU and load a program; PC lands on the entry address.
	///
	/// Breakpoints survive a load, the pause state does not.
	pub fn load(&mut self, program: &Program) {
		self.cpu.reset();
		self.paused_at = None;
		self.source_lines.clear();
		for (address, bytes) in program.segments() {
			self.cpu.memory.load(address, bytes);
		}
		self.cpu.regs.pc = program.entry_address;
		log::debug!(
			"loaded {} bytes, entry ${:04X}",
			program.len(),
			program.entry_address
		);
	}

	/// Load an assembly and remember which source line each address came
	/// from, so execution results can point back at the listing.
	pub fn load_assembly(&mut self, assembly: &Assembly) {
		self.load(&assembly.program);
		for line in &assembly.lines {
			if !line.machine_code.is_empty() {
				self.source_lines.insert(line.address, line.source.line_number);
			}
		}
	}

	/// Execute one instruction, honouring breakpoints.
	pub fn step(&mut self) -> ExecutionResult {
		let pc = self.cpu.regs.pc;
		if self.cpu.halted().is_none()
			&& self.breakpoints.contains(&pc)
			&& self.paused_at != Some(pc)
		{
			self.paused_at = Some(pc);
			return ExecutionResult {
				status: ExecutionStatus::Breakpoint,
				pc,
				message: Some(format!("breakpoint at ${pc:04X}")),
				source_line: self.source_lines.get(&pc).copied(),
			};
		}
		self.paused_at = None;

		match self.cpu.step() {
			CpuStatus::Running => ExecutionResult {
				status: ExecutionStatus::Running,
				pc: self.cpu.regs.pc,
				message: None,
				source_line: self.source_lines.get(&self.cpu.regs.pc).copied(),
			},
			CpuStatus::Halted(reason) => ExecutionResult {
				status: ExecutionStatus::Halted,
				pc: self.cpu.regs.pc,
				message: Some(reason.to_string()),
				source_line: None,
			},
		}
	}

	/// Step until halt, breakpoint, or the instruction cap.
	pub fn run(&mut self) -> ExecutionResult {
		let mut executed: u64 = 0;
		loop {
			let result = self.step();
			if result.status != ExecutionStatus::Running {
				return result;
			}
			executed += 1;
			if executed >= self.instruction_limit {
				return ExecutionResult {
					status: ExecutionStatus::Error,
					pc: self.cpu.regs.pc,
					message: Some("execution limit exceeded".to_string()),
					source_line: None,
				};
			}
		}
	}

	/// Arm a breakpoint.
	pub fn add_breakpoint(&mut self, address: u16) {
		self.breakpoints.insert(address);
	}

	/// Disarm a breakpoint.
	pub fn remove_breakpoint(&mut self, address: u16) {
		self.breakpoints.remove(&address);
	}

	/// Disarm all breakpoints.
	pub fn clear_breakpoints(&mut self) {
		self.breakpoints.clear();
	}

	/// Currently armed breakpoints.
	pub fn breakpoints(&self) -> &HashSet<u16> {
		&self.breakpoints
	}

	/// The CPU, for register and memory inspection.
	pub fn cpu(&self) -> &Cpu {
		&self.cpu
	}

	/// Mutable CPU access, for debugger-style pokes.
	pub fn cpu_mut(&mut self) -> &mut Cpu {
		&mut self.cpu
	}

	/// The register file.
	pub fn registers(&self) -> &Registers {
		&self.cpu.regs
	}

	/// Capture the full CPU state.
	pub fn snapshot(&self) -> CpuSnapshot {
		let regs = &self.cpu.regs;
		CpuSnapshot {
			a: regs.a,
			b: regs.b,
			x: regs.x,
			sp: regs.sp,
			pc: regs.pc,
			ccr: regs.ccr.to_byte(),
			instructions: self.cpu.instructions,
			memory: self.cpu.memory.as_slice().to_vec(),
		}
	}

	/// Restore a previously captured state.
	pub fn restore(&mut self, snapshot: &CpuSnapshot) -> Result<(), InvalidSnapshot> {
		let memory: &[u8; MEMORY_SIZE] =
			snapshot.memory.as_slice().try_into().map_err(|_| InvalidSnapshot {
				len: snapshot.memory.len(),
			})?;
		self.cpu.memory.copy_from_slice(memory);
		self.cpu.regs = Registers {
			a: snapshot.a,
			b: snapshot.b,
			x: snapshot.x,
			sp: snapshot.sp,
			pc: snapshot.pc,
			ccr: Ccr::from_byte(snapshot.ccr),
		};
		self.cpu.instructions = snapshot.instructions;
		Ok(())
	}
}

impl Default for Engine {
	fn default() -> Self {
		Self::new()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use m6800_asm::{Assembler, Config};

	fn load_source(engine: &mut Engine, source: &str) {
		let assembly = Assembler::new(Config::default()).assemble_source(source);
		assert!(assembly.is_ok(), "{:?}", assembly.errors);
		engine.load_assembly(&assembly);
	}

	#[test]
	fn test_run_to_halt() {
		let mut engine = Engine::new();
		load_source(&mut engine, "ORG $1000\nLDA #$05\nLOOP DECA\nBNE LOOP\nSWI\nEND\n");

		let result = engine.run();
		assert_eq!(result.status, ExecutionStatus::Halted);
		assert_eq!(result.pc, 0x1006);
		assert_eq!(engine.registers().a, 0);
	}

	#[test]
	fn test_breakpoint_reports_once_then_resumes() {
		let mut engine = Engine::new();
		load_source(&mut engine, "ORG $1000\nNOP\nHERE NOP\nSWI\nEND\n");
		engine.add_breakpoint(0x1001);

		let result = engine.run();
		assert_eq!(result.status, ExecutionStatus::Breakpoint);
		assert_eq!(result.pc, 0x1001);
		assert_eq!(result.source_line, Some(3));

		// Resuming executes the instruction under the breakpoint.
		let result = engine.run();
		assert_eq!(result.status, ExecutionStatus::Halted);
		assert_eq!(result.pc, 0x1003);
	}

	#[test]
	fn test_instruction_limit() {
		let mut engine = Engine::with_limit(100);
		load_source(&mut engine, "ORG $0000\nLOOP BRA LOOP\nEND\n");

		let result = engine.run();
		assert_eq!(result.status, ExecutionStatus::Error);
		assert_eq!(result.message.as_deref(), Some("execution limit exceeded"));
	}

	#[test]
	fn test_breakpoint_set_semantics() {
		let mut engine = Engine::new();
		engine.add_breakpoint(0x10);
		engine.add_breakpoint(0x10);
		engine.add_breakpoint(0x20);
		assert_eq!(engine.breakpoints().len(), 2);
		engine.remove_breakpoint(0x10);
		assert_eq!(engine.breakpoints().len(), 1);
		engine.clear_breakpoints();
		assert!(engine.breakpoints().is_empty());
	}

	#[test]
	fn test_snapshot_round_trip() {
		let mut engine = Engine::new();
		load_source(&mut engine, "ORG $0100\nLDA #$42\nSWI\nEND\n");
		engine.run();

		let snapshot = engine.snapshot();
		assert_eq!(snapshot.a, 0x42);
		assert_eq!(snapshot.memory.len(), MEMORY_SIZE);

		let mut other = Engine::new();
		other.restore(&snapshot).unwrap();
		assert_eq!(other.registers().a, 0x42);
		assert_eq!(other.registers().pc, engine.registers().pc);

		let bad = CpuSnapshot {
			memory: vec![0; 16],
			..snapshot
		};
		assert_eq!(other.restore(&bad), Err(InvalidSnapshot {
			len: 16,
		}));
	}
}
