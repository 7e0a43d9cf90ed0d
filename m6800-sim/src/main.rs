//! 6800 Runner CLI
//!
//! Assembles a source file and executes it in the simulator, printing the
//! final register state. Breakpoints stop the run and dump state; invoking
//! with `--steps` caps execution for debugging runaway programs.

use clap::Parser;
use m6800_asm::{Assembler, Config};
use m6800_sim::{Engine, ExecutionStatus};
use std::fs::File;
use std::path::PathBuf;
use std::process;

#[derive(Parser)]
#[command(
    name = "m68run",
    version = m6800_sim::VERSION,
    about = "Assemble and run 6800 programs in a simulator",
    long_about = "Assembles a 6800 source file and executes it until the \
                  program halts, hits a breakpoint, or exceeds the \
                  instruction cap."
)]
struct Cli {
	/// Input assembly file
	#[arg(value_name = "INPUT")]
	input: PathBuf,

	/// Breakpoint address (hex, repeatable), e.g. -b 1002
	#[arg(short, long = "break", value_name = "ADDR", value_parser = parse_hex_addr)]
	breakpoints: Vec<u16>,

	/// Project configuration file (TOML)
	#[arg(short, long, value_name = "FILE")]
	config: Option<PathBuf>,

	/// Maximum instructions to execute (overrides the configuration)
	#[arg(short = 'n', long, value_name = "COUNT")]
	steps: Option<u64>,

	/// Write a JSON CPU snapshot after the run
	#[arg(short = 'd', long, value_name = "FILE")]
	dump: Option<PathBuf>,

	/// Verbose output (repeat for instruction tracing)
	#[arg(short, long, action = clap::ArgAction::Count)]
	verbose: u8,

	/// Quiet mode (suppress non-error output)
	#[arg(short, long)]
	quiet: bool,
}

fn parse_hex_addr(text: &str) -> Result<u16, String> {
	let digits = text.strip_prefix('$').unwrap_or(text);
	u16::from_str_radix(digits, 16).map_err(|_| format!("'{text}' is not a hex address"))
}

fn main() {
	let cli = Cli::parse();
	init_logging(cli.verbose, cli.quiet);

	if let Err(e) = run(&cli) {
		eprintln!("error: {e}");
		process::exit(1);
	}
}

fn run(cli: &Cli) -> anyhow::Result<()> {
	let config = match &cli.config {
		Some(path) => Config::from_toml_file(path)?,
		None => Config::default(),
	};

	let assembler = Assembler::new(config);
	let assembly = assembler.assemble_file(&cli.input)?;

	for warning in &assembly.warnings {
		eprintln!("{warning}");
	}
	if !assembly.is_ok() {
		for error in &assembly.errors {
			eprintln!("{error}");
		}
		anyhow::bail!("assembly failed with {} errors", assembly.errors.len());
	}

	let simulation = &assembler.config().simulation;
	let limit = cli.steps.unwrap_or(simulation.instruction_limit);
	let mut engine = Engine::with_limit(limit);
	engine.load_assembly(&assembly);
	for &address in simulation.breakpoints.iter().chain(&cli.breakpoints) {
		engine.add_breakpoint(address);
	}

	let result = engine.run();
	if !cli.quiet {
		match result.status {
			ExecutionStatus::Halted => {
				println!("halted: {}", result.message.as_deref().unwrap_or("?"));
			}
			ExecutionStatus::Breakpoint => {
				let line = result
					.source_line
					.map(|n| format!(" (line {n})"))
					.unwrap_or_default();
				println!("stopped at breakpoint ${:04X}{line}", result.pc);
			}
			ExecutionStatus::Error => {
				println!("error: {}", result.message.as_deref().unwrap_or("?"));
			}
			ExecutionStatus::Running => unreachable!("run() never returns Running"),
		}
		print_registers(&engine);
	}

	if let Some(path) = &cli.dump {
		let file = File::create(path)?;
		serde_json::to_writer(file, &engine.snapshot())?;
	}

	if result.status == ExecutionStatus::Error {
		process::exit(2);
	}
	Ok(())
}

fn print_registers(engine: &Engine) {
	let regs = engine.registers();
	println!(
		"A={:02X} B={:02X} X={:04X} SP={:04X} PC={:04X} CCR={:08b} ({} instructions)",
		regs.a,
		regs.b,
		regs.x,
		regs.sp,
		regs.pc,
		regs.ccr.to_byte(),
		engine.cpu().instructions
	);
}

fn init_logging(verbose: u8, quiet: bool) {
	if quiet {
		return;
	}

	let level = match verbose {
		0 => log::LevelFilter::Error,
		1 => log::LevelFilter::Warn,
		2 => log::LevelFilter::Info,
		3 => log::LevelFilter::Debug,
		_ => log::LevelFilter::Trace,
	};

	env_logger::Builder::from_default_env().filter_level(level).init();
}
