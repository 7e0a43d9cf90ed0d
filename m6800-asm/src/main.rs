//! 6800 Assembler CLI
//!
//! Batch front end for the assembler: reads a source file, writes the object
//! file plus optional listing and symbol exports, and prints the collected
//! diagnostics.

use clap::Parser;
use m6800_asm::{Assembler, Config, OutputFormat, output};
use std::fs::File;
use std::path::PathBuf;
use std::process;

#[derive(Parser)]
#[command(
    name = "m68asm",
    version = m6800_asm::VERSION,
    about = "A two-pass Motorola 6800 assembler",
    long_about = "Assembles the classic 6800 dialect (ORG/EQU/FCB/FDB/END, \
                  $hex/%binary/decimal literals) into raw binary images or \
                  Intel HEX records."
)]
struct Cli {
	/// Input assembly file
	#[arg(value_name = "INPUT")]
	input: PathBuf,

	/// Output object file
	#[arg(short, long, value_name = "FILE")]
	output: Option<PathBuf>,

	/// Emit Intel HEX records instead of a raw image
	#[arg(short = 'x', long)]
	hex: bool,

	/// Write a listing file
	#[arg(short = 'L', long, value_name = "FILE")]
	listing: Option<PathBuf>,

	/// Write a JSON symbol export
	#[arg(short = 's', long, value_name = "FILE")]
	symbols: Option<PathBuf>,

	/// Treat warnings as errors
	#[arg(short = 'W', long)]
	warnings_as_errors: bool,

	/// Verbose output
	#[arg(short, long, action = clap::ArgAction::Count)]
	verbose: u8,

	/// Quiet mode (suppress non-error output)
	#[arg(short, long)]
	quiet: bool,
}

fn main() {
	let cli = Cli::parse();
	init_logging(cli.verbose, cli.quiet);

	let mut config = Config::new().with_source_file(cli.input.clone());
	if cli.hex {
		config = config.with_format(OutputFormat::IntelHex);
	}
	if let Some(path) = &cli.output {
		config = config.with_object_file(path.clone());
	}
	config.assembly.warnings_as_errors = cli.warnings_as_errors;

	if let Err(e) = run(&cli, config) {
		eprintln!("error: {e}");
		process::exit(1);
	}
}

fn run(cli: &Cli, config: Config) -> anyhow::Result<()> {
	let assembler = Assembler::new(config);
	let assembly = assembler.assemble_file(&cli.input)?;

	for warning in &assembly.warnings {
		eprintln!("{warning}");
	}
	for error in &assembly.errors {
		eprintln!("{error}");
	}

	if let Some(path) = &cli.listing {
		let mut file = File::create(path)?;
		output::write_listing(&assembly, &mut file)?;
	}
	if let Some(path) = &cli.symbols {
		let mut file = File::create(path)?;
		output::write_json(&assembly.symbols, &mut file)?;
	}

	let failed = !assembly.is_ok()
		|| (assembler.config().assembly.warnings_as_errors && !assembly.warnings.is_empty());
	if failed {
		anyhow::bail!("{} errors, {} warnings", assembly.errors.len(), assembly.warnings.len());
	}

	let object_path = assembler.config().object_path().expect("source file is set");
	let mut file = File::create(&object_path)?;
	match assembler.config().output.format {
		OutputFormat::Binary => output::write_image(&assembly.program, &mut file)?,
		OutputFormat::IntelHex => output::write_ihex(&assembly.program, &mut file)?,
	}

	if !cli.quiet {
		let stats = assembly.stats();
		println!(
			"assembled {} lines, {} symbols, {} bytes -> {}",
			stats.lines,
			stats.symbols,
			stats.bytes,
			object_path.display()
		);
	}

	Ok(())
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
