//! Assembly speed benchmarks
//!
//! These benchmarks measure two-pass throughput on synthetic programs to
//! track performance across changes.

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use m6800_asm::{Assembler, Config};

/// Generate a straight-line program with the given instruction count.
fn generate_simple_program(instruction_count: usize) -> String {
	let mut program = String::new();
	program.push_str("ORG $0100\n");

	for i in 0..instruction_count {
		program.push_str(&format!("LDA #${:02X}\n", i % 256));
		program.push_str(&format!("STA ${:04X}\n", 0x2000 + (i % 0x1000)));
	}

	program.push_str("SWI\nEND\n");
	program
}

/// Generate a program dense with labels and forward branches.
fn generate_branchy_program(label_count: usize) -> String {
	let mut program = String::new();
	program.push_str("ORG $0100\n");

	for i in 0..label_count {
		program.push_str(&format!("label_{i} NOP\n"));
		if i + 1 < label_count {
			program.push_str(&format!("BRA label_{}\n", i + 1));
		}
	}

	program.push_str("SWI\nEND\n");
	program
}

fn bench_simple_assembly(c: &mut Criterion) {
	let mut group = c.benchmark_group("simple_assembly");

	for count in [100, 1_000, 10_000] {
		let source = generate_simple_program(count);
		group.throughput(Throughput::Bytes(source.len() as u64));
		group.bench_with_input(BenchmarkId::from_parameter(count), &source, |b, source| {
			let assembler = Assembler::new(Config::default());
			b.iter(|| {
				let assembly = assembler.assemble_source(source);
				assert!(assembly.is_ok());
				assembly.program.len()
			});
		});
	}

	group.finish();
}

fn bench_branchy_assembly(c: &mut Criterion) {
	let mut group = c.benchmark_group("branchy_assembly");

	for count in [100, 1_000] {
		let source = generate_branchy_program(count);
		group.throughput(Throughput::Bytes(source.len() as u64));
		group.bench_with_input(BenchmarkId::from_parameter(count), &source, |b, source| {
			let assembler = Assembler::new(Config::default());
			b.iter(|| {
				let assembly = assembler.assemble_source(source);
				assert!(assembly.is_ok());
				assembly.program.len()
			});
		});
	}

	group.finish();
}

criterion_group!(benches, bench_simple_assembly, bench_branchy_assembly);
criterion_main!(benches);
