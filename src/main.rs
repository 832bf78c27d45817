use std::path::{Path, PathBuf};
use anyhow::{anyhow, bail, Context, Result};
use clap::Parser;
use log::{error, info, warn, LevelFilter};
use dukepool::{ClassFile, ConstantPool};

#[derive(Debug, Parser)]
#[command(about = "Prints the annotations stored in java class files")]
struct Cli {
	/// Be verbose.
	#[arg(short = 'v', long = "verbose")]
	verbose: bool,

	/// Also print every entry of the constant pool.
	#[arg(long = "pool")]
	pool: bool,

	/// Write each class file back out and check that this gives the same bytes.
	#[arg(long = "verify")]
	verify: bool,

	/// The class files to inspect.
	#[arg(required = true)]
	files: Vec<PathBuf>,
}

fn setup_logging(verbose: bool) -> Result<()> {
	fern::Dispatch::new()
		.format(|out, message, record| {
			out.finish(format_args!("[{} {}] {}", record.level(), record.target(), message))
		})
		.level(if verbose { LevelFilter::Trace } else { LevelFilter::Info })
		.chain(std::io::stderr())
		.apply()
		.context("failed to set up logging")
}

fn inspect(cli: &Cli, path: &Path) -> Result<()> {
	let bytes = std::fs::read(path)
		.with_context(|| anyhow!("failed to read {path:?}"))?;

	let class = ClassFile::read(&mut bytes.as_slice())
		.with_context(|| anyhow!("while reading class file {path:?}"))?;

	let name = class.name()?;
	info!("{path:?}: {name}, version {}.{}, {} constant pool slots", class.major_version, class.minor_version, class.pool.len());

	println!("{name}:");
	for (location, annotation) in class.annotations()? {
		println!("\t{location}: {}", annotation.to_short_string(&class.pool)?);
	}
	for (method, value) in class.annotation_defaults()? {
		println!("\tdefault of {method}: {}", value.to_short_string(&class.pool)?);
	}

	if cli.pool {
		for line in pool_lines(&class.pool) {
			println!("\t{line}");
		}
	}

	if cli.verify {
		let written = class.to_bytes()
			.with_context(|| anyhow!("while writing class file {path:?}"))?;
		if written != bytes {
			let offset = written.iter().zip(&bytes)
				.position(|(a, b)| a != b)
				.unwrap_or(written.len().min(bytes.len()));
			bail!("re-encoding {path:?} gives different bytes: first difference at offset {offset}, read {} bytes, wrote {} bytes",
				bytes.len(), written.len());
		}
		info!("{path:?}: re-encoding gives the same bytes");
	}

	Ok(())
}

/// Renders each pool entry as `#index = rendering`. Entries that can't be rendered show the error instead.
fn pool_lines(pool: &ConstantPool) -> Vec<String> {
	pool.iter()
		.map(|(index, _)| match pool.render(index) {
			Ok(rendering) => format!("#{index} = {rendering}"),
			Err(e) => {
				warn!("failed to render constant pool entry #{index}: {e}");
				format!("#{index} = <{e}>")
			},
		})
		.collect()
}

fn main() -> Result<()> {
	let cli = Cli::parse();
	setup_logging(cli.verbose)?;

	let mut failed = 0;
	for path in &cli.files {
		if let Err(e) = inspect(&cli, path) {
			error!("{e:?}");
			failed += 1;
		}
	}

	if failed != 0 {
		bail!("failed to inspect {failed} of {} class files", cli.files.len());
	}
	Ok(())
}

#[cfg(test)]
mod testing {
	use anyhow::Result;
	use pretty_assertions::assert_eq;
	use dukepool::ConstantPool;
	use crate::pool_lines;

	#[test]
	fn pool_lines_keep_going_after_a_failure() -> Result<()> {
		// #1 a method handle pointing to itself, #2 Utf8 "a"
		let pool = ConstantPool::read(&mut [0u8, 3, 15, 6, 0, 1, 1, 0, 1, b'a'].as_slice())?;

		let lines = pool_lines(&pool);
		assert_eq!(lines.len(), 2);
		assert!(lines[0].starts_with("#1 = <"), "{}", lines[0]);
		assert_eq!(lines[1], "#2 = a");
		Ok(())
	}
}
