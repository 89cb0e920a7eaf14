//! CLI entrypoint.

use std::error::Error;
use std::fs;
use std::io::{self, IsTerminal, Write};
use std::path::PathBuf;
use std::process;

use clap::{Parser, ValueEnum};
use owo_colors::OwoColorize;
use stubdoc::{DirectorySource, Layout, ParseOptions, Reconstruction, Reconstructor};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, ValueEnum)]
/// Layouts accepted by `--layout`.
enum LayoutArg {
	/// developer.android.com pages.
	Android,
	/// developers.google.com pages.
	Google,
}

impl From<LayoutArg> for Layout {
	fn from(arg: LayoutArg) -> Self {
		match arg {
			LayoutArg::Android => Self::Android,
			LayoutArg::Google => Self::Google,
		}
	}
}

#[derive(Parser)]
#[command(
	name = "stubdoc",
	about = "Reconstruct Java API declarations from saved javadoc reference pages",
	version
)]
struct Cli {
	/// Root of the saved documentation site (the directory containing `reference/`)
	root: PathBuf,

	/// Dotted package name of the library, e.g. `com.android.billingclient`
	library: String,

	/// Page layout; detected from the class index when omitted
	#[arg(short = 'l', long, value_enum)]
	layout: Option<LayoutArg>,

	/// Write the declarations to a file instead of stdout
	#[arg(short = 'o', long)]
	output: Option<PathBuf>,

	/// Abort on the first page that fails to parse
	#[arg(long, default_value_t = false)]
	fail_fast: bool,

	/// Maximum nesting of generic argument lists
	#[arg(long, value_name = "N")]
	max_generic_depth: Option<usize>,

	/// Log every parsed section and member
	#[arg(short = 'v', long, default_value_t = false, conflicts_with = "silent")]
	verbose: bool,

	/// Only log errors
	#[arg(short = 's', long, default_value_t = false)]
	silent: bool,

	/// Disable ANSI colors in CLI output
	#[arg(long, default_value_t = false)]
	no_color: bool,
}

fn init_tracing(cli: &Cli) {
	let default = if cli.verbose {
		"stubdoc=debug"
	} else if cli.silent {
		"error"
	} else {
		"stubdoc=info"
	};
	let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
	tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_writer(io::stderr)
		.with_ansi(should_color_output(cli))
		.with_target(false)
		.init();
}

fn should_color_output(cli: &Cli) -> bool {
	if cli.no_color {
		return false;
	}
	if std::env::var_os("NO_COLOR").is_some() {
		return false;
	}
	io::stderr().is_terminal()
}

fn main() {
	let cli = Cli::parse();
	init_tracing(&cli);

	if let Err(e) = run(&cli) {
		if should_color_output(&cli) {
			eprintln!("{} {e}", "error:".red().bold());
		} else {
			eprintln!("error: {e}");
		}
		process::exit(1);
	}
}

fn run(cli: &Cli) -> Result<(), Box<dyn Error>> {
	let reconstructor = Reconstructor::new()
		.with_layout(cli.layout.map(Layout::from))
		.with_options(ParseOptions::new().with_max_generic_depth(cli.max_generic_depth))
		.with_fail_fast(cli.fail_fast);

	let result = reconstructor.run(DirectorySource::new(&cli.root), &cli.library)?;
	let json = serde_json::to_string_pretty(&result.declarations)?;

	match &cli.output {
		Some(path) => fs::write(path, json + "\n")?,
		None => {
			let mut stdout = io::stdout().lock();
			writeln!(stdout, "{json}")?;
		}
	}

	report(cli, &result);
	Ok(())
}

fn report(cli: &Cli, result: &Reconstruction) {
	if cli.silent {
		return;
	}
	let color = should_color_output(cli);
	let summary = format!(
		"{} declarations ({} layout), {} failed pages",
		result.declaration_count(),
		result.layout,
		result.failures.len()
	);

	if result.failures.is_empty() {
		if color {
			eprintln!("{}", summary.green());
		} else {
			eprintln!("{summary}");
		}
		return;
	}

	if color {
		eprintln!("{}", summary.yellow());
	} else {
		eprintln!("{summary}");
	}
	for failure in &result.failures {
		let category = format!("{:?}", failure.category()).to_lowercase();
		if color {
			eprintln!("  {} {failure}", format!("[{category}]").dimmed());
		} else {
			eprintln!("  [{category}] {failure}");
		}
	}
}
