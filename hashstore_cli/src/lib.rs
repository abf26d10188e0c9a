use std::path::PathBuf;

use clap::Parser;
use clap::Subcommand;

#[derive(Parser)]
#[command(
	author,
	version,
	about = "Regenerate output files only when their templates or contents changed.",
	long_about = "hashstore keeps a fingerprint of every generated output file and decides, on \
	              each run, which outputs must be regenerated from their templates.\n\nAn output \
	              is regenerated when it is missing, when it has never been recorded, when its \
	              template content or permissions changed, or when the output itself was edited \
	              by hand.\n\nQuick start:\n  hashstore init   Create a hashstore.toml\n  \
	              hashstore sync   Copy stale templates to their outputs\n  hashstore list   \
	              Show recorded fingerprints\n  hashstore info   Summarize config and cache"
)]
pub struct HashstoreCli {
	#[command(subcommand)]
	pub command: Option<Commands>,

	/// Path to the project root directory.
	#[arg(long, short, global = true)]
	pub path: Option<PathBuf>,

	/// Enable verbose output.
	#[arg(long, short, global = true, default_value_t = false)]
	pub verbose: bool,

	/// Disable colored output.
	#[arg(long, global = true, default_value_t = false)]
	pub no_color: bool,
}

#[derive(Subcommand)]
pub enum Commands {
	/// Initialize hashstore in a project by creating a sample config file.
	///
	/// Creates a `hashstore.toml` in the project root with a commented
	/// example target. If the file already exists, this command is a no-op
	/// and exits successfully.
	Init,
	/// Copy every stale template to its output and record the result.
	///
	/// Each `[[targets]]` entry in `hashstore.toml` is checked against the
	/// cache snapshot. Outputs that are missing, unrecorded, out of date with
	/// their template, or edited by hand are rewritten and receive the
	/// template's permission bits. The snapshot is written once at the end.
	Sync {
		/// Report which outputs would be rewritten without writing files or
		/// the cache snapshot.
		#[arg(long, default_value_t = false)]
		dry_run: bool,

		/// Ignore the existing cache snapshot and treat every output as
		/// changed.
		#[arg(long, default_value_t = false)]
		force: bool,
	},
	/// List every output recorded in the cache snapshot with its fingerprint.
	List,
	/// Print a summary of the config file and cache snapshot.
	Info,
}
