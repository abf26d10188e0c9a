use std::path::Path;
use std::path::PathBuf;
use std::process;

use clap::Parser;
use hashstore_cli::Commands;
use hashstore_cli::HashstoreCli;
use hashstore_core::HashStore;
use hashstore_core::HashstoreConfig;
use hashstore_core::LocalFileSystem;
use hashstore_core::SyncOptions;
use hashstore_core::sync_targets;
use owo_colors::OwoColorize;
use tracing_subscriber::EnvFilter;

static USE_COLOR: std::sync::atomic::AtomicBool = std::sync::atomic::AtomicBool::new(true);

fn color_enabled() -> bool {
	USE_COLOR.load(std::sync::atomic::Ordering::Relaxed)
}

/// Apply ANSI color codes only when color is enabled.
macro_rules! colored {
	($text:expr,red) => {
		if color_enabled() {
			format!("{}", $text.red())
		} else {
			format!("{}", $text)
		}
	};
	($text:expr,green) => {
		if color_enabled() {
			format!("{}", $text.green())
		} else {
			format!("{}", $text)
		}
	};
	($text:expr,bold) => {
		if color_enabled() {
			format!("{}", $text.bold())
		} else {
			format!("{}", $text)
		}
	};
}

const LOG_ENV_VAR: &str = "HASHSTORE_LOG";

fn main() {
	let args = HashstoreCli::parse();

	// Respect NO_COLOR env var and --no-color flag.
	let use_color = !args.no_color && std::env::var_os("NO_COLOR").is_none();
	if !use_color {
		USE_COLOR.store(false, std::sync::atomic::Ordering::Relaxed);
	}

	init_tracing(args.verbose, use_color);

	// Install miette's fancy handler for rich error diagnostics.
	miette::set_hook(Box::new(move |_| {
		Box::new(
			miette::MietteHandlerOpts::new()
				.color(use_color)
				.unicode(use_color)
				.build(),
		)
	}))
	.ok();

	let result = match args.command {
		Some(Commands::Init) => run_init(&args),
		Some(Commands::Sync { dry_run, force }) => run_sync(&args, dry_run, force),
		Some(Commands::List) => run_list(&args),
		Some(Commands::Info) => run_info(&args),
		None => {
			eprintln!("No subcommand specified. Run `hashstore --help` for usage.");
			process::exit(1);
		}
	};

	if let Err(e) = result {
		match e.downcast::<hashstore_core::HashstoreError>() {
			Ok(err) => {
				let report: miette::Report = (*err).into();
				eprintln!("{report:?}");
			}
			Err(e) => {
				eprintln!("{} {e}", colored!("error:", red));
			}
		}
		process::exit(2);
	}
}

fn init_tracing(verbose: bool, use_color: bool) {
	let level = if verbose { "debug" } else { "warn" };
	let filter = EnvFilter::try_from_env(LOG_ENV_VAR)
		.unwrap_or_else(|_| EnvFilter::new(format!("hashstore_core={level},hashstore={level}")));

	tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_target(false)
		.with_ansi(use_color)
		.with_writer(std::io::stderr)
		.without_time()
		.init();
}

fn resolve_root(args: &HashstoreCli) -> PathBuf {
	let root = args
		.path
		.clone()
		.unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")));
	tracing::debug!(root = %root.display(), "resolved project root");
	root
}

fn print_field(label: &str, value: impl std::fmt::Display) {
	println!("{label:<16} {value}");
}

fn load_config(root: &Path) -> Result<HashstoreConfig, Box<dyn std::error::Error>> {
	Ok(HashstoreConfig::load(root)?.unwrap_or_default())
}

fn run_init(args: &HashstoreCli) -> Result<(), Box<dyn std::error::Error>> {
	let root = resolve_root(args);
	let config_path = root.join("hashstore.toml");

	if config_path.exists() {
		println!("Config file already exists: {}", config_path.display());
		return Ok(());
	}

	let sample_config = "# hashstore configuration\n\n# Where fingerprints are stored between \
	                     runs.\ncache_file = \".hashstore.json\"\n\n# Each target copies a \
	                     template to an output when either side changed.\n# [[targets]]\n# \
	                     template = \"templates/readme.md\"\n# output = \"README.md\"\n";

	std::fs::write(&config_path, sample_config)?;
	println!("Created {}", config_path.display());
	println!();
	println!("Next steps:");
	println!("  1. Add [[targets]] entries to hashstore.toml");
	println!("  2. Run `hashstore sync` to generate the outputs");

	Ok(())
}

fn run_sync(
	args: &HashstoreCli,
	dry_run: bool,
	force: bool,
) -> Result<(), Box<dyn std::error::Error>> {
	let root = resolve_root(args);
	let config = load_config(&root)?;

	if config.targets.is_empty() {
		println!("No targets configured in hashstore.toml.");
		return Ok(());
	}

	let mut store = HashStore::open(
		LocalFileSystem::new(&root),
		&config.store_options(force),
	)?;
	let result = sync_targets(&mut store, &config.targets, SyncOptions { dry_run })?;

	if dry_run {
		if result.is_up_to_date() {
			println!("All outputs are already up to date.");
		} else {
			println!("Dry run: would update {} output(s):", result.updated_count());
			for entry in &result.updated {
				println!("  {} ({})", entry.output.display(), entry.reason);
			}
		}
		return Ok(());
	}

	store.close()?;

	if result.is_up_to_date() {
		println!("All outputs are already up to date.");
		return Ok(());
	}

	println!(
		"{} {} output(s).",
		colored!("Updated", green),
		result.updated_count()
	);
	if args.verbose {
		for entry in &result.updated {
			println!(
				"  {} <- {} ({})",
				entry.output.display(),
				entry.template.display(),
				entry.reason
			);
		}
	}

	Ok(())
}

fn run_list(args: &HashstoreCli) -> Result<(), Box<dyn std::error::Error>> {
	let root = resolve_root(args);
	let config = load_config(&root)?;
	let store = HashStore::open(LocalFileSystem::new(&root), &config.store_options(false))?;

	if store.is_empty() {
		println!("No cached outputs found.");
		return Ok(());
	}

	println!("{}", colored!("Cached outputs:", bold));
	for (key, fingerprint) in store.entries() {
		println!("  {key}  {fingerprint}");
	}

	Ok(())
}

fn run_info(args: &HashstoreCli) -> Result<(), Box<dyn std::error::Error>> {
	let root = resolve_root(args);
	let config_path = HashstoreConfig::resolve_path(&root);
	let config = load_config(&root)?;
	let fs = LocalFileSystem::new(&root);
	let snapshot_exists = fs.resolve(&config.cache_file).is_file();
	let store = HashStore::open(fs, &config.store_options(false))?;

	println!("{}", colored!("hashstore info", bold));
	print_field(
		"Config file:",
		config_path.map_or_else(|| "(none)".to_string(), |path| make_relative(&path, &root)),
	);
	print_field(
		"Cache file:",
		if snapshot_exists {
			config.cache_file.display().to_string()
		} else {
			format!("{} (missing)", config.cache_file.display())
		},
	);
	print_field("Cached outputs:", store.len());
	print_field("Targets:", config.targets.len());

	Ok(())
}

fn make_relative(path: &Path, root: &Path) -> String {
	path.strip_prefix(root)
		.unwrap_or(path)
		.display()
		.to_string()
}
