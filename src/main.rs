use clap::{Parser, Subcommand};
use enigma::cli::{convert_files, generate_setup, show_info, show_info_json, ConvertOptions, KeygenOptions};
use enigma::MachineConfig;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Version info from build.rs
const VERSION: &str = env!("CARGO_PKG_VERSION");
const BUILD: &str = env!("ENIGMA_BUILD");
const PROFILE: &str = env!("ENIGMA_PROFILE");
const GIT_HASH: &str = env!("ENIGMA_GIT_HASH");

fn get_version() -> &'static str {
    use std::sync::OnceLock;
    static VERSION_STRING: OnceLock<String> = OnceLock::new();
    VERSION_STRING.get_or_init(|| format!("{} {} build {} ({})", PROFILE, VERSION, BUILD, GIT_HASH))
}

#[derive(Parser)]
#[command(name = "enigma")]
#[command(author, about = "Rotor cipher machine simulator", long_about = None)]
struct Cli {
    /// Print version
    #[arg(short = 'V', long)]
    version: bool,

    /// Trace every keypress through the machine (stderr)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Encrypt or decrypt messages
    #[command(alias = "c")]
    Convert {
        /// Machine description (text, or JSON with a .json extension)
        config: PathBuf,

        /// Messages to convert (reads stdin if omitted)
        input: Option<PathBuf>,

        /// Where to write the result (writes stdout if omitted)
        output: Option<PathBuf>,
    },

    /// Describe a machine configuration
    #[command(alias = "i")]
    Info {
        /// Machine description
        config: PathBuf,

        /// Print the description as JSON
        #[arg(long)]
        json: bool,
    },

    /// Generate a random setting line for a machine
    #[command(alias = "k")]
    Keygen {
        /// Machine description
        config: PathBuf,

        /// Seed for a reproducible key
        #[arg(long)]
        seed: Option<u64>,

        /// Number of plugboard pairs
        #[arg(long, default_value = "10")]
        plugs: usize,

        /// Leave the ring setting out
        #[arg(long)]
        no_ring: bool,
    },
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "enigma=debug" } else { "enigma=warn" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if cli.version {
        println!("enigma {}", get_version());
        return ExitCode::SUCCESS;
    }

    let command = match cli.command {
        Some(cmd) => cmd,
        None => {
            use clap::CommandFactory;
            let _ = Cli::command().print_help();
            println!();
            return ExitCode::SUCCESS;
        }
    };

    init_tracing(cli.verbose);

    let result = match command {
        Commands::Convert { config, input, output } => {
            let options = ConvertOptions {
                verbose: cli.verbose,
            };
            convert_files(&config, input.as_deref(), output.as_deref(), &options).map(|messages| {
                tracing::info!(messages, "conversion finished");
            })
        }

        Commands::Info { config, json } => {
            let info = if json {
                show_info_json(&config).map(|s| s + "\n")
            } else {
                show_info(&config)
            };
            info.map(|text| print!("{}", text))
        }

        Commands::Keygen {
            config,
            seed,
            plugs,
            no_ring,
        } => {
            let options = KeygenOptions {
                seed,
                plugs,
                ring: !no_ring,
            };
            MachineConfig::load(&config)
                .and_then(|cfg| generate_setup(&cfg, &options))
                .map(|setup| println!("{}", setup))
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
