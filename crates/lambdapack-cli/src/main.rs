use clap::{Parser, Subcommand};
use lambdapack::{
    builder::BuildOutcome,
    commands::{
        build::{self, BuildArgs},
        clean::{self, CleanArgs},
        units::{self, UnitsArgs},
    },
    GlobalOpts,
};
use lambdapack_logger as logger;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "lambdapack")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(
    about = "AWS SAM function bundler",
    long_about = "lambdapack builds every AWS::Serverless::Function of a SAM template into its own deployment directory."
)]
struct Cli {
    #[command(flatten)]
    global: GlobalOpts,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run `sam build` and assemble one directory per function
    Build(BuildArgs),
    /// Remove the build directory
    Clean(CleanArgs),
    /// List the functions the template resolves to
    Units(UnitsArgs),
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "lambdapack=warn".into()))
        .with(fmt::layer().compact().with_writer(std::io::stderr))
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing();

    if let Err(e) =
        logger::init_with_verbosity(cli.global.verbosity_level(), cli.global.log_file.as_deref())
    {
        eprintln!("Warning: Failed to initialize logger: {}", e);
    }

    match cli.command {
        Commands::Build(args) => match build::handle_build(&args, &cli.global) {
            BuildOutcome::Success(directory) => {
                logger::success(&format!("Build finished in {}", directory.display()));
            }
            BuildOutcome::Aborted(message) => {
                logger::error(&message);
                logger::show_log_path();
                std::process::exit(1);
            }
        },
        Commands::Clean(args) => {
            if let Err(e) = clean::handle_clean(&args, &cli.global) {
                logger::error(&format!("Clean failed: {}", e));
                std::process::exit(1);
            }
        }
        Commands::Units(args) => {
            if let Err(e) = units::handle_units(&args, &cli.global) {
                logger::error(&e.abort_message());
                std::process::exit(1);
            }
        }
    }
}
