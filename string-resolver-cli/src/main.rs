use clap::{Parser, Subcommand};
use string_resolver::Platform;
use string_resolver_cli::build::{BuildOptions, run_build_command};
use string_resolver_cli::diff::{DiffOptions, run_diff_command};
use string_resolver_cli::logging;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Increase log verbosity (-v info, -vv debug). RUST_LOG overrides it.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    commands: Commands,
}

/// Supported subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Combine all content strings for one platform and app version, apply
    /// version limits and write one table per culture.
    Build {
        /// Path to the strings.toml configuration file
        #[arg(short, long)]
        config: String,

        /// Build for iOS
        #[arg(long, conflicts_with = "android")]
        ios: bool,

        /// Build for Android
        #[arg(long)]
        android: bool,

        /// App version used to evaluate version-gated strings
        #[arg(long = "version")]
        app_version: Option<String>,

        /// Directory for the per-culture tables (overrides output.strings)
        #[arg(short, long)]
        output_dir: Option<String>,

        /// File for the accessor descriptors (overrides output.code)
        #[arg(long)]
        accessors: Option<String>,
    },

    /// Show the strings whose value changed between two content directories.
    Diff {
        /// Content directory of the earlier revision
        before: String,

        /// Content directory of the later revision
        after: String,

        /// Platform to resolve changes for
        #[arg(long, default_value = "ios", value_parser = parse_platform)]
        platform: Platform,

        /// App version to resolve changes for
        #[arg(long = "version", default_value = "1.0.0")]
        app_version: String,

        /// Write the diff to a file instead of stdout
        #[arg(short, long)]
        output: Option<String>,
    },
}

fn parse_platform(value: &str) -> Result<Platform, String> {
    value.parse::<Platform>().map_err(|e| e.to_string())
}

fn main() {
    let args = Args::parse();
    logging::init(args.verbose);

    let result = match args.commands {
        Commands::Build {
            config,
            ios,
            android,
            app_version,
            output_dir,
            accessors,
        } => {
            let platform = if ios {
                Some(Platform::Ios)
            } else if android {
                Some(Platform::Android)
            } else {
                None
            };
            run_build_command(BuildOptions {
                config,
                platform,
                version: app_version,
                output_dir,
                accessors,
            })
        }
        Commands::Diff {
            before,
            after,
            platform,
            app_version,
            output,
        } => run_diff_command(DiffOptions {
            before,
            after,
            platform,
            version: app_version,
            output,
        }),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
