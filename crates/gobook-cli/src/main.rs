//! gobook CLI - generate markdown documentation for Go packages

use std::env;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};

mod generate;
mod init;
mod site;
mod tracing_config;

#[derive(Parser)]
#[command(name = "gobook")]
#[command(version = gobook_core::VERSION)]
#[command(about = "Markdown documentation for Go packages", long_about = None)]
struct Cli {
    /// Log debug output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate the documentation tree (the default command)
    Generate {
        /// Configuration file; searched for in the current directory when omitted
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Exit with an error if any package could not be documented
        #[arg(long)]
        strict: bool,
    },

    /// Extract one package directory and print its model as JSON
    Extract {
        /// Directory holding the package sources
        dir: PathBuf,

        /// Package name used for the import path (defaults to the directory name)
        #[arg(long)]
        name: Option<String>,

        /// Import path root, e.g. github.com/acme/kit
        #[arg(long, default_value = "")]
        import_root: String,

        /// Also include unexported declarations
        #[arg(long)]
        include_unexported: bool,
    },

    /// Write a starter docs-config.json in the current directory
    Init {
        /// Repository owner
        #[arg(long)]
        owner: Option<String>,

        /// Repository name (defaults to the directory name)
        #[arg(long)]
        name: Option<String>,

        /// Overwrite an existing configuration file
        #[arg(long)]
        force: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Commands::Generate {
        config: None,
        strict: false,
    });

    match command {
        Commands::Generate { config, strict } => {
            let cwd = env::current_dir().context("Failed to get current directory")?;
            let (config, path) = gobook_config::load(&cwd, config.as_deref())
                .context("Failed to load configuration")?;
            tracing_config::init(cli.verbose || config.output.verbose)?;

            let summary = generate::run(&config, &path)?;
            summary.print(&config.repository.name);
            if strict && !summary.failed.is_empty() {
                bail!("{} package(s) could not be documented", summary.failed.len());
            }
        }

        Commands::Extract {
            dir,
            name,
            import_root,
            include_unexported,
        } => {
            tracing_config::init(cli.verbose)?;
            let json = generate::extract_json(&dir, name, &import_root, include_unexported)?;
            println!("{json}");
        }

        Commands::Init { owner, name, force } => {
            tracing_config::init(cli.verbose)?;
            init::init_config(init::InitOptions { owner, name, force })?;
        }
    }

    Ok(())
}
