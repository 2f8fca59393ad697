//! bmpblur CLI - Gaussian blur for BMP images
//!
//! Command-line interface for the bmpblur image processor.

use clap::Parser;
use env_logger::Env;
use log::info;

use bmpblur::cli::{commands, Cli, Commands};
use bmpblur::{BlurError, Result};

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(default_filter)).init();

    info!("bmpblur v{}", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Some(cmd) => handle_command(cmd),
        None => {
            println!("bmpblur v{}", env!("CARGO_PKG_VERSION"));
            println!("Use --help for available commands");
            Ok(())
        }
    }
}

fn handle_command(cmd: Commands) -> Result<()> {
    match cmd {
        Commands::Blur {
            input,
            output,
            options,
        } => {
            let config = options.resolve()?;
            commands::blur_file(&input, &output, &config)?;
            println!("Wrote {}", output.display());
            Ok(())
        }
        Commands::Batch {
            input_dir,
            output_dir,
            options,
        } => {
            let config = options.resolve()?;
            let summary = commands::batch(&input_dir, &output_dir, &config)?;
            let total = summary.written.len() + summary.failed.len();
            println!("Blurred {} of {} images", summary.written.len(), total);
            for (path, reason) in &summary.failed {
                println!("  failed: {} ({})", path.display(), reason);
            }
            if summary.failed.is_empty() {
                Ok(())
            } else {
                Err(BlurError::BatchFailed {
                    failed: summary.failed.len(),
                    total,
                })
            }
        }
        Commands::Info { input } => commands::show_info(&input),
        Commands::Kernel { options } => commands::show_kernel(&options.resolve()?),
        Commands::Generate {
            output,
            width,
            height,
            pattern,
        } => commands::generate(&output, width, height, pattern),
    }
}
