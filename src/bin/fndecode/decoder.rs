use colored::Colorize;

use fndecode::decode::{Placement, PlacementMode, Resolver, Skipped, Summary};
use fndecode::{
    colorize_bool, path_to_filename_string, path_to_string_relative, print_bold, print_error, print_warning,
};

use crate::config::Config;
use crate::logger::FileLogger;

/// Decode and place all files given in the config, then print a summary.
pub fn run(config: &Config) -> anyhow::Result<()> {
    if config.verbose {
        eprintln!("Config: {config:#?}");
        eprintln!("Preserve original: {}", colorize_bool(config.preserve_original));
    }

    let mut logger = if config.log {
        match FileLogger::new() {
            Ok(logger) => Some(logger),
            Err(error) => {
                print_warning!("Logging disabled: {error:#}");
                None
            }
        }
    } else {
        None
    };
    if let Some(logger) = logger.as_mut() {
        logger.log_init(config);
    }

    let resolver = Resolver::new(config.options.clone());
    let summary = resolver.resolve_batch(&config.paths, &config.destination, config.preserve_original)?;

    for placement in &summary.placed {
        print_placement(placement, summary.dryrun, config.verbose);
        if let Some(logger) = logger.as_mut() {
            logger.log_placement(placement);
        }
    }
    for skipped in &summary.skipped {
        print_skipped(skipped);
        if let Some(logger) = logger.as_mut() {
            logger.log_skipped(skipped);
        }
    }

    print_summary(&summary);
    if let Some(logger) = logger.as_mut() {
        logger.log_summary(&summary);
        if config.verbose {
            println!("Log written to: {}", logger.path().display());
        }
    }

    Ok(())
}

fn print_placement(placement: &Placement, dryrun: bool, verbose: bool) {
    let heading = if dryrun {
        "Dryrun:".cyan().bold()
    } else {
        match placement.mode {
            PlacementMode::Copy => "Copy:".green().bold(),
            PlacementMode::Move => "Move:".magenta().bold(),
        }
    };
    println!("{heading}");
    if verbose {
        fndecode::show_diff(
            &path_to_filename_string(&placement.source),
            &path_to_filename_string(&placement.destination),
        );
    }
    println!(
        "  {} -> {}",
        path_to_string_relative(&placement.source),
        path_to_string_relative(&placement.destination)
    );
}

fn print_skipped(skipped: &Skipped) {
    print_warning!(
        "Skipped: {} ({})",
        path_to_string_relative(&skipped.path),
        skipped.reason
    );
}

fn print_summary(summary: &Summary) {
    println!();
    if summary.placed.is_empty() && !summary.skipped.is_empty() {
        print_error!("No files were processed: {summary}");
    } else {
        print_bold!("Done: {summary}");
    }
}
