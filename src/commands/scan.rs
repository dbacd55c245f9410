//! Scan command implementation

use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};
use std::io::IsTerminal;
use std::time::Duration;

use crate::cli::ScanArgs;
use crate::config::Config;
use crate::dashboard::{format_json, format_text, Dashboard};

use super::State;

/// Run the scan command
pub fn run(args: ScanArgs, config: &Config, state: &State, quiet: bool) -> Result<()> {
    let mut options = config.scan_options();
    if let Some(exclude) = args.exclude {
        options = options.with_exclude(exclude);
    }
    if args.follow_symlinks {
        options = options.with_follow_symlinks(true);
    }
    if args.one_file_system {
        options = options.with_one_file_system(true);
    }

    let root = args.path.unwrap_or_else(|| config.scanner.root.clone());
    let dashboard = Dashboard::new(
        root.clone(),
        options,
        state.settings(),
        state.cache.clone(),
        config.scan_ttl(),
        config.display.page_size,
    );

    if args.refresh {
        dashboard.refresh()?;
    }

    tracing::info!(path = %root.display(), page = args.page, "Listing large files");

    let spinner = if quiet || args.json || !std::io::stderr().is_terminal() {
        ProgressBar::hidden()
    } else {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(ProgressStyle::with_template("{spinner:.cyan} {msg}")?);
        spinner.enable_steady_tick(Duration::from_millis(120));
        spinner
    };
    spinner.set_message(format!("Scanning {}...", root.display()));

    let view = dashboard.view_with_progress(args.page, |visited| {
        spinner.set_message(format!("Scanning {}... {} files", root.display(), visited));
    });
    spinner.finish_and_clear();
    let view = view?;

    let output = if args.json {
        format_json(&view, true)?
    } else {
        format_text(&view)
    };
    print!("{}", output);
    if args.json {
        println!();
    }

    Ok(())
}
