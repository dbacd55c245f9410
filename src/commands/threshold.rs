//! Threshold command implementation

use anyhow::Result;

use crate::cli::{ThresholdAction, ThresholdArgs};

use super::State;

pub fn run(args: ThresholdArgs, state: &State) -> Result<()> {
    let settings = state.settings();

    match args.action.unwrap_or(ThresholdAction::Show) {
        ThresholdAction::Show => {
            let config = settings.get();
            println!("Threshold: {} ({} bytes)", config, config.threshold_bytes());
        }
        ThresholdAction::Set { value, unit } => {
            let config = settings.set(value, &unit)?;
            println!(
                "Threshold saved: {}. The next scan will run fresh.",
                config
            );
        }
    }

    Ok(())
}
