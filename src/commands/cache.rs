//! Cache command implementation

use anyhow::Result;

use crate::cli::{CacheAction, CacheArgs};
use crate::settings::SCAN_CACHE_KEY;

use super::State;

pub fn run(args: CacheArgs, state: &State) -> Result<()> {
    match args.action {
        CacheAction::Status => match state.cache.remaining(SCAN_CACHE_KEY) {
            Some(left) => {
                let mins = left.as_secs().div_ceil(60);
                println!("Scan result cached, expires in {} min", mins);
            }
            None => println!("No cached scan result"),
        },
        CacheAction::Clear => {
            state.cache.invalidate(SCAN_CACHE_KEY)?;
            println!("Cached scan result cleared");
        }
    }

    Ok(())
}
