//! Reputation command implementation

use anyhow::Result;

use crate::cli::{KeyAction, ReputationAction, ReputationArgs};
use crate::config::Config;
use crate::reputation::{ReputationReport, ReputationService};

use super::State;

pub fn run(args: ReputationArgs, config: &Config, state: &State) -> Result<()> {
    let service = ReputationService::new(
        state.store.clone(),
        state.cache.clone(),
        config.reputation_ttl(),
    );

    match args.action {
        ReputationAction::Key { action } => match action.unwrap_or(KeyAction::Show) {
            KeyAction::Show => match service.api_key()? {
                Some(key) => println!("API key is set (ending in {})", key_suffix(&key)),
                None => println!("No API key saved"),
            },
            KeyAction::Set { key } => {
                service.set_api_key(&key)?;
                println!("API key saved");
            }
            KeyAction::Reset => {
                service.reset_api_key()?;
                println!("API key removed");
            }
        },
        ReputationAction::Status { ip } => match service.cached(&ip)? {
            Some((report, left)) => {
                print!("{}", format_report(&report));
                println!(
                    "Cached, expires in {} min (lifetime {} h)",
                    left.as_secs().div_ceil(60),
                    service.ttl().as_secs() / 3600
                );
            }
            None => println!("No cached report for {}", ip.trim()),
        },
        ReputationAction::Forget { ip } => {
            service.forget(&ip)?;
            println!("Cached report for {} cleared", ip.trim());
        }
    }

    Ok(())
}

/// Last four characters of `key`, enough to tell keys apart.
fn key_suffix(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    chars[chars.len().saturating_sub(4)..].iter().collect()
}

fn format_report(report: &ReputationReport) -> String {
    let verdict = if report.is_suspicious() {
        "suspicious"
    } else {
        "clean"
    };
    format!(
        "{}: score {}/100 ({})\nCountry: {}\nISP: {}\nLast reported: {}\n",
        report.ip_address,
        report.abuse_confidence_score,
        verdict,
        report.country_code.as_deref().unwrap_or("unknown"),
        report.isp.as_deref().unwrap_or("unknown"),
        report.last_reported_at.as_deref().unwrap_or("never"),
    )
}
