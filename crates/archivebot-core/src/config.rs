use std::{env, fs, path::Path};

use crate::{errors::Error, Result};

pub const DEFAULT_INACTIVE_DAYS: i64 = 30;

const DEFAULT_EMPTY_MESSAGE: &str = "This channel has no members and is being \
     archived. If it is still needed, anyone can unarchive it.";
const DEFAULT_INACTIVE_MESSAGE: &str = "This channel has seen no activity for \
     more than {days} days and is being archived. If it is still needed, \
     anyone can unarchive it.";

/// Typed configuration for one archival run.
///
/// Parsed once at startup from the environment (plus an optional `.env`
/// file) and passed by `Arc` into the components; nothing reads the
/// environment after this.
#[derive(Clone, Debug)]
pub struct Config {
    pub slack_token: String,

    // Pipeline toggles
    pub skip_empties: bool,
    pub skip_inactives: bool,

    // Policy
    pub inactive_days: i64,
    pub whitelist: Vec<String>,

    // Operator surface
    pub notify_target: Option<String>,
    pub debug: bool,

    // Notice templates, already rendered
    pub empty_notice: String,
    pub inactive_notice: String,
}

impl Config {
    pub fn load() -> Result<Self> {
        load_dotenv_if_present(Path::new(".env"));

        let slack_token = env_str("ARCHIVEBOT_SLACK_TOKEN")
            .and_then(non_empty)
            .ok_or_else(|| {
                Error::Config(
                    "ARCHIVEBOT_SLACK_TOKEN environment variable is required".to_string(),
                )
            })?;

        let skip_empties = env_bool("ARCHIVEBOT_NO_EMPTIES").unwrap_or(false);
        let skip_inactives = env_bool("ARCHIVEBOT_NO_INACTIVES").unwrap_or(false);

        let inactive_days = resolve_inactive_days(env_str("ARCHIVEBOT_INACTIVE_DAYS"));
        let whitelist = parse_csv(env_str("ARCHIVEBOT_CHANNEL_WHITELIST"));

        let notify_target = env_str("ARCHIVEBOT_NOTIFY").and_then(non_empty);
        let debug = env_bool("ARCHIVEBOT_DEBUG").unwrap_or(false);

        let empty_notice = env_str("ARCHIVEBOT_EMPTY_MESSAGE")
            .and_then(non_empty)
            .unwrap_or_else(|| DEFAULT_EMPTY_MESSAGE.to_string());
        let inactive_notice = env_str("ARCHIVEBOT_INACTIVE_MESSAGE")
            .and_then(non_empty)
            .unwrap_or_else(|| DEFAULT_INACTIVE_MESSAGE.to_string())
            .replace("{days}", &inactive_days.to_string());

        Ok(Self {
            slack_token,
            skip_empties,
            skip_inactives,
            inactive_days,
            whitelist,
            notify_target,
            debug,
            empty_notice,
            inactive_notice,
        })
    }
}

/// Zero, negative or unparsable thresholds fall back to the default.
fn resolve_inactive_days(raw: Option<String>) -> i64 {
    match raw.and_then(|s| s.trim().parse::<i64>().ok()) {
        Some(days) if days > 0 => days,
        _ => DEFAULT_INACTIVE_DAYS,
    }
}

fn parse_csv(v: Option<String>) -> Vec<String> {
    v.unwrap_or_default()
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

fn env_str(key: &str) -> Option<String> {
    env::var(key).ok()
}

fn env_bool(key: &str) -> Option<bool> {
    env_str(key).map(|s| parse_bool(&s))
}

fn parse_bool(s: &str) -> bool {
    matches!(
        s.trim().to_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

fn non_empty(s: String) -> Option<String> {
    if s.trim().is_empty() {
        None
    } else {
        Some(s)
    }
}

fn load_dotenv_if_present(path: &Path) {
    let Ok(contents) = fs::read_to_string(path) else {
        return;
    };

    for raw in contents.lines() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let Some((k, v)) = line.split_once('=') else {
            continue;
        };

        let key = k.trim();
        if key.is_empty() {
            continue;
        }
        if env::var_os(key).is_some() {
            continue; // do not override existing env
        }

        let mut val = v.trim().to_string();
        // Strip optional surrounding quotes.
        if val.len() >= 2
            && ((val.starts_with('"') && val.ends_with('"'))
                || (val.starts_with('\'') && val.ends_with('\'')))
        {
            val = val[1..val.len() - 1].to_string();
        }

        env::set_var(key, val);
    }
}
