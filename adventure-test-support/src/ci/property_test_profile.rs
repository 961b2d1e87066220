//! Property-test run profile parsing for CI and local overrides.
//!
//! The graph builder suites run thousands of seeded builds; this module lets CI
//! and local runs scale the case count and the per-case wall-clock budget
//! without touching the suites themselves.

use std::{env, time::Duration};

/// Environment variable controlling proptest case counts.
pub const PROGTEST_CASES_ENV_KEY: &str = "PROGTEST_CASES";
/// Environment variable controlling proptest process forking.
pub const ADVENTURE_PBT_FORK_ENV_KEY: &str = "ADVENTURE_PBT_FORK";
/// Environment variable overriding the per-case wall-clock budget in
/// milliseconds.
pub const ADVENTURE_PBT_CASE_BUDGET_ENV_KEY: &str = "ADVENTURE_PBT_CASE_BUDGET_MS";

const DEFAULT_CASE_BUDGET: Duration = Duration::from_millis(250);

/// Runtime profile for property-test execution.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ProptestRunProfile {
    cases: u32,
    fork: bool,
    case_budget: Duration,
}

impl ProptestRunProfile {
    /// Load a profile from environment variables with provided defaults.
    ///
    /// # Examples
    ///
    /// ```
    /// use adventure_test_support::ci::property_test_profile::ProptestRunProfile;
    ///
    /// let profile = ProptestRunProfile::load(64, false);
    /// assert!(profile.cases() > 0);
    /// assert!(!profile.case_budget().is_zero());
    /// ```
    #[must_use]
    pub fn load(default_cases: u32, default_fork: bool) -> Self {
        let cases = read_env_or_default(PROGTEST_CASES_ENV_KEY, default_cases, parse_cases);
        let fork = read_env_or_default(ADVENTURE_PBT_FORK_ENV_KEY, default_fork, parse_bool);
        let case_budget = read_env_or_default(
            ADVENTURE_PBT_CASE_BUDGET_ENV_KEY,
            DEFAULT_CASE_BUDGET,
            parse_budget,
        );
        Self {
            cases,
            fork,
            case_budget,
        }
    }

    /// Number of cases to run per property.
    #[must_use]
    pub fn cases(&self) -> u32 {
        self.cases
    }

    /// Whether to run proptest cases in forked subprocesses.
    #[must_use]
    pub fn fork(&self) -> bool {
        self.fork
    }

    /// Wall-clock budget a single generated case may consume.
    #[must_use]
    pub fn case_budget(&self) -> Duration {
        self.case_budget
    }
}

fn read_env_or_default<T, F>(key: &'static str, default: T, parser: F) -> T
where
    T: Copy,
    F: Fn(&str) -> Result<T, String>,
{
    match env::var(key) {
        Ok(raw) => match parser(&raw) {
            Ok(value) => value,
            Err(reason) => {
                tracing::warn!(
                    env = key,
                    raw = %raw,
                    reason = %reason,
                    "invalid property-test profile override; using default",
                );
                default
            }
        },
        Err(_) => default,
    }
}

fn parse_cases(raw: &str) -> Result<u32, String> {
    let parsed = raw
        .trim()
        .parse::<u32>()
        .map_err(|error| format!("parse error: {error}"))?;
    if parsed == 0 {
        return Err("cases must be > 0".to_owned());
    }
    Ok(parsed)
}

fn parse_bool(raw: &str) -> Result<bool, String> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err("expected one of: true/false/1/0/yes/no/on/off".to_owned()),
    }
}

fn parse_budget(raw: &str) -> Result<Duration, String> {
    let millis = raw
        .trim()
        .parse::<u64>()
        .map_err(|error| format!("parse error: {error}"))?;
    if millis == 0 {
        return Err("budget must be > 0 ms".to_owned());
    }
    Ok(Duration::from_millis(millis))
}
