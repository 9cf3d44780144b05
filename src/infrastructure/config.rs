use anyhow::{Result, anyhow};
use std::time::Duration;

/// Runtime settings gathered from the command line
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    pub timeout: Option<Duration>,
    pub verbose: bool,
    pub report: bool,
}

impl Config {
    /// Builds a config, rejecting a zero timeout
    pub fn new(timeout_ms: Option<u64>, verbose: bool, report: bool) -> Result<Self> {
        let timeout = match timeout_ms {
            Some(0) => return Err(anyhow!("Timeout must be greater than zero milliseconds")),
            Some(ms) => Some(Duration::from_millis(ms)),
            None => None,
        };
        Ok(Self {
            timeout,
            verbose,
            report,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_timeout_by_default() {
        let config = Config::new(None, false, false).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn timeout_is_in_milliseconds() {
        let config = Config::new(Some(1500), true, false).unwrap();
        assert_eq!(config.timeout, Some(Duration::from_millis(1500)));
        assert!(config.verbose);
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let err = Config::new(Some(0), false, false).unwrap_err();
        assert!(err.to_string().contains("greater than zero"));
    }
}
