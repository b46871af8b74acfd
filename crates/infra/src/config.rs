//! Process configuration, read once from environment variables.

use std::net::SocketAddr;

use thiserror::Error;

use crate::fees::DEFAULT_MONTHLY_RATE_PER_MEMBER;

const DEV_JWT_SECRET: &str = "dev-secret";

/// How change events reach listeners.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchMode {
    /// Listeners run on the request thread before the response is sent.
    Sync,
    /// Listeners run on a background worker; fee reads are eventually consistent.
    Async,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var}: invalid value '{value}': {reason}")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub jwt_secret: String,
    pub dispatch_mode: DispatchMode,
    pub fee_monthly_rate: u64,
}

impl AppConfig {
    /// Read `BIND_ADDR`, `JWT_SECRET`, `EVENT_DISPATCH` and `FEE_MONTHLY_RATE`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let bind_addr = match lookup("BIND_ADDR") {
            Some(v) => v.parse().map_err(|e: std::net::AddrParseError| ConfigError::Invalid {
                var: "BIND_ADDR",
                value: v.clone(),
                reason: e.to_string(),
            })?,
            None => SocketAddr::from(([0, 0, 0, 0], 8080)),
        };

        let jwt_secret = lookup("JWT_SECRET").unwrap_or_else(|| {
            tracing::warn!("JWT_SECRET not set; using insecure dev default");
            DEV_JWT_SECRET.to_string()
        });

        let dispatch_mode = match lookup("EVENT_DISPATCH").as_deref().map(str::trim) {
            None | Some("") | Some("async") => DispatchMode::Async,
            Some("sync") => DispatchMode::Sync,
            Some(other) => {
                return Err(ConfigError::Invalid {
                    var: "EVENT_DISPATCH",
                    value: other.to_string(),
                    reason: "expected 'sync' or 'async'".to_string(),
                });
            }
        };

        let fee_monthly_rate = match lookup("FEE_MONTHLY_RATE") {
            Some(v) => v.trim().parse().map_err(|e: std::num::ParseIntError| ConfigError::Invalid {
                var: "FEE_MONTHLY_RATE",
                value: v.clone(),
                reason: e.to_string(),
            })?,
            None => DEFAULT_MONTHLY_RATE_PER_MEMBER,
        };

        Ok(Self {
            bind_addr,
            jwt_secret,
            dispatch_mode,
            fee_monthly_rate,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config(vars: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let vars: HashMap<String, String> = vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        AppConfig::from_lookup(|k| vars.get(k).cloned())
    }

    #[test]
    fn defaults_apply_when_nothing_is_set() {
        let cfg = config(&[]).unwrap();
        assert_eq!(cfg.bind_addr.port(), 8080);
        assert_eq!(cfg.jwt_secret, DEV_JWT_SECRET);
        assert_eq!(cfg.dispatch_mode, DispatchMode::Async);
        assert_eq!(cfg.fee_monthly_rate, DEFAULT_MONTHLY_RATE_PER_MEMBER);
    }

    #[test]
    fn explicit_values_are_honoured() {
        let cfg = config(&[
            ("BIND_ADDR", "127.0.0.1:9000"),
            ("JWT_SECRET", "s"),
            ("EVENT_DISPATCH", "sync"),
            ("FEE_MONTHLY_RATE", "7000"),
        ])
        .unwrap();
        assert_eq!(cfg.bind_addr.to_string(), "127.0.0.1:9000");
        assert_eq!(cfg.dispatch_mode, DispatchMode::Sync);
        assert_eq!(cfg.fee_monthly_rate, 7000);
    }

    #[test]
    fn bad_values_name_the_variable() {
        let err = config(&[("EVENT_DISPATCH", "later")]).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { var: "EVENT_DISPATCH", .. }));

        let err = config(&[("FEE_MONTHLY_RATE", "-1")]).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { var: "FEE_MONTHLY_RATE", .. }));
    }
}
