//! Runtime configuration.
//!
//! Built once at startup from environment variables and passed to the
//! collaborators that need it.

use crate::error::{Result, SummaryError};
use lettre::message::Mailbox;
use std::path::PathBuf;

pub const DB_PATH_VAR: &str = "SUMMARY_DB_PATH";
pub const OUTBOX_DIR_VAR: &str = "SUMMARY_OUTBOX_DIR";
pub const FROM_EMAIL_VAR: &str = "FROM_EMAIL";
pub const TO_EMAIL_VAR: &str = "TO_EMAIL";
pub const SUBJECT_VAR: &str = "SUMMARY_SUBJECT";

const DEFAULT_DB_PATH: &str = "transactions.db";
const DEFAULT_OUTBOX_DIR: &str = "outbox";
const DEFAULT_FROM_EMAIL: &str = "from@example.com";
const DEFAULT_TO_EMAIL: &str = "to@example.com";
const DEFAULT_SUBJECT: &str = "Transaction Summary";

/// Addressing and delivery settings for the summary email.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MailConfig {
    pub from: Mailbox,
    pub to: Mailbox,

    /// Single-line subject; may contain non-ASCII text
    pub subject: String,

    /// Pickup directory the summary message is written to
    pub outbox_dir: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// SQLite database holding individual transactions
    pub database_path: PathBuf,
    pub mail: MailConfig,
}

impl Config {
    /// Reads the configuration from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads the configuration through `lookup`.
    ///
    /// Missing or blank values fall back to their defaults. Addresses must
    /// parse as mailboxes and the subject must not contain control
    /// characters such as line breaks.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str, default: &str| -> String {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        let subject = get(SUBJECT_VAR, DEFAULT_SUBJECT);
        if subject.contains(char::is_control) {
            return Err(SummaryError::Config(format!(
                "{} must be a single line without control characters",
                SUBJECT_VAR
            )));
        }

        Ok(Config {
            database_path: PathBuf::from(get(DB_PATH_VAR, DEFAULT_DB_PATH)),
            mail: MailConfig {
                from: parse_mailbox(FROM_EMAIL_VAR, &get(FROM_EMAIL_VAR, DEFAULT_FROM_EMAIL))?,
                to: parse_mailbox(TO_EMAIL_VAR, &get(TO_EMAIL_VAR, DEFAULT_TO_EMAIL))?,
                subject,
                outbox_dir: PathBuf::from(get(OUTBOX_DIR_VAR, DEFAULT_OUTBOX_DIR)),
            },
        })
    }
}

fn parse_mailbox(var: &str, value: &str) -> Result<Mailbox> {
    value.parse().map_err(|e| {
        SummaryError::Config(format!(
            "{} is not an email address: {:?} ({})",
            var, value, e
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<Config> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.database_path, PathBuf::from("transactions.db"));
        assert_eq!(config.mail.from.to_string(), "from@example.com");
        assert_eq!(config.mail.to.to_string(), "to@example.com");
        assert_eq!(config.mail.subject, "Transaction Summary");
        assert_eq!(config.mail.outbox_dir, PathBuf::from("outbox"));
    }

    #[test]
    fn test_overrides_and_blank_values() {
        let config = config_from(&[
            (DB_PATH_VAR, "/tmp/ledger.db"),
            (TO_EMAIL_VAR, " someone@example.org "),
            (FROM_EMAIL_VAR, "   "),
            (SUBJECT_VAR, "Resumen de transacción"),
        ])
        .unwrap();
        assert_eq!(config.database_path, PathBuf::from("/tmp/ledger.db"));
        assert_eq!(config.mail.to.email.to_string(), "someone@example.org");
        assert_eq!(config.mail.from.email.to_string(), "from@example.com");
        assert_eq!(config.mail.subject, "Resumen de transacción");
    }

    #[test]
    fn test_rejects_invalid_address() {
        let err = config_from(&[(TO_EMAIL_VAR, "nobody")]).unwrap_err();
        assert!(matches!(err, SummaryError::Config(msg) if msg.contains("TO_EMAIL")));
    }

    #[test]
    fn test_rejects_multiline_subject() {
        for subject in [
            "Resumen de transacción\nBcc: attacker@evil.test",
            "Summary\r\nBcc: attacker@evil.test",
        ] {
            let err = config_from(&[(SUBJECT_VAR, subject)]).unwrap_err();
            assert!(
                matches!(err, SummaryError::Config(ref msg) if msg.contains("SUMMARY_SUBJECT")),
                "accepted subject {:?}",
                subject
            );
        }
    }
}
