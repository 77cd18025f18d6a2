//! Error taxonomy for the digest pipeline.
//!
//! Only [`ConfigError`] (at startup) and [`PushError`] (at delivery) ever end a
//! run. [`FetchError`] and [`ParseError`] are absorbed where they happen and
//! cost the run a source or an item, nothing more.

use std::time::Duration;
use thiserror::Error;

/// A source could not be fetched.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("request to {url} failed: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} answered with HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("request to {url} timed out after {timeout:?}")]
    Timeout { url: String, timeout: Duration },
}

/// A single article block or feed entry could not be turned into a `NewsItem`.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ParseError {
    #[error("missing title")]
    MissingTitle,

    #[error("missing link")]
    MissingLink,

    #[error("unrecognised date: {0:?}")]
    UnparsableDate(String),

    #[error("entry has neither a published nor an updated timestamp")]
    MissingTimestamp,
}

/// The digest could not be delivered.
#[derive(Error, Debug)]
pub enum PushError {
    #[error("webhook request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("webhook answered with HTTP {0}")]
    Status(u16),

    #[error("webhook rejected the message (errcode {errcode}): {errmsg}")]
    Rejected { errcode: i64, errmsg: String },

    #[error("could not write message to stdout: {0}")]
    Io(#[from] std::io::Error),
}

/// The configuration is missing or malformed.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("cannot read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid YAML in config file: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("{collection}[{index}] has an empty `{field}`")]
    EmptyField {
        collection: &'static str,
        index: usize,
        field: &'static str,
    },

    #[error("source {name:?} has an invalid url {url:?}: {source}")]
    InvalidUrl {
        name: String,
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("no webhook URL configured (set wechat.webhook_url, --webhook-url or WECHAT_WEBHOOK_URL)")]
    MissingWebhook,
}
