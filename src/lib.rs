// SPDX-License-Identifier: GPL-2.0-or-later
use chrono::{NaiveDateTime, Timelike};
use serde::Serializer;
use thiserror::Error as ThisError;

/// An enumeration of errors soundboard library functions can encounter.
///
/// Client mistakes are not errors in this sense; those are answered with a 400 by the
/// [`handler`] and never leave it. Everything here is a backend failure that propagates
/// to whatever is hosting the handler.
#[derive(ThisError, Debug)]
pub enum Error {
    #[error("A database error occurred: {0}")]
    Database(#[from] sqlx::Error),
    #[error("Configuration file could not be read: {0}")]
    ConfigReadError(#[from] std::io::Error),
    #[error("Configuration file could not be parsed: {0}")]
    ConfigParseError(#[from] toml::de::Error),
    #[error("Configuration file contains invalid values: {0}")]
    ConfigValueError(String),
    #[error("HTTP server encountered an error: {0}")]
    Server(std::io::Error),
    #[error("Invocation event could not be read: {0}")]
    EventReadError(std::io::Error),
    #[error("JSON could not be (de)serialized: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Tokio task failed: {0}")]
    TokioTask(#[from] tokio::task::JoinError),
}

/// The format used for whole-second timestamps in API responses, e.g. `2024-05-01 13:37:00`.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
/// The format used when a timestamp has a fractional part, always with six digits,
/// e.g. `2024-05-01 13:37:00.120000`.
pub const TIMESTAMP_FRACTION_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f";

/// Serializer for database timestamps
pub fn timestamp_serializer<S>(timestamp: &NaiveDateTime, s: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    let format = if timestamp.nanosecond() == 0 {
        TIMESTAMP_FORMAT
    } else {
        TIMESTAMP_FRACTION_FORMAT
    };
    s.collect_str(&timestamp.format(format))
}

pub mod api;
pub mod cli;
pub mod config;
pub mod db;
pub mod handler;
pub mod web;
