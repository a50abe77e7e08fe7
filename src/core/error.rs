// src/core/error.rs

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Every failure the reconnaissance engine can report.
///
/// None of these ever escape as a panic or abort the scan. Resolution and fetch
/// failures are recorded inside the final `ReconReport`, probe failures are folded
/// into the affected `ProbeResult`, and a missing start timestamp only drops the
/// duration. The enum is serializable so it can sit in the report as a tagged value.
#[derive(Debug, Clone, Error, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ReconError {
    #[error("could not resolve host '{host}': {reason}")]
    ResolutionFailure { host: String, reason: String },

    #[error("probe of port {port} failed: {reason}")]
    ProbeFailure { port: u16, reason: String },

    #[error("fetching {url} failed: {reason}")]
    FetchError { url: String, reason: String },

    #[error("no scan start time was supplied, duration omitted")]
    MissingStartTime,

    #[error("invalid target '{input}': {reason}")]
    InvalidTarget { input: String, reason: String },

    #[error("invalid port specification '{spec}': {reason}")]
    InvalidPortSpec { spec: String, reason: String },
}
