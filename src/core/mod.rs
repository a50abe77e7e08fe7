// src/core/mod.rs

/// Data structures shared by the scanners, the report and the UI.
pub mod models;

pub mod error;

/// Port probing, header auditing, link classification and the scan orchestrator.
pub mod scanner;

/// Merging of partial results into the final report, and saving it.
pub mod report;

/// Static explanations and remediations for every finding code.
pub mod knowledge_base;

pub mod analysis;
