//! Command implementations for the Rumen CLI.

pub mod analysis;
pub mod ask;
pub mod auto_filter;
pub mod check;
pub mod download_job;
pub mod genomes;
pub mod interactive;
pub mod models;
pub mod output;
pub mod project;
pub mod workflow;
