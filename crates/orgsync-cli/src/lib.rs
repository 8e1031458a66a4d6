//! orgsync-cli
//!
//! Configuration loading and Markdown report rendering behind the
//! `orgsync` binary.

pub mod config;
pub mod report;
