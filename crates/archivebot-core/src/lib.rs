//! Core pipeline logic for the Slack channel archive bot.
//!
//! This crate is intentionally platform-agnostic. The Slack Web API lives
//! behind the [`directory::DirectoryPort`] trait, implemented in the
//! `archivebot-slack` adapter crate; everything here is policy: which
//! channels to archive and how to run the two pipelines concurrently.

pub mod activity;
pub mod archive;
pub mod bot;
pub mod config;
pub mod directory;
pub mod domain;
pub mod errors;
pub mod filter;
pub mod logging;

pub use errors::{Error, Result};
