//! pr-labeler: sync pull-request labels from changed-file glob rules
//!
//! A single-shot CI utility. Given a pull-request event and a YAML rule file
//! mapping glob patterns to label names, it computes the label set the PR
//! should carry from the files it touches and reconciles the issue's labels
//! on GitHub with a single atomic replace call.

pub mod config;
pub mod error;
pub mod event;
pub mod forge;
pub mod matcher;
pub mod reconcile;
pub mod rules;
pub mod run;

pub use error::{Error, Result};
