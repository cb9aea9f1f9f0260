//! # Workflows Module
//!
//! High-level entry points that tie the [`crate::core`] readers and models to the
//! [`crate::engine`] analysis stages.
//!
//! ## Overview
//!
//! A workflow takes parsed LOBSTER outputs and a validated configuration and
//! produces a finished artifact. It owns phase sequencing and progress
//! reporting so that front-ends only deal with inputs, configuration and
//! results.
//!
//! ## Architecture
//!
//! - **Analysis Workflow** ([`analyze`]) - Loads the input files, selects the
//!   relevant bonds, classifies their interactions and assembles the condensed
//!   per-site analysis.
//! - **Featurization** ([`featurize`]) - Reduces a condensed analysis to one
//!   fixed-column feature row and writes rows as CSV.
//!
//! ## Key Capabilities
//!
//! - **File-level loading** with curve kind alignment between bond list and curves
//! - **Phase-level progress** through [`crate::engine::progress::ProgressReporter`]
//! - **Deterministic output** suitable for byte-wise comparison of JSON results

pub mod analyze;
pub mod featurize;
