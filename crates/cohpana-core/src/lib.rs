//! # cohpana Core Library
//!
//! Automatic bonding analysis of LOBSTER crystal orbital populations: COHP,
//! COBI and COOP curves together with their integrated values.
//!
//! ## Architectural Philosophy
//!
//! The library follows a three-layer architecture:
//!
//! - **[`core`]: The Foundation.** Typed models (`Structure`, `CurveStore`,
//!   `BondList`), file readers and the structural adapter that answers
//!   site-equivalence and coordination-environment questions.
//!
//! - **[`engine`]: The Logic Core.** Bond selection, interaction
//!   classification and assembly of the condensed analysis. Every stage is a
//!   pure function of immutable inputs and a validated configuration.
//!
//! - **[`workflows`]: The Public API.** Complete procedures such as loading a
//!   calculation directory and producing its condensed analysis, or reducing
//!   analyses to feature rows.

pub mod core;
pub mod engine;
pub mod workflows;

#[cfg(test)]
mod fixtures;
