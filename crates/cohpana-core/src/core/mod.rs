//! # Core Module
//!
//! Data models, file readers and numerical building blocks for LOBSTER
//! bonding analysis.
//!
//! ## Overview
//!
//! The core layer is stateless. It parses LOBSTER and VASP outputs into typed
//! models, answers structural questions about the crystal and provides the
//! curve arithmetic needed by the engine and by plot-data export.
//!
//! ## Architecture
//!
//! - **Data Models** ([`models`]) - Structures, sites, charges, bond lists and population curves
//! - **File I/O** ([`io`]) - Readers for POSCAR, CHARGE, ICOHPLIST, COHPCAR and Madelung files
//! - **Structure Geometry** ([`geometry`]) - Site equivalence and coordination environments
//! - **Broadening** ([`broadening`]) - Gaussian smoothing on regular energy grids
//! - **Utilities** ([`utils`]) - Element data, formulas and lattice geometry helpers
//!
//! ## Key Capabilities
//!
//! - **COHP, COBI and COOP** curves in one typed store, spin-polarized or not
//! - **Orbital-resolved** bond lists and curves
//! - **Periodic images** resolved through lattice translations
//! - **Pluggable site classification** behind the `SiteClassifier` trait

pub mod broadening;
pub mod geometry;
pub mod io;
pub mod models;
pub mod utils;
