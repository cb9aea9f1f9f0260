//! # Core Models Module
//!
//! Data structures describing the inputs of a bonding analysis: the periodic
//! structure, partial charges, the list of integrated bond strengths and the
//! energy-resolved interaction curves.
//!
//! ## Key Components
//!
//! - [`site`] / [`structure`] - Atomic sites and the periodic crystal structure
//! - [`charges`] - Mulliken/Löwdin partial charges and Madelung energies
//! - [`bonds`] - Integrated bond strengths at the Fermi level (ICOHPLIST)
//! - [`curve`] - Energy-resolved COHP/COBI/COOP curves and their store
//! - [`spin`] - Spin channels and per-spin series
//! - [`environment`] - Coordination-environment codes and their names
//!
//! All models are immutable once loaded; the analysis engine only reads them.

pub mod bonds;
pub mod charges;
pub mod curve;
pub mod environment;
pub mod site;
pub mod spin;
pub mod structure;
