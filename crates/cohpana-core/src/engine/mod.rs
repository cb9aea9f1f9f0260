//! # Engine Module
//!
//! The analysis stages that turn parsed LOBSTER data into a condensed bonding
//! description.
//!
//! ## Overview
//!
//! The engine runs three stages over immutable inputs. The selector decides
//! which bonds are relevant for each symmetry-distinct central site. The
//! interaction classifier integrates the bonding and antibonding parts of each
//! selected curve below the Fermi level. The builder orders the resulting
//! groups into the final per-site document.
//!
//! ## Architecture
//!
//! - **Configuration** ([`config`]) - Selection and classification parameters with a validating builder
//! - **Bond Selection** ([`selector`]) - Center sites, eligibility and the relative strength cutoff
//! - **Interaction Classification** ([`interaction`]) - Split integration and per-group statistics
//! - **Result Assembly** ([`builder`], [`result`]) - Ordered, serializable condensed analysis
//! - **Statistics** ([`stats`]) - Mean, sum, extrema and population deviation
//! - **Progress Monitoring** ([`progress`]) - Phase and per-site progress events
//! - **Error Handling** ([`error`]) - Analysis errors and recorded warnings
//!
//! ## Key Capabilities
//!
//! - **Cation-anion or all-pair selection** with optional charge information
//! - **Spin-summed or spin-resolved** bonding and antibonding contributions
//! - **Orbital-resolved** contributions with their share of the group ICOHP
//! - **Stable ordering** of sites, groups and members

pub mod builder;
pub mod config;
pub mod error;
pub mod interaction;
pub mod progress;
pub mod result;
pub mod selector;
pub mod stats;
