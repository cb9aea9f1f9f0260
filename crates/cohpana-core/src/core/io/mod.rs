//! Readers for the LOBSTER and VASP files a bonding analysis consumes.
//!
//! Every format is parsed by a unit struct implementing [`traits::LobsterFile`],
//! and all readers report failures through [`error::FileError`] with the
//! offending line number where one exists.

pub mod charge;
pub mod cohpcar;
pub mod error;
pub mod icohplist;
pub mod madelung;
pub mod poscar;
pub mod traits;
mod util;
