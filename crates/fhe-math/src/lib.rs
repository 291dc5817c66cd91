//! Low-level number theory, modular arithmetic, RNS bases, and negacyclic
//! polynomials used to build the BFV scheme in the `bfv` crate.
//!
//! Nothing in this crate is BFV-specific: it would serve equally well as
//! the foundation for any other RLWE-based scheme.

pub mod error;
pub mod modulus;
pub mod numth;
pub mod poly;
pub mod rns;

pub use error::{Error, Result};
pub use modulus::Modulus;
pub use poly::Poly;
pub use rns::{BaseConverter, RnsBase, RnsTool};
