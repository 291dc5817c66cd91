//! Error type shared by every number-theoretic and RNS primitive.

use thiserror::Error;

/// Failure modes that can arise while building or using the math primitives.
///
/// These are precomputation-time or caller-bug errors, not runtime conditions
/// that an attacker or ordinary operation is expected to trigger: a modulus
/// is only found non-invertible if the caller handed in parameters that were
/// never coprime in the first place.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
	/// `invert_mod` was asked to invert an element that shares a factor with
	/// the modulus.
	#[error("{0} has no inverse modulo {1}")]
	NotInvertible(u64, u64),

	/// The prime search exhausted its candidate range before finding enough
	/// primes satisfying the requested bit-length and congruence.
	#[error("could not find {count} distinct {bit_size}-bit primes congruent to 1 mod {modulus}")]
	NotEnoughPrimes {
		/// Requested bit length.
		bit_size: usize,
		/// Requested prime count.
		count: usize,
		/// The congruence modulus (2N).
		modulus: u64,
	},

	/// A modulus passed to [`crate::rns::RnsBase`] or [`crate::modulus::Modulus`]
	/// is unusable (zero, one, or exceeds the supported bit width).
	#[error("invalid modulus {0}")]
	InvalidModulus(u64),

	/// Two RNS bases that should have agreed on something (size, coprimality)
	/// did not.
	#[error("{0}")]
	InvalidBase(String),
}

/// Convenience alias used throughout this crate.
pub type Result<T> = std::result::Result<T, Error>;
