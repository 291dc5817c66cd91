//! Encryption parameters for the BFV scheme: ring dimension, ciphertext
//! modulus chain, plaintext modulus, and noise standard deviation.

use crate::coeff_modulus::CoeffModulus;
use crate::error::{Error, Result};
use derive_builder::Builder;
use fhe_math::numth::is_prime;
use tracing::debug;

/// Validated parameters for a BFV instance: ring dimension `N`, ciphertext
/// modulus chain `q_0, ..., q_{k-1}`, and plaintext modulus `t`.
///
/// Built exclusively through [`EncryptionParamsBuilder`], which is the only
/// place validation happens; once constructed, an `EncryptionParams` is
/// immutable.
#[derive(Debug, Builder, Clone, PartialEq, Eq)]
#[builder(build_fn(private, name = "fallible_build"))]
pub struct EncryptionParams {
	/// Number of coefficients per polynomial. Must be a power of two.
	pub(crate) polynomial_degree: usize,

	/// Plaintext modulus `t`. Must be at least 2.
	pub(crate) plaintext_modulus: u64,

	/// Ciphertext coefficient moduli `q_0, ..., q_{k-1}`. One and only one of
	/// `ciphertext_moduli` or `ciphertext_moduli_sizes` must be specified.
	pub(crate) ciphertext_moduli: Vec<u64>,

	/// Bit sizes from which to derive `ciphertext_moduli`, when the caller
	/// doesn't supply explicit primes. One and only one of
	/// `ciphertext_moduli` or `ciphertext_moduli_sizes` must be specified.
	ciphertext_moduli_sizes: Vec<usize>,

	/// Standard deviation of the discrete Gaussian noise distribution used
	/// during encryption.
	#[builder(default = "3.2")]
	pub(crate) noise_std_dev: f64,
}

impl EncryptionParams {
	pub fn degree(&self) -> usize {
		self.polynomial_degree
	}

	pub fn plaintext_modulus(&self) -> u64 {
		self.plaintext_modulus
	}

	pub fn ciphertext_moduli(&self) -> &[u64] {
		&self.ciphertext_moduli
	}

	pub fn noise_std_dev(&self) -> f64 {
		self.noise_std_dev
	}
}

impl EncryptionParamsBuilder {
	/// Validates and builds the parameters.
	pub fn build(&self) -> Result<EncryptionParams> {
		let polynomial_degree = self
			.polynomial_degree
			.ok_or_else(|| Error::InvalidParams("polynomial_degree must be set".into()))?;
		if polynomial_degree < 8 || !polynomial_degree.is_power_of_two() {
			return Err(Error::InvalidParams(
				"polynomial_degree must be a power of two, at least 8".into(),
			));
		}

		let plaintext_modulus = self
			.plaintext_modulus
			.ok_or_else(|| Error::InvalidParams("plaintext_modulus must be set".into()))?;
		if plaintext_modulus < 2 {
			return Err(Error::InvalidParams("plaintext_modulus must be >= 2".into()));
		}

		let explicit = self.ciphertext_moduli.clone().unwrap_or_default();
		let sizes = self.ciphertext_moduli_sizes.clone().unwrap_or_default();
		let ciphertext_moduli = match (explicit.is_empty(), sizes.is_empty()) {
			(false, true) => explicit,
			(true, false) => CoeffModulus::create(polynomial_degree, &sizes)?,
			_ => {
				return Err(Error::InvalidParams(
					"exactly one of ciphertext_moduli or ciphertext_moduli_sizes must be set".into(),
				))
			}
		};

		if ciphertext_moduli.is_empty() {
			return Err(Error::InvalidParams("ciphertext_moduli must be non-empty".into()));
		}
		for (i, &qi) in ciphertext_moduli.iter().enumerate() {
			if !is_prime(qi) {
				return Err(Error::InvalidParams(format!("ciphertext modulus {qi} is not prime")));
			}
			if ciphertext_moduli[..i].contains(&qi) {
				return Err(Error::InvalidParams(format!("duplicate ciphertext modulus {qi}")));
			}
		}

		let product: u128 = ciphertext_moduli.iter().try_fold(1u128, |acc, &qi| {
			acc.checked_mul(qi as u128)
				.ok_or_else(|| Error::InvalidParams("ciphertext modulus chain overflows".into()))
		})?;
		if product <= plaintext_modulus as u128 {
			return Err(Error::InvalidParams("Q must exceed the plaintext modulus t".into()));
		}

		let noise_std_dev = self.noise_std_dev.unwrap_or(3.2);

		debug!(
			degree = polynomial_degree,
			moduli = ciphertext_moduli.len(),
			"validated encryption parameters"
		);

		Ok(EncryptionParams {
			polynomial_degree,
			plaintext_modulus,
			ciphertext_moduli,
			ciphertext_moduli_sizes: sizes,
			noise_std_dev,
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn rejects_non_power_of_two_degree() {
		let err = EncryptionParamsBuilder::default()
			.polynomial_degree(100)
			.plaintext_modulus(64)
			.ciphertext_moduli(vec![12289])
			.build();
		assert!(err.is_err());
	}

	#[test]
	fn rejects_both_moduli_specs() {
		let err = EncryptionParamsBuilder::default()
			.polynomial_degree(64)
			.plaintext_modulus(64)
			.ciphertext_moduli(vec![12289])
			.ciphertext_moduli_sizes(vec![30])
			.build();
		assert!(err.is_err());
	}

	#[test]
	fn rejects_composite_modulus() {
		let err = EncryptionParamsBuilder::default()
			.polynomial_degree(64)
			.plaintext_modulus(64)
			.ciphertext_moduli(vec![12288])
			.build();
		assert!(err.is_err());
	}

	#[test]
	fn accepts_explicit_moduli() {
		let params = EncryptionParamsBuilder::default()
			.polynomial_degree(64)
			.plaintext_modulus(64)
			.ciphertext_moduli(vec![1073741831, 1073741839])
			.build()
			.unwrap();
		assert_eq!(params.degree(), 64);
		assert_eq!(params.ciphertext_moduli().len(), 2);
	}

	#[test]
	fn derives_moduli_from_sizes() {
		let params = EncryptionParamsBuilder::default()
			.polynomial_degree(64)
			.plaintext_modulus(64)
			.ciphertext_moduli_sizes(vec![30, 30])
			.build()
			.unwrap();
		assert_eq!(params.ciphertext_moduli().len(), 2);
	}
}
