//! `CoeffModulus`: construction of ciphertext modulus chains, either from
//! explicit bit sizes or from the HomomorphicEncryption.org standard
//! security recommendations.

use crate::error::{Error, Result};
use fhe_math::numth;
use std::collections::HashMap;

/// Target security level for [`CoeffModulus::bfv_default`], matching the
/// classes defined by the HomomorphicEncryption.org security standard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SecurityLevel {
	Tc128,
	Tc192,
	Tc256,
}

/// Builds ciphertext coefficient modulus chains.
pub struct CoeffModulus;

impl CoeffModulus {
	/// Returns `bit_sizes.len()` distinct primes, each congruent to
	/// `1 mod 2*degree`, matching the requested bit sizes in order.
	///
	/// When a bit size repeats, the primes satisfying it are generated once
	/// (`get_primes(degree, size, count)`, which searches downward from the
	/// top of the bit range) and handed out smallest-first as later
	/// occurrences of that size are encountered.
	pub fn create(degree: usize, bit_sizes: &[usize]) -> Result<Vec<u64>> {
		let mut pools: HashMap<usize, Vec<u64>> = HashMap::new();
		let mut result = Vec::with_capacity(bit_sizes.len());

		for &size in bit_sizes {
			if pools.get(&size).map_or(true, Vec::is_empty) {
				let count = bit_sizes.iter().filter(|&&s| s == size).count();
				let primes = numth::get_primes(degree, size, count)?;
				pools.insert(size, primes);
			}
			result.push(pools.get_mut(&size).unwrap().pop().expect("pool sized to demand"));
		}

		Ok(result)
	}

	/// The HomomorphicEncryption.org recommended modulus chain for a given
	/// ring dimension and security level.
	///
	/// Both the total bit budget and the prime count follow the published
	/// standard; the budget is split into near-equal primes matching that
	/// count via [`CoeffModulus::create`].
	pub fn bfv_default(degree: usize, sec_level: SecurityLevel) -> Result<Vec<u64>> {
		let total_bits = Self::total_bits(degree, sec_level)?;
		let count = Self::prime_count(degree, sec_level)?;
		let sizes = Self::split_budget(total_bits, count);
		Self::create(degree, &sizes)
	}

	fn total_bits(degree: usize, sec_level: SecurityLevel) -> Result<usize> {
		let table = match degree {
			1024 => (27, 19, 14),
			2048 => (54, 37, 29),
			4096 => (109, 75, 58),
			8192 => (218, 152, 118),
			16384 => (438, 305, 237),
			32768 => (881, 611, 476),
			_ => {
				return Err(Error::InvalidParams(format!(
					"no default modulus chain for ring dimension {degree}"
				)))
			}
		};
		Ok(match sec_level {
			SecurityLevel::Tc128 => table.0,
			SecurityLevel::Tc192 => table.1,
			SecurityLevel::Tc256 => table.2,
		})
	}

	/// The exact number of primes in the standard's published chain. This is
	/// not derivable from `total_bits` alone (the standard's split is a
	/// specific, published partition, not an equal division of the budget
	/// into ≤60-bit pieces), so each count is hardcoded per `(degree,
	/// sec_level)`.
	fn prime_count(degree: usize, sec_level: SecurityLevel) -> Result<usize> {
		let table = match degree {
			1024 => (1, 1, 1),
			2048 => (1, 1, 1),
			4096 => (3, 3, 1),
			8192 => (5, 4, 3),
			16384 => (9, 6, 5),
			32768 => (16, 11, 9),
			_ => {
				return Err(Error::InvalidParams(format!(
					"no default modulus chain for ring dimension {degree}"
				)))
			}
		};
		Ok(match sec_level {
			SecurityLevel::Tc128 => table.0,
			SecurityLevel::Tc192 => table.1,
			SecurityLevel::Tc256 => table.2,
		})
	}

	fn split_budget(total_bits: usize, count: usize) -> Vec<usize> {
		let base = total_bits / count;
		let remainder = total_bits - base * count;
		(0..count).map(|i| if i < remainder { base + 1 } else { base }).collect()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use fhe_math::numth::is_prime;

	#[test]
	fn create_produces_requested_sizes() {
		let moduli = CoeffModulus::create(16, &[30, 30, 29]).unwrap();
		assert_eq!(moduli.len(), 3);
		let unique: std::collections::HashSet<_> = moduli.iter().collect();
		assert_eq!(unique.len(), 3);
		for (m, size) in moduli.iter().zip([30, 30, 29]) {
			assert!(is_prime(*m));
			assert_eq!(m % 32, 1);
			assert_eq!(64 - m.leading_zeros() as usize, size);
		}
	}

	#[test]
	fn repeated_sizes_consumed_smallest_first() {
		let moduli = CoeffModulus::create(16, &[30, 30]).unwrap();
		assert!(moduli[0] < moduli[1]);
	}

	#[test]
	fn bfv_default_covers_standard_dimensions() {
		for degree in [1024, 2048, 4096, 8192] {
			for level in [SecurityLevel::Tc128, SecurityLevel::Tc192, SecurityLevel::Tc256] {
				let moduli = CoeffModulus::bfv_default(degree, level).unwrap();
				assert!(!moduli.is_empty());
				for m in &moduli {
					assert!(is_prime(*m));
				}
			}
		}
	}

	#[test]
	fn bfv_default_matches_the_published_prime_counts() {
		let cases = [
			(1024, SecurityLevel::Tc128, 1),
			(1024, SecurityLevel::Tc192, 1),
			(1024, SecurityLevel::Tc256, 1),
			(2048, SecurityLevel::Tc128, 1),
			(2048, SecurityLevel::Tc192, 1),
			(2048, SecurityLevel::Tc256, 1),
			(4096, SecurityLevel::Tc128, 3),
			(4096, SecurityLevel::Tc192, 3),
			(4096, SecurityLevel::Tc256, 1),
			(8192, SecurityLevel::Tc128, 5),
			(8192, SecurityLevel::Tc192, 4),
			(8192, SecurityLevel::Tc256, 3),
			(16384, SecurityLevel::Tc128, 9),
			(16384, SecurityLevel::Tc192, 6),
			(16384, SecurityLevel::Tc256, 5),
			(32768, SecurityLevel::Tc128, 16),
			(32768, SecurityLevel::Tc192, 11),
			(32768, SecurityLevel::Tc256, 9),
		];
		for (degree, level, expected_count) in cases {
			let moduli = CoeffModulus::bfv_default(degree, level).unwrap();
			assert_eq!(moduli.len(), expected_count, "{degree:?}/{level:?}");
		}
	}

	#[test]
	fn bfv_default_rejects_unknown_dimension() {
		assert!(CoeffModulus::bfv_default(100, SecurityLevel::Tc128).is_err());
	}
}
