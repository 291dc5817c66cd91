//! [`RnsBase`]: an ordered set of pairwise-coprime moduli together with the
//! precomputed CRT constants needed to compose and decompose values across
//! them.

use crate::error::{Error, Result};
use crate::modulus::Modulus;
use crate::numth;
use num_bigint::BigUint;
use num_integer::Integer;
use num_traits::{One, Zero};

/// An ordered sequence of pairwise-coprime moduli `(q_0, ..., q_{k-1})`,
/// together with the total product `Q = prod q_i`, each co-factor
/// `q_hat_i = Q / q_i`, and `q_hat_i^{-1} mod q_i`.
///
/// `RnsBase` is a generic CRT helper: nothing in it requires the moduli to
/// be prime or odd. The BFV-specific constraints (odd primes, congruent to
/// 1 mod 2N) are enforced one layer up, by `EncryptionParams`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RnsBase {
	moduli: Vec<Modulus>,
	q_hat: Vec<BigUint>,
	q_hat_inv_mod_qi: Vec<u64>,
	product: BigUint,
}

impl RnsBase {
	/// Builds a base from raw modulus values, failing if any pair shares a
	/// common factor.
	pub fn new(moduli: &[u64]) -> Result<Self> {
		let moduli: Vec<Modulus> = moduli.iter().map(|m| Modulus::new(*m)).collect::<Result<_>>()?;

		for i in 0..moduli.len() {
			for j in (i + 1)..moduli.len() {
				if gcd_u64(moduli[i].modulus(), moduli[j].modulus()) != 1 {
					return Err(Error::InvalidBase(format!(
						"moduli {} and {} are not coprime",
						moduli[i].modulus(),
						moduli[j].modulus()
					)));
				}
			}
		}

		let product = moduli
			.iter()
			.fold(BigUint::one(), |acc, m| acc * m.modulus());

		let mut q_hat = Vec::with_capacity(moduli.len());
		let mut q_hat_inv_mod_qi = Vec::with_capacity(moduli.len());
		for (i, qi) in moduli.iter().enumerate() {
			let hat = &product / qi.modulus();
			let hat_mod_qi = (&hat % qi.modulus()).iter_u64_digits().next().unwrap_or(0);
			let inv = qi.inv(hat_mod_qi)?;
			q_hat.push(hat);
			q_hat_inv_mod_qi.push(inv);
		}

		Ok(Self {
			moduli,
			q_hat,
			q_hat_inv_mod_qi,
			product,
		})
	}

	/// Number of moduli in the base.
	pub fn len(&self) -> usize {
		self.moduli.len()
	}

	/// Whether the base is empty (never true for a validly constructed base).
	pub fn is_empty(&self) -> bool {
		self.moduli.is_empty()
	}

	/// The moduli, in order.
	pub fn moduli(&self) -> &[Modulus] {
		&self.moduli
	}

	/// Plain `u64` modulus values, in order.
	pub fn moduli_u64(&self) -> Vec<u64> {
		self.moduli.iter().map(|m| m.modulus()).collect()
	}

	/// `Q = prod q_i`.
	pub fn product(&self) -> &BigUint {
		&self.product
	}

	/// `Q / q_i`.
	pub fn q_hat(&self, i: usize) -> &BigUint {
		&self.q_hat[i]
	}

	/// `(Q / q_i)^{-1} mod q_i`.
	pub fn q_hat_inv_mod_qi(&self, i: usize) -> u64 {
		self.q_hat_inv_mod_qi[i]
	}

	/// CRT-composes a vector of per-modulus residues into the unique
	/// representative in `[0, Q)`.
	///
	/// `residues.len()` must equal `self.len()`.
	pub fn compose(&self, residues: &[u64]) -> BigUint {
		debug_assert_eq!(residues.len(), self.len());
		let mut acc = BigUint::zero();
		for i in 0..self.len() {
			let term = self.moduli[i].mul(residues[i], self.q_hat_inv_mod_qi[i]);
			acc += &self.q_hat[i] * term;
		}
		acc % &self.product
	}

	/// Decomposes `value` into its residues modulo each `q_i`.
	pub fn decompose(&self, value: &BigUint) -> Vec<u64> {
		self.moduli
			.iter()
			.map(|m| {
				let r = value % m.modulus();
				r.iter_u64_digits().next().unwrap_or(0)
			})
			.collect()
	}
}

fn gcd_u64(a: u64, b: u64) -> u64 {
	a.gcd(&b)
}
