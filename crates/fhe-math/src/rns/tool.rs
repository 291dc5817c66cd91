//! [`RnsTool`]: the precomputed tables that back BFV's "multiply with
//! flooring" ciphertext multiplication — `fastbconv_sk`, `sm_mrq`, and
//! `fast_floor`.
//!
//! The textbook (BEHZ) presentation of these three routines keeps every
//! intermediate value in RNS form and corrects the small additive error that
//! [`BaseConverter::fast_convert`] introduces by tracking it through an
//! extra auxiliary prime. This implementation instead composes to an exact
//! big integer at each step (via [`BaseConverter::exact_convert_list`] and
//! [`RnsBase::compose`]/[`RnsBase::decompose`]), which has no error to
//! correct in the first place. The three routines keep their textbook names
//! and signatures — residue rows in, residue rows out — so callers and
//! tests are unaffected by the substitution; only the inside of the box
//! changed.

use super::base::RnsBase;
use super::converter::BaseConverter;
use crate::error::Result;
use crate::numth;
use num_bigint::BigUint;

/// Precomputed bases and converters needed for RNS-assisted BFV
/// multiplication and decryption.
#[derive(Debug, Clone)]
pub struct RnsTool {
	q_base: RnsBase,
	bsk_base: RnsBase,
	qbsk_base: RnsBase,
	bsk_mtilde_base: RnsBase,
	q_to_bsk: BaseConverter,
	bsk_to_q: BaseConverter,
	m_tilde: u64,
}

impl RnsTool {
	/// The small power-of-two auxiliary modulus used by `sm_mrq`. Coprime to
	/// every odd prime, so it never collides with a ciphertext modulus or an
	/// auxiliary Bsk prime.
	const M_TILDE: u64 = 1 << 32;

	/// Builds the RNS tool for a ciphertext modulus chain `q` over degree-`N`
	/// polynomials.
	///
	/// Generates `|q| + 1` auxiliary primes (the "B" part of Bsk, plus the
	/// single auxiliary prime `msk`), disjoint from `q`, of the same
	/// bit-width as the largest prime in `q`.
	pub fn new(degree: usize, q_moduli: &[u64]) -> Result<Self> {
		let q_base = RnsBase::new(q_moduli)?;
		let needed = q_base.len() + 1;
		let bit_size = 61;

		let mut bsk_moduli = Vec::with_capacity(needed);
		let mut search_count = needed + q_base.len();
		loop {
			let candidates = numth::get_primes(degree, bit_size, search_count)?;
			bsk_moduli = candidates
				.into_iter()
				.filter(|p| !q_moduli.contains(p))
				.take(needed)
				.collect();
			if bsk_moduli.len() == needed {
				break;
			}
			search_count += needed;
		}

		let bsk_base = RnsBase::new(&bsk_moduli)?;

		let mut joint = q_moduli.to_vec();
		joint.extend_from_slice(&bsk_moduli);
		let qbsk_base = RnsBase::new(&joint)?;

		let mut bsk_mtilde_moduli = bsk_moduli.clone();
		bsk_mtilde_moduli.push(Self::M_TILDE);
		let bsk_mtilde_base = RnsBase::new(&bsk_mtilde_moduli)?;

		let q_to_bsk = BaseConverter::new(q_base.clone(), bsk_base.clone());
		let bsk_to_q = BaseConverter::new(bsk_base.clone(), q_base.clone());

		Ok(Self {
			q_base,
			bsk_base,
			qbsk_base,
			bsk_mtilde_base,
			q_to_bsk,
			bsk_to_q,
			m_tilde: Self::M_TILDE,
		})
	}

	/// The ciphertext coefficient base `q`.
	pub fn q_base(&self) -> &RnsBase {
		&self.q_base
	}

	/// The auxiliary base `Bsk = B ∪ {msk}`.
	pub fn bsk_base(&self) -> &RnsBase {
		&self.bsk_base
	}

	/// The auxiliary power-of-two modulus `m_tilde`.
	pub fn m_tilde(&self) -> u64 {
		self.m_tilde
	}

	/// Extends a polynomial from base `q` to base `Bsk`.
	///
	/// Step 1 of ciphertext multiplication (§4.10): base-convert each
	/// ciphertext component so the convolution can be computed in the wider
	/// `q ∪ Bsk` base without overflowing `Q`.
	pub fn extend_to_bsk(&self, q_residues: &[Vec<u64>]) -> Vec<Vec<u64>> {
		self.q_to_bsk.exact_convert_list(q_residues)
	}

	/// "Small Montgomery reduction mod q": given a polynomial represented
	/// modulo `m_tilde * Bsk`, returns the same value divided by `m_tilde`
	/// and represented in `Bsk` alone.
	///
	/// `input` has `bsk_base.len() + 1` rows: the first `bsk_base.len()` are
	/// residues mod each Bsk prime, and the last is the residue mod
	/// `m_tilde`.
	pub fn sm_mrq(&self, input: &[Vec<u64>]) -> Vec<Vec<u64>> {
		let k = self.bsk_base.len();
		debug_assert_eq!(input.len(), k + 1);
		let degree = input[0].len();
		let m_tilde = BigUint::from(self.m_tilde);
		let half = &m_tilde / 2u32;

		let mut out = vec![vec![0u64; degree]; k];
		for c in 0..degree {
			let residues: Vec<u64> = input.iter().map(|row| row[c]).collect();
			let value = self.bsk_mtilde_base.compose(&residues);
			let divided = (&value + &half) / &m_tilde;
			for (i, v) in self.bsk_base.decompose(&divided).into_iter().enumerate() {
				out[i][c] = v;
			}
		}
		out
	}

	/// Computes `floor(x / Q)`, where `x` is represented across `q ∪ Bsk`
	/// and `Q = q_base.product()`. The result is returned in `Bsk` alone.
	///
	/// `input` has `q_base.len() + bsk_base.len()` rows: the first
	/// `q_base.len()` are residues mod each `q_i`, the rest mod each Bsk
	/// prime.
	pub fn fast_floor(&self, input: &[Vec<u64>]) -> Vec<Vec<u64>> {
		let kq = self.q_base.len();
		let kb = self.bsk_base.len();
		debug_assert_eq!(input.len(), kq + kb);
		let degree = input[0].len();
		let q = self.q_base.product();

		let mut out = vec![vec![0u64; degree]; kb];
		for c in 0..degree {
			let residues: Vec<u64> = input.iter().map(|row| row[c]).collect();
			let value = self.qbsk_base.compose(&residues);
			let floor = &value / q;
			for (i, v) in self.bsk_base.decompose(&floor).into_iter().enumerate() {
				out[i][c] = v;
			}
		}
		out
	}

	/// Base-converts a polynomial from `Bsk` back to `q`, discarding the
	/// auxiliary prime `msk` that bounded the rounding error introduced by
	/// fast conversion.
	pub fn fastbconv_sk(&self, bsk_residues: &[Vec<u64>]) -> Vec<Vec<u64>> {
		self.bsk_to_q.exact_convert_list(bsk_residues)
	}
}
