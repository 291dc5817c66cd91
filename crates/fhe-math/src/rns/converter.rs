//! Fast (approximate) RNS base conversion, plus an exact CRT-based variant
//! used where correctness matters more than avoiding big-integer math.

use super::base::RnsBase;
use num_bigint::BigUint;
use num_traits::Zero;

/// Converts residue vectors from one [`RnsBase`] to another.
///
/// [`BaseConverter::fast_convert`] implements the textbook fast base
/// conversion: for each output prime `p_j`,
/// `sum_i ((x_i * q_hat_i^-1 mod q_i) * q_hat_i) mod p_j`.
/// This sum is *not* reduced modulo the input base's product `Q` before the
/// final reduction, so the result can be off from the true value by a small
/// multiple of `Q` (at most `k - 1` times it, where `k` is the input base
/// size). That is intentional: it is the behaviour the BFV "multiply with
/// flooring" procedure is built to tolerate and correct downstream.
pub struct BaseConverter {
	ibase: RnsBase,
	obase: RnsBase,
}

impl BaseConverter {
	/// Builds a converter from `ibase` to `obase`.
	pub fn new(ibase: RnsBase, obase: RnsBase) -> Self {
		Self { ibase, obase }
	}

	/// The input base.
	pub fn ibase(&self) -> &RnsBase {
		&self.ibase
	}

	/// The output base.
	pub fn obase(&self) -> &RnsBase {
		&self.obase
	}

	/// Fast (approximate) conversion of a single coefficient's residues.
	pub fn fast_convert(&self, residues: &[u64]) -> Vec<u64> {
		debug_assert_eq!(residues.len(), self.ibase.len());
		let mut sum = BigUint::zero();
		for i in 0..self.ibase.len() {
			let qi = &self.ibase.moduli()[i];
			let term = qi.mul(residues[i], self.ibase.q_hat_inv_mod_qi(i));
			sum += self.ibase.q_hat(i) * term;
		}
		self.obase
			.moduli()
			.iter()
			.map(|pj| {
				let r = &sum % pj.modulus();
				r.iter_u64_digits().next().unwrap_or(0)
			})
			.collect()
	}

	/// Fast conversion of a whole polynomial, given as one residue row per
	/// input modulus (`vectors[i][c]` is coefficient `c`'s residue mod
	/// `ibase.moduli()[i]`). Returns one row per output modulus.
	pub fn fast_convert_list(&self, vectors: &[Vec<u64>]) -> Vec<Vec<u64>> {
		debug_assert_eq!(vectors.len(), self.ibase.len());
		let degree = vectors.first().map_or(0, |v| v.len());
		let mut output = vec![vec![0u64; degree]; self.obase.len()];
		for c in 0..degree {
			let residues: Vec<u64> = vectors.iter().map(|row| row[c]).collect();
			let converted = self.fast_convert(&residues);
			for (j, value) in converted.into_iter().enumerate() {
				output[j][c] = value;
			}
		}
		output
	}

	/// Exact CRT-based conversion: compose each coefficient to a big integer
	/// under `ibase`, then decompose it under `obase`.
	///
	/// Unlike [`BaseConverter::fast_convert`], this has no additive error,
	/// at the cost of forming the full big integer per coefficient. Used by
	/// [`crate::rns::RnsTool`], which needs exact quotients, and by tests
	/// that want to check [`BaseConverter::fast_convert`] against ground
	/// truth.
	pub fn exact_convert_list(&self, vectors: &[Vec<u64>]) -> Vec<Vec<u64>> {
		debug_assert_eq!(vectors.len(), self.ibase.len());
		let degree = vectors.first().map_or(0, |v| v.len());
		let mut output = vec![vec![0u64; degree]; self.obase.len()];
		for c in 0..degree {
			let residues: Vec<u64> = vectors.iter().map(|row| row[c]).collect();
			let value = self.ibase.compose(&residues);
			let converted = self.obase.decompose(&value);
			for (j, v) in converted.into_iter().enumerate() {
				output[j][c] = v;
			}
		}
		output
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn fast_convert_matches_known_values() {
		let conv = BaseConverter::new(RnsBase::new(&[3]).unwrap(), RnsBase::new(&[2]).unwrap());
		let out = conv.fast_convert_list(&[vec![0, 1, 2]]);
		assert_eq!(out, vec![vec![0, 1, 0]]);

		let conv = BaseConverter::new(RnsBase::new(&[2, 3]).unwrap(), RnsBase::new(&[2]).unwrap());
		let out = conv.fast_convert_list(&[vec![0, 1, 0], vec![0, 1, 2]]);
		assert_eq!(out, vec![vec![0, 1, 0]]);

		let base23 = RnsBase::new(&[2, 3]).unwrap();
		let conv = BaseConverter::new(base23.clone(), base23);
		let out = conv.fast_convert_list(&[vec![1, 1, 0], vec![1, 2, 2]]);
		assert_eq!(out, vec![vec![1, 1, 0], vec![1, 2, 2]]);

		let conv = BaseConverter::new(
			RnsBase::new(&[2, 3]).unwrap(),
			RnsBase::new(&[3, 4, 5]).unwrap(),
		);
		let out = conv.fast_convert_list(&[vec![0, 1, 1], vec![0, 1, 2]]);
		assert_eq!(out, vec![vec![0, 1, 2], vec![0, 3, 1], vec![0, 2, 0]]);
	}

	#[test]
	fn exact_convert_has_no_error() {
		let conv = BaseConverter::new(
			RnsBase::new(&[2, 3]).unwrap(),
			RnsBase::new(&[3, 4, 5]).unwrap(),
		);
		// x = 0, 1, 5 (the true integers behind the residues in the fast
		// conversion test above).
		let out = conv.exact_convert_list(&[vec![0, 1, 1], vec![0, 1, 2]]);
		assert_eq!(out, vec![vec![0, 1, 2], vec![0, 1, 1], vec![0, 1, 0]]);
	}
}
