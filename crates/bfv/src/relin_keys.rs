//! [`RelinKeys`]: the key-switching material that brings a degree-2
//! ciphertext (the output of a multiplication) back down to degree 1.

use crate::context::Context;
use crate::secret_key::SecretKey;
use fhe_math::Poly;
use rand::RngCore;
use std::rc::Rc;

/// One key-switching key pair per channel of the context's `q` base.
///
/// Channel `i`'s pair encrypts `g_i * s^2` under `s`, where `g_i` is the CRT
/// basis element for `q_i` (`1 mod q_i`, `0 mod q_j` for `j != i`). Relinearizing
/// a ciphertext's degree-2 term sums `digit_i * keys[i]` over every channel,
/// where `digit_i` is that term's channel-`i` residue lifted across the whole
/// base; see [`crate::evaluator`].
#[derive(Clone)]
pub struct RelinKeys {
	ctx: Rc<Context>,
	keys: Vec<(Poly, Poly)>,
}

impl RelinKeys {
	/// Generates relinearization keys for `sk`.
	pub fn generate(sk: &SecretKey, rng: &mut impl RngCore) -> Self {
		let ctx = sk.context().clone();
		let base = ctx.q_base();
		let s_squared = sk.poly() * sk.poly();

		let keys = (0..base.len())
			.map(|i| {
				let mut residues = vec![0u64; base.len()];
				residues[i] = 1;
				let g_i_s2 = s_squared.scalar_mul_per_channel(&residues);
				sk.encrypt_ring_element(&g_i_s2, rng)
			})
			.collect();

		Self { ctx, keys }
	}

	pub fn context(&self) -> &Rc<Context> {
		&self.ctx
	}

	pub(crate) fn keys(&self) -> &[(Poly, Poly)] {
		&self.keys
	}

	/// Key-switches a degree-2 term `c2` back under the original secret key:
	/// for every channel `i`, lifts `c2`'s channel-`i` residues across the
	/// whole base (a "digit"), then accumulates `digit * keys[i]`.
	///
	/// Summing the digits' CRT basis elements reconstructs `c2` exactly
	/// modulo `Q`; since each key already encrypts that channel's basis
	/// element times `s^2`, the sum is an encryption of `c2 * s^2` under `s`.
	pub(crate) fn switch(&self, c2: &Poly) -> (Poly, Poly) {
		let base = self.ctx.q_base();
		let degree = self.ctx.degree();
		let mut acc0 = Poly::zero(base, degree);
		let mut acc1 = Poly::zero(base, degree);
		for (i, (k0, k1)) in self.keys.iter().enumerate() {
			let row = c2.channel(i).to_vec();
			let rows: Vec<Vec<u64>> = (0..base.len()).map(|_| row.clone()).collect();
			let digit = Poly::from_rows(base, degree, &rows);
			acc0 += &(&digit * k0);
			acc1 += &(&digit * k1);
		}
		(acc0, acc1)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::context::Context;
	use crate::params::EncryptionParamsBuilder;
	use rand::{thread_rng, Rng, SeedableRng};
	use rand_chacha::ChaCha8Rng;

	fn ctx() -> Rc<Context> {
		Context::new(
			EncryptionParamsBuilder::default()
				.polynomial_degree(64)
				.plaintext_modulus(64)
				.ciphertext_moduli_sizes(vec![30, 30])
				.build()
				.unwrap(),
		)
		.unwrap()
	}

	fn rng() -> ChaCha8Rng {
		let mut seed = <ChaCha8Rng as SeedableRng>::Seed::default();
		thread_rng().fill(&mut seed);
		ChaCha8Rng::from_seed(seed)
	}

	#[test]
	fn generates_one_key_pair_per_channel() {
		let ctx = ctx();
		let mut r = rng();
		let sk = SecretKey::random(&ctx, &mut r);
		let rk = RelinKeys::generate(&sk, &mut r);
		assert_eq!(rk.keys().len(), ctx.q_base().len());
	}
}
