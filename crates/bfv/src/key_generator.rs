//! [`KeyGenerator`]: the single entry point for producing a key pair and, on
//! demand, relinearization keys, all tied to one [`Context`].

use crate::context::Context;
use crate::public_key::PublicKey;
use crate::relin_keys::RelinKeys;
use crate::secret_key::SecretKey;
use rand::RngCore;
use std::rc::Rc;

/// Generates keys for a fixed [`Context`].
pub struct KeyGenerator {
	ctx: Rc<Context>,
}

impl KeyGenerator {
	pub fn new(ctx: &Rc<Context>) -> Self {
		Self { ctx: ctx.clone() }
	}

	/// Samples a fresh secret key and derives its matching public key.
	pub fn keygen(&self, rng: &mut impl RngCore) -> (SecretKey, PublicKey) {
		let sk = SecretKey::random(&self.ctx, rng);
		let pk = PublicKey::from_secret_key(&sk, rng);
		(sk, pk)
	}

	/// Generates relinearization keys for an existing secret key.
	pub fn relin_keys(&self, sk: &SecretKey, rng: &mut impl RngCore) -> RelinKeys {
		debug_assert_eq!(sk.context(), &self.ctx);
		RelinKeys::generate(sk, rng)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
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
	fn keygen_produces_a_matching_pair() {
		let ctx = ctx();
		let mut r = rng();
		let gen = KeyGenerator::new(&ctx);
		let (sk, pk) = gen.keygen(&mut r);
		assert_eq!(sk.context(), pk.context());
	}

	#[test]
	fn relin_keys_cover_every_channel() {
		let ctx = ctx();
		let mut r = rng();
		let gen = KeyGenerator::new(&ctx);
		let (sk, _pk) = gen.keygen(&mut r);
		let rk = gen.relin_keys(&sk, &mut r);
		assert_eq!(rk.context(), &ctx);
	}
}
