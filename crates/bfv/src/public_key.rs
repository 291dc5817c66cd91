//! [`PublicKey`]: derived from a [`SecretKey`], lets anyone encrypt without
//! holding the secret.

use crate::ciphertext::Ciphertext;
use crate::context::Context;
use crate::error::{Error, Result};
use crate::plaintext::Plaintext;
use crate::secret_key::SecretKey;
use crate::traits::Encryptor;
use fhe_math::Poly;
use rand::RngCore;
use std::rc::Rc;

/// A BFV public key: `(p0, p1) = (-(a*s + e), a)`, an encryption of zero
/// under the matching secret key.
#[derive(Clone)]
pub struct PublicKey {
	ctx: Rc<Context>,
	p0: Poly,
	p1: Poly,
}

impl PublicKey {
	/// Derives the public key matching `sk` by symmetrically encrypting zero.
	pub fn from_secret_key(sk: &SecretKey, rng: &mut impl RngCore) -> Self {
		let zero = Plaintext::zero(sk.context());
		let ct = sk.encrypt(&zero, rng).expect("encrypting under sk's own context never fails");
		let mut c = ct.components().iter();
		let p0 = c.next().expect("fresh ciphertext has at least two components").clone();
		let p1 = c.next().expect("fresh ciphertext has at least two components").clone();
		Self {
			ctx: sk.context().clone(),
			p0,
			p1,
		}
	}

	pub fn context(&self) -> &Rc<Context> {
		&self.ctx
	}
}

impl Encryptor for PublicKey {
	/// Asymmetric encryption: samples a ternary `u` and fresh noise `e1, e2`,
	/// then outputs `(p0*u + e1 + delta*m, p1*u + e2)`.
	fn encrypt<R: RngCore>(&self, pt: &Plaintext, rng: &mut R) -> Result<Ciphertext> {
		if pt.context() != &self.ctx {
			return Err(Error::MismatchedContext);
		}
		let base = self.ctx.q_base();
		let degree = self.ctx.degree();
		let std_dev = self.ctx.params().noise_std_dev();

		let u = Poly::sample_ternary(base, degree, rng);
		let e1 = Poly::sample_gaussian(base, degree, std_dev, rng);
		let e2 = Poly::sample_gaussian(base, degree, std_dev, rng);
		let scaled = self.ctx.scale_plaintext(pt);

		let c0 = &(&(&self.p0 * &u) + &e1) + &scaled;
		let c1 = &(&self.p1 * &u) + &e2;
		Ok(Ciphertext::new(&self.ctx, vec![c0, c1]))
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::params::EncryptionParamsBuilder;
	use crate::traits::Decryptor;
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
	fn public_key_encryption_round_trips() {
		let ctx = ctx();
		let mut r = rng();
		let sk = SecretKey::random(&ctx, &mut r);
		let pk = PublicKey::from_secret_key(&sk, &mut r);
		let pt = Plaintext::from_coefficients(&ctx, &[3, 9, 27]).unwrap();
		let ct = pk.encrypt(&pt, &mut r).unwrap();
		let back = sk.decrypt(&ct).unwrap();
		assert_eq!(back.values()[..3], [3, 9, 27]);
	}
}
