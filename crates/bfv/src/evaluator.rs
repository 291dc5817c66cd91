//! [`Evaluator`]: the homomorphic operations available on ciphertexts —
//! addition, subtraction, negation, plaintext and ciphertext multiplication,
//! and relinearization.

use crate::ciphertext::Ciphertext;
use crate::context::Context;
use crate::error::{Error, Result};
use crate::plaintext::Plaintext;
use crate::relin_keys::RelinKeys;
use fhe_math::{Modulus, Poly, RnsBase};
use std::rc::Rc;

/// Thin wrapper tying the free-standing operator overloads on [`Ciphertext`]
/// and [`Plaintext`] together with the operations that need more than two
/// operands worth of context: ciphertext-ciphertext multiplication (which
/// needs the auxiliary `Bsk` base) and relinearization (which needs the
/// relinearization keys).
pub struct Evaluator {
	ctx: Rc<Context>,
}

impl Evaluator {
	pub fn new(ctx: &Rc<Context>) -> Self {
		Self { ctx: ctx.clone() }
	}

	pub fn add(&self, a: &Ciphertext, b: &Ciphertext) -> Result<Ciphertext> {
		a + b
	}

	pub fn sub(&self, a: &Ciphertext, b: &Ciphertext) -> Result<Ciphertext> {
		a - b
	}

	pub fn negate(&self, a: &Ciphertext) -> Ciphertext {
		-a
	}

	/// Adds a plaintext into a ciphertext's constant term, scaling it by
	/// `delta` first.
	pub fn add_plain(&self, ct: &Ciphertext, pt: &Plaintext) -> Result<Ciphertext> {
		self.check_contexts(ct.context(), pt.context())?;
		let scaled = self.ctx.scale_plaintext(pt);
		let mut c = ct.components().to_vec();
		c[0] += &scaled;
		Ok(Ciphertext::new(&self.ctx, c))
	}

	/// Multiplies every component of `ct` by `pt`, lifted into `R_q` without
	/// `delta` scaling (plaintext-ciphertext multiplication needs no rescale:
	/// the output's implicit scale is still `delta`).
	pub fn multiply_plain(&self, ct: &Ciphertext, pt: &Plaintext) -> Result<Ciphertext> {
		self.check_contexts(ct.context(), pt.context())?;
		let lifted = self.ctx.lift_plaintext(pt);
		let c = ct.components().iter().map(|ci| ci * &lifted).collect();
		Ok(Ciphertext::new(&self.ctx, c))
	}

	/// Ciphertext-ciphertext multiplication: extends every component into the
	/// joint `q ∪ Bsk` base, convolves pairwise, scales by `t`, floors the
	/// division by `Q`, and converts back to `q`. Produces a ciphertext of
	/// size `a.size() + b.size() - 1`.
	pub fn multiply(&self, a: &Ciphertext, b: &Ciphertext) -> Result<Ciphertext> {
		self.check_contexts(a.context(), b.context())?;
		let rns_tool = self.ctx.rns_tool();
		let q_base = self.ctx.q_base();
		let bsk_base = rns_tool.bsk_base();
		let degree = self.ctx.degree();
		let t = self.ctx.plaintext_modulus();

		let mut joint_moduli = q_base.moduli_u64();
		joint_moduli.extend(bsk_base.moduli_u64());
		let joint_base = Rc::new(RnsBase::new(&joint_moduli).expect("q and Bsk moduli are pairwise coprime"));

		let extend = |ct: &Ciphertext| -> Vec<Poly> {
			ct.components()
				.iter()
				.map(|ci| {
					let mut rows = ci.rows();
					rows.extend(rns_tool.extend_to_bsk(&ci.rows()));
					Poly::from_rows(&joint_base, degree, &rows)
				})
				.collect()
		};
		let a_ext = extend(a);
		let b_ext = extend(b);

		let out_size = a_ext.len() + b_ext.len() - 1;
		let mut out = Vec::with_capacity(out_size);
		for k in 0..out_size {
			let mut acc = Poly::zero(&joint_base, degree);
			for i in 0..a_ext.len() {
				if k < i || k - i >= b_ext.len() {
					continue;
				}
				let j = k - i;
				acc += &(&a_ext[i] * &b_ext[j]);
			}
			out.push(acc);
		}

		let mut joint_moduli_objs = q_base.moduli().to_vec();
		joint_moduli_objs.extend(bsk_base.moduli().iter().copied());

		let mut c = Vec::with_capacity(out_size);
		for component in out {
			let mut rows = component.rows();
			for (row, m) in rows.iter_mut().zip(&joint_moduli_objs) {
				scale_row_in_place(row, t, m);
			}
			let floored = rns_tool.fast_floor(&rows);
			let q_rows = rns_tool.fastbconv_sk(&floored);
			c.push(Poly::from_rows(q_base, degree, &q_rows));
		}

		Ok(Ciphertext::new(&self.ctx, c))
	}

	/// Relinearizes a size-3 ciphertext (the output of one multiplication)
	/// back down to size 2, using `rk` to key-switch the degree-2 term.
	pub fn relinearize(&self, ct: &Ciphertext, rk: &RelinKeys) -> Result<Ciphertext> {
		self.check_contexts(ct.context(), rk.context())?;
		if ct.size() != 3 {
			if ct.size() > 3 {
				return Err(Error::UnsupportedSize(ct.size()));
			}
			return Err(Error::WrongCiphertextSize {
				actual: ct.size(),
				expected: "3".into(),
			});
		}
		let components = ct.components();
		let (switched0, switched1) = rk.switch(&components[2]);
		let c0 = &components[0] + &switched0;
		let c1 = &components[1] + &switched1;
		Ok(Ciphertext::new(&self.ctx, vec![c0, c1]))
	}

	fn check_contexts(&self, a: &Rc<Context>, b: &Rc<Context>) -> Result<()> {
		if a != &self.ctx || b != &self.ctx {
			return Err(Error::MismatchedContext);
		}
		Ok(())
	}
}

fn scale_row_in_place(row: &mut [u64], t: u64, m: &Modulus) {
	let scalar = m.reduce(t);
	m.scalar_mul_vec(row, scalar);
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::context::Context;
	use crate::key_generator::KeyGenerator;
	use crate::params::EncryptionParamsBuilder;
	use crate::traits::{Decryptor, Encryptor};
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
	fn multiply_then_relinearize_recovers_the_product() {
		let ctx = ctx();
		let mut r = rng();
		let gen = KeyGenerator::new(&ctx);
		let (sk, _pk) = gen.keygen(&mut r);
		let rk = gen.relin_keys(&sk, &mut r);
		let ev = Evaluator::new(&ctx);

		let pt_a = Plaintext::from_coefficients(&ctx, &[5]).unwrap();
		let pt_b = Plaintext::from_coefficients(&ctx, &[6]).unwrap();
		let ct_a = sk.encrypt(&pt_a, &mut r).unwrap();
		let ct_b = sk.encrypt(&pt_b, &mut r).unwrap();

		let product = ev.multiply(&ct_a, &ct_b).unwrap();
		assert_eq!(product.size(), 3);
		let relinearized = ev.relinearize(&product, &rk).unwrap();
		assert_eq!(relinearized.size(), 2);

		let decrypted = sk.decrypt(&relinearized).unwrap();
		assert_eq!(decrypted.values()[0], 30);
	}

	#[test]
	fn relinearize_rejects_a_fresh_size_two_ciphertext() {
		let ctx = ctx();
		let mut r = rng();
		let gen = KeyGenerator::new(&ctx);
		let (sk, _pk) = gen.keygen(&mut r);
		let rk = gen.relin_keys(&sk, &mut r);
		let ev = Evaluator::new(&ctx);

		let pt = Plaintext::from_coefficients(&ctx, &[5]).unwrap();
		let ct = sk.encrypt(&pt, &mut r).unwrap();
		assert_eq!(ct.size(), 2);

		match ev.relinearize(&ct, &rk) {
			Err(Error::WrongCiphertextSize { actual, .. }) => assert_eq!(actual, 2),
			other => panic!("expected WrongCiphertextSize, got {other:?}"),
		}
	}

	#[test]
	fn relinearize_rejects_a_size_four_ciphertext() {
		let ctx = ctx();
		let mut r = rng();
		let gen = KeyGenerator::new(&ctx);
		let (sk, _pk) = gen.keygen(&mut r);
		let rk = gen.relin_keys(&sk, &mut r);
		let ev = Evaluator::new(&ctx);

		let pt_a = Plaintext::from_coefficients(&ctx, &[5]).unwrap();
		let pt_b = Plaintext::from_coefficients(&ctx, &[6]).unwrap();
		let ct_a = sk.encrypt(&pt_a, &mut r).unwrap();
		let ct_b = sk.encrypt(&pt_b, &mut r).unwrap();
		let product = ev.multiply(&ct_a, &ct_b).unwrap();
		assert_eq!(product.size(), 3);
		let padded = ev.multiply(&product, &ct_a).unwrap();
		assert_eq!(padded.size(), 4);

		match ev.relinearize(&padded, &rk) {
			Err(Error::UnsupportedSize(4)) => {}
			other => panic!("expected UnsupportedSize(4), got {other:?}"),
		}
	}

	#[test]
	fn multiply_plain_scales_the_plaintext_into_the_ciphertext() {
		let ctx = ctx();
		let mut r = rng();
		let gen = KeyGenerator::new(&ctx);
		let (sk, _pk) = gen.keygen(&mut r);
		let ev = Evaluator::new(&ctx);

		let pt_a = Plaintext::from_coefficients(&ctx, &[5]).unwrap();
		let pt_b = Plaintext::from_coefficients(&ctx, &[6]).unwrap();
		let ct_a = sk.encrypt(&pt_a, &mut r).unwrap();

		let product = ev.multiply_plain(&ct_a, &pt_b).unwrap();
		let decrypted = sk.decrypt(&product).unwrap();
		assert_eq!(decrypted.values()[0], 30);
	}
}
