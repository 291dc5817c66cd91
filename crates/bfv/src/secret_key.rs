//! [`SecretKey`]: the ternary polynomial `s` used for symmetric encryption,
//! decryption, and as the basis for relinearization key generation.

use crate::ciphertext::Ciphertext;
use crate::context::Context;
use crate::error::{Error, Result};
use crate::plaintext::Plaintext;
use crate::traits::{Decryptor, Encryptor};
use fhe_math::{Modulus, Poly};
use num_bigint::BigUint;
use rand::RngCore;
use std::rc::Rc;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// A BFV secret key: a ternary polynomial `s` with coefficients in
/// `{-1, 0, 1}`, represented across every channel of the context's `q` base.
///
/// Zeroized on drop so key material doesn't linger in memory past its
/// owner's lifetime.
#[derive(Clone, ZeroizeOnDrop)]
pub struct SecretKey {
	#[zeroize(skip)]
	ctx: Rc<Context>,
	s: Poly,
}

impl SecretKey {
	/// Samples a fresh ternary secret key.
	pub fn random(ctx: &Rc<Context>, rng: &mut impl RngCore) -> Self {
		let s = Poly::sample_ternary(ctx.q_base(), ctx.degree(), rng);
		Self { ctx: ctx.clone(), s }
	}

	pub fn context(&self) -> &Rc<Context> {
		&self.ctx
	}

	pub(crate) fn poly(&self) -> &Poly {
		&self.s
	}

	/// Encrypts an arbitrary ring element `m` (already in base `q`, with no
	/// `delta` scaling applied) under `self`: `c0 = -(a*s + e) + m`,
	/// `c1 = a`.
	///
	/// The common core of symmetric [`Encryptor::encrypt`] (where `m` is a
	/// scaled plaintext) and relinearization-key generation (where `m` is a
	/// Garner-coefficient-scaled copy of `s^2`).
	pub(crate) fn encrypt_ring_element(&self, m: &Poly, rng: &mut impl RngCore) -> (Poly, Poly) {
		let base = self.ctx.q_base();
		let degree = self.ctx.degree();
		let a = Poly::sample_uniform(base, degree, rng);
		let e = Poly::sample_gaussian(base, degree, self.ctx.params().noise_std_dev(), rng);
		let c0 = &(-&(&(&a * &self.s) + &e)) + m;
		(c0, a)
	}

	/// Diagnostic: an approximate noise budget in bits, the gap between
	/// `log2(Q)` and the size of the centered remainder `t * acc mod Q`, for
	/// tests and tuning. Decrypts with `self` internally and is not part of
	/// the production decryption path.
	pub fn noise_budget(&self, ct: &Ciphertext) -> Result<u32> {
		let base = self.ctx.q_base();
		let mut acc = ct.components()[0].clone();
		let mut s_pow = self.s.clone();
		for ci in &ct.components()[1..] {
			acc += &(ci * &s_pow);
			s_pow = &s_pow * &self.s;
		}
		let t = self.ctx.plaintext_modulus();
		let q = base.product().clone();
		let coeffs = acc.to_biguint_coeffs();
		let mut max_noise = BigUint::from(0u64);
		for c in &coeffs {
			let scaled = (c * t) % &q;
			let centered = if &scaled * 2u32 > q { &q - &scaled } else { scaled };
			max_noise = max_noise.max(centered);
		}
		let noise_bits = max_noise.bits().max(1);
		let q_bits = q.bits();
		Ok(q_bits.saturating_sub(noise_bits) as u32)
	}
}

impl Encryptor for SecretKey {
	/// Symmetric encryption: `c0 = -(a*s + e) + delta*m`, `c1 = a`, with `a`
	/// uniform and `e` drawn from the context's Gaussian noise distribution.
	fn encrypt<R: RngCore>(&self, pt: &Plaintext, rng: &mut R) -> Result<Ciphertext> {
		if pt.context() != &self.ctx {
			return Err(Error::MismatchedContext);
		}
		let scaled = self.ctx.scale_plaintext(pt);
		let (c0, c1) = self.encrypt_ring_element(&scaled, rng);
		Ok(Ciphertext::new(&self.ctx, vec![c0, c1]))
	}
}

impl Decryptor for SecretKey {
	/// Decrypts `ct` by evaluating `sum c_i * s^i` in base `q`, then scaling
	/// by `t` and dividing by `Q` using [`fhe_math::RnsTool`]: the same
	/// `extend_to_bsk` / `fast_floor` machinery the evaluator uses to scale
	/// down after ciphertext multiplication, rather than a one-off
	/// division routine.
	fn decrypt(&self, ct: &Ciphertext) -> Result<Plaintext> {
		if ct.context() != &self.ctx {
			return Err(Error::MismatchedContext);
		}
		let base = self.ctx.q_base();
		let degree = self.ctx.degree();
		let rns_tool = self.ctx.rns_tool();
		let t = self.ctx.plaintext_modulus();

		let mut acc = ct.components()[0].clone();
		let mut s_pow = self.s.clone();
		for ci in &ct.components()[1..] {
			acc += &(ci * &s_pow);
			s_pow = &s_pow * &self.s;
		}

		let q_rows = acc.rows();
		let bsk_rows = rns_tool.extend_to_bsk(&q_rows);

		let scale = |rows: &[Vec<u64>], moduli: &[Modulus]| -> Vec<Vec<u64>> {
			rows.iter()
				.zip(moduli)
				.map(|(row, m)| row.iter().map(|&v| m.mul(v, t)).collect())
				.collect()
		};
		let mut joint = scale(&q_rows, base.moduli());
		joint.extend(scale(&bsk_rows, rns_tool.bsk_base().moduli()));

		let floored = rns_tool.fast_floor(&joint);
		let bsk_base = rns_tool.bsk_base();
		let t_mod = Modulus::new(t).expect("plaintext modulus validated at context creation");
		let mut values = vec![0u64; degree];
		for i in 0..degree {
			let residues: Vec<u64> = floored.iter().map(|row| row[i]).collect();
			let composed = bsk_base.compose(&residues);
			let v = (&composed % t).iter_u64_digits().next().unwrap_or(0);
			values[i] = t_mod.reduce(v);
		}
		Plaintext::from_coefficients(&self.ctx, &values)
	}
}

impl Zeroize for SecretKey {
	fn zeroize(&mut self) {
		self.s.zeroize();
	}
}
