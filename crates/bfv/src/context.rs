//! [`Context`]: the immutable, precomputed bundle derived from
//! [`EncryptionParams`] that every other component borrows.

use crate::error::Result;
use crate::params::EncryptionParams;
use crate::plaintext::Plaintext;
use fhe_math::{Poly, RnsBase, RnsTool};
use num_bigint::BigUint;
use std::rc::Rc;
use tracing::debug;

/// Precomputed state shared by every BFV operation: the ciphertext RNS base,
/// the [`RnsTool`] used for multiplication and decryption, and the scaling
/// constants (`delta`, `q_mod_t`) that relate the plaintext and ciphertext
/// moduli.
#[derive(Debug)]
pub struct Context {
	params: EncryptionParams,
	q_base: Rc<RnsBase>,
	rns_tool: RnsTool,
	/// `floor(Q / t)`, decomposed per `q_i`: the scaling factor applied to a
	/// plaintext before it is added into a fresh ciphertext.
	delta: Vec<u64>,
	/// `Q mod t`.
	q_mod_t: u64,
}

impl Context {
	/// Validates and precomputes everything derived from `params`.
	pub fn new(params: EncryptionParams) -> Result<Rc<Self>> {
		let degree = params.degree();
		let moduli = params.ciphertext_moduli().to_vec();

		let q_base = Rc::new(RnsBase::new(&moduli)?);
		let rns_tool = RnsTool::new(degree, &moduli)?;

		let q = q_base.product();
		let t = BigUint::from(params.plaintext_modulus());
		let delta_value = q / &t;
		let delta = q_base.decompose(&delta_value);
		let q_mod_t = (q % &t).iter_u64_digits().next().unwrap_or(0);

		debug!(degree, moduli = moduli.len(), "built BFV context");

		Ok(Rc::new(Self {
			params,
			q_base,
			rns_tool,
			delta,
			q_mod_t,
		}))
	}

	pub fn params(&self) -> &EncryptionParams {
		&self.params
	}

	pub fn degree(&self) -> usize {
		self.params.degree()
	}

	pub fn plaintext_modulus(&self) -> u64 {
		self.params.plaintext_modulus()
	}

	pub fn q_base(&self) -> &Rc<RnsBase> {
		&self.q_base
	}

	pub fn rns_tool(&self) -> &RnsTool {
		&self.rns_tool
	}

	/// `floor(Q/t)`, one residue per `q_i`.
	pub fn delta(&self) -> &[u64] {
		&self.delta
	}

	/// `Q mod t`.
	pub fn q_mod_t(&self) -> u64 {
		self.q_mod_t
	}

	/// Lifts `pt` into `R_q` without scaling: each coefficient, which is
	/// already `< t < q_i`, is reused directly as the residue in every
	/// channel.
	pub fn lift_plaintext(&self, pt: &Plaintext) -> Poly {
		let rows: Vec<Vec<u64>> = self
			.q_base
			.moduli()
			.iter()
			.map(|_| pt.values().to_vec())
			.collect();
		Poly::from_rows(&self.q_base, self.degree(), &rows)
	}

	/// Lifts `pt` into `R_q` scaled by `delta = floor(Q/t)`: the polynomial
	/// added to a fresh ciphertext's first component during encryption.
	pub fn scale_plaintext(&self, pt: &Plaintext) -> Poly {
		let moduli = self.q_base.moduli();
		let rows: Vec<Vec<u64>> = moduli
			.iter()
			.zip(&self.delta)
			.map(|(m, &delta_i)| pt.values().iter().map(|&v| m.mul(v, delta_i)).collect())
			.collect();
		Poly::from_rows(&self.q_base, self.degree(), &rows)
	}
}

impl PartialEq for Context {
	fn eq(&self, other: &Self) -> bool {
		std::ptr::eq(self, other)
	}
}

impl Eq for Context {}
