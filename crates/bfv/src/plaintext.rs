//! [`Plaintext`]: a polynomial with coefficients in `[0, t)`.

use crate::context::Context;
use crate::error::{Error, Result};
use fhe_math::Modulus;
use std::ops::{Add, Neg, Sub};
use std::rc::Rc;

/// A plaintext polynomial: `degree` coefficients, each in `[0, t)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Plaintext {
	pub(crate) ctx: Rc<Context>,
	pub(crate) values: Vec<u64>,
}

impl Plaintext {
	/// The all-zero plaintext.
	pub fn zero(ctx: &Rc<Context>) -> Self {
		Self {
			ctx: ctx.clone(),
			values: vec![0u64; ctx.degree()],
		}
	}

	/// Builds a plaintext from raw coefficients, reducing each modulo `t`.
	///
	/// `values.len()` must not exceed the ring degree.
	pub fn from_coefficients(ctx: &Rc<Context>, values: &[u64]) -> Result<Self> {
		if values.len() > ctx.degree() {
			return Err(Error::OutOfRange {
				value: format!("{} coefficients", values.len()),
				degree: ctx.degree(),
			});
		}
		let t = Modulus::new(ctx.plaintext_modulus()).expect("plaintext modulus validated at context creation");
		let mut padded = vec![0u64; ctx.degree()];
		for (dst, &v) in padded.iter_mut().zip(values) {
			*dst = t.reduce(v);
		}
		Ok(Self {
			ctx: ctx.clone(),
			values: padded,
		})
	}

	pub fn context(&self) -> &Rc<Context> {
		&self.ctx
	}

	pub fn values(&self) -> &[u64] {
		&self.values
	}

	fn modulus(&self) -> Modulus {
		Modulus::new(self.ctx.plaintext_modulus()).expect("plaintext modulus validated at context creation")
	}

	/// Negacyclic schoolbook product modulo `t`: `plain(plain,plain)` from
	/// the evaluator's table.
	pub fn mul_mod(&self, rhs: &Plaintext) -> Plaintext {
		debug_assert_eq!(self.ctx, rhs.ctx);
		let m = self.modulus();
		let n = self.values.len();
		let mut out = vec![0u64; n];
		for i in 0..n {
			if self.values[i] == 0 {
				continue;
			}
			for j in 0..n {
				if rhs.values[j] == 0 {
					continue;
				}
				let term = m.mul(self.values[i], rhs.values[j]);
				let k = i + j;
				if k < n {
					out[k] = m.add(out[k], term);
				} else {
					out[k - n] = m.sub(out[k - n], term);
				}
			}
		}
		Plaintext {
			ctx: self.ctx.clone(),
			values: out,
		}
	}
}

impl Add<&Plaintext> for &Plaintext {
	type Output = Plaintext;

	fn add(self, rhs: &Plaintext) -> Plaintext {
		debug_assert_eq!(self.ctx, rhs.ctx);
		let m = self.modulus();
		let mut values = self.values.clone();
		m.add_vec(&mut values, &rhs.values);
		Plaintext { ctx: self.ctx.clone(), values }
	}
}

impl Sub<&Plaintext> for &Plaintext {
	type Output = Plaintext;

	fn sub(self, rhs: &Plaintext) -> Plaintext {
		debug_assert_eq!(self.ctx, rhs.ctx);
		let m = self.modulus();
		let mut values = self.values.clone();
		m.sub_vec(&mut values, &rhs.values);
		Plaintext { ctx: self.ctx.clone(), values }
	}
}

impl Neg for &Plaintext {
	type Output = Plaintext;

	fn neg(self) -> Plaintext {
		let m = self.modulus();
		let mut values = self.values.clone();
		m.neg_vec(&mut values);
		Plaintext { ctx: self.ctx.clone(), values }
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::context::Context;
	use crate::params::EncryptionParamsBuilder;

	fn ctx() -> Rc<Context> {
		Context::new(
			EncryptionParamsBuilder::default()
				.polynomial_degree(8)
				.plaintext_modulus(17)
				.ciphertext_moduli_sizes(vec![30, 30])
				.build()
				.unwrap(),
		)
		.unwrap()
	}

	#[test]
	fn add_then_sub_round_trips() {
		let ctx = ctx();
		let a = Plaintext::from_coefficients(&ctx, &[1, 2, 3, 4, 5, 6, 7, 8]).unwrap();
		let b = Plaintext::from_coefficients(&ctx, &[8, 7, 6, 5, 4, 3, 2, 1]).unwrap();
		let sum = &a + &b;
		let back = &sum - &b;
		assert_eq!(back, a);
	}

	#[test]
	fn mul_matches_hand_computed_example() {
		// poly_mul_mod([1,2,3,4], [2,3,4,5], q=5, N=4) -> [3,1,1,0]
		let ctx = Context::new(
			EncryptionParamsBuilder::default()
				.polynomial_degree(4)
				.plaintext_modulus(5)
				.ciphertext_moduli_sizes(vec![30, 30])
				.build()
				.unwrap(),
		)
		.unwrap();
		let a = Plaintext::from_coefficients(&ctx, &[1, 2, 3, 4]).unwrap();
		let b = Plaintext::from_coefficients(&ctx, &[2, 3, 4, 5]).unwrap();
		assert_eq!(a.mul_mod(&b).values, vec![3, 1, 1, 0]);
	}

	#[test]
	fn add_matches_hand_computed_example() {
		// poly_add_mod([1,2,3,4], [2,3,4,5], q=3, N=4) -> [0,2,1,0]
		let ctx = Context::new(
			EncryptionParamsBuilder::default()
				.polynomial_degree(4)
				.plaintext_modulus(3)
				.ciphertext_moduli_sizes(vec![30, 30])
				.build()
				.unwrap(),
		)
		.unwrap();
		let a = Plaintext::from_coefficients(&ctx, &[1, 2, 3, 4]).unwrap();
		let b = Plaintext::from_coefficients(&ctx, &[2, 3, 4, 5]).unwrap();
		assert_eq!((&a + &b).values, vec![0, 2, 1, 0]);
	}
}
