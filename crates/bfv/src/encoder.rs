//! [`IntegerEncoder`]: balanced base-2 encoding of signed integers into
//! [`Plaintext`] polynomials.

use crate::context::Context;
use crate::error::{Error, Result};
use crate::plaintext::Plaintext;
use std::rc::Rc;

/// Encodes/decodes signed integers as plaintext polynomials using balanced
/// base-2 encoding: for `x >= 0`, coefficient `j` holds bit `j` of `x`
/// (`0` or `1`). For `x < 0`, coefficient `j` holds `0` where bit `j` of
/// `|x|` is `0`, and `t - 1` (i.e. `-1 mod t`) where it is `1`. Decoding
/// evaluates the polynomial at `x = 2` over signed integers, treating any
/// coefficient `> t/2` as negative.
///
/// `t = 2` cannot distinguish a `+1` digit from a `-1` digit (both are
/// stored as `1`), so round-tripping negative values needs `t >= 3`.
pub struct IntegerEncoder {
	ctx: Rc<Context>,
}

impl IntegerEncoder {
	pub fn new(ctx: &Rc<Context>) -> Self {
		Self { ctx: ctx.clone() }
	}

	pub fn context(&self) -> &Rc<Context> {
		&self.ctx
	}

	/// Encodes `value` as a plaintext, failing if `|value| > 2^degree - 1`.
	pub fn encode(&self, value: i128) -> Result<Plaintext> {
		let degree = self.ctx.degree();
		let t = self.ctx.plaintext_modulus();
		let negative = value < 0;
		let magnitude = value.unsigned_abs();

		if degree < 128 && magnitude > (1u128 << degree) - 1 {
			return Err(Error::OutOfRange {
				value: value.to_string(),
				degree,
			});
		}

		let mut coeffs = vec![0u64; degree];
		for (j, coeff) in coeffs.iter_mut().enumerate() {
			let bit = if j < 128 { (magnitude >> j) & 1 } else { 0 };
			*coeff = match (negative, bit) {
				(false, b) => b as u64,
				(true, 0) => 0,
				(true, _) => t - 1,
			};
		}
		Plaintext::from_coefficients(&self.ctx, &coeffs)
	}

	/// Decodes a plaintext back into a signed integer by evaluating it at
	/// `x = 2`, treating each coefficient `c > t/2` as the negative digit
	/// `c - t`.
	pub fn decode(&self, pt: &Plaintext) -> i128 {
		let t = self.ctx.plaintext_modulus() as i128;
		let half = t / 2;
		let mut value: i128 = 0;
		for &coeff in pt.values().iter().rev() {
			let mut digit = coeff as i128;
			if digit > half {
				digit -= t;
			}
			value = value * 2 + digit;
		}
		value
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::params::EncryptionParamsBuilder;

	fn ctx(degree: usize, t: u64) -> Rc<Context> {
		Context::new(
			EncryptionParamsBuilder::default()
				.polynomial_degree(degree)
				.plaintext_modulus(t)
				.ciphertext_moduli_sizes(vec![40, 40])
				.build()
				.unwrap(),
		)
		.unwrap()
	}

	#[test]
	fn encode_then_decode_round_trips_positive_and_negative() {
		// t = 2 has no room to distinguish a +1 digit from a -1 digit, so
		// round-tripping negative values needs t >= 3.
		let ctx = ctx(1024, 1024);
		let enc = IntegerEncoder::new(&ctx);
		for value in [0i128, 1, -1, 42, -42, 1_000_000, -1_000_000] {
			let pt = enc.encode(value).unwrap();
			assert_eq!(enc.decode(&pt), value);
		}
	}

	#[test]
	fn encode_produces_plain_binary_digits_for_non_negative_values() {
		let ctx = ctx(8, 64);
		let enc = IntegerEncoder::new(&ctx);
		let pt = enc.encode(0b0110_1).unwrap();
		assert_eq!(pt.values(), &[1, 0, 1, 1, 0, 0, 0, 0]);
	}

	#[test]
	fn encode_stores_t_minus_one_at_each_set_bit_for_negative_values() {
		let ctx = ctx(8, 64);
		let enc = IntegerEncoder::new(&ctx);
		let pt = enc.encode(-0b0110_1).unwrap();
		assert_eq!(pt.values(), &[63, 0, 63, 63, 0, 0, 0, 0]);
	}

	#[test]
	fn round_trips_a_large_value() {
		let ctx = ctx(1024, 1024);
		let enc = IntegerEncoder::new(&ctx);
		let value = 0x12345678i128;
		let pt = enc.encode(value).unwrap();
		assert_eq!(enc.decode(&pt), value);
	}

	#[test]
	fn rejects_values_too_large_for_the_degree() {
		let ctx = ctx(8, 2);
		let enc = IntegerEncoder::new(&ctx);
		assert!(enc.encode(i128::MAX).is_err());
		assert!(enc.encode(255).is_ok());
		assert!(enc.encode(256).is_err());
	}
}
