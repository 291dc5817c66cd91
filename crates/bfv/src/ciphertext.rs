//! [`Ciphertext`]: an ordered sequence of RNS polynomials encrypting a
//! [`Plaintext`] under a BFV secret or public key.

use crate::context::Context;
use crate::error::{Error, Result};
use fhe_math::Poly;
use itertools::{izip, Itertools};
use std::ops::{Add, AddAssign, Neg, Sub, SubAssign};
use std::rc::Rc;

/// A BFV ciphertext: `[c_0, c_1, ..., c_{s-1}]`, each a polynomial in RNS
/// form under the context's base `q`.
///
/// A fresh encryption has size 2. Multiplying two ciphertexts of sizes
/// `s_a, s_b` produces one of size `s_a + s_b - 1`; relinearization brings a
/// size-3 ciphertext back down to 2.
#[derive(Debug, Clone, PartialEq)]
pub struct Ciphertext {
	pub(crate) ctx: Rc<Context>,
	pub(crate) c: Vec<Poly>,
}

impl Ciphertext {
	pub(crate) fn new(ctx: &Rc<Context>, c: Vec<Poly>) -> Self {
		debug_assert!(c.len() >= 2);
		Self { ctx: ctx.clone(), c }
	}

	pub fn context(&self) -> &Rc<Context> {
		&self.ctx
	}

	/// Number of polynomial components.
	pub fn size(&self) -> usize {
		self.c.len()
	}

	pub fn components(&self) -> &[Poly] {
		&self.c
	}

	fn check_context(&self, other: &Ciphertext) -> Result<()> {
		if self.ctx != other.ctx {
			return Err(Error::MismatchedContext);
		}
		Ok(())
	}
}

impl Add<&Ciphertext> for &Ciphertext {
	type Output = Result<Ciphertext>;

	fn add(self, rhs: &Ciphertext) -> Result<Ciphertext> {
		self.check_context(rhs)?;
		let (longer, shorter) = if self.c.len() >= rhs.c.len() { (self, rhs) } else { (rhs, self) };
		let mut c = longer.c.clone();
		izip!(c.iter_mut(), &shorter.c).for_each(|(a, b)| *a += b);
		Ok(Ciphertext::new(&self.ctx, c))
	}
}

impl Sub<&Ciphertext> for &Ciphertext {
	type Output = Result<Ciphertext>;

	fn sub(self, rhs: &Ciphertext) -> Result<Ciphertext> {
		self.check_context(rhs)?;
		let size = self.c.len().max(rhs.c.len());
		let mut c = Vec::with_capacity(size);
		for i in 0..size {
			c.push(match (self.c.get(i), rhs.c.get(i)) {
				(Some(a), Some(b)) => a - b,
				(Some(a), None) => a.clone(),
				(None, Some(b)) => -b,
				(None, None) => unreachable!(),
			});
		}
		Ok(Ciphertext::new(&self.ctx, c))
	}
}

impl Neg for &Ciphertext {
	type Output = Ciphertext;

	fn neg(self) -> Ciphertext {
		let c = self.c.iter().map(|ci| -ci).collect_vec();
		Ciphertext::new(&self.ctx, c)
	}
}

impl AddAssign<&Ciphertext> for Ciphertext {
	fn add_assign(&mut self, rhs: &Ciphertext) {
		*self = (&*self + rhs).expect("mismatched contexts in += ");
	}
}

impl SubAssign<&Ciphertext> for Ciphertext {
	fn sub_assign(&mut self, rhs: &Ciphertext) {
		*self = (&*self - rhs).expect("mismatched contexts in -= ");
	}
}
