//! [`Poly`]: a degree-`N` polynomial over `Z[x]/(x^N+1)`, represented in RNS
//! form as one residue row per modulus in an [`RnsBase`].

use crate::rns::RnsBase;
use num_bigint::BigUint;
use rand::{Rng, RngCore};
use rand_distr::{Distribution, Normal};
use std::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};
use std::rc::Rc;
use zeroize::Zeroize;

/// A negacyclic polynomial of degree `N`, with coefficients stored modulo
/// each prime of an [`RnsBase`].
///
/// Coefficients are laid out row-major: `coeffs[channel * degree + i]` is
/// coefficient `i` reduced modulo `base.moduli()[channel]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Poly {
	base: Rc<RnsBase>,
	degree: usize,
	coeffs: Vec<u64>,
}

impl Poly {
	/// The zero polynomial over `base`.
	pub fn zero(base: &Rc<RnsBase>, degree: usize) -> Self {
		Self {
			base: base.clone(),
			degree,
			coeffs: vec![0u64; base.len() * degree],
		}
	}

	/// Builds a polynomial from one residue row per modulus.
	///
	/// `rows.len()` must equal `base.len()`, and every row must have
	/// `degree` coefficients.
	pub fn from_rows(base: &Rc<RnsBase>, degree: usize, rows: &[Vec<u64>]) -> Self {
		debug_assert_eq!(rows.len(), base.len());
		let mut coeffs = vec![0u64; base.len() * degree];
		for (channel, row) in rows.iter().enumerate() {
			debug_assert_eq!(row.len(), degree);
			coeffs[channel * degree..(channel + 1) * degree].copy_from_slice(row);
		}
		Self {
			base: base.clone(),
			degree,
			coeffs,
		}
	}

	/// Samples a polynomial whose coefficients are drawn uniformly from
	/// `[0, q_channel)` independently for every channel.
	pub fn sample_uniform(base: &Rc<RnsBase>, degree: usize, rng: &mut impl RngCore) -> Self {
		let mut coeffs = vec![0u64; base.len() * degree];
		for (channel, m) in base.moduli().iter().enumerate() {
			let row = m.random_vec(degree, rng);
			coeffs[channel * degree..(channel + 1) * degree].copy_from_slice(&row);
		}
		Self {
			base: base.clone(),
			degree,
			coeffs,
		}
	}

	/// Samples a ternary polynomial: each coefficient is an independent
	/// uniform draw from `{-1, 0, 1}`, represented in every RNS channel.
	///
	/// Used to generate BFV secret keys.
	pub fn sample_ternary(base: &Rc<RnsBase>, degree: usize, rng: &mut impl RngCore) -> Self {
		let signed: Vec<i8> = (0..degree).map(|_| rng.gen_range(-1i8..=1)).collect();
		Self::from_signed(base, degree, &signed)
	}

	/// Samples a discrete Gaussian polynomial with the given standard
	/// deviation, rounding each real sample to the nearest integer.
	///
	/// Used to generate BFV encryption noise.
	pub fn sample_gaussian(base: &Rc<RnsBase>, degree: usize, std_dev: f64, rng: &mut impl RngCore) -> Self {
		let normal = Normal::new(0.0, std_dev).expect("standard deviation must be finite and positive");
		let signed: Vec<i8> = (0..degree)
			.map(|_| normal.sample(rng).round().clamp(-127.0, 127.0) as i8)
			.collect();
		Self::from_signed(base, degree, &signed)
	}

	fn from_signed(base: &Rc<RnsBase>, degree: usize, signed: &[i8]) -> Self {
		debug_assert_eq!(signed.len(), degree);
		let mut coeffs = vec![0u64; base.len() * degree];
		for (channel, m) in base.moduli().iter().enumerate() {
			let q = m.modulus();
			for (i, &v) in signed.iter().enumerate() {
				coeffs[channel * degree + i] = if v >= 0 { v as u64 } else { q - ((-v) as u64) };
			}
		}
		Self {
			base: base.clone(),
			degree,
			coeffs,
		}
	}

	/// The RNS base this polynomial is represented over.
	pub fn base(&self) -> &Rc<RnsBase> {
		&self.base
	}

	/// The polynomial degree `N`.
	pub fn degree(&self) -> usize {
		self.degree
	}

	/// The residues modulo channel `i`, one per coefficient.
	pub fn channel(&self, i: usize) -> &[u64] {
		&self.coeffs[i * self.degree..(i + 1) * self.degree]
	}

	/// All channels as owned rows, in base order.
	pub fn rows(&self) -> Vec<Vec<u64>> {
		(0..self.base.len()).map(|i| self.channel(i).to_vec()).collect()
	}

	/// CRT-composes every coefficient into its big-integer representative in
	/// `[0, Q)`, where `Q` is the base's product.
	pub fn to_biguint_coeffs(&self) -> Vec<BigUint> {
		(0..self.degree)
			.map(|i| {
				let residues: Vec<u64> = (0..self.base.len()).map(|c| self.coeffs[c * self.degree + i]).collect();
				self.base.compose(&residues)
			})
			.collect()
	}

	/// Builds a polynomial from big-integer coefficients, decomposing each
	/// one into the target base.
	pub fn from_biguint_coeffs(base: &Rc<RnsBase>, values: &[BigUint]) -> Self {
		let degree = values.len();
		let mut coeffs = vec![0u64; base.len() * degree];
		for (i, v) in values.iter().enumerate() {
			for (channel, residue) in base.decompose(v).into_iter().enumerate() {
				coeffs[channel * degree + i] = residue;
			}
		}
		Self {
			base: base.clone(),
			degree,
			coeffs,
		}
	}

	fn binop_channelwise(&self, rhs: &Poly, f: impl Fn(&crate::modulus::Modulus, u64, u64) -> u64) -> Poly {
		debug_assert_eq!(self.base, rhs.base);
		debug_assert_eq!(self.degree, rhs.degree);
		let mut coeffs = vec![0u64; self.coeffs.len()];
		for (channel, m) in self.base.moduli().iter().enumerate() {
			let row = channel * self.degree..(channel + 1) * self.degree;
			for i in row.clone() {
				coeffs[i] = f(m, self.coeffs[i], rhs.coeffs[i]);
			}
		}
		Poly {
			base: self.base.clone(),
			degree: self.degree,
			coeffs,
		}
	}

	/// Negacyclic schoolbook convolution: `(self * rhs) mod (x^N + 1)`,
	/// computed independently in every RNS channel.
	///
	/// O(N^2) per channel. There is no NTT-accelerated path in this engine;
	/// see the module-level notes on why that tradeoff was made.
	pub fn mul_mod(&self, rhs: &Poly) -> Poly {
		debug_assert_eq!(self.base, rhs.base);
		debug_assert_eq!(self.degree, rhs.degree);
		let n = self.degree;
		let mut coeffs = vec![0u64; self.coeffs.len()];
		for (channel, m) in self.base.moduli().iter().enumerate() {
			let a = self.channel(channel);
			let b = rhs.channel(channel);
			let out = &mut coeffs[channel * n..(channel + 1) * n];
			for i in 0..n {
				if a[i] == 0 {
					continue;
				}
				for j in 0..n {
					if b[j] == 0 {
						continue;
					}
					let term = m.mul(a[i], b[j]);
					let k = i + j;
					if k < n {
						out[k] = m.add(out[k], term);
					} else {
						out[k - n] = m.sub(out[k - n], term);
					}
				}
			}
		}
		Poly {
			base: self.base.clone(),
			degree: n,
			coeffs,
		}
	}

	/// Multiplies every coefficient, in every channel, by the same scalar
	/// (reduced modulo that channel's prime first).
	pub fn scalar_mul(&self, scalar: u64) -> Poly {
		let mut coeffs = self.coeffs.clone();
		for (channel, m) in self.base.moduli().iter().enumerate() {
			let s = m.reduce(scalar);
			m.scalar_mul_vec(&mut coeffs[channel * self.degree..(channel + 1) * self.degree], s);
		}
		Poly {
			base: self.base.clone(),
			degree: self.degree,
			coeffs,
		}
	}

	/// Multiplies by a scalar that differs per RNS channel: `scalars[i]` is
	/// applied to every coefficient of channel `i`.
	///
	/// Used to apply a CRT basis constant (a Garner coefficient) across a key
	/// during relinearization-key generation.
	pub fn scalar_mul_per_channel(&self, scalars: &[u64]) -> Poly {
		debug_assert_eq!(scalars.len(), self.base.len());
		let mut coeffs = self.coeffs.clone();
		for (channel, m) in self.base.moduli().iter().enumerate() {
			let s = m.reduce(scalars[channel]);
			m.scalar_mul_vec(&mut coeffs[channel * self.degree..(channel + 1) * self.degree], s);
		}
		Poly {
			base: self.base.clone(),
			degree: self.degree,
			coeffs,
		}
	}

	/// Builds a polynomial holding the same constant residue in every
	/// coefficient position of each channel: `residues[i]` for channel `i`.
	pub fn constant(base: &Rc<RnsBase>, degree: usize, residues: &[u64]) -> Self {
		debug_assert_eq!(residues.len(), base.len());
		let rows: Vec<Vec<u64>> = residues.iter().map(|&r| vec![r; degree]).collect();
		Self::from_rows(base, degree, &rows)
	}
}

impl Add<&Poly> for &Poly {
	type Output = Poly;

	fn add(self, rhs: &Poly) -> Poly {
		self.binop_channelwise(rhs, |m, a, b| m.add(a, b))
	}
}

impl AddAssign<&Poly> for Poly {
	fn add_assign(&mut self, rhs: &Poly) {
		*self = &*self + rhs;
	}
}

impl Sub<&Poly> for &Poly {
	type Output = Poly;

	fn sub(self, rhs: &Poly) -> Poly {
		self.binop_channelwise(rhs, |m, a, b| m.sub(a, b))
	}
}

impl SubAssign<&Poly> for Poly {
	fn sub_assign(&mut self, rhs: &Poly) {
		*self = &*self - rhs;
	}
}

impl Neg for &Poly {
	type Output = Poly;

	fn neg(self) -> Poly {
		let mut coeffs = self.coeffs.clone();
		for (channel, m) in self.base.moduli().iter().enumerate() {
			m.neg_vec(&mut coeffs[channel * self.degree..(channel + 1) * self.degree]);
		}
		Poly {
			base: self.base.clone(),
			degree: self.degree,
			coeffs,
		}
	}
}

impl Mul<&Poly> for &Poly {
	type Output = Poly;

	fn mul(self, rhs: &Poly) -> Poly {
		self.mul_mod(rhs)
	}
}

impl Zeroize for Poly {
	fn zeroize(&mut self) {
		self.coeffs.zeroize();
	}
}
