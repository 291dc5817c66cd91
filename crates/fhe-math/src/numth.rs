//! Number-theoretic primitives: primality testing, modular inverses, prime
//! search with congruence constraints.

use crate::error::{Error, Result};
use rand::{thread_rng, Rng};

/// Number of independent Miller-Rabin witnesses used by [`is_prime`].
///
/// The spec asks for at least 16; each witness cuts the false-positive
/// probability by at least 4x, so 16 rounds give a soundness error below
/// 4^-16, comfortably enough for prime generation (not for adversarial
/// inputs, which is why this is a probabilistic test and not a certificate).
const MILLER_RABIN_ROUNDS: u32 = 16;

/// Returns `true` if `n` is probably prime.
///
/// Small primes and even numbers are handled by trial division; everything
/// else goes through `MILLER_RABIN_ROUNDS` rounds of Miller-Rabin with
/// uniformly random bases in `[2, n-2]`.
pub fn is_prime(n: u64) -> bool {
	if n < 2 {
		return false;
	}
	for p in [2u64, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37] {
		if n == p {
			return true;
		}
		if n % p == 0 {
			return false;
		}
	}

	let mut d = n - 1;
	let mut r = 0u32;
	while d % 2 == 0 {
		d /= 2;
		r += 1;
	}

	let mut rng = thread_rng();
	'witness: for _ in 0..MILLER_RABIN_ROUNDS {
		let a = rng.gen_range(2..=n - 2);
		let mut x = pow_mod(a, d, n);
		if x == 1 || x == n - 1 {
			continue;
		}
		for _ in 0..r - 1 {
			x = mul_mod(x, x, n);
			if x == n - 1 {
				continue 'witness;
			}
		}
		return false;
	}
	true
}

/// `(a * b) mod m`, computed with a 128-bit intermediate to avoid overflow.
pub fn mul_mod(a: u64, b: u64, m: u64) -> u64 {
	((a as u128 * b as u128) % m as u128) as u64
}

/// `base^exp mod m` by square-and-multiply.
pub fn pow_mod(base: u64, mut exp: u64, m: u64) -> u64 {
	if m == 1 {
		return 0;
	}
	let mut result = 1u64;
	let mut base = base % m;
	while exp > 0 {
		if exp & 1 == 1 {
			result = mul_mod(result, base, m);
		}
		exp >>= 1;
		base = mul_mod(base, base, m);
	}
	result
}

/// Extended Euclidean algorithm: returns `(g, a, b)` such that
/// `a * x + b * y = g = gcd(x, y)`.
///
/// `x` and `y` are taken as signed so the recursion stays exact; callers in
/// this crate only ever pass non-negative values.
pub fn xgcd(x: i128, y: i128) -> (i128, i128, i128) {
	if x == 0 {
		return (y, 0, 1);
	}
	let (g, a1, b1) = xgcd(y % x, x);
	(g, b1 - (y / x) * a1, a1)
}

/// Modular inverse of `a` modulo `m`, via `xgcd`.
///
/// Fails with [`Error::NotInvertible`] when `gcd(a, m) != 1`.
pub fn invert_mod(a: u64, m: u64) -> Result<u64> {
	let (g, inv, _) = xgcd(a as i128, m as i128);
	if g != 1 {
		return Err(Error::NotInvertible(a, m));
	}
	let m = m as i128;
	Ok((((inv % m) + m) % m) as u64)
}

/// Reverses the low `width` bits of `v`.
///
/// Used to enumerate polynomial coefficients / NTT butterflies in
/// bit-reversed order even when no NTT operator is available for the given
/// modulus.
pub fn reverse_bit(v: u64, width: u32) -> u64 {
	if width == 0 {
		return 0;
	}
	v.reverse_bits() >> (u64::BITS - width)
}

/// Searches downward from `2^bit_size - 1` for `count` distinct primes
/// congruent to `1 mod (2 * degree)`.
///
/// Mirrors the convention used to build NTT-friendly coefficient moduli:
/// a modulus congruent to 1 mod 2N admits the roots of unity a negacyclic
/// NTT of size N needs, even when this engine falls back to schoolbook
/// polynomial multiplication.
pub fn get_primes(degree: usize, bit_size: usize, count: usize) -> Result<Vec<u64>> {
	if bit_size == 0 || bit_size > 63 {
		return Err(Error::InvalidModulus(bit_size as u64));
	}
	let factor = 2 * degree as u64;
	let mut candidate: u64 = (1u64 << bit_size) - 1;
	// Largest candidate congruent to 1 mod factor that is <= candidate.
	candidate -= (candidate - 1) % factor;

	let mut found = Vec::with_capacity(count);
	let lower_bound = 1u64 << (bit_size - 1);
	while found.len() < count && candidate >= lower_bound {
		if is_prime(candidate) {
			found.push(candidate);
		}
		if candidate < factor {
			break;
		}
		candidate -= factor;
	}

	if found.len() < count {
		return Err(Error::NotEnoughPrimes {
			bit_size,
			count,
			modulus: factor,
		});
	}
	Ok(found)
}

/// Product of `values[..count]` except the element at `exclude_idx`.
pub fn multiply_many_except(values: &[u64], count: usize, exclude_idx: usize) -> u128 {
	values[..count]
		.iter()
		.enumerate()
		.filter(|(i, _)| *i != exclude_idx)
		.fold(1u128, |acc, (_, v)| acc * (*v as u128))
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn primality() {
		let cases = [
			(0u64, false),
			(2, true),
			(3, true),
			(4, false),
			(5, true),
			(221, false),
			(65537, true),
			(65536, false),
			(59399, true),
			(72307, true),
			(36893488147419103, true),
			(36893488147419107, false),
			(72307 * 59399, false),
		];
		for (n, expected) in cases {
			assert_eq!(is_prime(n), expected, "is_prime({n})");
		}
	}

	#[test]
	fn reverse_bits_low_width() {
		assert_eq!(reverse_bit(0, 8), 0);
		assert_eq!(reverse_bit(2, 2), 1);
		assert_eq!(reverse_bit(3, 2), 3);
		assert_eq!(reverse_bit(4, 3), 1);
		assert_eq!(reverse_bit(255, 8), 255);
		assert_eq!(reverse_bit(256, 9), 1);
		assert_eq!(reverse_bit(172, 8), 53);
	}

	#[test]
	fn xgcd_bezout_identity() {
		for (x, y) in [(7i128, 7i128), (13, 19), (21, 14), (6, 5)] {
			let (g, a, b) = xgcd(x, y);
			assert_eq!(a * x + b * y, g);
		}
	}

	#[test]
	fn invert_mod_matches_xgcd() {
		assert_eq!(invert_mod(5, 19).unwrap(), 4);
		assert_eq!(invert_mod(4, 19).unwrap(), 5);
		assert_eq!(invert_mod(3, 2).unwrap(), 1);
		assert!(invert_mod(2, 4).is_err());
	}

	#[test]
	fn get_primes_are_congruent_and_distinct() {
		let primes = get_primes(16, 30, 4).unwrap();
		assert_eq!(primes.len(), 4);
		let unique: std::collections::HashSet<_> = primes.iter().collect();
		assert_eq!(unique.len(), primes.len());
		for p in &primes {
			assert!(is_prime(*p));
			assert_eq!(p % 32, 1);
			assert!(p.leading_zeros() == 64 - 30);
		}
	}

	#[test]
	fn multiply_many_except_matches_spec_table() {
		assert_eq!(multiply_many_except(&[0, 0, 0], 2, 0), 0);
		assert_eq!(multiply_many_except(&[0, 0, 0], 3, 0), 0);
		assert_eq!(multiply_many_except(&[2, 3, 5], 2, 0), 3);
		assert_eq!(multiply_many_except(&[2, 3, 5], 2, 1), 2);
		assert_eq!(multiply_many_except(&[2, 3, 5], 3, 0), 15);
		assert_eq!(multiply_many_except(&[2, 3, 5], 3, 1), 10);
		assert_eq!(multiply_many_except(&[2, 3, 5], 3, 2), 6);
	}
}
