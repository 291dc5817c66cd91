//! Encryption/decryption traits implemented by the key types, letting
//! `Encryptor`-shaped code accept either a [`crate::secret_key::SecretKey`]
//! or a [`crate::public_key::PublicKey`] uniformly.

use crate::ciphertext::Ciphertext;
use crate::error::Result;
use crate::plaintext::Plaintext;
use rand::RngCore;

/// Implemented by both key types: encrypts a [`Plaintext`] into a fresh,
/// size-2 [`Ciphertext`].
pub trait Encryptor {
	fn encrypt<R: RngCore>(&self, pt: &Plaintext, rng: &mut R) -> Result<Ciphertext>;
}

/// Implemented by [`crate::secret_key::SecretKey`]: recovers the plaintext
/// encrypted under a ciphertext.
pub trait Decryptor {
	fn decrypt(&self, ct: &Ciphertext) -> Result<Plaintext>;
}
