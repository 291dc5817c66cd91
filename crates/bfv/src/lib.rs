//! A BFV homomorphic encryption engine: schoolbook (non-NTT) negacyclic
//! polynomial arithmetic over an RNS ciphertext modulus, with BEHZ-style
//! exact multiplication and key-switched relinearization.
//!
//! Built on top of [`fhe_math`], which provides the number-theoretic and RNS
//! primitives; this crate is where those primitives become a scheme.

pub mod ciphertext;
pub mod coeff_modulus;
pub mod context;
pub mod encoder;
pub mod error;
pub mod evaluator;
pub mod key_generator;
pub mod params;
pub mod plaintext;
pub mod public_key;
pub mod relin_keys;
pub mod secret_key;
pub mod traits;

pub use ciphertext::Ciphertext;
pub use coeff_modulus::{CoeffModulus, SecurityLevel};
pub use context::Context;
pub use encoder::IntegerEncoder;
pub use error::{Error, Result};
pub use evaluator::Evaluator;
pub use key_generator::KeyGenerator;
pub use params::{EncryptionParams, EncryptionParamsBuilder};
pub use plaintext::Plaintext;
pub use public_key::PublicKey;
pub use relin_keys::RelinKeys;
pub use secret_key::SecretKey;
pub use traits::{Decryptor, Encryptor};
