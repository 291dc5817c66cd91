//! Error type for the scheme-level BFV API.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
	#[error("invalid encryption parameters: {0}")]
	InvalidParams(String),

	#[error(transparent)]
	Math(#[from] fhe_math::Error),

	#[error("operands belong to different contexts")]
	MismatchedContext,

	#[error("wrong ciphertext size {actual} for this operation ({expected})")]
	WrongCiphertextSize { actual: usize, expected: String },

	#[error("relinearization is not supported for ciphertexts of size {0} (> 3)")]
	UnsupportedSize(usize),

	#[error("value {value} is out of the representable range for degree {degree}")]
	OutOfRange { value: String, degree: usize },
}

pub type Result<T> = std::result::Result<T, Error>;
