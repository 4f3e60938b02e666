use thiserror::Error;

/// Represents errors that can occur in the CertMint library.
///
/// Construction errors are returned before any partially built certificate
/// exists; policy outcomes of chain verification are not errors and live in
/// [`crate::verify::VerificationReport`] instead.
#[derive(Debug, Error, Clone)]
pub enum CertMintError {
    /// A required input was missing or malformed at construction time.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// An encoded certificate (or PEM block) could not be parsed.
    #[error("Malformed input: {0}")]
    MalformedInput(String),

    /// Error while producing DER or PEM output.
    #[error("Failed to encode data: {0}")]
    EncodingError(String),

    /// Error during key-pair generation.
    #[error("Key generation error: {0}")]
    KeyGenerationError(String),

    /// Error while producing a signature.
    #[error("Signing error: {0}")]
    SigningError(String),

    /// Error from the underlying blob store.
    #[error("I/O error: {0}")]
    Io(String),
}

impl From<der::Error> for CertMintError {
    fn from(err: der::Error) -> Self {
        CertMintError::MalformedInput(err.to_string())
    }
}

impl From<pem::PemError> for CertMintError {
    fn from(err: pem::PemError) -> Self {
        CertMintError::MalformedInput(err.to_string())
    }
}

impl From<std::io::Error> for CertMintError {
    fn from(err: std::io::Error) -> Self {
        CertMintError::Io(err.to_string())
    }
}
