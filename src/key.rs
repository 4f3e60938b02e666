use const_oid::ObjectIdentifier;
use ecdsa::signature::{Signer, Verifier};
use p256::ecdsa::{SigningKey as P256SigningKey, VerifyingKey as P256VerifyingKey};
use rsa::pkcs1v15::{
    Signature as RsaSignature, SigningKey as RsaSigningKey, VerifyingKey as RsaVerifyingKey,
};
use rsa::signature::SignatureEncoding;
use rsa::{RsaPrivateKey, RsaPublicKey};
use sha2::Sha256;
use x509_cert::spki::SubjectPublicKeyInfoOwned;

use crate::cert::SignatureAlgorithm;
use crate::error::CertMintError;

pub type Result<T> = std::result::Result<T, CertMintError>;

const OID_RSA_ENCRYPTION: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.2.840.113549.1.1.1");
const OID_EC_PUBLIC_KEY: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.2.840.10045.2.1");

/// A private/public key pair usable for issuing and signing certificates.
///
/// The pair is an opaque handle: callers borrow it for the duration of a
/// sign call and never hand the private half to the certificate types.
pub enum KeyPair {
    Rsa {
        private: Box<RsaPrivateKey>,
        public: RsaPublicKey,
    },
    EcdsaP256 {
        signing_key: P256SigningKey,
        verifying_key: P256VerifyingKey,
    },
}

impl KeyPair {
    /// Generate an RSA key pair with the specified number of bits.
    pub fn generate_rsa(bits: usize) -> Result<Self> {
        let mut rng = rand_core::OsRng;
        let private = RsaPrivateKey::new(&mut rng, bits)
            .map_err(|e| CertMintError::KeyGenerationError(e.to_string()))?;
        let public = RsaPublicKey::from(&private);
        Ok(KeyPair::Rsa {
            private: Box::new(private),
            public,
        })
    }

    /// Generate an ECDSA P-256 key pair.
    pub fn generate_ecdsa_p256() -> Self {
        let mut rng = rand_core::OsRng;
        let signing_key = P256SigningKey::random(&mut rng);
        let verifying_key = signing_key.verifying_key().to_owned();
        KeyPair::EcdsaP256 {
            signing_key,
            verifying_key,
        }
    }

    /// Returns the public half of the pair.
    pub fn public_key(&self) -> PublicKey {
        PublicKey::from_key_pair(self)
    }

    /// The signature algorithm this key produces. Fixed per key type so
    /// root and leaf certificates issued from the same deployment stay
    /// consistent.
    pub fn signature_algorithm(&self) -> SignatureAlgorithm {
        match self {
            KeyPair::Rsa { .. } => SignatureAlgorithm::Sha256WithRsa,
            KeyPair::EcdsaP256 { .. } => SignatureAlgorithm::Sha256WithEcdsa,
        }
    }

    /// Signs `data` with the private half of the pair.
    ///
    /// RSA uses PKCS#1 v1.5 with SHA-256; ECDSA signatures are DER-encoded
    /// as X.509 requires.
    pub fn sign_data(&self, data: &[u8]) -> Result<Vec<u8>> {
        match self {
            KeyPair::Rsa { private, .. } => {
                let signing_key: RsaSigningKey<Sha256> =
                    RsaSigningKey::new(private.as_ref().clone());
                let signature = signing_key
                    .try_sign(data)
                    .map_err(|e| CertMintError::SigningError(e.to_string()))?;
                Ok(signature.to_vec())
            }
            KeyPair::EcdsaP256 { signing_key, .. } => {
                let signature: p256::ecdsa::Signature = signing_key.sign(data);
                Ok(signature.to_der().as_bytes().to_vec())
            }
        }
    }
}

/// The public half of a key pair, as embedded in certificates.
#[derive(Debug, Clone)]
pub enum PublicKey {
    Rsa(RsaPublicKey),
    EcdsaP256(P256VerifyingKey),
}

impl PublicKey {
    /// Extracts the public key from a [`KeyPair`].
    pub fn from_key_pair(key_pair: &KeyPair) -> Self {
        match key_pair {
            KeyPair::Rsa { public, .. } => PublicKey::Rsa(public.clone()),
            KeyPair::EcdsaP256 { verifying_key, .. } => PublicKey::EcdsaP256(*verifying_key),
        }
    }

    /// Encodes the key as an X.509 SubjectPublicKeyInfo structure.
    pub fn to_spki(&self) -> Result<SubjectPublicKeyInfoOwned> {
        match self {
            PublicKey::Rsa(public) => SubjectPublicKeyInfoOwned::from_key(public.clone())
                .map_err(|e| CertMintError::EncodingError(e.to_string())),
            PublicKey::EcdsaP256(verifying_key) => {
                SubjectPublicKeyInfoOwned::from_key(*verifying_key)
                    .map_err(|e| CertMintError::EncodingError(e.to_string()))
            }
        }
    }

    /// Decodes a key from an X.509 SubjectPublicKeyInfo structure.
    pub fn from_x509_spki(spki: &SubjectPublicKeyInfoOwned) -> Result<Self> {
        let key_bytes = spki.subject_public_key.as_bytes().ok_or_else(|| {
            CertMintError::MalformedInput("subject public key has unused bits".to_string())
        })?;
        match spki.algorithm.oid {
            OID_RSA_ENCRYPTION => {
                use rsa::pkcs1::DecodeRsaPublicKey;
                let public = RsaPublicKey::from_pkcs1_der(key_bytes)
                    .map_err(|e| CertMintError::MalformedInput(e.to_string()))?;
                Ok(PublicKey::Rsa(public))
            }
            OID_EC_PUBLIC_KEY => {
                let verifying_key = P256VerifyingKey::from_sec1_bytes(key_bytes)
                    .map_err(|e| CertMintError::MalformedInput(e.to_string()))?;
                Ok(PublicKey::EcdsaP256(verifying_key))
            }
            oid => Err(CertMintError::MalformedInput(format!(
                "unsupported public key algorithm: {oid}"
            ))),
        }
    }

    /// Checks `signature` over `message` under the given algorithm.
    ///
    /// Returns `false` for an invalid signature, a malformed signature
    /// encoding, or an algorithm that does not match the key type.
    pub fn verify_signature(
        &self,
        algorithm: SignatureAlgorithm,
        message: &[u8],
        signature: &[u8],
    ) -> bool {
        match (self, algorithm) {
            (PublicKey::Rsa(public), SignatureAlgorithm::Sha256WithRsa) => {
                let Ok(signature) = RsaSignature::try_from(signature) else {
                    return false;
                };
                let verifying_key: RsaVerifyingKey<Sha256> = RsaVerifyingKey::new(public.clone());
                verifying_key.verify(message, &signature).is_ok()
            }
            (PublicKey::EcdsaP256(verifying_key), SignatureAlgorithm::Sha256WithEcdsa) => {
                let Ok(signature) = p256::ecdsa::Signature::from_der(signature) else {
                    return false;
                };
                verifying_key.verify(message, &signature).is_ok()
            }
            _ => false,
        }
    }
}
