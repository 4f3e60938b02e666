pub mod extensions;
pub mod params;

use der::{Decode, Encode, EncodePem};
use extensions::ToAndFromX509Extension;
use params::{DistinguishedName, Validity};
use time::OffsetDateTime;
use x509_cert::certificate::CertificateInner;
use x509_cert::name::Name;

use crate::error::CertMintError;
use crate::key::PublicKey;
use crate::pem_utils;

pub type Result<T> = std::result::Result<T, CertMintError>;

/// PEM label for encoded certificates.
pub const CERTIFICATE_PEM_LABEL: &str = "CERTIFICATE";

/// Represents the supported signature algorithms for certificates.
///
/// The algorithm is fixed per deployment: whichever key type signs the
/// root also signs every leaf, so a chain never mixes algorithms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignatureAlgorithm {
    /// SHA-256 digest with RSA PKCS#1 v1.5 signing.
    Sha256WithRsa,
    /// SHA-256 digest with ECDSA P-256 signing.
    Sha256WithEcdsa,
}

impl From<SignatureAlgorithm> for x509_cert::spki::AlgorithmIdentifierOwned {
    fn from(value: SignatureAlgorithm) -> Self {
        match value {
            SignatureAlgorithm::Sha256WithRsa => x509_cert::spki::AlgorithmIdentifierOwned {
                oid: const_oid::db::rfc5912::SHA_256_WITH_RSA_ENCRYPTION,
                parameters: None,
            },
            SignatureAlgorithm::Sha256WithEcdsa => x509_cert::spki::AlgorithmIdentifierOwned {
                oid: const_oid::db::rfc5912::ECDSA_WITH_SHA_256,
                parameters: None,
            },
        }
    }
}

impl TryFrom<&x509_cert::spki::AlgorithmIdentifierOwned> for SignatureAlgorithm {
    type Error = CertMintError;

    fn try_from(value: &x509_cert::spki::AlgorithmIdentifierOwned) -> Result<Self> {
        match value.oid {
            const_oid::db::rfc5912::SHA_256_WITH_RSA_ENCRYPTION => {
                Ok(SignatureAlgorithm::Sha256WithRsa)
            }
            const_oid::db::rfc5912::ECDSA_WITH_SHA_256 => Ok(SignatureAlgorithm::Sha256WithEcdsa),
            oid => Err(CertMintError::MalformedInput(format!(
                "unsupported signature algorithm: {oid}"
            ))),
        }
    }
}

/// A signed X.509 certificate.
///
/// Immutable once produced by [`crate::tbs_certificate::CertificateTemplate::sign`]
/// or decoded from PEM/DER. Structural equality covers every field
/// (subject, issuer, serial, validity, extensions, signature), which is
/// what makes the encode/decode round-trip testable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Certificate {
    /// The inner representation of the certificate.
    pub inner: CertificateInner,
}

impl Certificate {
    /// Encodes the certificate into DER format.
    pub fn to_der(&self) -> Result<Vec<u8>> {
        self.inner
            .to_der()
            .map_err(|e| CertMintError::EncodingError(e.to_string()))
    }

    /// Encodes the certificate into PEM format.
    pub fn to_pem(&self) -> Result<String> {
        self.inner
            .to_pem(pkcs8::LineEnding::LF)
            .map_err(|e| CertMintError::EncodingError(e.to_string()))
    }

    /// Decodes a certificate from DER bytes.
    ///
    /// Fails with [`CertMintError::MalformedInput`] on unparseable data,
    /// including trailing bytes after the certificate.
    pub fn from_der(der: &[u8]) -> Result<Self> {
        let inner = CertificateInner::from_der(der)
            .map_err(|e| CertMintError::MalformedInput(e.to_string()))?;
        Ok(Certificate { inner })
    }

    /// Decodes a certificate from a PEM `CERTIFICATE` block.
    pub fn from_pem(pem_str: &str) -> Result<Self> {
        let der = pem_utils::pem_to_der(pem_str, CERTIFICATE_PEM_LABEL)?;
        Self::from_der(&der)
    }

    /// The subject name, decoded to the attributes this crate understands.
    pub fn subject(&self) -> DistinguishedName {
        DistinguishedName::from_x509_name(&self.inner.tbs_certificate.subject)
    }

    /// The issuer name, decoded to the attributes this crate understands.
    pub fn issuer(&self) -> DistinguishedName {
        DistinguishedName::from_x509_name(&self.inner.tbs_certificate.issuer)
    }

    /// The subject name exactly as encoded in the certificate.
    pub fn subject_name(&self) -> &Name {
        &self.inner.tbs_certificate.subject
    }

    /// The serial number as DER integer bytes.
    pub fn serial_number(&self) -> &[u8] {
        self.inner.tbs_certificate.serial_number.as_bytes()
    }

    /// The validity window, in UTC.
    pub fn validity(&self) -> Validity {
        Validity {
            not_before: x509_time_to_offset(&self.inner.tbs_certificate.validity.not_before),
            not_after: x509_time_to_offset(&self.inner.tbs_certificate.validity.not_after),
        }
    }

    /// The public key certified by this certificate (the subject's key).
    pub fn subject_public_key(&self) -> Result<PublicKey> {
        PublicKey::from_x509_spki(&self.inner.tbs_certificate.subject_public_key_info)
    }

    /// The algorithm the issuer used to sign this certificate.
    pub fn signature_algorithm(&self) -> Result<SignatureAlgorithm> {
        SignatureAlgorithm::try_from(&self.inner.signature_algorithm)
    }

    /// The raw signature bits.
    pub fn signature_bytes(&self) -> Result<&[u8]> {
        self.inner.signature.as_bytes().ok_or_else(|| {
            CertMintError::MalformedInput("signature has unused bits".to_string())
        })
    }

    /// Re-encodes the to-be-signed portion, the exact bytes the issuer's
    /// signature covers.
    pub fn tbs_der(&self) -> Result<Vec<u8>> {
        self.inner
            .tbs_certificate
            .to_der()
            .map_err(|e| CertMintError::EncodingError(e.to_string()))
    }

    /// Looks up a typed extension by its OID; `Ok(None)` when absent.
    pub fn extension<E: ToAndFromX509Extension>(&self) -> Result<Option<E>> {
        let extensions = match &self.inner.tbs_certificate.extensions {
            Some(extensions) => extensions,
            None => return Ok(None),
        };
        for ext in extensions {
            if ext.extn_id == E::OID {
                return E::from_x509_extension_value(ext.extn_value.as_bytes()).map(Some);
            }
        }
        Ok(None)
    }
}

fn x509_time_to_offset(time: &x509_cert::time::Time) -> OffsetDateTime {
    match time {
        x509_cert::time::Time::UtcTime(ut) => OffsetDateTime::from(ut.to_system_time()),
        x509_cert::time::Time::GeneralTime(gt) => OffsetDateTime::from(gt.to_system_time()),
    }
}
