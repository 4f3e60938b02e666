use der::Encode;
use der::asn1::{BitString, OctetString};
use rand_core::{OsRng, RngCore};
use time::OffsetDateTime;
use x509_cert::Version;
use x509_cert::certificate::{CertificateInner, TbsCertificateInner};
use x509_cert::name::Name;
use x509_cert::serial_number::SerialNumber;

use crate::cert::params::{ExtensionParam, Validity};
use crate::cert::{Certificate, SignatureAlgorithm};
use crate::error::CertMintError;
use crate::key::{KeyPair, PublicKey};

/// Byte length of generated serial numbers. Matches common CA tooling
/// (160-bit serials) and keeps collisions negligible without coordination.
const SERIAL_LEN: usize = 20;

/// The unsigned shape of a certificate, prior to signing.
///
/// Holds everything the signature will cover: serial, names, validity,
/// the subject's public key and the extension set. The issuer name is
/// stored exactly as it will be encoded; for leaf certificates it is
/// cloned out of the CA certificate rather than rebuilt, so the issuer
/// field always matches the signer's own subject byte for byte.
///
/// Templates are built once, signed once and discarded; only the signing
/// step touches private key material.
pub struct CertificateTemplate {
    /// Certificate serial number, DER integer bytes.
    pub serial_number: Vec<u8>,
    /// Algorithm the signature will be produced with.
    pub signature_algorithm: SignatureAlgorithm,
    /// Certificate issuer name.
    pub issuer: Name,
    /// Validity window, UTC, whole seconds.
    pub validity: Validity,
    /// Certificate subject name.
    pub subject: Name,
    /// The subject's public key, never the signer's.
    pub subject_public_key: PublicKey,
    /// Certificate extensions, in encoding order.
    pub extensions: Vec<ExtensionParam>,
}

impl CertificateTemplate {
    /// Draws a fresh serial number from the OS random source.
    ///
    /// The top bit is cleared and the leading byte forced non-zero so the
    /// value encodes as a positive, canonical DER integer.
    pub fn random_serial_number() -> Vec<u8> {
        let mut serial = vec![0u8; SERIAL_LEN];
        OsRng.fill_bytes(&mut serial);
        serial[0] &= 0x7f;
        if serial[0] == 0 {
            serial[0] = 1;
        }
        serial
    }

    /// Converts the template into the DER-facing TBS structure.
    pub fn to_tbs_certificate_inner(&self) -> Result<TbsCertificateInner, CertMintError> {
        let algorithm_id: x509_cert::spki::AlgorithmIdentifierOwned =
            self.signature_algorithm.into();

        let extensions = self
            .extensions
            .iter()
            .map(|ext| {
                Ok(x509_cert::ext::Extension {
                    extn_id: ext.oid,
                    critical: ext.critical,
                    extn_value: OctetString::new(ext.value.clone())
                        .map_err(|e| CertMintError::EncodingError(e.to_string()))?,
                })
            })
            .collect::<Result<Vec<_>, CertMintError>>()?;

        let validity = x509_cert::time::Validity {
            not_before: to_x509_time(self.validity.not_before)?,
            not_after: to_x509_time(self.validity.not_after)?,
        };

        let serial_number = SerialNumber::new(self.serial_number.as_slice())
            .map_err(|e| CertMintError::EncodingError(e.to_string()))?;

        Ok(TbsCertificateInner {
            version: Version::V3,
            serial_number,
            signature: algorithm_id,
            issuer: self.issuer.clone(),
            validity,
            subject: self.subject.clone(),
            subject_public_key_info: self.subject_public_key.to_spki()?,
            issuer_unique_id: None,
            subject_unique_id: None,
            extensions: Some(extensions),
        })
    }

    /// Signs the template with the borrowed key and assembles the final
    /// certificate.
    ///
    /// The key is used only for the duration of this call and is never
    /// stored; the produced certificate embeds the template's subject
    /// public key, not the signer's.
    pub fn sign(&self, signing_key: &KeyPair) -> Result<Certificate, CertMintError> {
        let tbs_inner = self.to_tbs_certificate_inner()?;
        let tbs_der = tbs_inner
            .to_der()
            .map_err(|e| CertMintError::EncodingError(e.to_string()))?;

        let signature = signing_key.sign_data(&tbs_der)?;

        let cert_inner = CertificateInner {
            tbs_certificate: tbs_inner,
            signature_algorithm: self.signature_algorithm.into(),
            signature: BitString::from_bytes(&signature)
                .map_err(|e| CertMintError::EncodingError(e.to_string()))?,
        };

        Ok(Certificate { inner: cert_inner })
    }
}

/// UTCTime only reaches 2049; later dates need GeneralizedTime (RFC 5280
/// 4.1.2.5).
fn to_x509_time(ts: OffsetDateTime) -> Result<x509_cert::time::Time, CertMintError> {
    let time = if ts.year() < 2050 {
        x509_cert::time::Time::UtcTime(
            der::asn1::UtcTime::from_system_time(ts.into())
                .map_err(|e| CertMintError::EncodingError(e.to_string()))?,
        )
    } else {
        x509_cert::time::Time::GeneralTime(
            der::asn1::GeneralizedTime::from_system_time(ts.into())
                .map_err(|e| CertMintError::EncodingError(e.to_string()))?,
        )
    };
    Ok(time)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serial_numbers_are_positive_and_unpredictable() {
        let a = CertificateTemplate::random_serial_number();
        let b = CertificateTemplate::random_serial_number();
        assert_eq!(a.len(), SERIAL_LEN);
        assert!(a[0] & 0x80 == 0);
        assert!(a[0] != 0);
        assert_ne!(a, b);
    }
}
