use std::net::IpAddr;

use bon::Builder;
use x509_cert::name::Name;

use crate::cert::extensions::{
    BasicConstraints, ExtendedKeyUsage, ExtendedKeyUsageOption, KeyUsage, KeyUsages, SanEntry,
    SubjectAltName,
};
use crate::cert::params::{DistinguishedName, ExtensionParam, Validity};
use crate::cert::{Certificate, SignatureAlgorithm};
use crate::error::CertMintError;
use crate::key::{KeyPair, PublicKey};
use crate::tbs_certificate::CertificateTemplate;

pub type Result<T> = std::result::Result<T, CertMintError>;

/// The extension policy a certificate is issued under.
///
/// A profile says what the certificate should contain; it carries no key
/// material, so template construction stays testable without cryptography.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CertificateProfile {
    /// A self-signed root: may sign leaf certificates, may not delegate to
    /// intermediate CAs (path length 0).
    RootCa,
    /// A TLS server leaf: identified by its SAN entries, barred from
    /// signing certificates.
    Server {
        dns_names: Vec<String>,
        ip_addresses: Vec<IpAddr>,
    },
}

impl CertificateProfile {
    /// The extension set for this profile, in encoding order.
    ///
    /// The server SAN list starts with the common name, then DNS names,
    /// then IP addresses, all in input order; duplicates are the caller's
    /// to avoid.
    fn extensions(&self, common_name: &str) -> Result<Vec<ExtensionParam>> {
        match self {
            CertificateProfile::RootCa => Ok(vec![
                ExtensionParam::from_extension(
                    &BasicConstraints {
                        is_ca: true,
                        max_path_length: Some(0),
                    },
                    true,
                )?,
                ExtensionParam::from_extension(
                    &KeyUsage(
                        KeyUsages::DigitalSignature | KeyUsages::KeyCertSign | KeyUsages::CRLSign,
                    ),
                    true,
                )?,
            ]),
            CertificateProfile::Server {
                dns_names,
                ip_addresses,
            } => {
                let mut entries = vec![SanEntry::Dns(common_name.to_string())];
                entries.extend(dns_names.iter().cloned().map(SanEntry::Dns));
                entries.extend(ip_addresses.iter().copied().map(SanEntry::Ip));

                Ok(vec![
                    ExtensionParam::from_extension(
                        &BasicConstraints {
                            is_ca: false,
                            max_path_length: None,
                        },
                        true,
                    )?,
                    ExtensionParam::from_extension(
                        &KeyUsage(KeyUsages::DigitalSignature | KeyUsages::KeyEncipherment),
                        true,
                    )?,
                    ExtensionParam::from_extension(
                        &ExtendedKeyUsage {
                            usage: vec![ExtendedKeyUsageOption::ServerAuth],
                        },
                        false,
                    )?,
                    ExtensionParam::from_extension(&SubjectAltName { entries }, false)?,
                ])
            }
        }
    }
}

/// Builds an unsigned template for the given profile.
///
/// Pure: draws the serial number but touches no key material. Validates
/// that the subject carries a common name and that the validity window is
/// ordered.
pub fn build_template(
    profile: &CertificateProfile,
    subject: Name,
    issuer: Name,
    subject_public_key: PublicKey,
    signature_algorithm: SignatureAlgorithm,
    validity: Validity,
) -> Result<CertificateTemplate> {
    let common_name = DistinguishedName::from_x509_name(&subject).common_name;
    if common_name.is_empty() {
        return Err(CertMintError::InvalidInput(
            "subject has no common name".to_string(),
        ));
    }
    if validity.not_after <= validity.not_before {
        return Err(CertMintError::InvalidInput(
            "notAfter must be later than notBefore".to_string(),
        ));
    }

    Ok(CertificateTemplate {
        serial_number: CertificateTemplate::random_serial_number(),
        signature_algorithm,
        issuer,
        validity,
        subject,
        subject_public_key,
        extensions: profile.extensions(&common_name)?,
    })
}

/// Issues root and server certificates under fixed extension profiles.
///
/// The factory holds only the organization and country applied to every
/// subject it builds. Private keys are borrowed per call and never stored.
#[derive(Debug, Clone, Default, Builder)]
pub struct CertificateFactory {
    pub organization: Option<String>,
    pub country: Option<String>,
}

impl CertificateFactory {
    /// A factory with no organization or country attributes.
    pub fn new() -> Self {
        Self::default()
    }

    fn subject(&self, common_name: &str) -> Result<DistinguishedName> {
        DistinguishedName::new(
            common_name,
            self.organization.clone(),
            self.country.clone(),
        )
    }

    fn validity(validity_days: i64) -> Result<Validity> {
        if validity_days <= 0 {
            return Err(CertMintError::InvalidInput(format!(
                "validity_days must be positive, got {validity_days}"
            )));
        }
        Ok(Validity::for_days(validity_days))
    }

    /// Issues a self-signed root CA certificate.
    ///
    /// Subject and issuer are the same name and the certificate carries
    /// the signing pair's own public key, so the output verifies against
    /// itself: issuer equals subject byte for byte.
    pub fn issue_root_certificate(
        &self,
        signing_key_pair: &KeyPair,
        common_name: &str,
        validity_days: i64,
    ) -> Result<Certificate> {
        let validity = Self::validity(validity_days)?;
        let name = self.subject(common_name)?.to_x509_name()?;

        let template = build_template(
            &CertificateProfile::RootCa,
            name.clone(),
            name,
            signing_key_pair.public_key(),
            signing_key_pair.signature_algorithm(),
            validity,
        )?;
        template.sign(signing_key_pair)
    }

    /// Issues a server certificate signed by the CA's private key.
    ///
    /// The issuer name is taken from `ca_certificate` as encoded, not
    /// rebuilt, so the leaf's issuer matches the identity recorded in the
    /// CA's own certificate. The embedded public key is the server's.
    ///
    /// Caller contract: `ca_private_key` must be the key that produced
    /// `ca_certificate`'s public key. The factory does not check the
    /// pairing; a mismatch surfaces as `BadSignature` when the leaf is
    /// verified.
    #[allow(clippy::too_many_arguments)]
    pub fn issue_server_certificate(
        &self,
        server_public_key: &PublicKey,
        ca_certificate: &Certificate,
        ca_private_key: &KeyPair,
        common_name: &str,
        dns_names: &[String],
        ip_addresses: &[String],
        validity_days: i64,
    ) -> Result<Certificate> {
        let validity = Self::validity(validity_days)?;
        let ip_addresses = ip_addresses
            .iter()
            .map(|ip| {
                ip.parse::<IpAddr>()
                    .map_err(|_| CertMintError::InvalidInput(format!("not an IP literal: {ip}")))
            })
            .collect::<Result<Vec<_>>>()?;

        let subject = self.subject(common_name)?.to_x509_name()?;
        let issuer = ca_certificate.subject_name().clone();

        let profile = CertificateProfile::Server {
            dns_names: dns_names.to_vec(),
            ip_addresses,
        };
        let template = build_template(
            &profile,
            subject,
            issuer,
            server_public_key.clone(),
            ca_private_key.signature_algorithm(),
            validity,
        )?;
        template.sign(ca_private_key)
    }
}
