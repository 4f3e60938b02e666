use std::net::IpAddr;

use const_oid::AssociatedOid;
use der::{
    Decode, Encode,
    asn1::{Ia5String, OctetString},
    oid::ObjectIdentifier,
};
use x509_cert::ext::pkix::name::GeneralName;

use crate::error::CertMintError;

/// Trait for converting typed extensions to and from their DER-encoded
/// X.509 extension values.
pub trait ToAndFromX509Extension {
    /// The Object Identifier (OID) for the extension.
    const OID: ObjectIdentifier;

    /// Encodes the extension into a DER-encoded byte vector.
    fn to_x509_extension_value(&self) -> Result<Vec<u8>, CertMintError>;

    /// Decodes the extension from a DER-encoded byte slice.
    fn from_x509_extension_value(extension: &[u8]) -> Result<Self, CertMintError>
    where
        Self: Sized;
}

/// A single Subject Alternative Name entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SanEntry {
    /// A DNS host name.
    Dns(String),
    /// An IPv4 or IPv6 address.
    Ip(IpAddr),
}

/// Represents the Subject Alternative Name (SAN) extension.
///
/// Lists every identity (DNS name or IP address) the certificate is valid
/// for. Entry order is preserved exactly as supplied.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubjectAltName {
    pub entries: Vec<SanEntry>,
}

impl SubjectAltName {
    /// Whether `hostname` matches one of the entries.
    ///
    /// An IP literal is compared against IP entries; anything else is
    /// compared case-insensitively against DNS entries. Exact matches
    /// only, no wildcard expansion.
    pub fn matches_hostname(&self, hostname: &str) -> bool {
        if let Ok(ip) = hostname.parse::<IpAddr>() {
            self.entries
                .iter()
                .any(|entry| matches!(entry, SanEntry::Ip(candidate) if *candidate == ip))
        } else {
            self.entries.iter().any(
                |entry| matches!(entry, SanEntry::Dns(name) if name.eq_ignore_ascii_case(hostname)),
            )
        }
    }
}

impl ToAndFromX509Extension for SubjectAltName {
    const OID: ObjectIdentifier = x509_cert::ext::pkix::SubjectAltName::OID;

    fn to_x509_extension_value(&self) -> Result<Vec<u8>, CertMintError> {
        let san = x509_cert::ext::pkix::SubjectAltName(
            self.entries
                .iter()
                .map(|entry| match entry {
                    SanEntry::Dns(name) => Ia5String::try_from(name.clone())
                        .map(GeneralName::DnsName)
                        .map_err(|e| CertMintError::InvalidInput(e.to_string())),
                    SanEntry::Ip(ip) => {
                        let octets = match ip {
                            IpAddr::V4(v4) => v4.octets().to_vec(),
                            IpAddr::V6(v6) => v6.octets().to_vec(),
                        };
                        OctetString::new(octets)
                            .map(GeneralName::IpAddress)
                            .map_err(|e| CertMintError::EncodingError(e.to_string()))
                    }
                })
                .collect::<Result<Vec<_>, _>>()?,
        );

        Ok(san.to_der()?)
    }

    fn from_x509_extension_value(extension: &[u8]) -> Result<Self, CertMintError> {
        let san = x509_cert::ext::pkix::SubjectAltName::from_der(extension)?;
        let entries = san
            .0
            .iter()
            .map(|name| match name {
                GeneralName::DnsName(dns) => Ok(SanEntry::Dns(dns.to_string())),
                GeneralName::IpAddress(octets) => {
                    ip_from_octets(octets.as_bytes()).map(SanEntry::Ip)
                }
                _ => Err(CertMintError::MalformedInput(
                    "unsupported general name type".to_string(),
                )),
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { entries })
    }
}

/// iPAddress entries are raw octets: 4 for IPv4, 16 for IPv6.
fn ip_from_octets(octets: &[u8]) -> Result<IpAddr, CertMintError> {
    match octets.len() {
        4 => {
            let bytes: [u8; 4] = octets.try_into().expect("length checked");
            Ok(IpAddr::from(bytes))
        }
        16 => {
            let bytes: [u8; 16] = octets.try_into().expect("length checked");
            Ok(IpAddr::from(bytes))
        }
        n => Err(CertMintError::MalformedInput(format!(
            "iPAddress entry has {n} octets, expected 4 or 16"
        ))),
    }
}

/// Represents the Basic Constraints extension.
///
/// Declares whether the certificate may act as a CA and how deep a
/// delegation chain it may start.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BasicConstraints {
    pub is_ca: bool,
    pub max_path_length: Option<u32>,
}

impl ToAndFromX509Extension for BasicConstraints {
    const OID: ObjectIdentifier = x509_cert::ext::pkix::BasicConstraints::OID;

    fn to_x509_extension_value(&self) -> Result<Vec<u8>, CertMintError> {
        let bc = x509_cert::ext::pkix::BasicConstraints {
            ca: self.is_ca,
            path_len_constraint: self.max_path_length.map(|v| v as u8),
        };

        Ok(bc.to_der()?)
    }

    fn from_x509_extension_value(der_bytes: &[u8]) -> Result<Self, CertMintError> {
        let bc = x509_cert::ext::pkix::BasicConstraints::from_der(der_bytes)?;
        Ok(Self {
            is_ca: bc.ca,
            max_path_length: bc.path_len_constraint.map(|v| v as u32),
        })
    }
}

pub use der::flagset::FlagSet;
use x509_cert::ext::pkix::KeyUsage as X509KeyUsage;
pub use x509_cert::ext::pkix::KeyUsages;

/// Represents the Key Usage extension.
///
/// Restricts the cryptographic purposes the certified key may be used for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyUsage(pub FlagSet<KeyUsages>);

impl KeyUsage {
    /// Whether the key may sign other certificates.
    pub fn can_sign_certificates(&self) -> bool {
        self.0.contains(KeyUsages::KeyCertSign)
    }
}

impl ToAndFromX509Extension for KeyUsage {
    const OID: ObjectIdentifier = <X509KeyUsage as AssociatedOid>::OID;

    fn to_x509_extension_value(&self) -> Result<Vec<u8>, CertMintError> {
        let ku = X509KeyUsage(self.0);
        Ok(ku.to_der()?)
    }

    fn from_x509_extension_value(extension: &[u8]) -> Result<Self, CertMintError> {
        let ku = X509KeyUsage::from_der(extension)?;
        Ok(Self(ku.0))
    }
}

/// Represents the Extended Key Usage extension.
///
/// Indicates the protocol purposes for which the public key may be used.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtendedKeyUsage {
    pub usage: Vec<ExtendedKeyUsageOption>,
}

impl ExtendedKeyUsage {
    pub fn contains(&self, option: ExtendedKeyUsageOption) -> bool {
        self.usage.contains(&option)
    }
}

impl ToAndFromX509Extension for ExtendedKeyUsage {
    const OID: ObjectIdentifier = x509_cert::ext::pkix::ExtendedKeyUsage::OID;

    fn to_x509_extension_value(&self) -> Result<Vec<u8>, CertMintError> {
        let oids: Vec<ObjectIdentifier> = self.usage.iter().map(|v| (*v).into()).collect();
        let eku = x509_cert::ext::pkix::ExtendedKeyUsage(oids);
        Ok(eku.to_der()?)
    }

    fn from_x509_extension_value(extension: &[u8]) -> Result<Self, CertMintError> {
        let eku = x509_cert::ext::pkix::ExtendedKeyUsage::from_der(extension)?;
        let usage = eku
            .0
            .iter()
            .map(|v| match *v {
                const_oid::db::rfc5912::ID_KP_SERVER_AUTH => Ok(ExtendedKeyUsageOption::ServerAuth),
                const_oid::db::rfc5912::ID_KP_CLIENT_AUTH => Ok(ExtendedKeyUsageOption::ClientAuth),
                _ => Err(CertMintError::MalformedInput(
                    "unsupported extended key usage option".to_string(),
                )),
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { usage })
    }
}

/// Represents an option for the Extended Key Usage extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtendedKeyUsageOption {
    ServerAuth,
    ClientAuth,
}

impl From<ExtendedKeyUsageOption> for ObjectIdentifier {
    fn from(value: ExtendedKeyUsageOption) -> Self {
        match value {
            ExtendedKeyUsageOption::ServerAuth => const_oid::db::rfc5912::ID_KP_SERVER_AUTH,
            ExtendedKeyUsageOption::ClientAuth => const_oid::db::rfc5912::ID_KP_CLIENT_AUTH,
        }
    }
}
