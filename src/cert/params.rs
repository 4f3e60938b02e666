use bon::Builder;
use const_oid::ObjectIdentifier;
use time::Duration;
use time::OffsetDateTime;
use x509_cert::name::{Name, RdnSequence};

use super::extensions::ToAndFromX509Extension;
use crate::error::CertMintError;

const OID_COMMON_NAME: ObjectIdentifier = ObjectIdentifier::new_unwrap("2.5.4.3");
const OID_COUNTRY: ObjectIdentifier = ObjectIdentifier::new_unwrap("2.5.4.6");
const OID_ORGANIZATION: ObjectIdentifier = ObjectIdentifier::new_unwrap("2.5.4.10");

/// Characters with structural meaning in RFC 4514 strings. Attribute values
/// containing them would change the shape of the encoded name.
const RFC4514_SPECIALS: &[char] = &[',', '+', '"', '\\', '<', '>', ';', '=', '#'];

/// Distinguished name used for both the subject and issuer of a certificate.
///
/// The common name is always present; organization and country are
/// optional. Encoding order is fixed (country, organization, common name)
/// so identical inputs always produce byte-identical names, which is what
/// makes a root's self-signed subject/issuer compare equal. Semantic
/// equality is field-wise and ignores encoding order.
#[derive(Clone, Debug, Builder, Default, PartialEq, Eq)]
pub struct DistinguishedName {
    pub common_name: String,
    pub organization: Option<String>,
    pub country: Option<String>,
}

impl DistinguishedName {
    /// Builds a validated name.
    ///
    /// Fails with [`CertMintError::InvalidInput`] when the common name is
    /// empty or any value contains RFC 4514 structural characters.
    pub fn new(
        common_name: &str,
        organization: Option<String>,
        country: Option<String>,
    ) -> Result<Self, CertMintError> {
        let dn = DistinguishedName {
            common_name: common_name.to_string(),
            organization,
            country,
        };
        dn.validate()?;
        Ok(dn)
    }

    pub fn validate(&self) -> Result<(), CertMintError> {
        if self.common_name.is_empty() {
            return Err(CertMintError::InvalidInput(
                "common name must not be empty".to_string(),
            ));
        }
        for value in [
            Some(&self.common_name),
            self.organization.as_ref(),
            self.country.as_ref(),
        ]
        .into_iter()
        .flatten()
        {
            if value.contains(RFC4514_SPECIALS) {
                return Err(CertMintError::InvalidInput(format!(
                    "name attribute value contains reserved characters: {value}"
                )));
            }
        }
        Ok(())
    }

    /// Converts the distinguished name to an X.509 name.
    ///
    /// The RFC 4514 string lists attributes most-specific first, so the
    /// DER sequence comes out as country, organization, common name.
    pub fn to_x509_name(&self) -> Result<Name, CertMintError> {
        use core::str::FromStr;
        self.validate()?;
        let mut rfc4514_name = format!("CN={}", self.common_name);
        if let Some(organization) = &self.organization {
            rfc4514_name.push_str(&format!(",O={organization}"));
        }
        if let Some(country) = &self.country {
            rfc4514_name.push_str(&format!(",C={country}"));
        }
        RdnSequence::from_str(&rfc4514_name)
            .map_err(|e| CertMintError::EncodingError(e.to_string()))
    }

    /// Extracts the attributes this crate understands from an X.509 name.
    ///
    /// Unknown attribute types are ignored; a missing common name yields an
    /// empty string, which downstream validation rejects.
    pub fn from_x509_name(name: &Name) -> Self {
        let mut dn = DistinguishedName::default();
        for rdn in name.0.iter() {
            for attr in rdn.0.iter() {
                let Some(value) = decode_attribute_value(&attr.value) else {
                    continue;
                };
                match attr.oid {
                    OID_COMMON_NAME => dn.common_name = value,
                    OID_ORGANIZATION => dn.organization = Some(value),
                    OID_COUNTRY => dn.country = Some(value),
                    _ => {}
                }
            }
        }
        dn
    }
}

/// Directory strings come in more than one ASN.1 flavor depending on the
/// tooling that produced the certificate.
fn decode_attribute_value(value: &der::Any) -> Option<String> {
    if let Ok(s) = value.decode_as::<String>() {
        return Some(s);
    }
    if let Ok(s) = value.decode_as::<der::asn1::PrintableString>() {
        return Some(s.to_string());
    }
    if let Ok(s) = value.decode_as::<der::asn1::Ia5String>() {
        return Some(s.to_string());
    }
    None
}

/// Certificate validity period.
///
/// Timestamps are UTC, truncated to whole seconds to match what the DER
/// time types can represent.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Validity {
    pub not_before: OffsetDateTime,
    pub not_after: OffsetDateTime,
}

impl Validity {
    /// Creates a validity period starting now for the given number of days.
    pub fn for_days(days: i64) -> Self {
        let now = OffsetDateTime::now_utc();
        let now = now - Duration::nanoseconds(now.nanosecond() as i64);
        Self {
            not_before: now,
            not_after: now + Duration::days(days),
        }
    }

    /// Whether `now` falls inside the window, bounds included.
    pub fn contains(&self, now: OffsetDateTime) -> bool {
        self.not_before <= now && now <= self.not_after
    }
}

/// Represents an X.509 extension: OID, criticality and DER-encoded value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExtensionParam {
    pub oid: ObjectIdentifier,
    pub critical: bool,
    /// DER-encoded extension value
    pub value: Vec<u8>,
}

impl ExtensionParam {
    /// Encodes a typed extension into its wire form.
    pub fn from_extension<E: ToAndFromX509Extension>(
        extension: &E,
        critical: bool,
    ) -> Result<Self, CertMintError> {
        Ok(Self {
            oid: E::OID,
            critical,
            value: extension.to_x509_extension_value()?,
        })
    }

    /// Decodes the wire form back into a typed extension.
    pub fn to_extension<E: ToAndFromX509Extension>(&self) -> Result<E, CertMintError> {
        E::from_x509_extension_value(&self.value)
    }
}
