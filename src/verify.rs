//! Chain-of-trust verification for one leaf/CA link.
//!
//! Verification is a fixed sequence of checks that short-circuits on the
//! first failure, so a given bad input always reports the same failure
//! kind. Policy outcomes are data, not errors: the caller decides whether
//! a failed report aborts a handshake or is merely logged. Only malformed
//! certificate content surfaces as [`CertMintError`].

use time::OffsetDateTime;

use crate::cert::Certificate;
use crate::cert::extensions::{BasicConstraints, KeyUsage, SanEntry, SubjectAltName};
use crate::cert::params::DistinguishedName;
use crate::error::CertMintError;

/// One link-verification step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChainCheck {
    /// Both certificates are inside their validity windows.
    Validity,
    /// The leaf's issuer names the CA's subject.
    IssuerLinkage,
    /// The CA is authorized to sign certificates.
    CaAuthority,
    /// The leaf's signature verifies under the CA's public key.
    Signature,
    /// The expected hostname appears in the leaf's SAN entries.
    Hostname,
}

/// Why a chain link was rejected. Carries the offending field so callers
/// can report the failure without re-parsing the certificates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChainFailure {
    Expired {
        subject: String,
        not_after: OffsetDateTime,
    },
    NotYetValid {
        subject: String,
        not_before: OffsetDateTime,
    },
    IssuerMismatch {
        leaf_issuer: DistinguishedName,
        ca_subject: DistinguishedName,
    },
    NotAuthorizedToSign {
        subject: String,
        missing: &'static str,
    },
    BadSignature {
        subject: String,
    },
    HostnameMismatch {
        hostname: String,
        san: Vec<SanEntry>,
    },
}

/// The outcome of verifying one leaf/CA link.
///
/// Binary per link: either every requested check passed, or `failure`
/// names the first check that did not. `passed` records how far the
/// sequence got either way.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerificationReport {
    passed: Vec<ChainCheck>,
    failure: Option<ChainFailure>,
}

impl VerificationReport {
    /// Whether every check passed.
    pub fn is_trusted(&self) -> bool {
        self.failure.is_none()
    }

    /// The checks that passed, in execution order.
    pub fn passed(&self) -> &[ChainCheck] {
        &self.passed
    }

    /// The first failed check, if any.
    pub fn failure(&self) -> Option<&ChainFailure> {
        self.failure.as_ref()
    }
}

/// Verifies a leaf certificate against a candidate CA certificate.
///
/// Checks run in a fixed order and stop at the first failure: temporal
/// validity of both certificates, issuer linkage, CA authorization
/// (basic constraints and key usage), cryptographic signature, and, when
/// `expected_hostname` is given, SAN identity matching. Exactly one link
/// is verified; deeper chains compose by repeated application.
pub fn verify_chain(
    leaf: &Certificate,
    ca: &Certificate,
    now: OffsetDateTime,
    expected_hostname: Option<&str>,
) -> Result<VerificationReport, CertMintError> {
    let mut report = VerificationReport {
        passed: Vec::new(),
        failure: None,
    };

    // 1. Temporal validity, leaf first for deterministic reporting.
    for cert in [leaf, ca] {
        if let Some(failure) = check_validity_window(cert, now) {
            report.failure = Some(failure);
            return Ok(report);
        }
    }
    report.passed.push(ChainCheck::Validity);

    // 2. Issuer linkage. Semantic name equality, not byte equality, so
    // attribute order differences between tools do not break the link.
    let leaf_issuer = leaf.issuer();
    let ca_subject = ca.subject();
    if leaf_issuer != ca_subject {
        report.failure = Some(ChainFailure::IssuerMismatch {
            leaf_issuer,
            ca_subject,
        });
        return Ok(report);
    }
    report.passed.push(ChainCheck::IssuerLinkage);

    // 3. CA authorization.
    let basic_constraints = ca.extension::<BasicConstraints>()?;
    if !basic_constraints.map(|bc| bc.is_ca).unwrap_or(false) {
        report.failure = Some(ChainFailure::NotAuthorizedToSign {
            subject: ca_subject.common_name,
            missing: "basicConstraints.cA",
        });
        return Ok(report);
    }
    let key_usage = ca.extension::<KeyUsage>()?;
    if !key_usage
        .map(|ku| ku.can_sign_certificates())
        .unwrap_or(false)
    {
        report.failure = Some(ChainFailure::NotAuthorizedToSign {
            subject: ca_subject.common_name,
            missing: "keyUsage.keyCertSign",
        });
        return Ok(report);
    }
    report.passed.push(ChainCheck::CaAuthority);

    // 4. Signature: the CA's public key must verify the leaf's TBS bytes.
    let tbs_der = leaf.tbs_der()?;
    let algorithm = leaf.signature_algorithm()?;
    let signature = leaf.signature_bytes()?;
    let ca_public_key = ca.subject_public_key()?;
    if !ca_public_key.verify_signature(algorithm, &tbs_der, signature) {
        report.failure = Some(ChainFailure::BadSignature {
            subject: leaf.subject().common_name,
        });
        return Ok(report);
    }
    report.passed.push(ChainCheck::Signature);

    // 5. Identity.
    if let Some(hostname) = expected_hostname {
        let san = leaf.extension::<SubjectAltName>()?.unwrap_or_default();
        if !san.matches_hostname(hostname) {
            report.failure = Some(ChainFailure::HostnameMismatch {
                hostname: hostname.to_string(),
                san: san.entries,
            });
            return Ok(report);
        }
        report.passed.push(ChainCheck::Hostname);
    }

    Ok(report)
}

fn check_validity_window(cert: &Certificate, now: OffsetDateTime) -> Option<ChainFailure> {
    let validity = cert.validity();
    if now < validity.not_before {
        return Some(ChainFailure::NotYetValid {
            subject: cert.subject().common_name,
            not_before: validity.not_before,
        });
    }
    if now > validity.not_after {
        return Some(ChainFailure::Expired {
            subject: cert.subject().common_name,
            not_after: validity.not_after,
        });
    }
    None
}
