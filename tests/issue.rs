mod util;

use certmint::cert::extensions::{
    BasicConstraints, ExtendedKeyUsage, ExtendedKeyUsageOption, KeyUsage, KeyUsages, SanEntry,
    SubjectAltName, ToAndFromX509Extension,
};
use certmint::error::CertMintError;
use certmint::key::KeyPair;
use der::Encode;
use std::net::{IpAddr, Ipv4Addr};

fn raw_extension_critical(cert: &certmint::cert::Certificate, oid: der::oid::ObjectIdentifier) -> Option<bool> {
    cert.inner
        .tbs_certificate
        .extensions
        .as_ref()?
        .iter()
        .find(|ext| ext.extn_id == oid)
        .map(|ext| ext.critical)
}

#[test]
fn root_certificate_is_self_signed_with_ca_extensions() {
    let ca = util::generate_ca();
    let tbs = &ca.cert.inner.tbs_certificate;

    // Self-signed contract: issuer equals subject byte for byte.
    assert_eq!(tbs.issuer, tbs.subject);
    assert_eq!(ca.cert.subject().common_name, "ELK-Root-CA");
    assert_eq!(ca.cert.subject().organization.as_deref(), Some("ELK-DevOps"));
    assert_eq!(ca.cert.subject().country.as_deref(), Some("MG"));

    let bc: BasicConstraints = ca.cert.extension().unwrap().expect("basicConstraints");
    assert!(bc.is_ca);
    assert_eq!(bc.max_path_length, Some(0));
    assert_eq!(raw_extension_critical(&ca.cert, BasicConstraints::OID), Some(true));

    let ku: KeyUsage = ca.cert.extension().unwrap().expect("keyUsage");
    assert!(ku.can_sign_certificates());
    assert!(ku.0.contains(KeyUsages::CRLSign));
    assert!(ku.0.contains(KeyUsages::DigitalSignature));
    assert!(!ku.0.contains(KeyUsages::KeyEncipherment));
    assert_eq!(raw_extension_critical(&ca.cert, KeyUsage::OID), Some(true));

    // A root neither names alternative identities nor declares protocol
    // purposes.
    assert!(ca.cert.extension::<ExtendedKeyUsage>().unwrap().is_none());
    assert!(ca.cert.extension::<SubjectAltName>().unwrap().is_none());
}

#[test]
fn server_certificate_links_to_ca_and_carries_server_extensions() {
    let ca = util::generate_ca();
    let (server_key, leaf) = util::issue_elasticsearch_leaf(&ca);

    // Issuer is the CA's subject as recorded in the CA's own certificate.
    assert_eq!(
        leaf.inner.tbs_certificate.issuer,
        ca.cert.inner.tbs_certificate.subject
    );
    assert_eq!(leaf.issuer(), ca.cert.subject());
    assert_ne!(leaf.issuer(), leaf.subject());

    // The embedded key is the server's, never the CA's.
    let embedded = leaf
        .inner
        .tbs_certificate
        .subject_public_key_info
        .to_der()
        .unwrap();
    let supplied = server_key.public_key().to_spki().unwrap().to_der().unwrap();
    assert_eq!(embedded, supplied);
    let ca_key_spki = ca.key.public_key().to_spki().unwrap().to_der().unwrap();
    assert_ne!(embedded, ca_key_spki);

    let bc: BasicConstraints = leaf.extension().unwrap().expect("basicConstraints");
    assert!(!bc.is_ca);
    assert_eq!(raw_extension_critical(&leaf, BasicConstraints::OID), Some(true));

    let ku: KeyUsage = leaf.extension().unwrap().expect("keyUsage");
    assert!(ku.0.contains(KeyUsages::DigitalSignature));
    assert!(ku.0.contains(KeyUsages::KeyEncipherment));
    assert!(!ku.can_sign_certificates());

    let eku: ExtendedKeyUsage = leaf.extension().unwrap().expect("extendedKeyUsage");
    assert!(eku.contains(ExtendedKeyUsageOption::ServerAuth));
    assert_eq!(raw_extension_critical(&leaf, ExtendedKeyUsage::OID), Some(false));
    assert_eq!(raw_extension_critical(&leaf, SubjectAltName::OID), Some(false));
}

#[test]
fn san_lists_cn_then_dns_names_then_ip_addresses_in_order() {
    let ca = util::generate_ca();
    let (_, leaf) = util::issue_elasticsearch_leaf(&ca);

    let san: SubjectAltName = leaf.extension().unwrap().expect("subjectAltName");
    assert_eq!(
        san.entries,
        vec![
            SanEntry::Dns("elasticsearch".to_string()),
            SanEntry::Dns("localhost".to_string()),
            SanEntry::Ip(IpAddr::V4(Ipv4Addr::LOCALHOST)),
        ]
    );
}

#[test]
fn san_always_contains_the_common_name() {
    let ca = util::generate_ca();
    let server_key = KeyPair::generate_ecdsa_p256();
    let leaf = ca
        .factory
        .issue_server_certificate(
            &server_key.public_key(),
            &ca.cert,
            &ca.key,
            "bare-server",
            &[],
            &[],
            30,
        )
        .unwrap();

    let san: SubjectAltName = leaf.extension().unwrap().expect("subjectAltName");
    assert_eq!(san.entries, vec![SanEntry::Dns("bare-server".to_string())]);
}

#[test]
fn duplicate_san_inputs_are_preserved() {
    let ca = util::generate_ca();
    let server_key = KeyPair::generate_ecdsa_p256();
    let leaf = ca
        .factory
        .issue_server_certificate(
            &server_key.public_key(),
            &ca.cert,
            &ca.key,
            "es",
            &["es".to_string()],
            &[],
            30,
        )
        .unwrap();

    let san: SubjectAltName = leaf.extension().unwrap().unwrap();
    assert_eq!(
        san.entries,
        vec![
            SanEntry::Dns("es".to_string()),
            SanEntry::Dns("es".to_string()),
        ]
    );
}

#[test]
fn serial_numbers_are_random_per_issuance() {
    let ca = util::generate_ca();
    let (_, first) = util::issue_elasticsearch_leaf(&ca);
    let (_, second) = util::issue_elasticsearch_leaf(&ca);

    assert_ne!(first.serial_number(), second.serial_number());
    for cert in [&first, &second, &ca.cert] {
        let serial = cert.serial_number();
        assert!(!serial.is_empty());
        // Positive DER integer: sign bit clear on the leading byte.
        assert_eq!(serial[0] & 0x80, 0);
        assert_ne!(serial[0], 0);
    }
}

#[test]
fn validity_window_spans_the_requested_days() {
    let ca = util::generate_ca();
    let validity = ca.cert.validity();
    assert_eq!(validity.not_after - validity.not_before, time::Duration::days(3650));
    assert_eq!(validity.not_before.nanosecond(), 0);
}

#[test]
fn empty_common_name_is_rejected() {
    let ca = util::generate_ca();
    let result = ca.factory.issue_root_certificate(&ca.key, "", 365);
    assert!(matches!(result, Err(CertMintError::InvalidInput(_))));
}

#[test]
fn non_positive_validity_is_rejected() {
    let ca = util::generate_ca();
    let server_key = KeyPair::generate_ecdsa_p256();
    for days in [0, -5] {
        let result = ca.factory.issue_server_certificate(
            &server_key.public_key(),
            &ca.cert,
            &ca.key,
            "es",
            &[],
            &[],
            days,
        );
        assert!(matches!(result, Err(CertMintError::InvalidInput(_))));
    }
}

#[test]
fn unparseable_ip_literal_is_rejected() {
    let ca = util::generate_ca();
    let server_key = KeyPair::generate_ecdsa_p256();
    let result = ca.factory.issue_server_certificate(
        &server_key.public_key(),
        &ca.cert,
        &ca.key,
        "es",
        &[],
        &["999.0.0.1".to_string()],
        30,
    );
    assert!(matches!(result, Err(CertMintError::InvalidInput(_))));
}

#[test]
fn rsa_chain_issues_and_verifies() {
    let ca_key = KeyPair::generate_rsa(2048).unwrap();
    let server_key = KeyPair::generate_rsa(2048).unwrap();
    let factory = certmint::issue::CertificateFactory::new();

    let root = factory.issue_root_certificate(&ca_key, "RSA-Root", 3650).unwrap();
    let leaf = factory
        .issue_server_certificate(
            &server_key.public_key(),
            &root,
            &ca_key,
            "rsa-server",
            &[],
            &[],
            365,
        )
        .unwrap();

    assert_eq!(
        leaf.signature_algorithm().unwrap(),
        certmint::cert::SignatureAlgorithm::Sha256WithRsa
    );
    let report =
        certmint::verify::verify_chain(&leaf, &root, leaf.validity().not_before, Some("rsa-server"))
            .unwrap();
    assert!(report.is_trusted());
}
