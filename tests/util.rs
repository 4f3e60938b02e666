use certmint::cert::Certificate;
use certmint::issue::CertificateFactory;
use certmint::key::KeyPair;

pub struct CaFixture {
    pub key: KeyPair,
    pub cert: Certificate,
    pub factory: CertificateFactory,
}

/// The root CA every test chain hangs off: ECDSA P-256 keys keep the
/// fixtures fast.
pub fn generate_ca() -> CaFixture {
    let key = KeyPair::generate_ecdsa_p256();
    let factory = CertificateFactory::builder()
        .organization("ELK-DevOps".to_string())
        .country("MG".to_string())
        .build();
    let cert = factory
        .issue_root_certificate(&key, "ELK-Root-CA", 3650)
        .expect("root issuance");
    CaFixture { key, cert, factory }
}

/// The elasticsearch leaf from the deployment this library grew out of:
/// SAN {elasticsearch, localhost} plus 127.0.0.1, valid one year.
pub fn issue_elasticsearch_leaf(ca: &CaFixture) -> (KeyPair, Certificate) {
    let server_key = KeyPair::generate_ecdsa_p256();
    let cert = ca
        .factory
        .issue_server_certificate(
            &server_key.public_key(),
            &ca.cert,
            &ca.key,
            "elasticsearch",
            &["localhost".to_string()],
            &["127.0.0.1".to_string()],
            365,
        )
        .expect("leaf issuance");
    (server_key, cert)
}
