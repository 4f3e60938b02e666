use std::path::Path;

use certmint::issue::CertificateFactory;
use certmint::key::KeyPair;
use certmint::store::{FsBlobStore, save_certificate_pem};
use certmint::verify::verify_chain;

fn main() -> Result<(), certmint::error::CertMintError> {
    // Generate key pairs for the CA and the server using ECDSA P-256.
    let ca_key = KeyPair::generate_ecdsa_p256();
    let server_key = KeyPair::generate_ecdsa_p256();

    let factory = CertificateFactory::builder()
        .organization("ELK-DevOps".to_string())
        .country("MG".to_string())
        .build();

    // Self-signed root, valid ten years.
    let root = factory.issue_root_certificate(&ca_key, "ELK-Root-CA", 3650)?;

    // Server leaf signed by the root's key, valid one year.
    let leaf = factory.issue_server_certificate(
        &server_key.public_key(),
        &root,
        &ca_key,
        "elasticsearch",
        &["localhost".to_string(), "es.local".to_string()],
        &["127.0.0.1".to_string()],
        365,
    )?;

    let store = FsBlobStore;
    save_certificate_pem(&store, Path::new(".demo_certs/ca_cert.pem"), &root)?;
    save_certificate_pem(
        &store,
        Path::new(".demo_certs/elasticsearch_cert.pem"),
        &leaf,
    )?;

    let report = verify_chain(
        &leaf,
        &root,
        time::OffsetDateTime::now_utc(),
        Some("localhost"),
    )?;
    println!("chain trusted for \"localhost\": {}", report.is_trusted());

    println!("\nCA Certificate PEM:\n{}", root.to_pem()?);
    println!("Server Certificate PEM:\n{}", leaf.to_pem()?);

    // The persisted files interoperate with standard tooling:
    //   openssl verify -CAfile .demo_certs/ca_cert.pem .demo_certs/elasticsearch_cert.pem
    //   openssl x509 -in .demo_certs/elasticsearch_cert.pem -noout -ext subjectAltName
    Ok(())
}
