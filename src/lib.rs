//! # CertMint - Issue and Verify a Small PKI in Pure Rust
//!
//! CertMint issues a self-signed root Certificate Authority and the leaf
//! server certificates it signs, then verifies the resulting chain of
//! trust. It is built entirely with rustcrypto libraries, with no
//! dependencies on ring or openssl.
//!
//! The crate covers exactly one trust shape: a root CA (path length 0)
//! signing TLS server leaves that carry Subject Alternative Names.
//! Revocation, intermediate CAs, key rotation and HSMs are out of scope.
//!
//! ## Supported Key Types
//!
//! - **RSA**: PKCS#1 v1.5 with SHA-256 (2048 bits and up)
//! - **ECDSA**: P-256 with SHA-256
//!
//! Whichever key type signs the root signs every leaf, so a chain never
//! mixes signature algorithms.
//!
//! ## Quick Start
//!
//! ### Issuing a Root CA and a Server Certificate
//!
//! ```rust
//! use certmint::{issue::CertificateFactory, key::KeyPair, verify::verify_chain};
//!
//! # fn main() -> Result<(), certmint::error::CertMintError> {
//! let ca_key = KeyPair::generate_ecdsa_p256();
//! let server_key = KeyPair::generate_ecdsa_p256();
//!
//! let factory = CertificateFactory::builder()
//!     .organization("ELK-DevOps".to_string())
//!     .country("MG".to_string())
//!     .build();
//!
//! // Self-signed root: subject == issuer, valid ten years.
//! let root = factory.issue_root_certificate(&ca_key, "ELK-Root-CA", 3650)?;
//!
//! // Server leaf: signed by the root's key, identified by its SAN entries.
//! let leaf = factory.issue_server_certificate(
//!     &server_key.public_key(),
//!     &root,
//!     &ca_key,
//!     "elasticsearch",
//!     &["localhost".to_string()],
//!     &["127.0.0.1".to_string()],
//!     365,
//! )?;
//!
//! let report = verify_chain(&leaf, &root, time::OffsetDateTime::now_utc(), Some("localhost"))?;
//! assert!(report.is_trusted());
//! # Ok(())
//! # }
//! ```
//!
//! ### Persisting and Reloading Certificates
//!
//! ```rust,no_run
//! use std::path::Path;
//!
//! use certmint::{issue::CertificateFactory, key::KeyPair};
//! use certmint::store::{FsBlobStore, load_certificate_pem, save_certificate_pem};
//!
//! # fn main() -> Result<(), certmint::error::CertMintError> {
//! let ca_key = KeyPair::generate_rsa(4096)?;
//! let root = CertificateFactory::new().issue_root_certificate(&ca_key, "ELK-Root-CA", 3650)?;
//!
//! // One PEM file per certificate, world-readable: certificates are public.
//! let store = FsBlobStore;
//! save_certificate_pem(&store, Path::new("certs/ca_cert.pem"), &root)?;
//! let reloaded = load_certificate_pem(&store, Path::new("certs/ca_cert.pem"))?;
//! assert_eq!(root, reloaded);
//! # Ok(())
//! # }
//! ```
//!
//! ## Verification
//!
//! [`verify::verify_chain`] runs a fixed check sequence (validity
//! windows, issuer linkage, CA authorization, signature, optional
//! hostname) and reports the first failure as data rather than an error,
//! so callers choose their own policy:
//!
//! ```rust
//! use certmint::{issue::CertificateFactory, key::KeyPair};
//! use certmint::verify::{ChainFailure, verify_chain};
//!
//! # fn main() -> Result<(), certmint::error::CertMintError> {
//! let ca_key = KeyPair::generate_ecdsa_p256();
//! let server_key = KeyPair::generate_ecdsa_p256();
//! let factory = CertificateFactory::new();
//! let root = factory.issue_root_certificate(&ca_key, "ELK-Root-CA", 3650)?;
//! let leaf = factory.issue_server_certificate(
//!     &server_key.public_key(), &root, &ca_key, "elasticsearch", &[], &[], 365,
//! )?;
//!
//! let report = verify_chain(&leaf, &root, time::OffsetDateTime::now_utc(), Some("nope"))?;
//! assert!(matches!(report.failure(), Some(ChainFailure::HostnameMismatch { .. })));
//! # Ok(())
//! # }
//! ```
//!
//! ## Module Organization
//!
//! - [`key`]: key-pair generation, SPKI encoding and signing
//! - [`cert`]: certificate type, distinguished names, typed extensions
//! - [`issue`]: extension profiles and the certificate factory
//! - [`verify`]: chain-of-trust verification
//! - [`pem_utils`]: generic PEM framing helpers
//! - [`store`]: PEM persistence through the blob-store interface
//! - [`error`]: error types
//! - [`tbs_certificate`]: the unsigned certificate template

pub mod cert;
pub mod error;
pub mod issue;
pub mod key;
pub mod pem_utils;
pub mod store;
pub mod tbs_certificate;
pub mod verify;
