use crate::error::CertMintError;

/// Convert DER-encoded data into a PEM-encoded string with the provided label.
pub fn der_to_pem(der: &[u8], label: &str) -> String {
    let pem = pem::Pem::new(label, der);
    pem::encode_config(&pem, pem::EncodeConfig::new())
}

/// Convert a PEM-encoded string to DER bytes, enforcing the expected label.
pub fn pem_to_der(pem_str: &str, expected_label: &str) -> Result<Vec<u8>, CertMintError> {
    let pem = pem::parse(pem_str)?;
    if pem.tag() != expected_label {
        return Err(CertMintError::MalformedInput(format!(
            "expected {expected_label} block, found {}",
            pem.tag()
        )));
    }
    Ok(pem.contents().to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pem_round_trip_preserves_der() {
        let der = b"not really der, but bytes";
        let pem = der_to_pem(der, "CERTIFICATE");
        assert!(pem.starts_with("-----BEGIN CERTIFICATE-----"));
        assert_eq!(pem_to_der(&pem, "CERTIFICATE").unwrap(), der);
    }

    #[test]
    fn wrong_label_is_rejected() {
        let pem = der_to_pem(b"bytes", "PRIVATE KEY");
        let result = pem_to_der(&pem, "CERTIFICATE");
        assert!(matches!(result, Err(CertMintError::MalformedInput(_))));
    }

    #[test]
    fn garbage_is_rejected() {
        let result = pem_to_der("garbage", "CERTIFICATE");
        assert!(matches!(result, Err(CertMintError::MalformedInput(_))));
    }
}
