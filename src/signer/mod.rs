mod software;
pub use software::SoftwareSigner;

use crate::config::{Backend, SignConfig};
use crate::error::SignError;
use crate::key::KeyRecord;
use std::fmt::Display;

pub struct SignRequest<'a> {
    pub key: &'a KeyRecord,
    pub data: &'a [u8],
}

impl<'a> SignRequest<'a> {
    pub fn new(key: &'a KeyRecord, data: &'a [u8]) -> Self {
        Self { key, data }
    }
}

/// Opaque signature bytes produced by a backend
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Signature(Vec<u8>);

impl Signature {
    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_slice()
    }
}

impl From<Vec<u8>> for Signature {
    fn from(value: Vec<u8>) -> Self {
        Self(value)
    }
}

impl Display for Signature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&hex::encode(&self.0))
    }
}

pub trait Signer {
    /// Backend errors are returned as is, without retrying.
    fn sign(&self, req: &SignRequest) -> Result<Signature, SignError>;
}

impl<T: Signer + ?Sized> Signer for &T {
    fn sign(&self, req: &SignRequest) -> Result<Signature, SignError> {
        (**self).sign(req)
    }
}

impl<T: Signer + ?Sized> Signer for Box<T> {
    fn sign(&self, req: &SignRequest) -> Result<Signature, SignError> {
        (**self).sign(req)
    }
}

/// Builds the backend named by the configuration.
pub fn backend(config: &SignConfig) -> Box<dyn Signer> {
    match config.backend {
        Backend::Software => Box::new(SoftwareSigner::new(config.padding)),
    }
}

#[cfg(test)]
mod tests {
    use super::{backend, SignRequest, Signature, Signer};
    use crate::config::{Padding, SignConfig};
    use crate::error::SignError;
    use crate::key::KeyRecord;

    struct Fixed;

    impl Signer for Fixed {
        fn sign(&self, _req: &SignRequest) -> Result<Signature, SignError> {
            Ok(Signature::from(vec![0x12, 0x34, 0x56, 0x78]))
        }
    }

    #[test]
    fn signature_hex() {
        assert_eq!(Signature::from(vec![0x12, 0x34, 0x56, 0x78]).to_string(), "12345678");
        assert_eq!(Signature::from(vec![0x00, 0x0a]).to_string(), "000a");
        assert_eq!(Signature::default().to_string(), "");
    }

    #[test]
    fn dyn_signer() {
        let key: KeyRecord = "mod 01\nexp 01\nblob 01".parse().unwrap();
        let boxed: Box<dyn Signer> = Box::new(Fixed);
        let by_ref = &boxed;
        let sig = by_ref.sign(&SignRequest::new(&key, &[])).unwrap();
        assert_eq!(sig.as_bytes(), &[0x12, 0x34, 0x56, 0x78]);
    }

    #[test]
    fn configured_backend() {
        let config = SignConfig {
            padding: Padding::None,
            ..Default::default()
        };
        // n = 3233, d = 2753
        let key: KeyRecord = "mod 0ca1\nexp 11\nblob 0ac1".parse().unwrap();
        let sig = backend(&config).sign(&SignRequest::new(&key, &[0x41])).unwrap();
        assert_eq!(sig.as_bytes(), &[0x02, 0x4c]);
    }
}
