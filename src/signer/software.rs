//! Software emulation of signing with a TPM key blob
//!
//! The blob holds the big-endian RSA private exponent `d`, the signature is
//! `EM^d mod n` where `EM` is the padded data.

use super::{SignRequest, Signature, Signer};
use crate::config::Padding;
use crate::error::SignError;
use num_bigint::BigUint;
use num_traits::{One, Zero};

#[derive(Clone, Copy, Debug)]
pub struct SoftwareSigner {
    padding: Padding,
}

impl SoftwareSigner {
    // 0x00 || 0x01 || ps(at least 8 bytes) || 0x00
    const PKCS1_OVERHEAD: usize = 11;

    pub fn new(padding: Padding) -> Self {
        Self { padding }
    }

    fn encode(&self, data: &[u8], klen: usize, n: &BigUint) -> Result<BigUint, SignError> {
        match self.padding {
            Padding::Pkcs1 => {
                if klen < Self::PKCS1_OVERHEAD {
                    return Err(SignError::KeyTooShort(klen));
                }

                let max = klen - Self::PKCS1_OVERHEAD;
                if data.len() > max {
                    return Err(SignError::DataTooLarge {
                        max,
                        actual: data.len(),
                    });
                }

                // em = 0x00 || 0x01 || 0xff.. || 0x00 || data
                let (mut em, idx) = (vec![0xffu8; klen], klen - data.len());
                em[0] = 0x00;
                em[1] = 0x01;
                em[idx - 1] = 0x00;
                em[idx..].copy_from_slice(data);

                Ok(BigUint::from_bytes_be(em.as_slice()))
            }
            Padding::None => {
                let m = BigUint::from_bytes_be(data);
                if data.len() > klen || &m >= n {
                    Err(SignError::DataTooLarge {
                        max: klen,
                        actual: data.len(),
                    })
                } else {
                    Ok(m)
                }
            }
        }
    }
}

impl Signer for SoftwareSigner {
    fn sign(&self, req: &SignRequest) -> Result<Signature, SignError> {
        let (n, d) = (
            BigUint::from_bytes_be(req.key.modulus()),
            BigUint::from_bytes_be(req.key.blob()),
        );

        if n <= BigUint::one() {
            return Err(SignError::InvalidKey(format!(
                "rsa: modulus {n:#x} is too small"
            )));
        }

        if d.is_zero() {
            return Err(SignError::InvalidKey(
                "rsa: private exponent in the key blob is zero".to_string(),
            ));
        }

        let klen = ((n.bits() + 7) >> 3) as usize;
        let m = self.encode(req.data, klen, &n)?;
        log::debug!(
            "software sign: {klen} bytes modulus, {} bytes data, {:?} padding",
            req.data.len(),
            self.padding
        );

        let s = m.modpow(&d, &n).to_bytes_be();
        let mut sig = vec![0u8; klen - s.len()];
        sig.extend_from_slice(s.as_slice());

        Ok(Signature::from(sig))
    }
}

#[cfg(test)]
mod tests {
    use super::SoftwareSigner;
    use crate::config::Padding;
    use crate::error::SignError;
    use crate::key::KeyRecord;
    use crate::signer::{SignRequest, Signer};
    use num_bigint::BigUint;

    // 96 bits modulus, e = 0x10001
    const KEY: &str = "mod 8080000000198500000000cd\nexp 010001\nblob 206bab1454f1ba38a1c75e61\n";

    fn sign(padding: Padding, key: &KeyRecord, data: &[u8]) -> Result<Vec<u8>, SignError> {
        SoftwareSigner::new(padding)
            .sign(&SignRequest::new(key, data))
            .map(|s| s.as_bytes().to_vec())
    }

    #[test]
    fn pkcs1_sign() {
        let key: KeyRecord = KEY.parse().unwrap();

        let sig = sign(Padding::Pkcs1, &key, &[0xab]).unwrap();
        assert_eq!(hex::encode(&sig), "77c424a7ec34de018dfd52d0");

        let sig = sign(Padding::Pkcs1, &key, &[]).unwrap();
        assert_eq!(hex::encode(&sig), "32be26810f3644bac622983a");
    }

    #[test]
    fn pkcs1_verify_with_public_exponent() {
        let key: KeyRecord = KEY.parse().unwrap();
        let sig = sign(Padding::Pkcs1, &key, &[0xab]).unwrap();
        assert_eq!(sig.len(), 12);

        let (n, e) = (
            BigUint::from_bytes_be(key.modulus()),
            BigUint::from_bytes_be(key.exponent()),
        );
        let em = BigUint::from_bytes_be(sig.as_slice()).modpow(&e, &n).to_bytes_be();
        let mut target = vec![0x01];
        target.extend_from_slice(&[0xff; 8]);
        target.extend_from_slice(&[0x00, 0xab]);
        assert_eq!(em, target);
    }

    #[test]
    fn deterministic() {
        let key: KeyRecord = KEY.parse().unwrap();
        let s1 = sign(Padding::Pkcs1, &key, b"x").unwrap();
        let s2 = sign(Padding::Pkcs1, &key, b"x").unwrap();
        assert_eq!(s1, s2);
    }

    #[test]
    fn data_too_large() {
        let key: KeyRecord = KEY.parse().unwrap();
        assert_eq!(
            sign(Padding::Pkcs1, &key, &[1, 2]).unwrap_err(),
            SignError::DataTooLarge { max: 1, actual: 2 }
        );
        assert_eq!(
            sign(Padding::None, &key, &[0xff; 12]).unwrap_err(),
            SignError::DataTooLarge {
                max: 12,
                actual: 12
            }
        );
        assert_eq!(
            sign(Padding::None, &key, &[0x01; 13]).unwrap_err(),
            SignError::DataTooLarge {
                max: 12,
                actual: 13
            }
        );
    }

    #[test]
    fn raw_sign_is_left_padded() {
        // n = 3233, d = 2753, 0x41^d mod n = 0x024c
        let key: KeyRecord = "mod 0ca1\nexp 11\nblob 0ac1".parse().unwrap();
        assert_eq!(sign(Padding::None, &key, &[0x41]).unwrap(), vec![0x02, 0x4c]);
        // 1^d = 1
        assert_eq!(sign(Padding::None, &key, &[0x01]).unwrap(), vec![0x00, 0x01]);
    }

    #[test]
    fn short_key() {
        let key: KeyRecord = "mod 010203\nexp 010001\nblob 010203040506"
            .parse()
            .unwrap();
        assert_eq!(
            sign(Padding::Pkcs1, &key, &[]).unwrap_err(),
            SignError::KeyTooShort(3)
        );
    }

    #[test]
    fn invalid_key() {
        let key: KeyRecord = "mod 0001\nexp 03\nblob 05".parse().unwrap();
        assert!(matches!(
            sign(Padding::None, &key, &[]),
            Err(SignError::InvalidKey(_))
        ));

        let key: KeyRecord = "mod 0ca1\nexp 03\nblob 0000".parse().unwrap();
        assert!(matches!(
            sign(Padding::None, &key, &[]),
            Err(SignError::InvalidKey(_))
        ));
    }
}
