//! Keyed-hash algorithms (HMAC over SHA-3)

use crate::algorithm::Algorithm;
use crate::error::AlgorithmError;
use crate::keys::{Key, PrivateKey};

use constant_time_eq::constant_time_eq;
use hmac::{Hmac, Mac};
use sha3::{Digest, Sha3_256, Sha3_384, Sha3_512};

macro_rules! hmac_algorithm {
    ($(#[$doc:meta])* $alg:ident, $name:literal, $hash:ty) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy, Default)]
        pub struct $alg;

        impl $alg {
            /// Tag length in bytes
            pub fn tag_size() -> usize {
                <$hash as Digest>::output_size()
            }

            fn mac(context: &str, body: &[u8], secret: &[u8]) -> Result<Vec<u8>, AlgorithmError> {
                let mut mac = Hmac::<$hash>::new_from_slice(secret).map_err(|e| {
                    AlgorithmError::InvalidKey {
                        algorithm: $name.to_string(),
                        reason: e.to_string(),
                    }
                })?;
                mac.update(context.as_bytes());
                mac.update(body);
                Ok(mac.finalize().into_bytes().to_vec())
            }
        }

        impl Algorithm for $alg {
            fn name(&self) -> &str {
                $name
            }

            fn auth(
                &self,
                context: &str,
                body: &[u8],
                key: &PrivateKey,
            ) -> Result<Vec<u8>, AlgorithmError> {
                let secret = key.as_symmetric($name)?;
                Self::mac(context, body, secret.as_bytes())
            }

            fn verify(
                &self,
                context: &str,
                body: &[u8],
                key: &Key,
                tag: &[u8],
            ) -> Result<(), AlgorithmError> {
                let secret = key.as_symmetric($name)?;
                if tag.len() != Self::tag_size() {
                    return Err(AlgorithmError::TagInvalid {
                        expected: Self::tag_size(),
                        actual: tag.len(),
                    });
                }

                let expected = Self::mac(context, body, secret.as_bytes())?;
                if constant_time_eq(tag, &expected) {
                    Ok(())
                } else {
                    Err(AlgorithmError::WrongTag)
                }
            }
        }
    };
}

hmac_algorithm!(
    /// HS256 algorithm (HMAC with SHA3-256)
    HS256,
    "HS256",
    Sha3_256
);

hmac_algorithm!(
    /// HS384 algorithm (HMAC with SHA3-384)
    HS384,
    "HS384",
    Sha3_384
);

hmac_algorithm!(
    /// HS512 algorithm (HMAC with SHA3-512)
    HS512,
    "HS512",
    Sha3_512
);
