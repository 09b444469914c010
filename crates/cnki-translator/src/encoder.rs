use aes::cipher::block_padding::Pkcs7;
use aes::cipher::{BlockEncryptMut, KeyInit};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;

type Aes128EcbEnc = ecb::Encryptor<aes::Aes128>;

/// Key the service expects, not a secret
const DEFAULT_KEY: [u8; 16] = *b"4e87183cfd3a45fe";

/// Encodes chunks into the `words` field: AES-128-ECB, PKCS#7, URL-safe base64.
///
/// ECB carries no integrity check; this only matches the wire format.
#[derive(Debug, Clone)]
pub struct TextEncoder {
    key: [u8; 16],
}

impl Default for TextEncoder {
    fn default() -> Self {
        Self { key: DEFAULT_KEY }
    }
}

impl TextEncoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_key(key: [u8; 16]) -> Self {
        Self { key }
    }

    pub fn encode(&self, text: &str) -> String {
        let ciphertext =
            Aes128EcbEnc::new(&self.key.into()).encrypt_padded_vec_mut::<Pkcs7>(text.as_bytes());

        STANDARD.encode(ciphertext).replace('/', "_").replace('+', "-")
    }
}
