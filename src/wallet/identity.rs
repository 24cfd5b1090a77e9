//! Identity and signing
//!
//! SECURITY: This is the ONLY place where the private key exists.
//! - The key is held in p256's `SecretKey`, which zeroizes on drop
//! - The key is only exported on explicit request, wrapped in a `SecretString`
//! - The key is never logged and `Debug` output is redacted
//!
//! Signatures cover the amount text only (see [`Amount::signing_text`]).
//! Sender, receiver and nonce are NOT part of the signed message, so a
//! signature can be replayed for any transfer of the same amount.

use crate::wallet::{Address, Amount};
use crate::{Error, Result};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use p256::ecdsa::signature::{Signer, Verifier};
use p256::ecdsa::{Signature, SigningKey, VerifyingKey};
use p256::pkcs8::{DecodePrivateKey, DecodePublicKey, EncodePrivateKey, EncodePublicKey, LineEnding};
use p256::{PublicKey, SecretKey};
use rand::rngs::OsRng;
use secrecy::SecretString;

/// Lifecycle of an [`Identity`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentityState {
    Uninitialized,
    Ready,
}

/// PEM exports of the current keypair
#[derive(Debug)]
pub struct ExportedKeys {
    /// PKCS#8, unencrypted. Treat as a secret.
    pub private_pem: SecretString,
    /// SubjectPublicKeyInfo
    pub public_pem: String,
}

/// Private scalar and its public point, always replaced together
struct Keypair {
    secret: SecretKey,
    public: PublicKey,
}

impl Keypair {
    fn generate() -> Self {
        Self::from_secret(SecretKey::random(&mut OsRng))
    }

    fn from_secret(secret: SecretKey) -> Self {
        let public = secret.public_key();
        Self { secret, public }
    }

    fn public_pem(&self) -> Result<String> {
        self.public
            .to_public_key_pem(LineEnding::LF)
            .map_err(|e| Error::Crypto(format!("public key: {}", e)))
    }
}

/// Holder of at most one P-256 keypair
#[derive(Default)]
pub struct Identity {
    keys: Option<Keypair>,
}

impl Identity {
    /// An identity with no key loaded
    pub fn new() -> Self {
        Self::default()
    }

    /// An identity with a freshly generated key
    pub fn generate() -> Self {
        let mut identity = Self::new();
        identity.create();
        identity
    }

    pub fn state(&self) -> IdentityState {
        match self.keys {
            Some(_) => IdentityState::Ready,
            None => IdentityState::Uninitialized,
        }
    }

    /// Generate a new keypair, discarding any key currently held
    pub fn create(&mut self) {
        self.keys = Some(Keypair::generate());
    }

    /// Load an unencrypted private key from PEM
    ///
    /// Accepts PKCS#8 (`BEGIN PRIVATE KEY`) and, for keys written by older
    /// tools, SEC1 (`BEGIN EC PRIVATE KEY`). On failure the current key, if
    /// any, is left in place.
    pub fn import(&mut self, pem_text: &str) -> Result<()> {
        let pem_text = pem_text.trim();
        let secret = SecretKey::from_pkcs8_pem(pem_text)
            .or_else(|pkcs8_err| {
                if pem_text.contains("BEGIN EC PRIVATE KEY") {
                    SecretKey::from_sec1_pem(pem_text).map_err(|e| e.to_string())
                } else {
                    Err(pkcs8_err.to_string())
                }
            })
            .map_err(Error::KeyFormat)?;

        self.keys = Some(Keypair::from_secret(secret));
        Ok(())
    }

    /// Serialize the current keypair to PEM
    pub fn export(&self) -> Result<ExportedKeys> {
        let keys = self.keys()?;
        let private_pem = keys
            .secret
            .to_pkcs8_pem(LineEnding::LF)
            .map_err(|e| Error::Crypto(format!("private key: {}", e)))?;

        Ok(ExportedKeys {
            private_pem: SecretString::from(private_pem.to_string()),
            public_pem: keys.public_pem()?,
        })
    }

    /// SubjectPublicKeyInfo PEM of the current public key
    pub fn public_key_pem(&self) -> Result<String> {
        self.keys()?.public_pem()
    }

    /// Address of the current public key
    pub fn derive_address(&self) -> Result<Address> {
        let public_pem = self.public_key_pem()?;
        Ok(Address::from_public_pem(&public_pem))
    }

    /// Sign the text form of `amount`, returning base64 of the DER signature
    pub fn sign_amount(&self, amount: Amount) -> Result<String> {
        let keys = self.keys()?;
        let signing_key = SigningKey::from(&keys.secret);
        let signature: Signature = signing_key.sign(amount.signing_text().as_bytes());
        Ok(STANDARD.encode(signature.to_der().as_bytes()))
    }

    /// Verify a signature from [`Identity::sign_amount`] against this identity's key
    pub fn verify_amount(&self, amount: Amount, signature_b64: &str) -> Result<bool> {
        let keys = self.keys()?;
        Ok(verify_with_key(&keys.public, amount, signature_b64))
    }

    fn keys(&self) -> Result<&Keypair> {
        self.keys.as_ref().ok_or(Error::NoKeyLoaded)
    }
}

/// Verify an amount signature against a SubjectPublicKeyInfo PEM public key
///
/// Returns `Ok(false)` for signatures that are malformed or do not match;
/// only an unreadable public key is an error.
pub fn verify_amount(public_pem: &str, amount: Amount, signature_b64: &str) -> Result<bool> {
    let public = PublicKey::from_public_key_pem(public_pem.trim())
        .map_err(|e| Error::KeyFormat(format!("public key: {}", e)))?;
    Ok(verify_with_key(&public, amount, signature_b64))
}

fn verify_with_key(public: &PublicKey, amount: Amount, signature_b64: &str) -> bool {
    let Ok(der) = STANDARD.decode(signature_b64.trim()) else {
        return false;
    };
    let Ok(signature) = Signature::from_der(&der) else {
        return false;
    };
    VerifyingKey::from(public)
        .verify(amount.signing_text().as_bytes(), &signature)
        .is_ok()
}

// Implement Debug manually to avoid exposing the key
impl std::fmt::Debug for Identity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let address = self.derive_address().ok();
        f.debug_struct("Identity")
            .field("state", &self.state())
            .field("address", &address.as_ref().map(Address::as_str))
            .field("secret", &"[REDACTED]")
            .finish()
    }
}
