//! In-process Ed25519 key vault
//!
//! A software stand-in for the external Key Vault collaborator: it owns
//! signing keys, hands out only `KeyRef` handles and public keys, and
//! refuses revoked material. Deployments backed by an HSM implement
//! `KeyVaultEffects` against their device instead.

use async_trait::async_trait;
use custos_core::{
    ActorId, CustosError, CustosResult, KeyRef, KeyVaultEffects, PublicKey, Signature,
};
use ed25519_dalek::{Signer, SigningKey};
use parking_lot::{Mutex, RwLock};
use rand_chacha::ChaCha20Rng;
use rand_core::SeedableRng;
use std::collections::HashMap;

struct VaultEntry {
    owner: ActorId,
    signing_key: SigningKey,
    revoked: bool,
}

/// Software key vault holding Ed25519 keys in process memory
pub struct SoftwareKeyVault {
    entries: RwLock<HashMap<KeyRef, VaultEntry>>,
    rng: Mutex<ChaCha20Rng>,
}

impl SoftwareKeyVault {
    /// Vault seeded from OS entropy
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            rng: Mutex::new(ChaCha20Rng::from_entropy()),
        }
    }

    /// Vault with a fixed seed for reproducible key generation
    pub fn from_seed(seed: u64) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            rng: Mutex::new(ChaCha20Rng::seed_from_u64(seed)),
        }
    }

    /// Retire a key; later `sign` and `public_key` calls refuse it
    pub fn revoke(&self, key_ref: KeyRef) -> CustosResult<()> {
        let mut entries = self.entries.write();
        let entry = entries
            .get_mut(&key_ref)
            .ok_or_else(|| CustosError::key_not_found(format!("{key_ref} is not in the vault")))?;
        entry.revoked = true;
        tracing::info!(%key_ref, owner = %entry.owner, "key revoked");
        Ok(())
    }

    /// The owner registered for a key
    pub fn owner_of(&self, key_ref: KeyRef) -> Option<ActorId> {
        self.entries.read().get(&key_ref).map(|entry| entry.owner)
    }
}

impl Default for SoftwareKeyVault {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl KeyVaultEffects for SoftwareKeyVault {
    async fn generate_key_pair(&self, owner: ActorId) -> CustosResult<(KeyRef, PublicKey)> {
        let signing_key = {
            let mut rng = self.rng.lock();
            SigningKey::generate(&mut *rng)
        };
        let public_key =
            PublicKey::from_bytes(signing_key.verifying_key().to_bytes().to_vec())?;
        let key_ref = KeyRef::new();
        self.entries.write().insert(
            key_ref,
            VaultEntry {
                owner,
                signing_key,
                revoked: false,
            },
        );
        tracing::debug!(%key_ref, %owner, "key pair generated");
        Ok((key_ref, public_key))
    }

    async fn sign(&self, data: &[u8], key_ref: KeyRef) -> CustosResult<Signature> {
        let entries = self.entries.read();
        let entry = entries
            .get(&key_ref)
            .ok_or_else(|| CustosError::key_not_found(format!("{key_ref} is not in the vault")))?;
        if entry.revoked {
            return Err(CustosError::key_revoked(format!(
                "{key_ref} was revoked and no longer signs"
            )));
        }
        Signature::from_bytes(entry.signing_key.sign(data).to_bytes().to_vec())
    }

    async fn public_key(&self, key_ref: KeyRef) -> CustosResult<PublicKey> {
        let entries = self.entries.read();
        let entry = entries
            .get(&key_ref)
            .ok_or_else(|| CustosError::key_not_found(format!("{key_ref} is not in the vault")))?;
        if entry.revoked {
            return Err(CustosError::key_revoked(format!(
                "{key_ref} was revoked; its signatures no longer verify"
            )));
        }
        PublicKey::from_bytes(entry.signing_key.verifying_key().to_bytes().to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use custos_core::crypto::ed25519_verify;

    #[tokio::test]
    async fn test_generate_sign_verify_roundtrip() {
        let vault = SoftwareKeyVault::from_seed(42);
        let owner = ActorId::new();
        let (key_ref, public_key) = vault.generate_key_pair(owner).await.unwrap();

        let message = b"canonical transaction hash";
        let signature = vault.sign(message, key_ref).await.unwrap();
        assert!(ed25519_verify(message, &signature, &public_key).unwrap());
        assert_eq!(vault.owner_of(key_ref), Some(owner));
    }

    #[tokio::test]
    async fn test_unknown_key_refused() {
        let vault = SoftwareKeyVault::from_seed(42);
        let err = vault.sign(b"data", KeyRef::new()).await.unwrap_err();
        assert_matches!(err, CustosError::KeyNotFound { .. });
    }

    #[tokio::test]
    async fn test_revoked_key_refused() {
        let vault = SoftwareKeyVault::from_seed(42);
        let (key_ref, _) = vault.generate_key_pair(ActorId::new()).await.unwrap();
        vault.revoke(key_ref).unwrap();

        assert_matches!(
            vault.sign(b"data", key_ref).await.unwrap_err(),
            CustosError::KeyRevoked { .. }
        );
        assert_matches!(
            vault.public_key(key_ref).await.unwrap_err(),
            CustosError::KeyRevoked { .. }
        );
    }

    #[tokio::test]
    async fn test_seeded_vault_is_reproducible() {
        let first = SoftwareKeyVault::from_seed(7);
        let second = SoftwareKeyVault::from_seed(7);
        let owner = ActorId::new();
        let (_, key_a) = first.generate_key_pair(owner).await.unwrap();
        let (_, key_b) = second.generate_key_pair(owner).await.unwrap();
        assert_eq!(key_a, key_b);
    }
}
