//! Key Vault effect interface
//!
//! The vault owns all asymmetric key material. Custos only ever sees
//! `KeyRef` handles, public keys, and signature values. Vault calls may be
//! slow (HSM, network) and must never run inside the per-transaction
//! exclusivity boundary.

use crate::crypto::{PublicKey, Signature};
use crate::errors::CustosResult;
use crate::identifiers::{ActorId, KeyRef};
use async_trait::async_trait;
use std::sync::Arc;

/// Asymmetric key custody operations
#[async_trait]
pub trait KeyVaultEffects: Send + Sync {
    /// Generate a key pair for an owner, returning the handle and public key
    async fn generate_key_pair(&self, owner: ActorId) -> CustosResult<(KeyRef, PublicKey)>;

    /// Sign `data` with the referenced key
    ///
    /// Fails with `KeyNotFound` for unknown handles and `KeyRevoked` for
    /// keys retired by vault policy.
    async fn sign(&self, data: &[u8], key_ref: KeyRef) -> CustosResult<Signature>;

    /// Fetch the public key for a handle
    ///
    /// Revoked keys fail with `KeyRevoked`; their signatures must not
    /// verify anymore.
    async fn public_key(&self, key_ref: KeyRef) -> CustosResult<PublicKey>;
}

#[async_trait]
impl<T: KeyVaultEffects + ?Sized> KeyVaultEffects for Arc<T> {
    async fn generate_key_pair(&self, owner: ActorId) -> CustosResult<(KeyRef, PublicKey)> {
        (**self).generate_key_pair(owner).await
    }

    async fn sign(&self, data: &[u8], key_ref: KeyRef) -> CustosResult<Signature> {
        (**self).sign(data, key_ref).await
    }

    async fn public_key(&self, key_ref: KeyRef) -> CustosResult<PublicKey> {
        (**self).public_key(key_ref).await
    }
}
