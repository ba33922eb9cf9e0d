use cosmwasm_std::Binary;
use k256::ecdsa::SigningKey;
use sale_std::error::ContractError;

use crate::allocation::{eth_address, AllocationTuple};

/// Off-chain allocation signer. Produces the 65 byte `r || s || v` signatures
/// the sale contract verifies.
pub struct AllocationSigner {
    key: SigningKey,
}

impl AllocationSigner {
    pub fn from_seed(seed: &[u8; 32]) -> Result<Self, ContractError> {
        let key = SigningKey::from_slice(seed).map_err(|_| ContractError::InvalidSigner {
            signer: "invalid secret key".to_string(),
        })?;
        Ok(Self { key })
    }

    /// Key hash to configure as the sale's trusted signer.
    pub fn address(&self) -> Result<String, ContractError> {
        let point = self.key.verifying_key().to_encoded_point(false);
        eth_address(point.as_bytes())
    }

    pub fn sign(&self, tuple: &AllocationTuple) -> Result<Binary, ContractError> {
        let digest = tuple.signed_digest()?;
        let (signature, recovery_id) = self
            .key
            .sign_prehash_recoverable(&digest)
            .map_err(|_| ContractError::InvalidSignature {})?;
        let mut bytes = signature.to_bytes().to_vec();
        bytes.push(recovery_id.to_byte() + 27);
        Ok(Binary::from(bytes))
    }
}
