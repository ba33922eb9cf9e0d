use cosmwasm_std::{ensure, CanonicalAddr, StdError, Uint128};
use sale_std::error::ContractError;
use sha3::{Digest, Keccak256};

const ETH_MESSAGE_PREFIX: &[u8] = b"\x19Ethereum Signed Message:\n32";

/// Purchase right granted off-chain by the trusted signer.
///
/// Addresses are kept in their canonical form so the digest does not depend on
/// the chain's human readable prefix.
#[derive(Clone, Debug, PartialEq)]
pub struct AllocationTuple {
    pub buyer: CanonicalAddr,
    pub referral: CanonicalAddr,
    pub max_units: u32,
    pub unit_price: Uint128,
    pub is_guaranteed: bool,
}

impl AllocationTuple {
    /// Canonical encoding of the tuple:
    /// `len(buyer) || buyer || len(referral) || referral || u256(max_units) || u256(unit_price) || u8(is_guaranteed)`
    pub fn encode(&self) -> Result<Vec<u8>, ContractError> {
        let mut bytes = Vec::with_capacity(2 + self.buyer.len() + self.referral.len() + 65);
        push_address(&mut bytes, &self.buyer)?;
        push_address(&mut bytes, &self.referral)?;
        bytes.extend_from_slice(&u256_be(u128::from(self.max_units)));
        bytes.extend_from_slice(&u256_be(self.unit_price.u128()));
        bytes.push(u8::from(self.is_guaranteed));
        Ok(bytes)
    }

    pub fn digest(&self) -> Result<[u8; 32], ContractError> {
        Ok(keccak256(&self.encode()?))
    }

    /// The digest the signer actually signs.
    pub fn signed_digest(&self) -> Result<[u8; 32], ContractError> {
        Ok(eth_message_digest(&self.digest()?))
    }
}

fn push_address(bytes: &mut Vec<u8>, addr: &CanonicalAddr) -> Result<(), ContractError> {
    let len = u8::try_from(addr.len())
        .map_err(|_| StdError::generic_err("canonical address longer than 255 bytes"))?;
    bytes.push(len);
    bytes.extend_from_slice(addr.as_slice());
    Ok(())
}

fn u256_be(value: u128) -> [u8; 32] {
    let mut word = [0u8; 32];
    word[16..].copy_from_slice(&value.to_be_bytes());
    word
}

pub fn keccak256(data: &[u8]) -> [u8; 32] {
    Keccak256::digest(data).into()
}

/// Personal message digest of a 32 byte hash.
pub fn eth_message_digest(digest: &[u8; 32]) -> [u8; 32] {
    let mut hasher = Keccak256::new();
    hasher.update(ETH_MESSAGE_PREFIX);
    hasher.update(digest);
    hasher.finalize().into()
}

/// `0x` key hash of an uncompressed secp256k1 public key (65 bytes, `0x04` tag).
pub fn eth_address(public_key: &[u8]) -> Result<String, ContractError> {
    ensure!(
        public_key.len() == 65 && public_key[0] == 0x04,
        ContractError::InvalidSignature {}
    );
    let hash = keccak256(&public_key[1..]);
    Ok(format!("0x{}", hex::encode(&hash[12..])))
}
