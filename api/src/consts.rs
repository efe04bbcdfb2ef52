use std::time::Duration;

use alloy_primitives::{address, Address, U256};

/// Addresses of the deployed contracts and the network they live on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Deployment {
    /// Chain id the wallet must be on.
    pub chain_id: u64,

    /// Human readable network name, shown when the wallet is on the wrong chain.
    pub network_name: &'static str,

    /// Random SVG NFT collection.
    pub nft: Address,

    /// NFT staking contract. Also the ERC-20 reward token.
    pub staking: Address,

    /// ETH / reward token exchange. Also the LP token.
    pub exchange: Address,
}

/// Rinkeby network with placeholder contract addresses.
///
/// The addresses are not a real deployment. Point `nft`, `staking` and
/// `exchange` at the deployed contracts (the CLI reads `NFT_ADDRESS`,
/// `STAKING_ADDRESS` and `EXCHANGE_ADDRESS`).
pub const RINKEBY: Deployment = Deployment {
    chain_id: 4,
    network_name: "Rinkeby",
    nft: address!("5f1e4e3b0c5d1a7a2b9e6c8d3f4a0b1c2d3e4f50"),
    staking: address!("8a3c9d2e1f0b4a5c6d7e8f9a0b1c2d3e4f5a6b7c"),
    exchange: address!("c4d5e6f7a8b9c0d1e2f3a4b5c6d7e8f9a0b1c2d3"),
};

/// Deployment the app and CLI talk to unless overridden.
pub const DEFAULT_DEPLOYMENT: Deployment = RINKEBY;

/// Refresh cadence of every on-chain view.
pub const POLL_INTERVAL: Duration = Duration::from_secs(5);

/// How often a pending transaction's receipt is looked up.
pub const RECEIPT_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// A transaction still without a receipt after this long counts as failed.
pub const RECEIPT_TIMEOUT: Duration = Duration::from_secs(600);

/// Time the randomness oracle needs before `completeMint` can succeed.
pub const MINT_FULFILLMENT_DELAY: Duration = Duration::from_secs(90);

/// Confirmations awaited for every state-changing step.
pub const CONFIRMATIONS: u64 = 1;

/// Subtracted from a swap quote to get the minimum accepted output (wei).
pub const SWAP_SLIPPAGE_WEI: U256 = U256::from_limbs([1000, 0, 0, 0]);

/// One ether in wei.
pub const WEI_PER_ETHER: U256 = U256::from_limbs([1_000_000_000_000_000_000, 0, 0, 0]);

/// Display precision: amounts are truncated to a multiple of this (0.001 ether).
pub const DISPLAY_UNIT_WEI: U256 = U256::from_limbs([1_000_000_000_000_000, 0, 0, 0]);

/// EIP-1193 error code for a request the user rejected.
pub const USER_REJECTED_CODE: i64 = 4001;
