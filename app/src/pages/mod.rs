mod liquidity;
mod mint;
mod staking;
mod swap;

pub use liquidity::Liquidity;
pub use mint::Mint;
pub use staking::Staking;
pub use swap::Swap;
