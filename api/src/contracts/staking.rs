use alloy_primitives::U256;
use alloy_sol_types::sol;

use super::{nft, submit_call};
use crate::error::Result;
use crate::provider::WalletProvider;
use crate::session::{ReadOnlyView, Session};
use crate::tx::Receipt;

sol! {
    interface INftStaking {
        function rewardPerDay() external view returns (uint256);
        function getAvailableRewards(address staker) external view returns (uint256);
        function tokenIdStaked(uint256 tokenId) external view returns (bool);
        function addressToStaker(address staker) external view returns (uint256 stakedAmount, uint256 timeOfLastUpdate, uint256 unclaimedRewards);
        function getStakedTokenIdList(address staker) external view returns (uint256[] memory);

        // Reward token (ERC-20)
        function balanceOf(address account) external view returns (uint256);
        function approve(address spender, uint256 amount) external returns (bool);

        function stake(uint256 tokenId) external;
        function stakeAll() external;
        function unstake(uint256 tokenId) external;
        function unstakeAll() external;
        function claimRewards() external;
    }
}

pub const STAKE_SUCCESS: &str = "Congrats, you have staked your NFT!";
pub const STAKE_ALL_SUCCESS: &str = "Congrats, you have staked all your NFT(s)!";
pub const UNSTAKE_SUCCESS: &str = "You have unstaked your NFT!";
pub const UNSTAKE_ALL_SUCCESS: &str = "You have unstaked all your NFT(s)!";
pub const CLAIM_SUCCESS: &str = "Congrats, you have claimed all your reward tokens!";

/// Reward tokens (wei) earned per staked NFT per day.
pub async fn reward_per_day<W: WalletProvider>(view: &ReadOnlyView<W>) -> Result<U256> {
    let staking = view.deployment().staking;
    Ok(view.call(staking, &INftStaking::rewardPerDayCall {}).await?._0)
}

pub async fn claimable_reward<W: WalletProvider>(view: &ReadOnlyView<W>) -> Result<U256> {
    let staking = view.deployment().staking;
    let staker = view.owner()?;
    Ok(view
        .call(staking, &INftStaking::getAvailableRewardsCall { staker })
        .await?
        ._0)
}

pub async fn is_staked<W: WalletProvider>(view: &ReadOnlyView<W>, token_id: U256) -> Result<bool> {
    let staking = view.deployment().staking;
    Ok(view
        .call(staking, &INftStaking::tokenIdStakedCall { tokenId: token_id })
        .await?
        ._0)
}

/// Whether the connected account has anything staked.
pub async fn has_staked<W: WalletProvider>(view: &ReadOnlyView<W>) -> Result<bool> {
    let staking = view.deployment().staking;
    let staker = view.owner()?;
    let info = view
        .call(staking, &INftStaking::addressToStakerCall { staker })
        .await?;
    Ok(!info.stakedAmount.is_zero())
}

pub async fn staked_token_ids<W: WalletProvider>(view: &ReadOnlyView<W>) -> Result<Vec<U256>> {
    let staking = view.deployment().staking;
    let staker = view.owner()?;
    Ok(view
        .call(staking, &INftStaking::getStakedTokenIdListCall { staker })
        .await?
        ._0)
}

/// Tokens the connected account owns but has not staked.
pub async fn unstaked_token_ids<W: WalletProvider>(view: &ReadOnlyView<W>) -> Result<Vec<U256>> {
    let collection = view.deployment().nft;
    let owner = view.owner()?;
    let count = nft::owned_count(view).await?.saturating_to::<u64>();

    let mut token_ids = Vec::new();
    for index in 0..count {
        let token_id = view
            .call(
                collection,
                &nft::IRandomSvgNft::tokenOfOwnerByIndexCall {
                    owner,
                    index: U256::from(index),
                },
            )
            .await?
            ._0;
        if !is_staked(view, token_id).await? {
            token_ids.push(token_id);
        }
    }
    Ok(token_ids)
}

/// Number of staked tokens across the whole collection. Token ids start at 1.
pub async fn staked_count<W: WalletProvider>(view: &ReadOnlyView<W>) -> Result<u64> {
    let supply = nft::total_supply(view).await?.saturating_to::<u64>();
    let mut staked = 0;
    for token_id in 1..=supply {
        if is_staked(view, U256::from(token_id)).await? {
            staked += 1;
        }
    }
    Ok(staked)
}

/// Reward token balance in wei.
pub async fn token_balance<W: WalletProvider>(view: &ReadOnlyView<W>) -> Result<U256> {
    let staking = view.deployment().staking;
    let account = view.owner()?;
    Ok(view
        .call(staking, &INftStaking::balanceOfCall { account })
        .await?
        ._0)
}

pub async fn stake<W: WalletProvider>(session: &Session<W>, token_id: U256) -> Result<Receipt> {
    let staking = session.deployment().staking;
    let call = INftStaking::stakeCall { tokenId: token_id };
    submit_call(session, STAKE_SUCCESS, "stake", staking, call, U256::ZERO).await
}

pub async fn stake_all<W: WalletProvider>(session: &Session<W>) -> Result<Receipt> {
    let staking = session.deployment().staking;
    let call = INftStaking::stakeAllCall {};
    submit_call(session, STAKE_ALL_SUCCESS, "stakeAll", staking, call, U256::ZERO).await
}

pub async fn unstake<W: WalletProvider>(session: &Session<W>, token_id: U256) -> Result<Receipt> {
    let staking = session.deployment().staking;
    let call = INftStaking::unstakeCall { tokenId: token_id };
    submit_call(session, UNSTAKE_SUCCESS, "unstake", staking, call, U256::ZERO).await
}

pub async fn unstake_all<W: WalletProvider>(session: &Session<W>) -> Result<Receipt> {
    let staking = session.deployment().staking;
    let call = INftStaking::unstakeAllCall {};
    submit_call(session, UNSTAKE_ALL_SUCCESS, "unstakeAll", staking, call, U256::ZERO).await
}

pub async fn claim_rewards<W: WalletProvider>(session: &Session<W>) -> Result<Receipt> {
    let staking = session.deployment().staking;
    let call = INftStaking::claimRewardsCall {};
    submit_call(session, CLAIM_SUCCESS, "claimRewards", staking, call, U256::ZERO).await
}
