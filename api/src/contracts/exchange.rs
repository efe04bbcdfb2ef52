use alloy_primitives::U256;
use alloy_sol_types::sol;

use super::{staking::INftStaking, submit_call};
use crate::consts::SWAP_SLIPPAGE_WEI;
use crate::error::Result;
use crate::provider::WalletProvider;
use crate::session::{ReadOnlyView, Session};
use crate::tx::Receipt;

sol! {
    interface IExchange {
        function getReserves() external view returns (uint256 ethReserve, uint256 tokenReserve);
        function getSwapAmount(uint256 inputAmount, uint256 inputReserve, uint256 outputReserve) external pure returns (uint256);

        // LP token (ERC-20)
        function totalSupply() external view returns (uint256);
        function balanceOf(address account) external view returns (uint256);

        function addLiquidity(uint256 tokenAmount) external payable returns (uint256);
        function removeLiquidity(uint256 lpAmount) external returns (uint256, uint256);
        function swapEthForToken(uint256 minTokens) external payable;
        function swapTokenForEth(uint256 tokensSold, uint256 minEth) external;
    }
}

pub const ADD_LIQUIDITY_SUCCESS: &str = "Congrats, you have added liquidity!";
pub const REMOVE_LIQUIDITY_SUCCESS: &str = "You have successfully removed liquidity!";
pub const SWAP_SUCCESS: &str = "Congrats, you have swapped some tokens!";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Reserves {
    pub eth: U256,
    pub token: U256,
}

/// Holdings of the connected account, all in wei.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AccountBalances {
    pub eth: U256,
    pub token: U256,
    pub lp: U256,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SwapDirection {
    #[default]
    EthToToken,
    TokenToEth,
}

pub async fn reserves<W: WalletProvider>(view: &ReadOnlyView<W>) -> Result<Reserves> {
    let exchange = view.deployment().exchange;
    let reserves = view.call(exchange, &IExchange::getReservesCall {}).await?;
    Ok(Reserves {
        eth: reserves.ethReserve,
        token: reserves.tokenReserve,
    })
}

pub async fn lp_supply<W: WalletProvider>(view: &ReadOnlyView<W>) -> Result<U256> {
    let exchange = view.deployment().exchange;
    Ok(view.call(exchange, &IExchange::totalSupplyCall {}).await?._0)
}

pub async fn account_balances<W: WalletProvider>(view: &ReadOnlyView<W>) -> Result<AccountBalances> {
    let deployment = *view.deployment();
    let account = view.owner()?;

    let eth = view.balance(account).await?;
    let token = view
        .call(deployment.staking, &INftStaking::balanceOfCall { account })
        .await?
        ._0;
    let lp = view
        .call(deployment.exchange, &IExchange::balanceOfCall { account })
        .await?
        ._0;
    Ok(AccountBalances { eth, token, lp })
}

/// Output the exchange gives for `amount` at the current reserves.
pub async fn swap_quote<W: WalletProvider>(
    view: &ReadOnlyView<W>,
    amount: U256,
    direction: SwapDirection,
) -> Result<U256> {
    let exchange = view.deployment().exchange;
    let pool = reserves(view).await?;
    let (input_reserve, output_reserve) = match direction {
        SwapDirection::EthToToken => (pool.eth, pool.token),
        SwapDirection::TokenToEth => (pool.token, pool.eth),
    };
    let call = IExchange::getSwapAmountCall {
        inputAmount: amount,
        inputReserve: input_reserve,
        outputReserve: output_reserve,
    };
    Ok(view.call(exchange, &call).await?._0)
}

/// Tokens that must accompany `eth` to keep the pool ratio.
///
/// `None` while the pool is empty: the first provider picks the ratio.
pub fn liquidity_token_amount(eth: U256, pool: Reserves) -> Option<U256> {
    if pool.eth.is_zero() {
        return None;
    }
    eth.checked_mul(pool.token).map(|scaled| scaled / pool.eth)
}

/// ETH and tokens returned for burning `lp` LP tokens.
pub fn removal_returns(lp: U256, pool: Reserves, lp_supply: U256) -> (U256, U256) {
    if lp_supply.is_zero() {
        return (U256::ZERO, U256::ZERO);
    }
    let share = |reserve: U256| {
        lp.checked_mul(reserve)
            .map(|scaled| scaled / lp_supply)
            .unwrap_or_default()
    };
    (share(pool.eth), share(pool.token))
}

/// Smallest output accepted for a quoted swap.
pub fn min_output(quote: U256) -> U256 {
    quote.saturating_sub(SWAP_SLIPPAGE_WEI)
}

/// Approves the exchange to pull `token_amount`, then deposits it with `eth`.
///
/// If the deposit fails the approval stays in place.
pub async fn add_liquidity<W: WalletProvider>(
    session: &Session<W>,
    token_amount: U256,
    eth: U256,
) -> Result<Receipt> {
    session
        .submit_transaction(ADD_LIQUIDITY_SUCCESS, |signer| async move {
            let deployment = *signer.deployment();
            let approve = INftStaking::approveCall {
                spender: deployment.exchange,
                amount: token_amount,
            };
            signer
                .step("approve", deployment.staking, &approve, U256::ZERO)
                .await?;

            let add = IExchange::addLiquidityCall {
                tokenAmount: token_amount,
            };
            signer
                .step("addLiquidity", deployment.exchange, &add, eth)
                .await
        })
        .await
}

pub async fn remove_liquidity<W: WalletProvider>(session: &Session<W>, lp: U256) -> Result<Receipt> {
    let exchange = session.deployment().exchange;
    let call = IExchange::removeLiquidityCall { lpAmount: lp };
    submit_call(
        session,
        REMOVE_LIQUIDITY_SUCCESS,
        "removeLiquidity",
        exchange,
        call,
        U256::ZERO,
    )
    .await
}

/// Swaps `amount` at the current quote minus slippage.
///
/// Selling tokens needs an approval first.
pub async fn swap<W: WalletProvider>(
    session: &Session<W>,
    direction: SwapDirection,
    amount: U256,
) -> Result<Receipt> {
    session
        .submit_transaction(SWAP_SUCCESS, |signer| async move {
            let deployment = *signer.deployment();
            let quote = swap_quote(signer.reader(), amount, direction).await?;
            let minimum = min_output(quote);

            match direction {
                SwapDirection::EthToToken => {
                    let call = IExchange::swapEthForTokenCall { minTokens: minimum };
                    signer
                        .step("swapEthForToken", deployment.exchange, &call, amount)
                        .await
                }
                SwapDirection::TokenToEth => {
                    let approve = INftStaking::approveCall {
                        spender: deployment.exchange,
                        amount,
                    };
                    signer
                        .step("approve", deployment.staking, &approve, U256::ZERO)
                        .await?;

                    let call = IExchange::swapTokenForEthCall {
                        tokensSold: amount,
                        minEth: minimum,
                    };
                    signer
                        .step("swapTokenForEth", deployment.exchange, &call, U256::ZERO)
                        .await
                }
            }
        })
        .await
}
