//! Fixed interfaces of the deployed contracts and the reads and actions the
//! pages perform with them.

pub mod exchange;
pub mod nft;
pub mod staking;

use alloy_primitives::{Address, U256};
use alloy_sol_types::SolCall;

use crate::error::Result;
use crate::provider::WalletProvider;
use crate::session::Session;
use crate::tx::Receipt;

/// Submits a one-step action.
async fn submit_call<W, C>(
    session: &Session<W>,
    success_message: &str,
    step: &str,
    to: Address,
    call: C,
    value: U256,
) -> Result<Receipt>
where
    W: WalletProvider,
    C: SolCall,
{
    session
        .submit_transaction(success_message, |signer| async move {
            signer.step(step, to, &call, value).await
        })
        .await
}
