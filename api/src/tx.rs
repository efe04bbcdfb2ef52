use std::rc::Rc;

use alloy_primitives::{Address, Bytes, B256, U64};
use alloy_sol_types::SolEvent;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::consts::{RECEIPT_POLL_INTERVAL, RECEIPT_TIMEOUT};
use crate::error::{ProviderError, Result, SessionError};
use crate::provider::{request_as, WalletProvider};
use crate::timer::Timer;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Log {
    pub address: Address,
    pub topics: Vec<B256>,
    pub data: Bytes,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Receipt {
    pub transaction_hash: B256,
    #[serde(default)]
    pub block_number: Option<U64>,
    #[serde(default)]
    pub status: Option<U64>,
    #[serde(default)]
    pub logs: Vec<Log>,
}

impl Receipt {
    pub fn succeeded(&self) -> bool {
        // Receipts without a status field predate Byzantium and cannot revert.
        self.status.map_or(true, |status| status == U64::from(1))
    }

    /// First `E` event emitted by `emitter` in this transaction.
    pub fn decode_log<E: SolEvent>(&self, emitter: Address) -> Option<E> {
        self.logs
            .iter()
            .filter(|log| log.address == emitter)
            .filter(|log| log.topics.first() == Some(&E::SIGNATURE_HASH))
            .find_map(|log| E::decode_raw_log(log.topics.iter().copied(), &log.data, true).ok())
    }
}

/// A broadcast transaction that may not be mined yet.
pub struct PendingTx<W> {
    wallet: Rc<W>,
    timer: Rc<dyn Timer>,
    step: String,
    hash: B256,
}

impl<W: WalletProvider> PendingTx<W> {
    pub(crate) fn new(wallet: Rc<W>, timer: Rc<dyn Timer>, step: &str, hash: B256) -> Self {
        Self {
            wallet,
            timer,
            step: step.to_string(),
            hash,
        }
    }

    pub fn hash(&self) -> B256 {
        self.hash
    }

    /// Waits until the transaction is `confirmations` blocks deep.
    ///
    /// Failed receipt lookups are retried on the next tick. A reverted
    /// transaction, or one without a receipt after [`RECEIPT_TIMEOUT`], fails
    /// with [`SessionError::TransactionFailed`].
    pub async fn confirmed(self, confirmations: u64) -> Result<Receipt> {
        let confirmations = confirmations.max(1);
        let attempts = (RECEIPT_TIMEOUT.as_millis() / RECEIPT_POLL_INTERVAL.as_millis()).max(1);
        for _ in 0..attempts {
            match self.lookup(confirmations).await {
                Ok(Some(receipt)) => return self.finish(receipt),
                Ok(None) => {}
                Err(err) if err.is_user_rejection() => {
                    return Err(SessionError::transaction(&self.step, err));
                }
                Err(err) => {
                    tracing::warn!(step = %self.step, hash = %self.hash, error = %err, "receipt lookup failed");
                }
            }
            self.timer.sleep(RECEIPT_POLL_INTERVAL).await;
        }

        tracing::warn!(step = %self.step, hash = %self.hash, "no receipt before timeout");
        Err(SessionError::TransactionFailed {
            step: self.step.clone(),
            reason: format!("no receipt after {}s", RECEIPT_TIMEOUT.as_secs()),
        })
    }

    /// The receipt, once it is deep enough.
    async fn lookup(&self, confirmations: u64) -> Result<Option<Receipt>, ProviderError> {
        let receipt: Option<Receipt> =
            request_as(&*self.wallet, "eth_getTransactionReceipt", json!([self.hash])).await?;
        let Some(mined_in) = receipt.as_ref().and_then(|r| r.block_number) else {
            return Ok(None);
        };
        if self.depth(mined_in.to::<u64>(), confirmations).await? >= confirmations {
            Ok(receipt)
        } else {
            Ok(None)
        }
    }

    async fn depth(&self, mined_in: u64, confirmations: u64) -> Result<u64, ProviderError> {
        if confirmations == 1 {
            return Ok(1);
        }
        let head: U64 = request_as(&*self.wallet, "eth_blockNumber", json!([])).await?;
        Ok(head.to::<u64>().saturating_sub(mined_in) + 1)
    }

    fn finish(&self, receipt: Receipt) -> Result<Receipt> {
        if !receipt.succeeded() {
            tracing::warn!(step = %self.step, hash = %self.hash, "transaction reverted");
            return Err(SessionError::TransactionFailed {
                step: self.step.clone(),
                reason: "transaction reverted".to_string(),
            });
        }
        tracing::info!(step = %self.step, hash = %self.hash, "transaction confirmed");
        Ok(receipt)
    }
}

#[cfg(test)]
mod tests {
    use alloy_primitives::{address, U256};
    use serde_json::json;

    use super::*;
    use crate::contracts::nft::IRandomSvgNft::RequestedRandomSVG;
    use crate::contracts::staking::INftStaking;
    use crate::testing::{session, MockWallet};

    const NFT: Address = address!("5f1e4e3b0c5d1a7a2b9e6c8d3f4a0b1c2d3e4f50");

    fn mint_log(emitter: Address, token_id: u64) -> Log {
        Log {
            address: emitter,
            topics: vec![
                RequestedRandomSVG::SIGNATURE_HASH,
                B256::repeat_byte(0x11),
                B256::from(U256::from(token_id).to_be_bytes::<32>()),
            ],
            data: Bytes::new(),
        }
    }

    #[test]
    fn decodes_rpc_receipt() {
        let receipt: Receipt = serde_json::from_value(json!({
            "transactionHash": format!("{:#x}", B256::repeat_byte(0xab)),
            "blockNumber": "0x10",
            "status": "0x0",
            "logs": [],
            "gasUsed": "0x5208"
        }))
        .unwrap();
        assert_eq!(receipt.block_number, Some(U64::from(16)));
        assert!(!receipt.succeeded());
    }

    #[test]
    fn finds_event_from_emitter() {
        let receipt = Receipt {
            transaction_hash: B256::ZERO,
            block_number: Some(U64::from(1)),
            status: Some(U64::from(1)),
            logs: vec![mint_log(Address::ZERO, 3), mint_log(NFT, 7)],
        };

        let event = receipt.decode_log::<RequestedRandomSVG>(NFT).unwrap();
        assert_eq!(event.tokenId, U256::from(7));
        assert_eq!(event.requestId, B256::repeat_byte(0x11));
        assert!(receipt
            .decode_log::<RequestedRandomSVG>(address!("00000000000000000000000000000000000000ff"))
            .is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn receipt_lookup_error_is_retried() {
        let (session, notifier) = session(MockWallet::new(4));
        session.connect().await.unwrap();
        session.wallet().fail_receipt_lookups(1);

        let staking = session.deployment().staking;
        let result = session
            .submit_transaction("claimed", move |signer| async move {
                signer
                    .step("claimRewards", staking, &INftStaking::claimRewardsCall {}, U256::ZERO)
                    .await
            })
            .await;

        assert!(result.unwrap().succeeded());
        assert_eq!(session.wallet().count("eth_getTransactionReceipt"), 2);
        assert_eq!(notifier.notices().len(), 1);
        assert_eq!(notifier.notices()[0].level, crate::notify::NoticeLevel::Success);
    }

    #[tokio::test(start_paused = true)]
    async fn missing_receipt_times_out() {
        let (session, _) = session(MockWallet::new(4));
        session.connect().await.unwrap();
        session.wallet().withhold_receipts(true);

        let staking = session.deployment().staking;
        let signer = session.signer().await.unwrap();
        let result = signer
            .step("claimRewards", staking, &INftStaking::claimRewardsCall {}, U256::ZERO)
            .await;

        assert!(matches!(
            result,
            Err(SessionError::TransactionFailed { ref step, .. }) if step == "claimRewards"
        ));
        let lookups = (RECEIPT_TIMEOUT.as_secs() / RECEIPT_POLL_INTERVAL.as_secs()) as usize;
        assert_eq!(session.wallet().count("eth_getTransactionReceipt"), lookups);
    }
}
