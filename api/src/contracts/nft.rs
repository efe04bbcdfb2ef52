use alloy_primitives::U256;
use alloy_sol_types::sol;

use crate::consts::MINT_FULFILLMENT_DELAY;
use crate::error::{Result, SessionError};
use crate::notify::Notice;
use crate::provider::WalletProvider;
use crate::session::{ReadOnlyView, Session};

sol! {
    interface IRandomSvgNft {
        event RequestedRandomSVG(bytes32 indexed requestId, uint256 indexed tokenId);

        function totalSupply() external view returns (uint256);
        function maxSupply() external view returns (uint256);
        function mintPriceWei() external view returns (uint256);
        function balanceOf(address owner) external view returns (uint256);
        function tokenOfOwnerByIndex(address owner, uint256 index) external view returns (uint256);
        function create() external payable returns (bytes32 requestId);
        function completeMint(uint256 tokenId) external;
    }
}

pub const MINT_STARTED: &str = "You have initiated the mint, there will be another transaction to approve in a couple minutes to complete the mint!";
pub const MINT_SUCCESS: &str = "Congrats, you have minted a random NFT!";

pub async fn total_supply<W: WalletProvider>(view: &ReadOnlyView<W>) -> Result<U256> {
    let nft = view.deployment().nft;
    Ok(view.call(nft, &IRandomSvgNft::totalSupplyCall {}).await?._0)
}

pub async fn max_supply<W: WalletProvider>(view: &ReadOnlyView<W>) -> Result<U256> {
    let nft = view.deployment().nft;
    Ok(view.call(nft, &IRandomSvgNft::maxSupplyCall {}).await?._0)
}

/// Price of one mint in wei.
pub async fn mint_price<W: WalletProvider>(view: &ReadOnlyView<W>) -> Result<U256> {
    let nft = view.deployment().nft;
    Ok(view.call(nft, &IRandomSvgNft::mintPriceWeiCall {}).await?._0)
}

/// Number of NFTs held by the connected account.
pub async fn owned_count<W: WalletProvider>(view: &ReadOnlyView<W>) -> Result<U256> {
    let nft = view.deployment().nft;
    let owner = view.owner()?;
    Ok(view.call(nft, &IRandomSvgNft::balanceOfCall { owner }).await?._0)
}

pub fn minted_out(minted: U256, max_supply: U256) -> bool {
    !max_supply.is_zero() && minted >= max_supply
}

/// Mints one NFT.
///
/// `create` pays the mint price and requests randomness; once the oracle had
/// time to answer, `completeMint` finalizes the token. Returns the token id.
pub async fn mint<W: WalletProvider>(session: &Session<W>) -> Result<U256> {
    session
        .submit_transaction(MINT_SUCCESS, |signer| async move {
            let nft = signer.deployment().nft;
            let price = mint_price(signer.reader()).await?;

            let receipt = signer
                .step("create", nft, &IRandomSvgNft::createCall {}, price)
                .await?;
            let token_id = receipt
                .decode_log::<IRandomSvgNft::RequestedRandomSVG>(nft)
                .map(|event| event.tokenId)
                .ok_or_else(|| SessionError::TransactionFailed {
                    step: "create".to_string(),
                    reason: "receipt has no RequestedRandomSVG event".to_string(),
                })?;
            tracing::info!(%token_id, "randomness requested");

            signer.notify(Notice::info(MINT_STARTED));
            signer.sleep(MINT_FULFILLMENT_DELAY).await;

            signer
                .step(
                    "completeMint",
                    nft,
                    &IRandomSvgNft::completeMintCall { tokenId: token_id },
                    U256::ZERO,
                )
                .await?;
            Ok(token_id)
        })
        .await
}

#[cfg(test)]
mod tests {
    use alloy_primitives::{Bytes, B256};
    use alloy_sol_types::{SolCall, SolEvent, SolValue};

    use super::*;
    use crate::consts::RINKEBY;
    use crate::notify::NoticeLevel;
    use crate::session::SessionState;
    use crate::testing::{session, MockWallet, ALICE};
    use crate::tx::Log;

    fn price() -> U256 {
        U256::from(50_000_000_000_000_000u64)
    }

    fn wallet_with_mint(token_id: u64) -> MockWallet {
        let wallet = MockWallet::new(4);
        wallet.on_call(
            RINKEBY.nft,
            IRandomSvgNft::mintPriceWeiCall {},
            price().abi_encode(),
        );
        wallet.emit_on::<IRandomSvgNft::createCall>(Log {
            address: RINKEBY.nft,
            topics: vec![
                IRandomSvgNft::RequestedRandomSVG::SIGNATURE_HASH,
                B256::repeat_byte(0x42),
                B256::from(U256::from(token_id).to_be_bytes::<32>()),
            ],
            data: Bytes::new(),
        });
        wallet
    }

    #[test]
    fn mint_out_needs_a_known_supply() {
        assert!(!minted_out(U256::ZERO, U256::ZERO));
        assert!(!minted_out(U256::from(9), U256::from(10)));
        assert!(minted_out(U256::from(10), U256::from(10)));
    }

    #[tokio::test]
    async fn reads_collection_state() {
        let wallet = MockWallet::new(4);
        wallet.on_call(RINKEBY.nft, IRandomSvgNft::totalSupplyCall {}, U256::from(17).abi_encode());
        wallet.on_call(RINKEBY.nft, IRandomSvgNft::maxSupplyCall {}, U256::from(100).abi_encode());
        wallet.on_call(
            RINKEBY.nft,
            IRandomSvgNft::balanceOfCall { owner: ALICE },
            U256::from(2).abi_encode(),
        );
        let (session, _) = session(wallet);
        session.connect().await.unwrap();

        let view = session.read_only().await.unwrap();
        assert_eq!(total_supply(&view).await, Ok(U256::from(17)));
        assert_eq!(max_supply(&view).await, Ok(U256::from(100)));
        assert_eq!(owned_count(&view).await, Ok(U256::from(2)));
    }

    #[tokio::test(start_paused = true)]
    async fn mint_completes_requested_token() {
        let (session, notifier) = session(wallet_with_mint(7));
        session.connect().await.unwrap();

        assert_eq!(mint(&session).await, Ok(U256::from(7)));

        let sent = session.wallet().sent();
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[0].selector, IRandomSvgNft::createCall::SELECTOR);
        assert_eq!(sent[0].value, price());
        assert_eq!(
            sent[1].data,
            IRandomSvgNft::completeMintCall { tokenId: U256::from(7) }.abi_encode()
        );
        assert_eq!(
            notifier.notices(),
            vec![Notice::info(MINT_STARTED), Notice::success(MINT_SUCCESS)]
        );
        assert_eq!(session.state(), SessionState::Connected);
    }

    #[tokio::test(start_paused = true)]
    async fn failed_completion_keeps_paid_request() {
        let wallet = wallet_with_mint(3);
        wallet.revert_on::<IRandomSvgNft::completeMintCall>();
        let (session, notifier) = session(wallet);
        session.connect().await.unwrap();

        let result = mint(&session).await;
        assert!(matches!(
            result,
            Err(SessionError::TransactionFailed { ref step, .. }) if step == "completeMint"
        ));

        let receipts = session.wallet().receipts();
        assert!(receipts[0].succeeded());
        assert!(!receipts[1].succeeded());

        let failures: Vec<_> = notifier
            .notices()
            .into_iter()
            .filter(|n| n.level == NoticeLevel::Failure)
            .collect();
        assert_eq!(failures.len(), 1);
        assert!(failures[0].message.contains("completeMint"));
        assert_eq!(session.state(), SessionState::Connected);
    }
}
