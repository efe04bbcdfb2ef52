use alloy_primitives::U256;
use dioxus::prelude::*;
use svgnft_api::contracts::nft;
use svgnft_api::format::display_ether;

use crate::components::ConnectButton;
use crate::hooks::{use_page_session, use_poll};

#[component]
pub fn Mint() -> Element {
    let page = use_page_session();

    let mut minted = use_signal(|| U256::ZERO);
    let mut max_supply = use_signal(|| U256::ZERO);
    let mut mint_price = use_signal(|| U256::ZERO);
    let mut owned = use_signal(|| U256::ZERO);

    use_poll(&page, move |poll| {
        poll.query(
            "total supply",
            |view| async move { nft::total_supply(&view).await },
            move |value| minted.set(value),
        )
        .query(
            "max supply",
            |view| async move { nft::max_supply(&view).await },
            move |value| max_supply.set(value),
        )
        .query(
            "mint price",
            |view| async move { nft::mint_price(&view).await },
            move |value| mint_price.set(value),
        )
        .query(
            "owned",
            |view| async move { nft::owned_count(&view).await },
            move |value| owned.set(value),
        )
    });

    let minted_out = nft::minted_out(minted(), max_supply());
    // Shown until the first read lands.
    let price = if mint_price().is_zero() {
        "0.05".to_string()
    } else {
        display_ether(mint_price())
    };
    let max = if max_supply().is_zero() {
        "500".to_string()
    } else {
        max_supply().to_string()
    };

    let session = page.session.clone();
    let start_mint = move |_| {
        let session = session.clone();
        spawn(async move {
            if let Ok(token_id) = nft::mint(&session).await {
                tracing::info!("Minted token #{}", token_id);
            }
        });
    };

    rsx! {
        div { class: "max-w-3xl mx-auto text-center",
            ConnectButton { page: page.clone() }

            h1 { class: "text-3xl font-bold mb-8", "Welcome fellow stranger on the internet!" }
            p { class: "text-mid mb-4",
                "Come get your very own randomly generated SVG NFT, all for a cheap price of {price} ether!"
            }
            p { class: "text-mid mb-4", "{minted}/{max} have been minted" }
            p { class: "text-mid mb-8", "You have minted {owned} random NFTs so far" }

            if page.connected() {
                button {
                    class: "controls-primary px-6 py-3 rounded-lg font-semibold",
                    disabled: page.pending() || minted_out,
                    onclick: start_mint,
                    if page.pending() {
                        "Loading.."
                    } else if minted_out {
                        "Minted out"
                    } else {
                        "Generate your random NFT! 🚀"
                    }
                }
            }
        }
    }
}
