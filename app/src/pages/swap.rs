use alloy_primitives::U256;
use dioxus::prelude::*;
use svgnft_api::contracts::exchange::{self, AccountBalances, SwapDirection};
use svgnft_api::format::{display_ether, parse_ether};
use svgnft_api::notify::Notice;

use crate::components::{ConnectButton, StatRow};
use crate::hooks::{use_page_session, use_poll};

#[component]
pub fn Swap() -> Element {
    let page = use_page_session();

    let mut balances = use_signal(AccountBalances::default);
    let mut direction = use_signal(SwapDirection::default);
    let mut amount = use_signal(String::new);
    let mut quote = use_signal(|| U256::ZERO);

    use_poll(&page, move |poll| {
        poll.query(
            "balances",
            |view| async move { exchange::account_balances(&view).await },
            move |value| balances.set(value),
        )
    });

    // Re-quote whenever the amount or the direction changes.
    let quote_session = page.session.clone();
    use_effect(move || {
        let input = amount();
        let side = direction();
        let session = quote_session.clone();
        let Ok(wei) = parse_ether(&input) else {
            quote.set(U256::ZERO);
            return;
        };
        spawn(async move {
            let result = match session.read_only().await {
                Ok(view) => exchange::swap_quote(&view, wei, side).await,
                Err(e) => Err(e),
            };
            match result {
                // Drop answers for an input the user already changed.
                Ok(value) if *amount.peek() == input && *direction.peek() == side => quote.set(value),
                Ok(_) => {}
                Err(e) => tracing::warn!("Swap quote failed: {}", e),
            }
        });
    });

    let pending = page.pending();
    let (pay_unit, receive_unit) = match direction() {
        SwapDirection::EthToToken => ("ether(s)", "reward token(s)"),
        SwapDirection::TokenToEth => ("reward token(s)", "ether(s)"),
    };
    let receive = display_ether(quote());
    let balance = balances();

    let session = page.session.clone();
    let swap = move |_| {
        let session = session.clone();
        let side = direction();
        let parsed = parse_ether(&amount.read());
        match parsed {
            Ok(wei) if !wei.is_zero() => {
                spawn(async move {
                    if exchange::swap(&session, side, wei).await.is_ok() {
                        amount.set(String::new());
                    }
                });
            }
            _ => session.notify(Notice::failure("Please enter a valid amount.")),
        }
    };

    rsx! {
        div { class: "max-w-3xl mx-auto",
            ConnectButton { page: page.clone() }

            h1 { class: "text-3xl font-bold mb-8 text-center", "Provide liquidity for ether and reward token swap!" }

            div { class: "elevated rounded-lg p-4 elevated-border border space-y-4",
                div { class: "space-y-2",
                    StatRow { label: "Ether", value: display_ether(balance.eth) }
                    StatRow { label: "Reward tokens", value: display_ether(balance.token) }
                }

                div { class: "flex gap-2",
                    button {
                        class: if direction() == SwapDirection::EthToToken { "controls-gold" } else { "elevated-control" },
                        class: " px-3 py-1.5 rounded text-sm",
                        onclick: move |_| direction.set(SwapDirection::EthToToken),
                        "Swap ETH -> reward token"
                    }
                    button {
                        class: if direction() == SwapDirection::TokenToEth { "controls-gold" } else { "elevated-control" },
                        class: " px-3 py-1.5 rounded text-sm",
                        onclick: move |_| direction.set(SwapDirection::TokenToEth),
                        "Swap reward token -> ETH"
                    }
                }

                div { class: "flex items-center gap-2 elevated-control rounded px-3 py-2",
                    input {
                        class: "bg-transparent text-high font-mono text-lg w-full outline-none",
                        placeholder: "0",
                        value: "{amount}",
                        oninput: move |e| amount.set(e.value()),
                    }
                    span { class: "text-low", "{pay_unit}" }
                }

                p { class: "text-mid", "You will receive {receive} {receive_unit} from the swap!" }

                button {
                    class: "controls-primary w-full py-3 rounded-lg font-semibold",
                    disabled: pending,
                    onclick: swap,
                    if pending { "Loading.." } else { "Swap tokens! 💱" }
                }
            }
        }
    }
}
