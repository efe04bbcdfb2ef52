use alloy_primitives::U256;
use dioxus::prelude::*;
use svgnft_api::contracts::exchange::{self, AccountBalances, Reserves};
use svgnft_api::format::{display_ether, parse_ether};
use svgnft_api::notify::Notice;

use crate::components::{ConnectButton, StatRow};
use crate::hooks::{use_page_session, use_poll};

#[component]
pub fn Liquidity() -> Element {
    let page = use_page_session();

    let mut balances = use_signal(AccountBalances::default);
    let mut reserves = use_signal(Reserves::default);
    let mut lp_supply = use_signal(|| U256::ZERO);

    let mut add_eth = use_signal(String::new);
    let mut add_token = use_signal(String::new);
    let mut remove_lp = use_signal(String::new);

    use_poll(&page, move |poll| {
        poll.query(
            "balances",
            |view| async move { exchange::account_balances(&view).await },
            move |value| balances.set(value),
        )
        .query(
            "reserves",
            |view| async move { exchange::reserves(&view).await },
            move |value| reserves.set(value),
        )
        .query(
            "lp supply",
            |view| async move { exchange::lp_supply(&view).await },
            move |value| lp_supply.set(value),
        )
    });

    let pending = page.pending();
    let pool = reserves();
    let eth_amount = parse_ether(&add_eth.read()).ok();
    // An empty pool takes whatever ratio the first provider picks.
    let token_amount = match exchange::liquidity_token_amount(eth_amount.unwrap_or_default(), pool) {
        Some(amount) => Some(amount),
        None => parse_ether(&add_token.read()).ok(),
    };
    let lp_amount = parse_ether(&remove_lp.read()).ok();
    let (eth_back, token_back) =
        exchange::removal_returns(lp_amount.unwrap_or_default(), pool, lp_supply());

    let session = page.session.clone();
    let add_liquidity = move |_| {
        let session = session.clone();
        match (eth_amount, token_amount) {
            (Some(eth), Some(tokens)) => {
                spawn(async move {
                    if exchange::add_liquidity(&session, tokens, eth).await.is_ok() {
                        add_eth.set(String::new());
                        add_token.set(String::new());
                    }
                });
            }
            _ => session.notify(Notice::failure("Please enter a valid amount.")),
        }
    };
    let session = page.session.clone();
    let remove_liquidity = move |_| {
        let session = session.clone();
        match lp_amount {
            Some(lp) => {
                spawn(async move {
                    if exchange::remove_liquidity(&session, lp).await.is_ok() {
                        remove_lp.set(String::new());
                    }
                });
            }
            None => session.notify(Notice::failure("Please enter a valid amount.")),
        }
    };

    let balance = balances();

    rsx! {
        div { class: "max-w-5xl mx-auto",
            ConnectButton { page: page.clone() }

            h1 { class: "text-3xl font-bold mb-8 text-center", "Provide liquidity for ether and reward token swap!" }

            div { class: "grid md:grid-cols-2 gap-6",
                div { class: "elevated rounded-lg p-4 elevated-border border space-y-3",
                    h3 { class: "text-gold font-semibold mb-3", "Your balances:" }
                    StatRow { label: "Ether", value: display_ether(balance.eth) }
                    StatRow { label: "Reward tokens", value: display_ether(balance.token) }
                    StatRow { label: "LP tokens", value: display_ether(balance.lp) }
                    h3 { class: "text-gold font-semibold mt-6 mb-3", "Pool:" }
                    StatRow { label: "Ether reserve", value: display_ether(pool.eth) }
                    StatRow { label: "Token reserve", value: display_ether(pool.token) }
                }

                div { class: "elevated rounded-lg p-4 elevated-border border space-y-4",
                    h3 { class: "text-gold font-semibold", "Add/ Remove liquidity:" }

                    div { class: "space-y-2",
                        input {
                            class: "elevated-control rounded px-3 py-2 w-full font-mono",
                            placeholder: "Amount of ether",
                            value: "{add_eth}",
                            oninput: move |e| add_eth.set(e.value()),
                        }
                        if pool.eth.is_zero() {
                            input {
                                class: "elevated-control rounded px-3 py-2 w-full font-mono",
                                placeholder: "Amount of reward tokens",
                                value: "{add_token}",
                                oninput: move |e| add_token.set(e.value()),
                            }
                        } else {
                            p { class: "text-low text-sm",
                                {format!("{} reward tokens will be added", display_ether(token_amount.unwrap_or_default()))}
                            }
                        }
                        button {
                            class: "controls-primary w-full py-2 rounded font-semibold",
                            disabled: pending,
                            onclick: add_liquidity,
                            if pending { "Loading.." } else { "Add liquidity" }
                        }
                    }

                    hr {}

                    div { class: "space-y-2",
                        input {
                            class: "elevated-control rounded px-3 py-2 w-full font-mono",
                            placeholder: "Amount of LP tokens",
                            value: "{remove_lp}",
                            oninput: move |e| remove_lp.set(e.value()),
                        }
                        p { class: "text-low text-sm",
                            {format!("You will get {} ether and {} reward tokens", display_ether(eth_back), display_ether(token_back))}
                        }
                        button {
                            class: "controls-primary w-full py-2 rounded font-semibold",
                            disabled: pending,
                            onclick: remove_liquidity,
                            if pending { "Loading.." } else { "Remove liquidity" }
                        }
                    }
                }
            }
        }
    }
}
