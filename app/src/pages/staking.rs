use alloy_primitives::U256;
use dioxus::prelude::*;
use svgnft_api::contracts::{nft, staking};
use svgnft_api::format::display_ether;

use crate::components::ConnectButton;
use crate::hooks::{use_page_session, use_poll};

#[component]
pub fn Staking() -> Element {
    let page = use_page_session();

    let mut minted = use_signal(|| U256::ZERO);
    let mut staked_count = use_signal(|| 0u64);
    let mut reward_per_day = use_signal(|| U256::ZERO);
    let mut claimable = use_signal(|| U256::ZERO);
    let mut staked_ids = use_signal(Vec::<U256>::new);
    let mut unstaked_ids = use_signal(Vec::<U256>::new);

    let mut stake_id = use_signal(|| None::<U256>);
    let mut unstake_id = use_signal(|| None::<U256>);

    use_poll(&page, move |poll| {
        poll.query(
            "total supply",
            |view| async move { nft::total_supply(&view).await },
            move |value| minted.set(value),
        )
        .query(
            "staked count",
            |view| async move { staking::staked_count(&view).await },
            move |value| staked_count.set(value),
        )
        .query(
            "reward per day",
            |view| async move { staking::reward_per_day(&view).await },
            move |value| reward_per_day.set(value),
        )
        .query(
            "claimable reward",
            |view| async move { staking::claimable_reward(&view).await },
            move |value| claimable.set(value),
        )
        .query(
            "staked token ids",
            |view| async move { staking::staked_token_ids(&view).await },
            move |ids| staked_ids.set(ids),
        )
        .query(
            "unstaked token ids",
            |view| async move { staking::unstaked_token_ids(&view).await },
            move |ids| unstaked_ids.set(ids),
        )
    });

    let pending = page.pending();
    let can_stake = !unstaked_ids.read().is_empty();
    let can_unstake = !staked_ids.read().is_empty();
    let reward = display_ether(reward_per_day());
    let earned = display_ether(claimable());

    let session = page.session.clone();
    let stake = move |_| {
        let session = session.clone();
        if let Some(token_id) = stake_id() {
            spawn(async move {
                let _ = staking::stake(&session, token_id).await;
            });
        }
    };
    let session = page.session.clone();
    let stake_all = move |_| {
        let session = session.clone();
        spawn(async move {
            let _ = staking::stake_all(&session).await;
        });
    };
    let session = page.session.clone();
    let unstake = move |_| {
        let session = session.clone();
        if let Some(token_id) = unstake_id() {
            spawn(async move {
                let _ = staking::unstake(&session, token_id).await;
            });
        }
    };
    let session = page.session.clone();
    let unstake_all = move |_| {
        let session = session.clone();
        spawn(async move {
            let _ = staking::unstake_all(&session).await;
        });
    };
    let session = page.session.clone();
    let claim = move |_| {
        let session = session.clone();
        spawn(async move {
            let _ = staking::claim_rewards(&session).await;
        });
    };

    rsx! {
        div { class: "max-w-3xl mx-auto text-center",
            ConnectButton { page: page.clone() }

            h1 { class: "text-3xl font-bold mb-8", "Stake and earn!" }
            p { class: "text-mid mb-4", "And best of all, your NFT(s) never have to leave your wallet!" }
            p { class: "text-mid mb-4", "{staked_count}/{minted} are currently staked!" }
            p { class: "text-mid mb-8", "Earn {reward} reward tokens per day for each NFT staked!" }

            div { class: "elevated rounded-lg p-4 elevated-border border mb-4 flex items-center gap-2 justify-center",
                TokenSelect {
                    ids: unstaked_ids(),
                    on_select: move |id| stake_id.set(id),
                }
                button {
                    class: "controls-primary px-4 py-1.5 rounded",
                    disabled: pending || !can_stake || stake_id().is_none(),
                    onclick: stake,
                    if pending { "Loading.." } else { "Stake your NFT! 🥩" }
                }
                button {
                    class: "controls-primary px-4 py-1.5 rounded",
                    disabled: pending || !can_stake,
                    onclick: stake_all,
                    if pending { "Loading.." } else { "🥩 Stake all! 🥩" }
                }
            }

            div { class: "elevated rounded-lg p-4 elevated-border border mb-8 flex items-center gap-2 justify-center",
                TokenSelect {
                    ids: staked_ids(),
                    on_select: move |id| unstake_id.set(id),
                }
                button {
                    class: "controls-primary px-4 py-1.5 rounded",
                    disabled: pending || !can_unstake || unstake_id().is_none(),
                    onclick: unstake,
                    if pending { "Loading.." } else { "Unstake your NFT! 🐮" }
                }
                button {
                    class: "controls-primary px-4 py-1.5 rounded",
                    disabled: pending || !can_unstake,
                    onclick: unstake_all,
                    if pending { "Loading.." } else { "🐮 Unstake all! 🐮" }
                }
            }

            div { class: "elevated rounded-lg p-4 elevated-border border flex items-center gap-4 justify-center",
                span { class: "text-mid", "You have earned {earned} reward tokens!" }
                button {
                    class: "controls-gold px-4 py-1.5 rounded font-semibold",
                    disabled: pending || claimable().is_zero(),
                    onclick: claim,
                    if pending { "Loading.." } else { "Claim your reward tokens! 🎁" }
                }
            }
        }
    }
}

#[component]
fn TokenSelect(ids: Vec<U256>, on_select: EventHandler<Option<U256>>) -> Element {
    rsx! {
        select {
            class: "elevated-control rounded px-3 py-1.5 font-mono",
            onchange: move |e| on_select.call(U256::from_str_radix(&e.value(), 10).ok()),
            option { value: "", "TokenID" }
            for id in ids {
                option { key: "{id}", value: "{id}", "{id}" }
            }
        }
    }
}
