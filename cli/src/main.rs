use std::rc::Rc;
use std::str::FromStr;

use alloy_primitives::{Address, U256};
use anyhow::Context;
use svgnft_api::prelude::*;
use tracing_subscriber::EnvFilter;

type Client = Session<HttpProvider>;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let rpc = std::env::var("RPC").context("Missing RPC env var")?;
    let mut provider = HttpProvider::new(rpc);
    if let Some(account) = env_parse::<Address>("ACCOUNT")? {
        provider = provider.with_account(account);
    }
    let session = Session::new(provider, deployment()?, TokioTimer, Rc::new(LogNotifier));

    match std::env::var("COMMAND")
        .context("Missing COMMAND env var")?
        .as_str()
    {
        "collection" => log_collection(&session).await?,
        "staking" => log_staking(&session).await?,
        "pool" => log_pool(&session).await?,
        "account" => log_account(&session).await?,
        "watch" => watch(&session).await?,
        other => anyhow::bail!("Unknown command: {other}"),
    }
    Ok(())
}

/// Default deployment with any address or chain overrides from the environment.
fn deployment() -> anyhow::Result<Deployment> {
    let mut deployment = DEFAULT_DEPLOYMENT;
    if let Some(chain_id) = env_parse::<u64>("CHAIN_ID")? {
        deployment.chain_id = chain_id;
        deployment.network_name = "configured";
    }
    if let Some(nft) = env_parse("NFT_ADDRESS")? {
        deployment.nft = nft;
    }
    if let Some(staking) = env_parse("STAKING_ADDRESS")? {
        deployment.staking = staking;
    }
    if let Some(exchange) = env_parse("EXCHANGE_ADDRESS")? {
        deployment.exchange = exchange;
    }
    Ok(deployment)
}

fn env_parse<T>(name: &str) -> anyhow::Result<Option<T>>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(name) {
        Ok(value) => value
            .parse()
            .map(Some)
            .with_context(|| format!("Invalid {name} env var: {value}")),
        Err(_) => Ok(None),
    }
}

async fn log_collection(session: &Client) -> anyhow::Result<()> {
    let view = session.read_only().await?;
    let minted = nft::total_supply(&view).await?;
    let max = nft::max_supply(&view).await?;
    let price = nft::mint_price(&view).await?;
    println!("Collection");
    println!("  address: {}", view.deployment().nft);
    println!("  minted: {} / {}", minted, max);
    println!("  mint price: {} ETH", display_ether(price));
    println!("  minted out: {}", nft::minted_out(minted, max));
    Ok(())
}

async fn log_staking(session: &Client) -> anyhow::Result<()> {
    let view = session.read_only().await?;
    let reward = staking::reward_per_day(&view).await?;
    let staked = staking::staked_count(&view).await?;
    println!("Staking");
    println!("  address: {}", view.deployment().staking);
    println!("  reward per day: {}", display_ether(reward));
    println!("  staked NFTs: {}", staked);
    Ok(())
}

async fn log_pool(session: &Client) -> anyhow::Result<()> {
    let view = session.read_only().await?;
    let reserves = exchange::reserves(&view).await?;
    let lp_supply = exchange::lp_supply(&view).await?;
    println!("Pool");
    println!("  address: {}", view.deployment().exchange);
    println!("  ETH reserve: {}", display_ether(reserves.eth));
    println!("  token reserve: {}", display_ether(reserves.token));
    println!("  LP supply: {}", display_ether(lp_supply));
    if let Some(tokens) = exchange::liquidity_token_amount(WEI_PER_ETHER, reserves) {
        println!("  tokens per 1 ETH deposit: {}", display_ether(tokens));
    }
    Ok(())
}

async fn log_account(session: &Client) -> anyhow::Result<()> {
    let account = session.connect().await.context("Set ACCOUNT to inspect an account")?;
    let view = session.read_only().await?;
    let balances = exchange::account_balances(&view).await?;
    let owned = nft::owned_count(&view).await?;
    let staked = staking::staked_token_ids(&view).await?;
    let unstaked = staking::unstaked_token_ids(&view).await?;
    let claimable = staking::claimable_reward(&view).await?;
    println!("Account");
    println!("  address: {}", account);
    println!("  ETH: {}", display_ether(balances.eth));
    println!("  tokens: {}", display_ether(balances.token));
    println!("  LP tokens: {}", display_ether(balances.lp));
    println!("  NFTs held: {}", owned);
    println!("  staked: {}", join_ids(&staked));
    println!("  not staked: {}", join_ids(&unstaked));
    println!("  claimable reward: {}", display_ether(claimable));
    Ok(())
}

fn join_ids(ids: &[U256]) -> String {
    if ids.is_empty() {
        return "-".to_string();
    }
    ids.iter()
        .map(U256::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Prints pool and collection updates every poll interval until Ctrl-C.
async fn watch(session: &Client) -> anyhow::Result<()> {
    // Ticks on the wrong network would only log a warning each.
    session.read_only().await?;

    let mut poll = session
        .poll(POLL_INTERVAL)
        .query(
            "total supply",
            |view| async move { nft::total_supply(&view).await },
            |minted| println!("minted: {minted}"),
        )
        .query(
            "reserves",
            |view| async move { exchange::reserves(&view).await },
            |reserves| {
                println!(
                    "reserves: {} ETH / {} tokens",
                    display_ether(reserves.eth),
                    display_ether(reserves.token)
                )
            },
        );

    // Without ACCOUNT only the public reads are watched.
    if session.connect().await.is_ok() {
        poll = poll
            .query(
                "claimable reward",
                |view| async move { staking::claimable_reward(&view).await },
                |reward| println!("claimable reward: {}", display_ether(reward)),
            )
            .query(
                "balances",
                |view| async move { exchange::account_balances(&view).await },
                |balances| {
                    println!(
                        "balances: {} ETH / {} tokens / {} LP",
                        display_ether(balances.eth),
                        display_ether(balances.token),
                        display_ether(balances.lp)
                    )
                },
            );
    }

    let (task, handle) = poll.start();
    tokio::select! {
        _ = task => {}
        result = tokio::signal::ctrl_c() => result?,
    }
    handle.stop();
    tracing::info!("stopped watching");
    Ok(())
}
