use std::cell::Cell;
use std::future::Future;
use std::rc::Rc;
use std::time::Duration;

use alloy_primitives::{Address, Bytes, B256, U256, U64};
use alloy_sol_types::SolCall;
use serde_json::json;

use crate::consts::{Deployment, CONFIRMATIONS};
use crate::error::{Result, SessionError};
use crate::notify::{Notice, Notifier};
use crate::provider::{parse_quantity, request_as, WalletProvider};
use crate::timer::Timer;
use crate::tx::{PendingTx, Receipt};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SessionState {
    #[default]
    Disconnected,
    Connected,
    /// A user-initiated transaction is waiting for confirmation.
    Pending,
}

struct Inner<W> {
    wallet: Rc<W>,
    deployment: Deployment,
    timer: Rc<dyn Timer>,
    notifier: Rc<dyn Notifier>,
    connected: Cell<bool>,
    pending: Cell<u32>,
    last_state: Cell<SessionState>,
    account: Cell<Option<Address>>,
}

/// Wallet connection state owned by one page.
///
/// Cloning hands out another reference to the same session.
pub struct Session<W> {
    inner: Rc<Inner<W>>,
}

impl<W> Clone for Session<W> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<W> PartialEq for Session<W> {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

/// Either side of [`Session::get_connection`].
pub enum Connection<W> {
    ReadOnly(ReadOnlyView<W>),
    Signing(SigningView<W>),
}

impl<W: WalletProvider> Session<W> {
    pub fn new(
        wallet: W,
        deployment: Deployment,
        timer: impl Timer + 'static,
        notifier: Rc<dyn Notifier>,
    ) -> Self {
        Self {
            inner: Rc::new(Inner {
                wallet: Rc::new(wallet),
                deployment,
                timer: Rc::new(timer),
                notifier,
                connected: Cell::new(false),
                pending: Cell::new(0),
                last_state: Cell::new(SessionState::Disconnected),
                account: Cell::new(None),
            }),
        }
    }

    pub fn wallet(&self) -> &W {
        &self.inner.wallet
    }

    pub fn deployment(&self) -> &Deployment {
        &self.inner.deployment
    }

    pub fn account(&self) -> Option<Address> {
        self.inner.account.get()
    }

    pub fn state(&self) -> SessionState {
        if self.inner.pending.get() > 0 {
            SessionState::Pending
        } else if self.inner.connected.get() {
            SessionState::Connected
        } else {
            SessionState::Disconnected
        }
    }

    pub fn is_connected(&self) -> bool {
        self.inner.connected.get()
    }

    pub(crate) fn timer(&self) -> Rc<dyn Timer> {
        self.inner.timer.clone()
    }

    pub fn notify(&self, notice: Notice) {
        self.inner.notifier.notify(&notice);
    }

    fn refresh_state(&self) {
        let state = self.state();
        if self.inner.last_state.replace(state) != state {
            self.inner.notifier.state_changed(state);
        }
    }

    /// Logs a failed user action and shows it to the user.
    fn report(&self, err: &SessionError) {
        if err.is_expected() {
            tracing::warn!(error = %err, "wallet action failed");
        } else {
            tracing::error!(error = %err, "wallet action failed unexpectedly");
        }
        self.notify(Notice::from_error(err, &self.inner.deployment));
    }

    /// Requests account access and checks the wallet's network.
    pub async fn connect(&self) -> Result<Address> {
        match self.request_access().await {
            Ok(account) => {
                self.inner.account.set(Some(account));
                self.inner.connected.set(true);
                self.refresh_state();
                tracing::info!(%account, "wallet connected");
                Ok(account)
            }
            Err(err) => {
                self.report(&err);
                Err(err)
            }
        }
    }

    async fn request_access(&self) -> Result<Address> {
        let accounts: Vec<Address> =
            request_as(&*self.inner.wallet, "eth_requestAccounts", json!([]))
                .await
                .map_err(|err| {
                    if err.is_user_rejection() {
                        SessionError::WalletRejected(err.to_string())
                    } else {
                        SessionError::Provider(err)
                    }
                })?;
        self.check_network().await?;
        accounts.first().copied().ok_or(SessionError::NotConnected)
    }

    /// Forgets the account. The wallet keeps whatever permission it granted.
    pub fn disconnect(&self) {
        self.inner.connected.set(false);
        self.inner.account.set(None);
        self.refresh_state();
    }

    async fn check_network(&self) -> Result<()> {
        let value = self.inner.wallet.request("eth_chainId", json!([])).await?;
        let actual = parse_quantity(&value)?;
        let expected = self.inner.deployment.chain_id;
        if actual != expected {
            return Err(SessionError::NetworkMismatch { expected, actual });
        }
        Ok(())
    }

    /// Read-only by default, bound to the selected account when `needs_signing`.
    pub async fn get_connection(&self, needs_signing: bool) -> Result<Connection<W>> {
        if needs_signing {
            self.signer().await.map(Connection::Signing)
        } else {
            self.read_only().await.map(Connection::ReadOnly)
        }
    }

    pub async fn read_only(&self) -> Result<ReadOnlyView<W>> {
        self.check_network().await?;
        Ok(ReadOnlyView {
            wallet: self.inner.wallet.clone(),
            deployment: self.inner.deployment,
            account: self.account(),
        })
    }

    /// A signing view for the account selected in the wallet right now.
    pub async fn signer(&self) -> Result<SigningView<W>> {
        if !self.is_connected() {
            return Err(SessionError::NotConnected);
        }
        self.check_network().await?;

        let accounts: Vec<Address> =
            request_as(&*self.inner.wallet, "eth_accounts", json!([])).await?;
        let from = accounts.first().copied().ok_or(SessionError::NotConnected)?;
        if self.inner.account.replace(Some(from)) != Some(from) {
            tracing::info!(account = %from, "wallet account changed");
        }

        Ok(SigningView {
            read: ReadOnlyView {
                wallet: self.inner.wallet.clone(),
                deployment: self.inner.deployment,
                account: Some(from),
            },
            from,
            timer: self.inner.timer.clone(),
            notifier: self.inner.notifier.clone(),
        })
    }

    /// Runs a user-initiated, state-changing action.
    ///
    /// A connected session is `Pending` from the moment this is called until
    /// the action resolves, whatever the outcome. The user is told about the
    /// result either way.
    pub async fn submit_transaction<T, F, Fut>(&self, success_message: &str, action: F) -> Result<T>
    where
        F: FnOnce(SigningView<W>) -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        if !self.is_connected() {
            let err = SessionError::NotConnected;
            self.report(&err);
            return Err(err);
        }

        let result = {
            let _pending = PendingGuard::enter(self);
            match self.signer().await {
                Ok(signer) => action(signer).await,
                Err(err) => Err(err),
            }
        };

        match &result {
            Ok(_) => self.notify(Notice::success(success_message)),
            Err(err) => self.report(err),
        }
        result
    }
}

/// Holds the session in `Pending` while alive.
struct PendingGuard<'a, W: WalletProvider> {
    session: &'a Session<W>,
}

impl<'a, W: WalletProvider> PendingGuard<'a, W> {
    fn enter(session: &'a Session<W>) -> Self {
        let pending = &session.inner.pending;
        pending.set(pending.get() + 1);
        session.refresh_state();
        Self { session }
    }
}

impl<W: WalletProvider> Drop for PendingGuard<'_, W> {
    fn drop(&mut self) {
        let pending = &self.session.inner.pending;
        pending.set(pending.get().saturating_sub(1));
        self.session.refresh_state();
    }
}

/// Query access to the chain. Never signs anything.
pub struct ReadOnlyView<W> {
    wallet: Rc<W>,
    deployment: Deployment,
    account: Option<Address>,
}

impl<W> Clone for ReadOnlyView<W> {
    fn clone(&self) -> Self {
        Self {
            wallet: self.wallet.clone(),
            deployment: self.deployment,
            account: self.account,
        }
    }
}

impl<W: WalletProvider> ReadOnlyView<W> {
    pub fn deployment(&self) -> &Deployment {
        &self.deployment
    }

    pub fn account(&self) -> Option<Address> {
        self.account
    }

    /// The connected account, for per-user reads.
    pub fn owner(&self) -> Result<Address> {
        self.account.ok_or(SessionError::NotConnected)
    }

    pub async fn call<C: SolCall>(&self, to: Address, call: &C) -> Result<C::Return> {
        let data = Bytes::from(call.abi_encode());
        let raw: Bytes = request_as(
            &*self.wallet,
            "eth_call",
            json!([{ "to": to, "data": data }, "latest"]),
        )
        .await
        .map_err(|err| SessionError::query(C::SIGNATURE, err))?;

        C::abi_decode_returns(&raw, true).map_err(|err| SessionError::QueryFailed {
            query: C::SIGNATURE.to_string(),
            reason: err.to_string(),
        })
    }

    /// Native balance in wei.
    pub async fn balance(&self, who: Address) -> Result<U256> {
        request_as(&*self.wallet, "eth_getBalance", json!([who, "latest"]))
            .await
            .map_err(|err| SessionError::query("eth_getBalance", err))
    }

    pub async fn block_number(&self) -> Result<u64> {
        let number: U64 = request_as(&*self.wallet, "eth_blockNumber", json!([]))
            .await
            .map_err(|err| SessionError::query("eth_blockNumber", err))?;
        Ok(number.to::<u64>())
    }
}

/// Write access bound to one wallet account.
pub struct SigningView<W> {
    read: ReadOnlyView<W>,
    from: Address,
    timer: Rc<dyn Timer>,
    notifier: Rc<dyn Notifier>,
}

impl<W: WalletProvider> SigningView<W> {
    pub fn from(&self) -> Address {
        self.from
    }

    pub fn reader(&self) -> &ReadOnlyView<W> {
        &self.read
    }

    pub fn deployment(&self) -> &Deployment {
        &self.read.deployment
    }

    pub fn notify(&self, notice: Notice) {
        self.notifier.notify(&notice);
    }

    pub async fn sleep(&self, duration: Duration) {
        self.timer.sleep(duration).await;
    }

    /// Asks the wallet to sign and broadcast `call`.
    pub async fn send<C: SolCall>(
        &self,
        step: &str,
        to: Address,
        call: &C,
        value: U256,
    ) -> Result<PendingTx<W>> {
        let tx = json!({
            "from": self.from,
            "to": to,
            "data": Bytes::from(call.abi_encode()),
            "value": value,
        });
        let hash: B256 = request_as(&*self.read.wallet, "eth_sendTransaction", json!([tx]))
            .await
            .map_err(|err| SessionError::transaction(step, err))?;

        tracing::info!(step, %hash, "transaction sent");
        Ok(PendingTx::new(
            self.read.wallet.clone(),
            self.timer.clone(),
            step,
            hash,
        ))
    }

    /// Sends `call` and waits for its confirmation.
    pub async fn step<C: SolCall>(
        &self,
        step: &str,
        to: Address,
        call: &C,
        value: U256,
    ) -> Result<Receipt> {
        self.send(step, to, call, value)
            .await?
            .confirmed(CONFIRMATIONS)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contracts::staking::INftStaking;
    use crate::notify::NoticeLevel;
    use crate::testing::{session, MockWallet, ALICE, BOB};

    #[tokio::test]
    async fn connect_marks_session_connected() {
        let (session, notifier) = session(MockWallet::new(4));

        assert_eq!(session.state(), SessionState::Disconnected);
        assert_eq!(session.connect().await, Ok(ALICE));
        assert_eq!(session.state(), SessionState::Connected);
        assert_eq!(session.account(), Some(ALICE));
        assert_eq!(notifier.states(), vec![SessionState::Connected]);
        assert!(notifier.notices().is_empty());
    }

    #[tokio::test]
    async fn disconnect_forgets_account() {
        let (session, notifier) = session(MockWallet::new(4));
        session.connect().await.unwrap();
        let issued = session.wallet().methods().len();

        session.disconnect();

        assert_eq!(session.state(), SessionState::Disconnected);
        assert_eq!(session.account(), None);
        assert_eq!(
            notifier.states(),
            vec![SessionState::Connected, SessionState::Disconnected]
        );
        assert_eq!(session.signer().await.err(), Some(SessionError::NotConnected));
        assert_eq!(session.wallet().methods().len(), issued);
    }

    #[tokio::test]
    async fn connect_on_wrong_network_fails() {
        for chain_id in [1, 3, 5, 137, 31337] {
            let (session, notifier) = session(MockWallet::new(chain_id));

            assert_eq!(
                session.connect().await,
                Err(SessionError::NetworkMismatch {
                    expected: 4,
                    actual: chain_id
                })
            );
            assert!(!session.is_connected());
            assert_eq!(session.state(), SessionState::Disconnected);
            assert_eq!(session.account(), None);

            let notices = notifier.notices();
            assert_eq!(notices.len(), 1);
            assert_eq!(notices[0].level, NoticeLevel::Failure);
            assert!(notices[0].message.contains("switch"));
        }
    }

    #[tokio::test]
    async fn wrong_network_runs_no_queries() {
        let (session, _) = session(MockWallet::new(1));

        assert!(session.connect().await.is_err());
        assert!(matches!(
            session.read_only().await,
            Err(SessionError::NetworkMismatch { .. })
        ));
        let methods = session.wallet().methods();
        assert!(!methods.iter().any(|m| m == "eth_call" || m == "eth_getBalance"));
    }

    #[tokio::test]
    async fn signing_requires_connection_before_any_call() {
        let (session, _) = session(MockWallet::new(4));

        assert!(matches!(
            session.get_connection(true).await,
            Err(SessionError::NotConnected)
        ));
        assert!(session.wallet().methods().is_empty());
    }

    #[tokio::test]
    async fn read_only_connection_needs_no_account() {
        let (session, _) = session(MockWallet::new(4));

        match session.get_connection(false).await {
            Ok(Connection::ReadOnly(view)) => {
                assert_eq!(view.account(), None);
                assert_eq!(view.owner(), Err(SessionError::NotConnected));
            }
            _ => panic!("expected a read-only connection"),
        }
    }

    #[tokio::test]
    async fn rejected_access_request() {
        let wallet = MockWallet::new(4);
        wallet.reject_requests(true);
        let (session, notifier) = session(wallet);

        assert!(matches!(
            session.connect().await,
            Err(SessionError::WalletRejected(_))
        ));
        assert_eq!(session.state(), SessionState::Disconnected);
        assert_eq!(notifier.notices().len(), 1);
    }

    #[tokio::test]
    async fn signer_follows_account_switch() {
        let (session, _) = session(MockWallet::new(4));
        session.connect().await.unwrap();

        session.wallet().set_accounts(vec![BOB]);
        let signer = session.signer().await.unwrap();
        assert_eq!(signer.from(), BOB);
        assert_eq!(session.account(), Some(BOB));
    }

    #[tokio::test]
    async fn network_switch_after_connect_blocks_signing() {
        let (session, _) = session(MockWallet::new(4));
        session.connect().await.unwrap();

        session.wallet().set_chain_id(1);
        assert!(matches!(
            session.signer().await,
            Err(SessionError::NetworkMismatch { expected: 4, actual: 1 })
        ));
        // The session itself survives.
        assert_eq!(session.state(), SessionState::Connected);
    }

    #[tokio::test]
    async fn submit_is_pending_until_confirmed() {
        let (session, notifier) = session(MockWallet::new(4));
        session.connect().await.unwrap();

        let staking = session.deployment().staking;
        let observer = session.clone();
        let receipt = session
            .submit_transaction("claimed", move |signer| async move {
                assert_eq!(observer.state(), SessionState::Pending);
                signer
                    .step("claimRewards", staking, &INftStaking::claimRewardsCall {}, U256::ZERO)
                    .await
            })
            .await
            .unwrap();

        assert!(receipt.succeeded());
        assert_eq!(session.state(), SessionState::Connected);
        assert_eq!(
            notifier.states(),
            vec![
                SessionState::Connected,
                SessionState::Pending,
                SessionState::Connected
            ]
        );
        assert_eq!(notifier.notices().last(), Some(&Notice::success("claimed")));
    }

    #[tokio::test]
    async fn submit_leaves_pending_on_failure() {
        let wallet = MockWallet::new(4);
        wallet.revert_on::<INftStaking::claimRewardsCall>();
        let (session, notifier) = session(wallet);
        session.connect().await.unwrap();

        let staking = session.deployment().staking;
        let result = session
            .submit_transaction("claimed", move |signer| async move {
                signer
                    .step("claimRewards", staking, &INftStaking::claimRewardsCall {}, U256::ZERO)
                    .await
            })
            .await;

        assert!(matches!(
            result,
            Err(SessionError::TransactionFailed { ref step, .. }) if step == "claimRewards"
        ));
        assert_eq!(session.state(), SessionState::Connected);
        let last = notifier.notices().pop().unwrap();
        assert_eq!(last.level, NoticeLevel::Failure);
    }

    #[tokio::test]
    async fn submit_while_disconnected_fails_without_sending() {
        let (session, notifier) = session(MockWallet::new(4));

        let result = session
            .submit_transaction("claimed", |_signer| async { Ok(()) })
            .await;

        assert_eq!(result, Err(SessionError::NotConnected));
        assert_eq!(session.state(), SessionState::Disconnected);
        assert!(session.wallet().methods().is_empty());
        assert!(notifier.states().is_empty());
        assert_eq!(notifier.notices().len(), 1);
    }

    #[tokio::test]
    async fn rejected_signature_is_reported() {
        let (session, _) = session(MockWallet::new(4));
        session.connect().await.unwrap();
        session.wallet().reject_requests(true);

        let staking = session.deployment().staking;
        let result = session
            .submit_transaction("staked", move |signer| async move {
                signer
                    .step("stakeAll", staking, &INftStaking::stakeAllCall {}, U256::ZERO)
                    .await
            })
            .await;

        assert!(matches!(result, Err(SessionError::WalletRejected(_))));
        assert!(session.wallet().sent().is_empty());
        assert_eq!(session.state(), SessionState::Connected);
    }
}
