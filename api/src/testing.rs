//! In-memory wallet and notifier for unit tests.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use alloy_primitives::{address, Address, Bytes, B256, U256, U64};
use alloy_sol_types::SolCall;
use async_trait::async_trait;
use serde_json::{json, Value};

use crate::consts::{RINKEBY, USER_REJECTED_CODE};
use crate::error::ProviderError;
use crate::notify::{Notice, Notifier};
use crate::provider::WalletProvider;
use crate::session::{Session, SessionState};
use crate::timer::TokioTimer;
use crate::tx::{Log, Receipt};

pub const ALICE: Address = address!("00000000000000000000000000000000000a11ce");
pub const BOB: Address = address!("0000000000000000000000000000000000000b0b");

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SentTx {
    pub to: Address,
    pub selector: [u8; 4],
    pub data: Vec<u8>,
    pub value: U256,
}

/// Scripted EIP-1193 wallet. Every transaction is mined immediately in block 1.
pub struct MockWallet {
    chain_id: Cell<u64>,
    accounts: RefCell<Vec<Address>>,
    reject: Cell<bool>,
    fail_reads: Cell<bool>,
    receipt_failures: Cell<usize>,
    withhold_receipts: Cell<bool>,
    balances: RefCell<HashMap<Address, U256>>,
    calls: RefCell<HashMap<(Address, Bytes), Bytes>>,
    reverts: RefCell<Vec<[u8; 4]>>,
    events: RefCell<HashMap<[u8; 4], Vec<Log>>>,
    methods: RefCell<Vec<String>>,
    sent: RefCell<Vec<SentTx>>,
    receipts: RefCell<Vec<Receipt>>,
}

impl MockWallet {
    pub fn new(chain_id: u64) -> Self {
        Self {
            chain_id: Cell::new(chain_id),
            accounts: RefCell::new(vec![ALICE]),
            reject: Cell::new(false),
            fail_reads: Cell::new(false),
            receipt_failures: Cell::new(0),
            withhold_receipts: Cell::new(false),
            balances: RefCell::new(HashMap::new()),
            calls: RefCell::new(HashMap::new()),
            reverts: RefCell::new(Vec::new()),
            events: RefCell::new(HashMap::new()),
            methods: RefCell::new(Vec::new()),
            sent: RefCell::new(Vec::new()),
            receipts: RefCell::new(Vec::new()),
        }
    }

    /// Rejects account and signature prompts as if the user dismissed them.
    pub fn reject_requests(&self, reject: bool) {
        self.reject.set(reject);
    }

    /// Makes every `eth_call` fail at the transport level.
    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.set(fail);
    }

    /// The next `count` receipt lookups time out.
    pub fn fail_receipt_lookups(&self, count: usize) {
        self.receipt_failures.set(count);
    }

    /// Receipt lookups answer `null`, as for a dropped transaction.
    pub fn withhold_receipts(&self, withhold: bool) {
        self.withhold_receipts.set(withhold);
    }

    pub fn set_accounts(&self, accounts: Vec<Address>) {
        *self.accounts.borrow_mut() = accounts;
    }

    pub fn set_chain_id(&self, chain_id: u64) {
        self.chain_id.set(chain_id);
    }

    pub fn set_balance(&self, who: Address, wei: U256) {
        self.balances.borrow_mut().insert(who, wei);
    }

    /// Answers `eth_call` of exactly `call` on `to` with `ret`.
    pub fn on_call<C: SolCall>(&self, to: Address, call: C, ret: Vec<u8>) {
        self.calls
            .borrow_mut()
            .insert((to, Bytes::from(call.abi_encode())), Bytes::from(ret));
    }

    /// Transactions calling `C` are mined with a failed status.
    pub fn revert_on<C: SolCall>(&self) {
        self.reverts.borrow_mut().push(C::SELECTOR);
    }

    /// Successful transactions calling `C` carry `log` in their receipt.
    pub fn emit_on<C: SolCall>(&self, log: Log) {
        self.events
            .borrow_mut()
            .entry(C::SELECTOR)
            .or_default()
            .push(log);
    }

    pub fn methods(&self) -> Vec<String> {
        self.methods.borrow().clone()
    }

    pub fn count(&self, method: &str) -> usize {
        self.methods.borrow().iter().filter(|m| *m == method).count()
    }

    pub fn sent(&self) -> Vec<SentTx> {
        self.sent.borrow().clone()
    }

    pub fn receipts(&self) -> Vec<Receipt> {
        self.receipts.borrow().clone()
    }

    fn rejection() -> ProviderError {
        ProviderError::Rpc {
            code: USER_REJECTED_CODE,
            message: "User rejected the request.".into(),
        }
    }

    fn eth_call(&self, params: &Value) -> Result<Value, ProviderError> {
        if self.fail_reads.get() {
            return Err(ProviderError::Transport("connection refused".into()));
        }
        let to: Address = serde_json::from_value(params[0]["to"].clone())?;
        let data: Bytes = serde_json::from_value(params[0]["data"].clone())?;
        match self.calls.borrow().get(&(to, data)) {
            Some(ret) => Ok(json!(ret)),
            None => Err(ProviderError::Rpc {
                code: -32000,
                message: "execution reverted".into(),
            }),
        }
    }

    fn send_transaction(&self, params: &Value) -> Result<Value, ProviderError> {
        if self.reject.get() {
            return Err(Self::rejection());
        }
        let to: Address = serde_json::from_value(params[0]["to"].clone())?;
        let data: Bytes = serde_json::from_value(params[0]["data"].clone())?;
        let value: U256 = serde_json::from_value(params[0]["value"].clone())?;

        let mut selector = [0u8; 4];
        selector.copy_from_slice(&data[..4]);
        let reverted = self.reverts.borrow().contains(&selector);

        let mut sent = self.sent.borrow_mut();
        let hash = B256::from(U256::from(sent.len() as u64 + 1).to_be_bytes::<32>());
        sent.push(SentTx {
            to,
            selector,
            data: data.to_vec(),
            value,
        });

        let logs = if reverted {
            Vec::new()
        } else {
            self.events
                .borrow()
                .get(&selector)
                .cloned()
                .unwrap_or_default()
        };
        self.receipts.borrow_mut().push(Receipt {
            transaction_hash: hash,
            block_number: Some(U64::from(1)),
            status: Some(U64::from(if reverted { 0 } else { 1 })),
            logs,
        });
        Ok(json!(hash))
    }

    fn receipt(&self, params: &Value) -> Result<Value, ProviderError> {
        let failures = self.receipt_failures.get();
        if failures > 0 {
            self.receipt_failures.set(failures - 1);
            return Err(ProviderError::Transport("timeout".into()));
        }
        if self.withhold_receipts.get() {
            return Ok(Value::Null);
        }
        let hash: B256 = serde_json::from_value(params[0].clone())?;
        let receipts = self.receipts.borrow();
        let receipt = receipts.iter().find(|r| r.transaction_hash == hash);
        Ok(serde_json::to_value(receipt)?)
    }
}

#[async_trait(?Send)]
impl WalletProvider for MockWallet {
    async fn request(&self, method: &str, params: Value) -> Result<Value, ProviderError> {
        self.methods.borrow_mut().push(method.to_string());
        match method {
            "eth_requestAccounts" if self.reject.get() => Err(Self::rejection()),
            "eth_requestAccounts" | "eth_accounts" => Ok(json!(*self.accounts.borrow())),
            "eth_chainId" => Ok(json!(U64::from(self.chain_id.get()))),
            "eth_call" => self.eth_call(&params),
            "eth_getBalance" => {
                let who: Address = serde_json::from_value(params[0].clone())?;
                let balance = self.balances.borrow().get(&who).copied().unwrap_or_default();
                Ok(json!(balance))
            }
            "eth_blockNumber" => Ok(json!("0x1")),
            "eth_sendTransaction" => self.send_transaction(&params),
            "eth_getTransactionReceipt" => self.receipt(&params),
            other => Err(ProviderError::Rpc {
                code: -32601,
                message: format!("method {other} not supported"),
            }),
        }
    }
}

/// Remembers every state change and notice.
#[derive(Default)]
pub struct RecordingNotifier {
    states: RefCell<Vec<SessionState>>,
    notices: RefCell<Vec<Notice>>,
}

impl RecordingNotifier {
    pub fn states(&self) -> Vec<SessionState> {
        self.states.borrow().clone()
    }

    pub fn notices(&self) -> Vec<Notice> {
        self.notices.borrow().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn state_changed(&self, state: SessionState) {
        self.states.borrow_mut().push(state);
    }

    fn notify(&self, notice: &Notice) {
        self.notices.borrow_mut().push(notice.clone());
    }
}

/// A Rinkeby session over `wallet` with tokio timers.
pub fn session(wallet: MockWallet) -> (Session<MockWallet>, Rc<RecordingNotifier>) {
    let notifier = Rc::new(RecordingNotifier::default());
    let session = Session::new(wallet, RINKEBY, TokioTimer, notifier.clone());
    (session, notifier)
}
