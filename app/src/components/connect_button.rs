use dioxus::prelude::*;
use futures::StreamExt;

use crate::hooks::SessionHandle;

#[derive(Clone)]
enum WalletAction {
    Connect,
    Disconnect,
}

#[component]
pub fn ConnectButton(page: SessionHandle) -> Element {
    let session = page.session.clone();

    let wallet_coro = use_coroutine(move |mut rx: UnboundedReceiver<WalletAction>| {
        let session = session.clone();
        async move {
            while let Some(action) = rx.next().await {
                match action {
                    // Failures are reported to the user by the session.
                    WalletAction::Connect => {
                        let _ = session.connect().await;
                    }
                    WalletAction::Disconnect => session.disconnect(),
                }
            }
        }
    });

    if page.connected() {
        let account = page
            .session
            .account()
            .map(|a| a.to_string())
            .unwrap_or_default();
        let short_account = if account.len() > 10 {
            format!("{}...{}", &account[..6], &account[account.len() - 4..])
        } else {
            account
        };

        rsx! {
            div { class: "flex items-center justify-end space-x-2 mb-6",
                span { class: "text-sm text-gray-400 font-mono", "{short_account}" }
                button {
                    class: "btn btn-secondary text-sm",
                    onclick: move |_| wallet_coro.send(WalletAction::Disconnect),
                    "Disconnect"
                }
            }
        }
    } else {
        rsx! {
            div { class: "flex justify-end mb-6",
                button {
                    class: "btn btn-primary",
                    onclick: move |_| wallet_coro.send(WalletAction::Connect),
                    "Connect your wallet"
                }
            }
        }
    }
}
