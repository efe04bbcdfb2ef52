use std::rc::Rc;

use dioxus::prelude::*;
use svgnft_api::consts::DEFAULT_DEPLOYMENT;
use svgnft_api::session::{Session, SessionState};

use super::wallet::{AlertNotifier, GlooTimer, InjectedWallet};

pub type PageSession = Session<InjectedWallet>;

/// A page's own wallet session and its reactive state.
#[derive(Clone, PartialEq)]
pub struct SessionHandle {
    pub session: PageSession,
    pub state: Signal<SessionState>,
}

impl SessionHandle {
    pub fn connected(&self) -> bool {
        (self.state)() != SessionState::Disconnected
    }

    pub fn pending(&self) -> bool {
        (self.state)() == SessionState::Pending
    }
}

/// Creates the session on mount and asks the wallet for access right away.
///
/// The session goes away with the page.
pub fn use_page_session() -> SessionHandle {
    let state = use_signal(SessionState::default);
    let session = use_hook(move || {
        Session::new(
            InjectedWallet,
            DEFAULT_DEPLOYMENT,
            GlooTimer,
            Rc::new(AlertNotifier { state }),
        )
    });

    use_future({
        let session = session.clone();
        move || {
            let session = session.clone();
            async move {
                if let Err(e) = session.connect().await {
                    tracing::debug!("Auto-connect failed: {}", e);
                }
            }
        }
    });

    SessionHandle { session, state }
}
