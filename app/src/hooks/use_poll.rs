use std::cell::RefCell;
use std::rc::Rc;

use dioxus::prelude::*;
use svgnft_api::consts::POLL_INTERVAL;
use svgnft_api::poll::{Poll, PollHandle};

use super::use_page_session::SessionHandle;
use super::wallet::InjectedWallet;

/// Polls the queries added by `queries` every [`POLL_INTERVAL`] while the
/// page session is connected.
///
/// Polling stops when the session disconnects and when the page unmounts.
pub fn use_poll<F>(page: &SessionHandle, queries: F)
where
    F: Fn(Poll<InjectedWallet>) -> Poll<InjectedWallet> + 'static,
{
    let handle = use_hook(|| Rc::new(RefCell::new(None::<PollHandle>)));
    let session = page.session.clone();
    let page = page.clone();

    use_effect(move || {
        let connected = page.connected();
        let mut running = handle.borrow_mut();

        if connected && running.is_none() {
            let (task, poll_handle) = queries(session.poll(POLL_INTERVAL)).start();
            spawn(task);
            *running = Some(poll_handle);
        } else if !connected {
            // Dropping the handle aborts the task.
            running.take();
        }
    });
}
