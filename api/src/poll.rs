use std::cell::{Cell, RefCell};
use std::future::Future;
use std::rc::Rc;
use std::time::Duration;

use futures::future::{self, AbortHandle, Abortable, Either, LocalBoxFuture};
use futures::stream::{FuturesUnordered, StreamExt};
use futures::FutureExt;

use crate::error::Result;
use crate::provider::WalletProvider;
use crate::session::{ReadOnlyView, Session};

impl<W: WalletProvider + 'static> Session<W> {
    /// Starts describing a set of values refreshed every `interval`.
    pub fn poll(&self, interval: Duration) -> Poll<W> {
        Poll {
            session: self.clone(),
            interval,
            queries: Vec::new(),
        }
    }
}

trait Refresh<W> {
    fn refresh(&self, view: ReadOnlyView<W>, seq: u64) -> LocalBoxFuture<'static, ()>;
}

type Fetch<W, T> = Box<dyn Fn(ReadOnlyView<W>) -> LocalBoxFuture<'static, Result<T>>>;

struct Query<W, T> {
    name: &'static str,
    fetch: Fetch<W, T>,
    publish: RefCell<Box<dyn FnMut(T)>>,
    /// Sequence number of the last published result.
    published: Cell<u64>,
}

impl<W: 'static, T: 'static> Refresh<W> for Rc<Query<W, T>> {
    fn refresh(&self, view: ReadOnlyView<W>, seq: u64) -> LocalBoxFuture<'static, ()> {
        let query = self.clone();
        let fetch = (query.fetch)(view);
        Box::pin(async move {
            match fetch.await {
                Ok(value) if seq > query.published.get() => {
                    query.published.set(seq);
                    let mut publish = query.publish.borrow_mut();
                    (*publish)(value);
                }
                Ok(_) => {
                    tracing::debug!(query = query.name, seq, "discarding stale result");
                }
                Err(err) => {
                    tracing::warn!(query = query.name, error = %err, "poll query failed");
                }
            }
        })
    }
}

/// Builder for a polling task. See [`Session::poll`].
pub struct Poll<W> {
    session: Session<W>,
    interval: Duration,
    queries: Vec<Box<dyn Refresh<W>>>,
}

impl<W: WalletProvider + 'static> Poll<W> {
    /// Adds a value: `fetch` reads it, `publish` receives every fresh result.
    pub fn query<T, F, Fut, P>(mut self, name: &'static str, fetch: F, publish: P) -> Self
    where
        T: 'static,
        F: Fn(ReadOnlyView<W>) -> Fut + 'static,
        Fut: Future<Output = Result<T>> + 'static,
        P: FnMut(T) + 'static,
    {
        let query = Query {
            name,
            fetch: Box::new(move |view: ReadOnlyView<W>| fetch(view).boxed_local()),
            publish: RefCell::new(Box::new(publish)),
            published: Cell::new(0),
        };
        self.queries.push(Box::new(Rc::new(query)));
        self
    }

    /// Returns the polling task and the handle that cancels it.
    ///
    /// The caller spawns the task on its local executor.
    pub fn start(self) -> (impl Future<Output = ()>, PollHandle) {
        let (abort, registration) = AbortHandle::new_pair();
        let task = Abortable::new(self.run(), registration).map(|_| ());
        (task, PollHandle { abort })
    }

    async fn run(self) {
        let timer = self.session.timer();
        let queries = Rc::new(self.queries);
        let mut in_flight = FuturesUnordered::new();
        let mut seq = 0u64;

        loop {
            seq += 1;
            in_flight.push(refresh_all(self.session.clone(), queries.clone(), seq));

            // Earlier fetches keep running across ticks.
            let mut tick = timer.sleep(self.interval);
            loop {
                if in_flight.is_empty() {
                    tick.await;
                    break;
                }
                match future::select(tick, in_flight.next()).await {
                    Either::Left(_) => break,
                    Either::Right((_, pending_tick)) => tick = pending_tick,
                }
            }
        }
    }
}

async fn refresh_all<W: WalletProvider + 'static>(
    session: Session<W>,
    queries: Rc<Vec<Box<dyn Refresh<W>>>>,
    seq: u64,
) {
    let view = match session.read_only().await {
        Ok(view) => view,
        Err(err) => {
            tracing::warn!(error = %err, seq, "skipping poll tick");
            return;
        }
    };
    future::join_all(queries.iter().map(|query| query.refresh(view.clone(), seq))).await;
}

/// Stops the polling task when stopped or dropped.
#[derive(Debug)]
pub struct PollHandle {
    abort: AbortHandle,
}

impl PollHandle {
    pub fn stop(&self) {
        self.abort.abort();
    }

    pub fn is_stopped(&self) -> bool {
        self.abort.is_aborted()
    }
}

impl Drop for PollHandle {
    fn drop(&mut self) {
        self.abort.abort();
    }
}
