use std::time::Duration;

use futures::future::LocalBoxFuture;

/// Source of delays for polling and receipt tracking.
///
/// The browser uses gloo timers, native code uses tokio.
pub trait Timer {
    fn sleep(&self, duration: Duration) -> LocalBoxFuture<'static, ()>;
}

#[cfg(any(test, feature = "tokio"))]
#[derive(Clone, Copy, Debug, Default)]
pub struct TokioTimer;

#[cfg(any(test, feature = "tokio"))]
impl Timer for TokioTimer {
    fn sleep(&self, duration: Duration) -> LocalBoxFuture<'static, ()> {
        Box::pin(tokio::time::sleep(duration))
    }
}
