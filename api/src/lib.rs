pub mod consts;
pub mod contracts;
pub mod error;
pub mod format;
pub mod notify;
pub mod poll;
pub mod provider;
pub mod session;
pub mod timer;
pub mod tx;

#[cfg(test)]
mod testing;

pub mod prelude {
    pub use crate::consts::*;
    pub use crate::contracts::*;
    pub use crate::error::*;
    pub use crate::format::*;
    pub use crate::notify::*;
    pub use crate::poll::*;
    pub use crate::provider::*;
    pub use crate::session::*;
    pub use crate::timer::*;
    pub use crate::tx::*;
}
