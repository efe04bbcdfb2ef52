mod use_page_session;
mod use_poll;
mod wallet;

pub use use_page_session::{use_page_session, SessionHandle};
pub use use_poll::use_poll;
