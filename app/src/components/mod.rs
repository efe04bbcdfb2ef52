mod connect_button;
mod layout;
mod stat_row;

pub use connect_button::ConnectButton;
pub use layout::Layout;
pub use stat_row::StatRow;
