use dioxus::prelude::*;

use crate::components::Layout;
use crate::pages::{Liquidity, Mint, Staking, Swap};

#[derive(Clone, Routable, Debug, PartialEq)]
#[rustfmt::skip]
pub enum Route {
    #[layout(Layout)]
    #[route("/")]
    Mint {},
    #[route("/staking")]
    Staking {},
    #[route("/liquidity")]
    Liquidity {},
    #[route("/swap")]
    Swap {},
}
