use dioxus::prelude::*;
use svgnft_api::consts::DEFAULT_DEPLOYMENT;

use crate::route::Route;

#[component]
pub fn Layout() -> Element {
    let network = DEFAULT_DEPLOYMENT.network_name;
    let nft = DEFAULT_DEPLOYMENT.nft.to_string();

    rsx! {
        div { class: "min-h-screen",
            style: "background-color: var(--surface-base);",
            nav { class: "border-b elevated-border backdrop-blur sticky top-0 z-50",
                style: "background-color: var(--surface-base);",
                div { class: "max-w-7xl mx-auto px-4 sm:px-6 lg:px-8",
                    div { class: "flex justify-between h-16",
                        div { class: "flex items-center",
                            Link { to: Route::Mint {}, class: "flex items-center space-x-2",
                                span { class: "text-2xl font-bold text-gold", "Random SVG NFT" }
                            }
                        }

                        div { class: "hidden sm:flex sm:items-center sm:space-x-8",
                            NavLink { to: Route::Mint {}, label: "Mint" }
                            NavLink { to: Route::Staking {}, label: "Staking" }
                            NavLink { to: Route::Liquidity {}, label: "Liquidity" }
                            NavLink { to: Route::Swap {}, label: "Swap" }
                        }
                    }
                }
            }

            // Each page renders its own connect button.
            main { class: "max-w-7xl mx-auto px-4 sm:px-6 lg:px-8 py-8",
                Outlet::<Route> {}
            }

            footer { class: "border-t elevated-border py-8 mt-auto",
                div { class: "max-w-7xl mx-auto px-4 sm:px-6 lg:px-8 text-center text-low",
                    p { "Random SVG NFT on {network}" }
                    p { class: "text-sm mt-2",
                        "NFT: "
                        code { class: "text-gold", "{nft}" }
                    }
                }
            }
        }
    }
}

#[component]
fn NavLink(to: Route, label: &'static str) -> Element {
    rsx! {
        Link {
            to: to,
            class: "text-mid hover:text-gold px-3 py-2 text-sm font-medium transition-colors",
            "{label}"
        }
    }
}
