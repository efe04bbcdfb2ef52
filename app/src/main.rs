#![allow(non_snake_case)]

mod components;
mod hooks;
mod pages;
mod route;

use dioxus::prelude::*;
use route::Route;

fn main() {
    #[cfg(feature = "web")]
    {
        tracing_wasm::set_as_global_default();
        dioxus::launch(App);
    }

    #[cfg(feature = "desktop")]
    {
        dioxus::launch(App);
    }
}

#[component]
fn App() -> Element {
    rsx! {
        Router::<Route> {}
    }
}
