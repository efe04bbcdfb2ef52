use std::time::Duration;

use async_trait::async_trait;
use dioxus::prelude::*;
use futures::future::LocalBoxFuture;
use serde_json::Value;
use svgnft_api::error::ProviderError;
use svgnft_api::notify::{Notice, NoticeLevel, Notifier};
use svgnft_api::provider::WalletProvider;
use svgnft_api::session::SessionState;
use svgnft_api::timer::Timer;

/// The EIP-1193 provider a wallet extension injects as `window.ethereum`.
#[derive(Clone, Copy, Debug, Default)]
pub struct InjectedWallet;

#[async_trait(?Send)]
impl WalletProvider for InjectedWallet {
    async fn request(&self, method: &str, params: Value) -> Result<Value, ProviderError> {
        ethereum_request(method, params).await
    }
}

#[cfg(feature = "web")]
async fn ethereum_request(method: &str, params: Value) -> Result<Value, ProviderError> {
    use js_sys::{Function, Object, Promise, Reflect, JSON};
    use wasm_bindgen::prelude::*;

    let window = web_sys::window().ok_or_else(|| ProviderError::Unavailable("No window".into()))?;

    let ethereum = Reflect::get(&window, &JsValue::from_str("ethereum"))
        .map_err(|_| ProviderError::Unavailable("No injected wallet".into()))?;

    if ethereum.is_undefined() {
        return Err(ProviderError::Unavailable(
            "No wallet found. Please install MetaMask and refresh.".into(),
        ));
    }

    let request_fn: Function = Reflect::get(&ethereum, &JsValue::from_str("request"))
        .map_err(|_| ProviderError::Unavailable("No request method".into()))?
        .dyn_into()
        .map_err(|_| ProviderError::Unavailable("request is not a function".into()))?;

    let args = Object::new();
    let params = JSON::parse(&params.to_string())
        .map_err(|e| ProviderError::Decode(format!("{:?}", e)))?;
    Reflect::set(&args, &JsValue::from_str("method"), &JsValue::from_str(method))
        .and_then(|_| Reflect::set(&args, &JsValue::from_str("params"), &params))
        .map_err(|e| ProviderError::Transport(format!("{:?}", e)))?;

    let promise: Promise = request_fn
        .call1(&ethereum, &args)
        .map_err(js_error)?
        .dyn_into()
        .map_err(|_| ProviderError::Transport("Not a promise".into()))?;

    let result = wasm_bindgen_futures::JsFuture::from(promise)
        .await
        .map_err(js_error)?;

    if result.is_undefined() || result.is_null() {
        return Ok(Value::Null);
    }
    let text: String = JSON::stringify(&result).map_err(js_error)?.into();
    Ok(serde_json::from_str(&text)?)
}

/// Maps a rejected request to its EIP-1193 `{code, message}`.
#[cfg(feature = "web")]
fn js_error(err: wasm_bindgen::JsValue) -> ProviderError {
    use js_sys::Reflect;
    use wasm_bindgen::JsValue;

    let field = |name: &str| Reflect::get(&err, &JsValue::from_str(name)).ok();
    let message = field("message")
        .and_then(|m| m.as_string())
        .unwrap_or_else(|| format!("{:?}", err));
    match field("code").and_then(|c| c.as_f64()) {
        Some(code) => ProviderError::Rpc {
            code: code as i64,
            message,
        },
        None => ProviderError::Transport(message),
    }
}

#[cfg(not(feature = "web"))]
async fn ethereum_request(_method: &str, _params: Value) -> Result<Value, ProviderError> {
    Err(ProviderError::Unavailable(
        "Injected wallet only available in web mode".into(),
    ))
}

#[derive(Clone, Copy, Debug, Default)]
pub struct GlooTimer;

impl Timer for GlooTimer {
    fn sleep(&self, duration: Duration) -> LocalBoxFuture<'static, ()> {
        let millis = u32::try_from(duration.as_millis()).unwrap_or(u32::MAX);
        Box::pin(gloo_timers::future::TimeoutFuture::new(millis))
    }
}

/// Mirrors the session state into a page signal and shows notices with
/// `window.alert`.
pub struct AlertNotifier {
    pub state: Signal<SessionState>,
}

impl Notifier for AlertNotifier {
    fn state_changed(&self, state: SessionState) {
        let mut signal = self.state;
        signal.set(state);
    }

    fn notify(&self, notice: &Notice) {
        match notice.level {
            NoticeLevel::Failure => tracing::warn!("{}", notice.message),
            _ => tracing::info!("{}", notice.message),
        }

        #[cfg(feature = "web")]
        if let Some(window) = web_sys::window() {
            let _ = window.alert_with_message(&notice.message);
        }
    }
}
