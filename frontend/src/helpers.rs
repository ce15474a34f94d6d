//! Browser utilities shared by the components: toasts, clipboard, file
//! downloads, dirty tracking and the sign-in redirect outcome.

use js_sys::{Array, Function, Reflect};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{Blob, BlobPropertyBag, HtmlAnchorElement, HtmlElement, Url, UrlSearchParams};

/// Displays a temporary notification message at the bottom of the screen.
///
/// The toast removes itself after three seconds.
///
/// # Arguments
/// * `message` - Plain text to display.
pub fn show_toast(message: &str) {
    let Some(document) = web_sys::window().and_then(|w| w.document()) else {
        return;
    };
    if let (Ok(toast), Some(body)) = (document.create_element("div"), document.body()) {
        toast.set_text_content(Some(message));
        toast.set_class_name("toast");
        let html_toast: HtmlElement = toast.unchecked_into();

        if body.append_child(&html_toast).is_ok() {
            wasm_bindgen_futures::spawn_local(async move {
                gloo_timers::future::TimeoutFuture::new(3000).await;
                if let Some(parent) = html_toast.parent_node() {
                    parent.remove_child(&html_toast).ok();
                }
            });
        }
    }
}

/// Computes the MD5 hash of a string and returns it as a hex digest.
///
/// The editor stores the digest of the text it last loaded or saved and
/// compares it with the digest of the current text to show the unsaved
/// changes marker.
pub fn compute_md5(input: &str) -> String {
    format!("{:x}", md5::compute(input))
}

/// Publishes the dirty state as `window.app_dirty`, read by the
/// `beforeunload` guard registered in `main.rs`.
pub fn set_window_dirty_flag(dirty: bool) {
    if let Some(window) = web_sys::window() {
        let _ = Reflect::set(
            &window,
            &JsValue::from_str("app_dirty"),
            &JsValue::from_bool(dirty),
        );
    }
}

pub fn window_is_dirty() -> bool {
    web_sys::window()
        .and_then(|w| Reflect::get(&w, &JsValue::from_str("app_dirty")).ok())
        .and_then(|v| v.as_bool())
        .unwrap_or(false)
}

/// Copies `text` to the system clipboard.
pub async fn copy_to_clipboard(text: &str) -> Result<(), String> {
    let write = Function::new_with_args("text", "return navigator.clipboard.writeText(text);");
    let promise = write
        .call1(&JsValue::NULL, &JsValue::from_str(text))
        .map_err(|e| format!("{:?}", e))?;
    JsFuture::from(js_sys::Promise::from(promise))
        .await
        .map(|_| ())
        .map_err(|_| "The browser refused clipboard access".to_string())
}

/// Offers `content` to the user as a file download.
pub fn download_file(file_name: &str, mime_type: &str, content: &str) -> Result<(), JsValue> {
    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| JsValue::from_str("no document"))?;

    let parts = Array::of1(&JsValue::from_str(content));
    let options = BlobPropertyBag::new();
    options.set_type(mime_type);
    let blob = Blob::new_with_str_sequence_and_options(&parts, &options)?;
    let url = Url::create_object_url_with_blob(&blob)?;

    let anchor: HtmlAnchorElement = document.create_element("a")?.unchecked_into();
    anchor.set_href(&url);
    anchor.set_download(file_name);
    anchor.click();
    Url::revoke_object_url(&url)
}

/// Result of coming back from the OAuth redirect.
#[derive(Debug, Clone, PartialEq)]
pub enum AuthOutcome {
    SignedIn,
    Failed(String),
}

/// Reads `?auth=success` / `?error=<reason>` from the address bar and removes
/// it so a reload does not repeat the message.
pub fn take_auth_outcome() -> Option<AuthOutcome> {
    let window = web_sys::window()?;
    let search = window.location().search().ok()?;
    let params = UrlSearchParams::new_with_str(&search).ok()?;

    let outcome = if params.get("auth").as_deref() == Some("success") {
        AuthOutcome::SignedIn
    } else {
        AuthOutcome::Failed(params.get("error")?)
    };

    if let Ok(history) = window.history() {
        let path = window.location().pathname().unwrap_or_else(|_| "/".to_string());
        let _ = history.replace_state_with_url(&JsValue::NULL, "", Some(&path));
    }
    Some(outcome)
}

/// User-facing text for the reason codes of the OAuth callback.
pub fn auth_failure_message(reason: &str) -> &'static str {
    match reason {
        "config_missing" => "Sign-in is not configured on the server",
        "auth_failed" => "Sign-in was cancelled or refused",
        "no_code" => "The provider did not return an authorization code",
        _ => "Sign-in failed, please try again",
    }
}
