use std::time::Duration;

pub fn window() -> web_sys::Window {
    web_sys::window().expect("not running in a browser")
}

/// Same-origin API base: one origin serves both the app and the api
pub fn api_base() -> String {
    window()
        .location()
        .origin()
        .expect("failed reading window origin")
}

pub fn alert(msg: &str) {
    if window().alert_with_message(msg).is_err() {
        tracing::warn!(msg, "failed showing alert");
    }
}

pub fn confirm(msg: &str) -> bool {
    window().confirm_with_message(msg).unwrap_or(false)
}

pub fn prompt(msg: &str) -> Option<String> {
    window().prompt_with_message(msg).ok().flatten()
}

pub async fn sleep_for(d: Duration) {
    wasm_timer::Delay::new(d).await.expect("failed sleeping")
}
