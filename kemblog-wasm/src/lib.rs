mod api;
mod app;

use app::App;
use wasm_bindgen::prelude::*;

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    // Устанавливаем обработчик паники
    console_error_panic_hook::set_once();

    // tracing события клиента приходят сюда через log
    let level = if cfg!(debug_assertions) {
        log::Level::Debug
    } else {
        log::Level::Info
    };
    console_log::init_with_level(level).unwrap_or_else(|e| {
        web_sys::console::log_1(&format!("Failed to init logger: {}", e).into());
    });

    yew::Renderer::<App>::new().render();

    Ok(())
}
