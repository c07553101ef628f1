use kemblog_client::backend::{DEFAULT_BUCKET, DEFAULT_TABLE};
use kemblog_client::{BackendConfig, BackendError, ImageFile, RestAdminService};
use wasm_bindgen_futures::JsFuture;
use web_sys::File;

// Local development stack; real deployments bake their values in at build time.
const API_BASE: &str = "http://localhost:54321";

pub fn backend_config() -> BackendConfig {
    let url = option_env!("KEMBLOG_URL").unwrap_or(API_BASE);
    let key = option_env!("KEMBLOG_KEY").unwrap_or_default();
    if key.is_empty() {
        log::warn!("KEMBLOG_KEY was not set at build time; requests will be anonymous");
    }

    BackendConfig::new(url, key)
        .with_table(option_env!("KEMBLOG_TABLE").unwrap_or(DEFAULT_TABLE))
        .with_bucket(option_env!("KEMBLOG_BUCKET").unwrap_or(DEFAULT_BUCKET))
}

pub fn connect() -> Result<RestAdminService, BackendError> {
    RestAdminService::connect(backend_config())
}

/// Reads a picked file into memory.
pub async fn read_file(file: File) -> Result<ImageFile, String> {
    let buffer = JsFuture::from(file.array_buffer())
        .await
        .map_err(|e| format!("Failed to read {}: {:?}", file.name(), e))?;
    let bytes = js_sys::Uint8Array::new(&buffer).to_vec();

    let image = ImageFile::new(file.name(), bytes);
    let content_type = file.type_();
    Ok(if content_type.is_empty() {
        image
    } else {
        image.with_content_type(content_type)
    })
}

pub fn alert(message: &str) {
    if let Err(e) = gloo_utils::window().alert_with_message(message) {
        log::error!("Failed to show alert: {:?}", e);
    }
}

pub fn confirm(message: &str) -> bool {
    gloo_utils::window()
        .confirm_with_message(message)
        .unwrap_or_else(|e| {
            log::error!("Failed to show confirmation: {:?}", e);
            false
        })
}
