//! Target-specific transport and DOM glue.
//!
//! Routes calls to the wasm implementation in the browser and to an inert shim elsewhere, so the
//! workspace builds and tests natively.

use fm_host::{ApiError, HttpRequest, HttpResponse, UploadProgressSink};

#[cfg(not(target_arch = "wasm32"))]
mod non_wasm;
#[cfg(target_arch = "wasm32")]
mod wasm;

#[cfg(not(target_arch = "wasm32"))]
use non_wasm as imp;
#[cfg(target_arch = "wasm32")]
use wasm as imp;

pub async fn send(
    request: HttpRequest,
    progress: Option<UploadProgressSink>,
) -> Result<HttpResponse, ApiError> {
    imp::send(request, progress).await
}

pub fn meta_content(name: &str) -> Option<String> {
    imp::meta_content(name)
}

pub fn location_path() -> Option<String> {
    imp::location_path()
}

pub fn element_text(id: &str) -> Option<String> {
    imp::element_text(id)
}
