//! Browser capability bridge used by the service adapters and page discovery.

mod interop;

use fm_host::{ApiError, HttpRequest, HttpResponse, UploadProgressSink};

pub(crate) async fn send(
    request: HttpRequest,
    progress: Option<UploadProgressSink>,
) -> Result<HttpResponse, ApiError> {
    interop::send(request, progress).await
}

pub(crate) fn meta_content(name: &str) -> Option<String> {
    interop::meta_content(name)
}

pub(crate) fn location_path() -> Option<String> {
    interop::location_path()
}

pub(crate) fn element_text(id: &str) -> Option<String> {
    interop::element_text(id)
}
