use super::*;

fn unsupported(request: &HttpRequest) -> ApiError {
    ApiError::Unsupported(format!(
        "{} {} needs the browser transport, which is only available when compiled for wasm32",
        request.method.as_str(),
        request.url
    ))
}

pub async fn send(
    request: HttpRequest,
    _progress: Option<UploadProgressSink>,
) -> Result<HttpResponse, ApiError> {
    Err(unsupported(&request))
}

pub fn meta_content(_name: &str) -> Option<String> {
    None
}

pub fn location_path() -> Option<String> {
    None
}

pub fn element_text(_id: &str) -> Option<String> {
    None
}
