use std::{cell::RefCell, rc::Rc};

use fm_host::{http::CSRF_HEADER, RequestBody, UploadBody, UploadPayload, UploadProgress};
use futures::channel::oneshot;
use wasm_bindgen::{closure::Closure, JsCast, JsValue};
use web_sys::{Blob, FormData, ProgressEvent, UrlSearchParams, XmlHttpRequest};

use super::*;

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded; charset=UTF-8";

fn js_failure(context: &str, err: JsValue) -> ApiError {
    let detail = err
        .as_string()
        .or_else(|| {
            err.dyn_ref::<js_sys::Error>()
                .map(|error| String::from(error.message()))
        })
        .unwrap_or_else(|| format!("{err:?}"));
    ApiError::Transport(format!("{context}: {detail}"))
}

fn payload_blob(payload: UploadPayload) -> Result<Blob, ApiError> {
    match payload.body {
        UploadBody::Bytes(bytes) => {
            let array = js_sys::Uint8Array::from(bytes.as_slice());
            Blob::new_with_u8_array_sequence(&js_sys::Array::of1(&array))
                .map_err(|err| js_failure("build upload blob", err))
        }
        UploadBody::BrowserFile(file) => Ok(file.unchecked_into::<Blob>()),
    }
}

fn send_body(xhr: &XmlHttpRequest, body: RequestBody) -> Result<(), ApiError> {
    match body {
        RequestBody::Empty => xhr.send(),
        RequestBody::Form(fields) => {
            let params =
                UrlSearchParams::new().map_err(|err| js_failure("build form body", err))?;
            for (name, value) in &fields {
                params.append(name, value);
            }
            xhr.set_request_header("Content-Type", FORM_CONTENT_TYPE)
                .map_err(|err| js_failure("set content type", err))?;
            let encoded = String::from(params.to_string());
            xhr.send_with_opt_str(Some(&encoded))
        }
        RequestBody::Multipart { fields, files } => {
            let form = FormData::new().map_err(|err| js_failure("build multipart body", err))?;
            for (name, value) in &fields {
                form.append_with_str(name, value)
                    .map_err(|err| js_failure("append form field", err))?;
            }
            for (name, payload) in files {
                let file_name = payload.name.clone();
                let blob = payload_blob(payload)?;
                form.append_with_blob_and_filename(&name, &blob, &file_name)
                    .map_err(|err| js_failure("append upload file", err))?;
            }
            xhr.send_with_opt_form_data(Some(&form))
        }
    }
    .map_err(|err| js_failure("send request", err))
}

pub async fn send(
    request: HttpRequest,
    progress: Option<UploadProgressSink>,
) -> Result<HttpResponse, ApiError> {
    let xhr = XmlHttpRequest::new().map_err(|err| js_failure("create request", err))?;
    xhr.open_with_async(request.method.as_str(), &request.url, true)
        .map_err(|err| js_failure("open request", err))?;
    xhr.set_request_header(CSRF_HEADER, &request.csrf_token)
        .map_err(|err| js_failure("set csrf header", err))?;

    let (tx, rx) = oneshot::channel::<Result<(), String>>();
    let tx = Rc::new(RefCell::new(Some(tx)));
    let settle = move |outcome: Result<(), String>| {
        if let Some(tx) = tx.borrow_mut().take() {
            let _ = tx.send(outcome);
        }
    };
    let on_load = {
        let settle = settle.clone();
        Closure::<dyn FnMut()>::new(move || settle(Ok(())))
    };
    let on_error = {
        let settle = settle.clone();
        Closure::<dyn FnMut()>::new(move || settle(Err("network error".to_string())))
    };
    let on_abort = Closure::<dyn FnMut()>::new(move || settle(Err("request aborted".to_string())));
    xhr.set_onload(Some(on_load.as_ref().unchecked_ref()));
    xhr.set_onerror(Some(on_error.as_ref().unchecked_ref()));
    xhr.set_onabort(Some(on_abort.as_ref().unchecked_ref()));

    let on_progress = progress.map(|sink| {
        Closure::<dyn FnMut(ProgressEvent)>::new(move |event: ProgressEvent| {
            sink(UploadProgress {
                loaded: event.loaded() as u64,
                total: event.length_computable().then(|| event.total() as u64),
            });
        })
    });
    if let Some(callback) = on_progress.as_ref() {
        xhr.upload()
            .map_err(|err| js_failure("attach upload progress", err))?
            .set_onprogress(Some(callback.as_ref().unchecked_ref()));
    }

    send_body(&xhr, request.body)?;
    let outcome = rx
        .await
        .map_err(|_| ApiError::Transport("request dropped before completion".to_string()))?;
    drop((on_load, on_error, on_abort, on_progress));
    outcome.map_err(ApiError::Transport)?;

    let status = xhr
        .status()
        .map_err(|err| js_failure("read status", err))?;
    let body = xhr
        .response_text()
        .map_err(|err| js_failure("read response", err))?
        .unwrap_or_default();
    Ok(HttpResponse { status, body })
}

pub fn meta_content(name: &str) -> Option<String> {
    let document = web_sys::window()?.document()?;
    let element = document
        .query_selector(&format!("meta[name=\"{name}\"]"))
        .ok()??;
    element.get_attribute("content")
}

pub fn location_path() -> Option<String> {
    let raw = web_sys::window()?.location().pathname().ok()?;
    js_sys::decode_uri_component(&raw).ok().map(String::from)
}

pub fn element_text(id: &str) -> Option<String> {
    web_sys::window()?
        .document()?
        .get_element_by_id(id)?
        .text_content()
}
