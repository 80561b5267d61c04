//! Browser-side helpers used by the effect executors: timers, confirmation prompts, focus moves,
//! and reading picked files.

use std::time::Duration;

use fm_host::UploadPayload;
use leptos::{logging, set_timeout_with_handle};
#[cfg(target_arch = "wasm32")]
use wasm_bindgen::{closure::Closure, JsCast};

/// Runs `callback` once after `delay_ms`.
pub(crate) fn run_after(delay_ms: u32, callback: impl FnOnce() + 'static) {
    if let Err(err) = set_timeout_with_handle(callback, Duration::from_millis(u64::from(delay_ms)))
    {
        logging::warn!("timer scheduling failed after {delay_ms}ms: {err:?}");
    }
}

/// Shows a blocking confirmation prompt. Returns `false` when no window is available.
pub(crate) fn confirm(prompt: &str) -> bool {
    #[cfg(target_arch = "wasm32")]
    {
        let Some(window) = web_sys::window() else {
            return false;
        };
        match window.confirm_with_message(prompt) {
            Ok(accepted) => accepted,
            Err(err) => {
                logging::warn!("confirmation prompt failed: {err:?}");
                false
            }
        }
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        let _ = prompt;
        false
    }
}

/// Focuses and selects the input with DOM id `element_id` on the next tick, once it has rendered.
pub(crate) fn focus_input(element_id: &'static str) {
    #[cfg(target_arch = "wasm32")]
    {
        let Some(window) = web_sys::window() else {
            return;
        };
        let callback = Closure::once_into_js(move || {
            let Some(element) = web_sys::window()
                .and_then(|window| window.document())
                .and_then(|document| document.get_element_by_id(element_id))
            else {
                return;
            };
            let Ok(input) = element.dyn_into::<web_sys::HtmlInputElement>() else {
                return;
            };
            let _ = input.focus();
            input.select();
        });
        let _ = window
            .set_timeout_with_callback_and_timeout_and_arguments_0(callback.unchecked_ref(), 0);
    }
    #[cfg(not(target_arch = "wasm32"))]
    let _ = element_id;
}

/// Files currently picked in the `<input type="file">` that fired `ev`.
pub(crate) fn picked_files(ev: &web_sys::Event) -> Vec<UploadPayload> {
    #[cfg(target_arch = "wasm32")]
    {
        let Some(input) = ev
            .target()
            .and_then(|target| target.dyn_into::<web_sys::HtmlInputElement>().ok())
        else {
            return Vec::new();
        };
        let Some(list) = input.files() else {
            return Vec::new();
        };
        (0..list.length())
            .filter_map(|index| list.get(index))
            .map(UploadPayload::from_browser_file)
            .collect()
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        let _ = ev;
        Vec::new()
    }
}
