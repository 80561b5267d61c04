//! Effect-queue executors for reducer-emitted side effects.

use std::rc::Rc;

use fm_runtime::{
    run_admin_request, run_upload, run_view_request, AdminAction, AdminEffect, ViewAction,
    ViewEffect,
};
use leptos::*;

use crate::{
    host_ui,
    runtime_context::{AdminContext, DirectoryViewContext},
};

/// DOM id of the rename dialog's text input.
pub const RENAME_INPUT_ID: &str = "fm-rename-input";

/// Installs the executor that drains directory page effects in order.
pub fn install_directory(runtime: DirectoryViewContext) {
    // Clear the queue before running so nested dispatches enqueue a fresh batch.
    create_effect(move |_| {
        let queued = runtime.effects.get();
        if queued.is_empty() {
            return;
        }

        runtime.effects.set(Vec::new());

        for effect in queued {
            run_view_effect(runtime, effect);
        }
    });
}

fn run_view_effect(runtime: DirectoryViewContext, effect: ViewEffect) {
    match effect {
        ViewEffect::Request(request) => {
            let api = runtime.api.get_value();
            spawn_local(async move {
                let action = run_view_request(api.as_ref(), request).await;
                runtime.dispatch_action(action);
            });
        }
        ViewEffect::Upload { session, request } => {
            let api = runtime.api.get_value();
            let dispatch: Rc<dyn Fn(ViewAction)> =
                Rc::new(move |action: ViewAction| runtime.dispatch_action(action));
            spawn_local(async move {
                let action = run_upload(api.as_ref(), session, request, dispatch).await;
                runtime.dispatch_action(action);
            });
        }
        ViewEffect::DispatchAfter { delay_ms, action } => {
            host_ui::run_after(delay_ms, move || runtime.dispatch_action(*action));
        }
        ViewEffect::FocusRenameInput => host_ui::focus_input(RENAME_INPUT_ID),
    }
}

/// Installs the executor that drains admin page effects in order.
pub fn install_admin(runtime: AdminContext) {
    create_effect(move |_| {
        let queued = runtime.effects.get();
        if queued.is_empty() {
            return;
        }

        runtime.effects.set(Vec::new());

        for effect in queued {
            run_admin_effect(runtime, effect);
        }
    });
}

fn run_admin_effect(runtime: AdminContext, effect: AdminEffect) {
    match effect {
        AdminEffect::Request(request) => {
            let api = runtime.api.get_value();
            spawn_local(async move {
                let action = run_admin_request(api.as_ref(), request).await;
                runtime.dispatch_action(action);
            });
        }
        AdminEffect::ConfirmDeleteUser { id, prompt } => {
            if host_ui::confirm(&prompt) {
                runtime.dispatch_action(AdminAction::ConfirmDeleteUser { id });
            }
        }
        AdminEffect::DispatchAfter { delay_ms, action } => {
            host_ui::run_after(delay_ms, move || runtime.dispatch_action(*action));
        }
    }
}
