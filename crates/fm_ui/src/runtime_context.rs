//! Provider and context wiring for the two pages.
//!
//! Each provider owns the page's reducer state signal, the effect queue drained by
//! [`crate::effect_executor`], and the service adapter requests run against. Page components
//! read state through the context and send every change through `dispatch`.

use std::rc::Rc;

use fm_host::{AdminApi, AdminBootstrap, FileManagerApi, PageContext};
use fm_runtime::{
    reduce_admin, reduce_directory_view, AdminAction, AdminEffect, AdminState,
    DirectoryViewState, RuntimeSettings, ViewAction, ViewEffect,
};
use leptos::*;

use crate::effect_executor;

#[derive(Clone, Copy)]
/// Leptos context for reading directory page state and dispatching [`ViewAction`] values.
pub struct DirectoryViewContext {
    /// Service adapter for listing, mutation, tree, size, and upload requests.
    pub api: StoredValue<Rc<dyn FileManagerApi>>,
    /// Reactive page state.
    pub state: RwSignal<DirectoryViewState>,
    /// Queue of effects emitted by the reducer and processed by the executor.
    pub effects: RwSignal<Vec<ViewEffect>>,
    /// Reducer dispatch callback.
    pub dispatch: Callback<ViewAction>,
}

impl DirectoryViewContext {
    /// Dispatches a reducer action through the context callback.
    pub fn dispatch_action(&self, action: ViewAction) {
        self.dispatch.call(action);
    }
}

#[component]
/// Provides [`DirectoryViewContext`] to descendant components and fetches the initial listing.
pub fn DirectoryViewProvider(
    /// Page-scoped path and anti-forgery token.
    page: PageContext,
    /// Service adapter assembled by the entry layer.
    api: Rc<dyn FileManagerApi>,
    /// Timer delays; defaults apply when omitted.
    #[prop(optional)]
    settings: Option<RuntimeSettings>,
    children: Children,
) -> impl IntoView {
    let api = store_value(api);
    let state = create_rw_signal(DirectoryViewState::pending(
        page,
        settings.unwrap_or_default(),
    ));
    let effects = create_rw_signal(Vec::<ViewEffect>::new());

    let dispatch = Callback::new(move |action: ViewAction| {
        let mut view = state.get_untracked();
        let previous = view.clone();

        match reduce_directory_view(&mut view, action) {
            Ok(new_effects) => {
                if view != previous {
                    state.set(view);
                }
                if !new_effects.is_empty() {
                    let mut queue = effects.get_untracked();
                    queue.extend(new_effects);
                    effects.set(queue);
                }
            }
            Err(err) => logging::warn!("directory reducer error: {err}"),
        }
    });

    let runtime = DirectoryViewContext {
        api,
        state,
        effects,
        dispatch,
    };

    provide_context(runtime);
    effect_executor::install_directory(runtime);

    if !state.get_untracked().listing_loaded {
        runtime.dispatch_action(ViewAction::RefreshListing);
    }

    children().into_view()
}

/// Returns the current [`DirectoryViewContext`].
///
/// # Panics
///
/// Panics if called outside [`DirectoryViewProvider`].
pub fn use_directory_view() -> DirectoryViewContext {
    use_context::<DirectoryViewContext>().expect("DirectoryViewContext not provided")
}

#[derive(Clone, Copy)]
/// Leptos context for reading admin page state and dispatching [`AdminAction`] values.
pub struct AdminContext {
    /// Service adapter for account and registration requests.
    pub api: StoredValue<Rc<dyn AdminApi>>,
    /// Reactive page state.
    pub state: RwSignal<AdminState>,
    /// Queue of effects emitted by the reducer and processed by the executor.
    pub effects: RwSignal<Vec<AdminEffect>>,
    /// Reducer dispatch callback.
    pub dispatch: Callback<AdminAction>,
}

impl AdminContext {
    /// Dispatches a reducer action through the context callback.
    pub fn dispatch_action(&self, action: AdminAction) {
        self.dispatch.call(action);
    }
}

#[component]
/// Provides [`AdminContext`] to descendant components, seeded from the embedded bootstrap data.
pub fn AdminProvider(
    /// Page-scoped anti-forgery token.
    page: PageContext,
    /// Registration flag and account rows rendered by the server.
    bootstrap: AdminBootstrap,
    /// Service adapter assembled by the entry layer.
    api: Rc<dyn AdminApi>,
    /// Timer delays; defaults apply when omitted.
    #[prop(optional)]
    settings: Option<RuntimeSettings>,
    children: Children,
) -> impl IntoView {
    let api = store_value(api);
    let state = create_rw_signal(AdminState::new(
        page,
        bootstrap,
        settings.unwrap_or_default(),
    ));
    let effects = create_rw_signal(Vec::<AdminEffect>::new());

    let dispatch = Callback::new(move |action: AdminAction| {
        let mut admin = state.get_untracked();
        let previous = admin.clone();

        match reduce_admin(&mut admin, action) {
            Ok(new_effects) => {
                if admin != previous {
                    state.set(admin);
                }
                if !new_effects.is_empty() {
                    let mut queue = effects.get_untracked();
                    queue.extend(new_effects);
                    effects.set(queue);
                }
            }
            Err(err) => logging::warn!("admin reducer error: {err}"),
        }
    });

    let runtime = AdminContext {
        api,
        state,
        effects,
        dispatch,
    };

    provide_context(runtime);
    effect_executor::install_admin(runtime);

    children().into_view()
}

/// Returns the current [`AdminContext`].
///
/// # Panics
///
/// Panics if called outside [`AdminProvider`].
pub fn use_admin() -> AdminContext {
    use_context::<AdminContext>().expect("AdminContext not provided")
}
