use std::rc::Rc;

use fm_host::{AdminApi, AdminBootstrap, FileManagerApi, PageContext};
use fm_host_web::{
    read_admin_bootstrap, read_page_context, PageDataError, WebAdminApi, WebFileManagerApi,
};
use fm_ui::{AdminPage, AdminProvider, DirectoryPage, DirectoryViewProvider};
use leptos::*;
use leptos_meta::*;
use leptos_router::*;

#[component]
pub fn SiteApp() -> impl IntoView {
    provide_meta_context();

    view! {
        <Title text="File Manager" />
        <Meta name="description" content="Browse, upload, and organize your files." />

        <Router>
            <main class="site-root">
                <Routes>
                    <Route path="/admin" view=AdminEntry />
                    <Route path="" view=DirectoryEntry />
                    <Route path="/*path" view=DirectoryEntry />
                </Routes>
            </main>
        </Router>
    }
}

/// Page context of the current document; a missing token is logged and requests go out without
/// one.
fn page_context() -> PageContext {
    read_page_context().unwrap_or_else(|err| {
        logging::warn!("page context incomplete: {err}");
        match err {
            PageDataError::MissingCsrfToken { fallback } => fallback,
            _ => PageContext::default(),
        }
    })
}

#[component]
pub fn DirectoryEntry() -> impl IntoView {
    let page = page_context();
    let api: Rc<dyn FileManagerApi> = Rc::new(WebFileManagerApi::new(&page));

    view! {
        <DirectoryViewProvider page api>
            <DirectoryPage />
        </DirectoryViewProvider>
    }
}

#[component]
pub fn AdminEntry() -> impl IntoView {
    let page = page_context();
    let bootstrap = read_admin_bootstrap().unwrap_or_else(|err| {
        logging::warn!("admin bootstrap unavailable, starting empty: {err}");
        AdminBootstrap::default()
    });
    let api: Rc<dyn AdminApi> = Rc::new(WebAdminApi::new(&page));

    view! {
        <AdminProvider page bootstrap api>
            <AdminPage />
        </AdminProvider>
    }
}
