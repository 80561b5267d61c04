//! Page-scoped data discovered from the rendered document.

use fm_host::{normalize_relative_path, AdminBootstrap, PageContext};
use thiserror::Error;

/// `<meta name=…>` carrying the anti-forgery token.
pub const CSRF_META_NAME: &str = "csrf-token";
/// Id of the `<script type="application/json">` element holding [`AdminBootstrap`].
pub const ADMIN_BOOTSTRAP_ELEMENT_ID: &str = "admin-bootstrap";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
/// Missing or malformed page data.
pub enum PageDataError {
    /// No anti-forgery token meta element; requests will be rejected by the server.
    #[error("no <meta name=\"csrf-token\"> element found; continuing without a token")]
    MissingCsrfToken {
        /// Context built from everything else that was discovered.
        fallback: PageContext,
    },
    /// No admin bootstrap element.
    #[error("no #admin-bootstrap element found")]
    MissingAdminBootstrap,
    /// The admin bootstrap element did not hold valid JSON.
    #[error("invalid admin bootstrap JSON: {0}")]
    InvalidAdminBootstrap(String),
}

/// Builds a page context from a raw token and an already percent-decoded URL path.
pub fn page_context_from(
    csrf_token: Option<String>,
    location_path: Option<String>,
) -> Result<PageContext, PageDataError> {
    let current_path = normalize_relative_path(location_path.as_deref().unwrap_or_default());
    match csrf_token.filter(|token| !token.trim().is_empty()) {
        Some(token) => Ok(PageContext::new(&current_path, token.trim())),
        None => Err(PageDataError::MissingCsrfToken {
            fallback: PageContext::new(&current_path, ""),
        }),
    }
}

/// Reads the page context of the current document.
///
/// # Errors
///
/// Returns [`PageDataError::MissingCsrfToken`] carrying a token-less fallback context when the
/// document has no token meta element.
pub fn read_page_context() -> Result<PageContext, PageDataError> {
    page_context_from(
        crate::bridge::meta_content(CSRF_META_NAME),
        crate::bridge::location_path(),
    )
}

/// Parses the admin bootstrap payload.
pub fn admin_bootstrap_from(raw: Option<String>) -> Result<AdminBootstrap, PageDataError> {
    let raw = raw.ok_or(PageDataError::MissingAdminBootstrap)?;
    serde_json::from_str(&raw).map_err(|err| PageDataError::InvalidAdminBootstrap(err.to_string()))
}

/// Reads the admin bootstrap payload embedded in the current document.
///
/// # Errors
///
/// Returns [`PageDataError`] when the element is absent or its JSON is malformed.
pub fn read_admin_bootstrap() -> Result<AdminBootstrap, PageDataError> {
    admin_bootstrap_from(crate::bridge::element_text(ADMIN_BOOTSTRAP_ELEMENT_ID))
}
