use std::collections::BTreeSet;

use fm_host::{
    breadcrumbs, directory_url, download_url, join_relative_path, preview_kind, sort_listing,
    view_url, AdminBootstrap, Breadcrumb, ListingEntry, PageContext, PermissionSet, PreviewKind,
    UploadPayload, UserId, UserRecord, UserRole,
};

use crate::{alerts::AlertSlot, tree::DestinationPicker, upload::UploadSession};

pub const DEFAULT_ALERT_DISMISS_MS: u32 = 5_000;
pub const DEFAULT_UPLOAD_REFRESH_DELAY_MS: u32 = 1_000;
pub const DEFAULT_ROW_FADE_MS: u32 = 300;

/// Size column text after a failed directory-size request.
pub const DIR_SIZE_FAILED_TEXT: &str = "Calculation failed";
/// Frame source of a closed preview surface.
pub const PREVIEW_BLANK_SRC: &str = "about:blank";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Timer delays used by both pages.
pub struct RuntimeSettings {
    pub alert_dismiss_ms: u32,
    pub upload_refresh_delay_ms: u32,
    pub row_fade_ms: u32,
}

impl Default for RuntimeSettings {
    fn default() -> Self {
        Self {
            alert_dismiss_ms: DEFAULT_ALERT_DISMISS_MS,
            upload_refresh_delay_ms: DEFAULT_UPLOAD_REFRESH_DELAY_MS,
            row_fade_ms: DEFAULT_ROW_FADE_MS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DirSizeState {
    #[default]
    NotRequested,
    Pending,
    Computed(String),
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Rendering of a row's directory-size trigger.
pub enum SizeTrigger {
    Hidden,
    Ready,
    Busy,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingRow {
    pub entry: ListingEntry,
    pub checked: bool,
    pub dir_size: DirSizeState,
}

impl ListingRow {
    pub fn new(entry: ListingEntry) -> Self {
        Self {
            entry,
            checked: false,
            dir_size: DirSizeState::NotRequested,
        }
    }

    pub fn name(&self) -> &str {
        &self.entry.name
    }

    pub fn size_text(&self) -> String {
        match &self.dir_size {
            DirSizeState::Computed(size) => size.clone(),
            DirSizeState::Failed => DIR_SIZE_FAILED_TEXT.to_string(),
            DirSizeState::NotRequested | DirSizeState::Pending => self.entry.size_text(),
        }
    }

    pub fn size_trigger(&self) -> SizeTrigger {
        if !self.entry.is_dir {
            return SizeTrigger::Hidden;
        }
        match self.dir_size {
            DirSizeState::Computed(_) => SizeTrigger::Hidden,
            DirSizeState::Pending => SizeTrigger::Busy,
            DirSizeState::Failed => SizeTrigger::Ready,
            DirSizeState::NotRequested if self.entry.has_size_placeholder() => SizeTrigger::Ready,
            DirSizeState::NotRequested => SizeTrigger::Hidden,
        }
    }

    /// Directory page link for folders, download link for files.
    pub fn href(&self) -> String {
        if self.entry.is_dir {
            directory_url(&self.entry.path)
        } else {
            download_url(&self.entry.path)
        }
    }

    /// Preview control for this row. The server's flag decides; an extension the client does
    /// not know is previewed as text.
    pub fn preview_kind(&self) -> Option<PreviewKind> {
        if !self.entry.previewable || self.entry.is_dir {
            return None;
        }
        Some(preview_kind(&self.entry.name, false).unwrap_or(PreviewKind::Text))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
/// Mutating action classes guarded to one in-flight request each.
pub enum ActionClass {
    CreateFolder,
    Rename,
    Delete,
    Move,
    Upload,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenameDialog {
    pub original: String,
    pub input: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MoveDialog {
    pub open: bool,
    pub picker: DestinationPicker,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct UploadDialog {
    pub open: bool,
    pub picker: DestinationPicker,
    pub files: Vec<UploadPayload>,
    pub session: Option<UploadSession>,
    pub(crate) sessions_started: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewSurface {
    pub open: bool,
    pub src: String,
    pub title: String,
    pub kind: Option<PreviewKind>,
}

impl Default for PreviewSurface {
    fn default() -> Self {
        Self {
            open: false,
            src: PREVIEW_BLANK_SRC.to_string(),
            title: String::new(),
            kind: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
/// Everything the directory page renders.
pub struct DirectoryViewState {
    pub page: PageContext,
    pub settings: RuntimeSettings,
    pub rows: Vec<ListingRow>,
    pub listing_loaded: bool,
    pub create_folder_input: String,
    pub rename: Option<RenameDialog>,
    pub delete_confirm_open: bool,
    pub move_dialog: MoveDialog,
    pub upload: UploadDialog,
    pub preview: PreviewSurface,
    pub alert: AlertSlot,
    pub in_flight: BTreeSet<ActionClass>,
}

impl DirectoryViewState {
    /// State for a page whose listing is already known.
    pub fn new(page: PageContext, entries: Vec<ListingEntry>, settings: RuntimeSettings) -> Self {
        let mut state = Self::pending(page, settings);
        state.rows = rows_in_listing_order(entries);
        state.listing_loaded = true;
        state
    }

    /// State for a page whose listing has not been fetched yet.
    pub fn pending(page: PageContext, settings: RuntimeSettings) -> Self {
        Self {
            page,
            settings,
            rows: Vec::new(),
            listing_loaded: false,
            create_folder_input: String::new(),
            rename: None,
            delete_confirm_open: false,
            move_dialog: MoveDialog::default(),
            upload: UploadDialog::default(),
            preview: PreviewSurface::default(),
            alert: AlertSlot::default(),
            in_flight: BTreeSet::new(),
        }
    }

    pub fn row(&self, name: &str) -> Option<&ListingRow> {
        self.rows.iter().find(|row| row.entry.name == name)
    }

    pub(crate) fn row_mut(&mut self, name: &str) -> Option<&mut ListingRow> {
        self.rows.iter_mut().find(|row| row.entry.name == name)
    }

    /// Names of checked rows in display order.
    pub fn selected_names(&self) -> Vec<String> {
        self.rows
            .iter()
            .filter(|row| row.checked)
            .map(|row| row.entry.name.clone())
            .collect()
    }

    pub fn selection_count(&self) -> usize {
        self.rows.iter().filter(|row| row.checked).count()
    }

    /// "Select all" is checked iff there are rows and every one is checked.
    pub fn select_all_checked(&self) -> bool {
        !self.rows.is_empty() && self.rows.iter().all(|row| row.checked)
    }

    /// Delete/move buttons are enabled iff something is selected.
    pub fn selection_actions_enabled(&self) -> bool {
        self.rows.iter().any(|row| row.checked)
    }

    pub fn shows_empty_placeholder(&self) -> bool {
        self.listing_loaded && self.rows.is_empty()
    }

    pub fn is_pending(&self, class: ActionClass) -> bool {
        self.in_flight.contains(&class)
    }

    pub fn breadcrumbs(&self) -> Vec<Breadcrumb> {
        breadcrumbs(&self.page.current_path)
    }

    pub fn path_of(&self, name: &str) -> String {
        join_relative_path(&self.page.current_path, name)
    }

    pub fn preview_src_for(&self, name: &str) -> String {
        view_url(&self.path_of(name))
    }

    pub(crate) fn sort_rows(&mut self) {
        self.rows
            .sort_by(|left, right| left.entry.listing_order(&right.entry));
    }
}

pub(crate) fn rows_in_listing_order(mut entries: Vec<ListingEntry>) -> Vec<ListingRow> {
    sort_listing(&mut entries);
    entries.into_iter().map(ListingRow::new).collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
/// Admin action classes guarded to one in-flight request each.
pub enum AdminActionClass {
    ToggleRegistration,
    AddUser,
    EditUser,
    DeleteUser(UserId),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminUserRow {
    pub record: UserRecord,
    /// Set once the server confirmed deletion; the row is removed after the fade.
    pub fading: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddUserForm {
    pub username: String,
    pub password: String,
    pub role: UserRole,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditUserDialog {
    pub id: UserId,
    pub username: String,
    /// Empty keeps the current password.
    pub password: String,
    pub role: UserRole,
    pub permissions: PermissionSet,
}

impl EditUserDialog {
    pub fn prefilled(record: &UserRecord) -> Self {
        Self {
            id: record.id,
            username: record.username.clone(),
            password: String::new(),
            role: record.role,
            permissions: record.permissions,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Everything the admin page renders.
pub struct AdminState {
    pub page: PageContext,
    pub settings: RuntimeSettings,
    pub registration_enabled: bool,
    pub users: Vec<AdminUserRow>,
    pub add_form: AddUserForm,
    pub edit: Option<EditUserDialog>,
    pub alert: AlertSlot,
    pub in_flight: BTreeSet<AdminActionClass>,
}

impl AdminState {
    pub fn new(page: PageContext, bootstrap: AdminBootstrap, settings: RuntimeSettings) -> Self {
        Self {
            page,
            settings,
            registration_enabled: bootstrap.registration_enabled,
            users: bootstrap
                .users
                .into_iter()
                .map(|record| AdminUserRow {
                    record,
                    fading: false,
                })
                .collect(),
            add_form: AddUserForm::default(),
            edit: None,
            alert: AlertSlot::default(),
            in_flight: BTreeSet::new(),
        }
    }

    pub fn user(&self, id: UserId) -> Option<&AdminUserRow> {
        self.users.iter().find(|row| row.record.id == id)
    }

    pub(crate) fn user_mut(&mut self, id: UserId) -> Option<&mut AdminUserRow> {
        self.users.iter_mut().find(|row| row.record.id == id)
    }

    pub fn is_pending(&self, class: AdminActionClass) -> bool {
        self.in_flight.contains(&class)
    }
}
