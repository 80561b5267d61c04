use std::{cell::RefCell, collections::VecDeque, rc::Rc};

use fm_host::{
    ApiError, FileManagerApi, ListingEntry, MemoryFileManagerApi, PageContext, UploadPayload,
};
use fm_runtime::{
    reduce_directory_view, run_upload, run_view_request, AlertCategory, DirectoryViewState,
    ListingRow, RuntimeSettings, ViewAction, ViewEffect,
};
use futures::executor::block_on;
use pretty_assertions::assert_eq;

/// Drives the directory controller against the memory server, firing timers immediately except
/// alert expiries, which are collected.
struct Harness {
    api: MemoryFileManagerApi,
    state: DirectoryViewState,
    pending_expiries: Vec<ViewAction>,
}

impl Harness {
    fn open(api: MemoryFileManagerApi, path: &str) -> Self {
        let mut harness = Self {
            api,
            state: DirectoryViewState::pending(
                PageContext::new(path, "tok"),
                RuntimeSettings::default(),
            ),
            pending_expiries: Vec::new(),
        };
        harness.dispatch(ViewAction::RefreshListing);
        harness
    }

    fn dispatch(&mut self, action: ViewAction) {
        let queue = Rc::new(RefCell::new(VecDeque::from([action])));
        loop {
            let next = queue.borrow_mut().pop_front();
            let Some(action) = next else { break };
            let effects = reduce_directory_view(&mut self.state, action).expect("reduce");
            for effect in effects {
                match effect {
                    ViewEffect::Request(request) => {
                        let completion = block_on(run_view_request(&self.api, request));
                        queue.borrow_mut().push_back(completion);
                    }
                    ViewEffect::Upload { session, request } => {
                        let progress_queue = queue.clone();
                        let completion = block_on(run_upload(
                            &self.api,
                            session,
                            request,
                            Rc::new(move |action: ViewAction| {
                                progress_queue.borrow_mut().push_back(action)
                            }),
                        ));
                        queue.borrow_mut().push_back(completion);
                    }
                    ViewEffect::DispatchAfter { action, .. } => match *action {
                        ViewAction::AlertExpired(_) => self.pending_expiries.push(*action),
                        other => queue.borrow_mut().push_back(other),
                    },
                    ViewEffect::FocusRenameInput => {}
                }
            }
        }
    }

    fn names(&self) -> Vec<&str> {
        self.state.rows.iter().map(ListingRow::name).collect()
    }

    fn check(&mut self, name: &str) {
        self.dispatch(ViewAction::ToggleRow {
            name: name.into(),
            checked: true,
        });
    }
}

fn seeded() -> MemoryFileManagerApi {
    MemoryFileManagerApi::new()
        .with_file("docs/readme.md", 120)
        .with_file("docs/photo.png", 4096)
        .with_file("docs/full/keep.txt", 1)
        .with_dir("docs/empty")
        .with_dir("archive")
}

#[test]
fn initial_fetch_populates_table_in_listing_order() {
    let harness = Harness::open(seeded(), "docs");
    assert!(harness.state.listing_loaded);
    assert_eq!(
        harness.names(),
        vec!["empty", "full", "photo.png", "readme.md"]
    );
}

#[test]
fn delete_reconciles_with_server_deleted_list() {
    let mut harness = Harness::open(seeded(), "docs");
    harness.check("full");
    harness.check("readme.md");
    harness.dispatch(ViewAction::RequestDelete);
    harness.dispatch(ViewAction::ConfirmDelete);

    assert_eq!(harness.names(), vec!["empty", "full", "photo.png"]);
    assert!(harness.state.row("full").expect("kept").checked);
    assert!(harness.api.exists("docs/full/keep.txt"));
    assert!(!harness.api.exists("docs/readme.md"));
}

#[test]
fn move_removes_rows_and_lands_in_destination() {
    let mut harness = Harness::open(seeded(), "docs");
    harness.check("photo.png");
    harness.dispatch(ViewAction::OpenMoveDialog);

    let values: Vec<&str> = harness
        .state
        .move_dialog
        .picker
        .options
        .iter()
        .map(|o| o.value.as_str())
        .collect();
    assert_eq!(
        values,
        vec!["", "archive", "docs", "docs/empty", "docs/full"]
    );

    harness.dispatch(ViewAction::SelectMoveDestination("archive".into()));
    harness.dispatch(ViewAction::ConfirmMove);

    assert_eq!(harness.names(), vec!["empty", "full", "readme.md"]);
    assert!(harness.api.exists("archive/photo.png"));
    assert!(!harness.state.selection_actions_enabled());
}

#[test]
fn create_then_rename_folder_round_trips_through_server() {
    let mut harness = Harness::open(seeded(), "docs");
    harness.dispatch(ViewAction::SetCreateFolderInput("Alpha".into()));
    harness.dispatch(ViewAction::SubmitCreateFolder);
    assert_eq!(harness.names()[0], "Alpha");
    assert_eq!(harness.pending_expiries.len(), 1);

    harness.dispatch(ViewAction::OpenRename {
        name: "readme.md".into(),
    });
    harness.dispatch(ViewAction::SetRenameInput("readme.txt".into()));
    harness.dispatch(ViewAction::SubmitRename);

    assert!(harness.api.exists("docs/readme.txt"));
    let row = harness.state.row("readme.txt").expect("renamed");
    assert!(row.entry.previewable);
    assert_eq!(row.size_text(), "120.00 B");
}

#[test]
fn upload_completion_refreshes_listing_without_losing_selection() {
    let mut harness = Harness::open(seeded(), "docs");
    harness.check("photo.png");
    harness.dispatch(ViewAction::RequestDirSize {
        name: "full".into(),
    });
    harness.dispatch(ViewAction::OpenUploadDialog);
    assert_eq!(harness.state.upload.picker.selected, "docs");

    harness.dispatch(ViewAction::SetUploadFiles(vec![
        UploadPayload::from_bytes("notes.txt", vec![0; 10]),
        UploadPayload::from_bytes("clip.bin", vec![0; 30]),
    ]));
    harness.dispatch(ViewAction::StartUpload);

    let session = harness.state.upload.session.as_ref().expect("session");
    assert_eq!(session.percent(), 100);
    assert_eq!(
        harness.names(),
        vec!["empty", "full", "clip.bin", "notes.txt", "photo.png", "readme.md"]
    );
    assert!(harness.state.row("photo.png").expect("kept").checked);
    assert_eq!(
        harness.state.row("full").expect("dir").size_text(),
        "1.00 B"
    );
    assert_eq!(
        harness.api.calls().iter().filter(|call| **call == "list_directory").count(),
        2
    );
}

#[test]
fn rejected_request_surfaces_server_message() {
    let mut harness = Harness::open(seeded(), "docs");
    harness
        .api
        .fail_next(ApiError::rejected(403, "Permission denied"));
    harness.dispatch(ViewAction::SetCreateFolderInput("x".into()));
    harness.dispatch(ViewAction::SubmitCreateFolder);

    let alert = harness.state.alert.current().expect("alert");
    assert_eq!(alert.category, AlertCategory::Danger);
    assert_eq!(alert.message, "Permission denied");
    assert_eq!(harness.names().len(), 4);
    assert!(harness.pending_expiries.is_empty());
}

#[test]
fn server_built_entries_match_client_preview_rule() {
    let api = seeded();
    let listing = block_on(api.list_directory("docs")).expect("list");
    let png: &ListingEntry = listing
        .entries
        .iter()
        .find(|entry| entry.name == "photo.png")
        .expect("png");
    assert!(png.previewable);
}
