//! Directory listing page: breadcrumbs, toolbar, listing table, and the action dialogs.

use fm_host::{directory_url, PreviewKind};
use fm_runtime::{ActionClass, ListingRow, SizeTrigger, UploadPhase, ViewAction};
use leptos::*;

use super::picker::DestinationSelect;
use crate::{
    effect_executor::RENAME_INPUT_ID,
    host_ui,
    primitives::{
        AlertBanner, Badge, Button, ButtonSize, ButtonVariant, CheckboxField, Cluster, DataTable,
        EmptyState, FileField, Form, Heading, LayoutGap, LayoutJustify, Modal, PreviewFrame,
        ProgressBar, Stack, Text, TextField, TextTone, ToolBar,
    },
    runtime_context::{use_directory_view, DirectoryViewContext},
};

const LISTING_COLUMNS: u8 = 4;

#[component]
/// Directory page bound to the surrounding [`crate::DirectoryViewProvider`].
pub fn DirectoryPage() -> impl IntoView {
    let runtime = use_directory_view();
    let state = runtime.state;
    let alert = Signal::derive(move || state.with(|view| view.alert.current().cloned()));

    view! {
        <section class="fm-page" data-ui-kind="directory-page">
            <AlertBanner
                alert
                on_dismiss=Callback::new(move |_| runtime.dispatch_action(ViewAction::DismissAlert))
            />
            <Breadcrumbs />
            <DirectoryToolbar />
            <ListingTable />
            <RenameDialog />
            <DeleteDialog />
            <MoveDialog />
            <UploadDialog />
            <PreviewDialog />
        </section>
    }
}

#[component]
fn Breadcrumbs() -> impl IntoView {
    let state = use_directory_view().state;

    view! {
        <nav class="fm-breadcrumbs" aria-label="Breadcrumb">
            <ol>
                <li>
                    <a href=directory_url("") rel="external">"Home"</a>
                </li>
                {move || {
                    state
                        .with(|view| view.breadcrumbs())
                        .into_iter()
                        .map(|crumb| {
                            let href = directory_url(&crumb.path);
                            view! {
                                <li>
                                    <a href=href rel="external">{crumb.name}</a>
                                </li>
                            }
                        })
                        .collect_view()
                }}
            </ol>
        </nav>
    }
}

#[component]
fn DirectoryToolbar() -> impl IntoView {
    let runtime = use_directory_view();
    let state = runtime.state;
    let pending = move |class: ActionClass| {
        Signal::derive(move || state.with(|view| view.is_pending(class)))
    };
    let no_selection =
        Signal::derive(move || state.with(|view| !view.selection_actions_enabled()));
    let folder_name = Signal::derive(move || state.with(|view| view.create_folder_input.clone()));
    let selection_label = move || {
        let count = state.with(|view| view.selection_count());
        format!("{count} selected")
    };

    view! {
        <ToolBar layout_class="fm-toolbar" aria_label="Directory actions">
            <Form
                layout_class="fm-create-folder"
                aria_label="Create folder"
                on_submit=Callback::new(move |_| runtime.dispatch_action(ViewAction::SubmitCreateFolder))
            >
                <TextField
                    id="fm-create-folder-input"
                    placeholder="New folder name"
                    aria_label="New folder name"
                    autocomplete="off"
                    value=folder_name
                    on_input=Callback::new(move |value| {
                        runtime.dispatch_action(ViewAction::SetCreateFolderInput(value))
                    })
                />
                <Button button_type="submit" busy=pending(ActionClass::CreateFolder)>
                    "Create folder"
                </Button>
            </Form>
            <Button
                variant=ButtonVariant::Primary
                busy=pending(ActionClass::Upload)
                on_click=Callback::new(move |_| runtime.dispatch_action(ViewAction::OpenUploadDialog))
            >
                "Upload"
            </Button>
            <Button
                disabled=no_selection
                busy=pending(ActionClass::Move)
                on_click=Callback::new(move |_| runtime.dispatch_action(ViewAction::OpenMoveDialog))
            >
                "Move"
            </Button>
            <Button
                variant=ButtonVariant::Danger
                disabled=no_selection
                busy=pending(ActionClass::Delete)
                on_click=Callback::new(move |_| runtime.dispatch_action(ViewAction::RequestDelete))
            >
                "Delete"
            </Button>
            <Badge>{selection_label}</Badge>
        </ToolBar>
    }
}

#[component]
fn ListingTable() -> impl IntoView {
    let runtime = use_directory_view();
    let state = runtime.state;
    let select_all = Signal::derive(move || state.with(|view| view.select_all_checked()));
    let row_names = move || {
        state.with(|view| {
            view.rows
                .iter()
                .map(|row| row.name().to_string())
                .collect::<Vec<_>>()
        })
    };

    view! {
        <DataTable id="fm-listing" layout_class="fm-listing" aria_label="Directory contents">
            <thead>
                <tr>
                    <th scope="col" class="fm-select-column">
                        <CheckboxField
                            id="fm-select-all"
                            aria_label="Select all"
                            checked=select_all
                            on_change=Callback::new(move |checked| {
                                runtime.dispatch_action(ViewAction::ToggleSelectAll { checked })
                            })
                        />
                    </th>
                    <th scope="col">"Name"</th>
                    <th scope="col">"Size"</th>
                    <th scope="col" class="fm-actions-column">"Actions"</th>
                </tr>
            </thead>
            <tbody>
                <Show
                    when=move || state.with(|view| view.listing_loaded)
                    fallback=|| view! { <EmptyState colspan=LISTING_COLUMNS>"Loading…"</EmptyState> }
                >
                    <Show when=move || state.with(|view| view.shows_empty_placeholder()) fallback=|| ()>
                        <EmptyState colspan=LISTING_COLUMNS>"This folder is empty."</EmptyState>
                    </Show>
                </Show>
                <For each=row_names key=|name| name.clone() let:name>
                    <ListingRowView name />
                </For>
            </tbody>
        </DataTable>
    }
}

#[component]
fn ListingRowView(name: String) -> impl IntoView {
    let runtime = use_directory_view();
    let state = runtime.state;
    let row = create_memo(move |_| state.with(|view| view.row(&name).cloned()));

    move || row.get().map(move |row| render_row(runtime, row))
}

fn render_row(runtime: DirectoryViewContext, row: ListingRow) -> impl IntoView {
    let name = row.name().to_string();
    let is_dir = row.entry.is_dir;
    let href = row.href();
    let preview = row.preview_kind();

    let toggle_name = name.clone();
    let size_name = name.clone();
    let preview_name = name.clone();
    let rename_name = name.clone();

    let size_trigger = match row.size_trigger() {
        SizeTrigger::Hidden => None,
        trigger => Some(view! {
            <Button
                variant=ButtonVariant::Quiet
                size=ButtonSize::Sm
                layout_class="fm-size-trigger"
                aria_label=format!("Calculate size of {name}")
                busy=trigger == SizeTrigger::Busy
                on_click=Callback::new(move |_| {
                    runtime.dispatch_action(ViewAction::RequestDirSize { name: size_name.clone() })
                })
            >
                {if trigger == SizeTrigger::Busy { "Calculating…" } else { "Calculate" }}
            </Button>
        }),
    };

    let preview_button = preview.map(|kind| {
        view! {
            <Button
                variant=ButtonVariant::Quiet
                size=ButtonSize::Sm
                title=match kind {
                    PreviewKind::Text => "Preview document".to_string(),
                    PreviewKind::Image => "Preview image".to_string(),
                }
                on_click=Callback::new(move |_| {
                    runtime.dispatch_action(ViewAction::OpenPreview { name: preview_name.clone() })
                })
            >
                "Preview"
            </Button>
        }
    });

    let download_link = (!is_dir).then(|| {
        view! {
            <a class="ui-button fm-download" data-ui-size="sm" href=href.clone() download="">
                "Download"
            </a>
        }
    });

    view! {
        <tr
            data-entry-name=name.clone()
            data-entry-kind=if is_dir { "directory" } else { "file" }
            data-ui-selected=if row.checked { "true" } else { "false" }
        >
            <td class="fm-select-column">
                <CheckboxField
                    aria_label=format!("Select {name}")
                    checked=row.checked
                    on_change=Callback::new(move |checked| {
                        runtime.dispatch_action(ViewAction::ToggleRow {
                            name: toggle_name.clone(),
                            checked,
                        })
                    })
                />
            </td>
            <td class="fm-name-column">
                <a
                    href=href
                    rel="external"
                    data-entry-link=if is_dir { "directory" } else { "file" }
                >
                    {name.clone()}
                    {is_dir.then_some("/")}
                </a>
            </td>
            <td class="fm-size-column">
                <Cluster gap=LayoutGap::Sm>
                    <Text tone=TextTone::Secondary>{row.size_text()}</Text>
                    {size_trigger}
                </Cluster>
            </td>
            <td class="fm-actions-column">
                <Cluster gap=LayoutGap::Sm>
                    {preview_button}
                    {download_link}
                    <Button
                        variant=ButtonVariant::Quiet
                        size=ButtonSize::Sm
                        on_click=Callback::new(move |_| {
                            runtime.dispatch_action(ViewAction::OpenRename { name: rename_name.clone() })
                        })
                    >
                        "Rename"
                    </Button>
                </Cluster>
            </td>
        </tr>
    }
}

#[component]
fn RenameDialog() -> impl IntoView {
    let runtime = use_directory_view();
    let state = runtime.state;
    let open = Signal::derive(move || state.with(|view| view.rename.is_some()));
    let original = move || {
        state.with(|view| {
            view.rename
                .as_ref()
                .map(|dialog| dialog.original.clone())
                .unwrap_or_default()
        })
    };
    let input = Signal::derive(move || {
        state.with(|view| {
            view.rename
                .as_ref()
                .map(|dialog| dialog.input.clone())
                .unwrap_or_default()
        })
    });
    let cancel = Callback::new(move |_| runtime.dispatch_action(ViewAction::CancelRename));

    view! {
        <Modal id="fm-rename-dialog" open aria_label="Rename" on_dismiss=cancel>
            <Form on_submit=Callback::new(move |_| runtime.dispatch_action(ViewAction::SubmitRename))>
                <Stack gap=LayoutGap::Md>
                    <Heading>{move || format!("Rename '{}'", original())}</Heading>
                    <TextField
                        id=RENAME_INPUT_ID
                        aria_label="New name"
                        autocomplete="off"
                        value=input
                        on_input=Callback::new(move |value| {
                            runtime.dispatch_action(ViewAction::SetRenameInput(value))
                        })
                    />
                    <Cluster justify=LayoutJustify::End>
                        <Button on_click=Callback::new(move |_| cancel.call(()))>"Cancel"</Button>
                        <Button variant=ButtonVariant::Primary button_type="submit">
                            "Rename"
                        </Button>
                    </Cluster>
                </Stack>
            </Form>
        </Modal>
    }
}

#[component]
fn DeleteDialog() -> impl IntoView {
    let runtime = use_directory_view();
    let state = runtime.state;
    let open = Signal::derive(move || state.with(|view| view.delete_confirm_open));
    let prompt = move || {
        let count = state.with(|view| view.selection_count());
        format!("Delete {count} selected item(s)? This action cannot be undone.")
    };
    let cancel = Callback::new(move |_| runtime.dispatch_action(ViewAction::CancelDelete));

    view! {
        <Modal id="fm-delete-dialog" open aria_label="Confirm delete" on_dismiss=cancel>
            <Stack gap=LayoutGap::Md>
                <Heading>"Delete items"</Heading>
                <Text>{prompt}</Text>
                <Cluster justify=LayoutJustify::End>
                    <Button on_click=Callback::new(move |_| cancel.call(()))>"Cancel"</Button>
                    <Button
                        variant=ButtonVariant::Danger
                        on_click=Callback::new(move |_| runtime.dispatch_action(ViewAction::ConfirmDelete))
                    >
                        "Delete"
                    </Button>
                </Cluster>
            </Stack>
        </Modal>
    }
}

#[component]
fn MoveDialog() -> impl IntoView {
    let runtime = use_directory_view();
    let state = runtime.state;
    let open = Signal::derive(move || state.with(|view| view.move_dialog.open));
    let picker = Signal::derive(move || state.with(|view| view.move_dialog.picker.clone()));
    let busy = Signal::derive(move || state.with(|view| view.is_pending(ActionClass::Move)));
    let close = Callback::new(move |_| runtime.dispatch_action(ViewAction::CloseMoveDialog));

    view! {
        <Modal id="fm-move-dialog" open aria_label="Move items" on_dismiss=close>
            <Stack gap=LayoutGap::Md>
                <Heading>"Move selected items"</Heading>
                <label for="fm-move-destination">"Destination"</label>
                <DestinationSelect
                    id="fm-move-destination"
                    picker
                    on_select=Callback::new(move |path| {
                        runtime.dispatch_action(ViewAction::SelectMoveDestination(path))
                    })
                />
                <Cluster justify=LayoutJustify::End>
                    <Button on_click=Callback::new(move |_| close.call(()))>"Cancel"</Button>
                    <Button
                        variant=ButtonVariant::Primary
                        disabled=Signal::derive(move || picker.with(|picker| picker.loading))
                        busy
                        on_click=Callback::new(move |_| runtime.dispatch_action(ViewAction::ConfirmMove))
                    >
                        "Move"
                    </Button>
                </Cluster>
            </Stack>
        </Modal>
    }
}

#[component]
fn UploadDialog() -> impl IntoView {
    let runtime = use_directory_view();
    let state = runtime.state;
    let open = Signal::derive(move || state.with(|view| view.upload.open));
    let picker = Signal::derive(move || state.with(|view| view.upload.picker.clone()));
    let busy = Signal::derive(move || state.with(|view| view.is_pending(ActionClass::Upload)));
    let progress = Signal::derive(move || {
        state.with(|view| {
            view.upload
                .session
                .as_ref()
                .filter(|session| session.shows_progress())
                .map(|session| session.percent())
        })
    });
    let completed = move || {
        state.with(|view| {
            view.upload
                .session
                .as_ref()
                .is_some_and(|session| session.phase() == UploadPhase::Completed)
        })
    };
    let file_names = move || {
        state.with(|view| {
            view.upload
                .files
                .iter()
                .map(|file| file.name.clone())
                .collect::<Vec<_>>()
        })
    };
    let close = Callback::new(move |_| runtime.dispatch_action(ViewAction::CloseUploadDialog));

    view! {
        <Modal id="fm-upload-dialog" open aria_label="Upload files" on_dismiss=close>
            <Stack gap=LayoutGap::Md>
                <Heading>"Upload files"</Heading>
                <label for="fm-upload-destination">"Destination"</label>
                <DestinationSelect
                    id="fm-upload-destination"
                    picker
                    on_select=Callback::new(move |path| {
                        runtime.dispatch_action(ViewAction::SelectUploadDestination(path))
                    })
                />
                <FileField
                    id="fm-upload-files"
                    aria_label="Files to upload"
                    disabled=busy
                    on_change=Callback::new(move |ev: web_sys::Event| {
                        runtime.dispatch_action(ViewAction::SetUploadFiles(host_ui::picked_files(&ev)))
                    })
                />
                <ul class="fm-upload-files">
                    {move || {
                        file_names()
                            .into_iter()
                            .map(|name| view! { <li>{name}</li> })
                            .collect_view()
                    }}
                </ul>
                {move || {
                    progress
                        .get()
                        .map(|percent| {
                            view! { <ProgressBar layout_class="fm-upload-progress" value=percent /> }
                        })
                }}
                <Show when=completed fallback=|| ()>
                    <Text tone=TextTone::Success>"Upload complete. Refreshing the listing…"</Text>
                </Show>
                <Cluster justify=LayoutJustify::End>
                    <Button on_click=Callback::new(move |_| close.call(()))>"Close"</Button>
                    <Button
                        variant=ButtonVariant::Primary
                        busy
                        on_click=Callback::new(move |_| runtime.dispatch_action(ViewAction::StartUpload))
                    >
                        "Upload"
                    </Button>
                </Cluster>
            </Stack>
        </Modal>
    }
}

#[component]
fn PreviewDialog() -> impl IntoView {
    let runtime = use_directory_view();
    let state = runtime.state;
    let open = Signal::derive(move || state.with(|view| view.preview.open));
    let src = Signal::derive(move || state.with(|view| view.preview.src.clone()));
    let title = Signal::derive(move || state.with(|view| view.preview.title.clone()));
    let close = Callback::new(move |_| runtime.dispatch_action(ViewAction::ClosePreview));

    view! {
        <Modal id="fm-preview-dialog" layout_class="fm-preview" open aria_label="Preview" on_dismiss=close>
            <Cluster justify=LayoutJustify::Between>
                <Heading>{move || title.get()}</Heading>
                <Button
                    variant=ButtonVariant::Quiet
                    aria_label="Close preview"
                    on_click=Callback::new(move |_| close.call(()))
                >
                    "×"
                </Button>
            </Cluster>
            <PreviewFrame src title />
        </Modal>
    }
}
