//! Admin panel: registration switch, account creation, the account table, and the edit dialog.

use fm_host::{Permission, UserId, UserRole};
use fm_runtime::{AdminAction, AdminActionClass, AdminUserRow};
use leptos::*;

use crate::{
    primitives::{
        AlertBanner, Button, ButtonSize, ButtonVariant, CheckboxField, Cluster, DataTable, Form,
        Heading, LayoutGap, LayoutJustify, Modal, SelectField, Stack, Switch, Text, TextField,
        TextTone,
    },
    runtime_context::{use_admin, AdminContext},
};

const ROLES: [UserRole; 2] = [UserRole::User, UserRole::Admin];

fn role_options(current: UserRole) -> impl IntoView {
    ROLES
        .into_iter()
        .map(|role| {
            view! {
                <option value=role.as_str() selected=role == current>
                    {role.as_str()}
                </option>
            }
        })
        .collect_view()
}

/// Parses a role `<select>` value, defaulting to a regular account.
fn parse_role(raw: &str) -> UserRole {
    UserRole::parse(raw).unwrap_or_default()
}

#[component]
/// Admin page bound to the surrounding [`crate::AdminProvider`].
pub fn AdminPage() -> impl IntoView {
    let runtime = use_admin();
    let state = runtime.state;
    let alert = Signal::derive(move || state.with(|admin| admin.alert.current().cloned()));

    view! {
        <section class="fm-page" data-ui-kind="admin-page">
            <AlertBanner
                alert
                on_dismiss=Callback::new(move |_| runtime.dispatch_action(AdminAction::DismissAlert))
            />
            <Heading>"User management"</Heading>
            <RegistrationToggle />
            <AddUserForm />
            <UserTable />
            <EditUserDialog />
        </section>
    }
}

#[component]
fn RegistrationToggle() -> impl IntoView {
    let runtime = use_admin();
    let state = runtime.state;
    let enabled = Signal::derive(move || state.with(|admin| admin.registration_enabled));
    let pending = Signal::derive(move || {
        state.with(|admin| admin.is_pending(AdminActionClass::ToggleRegistration))
    });

    view! {
        <Cluster gap=LayoutGap::Sm layout_class="fm-registration">
            <Switch
                id="fm-registration-switch"
                aria_label="Allow registration"
                checked=enabled
                disabled=pending
                on_toggle=Callback::new(move |enabled| {
                    runtime.dispatch_action(AdminAction::ToggleRegistration { enabled })
                })
            />
            <label for="fm-registration-switch">"Allow new users to register"</label>
        </Cluster>
    }
}

#[component]
fn AddUserForm() -> impl IntoView {
    let runtime = use_admin();
    let state = runtime.state;
    let username = Signal::derive(move || state.with(|admin| admin.add_form.username.clone()));
    let password = Signal::derive(move || state.with(|admin| admin.add_form.password.clone()));
    let role =
        Signal::derive(move || state.with(|admin| admin.add_form.role.as_str().to_string()));
    let pending =
        Signal::derive(move || state.with(|admin| admin.is_pending(AdminActionClass::AddUser)));

    view! {
        <Form
            id="fm-add-user"
            layout_class="fm-add-user"
            aria_label="Add user"
            on_submit=Callback::new(move |_| runtime.dispatch_action(AdminAction::SubmitAddUser))
        >
            <Cluster gap=LayoutGap::Sm>
                <TextField
                    id="fm-new-username"
                    placeholder="Username"
                    aria_label="Username"
                    autocomplete="off"
                    value=username
                    on_input=Callback::new(move |value| {
                        runtime.dispatch_action(AdminAction::SetAddUsername(value))
                    })
                />
                <TextField
                    id="fm-new-password"
                    input_type="password"
                    placeholder="Password"
                    aria_label="Password"
                    autocomplete="new-password"
                    value=password
                    on_input=Callback::new(move |value| {
                        runtime.dispatch_action(AdminAction::SetAddPassword(value))
                    })
                />
                <SelectField
                    id="fm-new-role"
                    aria_label="Role"
                    value=role
                    on_change=Callback::new(move |value: String| {
                        runtime.dispatch_action(AdminAction::SetAddRole(parse_role(&value)))
                    })
                >
                    {move || role_options(state.with(|admin| admin.add_form.role))}
                </SelectField>
                <Button variant=ButtonVariant::Primary button_type="submit" busy=pending>
                    "Add user"
                </Button>
            </Cluster>
        </Form>
    }
}

#[component]
fn UserTable() -> impl IntoView {
    let state = use_admin().state;
    let user_ids = move || {
        state.with(|admin| {
            admin
                .users
                .iter()
                .map(|row| row.record.id)
                .collect::<Vec<_>>()
        })
    };

    view! {
        <DataTable id="fm-users" layout_class="fm-users" aria_label="Users">
            <thead>
                <tr>
                    <th scope="col">"ID"</th>
                    <th scope="col">"Username"</th>
                    <th scope="col">"Role"</th>
                    {Permission::ALL
                        .into_iter()
                        .map(|permission| view! { <th scope="col">{permission.label()}</th> })
                        .collect_view()}
                    <th scope="col" class="fm-actions-column">"Actions"</th>
                </tr>
            </thead>
            <tbody>
                <For each=user_ids key=|id| *id let:id>
                    <UserRowView id />
                </For>
            </tbody>
        </DataTable>
    }
}

#[component]
fn UserRowView(id: UserId) -> impl IntoView {
    let runtime = use_admin();
    let state = runtime.state;
    let row = create_memo(move |_| state.with(|admin| admin.user(id).cloned()));
    let deleting = Signal::derive(move || {
        state.with(|admin| admin.is_pending(AdminActionClass::DeleteUser(id)))
    });

    move || row.get().map(move |row| render_user_row(runtime, row, deleting))
}

fn render_user_row(
    runtime: AdminContext,
    row: AdminUserRow,
    deleting: Signal<bool>,
) -> impl IntoView {
    let record = row.record;
    let id = record.id;
    let fade_ms = runtime.state.with_untracked(|admin| admin.settings.row_fade_ms);

    view! {
        <tr
            data-user-id=id.0
            data-ui-state=if row.fading { "fading" } else { "idle" }
            style=row.fading.then(|| format!("animation-duration:{fade_ms}ms;"))
        >
            <td>{id.0}</td>
            <td data-field="username">{record.username.clone()}</td>
            <td data-field="role">{record.role.as_str()}</td>
            {Permission::ALL
                .into_iter()
                .map(|permission| {
                    let granted = record.permissions.get(permission);
                    view! {
                        <td
                            class="fm-permission"
                            data-field=permission.field_name()
                            data-granted=if granted { "true" } else { "false" }
                        >
                            <Text tone=if granted { TextTone::Success } else { TextTone::Danger }>
                                <span aria-label=if granted { "granted" } else { "denied" }>
                                    {if granted { "✓" } else { "✗" }}
                                </span>
                            </Text>
                        </td>
                    }
                })
                .collect_view()}
            <td class="fm-actions-column">
                <Cluster gap=LayoutGap::Sm>
                    <Button
                        size=ButtonSize::Sm
                        disabled=row.fading
                        on_click=Callback::new(move |_| {
                            runtime.dispatch_action(AdminAction::OpenEditUser { id })
                        })
                    >
                        "Edit"
                    </Button>
                    <Button
                        variant=ButtonVariant::Danger
                        size=ButtonSize::Sm
                        disabled=row.fading
                        busy=deleting
                        on_click=Callback::new(move |_| {
                            runtime.dispatch_action(AdminAction::RequestDeleteUser { id })
                        })
                    >
                        "Delete"
                    </Button>
                </Cluster>
            </td>
        </tr>
    }
}

#[component]
fn EditUserDialog() -> impl IntoView {
    let runtime = use_admin();
    let state = runtime.state;
    let open = Signal::derive(move || state.with(|admin| admin.edit.is_some()));
    let field = move |read: fn(&fm_runtime::EditUserDialog) -> String| {
        Signal::derive(move || {
            state.with(|admin| admin.edit.as_ref().map(read).unwrap_or_default())
        })
    };
    let username = field(|dialog| dialog.username.clone());
    let password = field(|dialog| dialog.password.clone());
    let role = field(|dialog| dialog.role.as_str().to_string());
    let pending =
        Signal::derive(move || state.with(|admin| admin.is_pending(AdminActionClass::EditUser)));
    let close = Callback::new(move |_| runtime.dispatch_action(AdminAction::CloseEditUser));

    view! {
        <Modal id="fm-edit-user-dialog" open aria_label="Edit user" on_dismiss=close>
            <Form on_submit=Callback::new(move |_| runtime.dispatch_action(AdminAction::SubmitEditUser))>
                <Stack gap=LayoutGap::Md>
                    <Heading>"Edit user"</Heading>
                    <label for="fm-edit-username">"Username"</label>
                    <TextField
                        id="fm-edit-username"
                        autocomplete="off"
                        value=username
                        on_input=Callback::new(move |value| {
                            runtime.dispatch_action(AdminAction::SetEditUsername(value))
                        })
                    />
                    <label for="fm-edit-password">"New password"</label>
                    <TextField
                        id="fm-edit-password"
                        input_type="password"
                        placeholder="Leave blank to keep the current password"
                        autocomplete="new-password"
                        value=password
                        on_input=Callback::new(move |value| {
                            runtime.dispatch_action(AdminAction::SetEditPassword(value))
                        })
                    />
                    <label for="fm-edit-role">"Role"</label>
                    <SelectField
                        id="fm-edit-role"
                        value=role
                        on_change=Callback::new(move |value: String| {
                            runtime.dispatch_action(AdminAction::SetEditRole(parse_role(&value)))
                        })
                    >
                        {move || {
                            let current = state.with(|admin| {
                                admin.edit.as_ref().map(|dialog| dialog.role).unwrap_or_default()
                            });
                            role_options(current)
                        }}
                    </SelectField>
                    <fieldset class="fm-permissions">
                        <legend>"Permissions"</legend>
                        {Permission::ALL
                            .into_iter()
                            .map(|permission| {
                                let checked = Signal::derive(move || {
                                    state.with(|admin| {
                                        admin
                                            .edit
                                            .as_ref()
                                            .is_some_and(|dialog| dialog.permissions.get(permission))
                                    })
                                });
                                let checkbox_id = format!("fm-edit-{}", permission.field_name());
                                view! {
                                    <Cluster gap=LayoutGap::Sm>
                                        <CheckboxField
                                            id=checkbox_id.clone()
                                            checked
                                            on_change=Callback::new(move |granted| {
                                                runtime.dispatch_action(AdminAction::SetEditPermission {
                                                    permission,
                                                    granted,
                                                })
                                            })
                                        />
                                        <label for=checkbox_id>{permission.label()}</label>
                                    </Cluster>
                                }
                            })
                            .collect_view()}
                    </fieldset>
                    <Cluster justify=LayoutJustify::End>
                        <Button on_click=Callback::new(move |_| close.call(()))>"Cancel"</Button>
                        <Button variant=ButtonVariant::Primary button_type="submit" busy=pending>
                            "Save changes"
                        </Button>
                    </Cluster>
                </Stack>
            </Form>
        </Modal>
    }
}
