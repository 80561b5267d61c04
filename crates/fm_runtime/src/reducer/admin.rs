//! Admin page: registration switch, account creation, edits, and deletion.

use fm_host::{
    AddUserRequest, AddUserResponse, ApiError, EditUserRequest, MessageResponse, Permission,
    UserId, UserRecord, UserRole,
};
use thiserror::Error;

use crate::{
    alerts::{AlertCategory, AlertId},
    model::{AddUserForm, AdminActionClass, AdminState, AdminUserRow, EditUserDialog},
    reducer::{message_or, show_alert},
};

pub const MISSING_CREDENTIALS_MESSAGE: &str = "Username and password are required.";
pub const MISSING_USERNAME_MESSAGE: &str = "Username is required.";
pub const USER_REFRESH_FAILED_MESSAGE: &str =
    "The user was updated, but the row could not be refreshed. Reload the page to see the latest permissions.";

/// Confirmation text shown before deleting an account.
pub fn delete_user_prompt(username: &str) -> String {
    format!(
        "Are you sure you want to delete user '{username}'? All of their files will be deleted too. This action cannot be undone."
    )
}

#[derive(Debug, Clone, PartialEq)]
/// Actions accepted by [`reduce_admin`].
pub enum AdminAction {
    /// The registration switch was flipped to `enabled`.
    ToggleRegistration { enabled: bool },
    RegistrationCompleted {
        previous: bool,
        result: Result<MessageResponse, ApiError>,
    },
    SetAddUsername(String),
    SetAddPassword(String),
    SetAddRole(UserRole),
    SubmitAddUser,
    AddUserCompleted(Result<AddUserResponse, ApiError>),
    /// Open the edit dialog prefilled from a row.
    OpenEditUser { id: UserId },
    CloseEditUser,
    SetEditUsername(String),
    SetEditPassword(String),
    SetEditRole(UserRole),
    SetEditPermission {
        permission: Permission,
        granted: bool,
    },
    SubmitEditUser,
    EditUserCompleted {
        id: UserId,
        result: Result<MessageResponse, ApiError>,
    },
    /// Re-fetched row after a successful edit.
    UserRefreshed {
        id: UserId,
        result: Result<UserRecord, ApiError>,
    },
    /// Delete button pressed; asks for confirmation first.
    RequestDeleteUser { id: UserId },
    /// The user accepted the confirmation prompt.
    ConfirmDeleteUser { id: UserId },
    DeleteUserCompleted {
        id: UserId,
        result: Result<MessageResponse, ApiError>,
    },
    /// Fade finished; drop the row.
    RemoveFadedUser { id: UserId },
    DismissAlert,
    AlertExpired(AlertId),
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Request intents run by the executor.
pub enum AdminRequest {
    ToggleRegistration { enabled: bool, previous: bool },
    AddUser(AddUserRequest),
    EditUser(EditUserRequest),
    DeleteUser(UserId),
    FetchUser(UserId),
}

#[derive(Debug, Clone, PartialEq)]
/// Side-effect intents emitted by [`reduce_admin`].
pub enum AdminEffect {
    Request(AdminRequest),
    /// Ask the user to confirm; dispatch [`AdminAction::ConfirmDeleteUser`] on acceptance.
    ConfirmDeleteUser { id: UserId, prompt: String },
    DispatchAfter {
        delay_ms: u32,
        action: Box<AdminAction>,
    },
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
/// Reducer errors for actions referencing accounts not in the table.
pub enum AdminError {
    /// No row has this id.
    #[error("user {0} not found")]
    UserNotFound(UserId),
}

/// Applies an [`AdminAction`] to the admin page state and collects resulting side effects.
///
/// The registration switch is optimistic: it flips immediately and is restored from
/// `previous` if the server rejects the change.
///
/// # Errors
///
/// Returns [`AdminError::UserNotFound`] when a user action references an id that has no row.
pub fn reduce_admin(
    state: &mut AdminState,
    action: AdminAction,
) -> Result<Vec<AdminEffect>, AdminError> {
    let mut effects = Vec::new();
    match action {
        AdminAction::ToggleRegistration { enabled } => {
            if state.is_pending(AdminActionClass::ToggleRegistration)
                || enabled == state.registration_enabled
            {
                return Ok(effects);
            }
            let previous = state.registration_enabled;
            state.registration_enabled = enabled;
            state.in_flight.insert(AdminActionClass::ToggleRegistration);
            effects.push(AdminEffect::Request(AdminRequest::ToggleRegistration {
                enabled,
                previous,
            }));
        }
        AdminAction::RegistrationCompleted { previous, result } => {
            state.in_flight.remove(&AdminActionClass::ToggleRegistration);
            match result {
                Ok(response) => {
                    let fallback = if state.registration_enabled {
                        "Registration enabled"
                    } else {
                        "Registration disabled"
                    };
                    let message = message_or(response.message, fallback);
                    alert(state, &mut effects, AlertCategory::Success, message);
                }
                Err(err) => {
                    state.registration_enabled = previous;
                    alert(state, &mut effects, AlertCategory::Danger, err.alert_message());
                }
            }
        }
        AdminAction::SetAddUsername(value) => state.add_form.username = value,
        AdminAction::SetAddPassword(value) => state.add_form.password = value,
        AdminAction::SetAddRole(role) => state.add_form.role = role,
        AdminAction::SubmitAddUser => {
            if state.is_pending(AdminActionClass::AddUser) {
                return Ok(effects);
            }
            let username = state.add_form.username.trim().to_string();
            if username.is_empty() || state.add_form.password.is_empty() {
                alert(
                    state,
                    &mut effects,
                    AlertCategory::Warning,
                    MISSING_CREDENTIALS_MESSAGE,
                );
                return Ok(effects);
            }
            state.in_flight.insert(AdminActionClass::AddUser);
            effects.push(AdminEffect::Request(AdminRequest::AddUser(AddUserRequest {
                username,
                password: state.add_form.password.clone(),
                role: state.add_form.role,
            })));
        }
        AdminAction::AddUserCompleted(result) => {
            state.in_flight.remove(&AdminActionClass::AddUser);
            match result {
                Ok(response) => {
                    let username = response.user.username.clone();
                    state.users.push(AdminUserRow {
                        record: UserRecord::from_new_user(response.user),
                        fading: false,
                    });
                    state.add_form = AddUserForm::default();
                    let message = message_or(response.message, &format!("User '{username}' added"));
                    alert(state, &mut effects, AlertCategory::Success, message);
                }
                Err(err) => alert(state, &mut effects, AlertCategory::Danger, err.alert_message()),
            }
        }
        AdminAction::OpenEditUser { id } => {
            let row = state.user(id).ok_or(AdminError::UserNotFound(id))?;
            let dialog = EditUserDialog::prefilled(&row.record);
            state.edit = Some(dialog);
        }
        AdminAction::CloseEditUser => state.edit = None,
        AdminAction::SetEditUsername(value) => {
            if let Some(dialog) = state.edit.as_mut() {
                dialog.username = value;
            }
        }
        AdminAction::SetEditPassword(value) => {
            if let Some(dialog) = state.edit.as_mut() {
                dialog.password = value;
            }
        }
        AdminAction::SetEditRole(role) => {
            if let Some(dialog) = state.edit.as_mut() {
                dialog.role = role;
            }
        }
        AdminAction::SetEditPermission {
            permission,
            granted,
        } => {
            if let Some(dialog) = state.edit.as_mut() {
                dialog.permissions.set(permission, granted);
            }
        }
        AdminAction::SubmitEditUser => {
            if state.is_pending(AdminActionClass::EditUser) {
                return Ok(effects);
            }
            let Some(dialog) = state.edit.as_ref() else {
                return Ok(effects);
            };
            let username = dialog.username.trim().to_string();
            if username.is_empty() {
                alert(state, &mut effects, AlertCategory::Warning, MISSING_USERNAME_MESSAGE);
                return Ok(effects);
            }
            let request = EditUserRequest {
                id: dialog.id,
                username,
                password: Some(dialog.password.clone()).filter(|password| !password.is_empty()),
                role: dialog.role,
                permissions: dialog.permissions,
            };
            state.in_flight.insert(AdminActionClass::EditUser);
            effects.push(AdminEffect::Request(AdminRequest::EditUser(request)));
        }
        AdminAction::EditUserCompleted { id, result } => {
            state.in_flight.remove(&AdminActionClass::EditUser);
            match result {
                Ok(response) => {
                    state.edit = None;
                    let message = message_or(response.message, "User updated");
                    alert(state, &mut effects, AlertCategory::Success, message);
                    effects.push(AdminEffect::Request(AdminRequest::FetchUser(id)));
                }
                Err(err) => alert(state, &mut effects, AlertCategory::Danger, err.alert_message()),
            }
        }
        AdminAction::UserRefreshed { id, result } => match result {
            Ok(record) => {
                if let Some(row) = state.user_mut(id) {
                    row.record = record;
                }
            }
            Err(_) => alert(
                state,
                &mut effects,
                AlertCategory::Warning,
                USER_REFRESH_FAILED_MESSAGE,
            ),
        },
        AdminAction::RequestDeleteUser { id } => {
            let row = state.user(id).ok_or(AdminError::UserNotFound(id))?;
            if row.fading || state.is_pending(AdminActionClass::DeleteUser(id)) {
                return Ok(effects);
            }
            effects.push(AdminEffect::ConfirmDeleteUser {
                id,
                prompt: delete_user_prompt(&row.record.username),
            });
        }
        AdminAction::ConfirmDeleteUser { id } => {
            if state.user(id).is_none() {
                return Err(AdminError::UserNotFound(id));
            }
            if !state.in_flight.insert(AdminActionClass::DeleteUser(id)) {
                return Ok(effects);
            }
            effects.push(AdminEffect::Request(AdminRequest::DeleteUser(id)));
        }
        AdminAction::DeleteUserCompleted { id, result } => {
            state.in_flight.remove(&AdminActionClass::DeleteUser(id));
            match result {
                Ok(response) => {
                    if let Some(row) = state.user_mut(id) {
                        row.fading = true;
                    }
                    let message = message_or(response.message, "User deleted");
                    alert(state, &mut effects, AlertCategory::Success, message);
                    effects.push(AdminEffect::DispatchAfter {
                        delay_ms: state.settings.row_fade_ms,
                        action: Box::new(AdminAction::RemoveFadedUser { id }),
                    });
                }
                Err(err) => alert(state, &mut effects, AlertCategory::Danger, err.alert_message()),
            }
        }
        AdminAction::RemoveFadedUser { id } => {
            state.users.retain(|row| !(row.record.id == id && row.fading));
        }
        AdminAction::DismissAlert => state.alert.dismiss(),
        AdminAction::AlertExpired(id) => {
            state.alert.expire(id);
        }
    }
    Ok(effects)
}

fn alert(
    state: &mut AdminState,
    effects: &mut Vec<AdminEffect>,
    category: AlertCategory,
    message: impl Into<String>,
) {
    if let Some((delay_ms, id)) = show_alert(&mut state.alert, &state.settings, category, message)
    {
        effects.push(AdminEffect::DispatchAfter {
            delay_ms,
            action: Box::new(AdminAction::AlertExpired(id)),
        });
    }
}

#[cfg(test)]
mod tests {
    use fm_host::{AdminBootstrap, PageContext, PermissionSet, UserSummary};
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::model::RuntimeSettings;

    fn record(id: i64, username: &str, permissions: PermissionSet) -> UserRecord {
        UserRecord {
            id: UserId(id),
            username: username.into(),
            role: UserRole::User,
            permissions,
        }
    }

    fn sample_state() -> AdminState {
        let mut limited = PermissionSet::all_granted();
        limited.set(Permission::Delete, false);
        AdminState::new(
            PageContext::new("", "tok"),
            AdminBootstrap {
                registration_enabled: false,
                users: vec![
                    record(1, "admin", PermissionSet::all_granted()),
                    record(2, "mia", limited),
                ],
            },
            RuntimeSettings::default(),
        )
    }

    fn reduce(state: &mut AdminState, action: AdminAction) -> Vec<AdminEffect> {
        reduce_admin(state, action).expect("reduce")
    }

    #[test]
    fn rejected_registration_toggle_rolls_back() {
        let mut state = sample_state();
        let effects = reduce(&mut state, AdminAction::ToggleRegistration { enabled: true });
        assert!(state.registration_enabled);
        assert_eq!(
            effects,
            vec![AdminEffect::Request(AdminRequest::ToggleRegistration {
                enabled: true,
                previous: false,
            })]
        );
        assert!(reduce(&mut state, AdminAction::ToggleRegistration { enabled: false }).is_empty());

        reduce(
            &mut state,
            AdminAction::RegistrationCompleted {
                previous: false,
                result: Err(ApiError::rejected(500, "Database locked")),
            },
        );
        assert!(!state.registration_enabled);
        let alert = state.alert.current().expect("alert");
        assert_eq!(alert.category, AlertCategory::Danger);
        assert_eq!(alert.message, "Database locked");
    }

    #[test]
    fn accepted_registration_toggle_keeps_new_state() {
        let mut state = sample_state();
        reduce(&mut state, AdminAction::ToggleRegistration { enabled: true });
        let effects = reduce(
            &mut state,
            AdminAction::RegistrationCompleted {
                previous: false,
                result: Ok(MessageResponse {
                    message: "Registration enabled".into(),
                }),
            },
        );
        assert!(state.registration_enabled);
        assert_eq!(effects.len(), 1);
        assert!(!state.is_pending(AdminActionClass::ToggleRegistration));
    }

    #[test]
    fn added_user_row_has_every_permission_and_form_resets() {
        let mut state = sample_state();
        reduce(&mut state, AdminAction::SetAddUsername(" zoe ".into()));
        reduce(&mut state, AdminAction::SetAddPassword("secret".into()));
        reduce(&mut state, AdminAction::SetAddRole(UserRole::Admin));
        let effects = reduce(&mut state, AdminAction::SubmitAddUser);
        assert_eq!(
            effects,
            vec![AdminEffect::Request(AdminRequest::AddUser(AddUserRequest {
                username: "zoe".into(),
                password: "secret".into(),
                role: UserRole::Admin,
            }))]
        );

        reduce(
            &mut state,
            AdminAction::AddUserCompleted(Ok(AddUserResponse {
                message: "User 'zoe' added".into(),
                user: UserSummary {
                    id: UserId(3),
                    username: "zoe".into(),
                    role: UserRole::Admin,
                },
            })),
        );
        let row = state.user(UserId(3)).expect("new row");
        assert_eq!(row.record.permissions, PermissionSet::all_granted());
        assert_eq!(state.add_form, AddUserForm::default());
    }

    #[test]
    fn add_user_requires_username_and_password() {
        let mut state = sample_state();
        reduce(&mut state, AdminAction::SetAddUsername("zoe".into()));
        assert!(reduce(&mut state, AdminAction::SubmitAddUser).is_empty());
        assert_eq!(
            state.alert.current().map(|a| a.message.as_str()),
            Some(MISSING_CREDENTIALS_MESSAGE)
        );
    }

    #[test]
    fn failed_add_user_adds_no_row() {
        let mut state = sample_state();
        reduce(
            &mut state,
            AdminAction::AddUserCompleted(Err(ApiError::rejected(409, "Username taken"))),
        );
        assert_eq!(state.users.len(), 2);
    }

    #[test]
    fn edit_prefills_and_omits_empty_password() {
        let mut state = sample_state();
        reduce(&mut state, AdminAction::OpenEditUser { id: UserId(2) });
        let dialog = state.edit.as_ref().expect("dialog");
        assert_eq!(dialog.username, "mia");
        assert!(dialog.password.is_empty());
        assert!(!dialog.permissions.get(Permission::Delete));

        reduce(
            &mut state,
            AdminAction::SetEditPermission {
                permission: Permission::Upload,
                granted: false,
            },
        );
        let effects = reduce(&mut state, AdminAction::SubmitEditUser);
        let [AdminEffect::Request(AdminRequest::EditUser(request))] = effects.as_slice() else {
            panic!("expected one edit request, got {effects:?}");
        };
        assert_eq!(request.password, None);
        assert!(!request.permissions.get(Permission::Upload));
    }

    #[test]
    fn successful_edit_closes_dialog_and_patches_only_that_row() {
        let mut state = sample_state();
        reduce(&mut state, AdminAction::OpenEditUser { id: UserId(2) });
        reduce(&mut state, AdminAction::SubmitEditUser);
        let effects = reduce(
            &mut state,
            AdminAction::EditUserCompleted {
                id: UserId(2),
                result: Ok(MessageResponse {
                    message: "User 'mia' updated".into(),
                }),
            },
        );
        assert!(state.edit.is_none());
        assert!(effects.contains(&AdminEffect::Request(AdminRequest::FetchUser(UserId(2)))));

        let refreshed = record(2, "mia2", PermissionSet::all_granted());
        let before_admin = state.user(UserId(1)).cloned();
        reduce(
            &mut state,
            AdminAction::UserRefreshed {
                id: UserId(2),
                result: Ok(refreshed.clone()),
            },
        );
        assert_eq!(state.user(UserId(2)).map(|r| &r.record), Some(&refreshed));
        assert_eq!(state.user(UserId(1)).cloned(), before_admin);
    }

    #[test]
    fn failed_edit_keeps_dialog_open() {
        let mut state = sample_state();
        reduce(&mut state, AdminAction::OpenEditUser { id: UserId(2) });
        reduce(&mut state, AdminAction::SubmitEditUser);
        reduce(
            &mut state,
            AdminAction::EditUserCompleted {
                id: UserId(2),
                result: Err(ApiError::rejected(409, "Username taken")),
            },
        );
        assert!(state.edit.is_some());
        assert_eq!(state.user(UserId(2)).map(|r| r.record.username.as_str()), Some("mia"));
    }

    #[test]
    fn delete_user_confirms_then_fades_then_removes() {
        let mut state = sample_state();
        let effects = reduce(&mut state, AdminAction::RequestDeleteUser { id: UserId(2) });
        assert_eq!(
            effects,
            vec![AdminEffect::ConfirmDeleteUser {
                id: UserId(2),
                prompt: delete_user_prompt("mia"),
            }]
        );
        let effects = reduce(&mut state, AdminAction::ConfirmDeleteUser { id: UserId(2) });
        assert_eq!(
            effects,
            vec![AdminEffect::Request(AdminRequest::DeleteUser(UserId(2)))]
        );
        assert!(reduce(&mut state, AdminAction::ConfirmDeleteUser { id: UserId(2) }).is_empty());

        let effects = reduce(
            &mut state,
            AdminAction::DeleteUserCompleted {
                id: UserId(2),
                result: Ok(MessageResponse {
                    message: "User 'mia' deleted".into(),
                }),
            },
        );
        assert!(state.user(UserId(2)).expect("fading row").fading);
        assert!(effects.contains(&AdminEffect::DispatchAfter {
            delay_ms: 300,
            action: Box::new(AdminAction::RemoveFadedUser { id: UserId(2) }),
        }));
        reduce(&mut state, AdminAction::RemoveFadedUser { id: UserId(2) });
        assert!(state.user(UserId(2)).is_none());
    }

    #[test]
    fn failed_delete_keeps_row() {
        let mut state = sample_state();
        reduce(&mut state, AdminAction::ConfirmDeleteUser { id: UserId(2) });
        reduce(
            &mut state,
            AdminAction::DeleteUserCompleted {
                id: UserId(2),
                result: Err(ApiError::Transport("offline".into())),
            },
        );
        let row = state.user(UserId(2)).expect("row");
        assert!(!row.fading);
        assert_eq!(
            state.alert.current().map(|a| a.message.as_str()),
            Some("Unknown error")
        );
    }

    #[test]
    fn unknown_user_is_an_error() {
        let mut state = sample_state();
        assert_eq!(
            reduce_admin(&mut state, AdminAction::OpenEditUser { id: UserId(9) }),
            Err(AdminError::UserNotFound(UserId(9)))
        );
    }
}
