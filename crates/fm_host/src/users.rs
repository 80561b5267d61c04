//! Admin-panel user records and permission flags.

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
/// Server-assigned user id.
pub struct UserId(pub i64);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
/// Account role.
pub enum UserRole {
    /// Full administrator.
    Admin,
    /// Regular account.
    #[default]
    User,
}

impl UserRole {
    /// Stable wire token.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::User => "user",
        }
    }

    /// Parses a wire token.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim() {
            "admin" => Some(Self::Admin),
            "user" => Some(Self::User),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
/// One of the per-user capability flags.
pub enum Permission {
    /// Upload files.
    Upload,
    /// Delete entries.
    Delete,
    /// Rename entries.
    Rename,
    /// Move entries.
    Move,
    /// Create folders.
    CreateFolder,
}

impl Permission {
    /// All permissions in column order.
    pub const ALL: [Permission; 5] = [
        Self::Upload,
        Self::Delete,
        Self::Rename,
        Self::Move,
        Self::CreateFolder,
    ];

    /// Form-field name used by `POST /admin/edit_user/{id}`.
    pub const fn field_name(self) -> &'static str {
        match self {
            Self::Upload => "can_upload",
            Self::Delete => "can_delete",
            Self::Rename => "can_rename",
            Self::Move => "can_move",
            Self::CreateFolder => "can_create_folder",
        }
    }

    /// Column label.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Upload => "Upload",
            Self::Delete => "Delete",
            Self::Rename => "Rename",
            Self::Move => "Move",
            Self::CreateFolder => "New folder",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
/// Effective permission flags of a user.
pub struct PermissionSet {
    /// May upload.
    #[serde(rename = "can_upload")]
    pub upload: bool,
    /// May delete.
    #[serde(rename = "can_delete")]
    pub delete: bool,
    /// May rename.
    #[serde(rename = "can_rename")]
    pub rename: bool,
    /// May move.
    #[serde(rename = "can_move")]
    pub move_items: bool,
    /// May create folders.
    #[serde(rename = "can_create_folder")]
    pub create_folder: bool,
}

impl Default for PermissionSet {
    fn default() -> Self {
        Self::all_granted()
    }
}

impl PermissionSet {
    /// Every flag granted; the server's default for new accounts.
    pub const fn all_granted() -> Self {
        Self {
            upload: true,
            delete: true,
            rename: true,
            move_items: true,
            create_folder: true,
        }
    }

    /// Reads one flag.
    pub const fn get(&self, permission: Permission) -> bool {
        match permission {
            Permission::Upload => self.upload,
            Permission::Delete => self.delete,
            Permission::Rename => self.rename,
            Permission::Move => self.move_items,
            Permission::CreateFolder => self.create_folder,
        }
    }

    /// Writes one flag.
    pub fn set(&mut self, permission: Permission, granted: bool) {
        match permission {
            Permission::Upload => self.upload = granted,
            Permission::Delete => self.delete = granted,
            Permission::Rename => self.rename = granted,
            Permission::Move => self.move_items = granted,
            Permission::CreateFolder => self.create_folder = granted,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// Account summary returned by `POST /admin/add_user`.
pub struct UserSummary {
    /// Assigned id.
    pub id: UserId,
    /// Login name.
    pub username: String,
    /// Account role.
    pub role: UserRole,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// A user row of the admin table.
pub struct UserRecord {
    /// Assigned id.
    pub id: UserId,
    /// Login name.
    pub username: String,
    /// Account role.
    pub role: UserRole,
    /// Effective permission flags.
    #[serde(flatten)]
    pub permissions: PermissionSet,
}

impl UserRecord {
    /// Materializes a freshly added account; new accounts start with every permission granted.
    pub fn from_new_user(summary: UserSummary) -> Self {
        Self {
            id: summary.id,
            username: summary.username,
            role: summary.role,
            permissions: PermissionSet::all_granted(),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    #[test]
    fn user_record_uses_flat_can_fields() {
        let record: UserRecord = serde_json::from_value(json!({
            "id": 7,
            "username": "mia",
            "role": "user",
            "can_upload": true,
            "can_delete": false,
            "can_rename": true,
            "can_move": false,
            "can_create_folder": true
        }))
        .expect("deserialize user");

        assert_eq!(record.id, UserId(7));
        assert!(!record.permissions.get(Permission::Delete));
        assert!(record.permissions.get(Permission::CreateFolder));
        let value = serde_json::to_value(&record).expect("serialize user");
        assert_eq!(value["can_move"], json!(false));
    }

    #[test]
    fn new_users_start_with_all_permissions() {
        let record = UserRecord::from_new_user(UserSummary {
            id: UserId(3),
            username: "sam".to_string(),
            role: UserRole::User,
        });
        assert!(Permission::ALL
            .iter()
            .all(|permission| record.permissions.get(*permission)));
    }

    #[test]
    fn role_tokens_round_trip() {
        assert_eq!(UserRole::parse("admin"), Some(UserRole::Admin));
        assert_eq!(UserRole::parse(" user "), Some(UserRole::User));
        assert_eq!(UserRole::parse("root"), None);
        assert_eq!(UserRole::Admin.as_str(), "admin");
    }
}
