//! Page components for the directory view and the admin panel.

mod admin;
mod directory;
mod picker;

pub use admin::AdminPage;
pub use directory::DirectoryPage;
