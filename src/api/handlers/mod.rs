mod auth;
mod files;
mod folders;
mod health;
mod waitlist;

pub use auth::{login, logout};
pub use files::{delete_file, download_all, download_file, list_files, upload_files};
pub use folders::{create_folder, delete_folder, list_folders, update_folder};
pub use health::health;
pub use waitlist::{delete_waitlist_entry, join_waitlist, list_waitlist};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};

/// Distinguishes between a missing field (`None`) and an explicit `null`
/// (`Some(None)`).
fn nullable<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: DeserializeOwned,
    D: Deserializer<'de>,
{
    Ok(Some(Option::deserialize(deserializer)?))
}
