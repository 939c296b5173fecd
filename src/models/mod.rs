//! Domain models shared by both tools.

pub mod account;
pub mod cloud_status;
pub mod snapshot;

pub use account::{AccountEntry, AccountsFile};
pub use cloud_status::{AccountStatus, CloudStatus, Quote};
pub use snapshot::{Activity, OverallStatus, StatusSnapshot};
