pub mod activity_log;
pub mod wallet;

pub use activity_log::{ActivityEntry, ActivityLog, HttpActivityLog, TracingActivityLog};
pub use wallet::{DepositInfo, WalletBalance, WalletService, WalletSettings};
