// Location-based cache hunt bot: users find hidden caches by codeword
// and live location, admins hide them through a chat wizard.

pub mod api;
pub mod config;
pub mod db;
pub mod dispatch;
pub mod error;
pub mod geo;
pub mod guidance;
pub mod metrics;
pub mod nav;
pub mod session;
pub mod texts;
pub mod transport;
pub mod wizard;
