pub mod client;
pub mod error;
pub mod types;

mod retry;

pub use client::BrowserTaskClient;
pub use error::ClientError;
pub use types::{TaskCreated, TaskStatus};
