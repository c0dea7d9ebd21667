// Application Layer - Use Cases and Business Logic

pub mod retry;
pub mod subscription;

// Re-exports
pub use retry::{RetryError, TxRetryPolicy};
pub use subscription::SubscriptionService;
