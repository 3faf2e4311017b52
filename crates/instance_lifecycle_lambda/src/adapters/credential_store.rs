use std::time::Duration;

use crate::error::LifecycleError;

/// Object storage used to hand private key material to the caller.
pub trait CredentialStore: Send + Sync {
    fn upload_object(&self, key: &str, body: &[u8]) -> Result<(), LifecycleError>;

    /// Returns a time-limited GET URL for `key`.
    fn presign_download(&self, key: &str, expires_in: Duration) -> Result<String, LifecycleError>;
}
