//! Credential storage for external integrations.
//!
//! Access tokens live in the OS keyring. A missing token is the
//! "integration not connected" condition, not a fault -- callers are
//! expected to prompt for connection rather than fail.

/// Service name for the Google Calendar integration.
pub const GOOGLE: &str = "google";

/// Thin wrapper around the OS keyring for credential storage.
pub mod keyring_store {
    const SERVICE: &str = "duesync";

    pub fn get(key: &str) -> Result<Option<String>, Box<dyn std::error::Error>> {
        let entry = keyring::Entry::new(SERVICE, key)?;
        match entry.get_password() {
            Ok(pw) => Ok(Some(pw)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    pub fn set(key: &str, value: &str) -> Result<(), Box<dyn std::error::Error>> {
        let entry = keyring::Entry::new(SERVICE, key)?;
        entry.set_password(value)?;
        Ok(())
    }

    pub fn delete(key: &str) -> Result<(), Box<dyn std::error::Error>> {
        let entry = keyring::Entry::new(SERVICE, key)?;
        match entry.delete_credential() {
            Ok(()) => Ok(()),
            Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Stored access token for `service`, or `None` if not connected.
pub fn access_token(service: &str) -> Result<Option<String>, Box<dyn std::error::Error>> {
    keyring_store::get(&format!("{service}_access_token"))
}

/// Persist an access token for `service`.
pub fn set_access_token(service: &str, token: &str) -> Result<(), Box<dyn std::error::Error>> {
    keyring_store::set(&format!("{service}_access_token"), token)
}

/// Remove the stored token for `service`. Idempotent.
pub fn disconnect(service: &str) -> Result<(), Box<dyn std::error::Error>> {
    keyring_store::delete(&format!("{service}_access_token"))
}

/// Whether a token is stored for `service`.
pub fn is_connected(service: &str) -> bool {
    access_token(service).ok().flatten().is_some()
}
