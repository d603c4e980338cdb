//! API key sources.
//!
//! The runtime only reads the key to build the `Authorization` header; it is
//! never persisted or logged.

use keyring::Entry;
use std::env;
use std::fmt;

pub const DEFAULT_API_KEY_ENV: &str = "RUNPOD_API_KEY";
pub const KEYRING_SERVICE: &str = "runpod";

pub trait CredentialProvider: Send + Sync {
    fn api_key(&self) -> Option<String>;
}

/// A key handed over directly by the host.
#[derive(Clone)]
pub struct StaticCredential(String);

impl StaticCredential {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }
}

impl fmt::Debug for StaticCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("StaticCredential(***)")
    }
}

impl CredentialProvider for StaticCredential {
    fn api_key(&self) -> Option<String> {
        let key = self.0.trim();
        (!key.is_empty()).then(|| key.to_string())
    }
}

/// Reads the key from an environment variable (`RUNPOD_API_KEY` by default).
#[derive(Debug, Clone)]
pub struct EnvCredential {
    var: String,
}

impl EnvCredential {
    pub fn new(var: impl Into<String>) -> Self {
        Self { var: var.into() }
    }
}

impl Default for EnvCredential {
    fn default() -> Self {
        Self::new(DEFAULT_API_KEY_ENV)
    }
}

impl CredentialProvider for EnvCredential {
    fn api_key(&self) -> Option<String> {
        env::var(&self.var).ok().filter(|k| !k.trim().is_empty())
    }
}

/// Reads the key from the OS keyring.
#[derive(Debug, Clone)]
pub struct KeyringCredential {
    service: String,
    account: String,
}

impl KeyringCredential {
    pub fn new(account: impl Into<String>) -> Self {
        Self {
            service: KEYRING_SERVICE.to_string(),
            account: account.into(),
        }
    }
}

impl CredentialProvider for KeyringCredential {
    fn api_key(&self) -> Option<String> {
        let entry = Entry::new(&self.service, &self.account).ok()?;
        entry.get_password().ok()
    }
}

/// Tries each provider in order and returns the first key found.
pub struct ChainCredential {
    providers: Vec<Box<dyn CredentialProvider>>,
}

impl ChainCredential {
    pub fn new(providers: Vec<Box<dyn CredentialProvider>>) -> Self {
        Self { providers }
    }
}

impl Default for ChainCredential {
    /// Keyring first, then `RUNPOD_API_KEY`.
    fn default() -> Self {
        Self::new(vec![
            Box::new(KeyringCredential::new("default")),
            Box::new(EnvCredential::default()),
        ])
    }
}

impl CredentialProvider for ChainCredential {
    fn api_key(&self) -> Option<String> {
        self.providers.iter().find_map(|p| p.api_key())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_static_credential_rejects_blank() {
        assert_eq!(StaticCredential::new("  ").api_key(), None);
        assert_eq!(StaticCredential::new("rp_abc").api_key().as_deref(), Some("rp_abc"));
        assert_eq!(format!("{:?}", StaticCredential::new("rp_abc")), "StaticCredential(***)");
    }

    #[test]
    fn test_chain_takes_first_available() {
        let chain = ChainCredential::new(vec![
            Box::new(EnvCredential::new("RUNPOD_TEST_KEY_THAT_IS_NEVER_SET")),
            Box::new(StaticCredential::new("second")),
            Box::new(StaticCredential::new("third")),
        ]);
        assert_eq!(chain.api_key().as_deref(), Some("second"));
    }
}
