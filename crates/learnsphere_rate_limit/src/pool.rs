//! The shared credential pool and its rotation cursor.

use crate::Credential;
use learnsphere_error::ConfigError;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::{debug, info, instrument};

/// An ordered, non-empty set of credentials with a process-wide cursor.
///
/// Clones share the cursor, so a rotation performed by one caller is seen by
/// every other caller. Independent pools (e.g. in tests) never interfere.
/// The cursor only moves forward (modulo the pool size) and is never reset.
#[derive(Debug, Clone)]
pub struct CredentialPool {
    credentials: Arc<[Credential]>,
    cursor: Arc<AtomicUsize>,
}

impl CredentialPool {
    /// Parse a comma-separated key list.
    ///
    /// Entries are trimmed and empty entries discarded.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if no credentials remain.
    ///
    /// # Examples
    ///
    /// ```
    /// use learnsphere_rate_limit::CredentialPool;
    ///
    /// let pool = CredentialPool::parse(" k1 , ,k2,").unwrap();
    /// assert_eq!(pool.len(), 2);
    /// assert_eq!(pool.current_index(), 0);
    ///
    /// assert!(CredentialPool::parse(" , ").is_err());
    /// ```
    #[instrument(skip(raw))]
    pub fn parse(raw: &str) -> Result<Self, ConfigError> {
        let credentials: Vec<Credential> = raw
            .split(',')
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .map(Credential::new)
            .collect();

        if credentials.is_empty() {
            return Err(ConfigError::new("no API credentials configured"));
        }

        debug!(count = credentials.len(), "Parsed credential pool");
        Ok(Self {
            credentials: credentials.into(),
            cursor: Arc::new(AtomicUsize::new(0)),
        })
    }

    /// Read and parse the key list from an environment variable.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the variable is unset or holds no keys.
    #[instrument]
    pub fn from_env(var: &str) -> Result<Self, ConfigError> {
        let raw = std::env::var(var).map_err(|_| {
            ConfigError::new(format!("{} environment variable is not set", var))
        })?;
        Self::parse(&raw).map_err(|_| {
            ConfigError::new(format!("{} environment variable is not set or is empty", var))
        })
    }

    /// Number of credentials in the pool.
    pub fn len(&self) -> usize {
        self.credentials.len()
    }

    /// Always false; a pool cannot be constructed empty.
    pub fn is_empty(&self) -> bool {
        self.credentials.is_empty()
    }

    /// Index under the cursor.
    pub fn current_index(&self) -> usize {
        self.cursor.load(Ordering::Acquire)
    }

    /// The credential under the cursor, with its index.
    pub fn current(&self) -> (usize, &Credential) {
        let index = self.current_index();
        (index, &self.credentials[index])
    }

    /// Advance past `used`, the index that just hit its quota.
    ///
    /// If another caller already moved the cursor away from `used`, their
    /// rotation stands and this call changes nothing. Returns the index now
    /// under the cursor.
    pub fn rotate_from(&self, used: usize) -> usize {
        let next = (used + 1) % self.len();
        match self
            .cursor
            .compare_exchange(used, next, Ordering::AcqRel, Ordering::Acquire)
        {
            Ok(_) => {
                info!(from = used, to = next, "Switching to next API credential");
                next
            }
            Err(actual) => {
                debug!(used, actual, "Cursor already rotated by another caller");
                actual
            }
        }
    }
}
