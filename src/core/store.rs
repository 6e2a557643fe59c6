//! Flat-file state: credentials, notes and reminders
//!
//! Each store is a single JSON object written wholesale on every save. There
//! is no locking; concurrent writers race and the last write wins.

use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::core::cleaner::parse_date;
use crate::core::error::StoreError;
use crate::core::portfolio::Role;

/// CNR number -> note text
pub type Notes = BTreeMap<String, String>;

/// CNR number -> reminder date
pub type Reminders = BTreeMap<String, NaiveDate>;

/// Load a JSON map, or an empty map if the file is absent or unreadable
pub fn load_map<V: DeserializeOwned>(path: &Path) -> BTreeMap<String, V> {
    if !path.exists() {
        return BTreeMap::new();
    }

    match fs::read_to_string(path)
        .map_err(|e| e.to_string())
        .and_then(|s| serde_json::from_str(&s).map_err(|e| e.to_string()))
    {
        Ok(map) => map,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "state file unreadable, treating as empty");
            BTreeMap::new()
        }
    }
}

/// Overwrite a JSON map file (write to a sibling temp file, then rename)
pub fn save_map<V: Serialize>(path: &Path, map: &BTreeMap<String, V>) -> Result<(), StoreError> {
    let io = |source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    };

    let json = serde_json::to_string_pretty(map).map_err(|source| StoreError::Encode {
        path: path.to_path_buf(),
        source,
    })?;

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(io)?;
        }
    }

    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, json).map_err(io)?;
    fs::rename(&tmp, path).map_err(io)?;
    debug!(path = %path.display(), entries = map.len(), "saved state file");
    Ok(())
}

/// Identity -> secret capability consumed by the login flow
pub trait CredentialStore {
    /// True if the identity has registered
    fn contains(&self, identity: &str) -> bool;

    /// True if the secret matches the identity's stored secret
    fn validate(&self, identity: &str, secret: &str) -> bool;

    /// Store a secret for the identity, replacing any existing one
    fn register(&mut self, identity: &str, secret: &str) -> Result<(), StoreError>;

    /// Replace the secret of a known identity; false if unknown
    fn reset(&mut self, identity: &str, new_secret: &str) -> Result<bool, StoreError>;
}

/// Tag prefixed to hashed secrets
const HASH_SCHEME: &str = "sha256";
const SALT_HEX_LEN: usize = 32;
const DIGEST_HEX_LEN: usize = 64;

/// Salted SHA-256 digest in the form `sha256$<salt>$<digest>`
pub fn hash_secret(secret: &str) -> String {
    let salt: [u8; 16] = rand::random();
    let salt = to_hex(&salt);
    format!("{}${}${}", HASH_SCHEME, salt, digest(&salt, secret))
}

/// Check a secret against a stored value
///
/// Anything not shaped exactly like [`hash_secret`] output is a plaintext
/// secret written by older tools.
pub fn verify_secret(stored: &str, secret: &str) -> bool {
    match split_hashed(stored) {
        Some((salt, expected)) => digest(salt, secret) == expected,
        None => stored == secret,
    }
}

fn split_hashed(stored: &str) -> Option<(&str, &str)> {
    let mut parts = stored.split('$');
    let (scheme, salt, expected) = (parts.next()?, parts.next()?, parts.next()?);
    let well_formed = scheme == HASH_SCHEME
        && parts.next().is_none()
        && is_hex(salt, SALT_HEX_LEN)
        && is_hex(expected, DIGEST_HEX_LEN);
    well_formed.then_some((salt, expected))
}

fn is_hex(s: &str, len: usize) -> bool {
    s.len() == len && s.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
}

fn digest(salt: &str, secret: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(secret.as_bytes());
    format!("{:x}", hasher.finalize())
}

fn to_hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}

/// Credential store backed by one JSON file per role
#[derive(Debug)]
pub struct JsonCredentialStore {
    path: PathBuf,
    role: Role,
    entries: BTreeMap<String, String>,
}

impl JsonCredentialStore {
    pub fn open(path: impl Into<PathBuf>, role: Role) -> Self {
        let path = path.into();
        let entries = load_map(&path);
        Self {
            path,
            role,
            entries,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn role(&self) -> Role {
        self.role
    }

    fn key(&self, identity: &str) -> String {
        self.role.normalize_identity(identity)
    }

    /// Re-read, apply `f`, write back
    fn modify<F: FnOnce(&mut BTreeMap<String, String>) -> bool>(
        &mut self,
        f: F,
    ) -> Result<bool, StoreError> {
        let mut entries: BTreeMap<String, String> = load_map(&self.path);
        let changed = f(&mut entries);
        if changed {
            save_map(&self.path, &entries)?;
        }
        self.entries = entries;
        Ok(changed)
    }
}

impl CredentialStore for JsonCredentialStore {
    fn contains(&self, identity: &str) -> bool {
        self.entries.contains_key(&self.key(identity))
    }

    fn validate(&self, identity: &str, secret: &str) -> bool {
        self.entries
            .get(&self.key(identity))
            .is_some_and(|stored| verify_secret(stored, secret))
    }

    fn register(&mut self, identity: &str, secret: &str) -> Result<(), StoreError> {
        let key = self.key(identity);
        let hashed = hash_secret(secret);
        self.modify(|entries| {
            if entries.insert(key, hashed).is_some() {
                warn!("re-registration replaced an existing credential");
            }
            true
        })?;
        Ok(())
    }

    fn reset(&mut self, identity: &str, new_secret: &str) -> Result<bool, StoreError> {
        let key = self.key(identity);
        let hashed = hash_secret(new_secret);
        self.modify(|entries| match entries.get_mut(&key) {
            Some(stored) => {
                *stored = hashed;
                true
            }
            None => false,
        })
    }
}

/// The persisted state files inside a workspace state directory
#[derive(Debug, Clone)]
pub struct StateFiles {
    dir: PathBuf,
}

impl StateFiles {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn credentials_path(&self, role: Role) -> PathBuf {
        match role {
            Role::Judge => self.dir.join("judge_passwords.json"),
            Role::Advocate => self.dir.join("advocate_passwords.json"),
        }
    }

    pub fn notes_path(&self) -> PathBuf {
        self.dir.join("notes.json")
    }

    pub fn reminders_path(&self) -> PathBuf {
        self.dir.join("reminders.json")
    }

    pub fn credentials(&self, role: Role) -> JsonCredentialStore {
        JsonCredentialStore::open(self.credentials_path(role), role)
    }

    pub fn load_notes(&self) -> Notes {
        load_map(&self.notes_path())
    }

    pub fn save_notes(&self, notes: &Notes) -> Result<(), StoreError> {
        save_map(&self.notes_path(), notes)
    }

    /// Load reminders; entries with unparsable dates are dropped
    pub fn load_reminders(&self) -> Reminders {
        let raw: BTreeMap<String, String> = load_map(&self.reminders_path());
        raw.into_iter()
            .filter_map(|(cnr, date)| match parse_date(&date) {
                Some(d) => Some((cnr, d)),
                None => {
                    warn!(cnr = %cnr, date = %date, "dropping reminder with invalid date");
                    None
                }
            })
            .collect()
    }

    pub fn save_reminders(&self, reminders: &Reminders) -> Result<(), StoreError> {
        save_map(&self.reminders_path(), reminders)
    }
}
