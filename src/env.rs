//! Purpose: Read-only view of a process-wide key/value environment table.
//! Exports: `GetEnv`, `SystemEnv`, `SYSTEM_ENV`.
//! Role: Lets the parser and decoder run against the real environment or an in-memory table.
//! Invariants: Absence (`None`) is distinct from presence with an empty value.
//! Invariants: Lookups never mutate the environment.
use std::borrow::Cow;
use std::collections::HashMap;
use std::ffi::{OsStr, OsString};
use std::hash::BuildHasher;

pub trait GetEnv {
    fn get<'a>(&'a self, key: &str) -> Option<Cow<'a, OsStr>>;

    /// Value as bytes. Non UTF-8 values pass through untouched.
    fn get_bytes(&self, key: &str) -> Option<Vec<u8>> {
        self.get(key)
            .map(|value| value.into_owned().into_encoded_bytes())
    }

    /// Value as text, replacing invalid UTF-8 sequences.
    fn get_lossy(&self, key: &str) -> Option<String> {
        self.get(key)
            .map(|value| value.to_string_lossy().into_owned())
    }
}

/// The environment of the running process.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemEnv;

pub const SYSTEM_ENV: SystemEnv = SystemEnv;

impl GetEnv for SystemEnv {
    fn get<'a>(&'a self, key: &str) -> Option<Cow<'a, OsStr>> {
        std::env::var_os(key).map(Cow::from)
    }
}

impl<T: GetEnv + ?Sized> GetEnv for &T {
    #[inline]
    fn get<'a>(&'a self, key: &str) -> Option<Cow<'a, OsStr>> {
        (**self).get(key)
    }
}

impl<BH: BuildHasher> GetEnv for HashMap<String, String, BH> {
    #[inline]
    fn get<'a>(&'a self, key: &str) -> Option<Cow<'a, OsStr>> {
        HashMap::get(self, key).map(|value| Cow::from(OsStr::new(value)))
    }
}

impl<BH: BuildHasher> GetEnv for HashMap<OsString, OsString, BH> {
    #[inline]
    fn get<'a>(&'a self, key: &str) -> Option<Cow<'a, OsStr>> {
        HashMap::get(self, OsStr::new(key)).map(|value| Cow::from(value.as_os_str()))
    }
}
