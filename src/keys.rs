//! Key Scheme Module
//!
//! Maps a caller's authorization scope onto cache keys. Keys are derived
//! from who is asking, never from what is cached, so one caller's view can
//! not be served to a caller with a different scope.

use serde::{Deserialize, Serialize};

// == Caller Scope ==
/// Authorization context of the caller requesting a cached view.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallerScope {
    /// Role name as issued by the authentication layer
    pub role: Option<String>,
    /// Numeric identifier of the caller, if known
    pub caller_id: Option<i64>,
}

impl CallerScope {
    pub fn new(role: impl Into<String>, caller_id: Option<i64>) -> Self {
        Self {
            role: Some(role.into()),
            caller_id,
        }
    }
}

// == Key Scheme ==
/// Derives keys for one cache namespace.
///
/// Layout:
/// - `<ns>:list:shared` for every privileged caller
/// - `<ns>:list:caller:<id>` for each other caller
/// - `<ns>:id:<id>` for a single resource, whatever the caller's role
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyScheme {
    namespace: String,
    privileged_role: String,
}

impl KeyScheme {
    /// Surrounding whitespace on `privileged_role` is ignored, as it is on
    /// the caller's role.
    pub fn new(namespace: impl Into<String>, privileged_role: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            privileged_role: privileged_role.into().trim().to_string(),
        }
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Case-insensitive match against the privileged role, both sides trimmed.
    pub fn is_privileged(&self, scope: &CallerScope) -> bool {
        scope
            .role
            .as_deref()
            .is_some_and(|role| role.trim().eq_ignore_ascii_case(&self.privileged_role))
    }

    // == List Key ==
    /// Key for the caller's list view, or None when the call must bypass
    /// the cache.
    ///
    /// A non-privileged caller without an identifier has no unambiguous
    /// key, so nothing may be read or written for it.
    pub fn list_key(&self, scope: &CallerScope) -> Option<String> {
        if self.is_privileged(scope) {
            return Some(format!("{}shared", self.list_prefix()));
        }
        scope
            .caller_id
            .map(|id| format!("{}caller:{}", self.list_prefix(), id))
    }

    /// Key for a single resource; resource attributes do not vary by role.
    pub fn id_key(&self, id: i64) -> String {
        format!("{}{}", self.id_prefix(), id)
    }

    /// Prefix shared by every list view in the namespace.
    pub fn list_prefix(&self) -> String {
        format!("{}:list:", self.namespace)
    }

    /// Prefix shared by every by-identifier entry in the namespace.
    pub fn id_prefix(&self) -> String {
        format!("{}:id:", self.namespace)
    }
}
