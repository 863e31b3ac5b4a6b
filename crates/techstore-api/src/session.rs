//! # Persisted Session State
//!
//! The back-office keeps a small amount of client-side state across
//! runs: the bearer token, the decoded user profile, the UI theme
//! preference, the default document type for new sales, and the
//! per-sale document-type tags chosen at capture time.
//!
//! ## Storage model
//! One JSON file under the platform data directory, rewritten whole on
//! every change (write-to-temp then rename, so a crash never leaves a
//! half-written file). A missing or corrupt file degrades to defaults.
//!
//! ## Trust model
//! The decoded profile (including the role) is a display hint only. Any
//! access-control decision is re-derived from server responses, never
//! from client-decoded claims.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use techstore_core::types::DocumentType;

use crate::error::{ApiError, ApiResult};

// =============================================================================
// State types
// =============================================================================

/// UI theme preference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
}

impl Default for Theme {
    fn default() -> Self {
        Theme::Light
    }
}

impl std::fmt::Display for Theme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        })
    }
}

/// User identity decoded from the bearer token payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: i64,
    pub username: String,
    pub role: String,
}

/// Everything persisted between runs.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct SessionState {
    token: Option<String>,
    user: Option<UserProfile>,
    theme: Theme,
    default_document_type: DocumentType,
    /// Explicit document-type choices recorded per sale at capture time.
    sale_document_types: HashMap<i64, DocumentType>,
}

// =============================================================================
// Store
// =============================================================================

/// Handle over the persisted session file.
///
/// Cloneable-by-Arc: the client, the query layer and the CLI all share
/// one store so a 401 in any call path clears credentials everywhere.
#[derive(Debug)]
pub struct SessionStore {
    path: PathBuf,
    state: RwLock<SessionState>,
}

impl SessionStore {
    /// Opens the store at the platform default location.
    pub fn open_default() -> ApiResult<Self> {
        let dirs = ProjectDirs::from("pe", "techstore", "backoffice")
            .ok_or_else(|| ApiError::State("no home directory available".to_string()))?;
        Self::open(dirs.data_dir().join("session.json"))
    }

    /// Opens the store backed by an explicit file path.
    pub fn open(path: impl Into<PathBuf>) -> ApiResult<Self> {
        let path = path.into();
        let state = Self::load(&path);
        Ok(SessionStore {
            path,
            state: RwLock::new(state),
        })
    }

    /// Lenient load: a missing or malformed file starts fresh.
    fn load(path: &Path) -> SessionState {
        match std::fs::read_to_string(path) {
            Ok(raw) => match serde_json::from_str(&raw) {
                Ok(state) => state,
                Err(err) => {
                    warn!(?path, %err, "session file malformed, starting fresh");
                    SessionState::default()
                }
            },
            Err(_) => SessionState::default(),
        }
    }

    /// Whole-file rewrite via a temporary sibling then rename.
    fn save(&self, state: &SessionState) -> ApiResult<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| ApiError::State(format!("creating {}: {}", parent.display(), e)))?;
        }

        let raw = serde_json::to_string_pretty(state)
            .map_err(|e| ApiError::State(format!("serializing session: {}", e)))?;

        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, raw)
            .map_err(|e| ApiError::State(format!("writing {}: {}", tmp.display(), e)))?;
        std::fs::rename(&tmp, &self.path)
            .map_err(|e| ApiError::State(format!("replacing {}: {}", self.path.display(), e)))?;

        debug!(path = ?self.path, "session state saved");
        Ok(())
    }

    fn mutate<F>(&self, f: F) -> ApiResult<()>
    where
        F: FnOnce(&mut SessionState),
    {
        let mut state = self.state.write().expect("session lock poisoned");
        f(&mut state);
        self.save(&state)
    }

    // -------------------------------------------------------------------------
    // Credentials
    // -------------------------------------------------------------------------

    /// Current bearer token, if logged in.
    pub fn token(&self) -> Option<String> {
        self.state.read().expect("session lock poisoned").token.clone()
    }

    /// Current decoded profile, if logged in.
    pub fn user(&self) -> Option<UserProfile> {
        self.state.read().expect("session lock poisoned").user.clone()
    }

    /// Stores credentials after a successful login.
    pub fn set_credentials(&self, token: String, user: UserProfile) -> ApiResult<()> {
        self.mutate(|s| {
            s.token = Some(token);
            s.user = Some(user);
        })
    }

    /// Drops credentials. Called on logout and on any 401.
    pub fn clear_credentials(&self) -> ApiResult<()> {
        self.mutate(|s| {
            s.token = None;
            s.user = None;
        })
    }

    // -------------------------------------------------------------------------
    // Preferences
    // -------------------------------------------------------------------------

    pub fn theme(&self) -> Theme {
        self.state.read().expect("session lock poisoned").theme
    }

    pub fn set_theme(&self, theme: Theme) -> ApiResult<()> {
        self.mutate(|s| s.theme = theme)
    }

    pub fn default_document_type(&self) -> DocumentType {
        self.state
            .read()
            .expect("session lock poisoned")
            .default_document_type
    }

    pub fn set_default_document_type(&self, tipo: DocumentType) -> ApiResult<()> {
        self.mutate(|s| s.default_document_type = tipo)
    }

    // -------------------------------------------------------------------------
    // Per-sale document tags
    // -------------------------------------------------------------------------

    /// Records the document type explicitly chosen for a sale.
    pub fn tag_sale(&self, sale_id: i64, tipo: DocumentType) -> ApiResult<()> {
        self.mutate(|s| {
            s.sale_document_types.insert(sale_id, tipo);
        })
    }

    /// The explicit document type recorded for a sale, if any.
    pub fn document_type_for(&self, sale_id: i64) -> Option<DocumentType> {
        self.state
            .read()
            .expect("session lock poisoned")
            .sale_document_types
            .get(&sale_id)
            .copied()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_store() -> (tempfile::TempDir, SessionStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::open(dir.path().join("session.json")).unwrap();
        (dir, store)
    }

    #[test]
    fn test_round_trip_through_disk() {
        let (dir, store) = temp_store();

        store
            .set_credentials(
                "token-abc".to_string(),
                UserProfile {
                    id: 7,
                    username: "admin".to_string(),
                    role: "Admin".to_string(),
                },
            )
            .unwrap();
        store.set_theme(Theme::Dark).unwrap();
        store.tag_sale(42, DocumentType::Factura).unwrap();

        // A second store over the same file sees everything.
        let reopened = SessionStore::open(dir.path().join("session.json")).unwrap();
        assert_eq!(reopened.token().as_deref(), Some("token-abc"));
        assert_eq!(reopened.user().unwrap().username, "admin");
        assert_eq!(reopened.theme(), Theme::Dark);
        assert_eq!(reopened.document_type_for(42), Some(DocumentType::Factura));
        assert_eq!(reopened.document_type_for(43), None);
    }

    #[test]
    fn test_clear_credentials_keeps_preferences() {
        let (_dir, store) = temp_store();

        store
            .set_credentials(
                "t".to_string(),
                UserProfile {
                    id: 1,
                    username: "u".to_string(),
                    role: "User".to_string(),
                },
            )
            .unwrap();
        store.set_theme(Theme::Dark).unwrap();
        store.clear_credentials().unwrap();

        assert!(store.token().is_none());
        assert!(store.user().is_none());
        assert_eq!(store.theme(), Theme::Dark);
    }

    #[test]
    fn test_corrupt_file_starts_fresh() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(&path, "{not json").unwrap();

        let store = SessionStore::open(&path).unwrap();
        assert!(store.token().is_none());
        assert_eq!(store.theme(), Theme::Light);
    }

    #[test]
    fn test_defaults() {
        let (_dir, store) = temp_store();
        assert_eq!(store.theme(), Theme::Light);
        assert_eq!(store.default_document_type(), DocumentType::Boleta);
        assert!(store.token().is_none());
    }
}
