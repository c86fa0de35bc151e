use anyhow::{Context, Result};
use std::path::PathBuf;

/// Plaintext file holding the last-issued bearer token. Overwritten on
/// every login, truncated on logout.
pub struct TokenFile {
    path: PathBuf,
}

impl TokenFile {
    #[must_use]
    pub const fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn save(&self, token: &str) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }

        std::fs::write(&self.path, token)
            .with_context(|| format!("Failed to write token file {}", self.path.display()))?;
        Ok(())
    }

    /// Returns `None` when the file is missing or empty.
    pub fn load(&self) -> Result<Option<String>> {
        match std::fs::read_to_string(&self.path) {
            Ok(contents) => {
                let token = contents.trim().to_string();
                Ok((!token.is_empty()).then_some(token))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e).with_context(|| {
                format!("Failed to read token file {}", self.path.display())
            }),
        }
    }

    /// Empties the file rather than removing it, matching the logout
    /// behavior clients expect.
    pub fn clear(&self) -> Result<()> {
        if self.path.exists() {
            std::fs::write(&self.path, "")
                .with_context(|| format!("Failed to clear token file {}", self.path.display()))?;
        }
        Ok(())
    }
}
