//! File inputs for the command line.

use std::path::{Path, PathBuf};

use lifebook_core::Fact;
use lifebook_error::{ConfigError, JsonError, LifebookResult};
use tracing::{debug, instrument};

/// Read a JSON array of facts.
///
/// ```json
/// [
///   {"question_id": "1-01", "text": "I was born in Haifa", "created_at": "2024-01-01T00:00:00Z"}
/// ]
/// ```
///
/// Facts keep file order.
///
/// # Errors
///
/// Returns a configuration error if the file cannot be read and a JSON
/// error if it does not hold a fact array.
#[instrument(skip(path), fields(path = %path.as_ref().display()))]
pub fn load_facts(path: impl AsRef<Path>) -> LifebookResult<Vec<Fact>> {
    let text = read_text_file(path)?;
    let facts: Vec<Fact> =
        serde_json::from_str(&text).map_err(|e| JsonError::new(e.to_string()))?;
    debug!(count = facts.len(), "Loaded facts");
    Ok(facts)
}

/// Read a UTF-8 text file such as a style guide.
pub fn read_text_file(path: impl AsRef<Path>) -> LifebookResult<String> {
    let path = path.as_ref();
    std::fs::read_to_string(path).map_err(|e| {
        ConfigError::new(format!("Failed to read {}: {}", path.display(), e)).into()
    })
}

/// Where the command line keeps chapters and books by default.
pub fn default_store_dir() -> PathBuf {
    dirs::data_local_dir()
        .map(|dir| dir.join("lifebook"))
        .unwrap_or_else(|| PathBuf::from(".lifebook"))
}
