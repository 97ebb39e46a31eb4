use serde::{Deserialize, Serialize};

// =============================================================================
// File Content
// =============================================================================

/// Bytes held by a file.
///
/// Static content remembers where it was downloaded from so `xdg-open` can
/// send the user to the original resource instead of re-serializing bytes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FileContent {
    /// Mutable, in-memory buffer owned by the file
    Dynamic(Vec<u8>),
    /// Buffer cached from a remote resource
    Static { bytes: Vec<u8>, source: String },
}

impl FileContent {
    /// Create empty dynamic content.
    pub fn empty() -> Self {
        Self::Dynamic(Vec::new())
    }

    /// Raw bytes regardless of origin.
    pub fn bytes(&self) -> &[u8] {
        match self {
            Self::Dynamic(bytes) | Self::Static { bytes, .. } => bytes,
        }
    }

    /// Lossy UTF-8 decoding of the bytes.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(self.bytes()).into_owned()
    }

    /// Replace the content. The file becomes dynamic.
    pub fn write(&mut self, data: &[u8]) {
        *self = Self::Dynamic(data.to_vec());
    }

    /// Append to the existing bytes. The file becomes dynamic.
    pub fn append(&mut self, data: &[u8]) {
        let mut bytes = std::mem::take(self).into_bytes();
        bytes.extend_from_slice(data);
        *self = Self::Dynamic(bytes);
    }

    fn into_bytes(self) -> Vec<u8> {
        match self {
            Self::Dynamic(bytes) | Self::Static { bytes, .. } => bytes,
        }
    }
}

impl Default for FileContent {
    fn default() -> Self {
        Self::empty()
    }
}

// =============================================================================
// Open Requests
// =============================================================================

/// Instruction for the UI to open a file outside the terminal.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "tag", rename_all = "snake_case")]
pub enum OpenRequest {
    /// Serve the file's bytes (base64) under its name
    Blob { filename: String, base64: String },
    /// Navigate to the resource the file was downloaded from
    Url { url: String },
}

// =============================================================================
// Initial Tree Manifest
// =============================================================================

/// Initial filesystem layout from `assets/initial_fs.json`.
///
/// Paths are absolute or start with `~`, which expands to the user's home.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct InitialTree {
    /// Directories to create (parents included)
    #[serde(default)]
    pub directories: Vec<String>,
    /// File entries
    #[serde(default)]
    pub files: Vec<InitialFile>,
}

/// File entry from the initial tree manifest.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct InitialFile {
    /// Where the file lives in the virtual filesystem
    pub path: String,
    /// Resource fetched at boot; the file becomes static content tagged with it
    #[serde(default)]
    pub source: Option<String>,
    /// Inline text for dynamic files
    #[serde(default)]
    pub content: Option<String>,
}

impl InitialTree {
    /// Parse a manifest from JSON text.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_converts_static_to_dynamic() {
        let mut content = FileContent::Static {
            bytes: b"remote".to_vec(),
            source: "https://example.com/a".to_string(),
        };
        content.write(b"local");
        assert_eq!(content, FileContent::Dynamic(b"local".to_vec()));
    }

    #[test]
    fn test_append_keeps_existing_bytes() {
        let mut content = FileContent::Static {
            bytes: b"hi\n".to_vec(),
            source: "motd.txt".to_string(),
        };
        content.append(b"bye\n");
        assert_eq!(content, FileContent::Dynamic(b"hi\nbye\n".to_vec()));
        assert_eq!(content.text(), "hi\nbye\n");
    }

    #[test]
    fn test_manifest_defaults() {
        let tree = InitialTree::from_json(r#"{"files":[{"path":"~/a.txt"}]}"#).unwrap();
        assert!(tree.directories.is_empty());
        assert_eq!(tree.files.len(), 1);
        assert!(tree.files[0].source.is_none());
        assert!(tree.files[0].content.is_none());
    }

    #[test]
    fn test_bundled_manifest_parses() {
        let tree = InitialTree::from_json(crate::config::INITIAL_FS_MANIFEST).unwrap();
        assert!(tree.files.iter().any(|f| f.path == "~/motd.txt"));
    }
}
