//! Per-user cursor over the virtual filesystem.
//!
//! A [`Session`] owns the tree, the current working directory and the
//! username that locates `/home/<username>`. Every public operation takes
//! paths in one of three forms:
//!
//! - absolute: `/etc/motd`
//! - home-relative: `~`, `~/notes.txt`
//! - cwd-relative: `docs/../notes.txt`
//!
//! `.` and `..` are resolved lexically before the tree is walked, so `..`
//! never requires the popped segment to exist. Named segments must exist and,
//! except for the last one, be directories.
//!
//! Mutations validate fully before their single insert or delete, so a
//! failing call never leaves the tree half-modified.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use super::error::{BootError, FsError};
use super::filesystem::{NodeId, VirtualFs, WalkError};
use crate::config::HOME_ROOT;
use crate::models::{FileContent, InitialTree, OpenRequest};
use crate::utils::Fetcher;

/// Where a path points once its parent directory is known.
enum Target {
    Existing(NodeId),
    Vacant { parent: NodeId, name: String },
}

/// Shell session: filesystem, working directory and user identity.
#[derive(Clone, Debug)]
pub struct Session {
    fs: VirtualFs,
    cwd: NodeId,
    home: NodeId,
    username: String,
}

impl Session {
    /// Create a session over an existing tree. The cwd starts at home.
    ///
    /// # Panics
    ///
    /// Panics if `/home/<username>` is missing or is not a directory.
    pub fn new(fs: VirtualFs, username: impl Into<String>) -> Self {
        let username = username.into();
        let home = match fs.walk(VirtualFs::ROOT, &["home", username.as_str()]) {
            Ok(id) if fs.is_directory(id) => id,
            _ => panic!("{HOME_ROOT}/{username} must exist before a session is created"),
        };

        Self {
            fs,
            cwd: home,
            home,
            username,
        }
    }

    /// Create a session over a fresh tree holding only `/home/<username>`.
    pub fn with_home(username: impl Into<String>) -> Self {
        let username = username.into();
        let mut fs = VirtualFs::new();
        fs.create_dir_all(&["home", username.as_str()]);
        Self::new(fs, username)
    }

    /// Build the initial tree from a manifest, fetching every sourced file.
    ///
    /// Nothing is returned unless every directory and file was placed.
    pub async fn bootstrap<F: Fetcher>(
        tree: &InitialTree,
        username: &str,
        fetcher: &F,
    ) -> Result<Self, BootError> {
        let mut session = Self::with_home(username);

        for dir in &tree.directories {
            session
                .mkdir(dir, true)
                .inspect_err(|e| log::warn!("manifest directory conflict: {}", e))?;
        }

        for file in &tree.files {
            let content = match (&file.source, &file.content) {
                (Some(source), _) => {
                    let bytes = fetcher.fetch(source).await.map_err(|e| {
                        log::warn!("bootstrap fetch of '{}' failed: {}", source, e);
                        BootError::Fetch {
                            path: source.clone(),
                            source: e,
                        }
                    })?;
                    FileContent::Static {
                        bytes,
                        source: source.clone(),
                    }
                }
                (None, Some(text)) => FileContent::Dynamic(text.as_bytes().to_vec()),
                (None, None) => FileContent::empty(),
            };
            session
                .place_file(&file.path, content)
                .inspect_err(|e| log::warn!("manifest file conflict: {}", e))?;
        }

        log::info!(
            "bootstrapped filesystem for '{}' ({} dirs, {} files)",
            username,
            tree.directories.len(),
            tree.files.len()
        );
        Ok(session)
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    /// Read-only access to the underlying tree.
    pub fn fs(&self) -> &VirtualFs {
        &self.fs
    }

    // =========================================================================
    // Path Resolution
    // =========================================================================

    /// Absolute, normalized segments for `path`.
    fn absolute_segments(&self, path: &str) -> Vec<String> {
        if let Some(rest) = path.strip_prefix('/') {
            return VirtualFs::normalize_path(Vec::new(), rest);
        }
        if path == "~" {
            return self.fs.segments_of(self.home);
        }
        if let Some(rest) = path.strip_prefix("~/") {
            return VirtualFs::normalize_path(self.fs.segments_of(self.home), rest);
        }
        VirtualFs::normalize_path(self.fs.segments_of(self.cwd), path)
    }

    /// An empty path names nothing; the cwd is reached through `None` or `.`.
    fn reject_empty(path: &str) -> Result<(), FsError> {
        if path.is_empty() {
            return Err(FsError::NoSuchFileOrDirectory(path.to_string()));
        }
        Ok(())
    }

    fn walk_error(path: &str, err: WalkError) -> FsError {
        match err {
            WalkError::Missing(_) => FsError::NoSuchFileOrDirectory(path.to_string()),
            WalkError::NotDirectory(_) => FsError::NotADirectory(path.to_string()),
        }
    }

    /// Resolve `path` to an existing node.
    fn resolve(&self, path: &str) -> Result<NodeId, FsError> {
        Self::reject_empty(path)?;
        let segments = self.absolute_segments(path);
        let id = self
            .fs
            .walk(VirtualFs::ROOT, &segments)
            .map_err(|e| Self::walk_error(path, e))?;

        // `file/` names a directory that cannot exist
        if path.ends_with('/') && !self.fs.is_directory(id) {
            return Err(FsError::NotADirectory(path.to_string()));
        }

        log::debug!("resolved '{}' to {}", path, self.fs.path_of(id));
        Ok(id)
    }

    /// Resolve everything but the last segment, then look the last one up.
    fn locate(&self, path: &str) -> Result<Target, FsError> {
        Self::reject_empty(path)?;
        let mut segments = self.absolute_segments(path);
        let Some(name) = segments.pop() else {
            return Ok(Target::Existing(VirtualFs::ROOT));
        };

        let parent = self
            .fs
            .walk(VirtualFs::ROOT, &segments)
            .map_err(|e| Self::walk_error(path, e))?;
        if !self.fs.is_directory(parent) {
            return Err(FsError::NotADirectory(path.to_string()));
        }

        Ok(match self.fs.child(parent, &name) {
            Some(id) => Target::Existing(id),
            None => Target::Vacant { parent, name },
        })
    }

    /// Like [`Self::locate`], for callers that create files: `name/` must
    /// already be a directory.
    fn locate_file(&self, path: &str) -> Result<Target, FsError> {
        let target = self.locate(path)?;
        if path.ends_with('/') {
            match target {
                Target::Existing(id) if self.fs.is_directory(id) => {}
                _ => return Err(FsError::NotADirectory(path.to_string())),
            }
        }
        Ok(target)
    }

    // =========================================================================
    // Operations
    // =========================================================================

    /// Change the working directory. `None` goes home.
    pub fn cd(&mut self, path: Option<&str>) -> Result<(), FsError> {
        let Some(path) = path else {
            self.cwd = self.home;
            return Ok(());
        };

        let id = self.resolve(path)?;
        if !self.fs.is_directory(id) {
            return Err(FsError::NotADirectory(path.to_string()));
        }
        self.cwd = id;
        Ok(())
    }

    /// Create a directory.
    ///
    /// With `make_parents`, missing intermediate directories are created and
    /// an existing directory at the target is accepted.
    pub fn mkdir(&mut self, path: &str, make_parents: bool) -> Result<(), FsError> {
        if make_parents {
            return self.mkdir_parents(path).map(|_| ());
        }

        match self.locate(path)? {
            Target::Existing(_) => Err(FsError::FileExists(path.to_string())),
            Target::Vacant { parent, name } => self
                .fs
                .create_dir(parent, &name)
                .map(|_| ())
                .ok_or_else(|| FsError::FileExists(path.to_string())),
        }
    }

    fn mkdir_parents(&mut self, path: &str) -> Result<NodeId, FsError> {
        Self::reject_empty(path)?;
        let segments = self.absolute_segments(path);

        // Validate the existing prefix before creating anything.
        let mut existing = VirtualFs::ROOT;
        let mut depth = 0;
        for (i, segment) in segments.iter().enumerate() {
            let Some(id) = self.fs.child(existing, segment) else {
                break;
            };
            if !self.fs.is_directory(id) {
                return Err(if i + 1 == segments.len() {
                    FsError::FileExists(path.to_string())
                } else {
                    FsError::NotADirectory(path.to_string())
                });
            }
            existing = id;
            depth = i + 1;
        }

        let mut current = existing;
        for segment in &segments[depth..] {
            current = self
                .fs
                .create_dir(current, segment)
                .ok_or_else(|| FsError::NotADirectory(path.to_string()))?;
        }
        Ok(current)
    }

    /// Create an empty file if nothing exists at `path`.
    pub fn touch(&mut self, path: &str) -> Result<(), FsError> {
        if let Target::Vacant { parent, name } = self.locate_file(path)? {
            self.fs.create_file(parent, &name, FileContent::empty());
        }
        Ok(())
    }

    /// Decoded text of a file.
    pub fn cat(&self, path: &str) -> Result<String, FsError> {
        let id = self.resolve(path)?;
        self.fs
            .content(id)
            .map(FileContent::text)
            .ok_or_else(|| FsError::IsADirectory(path.to_string()))
    }

    /// Open a file for in-place mutation, creating it if absent.
    ///
    /// Missing parent directories are an error; they are never created here.
    pub fn create_or_open_file(&mut self, path: &str) -> Result<&mut FileContent, FsError> {
        let id = match self.locate_file(path)? {
            Target::Existing(id) => id,
            Target::Vacant { parent, name } => self
                .fs
                .create_file(parent, &name, FileContent::empty())
                .ok_or_else(|| FsError::NotADirectory(path.to_string()))?,
        };
        self.fs
            .content_mut(id)
            .ok_or_else(|| FsError::IsADirectory(path.to_string()))
    }

    /// Store `content` at `path`, creating parent directories as needed.
    fn place_file(&mut self, path: &str, content: FileContent) -> Result<(), FsError> {
        if let Some((parent, _)) = path.rsplit_once('/')
            && !parent.is_empty()
        {
            self.mkdir_parents(parent)?;
        }
        *self.create_or_open_file(path)? = content;
        Ok(())
    }

    fn is_protected(&self, id: NodeId) -> bool {
        id == VirtualFs::ROOT || id == self.home || Some(id) == self.fs.parent(self.home)
    }

    /// Remove a file, or a directory tree when `recursive` is set.
    ///
    /// Root, `/home` and the session's home are always refused, as are
    /// paths ending in `.` or `..`. If the working directory is removed
    /// along with the tree, it moves to the removed node's parent.
    pub fn rm(&mut self, path: &str, recursive: bool) -> Result<(), FsError> {
        let id = self.resolve(path)?;

        let last = path.trim_end_matches('/').rsplit('/').next().unwrap_or("");
        if self.is_protected(id) || last == "." || last == ".." {
            return Err(FsError::OperationRefused(path.to_string()));
        }
        if self.fs.is_directory(id) && !recursive {
            return Err(FsError::IsADirectory(path.to_string()));
        }

        if self.fs.contains(id, self.cwd) {
            self.cwd = self.fs.parent(id).unwrap_or(self.home);
            log::debug!("cwd removed, moved to {}", self.pwd());
        }
        self.fs.remove(id);
        Ok(())
    }

    /// Names under a directory, sorted, directories suffixed with `/`.
    ///
    /// `None` lists the working directory. A path naming a file lists just
    /// that path.
    pub fn list_files(&self, path: Option<&str>) -> Result<Vec<String>, FsError> {
        let id = match path {
            Some(path) => self.resolve(path)?,
            None => self.cwd,
        };

        let Some(entries) = self.fs.list(id) else {
            return Ok(vec![path.unwrap_or_default().to_string()]);
        };

        Ok(entries
            .into_iter()
            .map(|(name, child)| {
                if self.fs.is_directory(child) {
                    format!("{}/", name)
                } else {
                    name.to_string()
                }
            })
            .collect())
    }

    /// Absolute path of the working directory.
    pub fn pwd(&self) -> String {
        self.fs.path_of(self.cwd)
    }

    /// Working directory for the prompt, with the home prefix shown as `~`.
    pub fn formatted_cwd(&self) -> String {
        let cwd = self.pwd();
        let home = self.fs.path_of(self.home);
        if cwd == home {
            return "~".to_string();
        }
        match cwd.strip_prefix(&home).and_then(|rest| rest.strip_prefix('/')) {
            Some(rest) => format!("~/{}", rest),
            None => cwd,
        }
    }

    /// Check if `path` resolves to a directory.
    pub fn is_directory(&self, path: &str) -> bool {
        self.resolve(path).is_ok_and(|id| self.fs.is_directory(id))
    }

    /// Check if `path` resolves to anything.
    pub fn dir_or_file_exists(&self, path: &str) -> bool {
        self.resolve(path).is_ok()
    }

    /// Describe how the UI should open a file.
    pub fn xdg_open(&self, path: &str) -> Result<OpenRequest, FsError> {
        let id = self.resolve(path)?;
        let name = self.fs.node(id).map(|n| n.name().to_string()).unwrap_or_default();

        match self.fs.content(id) {
            None => Err(FsError::IsADirectory(path.to_string())),
            Some(FileContent::Dynamic(bytes)) => Ok(OpenRequest::Blob {
                filename: name,
                base64: STANDARD.encode(bytes),
            }),
            Some(FileContent::Static { source, .. }) => Ok(OpenRequest::Url {
                url: source.clone(),
            }),
        }
    }

    /// Store downloaded bytes in the working directory under the first free
    /// name among `name`, `name.1`, `name.2`, …
    ///
    /// Returns the name used. Existing entries are never overwritten.
    pub fn save_download(
        &mut self,
        name: &str,
        bytes: Vec<u8>,
        source: &str,
    ) -> Result<String, FsError> {
        if !self.fs.is_directory(self.cwd) {
            return Err(FsError::NoSuchFileOrDirectory(self.pwd()));
        }

        let mut candidate = name.to_string();
        let mut n = 0;
        while self.fs.child(self.cwd, &candidate).is_some() {
            n += 1;
            candidate = format!("{}.{}", name, n);
        }

        let content = FileContent::Static {
            bytes,
            source: source.to_string(),
        };
        self.fs
            .create_file(self.cwd, &candidate, content)
            .ok_or_else(|| FsError::FileExists(candidate.clone()))?;
        Ok(candidate)
    }
}

// =============================================================================
// Tests
// =============================================================================
