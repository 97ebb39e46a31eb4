//! Arena-backed virtual filesystem tree.
//!
//! Nodes live in a single `Vec` and refer to each other through [`NodeId`]
//! handles. A directory owns its children by handle; each node stores its
//! parent's handle only to rebuild absolute paths. Handles are never reused,
//! so a handle to a removed node simply stops resolving.

use std::collections::BTreeMap;

use crate::models::FileContent;

/// Stable handle to a node in a [`VirtualFs`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

/// Directory or file payload.
#[derive(Clone, Debug)]
pub enum NodeKind {
    /// Children keyed by name, kept sorted
    Directory { children: BTreeMap<String, NodeId> },
    File { content: FileContent },
}

/// A single entry in the tree.
#[derive(Clone, Debug)]
pub struct Node {
    name: String,
    parent: Option<NodeId>,
    kind: NodeKind,
}

impl Node {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    pub fn is_directory(&self) -> bool {
        matches!(self.kind, NodeKind::Directory { .. })
    }
}

/// Why a walk over path segments stopped.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WalkError {
    /// Segment at this index does not exist
    Missing(usize),
    /// Segment at this index names a file but more segments follow
    NotDirectory(usize),
}

/// Virtual filesystem tree rooted at [`VirtualFs::ROOT`].
#[derive(Clone, Debug)]
pub struct VirtualFs {
    nodes: Vec<Option<Node>>,
}

impl VirtualFs {
    /// Handle of the root directory. The root has no parent.
    pub const ROOT: NodeId = NodeId(0);

    /// Create a filesystem holding only the root directory.
    pub fn new() -> Self {
        let root = Node {
            name: String::new(),
            parent: None,
            kind: NodeKind::Directory {
                children: BTreeMap::new(),
            },
        };
        Self {
            nodes: vec![Some(root)],
        }
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0).and_then(Option::as_ref)
    }

    fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.0).and_then(Option::as_mut)
    }

    /// Check if a handle names a live directory.
    pub fn is_directory(&self, id: NodeId) -> bool {
        self.node(id).is_some_and(Node::is_directory)
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id)?.parent
    }

    fn children(&self, id: NodeId) -> Option<&BTreeMap<String, NodeId>> {
        match &self.node(id)?.kind {
            NodeKind::Directory { children } => Some(children),
            NodeKind::File { .. } => None,
        }
    }

    /// Look up a direct child by name.
    pub fn child(&self, dir: NodeId, name: &str) -> Option<NodeId> {
        self.children(dir)?.get(name).copied()
    }

    /// Child names and handles in lexicographic order, or `None` for files.
    pub fn list(&self, dir: NodeId) -> Option<Vec<(&str, NodeId)>> {
        Some(
            self.children(dir)?
                .iter()
                .map(|(name, id)| (name.as_str(), *id))
                .collect(),
        )
    }

    pub fn content(&self, id: NodeId) -> Option<&FileContent> {
        match &self.node(id)?.kind {
            NodeKind::File { content } => Some(content),
            NodeKind::Directory { .. } => None,
        }
    }

    pub fn content_mut(&mut self, id: NodeId) -> Option<&mut FileContent> {
        match &mut self.node_mut(id)?.kind {
            NodeKind::File { content } => Some(content),
            NodeKind::Directory { .. } => None,
        }
    }

    /// Attach a new node under `parent`.
    ///
    /// Returns `None` without modifying the tree if `parent` is not a
    /// directory or already holds an entry with this name.
    fn insert(&mut self, parent: NodeId, name: &str, kind: NodeKind) -> Option<NodeId> {
        if self.children(parent)?.contains_key(name) {
            return None;
        }

        let id = NodeId(self.nodes.len());
        self.nodes.push(Some(Node {
            name: name.to_string(),
            parent: Some(parent),
            kind,
        }));

        if let Some(Node {
            kind: NodeKind::Directory { children },
            ..
        }) = self.node_mut(parent)
        {
            children.insert(name.to_string(), id);
        }

        Some(id)
    }

    /// Create an empty directory under `parent`.
    pub fn create_dir(&mut self, parent: NodeId, name: &str) -> Option<NodeId> {
        self.insert(
            parent,
            name,
            NodeKind::Directory {
                children: BTreeMap::new(),
            },
        )
    }

    /// Create a file under `parent`.
    pub fn create_file(
        &mut self,
        parent: NodeId,
        name: &str,
        content: FileContent,
    ) -> Option<NodeId> {
        self.insert(parent, name, NodeKind::File { content })
    }

    /// Walk `segments` from the root, creating missing directories.
    ///
    /// Returns `None` if an existing segment is a file.
    pub fn create_dir_all(&mut self, segments: &[&str]) -> Option<NodeId> {
        let mut current = Self::ROOT;
        for segment in segments {
            current = match self.child(current, segment) {
                Some(id) if self.is_directory(id) => id,
                Some(_) => return None,
                None => self.create_dir(current, segment)?,
            };
        }
        Some(current)
    }

    /// Detach a node from its parent and drop its whole subtree.
    ///
    /// The root cannot be removed; returns `false` in that case or when the
    /// handle is stale.
    pub fn remove(&mut self, id: NodeId) -> bool {
        let Some(parent) = self.parent(id) else {
            return false;
        };
        let Some(name) = self.node(id).map(|n| n.name.clone()) else {
            return false;
        };

        if let Some(Node {
            kind: NodeKind::Directory { children },
            ..
        }) = self.node_mut(parent)
        {
            children.remove(&name);
        }

        let mut pending = vec![id];
        while let Some(next) = pending.pop() {
            if let Some(node) = self.nodes.get_mut(next.0).and_then(Option::take)
                && let NodeKind::Directory { children } = node.kind
            {
                pending.extend(children.into_values());
            }
        }
        true
    }

    /// Walk `segments` starting at `start`. Every segment but the last must
    /// be a directory.
    pub fn walk<S: AsRef<str>>(&self, start: NodeId, segments: &[S]) -> Result<NodeId, WalkError> {
        let mut current = start;
        for (i, segment) in segments.iter().enumerate() {
            let Some(children) = self.children(current) else {
                return Err(WalkError::NotDirectory(i.saturating_sub(1)));
            };
            current = *children
                .get(segment.as_ref())
                .ok_or(WalkError::Missing(i))?;
        }
        Ok(current)
    }

    /// Names from the root down to `id`, root excluded.
    pub fn segments_of(&self, id: NodeId) -> Vec<String> {
        let mut segments = Vec::new();
        let mut current = Some(id);
        while let Some(node_id) = current {
            let Some(node) = self.node(node_id) else {
                break;
            };
            if node.parent.is_some() {
                segments.push(node.name.clone());
            }
            current = node.parent;
        }
        segments.reverse();
        segments
    }

    /// Absolute path of a node, rebuilt through parent links.
    pub fn path_of(&self, id: NodeId) -> String {
        let segments = self.segments_of(id);
        if segments.is_empty() {
            "/".to_string()
        } else {
            format!("/{}", segments.join("/"))
        }
    }

    /// Check if `ancestor` is `id` itself or lies on its parent chain.
    pub fn contains(&self, ancestor: NodeId, id: NodeId) -> bool {
        let mut current = Some(id);
        while let Some(node_id) = current {
            if node_id == ancestor {
                return true;
            }
            current = self.parent(node_id);
        }
        false
    }

    /// Resolve `.` and `..` lexically against `base` segments.
    ///
    /// `..` pops one segment and is clamped at the root.
    pub fn normalize_path(base: Vec<String>, path: &str) -> Vec<String> {
        let mut parts = base;
        for part in path.split('/').filter(|s| !s.is_empty()) {
            match part {
                ".." => {
                    parts.pop();
                }
                "." => {}
                _ => parts.push(part.to_string()),
            }
        }
        parts
    }
}

impl Default for VirtualFs {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_fs() -> VirtualFs {
        let mut fs = VirtualFs::new();
        let guest = fs.create_dir_all(&["home", "guest"]).unwrap();
        let docs = fs.create_dir(guest, "docs").unwrap();
        fs.create_file(docs, "notes.txt", FileContent::Dynamic(b"hello".to_vec()))
            .unwrap();
        fs
    }

    #[test]
    fn test_empty_fs() {
        let fs = VirtualFs::new();
        assert!(fs.is_directory(VirtualFs::ROOT));
        assert!(fs.parent(VirtualFs::ROOT).is_none());
        assert_eq!(fs.path_of(VirtualFs::ROOT), "/");
        assert_eq!(fs.list(VirtualFs::ROOT).unwrap().len(), 0);
    }

    #[test]
    fn test_walk() {
        let fs = create_test_fs();
        let notes = fs
            .walk(VirtualFs::ROOT, &["home", "guest", "docs", "notes.txt"])
            .unwrap();
        assert_eq!(fs.path_of(notes), "/home/guest/docs/notes.txt");
        assert_eq!(fs.content(notes).unwrap().text(), "hello");

        assert_eq!(
            fs.walk(VirtualFs::ROOT, &["home", "nobody", "x"]),
            Err(WalkError::Missing(1))
        );
        assert_eq!(
            fs.walk(VirtualFs::ROOT, &["home", "guest", "docs", "notes.txt", "x"]),
            Err(WalkError::NotDirectory(3))
        );
    }

    #[test]
    fn test_parent_links_point_to_container() {
        let fs = create_test_fs();
        let home = fs.child(VirtualFs::ROOT, "home").unwrap();
        let guest = fs.child(home, "guest").unwrap();
        assert_eq!(fs.parent(guest), Some(home));
        assert_eq!(fs.parent(home), Some(VirtualFs::ROOT));
    }

    #[test]
    fn test_insert_rejects_duplicates_and_files_as_parents() {
        let mut fs = create_test_fs();
        let guest = fs.walk(VirtualFs::ROOT, &["home", "guest"]).unwrap();
        assert!(fs.create_dir(guest, "docs").is_none());
        assert!(fs.create_file(guest, "docs", FileContent::empty()).is_none());

        let notes = fs.walk(guest, &["docs", "notes.txt"]).unwrap();
        assert!(fs.create_dir(notes, "x").is_none());
    }

    #[test]
    fn test_list_is_sorted() {
        let mut fs = VirtualFs::new();
        for name in ["zeta", "alpha", "Beta", ".hidden"] {
            fs.create_dir(VirtualFs::ROOT, name).unwrap();
        }
        let names: Vec<_> = fs
            .list(VirtualFs::ROOT)
            .unwrap()
            .into_iter()
            .map(|(name, _)| name)
            .collect();
        assert_eq!(names, vec![".hidden", "Beta", "alpha", "zeta"]);
    }

    #[test]
    fn test_remove_subtree() {
        let mut fs = create_test_fs();
        let docs = fs.walk(VirtualFs::ROOT, &["home", "guest", "docs"]).unwrap();
        let notes = fs.child(docs, "notes.txt").unwrap();

        assert!(fs.remove(docs));
        assert!(fs.node(docs).is_none());
        assert!(fs.node(notes).is_none());
        assert!(fs.walk(VirtualFs::ROOT, &["home", "guest", "docs"]).is_err());
        assert!(!fs.remove(docs));
        assert!(!fs.remove(VirtualFs::ROOT));
    }

    #[test]
    fn test_create_dir_all_stops_at_file() {
        let mut fs = create_test_fs();
        assert!(
            fs.create_dir_all(&["home", "guest", "docs", "notes.txt", "x"])
                .is_none()
        );
        let created = fs.create_dir_all(&["a", "b", "c"]).unwrap();
        assert_eq!(fs.path_of(created), "/a/b/c");
    }

    #[test]
    fn test_contains() {
        let fs = create_test_fs();
        let home = fs.child(VirtualFs::ROOT, "home").unwrap();
        let docs = fs.walk(home, &["guest", "docs"]).unwrap();
        assert!(fs.contains(home, docs));
        assert!(fs.contains(docs, docs));
        assert!(!fs.contains(docs, home));
    }

    #[test]
    fn test_normalize_path() {
        let base = || vec!["home".to_string(), "guest".to_string()];
        assert_eq!(VirtualFs::normalize_path(base(), "./docs"), ["home", "guest", "docs"]);
        assert_eq!(VirtualFs::normalize_path(base(), "../x/../y"), ["home", "y"]);
        assert_eq!(VirtualFs::normalize_path(base(), "../../../.."), Vec::<String>::new());
        assert_eq!(VirtualFs::normalize_path(Vec::new(), "//a//b/"), ["a", "b"]);
    }
}
