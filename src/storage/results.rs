//! Storage result types

/// One regular file in the served directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    pub name: String,
}

impl FileEntry {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// Exact, case-sensitive linear search over a listing.
pub fn find_entry<'a>(entries: &'a [FileEntry], name: &str) -> Option<&'a FileEntry> {
    entries.iter().find(|entry| entry.name == name)
}
