//! FileAction / RemovalReason - Decisions made while reconciling a tree

/// What the materialization pass does with one source file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileAction {
    /// Destination missing: copy it in
    CopyNew,

    /// Destination older than source: overwrite
    Update,

    /// Destination at least as fresh as source
    Skip,
}

impl FileAction {
    pub fn is_transfer(&self) -> bool {
        !matches!(self, FileAction::Skip)
    }

    pub fn action_name(&self) -> &'static str {
        match self {
            FileAction::CopyNew => "Copy",
            FileAction::Update => "Update",
            FileAction::Skip => "Skip",
        }
    }
}

/// Why a destination entry is scheduled for removal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemovalReason {
    /// Nothing exists at the analogous source path
    Orphaned,

    /// Source has a different entry type at the same path
    TypeChanged,
}
