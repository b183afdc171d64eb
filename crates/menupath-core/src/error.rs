// ============================================================================
// Error Types (8000+ range - ext ranges 6000/7000 are taken by window/ipc)
// ============================================================================

/// Error codes for menu-tree operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum MenuErrorCode {
    /// Path does not resolve to a node
    NotFound = 8000,
    /// A path segment exists but is not a submenu
    PathConflict = 8001,
    /// Sibling label collision on add/insert
    Duplicate = 8002,
    /// Malformed params or unresolved command target
    InvalidTemplate = 8003,
    /// set() called on a separator
    SeparatorNotSettable = 8004,
}

/// Custom error type for menu-tree operations
#[derive(Debug, thiserror::Error)]
pub enum MenuError {
    #[error("[{code}] Menu path not found: {path}")]
    NotFound { code: u32, path: String },

    #[error("[{code}] Menu path conflict in {path}: {used} is already used")]
    PathConflict { code: u32, path: String, used: String },

    #[error("[{code}] Menu item already exists: {path}")]
    Duplicate { code: u32, path: String },

    #[error("[{code}] Invalid menu template '{item}': {reason}")]
    InvalidTemplate { code: u32, item: String, reason: String },

    #[error("[{code}] Menu item at {path} is a separator, options not settable")]
    SeparatorNotSettable { code: u32, path: String },
}

impl MenuError {
    pub fn not_found(path: impl Into<String>) -> Self {
        Self::NotFound {
            code: MenuErrorCode::NotFound as u32,
            path: path.into(),
        }
    }

    pub fn path_conflict(path: impl Into<String>, used: impl Into<String>) -> Self {
        Self::PathConflict {
            code: MenuErrorCode::PathConflict as u32,
            path: path.into(),
            used: used.into(),
        }
    }

    pub fn duplicate(path: impl Into<String>) -> Self {
        Self::Duplicate {
            code: MenuErrorCode::Duplicate as u32,
            path: path.into(),
        }
    }

    pub fn invalid_template(item: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidTemplate {
            code: MenuErrorCode::InvalidTemplate as u32,
            item: item.into(),
            reason: reason.into(),
        }
    }

    pub fn separator_not_settable(path: impl Into<String>) -> Self {
        Self::SeparatorNotSettable {
            code: MenuErrorCode::SeparatorNotSettable as u32,
            path: path.into(),
        }
    }

    /// Numeric code carried by this error.
    pub fn code(&self) -> u32 {
        match self {
            Self::NotFound { code, .. }
            | Self::PathConflict { code, .. }
            | Self::Duplicate { code, .. }
            | Self::InvalidTemplate { code, .. }
            | Self::SeparatorNotSettable { code, .. } => *code,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(MenuErrorCode::NotFound as u32, 8000);
        assert_eq!(MenuErrorCode::PathConflict as u32, 8001);
        assert_eq!(MenuErrorCode::Duplicate as u32, 8002);
        assert_eq!(MenuErrorCode::InvalidTemplate as u32, 8003);
        assert_eq!(MenuErrorCode::SeparatorNotSettable as u32, 8004);
    }

    #[test]
    fn test_error_display() {
        let err = MenuError::not_found("foo/bar");
        assert!(err.to_string().contains("8000"));
        assert!(err.to_string().contains("foo/bar"));
        assert_eq!(err.code(), 8000);

        let err = MenuError::path_conflict("foo/bar/baz", "foo/bar");
        assert!(err.to_string().contains("8001"));
        assert!(err.to_string().contains("foo/bar"));

        let err = MenuError::duplicate("foo/bar");
        assert!(err.to_string().contains("8002"));

        let err = MenuError::invalid_template("foo", "'params' must be an array");
        assert!(err.to_string().contains("8003"));
        assert!(err.to_string().contains("params"));

        let err = MenuError::separator_not_settable("foo/sep");
        assert!(err.to_string().contains("8004"));
    }
}
