//! Error types for scene file counting
//!
//! All errors carry an error code so diagnostics can be grepped and
//! categorized.
//!
//! # Error Codes
//!
//! Error codes follow the pattern: `E<category><number>`
//!
//! Categories:
//! - **E1xxx**: I/O and file resolution errors
//! - **E2xxx**: XML parsing and structure errors
//! - **E3xxx**: Scene graph errors
//!
//! ## Common Error Codes
//!
//! - `E1001`: I/O error reading file
//! - `E1002`: Referenced file not found
//! - `E1003`: Scene file could not be opened or parsed
//! - `E1004`: Root scene file could not be loaded
//! - `E2001`: XML parsing error
//! - `E2002`: XML attribute error
//! - `E2003`: Invalid XML structure
//! - `E3001`: Reference cycle between scene files
//! - `E3002`: Numeric parse error

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for scene counting operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while loading and linking scene files
#[derive(Error, Debug)]
pub enum Error {
    /// IO error occurred while reading a file
    ///
    /// **Error Code**: E1001
    #[error("[E1001] I/O error: {0}")]
    Io(#[from] io::Error),

    /// A linked reference does not resolve to an existing file
    ///
    /// **Error Code**: E1002
    ///
    /// The link is dropped and contributes no triangles.
    #[error("[E1002] File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    /// A scene file could not be opened or parsed
    ///
    /// **Error Code**: E1003
    ///
    /// The node stays registered with zero triangles; siblings and
    /// ancestors are still processed.
    #[error("[E1003] Error opening file {}. Error message: {source}", .path.display())]
    Load {
        /// Canonical path of the file that failed
        path: PathBuf,
        /// Underlying failure
        #[source]
        source: Box<Error>,
    },

    /// The root scene file could not be loaded
    ///
    /// **Error Code**: E1004
    #[error("[E1004] Root scene file {} could not be loaded: {source}", .path.display())]
    RootMissing {
        /// Canonical path of the root file
        path: PathBuf,
        /// Underlying failure
        #[source]
        source: Box<Error>,
    },

    /// XML parsing error
    ///
    /// **Error Code**: E2001
    #[error("[E2001] XML parsing error: {0}")]
    Xml(#[from] quick_xml::Error),

    /// XML attribute error
    ///
    /// **Error Code**: E2002
    ///
    /// **Common Causes**:
    /// - Duplicate attribute
    /// - Unquoted attribute value
    #[error("[E2002] XML attribute error: {0}")]
    XmlAttr(String),

    /// Invalid XML structure
    ///
    /// **Error Code**: E2003
    ///
    /// **Common Causes**:
    /// - Element or attribute names that are not valid UTF-8
    /// - Unclosed subset elements
    #[error("[E2003] Invalid XML structure: {0}")]
    InvalidXml(String),

    /// A reference points back at a file that is still being parsed
    ///
    /// **Error Code**: E3001
    ///
    /// The back edge is omitted so every total stays well defined.
    #[error("[E3001] Reference cycle: {} links back to {}", .from.display(), .to.display())]
    ReferenceCycle {
        /// File containing the offending reference
        from: PathBuf,
        /// File that is still being parsed
        to: PathBuf,
    },

    /// Parse error for numeric values
    ///
    /// **Error Code**: E3002
    ///
    /// **Suggestions**:
    /// - Index counts must be integers and animation indices non-negative integers
    #[error("[E3002] Parse error: {0}")]
    ParseError(String),
}

impl From<quick_xml::events::attributes::AttrError> for Error {
    fn from(err: quick_xml::events::attributes::AttrError) -> Self {
        Error::XmlAttr(format!("Attribute parsing failed: {}", err))
    }
}

impl Error {
    /// Wrap a failure while loading the file at `path`
    pub fn load(path: impl Into<PathBuf>, source: Error) -> Self {
        Error::Load {
            path: path.into(),
            source: Box::new(source),
        }
    }

    /// Create a ParseError with context about what was being parsed
    ///
    /// # Arguments
    /// * `field_name` - The name of the field being parsed (e.g., "SubSet MeshI")
    /// * `value` - The value that failed to parse
    /// * `expected_type` - The expected type (e.g., "non-negative integer")
    pub fn parse_error_with_context(field_name: &str, value: &str, expected_type: &str) -> Self {
        Error::ParseError(format!(
            "Failed to parse '{}': expected {}, got '{}'",
            field_name, expected_type, value
        ))
    }
}
