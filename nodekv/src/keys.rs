//! Node-scoped key construction.
//!
//! A node is a logical collection of records sharing one key prefix. Every
//! record key in node `N` has the form `N || "_" || id`, so a prefix scan
//! over `N_` visits exactly the records of that node.
//!
//! # Invariants
//!
//! - Node names are non-empty, at most `MAX_NODE_NAME_LENGTH` bytes, and never
//!   contain the separator. Without the last rule node `A` would also see the
//!   records of a node named `A_x`.
//! - Identifiers are unrestricted bytes; they may contain the separator.

/// Byte placed between a node name and a record identifier.
pub const NODE_SEPARATOR: u8 = b'_';

/// Maximum length for a node name, in bytes.
pub const MAX_NODE_NAME_LENGTH: usize = 256;

/// Build the composite key for record `id` inside `node`.
#[must_use]
pub fn node_key(node: &NodeName, id: impl AsRef<[u8]>) -> Vec<u8> {
    let id = id.as_ref();
    let mut key = Vec::with_capacity(node.len() + 1 + id.len());
    key.extend_from_slice(node.as_bytes());
    key.push(NODE_SEPARATOR);
    key.extend_from_slice(id);
    key
}

/// The key prefix shared by every record in `node`.
#[must_use]
pub fn node_prefix(node: &NodeName) -> Vec<u8> {
    node_key(node, [])
}

/// A validated node name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NodeName(String);

impl NodeName {
    /// Validate and wrap a node name.
    pub fn new(name: impl Into<String>) -> Result<Self, NodeNameError> {
        let name = name.into();
        validate_node_name(&name)?;
        Ok(Self(name))
    }

    /// The name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The name as bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }

    /// Length of the name in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false: validated names are never empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::fmt::Display for NodeName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<&str> for NodeName {
    type Error = NodeNameError;

    fn try_from(name: &str) -> Result<Self, Self::Error> {
        Self::new(name)
    }
}

/// Check that `name` can be used as a node name.
///
/// # Errors
///
/// Returns an error if the name is empty, longer than
/// `MAX_NODE_NAME_LENGTH` bytes, or contains `NODE_SEPARATOR`.
pub fn validate_node_name(name: &str) -> Result<(), NodeNameError> {
    if name.is_empty() {
        return Err(NodeNameError::Empty);
    }

    if name.len() > MAX_NODE_NAME_LENGTH {
        return Err(NodeNameError::TooLong(name.len()));
    }

    if name.as_bytes().contains(&NODE_SEPARATOR) {
        return Err(NodeNameError::ContainsSeparator(name.to_string()));
    }

    Ok(())
}

/// Reasons a node name is rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeNameError {
    /// The name is empty.
    Empty,
    /// The name exceeds `MAX_NODE_NAME_LENGTH` bytes.
    TooLong(usize),
    /// The name contains the node separator.
    ContainsSeparator(String),
}

impl std::fmt::Display for NodeNameError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty => write!(f, "node name must not be empty"),
            Self::TooLong(len) => write!(
                f,
                "node name is {len} bytes (maximum {MAX_NODE_NAME_LENGTH})"
            ),
            Self::ContainsSeparator(name) => write!(
                f,
                "node name '{name}' contains the separator '{}'",
                char::from(NODE_SEPARATOR)
            ),
        }
    }
}

impl std::error::Error for NodeNameError {}
