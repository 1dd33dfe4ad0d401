//! Menu catalog: the static description of the traversal target.
//!
//! A catalog is an ordered set of top-level menu entries, each with an
//! ordered (possibly empty) set of child entries one level deep. Names are
//! opaque strings matched verbatim against the live UI's accessible
//! identifiers; no case or whitespace normalization is performed.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

/// One named, interactable menu entry, top-level or nested one level deep.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MenuNode {
    /// Accessible identifier of the entry, unique within its sibling set
    pub name: String,

    /// Nested entries beneath this one (empty for leaves)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<MenuNode>,
}

impl MenuNode {
    /// Create a leaf entry with no children
    pub fn leaf(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            children: Vec::new(),
        }
    }

    /// Create an entry with nested children
    pub fn with_children(
        name: impl Into<String>,
        children: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            name: name.into(),
            children: children.into_iter().map(MenuNode::leaf).collect(),
        }
    }
}

/// Ordered set of top-level menu entries, validated at construction.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "Vec<MenuNode>", into = "Vec<MenuNode>")]
pub struct Catalog {
    nodes: Vec<MenuNode>,
}

impl Catalog {
    /// Build a catalog from top-level nodes, enforcing the structural
    /// invariants: non-empty, sibling-unique names, and at most two levels.
    pub fn new(nodes: Vec<MenuNode>) -> CatalogResult<Self> {
        if nodes.is_empty() {
            return Err(CatalogError::Empty);
        }

        check_sibling_names(&nodes, None)?;
        for node in &nodes {
            check_sibling_names(&node.children, Some(&node.name))?;
            for child in &node.children {
                if !child.children.is_empty() {
                    return Err(CatalogError::TooDeep {
                        node: child.name.clone(),
                        parent: node.name.clone(),
                    });
                }
            }
        }

        Ok(Self { nodes })
    }

    /// Parse and validate a catalog from a JSON array of nodes
    pub fn from_json_str(json: &str) -> CatalogResult<Self> {
        let nodes: Vec<MenuNode> = serde_json::from_str(json)?;
        Self::new(nodes)
    }

    /// Load and validate a catalog from a JSON file
    pub fn from_json_file(path: impl AsRef<Path>) -> CatalogResult<Self> {
        let data = std::fs::read_to_string(path)?;
        Self::from_json_str(&data)
    }

    /// Top-level nodes in catalog order
    pub fn nodes(&self) -> &[MenuNode] {
        &self.nodes
    }

    /// Number of top-level entries
    pub fn top_level_count(&self) -> usize {
        self.nodes.len()
    }

    /// Total number of entries, top-level and nested
    pub fn node_count(&self) -> usize {
        self.nodes.len() + self.nodes.iter().map(|n| n.children.len()).sum::<usize>()
    }

    /// Built-in sample catalog: the menu tree of the Android API demo app,
    /// useful for demos and for exercising reporting without a device.
    pub fn sample() -> Self {
        let nodes = vec![
            MenuNode::with_children(
                "Accessibility",
                [
                    "Accessibility Node Provider",
                    "Accessibility Node Querying",
                    "Accessibility Service",
                    "Custom View",
                ],
            ),
            MenuNode::with_children(
                "Animation",
                [
                    "Bouncing Balls",
                    "Cloning",
                    "Custom Evaluator",
                    "Default Layout Animations",
                    "Events",
                    "Hide-Show Animations",
                    "Layout Animations",
                    "Loading",
                    "Multiple Properties",
                    "Reversing",
                    "Seeking",
                    "View Flip",
                ],
            ),
            MenuNode::with_children(
                "App",
                [
                    "Action Bar",
                    "Activity",
                    "Alarm",
                    "Alert Dialogs",
                    "Device Admin",
                    "Fragment",
                    "Launcher Shortcuts",
                    "Loader",
                    "Menu",
                    "Notification",
                    "Search",
                    "Service",
                    "Text-To-Speech",
                    "Voice Recognition",
                ],
            ),
            MenuNode::with_children(
                "Content",
                ["Assets", "Clipboard", "Packages", "Provider", "Resources", "Storage"],
            ),
            MenuNode::with_children(
                "Graphics",
                [
                    "AlphaBitmap",
                    "AnimateDrawables",
                    "Arcs",
                    "BitmapDecode",
                    "BitmapMesh",
                    "BitmapPixels",
                    "CameraPreview",
                    "Clipping",
                    "ColorFilters",
                    "ColorMatrix",
                    "Compass",
                    "CreateBitmap",
                    "Density",
                    "Drawable",
                    "FingerPaint",
                ],
            ),
            MenuNode::with_children("Media", ["AudioFx", "MediaPlayer", "VideoView"]),
            MenuNode::with_children(
                "NFC",
                ["ForegroundDispatch", "ForegroundNdefPush", "TechFilter"],
            ),
            MenuNode::with_children(
                "OS",
                ["Morse Code", "Rotation Vector", "Sensors", "SMS Messaging"],
            ),
            MenuNode::with_children(
                "Preference",
                [
                    "Preferences from XML",
                    "Launching preferences",
                    "Preference dependencies",
                    "Default values",
                    "Preferences from code",
                    "Advanced preferences",
                    "Fragment",
                    "Header",
                    "Switch",
                ],
            ),
            MenuNode::with_children(
                "Text",
                ["KeyEventText", "Linkify", "LogTextBox", "Marquee", "Unicode"],
            ),
            MenuNode::with_children(
                "Views",
                [
                    "Animation",
                    "Auto Complete",
                    "Buttons",
                    "Chronometer",
                    "Controls",
                    "Custom",
                    "Date Widgets",
                    "Drag and Drop",
                    "Expandable Lists",
                    "Focus",
                    "Gallery",
                    "Grid",
                    "Hover Events",
                    "ImageButton",
                ],
            ),
        ];

        Self::new(nodes).expect("sample catalog is statically valid")
    }
}

fn check_sibling_names(nodes: &[MenuNode], parent: Option<&str>) -> CatalogResult<()> {
    let mut seen = HashSet::new();
    for node in nodes {
        if !seen.insert(node.name.as_str()) {
            return Err(CatalogError::DuplicateName {
                name: node.name.clone(),
                parent: parent.map(str::to_string),
            });
        }
    }
    Ok(())
}

impl TryFrom<Vec<MenuNode>> for Catalog {
    type Error = CatalogError;

    fn try_from(nodes: Vec<MenuNode>) -> CatalogResult<Self> {
        Self::new(nodes)
    }
}

impl From<Catalog> for Vec<MenuNode> {
    fn from(catalog: Catalog) -> Self {
        catalog.nodes
    }
}

/// Result type for catalog operations
pub type CatalogResult<T> = Result<T, CatalogError>;

/// Error types for catalog construction and loading
#[derive(Debug)]
pub enum CatalogError {
    /// Catalog has no top-level entries
    Empty,

    /// Two siblings share a name (duplicates across parents are allowed)
    DuplicateName {
        name: String,
        parent: Option<String>,
    },

    /// A nested entry has children of its own
    TooDeep { node: String, parent: String },

    /// Catalog JSON could not be parsed
    Parse(serde_json::Error),

    /// I/O error reading a catalog file
    Io(std::io::Error),
}

impl std::fmt::Display for CatalogError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CatalogError::Empty => write!(f, "catalog has no top-level entries"),
            CatalogError::DuplicateName { name, parent } => match parent {
                Some(p) => write!(f, "duplicate entry '{}' under '{}'", name, p),
                None => write!(f, "duplicate top-level entry '{}'", name),
            },
            CatalogError::TooDeep { node, parent } => write!(
                f,
                "entry '{}' under '{}' has children; catalogs are limited to two levels",
                node, parent
            ),
            CatalogError::Parse(err) => write!(f, "catalog parse error: {}", err),
            CatalogError::Io(err) => write!(f, "I/O error: {}", err),
        }
    }
}

impl std::error::Error for CatalogError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CatalogError::Parse(err) => Some(err),
            CatalogError::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for CatalogError {
    fn from(err: serde_json::Error) -> Self {
        CatalogError::Parse(err)
    }
}

impl From<std::io::Error> for CatalogError {
    fn from(err: std::io::Error) -> Self {
        CatalogError::Io(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_rejects_empty() {
        assert!(matches!(Catalog::new(vec![]), Err(CatalogError::Empty)));
    }

    #[test]
    fn test_catalog_single_node_is_valid() {
        let catalog = Catalog::new(vec![MenuNode::leaf("Settings")]).unwrap();
        assert_eq!(catalog.top_level_count(), 1);
        assert_eq!(catalog.node_count(), 1);
    }

    #[test]
    fn test_catalog_rejects_duplicate_siblings() {
        let err = Catalog::new(vec![MenuNode::leaf("App"), MenuNode::leaf("App")]).unwrap_err();
        assert!(matches!(err, CatalogError::DuplicateName { parent: None, .. }));
    }

    #[test]
    fn test_catalog_allows_duplicates_across_parents() {
        // "Fragment" appears under both parents; only siblings must be unique.
        let catalog = Catalog::new(vec![
            MenuNode::with_children("App", ["Fragment"]),
            MenuNode::with_children("Preference", ["Fragment"]),
        ]);
        assert!(catalog.is_ok());
    }

    #[test]
    fn test_catalog_rejects_duplicate_children() {
        let err = Catalog::new(vec![MenuNode::with_children("App", ["Menu", "Menu"])]).unwrap_err();
        match err {
            CatalogError::DuplicateName { name, parent } => {
                assert_eq!(name, "Menu");
                assert_eq!(parent.as_deref(), Some("App"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_catalog_rejects_third_level() {
        let grandchild = MenuNode::leaf("Deep");
        let child = MenuNode {
            name: "Child".to_string(),
            children: vec![grandchild],
        };
        let top = MenuNode {
            name: "Top".to_string(),
            children: vec![child],
        };
        assert!(matches!(Catalog::new(vec![top]), Err(CatalogError::TooDeep { .. })));
    }

    #[test]
    fn test_catalog_from_json() {
        let json = r#"[
            {"name": "A", "children": [{"name": "A1"}, {"name": "A2"}]},
            {"name": "B"}
        ]"#;
        let catalog = Catalog::from_json_str(json).unwrap();
        assert_eq!(catalog.top_level_count(), 2);
        assert_eq!(catalog.node_count(), 4);
        assert_eq!(catalog.nodes()[0].children[1].name, "A2");
    }

    #[test]
    fn test_catalog_json_roundtrip() {
        let catalog = Catalog::new(vec![
            MenuNode::with_children("A", ["A1"]),
            MenuNode::leaf("B"),
        ])
        .unwrap();
        let json = serde_json::to_string(&catalog).unwrap();
        let parsed = Catalog::from_json_str(&json).unwrap();
        assert_eq!(parsed.node_count(), 3);
    }

    #[test]
    fn test_catalog_from_json_validates() {
        let json = r#"[{"name": "A"}, {"name": "A"}]"#;
        assert!(Catalog::from_json_str(json).is_err());
    }

    #[test]
    fn test_names_are_not_normalized() {
        // Trailing whitespace and case are preserved verbatim.
        let catalog = Catalog::new(vec![MenuNode::leaf("App "), MenuNode::leaf("app")]).unwrap();
        assert_eq!(catalog.nodes()[0].name, "App ");
        assert_eq!(catalog.nodes()[1].name, "app");
    }

    #[test]
    fn test_sample_catalog() {
        let catalog = Catalog::sample();
        assert_eq!(catalog.top_level_count(), 11);
        assert!(catalog.node_count() > catalog.top_level_count());
    }
}
