//! Kern datastructuren voor het opgebouwde scenedocument.

use std::collections::HashMap;
use std::fmt;

pub mod node;

pub use node::{AttrValue, NodeKind, SceneNode, XformOp};

/// Hiërarchisch pad van een node, als `/`-gescheiden string
/// (bv. `/mpcdi_payload/B1/_0`).
#[derive(Debug, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct NodePath(String);

impl NodePath {
    /// Maakt een pad direct onder de documentwortel aan.
    #[must_use]
    pub fn root(name: &str) -> Self {
        Self(format!("/{name}"))
    }

    /// Maakt het pad van een kindnode aan.
    #[must_use]
    pub fn append(&self, child: &str) -> Self {
        Self(format!("{}/{child}", self.0))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Laatste padsegment.
    #[must_use]
    pub fn leaf(&self) -> &str {
        self.0.rsplit('/').next().unwrap_or(&self.0)
    }
}

impl fmt::Display for NodePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Documentcontainer met een index voor snelle pad-lookups.
///
/// Nodes worden eenmalig aangemaakt tijdens één top-down opbouwpas en
/// daarna niet meer gewijzigd; de levensduur is die van het document zelf.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SceneDocument {
    nodes: Vec<SceneNode>,
    path_index: HashMap<String, usize>,
    default_node: Option<NodePath>,
}

impl SceneDocument {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Maakt een nieuwe node aan op `path`. Een pad kan maar één keer
    /// gedefinieerd worden; een tweede definitie is een fout.
    pub fn define_node(
        &mut self,
        path: NodePath,
        kind: NodeKind,
    ) -> Result<&mut SceneNode, SceneError> {
        if self.path_index.contains_key(path.as_str()) {
            return Err(SceneError::DuplicateNode(path));
        }

        let index = self.nodes.len();
        self.path_index.insert(path.as_str().to_owned(), index);
        self.nodes.push(SceneNode::new(path, kind));
        Ok(&mut self.nodes[index])
    }

    /// Zoekt een node op zijn volledige pad.
    #[must_use]
    pub fn node(&self, path: &str) -> Option<&SceneNode> {
        self.path_index.get(path).map(|index| &self.nodes[*index])
    }

    /// Alle nodes, in definitievolgorde.
    #[must_use]
    pub fn nodes(&self) -> &[SceneNode] {
        &self.nodes
    }

    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Wijst de default node van het document aan.
    pub fn set_default_node(&mut self, path: NodePath) {
        self.default_node = Some(path);
    }

    #[must_use]
    pub fn default_node(&self) -> Option<&NodePath> {
        self.default_node.as_ref()
    }

    /// Vervangt de volledige inhoud van dit document door die van
    /// `source`, als één atomaire overdracht.
    pub fn transfer_content(&mut self, source: SceneDocument) {
        *self = source;
    }
}

/// Fouten die kunnen optreden bij het opbouwen van het document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SceneError {
    DuplicateNode(NodePath),
}

impl fmt::Display for SceneError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateNode(path) => {
                write!(f, "node `{path}` bestaat al in het document")
            }
        }
    }
}

impl std::error::Error for SceneError {}
