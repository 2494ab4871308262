//! Serializable document descriptions.
//!
//! ```json
//! {
//!   "roots": [
//!     { "name": "root", "children": [
//!       { "name": "p", "children": [
//!         { "text": "ba", "attributes": { "bold": true } },
//!         { "text": "r" }
//!       ] }
//!     ] }
//!   ]
//! }
//! ```

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{Attributes, Document, ModelError, NodeId};

/// A whole document: one element description per root.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DocumentSpec {
    pub roots: Vec<ElementSpec>,
}

/// A child description, either a text run or an element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NodeSpec {
    Text(TextSpec),
    Element(ElementSpec),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ElementSpec {
    pub name: String,
    #[serde(default, skip_serializing_if = "Attributes::is_empty")]
    pub attributes: Attributes,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<NodeSpec>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TextSpec {
    pub text: String,
    #[serde(default, skip_serializing_if = "Attributes::is_empty")]
    pub attributes: Attributes,
}

impl Document {
    /// Builds a document from a description.
    ///
    /// Root attributes are ignored; roots carry no attributes.
    pub fn from_spec(spec: &DocumentSpec) -> Result<Self, ModelError> {
        let mut doc = Document::new();
        for root in &spec.roots {
            let id = doc.create_root(root.name.as_str())?;
            doc.append_children(id, &root.children)?;
        }
        debug!(
            "Built document with {} roots and {} nodes",
            doc.roots().len(),
            doc.len()
        );
        Ok(doc)
    }

    /// Parses a JSON description and builds the document.
    pub fn from_json(json: &str) -> Result<Self, ModelError> {
        let spec: DocumentSpec = serde_json::from_str(json)
            .map_err(|e| ModelError::invalid_description(e.to_string()))?;
        Self::from_spec(&spec)
    }

    fn append_children(&mut self, parent: NodeId, children: &[NodeSpec]) -> Result<(), ModelError> {
        for child in children {
            match child {
                NodeSpec::Text(text) => {
                    self.append_text(parent, text.text.as_str(), text.attributes.clone())?;
                }
                NodeSpec::Element(element) => {
                    let id = self.append_element(
                        parent,
                        element.name.as_str(),
                        element.attributes.clone(),
                    )?;
                    self.append_children(id, &element.children)?;
                }
            }
        }
        Ok(())
    }
}
