//! Document - High-level document API

use crate::{DomTree, NodeId};

/// HTML Document
#[derive(Debug)]
pub struct Document {
    /// The DOM tree
    pub tree: DomTree,
    /// Cached reference to <html> element
    html_element: NodeId,
    /// Cached reference to <head> element
    head_element: NodeId,
    /// Cached reference to <body> element
    body_element: NodeId,
}

impl Document {
    /// Create an empty document; structure is added through [`Document::tree_mut`]
    pub fn new() -> Self {
        Self {
            tree: DomTree::new(),
            html_element: NodeId::NONE,
            head_element: NodeId::NONE,
            body_element: NodeId::NONE,
        }
    }

    /// Locate html/head/body after the tree was built externally
    pub fn finalize(&mut self) {
        let root = self.tree.root();
        self.html_element = self
            .tree
            .element_children(root)
            .find(|&id| self.tree.tag_name(id) == Some("html"))
            .unwrap_or(NodeId::NONE);

        if !self.html_element.is_valid() {
            return;
        }
        for child in self.tree.element_children(self.html_element) {
            match self.tree.tag_name(child) {
                Some("head") if !self.head_element.is_valid() => self.head_element = child,
                Some("body") if !self.body_element.is_valid() => self.body_element = child,
                _ => {}
            }
        }
    }

    /// Get document title
    pub fn title(&self) -> String {
        if !self.head_element.is_valid() {
            return String::new();
        }

        self.tree
            .element_children(self.head_element)
            .find(|&id| self.tree.tag_name(id) == Some("title"))
            .map(|title| self.tree.text_content(title).trim().to_string())
            .unwrap_or_default()
    }

    /// The document node, scope of a query with no root
    pub fn root(&self) -> NodeId {
        self.tree.root()
    }

    /// Get <html> element
    pub fn document_element(&self) -> NodeId {
        self.html_element
    }

    pub fn body(&self) -> NodeId {
        self.body_element
    }

    /// Get element by ID
    pub fn get_element_by_id(&self, id: &str) -> Option<NodeId> {
        self.tree
            .descendants(self.tree.root())
            .find(|&node| self.tree.element(node).and_then(|e| e.id.as_deref()) == Some(id))
    }

    pub fn tree(&self) -> &DomTree {
        &self.tree
    }

    pub fn tree_mut(&mut self) -> &mut DomTree {
        &mut self.tree
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build(doc: &mut Document) -> (NodeId, NodeId) {
        let tree = doc.tree_mut();
        let html = tree.create_element("html");
        let head = tree.create_element("head");
        let body = tree.create_element("body");
        tree.append_child(tree.root(), html);
        tree.append_child(html, head);
        tree.append_child(html, body);
        (head, body)
    }

    #[test]
    fn test_title_and_lookup_by_id() {
        let mut doc = Document::default();
        let (head, body) = build(&mut doc);
        let tree = doc.tree_mut();
        let title = tree.create_element("title");
        let text = tree.create_text(" Test Page ");
        tree.append_child(head, title);
        tree.append_child(title, text);
        let div = tree.create_element("div");
        tree.set_attribute(div, "id", "main");
        tree.append_child(body, div);
        doc.finalize();

        assert_eq!(doc.title(), "Test Page");
        assert_eq!(doc.get_element_by_id("main"), Some(div));
        assert_eq!(doc.get_element_by_id("missing"), None);
    }

    #[test]
    fn test_finalize_finds_skeleton() {
        let mut doc = Document::new();
        let tree = doc.tree_mut();
        let html = tree.create_element("html");
        let body = tree.create_element("body");
        tree.append_child(tree.root(), html);
        tree.append_child(html, body);
        doc.finalize();

        assert_eq!(doc.document_element(), html);
        assert_eq!(doc.body(), body);
        assert_eq!(doc.title(), "");
    }

    #[test]
    fn test_empty_document() {
        let doc = Document::new();
        assert!(!doc.document_element().is_valid());
        assert!(!doc.body().is_valid());
        assert_eq!(doc.tree().first_text(doc.root()), None);
    }
}
