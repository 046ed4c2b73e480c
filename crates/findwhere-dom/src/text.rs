//! Text extraction
//!
//! `textContent` concatenates every descendant text node, which drags in
//! hidden help text and screen-reader labels. Queries compare against the
//! first non-blank text node instead.

use crate::{DomTree, NodeId};

impl DomTree {
    /// First non-blank text in `id`'s subtree, trimmed
    ///
    /// Depth-first, pre-order, `id` itself included. Attribute values
    /// (`alt`, `title`) never contribute.
    pub fn first_text(&self, id: NodeId) -> Option<&str> {
        std::iter::once(id)
            .chain(self.descendants(id))
            .filter_map(|node| self.get(node)?.as_text())
            .map(str::trim)
            .find(|text| !text.is_empty())
    }

    /// Concatenation of every text node in `id`'s subtree
    pub fn text_content(&self, id: NodeId) -> String {
        std::iter::once(id)
            .chain(self.descendants(id))
            .filter_map(|node| self.get(node)?.as_text())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use crate::DomTree;

    #[test]
    fn test_first_text_skips_blank_nodes() {
        let mut tree = DomTree::new();
        let div = tree.create_element("div");
        let blank = tree.create_text("  \n ");
        let img = tree.create_element("img");
        let span = tree.create_element("span");
        let text = tree.create_text("  Hello  ");
        tree.append_child(tree.root(), div);
        tree.append_child(div, blank);
        tree.append_child(div, img);
        tree.set_attribute(img, "alt", "picture");
        tree.append_child(div, span);
        tree.append_child(span, text);

        assert_eq!(tree.first_text(div), Some("Hello"));
        assert_eq!(tree.first_text(text), Some("Hello"));
        assert_eq!(tree.first_text(img), None);
        assert_eq!(tree.text_content(div), "  \n   Hello  ");
    }

    #[test]
    fn test_first_text_of_empty_element() {
        let mut tree = DomTree::new();
        let p = tree.create_element("p");
        tree.append_child(tree.root(), p);
        assert_eq!(tree.first_text(p), None);
        assert_eq!(tree.text_content(p), "");
    }
}
