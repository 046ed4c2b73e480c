//! Selector matching against parsed documents
//!
//! Checks querySelector/querySelectorAll semantics: document order,
//! descendant-only results, and combinators that reach outside the scope.

use findwhere_css::{SelectorList, query_selector, query_selector_all};
use findwhere_dom::{Document, NodeId};
use findwhere_html::HtmlParser;

fn parse(html: &str) -> Document {
    HtmlParser::new().parse(html).unwrap()
}

fn select(doc: &Document, scope: NodeId, selector: &str) -> Vec<String> {
    let list = SelectorList::parse(selector).unwrap();
    query_selector_all(doc.tree(), scope, &list)
        .into_iter()
        .map(|id| doc.tree().first_text(id).unwrap_or("").to_string())
        .collect()
}

const LIST: &str = r#"
    <ul id="menu">
        <li class="item">one</li>
        <li class="item active">two</li>
        <li class="item" data-kind="last item">three</li>
    </ul>
    <ol><li>four</li></ol>
"#;

// ============================================================================
// SIMPLE SELECTORS
// ============================================================================

#[test]
fn test_type_and_class() {
    let doc = parse(LIST);
    assert_eq!(select(&doc, doc.root(), "li"), vec!["one", "two", "three", "four"]);
    assert_eq!(select(&doc, doc.root(), ".active"), vec!["two"]);
    assert_eq!(select(&doc, doc.root(), "LI.item"), vec!["one", "two", "three"]);
}

#[test]
fn test_attribute_selectors() {
    let doc = parse(LIST);
    assert_eq!(select(&doc, doc.root(), "[data-kind]"), vec!["three"]);
    assert_eq!(select(&doc, doc.root(), "[data-kind~=last]"), vec!["three"]);
    assert_eq!(select(&doc, doc.root(), r#"[class$="active"]"#), vec!["two"]);
    assert!(select(&doc, doc.root(), "[data-kind=last]").is_empty());
}

#[test]
fn test_escaped_identifiers() {
    let doc = parse(r#"<ul><li id="123">digits</li><li class="w-1/2">half</li></ul>"#);
    assert_eq!(select(&doc, doc.root(), r"#\31 23"), vec!["digits"]);
    assert_eq!(select(&doc, doc.root(), r".w-1\/2"), vec!["half"]);
}

// ============================================================================
// COMBINATORS AND STRUCTURE
// ============================================================================

#[test]
fn test_combinators() {
    let doc = parse(LIST);
    assert_eq!(select(&doc, doc.root(), "#menu > li"), vec!["one", "two", "three"]);
    assert_eq!(select(&doc, doc.root(), "ol li"), vec!["four"]);
    assert_eq!(select(&doc, doc.root(), ".active + li"), vec!["three"]);
    assert_eq!(select(&doc, doc.root(), "li:first-child ~ li"), vec!["two", "three"]);
}

#[test]
fn test_structural_pseudo_classes() {
    let doc = parse(LIST);
    assert_eq!(select(&doc, doc.root(), "li:nth-child(odd)"), vec!["one", "three", "four"]);
    assert_eq!(select(&doc, doc.root(), "li:last-child"), vec!["three", "four"]);
    assert_eq!(select(&doc, doc.root(), "li:only-child"), vec!["four"]);
    assert_eq!(select(&doc, doc.root(), "li:not(.item)"), vec!["four"]);
    assert_eq!(select(&doc, doc.root(), "li:is(.active, :nth-last-child(1))"), vec!["two", "three", "four"]);
}

#[test]
fn test_nth_child_extreme_offsets() {
    let doc = parse(LIST);
    assert_eq!(select(&doc, doc.root(), "li:nth-child(n-2147483648)"), vec!["one", "two", "three", "four"]);
    assert!(select(&doc, doc.root(), "li:nth-child(n+2147483647)").is_empty());
    assert_eq!(select(&doc, doc.root(), "li:nth-child(-n+2147483647)"), vec!["one", "two", "three", "four"]);
}

#[test]
fn test_selector_list_in_document_order() {
    let doc = parse("<h2>b</h2><h1>a</h1>");
    assert_eq!(select(&doc, doc.root(), "h1, h2"), vec!["b", "a"]);
}

// ============================================================================
// SCOPING
// ============================================================================

#[test]
fn test_scope_excludes_itself() {
    let doc = parse(r#"<div id="outer"><div id="inner">x</div></div>"#);
    let outer = doc.get_element_by_id("outer").unwrap();
    let list = SelectorList::parse("div").unwrap();
    let found = query_selector_all(doc.tree(), outer, &list);
    assert_eq!(found, vec![doc.get_element_by_id("inner").unwrap()]);
}

#[test]
fn test_ancestors_outside_scope_count() {
    // Same as element.querySelectorAll("body span")
    let doc = parse(r#"<section id="s"><span>in</span></section>"#);
    let section = doc.get_element_by_id("s").unwrap();
    assert_eq!(select(&doc, section, "body span"), vec!["in"]);
    assert!(select(&doc, section, ":scope > p").is_empty());
    assert_eq!(select(&doc, section, ":scope > span"), vec!["in"]);
}

#[test]
fn test_query_selector_first_match() {
    let doc = parse(LIST);
    let list = SelectorList::parse("li.item").unwrap();
    let first = query_selector(doc.tree(), doc.root(), &list).unwrap();
    assert_eq!(doc.tree().first_text(first), Some("one"));

    let missing = SelectorList::parse("table").unwrap();
    assert_eq!(query_selector(doc.tree(), doc.root(), &missing), None);
}

#[test]
fn test_root_and_form_states() {
    let doc = parse(r#"<input type="checkbox" checked><button disabled>Go</button><button>Stop</button>"#);
    assert_eq!(select(&doc, doc.root(), ":root").len(), 1);
    assert_eq!(select(&doc, doc.root(), "input:checked").len(), 1);
    assert_eq!(select(&doc, doc.root(), "button:disabled"), vec!["Go"]);
    assert_eq!(select(&doc, doc.root(), "button:enabled"), vec!["Stop"]);
    assert_eq!(select(&doc, doc.root(), "input:empty").len(), 1);
}
