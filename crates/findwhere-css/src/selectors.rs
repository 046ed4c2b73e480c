//! Selector model and matching
//!
//! A [`SelectorList`] is matched right-to-left against an element in a
//! [`DomTree`]. `scope` is the node a query was issued from; it only
//! affects `:scope`.

use findwhere_dom::{DomTree, NodeId};

/// Comma-separated list of complex selectors
#[derive(Debug, Clone, PartialEq)]
pub struct SelectorList(pub Vec<ComplexSelector>);

impl SelectorList {
    /// Check whether `element` matches any selector in the list
    pub fn matches(&self, tree: &DomTree, element: NodeId, scope: NodeId) -> bool {
        if !tree.is_element(element) {
            return false;
        }
        let ctx = MatchContext { tree, scope };
        self.0.iter().any(|selector| match selector.compounds.len() {
            0 => false,
            len => selector.matches_at(&ctx, len - 1, element),
        })
    }
}

/// Compound selectors joined by combinators
///
/// `combinators[i]` sits between `compounds[i]` and `compounds[i + 1]`.
#[derive(Debug, Clone, PartialEq)]
pub struct ComplexSelector {
    pub compounds: Vec<CompoundSelector>,
    pub combinators: Vec<Combinator>,
}

/// Relationship between two compound selectors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Combinator {
    /// `a b`
    Descendant,
    /// `a > b`
    Child,
    /// `a + b`
    NextSibling,
    /// `a ~ b`
    SubsequentSibling,
}

/// Sequence of simple selectors with no combinator, e.g. `a.link[href]`
#[derive(Debug, Clone, PartialEq)]
pub struct CompoundSelector(pub Vec<SelectorComponent>);

/// A component of a selector
#[derive(Debug, Clone, PartialEq)]
pub enum SelectorComponent {
    /// Universal selector *
    Universal,
    /// Type selector (tag name, stored lowercase)
    Type(String),
    /// ID selector #id
    Id(String),
    /// Class selector .class
    Class(String),
    /// Attribute selector [attr], [attr=value], etc.
    Attribute(AttributeSelector),
    PseudoClass(PseudoClass),
}

/// Attribute selector
#[derive(Debug, Clone, PartialEq)]
pub struct AttributeSelector {
    pub name: String,
    pub matcher: Option<AttributeMatcher>,
    pub case_insensitive: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AttributeMatcher {
    /// [attr=value] - exact match
    Exact(String),
    /// [attr~=value] - whitespace-separated list contains
    Contains(String),
    /// [attr|=value] - exact or prefix with hyphen
    DashMatch(String),
    /// [attr^=value] - starts with
    Prefix(String),
    /// [attr$=value] - ends with
    Suffix(String),
    /// [attr*=value] - contains substring
    Substring(String),
}

impl AttributeSelector {
    /// Check if an attribute value matches
    pub fn matches(&self, value: Option<&str>) -> bool {
        let (matcher, value) = match (&self.matcher, value) {
            (_, None) => return false,
            (None, Some(_)) => return true,
            (Some(matcher), Some(value)) => (matcher, value),
        };

        let fold = |s: &str| {
            if self.case_insensitive {
                s.to_lowercase()
            } else {
                s.to_string()
            }
        };
        let val = fold(value);

        match matcher {
            AttributeMatcher::Exact(expected) => val == fold(expected),
            AttributeMatcher::Contains(expected) => {
                let expected = fold(expected);
                !expected.is_empty() && val.split_whitespace().any(|w| w == expected)
            }
            AttributeMatcher::DashMatch(expected) => {
                let expected = fold(expected);
                val == expected || val.starts_with(&format!("{}-", expected))
            }
            // Empty prefix/suffix/substring values match nothing
            AttributeMatcher::Prefix(expected) => {
                !expected.is_empty() && val.starts_with(&fold(expected))
            }
            AttributeMatcher::Suffix(expected) => {
                !expected.is_empty() && val.ends_with(&fold(expected))
            }
            AttributeMatcher::Substring(expected) => {
                !expected.is_empty() && val.contains(&fold(expected))
            }
        }
    }
}

/// Pseudo-class type
#[derive(Debug, Clone, PartialEq)]
pub enum PseudoClass {
    // Tree-structural pseudo-classes
    Root,
    Scope,
    Empty,
    OnlyChild,
    OnlyOfType,
    NthChild(NthExpression),
    NthLastChild(NthExpression),
    NthOfType(NthExpression),
    NthLastOfType(NthExpression),

    // Input pseudo-classes, derived from attributes
    Checked,
    Disabled,
    Enabled,

    // Logical pseudo-classes
    Not(SelectorList),
    Is(SelectorList),
    Where(SelectorList),
}

/// An+B expression for :nth-* selectors
#[derive(Debug, Clone, PartialEq)]
pub struct NthExpression {
    /// Coefficient (A in An+B)
    pub a: i32,
    /// Offset (B in An+B)
    pub b: i32,
}

impl NthExpression {
    pub fn new(a: i32, b: i32) -> Self {
        Self { a, b }
    }

    /// Check if index n (1-based) matches this expression
    pub fn matches(&self, n: i32) -> bool {
        // Widened so that extreme offsets cannot overflow
        let (a, b, n) = (i64::from(self.a), i64::from(self.b), i64::from(n));
        if a == 0 {
            return n == b;
        }

        let diff = n - b;
        diff % a == 0 && (diff == 0 || (diff > 0) == (a > 0))
    }
}

struct MatchContext<'a> {
    tree: &'a DomTree,
    scope: NodeId,
}

impl ComplexSelector {
    /// Match `compounds[..=index]` with `element` as the subject of `compounds[index]`
    fn matches_at(&self, ctx: &MatchContext<'_>, index: usize, element: NodeId) -> bool {
        if !self.compounds[index].matches(ctx, element) {
            return false;
        }
        if index == 0 {
            return true;
        }

        let tree = ctx.tree;
        let next = index - 1;
        match self.combinators[next] {
            Combinator::Child => tree
                .parent_element(element)
                .is_some_and(|parent| self.matches_at(ctx, next, parent)),
            Combinator::Descendant => {
                let mut current = tree.parent_element(element);
                while let Some(ancestor) = current {
                    if self.matches_at(ctx, next, ancestor) {
                        return true;
                    }
                    current = tree.parent_element(ancestor);
                }
                false
            }
            Combinator::NextSibling => tree
                .prev_element_sibling(element)
                .is_some_and(|sibling| self.matches_at(ctx, next, sibling)),
            Combinator::SubsequentSibling => {
                let mut current = tree.prev_element_sibling(element);
                while let Some(sibling) = current {
                    if self.matches_at(ctx, next, sibling) {
                        return true;
                    }
                    current = tree.prev_element_sibling(sibling);
                }
                false
            }
        }
    }
}

impl CompoundSelector {
    fn matches(&self, ctx: &MatchContext<'_>, element: NodeId) -> bool {
        self.0.iter().all(|component| component.matches(ctx, element))
    }
}

impl SelectorComponent {
    fn matches(&self, ctx: &MatchContext<'_>, element: NodeId) -> bool {
        let tree = ctx.tree;
        let Some(data) = tree.element(element) else {
            return false;
        };

        match self {
            SelectorComponent::Universal => true,
            SelectorComponent::Type(tag) => tree
                .tag_name(element)
                .is_some_and(|name| name.eq_ignore_ascii_case(tag)),
            SelectorComponent::Id(id) => data.id.as_deref() == Some(id.as_str()),
            SelectorComponent::Class(class) => data.has_class(class),
            SelectorComponent::Attribute(attr) => attr.matches(tree.attribute(element, &attr.name)),
            SelectorComponent::PseudoClass(pseudo) => pseudo.matches(ctx, element),
        }
    }
}

const FORM_CONTROLS: &[&str] = &["button", "input", "select", "textarea", "option", "optgroup", "fieldset"];

impl PseudoClass {
    fn matches(&self, ctx: &MatchContext<'_>, element: NodeId) -> bool {
        let tree = ctx.tree;
        match self {
            PseudoClass::Root => is_root(tree, element),
            PseudoClass::Scope => {
                if tree.get(ctx.scope).is_some_and(|n| n.is_document()) {
                    is_root(tree, element)
                } else {
                    element == ctx.scope
                }
            }
            PseudoClass::Empty => tree
                .children(element)
                .all(|(_, child)| !child.is_element() && !child.is_text()),

            PseudoClass::OnlyChild => {
                tree.prev_element_sibling(element).is_none()
                    && tree.next_element_sibling(element).is_none()
            }
            PseudoClass::OnlyOfType => {
                position(tree, element, Direction::Before, true) == 1
                    && position(tree, element, Direction::After, true) == 1
            }
            PseudoClass::NthChild(expr) => expr.matches(position(tree, element, Direction::Before, false)),
            PseudoClass::NthLastChild(expr) => expr.matches(position(tree, element, Direction::After, false)),
            PseudoClass::NthOfType(expr) => expr.matches(position(tree, element, Direction::Before, true)),
            PseudoClass::NthLastOfType(expr) => expr.matches(position(tree, element, Direction::After, true)),

            PseudoClass::Checked => match tree.tag_name(element) {
                Some("option") => tree.has_attribute(element, "selected"),
                Some("input") => tree.has_attribute(element, "checked"),
                _ => false,
            },
            PseudoClass::Disabled => is_form_control(tree, element) && tree.has_attribute(element, "disabled"),
            PseudoClass::Enabled => is_form_control(tree, element) && !tree.has_attribute(element, "disabled"),

            PseudoClass::Not(list) => !list.matches(tree, element, ctx.scope),
            PseudoClass::Is(list) | PseudoClass::Where(list) => list.matches(tree, element, ctx.scope),
        }
    }
}

fn is_root(tree: &DomTree, element: NodeId) -> bool {
    tree.parent(element)
        .and_then(|parent| tree.get(parent))
        .is_some_and(|parent| parent.is_document())
}

fn is_form_control(tree: &DomTree, element: NodeId) -> bool {
    tree.tag_name(element).is_some_and(|tag| FORM_CONTROLS.contains(&tag))
}

#[derive(Clone, Copy)]
enum Direction {
    Before,
    After,
}

/// 1-based index among element siblings, counted from the start or end
fn position(tree: &DomTree, element: NodeId, direction: Direction, same_type: bool) -> i32 {
    let tag = tree.tag_name(element);
    let step = |id| match direction {
        Direction::Before => tree.prev_element_sibling(id),
        Direction::After => tree.next_element_sibling(id),
    };

    let mut index = 1;
    let mut current = step(element);
    while let Some(sibling) = current {
        if !same_type || tree.tag_name(sibling) == tag {
            index += 1;
        }
        current = step(sibling);
    }
    index
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nth_expression_odd() {
        let expr = NthExpression::new(2, 1);
        assert!(expr.matches(1));
        assert!(!expr.matches(2));
        assert!(expr.matches(3));
        assert!(!expr.matches(4));
    }

    #[test]
    fn test_nth_expression_even() {
        let expr = NthExpression::new(2, 0);
        assert!(!expr.matches(1));
        assert!(expr.matches(2));
        assert!(expr.matches(4));
    }

    #[test]
    fn test_nth_expression_index() {
        let third = NthExpression::new(0, 3);
        assert!(third.matches(3));
        assert!(!third.matches(6));
    }

    #[test]
    fn test_nth_negative_coefficient() {
        let first_three = NthExpression::new(-1, 3);
        assert!(first_three.matches(1));
        assert!(first_three.matches(3));
        assert!(!first_three.matches(4));
    }

    #[test]
    fn test_nth_extreme_offsets() {
        assert!(NthExpression::new(1, i32::MIN).matches(1));
        assert!(NthExpression::new(1, i32::MIN).matches(i32::MAX));
        assert!(!NthExpression::new(1, i32::MAX).matches(1));
        assert!(NthExpression::new(-1, i32::MAX).matches(1));
        assert!(!NthExpression::new(-1, i32::MIN).matches(1));
        assert!(NthExpression::new(i32::MIN, 1).matches(1));
        assert!(!NthExpression::new(i32::MIN, 1).matches(2));
    }

    #[test]
    fn test_attribute_selector_exact() {
        let sel = AttributeSelector {
            name: "type".to_string(),
            matcher: Some(AttributeMatcher::Exact("text".to_string())),
            case_insensitive: false,
        };

        assert!(sel.matches(Some("text")));
        assert!(!sel.matches(Some("TEXT")));
        assert!(!sel.matches(None));
    }

    #[test]
    fn test_attribute_selector_case_insensitive() {
        let sel = AttributeSelector {
            name: "type".to_string(),
            matcher: Some(AttributeMatcher::Prefix("TE".to_string())),
            case_insensitive: true,
        };
        assert!(sel.matches(Some("text")));
    }

    #[test]
    fn test_attribute_selector_empty_substring() {
        let sel = AttributeSelector {
            name: "class".to_string(),
            matcher: Some(AttributeMatcher::Substring(String::new())),
            case_insensitive: false,
        };
        assert!(!sel.matches(Some("anything")));
    }

    #[test]
    fn test_attribute_selector_dash_match() {
        let sel = AttributeSelector {
            name: "lang".to_string(),
            matcher: Some(AttributeMatcher::DashMatch("en".to_string())),
            case_insensitive: false,
        };
        assert!(sel.matches(Some("en")));
        assert!(sel.matches(Some("en-US")));
        assert!(!sel.matches(Some("english")));
    }
}
