//! Selector parsing using lightningcss
//!
//! Selector text is parsed by lightningcss and lowered into the matcher's
//! own model. Namespaces, pseudo-elements, `:has()` and pseudo-classes
//! that depend on user interaction are rejected.

use lightningcss::selector::{Component, PseudoClass as CssPseudoClass, Selector};
use lightningcss::stylesheet::ParserOptions;
use lightningcss::traits::ParseWithOptions;
use parcel_selectors::attr::{AttrSelectorOperator, ParsedAttrSelectorOperation, ParsedCaseSensitivity};
use parcel_selectors::parser::{Combinator as CssCombinator, NthType};

use crate::SelectorError;
use crate::selectors::{
    AttributeMatcher, AttributeSelector, Combinator, ComplexSelector, CompoundSelector,
    NthExpression, PseudoClass, SelectorComponent, SelectorList,
};

impl SelectorList {
    /// Parse a comma-separated selector list
    pub fn parse(selector: &str) -> Result<Self, SelectorError> {
        if selector.trim().is_empty() {
            return Err(SelectorError::Empty);
        }

        let parsed = lightningcss::selector::SelectorList::parse_string_with_options(
            selector,
            ParserOptions::default(),
        )
        .map_err(|error| SelectorError::Syntax {
            line: error.location.line,
            column: error.location.column,
            message: format!("{:?}", error.kind),
        })?;

        convert_list(parsed.0.iter())
    }
}

fn convert_list<'a, 'i: 'a>(
    selectors: impl IntoIterator<Item = &'a Selector<'i>>,
) -> Result<SelectorList, SelectorError> {
    selectors
        .into_iter()
        .map(convert_complex)
        .collect::<Result<Vec<_>, _>>()
        .map(SelectorList)
}

fn convert_complex(selector: &Selector<'_>) -> Result<ComplexSelector, SelectorError> {
    let mut compounds = Vec::new();
    let mut combinators = Vec::new();

    // Compounds come out right-to-left
    let mut iter = selector.iter();
    loop {
        let compound = iter
            .by_ref()
            .filter_map(|component| convert_component(component).transpose())
            .collect::<Result<Vec<_>, _>>()?;
        compounds.push(CompoundSelector(compound));

        match iter.next_sequence() {
            Some(combinator) => combinators.push(convert_combinator(combinator)?),
            None => break,
        }
    }

    compounds.reverse();
    combinators.reverse();
    Ok(ComplexSelector { compounds, combinators })
}

fn convert_combinator(combinator: CssCombinator) -> Result<Combinator, SelectorError> {
    match combinator {
        CssCombinator::Descendant => Ok(Combinator::Descendant),
        CssCombinator::Child => Ok(Combinator::Child),
        CssCombinator::NextSibling => Ok(Combinator::NextSibling),
        CssCombinator::LaterSibling => Ok(Combinator::SubsequentSibling),
        CssCombinator::PseudoElement => Err(SelectorError::Unsupported("pseudo-element")),
        _ => Err(SelectorError::Unsupported("shadow tree combinator")),
    }
}

/// Lower one simple selector; `None` for components with no effect on an
/// HTML tree without namespaces
fn convert_component(component: &Component<'_>) -> Result<Option<SelectorComponent>, SelectorError> {
    let converted = match component {
        Component::ExplicitAnyNamespace | Component::ExplicitNoNamespace | Component::DefaultNamespace(_) => {
            return Ok(None);
        }
        Component::Namespace(..) => return Err(SelectorError::Unsupported("namespace prefix")),

        Component::ExplicitUniversalType => SelectorComponent::Universal,
        Component::LocalName(name) => SelectorComponent::Type(name.lower_name.0.to_string()),
        Component::ID(id) => SelectorComponent::Id(id.0.to_string()),
        Component::Class(class) => SelectorComponent::Class(class.0.to_string()),

        Component::AttributeInNoNamespaceExists { local_name_lower, .. } => {
            SelectorComponent::Attribute(AttributeSelector {
                name: local_name_lower.0.to_string(),
                matcher: None,
                case_insensitive: false,
            })
        }
        Component::AttributeInNoNamespace {
            local_name,
            operator,
            value,
            case_sensitivity,
            ..
        } => SelectorComponent::Attribute(AttributeSelector {
            name: local_name.0.to_ascii_lowercase(),
            matcher: Some(attribute_matcher(operator, value.0.to_string())),
            case_insensitive: is_case_insensitive(case_sensitivity),
        }),
        Component::AttributeOther(attr) => {
            let (matcher, case_insensitive) = match &attr.operation {
                ParsedAttrSelectorOperation::Exists => (None, false),
                ParsedAttrSelectorOperation::WithValue {
                    operator,
                    case_sensitivity,
                    expected_value,
                } => (
                    Some(attribute_matcher(operator, expected_value.0.to_string())),
                    is_case_insensitive(case_sensitivity),
                ),
            };
            SelectorComponent::Attribute(AttributeSelector {
                name: attr.local_name_lower.0.to_string(),
                matcher,
                case_insensitive,
            })
        }

        Component::Root => SelectorComponent::PseudoClass(PseudoClass::Root),
        Component::Empty => SelectorComponent::PseudoClass(PseudoClass::Empty),
        Component::Scope => SelectorComponent::PseudoClass(PseudoClass::Scope),
        Component::Nth(data) => {
            let expr = NthExpression::new(data.a, data.b);
            SelectorComponent::PseudoClass(match data.ty {
                NthType::Child => PseudoClass::NthChild(expr),
                NthType::LastChild => PseudoClass::NthLastChild(expr),
                NthType::OfType => PseudoClass::NthOfType(expr),
                NthType::LastOfType => PseudoClass::NthLastOfType(expr),
                NthType::OnlyChild => PseudoClass::OnlyChild,
                NthType::OnlyOfType => PseudoClass::OnlyOfType,
                _ => return Err(SelectorError::Unsupported("column pseudo-class")),
            })
        }
        Component::NonTSPseudoClass(pseudo) => SelectorComponent::PseudoClass(match pseudo {
            CssPseudoClass::Checked => PseudoClass::Checked,
            CssPseudoClass::Disabled => PseudoClass::Disabled,
            CssPseudoClass::Enabled => PseudoClass::Enabled,
            _ => return Err(SelectorError::Unsupported("pseudo-class")),
        }),

        Component::Negation(list) => SelectorComponent::PseudoClass(PseudoClass::Not(convert_list(list.iter())?)),
        Component::Is(list) => SelectorComponent::PseudoClass(PseudoClass::Is(convert_list(list.iter())?)),
        Component::Where(list) => SelectorComponent::PseudoClass(PseudoClass::Where(convert_list(list.iter())?)),

        Component::PseudoElement(_) => return Err(SelectorError::Unsupported("pseudo-element")),
        Component::Has(_) => return Err(SelectorError::Unsupported(":has()")),
        Component::NthOf(_) => return Err(SelectorError::Unsupported(":nth-child(… of S)")),
        _ => return Err(SelectorError::Unsupported("selector component")),
    };
    Ok(Some(converted))
}

fn attribute_matcher(operator: &AttrSelectorOperator, value: String) -> AttributeMatcher {
    match operator {
        AttrSelectorOperator::Equal => AttributeMatcher::Exact(value),
        AttrSelectorOperator::Includes => AttributeMatcher::Contains(value),
        AttrSelectorOperator::DashMatch => AttributeMatcher::DashMatch(value),
        AttrSelectorOperator::Prefix => AttributeMatcher::Prefix(value),
        AttrSelectorOperator::Suffix => AttributeMatcher::Suffix(value),
        AttrSelectorOperator::Substring => AttributeMatcher::Substring(value),
    }
}

// Documents here are always HTML, so the HTML-only folding applies
fn is_case_insensitive(case_sensitivity: &ParsedCaseSensitivity) -> bool {
    matches!(
        case_sensitivity,
        ParsedCaseSensitivity::AsciiCaseInsensitive
            | ParsedCaseSensitivity::AsciiCaseInsensitiveIfInHtmlElementInHtmlDocument
    )
}
