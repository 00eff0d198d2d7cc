//! Selector AST
//!
//! A `SelectorList` is a comma separated list of `ComplexSelector`s, each a
//! chain of `CompoundSelector`s joined by combinators.

/// Comma separated selector list (`h1, h2`)
#[derive(Debug, Clone, PartialEq)]
pub struct SelectorList {
    pub selectors: Vec<ComplexSelector>,
}

/// Compound selectors joined by combinators (`ul > li.item`)
///
/// `combinators[i]` sits between `compounds[i]` and `compounds[i + 1]`, so
/// there is always exactly one more compound than combinators.
#[derive(Debug, Clone, PartialEq)]
pub struct ComplexSelector {
    pub compounds: Vec<CompoundSelector>,
    pub combinators: Vec<Combinator>,
}

/// Simple selectors that must all match the same element (`li.item[data-x]`)
#[derive(Debug, Clone, PartialEq)]
pub struct CompoundSelector {
    pub components: Vec<SelectorComponent>,
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

/// A component of a selector
#[derive(Debug, Clone, PartialEq)]
pub enum SelectorComponent {
    /// Universal selector *
    Universal,
    /// Type selector (lowercased tag name)
    Type(String),
    /// ID selector #id
    Id(String),
    /// Class selector .class
    Class(String),
    /// Attribute selector [attr], [attr=value], etc.
    Attribute(AttributeSelector),
    /// Pseudo-class :first-child, :nth-child(), etc.
    PseudoClass(PseudoClass),
}

/// Pseudo-classes understood by the matcher
#[derive(Debug, Clone, PartialEq)]
pub enum PseudoClass {
    // Link and user action pseudo-classes. mnml has no interaction state,
    // so only :link can ever match.
    Link,
    Visited,
    Hover,
    Active,
    Focus,
    FocusVisible,
    FocusWithin,
    Target,

    // Input pseudo-classes, answered from attributes
    Enabled,
    Disabled,
    Checked,
    Required,
    Optional,

    // Tree-structural pseudo-classes
    Root,
    Empty,
    FirstChild,
    LastChild,
    OnlyChild,
    FirstOfType,
    LastOfType,
    OnlyOfType,
    NthChild(NthExpression),
    NthLastChild(NthExpression),
    NthOfType(NthExpression),
    NthLastOfType(NthExpression),

    /// :not(a, b) - matches if none of the compounds match
    Not(Vec<CompoundSelector>),
}

impl PseudoClass {
    /// Look up an argument-less pseudo-class by name
    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "link" | "any-link" => Self::Link,
            "visited" => Self::Visited,
            "hover" => Self::Hover,
            "active" => Self::Active,
            "focus" => Self::Focus,
            "focus-visible" => Self::FocusVisible,
            "focus-within" => Self::FocusWithin,
            "target" => Self::Target,
            "enabled" => Self::Enabled,
            "disabled" => Self::Disabled,
            "checked" => Self::Checked,
            "required" => Self::Required,
            "optional" => Self::Optional,
            "root" => Self::Root,
            "empty" => Self::Empty,
            "first-child" => Self::FirstChild,
            "last-child" => Self::LastChild,
            "only-child" => Self::OnlyChild,
            "first-of-type" => Self::FirstOfType,
            "last-of-type" => Self::LastOfType,
            "only-of-type" => Self::OnlyOfType,
            _ => return None,
        })
    }
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
    /// Create "odd" expression (2n+1)
    pub fn odd() -> Self {
        Self { a: 2, b: 1 }
    }

    /// Create "even" expression (2n)
    pub fn even() -> Self {
        Self { a: 2, b: 0 }
    }

    /// Create a simple index (0n+b)
    pub fn index(n: i32) -> Self {
        Self { a: 0, b: n }
    }

    /// Create An+B expression
    pub fn new(a: i32, b: i32) -> Self {
        Self { a, b }
    }

    /// Parse from string like "2n+1", "odd", "even", "3"
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim().to_ascii_lowercase();

        match s.as_str() {
            "odd" => return Some(Self::odd()),
            "even" => return Some(Self::even()),
            _ => {}
        }

        if let Ok(n) = s.parse::<i32>() {
            return Some(Self::index(n));
        }

        let s: String = s.chars().filter(|c| !c.is_whitespace()).collect();
        let n_pos = s.find('n')?;

        let a_str = &s[..n_pos];
        let a = match a_str {
            "" | "+" => 1,
            "-" => -1,
            _ => a_str.parse().ok()?,
        };

        let rest = &s[n_pos + 1..];
        let b = if rest.is_empty() {
            0
        } else if rest.starts_with('+') || rest.starts_with('-') {
            rest.parse().ok()?
        } else {
            return None;
        };

        Some(Self::new(a, b))
    }

    /// Check if index n (1-based) matches this expression
    pub fn matches(&self, n: i32) -> bool {
        if self.a == 0 {
            return n == self.b;
        }

        let diff = i64::from(n) - i64::from(self.b);
        let a = i64::from(self.a);
        if a > 0 {
            diff >= 0 && diff % a == 0
        } else {
            diff <= 0 && diff % a == 0
        }
    }
}

/// Attribute selector
#[derive(Debug, Clone, PartialEq)]
pub struct AttributeSelector {
    /// Lowercased attribute name
    pub name: String,
    pub matcher: Option<AttributeMatcher>,
    /// `[attr=value i]`; the expected value is stored lowercased
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

        let owned;
        let val = if self.case_insensitive {
            owned = value.to_lowercase();
            owned.as_str()
        } else {
            value
        };

        match matcher {
            AttributeMatcher::Exact(expected) => val == expected,
            AttributeMatcher::Contains(expected) => {
                !expected.is_empty() && val.split_ascii_whitespace().any(|w| w == expected)
            }
            AttributeMatcher::DashMatch(expected) => {
                val == expected
                    || val
                        .strip_prefix(expected.as_str())
                        .is_some_and(|rest| rest.starts_with('-'))
            }
            AttributeMatcher::Prefix(expected) => !expected.is_empty() && val.starts_with(expected.as_str()),
            AttributeMatcher::Suffix(expected) => !expected.is_empty() && val.ends_with(expected.as_str()),
            AttributeMatcher::Substring(expected) => !expected.is_empty() && val.contains(expected.as_str()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nth_expression_odd() {
        let expr = NthExpression::odd();
        assert!(expr.matches(1));
        assert!(!expr.matches(2));
        assert!(expr.matches(3));
        assert!(!expr.matches(4));
    }

    #[test]
    fn test_nth_expression_even() {
        let expr = NthExpression::even();
        assert!(!expr.matches(1));
        assert!(expr.matches(2));
        assert!(expr.matches(4));
    }

    #[test]
    fn test_nth_expression_parse() {
        assert_eq!(NthExpression::parse("odd"), Some(NthExpression::odd()));
        assert_eq!(NthExpression::parse("even"), Some(NthExpression::even()));
        assert_eq!(NthExpression::parse("3"), Some(NthExpression::index(3)));
        assert_eq!(NthExpression::parse("2n"), Some(NthExpression::new(2, 0)));
        assert_eq!(NthExpression::parse("2n + 1"), Some(NthExpression::new(2, 1)));
        assert_eq!(NthExpression::parse("-n+3"), Some(NthExpression::new(-1, 3)));
        assert_eq!(NthExpression::parse("n3"), None);
        assert_eq!(NthExpression::parse("x"), None);
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
        let expr = NthExpression::parse("2n-2147483648").unwrap();
        assert_eq!(expr, NthExpression::new(2, i32::MIN));
        assert!(!expr.matches(1));
        assert!(expr.matches(2));

        let last = NthExpression::new(i32::MIN, i32::MAX);
        assert!(!last.matches(1));
        assert!(last.matches(i32::MAX));
        assert!(!NthExpression::new(1, i32::MAX).matches(i32::MIN));
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
            matcher: Some(AttributeMatcher::Exact("text".to_string())),
            case_insensitive: true,
        };
        assert!(sel.matches(Some("TeXt")));
    }

    #[test]
    fn test_attribute_selector_dash_and_prefix() {
        let dash = AttributeSelector {
            name: "lang".to_string(),
            matcher: Some(AttributeMatcher::DashMatch("en".to_string())),
            case_insensitive: false,
        };
        assert!(dash.matches(Some("en")));
        assert!(dash.matches(Some("en-US")));
        assert!(!dash.matches(Some("english")));

        let empty_prefix = AttributeSelector {
            name: "class".to_string(),
            matcher: Some(AttributeMatcher::Prefix(String::new())),
            case_insensitive: false,
        };
        assert!(!empty_prefix.matches(Some("anything")));
    }
}
