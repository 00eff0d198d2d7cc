//! Selector parser
//!
//! Hand-written recursive descent over the selector string. Type selectors,
//! attribute names and pseudo-class names are lowercased while parsing.

use crate::selectors::{
    AttributeMatcher, AttributeSelector, Combinator, ComplexSelector, CompoundSelector,
    NthExpression, PseudoClass, SelectorComponent, SelectorList,
};
use crate::SelectorError;

/// Selector parser over a single input string
pub struct SelectorParser<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> SelectorParser<'a> {
    pub fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    /// Parse the whole input as a selector list
    pub fn parse(mut self) -> Result<SelectorList, SelectorError> {
        if self.input.trim().is_empty() {
            return Err(SelectorError::Empty);
        }

        let mut selectors = Vec::new();
        loop {
            self.skip_whitespace();
            selectors.push(self.parse_complex()?);
            self.skip_whitespace();
            match self.peek() {
                None => break,
                Some(',') => self.bump(),
                Some(found) => return Err(self.unexpected(found)),
            }
        }

        tracing::trace!(selector = self.input, count = selectors.len(), "parsed selector list");
        Ok(SelectorList { selectors })
    }

    fn parse_complex(&mut self) -> Result<ComplexSelector, SelectorError> {
        let mut compounds = vec![self.parse_compound()?];
        let mut combinators = Vec::new();

        loop {
            let had_whitespace = self.skip_whitespace();
            let combinator = match self.peek() {
                None | Some(',') | Some(')') => break,
                Some('>') => Combinator::Child,
                Some('+') => Combinator::NextSibling,
                Some('~') => Combinator::SubsequentSibling,
                Some(_) if had_whitespace => Combinator::Descendant,
                Some(found) => return Err(self.unexpected(found)),
            };
            if combinator != Combinator::Descendant {
                self.bump();
                self.skip_whitespace();
            }
            combinators.push(combinator);
            compounds.push(self.parse_compound()?);
        }

        Ok(ComplexSelector { compounds, combinators })
    }

    fn parse_compound(&mut self) -> Result<CompoundSelector, SelectorError> {
        let mut components = Vec::new();

        match self.peek() {
            Some('*') => {
                self.bump();
                components.push(SelectorComponent::Universal);
            }
            Some(c) if is_ident_start(c) => {
                let name = self.parse_ident()?;
                components.push(SelectorComponent::Type(name.to_ascii_lowercase()));
            }
            _ => {}
        }

        loop {
            match self.peek() {
                Some('#') => {
                    self.bump();
                    components.push(SelectorComponent::Id(self.parse_ident()?));
                }
                Some('.') => {
                    self.bump();
                    components.push(SelectorComponent::Class(self.parse_ident()?));
                }
                Some('[') => {
                    self.bump();
                    components.push(SelectorComponent::Attribute(self.parse_attribute()?));
                }
                Some(':') => {
                    self.bump();
                    components.push(SelectorComponent::PseudoClass(self.parse_pseudo_class()?));
                }
                _ => break,
            }
        }

        if components.is_empty() {
            return Err(match self.peek() {
                Some(found) => self.unexpected(found),
                None => self.expected("a selector"),
            });
        }
        Ok(CompoundSelector { components })
    }

    fn parse_attribute(&mut self) -> Result<AttributeSelector, SelectorError> {
        self.skip_whitespace();
        let name = self.parse_ident()?.to_ascii_lowercase();
        self.skip_whitespace();

        let operator = match self.peek() {
            Some(']') => {
                self.bump();
                return Ok(AttributeSelector { name, matcher: None, case_insensitive: false });
            }
            Some('=') => {
                self.bump();
                '='
            }
            Some(op @ ('~' | '|' | '^' | '$' | '*')) => {
                self.bump();
                if self.peek() != Some('=') {
                    return Err(self.expected("'='"));
                }
                self.bump();
                op
            }
            Some(found) => return Err(self.unexpected(found)),
            None => return Err(self.expected("']'")),
        };

        self.skip_whitespace();
        let mut value = match self.peek() {
            Some(quote @ ('"' | '\'')) => self.parse_string(quote)?,
            _ => self.parse_ident()?,
        };

        self.skip_whitespace();
        let mut case_insensitive = false;
        if let Some(flag @ ('i' | 'I' | 's' | 'S')) = self.peek() {
            self.bump();
            case_insensitive = flag.eq_ignore_ascii_case(&'i');
            self.skip_whitespace();
        }
        if self.peek() != Some(']') {
            return Err(self.expected("']'"));
        }
        self.bump();

        if case_insensitive {
            value = value.to_lowercase();
        }
        let matcher = match operator {
            '=' => AttributeMatcher::Exact(value),
            '~' => AttributeMatcher::Contains(value),
            '|' => AttributeMatcher::DashMatch(value),
            '^' => AttributeMatcher::Prefix(value),
            '$' => AttributeMatcher::Suffix(value),
            _ => AttributeMatcher::Substring(value),
        };
        Ok(AttributeSelector { name, matcher: Some(matcher), case_insensitive })
    }

    fn parse_pseudo_class(&mut self) -> Result<PseudoClass, SelectorError> {
        if self.peek() == Some(':') {
            return Err(SelectorError::PseudoElement { selector: self.input.to_string() });
        }
        let name = self.parse_ident()?.to_ascii_lowercase();

        if self.peek() != Some('(') {
            return PseudoClass::from_name(&name)
                .ok_or(SelectorError::UnsupportedPseudoClass { name });
        }
        self.bump();

        let pseudo = match name.as_str() {
            "not" => {
                let mut compounds = Vec::new();
                loop {
                    self.skip_whitespace();
                    compounds.push(self.parse_compound()?);
                    self.skip_whitespace();
                    if self.peek() != Some(',') {
                        break;
                    }
                    self.bump();
                }
                PseudoClass::Not(compounds)
            }
            "nth-child" | "nth-last-child" | "nth-of-type" | "nth-last-of-type" => {
                let raw = self.take_until(')');
                let expr = NthExpression::parse(raw)
                    .ok_or_else(|| SelectorError::InvalidNth(raw.trim().to_string()))?;
                match name.as_str() {
                    "nth-child" => PseudoClass::NthChild(expr),
                    "nth-last-child" => PseudoClass::NthLastChild(expr),
                    "nth-of-type" => PseudoClass::NthOfType(expr),
                    _ => PseudoClass::NthLastOfType(expr),
                }
            }
            _ => return Err(SelectorError::UnsupportedPseudoClass { name }),
        };

        if self.peek() != Some(')') {
            return Err(self.expected("')'"));
        }
        self.bump();
        Ok(pseudo)
    }

    fn parse_ident(&mut self) -> Result<String, SelectorError> {
        match self.peek() {
            Some(c) if is_ident_start(c) => {}
            Some(found) => return Err(self.unexpected(found)),
            None => return Err(self.expected("an identifier")),
        }

        let mut ident = String::new();
        while let Some(c) = self.peek() {
            if c == '\\' {
                self.bump();
                match self.peek() {
                    Some(escaped) => {
                        ident.push(escaped);
                        self.bump();
                    }
                    None => return Err(self.expected("an escaped character")),
                }
            } else if is_ident_char(c) {
                ident.push(c);
                self.bump();
            } else {
                break;
            }
        }
        Ok(ident)
    }

    fn parse_string(&mut self, quote: char) -> Result<String, SelectorError> {
        self.bump();
        let mut value = String::new();
        loop {
            match self.peek() {
                Some(c) if c == quote => {
                    self.bump();
                    return Ok(value);
                }
                Some('\\') => {
                    self.bump();
                    if let Some(escaped) = self.peek() {
                        value.push(escaped);
                        self.bump();
                    }
                }
                Some(c) => {
                    value.push(c);
                    self.bump();
                }
                None => return Err(self.expected("a closing quote")),
            }
        }
    }

    fn take_until(&mut self, end: char) -> &'a str {
        let input: &'a str = self.input;
        let start = self.pos;
        let len = input[start..].find(end).unwrap_or(input.len() - start);
        self.pos += len;
        &input[start..start + len]
    }

    #[inline]
    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    #[inline]
    fn bump(&mut self) {
        if let Some(c) = self.peek() {
            self.pos += c.len_utf8();
        }
    }

    /// Returns true if any whitespace was skipped
    fn skip_whitespace(&mut self) -> bool {
        let start = self.pos;
        while self.peek().is_some_and(char::is_whitespace) {
            self.bump();
        }
        self.pos != start
    }

    fn unexpected(&self, found: char) -> SelectorError {
        SelectorError::Unexpected {
            found,
            offset: self.pos,
            selector: self.input.to_string(),
        }
    }

    fn expected(&self, expected: &'static str) -> SelectorError {
        SelectorError::Expected {
            expected,
            offset: self.pos,
            selector: self.input.to_string(),
        }
    }
}

fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_' || c == '-' || c == '\\' || !c.is_ascii()
}

fn is_ident_char(c: char) -> bool {
    is_ident_start(c) || c.is_ascii_digit()
}
