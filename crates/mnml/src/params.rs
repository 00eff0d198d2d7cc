//! Query string parsing
//!
//! `a=1&a=2&b=3` becomes `{"a": ["1", "2"], "b": "3"}`: a key seen once maps
//! to its value, a repeated key maps to all of its values in order. Keys keep
//! the order of their first occurrence.

use std::collections::{HashMap, VecDeque};
use std::rc::Rc;

use indexmap::IndexMap;
use serde::Serialize;

/// Value of a query parameter
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ParamValue {
    One(String),
    Many(Vec<String>),
}

impl ParamValue {
    /// First value seen for the key
    pub fn first(&self) -> &str {
        match self {
            Self::One(value) => value,
            Self::Many(values) => values.first().map_or("", String::as_str),
        }
    }

    /// Every value seen for the key, in order
    pub fn values(&self) -> Vec<&str> {
        match self {
            Self::One(value) => vec![value.as_str()],
            Self::Many(values) => values.iter().map(String::as_str).collect(),
        }
    }

    fn push(&mut self, value: String) {
        match self {
            Self::One(first) => {
                let first = std::mem::take(first);
                *self = Self::Many(vec![first, value]);
            }
            Self::Many(values) => values.push(value),
        }
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        Self::One(value.to_string())
    }
}

impl<const N: usize> From<[&str; N]> for ParamValue {
    fn from(values: [&str; N]) -> Self {
        Self::Many(values.iter().map(|v| v.to_string()).collect())
    }
}

/// Parsed query string
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Params {
    entries: IndexMap<String, ParamValue>,
}

impl Params {
    /// Parse a query string. One leading `?` is ignored; `+` and percent
    /// escapes are decoded.
    pub fn parse(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);

        let mut entries: IndexMap<String, ParamValue> = IndexMap::new();
        for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
            match entries.get_mut(&*key) {
                Some(existing) => existing.push(value.into_owned()),
                None => {
                    entries.insert(key.into_owned(), ParamValue::One(value.into_owned()));
                }
            }
        }
        Self { entries }
    }

    pub fn get(&self, key: &str) -> Option<&ParamValue> {
        self.entries.get(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.entries.iter().map(|(key, value)| (key.as_str(), value))
    }
}

/// Memoized [`Params::parse`] keyed by the query without its leading `?`
#[derive(Debug)]
pub struct ParamsCache {
    limit: Option<usize>,
    entries: HashMap<String, Rc<Params>>,
    order: VecDeque<String>,
}

impl ParamsCache {
    /// `limit` bounds the number of memoized inputs; the oldest is evicted
    /// first. `None` is unbounded and `Some(0)` disables memoization.
    pub fn new(limit: Option<usize>) -> Self {
        Self {
            limit,
            entries: HashMap::new(),
            order: VecDeque::new(),
        }
    }

    pub fn get_or_parse(&mut self, query: &str) -> Rc<Params> {
        let query = query.strip_prefix('?').unwrap_or(query);
        if query.is_empty() {
            return Rc::new(Params::default());
        }
        if let Some(params) = self.entries.get(query) {
            return Rc::clone(params);
        }

        let params = Rc::new(Params::parse(query));
        if self.limit == Some(0) {
            return params;
        }

        if let Some(limit) = self.limit {
            while self.order.len() >= limit {
                let Some(oldest) = self.order.pop_front() else { break };
                self.entries.remove(&oldest);
                tracing::trace!(query = %oldest, "params cache entry evicted");
            }
        }
        self.entries.insert(query.to_string(), Rc::clone(&params));
        self.order.push_back(query.to_string());
        params
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
