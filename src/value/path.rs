//! Field paths: `name`, `socials.facebook`, `phonenumbers[0]`, `friends[2].name`

use crate::error::{EngineError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One step into a value tree
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PathSegment {
    Name(String),
    Index(usize),
}

impl PathSegment {
    pub fn as_index(&self) -> Option<usize> {
        match self {
            PathSegment::Index(i) => Some(*i),
            PathSegment::Name(_) => None,
        }
    }
}

/// Location of a value inside a form tree
///
/// Parsed from and displayed as the dotted/indexed notation used by
/// change and blur events. Ordering is segment-wise, so error maps keyed
/// by paths list `friends[0]` before `friends[1]`.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct FieldPath {
    segments: Vec<PathSegment>,
}

impl FieldPath {
    /// The empty path, addressing the whole tree
    pub fn root() -> Self {
        Self::default()
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Extend with a named field
    pub fn field(&self, name: &str) -> Self {
        let mut segments = self.segments.clone();
        segments.push(PathSegment::Name(name.to_string()));
        Self { segments }
    }

    /// Extend with a list index
    pub fn index(&self, index: usize) -> Self {
        let mut segments = self.segments.clone();
        segments.push(PathSegment::Index(index));
        Self { segments }
    }

    /// Concatenate a relative path onto this one
    pub fn join(&self, rest: &FieldPath) -> Self {
        let mut segments = self.segments.clone();
        segments.extend(rest.segments.iter().cloned());
        Self { segments }
    }

    pub fn starts_with(&self, prefix: &FieldPath) -> bool {
        self.segments.starts_with(&prefix.segments)
    }

    /// Relationship in either direction: one path is an ancestor of (or equal to) the other
    pub fn overlaps(&self, other: &FieldPath) -> bool {
        self.starts_with(other) || other.starts_with(self)
    }

    /// Index directly below `list`, if this path lives inside that list
    pub fn index_under(&self, list: &FieldPath) -> Option<usize> {
        if !self.starts_with(list) {
            return None;
        }
        self.segments.get(list.len()).and_then(PathSegment::as_index)
    }

    /// Copy of this path with the index directly below `list` replaced
    pub fn with_index_under(&self, list: &FieldPath, index: usize) -> Self {
        let mut segments = self.segments.clone();
        if let Some(slot) = segments.get_mut(list.len()) {
            *slot = PathSegment::Index(index);
        }
        Self { segments }
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            match segment {
                PathSegment::Name(name) if i == 0 => write!(f, "{name}")?,
                PathSegment::Name(name) => write!(f, ".{name}")?,
                PathSegment::Index(index) => write!(f, "[{index}]")?,
            }
        }
        Ok(())
    }
}

impl FromStr for FieldPath {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self> {
        if s.is_empty() {
            return Err(EngineError::invalid_path(s, "path must not be empty"));
        }

        let mut segments = Vec::new();
        let mut chars = s.chars().peekable();
        let mut name = String::new();
        // Set after `]`: the next char must start a new segment
        let mut after_index = false;

        while let Some(c) = chars.next() {
            match c {
                '.' => {
                    if name.is_empty() && !after_index {
                        return Err(EngineError::invalid_path(s, "empty field name"));
                    }
                    if !name.is_empty() {
                        segments.push(PathSegment::Name(std::mem::take(&mut name)));
                    }
                    if chars.peek().is_none() {
                        return Err(EngineError::invalid_path(s, "trailing `.`"));
                    }
                    after_index = false;
                }
                '[' => {
                    if !name.is_empty() {
                        segments.push(PathSegment::Name(std::mem::take(&mut name)));
                    } else if !after_index {
                        return Err(EngineError::invalid_path(s, "index without a field"));
                    }
                    let mut digits = String::new();
                    loop {
                        match chars.next() {
                            Some(']') => break,
                            Some(d) if d.is_ascii_digit() => digits.push(d),
                            Some(other) => {
                                return Err(EngineError::invalid_path(
                                    s,
                                    format!("unexpected `{other}` in index"),
                                ))
                            }
                            None => return Err(EngineError::invalid_path(s, "unclosed `[`")),
                        }
                    }
                    let index = digits
                        .parse::<usize>()
                        .map_err(|_| EngineError::invalid_path(s, "index must be a number"))?;
                    segments.push(PathSegment::Index(index));
                    after_index = true;
                }
                ']' => return Err(EngineError::invalid_path(s, "unmatched `]`")),
                other => {
                    if after_index {
                        return Err(EngineError::invalid_path(
                            s,
                            format!("expected `.` or `[` after index, found `{other}`"),
                        ));
                    }
                    name.push(other);
                }
            }
        }

        if !name.is_empty() {
            segments.push(PathSegment::Name(name));
        }

        Ok(Self { segments })
    }
}

impl TryFrom<String> for FieldPath {
    type Error = EngineError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<FieldPath> for String {
    fn from(path: FieldPath) -> Self {
        path.to_string()
    }
}
