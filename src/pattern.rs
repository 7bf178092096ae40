use crate::captures::Captures;
use crate::error::RouterError;

use std::fmt;

use smallvec::SmallVec;

const STAR: &str = "*";
const COLON: char = ':';
const SLASH: char = '/';

/// Compiled path template.
///
/// `/users/:id/*` compiles to a literal, a named capture and a trailing
/// wildcard. Patterns are immutable once compiled.
#[derive(Debug, Clone)]
pub struct PathPattern {
    template: Box<str>,
    segments: Vec<Segment>,
    kind: Kind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Literal(Box<str>),
    Param(Box<str>),
    Wildcard,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Kind {
    Exact,
    Wildcard,
    AllPaths,
}

impl PathPattern {
    pub fn compile(template: &str) -> Result<Self, RouterError> {
        if template.is_empty() {
            return Err(RouterError::EmptyTemplate);
        }

        let parts: SmallVec<[&str; 8]> = trim_first_slash(template).split(SLASH).collect();
        let last = parts.len() - 1;

        let mut segments: Vec<Segment> = Vec::with_capacity(parts.len());
        for (i, &part) in parts.iter().enumerate() {
            let segment = if part == STAR {
                if i != last {
                    return Err(RouterError::MisplacedWildcard(template.to_owned()));
                }
                Segment::Wildcard
            } else if let Some(name) = part.strip_prefix(COLON) {
                if name.is_empty() {
                    return Err(RouterError::EmptyParamName(template.to_owned()));
                }
                if segments.iter().any(|s| matches!(s, Segment::Param(n) if &**n == name)) {
                    return Err(RouterError::DuplicateParam(name.to_owned()));
                }
                Segment::Param(name.into())
            } else {
                Segment::Literal(part.into())
            };
            segments.push(segment);
        }

        let kind = match segments.last() {
            Some(Segment::Wildcard) => Kind::Wildcard,
            _ => Kind::Exact,
        };

        Ok(Self {
            template: template.into(),
            segments,
            kind,
        })
    }

    /// The pattern used by filters registered without a path.
    pub fn all_paths() -> Self {
        Self {
            template: "+/*paths".into(),
            segments: vec![Segment::Wildcard],
            kind: Kind::AllPaths,
        }
    }

    pub fn template(&self) -> &str {
        &self.template
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn is_all_paths(&self) -> bool {
        self.kind == Kind::AllPaths
    }

    /// Equal segment kinds and literal text; capture names are ignored.
    pub fn same_shape(&self, other: &Self) -> bool {
        if self.kind != other.kind || self.segments.len() != other.segments.len() {
            return false;
        }
        self.segments
            .iter()
            .zip(other.segments.iter())
            .all(|pair| match pair {
                (Segment::Literal(a), Segment::Literal(b)) => a == b,
                (Segment::Param(_), Segment::Param(_)) => true,
                (Segment::Wildcard, Segment::Wildcard) => true,
                _ => false,
            })
    }

    pub fn match_path<'a>(&'a self, path: &'a str) -> Option<Captures<'a>> {
        let mut captures = Captures::new();

        let fixed: &[Segment] = match self.kind {
            Kind::AllPaths => return Some(captures),
            Kind::Exact => &self.segments,
            Kind::Wildcard => &self.segments[..self.segments.len() - 1],
        };

        let path = trim_first_slash(path);
        let parts: SmallVec<[&str; 8]> = match self.kind {
            Kind::Wildcard => path.splitn(fixed.len() + 1, SLASH).collect(),
            _ => path.split(SLASH).collect(),
        };

        let expected = match self.kind {
            Kind::Wildcard => fixed.len() + 1,
            _ => fixed.len(),
        };
        if parts.len() != expected {
            return None;
        }

        for (segment, &part) in fixed.iter().zip(parts.iter()) {
            match segment {
                Segment::Literal(text) => {
                    if **text != *part {
                        return None;
                    }
                }
                Segment::Param(name) => {
                    if part.is_empty() {
                        return None;
                    }
                    captures.push(name, part);
                }
                Segment::Wildcard => unreachable!(),
            }
        }

        if self.kind == Kind::Wildcard {
            let rest = parts[fixed.len()];
            if rest.is_empty() {
                return None;
            }
            captures.set_splat(rest);
        }

        Some(captures)
    }
}

impl fmt::Display for PathPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.template)
    }
}

#[inline]
fn trim_first_slash(s: &str) -> &str {
    s.strip_prefix(SLASH).unwrap_or(s)
}
