use std::ops::Deref;
use std::str::FromStr;

use smallvec::SmallVec;

/// Borrowed bindings produced by a successful match.
#[derive(Debug, Clone, Default)]
pub struct Captures<'a> {
    buf: SmallVec<[(&'a str, &'a str); 8]>,
    splat: Option<&'a str>,
}

impl<'a> Captures<'a> {
    pub fn get(&self, name: &str) -> Option<&'a str> {
        self.buf
            .iter()
            .find_map(|&(k, v)| if name == k { Some(v) } else { None })
    }

    pub fn parse<T: FromStr>(&self, name: &str) -> Option<Result<T, T::Err>> {
        self.get(name).map(T::from_str)
    }

    /// Remainder matched by a trailing wildcard.
    pub fn splat(&self) -> Option<&'a str> {
        self.splat
    }
}

impl<'a> Deref for Captures<'a> {
    type Target = [(&'a str, &'a str)];
    fn deref(&self) -> &Self::Target {
        &*self.buf
    }
}

impl<'a> Captures<'a> {
    pub(crate) fn new() -> Self {
        Self {
            buf: SmallVec::new(),
            splat: None,
        }
    }

    pub(crate) fn push(&mut self, name: &'a str, value: &'a str) {
        self.buf.push((name, value))
    }

    pub(crate) fn set_splat(&mut self, rest: &'a str) {
        self.splat = Some(rest)
    }
}
