use crate::error::RouterError;

use std::fmt;
use std::str::FromStr;

use http::Method;

/// Filter execution point relative to the route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    Before,
    After,
}

/// Key under which entries are registered: a method for routes, a phase for filters.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Target {
    Method(Method),
    Phase(Phase),
}

const METHODS: [Method; 9] = [
    Method::GET,
    Method::POST,
    Method::PUT,
    Method::PATCH,
    Method::DELETE,
    Method::HEAD,
    Method::TRACE,
    Method::CONNECT,
    Method::OPTIONS,
];

impl Target {
    pub fn method(method: Method) -> Result<Self, RouterError> {
        if METHODS.contains(&method) {
            Ok(Self::Method(method))
        } else {
            Err(RouterError::UnsupportedMethod(method.to_string()))
        }
    }

    pub fn is_phase(&self) -> bool {
        matches!(self, Self::Phase(_))
    }
}

impl From<Phase> for Target {
    fn from(phase: Phase) -> Self {
        Self::Phase(phase)
    }
}

impl FromStr for Target {
    type Err = RouterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("before") {
            return Ok(Self::Phase(Phase::Before));
        }
        if s.eq_ignore_ascii_case("after") {
            return Ok(Self::Phase(Phase::After));
        }
        let upper = s.to_ascii_uppercase();
        match METHODS.iter().find(|m| m.as_str() == upper) {
            Some(m) => Ok(Self::Method(m.clone())),
            None => Err(RouterError::UnknownTarget(s.to_owned())),
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Before => f.write_str("before"),
            Self::After => f.write_str("after"),
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Method(m) => fmt::Display::fmt(m, f),
            Self::Phase(p) => fmt::Display::fmt(p, f),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse() {
        assert_eq!("get".parse::<Target>().unwrap(), Target::Method(Method::GET));
        assert_eq!("PATCH".parse::<Target>().unwrap(), Target::Method(Method::PATCH));
        assert_eq!("Before".parse::<Target>().unwrap(), Target::Phase(Phase::Before));
        assert_eq!("after".parse::<Target>().unwrap(), Target::Phase(Phase::After));
        assert!(matches!(
            "fetch".parse::<Target>(),
            Err(RouterError::UnknownTarget(_))
        ));
    }

    #[test]
    fn extension_methods_rejected() {
        let m = Method::from_bytes(b"PURGE").unwrap();
        assert!(matches!(
            Target::method(m),
            Err(RouterError::UnsupportedMethod(_))
        ));
        assert!(Target::method(Method::TRACE).is_ok());
    }
}
