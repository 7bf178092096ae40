//! Content negotiation against the `Accept` header.

use std::fmt;

const ANY: &str = "*/*";

/// Media type an entry is willing to produce.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AcceptType {
    Any,
    Media(Box<str>),
}

impl Default for AcceptType {
    fn default() -> Self {
        Self::Any
    }
}

impl AcceptType {
    pub fn new(s: &str) -> Self {
        let s = s.trim();
        if s.is_empty() || s == ANY {
            Self::Any
        } else {
            Self::Media(s.into())
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Any => ANY,
            Self::Media(m) => m,
        }
    }

    pub fn is_any(&self) -> bool {
        matches!(self, Self::Any)
    }
}

impl From<&str> for AcceptType {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl fmt::Display for AcceptType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether a request carrying `header` can take what `offered` produces.
///
/// A missing or blank header accepts everything. The most specific range
/// covering `offered` decides: exact beats `type/*`, which beats `*/*`.
/// Quality values only matter when they are zero, which rejects the type.
pub fn accepts(header: Option<&str>, offered: &AcceptType) -> bool {
    let offered = match offered {
        AcceptType::Any => return true,
        AcceptType::Media(m) => &**m,
    };
    let header = match header.map(str::trim) {
        None | Some("") => return true,
        Some(h) => h,
    };

    let mut best: Option<(u8, bool)> = None;
    for (range, zero) in parse_ranges(header) {
        let rank = match specificity(range, offered) {
            Some(rank) => rank,
            None => continue,
        };
        best = match best {
            Some((r, accepted)) if r > rank => Some((r, accepted)),
            Some((r, accepted)) if r == rank => Some((r, accepted || !zero)),
            _ => Some((rank, !zero)),
        };
    }
    best.map(|(_, accepted)| accepted).unwrap_or(false)
}

/// Acceptable media ranges of a header, parameters stripped.
pub fn media_ranges(header: &str) -> impl Iterator<Item = &str> {
    parse_ranges(header).filter_map(|(range, zero)| if zero { None } else { Some(range) })
}

fn parse_ranges(header: &str) -> impl Iterator<Item = (&str, bool)> {
    header.split(',').filter_map(|token| {
        let mut params = token.split(';');
        let range = params.next()?.trim();
        if range.is_empty() {
            return None;
        }
        Some((range, params.any(is_zero_quality)))
    })
}

fn is_zero_quality(param: &str) -> bool {
    let mut kv = param.splitn(2, '=');
    let key = kv.next().map(str::trim);
    let value = kv.next().map(str::trim);
    match (key, value) {
        (Some(k), Some(v)) if k.eq_ignore_ascii_case("q") => {
            v.parse::<f32>().map(|q| q <= 0.0).unwrap_or(false)
        }
        _ => false,
    }
}

/// 2 for an exact match, 1 for `type/*`, 0 for `*/*`.
fn specificity(range: &str, offered: &str) -> Option<u8> {
    if range.eq_ignore_ascii_case(offered) {
        return Some(2);
    }
    if range == ANY {
        return Some(0);
    }
    let ty = range.strip_suffix("/*")?;
    let offered_ty = offered.split('/').next()?;
    if offered_ty.eq_ignore_ascii_case(ty) {
        Some(1)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn json() -> AcceptType {
        AcceptType::new("application/json")
    }

    #[test]
    fn any_always_accepts() {
        assert!(accepts(Some("text/html"), &AcceptType::Any));
        assert!(accepts(None, &AcceptType::Any));
        assert_eq!(AcceptType::new("*/*"), AcceptType::Any);
        assert_eq!(AcceptType::new(""), AcceptType::Any);
    }

    #[test]
    fn exact_and_wildcards() {
        assert!(accepts(Some("application/json"), &json()));
        assert!(!accepts(Some("text/html"), &json()));
        assert!(accepts(Some("*/*"), &json()));
        assert!(accepts(Some("application/*"), &json()));
        assert!(!accepts(Some("text/*"), &json()));
        assert!(accepts(Some("text/html, application/json;q=0.8"), &json()));
        assert!(accepts(Some("Application/JSON"), &json()));
    }

    #[test]
    fn missing_header_accepts() {
        assert!(accepts(None, &json()));
        assert!(accepts(Some("  "), &json()));
    }

    #[test]
    fn zero_quality_excludes() {
        assert!(!accepts(Some("application/json;q=0"), &json()));
        assert!(!accepts(Some("text/html, application/json; q=0.0"), &json()));
        assert!(accepts(Some("application/json;q=0.1"), &json()));
    }

    #[test]
    fn zero_quality_beats_broader_ranges() {
        assert!(!accepts(Some("application/json;q=0, */*"), &json()));
        assert!(!accepts(Some("*/*, application/*;q=0"), &json()));
        assert!(accepts(Some("application/*;q=0, application/json"), &json()));
        assert!(accepts(Some("*/*;q=0, application/json"), &json()));
        assert!(!accepts(Some("*/*;q=0"), &json()));
        assert!(accepts(Some("text/html;q=0, */*"), &json()));
    }

    #[test]
    fn ranges() {
        let v: Vec<_> = media_ranges("text/html; level=1, */*;q=0, image/png").collect();
        assert_eq!(v, ["text/html", "image/png"]);
    }
}
