//! Python version numbers and pyenv-style version constraints.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::error::{ToolError, ToolResult};

const PRERELEASE_SUFFIX: &str = "-dev";

/// A CPython version as listed by pyenv (`3.8.1`, `3.9-dev`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PythonVersion {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
    pub prerelease: bool,
}

/// Version component to increment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bump {
    Major,
    Minor,
    Patch,
}

impl PythonVersion {
    pub fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self {
            major,
            minor,
            patch,
            prerelease: false,
        }
    }

    /// Parse `X[.Y[.Z]][-dev]`, padding missing components with zero.
    ///
    /// Returns `None` for anything else (`system`, `pypy3.6-7.1.1`,
    /// `3.8.0rc1`) and for prereleases when `allow_prerelease` is false.
    pub fn parse(text: &str, allow_prerelease: bool) -> Option<Self> {
        let text = text.trim();
        if !text.starts_with(|c: char| c.is_ascii_digit()) {
            return None;
        }

        let (numbers, prerelease) = match text.strip_suffix(PRERELEASE_SUFFIX) {
            Some(_) if !allow_prerelease => return None,
            Some(stem) => (stem, true),
            None => (text, false),
        };

        let parts = numbers
            .split('.')
            .map(|p| p.parse::<u32>().ok())
            .collect::<Option<Vec<_>>>()?;
        if parts.is_empty() || parts.len() > 3 {
            return None;
        }

        Some(Self {
            major: parts[0],
            minor: parts.get(1).copied().unwrap_or(0),
            patch: parts.get(2).copied().unwrap_or(0),
            prerelease,
        })
    }

    /// Increment one component, zeroing the lower ones. The result is a release.
    ///
    /// Returns `None` when the component is already `u32::MAX`.
    pub fn bump(&self, which: Bump) -> Option<Self> {
        Some(match which {
            Bump::Major => Self::new(self.major.checked_add(1)?, 0, 0),
            Bump::Minor => Self::new(self.major, self.minor.checked_add(1)?, 0),
            Bump::Patch => Self::new(self.major, self.minor, self.patch.checked_add(1)?),
        })
    }
}

impl Ord for PythonVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.major, self.minor, self.patch)
            .cmp(&(other.major, other.minor, other.patch))
            // 3.9.0-dev sorts before 3.9.0
            .then_with(|| other.prerelease.cmp(&self.prerelease))
    }
}

impl PartialOrd for PythonVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for PythonVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)?;
        if self.prerelease {
            f.write_str(PRERELEASE_SUFFIX)?;
        }
        Ok(())
    }
}

/// Comparison operator of a single constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Gt,
    Lt,
    Ge,
    Le,
    Eq,
    Ne,
}

impl Operator {
    fn parse(op: &str) -> Option<Self> {
        match op {
            ">" => Some(Self::Gt),
            "<" => Some(Self::Lt),
            ">=" => Some(Self::Ge),
            "<=" => Some(Self::Le),
            "==" | "" => Some(Self::Eq),
            "!=" => Some(Self::Ne),
            _ => None,
        }
    }

    fn holds(self, ordering: Ordering) -> bool {
        match self {
            Self::Gt => ordering == Ordering::Greater,
            Self::Lt => ordering == Ordering::Less,
            Self::Ge => ordering != Ordering::Less,
            Self::Le => ordering != Ordering::Greater,
            Self::Eq => ordering == Ordering::Equal,
            Self::Ne => ordering != Ordering::Equal,
        }
    }
}

/// `candidate <op> bound`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Constraint {
    pub op: Operator,
    pub bound: PythonVersion,
}

impl Constraint {
    /// `<X.Y.Z` also excludes the prereleases of `X.Y.Z` itself.
    pub fn allows(&self, candidate: &PythonVersion) -> bool {
        if self.op == Operator::Lt
            && candidate.prerelease
            && !self.bound.prerelease
            && (candidate.major, candidate.minor, candidate.patch)
                == (self.bound.major, self.bound.minor, self.bound.patch)
        {
            return false;
        }
        self.op.holds(candidate.cmp(&self.bound))
    }
}

/// A conjunction of constraints such as `^3.6,!=3.7.1`.
///
/// Supported forms: `^X` (same major), `~X` (same minor), `X.*` / `X.Y.*`
/// wildcards, a bare `*`, and `>`, `<`, `>=`, `<=`, `==`, `!=` comparisons.
/// A version without an operator means `==`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VersionConstraints {
    constraints: Vec<Constraint>,
}

impl VersionConstraints {
    pub fn parse(text: &str) -> ToolResult<Self> {
        let mut constraints = Vec::new();
        for raw in text.split(',') {
            let part = raw.trim();
            if part.is_empty() {
                return Err(ToolError::InvalidConstraint(text.to_string()));
            }
            expand(part, &mut constraints)?;
        }
        Ok(Self { constraints })
    }

    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    pub fn allows(&self, version: &PythonVersion) -> bool {
        self.constraints.iter().all(|c| c.allows(version))
    }

    /// The highest version in `versions` allowed by every constraint.
    pub fn select<'a, I>(&self, versions: I) -> Option<PythonVersion>
    where
        I: IntoIterator<Item = &'a PythonVersion>,
    {
        versions.into_iter().filter(|v| self.allows(v)).max().copied()
    }
}

impl FromStr for VersionConstraints {
    type Err = ToolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

fn expand(part: &str, out: &mut Vec<Constraint>) -> ToolResult<()> {
    let version = |text: &str| {
        PythonVersion::parse(text, true).ok_or_else(|| ToolError::InvalidConstraint(part.to_string()))
    };
    let range = |bound: PythonVersion, upper: Bump, out: &mut Vec<Constraint>| -> ToolResult<()> {
        let limit = bound
            .bump(upper)
            .ok_or_else(|| ToolError::InvalidConstraint(part.to_string()))?;
        out.push(Constraint {
            op: Operator::Ge,
            bound,
        });
        out.push(Constraint {
            op: Operator::Lt,
            bound: limit,
        });
        Ok(())
    };

    if part == "*" {
        return Ok(());
    }

    if let Some(rest) = part.strip_prefix('^') {
        range(version(rest)?, Bump::Major, out)?;
    } else if let Some(rest) = part.strip_prefix('~') {
        range(version(rest)?, Bump::Minor, out)?;
    } else if let Some(rest) = part.strip_suffix('*') {
        let upper = if part.matches('.').count() <= 1 {
            Bump::Major
        } else {
            Bump::Minor
        };
        range(version(rest.trim_end_matches('.'))?, upper, out)?;
    } else {
        let split = part
            .find(|c: char| !matches!(c, '>' | '<' | '!' | '='))
            .unwrap_or(part.len());
        let (op_text, rest) = part.split_at(split);
        let op = Operator::parse(op_text).ok_or_else(|| ToolError::InvalidOperator {
            operator: op_text.to_string(),
            constraint: part.to_string(),
        })?;
        out.push(Constraint {
            op,
            bound: version(rest.trim())?,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(text: &str) -> PythonVersion {
        PythonVersion::parse(text, true).unwrap()
    }

    #[test]
    fn test_parse_pads_components() {
        assert_eq!(v("3"), PythonVersion::new(3, 0, 0));
        assert_eq!(v("3.8"), PythonVersion::new(3, 8, 0));
        assert_eq!(v("3.8.1"), PythonVersion::new(3, 8, 1));
    }

    #[test]
    fn test_parse_prerelease() {
        let dev = v("3.9-dev");
        assert!(dev.prerelease);
        assert_eq!(dev.to_string(), "3.9.0-dev");
        assert_eq!(PythonVersion::parse("3.9-dev", false), None);
    }

    #[test]
    fn test_parse_rejects_non_cpython() {
        assert_eq!(PythonVersion::parse("system", true), None);
        assert_eq!(PythonVersion::parse("pypy3.6-7.1.1", true), None);
        assert_eq!(PythonVersion::parse("3.8.0rc1", true), None);
        assert_eq!(PythonVersion::parse("3.8.0.1", true), None);
    }

    #[test]
    fn test_bump() {
        let base = v("3.6.4-dev");
        assert_eq!(base.bump(Bump::Major), Some(PythonVersion::new(4, 0, 0)));
        assert_eq!(base.bump(Bump::Minor), Some(PythonVersion::new(3, 7, 0)));
        assert_eq!(base.bump(Bump::Patch), Some(PythonVersion::new(3, 6, 5)));

        let top = PythonVersion::new(u32::MAX, u32::MAX, u32::MAX);
        assert_eq!(top.bump(Bump::Major), None);
        assert_eq!(top.bump(Bump::Minor), None);
        assert_eq!(top.bump(Bump::Patch), None);
    }

    #[test]
    fn test_upper_bound_overflow_is_invalid() {
        for constraint in ["^4294967295", "~3.4294967295", "4294967295.*", "3.4294967295.*"] {
            assert!(
                matches!(
                    VersionConstraints::parse(constraint),
                    Err(ToolError::InvalidConstraint(ref c)) if c == constraint
                ),
                "{constraint} should be rejected"
            );
        }
        // The largest bound that can still be bumped.
        let c = VersionConstraints::parse("^4294967294").unwrap();
        assert!(c.allows(&PythonVersion::new(4294967294, 7, 0)));
    }

    #[test]
    fn test_ordering() {
        assert!(v("3.10.0") > v("3.9.7"));
        assert!(v("3.9-dev") < v("3.9.0"));
        assert!(v("3.9-dev") > v("3.8.12"));
    }

    #[test]
    fn test_caret_constraint() {
        let c = VersionConstraints::parse("^3.6").unwrap();
        assert!(c.allows(&v("3.6.0")));
        assert!(c.allows(&v("3.11.2")));
        assert!(!c.allows(&v("3.5.9")));
        assert!(!c.allows(&v("4.0.0")));
    }

    #[test]
    fn test_tilde_constraint() {
        let c = VersionConstraints::parse("~3.7.2").unwrap();
        assert!(c.allows(&v("3.7.9")));
        assert!(!c.allows(&v("3.7.1")));
        assert!(!c.allows(&v("3.8.0")));
    }

    #[test]
    fn test_wildcards() {
        let major = VersionConstraints::parse("3.*").unwrap();
        assert!(major.allows(&v("3.12.0")));
        assert!(!major.allows(&v("4.0.0")));

        let minor = VersionConstraints::parse("3.8.*").unwrap();
        assert!(minor.allows(&v("3.8.17")));
        assert!(!minor.allows(&v("3.9.0")));
        assert!(!minor.allows(&v("3.9-dev")));

        assert!(VersionConstraints::parse("*").unwrap().allows(&v("2.7.18")));
    }

    #[test]
    fn test_operators() {
        let c = VersionConstraints::parse(">=3.6, <3.9,!=3.7.1").unwrap();
        assert_eq!(c.constraints().len(), 3);
        assert!(c.allows(&v("3.7.0")));
        assert!(!c.allows(&v("3.7.1")));
        assert!(!c.allows(&v("3.9.0")));

        let exact: VersionConstraints = "3.8.1".parse().unwrap();
        assert!(exact.allows(&v("3.8.1")));
        assert!(!exact.allows(&v("3.8.2")));
    }

    #[test]
    fn test_invalid_constraints() {
        assert!(matches!(
            VersionConstraints::parse("=>3.6"),
            Err(ToolError::InvalidOperator { .. })
        ));
        assert!(matches!(
            VersionConstraints::parse("^banana"),
            Err(ToolError::InvalidConstraint(_))
        ));
        assert!(matches!(
            VersionConstraints::parse("3.6,,"),
            Err(ToolError::InvalidConstraint(_))
        ));
    }

    #[test]
    fn test_select_highest_match() {
        let versions = vec![v("2.7.18"), v("3.6.15"), v("3.8.12"), v("3.9-dev"), v("3.10.4")];
        let c = VersionConstraints::parse("^3.6,<3.10").unwrap();
        assert_eq!(c.select(&versions), Some(v("3.9-dev")));

        let none = VersionConstraints::parse(">=4").unwrap();
        assert_eq!(none.select(&versions), None);
    }
}
