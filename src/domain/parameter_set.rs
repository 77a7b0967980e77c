//! Parameter set resolution.
//!
//! A parameter set is a named, mutually exclusive configuration mode of a
//! command. Each set declares which fields it requires and which it accepts.

use std::collections::BTreeSet;
use std::fmt::Debug;

use tracing::debug;

use crate::domain::error::ConfigurationError;

/// Static description of one parameter set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParameterSetSpec {
    pub name: &'static str,
    /// Fields that must be bound for this set to apply.
    pub required: &'static [&'static str],
    /// Every field this set accepts, required ones included.
    pub allowed: &'static [&'static str],
}

impl ParameterSetSpec {
    fn missing<'a>(&self, bound: &BTreeSet<&'a str>) -> Vec<&'static str> {
        self.required
            .iter()
            .copied()
            .filter(|f| !bound.contains(*f))
            .collect()
    }

    fn accepts(&self, field: &str) -> bool {
        self.allowed.iter().any(|a| *a == field)
    }

    fn accepts_all(&self, bound: &BTreeSet<&str>) -> bool {
        bound.iter().all(|f| self.accepts(f))
    }

    /// Bound fields this set does not use.
    pub fn unused<'a>(&self, bound: &BTreeSet<&'a str>) -> Vec<&'a str> {
        bound
            .iter()
            .copied()
            .filter(|f| !self.accepts(f))
            .collect()
    }
}

/// A closed enumeration of the parameter sets of one command.
pub trait ParameterSet: Sized + Copy + Debug + 'static {
    const ALL: &'static [Self];

    fn spec(self) -> &'static ParameterSetSpec;

    /// Look up a set by name (case-insensitive).
    fn from_name(name: &str) -> Result<Self, ConfigurationError> {
        Self::ALL
            .iter()
            .copied()
            .find(|s| s.spec().name.eq_ignore_ascii_case(name.trim()))
            .ok_or_else(|| ConfigurationError::UnknownParameterSet(name.to_string()))
    }
}

/// Select the single parameter set that applies to the bound fields.
///
/// Without an explicit selector a set is a candidate when all its required
/// fields are bound and it accepts every bound field. Exactly one candidate
/// must remain. An explicit selector overrides matching, but the selected set
/// must still have its required fields bound.
pub fn resolve<S: ParameterSet>(
    bound: &BTreeSet<&str>,
    explicit: Option<S>,
) -> Result<S, ConfigurationError> {
    if let Some(selected) = explicit {
        let spec = selected.spec();
        let missing = spec.missing(bound);
        if !missing.is_empty() {
            return Err(ConfigurationError::MissingRequired {
                parameter_set: spec.name,
                missing,
            });
        }
        debug!("resolve: explicit parameter set {}", spec.name);
        return Ok(selected);
    }

    let candidates: Vec<S> = S::ALL
        .iter()
        .copied()
        .filter(|s| {
            let spec = s.spec();
            spec.missing(bound).is_empty() && spec.accepts_all(bound)
        })
        .collect();

    match candidates.as_slice() {
        [single] => {
            debug!("resolve: matched parameter set {}", single.spec().name);
            Ok(*single)
        }
        [] => Err(ConfigurationError::NoMatchingParameterSet {
            bound: bound.iter().map(|f| f.to_string()).collect(),
        }),
        many => Err(ConfigurationError::AmbiguousParameterSet {
            candidates: many.iter().map(|s| s.spec().name).collect(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Mode {
        Left,
        Right,
    }

    const LEFT: ParameterSetSpec = ParameterSetSpec {
        name: "Left",
        required: &["name"],
        allowed: &["name", "shared", "left_only"],
    };

    const RIGHT: ParameterSetSpec = ParameterSetSpec {
        name: "Right",
        required: &["name"],
        allowed: &["name", "shared", "right_only"],
    };

    impl ParameterSet for Mode {
        const ALL: &'static [Self] = &[Mode::Left, Mode::Right];

        fn spec(self) -> &'static ParameterSetSpec {
            match self {
                Mode::Left => &LEFT,
                Mode::Right => &RIGHT,
            }
        }
    }

    fn bound<'a>(fields: &[&'a str]) -> BTreeSet<&'a str> {
        fields.iter().copied().collect()
    }

    #[test]
    fn given_distinguishing_field_when_resolving_then_selects_single_set() {
        let set = resolve::<Mode>(&bound(&["name", "left_only"]), None).unwrap();
        assert_eq!(set, Mode::Left);
    }

    #[test]
    fn given_only_shared_fields_when_resolving_then_ambiguous() {
        let err = resolve::<Mode>(&bound(&["name", "shared"]), None).unwrap_err();
        assert_eq!(
            err,
            ConfigurationError::AmbiguousParameterSet {
                candidates: vec!["Left", "Right"]
            }
        );
    }

    #[test]
    fn given_fields_from_both_sets_when_resolving_then_no_match() {
        let err = resolve::<Mode>(&bound(&["name", "left_only", "right_only"]), None).unwrap_err();
        assert!(matches!(
            err,
            ConfigurationError::NoMatchingParameterSet { .. }
        ));
    }

    #[test]
    fn given_missing_required_when_resolving_then_no_match() {
        let err = resolve::<Mode>(&bound(&["left_only"]), None).unwrap_err();
        assert!(matches!(
            err,
            ConfigurationError::NoMatchingParameterSet { .. }
        ));
    }

    #[test]
    fn given_explicit_selector_when_ambiguous_then_selector_wins() {
        let set = resolve(&bound(&["name", "shared"]), Some(Mode::Right)).unwrap();
        assert_eq!(set, Mode::Right);
    }

    #[test]
    fn given_explicit_selector_without_required_when_resolving_then_error() {
        let err = resolve(&bound(&["shared"]), Some(Mode::Left)).unwrap_err();
        assert_eq!(
            err,
            ConfigurationError::MissingRequired {
                parameter_set: "Left",
                missing: vec!["name"]
            }
        );
    }

    #[test]
    fn given_set_name_in_any_case_when_looking_up_then_found() {
        assert_eq!(Mode::from_name("right").unwrap(), Mode::Right);
        assert!(Mode::from_name("middle").is_err());
    }

    #[test]
    fn given_bound_fields_when_listing_unused_then_reports_foreign_fields() {
        let b = bound(&["name", "right_only"]);
        assert_eq!(LEFT.unused(&b), vec!["right_only"]);
    }
}
