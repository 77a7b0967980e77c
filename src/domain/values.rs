//! Enumerated field values and their fixed mappings onto remote codes.
//!
//! Every mapping is an exhaustive `match`, so adding a variant fails to
//! compile until each lookup table handles it.

use std::fmt;

use chrono::TimeDelta;
use serde::{Serialize, Serializer};

use crate::domain::error::ValidationError;

/// A closed set of string values accepted for a field.
///
/// Parsing is case-insensitive and yields the canonical spelling.
pub trait Enumerated: Sized + Copy + 'static {
    const VARIANTS: &'static [Self];

    fn as_str(self) -> &'static str;

    fn allowed() -> Vec<&'static str> {
        Self::VARIANTS.iter().map(|v| v.as_str()).collect()
    }

    fn parse_field(field: &'static str, value: &str) -> Result<Self, ValidationError> {
        let candidate = value.trim();
        Self::VARIANTS
            .iter()
            .copied()
            .find(|v| v.as_str().eq_ignore_ascii_case(candidate))
            .ok_or_else(|| ValidationError::NotAllowed {
                field,
                value: value.to_string(),
                allowed: Self::allowed(),
            })
    }
}

macro_rules! display_as_str {
    ($($ty:ty),* $(,)?) => {
        $(
            impl fmt::Display for $ty {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    f.write_str(self.as_str())
                }
            }
        )*
    };
}

/// Hyper-V replication provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplicationProvider {
    HyperVReplica2012R2,
    HyperVReplica2012,
    HyperVReplicaAzure,
}

impl Enumerated for ReplicationProvider {
    const VARIANTS: &'static [Self] = &[
        Self::HyperVReplica2012R2,
        Self::HyperVReplica2012,
        Self::HyperVReplicaAzure,
    ];

    fn as_str(self) -> &'static str {
        match self {
            Self::HyperVReplica2012R2 => "HyperVReplica2012R2",
            Self::HyperVReplica2012 => "HyperVReplica2012",
            Self::HyperVReplicaAzure => "HyperVReplicaAzure",
        }
    }
}

impl ReplicationProvider {
    /// The provider as a site-to-site provider, if it is one.
    pub fn on_premises(self) -> Option<OnPremisesProvider> {
        match self {
            Self::HyperVReplica2012R2 => Some(OnPremisesProvider::HyperVReplica2012R2),
            Self::HyperVReplica2012 => Some(OnPremisesProvider::HyperVReplica2012),
            Self::HyperVReplicaAzure => None,
        }
    }
}

/// Provider of a site-to-site policy; selects the request shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OnPremisesProvider {
    HyperVReplica2012R2,
    HyperVReplica2012,
}

/// Initial replication method for on-premises providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplicationMethod {
    Online,
    Offline,
}

impl ReplicationMethod {
    /// Remote spelling of the method.
    pub fn initial_replication_method(self) -> &'static str {
        match self {
            Self::Online => "OverNetwork",
            Self::Offline => "Offline",
        }
    }
}

impl Enumerated for ReplicationMethod {
    const VARIANTS: &'static [Self] = &[Self::Online, Self::Offline];

    fn as_str(self) -> &'static str {
        match self {
            Self::Online => "Online",
            Self::Offline => "Offline",
        }
    }
}

/// Replication frequency, entered in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplicationFrequency {
    Thirty,
    ThreeHundred,
    NineHundred,
}

impl ReplicationFrequency {
    /// Interval code understood by the replication service.
    pub fn interval_code(self) -> u16 {
        match self {
            Self::Thirty => 30,
            Self::ThreeHundred => 300,
            Self::NineHundred => 900,
        }
    }
}

impl Enumerated for ReplicationFrequency {
    const VARIANTS: &'static [Self] = &[Self::Thirty, Self::ThreeHundred, Self::NineHundred];

    fn as_str(self) -> &'static str {
        match self {
            Self::Thirty => "30",
            Self::ThreeHundred => "300",
            Self::NineHundred => "900",
        }
    }
}

/// Enable/Disable switch (compression, encryption).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum Toggle {
    Enable,
    #[default]
    Disable,
}

impl Enumerated for Toggle {
    const VARIANTS: &'static [Self] = &[Self::Enable, Self::Disable];

    fn as_str(self) -> &'static str {
        match self {
            Self::Enable => "Enable",
            Self::Disable => "Disable",
        }
    }
}

/// Authentication between on-premises replica servers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Authentication {
    #[default]
    Certificate,
    Kerberos,
}

impl Authentication {
    /// Numeric authentication type code.
    pub fn allowed_authentication_type(self) -> u16 {
        match self {
            Self::Kerberos => 1,
            Self::Certificate => 2,
        }
    }
}

impl Enumerated for Authentication {
    const VARIANTS: &'static [Self] = &[Self::Certificate, Self::Kerberos];

    fn as_str(self) -> &'static str {
        match self {
            Self::Certificate => "Certificate",
            Self::Kerberos => "Kerberos",
        }
    }
}

/// Whether the replica is deleted when protection is disabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum ReplicaDeletion {
    Required,
    #[default]
    NotRequired,
}

impl Enumerated for ReplicaDeletion {
    const VARIANTS: &'static [Self] = &[Self::Required, Self::NotRequired];

    fn as_str(self) -> &'static str {
        match self {
            Self::Required => "Required",
            Self::NotRequired => "NotRequired",
        }
    }
}

display_as_str!(
    ReplicationProvider,
    ReplicationMethod,
    ReplicationFrequency,
    Toggle,
    Authentication,
    ReplicaDeletion,
);

const SECONDS_PER_DAY: i64 = 86_400;

/// Time of day at which online replication starts.
///
/// Accepts `[d.]hh:mm[:ss]`, bounded to `00:00:00..=1.00:00:00`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StartTime(TimeDelta);

impl StartTime {
    pub fn parse_field(field: &'static str, value: &str) -> Result<Self, ValidationError> {
        let invalid = || ValidationError::InvalidTimeSpan {
            field,
            value: value.to_string(),
        };

        let trimmed = value.trim();
        let (days, clock) = match trimmed.split_once('.') {
            Some((d, rest)) if !d.contains(':') => (parse_digits(d).ok_or_else(invalid)?, rest),
            _ => (0, trimmed),
        };

        let parts: Vec<&str> = clock.split(':').collect();
        let (hours, minutes, seconds) = match parts.as_slice() {
            [h, m] => (*h, *m, "0"),
            [h, m, s] => (*h, *m, *s),
            _ => return Err(invalid()),
        };
        let hours = parse_digits(hours).filter(|h| *h < 24).ok_or_else(invalid)?;
        let minutes = parse_digits(minutes).filter(|m| *m < 60).ok_or_else(invalid)?;
        let seconds = parse_digits(seconds).filter(|s| *s < 60).ok_or_else(invalid)?;

        let total = days
            .checked_mul(SECONDS_PER_DAY)
            .and_then(|d| d.checked_add(hours * 3600 + minutes * 60 + seconds))
            .filter(|t| *t <= SECONDS_PER_DAY)
            .ok_or_else(invalid)?;

        Ok(Self(TimeDelta::seconds(total)))
    }
}

fn parse_digits(s: &str) -> Option<i64> {
    if s.is_empty() || !s.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

impl fmt::Display for StartTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let total = self.0.num_seconds();
        let days = total / SECONDS_PER_DAY;
        let rem = total % SECONDS_PER_DAY;
        let (h, m, s) = (rem / 3600, (rem % 3600) / 60, rem % 60);
        if days > 0 {
            write!(f, "{}.{:02}:{:02}:{:02}", days, h, m, s)
        } else {
            write!(f, "{:02}:{:02}:{:02}", h, m, s)
        }
    }
}

impl Serialize for StartTime {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("hypervreplicaazure", ReplicationProvider::HyperVReplicaAzure)]
    #[case("HyperVReplica2012", ReplicationProvider::HyperVReplica2012)]
    #[case(" HyperVReplica2012R2 ", ReplicationProvider::HyperVReplica2012R2)]
    fn given_provider_in_any_case_when_parsing_then_canonicalizes(
        #[case] input: &str,
        #[case] expected: ReplicationProvider,
    ) {
        assert_eq!(
            ReplicationProvider::parse_field("replication_provider", input).unwrap(),
            expected
        );
    }

    #[rstest]
    #[case(ReplicationProvider::HyperVReplica2012R2, Some(OnPremisesProvider::HyperVReplica2012R2))]
    #[case(ReplicationProvider::HyperVReplica2012, Some(OnPremisesProvider::HyperVReplica2012))]
    #[case(ReplicationProvider::HyperVReplicaAzure, None)]
    fn given_provider_when_narrowing_to_on_premises_then_azure_excluded(
        #[case] provider: ReplicationProvider,
        #[case] expected: Option<OnPremisesProvider>,
    ) {
        assert_eq!(provider.on_premises(), expected);
    }

    #[test]
    fn given_unknown_value_when_parsing_then_error_names_field_and_allowed_values() {
        let err = Authentication::parse_field("authentication", "ntlm").unwrap_err();
        assert_eq!(
            err,
            ValidationError::NotAllowed {
                field: "authentication",
                value: "ntlm".into(),
                allowed: vec!["Certificate", "Kerberos"],
            }
        );
        assert!(err.to_string().contains("Certificate, Kerberos"));
    }

    #[rstest]
    #[case("30", 30)]
    #[case("300", 300)]
    #[case("900", 900)]
    fn given_frequency_when_mapping_then_uses_fixed_table(#[case] input: &str, #[case] code: u16) {
        let freq = ReplicationFrequency::parse_field("replication_frequency_in_seconds", input)
            .unwrap();
        assert_eq!(freq.interval_code(), code);
    }

    #[rstest]
    #[case("60")]
    #[case("0")]
    #[case("3600")]
    fn given_frequency_outside_table_when_parsing_then_rejected(#[case] input: &str) {
        assert!(
            ReplicationFrequency::parse_field("replication_frequency_in_seconds", input).is_err()
        );
    }

    #[test]
    fn given_authentication_when_mapping_then_kerberos_is_one_certificate_is_two() {
        assert_eq!(Authentication::Kerberos.allowed_authentication_type(), 1);
        assert_eq!(Authentication::Certificate.allowed_authentication_type(), 2);
    }

    #[test]
    fn given_replication_method_when_mapping_then_online_is_over_network() {
        assert_eq!(
            ReplicationMethod::Online.initial_replication_method(),
            "OverNetwork"
        );
        assert_eq!(
            ReplicationMethod::Offline.initial_replication_method(),
            "Offline"
        );
    }

    #[rstest]
    #[case("10:30", "10:30:00")]
    #[case("23:59:59", "23:59:59")]
    #[case("00:00", "00:00:00")]
    #[case("1.00:00:00", "1.00:00:00")]
    #[case("0.04:05:06", "04:05:06")]
    fn given_valid_start_time_when_parsing_then_formats_as_time_span(
        #[case] input: &str,
        #[case] expected: &str,
    ) {
        let t = StartTime::parse_field("replication_start_time", input).unwrap();
        assert_eq!(t.to_string(), expected);
    }

    #[rstest]
    #[case("24:00")]
    #[case("1.00:00:01")]
    #[case("-01:00")]
    #[case("10")]
    #[case("10:60")]
    #[case("ab:cd")]
    #[case("")]
    fn given_invalid_start_time_when_parsing_then_rejected(#[case] input: &str) {
        let err = StartTime::parse_field("replication_start_time", input).unwrap_err();
        assert!(matches!(err, ValidationError::InvalidTimeSpan { .. }));
    }
}
