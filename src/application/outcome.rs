//! Result of a command that passes through the confirmation gate.

/// What a mutating command did.
///
/// `Declined` is a clean no-op: the caller said no and nothing was sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome<T> {
    Completed(T),
    Declined,
}

impl<T> Outcome<T> {
    pub fn is_declined(&self) -> bool {
        matches!(self, Outcome::Declined)
    }

    pub fn completed(self) -> Option<T> {
        match self {
            Outcome::Completed(v) => Some(v),
            Outcome::Declined => None,
        }
    }
}
