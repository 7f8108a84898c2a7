use crate::command::ChatLine;

/// Errors from the host-side feeds.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SourceError {
    #[error("source unavailable: {0}")]
    Unavailable(String),
}

/// Supplies the participant names present right now.
///
/// Names should arrive trimmed and deduplicated; ordering is not trusted.
pub trait RosterSource {
    fn current(&self) -> Result<Vec<String>, SourceError>;
}

/// Supplies chat lines observed since the last poll.
pub trait CommandSource {
    fn poll(&mut self) -> Result<Vec<ChatLine>, SourceError>;
}

/// A fixed roster, for hosts that know participants up front and for tests.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StaticRoster(pub Vec<String>);

impl StaticRoster {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(names.into_iter().map(Into::into).collect())
    }
}

impl RosterSource for StaticRoster {
    fn current(&self) -> Result<Vec<String>, SourceError> {
        Ok(self.0.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn static_roster_returns_names() {
        let roster = StaticRoster::new(["bob", "Alice"]);
        assert_eq!(roster.current().unwrap(), ["bob", "Alice"]);
    }
}
