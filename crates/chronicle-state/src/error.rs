//! Errors raised when a state or rule-table read finds nothing.

/// A read through the state reader found no value where one was required.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StateError {
    /// A rule-table row that parameterizes a derived value is absent.
    #[error("missing rule data: {sheet} has no row for {key}")]
    MissingRuleData {
        /// Sheet name.
        sheet: &'static str,
        /// Lookup key that found nothing.
        key: String,
    },

    /// Chain state assumed present in the snapshot is absent.
    #[error("missing chain state: {what} for {key}")]
    MissingChainState {
        /// What was looked up (avatar, stake, order, ...).
        what: &'static str,
        /// Address or id looked up.
        key: String,
    },
}

impl StateError {
    /// Shorthand for [`StateError::MissingChainState`].
    pub fn missing_state(what: &'static str, key: impl ToString) -> Self {
        Self::MissingChainState {
            what,
            key: key.to_string(),
        }
    }

    /// Shorthand for [`StateError::MissingRuleData`].
    pub fn missing_rule(sheet: &'static str, key: impl ToString) -> Self {
        Self::MissingRuleData {
            sheet,
            key: key.to_string(),
        }
    }
}
