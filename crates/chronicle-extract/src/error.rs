//! Extraction errors and their classification.

use chronicle_calc::CalcError;
use chronicle_state::StateError;

/// Why an event produced no rows.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExtractError {
    /// A state or rule-table read found nothing.
    #[error(transparent)]
    State(#[from] StateError),

    /// A derived-value calculation failed.
    #[error("derived value failed: {0}")]
    Calc(#[from] CalcError),

    /// Any other fault inside an extractor.
    #[error("extractor fault: {0}")]
    Internal(String),
}

/// Coarse error classes reported per skipped event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ErrorClass {
    /// A rule-table row is absent.
    MissingRuleData,
    /// Chain state assumed present is absent.
    MissingChainState,
    /// Anything else.
    Internal,
}

impl ErrorClass {
    /// Text form used in logs.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::MissingRuleData => "missing_rule_data",
            Self::MissingChainState => "missing_chain_state",
            Self::Internal => "internal",
        }
    }
}

impl ExtractError {
    /// The class this error is reported under.
    pub const fn class(&self) -> ErrorClass {
        match self {
            Self::State(StateError::MissingRuleData { .. }) => ErrorClass::MissingRuleData,
            Self::State(StateError::MissingChainState { .. }) => ErrorClass::MissingChainState,
            Self::Calc(_) | Self::Internal(_) => ErrorClass::Internal,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn state_errors_keep_their_class() {
        let rule = ExtractError::from(StateError::missing_rule("CharacterSheet", 1));
        let chain = ExtractError::from(StateError::missing_state("avatar", "ab"));
        assert_eq!(rule.class(), ErrorClass::MissingRuleData);
        assert_eq!(chain.class(), ErrorClass::MissingChainState);
        assert_eq!(
            ExtractError::from(CalcError::ZeroInterval).class(),
            ErrorClass::Internal
        );
    }
}
