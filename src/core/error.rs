use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum TesseraError {
    MalformedRuleKey(String),
    UnknownOperator(char),
    BadNumber(String),
    UnknownRuleSet(String),
    EmptyRuleSet,
    TooManyStates(usize),
    InvalidSpeed(f64),
    InvalidGeometry { width: usize, height: usize },
}

impl fmt::Display for TesseraError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MalformedRuleKey(key) => write!(f, "malformed rule key: {:?}", key),
            Self::UnknownOperator(op) => write!(f, "unknown condition operator: {:?}", op),
            Self::BadNumber(s) => write!(f, "not a non-negative integer: {:?}", s),
            Self::UnknownRuleSet(name) => write!(f, "unknown rule set: {}", name),
            Self::EmptyRuleSet => write!(f, "rule set defines no states"),
            Self::TooManyStates(n) => write!(f, "rule set defines {} states, at most 256 allowed", n),
            Self::InvalidSpeed(s) => write!(f, "speed must be positive and finite, got {}", s),
            Self::InvalidGeometry { width, height } => {
                write!(f, "grid would be {}x{} cells", width, height)
            }
        }
    }
}

impl std::error::Error for TesseraError {}

pub type Result<T> = std::result::Result<T, TesseraError>;
