pub mod condition;
pub mod library;
pub mod ruleset;

pub use condition::{Condition, Op, RuleKey, DEFAULT_KEY};
pub use library::RuleLibrary;
pub use ruleset::{Outcome, RuleEntry, RuleList, RuleSet, StateDef};
