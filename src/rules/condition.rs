// Condition grammar for rule keys.
//
//   key       := "default" | target ":" condition ("|" condition)*
//   condition := op threshold
//   op        := "=" | "<" | ">"
//
// A key is a disjunction: it holds when any of its conditions holds for the
// neighbour count of `target`. Keys are parsed once when a rule set is loaded.

use std::fmt;

use log::warn;
use serde::{Deserialize, Serialize};

use crate::core::{Result, State, TesseraError};

/// Reserved key for the fallback entry of a rule list.
pub const DEFAULT_KEY: &str = "default";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Op {
    Eq,
    Lt,
    Gt,
}

impl Op {
    pub fn from_char(c: char) -> Result<Self> {
        match c {
            '=' => Ok(Op::Eq),
            '<' => Ok(Op::Lt),
            '>' => Ok(Op::Gt),
            other => Err(TesseraError::UnknownOperator(other)),
        }
    }

    pub fn symbol(self) -> char {
        match self {
            Op::Eq => '=',
            Op::Lt => '<',
            Op::Gt => '>',
        }
    }

    #[inline]
    pub fn holds(self, lhs: u32, rhs: u32) -> bool {
        match self {
            Op::Eq => lhs == rhs,
            Op::Lt => lhs < rhs,
            Op::Gt => lhs > rhs,
        }
    }
}

/// `counts[target] op threshold`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Condition {
    pub target: State,
    pub op: Op,
    pub threshold: u32,
}

impl Condition {
    pub fn new(target: State, op: Op, threshold: u32) -> Self {
        Self { target, op, threshold }
    }

    /// A target outside `counts` never matches.
    #[inline]
    pub fn matches(&self, counts: &[u8]) -> bool {
        counts
            .get(self.target as usize)
            .map_or(false, |&n| self.op.holds(n as u32, self.threshold))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RuleKey {
    Default,
    /// Disjunction of conditions. Empty means the key never matches.
    Any(Vec<Condition>),
}

impl RuleKey {
    pub fn any(target: State, conditions: &[(Op, u32)]) -> Self {
        RuleKey::Any(
            conditions
                .iter()
                .map(|&(op, n)| Condition::new(target, op, n))
                .collect(),
        )
    }

    pub fn is_default(&self) -> bool {
        matches!(self, RuleKey::Default)
    }

    /// Evaluates a non-default key. The default key is not a condition and
    /// never matches here.
    pub fn matches(&self, counts: &[u8]) -> bool {
        match self {
            RuleKey::Default => false,
            RuleKey::Any(conds) => conds.iter().any(|c| c.matches(counts)),
        }
    }

    /// Strict parse: every part of the key must be well formed.
    pub fn parse(key: &str) -> Result<Self> {
        let key = key.trim();
        if key == DEFAULT_KEY {
            return Ok(RuleKey::Default);
        }
        let (target, rest) = split_target(key)?;
        let conditions = rest
            .split('|')
            .map(|part| parse_condition(target, part))
            .collect::<Result<Vec<_>>>()?;
        Ok(RuleKey::Any(conditions))
    }

    /// Lenient parse used when loading rule sets: malformed conditions are
    /// dropped from the disjunction, a malformed target yields a key that
    /// never matches.
    pub fn parse_lenient(key: &str) -> Self {
        let trimmed = key.trim();
        if trimmed == DEFAULT_KEY {
            return RuleKey::Default;
        }
        let (target, rest) = match split_target(trimmed) {
            Ok(parts) => parts,
            Err(e) => {
                warn!("rule key {:?} ignored: {}", key, e);
                return RuleKey::Any(Vec::new());
            }
        };
        let mut conditions = Vec::new();
        for part in rest.split('|') {
            match parse_condition(target, part) {
                Ok(c) => conditions.push(c),
                Err(e) => warn!("condition {:?} in rule key {:?} skipped: {}", part, key, e),
            }
        }
        RuleKey::Any(conditions)
    }
}

impl fmt::Display for RuleKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuleKey::Default => write!(f, "{}", DEFAULT_KEY),
            RuleKey::Any(conds) => {
                // Conditions of one key share a target.
                let target = conds.first().map(|c| c.target).unwrap_or(0);
                write!(f, "{}:", target)?;
                for (i, c) in conds.iter().enumerate() {
                    if i > 0 {
                        write!(f, "|")?;
                    }
                    write!(f, "{}{}", c.op.symbol(), c.threshold)?;
                }
                Ok(())
            }
        }
    }
}

fn split_target(key: &str) -> Result<(State, &str)> {
    let (target, rest) = key
        .split_once(':')
        .ok_or_else(|| TesseraError::MalformedRuleKey(key.to_string()))?;
    if rest.trim().is_empty() {
        return Err(TesseraError::MalformedRuleKey(key.to_string()));
    }
    Ok((parse_number(target)?, rest))
}

fn parse_condition(target: State, part: &str) -> Result<Condition> {
    let part = part.trim();
    let mut chars = part.chars();
    let op = chars
        .next()
        .ok_or_else(|| TesseraError::MalformedRuleKey(part.to_string()))?;
    let op = Op::from_char(op)?;
    let threshold = parse_number(chars.as_str())?;
    Ok(Condition::new(target, op, threshold))
}

fn parse_number<T: std::str::FromStr>(s: &str) -> Result<T> {
    let s = s.trim();
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return Err(TesseraError::BadNumber(s.to_string()));
    }
    s.parse().map_err(|_| TesseraError::BadNumber(s.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_disjunction() {
        let key = RuleKey::parse("1:<2|>3").unwrap();
        assert_eq!(key, RuleKey::any(1, &[(Op::Lt, 2), (Op::Gt, 3)]));
        assert_eq!(key.to_string(), "1:<2|>3");
    }

    #[test]
    fn parses_default() {
        assert_eq!(RuleKey::parse("default").unwrap(), RuleKey::Default);
        assert!(RuleKey::parse_lenient(" default ").is_default());
    }

    #[test]
    fn strict_rejects_malformed() {
        assert_eq!(RuleKey::parse("1:~3"), Err(TesseraError::UnknownOperator('~')));
        assert!(matches!(RuleKey::parse("1=3"), Err(TesseraError::MalformedRuleKey(_))));
        assert!(matches!(RuleKey::parse("x:=3"), Err(TesseraError::BadNumber(_))));
        assert!(matches!(RuleKey::parse("1:=-3"), Err(TesseraError::BadNumber(_))));
        assert!(matches!(RuleKey::parse("1:"), Err(TesseraError::MalformedRuleKey(_))));
    }

    #[test]
    fn lenient_skips_bad_conditions() {
        let key = RuleKey::parse_lenient("1:=2|?5|>6");
        assert_eq!(key, RuleKey::any(1, &[(Op::Eq, 2), (Op::Gt, 6)]));
        assert_eq!(RuleKey::parse_lenient("garbage"), RuleKey::Any(vec![]));
    }

    #[test]
    fn matching() {
        let key = RuleKey::parse("1:=2|=3").unwrap();
        assert!(key.matches(&[6, 2]));
        assert!(key.matches(&[5, 3]));
        assert!(!key.matches(&[4, 4]));
        // Target beyond the count vector is a non-match.
        assert!(!RuleKey::parse("5:=0").unwrap().matches(&[8, 0]));
        assert!(!RuleKey::Default.matches(&[8]));
        assert!(!RuleKey::Any(vec![]).matches(&[8]));
    }
}
