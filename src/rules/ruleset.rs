// Rule sets: an ordered list of state definitions, each with an opaque display
// attribute and an ordered rule list.
//
// On disk a rule list is a JSON object whose keys are rule keys and whose
// values are result states. Entry order is significant (first match wins), so
// the list is read through a map visitor into a Vec and written back in the
// same order with the original key text.

use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::condition::RuleKey;
use crate::core::{Result, State, TesseraError};

/// Result side of a rule entry.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    State(State),
    /// Anything that is not an integer state id. Kept verbatim so the rule
    /// list round-trips; the entry never matches.
    Unmapped(serde_json::Value),
}

impl Outcome {
    fn from_value(value: serde_json::Value) -> Self {
        match value.as_u64() {
            Some(n) if n <= State::MAX as u64 => Outcome::State(n as State),
            _ => Outcome::Unmapped(value),
        }
    }

    pub fn state(&self) -> Option<State> {
        match self {
            Outcome::State(s) => Some(*s),
            Outcome::Unmapped(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RuleEntry {
    source: String,
    pub key: RuleKey,
    pub outcome: Outcome,
}

impl RuleEntry {
    /// Parses `source` leniently; see [`RuleKey::parse_lenient`].
    pub fn new(source: impl Into<String>, outcome: Outcome) -> Self {
        let source = source.into();
        let key = RuleKey::parse_lenient(&source);
        Self { source, key, outcome }
    }

    /// Key text exactly as it was loaded.
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn is_default(&self) -> bool {
        self.key.is_default()
    }

    pub fn result(&self) -> Option<State> {
        self.outcome.state()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RuleList {
    entries: Vec<RuleEntry>,
}

impl RuleList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style append.
    pub fn with(mut self, key: &str, result: State) -> Self {
        self.push(key, result);
        self
    }

    pub fn push(&mut self, key: &str, result: State) {
        self.entries.push(RuleEntry::new(key, Outcome::State(result)));
    }

    pub fn entries(&self) -> &[RuleEntry] {
        &self.entries
    }

    /// Non-default entries in evaluation order.
    pub fn conditional(&self) -> impl Iterator<Item = &RuleEntry> {
        self.entries.iter().filter(|e| !e.is_default())
    }

    /// The first `default` entry, wherever it sits in the list.
    pub fn default_entry(&self) -> Option<&RuleEntry> {
        self.entries.iter().find(|e| e.is_default())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for RuleList {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for entry in &self.entries {
            match &entry.outcome {
                Outcome::State(s) => map.serialize_entry(&entry.source, s)?,
                Outcome::Unmapped(v) => map.serialize_entry(&entry.source, v)?,
            }
        }
        map.end()
    }
}

struct RuleListVisitor;

impl<'de> Visitor<'de> for RuleListVisitor {
    type Value = RuleList;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "a map of rule keys to result states")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> std::result::Result<RuleList, A::Error> {
        let mut entries: Vec<RuleEntry> = Vec::with_capacity(access.size_hint().unwrap_or(0));
        while let Some((key, value)) = access.next_entry::<String, serde_json::Value>()? {
            let outcome = Outcome::from_value(value);
            // A repeated key keeps its first position and takes the last value.
            match entries.iter_mut().find(|e| e.source == key) {
                Some(existing) => existing.outcome = outcome,
                None => entries.push(RuleEntry::new(key, outcome)),
            }
        }
        Ok(RuleList { entries })
    }
}

impl<'de> Deserialize<'de> for RuleList {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        deserializer.deserialize_map(RuleListVisitor)
    }
}

/// One state of a rule set. `color` is never interpreted by the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateDef {
    pub color: String,
    #[serde(default)]
    pub rules: RuleList,
}

impl StateDef {
    pub fn new(color: impl Into<String>, rules: RuleList) -> Self {
        Self { color: color.into(), rules }
    }
}

/// An automaton family. Index in `states` is the state id; the length is `K`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<StateDef>", into = "Vec<StateDef>")]
pub struct RuleSet {
    states: Vec<StateDef>,
}

impl RuleSet {
    pub fn new(states: Vec<StateDef>) -> Result<Self> {
        match states.len() {
            0 => Err(TesseraError::EmptyRuleSet),
            n if n > State::MAX as usize + 1 => Err(TesseraError::TooManyStates(n)),
            _ => Ok(Self { states }),
        }
    }

    /// For built-in tables known to hold between 1 and 256 states.
    pub(crate) fn from_defs(states: Vec<StateDef>) -> Self {
        debug_assert!(!states.is_empty() && states.len() <= State::MAX as usize + 1);
        Self { states }
    }

    /// `K`, the number of states.
    pub fn state_count(&self) -> usize {
        self.states.len()
    }

    pub fn max_state(&self) -> State {
        (self.states.len() - 1) as State
    }

    pub fn states(&self) -> &[StateDef] {
        &self.states
    }

    pub fn state(&self, s: State) -> Option<&StateDef> {
        self.states.get(s as usize)
    }

    pub fn rules_for(&self, s: State) -> Option<&RuleList> {
        self.state(s).map(|d| &d.rules)
    }

    pub fn color(&self, s: State) -> Option<&str> {
        self.state(s).map(|d| d.color.as_str())
    }

    pub fn from_json(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

impl TryFrom<Vec<StateDef>> for RuleSet {
    type Error = TesseraError;

    fn try_from(states: Vec<StateDef>) -> Result<Self> {
        RuleSet::new(states)
    }
}

impl From<RuleSet> for Vec<StateDef> {
    fn from(set: RuleSet) -> Self {
        set.states
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::condition::Op;

    const GOL_JSON: &str = r#"[
        { "color": "hsl(0, 0%, 10%)", "rules": { "1:=3": 1 } },
        { "color": "hsl(0, 0%, 90%)", "rules": { "1:<2|>3": 0, "1:=2|=3": 1 } }
    ]"#;

    #[test]
    fn loads_source_format() {
        let set = RuleSet::from_json(GOL_JSON).unwrap();
        assert_eq!(set.state_count(), 2);
        assert_eq!(set.color(1), Some("hsl(0, 0%, 90%)"));
        let alive = set.rules_for(1).unwrap();
        assert_eq!(alive.len(), 2);
        assert_eq!(alive.entries()[0].source(), "1:<2|>3");
        assert_eq!(alive.entries()[0].key, RuleKey::any(1, &[(Op::Lt, 2), (Op::Gt, 3)]));
        assert_eq!(alive.entries()[1].result(), Some(1));
    }

    #[test]
    fn round_trip_preserves_order_and_text() {
        // Keys deliberately out of lexical order.
        let text = r#"[{"color":"a","rules":{"2:>1":1,"default":0,"0:=8":2,"1:bogus":"x"}}]"#;
        let set = RuleSet::from_json(text).unwrap();
        let out = serde_json::to_string(&set).unwrap();
        assert_eq!(out, text);
        let again = RuleSet::from_json(&out).unwrap();
        assert_eq!(again, set);
    }

    #[test]
    fn default_entry_found_anywhere() {
        let list = RuleList::new().with("default", 2).with("0:>1", 1);
        assert_eq!(list.default_entry().and_then(|e| e.result()), Some(2));
        assert_eq!(list.conditional().count(), 1);
    }

    #[test]
    fn repeated_key_keeps_position_takes_last_value() {
        let set = RuleSet::from_json(r#"[{"color":"c","rules":{"1:=3":1,"1:>4":0,"1:=3":0}}]"#).unwrap();
        let entries = set.rules_for(0).unwrap().entries();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].source(), "1:=3");
        assert_eq!(entries[0].result(), Some(0));
        assert_eq!(entries[1].source(), "1:>4");
    }

    #[test]
    fn unmapped_results_are_kept() {
        let set = RuleSet::from_json(r#"[{"color":"c","rules":{"0:=1":"one","0:=2":300}}]"#).unwrap();
        let entries = set.rules_for(0).unwrap().entries();
        assert_eq!(entries[0].result(), None);
        assert_eq!(entries[1].result(), None);
    }

    #[test]
    fn empty_rule_set_rejected() {
        assert!(RuleSet::from_json("[]").is_err());
        assert_eq!(RuleSet::new(vec![]), Err(TesseraError::EmptyRuleSet));
    }

    #[test]
    fn missing_rules_field_is_empty_list() {
        let set = RuleSet::from_json(r#"[{"color":"black"}]"#).unwrap();
        assert!(set.rules_for(0).unwrap().is_empty());
    }
}
