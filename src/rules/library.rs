// Named rule sets. Built-in automaton families plus anything merged in from a
// user library file ({ "name": [ state, ... ], ... }, order preserved).

use std::fmt;
use std::path::Path;

use anyhow::Context;
use log::{debug, info};
use rustc_hash::FxHashMap;
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::ruleset::{RuleList, RuleSet, StateDef};
use crate::core::{Result, TesseraError};

pub const GAME_OF_LIFE: &str = "game_of_life";
pub const HIGHLIFE: &str = "highlife";
pub const SEEDS: &str = "seeds";
pub const BRIANS_BRAIN: &str = "brians_brain";
pub const WIREWORLD: &str = "wireworld";

/// B3/S23.
pub fn game_of_life() -> RuleSet {
    RuleSet::from_defs(vec![
        StateDef::new("hsl(0, 0%, 10%)", RuleList::new().with("1:=3", 1)),
        StateDef::new(
            "hsl(0, 0%, 90%)",
            RuleList::new().with("1:<2|>3", 0).with("1:=2|=3", 1),
        ),
    ])
}

/// B36/S23.
pub fn highlife() -> RuleSet {
    RuleSet::from_defs(vec![
        StateDef::new("hsl(0, 0%, 10%)", RuleList::new().with("1:=3|=6", 1)),
        StateDef::new(
            "hsl(50, 90%, 70%)",
            RuleList::new().with("1:<2|>3", 0).with("1:=2|=3", 1),
        ),
    ])
}

/// B2/S. Every live cell dies; birth on exactly two live neighbours.
pub fn seeds() -> RuleSet {
    RuleSet::from_defs(vec![
        StateDef::new("hsl(0, 0%, 10%)", RuleList::new().with("1:=2", 1)),
        StateDef::new("hsl(200, 80%, 60%)", RuleList::new().with("default", 0)),
    ])
}

/// Off, on, dying. Off cells with two "on" neighbours fire; on cells always
/// decay to dying, dying cells always turn off.
pub fn brians_brain() -> RuleSet {
    RuleSet::from_defs(vec![
        StateDef::new("hsl(0, 0%, 10%)", RuleList::new().with("1:=2", 1)),
        StateDef::new("hsl(0, 0%, 95%)", RuleList::new().with("default", 2)),
        StateDef::new("hsl(220, 70%, 45%)", RuleList::new().with("default", 0)),
    ])
}

/// Empty, conductor, electron head, electron tail.
pub fn wireworld() -> RuleSet {
    RuleSet::from_defs(vec![
        StateDef::new("hsl(0, 0%, 5%)", RuleList::new()),
        StateDef::new("hsl(40, 90%, 50%)", RuleList::new().with("2:=1|=2", 2)),
        StateDef::new("hsl(210, 90%, 60%)", RuleList::new().with("default", 3)),
        StateDef::new("hsl(0, 85%, 55%)", RuleList::new().with("default", 1)),
    ])
}

#[derive(Debug, Clone, Default)]
pub struct RuleLibrary {
    sets: Vec<(Box<str>, RuleSet)>,
    index: FxHashMap<Box<str>, usize>,
}

impl RuleLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// All built-in families, Game of Life first.
    pub fn builtin() -> Self {
        let mut lib = Self::new();
        lib.insert(GAME_OF_LIFE, game_of_life());
        lib.insert(HIGHLIFE, highlife());
        lib.insert(SEEDS, seeds());
        lib.insert(BRIANS_BRAIN, brians_brain());
        lib.insert(WIREWORLD, wireworld());
        lib
    }

    /// Adds a rule set, replacing any existing one of the same name in place.
    /// Returns the position of the entry.
    pub fn insert(&mut self, name: &str, set: RuleSet) -> usize {
        if let Some(&i) = self.index.get(name) {
            debug!("rule set {:?} replaced", name);
            self.sets[i].1 = set;
            return i;
        }
        let i = self.sets.len();
        let boxed: Box<str> = name.into();
        self.index.insert(boxed.clone(), i);
        self.sets.push((boxed, set));
        i
    }

    pub fn get(&self, name: &str) -> Option<&RuleSet> {
        self.index.get(name).map(|&i| &self.sets[i].1)
    }

    pub fn require(&self, name: &str) -> Result<&RuleSet> {
        self.get(name).ok_or_else(|| TesseraError::UnknownRuleSet(name.to_string()))
    }

    pub fn get_index(&self, i: usize) -> Option<(&str, &RuleSet)> {
        self.sets.get(i).map(|(n, s)| (&**n, s))
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.sets.iter().map(|(n, _)| &**n)
    }

    pub fn len(&self) -> usize {
        self.sets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }

    /// Adds every entry of `other`, later entries overriding earlier ones.
    pub fn merge(&mut self, other: RuleLibrary) {
        for (name, set) in other.sets {
            self.insert(&name, set);
        }
    }

    pub fn from_json(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text)
    }

    pub fn load_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading rule library {}", path.display()))?;
        let lib = Self::from_json(&content)
            .with_context(|| format!("parsing rule library {}", path.display()))?;
        info!("loaded {} rule set(s) from {}", lib.len(), path.display());
        Ok(lib)
    }
}

impl Serialize for RuleLibrary {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.sets.len()))?;
        for (name, set) in &self.sets {
            map.serialize_entry(&**name, set)?;
        }
        map.end()
    }
}

struct LibraryVisitor;

impl<'de> Visitor<'de> for LibraryVisitor {
    type Value = RuleLibrary;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "a map of names to rule sets")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> std::result::Result<RuleLibrary, A::Error> {
        let mut lib = RuleLibrary::new();
        while let Some((name, set)) = access.next_entry::<String, RuleSet>()? {
            lib.insert(&name, set);
        }
        Ok(lib)
    }
}

impl<'de> Deserialize<'de> for RuleLibrary {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        deserializer.deserialize_map(LibraryVisitor)
    }
}
