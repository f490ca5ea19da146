use crate::core::State;
use crate::rules::RuleList;

/// Resolve the next state of a cell.
///
/// Non-default entries are tried in order and the first whose key matches
/// wins. Failing that the `default` entry applies, and failing that the cell
/// keeps `current`. An entry whose result is unmapped or is not a state of
/// the rule set (`>= counts.len()`) is treated as a non-match.
pub fn next_state(current: State, counts: &[u8], rules: &RuleList) -> State {
    let k = counts.len();
    let valid = |s: State| (s as usize) < k;

    for entry in rules.conditional() {
        if let Some(result) = entry.result().filter(|&s| valid(s)) {
            if entry.key.matches(counts) {
                return result;
            }
        }
    }

    rules
        .default_entry()
        .and_then(|e| e.result())
        .filter(|&s| valid(s))
        .unwrap_or(current)
}
