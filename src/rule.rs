//! Survival/birth rules and their lookup table.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// Neighbor counts that keep a live cell alive (`survival`) or turn a dead
/// cell alive (`birth`).
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Rule {
    survival: BTreeSet<u32>,
    birth: BTreeSet<u32>,
}

impl Rule {
    pub fn new<S, B>(survival: S, birth: B) -> Self
    where
        S: IntoIterator<Item = u32>,
        B: IntoIterator<Item = u32>,
    {
        Self {
            survival: survival.into_iter().collect(),
            birth: birth.into_iter().collect(),
        }
    }

    /// B3/S23.
    pub fn conway() -> Self {
        Self::new([2, 3], [3])
    }

    pub fn survival(&self) -> &BTreeSet<u32> {
        &self.survival
    }

    pub fn birth(&self) -> &BTreeSet<u32> {
        &self.birth
    }

    /// Reject counts above `max`, the sum of the mask.
    pub fn validate(&self, max: u32) -> Result<()> {
        match self.survival.iter().chain(&self.birth).find(|&&c| c > max) {
            Some(&count) => Err(Error::InvalidRule { count, max }),
            None => Ok(()),
        }
    }
}

impl Default for Rule {
    fn default() -> Self {
        Self::conway()
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let wide = self.survival.iter().chain(&self.birth).any(|&c| c > 9);
        let write_set = |f: &mut fmt::Formatter<'_>, set: &BTreeSet<u32>| -> fmt::Result {
            for (i, c) in set.iter().enumerate() {
                if wide && i > 0 {
                    f.write_str(",")?;
                }
                write!(f, "{c}")?;
            }
            // keep a lone wide count from reading back as separate digits
            if wide && set.len() == 1 {
                f.write_str(",")?;
            }
            Ok(())
        };
        f.write_str("B")?;
        write_set(f, &self.birth)?;
        f.write_str("/S")?;
        write_set(f, &self.survival)
    }
}

/// Parses `B3/S23`, `S23/B3`, or the same with comma-separated counts
/// (`B34,35/S34,35,36`) for neighborhoods larger than nine cells.
impl FromStr for Rule {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let parse_err = |message: String| Error::Parse { line: 1, message };
        let mut birth = None;
        let mut survival = None;
        for part in s.trim().split('/') {
            let part = part.trim();
            let (slot, digits) = match part.chars().next() {
                Some('B' | 'b') => (&mut birth, &part[1..]),
                Some('S' | 's') => (&mut survival, &part[1..]),
                _ => return Err(parse_err(format!("expected B or S section, got {part:?}"))),
            };
            if slot.is_some() {
                return Err(parse_err(format!("duplicate section in {s:?}")));
            }
            let counts = if digits.contains(',') {
                digits
                    .split(',')
                    .filter(|d| !d.trim().is_empty())
                    .map(|d| d.trim().parse::<u32>())
                    .collect::<std::result::Result<BTreeSet<_>, _>>()
                    .map_err(|e| parse_err(format!("bad count in {part:?}: {e}")))?
            } else {
                digits
                    .chars()
                    .map(|ch| ch.to_digit(10))
                    .collect::<Option<BTreeSet<_>>>()
                    .ok_or_else(|| parse_err(format!("bad digit in {part:?}")))?
            };
            *slot = Some(counts);
        }
        match (survival, birth) {
            (Some(survival), Some(birth)) => Ok(Self { survival, birth }),
            _ => Err(parse_err(format!("rule {s:?} needs both B and S sections"))),
        }
    }
}

/// Precomputed next state indexed by `[alive][count]`.
///
/// Built once per automaton; the hot path is a single load per cell.
#[derive(Clone, Debug)]
pub struct RuleTable {
    table: [Vec<u8>; 2],
}

impl RuleTable {
    pub fn new(rule: &Rule, max_count: u32) -> Self {
        let len = max_count as usize + 1;
        let row = |set: &BTreeSet<u32>| -> Vec<u8> {
            (0..len as u32).map(|c| set.contains(&c) as u8).collect()
        };
        Self {
            table: [row(&rule.birth), row(&rule.survival)],
        }
    }

    #[inline(always)]
    pub fn lookup(&self, cell: u8, count: u32) -> u8 {
        let row = &self.table[(cell & 1) as usize];
        row.get(count as usize).copied().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::{Rule, RuleTable};
    use crate::error::Error;

    #[test]
    fn parses_and_prints_life() {
        let rule: Rule = "B3/S23".parse().unwrap();
        assert_eq!(rule, Rule::conway());
        assert_eq!(rule.to_string(), "B3/S23");
        let flipped: Rule = "s23/b3".parse().unwrap();
        assert_eq!(flipped, rule);
    }

    #[test]
    fn parses_wide_counts() {
        let rule: Rule = "B34,35/S34,58".parse().unwrap();
        assert!(rule.birth().contains(&35));
        assert!(rule.survival().contains(&58));
        assert_eq!(rule.to_string(), "B34,35/S34,58");

        let lone = Rule::new([40], [12]);
        assert_eq!(lone.to_string(), "B12,/S40,");
        assert_eq!(lone.to_string().parse::<Rule>().unwrap(), lone);
    }

    #[test]
    fn rejects_missing_section() {
        assert!(matches!("B3".parse::<Rule>(), Err(Error::Parse { .. })));
        assert!(matches!("B3/X2".parse::<Rule>(), Err(Error::Parse { .. })));
    }

    #[test]
    fn validate_rejects_unreachable_counts() {
        let rule = Rule::new([2, 9], [3]);
        assert!(matches!(
            rule.validate(8),
            Err(Error::InvalidRule { count: 9, max: 8 })
        ));
        assert!(Rule::conway().validate(8).is_ok());
    }

    #[test]
    fn table_matches_rule_membership() {
        let rule = Rule::new([1, 3, 5, 8], [3, 5, 7]);
        let table = RuleTable::new(&rule, 8);
        for count in 0..=8u32 {
            assert_eq!(table.lookup(1, count) == 1, rule.survival().contains(&count));
            assert_eq!(table.lookup(0, count) == 1, rule.birth().contains(&count));
        }
    }
}
