use serde::Serialize;
use std::str::FromStr;

pub const DEFAULT_MILESTONES: [u32; 8] = [1, 5, 10, 30, 50, 100, 500, 1000];

/// Ascending, deduplicated, strictly positive celebration thresholds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct MilestoneTable(Vec<u32>);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MilestoneOutcome {
    pub reached: Option<u32>,
    pub acknowledged: u32,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum MilestoneParseError {
    #[error("milestone `{0}` is not a positive integer")]
    Invalid(String),
    #[error("milestone list is empty")]
    Empty,
}

impl MilestoneTable {
    pub fn new(values: impl IntoIterator<Item = u32>) -> Self {
        let mut values: Vec<u32> = values.into_iter().filter(|value| *value > 0).collect();
        values.sort_unstable();
        values.dedup();
        Self(values)
    }

    pub fn values(&self) -> &[u32] {
        &self.0
    }

    pub fn contains(&self, value: u32) -> bool {
        self.0.binary_search(&value).is_ok()
    }
}

impl Default for MilestoneTable {
    fn default() -> Self {
        Self::new(DEFAULT_MILESTONES)
    }
}

impl FromStr for MilestoneTable {
    type Err = MilestoneParseError;

    /// Parses a comma separated list such as `1,7,30`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut values = Vec::new();
        for part in s.split(',').map(str::trim).filter(|part| !part.is_empty()) {
            match part.parse::<u32>() {
                Ok(value) if value > 0 => values.push(value),
                _ => return Err(MilestoneParseError::Invalid(part.to_string())),
            }
        }
        if values.is_empty() {
            return Err(MilestoneParseError::Empty);
        }
        Ok(Self::new(values))
    }
}

/// Decides whether this check-in newly reached a milestone.
///
/// A step of at most one (including the restart to 1) reaches a milestone
/// only by landing exactly on it. If the count jumped further (state written
/// by something else), the largest entry not above `new_count` that was never
/// acknowledged wins.
pub fn evaluate(
    table: &MilestoneTable,
    previous_count: u32,
    new_count: u32,
    previous_acknowledged: u32,
) -> MilestoneOutcome {
    let unchanged = MilestoneOutcome {
        reached: None,
        acknowledged: previous_acknowledged,
    };
    if new_count == previous_count {
        return unchanged;
    }

    let reached = if new_count <= previous_count.saturating_add(1) {
        (table.contains(new_count) && new_count > previous_acknowledged).then_some(new_count)
    } else {
        table
            .values()
            .iter()
            .rev()
            .copied()
            .find(|m| *m <= new_count && *m > previous_acknowledged)
    };

    match reached {
        Some(m) => MilestoneOutcome {
            reached: Some(m),
            acknowledged: m,
        },
        None => unchanged,
    }
}

pub fn celebration_label(milestone: u32) -> String {
    if milestone == 1 {
        "First check-in! 🎉".to_string()
    } else {
        format!("{milestone}-day streak! 🎉")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(values: &[u32]) -> MilestoneTable {
        MilestoneTable::new(values.iter().copied())
    }

    #[test]
    fn table_is_sorted_and_deduplicated() {
        let t = table(&[10, 0, 5, 1, 5]);
        assert_eq!(t.values(), &[1, 5, 10]);
        assert!(t.contains(5));
        assert!(!t.contains(0));
    }

    #[test]
    fn parses_comma_list() {
        let t: MilestoneTable = " 7, 3 ,30".parse().expect("valid list");
        assert_eq!(t.values(), &[3, 7, 30]);
        assert_eq!(
            "3,x".parse::<MilestoneTable>(),
            Err(MilestoneParseError::Invalid("x".to_string()))
        );
        assert_eq!("0".parse::<MilestoneTable>(), Err(MilestoneParseError::Invalid("0".to_string())));
        assert_eq!(" , ".parse::<MilestoneTable>(), Err(MilestoneParseError::Empty));
    }

    #[test]
    fn consecutive_counts_hit_each_milestone_once() {
        let t = table(&[1, 5, 10]);
        let mut acknowledged = 0;
        let mut previous = 0;
        let mut seen = Vec::new();
        for count in 1..=5 {
            let outcome = evaluate(&t, previous, count, acknowledged);
            seen.push(outcome.reached);
            acknowledged = outcome.acknowledged;
            previous = count;
        }
        assert_eq!(seen, vec![Some(1), None, None, None, Some(5)]);
        assert_eq!(acknowledged, 5);
    }

    #[test]
    fn jump_selects_largest_qualifying_milestone() {
        let outcome = evaluate(&table(&[1, 5, 10]), 4, 12, 1);
        assert_eq!(
            outcome,
            MilestoneOutcome {
                reached: Some(10),
                acknowledged: 10
            }
        );
    }

    #[test]
    fn single_step_must_land_on_a_milestone() {
        let t = table(&[1, 5, 10]);
        // No acknowledgment recorded yet, as older data files look.
        assert_eq!(
            evaluate(&t, 6, 7, 0),
            MilestoneOutcome {
                reached: None,
                acknowledged: 0
            }
        );
        assert_eq!(evaluate(&t, 9, 10, 0).reached, Some(10));
        assert_eq!(evaluate(&t, 6, 1, 0).reached, Some(1));
    }

    #[test]
    fn unchanged_count_never_triggers() {
        let outcome = evaluate(&table(&[1, 5, 10]), 5, 5, 0);
        assert_eq!(outcome.reached, None);
        assert_eq!(outcome.acknowledged, 0);
    }

    #[test]
    fn acknowledged_milestone_is_not_shown_again() {
        let t = table(&[1, 5, 10]);
        assert_eq!(evaluate(&t, 4, 5, 5).reached, None);
        // After a gap the count restarts but earlier celebrations stay acknowledged.
        assert_eq!(evaluate(&t, 7, 1, 5).reached, None);
        assert_eq!(evaluate(&t, 9, 10, 5).reached, Some(10));
    }

    #[test]
    fn labels() {
        assert_eq!(celebration_label(1), "First check-in! 🎉");
        assert_eq!(celebration_label(30), "30-day streak! 🎉");
    }
}
