//! Change classification
//!
//! Maps the comparison flags of a step to exactly one category using an
//! ordered rule table. The first matching rule wins.

use super::change::{ChangeCategory, ChangeFlags};

/// One entry of the classification table
#[derive(Debug, Clone, Copy)]
pub struct ClassificationRule {
    pub name: &'static str,
    pub matches: fn(&ChangeFlags) -> bool,
    pub category: ChangeCategory,
}

fn reopened(flags: &ChangeFlags) -> bool {
    flags.is_reopening
}

fn first_completion(flags: &ChangeFlags) -> bool {
    flags.completion_occurred && !flags.is_reopening
}

fn date_only(flags: &ChangeFlags) -> bool {
    flags.date_changed && !flags.evidence_changed && !flags.is_reopening
}

// Evidence swaps on a completed, non-reopened step leave no audit entry,
// whether or not the date moved as well.
fn evidence_swap(flags: &ChangeFlags) -> bool {
    flags.evidence_changed && !flags.is_reopening
}

/// Classification rules in priority order
pub static RULES: &[ClassificationRule] = &[
    ClassificationRule {
        name: "reopening",
        matches: reopened,
        category: ChangeCategory::Reopening,
    },
    ClassificationRule {
        name: "completion",
        matches: first_completion,
        category: ChangeCategory::Completion,
    },
    ClassificationRule {
        name: "date-edit",
        matches: date_only,
        category: ChangeCategory::DateEdit,
    },
    ClassificationRule {
        name: "evidence-swap",
        matches: evidence_swap,
        category: ChangeCategory::Suppressed,
    },
];

/// Classify a set of flags; unmatched flags yield `NoChange`
pub fn classify(flags: &ChangeFlags) -> ChangeCategory {
    RULES
        .iter()
        .find(|rule| (rule.matches)(flags))
        .map(|rule| rule.category)
        .unwrap_or(ChangeCategory::NoChange)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flags(completion: bool, date: bool, evidence: bool, reopening: bool) -> ChangeFlags {
        ChangeFlags {
            completion_occurred: completion,
            date_changed: date,
            evidence_changed: evidence,
            is_reopening: reopening,
        }
    }

    #[test]
    fn test_every_flag_combination() {
        for bits in 0..16u8 {
            let f = flags(bits & 1 != 0, bits & 2 != 0, bits & 4 != 0, bits & 8 != 0);
            let expected = if f.is_reopening {
                ChangeCategory::Reopening
            } else if f.completion_occurred {
                ChangeCategory::Completion
            } else if f.date_changed && !f.evidence_changed {
                ChangeCategory::DateEdit
            } else if f.evidence_changed {
                ChangeCategory::Suppressed
            } else {
                ChangeCategory::NoChange
            };
            assert_eq!(classify(&f), expected, "flags: {:?}", f);
        }
    }

    #[test]
    fn test_reopening_subsumes_date_and_evidence() {
        assert_eq!(classify(&flags(false, true, true, true)), ChangeCategory::Reopening);
    }

    #[test]
    fn test_date_and_evidence_change_is_suppressed() {
        assert_eq!(classify(&flags(false, true, true, false)), ChangeCategory::Suppressed);
    }

    #[test]
    fn test_no_flags_is_no_change() {
        assert_eq!(classify(&ChangeFlags::default()), ChangeCategory::NoChange);
    }

    #[test]
    fn test_rule_order() {
        let names: Vec<_> = RULES.iter().map(|r| r.name).collect();
        assert_eq!(names, vec!["reopening", "completion", "date-edit", "evidence-swap"]);
    }
}
