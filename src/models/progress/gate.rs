//! 章节完成判定
//!
//! 章节可被标记完成，当且仅当它没有作业，或者它的每个作业都已提交。

use std::collections::BTreeSet;

pub fn can_complete_section(section_assignments: &[i64], assignments_submitted: &BTreeSet<i64>) -> bool {
    section_assignments
        .iter()
        .all(|id| assignments_submitted.contains(id))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_section_without_assignments_is_completable() {
        assert!(can_complete_section(&[], &BTreeSet::new()));
    }

    #[test]
    fn test_requires_every_assignment() {
        let submitted = BTreeSet::from([1]);
        assert!(!can_complete_section(&[1, 2], &submitted));

        let submitted = BTreeSet::from([1, 2]);
        assert!(can_complete_section(&[1, 2], &submitted));
    }

    #[test]
    fn test_monotonic_in_submitted_set() {
        // 已满足的判定在提交集合变大后仍然满足
        let assignments = [3, 5];
        let mut submitted = BTreeSet::from([3, 5]);
        assert!(can_complete_section(&assignments, &submitted));
        for extra in [1, 7, 42] {
            submitted.insert(extra);
            assert!(can_complete_section(&assignments, &submitted));
        }
    }
}
