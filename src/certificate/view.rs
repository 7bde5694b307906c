//! Presentation helpers
//!
//! Derived views over a certificate's flat violation list. None of this is
//! part of the certificate's canonical shape.

use serde::Serialize;
use std::collections::HashMap;

use crate::rules::{RuleId, Violation, ViolationSeverity};

/// Error and warning totals
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SeverityCounts {
    pub errors: usize,
    pub warnings: usize,
}

/// Counts violations by severity
pub fn count_by_severity(violations: &[Violation]) -> SeverityCounts {
    violations
        .iter()
        .fold(SeverityCounts::default(), |mut counts, v| {
            match v.severity {
                ViolationSeverity::Error => counts.errors += 1,
                ViolationSeverity::Warning => counts.warnings += 1,
            }
            counts
        })
}

/// Violations of one rule type
#[derive(Debug, Clone, PartialEq)]
pub struct ViolationGroup<'a> {
    pub rule: RuleId,
    pub violations: Vec<&'a Violation>,
}

impl ViolationGroup<'_> {
    pub fn severity(&self) -> ViolationSeverity {
        self.rule.severity()
    }

    pub fn len(&self) -> usize {
        self.violations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }
}

/// Mapping from rule type to its violations, in first-appearance order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ViolationGroups<'a> {
    groups: Vec<ViolationGroup<'a>>,
}

impl<'a> ViolationGroups<'a> {
    /// Groups violations in a single pass, preserving order within groups
    pub fn from_violations(violations: &'a [Violation]) -> Self {
        let mut slots: HashMap<RuleId, usize> = HashMap::new();
        let mut groups: Vec<ViolationGroup<'a>> = Vec::new();
        for violation in violations {
            let slot = *slots.entry(violation.rule).or_insert_with(|| {
                groups.push(ViolationGroup {
                    rule: violation.rule,
                    violations: Vec::new(),
                });
                groups.len() - 1
            });
            groups[slot].violations.push(violation);
        }
        Self { groups }
    }

    pub fn get(&self, rule: RuleId) -> Option<&ViolationGroup<'a>> {
        self.groups.iter().find(|g| g.rule == rule)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ViolationGroup<'a>> {
        self.groups.iter()
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Groups ordered by severity, then group size, both descending.
    ///
    /// Ties keep first-appearance order.
    pub fn sorted_for_display(&self) -> Vec<&ViolationGroup<'a>> {
        let mut sorted: Vec<_> = self.groups.iter().collect();
        sorted.sort_by(|a, b| {
            b.severity()
                .cmp(&a.severity())
                .then(b.len().cmp(&a.len()))
        });
        sorted
    }
}
