use std::fmt;

use serde::{Deserialize, Serialize};

/// Constraint family a violation belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ViolationKind {
    MissingRequiredField,
    MultiplicityViolation,
    EnumerationViolation,
    PatternMismatch,
    NumericRangeViolation,
    FixedValueViolation,
    CrossFieldInconsistency,
}

impl fmt::Display for ViolationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ViolationKind::MissingRequiredField => "MissingRequiredField",
            ViolationKind::MultiplicityViolation => "MultiplicityViolation",
            ViolationKind::EnumerationViolation => "EnumerationViolation",
            ViolationKind::PatternMismatch => "PatternMismatch",
            ViolationKind::NumericRangeViolation => "NumericRangeViolation",
            ViolationKind::FixedValueViolation => "FixedValueViolation",
            ViolationKind::CrossFieldInconsistency => "CrossFieldInconsistency",
        };
        write!(f, "{}", s)
    }
}

/// A single defect found in a record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    /// Concrete field path, with a collection index where one applies
    /// (e.g. `azimuthResolution[2]/@beamID`)
    pub field: String,
    pub kind: ViolationKind,
    /// Offending value as text; empty when the value is absent
    pub value: String,
    /// Human-readable statement of the constraint
    pub expected: String,
}

impl Violation {
    pub fn new(
        field: impl Into<String>,
        kind: ViolationKind,
        value: impl Into<String>,
        expected: impl Into<String>,
    ) -> Self {
        Self {
            field: field.into(),
            kind,
            value: value.into(),
            expected: expected.into(),
        }
    }

    pub(crate) fn missing(field: impl Into<String>) -> Self {
        Self::new(field, ViolationKind::MissingRequiredField, "", "a value")
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} [{}]: got '{}', expected {}",
            self.field, self.kind, self.value, self.expected
        )
    }
}

/// Aggregated outcome of building or validating one record.
///
/// Violations are ordered: field-local findings in document order first,
/// cross-field findings after. Warnings never make a report fail.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub violations: Vec<Violation>,
    pub warnings: Vec<String>,
}

impl ValidationReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, violation: Violation) {
        self.violations.push(violation);
    }

    pub fn warn(&mut self, message: impl Into<String>) {
        self.warnings.push(message.into());
    }

    pub fn has_failures(&self) -> bool {
        !self.violations.is_empty()
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    pub fn failure_count(&self) -> usize {
        self.violations.len()
    }

    /// Number of violations of the given kind
    pub fn count_of(&self, kind: ViolationKind) -> usize {
        self.violations.iter().filter(|v| v.kind == kind).count()
    }

    /// Violations reported against `field`, index-qualified paths included
    pub fn for_field<'a>(&'a self, field: &'a str) -> impl Iterator<Item = &'a Violation> + 'a {
        self.violations.iter().filter(move |v| {
            v.field == field
                || v.field
                    .strip_prefix(field)
                    .is_some_and(|rest| rest.starts_with('[') || rest.starts_with('/'))
        })
    }

    /// Append `other` after the existing violations, dropping any whose
    /// (field, value) pair is already present.
    pub fn merge_deduplicated(&mut self, other: Vec<Violation>) {
        for v in other {
            let seen = self
                .violations
                .iter()
                .any(|existing| existing.field == v.field && existing.value == v.value);
            if !seen {
                self.violations.push(v);
            }
        }
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "NRB Metadata Validation Report")?;
        writeln!(f, "==============================")?;

        for v in &self.violations {
            writeln!(f, "[✗] {}", v)?;
        }
        for w in &self.warnings {
            writeln!(f, "[⚠] {}", w)?;
        }

        writeln!(f)?;
        writeln!(
            f,
            "Summary: {} violations, {} warnings",
            self.violations.len(),
            self.warnings.len()
        )?;

        writeln!(f)?;
        if self.has_failures() {
            writeln!(f, "Validation FAILED")?;
        } else if self.has_warnings() {
            writeln!(f, "Validation PASSED with warnings")?;
        } else {
            writeln!(f, "Validation PASSED")?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge_drops_same_field_and_value() {
        let mut report = ValidationReport::new();
        report.push(Violation::new(
            "performanceIndicators/equivalentNumberOfLooks",
            ViolationKind::FixedValueViolation,
            "3",
            "1",
        ));
        report.merge_deduplicated(vec![
            Violation::new(
                "performanceIndicators/equivalentNumberOfLooks",
                ViolationKind::CrossFieldInconsistency,
                "3",
                "single-look value 1",
            ),
            Violation::new(
                "azimuthResolution",
                ViolationKind::MultiplicityViolation,
                "IW2",
                "unique beamID",
            ),
        ]);

        assert_eq!(report.failure_count(), 2);
        assert_eq!(report.count_of(ViolationKind::FixedValueViolation), 1);
        assert_eq!(report.count_of(ViolationKind::CrossFieldInconsistency), 0);
    }

    #[test]
    fn for_field_matches_indexed_paths_only() {
        let mut report = ValidationReport::new();
        report.push(Violation::missing("azimuthResolution[1]/@beamID"));
        report.push(Violation::missing("azimuthResolutionExtra"));
        assert_eq!(report.for_field("azimuthResolution").count(), 1);
    }

    #[test]
    fn display_summarises_outcome() {
        let mut report = ValidationReport::new();
        report.warn("unknown fact 'foo'");
        let text = report.to_string();
        assert!(text.contains("0 violations, 1 warnings"));
        assert!(text.contains("PASSED with warnings"));
    }
}
