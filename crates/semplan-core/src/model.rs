//! Core data model types for semplan.
//!
//! These are the plain records the planner persists: taken modules, the
//! academic settings, and the view state that must stay consistent with them.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

use crate::grade::{letter_grade, Grade};
use crate::semester::{ProgramStart, SemesterLabel, YearWindow};

/// Stable identifier of a module record, distinct from its catalog code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModuleId(pub u64);

impl fmt::Display for ModuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ModuleId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .trim_start_matches('#')
            .parse::<u64>()
            .map(ModuleId)
            .map_err(|_| format!("invalid module id: {s}"))
    }
}

/// A taken course instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Module {
    pub id: ModuleId,
    /// Catalog code, unique within a collection (e.g. "CS2040S").
    pub module_code: String,
    #[serde(default)]
    pub title: String,
    #[serde(default, deserialize_with = "deserialize_credit")]
    pub module_credit: f64,
    /// `None` until a grade is recorded.
    #[serde(default, with = "letter_grade")]
    pub letter_grade: Option<Grade>,
    /// Marked as a pass/fail exemption.
    #[serde(default)]
    pub is_exempted: bool,
    pub semester: SemesterLabel,
}

impl Module {
    /// Point value of the recorded grade, if it has one.
    pub fn grade_points(&self) -> Option<f64> {
        self.letter_grade.and_then(Grade::points)
    }

    /// Whether the grade is a real letter grade that could be exempted.
    pub fn is_exemptible(&self) -> bool {
        self.grade_points().is_some()
    }

    /// Exempted with a real letter grade: excluded from the average and
    /// charged against the exemption quota.
    pub fn is_converted(&self) -> bool {
        self.is_exempted && self.is_exemptible()
    }
}

/// Coerce a JSON credit value to a non-negative number.
///
/// Numbers and numeric strings are accepted; anything else is 0.
pub fn coerce_credit(value: &serde_json::Value) -> f64 {
    let credit = match value {
        serde_json::Value::Number(n) => n.as_f64().unwrap_or(0.0),
        serde_json::Value::String(s) => s.trim().parse::<f64>().unwrap_or(0.0),
        _ => 0.0,
    };
    if credit.is_finite() && credit > 0.0 {
        credit
    } else {
        0.0
    }
}

/// Serde hook applying [`coerce_credit`]; never fails.
pub fn deserialize_credit<'de, D: Deserializer<'de>>(d: D) -> Result<f64, D::Error> {
    let value = Option::<serde_json::Value>::deserialize(d)?;
    Ok(value.as_ref().map(coerce_credit).unwrap_or(0.0))
}

/// Academic settings record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AcademicSettings {
    #[serde(default)]
    pub program_start: ProgramStart,
    /// Lowers the first-window exemption cap.
    #[serde(default)]
    pub high_exemption_tier: bool,
}

/// Visible program years and the one in focus.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisibleYears {
    #[serde(default)]
    pub years: Vec<YearWindow>,
    #[serde(default)]
    pub selected: Option<YearWindow>,
}

impl VisibleYears {
    pub fn starting_at(year: YearWindow) -> Self {
        Self {
            years: vec![year],
            selected: Some(year),
        }
    }
}

/// Presentation toggles persisted alongside the plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UiToggles {
    #[serde(default = "default_true")]
    pub show_grade_points: bool,
    #[serde(default = "default_true")]
    pub show_exemption_panel: bool,
    #[serde(default)]
    pub compact_view: bool,
}

impl Default for UiToggles {
    fn default() -> Self {
        Self {
            show_grade_points: true,
            show_exemption_panel: true,
            compact_view: false,
        }
    }
}

fn default_true() -> bool {
    true
}

impl UiToggles {
    pub fn get(&self, toggle: Toggle) -> bool {
        match toggle {
            Toggle::GradePoints => self.show_grade_points,
            Toggle::ExemptionPanel => self.show_exemption_panel,
            Toggle::CompactView => self.compact_view,
        }
    }

    pub fn set(&mut self, toggle: Toggle, enabled: bool) {
        match toggle {
            Toggle::GradePoints => self.show_grade_points = enabled,
            Toggle::ExemptionPanel => self.show_exemption_panel = enabled,
            Toggle::CompactView => self.compact_view = enabled,
        }
    }
}

/// A single UI toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Toggle {
    GradePoints,
    ExemptionPanel,
    CompactView,
}

impl fmt::Display for Toggle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Toggle::GradePoints => write!(f, "grade-points"),
            Toggle::ExemptionPanel => write!(f, "exemption-panel"),
            Toggle::CompactView => write!(f, "compact-view"),
        }
    }
}

impl FromStr for Toggle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('_', "-").as_str() {
            "grade-points" | "points" => Ok(Toggle::GradePoints),
            "exemption-panel" | "exemptions" => Ok(Toggle::ExemptionPanel),
            "compact-view" | "compact" => Ok(Toggle::CompactView),
            other => Err(format!("unknown toggle: {other}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn credit_coercion() {
        assert_eq!(coerce_credit(&json!(4)), 4.0);
        assert_eq!(coerce_credit(&json!("4")), 4.0);
        assert_eq!(coerce_credit(&json!(" 2.5 ")), 2.5);
        assert_eq!(coerce_credit(&json!("four")), 0.0);
        assert_eq!(coerce_credit(&json!(-4)), 0.0);
        assert_eq!(coerce_credit(&json!(null)), 0.0);
        assert_eq!(coerce_credit(&json!([4])), 0.0);
    }

    #[test]
    fn module_decodes_loose_records() {
        let module: Module = serde_json::from_value(json!({
            "id": 7,
            "moduleCode": "CS1101S",
            "title": "Programming Methodology",
            "moduleCredit": "4",
            "letterGrade": "",
            "semester": "21/22 Sem 1"
        }))
        .unwrap();
        assert_eq!(module.id, ModuleId(7));
        assert_eq!(module.module_credit, 4.0);
        assert_eq!(module.letter_grade, None);
        assert!(!module.is_exempted);

        let module: Module = serde_json::from_value(json!({
            "id": 8,
            "moduleCode": "MA1521",
            "semester": "21/22 Sem 2"
        }))
        .unwrap();
        assert_eq!(module.module_credit, 0.0);
    }

    #[test]
    fn converted_requires_real_grade() {
        let mut module: Module = serde_json::from_value(json!({
            "id": 1,
            "moduleCode": "GEA1000",
            "moduleCredit": 4,
            "letterGrade": "S",
            "isExempted": true,
            "semester": "21/22 Sem 1"
        }))
        .unwrap();
        assert!(!module.is_converted());
        module.letter_grade = Some(Grade::B);
        assert!(module.is_converted());
    }

    #[test]
    fn toggles() {
        let mut toggles = UiToggles::default();
        assert!(toggles.get(Toggle::GradePoints));
        toggles.set(Toggle::CompactView, true);
        assert!(toggles.compact_view);
        assert_eq!("compact".parse::<Toggle>().unwrap(), Toggle::CompactView);
        assert!("sparkles".parse::<Toggle>().is_err());
    }

    #[test]
    fn module_id_parse() {
        assert_eq!("#12".parse::<ModuleId>().unwrap(), ModuleId(12));
        assert!("x".parse::<ModuleId>().is_err());
    }
}
