//! Grade-average and credit aggregation.
//!
//! Everything here is a pure function of the module collection; nothing is
//! cached between calls.

use serde::{Deserialize, Serialize};

use crate::model::Module;
use crate::semester::{SemesterCatalog, SemesterLabel};

/// Aggregate over a set of modules.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ScoreSummary {
    /// Credit-weighted grade average, rounded to 2 decimal places.
    pub average: f64,
    /// Credits that carry a grade-point value.
    pub graded_credits: f64,
    /// All credits, graded or not.
    pub total_credits: f64,
}

/// Score for a single semester.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SemesterScore {
    pub semester: SemesterLabel,
    pub module_count: usize,
    pub score: ScoreSummary,
}

/// Compute the average and credit totals over `modules`.
///
/// Exempted modules with a real letter grade drop out of the average but
/// still count toward total credits.
pub fn aggregate<'a, I>(modules: I) -> ScoreSummary
where
    I: IntoIterator<Item = &'a Module>,
{
    let mut points = 0.0;
    let mut graded_credits = 0.0;
    let mut total_credits = 0.0;

    for module in modules {
        let credit = module.module_credit;
        total_credits += credit;

        if module.is_converted() {
            continue;
        }
        if let Some(value) = module.grade_points() {
            points += value * credit;
            graded_credits += credit;
        }
    }

    let average = if graded_credits > 0.0 {
        round2(points / graded_credits)
    } else {
        0.0
    };

    ScoreSummary {
        average,
        graded_credits,
        total_credits,
    }
}

/// [`aggregate`] restricted to one semester.
pub fn aggregate_semester(modules: &[Module], semester: &SemesterLabel) -> ScoreSummary {
    aggregate(modules.iter().filter(|m| m.semester == *semester))
}

/// Per-semester scores in catalog order. Semesters without modules are
/// skipped.
pub fn aggregate_by_semester(modules: &[Module], catalog: &SemesterCatalog) -> Vec<SemesterScore> {
    catalog
        .labels()
        .iter()
        .filter_map(|label| {
            let in_semester: Vec<&Module> =
                modules.iter().filter(|m| m.semester == *label).collect();
            if in_semester.is_empty() {
                return None;
            }
            Some(SemesterScore {
                semester: *label,
                module_count: in_semester.len(),
                score: aggregate(in_semester),
            })
        })
        .collect()
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grade::Grade;
    use crate::model::ModuleId;
    use crate::semester::ProgramStart;

    fn label(s: &str) -> SemesterLabel {
        s.parse().unwrap()
    }

    fn module(id: u64, credit: f64, grade: Option<Grade>, exempted: bool, sem: &str) -> Module {
        Module {
            id: ModuleId(id),
            module_code: format!("MOD{id}"),
            title: String::new(),
            module_credit: credit,
            letter_grade: grade,
            is_exempted: exempted,
            semester: label(sem),
        }
    }

    #[test]
    fn weighted_average() {
        let modules = vec![
            module(1, 4.0, Some(Grade::A), false, "21/22 Sem 1"),
            module(2, 4.0, Some(Grade::BMinus), false, "21/22 Sem 1"),
        ];
        let score = aggregate(&modules);
        assert_eq!(score.average, 4.0);
        assert_eq!(score.graded_credits, 8.0);
        assert_eq!(score.total_credits, 8.0);
    }

    #[test]
    fn empty_and_ungraded_collections_average_zero() {
        assert_eq!(aggregate(std::iter::empty()), ScoreSummary::default());

        let modules = vec![
            module(1, 4.0, None, false, "21/22 Sem 1"),
            module(2, 4.0, Some(Grade::S), false, "21/22 Sem 1"),
        ];
        let score = aggregate(&modules);
        assert_eq!(score.average, 0.0);
        assert_eq!(score.graded_credits, 0.0);
        assert_eq!(score.total_credits, 8.0);
    }

    #[test]
    fn exempted_real_grade_only_counts_toward_total() {
        let modules = vec![
            module(1, 4.0, Some(Grade::A), false, "21/22 Sem 1"),
            module(2, 4.0, Some(Grade::D), true, "21/22 Sem 1"),
        ];
        let score = aggregate(&modules);
        assert_eq!(score.average, 5.0);
        assert_eq!(score.graded_credits, 4.0);
        assert_eq!(score.total_credits, 8.0);
    }

    #[test]
    fn exempted_flag_on_ungraded_module_is_ignored() {
        let modules = vec![module(1, 4.0, None, true, "21/22 Sem 1")];
        let score = aggregate(&modules);
        assert_eq!(score.graded_credits, 0.0);
        assert_eq!(score.total_credits, 4.0);
    }

    #[test]
    fn total_credits_is_plain_sum() {
        let modules = vec![
            module(1, 4.0, Some(Grade::A), true, "21/22 Sem 1"),
            module(2, 2.0, None, false, "21/22 Sem 2"),
            module(3, 6.0, Some(Grade::CU), false, "21/22 ST1"),
            module(4, 0.0, Some(Grade::F), false, "22/23 Sem 1"),
            module(5, 4.0, Some(Grade::BPlus), false, "22/23 Sem 1"),
        ];
        let expected: f64 = modules.iter().map(|m| m.module_credit).sum();
        assert_eq!(aggregate(&modules).total_credits, expected);
    }

    #[test]
    fn average_rounds_to_two_places() {
        let modules = vec![
            module(1, 4.0, Some(Grade::A), false, "21/22 Sem 1"),
            module(2, 4.0, Some(Grade::AMinus), false, "21/22 Sem 1"),
            module(3, 4.0, Some(Grade::B), false, "21/22 Sem 1"),
        ];
        // (20 + 18 + 14) / 12 = 4.333...
        assert_eq!(aggregate(&modules).average, 4.33);
    }

    #[test]
    fn per_semester_scores() {
        let catalog = SemesterCatalog::generate(ProgramStart::new(21).unwrap());
        let modules = vec![
            module(1, 4.0, Some(Grade::A), false, "21/22 Sem 2"),
            module(2, 4.0, Some(Grade::C), false, "21/22 Sem 1"),
            module(3, 4.0, Some(Grade::B), false, "21/22 Sem 2"),
        ];

        let sem2 = aggregate_semester(&modules, &label("21/22 Sem 2"));
        assert_eq!(sem2.average, 4.25);

        let scores = aggregate_by_semester(&modules, &catalog);
        assert_eq!(scores.len(), 2);
        assert_eq!(scores[0].semester, label("21/22 Sem 1"));
        assert_eq!(scores[0].score.average, 2.0);
        assert_eq!(scores[1].module_count, 2);
    }
}
