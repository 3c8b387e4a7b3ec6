//! Fixed letter-grade scale.
//!
//! Every symbol either maps to a grade-point value or is a pass/fail marker
//! that carries no point value at all.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A letter grade on the fixed five-point scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Grade {
    #[serde(rename = "A+")]
    APlus,
    #[serde(rename = "A")]
    A,
    #[serde(rename = "A-")]
    AMinus,
    #[serde(rename = "B+")]
    BPlus,
    #[serde(rename = "B")]
    B,
    #[serde(rename = "B-")]
    BMinus,
    #[serde(rename = "C+")]
    CPlus,
    #[serde(rename = "C")]
    C,
    #[serde(rename = "D+")]
    DPlus,
    #[serde(rename = "D")]
    D,
    #[serde(rename = "F")]
    F,
    /// Satisfactory.
    #[serde(rename = "S")]
    S,
    /// Unsatisfactory.
    #[serde(rename = "U")]
    U,
    /// Completed satisfactorily.
    #[serde(rename = "CS")]
    CS,
    /// Completed unsatisfactorily.
    #[serde(rename = "CU")]
    CU,
}

impl Grade {
    /// All symbols, best to worst, pass/fail markers last.
    pub const ALL: [Grade; 15] = [
        Grade::APlus,
        Grade::A,
        Grade::AMinus,
        Grade::BPlus,
        Grade::B,
        Grade::BMinus,
        Grade::CPlus,
        Grade::C,
        Grade::DPlus,
        Grade::D,
        Grade::F,
        Grade::S,
        Grade::U,
        Grade::CS,
        Grade::CU,
    ];

    /// Grade-point value, or `None` for pass/fail markers.
    pub fn points(self) -> Option<f64> {
        match self {
            Grade::APlus | Grade::A => Some(5.0),
            Grade::AMinus => Some(4.5),
            Grade::BPlus => Some(4.0),
            Grade::B => Some(3.5),
            Grade::BMinus => Some(3.0),
            Grade::CPlus => Some(2.5),
            Grade::C => Some(2.0),
            Grade::DPlus => Some(1.5),
            Grade::D => Some(1.0),
            Grade::F => Some(0.0),
            Grade::S | Grade::U | Grade::CS | Grade::CU => None,
        }
    }

    /// Returns `true` for symbols that are themselves pass/fail outcomes.
    pub fn is_pass_fail(self) -> bool {
        self.points().is_none()
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Grade::APlus => "A+",
            Grade::A => "A",
            Grade::AMinus => "A-",
            Grade::BPlus => "B+",
            Grade::B => "B",
            Grade::BMinus => "B-",
            Grade::CPlus => "C+",
            Grade::C => "C",
            Grade::DPlus => "D+",
            Grade::D => "D",
            Grade::F => "F",
            Grade::S => "S",
            Grade::U => "U",
            Grade::CS => "CS",
            Grade::CU => "CU",
        }
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl FromStr for Grade {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_uppercase();
        Grade::ALL
            .into_iter()
            .find(|g| g.symbol() == wanted)
            .ok_or_else(|| format!("unknown grade: {s}"))
    }
}

/// Serde adapter for an optional grade persisted as a plain string, where
/// the empty string means "ungraded".
///
/// Unknown symbols decode as ungraded rather than failing the whole record.
pub mod letter_grade {
    use serde::{Deserialize, Deserializer, Serializer};

    use super::Grade;

    pub fn serialize<S: Serializer>(grade: &Option<Grade>, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(grade.map(Grade::symbol).unwrap_or(""))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Grade>, D::Error> {
        let raw = Option::<String>::deserialize(d)?.unwrap_or_default();
        if raw.trim().is_empty() {
            return Ok(None);
        }
        match raw.parse::<Grade>() {
            Ok(grade) => Ok(Some(grade)),
            Err(e) => {
                tracing::warn!("treating stored grade as ungraded: {e}");
                Ok(None)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn point_values() {
        assert_eq!(Grade::A.points(), Some(5.0));
        assert_eq!(Grade::APlus.points(), Some(5.0));
        assert_eq!(Grade::BMinus.points(), Some(3.0));
        assert_eq!(Grade::F.points(), Some(0.0));
        assert_eq!(Grade::S.points(), None);
        assert_eq!(Grade::CU.points(), None);
    }

    #[test]
    fn pass_fail_markers() {
        let markers: Vec<Grade> = Grade::ALL.into_iter().filter(|g| g.is_pass_fail()).collect();
        assert_eq!(markers, vec![Grade::S, Grade::U, Grade::CS, Grade::CU]);
    }

    #[test]
    fn display_and_parse() {
        assert_eq!(Grade::BPlus.to_string(), "B+");
        assert_eq!("b-".parse::<Grade>().unwrap(), Grade::BMinus);
        assert_eq!(" cs ".parse::<Grade>().unwrap(), Grade::CS);
        assert!("E".parse::<Grade>().is_err());
        assert!("".parse::<Grade>().is_err());
    }

    #[derive(Debug, serde::Serialize, serde::Deserialize)]
    struct Wrapper {
        #[serde(default, with = "letter_grade")]
        grade: Option<Grade>,
    }

    #[test]
    fn empty_string_is_ungraded() {
        let w: Wrapper = serde_json::from_str(r#"{"grade": ""}"#).unwrap();
        assert_eq!(w.grade, None);
        let w: Wrapper = serde_json::from_str(r#"{"grade": "A-"}"#).unwrap();
        assert_eq!(w.grade, Some(Grade::AMinus));
        let w: Wrapper = serde_json::from_str(r#"{"grade": "Z"}"#).unwrap();
        assert_eq!(w.grade, None);
        let w: Wrapper = serde_json::from_str("{}").unwrap();
        assert_eq!(w.grade, None);

        let json = serde_json::to_string(&Wrapper { grade: None }).unwrap();
        assert_eq!(json, r#"{"grade":""}"#);
    }
}
