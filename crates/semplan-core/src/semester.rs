//! Semester catalog generation.
//!
//! The full set of semester labels is a pure function of the program start
//! year: six program years of four terms each.

use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;

use chrono::Datelike;
use serde::{Deserialize, Serialize};

/// Number of program years enumerated by the catalog.
pub const PROGRAM_YEARS: u8 = 6;

/// Two-digit cohort years a program may start in.
pub const SUPPORTED_START_YEARS: RangeInclusive<u8> = 15..=30;

/// Month (1-based) in which a new academic year begins.
const ACADEMIC_YEAR_START_MONTH: u32 = 8;

/// A term within an academic year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Term {
    Sem1,
    Sem2,
    /// First special (short) term.
    St1,
    /// Second special (short) term.
    St2,
}

impl Term {
    /// Terms in calendar order.
    pub const ALL: [Term; 4] = [Term::Sem1, Term::Sem2, Term::St1, Term::St2];

    pub fn is_special(self) -> bool {
        matches!(self, Term::St1 | Term::St2)
    }

    pub fn marker(self) -> &'static str {
        match self {
            Term::Sem1 => "Sem 1",
            Term::Sem2 => "Sem 2",
            Term::St1 => "ST1",
            Term::St2 => "ST2",
        }
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.marker())
    }
}

impl FromStr for Term {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s.split_whitespace().collect::<Vec<_>>().join(" ");
        match normalized.to_uppercase().as_str() {
            "SEM 1" | "SEM1" | "S1" => Ok(Term::Sem1),
            "SEM 2" | "SEM2" | "S2" => Ok(Term::Sem2),
            "ST1" | "ST 1" => Ok(Term::St1),
            "ST2" | "ST 2" => Ok(Term::St2),
            _ => Err(format!("unknown term: {s}")),
        }
    }
}

/// An academic year written as a start/end pair, e.g. `21/22`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct YearWindow {
    start: u8,
}

impl YearWindow {
    /// Build a window from a two-digit start year (taken modulo 100).
    pub fn new(start: u8) -> Self {
        Self { start: start % 100 }
    }

    pub fn start(self) -> u8 {
        self.start
    }

    pub fn end(self) -> u8 {
        (self.start + 1) % 100
    }

    /// The window `offset` years after this one.
    pub fn offset(self, years: u8) -> Self {
        Self::new(((self.start as u16 + years as u16) % 100) as u8)
    }
}

impl fmt::Display for YearWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}/{:02}", self.start, self.end())
    }
}

impl FromStr for YearWindow {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (start, end) = s
            .trim()
            .split_once('/')
            .ok_or_else(|| format!("invalid year window: {s}"))?;
        let start: u8 = start
            .trim()
            .parse()
            .map_err(|_| format!("invalid year window: {s}"))?;
        let end: u8 = end
            .trim()
            .parse()
            .map_err(|_| format!("invalid year window: {s}"))?;
        let window = YearWindow::new(start);
        if start > 99 || window.end() != end {
            return Err(format!("invalid year window: {s}"));
        }
        Ok(window)
    }
}

impl TryFrom<String> for YearWindow {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<YearWindow> for String {
    fn from(w: YearWindow) -> Self {
        w.to_string()
    }
}

/// A generated semester slot, e.g. `21/22 Sem 1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SemesterLabel {
    pub year: YearWindow,
    pub term: Term,
}

impl SemesterLabel {
    pub fn new(year: YearWindow, term: Term) -> Self {
        Self { year, term }
    }
}

impl fmt::Display for SemesterLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.year, self.term)
    }
}

impl FromStr for SemesterLabel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (year, term) = s
            .trim()
            .split_once(' ')
            .ok_or_else(|| format!("invalid semester label: {s}"))?;
        Ok(SemesterLabel {
            year: year.parse()?,
            term: term.parse()?,
        })
    }
}

impl TryFrom<String> for SemesterLabel {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<SemesterLabel> for String {
    fn from(label: SemesterLabel) -> Self {
        label.to_string()
    }
}

/// The cohort setting from which the whole catalog is derived.
///
/// Written as `AY21/22`; parsing also accepts `21/22`, `21` and `2021`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ProgramStart(u8);

impl ProgramStart {
    /// Returns `None` when the year is outside [`SUPPORTED_START_YEARS`].
    pub fn new(year: u8) -> Option<Self> {
        SUPPORTED_START_YEARS.contains(&year).then_some(Self(year))
    }

    /// Every selectable program start.
    pub fn supported() -> impl Iterator<Item = ProgramStart> {
        SUPPORTED_START_YEARS.map(ProgramStart)
    }

    /// The cohort whose first academic year is under way today, clamped into
    /// the supported range.
    pub fn current() -> Self {
        let today = chrono::Local::now().date_naive();
        let mut year = today.year();
        if today.month() < ACADEMIC_YEAR_START_MONTH {
            year -= 1;
        }
        let two_digit = year.rem_euclid(100) as u8;
        Self(two_digit.clamp(*SUPPORTED_START_YEARS.start(), *SUPPORTED_START_YEARS.end()))
    }

    pub fn year(self) -> u8 {
        self.0
    }

    pub fn first_year(self) -> YearWindow {
        YearWindow::new(self.0)
    }
}

impl Default for ProgramStart {
    fn default() -> Self {
        Self::current()
    }
}

impl fmt::Display for ProgramStart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AY{}", self.first_year())
    }
}

impl FromStr for ProgramStart {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let body = trimmed
            .strip_prefix("AY")
            .or_else(|| trimmed.strip_prefix("ay"))
            .unwrap_or(trimmed);

        let year = if body.contains('/') {
            body.parse::<YearWindow>()?.start()
        } else {
            match body.parse::<u16>() {
                Ok(y) if y < 100 => y as u8,
                Ok(y) if (2000..2100).contains(&y) => (y % 100) as u8,
                _ => return Err(format!("invalid program start: {s}")),
            }
        };

        ProgramStart::new(year).ok_or_else(|| {
            format!(
                "unsupported program start: {s} (supported: {:02}..{:02})",
                SUPPORTED_START_YEARS.start(),
                SUPPORTED_START_YEARS.end()
            )
        })
    }
}

impl TryFrom<String> for ProgramStart {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<ProgramStart> for String {
    fn from(start: ProgramStart) -> Self {
        start.to_string()
    }
}

/// The ordered semester labels for one program start.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SemesterCatalog {
    start: ProgramStart,
    labels: Vec<SemesterLabel>,
}

impl SemesterCatalog {
    pub fn generate(start: ProgramStart) -> Self {
        let first = start.first_year();
        let labels = (0..PROGRAM_YEARS)
            .flat_map(|offset| {
                let year = first.offset(offset);
                Term::ALL.into_iter().map(move |term| SemesterLabel::new(year, term))
            })
            .collect();
        Self { start, labels }
    }

    pub fn start(&self) -> ProgramStart {
        self.start
    }

    pub fn labels(&self) -> &[SemesterLabel] {
        &self.labels
    }

    pub fn contains(&self, label: &SemesterLabel) -> bool {
        self.labels.contains(label)
    }

    /// Catalog position of a label, used to keep derived lists in order.
    pub fn position(&self, label: &SemesterLabel) -> Option<usize> {
        self.labels.iter().position(|l| l == label)
    }

    /// The program years, in order.
    pub fn years(&self) -> Vec<YearWindow> {
        let first = self.start.first_year();
        (0..PROGRAM_YEARS).map(|offset| first.offset(offset)).collect()
    }

    pub fn contains_year(&self, year: YearWindow) -> bool {
        self.years().contains(&year)
    }

    pub fn year_position(&self, year: YearWindow) -> Option<usize> {
        self.years().iter().position(|y| *y == year)
    }

    pub fn labels_in_year(&self, year: YearWindow) -> Vec<SemesterLabel> {
        self.labels
            .iter()
            .copied()
            .filter(|l| l.year == year)
            .collect()
    }

    /// The first two regular (non-special) semesters in catalog order.
    pub fn first_window(&self) -> Vec<SemesterLabel> {
        self.labels
            .iter()
            .copied()
            .filter(|l| !l.term.is_special())
            .take(2)
            .collect()
    }
}
