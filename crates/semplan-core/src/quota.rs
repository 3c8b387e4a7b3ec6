//! Pass/fail exemption quota.
//!
//! The catalog splits into two windows: the first two regular semesters,
//! and everything else. Exempted credits are charged to the window holding
//! the module's semester, and the second window can never offer more than
//! whatever the first window has left.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::model::Module;
use crate::semester::{SemesterCatalog, SemesterLabel};

/// First-window cap under the standard policy.
pub const STANDARD_FIRST_WINDOW_CAP: f64 = 32.0;
/// First-window cap under the high exemption tier.
pub const HIGH_TIER_FIRST_WINDOW_CAP: f64 = 20.0;
/// Upper bound on the second-window cap.
pub const SECOND_WINDOW_LIMIT: f64 = 12.0;
/// Credit size assumed when reporting slot counts.
pub const SLOT_CREDITS: f64 = 4.0;

/// One of the two quota buckets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuotaWindow {
    First,
    Second,
}

impl fmt::Display for QuotaWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuotaWindow::First => write!(f, "first window"),
            QuotaWindow::Second => write!(f, "second window"),
        }
    }
}

/// Usage and capacity of a single window.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WindowQuota {
    pub cap: f64,
    pub used: f64,
    /// `max(0, cap - used)`.
    pub remaining: f64,
    /// Whole [`SLOT_CREDITS`]-sized modules that still fit.
    pub slots: u32,
}

impl WindowQuota {
    fn new(cap: f64, used: f64) -> Self {
        let remaining = (cap - used).max(0.0);
        Self {
            cap,
            used,
            remaining,
            slots: (remaining / SLOT_CREDITS).floor() as u32,
        }
    }
}

/// Exemption capacity across both windows.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExemptionQuota {
    pub first: WindowQuota,
    pub second: WindowQuota,
}

impl ExemptionQuota {
    pub fn window(&self, window: QuotaWindow) -> &WindowQuota {
        match window {
            QuotaWindow::First => &self.first,
            QuotaWindow::Second => &self.second,
        }
    }

    pub fn remaining(&self, window: QuotaWindow) -> f64 {
        self.window(window).remaining
    }
}

pub fn first_window_cap(high_exemption_tier: bool) -> f64 {
    if high_exemption_tier {
        HIGH_TIER_FIRST_WINDOW_CAP
    } else {
        STANDARD_FIRST_WINDOW_CAP
    }
}

/// The window a semester's exemptions are charged to.
pub fn window_of(catalog: &SemesterCatalog, semester: &SemesterLabel) -> QuotaWindow {
    if catalog.first_window().contains(semester) {
        QuotaWindow::First
    } else {
        QuotaWindow::Second
    }
}

/// Recompute both windows from the current collection.
pub fn compute_quota(
    modules: &[Module],
    catalog: &SemesterCatalog,
    high_exemption_tier: bool,
) -> ExemptionQuota {
    let first_window = catalog.first_window();

    let mut used_first = 0.0;
    let mut used_second = 0.0;
    for module in modules.iter().filter(|m| m.is_converted()) {
        if first_window.contains(&module.semester) {
            used_first += module.module_credit;
        } else {
            used_second += module.module_credit;
        }
    }

    let first = WindowQuota::new(first_window_cap(high_exemption_tier), used_first);
    let second_cap = first.remaining.min(SECOND_WINDOW_LIMIT);
    let second = WindowQuota::new(second_cap, used_second);

    ExemptionQuota { first, second }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grade::Grade;
    use crate::model::ModuleId;
    use crate::semester::ProgramStart;

    fn catalog() -> SemesterCatalog {
        SemesterCatalog::generate(ProgramStart::new(21).unwrap())
    }

    fn exempted(id: u64, credit: f64, grade: Grade, sem: &str) -> Module {
        Module {
            id: ModuleId(id),
            module_code: format!("MOD{id}"),
            title: String::new(),
            module_credit: credit,
            letter_grade: Some(grade),
            is_exempted: true,
            semester: sem.parse().unwrap(),
        }
    }

    #[test]
    fn empty_collection_has_full_capacity() {
        let quota = compute_quota(&[], &catalog(), false);
        assert_eq!(quota.first.remaining, 32.0);
        assert_eq!(quota.first.slots, 8);
        assert_eq!(quota.second.cap, 12.0);
        assert_eq!(quota.second.remaining, 12.0);
        assert_eq!(quota.second.slots, 3);
    }

    #[test]
    fn high_tier_lowers_first_cap() {
        let quota = compute_quota(&[], &catalog(), true);
        assert_eq!(quota.first.cap, 20.0);
        assert_eq!(quota.first.slots, 5);
    }

    #[test]
    fn first_window_usage() {
        let modules = vec![exempted(1, 4.0, Grade::A, "21/22 Sem 1")];
        let quota = compute_quota(&modules, &catalog(), false);
        assert_eq!(quota.first.used, 4.0);
        assert_eq!(quota.first.remaining, 28.0);
        assert_eq!(quota.first.remaining + quota.first.used, quota.first.cap);
    }

    #[test]
    fn special_terms_belong_to_second_window() {
        let catalog = catalog();
        assert_eq!(
            window_of(&catalog, &"21/22 ST1".parse().unwrap()),
            QuotaWindow::Second
        );
        assert_eq!(
            window_of(&catalog, &"21/22 Sem 2".parse().unwrap()),
            QuotaWindow::First
        );

        let modules = vec![exempted(1, 4.0, Grade::B, "21/22 ST2")];
        let quota = compute_quota(&modules, &catalog, false);
        assert_eq!(quota.first.used, 0.0);
        assert_eq!(quota.second.used, 4.0);
        assert_eq!(quota.second.remaining, 8.0);
    }

    #[test]
    fn pass_fail_native_grades_do_not_consume_quota() {
        let modules = vec![
            exempted(1, 4.0, Grade::S, "21/22 Sem 1"),
            exempted(2, 4.0, Grade::CS, "22/23 Sem 1"),
        ];
        let quota = compute_quota(&modules, &catalog(), false);
        assert_eq!(quota.first.used, 0.0);
        assert_eq!(quota.second.used, 0.0);
    }

    #[test]
    fn remaining_clamps_at_zero() {
        let modules: Vec<Module> = (0..6)
            .map(|i| exempted(i, 4.0, Grade::C, "21/22 Sem 1"))
            .collect();
        let quota = compute_quota(&modules, &catalog(), true);
        assert_eq!(quota.first.used, 24.0);
        assert_eq!(quota.first.remaining, 0.0);
        assert_eq!(quota.first.slots, 0);
        assert_eq!(quota.second.cap, 0.0);
        assert_eq!(quota.second.remaining, 0.0);
    }

    #[test]
    fn second_cap_follows_first_remaining() {
        let modules: Vec<Module> = (0..6)
            .map(|i| exempted(i, 4.0, Grade::B, "21/22 Sem 2"))
            .chain(std::iter::once(exempted(9, 4.0, Grade::B, "23/24 Sem 1")))
            .collect();
        let quota = compute_quota(&modules, &catalog(), false);
        assert_eq!(quota.first.remaining, 8.0);
        assert_eq!(quota.second.cap, 8.0);
        assert_eq!(quota.second.remaining, 4.0);
        assert_eq!(quota.second.slots, 1);
    }
}
