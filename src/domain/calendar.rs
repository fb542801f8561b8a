use chrono::{Days, NaiveDate, NaiveDateTime, Timelike};

use super::region::normalize_label;

/// Hour (local) after which the next calendar day is closed for ordering.
pub const NEXT_DAY_CUTOFF_HOUR: u32 = 12;

/// A deliverable day of a weekly menu. Weekends are never orderable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuDay {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
}

impl MenuDay {
    /// Parses a Slovak or English day label, ignoring case and diacritics.
    pub fn from_label(label: &str) -> Option<Self> {
        match normalize_label(label).as_str() {
            "pondelok" | "monday" => Some(MenuDay::Monday),
            "utorok" | "tuesday" => Some(MenuDay::Tuesday),
            "streda" | "wednesday" => Some(MenuDay::Wednesday),
            "stvrtok" | "thursday" => Some(MenuDay::Thursday),
            "piatok" | "friday" => Some(MenuDay::Friday),
            _ => None,
        }
    }

    /// Monday = 1 ... Friday = 5.
    pub fn index(self) -> u64 {
        match self {
            MenuDay::Monday => 1,
            MenuDay::Tuesday => 2,
            MenuDay::Wednesday => 3,
            MenuDay::Thursday => 4,
            MenuDay::Friday => 5,
        }
    }

    pub fn date_in_week(self, week_start: NaiveDate) -> Option<NaiveDate> {
        week_start.checked_add_days(Days::new(self.index() - 1))
    }
}

/// Whether `day_label` of the menu starting on `menu_window_start` can still
/// be ordered at `now`.
///
/// Past days and today are closed. Tomorrow closes at noon today.
pub fn is_day_orderable(day_label: &str, menu_window_start: NaiveDate, now: NaiveDateTime) -> bool {
    let Some(day) = MenuDay::from_label(day_label) else {
        return false;
    };
    let Some(day_date) = day.date_in_week(menu_window_start) else {
        return false;
    };
    let today = now.date();

    if day_date <= today {
        return false;
    }
    if now.hour() >= NEXT_DAY_CUTOFF_HOUR && today.succ_opt() == Some(day_date) {
        return false;
    }
    true
}
