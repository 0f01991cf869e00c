use chrono::{Datelike, Duration, NaiveDateTime, NaiveTime, Weekday};

use crate::models::branch::{Branch, WeekSchedule};

/// The first upcoming opening of some branch. `days_ahead` is 0 for today.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NextOpening {
    pub days_ahead: u8,
    pub weekday: Weekday,
    pub time: NaiveTime,
}

impl NextOpening {
    fn sort_key(&self) -> (u8, NaiveTime) {
        (self.days_ahead, self.time)
    }
}

/// Whether the schedule is open at `now`, using a half-open
/// `[open, close)` window. Windows crossing midnight are not supported.
pub fn is_open_at(hours: &WeekSchedule, now: NaiveDateTime) -> bool {
    let day = hours.for_weekday(now.weekday());
    day.is_open && day.open <= now.time() && now.time() < day.close
}

/// Scan forward day by day for the first day the schedule opens.
///
/// Today counts while `now` is still before closing time, so a currently
/// open branch reports today's opening. The scan reaches day seven so a
/// schedule open only on today's weekday still resolves after closing time.
/// Returns `None` when no day of the week is configured open.
pub fn next_opening(hours: &WeekSchedule, now: NaiveDateTime) -> Option<NextOpening> {
    for offset in 0..=7u8 {
        let date = now.date() + Duration::days(offset as i64);
        let day = hours.for_weekday(date.weekday());
        if !day.is_open {
            continue;
        }
        if offset == 0 && now.time() >= day.close {
            continue;
        }
        return Some(NextOpening {
            days_ahead: offset,
            weekday: date.weekday(),
            time: day.open,
        });
    }
    None
}

/// The earliest upcoming opening across a set of branches: same-day first,
/// then soonest clock time. `None` means indefinite closure.
pub fn next_opening_across<'a>(
    branches: impl IntoIterator<Item = &'a Branch>,
    now: NaiveDateTime,
) -> Option<NextOpening> {
    branches
        .into_iter()
        .filter_map(|branch| next_opening(&branch.hours, now))
        .min_by_key(NextOpening::sort_key)
}

pub fn any_open<'a>(branches: impl IntoIterator<Item = &'a Branch>, now: NaiveDateTime) -> bool {
    branches
        .into_iter()
        .any(|branch| is_open_at(&branch.hours, now))
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use uuid::Uuid;

    use super::*;
    use crate::models::branch::DayHours;

    fn hm(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    // 2026-08-24 is a Monday.
    fn monday_at(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 8, 24).unwrap().and_time(hm(h, m))
    }

    fn open_daily(open: NaiveTime, close: NaiveTime) -> WeekSchedule {
        WeekSchedule(
            [DayHours {
                is_open: true,
                open,
                close,
            }; 7],
        )
    }

    fn branch(name: &str, hours: WeekSchedule) -> Branch {
        Branch {
            id: Uuid::new_v4(),
            name: name.to_string(),
            hours,
        }
    }

    #[test]
    fn half_open_interval_boundaries() {
        let hours = open_daily(hm(8, 0), hm(18, 0));

        assert!(!is_open_at(&hours, monday_at(7, 59)));
        assert!(is_open_at(&hours, monday_at(8, 0)));
        assert!(is_open_at(&hours, monday_at(17, 59)));
        assert!(!is_open_at(&hours, monday_at(18, 0)));
    }

    #[test]
    fn closed_day_is_closed_at_any_time() {
        let mut hours = open_daily(hm(8, 0), hm(18, 0));
        hours.0[0].is_open = false; // Monday

        assert!(!is_open_at(&hours, monday_at(12, 0)));
        // Tuesday still opens normally.
        assert!(is_open_at(&hours, monday_at(12, 0) + Duration::days(1)));
    }

    #[test]
    fn next_opening_is_today_while_before_close() {
        let hours = open_daily(hm(8, 0), hm(18, 0));
        let next = next_opening(&hours, monday_at(10, 0)).unwrap();

        assert_eq!(next.days_ahead, 0);
        assert_eq!(next.weekday, Weekday::Mon);
        assert_eq!(next.time, hm(8, 0));
    }

    #[test]
    fn next_opening_rolls_to_tomorrow_after_close() {
        let hours = open_daily(hm(8, 0), hm(18, 0));
        let next = next_opening(&hours, monday_at(19, 0)).unwrap();

        assert_eq!(next.days_ahead, 1);
        assert_eq!(next.weekday, Weekday::Tue);
    }

    #[test]
    fn next_opening_skips_closed_days() {
        let mut hours = open_daily(hm(9, 0), hm(17, 0));
        hours.0[1].is_open = false; // Tuesday
        hours.0[2].is_open = false; // Wednesday

        let next = next_opening(&hours, monday_at(20, 0)).unwrap();
        assert_eq!(next.days_ahead, 3);
        assert_eq!(next.weekday, Weekday::Thu);
    }

    #[test]
    fn mondays_only_schedule_wraps_to_next_week() {
        let mut hours = WeekSchedule::always_closed();
        hours.0[0] = DayHours {
            is_open: true,
            open: hm(9, 0),
            close: hm(17, 0),
        };

        let next = next_opening(&hours, monday_at(20, 0)).unwrap();
        assert_eq!(next.days_ahead, 7);
        assert_eq!(next.weekday, Weekday::Mon);
        assert_eq!(next.time, hm(9, 0));
    }

    #[test]
    fn fully_closed_schedule_has_no_opening() {
        assert_eq!(
            next_opening(&WeekSchedule::always_closed(), monday_at(10, 0)),
            None
        );
    }

    #[test]
    fn soonest_branch_wins_across_the_fleet() {
        // One branch opens today at 14:00, the other not until tomorrow 08:00.
        let later_today = open_daily(hm(14, 0), hm(22, 0));
        let mut tomorrow_only = open_daily(hm(8, 0), hm(18, 0));
        tomorrow_only.0[0].is_open = false;

        let fleet = [
            branch("tomorrow", tomorrow_only),
            branch("today", later_today),
        ];

        let next = next_opening_across(fleet.iter(), monday_at(10, 0)).unwrap();
        assert_eq!(next.days_ahead, 0);
        assert_eq!(next.time, hm(14, 0));
    }

    #[test]
    fn any_open_is_true_with_one_open_branch() {
        let now = monday_at(12, 0);
        let open = branch("open", open_daily(hm(8, 0), hm(18, 0)));
        let closed = branch("closed", WeekSchedule::always_closed());

        let fleet = vec![closed.clone(), open];
        assert!(any_open(fleet.iter(), now));
        assert!(!any_open(std::iter::once(&closed), now));
    }
}
