//! Date-of-birth picker: month, day, and year reels where the day reel's
//! length follows the selected month and year.

use chrono::{Datelike, NaiveDate};
use tracing::debug;

use crate::config::PickerConfig;
use crate::onboarding::model::BirthDate;

use super::reel::WheelReel;

/// Gregorian leap year rule.
pub fn is_leap_year(year: i32) -> bool {
    year % 4 == 0 && (year % 100 != 0 || year % 400 == 0)
}

/// Number of days in `month` (1-12) of `year`: the day before the first of
/// the following month.
pub fn days_in_month(year: i32, month: u32) -> u32 {
    let month = month.clamp(1, 12);
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .and_then(|d| d.pred_opt())
        .map(|d| d.day())
        .unwrap_or_else(|| match month {
            2 if is_leap_year(year) => 29,
            2 => 28,
            4 | 6 | 9 | 11 => 30,
            _ => 31,
        })
}

/// Short English month name for a 1-based month.
pub fn month_label(month: u32) -> &'static str {
    u8::try_from(month)
        .ok()
        .and_then(|m| chrono::Month::try_from(m).ok())
        .map(|m| &m.name()[..3])
        .unwrap_or("")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateReel {
    Month,
    Day,
    Year,
}

/// Three coupled reels. Every reel is laid out and centered when the picker
/// is opened, so a save always has a complete date to return.
#[derive(Debug, Clone)]
pub struct DatePicker {
    months: WheelReel<u32>,
    days: WheelReel<u32>,
    years: WheelReel<i32>,
    seed: BirthDate,
}

impl DatePicker {
    /// Open on `value`, or on `today` when no date is set yet. Values outside
    /// the configured year range, or past the end of their month, are
    /// clamped. An inverted year range is read with its bounds swapped.
    pub fn open(config: &PickerConfig, value: Option<BirthDate>, today: NaiveDate) -> Self {
        let min_year = config.min_year.min(config.max_year);
        let max_year = config.min_year.max(config.max_year);
        let seed = value.unwrap_or_else(|| BirthDate::from(today));
        let year = seed.year.clamp(min_year, max_year);
        let month = seed.month.clamp(1, 12);
        let day = seed.day.clamp(1, days_in_month(year, month));
        let seed = BirthDate::new(year, month, day);

        let mut months = WheelReel::new((1..=12).collect(), config);
        let mut days = WheelReel::new((1..=days_in_month(year, month)).collect(), config);
        let mut years = WheelReel::new((min_year..=max_year).collect(), config);

        months.scroll_to_index((month - 1) as usize);
        days.scroll_to_index((day - 1) as usize);
        years.scroll_to_index((year - min_year) as usize);

        debug!(seed = %seed, "Date picker opened");
        Self {
            months,
            days,
            years,
            seed,
        }
    }

    /// Open on `value`, falling back to the local date.
    pub fn open_today(config: &PickerConfig, value: Option<BirthDate>) -> Self {
        Self::open(config, value, chrono::Local::now().date_naive())
    }

    pub fn months(&self) -> &WheelReel<u32> {
        &self.months
    }

    pub fn days(&self) -> &WheelReel<u32> {
        &self.days
    }

    pub fn years(&self) -> &WheelReel<i32> {
        &self.years
    }

    /// Continuous scroll on one reel. Returns the centered index. The day
    /// reel follows the month and year centered mid-gesture.
    pub fn on_scroll(&mut self, reel: DateReel, offset_y: f64) -> Option<usize> {
        let index = match reel {
            DateReel::Month => self.months.on_scroll(offset_y),
            DateReel::Day => self.days.on_scroll(offset_y),
            DateReel::Year => self.years.on_scroll(offset_y),
        };
        self.refresh_days(reel);
        index
    }

    /// Momentum ended on one reel.
    pub fn on_momentum_end(&mut self, reel: DateReel, offset_y: f64) -> Option<usize> {
        let index = match reel {
            DateReel::Month => self.months.on_momentum_end(offset_y),
            DateReel::Day => self.days.on_momentum_end(offset_y),
            DateReel::Year => self.years.on_momentum_end(offset_y),
        };
        self.refresh_days(reel);
        index
    }

    /// Tap on the selection band of one reel.
    pub fn tap_commit(&mut self, reel: DateReel) -> Option<usize> {
        let index = match reel {
            DateReel::Month => self.months.commit_center(),
            DateReel::Day => self.days.commit_center(),
            DateReel::Year => self.years.commit_center(),
        };
        self.refresh_days(reel);
        index
    }

    /// The selected date. The day is clamped into the selected month so a
    /// month or year that was scrolled but never committed cannot produce an
    /// impossible date.
    pub fn save(&self) -> BirthDate {
        let year = self.years.selected_item().copied().unwrap_or(self.seed.year);
        let month = self.months.selected_item().copied().unwrap_or(self.seed.month);
        let day = self.days.selected_item().copied().unwrap_or(self.seed.day);
        let date = BirthDate::new(year, month, day.min(days_in_month(year, month)));
        debug!(date = %date, "Date picker saved");
        date
    }

    fn refresh_days(&mut self, changed: DateReel) {
        if changed == DateReel::Day {
            return;
        }
        let year = self.years.selected_item().copied().unwrap_or(self.seed.year);
        let month = self.months.selected_item().copied().unwrap_or(self.seed.month);
        let count = days_in_month(year, month);
        if self.days.len() != count as usize {
            debug!(year, month, count, "Day reel resized");
            self.days.set_items((1..=count).collect());
        }
    }
}
