use serde::Serialize;
use time::error::ComponentRange;
use time::util::days_in_year_month;
use time::{Date, Month, OffsetDateTime, Time, UtcOffset};

use crate::domain::post::PostData;

/// Month grid with posts placed on the day they are scheduled or were published.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarGrid {
    pub year: i32,
    pub month: u8,
    /// Empty cells before day 1 in a Monday-first week.
    pub leading_blanks: u8,
    pub days: Vec<CalendarDay>,
    /// More posts fell in this month than were fetched.
    pub truncated: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CalendarDay {
    pub day: u8,
    pub posts: Vec<PostData>,
}

impl CalendarGrid {
    /// Buckets by the selected month/year, never by today's date.
    pub fn build(
        year: i32,
        month: Month,
        posts: &[PostData],
        offset: UtcOffset,
    ) -> Result<Self, ComponentRange> {
        let first = Date::from_calendar_date(year, month, 1)?;
        let day_count = days_in_year_month(year, month);

        let mut days: Vec<CalendarDay> = (1..=day_count)
            .map(|day| CalendarDay {
                day,
                posts: Vec::new(),
            })
            .collect();

        for post in posts {
            let Some(at) = post.raw.calendar_time() else {
                continue;
            };
            let local = at.to_offset(offset);
            if local.year() != year || local.month() != month {
                continue;
            }
            if let Some(cell) = days.get_mut(usize::from(local.day()) - 1) {
                cell.posts.push(post.clone());
            }
        }

        Ok(Self {
            year,
            month: month as u8,
            leading_blanks: first.weekday().number_days_from_monday(),
            days,
            truncated: false,
        })
    }

    pub fn day(&self, day: u8) -> Option<&CalendarDay> {
        self.days.iter().find(|cell| cell.day == day)
    }

    pub fn post_count(&self) -> usize {
        self.days.iter().map(|cell| cell.posts.len()).sum()
    }
}

/// First instant and last second of a month in the given offset.
pub fn month_bounds(
    year: i32,
    month: Month,
    offset: UtcOffset,
) -> Result<(OffsetDateTime, OffsetDateTime), ComponentRange> {
    let first = Date::from_calendar_date(year, month, 1)?;
    let last = Date::from_calendar_date(year, month, days_in_year_month(year, month))?;
    day_bounds(first, last, offset)
}

/// Start of `start` to the last second of `end` in the given offset.
pub fn day_bounds(
    start: Date,
    end: Date,
    offset: UtcOffset,
) -> Result<(OffsetDateTime, OffsetDateTime), ComponentRange> {
    let end_of_day = Time::from_hms(23, 59, 59)?;
    Ok((
        start.with_time(Time::MIDNIGHT).assume_offset(offset),
        end.with_time(end_of_day).assume_offset(offset),
    ))
}
