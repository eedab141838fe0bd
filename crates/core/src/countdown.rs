use chrono::{Datelike, NaiveDate};

/// The next February the 14th on or after `today`.
pub fn next_valentines_day(today: NaiveDate) -> NaiveDate {
    let this_year = valentines_in(today.year());
    if today <= this_year {
        this_year
    } else {
        valentines_in(today.year() + 1)
    }
}

/// Whole days until the next Valentine's Day; zero on the day itself.
pub fn days_until_valentines(today: NaiveDate) -> i64 {
    (next_valentines_day(today) - today).num_days()
}

fn valentines_in(year: i32) -> NaiveDate {
    // Feb 14 exists in every year.
    NaiveDate::from_ymd_opt(year, 2, 14).unwrap_or(NaiveDate::MIN)
}
