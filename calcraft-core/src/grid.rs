use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// Short weekday names for the fixed Sun..Sat header of the standard layout
const SHORT_DAY_NAMES: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

/// English month names, indexed 0 = January .. 11 = December
const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// One cell of a month grid, in render order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum GridCell {
    /// Weekday label cell
    Header { label: String },
    /// Blank cell padding the grid around the month's days
    Filler,
    /// A day of the month
    Day { number: u32 },
}

/// Number of days in the given month (0 = January .. 11 = December)
pub fn days_in_month(month: u32, year: i32) -> u32 {
    let (next_year, next_month) = if month == 11 {
        (year + 1, 0)
    } else {
        (year, month + 1)
    };
    first_of(next_month, next_year)
        .pred_opt()
        .expect("month has a last day")
        .day()
}

/// Weekday of the 1st of the month, 0 = Sunday .. 6 = Saturday
pub fn first_weekday_of_month(month: u32, year: i32) -> u32 {
    first_of(month, year).weekday().num_days_from_sunday()
}

/// Column count the given row policy produces for this month
pub fn columns_for(month: u32, year: i32, rows: u32) -> u32 {
    if rows == 0 {
        7
    } else {
        days_in_month(month, year).div_ceil(rows)
    }
}

/// Lay out one month as an ordered cell sequence.
///
/// `rows == 0` is the standard weekly layout: a fixed Sun..Sat header row,
/// fillers up to the month's first weekday, then the days. The tail is not
/// padded, so the last week may be short.
///
/// `rows >= 1` forces the days into that many rows of
/// `ceil(days / rows)` columns. Each row carries its own header row naming
/// the weekday of the date beneath it; slots past the last day are fillers.
pub fn layout(month: u32, year: i32, rows: u32) -> Vec<GridCell> {
    if rows == 0 {
        standard_layout(month, year)
    } else {
        custom_layout(month, year, rows)
    }
}

/// English name of the month (0 = January .. 11 = December)
pub fn month_name(month: u32) -> &'static str {
    MONTH_NAMES[month as usize % 12]
}

fn standard_layout(month: u32, year: i32) -> Vec<GridCell> {
    let days = days_in_month(month, year);
    let leading = first_weekday_of_month(month, year);
    let mut cells = Vec::with_capacity((7 + leading + days) as usize);

    for name in SHORT_DAY_NAMES {
        cells.push(GridCell::Header {
            label: name.to_string(),
        });
    }
    for _ in 0..leading {
        cells.push(GridCell::Filler);
    }
    for number in 1..=days {
        cells.push(GridCell::Day { number });
    }

    cells
}

fn custom_layout(month: u32, year: i32, rows: u32) -> Vec<GridCell> {
    let days = days_in_month(month, year);
    let columns = days.div_ceil(rows);
    let mut cells = Vec::with_capacity((2 * rows * columns) as usize);

    for row in 0..rows {
        // Header row: weekday of the date each column will hold
        for col in 0..columns {
            let number = row * columns + col + 1;
            if number <= days {
                let date = first_of(month, year)
                    .with_day(number)
                    .expect("day within month");
                cells.push(GridCell::Header {
                    label: weekday_label(date, columns),
                });
            } else {
                cells.push(GridCell::Filler);
            }
        }
        // Day row beneath it
        for col in 0..columns {
            let number = row * columns + col + 1;
            if number <= days {
                cells.push(GridCell::Day { number });
            } else {
                cells.push(GridCell::Filler);
            }
        }
    }

    cells
}

/// Weekday label sized to the column count: initial for very wide grids,
/// short name for wide ones, full name when columns fit a week
fn weekday_label(date: NaiveDate, columns: u32) -> String {
    if columns > 15 {
        date.format("%A")
            .to_string()
            .chars()
            .next()
            .map(String::from)
            .unwrap_or_default()
    } else if columns > 7 {
        date.format("%a").to_string()
    } else {
        date.format("%A").to_string()
    }
}

fn first_of(month: u32, year: i32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month + 1, 1).expect("month index in 0..12")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day_numbers(cells: &[GridCell]) -> Vec<u32> {
        cells
            .iter()
            .filter_map(|cell| match cell {
                GridCell::Day { number } => Some(*number),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_days_in_month() {
        assert_eq!(days_in_month(0, 2023), 31);
        assert_eq!(days_in_month(1, 2023), 28);
        assert_eq!(days_in_month(1, 2024), 29); // leap year
        assert_eq!(days_in_month(1, 2100), 28); // century, not leap
        assert_eq!(days_in_month(1, 2000), 29); // divisible by 400
        assert_eq!(days_in_month(3, 2024), 30);
        assert_eq!(days_in_month(11, 2024), 31);
    }

    #[test]
    fn test_first_weekday_of_month() {
        // 2024-02-01 was a Thursday, 2023-01-01 a Sunday
        assert_eq!(first_weekday_of_month(1, 2024), 4);
        assert_eq!(first_weekday_of_month(0, 2023), 0);
        // 2024-09-01 a Sunday, 2024-06-01 a Saturday
        assert_eq!(first_weekday_of_month(8, 2024), 0);
        assert_eq!(first_weekday_of_month(5, 2024), 6);
    }

    #[test]
    fn test_standard_layout_february_2024() {
        // February 2024: 29 days, starts on a Thursday
        let cells = layout(1, 2024, 0);

        assert_eq!(cells.len(), 7 + 4 + 29);
        for (cell, name) in cells.iter().zip(SHORT_DAY_NAMES) {
            assert_eq!(
                cell,
                &GridCell::Header {
                    label: name.to_string()
                }
            );
        }
        assert!(cells[7..11].iter().all(|c| *c == GridCell::Filler));
        let days: Vec<u32> = day_numbers(&cells);
        assert_eq!(days, (1..=29).collect::<Vec<_>>());
    }

    #[test]
    fn test_standard_layout_has_no_tail_padding() {
        // September 2024 starts on a Sunday: no fillers at all
        let cells = layout(8, 2024, 0);
        assert_eq!(cells.len(), 7 + 30);
        assert!(!cells.contains(&GridCell::Filler));
    }

    #[test]
    fn test_custom_layout_four_rows() {
        // January 2023: 31 days over 4 rows -> 8 columns, 64 cells
        let cells = layout(0, 2023, 4);

        assert_eq!(cells.len(), 2 * 4 * 8);
        let days = day_numbers(&cells);
        assert_eq!(days, (1..=31).collect::<Vec<_>>());

        // Last day row: 31 followed by one filler
        assert_eq!(cells[62], GridCell::Day { number: 31 });
        assert_eq!(cells[63], GridCell::Filler);
        // Header slot above the filler is a filler too
        assert_eq!(cells[55], GridCell::Filler);
    }

    #[test]
    fn test_linear_layout_single_row() {
        // One row means one column per day, headers shrink to initials
        let cells = layout(0, 2023, 1);

        assert_eq!(cells.len(), 2 * 31);
        // 2023-01-01 was a Sunday
        assert_eq!(
            cells[0],
            GridCell::Header {
                label: "S".to_string()
            }
        );
        assert_eq!(cells[31], GridCell::Day { number: 1 });
    }

    #[test]
    fn test_custom_header_label_forms() {
        // 31 days / 3 rows = 11 columns: short names
        let cells = layout(0, 2023, 3);
        assert_eq!(
            cells[0],
            GridCell::Header {
                label: "Sun".to_string()
            }
        );

        // 31 days / 5 rows = 7 columns: full names
        let cells = layout(0, 2023, 5);
        assert_eq!(
            cells[0],
            GridCell::Header {
                label: "Sunday".to_string()
            }
        );
    }

    #[test]
    fn test_custom_rows_header_matches_date_weekday() {
        // January 2023, 4 rows of 8: day 9 sits at row 1 col 0, a Monday
        let cells = layout(0, 2023, 4);
        assert_eq!(
            cells[16],
            GridCell::Header {
                label: "Mon".to_string()
            }
        );
        assert_eq!(cells[24], GridCell::Day { number: 9 });
    }

    #[test]
    fn test_columns_for() {
        assert_eq!(columns_for(0, 2023, 0), 7);
        assert_eq!(columns_for(0, 2023, 4), 8);
        assert_eq!(columns_for(1, 2024, 4), 8); // ceil(29 / 4)
        assert_eq!(columns_for(0, 2023, 1), 31);
    }

    #[test]
    fn test_month_name() {
        assert_eq!(month_name(0), "January");
        assert_eq!(month_name(11), "December");
    }
}
