use chrono::{Datelike, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    CalendarEvent, LayoutBlock, MonthConfig, PageOptions,
    grid::{self, GridCell},
};

/// A grid cell with any events overlaid onto it
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum PageCell {
    /// Weekday label cell
    Header { label: String },
    /// Blank padding cell
    Filler,
    /// A day of the month and the events starting on it
    Day {
        number: u32,
        events: Vec<CalendarEvent>,
    },
}

/// One fully composed month page, ready for a renderer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonthPage {
    /// Month index, 0 = January .. 11 = December
    pub month: u32,
    pub year: i32,
    /// English month name
    pub name: String,
    /// Visible content blocks in render order
    pub blocks: Vec<LayoutBlock>,
    pub image: Option<String>,
    pub quote: Option<String>,
    /// Grid column count under the configured row policy
    pub columns: u32,
    pub cells: Vec<PageCell>,
}

/// Compose a single month page: resolve the visible block order, lay out the
/// grid and overlay the matching events onto its day cells.
pub fn compose_month(
    config: &MonthConfig,
    options: &PageOptions,
    events: &[CalendarEvent],
) -> MonthPage {
    let month_events: Vec<&CalendarEvent> = if options.show_events {
        events
            .iter()
            .filter(|event| event_in_month(event, config.year, config.month))
            .collect()
    } else {
        Vec::new()
    };

    let cells = if options.show_grid {
        grid::layout(config.month, config.year, options.grid_rows)
            .into_iter()
            .map(|cell| match cell {
                GridCell::Header { label } => PageCell::Header { label },
                GridCell::Filler => PageCell::Filler,
                GridCell::Day { number } => PageCell::Day {
                    number,
                    events: month_events
                        .iter()
                        .filter(|event| event_falls_on(event, config.year, config.month, number))
                        .map(|event| (*event).clone())
                        .collect(),
                },
            })
            .collect()
    } else {
        Vec::new()
    };

    MonthPage {
        month: config.month,
        year: config.year,
        name: grid::month_name(config.month).to_string(),
        blocks: visible_blocks(config, options),
        image: if options.show_images {
            config.image.clone()
        } else {
            None
        },
        quote: if options.show_quotes {
            config.quote.clone()
        } else {
            None
        },
        columns: grid::columns_for(config.month, config.year, options.grid_rows),
        cells,
    }
}

/// Compose the given month configs in order, one page each
pub fn compose_year(
    configs: &[MonthConfig],
    options: &PageOptions,
    events: &[CalendarEvent],
) -> Vec<MonthPage> {
    configs
        .iter()
        .map(|config| compose_month(config, options, events))
        .collect()
}

/// Does the event start on this calendar day?
///
/// The check passes if either the local or the UTC calendar fields of the
/// start moment name the day. Floating and UTC-anchored ICS timestamps
/// bucket differently around midnight; matching either interpretation keeps
/// both kinds on the day the calendar intended.
pub fn event_falls_on(event: &CalendarEvent, year: i32, month: u32, day: u32) -> bool {
    let local = event.start;
    let utc = event.start.with_timezone(&Utc);
    (local.year() == year && local.month0() == month && local.day() == day)
        || (utc.year() == year && utc.month0() == month && utc.day() == day)
}

/// Month-level counterpart of [`event_falls_on`], same dual interpretation
pub fn event_in_month(event: &CalendarEvent, year: i32, month: u32) -> bool {
    let local = event.start;
    let utc = event.start.with_timezone(&Utc);
    (local.year() == year && local.month0() == month)
        || (utc.year() == year && utc.month0() == month)
}

/// Drop blocks hidden by their visibility flags; a quote block with no quote
/// text is dropped as well
fn visible_blocks(config: &MonthConfig, options: &PageOptions) -> Vec<LayoutBlock> {
    options
        .layout_order
        .iter()
        .copied()
        .filter(|block| match block {
            LayoutBlock::Header => options.show_title || options.show_year,
            LayoutBlock::Image => options.show_images,
            LayoutBlock::Quote => options.show_quotes && config.quote.is_some(),
            LayoutBlock::Grid => options.show_grid,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use chrono::{Local, TimeZone};

    use super::*;

    fn event_at(title: &str, start: chrono::DateTime<Local>) -> CalendarEvent {
        CalendarEvent {
            title: title.to_string(),
            start,
            end: None,
            description: None,
        }
    }

    fn day_cell(page: &MonthPage, number: u32) -> &PageCell {
        page.cells
            .iter()
            .find(|cell| matches!(cell, PageCell::Day { number: n, .. } if *n == number))
            .expect("day cell present")
    }

    #[test]
    fn test_utc_midnight_event_lands_on_utc_day() {
        // A ...T000000Z start: the UTC fields name Jan 1 even when the local
        // zone has already rolled the instant into another day
        let event = event_at(
            "New Year",
            Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0)
                .unwrap()
                .with_timezone(&Local),
        );
        assert!(event_falls_on(&event, 2024, 0, 1));
        assert!(event_in_month(&event, 2024, 0));
    }

    #[test]
    fn test_floating_event_lands_on_local_day() {
        let event = event_at("Meeting", Local.with_ymd_and_hms(2024, 2, 15, 9, 0, 0).unwrap());
        assert!(event_falls_on(&event, 2024, 1, 15));
        assert!(!event_falls_on(&event, 2024, 1, 16));
    }

    #[test]
    fn test_events_overlaid_on_day_cells() {
        let config = MonthConfig {
            month: 2,
            year: 2024,
            image: None,
            quote: None,
        };
        let events = vec![
            event_at("Planning", Local.with_ymd_and_hms(2024, 3, 15, 9, 0, 0).unwrap()),
            event_at("Review", Local.with_ymd_and_hms(2024, 3, 15, 14, 0, 0).unwrap()),
            event_at("Elsewhere", Local.with_ymd_and_hms(2024, 4, 15, 9, 0, 0).unwrap()),
        ];

        let page = compose_month(&config, &PageOptions::default(), &events);

        let PageCell::Day { events: on_15th, .. } = day_cell(&page, 15) else {
            unreachable!();
        };
        assert_eq!(on_15th.len(), 2);
        assert_eq!(on_15th[0].title, "Planning");

        let PageCell::Day { events: on_16th, .. } = day_cell(&page, 16) else {
            unreachable!();
        };
        assert!(on_16th.is_empty());
    }

    #[test]
    fn test_hidden_events_leave_cells_bare() {
        let config = MonthConfig {
            month: 2,
            year: 2024,
            image: None,
            quote: None,
        };
        let events = vec![event_at(
            "Planning",
            Local.with_ymd_and_hms(2024, 3, 15, 9, 0, 0).unwrap(),
        )];
        let options = PageOptions {
            show_events: false,
            ..PageOptions::default()
        };

        let page = compose_month(&config, &options, &events);
        let PageCell::Day { events, .. } = day_cell(&page, 15) else {
            unreachable!();
        };
        assert!(events.is_empty());
    }

    #[test]
    fn test_block_visibility() {
        let config = MonthConfig {
            month: 0,
            year: 2024,
            image: Some("cover.jpg".to_string()),
            quote: None,
        };

        // No quote text: the quote block drops out even though quotes are on
        let page = compose_month(&config, &PageOptions::default(), &[]);
        assert_eq!(
            page.blocks,
            vec![LayoutBlock::Header, LayoutBlock::Image, LayoutBlock::Grid]
        );

        let options = PageOptions {
            show_title: false,
            show_year: false,
            show_images: false,
            ..PageOptions::default()
        };
        let page = compose_month(&config, &options, &[]);
        assert_eq!(page.blocks, vec![LayoutBlock::Grid]);
        assert!(page.image.is_none());
    }

    #[test]
    fn test_compose_year_in_order() {
        let configs = MonthConfig::year_set(2025);
        let pages = compose_year(&configs, &PageOptions::default(), &[]);

        assert_eq!(pages.len(), 12);
        assert_eq!(pages[0].name, "January");
        assert_eq!(pages[11].name, "December");
        assert!(pages.iter().enumerate().all(|(i, p)| p.month == i as u32));
    }

    #[test]
    fn test_custom_rows_reach_the_page() {
        let config = MonthConfig {
            month: 0,
            year: 2023,
            image: None,
            quote: None,
        };
        let options = PageOptions {
            grid_rows: 4,
            ..PageOptions::default()
        };

        let page = compose_month(&config, &options, &[]);
        assert_eq!(page.columns, 8);
        assert_eq!(page.cells.len(), 64);
    }
}
