use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Default accent color applied to newly imported calendar sources
pub const DEFAULT_ACCENT: &str = "#6366f1";

/// A single calendar event, produced by the ICS parser
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalendarEvent {
    /// Event title (SUMMARY)
    pub title: String,
    /// Start moment (DTSTART)
    pub start: DateTime<Local>,
    /// End moment (DTEND)
    pub end: Option<DateTime<Local>>,
    /// Free-text description (DESCRIPTION)
    pub description: Option<String>,
}

/// An imported calendar file and its parsed events
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalendarSource {
    pub id: Uuid,
    /// Display name, usually the file name without extension
    pub name: String,
    /// Accent color used when rendering this source's events
    pub color: String,
    /// Inactive sources keep their events but contribute none to pages
    pub active: bool,
    pub events: Vec<CalendarEvent>,
}

/// Per-month page content: background image and inspirational quote
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonthConfig {
    /// Month index, 0 = January .. 11 = December
    pub month: u32,
    pub year: i32,
    /// Background image reference (URL or opaque data string)
    pub image: Option<String>,
    pub quote: Option<String>,
}

impl MonthConfig {
    /// One bare config per month of the given year, January..December
    pub fn year_set(year: i32) -> Vec<Self> {
        (0..12)
            .map(|month| Self {
                month,
                year,
                image: None,
                quote: None,
            })
            .collect()
    }
}

/// Physical page dimensions
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageSize {
    A4,
    A5,
    Custom { width_mm: f64, height_mm: f64 },
}

impl PageSize {
    /// (width, height) in millimetres, portrait orientation
    pub fn dimensions_mm(self) -> (f64, f64) {
        match self {
            Self::A4 => (210.0, 297.0),
            Self::A5 => (148.0, 210.0),
            Self::Custom {
                width_mm,
                height_mm,
            } => (width_mm, height_mm),
        }
    }
}

/// The stackable content blocks of a month page, top to bottom
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayoutBlock {
    /// Month title and year label
    Header,
    Image,
    Quote,
    Grid,
}

/// Page composition options
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageOptions {
    /// Row policy: 0 = standard 7-column weeks, N >= 1 = forced N rows
    pub grid_rows: u32,
    pub page_size: PageSize,
    /// Block order; hidden or empty blocks are dropped at composition time
    pub layout_order: Vec<LayoutBlock>,
    pub show_title: bool,
    pub show_year: bool,
    pub show_grid: bool,
    pub show_events: bool,
    pub show_images: bool,
    pub show_quotes: bool,
}

impl Default for PageOptions {
    fn default() -> Self {
        Self {
            grid_rows: 0,
            page_size: PageSize::A4,
            layout_order: vec![
                LayoutBlock::Header,
                LayoutBlock::Image,
                LayoutBlock::Quote,
                LayoutBlock::Grid,
            ],
            show_title: true,
            show_year: true,
            show_grid: true,
            show_events: true,
            show_images: true,
            show_quotes: true,
        }
    }
}
