use std::sync::OnceLock;

use chrono::{DateTime, Local, TimeZone, Utc};
use regex::Regex;

use crate::CalendarEvent;


/// Parse iCalendar text into a list of events.
///
/// This is a deliberately forgiving scanner: malformed lines, unknown
/// properties and unterminated blocks degrade to fewer events, never an
/// error. An input with no VEVENT blocks yields an empty list.
pub fn parse_ics(input: &str) -> Vec<CalendarEvent> {
    let unfolded = unfold(input);
    let mut events = Vec::new();
    let mut state = BlockState::Idle;

    for line in unfolded.lines() {
        if line.trim().is_empty() {
            continue;
        }

        // Property spec before the first colon, raw value after it
        let Some((spec, value)) = line.split_once(':') else {
            continue;
        };
        let key = spec
            .split(';')
            .next()
            .unwrap_or(spec)
            .to_ascii_uppercase();

        match key.as_str() {
            "BEGIN" if value.eq_ignore_ascii_case("VEVENT") => {
                // A re-BEGIN silently drops any record still open
                state = BlockState::Open(DraftEvent::default());
            }
            "END" if value.eq_ignore_ascii_case("VEVENT") => {
                if let BlockState::Open(draft) = std::mem::replace(&mut state, BlockState::Idle) {
                    if let Some(event) = draft.finish() {
                        events.push(event);
                    }
                }
            }
            _ => {
                // Other properties only mean something inside an open block
                if let BlockState::Open(draft) = &mut state {
                    match key.as_str() {
                        "SUMMARY" => draft.title = Some(unescape_text(value)),
                        "DTSTART" => draft.start = Some(parse_ics_date(value)),
                        "DTEND" => draft.end = Some(parse_ics_date(value)),
                        "DESCRIPTION" => draft.description = Some(unescape_text(value)),
                        _ => {}
                    }
                }
            }
        }
    }

    events
}

/// Rejoin folded lines.
///
/// The iCalendar format splits long logical lines across physical lines,
/// marking each continuation with one leading space or tab. Deleting every
/// line-break-plus-marker pair restores the logical line verbatim.
pub fn unfold(input: &str) -> String {
    fold_pattern().replace_all(input, "").into_owned()
}

/// Parser block state: between blocks, or inside an open VEVENT
enum BlockState {
    Idle,
    Open(DraftEvent),
}

/// Accumulates properties of the currently open VEVENT block
#[derive(Default)]
struct DraftEvent {
    title: Option<String>,
    start: Option<DateTime<Local>>,
    end: Option<DateTime<Local>>,
    description: Option<String>,
}

impl DraftEvent {
    /// A block only becomes an event if both title and start were set
    fn finish(self) -> Option<CalendarEvent> {
        Some(CalendarEvent {
            title: self.title?,
            start: self.start?,
            end: self.end,
            description: self.description,
        })
    }
}

/// Undo the text escapes applied to SUMMARY/DESCRIPTION values
fn unescape_text(value: &str) -> String {
    value.replace("\\,", ",").replace("\\n", "\n")
}

/// Interpret a DTSTART/DTEND raw value as a local instant.
///
/// `YYYYMMDDTHHMMSSZ` is a UTC moment, `YYYYMMDDTHHMMSS` floating local
/// wall-clock time and bare `YYYYMMDD` local midnight (all-day event).
/// Unmatchable values fall back to any `YYYYMMDD` digit run anywhere in the
/// value, then to the current moment. Never fails.
fn parse_ics_date(raw: &str) -> DateTime<Local> {
    primary_date(raw.trim())
        .or_else(|| fallback_date(raw))
        .unwrap_or_else(Local::now)
}

fn primary_date(value: &str) -> Option<DateTime<Local>> {
    let caps = date_pattern().captures(value)?;
    let year: i32 = caps[1].parse().ok()?;
    let month: u32 = caps[2].parse().ok()?;
    let day: u32 = caps[3].parse().ok()?;

    let time = match (caps.get(4), caps.get(5), caps.get(6)) {
        (Some(h), Some(m), Some(s)) => Some((
            h.as_str().parse::<u32>().ok()?,
            m.as_str().parse::<u32>().ok()?,
            s.as_str().parse::<u32>().ok()?,
        )),
        _ => None,
    };

    match time {
        Some((hour, min, sec)) if caps.get(7).is_some() => {
            // Trailing Z: the six components name a UTC moment; carry the
            // instant into the local zone unchanged
            Utc.with_ymd_and_hms(year, month, day, hour, min, sec)
                .single()
                .map(|dt| dt.with_timezone(&Local))
        }
        Some((hour, min, sec)) => {
            // Floating time, interpreted as local wall clock
            Local
                .with_ymd_and_hms(year, month, day, hour, min, sec)
                .earliest()
        }
        None => local_midnight(year, month, day),
    }
}

/// Last-resort scan for a YYYYMMDD digit run anywhere in the value
fn fallback_date(value: &str) -> Option<DateTime<Local>> {
    let caps = fallback_pattern().captures(value)?;
    local_midnight(
        caps[1].parse().ok()?,
        caps[2].parse().ok()?,
        caps[3].parse().ok()?,
    )
}

fn local_midnight(year: i32, month: u32, day: u32) -> Option<DateTime<Local>> {
    Local.with_ymd_and_hms(year, month, day, 0, 0, 0).earliest()
}

fn fold_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\r?\n[ \t]").expect("valid fold pattern"))
}

fn date_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^(\d{4})(\d{2})(\d{2})(?:T(\d{2})(\d{2})(\d{2})(Z)?)?")
            .expect("valid date pattern")
    })
}

fn fallback_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"(\d{4})(\d{2})(\d{2})").expect("valid fallback pattern"))
}
