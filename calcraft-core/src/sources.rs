use uuid::Uuid;

use crate::{CalendarEvent, CalendarSource, DEFAULT_ACCENT, ics};

/// The set of imported calendar sources backing a page composition.
///
/// Sources keep their import order; inactive sources stay in the library but
/// contribute no events to pages.
#[derive(Debug, Clone, Default)]
pub struct SourceLibrary {
    sources: Vec<CalendarSource>,
}

impl SourceLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse raw ICS text and store it as a new, active source.
    ///
    /// Import never fails: unparseable content simply yields a source with
    /// zero events.
    pub fn import(&mut self, name: &str, ics_text: &str) -> &CalendarSource {
        let source = CalendarSource {
            id: Uuid::new_v4(),
            name: name.trim_end_matches(".ics").to_string(),
            color: DEFAULT_ACCENT.to_string(),
            active: true,
            events: ics::parse_ics(ics_text),
        };
        self.sources.push(source);
        self.sources.last().expect("just pushed")
    }

    /// Flip a source's active flag; false if the id is unknown
    pub fn toggle(&mut self, id: Uuid) -> bool {
        match self.sources.iter_mut().find(|source| source.id == id) {
            Some(source) => {
                source.active = !source.active;
                true
            }
            None => false,
        }
    }

    /// Remove a source; false if the id is unknown
    pub fn remove(&mut self, id: Uuid) -> bool {
        let before = self.sources.len();
        self.sources.retain(|source| source.id != id);
        self.sources.len() != before
    }

    pub fn get(&self, id: Uuid) -> Option<&CalendarSource> {
        self.sources.iter().find(|source| source.id == id)
    }

    /// All events of active sources, in import order
    pub fn active_events(&self) -> Vec<CalendarEvent> {
        self.sources
            .iter()
            .filter(|source| source.active)
            .flat_map(|source| source.events.iter().cloned())
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CalendarSource> {
        self.sources.iter()
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WORK_ICS: &str =
        "BEGIN:VEVENT\nSUMMARY:Standup\nDTSTART:20240315T090000\nEND:VEVENT\n\
         BEGIN:VEVENT\nSUMMARY:Retro\nDTSTART:20240322T160000\nEND:VEVENT";
    const HOME_ICS: &str = "BEGIN:VEVENT\nSUMMARY:Dentist\nDTSTART:20240320\nEND:VEVENT";

    #[test]
    fn test_import_strips_extension_and_activates() {
        let mut library = SourceLibrary::new();
        let source = library.import("work.ics", WORK_ICS);

        assert_eq!(source.name, "work");
        assert!(source.active);
        assert_eq!(source.events.len(), 2);
        assert_eq!(source.color, DEFAULT_ACCENT);
    }

    #[test]
    fn test_import_never_fails() {
        let mut library = SourceLibrary::new();
        let source = library.import("junk", "not an ics file at all");
        assert!(source.events.is_empty());
        assert_eq!(library.len(), 1);
    }

    #[test]
    fn test_active_events_respects_toggle_and_order() {
        let mut library = SourceLibrary::new();
        let work_id = library.import("work", WORK_ICS).id;
        library.import("home", HOME_ICS);

        let titles: Vec<_> = library
            .active_events()
            .into_iter()
            .map(|e| e.title)
            .collect();
        assert_eq!(titles, ["Standup", "Retro", "Dentist"]);

        assert!(library.toggle(work_id));
        let titles: Vec<_> = library
            .active_events()
            .into_iter()
            .map(|e| e.title)
            .collect();
        assert_eq!(titles, ["Dentist"]);

        assert!(library.toggle(work_id));
        assert_eq!(library.active_events().len(), 3);
    }

    #[test]
    fn test_remove() {
        let mut library = SourceLibrary::new();
        let id = library.import("work", WORK_ICS).id;

        assert!(library.remove(id));
        assert!(library.is_empty());
        assert!(!library.remove(id));
        assert!(!library.toggle(id));
    }
}
