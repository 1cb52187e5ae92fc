use log::{info, warn};

use crate::models::DniRecord;

const EMPTY_SLOT: &str = "-";

/// Where the scanner reports to: data slots, a status line, a loading
/// indicator and the submit/start/stop affordances.
pub trait DisplaySurface {
    fn show_status(&mut self, message: &str);
    fn show_error(&mut self, message: &str);
    fn show_record(&mut self, record: &DniRecord);
    fn clear_record(&mut self);
    fn set_loading(&mut self, loading: bool);
    fn set_submit_enabled(&mut self, enabled: bool);
    /// `scanning` disables start and enables stop.
    fn set_scan_controls(&mut self, scanning: bool);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayState {
    pub surname: String,
    pub given_name: String,
    pub document_number: String,
    pub nationality: String,
    pub birth_date: String,
    /// Set when the birth date slot holds something that is not a real date.
    pub birth_date_note: Option<String>,
    pub status: String,
    pub error: Option<String>,
    pub loading: bool,
    pub record_visible: bool,
    pub submit_enabled: bool,
    pub start_enabled: bool,
    pub stop_enabled: bool,
}

impl Default for DisplayState {
    fn default() -> Self {
        DisplayState {
            surname: EMPTY_SLOT.to_string(),
            given_name: EMPTY_SLOT.to_string(),
            document_number: EMPTY_SLOT.to_string(),
            nationality: EMPTY_SLOT.to_string(),
            birth_date: EMPTY_SLOT.to_string(),
            birth_date_note: None,
            status: String::new(),
            error: None,
            loading: false,
            record_visible: false,
            submit_enabled: false,
            start_enabled: true,
            stop_enabled: false,
        }
    }
}

pub const INVALID_DATE_NOTE: &str = "not a calendar date";

/// Flags a non-empty birth date that chrono cannot read as a calendar date,
/// such as a digit run picked up by the PDF417 pattern scan.
pub fn birth_date_note(record: &DniRecord) -> Option<String> {
    if record.birth_date.is_empty() || record.birth_date_naive().is_some() {
        None
    } else {
        Some(INVALID_DATE_NOTE.to_string())
    }
}

fn slot(value: &str) -> String {
    if value.is_empty() {
        EMPTY_SLOT.to_string()
    } else {
        value.to_string()
    }
}

impl DisplayState {
    fn fill(&mut self, record: &DniRecord) {
        self.surname = slot(&record.surname);
        self.given_name = slot(&record.given_name);
        self.document_number = slot(&record.document_number);
        self.nationality = slot(&record.nationality);
        self.birth_date = slot(&record.birth_date);
        self.birth_date_note = birth_date_note(record);
        self.record_visible = true;
    }

    fn clear(&mut self) {
        for value in [
            &mut self.surname,
            &mut self.given_name,
            &mut self.document_number,
            &mut self.nationality,
            &mut self.birth_date,
        ] {
            *value = EMPTY_SLOT.to_string();
        }
        self.birth_date_note = None;
        self.record_visible = false;
    }
}

/// Keeps display state in memory; every status and error line is also
/// appended to `messages`.
#[derive(Debug, Default)]
pub struct MemoryDisplay {
    pub state: DisplayState,
    pub messages: Vec<String>,
}

impl MemoryDisplay {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DisplaySurface for MemoryDisplay {
    fn show_status(&mut self, message: &str) {
        self.state.status = message.to_string();
        self.state.error = None;
        if !message.is_empty() {
            self.messages.push(message.to_string());
        }
    }

    fn show_error(&mut self, message: &str) {
        self.state.error = Some(message.to_string());
        self.messages.push(message.to_string());
    }

    fn show_record(&mut self, record: &DniRecord) {
        self.state.fill(record);
    }

    fn clear_record(&mut self) {
        self.state.clear();
    }

    fn set_loading(&mut self, loading: bool) {
        self.state.loading = loading;
    }

    fn set_submit_enabled(&mut self, enabled: bool) {
        self.state.submit_enabled = enabled;
    }

    fn set_scan_controls(&mut self, scanning: bool) {
        self.state.start_enabled = !scanning;
        self.state.stop_enabled = scanning;
    }
}

/// Terminal display for the CLI.
#[derive(Debug, Default)]
pub struct ConsoleDisplay {
    state: DisplayState,
}

impl ConsoleDisplay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &DisplayState {
        &self.state
    }
}

impl DisplaySurface for ConsoleDisplay {
    fn show_status(&mut self, message: &str) {
        self.state.status = message.to_string();
        self.state.error = None;
        if !message.is_empty() {
            info!("{}", message);
            println!("{}", message);
        }
    }

    fn show_error(&mut self, message: &str) {
        warn!("{}", message);
        eprintln!("Error: {}", message);
        self.state.error = Some(message.to_string());
    }

    fn show_record(&mut self, record: &DniRecord) {
        self.state.fill(record);
        println!("  Surname:         {}", self.state.surname);
        println!("  Given name:      {}", self.state.given_name);
        println!("  Document number: {}", self.state.document_number);
        println!("  Nationality:     {}", self.state.nationality);
        match &self.state.birth_date_note {
            Some(note) => println!("  Date of birth:   {} ({})", self.state.birth_date, note),
            None => println!("  Date of birth:   {}", self.state.birth_date),
        }
    }

    fn clear_record(&mut self) {
        self.state.clear();
    }

    fn set_loading(&mut self, loading: bool) {
        self.state.loading = loading;
    }

    fn set_submit_enabled(&mut self, enabled: bool) {
        self.state.submit_enabled = enabled;
    }

    fn set_scan_controls(&mut self, scanning: bool) {
        self.state.start_enabled = !scanning;
        self.state.stop_enabled = scanning;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{FieldLayout, RecordSource, SymbolFormat};
    use crate::processing::PayloadParser;

    #[test]
    fn test_show_and_clear_record() {
        let mut display = MemoryDisplay::new();
        let record = DniRecord {
            surname: String::new(),
            given_name: String::new(),
            document_number: "30123456".to_string(),
            nationality: String::new(),
            birth_date: "15/01/1990".to_string(),
            format: SymbolFormat::Pdf417,
            source: RecordSource::PatternScan,
        };

        display.show_status("ok");
        display.show_record(&record);
        assert!(display.state.record_visible);
        assert_eq!(display.state.surname, "-");
        assert_eq!(display.state.document_number, "30123456");

        display.clear_record();
        assert!(!display.state.record_visible);
        assert_eq!(display.state.document_number, "-");
        assert_eq!(display.state.status, "ok");
    }

    #[test]
    fn test_pattern_scanned_date_is_flagged() {
        let parser = PayloadParser::new(FieldLayout::standard());
        let record = parser
            .parse(
                "00412345678@GOMEZ@ANA@F@28999111@A@19850310@20150601",
                &SymbolFormat::Pdf417,
            )
            .unwrap();
        assert_eq!(record.source, RecordSource::PatternScan);
        assert_eq!(record.birth_date, "78/56/1234");

        let mut display = MemoryDisplay::new();
        display.show_record(&record);
        assert_eq!(display.state.birth_date, "78/56/1234");
        assert_eq!(display.state.birth_date_note.as_deref(), Some(INVALID_DATE_NOTE));

        display.clear_record();
        assert_eq!(display.state.birth_date_note, None);
    }

    #[test]
    fn test_real_or_missing_date_is_not_flagged() {
        let parser = PayloadParser::new(FieldLayout::standard());
        let record = parser
            .parse("PEREZ@JUAN@M@30123456@ARG@19900115@1@A@B@C", &SymbolFormat::QrCode)
            .unwrap();
        assert_eq!(birth_date_note(&record), None);

        let record = parser
            .parse("PEREZ@JUAN@M@30123456@ARG@@1@A@B@C", &SymbolFormat::QrCode)
            .unwrap();
        assert_eq!(birth_date_note(&record), None);
    }

    #[test]
    fn test_console_display_tracks_submit_state() {
        let parser = PayloadParser::new(FieldLayout::standard());
        let record = parser
            .parse("PEREZ@JUAN@M@30123456@ARG@19900115@1@A@B@C", &SymbolFormat::QrCode)
            .unwrap();
        let mut display = ConsoleDisplay::new();
        assert!(!display.state().submit_enabled);

        display.show_record(&record);
        display.set_submit_enabled(true);
        assert!(display.state().submit_enabled);
        assert_eq!(display.state().document_number, "30123456");
    }

    #[test]
    fn test_status_clears_error() {
        let mut display = MemoryDisplay::new();
        display.show_error("boom");
        assert_eq!(display.state.error.as_deref(), Some("boom"));
        display.show_status("Scanning...");
        assert_eq!(display.state.error, None);
        assert_eq!(display.messages, vec!["boom", "Scanning..."]);
    }
}
