use crate::matching::ShortlistEntry;
use crate::pipeline::{MatchReport, MatchRequest};
use crate::tui::theme::ThemeColors;
use std::time::Instant;

#[derive(Debug, Clone, PartialEq)]
pub enum InputMode {
    Normal,
    Help,
    Breakdown,
}

pub struct App {
    pub request: MatchRequest,
    pub report: Option<MatchReport>,
    pub table_state: ratatui::widgets::TableState,
    pub input_mode: InputMode,
    pub flash_message: Option<(String, Instant)>,
    pub last_refresh: Instant,
    pub needs_refresh: bool,
    pub should_quit: bool,
    pub is_loading: bool,
    pub spinner_frame: usize,
    pub theme: ThemeColors,
}

impl App {
    pub fn new(request: MatchRequest, report: MatchReport, theme: ThemeColors) -> Self {
        let mut app = Self::new_loading(request, theme);
        app.is_loading = false;
        app.update_report(report);
        app.flash_message = None;
        app
    }

    /// Create a new App with no report in loading state
    /// Used for launching TUI before the first analysis finishes
    pub fn new_loading(request: MatchRequest, theme: ThemeColors) -> Self {
        Self {
            request,
            report: None,
            table_state: ratatui::widgets::TableState::default(),
            input_mode: InputMode::Normal,
            flash_message: None,
            last_refresh: Instant::now(),
            needs_refresh: false,
            should_quit: false,
            is_loading: true,
            spinner_frame: 0,
            theme,
        }
    }

    pub fn entries(&self) -> &[ShortlistEntry] {
        self.report
            .as_ref()
            .map(|r| r.shortlist.as_slice())
            .unwrap_or(&[])
    }

    pub fn next_row(&mut self) {
        let len = self.entries().len();
        if len == 0 {
            return;
        }
        let i = match self.table_state.selected() {
            Some(i) if i + 1 < len => i + 1,
            _ => 0,
        };
        self.table_state.select(Some(i));
    }

    pub fn previous_row(&mut self) {
        let len = self.entries().len();
        if len == 0 {
            return;
        }
        let i = match self.table_state.selected() {
            Some(0) | None => len - 1,
            Some(i) => i - 1,
        };
        self.table_state.select(Some(i));
    }

    pub fn selected_entry(&self) -> Option<&ShortlistEntry> {
        self.table_state
            .selected()
            .and_then(|i| self.entries().get(i))
    }

    /// The analysed site: the profile's URL once known, else what was requested.
    pub fn company_url(&self) -> &str {
        self.report
            .as_ref()
            .map(|r| r.company_profile.url.as_str())
            .filter(|u| !u.is_empty())
            .unwrap_or(&self.request.url)
    }

    pub fn update_flash(&mut self) {
        if let Some((_, timestamp)) = self.flash_message {
            if timestamp.elapsed().as_secs() >= 3 {
                self.flash_message = None;
            }
        }
    }

    pub fn show_flash(&mut self, msg: String) {
        self.flash_message = Some((msg, Instant::now()));
    }

    /// Open the company website in the browser
    pub fn open_company_site(&self) -> anyhow::Result<()> {
        crate::browser::open_url(self.company_url())
    }

    pub fn show_help(&mut self) {
        self.input_mode = InputMode::Help;
    }

    pub fn dismiss_help(&mut self) {
        self.input_mode = InputMode::Normal;
    }

    /// Show the per-factor breakdown for the selected fund
    pub fn show_breakdown(&mut self) {
        if self.selected_entry().is_some() {
            self.input_mode = InputMode::Breakdown;
        }
    }

    pub fn dismiss_breakdown(&mut self) {
        self.input_mode = InputMode::Normal;
    }

    /// Replace the report with a fresh analysis
    pub fn update_report(&mut self, report: MatchReport) {
        let count = report.shortlist.len();
        self.report = Some(report);

        // Preserve selection if possible
        if count == 0 {
            self.table_state.select(None);
            if self.input_mode == InputMode::Breakdown {
                self.input_mode = InputMode::Normal;
            }
        } else {
            let selected = self.table_state.selected().unwrap_or(0).min(count - 1);
            self.table_state.select(Some(selected));
        }

        self.last_refresh = Instant::now();
        self.show_flash(format!("Analysis complete ({} funds shortlisted)", count));
    }

    /// Advance the loading spinner animation frame
    pub fn advance_spinner(&mut self) {
        self.spinner_frame = self.spinner_frame.wrapping_add(1);
    }
}
