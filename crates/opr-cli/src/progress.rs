use indicatif::{ProgressBar, ProgressStyle};
use opr_editor::LookupEvent;
use std::time::Duration;

/// Create a spinner for indeterminate progress
pub fn create_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.blue} {msg}") {
        pb.set_style(style.tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]));
    }
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

/// Create a progress bar for determinate progress
pub fn create_progress_bar(total: u64, message: &str) -> ProgressBar {
    let pb = ProgressBar::new(total);
    if let Ok(style) = ProgressStyle::default_bar()
        .template("{msg}\n[{bar:40.cyan/blue}] {pos}/{len} ({percent}%) ETA: {eta}")
    {
        pb.set_style(style.progress_chars("█▓▒░ "));
    }
    pb.set_message(message.to_string());
    pb
}

/// Finish a progress bar with success message
pub fn finish_success(pb: &ProgressBar, message: &str) {
    pb.finish_with_message(format!("✓ {}", message));
}

/// Finish a progress bar with error message
pub fn finish_error(pb: &ProgressBar, message: &str) {
    pb.finish_with_message(format!("✗ {}", message));
}

/// Progress display for import enrichment.
///
/// Starts as a spinner while parsing and becomes a bar once the number of
/// lookups is known.
pub struct ImportProgress {
    bar: ProgressBar,
}

impl ImportProgress {
    pub fn new(hidden: bool) -> Self {
        let bar = if hidden { ProgressBar::hidden() } else { create_spinner("Reading document...") };
        Self { bar }
    }

    pub fn observe(&mut self, event: LookupEvent) {
        match event {
            LookupEvent::Planned { total } => {
                if self.bar.is_hidden() {
                    self.bar.set_length(total as u64);
                } else {
                    self.bar.finish_and_clear();
                    self.bar = create_progress_bar(total as u64, "Geocoding waypoints...");
                }
            }
            LookupEvent::Started { query, .. } => {
                self.bar.set_message(format!("Geocoding \"{}\"", query));
            }
            LookupEvent::Resolved { .. } | LookupEvent::NotFound { .. } => self.bar.inc(1),
        }
    }

    pub fn finish(&self, message: &str) {
        finish_success(&self.bar, message);
    }

    pub fn fail(&self, message: &str) {
        finish_error(&self.bar, message);
    }
}
