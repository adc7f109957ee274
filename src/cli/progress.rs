//! CLI-specific progress handling for butterfly-extract
//!
//! One spinner per pipeline stage, drawn on stderr. indicatif hides them
//! when stderr is not a terminal.

use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Creates a spinner for a stage of unknown length
pub fn create_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(120));
    pb
}

/// Progress manager for the extraction stages
pub struct ProgressManager {
    pub pb: ProgressBar,
}

impl ProgressManager {
    /// Start a spinner for `message`
    pub fn new(message: &str) -> Self {
        Self {
            pb: create_spinner(message),
        }
    }

    /// Run one stage under a spinner
    ///
    /// The spinner is cleared with a check mark on success and abandoned in
    /// place on failure, so the failing stage stays visible.
    pub fn stage<T, E>(message: &str, work: impl FnOnce() -> Result<T, E>) -> Result<T, E> {
        let manager = Self::new(message);
        let result = work();
        match &result {
            Ok(_) => manager.pb.finish_with_message(format!("✅ {message}")),
            Err(_) => manager.pb.abandon_with_message(format!("❌ {message}")),
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_spinner_message() {
        let pb = create_spinner("📖 Reading ways");
        assert_eq!(pb.message(), "📖 Reading ways");
        pb.finish();
    }

    #[test]
    fn test_stage_passes_result_through() {
        let ok: Result<u32, String> = ProgressManager::stage("counting", || Ok(3));
        assert_eq!(ok, Ok(3));

        let err: Result<u32, String> = ProgressManager::stage("failing", || Err("boom".into()));
        assert_eq!(err, Err("boom".to_string()));
    }
}
