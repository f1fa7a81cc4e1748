use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    #[default]
    Info,
    Success,
    Warning,
}

impl Severity {
    /// Unknown names fall back to info.
    pub fn parse(name: &str) -> Self {
        match name {
            "success" => Severity::Success,
            "warning" => Severity::Warning,
            _ => Severity::Info,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Info => "info",
            Severity::Success => "success",
            Severity::Warning => "warning",
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            Severity::Success => "check-circle",
            Severity::Warning => "exclamation-triangle",
            Severity::Info => "info-circle",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub message: String,
    pub severity: Severity,
}

impl Toast {
    pub fn new(message: impl Into<String>, severity: Severity) -> Self {
        Self {
            message: message.into(),
            severity,
        }
    }

    pub fn class_name(&self) -> String {
        format!("notification notification-{}", self.severity.as_str())
    }

    pub fn icon_class(&self) -> String {
        format!("fas fa-{} me-2", self.severity.icon())
    }
}

/// A toast stays for `display_ms`, then slides out over `exit_ms` and is
/// removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToastTimeline {
    pub display_ms: u32,
    pub exit_ms: u32,
}

impl ToastTimeline {
    pub fn removed_after_ms(self) -> u32 {
        self.display_ms.saturating_add(self.exit_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severity_parsing_and_icons() {
        assert_eq!(Severity::parse("success"), Severity::Success);
        assert_eq!(Severity::parse("danger"), Severity::Info);
        let toast = Toast::new("Saved", Severity::Warning);
        assert_eq!(toast.class_name(), "notification notification-warning");
        assert_eq!(toast.icon_class(), "fas fa-exclamation-triangle me-2");
    }
}
