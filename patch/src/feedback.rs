//! Structured feedback for patch calculation
//!
//! The engine degrades instead of failing when a single field cannot be
//! written (full extent table, oversized path string, patch target outside
//! the image). Each such case is recorded here and mirrored to the `log`
//! facade, so callers can inspect or display it with or without a logger.

use alloc::string::String;
use alloc::vec::Vec;

/// Feedback message with severity level
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedbackMessage {
    pub level: FeedbackLevel,
    pub category: FeedbackCategory,
    pub message: String,
}

/// Message severity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedbackLevel {
    Info,    // Normal operation info
    Warning, // Patch omitted, calculation continued
    Debug,   // Detailed debug info
}

/// Message category for filtering/display
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedbackCategory {
    Layout,     // Patch area discovery
    Sectors,    // First-sector and ADV pointers
    Extents,    // Extent table
    Strings,    // Subdirectory / subvolume slots
    Checksum,   // Checksum simulation
}

impl FeedbackMessage {
    pub fn info(category: FeedbackCategory, message: impl Into<String>) -> Self {
        Self {
            level: FeedbackLevel::Info,
            category,
            message: message.into(),
        }
    }

    pub fn warning(category: FeedbackCategory, message: impl Into<String>) -> Self {
        Self {
            level: FeedbackLevel::Warning,
            category,
            message: message.into(),
        }
    }

    pub fn debug(category: FeedbackCategory, message: impl Into<String>) -> Self {
        Self {
            level: FeedbackLevel::Debug,
            category,
            message: message.into(),
        }
    }

    /// Format for display with prefix
    pub fn format_line(&self) -> String {
        use alloc::format;
        let prefix = match self.level {
            FeedbackLevel::Info => "[INFO]",
            FeedbackLevel::Warning => "[WARN]",
            FeedbackLevel::Debug => "[DBG]",
        };
        format!("{} {}", prefix, self.message)
    }
}

/// Feedback collector - accumulates messages for one calculation
#[derive(Debug, Clone, Default)]
pub struct FeedbackCollector {
    messages: Vec<FeedbackMessage>,
}

impl FeedbackCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a message
    pub fn add(&mut self, msg: FeedbackMessage) {
        match msg.level {
            FeedbackLevel::Warning => log::warn!("{}", msg.message),
            FeedbackLevel::Info => log::info!("{}", msg.message),
            FeedbackLevel::Debug => log::debug!("{}", msg.message),
        }
        self.messages.push(msg);
    }

    pub fn info(&mut self, category: FeedbackCategory, message: impl Into<String>) {
        self.add(FeedbackMessage::info(category, message));
    }

    pub fn warning(&mut self, category: FeedbackCategory, message: impl Into<String>) {
        self.add(FeedbackMessage::warning(category, message));
    }

    pub fn debug(&mut self, category: FeedbackCategory, message: impl Into<String>) {
        self.add(FeedbackMessage::debug(category, message));
    }

    /// Get all messages
    pub fn messages(&self) -> &[FeedbackMessage] {
        &self.messages
    }

    /// Get messages filtered by level
    pub fn messages_by_level(&self, level: FeedbackLevel) -> Vec<&FeedbackMessage> {
        self.messages.iter().filter(|m| m.level == level).collect()
    }

    /// Get messages filtered by category
    pub fn messages_by_category(&self, category: FeedbackCategory) -> Vec<&FeedbackMessage> {
        self.messages.iter().filter(|m| m.category == category).collect()
    }

    /// Check if any patch was omitted
    pub fn has_warnings(&self) -> bool {
        self.messages.iter().any(|m| m.level == FeedbackLevel::Warning)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filtering() {
        let mut fb = FeedbackCollector::new();
        fb.debug(FeedbackCategory::Layout, "magic at 0x80");
        fb.warning(FeedbackCategory::Extents, "table full");
        assert!(fb.has_warnings());
        assert_eq!(fb.messages().len(), 2);
        assert_eq!(fb.messages_by_level(FeedbackLevel::Warning).len(), 1);
        assert_eq!(fb.messages_by_category(FeedbackCategory::Layout).len(), 1);
        assert_eq!(fb.messages()[1].format_line(), "[WARN] table full");
    }
}
