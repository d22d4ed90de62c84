//! Error types for the touchgui engine
//!
//! Every variant is a construction-time or configuration-time contract
//! violation. Touch dispatch and redraw never fail, so nothing here is
//! produced from inside the input loop.

use thiserror_no_std::Error;

/// Errors surfaced to the application
#[derive(Debug, Error, Clone, PartialEq)]
pub enum GuiError {
    /// A widget was added, or the run loop started, with no current screen
    #[error("No screen is active: navigate to a screen first")]
    ScreenNotActive,

    /// A navigation target was not valid for the requested direction
    #[error("Invalid screen argument: {reason}")]
    InvalidScreenArgument {
        /// What was wrong with the target
        reason: &'static str,
    },

    /// Grey-out dimming factor must be strictly greater than one
    #[error("Dim factor must be > 1 (got {factor})")]
    InvalidDimFactor {
        /// The rejected factor
        factor: f32,
    },

    /// The font's glyph cell does not fit in the shared glyph scratch buffer
    #[error("Font too large for glyph buffer ({required} > {available} bytes)")]
    FontTooLarge {
        /// Bytes needed to render one glyph
        required: usize,
        /// Size of the glyph scratch buffer
        available: usize,
    },

    /// A listbox was built with no entries
    #[error("Element set must contain at least one entry")]
    EmptyElementSet,

    /// A configuration blob failed to decode
    #[error("Invalid configuration blob")]
    InvalidConfig,
}

/// Result type for touchgui operations
pub type GuiResult<T> = Result<T, GuiError>;
