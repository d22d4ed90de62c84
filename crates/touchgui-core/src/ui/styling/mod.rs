//! Colours, grey-out transforms and text styles

pub mod colors;
pub mod grey;
pub mod text;

pub use colors::*;
pub use grey::GreyStyle;
pub use text::TextStyle;
