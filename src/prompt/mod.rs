//! Prompt construction
//!
//! Turns a user request (text, optionally with an image) and a chart type
//! hint into the messages sent to the model.

pub mod builder;
pub mod types;

pub use builder::{build, chart_type_label, user_prompt, SYSTEM_PROMPT};
pub use types::{ImageData, Message, Role, UserInput};
