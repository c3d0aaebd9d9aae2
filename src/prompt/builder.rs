//! Turns user input into the `[system, user]` message pair

use tracing::debug;

use super::types::{Message, UserInput};
use crate::error::{AppError, AppResult};

/// Fixed instruction sent as the first message of every conversation
pub const SYSTEM_PROMPT: &str = r#"You are an expert diagram designer who turns requests into Excalidraw drawings.

Output rules:
- Reply with a single JSON array of Excalidraw element skeletons and nothing else.
- Wrap the array in a ```json code block.
- Supported element types: rectangle, ellipse, diamond, arrow, line, text.
- Every element needs "type", "x" and "y". Shapes also need "width" and "height".
- Put labels inside shapes with a "label": {"text": "..."} object instead of separate text elements.
- Connect shapes with arrows using "start": {"id": "..."} and "end": {"id": "..."}; give connected shapes an "id".
- Lay elements out on a grid with at least 80px between shapes so nothing overlaps.
- Keep colours consistent: use "strokeColor" and "backgroundColor" from a small palette.
- When the user provides an image, reproduce its structure and text faithfully.

Write labels in the same language as the user's request."#;

/// Chart type identifiers and how they are described to the model
const CHART_TYPES: &[(&str, &str)] = &[
    ("flowchart", "flowchart (process steps and decisions joined by arrows)"),
    ("mindmap", "mind map (central topic with radiating branches)"),
    ("orgchart", "organisation chart (hierarchy of roles)"),
    ("sequence", "sequence diagram (participants exchanging messages over time)"),
    ("class", "UML class diagram (classes, attributes, relationships)"),
    ("er", "entity-relationship diagram (entities, attributes, cardinalities)"),
    ("gantt", "Gantt chart (tasks laid out on a timeline)"),
    ("timeline", "timeline (events in chronological order)"),
    ("tree", "tree diagram (parent-child hierarchy)"),
    ("network", "network topology (nodes and links)"),
    ("architecture", "system architecture diagram (components, layers, data paths)"),
    ("dataflow", "data flow diagram (processes, stores, flows)"),
    ("state", "state diagram (states and transitions)"),
    ("swimlane", "swimlane diagram (process split across lanes by actor)"),
    ("concept", "concept map (ideas linked by labelled relations)"),
    ("fishbone", "fishbone diagram (causes branching into an effect)"),
    ("swot", "SWOT analysis (four-quadrant grid)"),
    ("pyramid", "pyramid diagram (stacked levels)"),
    ("funnel", "funnel diagram (narrowing stages)"),
    ("venn", "Venn diagram (overlapping sets)"),
    ("matrix", "matrix diagram (items on two axes)"),
    ("infographic", "infographic (visual summary with icons and figures)"),
];

/// Description of a known chart type identifier
pub fn chart_type_label(chart_type: &str) -> Option<&'static str> {
    CHART_TYPES
        .iter()
        .find(|(id, _)| id.eq_ignore_ascii_case(chart_type))
        .map(|(_, label)| *label)
}

/// Fill the user template with the request text and chart type hint.
///
/// `auto`, empty and absent hints let the model choose. Unknown hints are
/// passed through verbatim.
pub fn user_prompt(text: &str, chart_type: Option<&str>) -> String {
    let chart_line = match chart_type
        .map(str::trim)
        .filter(|hint| !hint.is_empty() && !hint.eq_ignore_ascii_case("auto"))
    {
        Some(hint) => format!("Chart type: {}", chart_type_label(hint).unwrap_or(hint)),
        None => "Chart type: choose the diagram type that best fits the request".to_string(),
    };

    format!(
        "{}\n\nUser request:\n{}\n\nRespond with the Excalidraw element JSON array only.",
        chart_line,
        text.trim()
    )
}

/// Build the conversation for one generation request.
///
/// Always returns exactly two messages: the system instruction, then the
/// user message. An attached image rides on the user message itself.
pub fn build(user_input: &UserInput, chart_type: Option<&str>) -> AppResult<Vec<Message>> {
    if user_input.is_empty() {
        return Err(AppError::InputMissing);
    }

    let content = user_prompt(user_input.text(), chart_type);
    let image = user_input.image().cloned();

    debug!(
        chart_type = ?chart_type,
        has_image = image.is_some(),
        prompt_len = content.len(),
        "Built prompt"
    );

    Ok(vec![Message::system(SYSTEM_PROMPT), Message::user(content, image)])
}
