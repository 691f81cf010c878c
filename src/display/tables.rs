//! Table formatting for completion results.

use crate::completion::{Completion, CompletionCategory};
use comfy_table::{
    Attribute, Cell, Color, Table, modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL,
};

fn styled_table() -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.apply_modifier(UTF8_ROUND_CORNERS);
    table
}

fn category_color(category: &CompletionCategory) -> Color {
    match category {
        CompletionCategory::Namespace => Color::Magenta,
        CompletionCategory::Type => Color::Cyan,
        CompletionCategory::Keyword => Color::Blue,
        CompletionCategory::Variable => Color::White,
        CompletionCategory::Field(_) | CompletionCategory::Property(_) => Color::Green,
        CompletionCategory::Method(_) | CompletionCategory::Overload(_) => Color::Yellow,
    }
}

/// Render a completion result, one row per item.
pub fn create_completion_table(completion: &Completion) -> String {
    let mut table = styled_table();

    table.set_header(vec![
        Cell::new("Item").add_attribute(Attribute::Bold),
        Cell::new("Kind").add_attribute(Attribute::Bold),
        Cell::new("Detail").add_attribute(Attribute::Bold),
    ]);

    for item in &completion.items {
        table.add_row(vec![
            Cell::new(&item.display_text).add_attribute(Attribute::Bold),
            Cell::new(item.category.to_string()).fg(category_color(&item.category)),
            Cell::new(&item.tooltip_text),
        ]);
    }

    table.to_string()
}

/// Render the namespaces directly below `prefix`.
pub fn create_namespace_table(prefix: &str, children: &[String]) -> String {
    let mut table = styled_table();

    table.set_header(vec![
        Cell::new("Namespace").add_attribute(Attribute::Bold),
        Cell::new("Qualified").add_attribute(Attribute::Bold),
    ]);

    for child in children {
        let qualified = if prefix.is_empty() {
            child.clone()
        } else {
            format!("{prefix}.{child}")
        };
        table.add_row(vec![child.clone(), qualified]);
    }

    table.to_string()
}
