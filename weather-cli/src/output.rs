//! Plain-text rendering of element trees for the terminal.

use weather_core::{Element, Node};

/// Lays out headings and paragraphs as lines and tables as aligned columns.
pub fn render_text(root: &Element) -> String {
    let mut lines = Vec::new();
    collect_lines(root, &mut lines);
    lines.join("\n")
}

fn collect_lines(element: &Element, lines: &mut Vec<String>) {
    match element.tag() {
        "table" => lines.extend(table_lines(element)),
        "h1" | "h2" | "h3" | "p" | "button" => {
            let text = element.text_content();
            if !text.is_empty() {
                lines.push(heading_decoration(element.tag(), text));
            }
        }
        _ => {
            for child in element.children() {
                match child {
                    Node::Element(e) => collect_lines(e, lines),
                    Node::Text(t) if !t.trim().is_empty() => lines.push(t.clone()),
                    Node::Text(_) => {}
                }
            }
        }
    }
}

fn heading_decoration(tag: &str, text: String) -> String {
    match tag {
        "h1" | "h2" => format!("{text}\n{}", "=".repeat(text.chars().count())),
        "h3" => format!("{text}\n{}", "-".repeat(text.chars().count())),
        "button" => format!("* {text}"),
        _ => text,
    }
}

fn table_lines(table: &Element) -> Vec<String> {
    let rows: Vec<Vec<String>> = ["thead", "tbody"]
        .iter()
        .filter_map(|section| table.elements().find(|e| e.tag() == *section))
        .flat_map(|section| section.elements().filter(|e| e.tag() == "tr"))
        .map(|tr| tr.elements().map(Element::text_content).collect())
        .collect();

    let columns = rows.iter().map(Vec::len).max().unwrap_or(0);
    let widths: Vec<usize> = (0..columns)
        .map(|i| {
            rows.iter()
                .filter_map(|r| r.get(i))
                .map(|c| c.chars().count())
                .max()
                .unwrap_or(0)
        })
        .collect();

    rows.iter()
        .map(|row| {
            row.iter()
                .zip(&widths)
                .map(|(cell, width)| format!("{cell:<width$}"))
                .collect::<Vec<_>>()
                .join("  ")
                .trim_end()
                .to_string()
        })
        .collect()
}
