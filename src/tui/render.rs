//! Rendering logic: converts render blocks into Vec<Line<'static>>.
//!
//! Visual style:
//! - User messages: cyan `>` prefix
//! - Widgets: box-drawing header (┌─) with indented body lines
//! - Spec components: nested tree with dim kind labels
//! - Interactive widgets (mortgage, viewing form): highlighted when focused

use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

use crate::specui::SpecNode;
use crate::widgets::map::MapBlock;
use crate::widgets::mortgage::MortgageState;
use crate::widgets::places::PlacesBlock;
use crate::widgets::viewing::{FormField, FormPhase, ViewingForm};
use crate::widgets::tax::{TaxBreakdown, TaxInput};
use crate::widgets::WidgetBlock;

pub fn render_user_message(text: &str) -> Vec<Line<'static>> {
    vec![Line::from(vec![
        Span::styled(
            "> ",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(text.to_string(), Style::default().fg(Color::White)),
    ])]
}

pub fn render_assistant_text(text: &str) -> Vec<Line<'static>> {
    text.lines()
        .map(|l| Line::from(Span::raw(l.to_string())))
        .collect()
}

fn widget_header(title: &str, focused: bool) -> Line<'static> {
    let style = if focused {
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    Line::from(Span::styled(format!("┌─ {title}"), style))
}

fn body_line(text: String) -> Line<'static> {
    Line::from(vec![
        Span::styled("│ ", Style::default().fg(Color::DarkGray)),
        Span::raw(text),
    ])
}

fn dim_line(text: String) -> Line<'static> {
    Line::from(vec![
        Span::styled("│ ", Style::default().fg(Color::DarkGray)),
        Span::styled(text, Style::default().fg(Color::DarkGray)),
    ])
}

fn widget_footer() -> Line<'static> {
    Line::from(Span::styled("└─", Style::default().fg(Color::DarkGray)))
}

fn dollars(amount: f64) -> String {
    let rounded = amount.round() as i64;
    let digits = rounded.abs().to_string();
    let mut grouped = String::new();
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if rounded < 0 {
        format!("-${grouped}")
    } else {
        format!("${grouped}")
    }
}

/// Render a non-interactive widget. Mortgage calculators and viewing forms
/// carry local state and go through their own render functions instead.
pub fn render_widget(block: &WidgetBlock) -> Vec<Line<'static>> {
    match block {
        WidgetBlock::Loading { label } => vec![Line::from(Span::styled(
            format!("⏺ {label}"),
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),
        ))],
        WidgetBlock::Searching { query } => vec![Line::from(Span::styled(
            format!("⏺ Searching for {query}…"),
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::ITALIC),
        ))],
        WidgetBlock::TaxEstimate { input, breakdown } => render_tax(input, breakdown),
        WidgetBlock::ContactCard {
            name,
            email,
            phone,
            brokerage,
        } => render_contact(name, email, phone, brokerage.as_deref()),
        WidgetBlock::Map(map) => render_map(map),
        WidgetBlock::Places(places) => render_places(places),
        WidgetBlock::Failure { tool, message } => vec![Line::from(vec![
            Span::styled("⏺ ", Style::default().fg(Color::Red)),
            Span::styled(
                format!("{tool}: {message}"),
                Style::default().fg(Color::Red),
            ),
        ])],
        // Interactive; handled by the caller with local state.
        WidgetBlock::MortgageCalculator { .. } | WidgetBlock::ViewingForm { .. } => Vec::new(),
    }
}

fn render_tax(input: &TaxInput, breakdown: &TaxBreakdown) -> Vec<Line<'static>> {
    let mut lines = vec![widget_header("Property transfer tax estimate", false)];
    lines.push(body_line(format!("Purchase price   {}", dollars(input.price))));
    lines.push(dim_line(format!(
        "1% tier {}   2% tier {}   3% tier {}",
        dollars(breakdown.tier_one),
        dollars(breakdown.tier_two),
        dollars(breakdown.tier_three),
    )));
    if breakdown.exemption > 0.0 {
        lines.push(body_line(format!(
            "First-time buyer exemption  -{}",
            dollars(breakdown.exemption)
        )));
    }
    lines.push(Line::from(vec![
        Span::styled("│ ", Style::default().fg(Color::DarkGray)),
        Span::styled(
            format!("Estimated tax    {}", dollars(breakdown.net_payable)),
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
        ),
    ]));
    lines.push(dim_line(
        "Estimate only; confirm with your notary.".to_string(),
    ));
    lines.push(widget_footer());
    lines
}

pub fn render_mortgage(state: &MortgageState, focused: bool) -> Vec<Line<'static>> {
    let mut lines = vec![widget_header("Mortgage calculator", focused)];
    lines.push(body_line(format!(
        "Price {}   Rate {:.2}%   Down {:.0}%   {} yrs",
        dollars(state.price),
        state.rate,
        state.down_payment_pct,
        state.amortization_years,
    )));
    lines.push(dim_line(format!(
        "Down payment {}   Principal {}",
        dollars(state.down_payment()),
        dollars(state.principal()),
    )));
    lines.push(Line::from(vec![
        Span::styled("│ ", Style::default().fg(Color::DarkGray)),
        Span::styled(
            format!("Monthly payment  {}", dollars(state.monthly_payment())),
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
        ),
    ]));
    if focused {
        lines.push(dim_line(
            "←/→ price   +/- rate   [/] down payment".to_string(),
        ));
    }
    lines.push(widget_footer());
    lines
}

fn render_contact(
    name: &str,
    email: &str,
    phone: &str,
    brokerage: Option<&str>,
) -> Vec<Line<'static>> {
    let mut lines = vec![widget_header("Your agent", false)];
    lines.push(Line::from(vec![
        Span::styled("│ ", Style::default().fg(Color::DarkGray)),
        Span::styled(
            name.to_string(),
            Style::default().add_modifier(Modifier::BOLD),
        ),
    ]));
    if let Some(b) = brokerage {
        lines.push(dim_line(b.to_string()));
    }
    lines.push(body_line(format!("{email}   {phone}")));
    lines.push(widget_footer());
    lines
}

pub fn render_viewing(form: &ViewingForm, focused: bool) -> Vec<Line<'static>> {
    let mut lines = vec![widget_header("Schedule a viewing", focused)];
    if let Some(n) = &form.seed.neighbourhood {
        lines.push(dim_line(format!("Neighbourhood: {n}")));
    }
    match form.phase {
        FormPhase::Editing | FormPhase::Failed => {
            for (field, label, value) in [
                (FormField::Name, "Name   ", &form.name),
                (FormField::Contact, "Contact", &form.contact),
                (FormField::Note, "Note   ", &form.note),
            ] {
                let active = focused && form.active_field == field;
                let marker = if active { "▸ " } else { "  " };
                let style = if active {
                    Style::default().fg(Color::Cyan)
                } else {
                    Style::default()
                };
                lines.push(Line::from(vec![
                    Span::styled("│ ", Style::default().fg(Color::DarkGray)),
                    Span::styled(format!("{marker}{label}  {value}"), style),
                ]));
            }
            if let Some(err) = &form.error {
                lines.push(Line::from(vec![
                    Span::styled("│ ", Style::default().fg(Color::DarkGray)),
                    Span::styled(err.clone(), Style::default().fg(Color::Red)),
                ]));
            }
            if focused {
                let hint = if form.can_submit() {
                    "Tab next field   Enter submit"
                } else {
                    "Tab next field   (name and contact required)"
                };
                lines.push(dim_line(hint.to_string()));
            }
        }
        FormPhase::Submitting => {
            lines.push(dim_line("Sending…".to_string()));
        }
        FormPhase::Confirmed => {
            lines.push(Line::from(vec![
                Span::styled("│ ", Style::default().fg(Color::DarkGray)),
                Span::styled(
                    "Thanks! We'll be in touch shortly to confirm a time.",
                    Style::default().fg(Color::Green),
                ),
            ]));
        }
    }
    lines.push(widget_footer());
    lines
}

fn render_map(map: &MapBlock) -> Vec<Line<'static>> {
    match map {
        MapBlock::Map {
            name,
            center,
            zoom,
            points_of_interest,
        } => {
            let mut lines = vec![widget_header(&format!("Map · {name}"), false)];
            lines.push(dim_line(format!(
                "{:.4}, {:.4} (zoom {zoom})",
                center.0, center.1
            )));
            for poi in points_of_interest {
                lines.push(body_line(format!("• {poi}")));
            }
            lines.push(widget_footer());
            lines
        }
        MapBlock::NoData { neighbourhood } => vec![Line::from(Span::styled(
            format!("No map data for {neighbourhood} yet."),
            Style::default().fg(Color::DarkGray),
        ))],
    }
}

fn render_places(places: &PlacesBlock) -> Vec<Line<'static>> {
    match places {
        PlacesBlock::Results { query, places } => {
            let mut lines = vec![widget_header(&format!("Near you · {query}"), false)];
            for place in places {
                let rating = place
                    .rating
                    .map(|r| format!("  ★ {r:.1}"))
                    .unwrap_or_default();
                lines.push(Line::from(vec![
                    Span::styled("│ ", Style::default().fg(Color::DarkGray)),
                    Span::styled(
                        place.name.clone(),
                        Style::default().add_modifier(Modifier::BOLD),
                    ),
                    Span::styled(rating, Style::default().fg(Color::Yellow)),
                ]));
                if let Some(desc) = &place.description {
                    lines.push(dim_line(desc.clone()));
                }
            }
            lines.push(widget_footer());
            lines
        }
        PlacesBlock::NoResults { query } => vec![Line::from(Span::styled(
            format!("Couldn't find anything for {query} — try asking differently."),
            Style::default().fg(Color::DarkGray),
        ))],
    }
}

pub fn render_typing() -> Vec<Line<'static>> {
    vec![Line::from(Span::styled(
        "…",
        Style::default().fg(Color::DarkGray),
    ))]
}

/// Flatten a rendered spec tree into indented lines. The terminal surface
/// shows specs read-only; unknown components stay visible as stand-ins.
pub fn render_spec_nodes(nodes: &[SpecNode]) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    for node in nodes {
        render_spec_node(node, 0, &mut lines);
    }
    lines
}

fn render_spec_node(node: &SpecNode, depth: usize, out: &mut Vec<Line<'static>>) {
    let indent = "  ".repeat(depth);
    match node {
        SpecNode::Component {
            kind,
            props,
            slots,
            bound_state,
            ..
        } => {
            let mut spans = vec![Span::raw(indent.clone())];
            match kind.as_str() {
                "heading" => spans.push(Span::styled(
                    prop_text(props, "text"),
                    Style::default().add_modifier(Modifier::BOLD),
                )),
                "paragraph" => spans.push(Span::raw(prop_text(props, "text"))),
                "stat" => spans.push(Span::styled(
                    format!("{}: {}", prop_text(props, "label"), prop_text(props, "value")),
                    Style::default().fg(Color::Green),
                )),
                "badge" => spans.push(Span::styled(
                    format!("[{}]", prop_text(props, "text")),
                    Style::default().fg(Color::Magenta),
                )),
                "divider" => spans.push(Span::styled(
                    "────────".to_string(),
                    Style::default().fg(Color::DarkGray),
                )),
                "toggle" => {
                    let on = bound_state
                        .as_ref()
                        .and_then(|v| v.as_bool())
                        .unwrap_or(false);
                    spans.push(Span::raw(format!(
                        "{} {}",
                        if on { "[x]" } else { "[ ]" },
                        prop_text(props, "label"),
                    )));
                }
                "button" | "link" => spans.push(Span::styled(
                    format!("⟨{}⟩", prop_text(props, "label")),
                    Style::default().fg(Color::Cyan),
                )),
                "input" => {
                    let value = bound_state
                        .as_ref()
                        .and_then(|v| v.as_str())
                        .unwrap_or_default();
                    spans.push(Span::raw(format!(
                        "{}: {value}",
                        prop_text(props, "label")
                    )));
                }
                "list" => {
                    if let Some(items) = props.get("items").and_then(|v| v.as_array()) {
                        for item in items {
                            out.push(Line::from(format!(
                                "{indent}• {}",
                                item.as_str().unwrap_or_default()
                            )));
                        }
                    }
                }
                // Containers contribute structure, not content.
                "card" | "row" | "column" => {}
                other => spans.push(Span::styled(
                    format!("({other})"),
                    Style::default().fg(Color::DarkGray),
                )),
            }
            if spans.len() > 1 {
                out.push(Line::from(spans));
            }
            for (_, children) in slots {
                for child in children {
                    render_spec_node(child, depth + 1, out);
                }
            }
        }
        SpecNode::Unknown { kind } => {
            out.push(Line::from(Span::styled(
                format!("{indent}(unsupported: {kind})"),
                Style::default().fg(Color::DarkGray),
            )));
        }
    }
}

fn prop_text(props: &serde_json::Map<String, serde_json::Value>, key: &str) -> String {
    match props.get(key) {
        Some(serde_json::Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::specui::{render, StateBag, UiSpec};
    use serde_json::json;

    #[test]
    fn test_dollars_grouping() {
        assert_eq!(dollars(0.0), "$0");
        assert_eq!(dollars(850_000.0), "$850,000");
        assert_eq!(dollars(1_234_567.4), "$1,234,567");
        assert_eq!(dollars(-16_000.0), "-$16,000");
    }

    #[test]
    fn test_spec_tree_renders_headings_and_unknowns() {
        let spec: UiSpec = serde_json::from_value(json!({
            "root": [
                { "type": "heading", "props": { "text": "Buying in Kits" } },
                { "type": "hologram", "props": {} }
            ]
        }))
        .unwrap();
        let bag = StateBag::seeded(&spec.initial_state);
        let lines = render_spec_nodes(&render(&spec, &bag));
        let flat: Vec<String> = lines.iter().map(|l| l.to_string()).collect();
        assert!(flat.iter().any(|l| l.contains("Buying in Kits")));
        assert!(flat.iter().any(|l| l.contains("unsupported: hologram")));
    }

    #[test]
    fn test_viewing_form_confirmed_shows_thanks() {
        let mut form = ViewingForm::new(Default::default());
        form.mark_confirmed();
        let lines = render_viewing(&form, false);
        assert!(lines
            .iter()
            .any(|l| l.to_string().contains("Thanks! We'll be in touch")));
    }
}
