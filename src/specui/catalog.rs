//! The closed set of component types the spec renderer knows how to draw.
//!
//! Entries are static and shared by every rendered spec. The prop schema is
//! authoritative: nullable props may be absent, and a missing required prop
//! degrades to a per-kind default rather than failing the element.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropKind {
    Text,
    Number,
    Flag,
    List,
}

impl PropKind {
    /// Default value substituted when a required prop is missing.
    pub fn default_value(&self) -> serde_json::Value {
        match self {
            PropKind::Text => serde_json::Value::String(String::new()),
            PropKind::Number => serde_json::json!(0),
            PropKind::Flag => serde_json::Value::Bool(false),
            PropKind::List => serde_json::json!([]),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct PropSpec {
    pub name: &'static str,
    pub kind: PropKind,
    pub required: bool,
}

#[derive(Debug, Clone, Copy)]
pub struct CatalogEntry {
    pub name: &'static str,
    pub description: &'static str,
    pub props: &'static [PropSpec],
    pub slots: &'static [&'static str],
    /// Example payload for documentation and schema prompts, not runtime.
    pub example: &'static str,
}

const fn prop(name: &'static str, kind: PropKind, required: bool) -> PropSpec {
    PropSpec {
        name,
        kind,
        required,
    }
}

pub static CATALOG: &[CatalogEntry] = &[
    CatalogEntry {
        name: "heading",
        description: "Section heading.",
        props: &[
            prop("text", PropKind::Text, true),
            prop("level", PropKind::Number, false),
        ],
        slots: &[],
        example: r#"{ "type": "heading", "props": { "text": "Why Kitsilano", "level": 2 } }"#,
    },
    CatalogEntry {
        name: "paragraph",
        description: "Body copy.",
        props: &[prop("text", PropKind::Text, true)],
        slots: &[],
        example: r#"{ "type": "paragraph", "props": { "text": "Walkable, close to the beach." } }"#,
    },
    CatalogEntry {
        name: "list",
        description: "Bulleted list of short strings.",
        props: &[prop("items", PropKind::List, true)],
        slots: &[],
        example: r#"{ "type": "list", "props": { "items": ["Schools", "Transit"] } }"#,
    },
    CatalogEntry {
        name: "card",
        description: "Titled container with a body slot.",
        props: &[prop("title", PropKind::Text, false)],
        slots: &["body"],
        example: r#"{ "type": "card", "props": { "title": "At a glance" }, "slots": { "body": [] } }"#,
    },
    CatalogEntry {
        name: "row",
        description: "Horizontal group of children.",
        props: &[],
        slots: &["children"],
        example: r#"{ "type": "row", "slots": { "children": [] } }"#,
    },
    CatalogEntry {
        name: "column",
        description: "Vertical group of children.",
        props: &[],
        slots: &["children"],
        example: r#"{ "type": "column", "slots": { "children": [] } }"#,
    },
    CatalogEntry {
        name: "stat",
        description: "Labelled figure, e.g. a median price.",
        props: &[
            prop("label", PropKind::Text, true),
            prop("value", PropKind::Text, true),
        ],
        slots: &[],
        example: r#"{ "type": "stat", "props": { "label": "Median price", "value": "$1.2M" } }"#,
    },
    CatalogEntry {
        name: "badge",
        description: "Small inline tag.",
        props: &[prop("text", PropKind::Text, true)],
        slots: &[],
        example: r#"{ "type": "badge", "props": { "text": "New listing" } }"#,
    },
    CatalogEntry {
        name: "divider",
        description: "Horizontal rule.",
        props: &[],
        slots: &[],
        example: r#"{ "type": "divider" }"#,
    },
    CatalogEntry {
        name: "input",
        description: "Single-line text input bound to a state key.",
        props: &[
            prop("label", PropKind::Text, false),
            prop("placeholder", PropKind::Text, false),
        ],
        slots: &[],
        example: r#"{ "type": "input", "props": { "label": "Budget" }, "state_key": "budget" }"#,
    },
    CatalogEntry {
        name: "toggle",
        description: "On/off switch bound to a state key.",
        props: &[prop("label", PropKind::Text, true)],
        slots: &[],
        example: r#"{ "type": "toggle", "props": { "label": "First-time buyer" }, "state_key": "ftb" }"#,
    },
    CatalogEntry {
        name: "button",
        description: "Action trigger. The action name is dispatched to the host.",
        props: &[
            prop("label", PropKind::Text, true),
            prop("action", PropKind::Text, false),
        ],
        slots: &[],
        example: r#"{ "type": "button", "props": { "label": "Book a viewing", "action": "book" } }"#,
    },
    CatalogEntry {
        name: "link",
        description: "External link.",
        props: &[
            prop("text", PropKind::Text, true),
            prop("href", PropKind::Text, true),
        ],
        slots: &[],
        example: r#"{ "type": "link", "props": { "text": "Full guide", "href": "/guides/kitsilano" } }"#,
    },
];

pub fn lookup(kind: &str) -> Option<&'static CatalogEntry> {
    CATALOG.iter().find(|entry| entry.name == kind)
}
