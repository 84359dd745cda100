// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 inferci contributors

//! Document tree and YAML renderer
//!
//! `serde_yaml` cannot emit comments, and the generated config leans on them
//! (banner, job explanations, commented-out jobs), so documents are built as
//! a small node tree and rendered here. Output uses 2-space indentation,
//! block style throughout, and indents sequences under their parent key.

const INDENT: usize = 2;

/// Node content
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    Scalar(String),
    /// Ordered key/value pairs
    Mapping(Vec<(Node, Node)>),
    Sequence(Vec<Node>),
    /// Pre-rendered lines emitted as comments
    Inert(Vec<String>),
}

/// A document node with optional comments before and after it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub kind: NodeKind,
    pub head_comment: Option<String>,
    pub foot_comment: Option<String>,
}

impl Node {
    fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            head_comment: None,
            foot_comment: None,
        }
    }

    pub fn scalar(value: impl Into<String>) -> Self {
        Self::new(NodeKind::Scalar(value.into()))
    }

    pub fn mapping(pairs: Vec<(Node, Node)>) -> Self {
        Self::new(NodeKind::Mapping(pairs))
    }

    pub fn sequence(items: Vec<Node>) -> Self {
        Self::new(NodeKind::Sequence(items))
    }

    /// Attach a comment rendered before the node; empty comments are ignored
    pub fn with_head_comment(mut self, comment: impl Into<String>) -> Self {
        let comment = comment.into();
        self.head_comment = (!comment.is_empty()).then_some(comment);
        self
    }

    /// Attach a comment rendered after the node; empty comments are ignored
    pub fn with_foot_comment(mut self, comment: impl Into<String>) -> Self {
        let comment = comment.into();
        self.foot_comment = (!comment.is_empty()).then_some(comment);
        self
    }

    /// The same content as an inert comment block
    ///
    /// The block reproduces exactly what this node renders to as a sequence
    /// item, so uncommenting it yields the live form.
    pub fn commented_out(&self) -> Node {
        let mut lines = Vec::new();
        write_sequence(&mut lines, std::slice::from_ref(self), 0);
        Self::new(NodeKind::Inert(lines))
    }
}

/// Render a node as a YAML document
pub fn render(node: &Node) -> String {
    let mut lines = Vec::new();
    write_comment(&mut lines, node.head_comment.as_deref(), 0);

    match &node.kind {
        NodeKind::Scalar(value) => write_scalar_line(&mut lines, "", value, 0),
        NodeKind::Mapping(pairs) if pairs.is_empty() => lines.push("{}".to_string()),
        NodeKind::Mapping(pairs) => write_mapping(&mut lines, pairs, 0),
        NodeKind::Sequence(items) if items.is_empty() => lines.push("[]".to_string()),
        NodeKind::Sequence(items) => write_sequence(&mut lines, items, 0),
        NodeKind::Inert(inert) => write_inert(&mut lines, inert, 0),
    }

    write_comment(&mut lines, node.foot_comment.as_deref(), 0);

    let mut out = lines.join("\n");
    out.push('\n');
    out
}

fn pad(indent: usize) -> String {
    " ".repeat(indent)
}

fn write_comment(lines: &mut Vec<String>, comment: Option<&str>, indent: usize) {
    let Some(comment) = comment else {
        return;
    };
    for line in comment.lines() {
        if line.is_empty() {
            lines.push(format!("{}#", pad(indent)));
        } else {
            lines.push(format!("{}# {}", pad(indent), line));
        }
    }
}

fn write_inert(lines: &mut Vec<String>, inert: &[String], indent: usize) {
    for line in inert {
        if line.is_empty() {
            lines.push(format!("{}#", pad(indent)));
        } else {
            lines.push(format!("{}# {}", pad(indent), line));
        }
    }
}

/// `prefix` is everything before the value on its first line, e.g. `"key: "`
/// or `"- "`; block scalar content is indented relative to `indent`
fn write_scalar_line(lines: &mut Vec<String>, prefix: &str, value: &str, indent: usize) {
    match ScalarStyle::of(value) {
        ScalarStyle::Literal => {
            let chomp = if value.ends_with("\n\n") {
                "+"
            } else if value.ends_with('\n') {
                ""
            } else {
                "-"
            };
            lines.push(format!("{}{}|{}", pad(indent), prefix, chomp));
            let body = value.strip_suffix('\n').unwrap_or(value);
            for line in body.split('\n') {
                if line.is_empty() {
                    lines.push(String::new());
                } else {
                    lines.push(format!("{}{}", pad(indent + INDENT), line));
                }
            }
        }
        style => lines.push(format!("{}{}{}", pad(indent), prefix, style.format(value))),
    }
}

fn write_mapping(lines: &mut Vec<String>, pairs: &[(Node, Node)], indent: usize) {
    for (key, value) in pairs {
        write_comment(lines, key.head_comment.as_deref(), indent);
        let key_text = match &key.kind {
            NodeKind::Scalar(k) => ScalarStyle::inline(k),
            // Complex keys never occur in generated configs
            _ => "?".to_string(),
        };

        match &value.kind {
            NodeKind::Scalar(v) => {
                write_comment(lines, value.head_comment.as_deref(), indent);
                write_scalar_line(lines, &format!("{}: ", key_text), v, indent);
            }
            NodeKind::Mapping(inner) if inner.is_empty() => {
                lines.push(format!("{}{}: {{}}", pad(indent), key_text));
            }
            NodeKind::Sequence(inner) if inner.is_empty() => {
                lines.push(format!("{}{}: []", pad(indent), key_text));
            }
            NodeKind::Mapping(inner) => {
                lines.push(format!("{}{}:", pad(indent), key_text));
                write_comment(lines, value.head_comment.as_deref(), indent + INDENT);
                write_mapping(lines, inner, indent + INDENT);
            }
            NodeKind::Sequence(inner) => {
                lines.push(format!("{}{}:", pad(indent), key_text));
                write_comment(lines, value.head_comment.as_deref(), indent + INDENT);
                write_sequence(lines, inner, indent + INDENT);
            }
            NodeKind::Inert(inert) => {
                lines.push(format!("{}{}:", pad(indent), key_text));
                write_inert(lines, inert, indent + INDENT);
            }
        }

        write_comment(lines, value.foot_comment.as_deref(), indent);
        write_comment(lines, key.foot_comment.as_deref(), indent);
    }
}

fn write_sequence(lines: &mut Vec<String>, items: &[Node], indent: usize) {
    for item in items {
        if let NodeKind::Inert(inert) = &item.kind {
            write_inert(lines, inert, indent);
            continue;
        }

        write_comment(lines, item.head_comment.as_deref(), indent);
        match &item.kind {
            NodeKind::Scalar(value) => write_scalar_line(lines, "- ", value, indent),
            NodeKind::Mapping(pairs) if pairs.is_empty() => {
                lines.push(format!("{}- {{}}", pad(indent)));
            }
            NodeKind::Sequence(nested) if nested.is_empty() => {
                lines.push(format!("{}- []", pad(indent)));
            }
            NodeKind::Mapping(pairs) => {
                let mut nested = Vec::new();
                write_mapping(&mut nested, pairs, indent + INDENT);
                attach_dash(lines, nested, indent);
            }
            NodeKind::Sequence(inner) => {
                let mut nested = Vec::new();
                write_sequence(&mut nested, inner, indent + INDENT);
                attach_dash(lines, nested, indent);
            }
            NodeKind::Inert(_) => {}
        }
        write_comment(lines, item.foot_comment.as_deref(), indent);
    }
}

/// Move the first content line of a nested block onto the `- ` line
fn attach_dash(lines: &mut Vec<String>, mut nested: Vec<String>, indent: usize) {
    let content_pad = pad(indent + INDENT);
    let first = nested
        .iter()
        .position(|line| !line.trim_start().starts_with('#'));
    if let Some(idx) = first {
        let rest = nested[idx]
            .strip_prefix(&content_pad)
            .unwrap_or(nested[idx].trim_start())
            .to_string();
        nested[idx] = format!("{}- {}", pad(indent), rest);
    }
    lines.extend(nested);
}

// ─────────────────────────────────────────────────────────────────────────────
// Scalar styles
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScalarStyle {
    Plain,
    SingleQuoted,
    DoubleQuoted,
    Literal,
}

impl ScalarStyle {
    fn of(value: &str) -> Self {
        if value.contains('\n') {
            if literal_allowed(value) {
                return ScalarStyle::Literal;
            }
            return ScalarStyle::DoubleQuoted;
        }
        if value.chars().any(|c| c.is_control() && c != '\t') {
            return ScalarStyle::DoubleQuoted;
        }
        if plain_allowed(value) {
            ScalarStyle::Plain
        } else {
            ScalarStyle::SingleQuoted
        }
    }

    /// Single-line form, used for keys
    fn inline(value: &str) -> String {
        match Self::of(value) {
            ScalarStyle::Literal => ScalarStyle::DoubleQuoted.format(value),
            style => style.format(value),
        }
    }

    fn format(self, value: &str) -> String {
        match self {
            ScalarStyle::Plain | ScalarStyle::Literal => value.to_string(),
            ScalarStyle::SingleQuoted => format!("'{}'", value.replace('\'', "''")),
            ScalarStyle::DoubleQuoted => {
                let mut out = String::with_capacity(value.len() + 2);
                out.push('"');
                for c in value.chars() {
                    match c {
                        '"' => out.push_str("\\\""),
                        '\\' => out.push_str("\\\\"),
                        '\n' => out.push_str("\\n"),
                        '\t' => out.push_str("\\t"),
                        '\r' => out.push_str("\\r"),
                        c if c.is_control() => out.push_str(&format!("\\x{:02x}", c as u32)),
                        c => out.push(c),
                    }
                }
                out.push('"');
                out
            }
        }
    }
}

fn plain_allowed(value: &str) -> bool {
    let Some(first) = value.chars().next() else {
        return false;
    };
    if value.starts_with(char::is_whitespace) || value.ends_with(char::is_whitespace) {
        return false;
    }
    if matches!(
        first,
        ',' | '[' | ']' | '{' | '}' | '#' | '&' | '*' | '!' | '|' | '>' | '\'' | '"' | '%' | '@' | '`'
    ) {
        return false;
    }
    if matches!(first, '-' | '?' | ':') {
        let second = value[first.len_utf8()..].chars().next();
        if second.map_or(true, char::is_whitespace) {
            return false;
        }
    }
    !(value.contains(": ") || value.contains(" #") || value.ends_with(':') || value.contains('\t'))
}

fn literal_allowed(value: &str) -> bool {
    !value.starts_with(' ')
        && !value.chars().any(|c| c.is_control() && c != '\n')
        && !value.split('\n').any(|line| line.ends_with(' '))
}
