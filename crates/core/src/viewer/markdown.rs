//! Restricted Markdown renderer for description fields.
//!
//! Emits paragraphs, ordered/unordered lists, and emphasis only. Input is
//! HTML-escaped before any markup is applied, so raw HTML in a spec is
//! displayed as text rather than executed.

pub fn render_markdown(input: &str) -> String {
    let mut html = String::new();
    for block in parse_blocks(input) {
        match block {
            Block::Paragraph(lines) => {
                html.push_str("<p>");
                html.push_str(&render_inline(&lines.join(" ")));
                html.push_str("</p>\n");
            }
            Block::List { ordered, items } => {
                let tag = if ordered { "ol" } else { "ul" };
                html.push('<');
                html.push_str(tag);
                html.push_str(">\n");
                for item in items {
                    html.push_str("<li>");
                    html.push_str(&render_inline(&item));
                    html.push_str("</li>\n");
                }
                html.push_str("</");
                html.push_str(tag);
                html.push_str(">\n");
            }
        }
    }
    html
}

enum Block {
    Paragraph(Vec<String>),
    List { ordered: bool, items: Vec<String> },
}

fn parse_blocks(input: &str) -> Vec<Block> {
    let mut blocks: Vec<Block> = Vec::new();
    let mut current: Option<Block> = None;

    for line in input.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            if let Some(block) = current.take() {
                blocks.push(block);
            }
            continue;
        }

        if let Some(item) = list_item(trimmed) {
            match &mut current {
                Some(Block::List { ordered, items }) if *ordered == item.ordered => {
                    items.push(item.text);
                }
                _ => {
                    if let Some(block) = current.take() {
                        blocks.push(block);
                    }
                    current = Some(Block::List {
                        ordered: item.ordered,
                        items: vec![item.text],
                    });
                }
            }
        } else {
            match &mut current {
                Some(Block::Paragraph(lines)) => lines.push(trimmed.to_string()),
                _ => {
                    if let Some(block) = current.take() {
                        blocks.push(block);
                    }
                    current = Some(Block::Paragraph(vec![trimmed.to_string()]));
                }
            }
        }
    }

    if let Some(block) = current.take() {
        blocks.push(block);
    }
    blocks
}

struct ListItem {
    ordered: bool,
    text: String,
}

fn list_item(line: &str) -> Option<ListItem> {
    if let Some(rest) = line.strip_prefix("- ").or_else(|| line.strip_prefix("* ")) {
        return Some(ListItem {
            ordered: false,
            text: rest.trim().to_string(),
        });
    }
    let dot = line.find(". ")?;
    if dot > 0 && line[..dot].chars().all(|c| c.is_ascii_digit()) {
        return Some(ListItem {
            ordered: true,
            text: line[dot + 2..].trim().to_string(),
        });
    }
    None
}

fn render_inline(text: &str) -> String {
    let escaped = escape_html(text);
    let strong = wrap_pairs(&escaped, "**", "strong");
    let em = wrap_pairs(&strong, "*", "em");
    wrap_pairs(&em, "_", "em")
}

pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Wrap every balanced `delimiter` pair in `tag`. An unbalanced trailing
/// delimiter stays literal.
fn wrap_pairs(text: &str, delimiter: &str, tag: &str) -> String {
    let mut parts: Vec<&str> = text.split(delimiter).collect();
    if parts.len() < 3 {
        return text.to_string();
    }

    let mut tail = String::new();
    if parts.len() % 2 == 0 {
        if let Some(last) = parts.pop() {
            tail = format!("{delimiter}{last}");
        }
    }

    let mut out = String::new();
    for (i, part) in parts.iter().enumerate() {
        if i % 2 == 1 {
            out.push('<');
            out.push_str(tag);
            out.push('>');
            out.push_str(part);
            out.push_str("</");
            out.push_str(tag);
            out.push('>');
        } else {
            out.push_str(part);
        }
    }
    out.push_str(&tail);
    out
}
