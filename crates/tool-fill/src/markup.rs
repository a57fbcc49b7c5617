use crate::policy::FillPolicyView;

/// Renders a plain value as rich-text markup: optional escaping, then newline conversion.
pub fn render(value: &str, policy: &FillPolicyView) -> String {
    let escaped = if policy.escape_markup {
        escape(value)
    } else {
        value.to_string()
    };
    escaped
        .replace("\r\n", "\n")
        .replace('\r', "\n")
        .replace('\n', &policy.line_break_markup)
}

fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}
