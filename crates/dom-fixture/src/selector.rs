//! Selector subset understood by the simulated page.
//!
//! Steps are joined by `>` (child combinator). Each step is an optional tag followed by any number
//! of `#id`, `[attr="value"]` and `:nth-child(n)` qualifiers. Matching returns the first element in
//! document order.

use std::str::FromStr;

use crate::dom::Dom;
use crate::errors::FixtureError;

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Step {
    pub tag: Option<String>,
    pub id: Option<String>,
    pub attrs: Vec<(String, String)>,
    /// 1-based position among the parent's children.
    pub nth_child: Option<usize>,
}

impl Step {
    fn is_empty(&self) -> bool {
        self.tag.is_none() && self.id.is_none() && self.attrs.is_empty() && self.nth_child.is_none()
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Selector {
    steps: Vec<Step>,
}

impl Selector {
    pub fn parse(raw: &str) -> Result<Self, FixtureError> {
        raw.parse()
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub(crate) fn matches(&self, dom: &Dom, node: usize) -> bool {
        self.matches_from(dom, node, self.steps.len() - 1)
    }

    fn matches_from(&self, dom: &Dom, node: usize, step: usize) -> bool {
        if !step_matches(&self.steps[step], dom, node) {
            return false;
        }
        if step == 0 {
            return true;
        }
        match dom.node(node).and_then(|n| n.parent) {
            Some(parent) => self.matches_from(dom, parent, step - 1),
            None => false,
        }
    }
}

impl FromStr for Selector {
    type Err = FixtureError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        if raw.trim().is_empty() {
            return Err(FixtureError::selector(raw, "empty selector"));
        }
        let steps = raw
            .split('>')
            .map(|part| parse_step(part.trim(), raw))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { steps })
    }
}

fn parse_step(part: &str, full: &str) -> Result<Step, FixtureError> {
    let mut step = Step::default();
    let tag_len = part
        .find(|c: char| !(c.is_ascii_alphanumeric() || c == '-' || c == '*'))
        .unwrap_or(part.len());
    let tag = &part[..tag_len];
    if !tag.is_empty() && tag != "*" {
        step.tag = Some(tag.to_ascii_lowercase());
    }
    let mut rest = &part[tag_len..];

    while !rest.is_empty() {
        if let Some(after) = rest.strip_prefix('#') {
            let end = after
                .find(|c: char| matches!(c, '#' | '[' | ':') || c.is_whitespace())
                .unwrap_or(after.len());
            if end == 0 {
                return Err(FixtureError::selector(full, "empty id"));
            }
            step.id = Some(after[..end].to_string());
            rest = &after[end..];
        } else if let Some(after) = rest.strip_prefix('[') {
            let close = after
                .find(']')
                .ok_or_else(|| FixtureError::selector(full, "unclosed attribute"))?;
            let (name, value) = after[..close]
                .split_once('=')
                .ok_or_else(|| FixtureError::selector(full, "attribute needs a value"))?;
            let name = name.trim();
            if name.is_empty() {
                return Err(FixtureError::selector(full, "empty attribute name"));
            }
            step.attrs
                .push((name.to_ascii_lowercase(), unquote(value.trim()).to_string()));
            rest = &after[close + 1..];
        } else if let Some(after) = rest.strip_prefix(":nth-child(") {
            let close = after
                .find(')')
                .ok_or_else(|| FixtureError::selector(full, "unclosed :nth-child"))?;
            let index: usize = after[..close]
                .trim()
                .parse()
                .map_err(|_| FixtureError::selector(full, "nth-child needs a positive integer"))?;
            if index == 0 {
                return Err(FixtureError::selector(full, "nth-child is 1-based"));
            }
            step.nth_child = Some(index);
            rest = &after[close + 1..];
        } else {
            return Err(FixtureError::selector(
                full,
                format!("unsupported syntax near `{rest}`"),
            ));
        }
    }

    if step.is_empty() {
        return Err(FixtureError::selector(full, "empty step"));
    }
    Ok(step)
}

fn unquote(value: &str) -> &str {
    for quote in ['"', '\''] {
        if let Some(inner) = value
            .strip_prefix(quote)
            .and_then(|v| v.strip_suffix(quote))
        {
            return inner;
        }
    }
    value
}

fn step_matches(step: &Step, dom: &Dom, id: usize) -> bool {
    let Some(node) = dom.node(id) else {
        return false;
    };
    if let Some(tag) = &step.tag {
        if &node.tag != tag {
            return false;
        }
    }
    if let Some(wanted) = &step.id {
        if node.attr("id") != Some(wanted.as_str()) {
            return false;
        }
    }
    if step
        .attrs
        .iter()
        .any(|(name, value)| node.attr(name) != Some(value.as_str()))
    {
        return false;
    }
    match step.nth_child {
        Some(index) => dom.child_index(id) == Some(index),
        None => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_compound_steps() {
        let selector = Selector::parse("form#signup > INPUT[name=\"email\"]:nth-child(2)").unwrap();
        assert_eq!(selector.steps().len(), 2);
        assert_eq!(selector.steps()[0].tag.as_deref(), Some("form"));
        assert_eq!(selector.steps()[0].id.as_deref(), Some("signup"));
        let last = &selector.steps()[1];
        assert_eq!(last.tag.as_deref(), Some("input"));
        assert_eq!(last.attrs, vec![("name".to_string(), "email".to_string())]);
        assert_eq!(last.nth_child, Some(2));
    }

    #[test]
    fn accepts_single_quotes_and_bare_values() {
        let a = Selector::parse("[data-role='x']").unwrap();
        let b = Selector::parse("[data-role=x]").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn rejects_unsupported_syntax() {
        for raw in ["", "div span", "#", "input[", "li:nth-child(0)", "a > > b", ".cls", "[x]"] {
            assert!(Selector::parse(raw).is_err(), "{raw} should not parse");
        }
    }
}
