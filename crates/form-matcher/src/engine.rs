use std::collections::BTreeSet;

use soulfill_core_types::{FieldDescriptor, FormScan, Template, TemplateField};
use tracing::debug;

use crate::model::{ContainerMatch, MatchCandidate, MatchReason, MatchReport};
use crate::normalize::{extract_terms, normalize, overlaps};

/// Template field with its comparison strings computed once per matching run.
struct PreparedField<'a> {
    field: &'a TemplateField,
    alias_norms: Vec<String>,
    alias_terms: BTreeSet<String>,
    label_norm: String,
    key_norm: String,
}

impl<'a> PreparedField<'a> {
    fn new(field: &'a TemplateField) -> Self {
        let alias_norms = field
            .aliases
            .iter()
            .map(|alias| normalize(alias))
            .filter(|alias| !alias.is_empty())
            .collect();
        let alias_terms = field
            .aliases
            .iter()
            .flat_map(|alias| extract_terms(alias))
            .collect();
        Self {
            field,
            alias_norms,
            alias_terms,
            label_norm: normalize(&field.label),
            key_norm: normalize(&field.key),
        }
    }

    fn reason_for(&self, probe_norm: &str, probe_terms: &BTreeSet<String>) -> Option<MatchReason> {
        if self
            .alias_norms
            .iter()
            .any(|alias| overlaps(probe_norm, alias))
        {
            return Some(MatchReason::Alias);
        }
        if self
            .alias_terms
            .iter()
            .any(|term| probe_terms.iter().any(|probe| overlaps(probe, term)))
        {
            return Some(MatchReason::AliasTerm);
        }
        if overlaps(probe_norm, &self.label_norm) {
            return Some(MatchReason::Label);
        }
        if overlaps(probe_norm, &self.key_norm) {
            return Some(MatchReason::Key);
        }
        None
    }
}

fn prepare(template: &Template) -> Vec<PreparedField<'_>> {
    template.fields.iter().map(PreparedField::new).collect()
}

fn match_prepared(field: &FieldDescriptor, prepared: &[PreparedField<'_>]) -> MatchCandidate {
    let probe = field.probe();
    let probe_norm = normalize(&probe);
    let probe_terms = extract_terms(&probe);

    // First template field in declaration order wins; there is no score to rank by.
    let hit = prepared.iter().find_map(|candidate| {
        candidate
            .reason_for(&probe_norm, &probe_terms)
            .map(|reason| (candidate.field, reason))
    });

    match hit {
        Some((template_field, reason)) => {
            let fillable = template_field.has_value();
            MatchCandidate {
                field: field.clone(),
                template_field: Some(template_field.clone()),
                matched: fillable,
                reason: if fillable {
                    reason
                } else {
                    MatchReason::EmptyValue
                },
            }
        }
        None => MatchCandidate::unmatched(field.clone()),
    }
}

/// Matches a single field against `template`.
pub fn match_field(field: &FieldDescriptor, template: &Template) -> MatchCandidate {
    match_prepared(field, &prepare(template))
}

/// Matches every field of one container; the report's confidence is `matched / total`.
pub fn match_fields(fields: &[FieldDescriptor], template: &Template) -> MatchReport {
    let prepared = prepare(template);
    let candidates = fields
        .iter()
        .map(|field| match_prepared(field, &prepared))
        .collect();
    let report = MatchReport::from_candidates(candidates);
    debug!(
        template = %template.id,
        matched = report.match_count,
        total = report.total,
        confidence = report.confidence,
        "matched container fields"
    );
    report
}

/// Evaluates every container independently, preserving scan order.
pub fn evaluate_containers(scans: &[FormScan], template: &Template) -> Vec<ContainerMatch> {
    scans
        .iter()
        .enumerate()
        .map(|(index, scan)| ContainerMatch {
            index,
            selector: scan.selector.clone(),
            report: match_fields(&scan.fields, template),
        })
        .collect()
}

/// Picks the container with the highest raw match count; ties keep the earliest container.
pub fn select_best_container(scans: &[FormScan], template: &Template) -> Option<ContainerMatch> {
    let mut best: Option<ContainerMatch> = None;
    for container in evaluate_containers(scans, template) {
        let better = match &best {
            Some(current) => container.report.match_count > current.report.match_count,
            None => true,
        };
        if better {
            best = Some(container);
        }
    }
    if let Some(choice) = &best {
        debug!(
            selector = %choice.selector,
            matched = choice.report.match_count,
            containers = scans.len(),
            "selected best container"
        );
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    fn email_template() -> Template {
        Template::new("Contact").with_field(TemplateField {
            key: "email".into(),
            label: "Email".into(),
            value: "a@b.com".into(),
            aliases: vec!["email".into(), "e-mail".into()],
        })
    }

    #[test]
    fn alias_substring_matches_probe() {
        let field = FieldDescriptor::new("#e")
            .with_name("user_email")
            .with_placeholder("Your email");
        let candidate = match_field(&field, &email_template());
        assert!(candidate.matched);
        assert_eq!(candidate.reason, MatchReason::Alias);
        assert_eq!(candidate.fill_value(), Some("a@b.com"));
    }

    #[test]
    fn unrelated_field_is_unmatched() {
        let field = FieldDescriptor::new("#p").with_name("x1").with_label("Phone");
        let candidate = match_field(&field, &email_template());
        assert!(!candidate.matched);
        assert!(candidate.template_field.is_none());
        assert_eq!(candidate.reason, MatchReason::NoMatch);
    }

    #[test]
    fn alias_terms_match_partial_wording() {
        let template = Template::new("Addr").with_field(TemplateField::new(
            "Street",
            "1 Main St",
            ["street address line"],
        ));
        // "addressline1" contains the alias term "address".
        let field = FieldDescriptor::new("#a").with_name("addressLine1");
        let candidate = match_field(&field, &template);
        assert!(candidate.matched);
        assert_eq!(candidate.reason, MatchReason::AliasTerm);
    }

    #[test]
    fn label_and_key_clauses_apply_without_aliases() {
        let by_label = TemplateField {
            key: "zz".into(),
            label: "Company".into(),
            value: "ACME".into(),
            aliases: vec![],
        };
        let template = Template::new("Org").with_field(by_label);
        let field = FieldDescriptor::new("#c").with_label("Company name");
        assert_eq!(match_field(&field, &template).reason, MatchReason::Label);

        let by_key = TemplateField {
            key: "vat".into(),
            label: "Tax number".into(),
            value: "PT123".into(),
            aliases: vec![],
        };
        let template = Template::new("Org").with_field(by_key);
        let field = FieldDescriptor::new("#v").with_name("vat");
        assert_eq!(match_field(&field, &template).reason, MatchReason::Key);
    }

    #[test]
    fn first_template_field_wins_ties() {
        let template = Template::new("Names")
            .with_field(TemplateField::new("Name", "Ada", ["name"]))
            .with_field(TemplateField::new("Full Name", "Ada Lovelace", ["full name"]));
        let field = FieldDescriptor::new("#n").with_label("Full name");
        let candidate = match_field(&field, &template);
        assert_eq!(candidate.template_field.unwrap().key, "name");
    }

    #[test]
    fn empty_value_counts_as_unmatched() {
        let template =
            Template::new("T").with_field(TemplateField::new("Email", "", ["email"]));
        let field = FieldDescriptor::new("#e").with_name("email");
        let report = match_fields(&[field], &template);
        assert_eq!(report.match_count, 0);
        assert_eq!(report.candidates[0].reason, MatchReason::EmptyValue);
        assert!(report.candidates[0].template_field.is_some());
        assert_eq!(report.candidates[0].fill_value(), None);
    }

    #[test]
    fn empty_probe_never_matches() {
        let field = FieldDescriptor::new("#blank");
        assert!(!match_field(&field, &email_template()).matched);
    }

    #[test]
    fn confidence_is_zero_for_empty_container() {
        let report = match_fields(&[], &email_template());
        assert_eq!(report.total, 0);
        assert_eq!(report.confidence, 0.0);
    }

    #[test]
    fn best_container_uses_raw_count_and_keeps_first_on_tie() {
        let template = Template::new("T")
            .with_field(TemplateField::new("Email", "a@b.com", ["email"]))
            .with_field(TemplateField::new("Phone", "555", ["phone"]));
        let search = FormScan {
            selector: "#search".into(),
            fields: vec![FieldDescriptor::new("#q").with_name("email")],
        };
        let signup = FormScan {
            selector: "#signup".into(),
            fields: vec![
                FieldDescriptor::new("#e").with_name("email"),
                FieldDescriptor::new("#p").with_name("phone"),
                FieldDescriptor::new("#x").with_name("nickname"),
                FieldDescriptor::new("#y").with_name("bio"),
            ],
        };
        // search has confidence 1.0 but one match; signup has two matches at 0.5.
        let best = select_best_container(&[search.clone(), signup.clone()], &template).unwrap();
        assert_eq!(best.selector, "#signup");
        assert_eq!(best.index, 1);

        let twin = FormScan {
            selector: "#twin".into(),
            ..signup.clone()
        };
        let best = select_best_container(&[signup, twin], &template).unwrap();
        assert_eq!(best.selector, "#signup");

        assert!(select_best_container(&[], &template).is_none());
    }
}
