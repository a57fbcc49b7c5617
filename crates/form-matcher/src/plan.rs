use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use soulfill_core_types::{FieldDescriptor, FillPlan, Template};
use tracing::debug;

use crate::errors::MatchError;
use crate::model::MatchCandidate;

/// Plan for every matched candidate, in field order.
pub fn build_plan(candidates: &[MatchCandidate]) -> FillPlan {
    candidates
        .iter()
        .filter_map(|candidate| {
            candidate.fill_value().map(|value| {
                soulfill_core_types::FillEntry::new(candidate.field.selector.clone(), value)
            })
        })
        .collect()
}

/// User choice for one live field in the manual mapping step; `None` leaves it untouched.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManualAssignment {
    pub selector: String,
    #[serde(default)]
    pub template_key: Option<String>,
}

impl ManualAssignment {
    pub fn new(selector: impl Into<String>, template_key: impl Into<String>) -> Self {
        Self {
            selector: selector.into(),
            template_key: Some(template_key.into()),
        }
    }

    pub fn skip(selector: impl Into<String>) -> Self {
        Self {
            selector: selector.into(),
            template_key: None,
        }
    }
}

/// Builds the forced plan from manual assignments, ordered like `fields`.
///
/// Fields without an assignment (or assigned `None`) are skipped, as are template fields whose
/// value is empty.
pub fn manual_plan(
    fields: &[FieldDescriptor],
    template: &Template,
    assignments: &[ManualAssignment],
) -> Result<FillPlan, MatchError> {
    let mut by_selector: HashMap<&str, &str> = HashMap::new();
    for assignment in assignments {
        if !fields
            .iter()
            .any(|field| field.selector == assignment.selector)
        {
            return Err(MatchError::UnknownSelector(assignment.selector.clone()));
        }
        if let Some(key) = assignment.template_key.as_deref() {
            if template.field(key).is_none() {
                return Err(MatchError::UnknownTemplateField(key.to_string()));
            }
            by_selector.insert(assignment.selector.as_str(), key);
        }
    }

    let mut plan = FillPlan::new();
    for field in fields {
        let Some(key) = by_selector.get(field.selector.as_str()) else {
            continue;
        };
        let Some(template_field) = template.field(key) else {
            continue;
        };
        if !template_field.has_value() {
            debug!(selector = %field.selector, key = %key, "manual mapping skipped empty value");
            continue;
        }
        plan.push(field.selector.clone(), template_field.value.clone());
    }
    Ok(plan)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::match_fields;
    use soulfill_core_types::TemplateField;

    fn template() -> Template {
        Template::new("Profile")
            .with_field(TemplateField::new("Email", "a@b.com", ["email"]))
            .with_field(TemplateField::new("Phone", "555-0100", ["phone", "tel"]))
            .with_field(TemplateField::new("Fax", "", ["fax"]))
    }

    fn fields() -> Vec<FieldDescriptor> {
        vec![
            FieldDescriptor::new("#a").with_name("contact_email"),
            FieldDescriptor::new("#b").with_name("mystery"),
            FieldDescriptor::new("#c").with_name("tel"),
            FieldDescriptor::new("#d").with_name("fax"),
        ]
    }

    #[test]
    fn plan_contains_only_fillable_matches_in_field_order() {
        let report = match_fields(&fields(), &template());
        let plan = build_plan(&report.candidates);
        let pairs: Vec<_> = plan
            .iter()
            .map(|e| (e.selector.as_str(), e.value.as_str()))
            .collect();
        assert_eq!(pairs, vec![("#a", "a@b.com"), ("#c", "555-0100")]);
    }

    #[test]
    fn manual_plan_follows_field_order_not_assignment_order() {
        let assignments = vec![
            ManualAssignment::new("#c", "email"),
            ManualAssignment::skip("#a"),
            ManualAssignment::new("#b", "phone"),
            ManualAssignment::new("#d", "fax"),
        ];
        let plan = manual_plan(&fields(), &template(), &assignments).unwrap();
        let pairs: Vec<_> = plan
            .iter()
            .map(|e| (e.selector.as_str(), e.value.as_str()))
            .collect();
        assert_eq!(pairs, vec![("#b", "555-0100"), ("#c", "a@b.com")]);
    }

    #[test]
    fn manual_plan_rejects_unknown_keys_and_selectors() {
        let err = manual_plan(
            &fields(),
            &template(),
            &[ManualAssignment::new("#a", "nope")],
        )
        .unwrap_err();
        assert_eq!(err, MatchError::UnknownTemplateField("nope".into()));

        let err = manual_plan(
            &fields(),
            &template(),
            &[ManualAssignment::new("#zz", "email")],
        )
        .unwrap_err();
        assert_eq!(err, MatchError::UnknownSelector("#zz".into()));
    }

    #[test]
    fn manual_plan_defaults_to_nothing() {
        let plan = manual_plan(&fields(), &template(), &[]).unwrap();
        assert!(plan.is_empty());
    }
}
