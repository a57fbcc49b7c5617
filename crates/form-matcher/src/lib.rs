//! Field-to-template matching for SoulFill.
//!
//! Everything here is pure: scanned [`FieldDescriptor`]s and a [`Template`] go in, candidates, a
//! confidence figure and a [`Route`](soulfill_core_types::Route) come out.

pub mod engine;
pub mod errors;
pub mod model;
pub mod normalize;
pub mod plan;
pub mod policy;

use soulfill_core_types::{FieldDescriptor, Template};

pub use engine::{evaluate_containers, match_field, match_fields, select_best_container};
pub use errors::MatchError;
pub use model::{ContainerMatch, Decision, MatchCandidate, MatchReason, MatchReport};
pub use normalize::{extract_terms, normalize, MIN_TERM_LEN};
pub use plan::{build_plan, manual_plan, ManualAssignment};
pub use policy::{decide, DecisionPolicy, DEFAULT_CONFIRM_THRESHOLD};

/// Matches one container and routes it with `policy`.
pub fn match_and_decide(
    fields: &[FieldDescriptor],
    template: &Template,
    policy: &DecisionPolicy,
) -> Decision {
    let report = match_fields(fields, template);
    let route = policy.decide(report.confidence, report.match_count);
    tracing::debug!(route = %route, "routed container");
    Decision::from_report(route, report)
}
