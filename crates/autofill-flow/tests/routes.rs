use std::sync::Arc;

use async_trait::async_trait;
use autofill_flow::{
    AutofillOutcome, AutofillService, AutofillServiceBuilder, FlowError, InspectCompletion,
    ScanPort, BODY_CONTAINER,
};
use form_matcher::{DecisionPolicy, ManualAssignment};
use highlight_overlay::{HighlightLayout, HighlightRenderer, OverlayPort, Slot};
use inspect_controller::{
    ElementTree, InspectCommit, InspectConfig, InspectController, InspectEvent, InspectSurface,
    NodeHandle,
};
use parking_lot::Mutex;
use soulfill_core_types::{
    BoundingBox, FieldDescriptor, FillPlan, FormScan, HostError, InspectMode, Point, Route,
    Template, TemplateField, Viewport,
};
use soulfill_event_bus::{EventBus, InMemoryBus};
use soulfill_template_store::{InMemoryTemplateStore, TemplateStore};
use tool_fill::{DomPort, ElementInfo, FillPolicyView, FillToolBuilder, Notification};

/// Page double: scan results are fixed, every known selector is a text input.
#[derive(Default)]
struct FakePage {
    forms: Vec<FormScan>,
    loose_fields: Vec<FieldDescriptor>,
    vanished: Vec<String>,
    writes: Mutex<Vec<(String, String)>>,
    overlay_log: Mutex<Vec<String>>,
}

impl FakePage {
    fn knows(&self, selector: &str) -> bool {
        if self.vanished.iter().any(|s| s == selector) {
            return false;
        }
        self.forms
            .iter()
            .flat_map(|f| f.fields.iter())
            .chain(self.loose_fields.iter())
            .any(|f| f.selector == selector)
    }
}

#[async_trait]
impl ScanPort for FakePage {
    async fn scan_container(
        &self,
        selector: Option<&str>,
    ) -> Result<Vec<FieldDescriptor>, HostError> {
        match selector {
            None => Ok(self
                .forms
                .iter()
                .flat_map(|f| f.fields.clone())
                .chain(self.loose_fields.clone())
                .collect()),
            Some(sel) => Ok(self
                .forms
                .iter()
                .find(|f| f.selector == sel)
                .map(|f| f.fields.clone())
                .unwrap_or_default()),
        }
    }

    async fn scan_whole_forms(&self) -> Result<Vec<FormScan>, HostError> {
        Ok(self.forms.clone())
    }
}

#[async_trait]
impl DomPort for FakePage {
    async fn inspect(&self, selector: &str) -> Result<Option<ElementInfo>, HostError> {
        Ok(self.knows(selector).then(|| ElementInfo {
            tag: "input".into(),
            input_type: Some("text".into()),
            ..ElementInfo::default()
        }))
    }

    async fn write_value(&self, selector: &str, value: &str) -> Result<(), HostError> {
        self.writes.lock().push((selector.into(), value.into()));
        Ok(())
    }

    async fn write_markup(&self, selector: &str, markup: &str) -> Result<(), HostError> {
        self.write_value(selector, markup).await
    }

    async fn choose_option(&self, _selector: &str, _index: usize) -> Result<(), HostError> {
        Ok(())
    }

    async fn write_checked(&self, _selector: &str, _checked: bool) -> Result<(), HostError> {
        Ok(())
    }

    async fn dispatch(&self, _selector: &str, _n: Notification) -> Result<(), HostError> {
        Ok(())
    }
}

impl ElementTree for FakePage {
    fn parent(&self, _node: NodeHandle) -> Option<NodeHandle> {
        None
    }

    fn tag(&self, _node: NodeHandle) -> String {
        "form".into()
    }

    fn attr(&self, _node: NodeHandle, _name: &str) -> Option<String> {
        None
    }

    fn fillable_descendants(&self, _node: NodeHandle) -> usize {
        0
    }

    fn selector(&self, node: NodeHandle) -> String {
        self.forms[node.0 as usize].selector.clone()
    }
}

impl InspectSurface for FakePage {
    fn element_at(&self, point: Point) -> Option<NodeHandle> {
        let index = point.y as usize / 100;
        (index < self.forms.len()).then_some(NodeHandle(index as u64))
    }

    fn install_overlay(&self) -> Result<(), HostError> {
        Ok(())
    }

    fn remove_overlay(&self) -> Result<(), HostError> {
        Ok(())
    }

    fn install_listeners(&self) -> Result<(), HostError> {
        Ok(())
    }

    fn remove_listeners(&self) -> Result<(), HostError> {
        Ok(())
    }
}

impl OverlayPort for FakePage {
    fn bounding_box(&self, _selector: &str) -> Result<Option<BoundingBox>, HostError> {
        Ok(Some(BoundingBox::new(0.0, 50.0, 100.0, 100.0)))
    }

    fn viewport(&self) -> Viewport {
        Viewport::default()
    }

    fn draw(&self, slot: Slot, _layout: &HighlightLayout) -> Result<(), HostError> {
        self.overlay_log.lock().push(format!("draw {}", slot.label()));
        Ok(())
    }

    fn clear(&self, slot: Slot) -> Result<(), HostError> {
        self.overlay_log.lock().push(format!("clear {}", slot.label()));
        Ok(())
    }
}

fn profile() -> Template {
    Template::new("Profile")
        .with_field(TemplateField::new("Email", "ada@example.com", ["e-mail"]))
        .with_field(TemplateField::new("Phone", "555-0100", ["tel", "mobile"]))
        .with_field(TemplateField::new("City", "London", ["town"]))
}

fn field(selector: &str, name: &str) -> FieldDescriptor {
    FieldDescriptor::new(selector).with_name(name)
}

type Harness = (
    Arc<FakePage>,
    Arc<InMemoryTemplateStore>,
    AutofillService,
    Template,
);

async fn setup(page: FakePage) -> Harness {
    let page = Arc::new(page);
    let store = Arc::new(InMemoryTemplateStore::new());
    let template = store.save(profile()).await.unwrap();

    let highlights = Arc::new(HighlightRenderer::new(page.clone()));
    let bus: Arc<dyn EventBus<InspectEvent>> = InMemoryBus::new(8);
    let inspect = Arc::new(InspectController::new(
        page.clone(),
        highlights.clone(),
        bus,
        InspectConfig::default(),
    ));
    let fill = FillToolBuilder::new(FillPolicyView::default())
        .with_dom(page.clone())
        .build()
        .unwrap();
    let service = AutofillServiceBuilder::new(DecisionPolicy::default())
        .with_store(store.clone())
        .with_scanner(page.clone())
        .with_fill(fill)
        .with_inspect(inspect)
        .with_highlights(highlights)
        .build()
        .unwrap();
    (page, store, service, template)
}

fn two_forms() -> FakePage {
    FakePage {
        forms: vec![
            FormScan {
                selector: "#search".into(),
                fields: vec![field("#q", "email")],
            },
            FormScan {
                selector: "#contact".into(),
                fields: vec![
                    field("#e", "email"),
                    field("#p", "phone"),
                    field("#c", "city"),
                ],
            },
        ],
        ..FakePage::default()
    }
}

#[tokio::test]
async fn confident_match_waits_for_confirmation_then_fills() {
    let (page, store, service, template) = setup(two_forms()).await;

    let pending = match service.autofill(&template.id).await.unwrap() {
        AutofillOutcome::AwaitingConfirm(pending) => pending,
        other => panic!("expected confirm, got {other:?}"),
    };
    assert_eq!(pending.container, "#contact");
    assert_eq!(pending.decision.route, Route::Confirm);
    assert_eq!(pending.decision.match_count, 3);
    assert_eq!(page.overlay_log.lock().as_slice(), ["draw preview"]);

    let done = service.resolve_confirm(pending, true).await.unwrap();
    let AutofillOutcome::Filled { container, summary } = done else {
        panic!("expected fill");
    };
    assert_eq!(container, "#contact");
    assert_eq!(summary.message(), "Filled 3/3 fields");
    assert_eq!(
        page.writes.lock().as_slice(),
        [
            ("#e".to_string(), "ada@example.com".to_string()),
            ("#p".to_string(), "555-0100".to_string()),
            ("#c".to_string(), "London".to_string()),
        ]
    );
    assert!(page.overlay_log.lock().contains(&"clear preview".to_string()));
    assert_eq!(store.record(&template.id).unwrap().use_count, 1);
}

#[tokio::test]
async fn rejecting_confirm_enters_inspect_with_template() {
    let (_, _, service, template) = setup(two_forms()).await;
    let AutofillOutcome::AwaitingConfirm(pending) = service.autofill(&template.id).await.unwrap()
    else {
        panic!("expected confirm");
    };

    let outcome = service.resolve_confirm(pending, false).await.unwrap();
    let AutofillOutcome::Inspecting { template: kept, .. } = outcome else {
        panic!("expected inspect");
    };
    assert_eq!(kept.id, template.id);
    assert_eq!(service.inspect_controller().mode(), Some(InspectMode::Fill));

    // Pick the second container and commit.
    let controller = service.inspect_controller();
    assert_eq!(
        controller.pointer_move(Point::new(1.0, 150.0)).as_deref(),
        Some("#contact")
    );
    let commit = controller
        .pointer_button(
            inspect_controller::PointerButton::Primary,
            inspect_controller::ButtonPhase::Click,
        )
        .commit
        .unwrap();
    let completion = service.complete_inspect(commit).await.unwrap();
    let InspectCompletion::Filled { summary, report, .. } = completion else {
        panic!("expected fill completion");
    };
    assert_eq!(report.match_count, 3);
    assert_eq!(summary.filled, 3);
}

#[tokio::test]
async fn low_confidence_needs_manual_mapping() {
    let page = FakePage {
        forms: vec![FormScan {
            selector: "#survey".into(),
            fields: vec![
                field("#e", "email"),
                field("#x1", "q1"),
                field("#x2", "q2"),
                field("#x3", "q3"),
            ],
        }],
        ..FakePage::default()
    };
    let (page, _, service, template) = setup(page).await;
    let AutofillOutcome::AwaitingMapping(pending) = service.autofill(&template.id).await.unwrap()
    else {
        panic!("expected mapping");
    };
    assert_eq!(pending.decision.route, Route::ManualMap);

    let assignments = vec![
        ManualAssignment::new("#x2", "city"),
        ManualAssignment::skip("#e"),
    ];
    let done = service
        .submit_mapping(pending.clone(), &assignments)
        .await
        .unwrap();
    assert!(matches!(done, AutofillOutcome::Filled { ref summary, .. } if summary.filled == 1));
    assert_eq!(
        page.writes.lock().as_slice(),
        [("#x2".to_string(), "London".to_string())]
    );

    let err = service
        .submit_mapping(pending, &[ManualAssignment::new("#x1", "fax")])
        .await
        .unwrap_err();
    assert!(matches!(err, FlowError::Match(_)));
}

#[tokio::test]
async fn no_match_goes_straight_to_inspect() {
    let page = FakePage {
        forms: vec![FormScan {
            selector: "#login".into(),
            fields: vec![field("#u", "username"), field("#pw", "password")],
        }],
        ..FakePage::default()
    };
    let (_, _, service, template) = setup(page).await;
    let outcome = service.autofill(&template.id).await.unwrap();
    assert_eq!(outcome.label(), "inspecting");
    assert!(service.inspect_controller().is_active());

    // A second autofill while inspecting is a session conflict.
    let err = service.autofill(&template.id).await.unwrap_err();
    assert!(matches!(err, FlowError::Inspect(_)));
    service.stop_inspect();
    assert!(!service.inspect_controller().is_active());
}

#[tokio::test]
async fn falls_back_to_whole_page_and_reports_zero_fields() {
    let page = FakePage {
        loose_fields: vec![field("#e", "email"), field("#t", "tel")],
        ..FakePage::default()
    };
    let (_, _, service, template) = setup(page).await;
    let AutofillOutcome::AwaitingConfirm(pending) = service.autofill(&template.id).await.unwrap()
    else {
        panic!("expected confirm");
    };
    assert_eq!(pending.container, BODY_CONTAINER);

    let (_, _, empty, template) = setup(FakePage::default()).await;
    let err = empty.autofill(&template.id).await.unwrap_err();
    assert!(matches!(err, FlowError::ZeroFieldsDetected));
    assert_eq!(err.to_string(), "no form fields found");
}

#[tokio::test]
async fn container_that_no_longer_resolves_is_structural() {
    let mut page = two_forms();
    page.vanished = vec!["#e".into(), "#p".into(), "#c".into()];
    let (_, _, service, template) = setup(page).await;
    let AutofillOutcome::AwaitingConfirm(pending) = service.autofill(&template.id).await.unwrap()
    else {
        panic!("expected confirm");
    };
    let err = service.resolve_confirm(pending, true).await.unwrap_err();
    assert!(matches!(err, FlowError::TargetsUnresolved { .. }));
}

#[tokio::test]
async fn import_commit_seeds_unsaved_template() {
    let (_, store, service, _) = setup(two_forms()).await;
    let token = service.start_inspect(InspectMode::Import, None).unwrap();
    let completion = service
        .complete_inspect(InspectCommit {
            token,
            mode: InspectMode::Import,
            selector: "#contact".into(),
            pending_template: None,
        })
        .await
        .unwrap();
    let InspectCompletion::Imported { template, .. } = completion else {
        panic!("expected import");
    };
    let keys: Vec<_> = template.fields.iter().map(|f| f.key.as_str()).collect();
    assert_eq!(keys, vec!["email", "phone", "city"]);
    assert_eq!(store.list().await.unwrap().len(), 1);

    let saved = service.save_imported(template).await.unwrap();
    assert!(!saved.id.is_empty());
    assert_eq!(store.list().await.unwrap().len(), 2);
}

#[tokio::test]
async fn direct_plan_execution_reports_per_field() {
    let (_, _, service, _) = setup(two_forms()).await;
    let plan = FillPlan::new().with("#gone", "x").with("#e", "y");
    let summary = service.execute_fill(plan).await.unwrap();
    assert_eq!(summary.message(), "Filled 1/2 fields");
}
