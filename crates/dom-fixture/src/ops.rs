use highlight_overlay::Slot;
use serde::Serialize;
use soulfill_core_types::BoundingBox;
use tool_fill::Notification;

/// One host-side effect observed by the simulated page, in call order.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "camelCase")]
pub enum PageOp {
    SetValue { selector: String, value: String },
    SetMarkup { selector: String, markup: String },
    ChooseOption { selector: String, index: usize },
    SetChecked { selector: String, checked: bool },
    Notify {
        selector: String,
        notification: Notification,
    },
    InstallOverlay,
    RemoveOverlay,
    InstallListeners,
    RemoveListeners,
    Draw {
        slot: Slot,
        frame: BoundingBox,
        label: String,
    },
    Clear { slot: Slot },
}

impl PageOp {
    pub fn is_write(&self) -> bool {
        matches!(
            self,
            PageOp::SetValue { .. }
                | PageOp::SetMarkup { .. }
                | PageOp::ChooseOption { .. }
                | PageOp::SetChecked { .. }
        )
    }
}
