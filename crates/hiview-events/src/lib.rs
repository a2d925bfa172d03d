use crossbeam_channel::{Receiver, Sender, unbounded};
use hiview_core::{EdgeElement, HierarchyTree, NodeElement, StyleMode, TreeNodeId, Vec2};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::trace;

/// Everything an external loader hands over for one network.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NetworkSnapshot {
    pub tree: HierarchyTree,
    /// Coordinates from the layout engine; missing entries sit at the origin.
    #[serde(default)]
    pub layout: BTreeMap<TreeNodeId, Vec2>,
    #[serde(default)]
    pub nodes: Vec<NodeElement>,
    #[serde(default)]
    pub edges: Vec<EdgeElement>,
    /// Network attributes such as `{"Group": "X|Y"}`.
    #[serde(default)]
    pub metadata: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Event {
    // Network lifecycle
    NetworkLoaded { network: Box<NetworkSnapshot> },
    NetworkCleared,

    // Derive triggers
    FocusChanged { focus: TreeNodeId },
    StyleModeChanged { mode: StyleMode },

    // Interaction
    /// A node was clicked; repeated clicks on the same node are ignored.
    SelectNode { id: String },
    SetShowPleioEdges(bool),
}

#[derive(Clone)]
pub struct EventBus {
    tx: Sender<Event>,
    rx: Receiver<Event>,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl EventBus {
    pub fn new() -> Self {
        let (tx, rx) = unbounded();
        Self { tx, rx }
    }

    pub fn sender(&self) -> Sender<Event> {
        self.tx.clone()
    }

    pub fn receiver(&self) -> Receiver<Event> {
        self.rx.clone()
    }

    pub fn publish(&self, event: Event) {
        trace!(?event, "Publishing event");
        let _ = self.tx.send(event);
    }

    /// Hands every pending event to `listener` in publish order.
    pub fn dispatch_to<L: EventListener>(&self, listener: &mut L) {
        while let Ok(event) = self.rx.try_recv() {
            listener.handle_event(&event);
        }
    }
}

/// Components that react to bus events.
pub trait EventListener {
    fn handle_event(&mut self, event: &Event);
}
