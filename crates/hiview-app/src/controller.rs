use crate::settings::ViewerSettings;
use crate::state::{FocusUpdate, ViewState, mode_sheet};
use crossbeam_channel::{Receiver, Sender, unbounded};
use hiview_core::{StyleMode, TreeError, TreeNodeId};
use hiview_events::{Event, EventListener, NetworkSnapshot};
use hiview_graph::{
    GroupResolver, Resolution, TopGroupSet, TreeWalker, detect_pleiotropy,
    focus_groups_from_metadata, resolve_style_preset, style_mode_diagnostics, style_network,
};
use parking_lot::Mutex;
use std::sync::Arc;
use thiserror::Error;
use tracing::{error, info};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ViewError {
    #[error("No network loaded. Load a network before changing focus.")]
    NoNetwork,
    #[error(transparent)]
    Tree(#[from] TreeError),
}

/// Notifications about committed view changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewUpdate {
    Focused { focus: TreeNodeId, leaves: usize },
    Styled { mode: StyleMode },
    Selected { id: String },
    PleioEdgesShown(bool),
    Cleared,
    Failed { message: String },
}

struct Inner {
    settings: ViewerSettings,
    network: Option<NetworkSnapshot>,
    state: ViewState,
}

/// Owner of the single [`ViewState`]. Every operation runs under one lock, so
/// derive passes never interleave.
#[derive(Clone)]
pub struct ViewController {
    inner: Arc<Mutex<Inner>>,
    updates_tx: Sender<ViewUpdate>,
    updates_rx: Receiver<ViewUpdate>,
}

impl Default for ViewController {
    fn default() -> Self {
        Self::new(ViewerSettings::default())
    }
}

impl ViewController {
    pub fn new(settings: ViewerSettings) -> Self {
        let (updates_tx, updates_rx) = unbounded();
        let mut inner = Inner {
            state: ViewState::new(settings.default_style, settings.show_pleio_edges),
            settings,
            network: None,
        };
        let mode = inner.state.style_mode();
        restyle(&mut inner, mode);
        Self {
            inner: Arc::new(Mutex::new(inner)),
            updates_tx,
            updates_rx,
        }
    }

    pub fn updates(&self) -> Receiver<ViewUpdate> {
        self.updates_rx.clone()
    }

    pub fn settings(&self) -> ViewerSettings {
        self.inner.lock().settings.clone()
    }

    /// Snapshot of the cached view.
    pub fn state(&self) -> ViewState {
        self.inner.lock().state.clone()
    }

    /// Replaces the loaded network and derives the view at its root.
    ///
    /// The tree is checked up front and the network is only taken once the
    /// root pass succeeds; on error the previous network and view stay in place.
    pub fn load_network(&self, network: NetworkSnapshot) -> Result<(), ViewError> {
        let mut inner = self.inner.lock();
        let result = network
            .tree
            .validate()
            .and_then(|()| network.tree.require_root())
            .map_err(ViewError::from)
            .and_then(|root| derive_focus(&network, root, &inner.settings));
        let update = self.report(result)?;

        info!(nodes = network.nodes.len(), edges = network.edges.len(), "Network loaded");
        inner.state.clear();
        inner.network = Some(network);
        self.commit_focus(&mut inner, update);
        Ok(())
    }

    pub fn change_focus(&self, focus: TreeNodeId) -> Result<(), ViewError> {
        let mut inner = self.inner.lock();
        let result = match &inner.network {
            Some(network) => derive_focus(network, focus, &inner.settings),
            None => Err(ViewError::NoNetwork),
        };
        let update = self.report(result)?;
        self.commit_focus(&mut inner, update);
        Ok(())
    }

    pub fn change_style(&self, mode: StyleMode) {
        let mut inner = self.inner.lock();
        restyle(&mut inner, mode);
        let _ = self.updates_tx.send(ViewUpdate::Styled { mode });
    }

    /// Returns `false` when `id` is already the current selection.
    pub fn select_node(&self, id: &str) -> bool {
        let selected = self.inner.lock().state.select(id);
        if selected {
            let _ = self.updates_tx.send(ViewUpdate::Selected { id: id.to_string() });
        }
        selected
    }

    pub fn set_show_pleio_edges(&self, show: bool) {
        self.inner.lock().state.set_show_pleio_edges(show);
        let _ = self.updates_tx.send(ViewUpdate::PleioEdgesShown(show));
    }

    pub fn clear_network(&self) {
        let mut inner = self.inner.lock();
        inner.network = None;
        inner.state.clear();
        let mode = inner.state.style_mode();
        restyle(&mut inner, mode);
        info!("Network cleared");
        let _ = self.updates_tx.send(ViewUpdate::Cleared);
    }

    fn commit_focus(&self, inner: &mut Inner, update: FocusUpdate) {
        let focus = update.focus;
        let leaves = update.positions.len();
        inner.state.apply_focus(update);
        let mode = inner.state.style_mode();
        restyle(inner, mode);
        let _ = self.updates_tx.send(ViewUpdate::Focused { focus, leaves });
    }

    fn report<T>(&self, result: Result<T, ViewError>) -> Result<T, ViewError> {
        if let Err(e) = &result {
            error!("View update failed: {e}");
            let _ = self.updates_tx.send(ViewUpdate::Failed {
                message: e.to_string(),
            });
        }
        result
    }
}

impl EventListener for ViewController {
    fn handle_event(&mut self, event: &Event) {
        match event {
            Event::NetworkLoaded { network } => {
                let _ = self.load_network(network.as_ref().clone());
            }
            Event::NetworkCleared => self.clear_network(),
            Event::FocusChanged { focus } => {
                let _ = self.change_focus(*focus);
            }
            Event::StyleModeChanged { mode } => self.change_style(*mode),
            Event::SelectNode { id } => {
                self.select_node(id);
            }
            Event::SetShowPleioEdges(show) => self.set_show_pleio_edges(*show),
        }
    }
}

/// Runs the focus pass without touching any cached state.
fn derive_focus(
    network: &NetworkSnapshot,
    focus: TreeNodeId,
    settings: &ViewerSettings,
) -> Result<FocusUpdate, ViewError> {
    let walker = TreeWalker::new(&network.tree).with_max_depth(settings.max_tree_depth);
    let resolver = GroupResolver::with_walker(walker);
    let Resolution {
        top_groups,
        positions,
    } = resolver.resolve(focus, &network.layout)?;
    let group_positions = resolver.group_positions(focus, &network.layout)?;
    let pleio = detect_pleiotropy(&positions);

    let styled = style_network(
        &network.nodes,
        &network.edges,
        &coloring_groups(network, &top_groups),
        &settings.colors,
    );

    Ok(FocusUpdate {
        focus,
        top_groups,
        positions,
        group_positions,
        pleio,
        nodes: styled.nodes,
        edges: styled.edges,
        legend: styled.legend,
        diagnostics: styled.diagnostics,
    })
}

/// Groups in focus for coloring: those named in the network metadata when
/// present, otherwise the current top-group cut.
fn coloring_groups(network: &NetworkSnapshot, top_groups: &TopGroupSet) -> TopGroupSet {
    let named = focus_groups_from_metadata(&network.metadata);
    if named.is_empty() {
        return top_groups.clone();
    }
    TopGroupSet::from_pairs(named.into_iter().map(|group| {
        let label = top_groups.label(&group).unwrap_or(&group).to_string();
        (group, label)
    }))
}

fn restyle(inner: &mut Inner, mode: StyleMode) {
    let colors = inner.settings.colors;
    inner.state.set_style(mode, mode_sheet(mode, &colors));
    if let Some(legend) = resolve_style_preset(mode, &colors).legend {
        inner.state.merge_legend(legend);
    }
    let diagnostics = style_mode_diagnostics(mode, inner.state.nodes(), &colors);
    inner.state.set_style_diagnostics(diagnostics);
}

#[cfg(test)]
mod tests {
    use super::*;
    use hiview_core::{HierarchyTree, NodeSpec};

    fn cyclic_network() -> NetworkSnapshot {
        NetworkSnapshot {
            tree: HierarchyTree::from_links(vec![
                (NodeSpec::group("Root"), None),
                (NodeSpec::group("A"), Some(TreeNodeId(2))),
                (NodeSpec::group("B"), Some(TreeNodeId(1))),
            ]),
            ..NetworkSnapshot::default()
        }
    }

    #[test]
    fn test_focus_without_network_is_rejected() {
        let controller = ViewController::default();
        assert_eq!(controller.change_focus(TreeNodeId(0)), Err(ViewError::NoNetwork));
        assert!(matches!(
            controller.updates().try_recv(),
            Ok(ViewUpdate::Failed { .. })
        ));
    }

    #[test]
    fn test_empty_tree_is_rejected() {
        let controller = ViewController::default();
        assert_eq!(
            controller.load_network(NetworkSnapshot::default()),
            Err(ViewError::Tree(TreeError::EmptyTree))
        );
    }

    #[test]
    fn test_failed_focus_keeps_previous_state() {
        let controller = ViewController::default();
        let (mut tree, root) = HierarchyTree::with_root(NodeSpec::group("Root"));
        let x = tree.add_child(root, NodeSpec::group("X")).unwrap();
        tree.add_child(x, NodeSpec::gene("a")).unwrap();
        controller
            .load_network(NetworkSnapshot {
                tree,
                ..NetworkSnapshot::default()
            })
            .unwrap();
        let before = controller.state();

        assert!(controller.change_focus(TreeNodeId(42)).is_err());
        assert_eq!(controller.state(), before);
    }

    #[test]
    fn test_cyclic_tree_does_not_replace_loaded_network() {
        let controller = ViewController::default();
        let (mut tree, root) = HierarchyTree::with_root(NodeSpec::group("Root"));
        tree.add_child(root, NodeSpec::gene("a")).unwrap();
        controller
            .load_network(NetworkSnapshot {
                tree,
                ..NetworkSnapshot::default()
            })
            .unwrap();
        let before = controller.state();

        // The cycle sits in a branch the root never reaches.
        assert!(matches!(
            controller.load_network(cyclic_network()),
            Err(ViewError::Tree(TreeError::Cycle { .. }))
        ));
        assert_eq!(controller.state(), before);
        assert_eq!(controller.change_focus(root), Ok(()));
    }
}
