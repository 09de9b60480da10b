use ai_bt::{BehaviorTreeGraph, LoadContext, NodeKind, NodeTypeRegistry};
use ai_graph::{NodeBuilder, NodeClass, NodeId, SurfaceBuilder};

const TASK: NodeClass = NodeClass::new(19, 1);
const ROOT: NodeClass = NodeClass::new(19, 2);

fn node(id: u32, type_name: &str) -> NodeBuilder {
    NodeBuilder::new(id, TASK).value(type_name)
}

fn root(id: u32) -> NodeBuilder {
    NodeBuilder::new(id, ROOT).value("BehaviorTreeRootNode")
}

fn load(surface: SurfaceBuilder) -> BehaviorTreeGraph {
    let registry = NodeTypeRegistry::with_builtin_nodes();
    let mut graph = BehaviorTreeGraph::new();
    graph
        .load(&surface.to_bytes().unwrap(), &mut LoadContext::new(&registry))
        .expect("load");
    graph
}

fn child_ids(graph: &BehaviorTreeGraph, id: u32) -> Vec<u32> {
    graph
        .instance_by_id(NodeId(id))
        .unwrap()
        .children()
        .iter()
        .map(|&h| graph.node_id(h).unwrap().get())
        .collect()
}

fn index_and_offset(graph: &BehaviorTreeGraph, id: u32) -> (usize, usize) {
    let instance = graph.instance_by_id(NodeId(id)).unwrap();
    (
        instance.execution_index().unwrap(),
        instance.memory_offset().unwrap(),
    )
}

#[test]
fn preorder_indices_and_packed_offsets() {
    let graph = load(
        SurfaceBuilder::new()
            .node(root(1).connect(1, 3).connect(1, 2))
            .node(
                node(2, "BehaviorTreeSequenceNode")
                    .position(0.0, 50.0)
                    .connect(1, 4)
                    .connect(1, 5),
            )
            .node(
                node(3, "BehaviorTreeSelectorNode")
                    .position(100.0, 50.0)
                    .connect(1, 6),
            )
            .node(node(4, "BehaviorTreeDelayNode").position(10.0, 90.0))
            .node(node(5, "BehaviorTreeSubTreeNode").position(20.0, 90.0))
            .node(node(6, "BehaviorTreeDelayNode").position(100.0, 90.0)),
    );

    assert_eq!(graph.nodes_count(), 6);
    // root 4, sequence 4, delay 4, subtree 8, selector 4, delay 4
    assert_eq!(graph.nodes_states_size(), 28);

    assert_eq!(index_and_offset(&graph, 1), (0, 0));
    assert_eq!(index_and_offset(&graph, 2), (1, 4));
    assert_eq!(index_and_offset(&graph, 4), (2, 8));
    assert_eq!(index_and_offset(&graph, 5), (3, 12));
    assert_eq!(index_and_offset(&graph, 3), (4, 20));
    assert_eq!(index_and_offset(&graph, 6), (5, 24));

    assert_eq!(graph.layout().execution_order(), vec![1, 2, 4, 5, 3, 6]);
}

#[test]
fn root_is_recorded_and_first_in_order() {
    let graph = load(
        SurfaceBuilder::new()
            .node(node(5, "BehaviorTreeDelayNode"))
            .node(root(9).connect(1, 5)),
    );

    let root = graph.root().expect("root");
    assert_eq!(root.kind(), NodeKind::Root);
    assert_eq!(root.execution_index(), Some(0));
    assert_eq!(root.parent(), None);
    assert_eq!(graph.root_handle(), graph.handle_of(NodeId(9)));
}

#[test]
fn children_follow_surface_x_not_connection_order() {
    let graph = load(
        SurfaceBuilder::new()
            .node(root(1).connect(1, 10).connect(1, 11).connect(1, 12))
            .node(node(10, "BehaviorTreeDelayNode").position(5.0, 0.0))
            .node(node(11, "BehaviorTreeDelayNode").position(1.0, 0.0))
            .node(node(12, "BehaviorTreeDelayNode").position(3.0, 0.0)),
    );

    assert_eq!(child_ids(&graph, 1), vec![11, 12, 10]);
    assert_eq!(graph.layout().execution_order(), vec![1, 11, 12, 10]);
}

#[test]
fn missing_position_falls_back_to_node_id() {
    let graph = load(
        SurfaceBuilder::new()
            .node(root(1).connect(1, 30).connect(1, 20).connect(1, 25))
            .node(node(30, "BehaviorTreeDelayNode"))
            .node(node(20, "BehaviorTreeDelayNode"))
            .node(node(25, "BehaviorTreeDelayNode")),
    );

    assert_eq!(child_ids(&graph, 1), vec![20, 25, 30]);
}

#[test]
fn equal_positions_order_by_node_id() {
    let graph = load(
        SurfaceBuilder::new()
            .node(root(1).connect(1, 9).connect(1, 8))
            .node(node(9, "BehaviorTreeDelayNode").position(7.0, 0.0))
            .node(node(8, "BehaviorTreeDelayNode").position(7.0, 40.0)),
    );

    assert_eq!(child_ids(&graph, 1), vec![8, 9]);
}

#[test]
fn load_without_meta_orders_children_by_id() {
    let bytes = SurfaceBuilder::new()
        .node(root(1).connect(1, 10).connect(1, 11))
        .node(node(10, "BehaviorTreeDelayNode").position(50.0, 0.0))
        .node(node(11, "BehaviorTreeDelayNode").position(-50.0, 0.0))
        .to_bytes()
        .unwrap();

    let registry = NodeTypeRegistry::with_builtin_nodes();
    let config = ai_bt::CompilerConfig {
        load_meta: false,
        ..Default::default()
    };
    let mut graph = BehaviorTreeGraph::new();
    graph
        .load(&bytes, &mut LoadContext::new(&registry).with_config(config))
        .unwrap();

    assert_eq!(child_ids(&graph, 1), vec![10, 11]);
}

#[test]
fn unresolved_and_dangling_children_are_dropped() {
    let graph = load(
        SurfaceBuilder::new()
            .node(
                root(1)
                    .connect(1, 2)
                    .connect(1, 3)
                    .connect(1, 4)
                    .connect(1, 99),
            )
            .node(node(2, "Game.AI.UnknownTask").position(0.0, 0.0))
            .node(node(3, "BehaviorTreeDelayNode").position(1.0, 0.0))
            .node(NodeBuilder::new(4, NodeClass::new(7, 1)).value("BehaviorTreeDelayNode")),
    );

    assert_eq!(graph.nodes_count(), 2);
    assert_eq!(graph.nodes_states_size(), 8);
    assert_eq!(child_ids(&graph, 1), vec![3]);
    assert!(graph.instance_by_id(NodeId(2)).is_none());
    assert!(graph.instance_by_id(NodeId(4)).is_none());
}

#[test]
fn subtree_of_unresolved_node_is_not_compiled() {
    let graph = load(
        SurfaceBuilder::new()
            .node(root(1).connect(1, 2))
            .node(node(2, "Missing").connect(1, 3))
            .node(node(3, "BehaviorTreeDelayNode")),
    );

    assert_eq!(graph.nodes_count(), 1);
    let orphan = graph.instance_by_id(NodeId(3)).unwrap();
    assert!(!orphan.is_compiled());
    assert_eq!(orphan.execution_index(), None);
    assert_eq!(orphan.memory_offset(), None);
    assert_eq!(orphan.parent(), None);
}

#[test]
fn task_connections_are_not_children() {
    let graph = load(
        SurfaceBuilder::new()
            .node(root(1).connect(1, 2))
            .node(node(2, "BehaviorTreeDelayNode").connect(1, 3))
            .node(node(3, "BehaviorTreeDelayNode")),
    );

    assert_eq!(graph.nodes_count(), 2);
    assert!(graph.instance_by_id(NodeId(2)).unwrap().children().is_empty());
}

#[test]
fn parents_point_back_up_the_tree() {
    let graph = load(
        SurfaceBuilder::new()
            .node(root(1).connect(1, 2))
            .node(node(2, "BehaviorTreeSelectorNode").connect(1, 3))
            .node(node(3, "BehaviorTreeDelayNode")),
    );

    let parent_of = |id: u32| {
        graph
            .instance_by_id(NodeId(id))
            .and_then(|i| i.parent())
            .and_then(|h| graph.node_id(h))
    };
    assert_eq!(parent_of(1), None);
    assert_eq!(parent_of(2), Some(NodeId(1)));
    assert_eq!(parent_of(3), Some(NodeId(2)));
}

#[test]
fn children_on_other_boxes_are_ignored() {
    let graph = load(
        SurfaceBuilder::new()
            .node(root(1).connect(0, 2).connect(1, 3))
            .node(node(2, "BehaviorTreeDelayNode"))
            .node(node(3, "BehaviorTreeDelayNode")),
    );

    assert_eq!(child_ids(&graph, 1), vec![3]);
    assert_eq!(graph.nodes_count(), 2);
}
