use ai_bt::nodes::{BehaviorTreeDelayNode, BehaviorTreeRootNode};
use ai_bt::{BehaviorTreeGraph, LoadContext, NodeTypeRegistry};
use ai_graph::NodeId;

const PATROL: &[u8] = include_bytes!("../../../demos/patrol.surface.json");

fn patrol() -> BehaviorTreeGraph {
    let registry = NodeTypeRegistry::with_builtin_nodes();
    let mut graph = BehaviorTreeGraph::new();
    graph.load(PATROL, &mut LoadContext::new(&registry)).unwrap();
    graph
}

#[test]
fn patrol_surface_compiles() {
    let graph = patrol();
    let layout = graph.layout();

    assert_eq!(layout.execution_order(), vec![1, 2, 3, 7, 5, 6, 4]);
    assert_eq!(graph.nodes_count(), 7);
    assert_eq!(graph.nodes_states_size(), 32);
    assert_eq!(layout.node(7).unwrap().memory_offset, 12);
    assert_eq!(layout.node(4).unwrap().memory_offset, 24);
    assert_eq!(layout.node(3).unwrap().decorators, vec![7]);
    assert_eq!(layout.node(3).unwrap().children, vec![5, 6]);
}

#[test]
fn patrol_parameters_are_hydrated() {
    let graph = patrol();

    let root = graph.root().unwrap().downcast_ref::<BehaviorTreeRootNode>().unwrap();
    assert_eq!(root.update_fps, 20.0);
    assert!(root.scaled_time);

    let delay = graph
        .instance_by_id(NodeId(5))
        .and_then(|i| i.downcast_ref::<BehaviorTreeDelayNode>())
        .unwrap();
    assert_eq!(delay.wait_time, 1.5);
    assert_eq!(delay.random_deviation, 0.25);
}

#[test]
fn patrol_references_its_subtree_asset() {
    let graph = patrol();
    assert_eq!(
        graph.asset_references(),
        vec!["7f1c2a9e44b04d6e9a3c0e5b8d21f6aa".to_string()]
    );
}
