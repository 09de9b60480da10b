use ai_bt::{BehaviorTreeGraph, LoadContext, NodeTypeRegistry};
use ai_graph::{NodeBuilder, NodeClass, SurfaceBuilder, Value};
use criterion::{black_box, criterion_group, criterion_main, Criterion};

const TASK: NodeClass = NodeClass::new(19, 1);
const ROOT: NodeClass = NodeClass::new(19, 2);
const DECORATOR: NodeClass = NodeClass::new(19, 3);

/// Root -> `branches` sequences, each with `leaves` decorated delays.
fn wide_surface(branches: u32, leaves: u32) -> Vec<u8> {
    let mut root = NodeBuilder::new(1, ROOT).value("BehaviorTreeRootNode");
    let mut surface = SurfaceBuilder::new();
    let mut next_id = 2;

    for b in 0..branches {
        let seq_id = next_id;
        next_id += 1;
        root = root.connect(1, seq_id);

        let mut seq = NodeBuilder::new(seq_id, TASK)
            .value("BehaviorTreeSequenceNode")
            .position((branches - b) as f32, 0.0);
        for l in 0..leaves {
            let leaf_id = next_id;
            let decorator_id = next_id + 1;
            next_id += 2;
            seq = seq.connect(1, leaf_id);
            surface = surface
                .node(
                    NodeBuilder::new(leaf_id, TASK)
                        .value("BehaviorTreeDelayNode")
                        .value(Value::Blob(br#"{"WaitTime": 1.0}"#.to_vec()))
                        .value(Value::id_list([decorator_id]))
                        .position((leaves - l) as f32, 1.0),
                )
                .node(NodeBuilder::new(decorator_id, DECORATOR).value("BehaviorTreeLoopDecorator"));
        }
        surface = surface.node(seq);
    }

    surface.node(root).to_bytes().expect("surface bytes")
}

fn bench_compile(c: &mut Criterion) {
    let registry = NodeTypeRegistry::with_builtin_nodes();
    let bytes = wide_surface(16, 16);
    let mut graph = BehaviorTreeGraph::new();

    c.bench_function("ai-bt/load(branches=16,leaves=16)", |b| {
        b.iter(|| {
            graph
                .load(black_box(&bytes), &mut LoadContext::new(&registry))
                .expect("load");
            black_box(graph.nodes_states_size());
        })
    });
}

criterion_group!(benches, bench_compile);
criterion_main!(benches);
