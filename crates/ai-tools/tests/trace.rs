use std::cell::RefCell;
use std::rc::Rc;

use ai_tools::{NullTraceSink, TraceEvent, TraceLog, TraceSink, VecTraceSink};

#[derive(Clone, Default)]
struct RcSink(Rc<RefCell<Vec<TraceEvent>>>);

impl TraceSink for RcSink {
    fn emit(&mut self, event: TraceEvent) {
        self.0.borrow_mut().push(event);
    }
}

fn emit_compile_events(sink: &mut dyn TraceSink) {
    sink.emit(TraceEvent::new(1, "bt.compile.node").with_a(10).with_b(0));
    sink.emit(TraceEvent::new(1, "bt.compile.skip").with_a(10).with_b(99));
    sink.emit(TraceEvent::new(1, "bt.compile.node").with_a(11).with_b(1));
}

#[test]
fn vec_sink_records_events_in_order() {
    let mut sink = VecTraceSink::default();
    emit_compile_events(&mut sink);

    assert_eq!(sink.events.len(), 3);
    assert_eq!(sink.events[0].tick, 1);
    assert_eq!(sink.events[0].tag, "bt.compile.node");
    assert_eq!(sink.events[1].a, 10);
    assert_eq!(sink.events[1].b, 99);

    let nodes: Vec<u64> = sink.with_tag("bt.compile.node").map(|e| e.a).collect();
    assert_eq!(nodes, vec![10, 11]);
}

#[test]
fn trace_log_is_a_sink() {
    let mut log = TraceLog::default();
    emit_compile_events(&mut log);
    assert_eq!(log.events.len(), 3);
    assert_eq!(log.events[2].tag, "bt.compile.node");
}

#[test]
fn boxed_and_borrowed_sinks_forward() {
    let handle = RcSink::default();
    let shared = handle.0.clone();

    let mut boxed: Box<dyn TraceSink> = Box::new(handle);
    emit_compile_events(&mut boxed);

    let borrowed = &mut boxed;
    borrowed.emit(TraceEvent::new(2, "bt.load.no_root"));

    let events = shared.borrow();
    assert_eq!(events.len(), 4);
    assert_eq!(events[3].tick, 2);
    assert_eq!(events[3].tag, "bt.load.no_root");
}

#[test]
fn null_sink_discards() {
    let mut sink = NullTraceSink;
    emit_compile_events(&mut sink);
}
