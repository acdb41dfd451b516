use std::sync::{Arc, Mutex};

use super::{Changed, Emitter};

fn recording_emitter() -> (Arc<Emitter<Changed>>, Arc<Mutex<Vec<&'static str>>>) {
    (Arc::new(Emitter::new()), Arc::new(Mutex::new(Vec::new())))
}

#[test]
fn handlers_run_in_connection_order() {
    let (emitter, log) = recording_emitter();
    let _first = emitter.connect({
        let log = log.clone();
        move |_| log.lock().unwrap().push("first")
    });
    let _second = emitter.connect({
        let log = log.clone();
        move |_| log.lock().unwrap().push("second")
    });

    emitter.emit(&Changed);
    assert_eq!(*log.lock().unwrap(), vec!["first", "second"]);
}

#[test]
fn disconnect_stops_delivery() {
    let (emitter, log) = recording_emitter();
    let sub = emitter.connect({
        let log = log.clone();
        move |_| log.lock().unwrap().push("hit")
    });

    emitter.emit(&Changed);
    sub.disconnect();
    emitter.emit(&Changed);

    assert_eq!(log.lock().unwrap().len(), 1);
    assert_eq!(emitter.handler_count(), 0);
}

#[test]
fn dropping_the_subscription_disconnects() {
    let (emitter, log) = recording_emitter();
    {
        let _sub = emitter.connect({
            let log = log.clone();
            move |_| log.lock().unwrap().push("hit")
        });
        emitter.emit(&Changed);
    }
    emitter.emit(&Changed);
    assert_eq!(log.lock().unwrap().len(), 1);
}

#[test]
fn handler_connected_during_dispatch_waits_for_next_emission() {
    let (emitter, log) = recording_emitter();
    let late_sub: Arc<Mutex<Option<super::Subscription>>> = Arc::new(Mutex::new(None));

    let _outer = emitter.connect({
        let emitter = emitter.clone();
        let log = log.clone();
        let late_sub = late_sub.clone();
        move |_| {
            log.lock().unwrap().push("outer");
            let mut slot = late_sub.lock().unwrap();
            if slot.is_none() {
                *slot = Some(emitter.connect({
                    let log = log.clone();
                    move |_| log.lock().unwrap().push("late")
                }));
            }
        }
    });

    emitter.emit(&Changed);
    assert_eq!(*log.lock().unwrap(), vec!["outer"]);

    emitter.emit(&Changed);
    assert_eq!(*log.lock().unwrap(), vec!["outer", "outer", "late"]);
}

#[test]
fn reentrant_emit_does_not_deadlock() {
    let emitter = Arc::new(Emitter::new());
    let depth = Arc::new(Mutex::new(0usize));

    let _sub = emitter.connect({
        let emitter = emitter.clone();
        let depth = depth.clone();
        move |_: &Changed| {
            let mut depth = depth.lock().unwrap();
            *depth += 1;
            if *depth == 1 {
                drop(depth);
                emitter.emit(&Changed);
            }
        }
    });

    emitter.emit(&Changed);
    assert_eq!(*depth.lock().unwrap(), 2);
}
