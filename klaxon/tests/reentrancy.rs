//! Mutating a signal from inside its own dispatch.

use klaxon::{
    Signal0, Signal1,
    testing::{CountingListener, InvocationLog},
};
use std::sync::{
    Arc, Weak,
    atomic::{AtomicUsize, Ordering},
};

mod common;
use common::LateConnection;

#[test]
fn test_listener_disconnects_later_listener() {
    let log = InvocationLog::new();
    let signal = Signal0::new();
    let l2_conn = LateConnection::new();

    let l2_handle = l2_conn.clone();
    let l1_log = log.clone();
    signal.connect(Arc::new(move || {
        l1_log.push("L1");
        l2_handle.disconnect();
    }));
    l2_conn.set(signal.connect(log.recorder("L2")));

    signal.dispatch().unwrap();

    assert_eq!(log.entries(), vec!["L1"]);
    assert_eq!(signal.len(), 1);
    assert!(!l2_conn.get().unwrap().is_connected());
}

#[test]
fn test_self_disconnect_does_not_skip_others() {
    let log = InvocationLog::new();
    let signal = Signal0::new();
    let own = LateConnection::new();

    signal.connect(log.recorder("before"));
    let handle = own.clone();
    let self_log = log.clone();
    own.set(signal.connect(Arc::new(move || {
        self_log.push("self");
        handle.disconnect();
    })));
    signal.connect(log.recorder("after"));

    signal.dispatch().unwrap();
    signal.dispatch().unwrap();

    assert_eq!(
        log.entries(),
        vec!["before", "self", "after", "before", "after"]
    );
}

#[test]
fn test_listener_connected_during_dispatch_waits_for_next() {
    let signal = Arc::new(Signal0::new());
    let late = Arc::new(CountingListener::new());
    let spawned = Arc::new(AtomicUsize::new(0));

    let weak_signal: Weak<Signal0> = Arc::downgrade(&signal);
    let to_add = late.clone();
    let spawned_count = spawned.clone();
    signal.connect_with_priority(
        Arc::new(move || {
            if let Some(signal) = weak_signal.upgrade() {
                spawned_count.fetch_add(1, Ordering::SeqCst);
                // Higher priority than us, but we are already past that point.
                signal.connect_with_priority(to_add.clone(), 100);
            }
        }),
        0,
    );

    signal.dispatch().unwrap();
    assert_eq!(late.count(), 0);

    signal.dispatch().unwrap();
    assert_eq!(late.count(), 1);
    // Reconnecting the same listener kept a single registration.
    assert_eq!(signal.len(), 2);
    assert_eq!(spawned.load(Ordering::SeqCst), 2);
}

#[test]
fn test_nested_dispatch() {
    let signal: Arc<Signal1<u32>> = Arc::new(Signal1::new());
    let seen = Arc::new(std::sync::Mutex::new(Vec::new()));

    let weak_signal = Arc::downgrade(&signal);
    let record = seen.clone();
    signal.connect(Arc::new(move |depth: &u32| {
        record.lock().unwrap().push(*depth);
        if *depth < 3 {
            if let Some(signal) = weak_signal.upgrade() {
                signal.dispatch(depth + 1).unwrap();
            }
        }
    }));

    signal.dispatch(0).unwrap();
    assert_eq!(*seen.lock().unwrap(), vec![0, 1, 2, 3]);
}

#[test]
fn test_once_listener_not_rerun_by_nested_dispatch() {
    let signal = Arc::new(Signal0::new());
    let runs = Arc::new(AtomicUsize::new(0));

    let weak_signal = Arc::downgrade(&signal);
    let counter = runs.clone();
    let conn = signal
        .connect(Arc::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
            if let Some(signal) = weak_signal.upgrade() {
                signal.dispatch().unwrap();
            }
        }))
        .once_only();

    signal.dispatch().unwrap();
    assert_eq!(runs.load(Ordering::SeqCst), 1);
    assert!(!conn.is_connected());
    assert!(signal.is_empty());
}

#[test]
fn test_listener_marks_itself_once_during_invocation() {
    let signal = Signal0::new();
    let runs = Arc::new(AtomicUsize::new(0));
    let own = LateConnection::new();

    let handle = own.clone();
    let counter = runs.clone();
    own.set(signal.connect(Arc::new(move || {
        counter.fetch_add(1, Ordering::SeqCst);
        if let Some(conn) = handle.get() {
            let _ = conn.clone().once_only();
        }
    })));

    signal.dispatch().unwrap();
    assert!(!own.get().unwrap().is_connected());
    assert!(signal.is_empty());

    signal.dispatch().unwrap();
    assert_eq!(runs.load(Ordering::SeqCst), 1);
}

#[test]
fn test_disconnect_all_during_dispatch() {
    let log = InvocationLog::new();
    let signal = Arc::new(Signal0::new());

    let weak_signal = Arc::downgrade(&signal);
    let first_log = log.clone();
    signal.connect_with_priority(
        Arc::new(move || {
            first_log.push("first");
            if let Some(signal) = weak_signal.upgrade() {
                signal.disconnect_all();
            }
        }),
        1,
    );
    signal.connect(log.recorder("second"));

    signal.dispatch().unwrap();
    signal.dispatch().unwrap();
    assert_eq!(log.entries(), vec!["first"]);
}
