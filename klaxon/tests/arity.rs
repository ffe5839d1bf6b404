//! Listeners taking a prefix of a signal's arguments.

use klaxon::{
    BoxError, Listener2, Retention, Signal1, Signal2, Signal3, testing::CapturingListener,
};
use std::sync::{Arc, Mutex};

mod common;
use common::Calls;

#[test]
fn test_signal3_accepts_every_prefix() {
    let calls = Calls::new();
    let signal: Signal3<u8, String, Vec<i32>> = Signal3::new();

    let c0 = calls.clone();
    let zero = signal.connect_with_priority(Arc::new(move || c0.push("0")), 3);
    let c1 = calls.clone();
    let one = signal.connect_with_priority(Arc::new(move |a: &u8| c1.push(format!("1:{a}"))), 2);
    let c2 = calls.clone();
    let two = signal.connect_with_priority(
        Arc::new(move |a: &u8, b: &String| c2.push(format!("2:{a},{b}"))),
        1,
    );
    let c3 = calls.clone();
    let three = signal.connect(Arc::new(move |a: &u8, b: &String, c: &Vec<i32>| {
        c3.push(format!("3:{a},{b},{c:?}"))
    }));

    signal.dispatch(7, "seven".to_string(), vec![1, 2]).unwrap();

    assert_eq!(
        calls.take(),
        vec!["0", "1:7", "2:7,seven", "3:7,seven,[1, 2]"]
    );
    assert_eq!(
        [zero.arity(), one.arity(), two.arity(), three.arity()],
        [0, 1, 2, 3]
    );
}

struct Concat {
    out: Mutex<Vec<String>>,
}

impl Listener2<&'static str, u32> for Concat {
    fn apply(&self, word: &&'static str, times: &u32) -> Result<Retention, BoxError> {
        self.out.lock().unwrap().push(word.repeat(*times as usize));
        Ok(Retention::Keep)
    }
}

#[test]
fn test_struct_listener_on_wider_signal() {
    let concat = Arc::new(Concat {
        out: Mutex::new(Vec::new()),
    });
    let signal: Signal3<&'static str, u32, bool> = Signal3::new();
    let conn = signal.connect(concat.clone());

    signal.dispatch("ab", 3, true).unwrap();
    signal.dispatch("x", 1, false).unwrap();

    assert_eq!(conn.arity(), 2);
    assert_eq!(*concat.out.lock().unwrap(), vec!["ababab", "x"]);

    assert!(signal.disconnect(&concat));
    assert!(signal.is_empty());
}

#[test]
fn test_capturing_listener_sees_first_argument() {
    let capture = Arc::new(CapturingListener::<String>::new());
    let signal: Signal2<String, usize> = Signal2::new();
    signal.connect(capture.clone());

    signal.dispatch("alpha".into(), 1).unwrap();
    signal.dispatch("beta".into(), 2).unwrap();

    assert_eq!(capture.captured(), vec!["alpha", "beta"]);
}

#[test]
fn test_same_listener_on_different_signals() {
    let capture = Arc::new(CapturingListener::<u32>::new());
    let narrow: Signal1<u32> = Signal1::new();
    let wide: Signal2<u32, char> = Signal2::new();

    let a = narrow.connect(capture.clone());
    let b = wide.connect(capture.clone());
    assert_ne!(a, b);

    narrow.dispatch(1).unwrap();
    wide.dispatch(2, 'z').unwrap();
    assert_eq!(capture.captured(), vec![1, 2]);

    // Registrations on different signals are independent.
    a.disconnect();
    wide.dispatch(3, 'y').unwrap();
    assert_eq!(capture.captured(), vec![1, 2, 3]);
    assert!(b.is_connected());
}

#[test]
fn test_arguments_are_borrowed_not_cloned() {
    struct NoClone(u32);

    let signal: Signal1<NoClone> = Signal1::new();
    let seen = Arc::new(Mutex::new(0));
    let sink = seen.clone();
    signal.connect(Arc::new(move |v: &NoClone| *sink.lock().unwrap() += v.0));
    signal.connect(Arc::new({
        let sink = seen.clone();
        move |v: &NoClone| *sink.lock().unwrap() += v.0 * 10
    }));

    signal.dispatch(NoClone(4)).unwrap();
    assert_eq!(*seen.lock().unwrap(), 44);
}
