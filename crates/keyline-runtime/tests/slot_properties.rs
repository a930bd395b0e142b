#![forbid(unsafe_code)]

//! Property-based tests for the broker's slot table and dispatch.
//!
//! Invariants checked against a plain array model:
//! 1. After any sequence of `on`/`off` calls, each slot holds the last
//!    registration for its kind (or nothing after `off`).
//! 2. While active, posting a kind invokes exactly the model's callback for
//!    that kind, exactly once.
//! 3. After `deactivate()`, no post invokes anything.
//! 4. `clear()` empties every slot without releasing subscriptions.

use std::cell::RefCell;
use std::rc::Rc;

use keyline_core::EventKind;
use keyline_runtime::{KeyboardEventBroker, NotificationCenter};
use proptest::prelude::*;

#[derive(Debug, Clone, Copy)]
enum Op {
    On(usize, u32),
    Off(usize),
    Clear,
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => (0usize..EventKind::COUNT, any::<u32>()).prop_map(|(slot, tag)| Op::On(slot, tag)),
        2 => (0usize..EventKind::COUNT).prop_map(Op::Off),
        1 => Just(Op::Clear),
    ]
}

fn kind(slot: usize) -> EventKind {
    EventKind::ALL[slot]
}

type Model = [Option<u32>; EventKind::COUNT];

/// Apply `ops` to both the broker and `model`, which carries over between calls.
fn apply(broker: &KeyboardEventBroker, log: &Rc<RefCell<Vec<u32>>>, ops: &[Op], model: &mut Model) {
    for op in ops {
        match *op {
            Op::On(slot, tag) => {
                let log = Rc::clone(log);
                broker.on(kind(slot), move |_| log.borrow_mut().push(tag));
                model[slot] = Some(tag);
            }
            Op::Off(slot) => {
                broker.off(kind(slot));
                model[slot] = None;
            }
            Op::Clear => {
                broker.clear();
                *model = [None; EventKind::COUNT];
            }
        }
    }
}

proptest! {
    #[test]
    fn slots_follow_last_registration(ops in proptest::collection::vec(op_strategy(), 0..40)) {
        let center = NotificationCenter::new();
        let broker = KeyboardEventBroker::with_center(center.clone());
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut model = [None; EventKind::COUNT];
        apply(&broker, &log, &ops, &mut model);

        for slot in 0..EventKind::COUNT {
            prop_assert_eq!(broker.has_callback(kind(slot)), model[slot].is_some());
        }

        broker.activate();
        for slot in 0..EventKind::COUNT {
            log.borrow_mut().clear();
            center.post(&kind(slot).notification(None, None));
            let expected: Vec<u32> = model[slot].into_iter().collect();
            prop_assert_eq!(&*log.borrow(), &expected);
        }

        broker.deactivate();
        log.borrow_mut().clear();
        for k in EventKind::ALL {
            center.post(&k.notification(None, None));
        }
        prop_assert!(log.borrow().is_empty());
        prop_assert_eq!(center.observer_count(), 0);
    }

    #[test]
    fn subscriptions_survive_slot_changes(
        before in proptest::collection::vec(op_strategy(), 0..20),
        after in proptest::collection::vec(op_strategy(), 0..20),
    ) {
        let center = NotificationCenter::new();
        let broker = KeyboardEventBroker::with_center(center.clone());
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut model = [None; EventKind::COUNT];
        apply(&broker, &log, &before, &mut model);
        let subscribed_slots = model.map(|tag| tag.is_some());
        broker.activate();
        let subscribed = broker.subscribed_events();

        apply(&broker, &log, &after, &mut model);
        prop_assert_eq!(broker.subscribed_events(), subscribed.clone());

        for slot in 0..EventKind::COUNT {
            log.borrow_mut().clear();
            center.post(&kind(slot).notification(None, None));
            let expected: Vec<u32> = if subscribed_slots[slot] {
                model[slot].into_iter().collect()
            } else {
                Vec::new()
            };
            prop_assert_eq!(&*log.borrow(), &expected);
        }
    }
}

#[test]
fn registration_from_earlier_batch_survives_empty_batch() {
    let center = NotificationCenter::new();
    let broker = KeyboardEventBroker::with_center(center.clone());
    let log = Rc::new(RefCell::new(Vec::new()));
    let mut model = [None; EventKind::COUNT];
    apply(&broker, &log, &[Op::On(2, 0)], &mut model);
    broker.activate();
    apply(&broker, &log, &[], &mut model);

    center.post(&kind(2).notification(None, None));
    assert_eq!(*log.borrow(), vec![0]);
    assert_eq!(model[2], Some(0));
}
