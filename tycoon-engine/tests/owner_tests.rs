mod common;

use common::Fixture;
use serde_json::json;
use std::cell::Cell;
use std::rc::Rc;
use tycoon_engine::{ActorId, ItemId};

#[test]
fn profile_forwards_changes_while_claimed() {
    let fx = Fixture::new();
    fx.add(fx.root, "Chest", &["chest"]);
    let tycoon = fx.build();
    let actor = ActorId::new();

    let profile = tycoon.claim(actor, None).unwrap();
    assert_eq!(profile.actor(), actor);
    assert!(profile.is_active());

    let hits = Rc::new(Cell::new(0));
    let h = Rc::clone(&hits);
    let _conn = profile.data_changed().connect(move |_| h.set(h.get() + 1));

    let item = tycoon.item("Chest").unwrap();
    item.mutate_data(json!({"gold": 1, "open": false})).unwrap();
    item.lock();

    assert_eq!(hits.get(), 2);
}

#[test]
fn reclaim_does_not_leak_previous_subscription() {
    let fx = Fixture::new();
    fx.add(fx.root, "Chest", &["chest"]);
    let tycoon = fx.build();
    let baseline = tycoon.data_changed().listener_count();

    let first = tycoon.claim(ActorId::new(), None).unwrap();
    let stale_hits = Rc::new(Cell::new(0));
    let s = Rc::clone(&stale_hits);
    let _stale = first.data_changed().connect(move |_| s.set(s.get() + 1));

    tycoon.unclaim().unwrap();
    assert!(!first.is_active());
    assert_eq!(tycoon.data_changed().listener_count(), baseline);

    let second = tycoon.claim(ActorId::new(), None).unwrap();
    let fresh_hits = Rc::new(Cell::new(0));
    let f = Rc::clone(&fresh_hits);
    let _fresh = second.data_changed().connect(move |_| f.set(f.get() + 1));

    tycoon
        .item("Chest")
        .unwrap()
        .mutate_data(json!({"gold": 2, "open": true}))
        .unwrap();

    assert_eq!(stale_hits.get(), 0);
    assert_eq!(fresh_hits.get(), 1);
    assert_eq!(tycoon.data_changed().listener_count(), baseline + 1);
}

#[test]
fn owner_accessor_tracks_claim() {
    let fx = Fixture::new();
    let tycoon = fx.build();
    assert!(tycoon.owner().is_none());

    let actor = ActorId::new();
    tycoon.claim(actor, None).unwrap();
    assert_eq!(tycoon.owner().map(|o| o.actor()), Some(actor));

    tycoon.unclaim().unwrap();
    assert!(tycoon.owner().is_none());
    assert!(!tycoon.verify_owner(actor));
}

#[test]
fn claimed_reports_the_new_owner_once() {
    let fx = Fixture::new();
    fx.add(fx.root, "Chest", &["chest"]);
    let tycoon = fx.build();
    let actor = ActorId::new();
    let seen = Rc::new(Cell::new(None));

    let s = Rc::clone(&seen);
    let _conn = tycoon.claimed().connect(move |claimant| {
        assert!(s.replace(Some(*claimant)).is_none());
    });
    tycoon.claim(actor, None).unwrap();

    assert_eq!(seen.get(), Some(actor));
    assert!(tycoon.data().contains(&ItemId::new("Chest")));
}
