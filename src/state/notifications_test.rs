use std::cell::RefCell;
use std::rc::Rc;

use super::*;
use crate::net::types::NotificationType;

fn note(id: u64, read: bool) -> Notification {
    Notification {
        id,
        message: format!("notification {id}"),
        kind: NotificationType::Comment,
        is_read: read,
        created_at: None,
        content_id: None,
        actor: None,
    }
}

#[test]
fn set_all_replaces_the_feed() {
    let feed = NotificationFeed::new();
    feed.receive(note(99, false));

    feed.set_all(vec![note(1, true), note(2, false)]);

    let items = feed.snapshot();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0].id, 1);
}

#[test]
fn receive_prepends_newest_first() {
    let feed = NotificationFeed::new();
    feed.receive(note(1, false));
    feed.receive(note(2, false));

    let items = feed.snapshot();
    assert_eq!(items[0].id, 2);
    assert_eq!(items[1].id, 1);
}

#[test]
fn duplicate_id_replaces_instead_of_stacking() {
    let feed = NotificationFeed::new();
    feed.receive(note(1, false));
    feed.receive(note(2, false));

    let mut updated = note(1, false);
    updated.message = "edited".to_owned();
    feed.receive(updated);

    let items = feed.snapshot();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0].id, 1);
    assert_eq!(items[0].message, "edited");
}

#[test]
fn mark_read_flips_one_entry() {
    let feed = NotificationFeed::new();
    feed.set_all(vec![note(1, false), note(2, false)]);

    feed.mark_read(2);

    assert_eq!(feed.unread_count(), 1);
    let items = feed.snapshot();
    assert!(!items[0].is_read);
    assert!(items[1].is_read);
}

#[test]
fn mark_all_read_clears_the_badge() {
    let feed = NotificationFeed::new();
    feed.set_all(vec![note(1, false), note(2, false), note(3, true)]);
    assert_eq!(feed.unread_count(), 2);

    feed.mark_all_read();
    assert_eq!(feed.unread_count(), 0);
}

#[test]
fn remove_deletes_by_id() {
    let feed = NotificationFeed::new();
    feed.set_all(vec![note(1, false), note(2, false)]);

    feed.remove(1);

    let items = feed.snapshot();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].id, 2);
}

#[test]
fn watcher_observes_every_change() {
    let feed = NotificationFeed::new();
    let sizes: Rc<RefCell<Vec<usize>>> = Rc::new(RefCell::new(Vec::new()));
    feed.set_watcher({
        let sizes = sizes.clone();
        move |items| sizes.borrow_mut().push(items.len())
    });

    feed.set_all(vec![note(1, false)]);
    feed.receive(note(2, false));
    feed.remove(1);

    assert_eq!(sizes.borrow().as_slice(), [1, 2, 1]);
}
