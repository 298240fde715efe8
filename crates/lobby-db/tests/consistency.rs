//! Room/user consistency checks against an in-memory store.

use std::collections::HashSet;
use std::sync::Arc;
use std::thread;

use lobby_db::association;
use lobby_db::{Database, Entity, ErrorKind, StoreError};
use lobby_types::models::{RoomId, UserId};

fn db() -> Database {
    Database::open_in_memory().unwrap()
}

fn room_count(db: &Database) -> usize {
    db.list_rooms().unwrap().len()
}

#[test]
fn create_room_makes_user_sole_member() {
    let db = db();
    let alice = db.create_user(Some("alice"), None).unwrap();

    let room = db.create_room(alice).unwrap();

    let view = db.get_room(room).unwrap();
    assert_eq!(view.room.id, room);
    assert_eq!(view.users.len(), 1);
    assert_eq!(view.users[0].id, alice);
    assert_eq!(view.users[0].name, "alice");
    assert_eq!(db.get_user(alice).unwrap().room_id, Some(room));
}

#[test]
fn create_room_with_unknown_user_creates_nothing() {
    let db = db();

    let err = db.create_room(404).unwrap_err();

    assert!(matches!(err, StoreError::NotFound(Entity::User)));
    assert_eq!(err.reason(), "user not found");
    assert_eq!(room_count(&db), 0);
}

#[test]
fn create_room_moves_user_out_of_previous_room() {
    let db = db();
    let alice = db.create_user(Some("alice"), None).unwrap();
    let first = db.create_room(alice).unwrap();

    let second = db.create_room(alice).unwrap();

    assert!(db.get_room(first).unwrap().users.is_empty());
    assert_eq!(db.get_room(second).unwrap().users[0].id, alice);
    assert_eq!(db.get_user(alice).unwrap().room_id, Some(second));
}

#[test]
fn delete_room_detaches_every_member() {
    let db = db();
    let alice = db.create_user(Some("alice"), None).unwrap();
    let room = db.create_room(alice).unwrap();
    let bob = db.create_user(Some("bob"), Some(room)).unwrap();
    let carol = db.create_user(Some("carol"), None).unwrap();
    let other = db.create_room(carol).unwrap();

    db.delete_room(room).unwrap();

    let users = db.list_users().unwrap();
    assert!(users.iter().all(|u| u.room_id != Some(room)));
    assert_eq!(db.get_user(alice).unwrap().room_id, None);
    assert_eq!(db.get_user(bob).unwrap().room_id, None);
    assert_eq!(db.get_user(carol).unwrap().room_id, Some(other));

    let err = db.get_room(room).unwrap_err();
    assert!(matches!(err, StoreError::NotFound(Entity::Room)));
}

#[test]
fn delete_missing_room_is_not_found() {
    let db = db();
    let err = db.delete_room(1).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert_eq!(err.reason(), "room not found");
}

#[test]
fn delete_room_removes_its_game() {
    let db = db();
    let alice = db.create_user(Some("alice"), None).unwrap();
    let room = db.create_room(alice).unwrap();
    let game = db.create_game(room).unwrap();
    assert_eq!(db.get_game_for_room(room).unwrap().map(|g| g.id), Some(game));

    db.delete_room(room).unwrap();

    assert!(db.get_game_for_room(room).unwrap().is_none());
}

#[test]
fn room_owns_at_most_one_game() {
    let db = db();
    let alice = db.create_user(Some("alice"), None).unwrap();
    let room = db.create_room(alice).unwrap();
    db.create_game(room).unwrap();

    let err = db.create_game(room).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
    assert_eq!(err.reason(), "room already has a game");

    let err = db.create_game(room + 1).unwrap_err();
    assert!(matches!(err, StoreError::NotFound(Entity::Room)));
}

#[test]
fn deleted_user_leaves_room_view() {
    let db = db();
    let alice = db.create_user(Some("alice"), None).unwrap();
    let room = db.create_room(alice).unwrap();
    let bob = db.create_user(Some("bob"), Some(room)).unwrap();

    db.delete_user(alice).unwrap();

    let view = db.get_room(room).unwrap();
    let ids: Vec<_> = view.users.iter().map(|u| u.id).collect();
    assert_eq!(ids, vec![bob]);
}

#[test]
fn delete_missing_user_is_not_found() {
    let db = db();
    let err = db.delete_user(9).unwrap_err();
    assert!(matches!(err, StoreError::NotFound(Entity::User)));
}

#[test]
fn empty_name_persists_nothing() {
    let db = db();

    for name in [None, Some("")] {
        let err = db.create_user(name, None).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert_eq!(err.reason(), "name is required");
    }

    assert!(db.list_users().unwrap().is_empty());
}

#[test]
fn whitespace_name_is_accepted() {
    let db = db();
    let user = db.create_user(Some("  "), None).unwrap();
    assert_eq!(db.get_user(user).unwrap().name, "  ");
}

#[test]
fn new_room_does_not_adopt_users_created_with_its_id() {
    let db = db();
    let early = db.create_user(Some("early"), Some(1)).unwrap();
    let alice = db.create_user(Some("alice"), None).unwrap();

    let room = db.create_room(alice).unwrap();
    assert_eq!(room, 1);

    let members: Vec<_> = db.get_room(room).unwrap().users.iter().map(|u| u.id).collect();
    assert_eq!(members, vec![alice]);
    assert_eq!(db.get_user(early).unwrap().room_id, None);
}

#[test]
fn create_user_stores_unknown_room_id_as_is() {
    let db = db();

    let ghost = db.create_user(Some("ghost"), Some(77)).unwrap();

    assert_eq!(db.get_user(ghost).unwrap().room_id, Some(77));
    assert!(db.list_rooms().unwrap().is_empty());
}

#[test]
fn list_rooms_groups_members_in_id_order() {
    let db = db();
    let alice = db.create_user(Some("alice"), None).unwrap();
    let bob = db.create_user(Some("bob"), None).unwrap();
    let first = db.create_room(alice).unwrap();
    let second = db.create_room(bob).unwrap();
    let carol = db.create_user(Some("carol"), Some(first)).unwrap();

    let rooms = db.list_rooms().unwrap();

    assert_eq!(rooms.len(), 2);
    assert_eq!(rooms[0].room.id, first);
    let first_members: Vec<_> = rooms[0].users.iter().map(|u| u.id).collect();
    assert_eq!(first_members, vec![alice, carol]);
    assert_eq!(rooms[1].room.id, second);
    assert_eq!(rooms[1].users.len(), 1);
    assert_eq!(rooms[1].users[0].id, bob);
}

#[test]
fn unassign_twice_matches_once() {
    let db = db();
    let alice = db.create_user(Some("alice"), None).unwrap();

    db.with_transaction(|tx| association::unassign_user(tx, alice)).unwrap();
    let once = db.get_user(alice).unwrap();
    db.with_transaction(|tx| association::unassign_user(tx, alice)).unwrap();
    let twice = db.get_user(alice).unwrap();

    assert_eq!(once, twice);
}

#[test]
fn failed_transaction_rolls_back() {
    let db = db();
    let alice = db.create_user(Some("alice"), None).unwrap();

    let result: lobby_db::Result<()> = db.with_transaction(|tx| {
        tx.execute("INSERT INTO rooms DEFAULT VALUES", [])?;
        association::assign_user(tx, alice, Some(tx.last_insert_rowid()))?;
        Err(StoreError::Validation("abort"))
    });

    assert!(result.is_err());
    assert_eq!(room_count(&db), 0);
    assert_eq!(db.get_user(alice).unwrap().room_id, None);
}

#[test]
fn worked_example() {
    let db = db();
    let alice = db.create_user(Some("alice"), None).unwrap();

    let room = db.create_room(alice).unwrap();
    assert_eq!(room, 1);

    let view = db.get_room(1).unwrap();
    assert_eq!(view.users.len(), 1);
    assert_eq!(view.users[0].id, alice);
    assert_eq!(view.users[0].name, "alice");
    assert_eq!(view.users[0].room_id, Some(1));

    db.delete_room(1).unwrap();

    let user = db.get_user(alice).unwrap();
    assert_eq!(user.name, "alice");
    assert_eq!(user.room_id, None);
}

#[test]
fn room_ids_are_not_reused() {
    let db = db();
    let alice = db.create_user(Some("alice"), None).unwrap();
    let first = db.create_room(alice).unwrap();
    db.delete_room(first).unwrap();

    let second = db.create_room(alice).unwrap();
    assert!(second > first);
}

#[test]
fn concurrent_room_churn_leaves_no_dangling_members() {
    let db = Arc::new(db());
    let members: Vec<UserId> = (0..4)
        .map(|i| db.create_user(Some(format!("member-{}", i).as_str()), None).unwrap())
        .collect();

    let mut handles = Vec::new();

    for (i, &user) in members.iter().enumerate() {
        let db = Arc::clone(&db);
        handles.push(thread::spawn(move || {
            for round in 0..50 {
                let room = db.create_room(user).unwrap();
                if (round + i) % 2 == 0 {
                    // The sweeper thread may have removed it first
                    match db.delete_room(room) {
                        Ok(()) | Err(StoreError::NotFound(Entity::Room)) => {}
                        Err(e) => panic!("delete_room failed: {}", e),
                    }
                }
            }
        }));
    }

    {
        let db = Arc::clone(&db);
        handles.push(thread::spawn(move || {
            for room in 1..=200 {
                let _ = db.delete_room(room);
            }
        }));
    }

    for t in 0..2 {
        let db = Arc::clone(&db);
        handles.push(thread::spawn(move || {
            for room in 1..=100 {
                let name = format!("guest-{}-{}", t, room);
                db.create_user(Some(name.as_str()), Some(room)).unwrap();
            }
        }));
    }

    for handle in handles {
        handle.join().unwrap();
    }

    let rooms = db.list_rooms().unwrap();
    let live: HashSet<RoomId> = rooms.iter().map(|r| r.room.id).collect();

    // Room views agree with the users they list, and nobody is listed twice
    let mut listed = HashSet::new();
    for room in &rooms {
        for user in &room.users {
            assert_eq!(user.room_id, Some(room.room.id));
            assert!(listed.insert(user.id), "user {} listed twice", user.id);
        }
    }

    // Members only ever reach rooms through create_room, so a deleted room
    // must have detached them.
    for &user in &members {
        if let Some(room_id) = db.get_user(user).unwrap().room_id {
            assert!(live.contains(&room_id), "user {} points at deleted room {}", user, room_id);
        }
    }

    for user in db.list_users().unwrap() {
        if let Some(room_id) = user.room_id {
            if live.contains(&room_id) {
                assert!(listed.contains(&user.id));
            }
        }
    }
}
