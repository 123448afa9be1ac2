//! Resource lifecycles against the mock cloud over real HTTP.

mod common;

use common::{requests, start};
use netdata_core::{ClauseOperator, NetdataClient, RuleAction};
use netdata_provider::resources::{
    NodeRoomMemberResource, NodeRoomMemberState, Resource, RoomMemberResource, RoomMemberState,
    RoomResource, RoomState, RuleClauseState, RuleState, SpaceMemberResource, SpaceMemberState,
    SpaceResource, SpaceState,
};
use netdata_provider::ProviderError;

fn rule(value: &str) -> RuleState {
    RuleState {
        id: String::new(),
        action: RuleAction::Include,
        description: format!("{value} nodes"),
        clauses: vec![RuleClauseState {
            label: "role".to_string(),
            operator: ClauseOperator::Equals,
            value: value.to_string(),
            negate: false,
        }],
    }
}

#[test]
fn space_lifecycle_keeps_claim_token() {
    let (client, _db) = start();
    let spaces = SpaceResource::new(client);

    let created = spaces
        .create(&SpaceState {
            name: "ops".to_string(),
            description: "production".to_string(),
            ..SpaceState::default()
        })
        .unwrap();
    assert!(!created.id.is_empty());
    assert!(!created.claim_token.is_empty());
    assert_eq!(created.description, "production");

    let plan = SpaceState {
        name: "ops-2".to_string(),
        ..created.clone()
    };
    let updated = spaces.update(&plan, &created).unwrap();
    assert_eq!(updated.name, "ops-2");
    assert_eq!(updated.claim_token, created.claim_token);

    let read = spaces.read(&updated).unwrap().unwrap();
    assert_eq!(read, updated);

    spaces.delete(&read).unwrap();
    assert_eq!(spaces.read(&read).unwrap(), None);
    assert!(spaces.delete(&read).unwrap_err().is_not_found());
}

#[test]
fn wrong_api_prefix_fails_read_instead_of_dropping_state() {
    let (client, db) = start();
    let space_id = db.blocking_write().seed_space("ops");
    let room_id = client.create_room(&space_id, "web", "").unwrap().id;
    let client = NetdataClient::new(&format!("{}/wrong-prefix", client.base_url()), "test-token");

    let state = SpaceState {
        id: space_id.clone(),
        name: "ops".to_string(),
        ..SpaceState::default()
    };
    let err = SpaceResource::new(client.clone()).read(&state).unwrap_err();
    assert!(!err.is_not_found());
    assert!(err.to_string().contains("status: 404"));

    let room = RoomState {
        id: room_id,
        space_id,
        name: "web".to_string(),
        ..RoomState::default()
    };
    assert!(RoomResource::new(client).read(&room).is_err());
}

#[test]
fn space_without_name_is_rejected_before_any_request() {
    let (client, db) = start();
    let err = SpaceResource::new(client)
        .create(&SpaceState::default())
        .unwrap_err();
    assert!(matches!(err, ProviderError::Validation(_)));
    assert!(requests(&db).is_empty());
}

#[test]
fn imported_space_is_filled_by_read() {
    let (client, db) = start();
    let space_id = db.blocking_write().seed_space("ops");
    let spaces = SpaceResource::new(client);

    let imported = spaces.import(&space_id).unwrap();
    let read = spaces.read(&imported).unwrap().unwrap();
    assert_eq!(read.id, space_id);
    assert_eq!(read.name, "ops");

    assert!(matches!(
        spaces.import(""),
        Err(ProviderError::InvalidImportId { .. })
    ));
}

#[test]
fn room_lifecycle_and_import() {
    let (client, db) = start();
    let space_id = db.blocking_write().seed_space("ops");
    let rooms = RoomResource::new(client);

    let created = rooms
        .create(&RoomState {
            space_id: space_id.clone(),
            name: "web".to_string(),
            description: "frontends".to_string(),
            ..RoomState::default()
        })
        .unwrap();
    assert_eq!(created.description, "frontends");

    let plan = RoomState {
        description: "edge".to_string(),
        ..created.clone()
    };
    let updated = rooms.update(&plan, &created).unwrap();
    assert_eq!(updated.description, "edge");

    let imported = rooms
        .import(&format!("{space_id},{}", created.id))
        .unwrap();
    assert_eq!(rooms.read(&imported).unwrap(), Some(updated.clone()));

    rooms.delete(&updated).unwrap();
    assert_eq!(rooms.read(&updated).unwrap(), None);
}

#[test]
fn room_import_needs_both_ids() {
    let (client, _db) = start();
    let err = RoomResource::new(client).import("only-one").unwrap_err();
    assert_eq!(
        err.to_string(),
        "Unexpected import identifier: expected format space_id,room_id, got \"only-one\""
    );
}

#[test]
fn space_member_role_changes_in_place() {
    let (client, db) = start();
    let space_id = db.blocking_write().seed_space("ops");
    let members = SpaceMemberResource::new(client);

    let created = members
        .create(&SpaceMemberState {
            space_id: space_id.clone(),
            email: "dev@example.com".to_string(),
            role: "member".to_string(),
            ..SpaceMemberState::default()
        })
        .unwrap();

    let plan = SpaceMemberState {
        role: "admin".to_string(),
        ..created.clone()
    };
    let updated = members.update(&plan, &created).unwrap();
    assert_eq!(updated.id, created.id);
    assert_eq!(updated.role, "admin");

    let imported = members
        .import(&format!("{space_id},{}", created.id))
        .unwrap();
    assert_eq!(members.read(&imported).unwrap(), Some(updated.clone()));

    members.delete(&updated).unwrap();
    assert_eq!(members.read(&updated).unwrap(), None);
}

#[test]
fn space_member_attributes_are_validated() {
    let (client, db) = start();
    let members = SpaceMemberResource::new(client);
    let plan = SpaceMemberState {
        space_id: "s1".to_string(),
        email: "not-an-email".to_string(),
        role: "member".to_string(),
        ..SpaceMemberState::default()
    };
    assert!(matches!(members.create(&plan), Err(ProviderError::Validation(_))));

    let plan = SpaceMemberState {
        email: "dev@example.com".to_string(),
        role: "Admin".to_string(),
        ..plan
    };
    assert!(matches!(members.create(&plan), Err(ProviderError::Validation(_))));
    assert!(requests(&db).is_empty());
}

#[test]
fn room_member_lifecycle() {
    let (client, db) = start();
    let space_id = db.blocking_write().seed_space("ops");
    let member = SpaceMemberResource::new(client.clone())
        .create(&SpaceMemberState {
            space_id: space_id.clone(),
            email: "dev@example.com".to_string(),
            role: "member".to_string(),
            ..SpaceMemberState::default()
        })
        .unwrap();
    let room = client.create_room(&space_id, "web", "").unwrap();
    let links = RoomMemberResource::new(client);

    let plan = RoomMemberState {
        space_id: space_id.clone(),
        room_id: room.id.clone(),
        space_member_id: member.id.clone(),
    };
    let created = links.create(&plan).unwrap();
    assert_eq!(created, plan);
    assert_eq!(links.update(&plan, &created).unwrap(), plan);

    let imported = links
        .import(&format!("{space_id},{},{}", room.id, member.id))
        .unwrap();
    assert_eq!(links.read(&imported).unwrap(), Some(plan.clone()));

    links.delete(&plan).unwrap();
    assert_eq!(links.read(&plan).unwrap(), None);
    assert!(links.import(&format!("{space_id},{}", room.id)).is_err());
}

#[test]
fn room_member_errors_name_the_link() {
    let (client, db) = start();
    let space_id = db.blocking_write().seed_space("ops");
    let room = client.create_room(&space_id, "web", "").unwrap();

    let err = RoomMemberResource::new(client)
        .create(&RoomMemberState {
            space_id: space_id.clone(),
            room_id: room.id.clone(),
            space_member_id: "ghost".to_string(),
        })
        .unwrap_err();
    let message = err.to_string();
    assert!(message.starts_with("Could not create room member"));
    assert!(message.contains(&format!("{space_id}/{}/ghost", room.id)));
}

#[test]
fn unreachable_node_fails_before_any_write() {
    let (client, db) = start();
    let space_id = db.blocking_write().seed_space("ops");
    db.blocking_write().seed_node(&space_id, "web-1", true);
    db.blocking_write().seed_node(&space_id, "web-2", false);
    let room = client.create_room(&space_id, "web", "").unwrap();
    db.blocking_write().clear_requests();

    let err = NodeRoomMemberResource::new(client)
        .create(&NodeRoomMemberState {
            space_id: space_id.clone(),
            room_id: room.id.clone(),
            node_names: vec!["web-1".to_string(), "web-2".to_string()],
            rules: vec![rule("web")],
        })
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        format!("Reachable node \"web-2\" not found in the space {space_id}")
    );

    let log = requests(&db);
    assert!(log.iter().all(|line| !line.contains("claimed-nodes")));
    assert!(log.iter().all(|line| !line.starts_with("POST") || line.ends_with("/nodes")));
    assert!(db.blocking_read().rules(&space_id, &room.id).is_empty());
}

#[test]
fn node_room_member_lifecycle() {
    let (client, db) = start();
    let space_id = db.blocking_write().seed_space("ops");
    let web_1 = db.blocking_write().seed_node(&space_id, "web-1", true).unwrap();
    let web_2 = db.blocking_write().seed_node(&space_id, "web-2", true).unwrap();
    let room = client.create_room(&space_id, "web", "").unwrap();
    let members = NodeRoomMemberResource::new(client);

    let plan = NodeRoomMemberState {
        space_id: space_id.clone(),
        room_id: room.id.clone(),
        node_names: vec!["web-1".to_string(), "web-2".to_string()],
        rules: vec![rule("web"), rule("api")],
    };
    let created = members.create(&plan).unwrap();
    assert_eq!(created.node_names, plan.node_names);
    assert!(created.rules.iter().all(|r| !r.id.is_empty()));
    assert_eq!(db.blocking_read().room_node_ids(&space_id, &room.id), [web_1.clone(), web_2]);
    assert_eq!(db.blocking_read().rules(&space_id, &room.id).len(), 2);

    let read = members.read(&created).unwrap().unwrap();
    assert_eq!(read, created);

    // Drop web-2 and the "api" rule, edit the "web" rule, add a "db" rule.
    let mut kept = created.rules[0].clone();
    kept.description = "frontends".to_string();
    let plan = NodeRoomMemberState {
        node_names: vec!["web-1".to_string()],
        rules: vec![kept.clone(), rule("db")],
        ..created.clone()
    };
    let updated = members.update(&plan, &created).unwrap();
    assert_eq!(updated.rules[0].id, kept.id);
    assert_eq!(updated.rules[0].description, "frontends");
    assert!(!updated.rules[1].id.is_empty());
    assert_eq!(db.blocking_read().room_node_ids(&space_id, &room.id), [web_1]);

    let remote = db.blocking_read().rules(&space_id, &room.id);
    assert_eq!(remote.len(), 2);
    assert!(remote.iter().all(|r| r.id.to_string() != created.rules[1].id));

    assert_eq!(members.read(&updated).unwrap(), Some(updated.clone()));

    members.delete(&updated).unwrap();
    assert!(db.blocking_read().room_node_ids(&space_id, &room.id).is_empty());
    assert!(db.blocking_read().rules(&space_id, &room.id).is_empty());
}

#[test]
fn read_drops_nodes_and_rules_removed_elsewhere() {
    let (client, db) = start();
    let space_id = db.blocking_write().seed_space("ops");
    let web_1 = db.blocking_write().seed_node(&space_id, "web-1", true).unwrap();
    db.blocking_write().seed_node(&space_id, "web-2", true);
    let room = client.create_room(&space_id, "web", "").unwrap();
    let members = NodeRoomMemberResource::new(client.clone());

    let created = members
        .create(&NodeRoomMemberState {
            space_id: space_id.clone(),
            room_id: room.id.clone(),
            node_names: vec!["web-1".to_string(), "web-2".to_string()],
            rules: vec![rule("web"), rule("api")],
        })
        .unwrap();

    client.remove_node_from_room(&space_id, &room.id, &web_1).unwrap();
    client
        .delete_membership_rule(&space_id, &room.id, &created.rules[0].id)
        .unwrap();

    let read = members.read(&created).unwrap().unwrap();
    assert_eq!(read.node_names, ["web-2"]);
    assert_eq!(read.rules, created.rules[1..]);
}

#[test]
fn rules_without_clauses_are_rejected() {
    let (client, db) = start();
    let mut empty = rule("web");
    empty.clauses.clear();

    let err = NodeRoomMemberResource::new(client)
        .create(&NodeRoomMemberState {
            space_id: "s1".to_string(),
            room_id: "r1".to_string(),
            node_names: Vec::new(),
            rules: vec![empty],
        })
        .unwrap_err();
    assert!(matches!(err, ProviderError::Validation(_)));
    assert!(requests(&db).is_empty());
}

#[test]
fn node_room_member_import_reads_back_empty_sets() {
    let (client, db) = start();
    let space_id = db.blocking_write().seed_space("ops");
    let room = client.create_room(&space_id, "web", "").unwrap();
    let members = NodeRoomMemberResource::new(client);

    let imported = members.import(&format!("{space_id},{}", room.id)).unwrap();
    let read = members.read(&imported).unwrap().unwrap();
    assert_eq!(read.room_id, room.id);
    assert!(read.node_names.is_empty());
    assert!(read.rules.is_empty());
}
