//! Scenario tests: a client drives the mock server through login, the
//! character roster and world entry.

mod common;

use std::time::Duration;

use common::MockServer;
use mystwire::prelude::*;
use mystwire::protocol::{AuthResult, CharCreateResult};

const WAIT: Duration = Duration::from_secs(3);

async fn login(server: &MockServer) -> Connection {
    let conn = Connection::connect(&server.addr).await.expect("connect");
    let baseline = conn.version(Category::Auth);
    conn.authenticate("user", "pass").await.expect("send auth");
    assert!(conn.wait_for(Category::Auth, baseline, WAIT).await);
    conn
}

/// Sends a request and waits for the roster to change.
async fn roster_after<F, Fut>(conn: &Connection, request: F) -> Vec<String>
where
    F: FnOnce() -> Fut,
    Fut: std::future::Future<Output = Result<(), MystwireError>>,
{
    let baseline = conn.version(Category::Characters);
    request().await.expect("send");
    assert!(conn.wait_for(Category::Characters, baseline, WAIT).await);
    conn.read(|s| s.characters.iter().map(|c| c.name.clone()).collect())
        .await
}

#[tokio::test]
async fn test_character_create_and_delete() {
    let server = MockServer::start().await;
    let mut conn = login(&server).await;
    assert_eq!(
        conn.read(|s| s.auth_result).await,
        Some(AuthResult::Validated)
    );

    let names = roster_after(&conn, || conn.request_character_list()).await;
    assert!(names.is_empty());

    // Create answers with a result and then a fresh roster.
    let baseline = conn.version(Category::Characters);
    conn.create_character("Testchar", 1, 0, 0).await.unwrap();
    assert!(
        conn.wait_until(|s| s.characters.len() == 1, WAIT).await,
        "roster never showed the new character"
    );
    assert!(conn.version(Category::Characters) >= baseline + 2);
    let state = conn.snapshot().await;
    assert_eq!(state.last_create_result, Some(CharCreateResult::Success));
    let guid = state.character_named("Testchar").expect("created").guid;

    let names = roster_after(&conn, || conn.delete_character(guid)).await;
    assert!(names.is_empty());

    conn.close().await.unwrap();
}

#[tokio::test]
async fn test_wrong_password_is_rejected() {
    let server = MockServer::start().await;
    let conn = Connection::connect(&server.addr).await.unwrap();
    let baseline = conn.version(Category::Auth);
    conn.authenticate("user", "nope").await.unwrap();
    assert!(conn.wait_for(Category::Auth, baseline, WAIT).await);

    let state = conn.snapshot().await;
    assert!(!state.authenticated);
    assert_eq!(state.auth_result, Some(AuthResult::BadPassword));
}

#[tokio::test]
async fn test_enter_world_populates_self() {
    let server = MockServer::start().await;
    let conn = login(&server).await;
    roster_after(&conn, || conn.create_character("Walker", 1, 0, 0)).await;
    let guid = conn
        .read(|s| s.character_named("Walker").map(|c| c.guid))
        .await
        .expect("created");

    conn.enter_world(guid).await.unwrap();
    assert!(conn.wait_until(|s| s.me.is_some() && !s.inventory.is_empty(), WAIT).await);

    let state = conn.snapshot().await;
    assert!(state.in_world);
    assert_eq!(state.my_guid, Some(guid));
    assert!(state.players.is_empty());
    assert_eq!(state.gold, 50);
}

#[tokio::test]
async fn test_inventory_versions_are_per_connection() {
    let server = MockServer::start().await;
    let a = login(&server).await;
    let b = login(&server).await;

    for (conn, name) in [(&a, "Alpha"), (&b, "Bravo")] {
        roster_after(conn, || conn.create_character(name, 1, 0, 0)).await;
        let guid = conn.read(|s| s.characters[0].guid).await;
        conn.enter_world(guid).await.unwrap();
        assert!(conn.wait_until(|s| !s.inventory.is_empty(), WAIT).await);
    }

    let a_before = a.version(Category::Inventory);
    let b_before = b.version(Category::Inventory);
    let bank_before = a.version(Category::Bank);

    a.send_packet(&client::MoveInventoryToBank {
        from: 0,
        to: 0,
        auto_slot: true,
    })
    .await
    .unwrap();

    assert!(a.wait_for(Category::Inventory, a_before, WAIT).await);
    assert!(a.wait_for(Category::Bank, bank_before, WAIT).await);
    assert!(
        !b.wait_for(Category::Inventory, b_before, Duration::from_millis(300))
            .await
    );
    assert!(a.read(|s| s.inventory.is_empty() && s.bank.len() == 1).await);
    assert_eq!(b.read(|s| s.inventory.len()).await, 1);
}
