//! Connection lifecycle: keepalives, unknown traffic, close and failure
//! paths.

mod common;

use std::time::Duration;

use common::{MockServer, Script};
use mystwire::prelude::*;
use mystwire::protocol::{encode_frame, AuthResult, Ping};

const WAIT: Duration = Duration::from_secs(3);

async fn closed_within(conn: &Connection, limit: Duration) -> bool {
    tokio::time::timeout(limit, async {
        while !conn.is_closed() {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .is_ok()
}

#[tokio::test]
async fn test_server_ping_is_echoed_once() {
    // A server that starts pings does not answer the echo.
    let server = MockServer::with_script(Script {
        greeting: Ping {}.to_frame().unwrap(),
        silent_pings: true,
        ..Script::default()
    })
    .await;
    let conn = Connection::connect(&server.addr).await.unwrap();

    assert!(server.expect_received(Opcode::Ping).await);
    assert!(conn.wait_for(Category::Keepalive, 0, WAIT).await);
    tokio::time::sleep(Duration::from_millis(200)).await;
    assert_eq!(server.count(Opcode::Ping), 1);
    assert_eq!(conn.read(|s| s.pings.echoed).await, 1);
    assert!(!conn.is_closed());
}

#[tokio::test]
async fn test_own_ping_answer_is_not_echoed() {
    // This server echoes every ping it gets.
    let server = MockServer::start().await;
    let conn = Connection::connect(&server.addr).await.unwrap();
    let baseline = conn.version(Category::Keepalive);

    conn.ping().await.unwrap();
    assert!(conn.wait_for(Category::Keepalive, baseline, WAIT).await);
    tokio::time::sleep(Duration::from_millis(300)).await;

    assert_eq!(server.count(Opcode::Ping), 1);
    let pings = conn.read(|s| s.pings.clone()).await;
    assert_eq!(pings.outstanding, 0);
    assert_eq!(pings.answered, 1);
    assert_eq!(pings.echoed, 0);
}

#[tokio::test]
async fn test_repeated_pings_are_each_answered_once() {
    let server = MockServer::start().await;
    let conn = Connection::connect(&server.addr).await.unwrap();

    for _ in 0..3 {
        conn.ping().await.unwrap();
    }
    assert!(conn.wait_until(|s| s.pings.answered == 3, WAIT).await);
    tokio::time::sleep(Duration::from_millis(200)).await;
    assert_eq!(server.count(Opcode::Ping), 3);
}

#[tokio::test]
async fn test_send_fails_when_server_stops_reading() {
    let server = MockServer::with_script(Script {
        stall: true,
        ..Script::default()
    })
    .await;
    let conn = Connection::open(ClientConfig {
        write_timeout_ms: 200,
        ..ClientConfig::with_addr(&server.addr)
    })
    .await
    .unwrap();

    let payload = vec![0u8; 60_000];
    let err = tokio::time::timeout(Duration::from_secs(5), async {
        loop {
            if let Err(e) = conn.send(4000u16, &payload).await {
                return e;
            }
        }
    })
    .await
    .expect("send should fail instead of blocking");

    assert!(matches!(err, MystwireError::Transport(_)));
    assert!(conn.is_closed());
    assert!(matches!(conn.ping().await, Err(MystwireError::Closed)));
}

#[tokio::test]
async fn test_one_byte_reads_lose_no_frames() {
    let roster = server::CharacterList {
        characters: vec![server::CharacterEntry {
            guid: 100,
            name: "Reader".to_string(),
            class_id: 2,
            gender: 1,
            level: 9,
            portrait: 3,
        }],
    };
    let mut greeting = Vec::new();
    greeting.extend(
        server::Validate {
            result: AuthResult::Validated,
            server_time: 42,
        }
        .to_frame()
        .unwrap(),
    );
    greeting.extend(server::QueuePosition { position: 4 }.to_frame().unwrap());
    greeting.extend(roster.to_frame().unwrap());
    for code in [3, 1, 2] {
        greeting.extend(server::ChatError { code }.to_frame().unwrap());
    }
    greeting.extend(server::TradeCanceled {}.to_frame().unwrap());

    let server = MockServer::with_script(Script {
        greeting,
        ..Script::default()
    })
    .await;
    let conn = Connection::open(ClientConfig {
        read_chunk_size: 1,
        ..ClientConfig::with_addr(&server.addr)
    })
    .await
    .unwrap();

    assert!(conn.wait_for(Category::Trade, 0, WAIT).await);
    assert_eq!(conn.version(Category::Auth), 2);
    assert_eq!(conn.version(Category::Characters), 1);
    assert_eq!(conn.version(Category::Chat), 3);

    let state = conn.snapshot().await;
    assert!(state.authenticated);
    assert_eq!(state.server_time, 42);
    assert_eq!(state.queue_position, Some(4));
    assert_eq!(state.characters, roster.characters);
    assert_eq!(state.chat_errors, vec![3, 1, 2]);
    assert_eq!(state.trades_canceled, 1);

    let order: Vec<u16> = state.received.iter().map(|p| p.opcode).collect();
    assert_eq!(
        order,
        vec![
            Opcode::ServerValidate.as_u16(),
            Opcode::ServerQueuePosition.as_u16(),
            Opcode::ServerCharacterList.as_u16(),
            Opcode::ServerChatError.as_u16(),
            Opcode::ServerChatError.as_u16(),
            Opcode::ServerChatError.as_u16(),
            Opcode::ServerTradeCanceled.as_u16(),
        ]
    );
}

#[tokio::test]
async fn test_wait_for_packet_consumes_handled_frames() {
    let server = MockServer::start().await;
    let conn = Connection::connect(&server.addr).await.unwrap();
    conn.authenticate("user", "pass").await.unwrap();

    let frame = conn
        .wait_for_packet(Opcode::ServerValidate, WAIT)
        .await
        .expect("validate frame");
    let validate = server::Validate::decode(&frame.payload);
    assert_eq!(validate.result, AuthResult::Validated);
    // The handler ran too.
    assert!(conn.read(|s| s.authenticated).await);

    assert!(conn
        .wait_for_packet(Opcode::ServerValidate, Duration::from_millis(200))
        .await
        .is_none());

    conn.request_character_list().await.unwrap();
    assert!(conn.wait_for_packet(Opcode::ServerCharacterList, WAIT).await.is_some());
    conn.clear_received().await;
    assert!(conn.read(|s| s.received.is_empty()).await);
}

#[tokio::test]
async fn test_unknown_opcode_lands_in_inspection_log() {
    let mut greeting = encode_frame(4321, &[9, 8, 7]).unwrap();
    // A header-only known frame still routes normally.
    greeting.extend(encode_frame(Opcode::ServerTradeCanceled.as_u16(), &[]).unwrap());
    let server = MockServer::with_script(Script {
        greeting,
        ..Script::default()
    })
    .await;
    let conn = Connection::connect(&server.addr).await.unwrap();

    assert!(conn.wait_for(Category::Trade, 0, WAIT).await);
    assert_eq!(conn.version(Category::Unhandled), 1);

    let unhandled = conn.take_unhandled().await;
    assert_eq!(unhandled.len(), 1);
    assert_eq!(unhandled[0].opcode, 4321);
    assert_eq!(unhandled[0].payload, vec![9, 8, 7]);
    assert!(conn.read(|s| s.unhandled.is_empty()).await);
}

#[tokio::test]
async fn test_framing_violation_closes_connection() {
    // Declared length 2 is shorter than the header itself.
    let server = MockServer::with_script(Script {
        greeting: vec![2, 0, 0, 0],
        ..Script::default()
    })
    .await;
    let conn = Connection::connect(&server.addr).await.unwrap();

    assert!(closed_within(&conn, WAIT).await);
    let err = conn.ping().await.unwrap_err();
    assert!(matches!(err, MystwireError::Closed));
}

#[tokio::test]
async fn test_server_hang_up_closes_connection() {
    let server = MockServer::with_script(Script {
        greeting: Ping {}.to_frame().unwrap(),
        hang_up: true,
        ..Script::default()
    })
    .await;
    let conn = Connection::connect(&server.addr).await.unwrap();
    assert!(closed_within(&conn, WAIT).await);
}

#[tokio::test]
async fn test_close_stops_everything() {
    let server = MockServer::start().await;
    let mut conn = Connection::open(ClientConfig {
        read_timeout_ms: 50,
        ..ClientConfig::with_addr(&server.addr)
    })
    .await
    .unwrap();

    conn.close().await.unwrap();
    assert!(conn.is_closed());

    let versions_before = conn.versions().snapshot();
    let err = conn.say("anyone?").await.unwrap_err();
    assert!(matches!(err, MystwireError::Closed));
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert_eq!(conn.versions().snapshot(), versions_before);
}

#[tokio::test]
async fn test_connect_failure_is_reported() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap().to_string();
    drop(listener);

    let err = Connection::connect(&addr).await.err().expect("should fail");
    assert!(matches!(err, MystwireError::Transport(_)));
}

#[tokio::test]
async fn test_config_file_drives_open() {
    let server = MockServer::start().await;
    let path = std::env::temp_dir().join(format!("mystwire-{}.json", std::process::id()));
    std::fs::write(
        &path,
        format!(r#"{{ "addr": "{}", "poll_interval_ms": 10 }}"#, server.addr),
    )
    .unwrap();

    let config = ClientConfig::from_json_file(&path).unwrap();
    std::fs::remove_file(&path).ok();
    assert_eq!(config.poll_interval_ms, 10);

    let mut conn = Connection::open(config).await.unwrap();
    assert_eq!(conn.config().poll_interval_ms, 10);
    conn.close().await.unwrap();
}
