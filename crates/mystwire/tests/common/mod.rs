//! In-process mock game server for integration tests.
//!
//! Binds `127.0.0.1:0`, accepts any number of clients and answers a small
//! slice of the protocol: keepalives, login, the character roster, world
//! entry and an inventory deposit. Every frame a client sends is recorded
//! so tests can assert on it.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use mystwire::protocol::server::{self, CharacterEntry, ItemSlot};
use mystwire::protocol::{
    client, AuthResult, CharCreateResult, Frame, FrameReader, ItemId, Opcode, Packet, Ping,
};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

/// What the server does right after accepting a client.
#[derive(Clone, Default)]
pub struct Script {
    /// Raw bytes written before anything else.
    pub greeting: Vec<u8>,
    /// Close the socket right after the greeting.
    pub hang_up: bool,
    /// Accept but never read, so the client's writes back up.
    pub stall: bool,
    /// Record client pings without answering them.
    pub silent_pings: bool,
}

pub struct MockServer {
    pub addr: String,
    received: Arc<Mutex<Vec<Frame>>>,
}

impl MockServer {
    pub async fn start() -> Self {
        Self::with_script(Script::default()).await
    }

    pub async fn with_script(script: Script) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let addr = listener.local_addr().expect("local addr").to_string();
        let received = Arc::new(Mutex::new(Vec::new()));

        let log = Arc::clone(&received);
        tokio::spawn(async move {
            while let Ok((sock, _)) = listener.accept().await {
                tokio::spawn(serve(sock, script.clone(), Arc::clone(&log)));
            }
        });

        Self { addr, received }
    }

    /// Number of client frames with `opcode` received so far.
    pub fn count(&self, opcode: Opcode) -> usize {
        self.received()
            .iter()
            .filter(|&&op| op == opcode.as_u16())
            .count()
    }

    /// Opcodes of every frame received so far, across all clients.
    pub fn received(&self) -> Vec<u16> {
        self.received
            .lock()
            .unwrap()
            .iter()
            .map(|f| f.opcode)
            .collect()
    }

    /// Waits up to two seconds for a client frame with `opcode`.
    pub async fn expect_received(&self, opcode: Opcode) -> bool {
        for _ in 0..200 {
            if self.received().contains(&opcode.as_u16()) {
                return true;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        false
    }
}

fn push<P: Packet>(out: &mut Vec<u8>, packet: &P) {
    out.extend(packet.to_frame().expect("frame fits"));
}

/// Per-client server state.
#[derive(Default)]
struct Account {
    silent_pings: bool,
    characters: Vec<CharacterEntry>,
    next_guid: u32,
    inventory: Vec<ItemSlot>,
    bank: Vec<ItemSlot>,
}

impl Account {
    fn new(silent_pings: bool) -> Self {
        Self {
            silent_pings,
            next_guid: 100,
            inventory: vec![ItemSlot {
                slot: 0,
                item: ItemId::new(1001),
                stack: 1,
            }],
            ..Self::default()
        }
    }

    fn roster(&self) -> server::CharacterList {
        server::CharacterList {
            characters: self.characters.clone(),
        }
    }

    fn inventory(&self) -> server::Inventory {
        server::Inventory {
            gold: 50,
            slots: self.inventory.clone(),
        }
    }

    fn respond(&mut self, frame: &Frame, out: &mut Vec<u8>) {
        let Some(opcode) = frame.known_opcode() else {
            return;
        };
        match opcode {
            // Echo every ping, as the game server does.
            Opcode::Ping if !self.silent_pings => push(out, &Ping {}),
            Opcode::ClientAuthenticate => {
                let auth = client::Authenticate::decode(&frame.payload);
                let result = if auth.token == "user:pass" {
                    AuthResult::Validated
                } else {
                    AuthResult::BadPassword
                };
                push(
                    out,
                    &server::Validate {
                        result,
                        server_time: 1_700_000_000,
                    },
                );
            }
            Opcode::ClientCharacterList => push(out, &self.roster()),
            Opcode::ClientCharCreate => {
                let create = client::CharCreate::decode(&frame.payload);
                let result = if self.characters.iter().any(|c| c.name == create.name) {
                    CharCreateResult::AlreadyExists
                } else {
                    self.characters.push(CharacterEntry {
                        guid: self.next_guid,
                        name: create.name,
                        class_id: create.class_id,
                        gender: create.gender,
                        level: 1,
                        portrait: create.portrait,
                    });
                    self.next_guid += 1;
                    CharCreateResult::Success
                };
                push(out, &server::CharaCreateResult { result });
                push(out, &self.roster());
            }
            Opcode::ClientDeleteCharacter => {
                let delete = client::DeleteCharacter::decode(&frame.payload);
                self.characters.retain(|c| c.guid != delete.guid);
                push(out, &self.roster());
            }
            Opcode::ClientEnterWorld => {
                let enter = client::EnterWorld::decode(&frame.payload);
                push(out, &server::NewWorld { map_id: 1 });
                push(out, &server::SetController { guid: enter.guid });
                push(
                    out,
                    &server::Player {
                        guid: enter.guid,
                        name: format!("Hero{}", enter.guid),
                        ..server::Player::default()
                    },
                );
                push(out, &self.inventory());
            }
            Opcode::ClientMoveInventoryToBank => {
                let mv = client::MoveInventoryToBank::decode(&frame.payload);
                if let Some(pos) = self.inventory.iter().position(|s| s.slot == mv.from) {
                    let mut slot = self.inventory.remove(pos);
                    slot.slot = mv.to;
                    self.bank.push(slot);
                }
                push(out, &self.inventory());
                push(
                    out,
                    &server::Bank {
                        slots: self.bank.clone(),
                    },
                );
            }
            _ => {}
        }
    }
}

async fn serve(mut sock: TcpStream, script: Script, log: Arc<Mutex<Vec<Frame>>>) {
    if !script.greeting.is_empty() && sock.write_all(&script.greeting).await.is_err() {
        return;
    }
    if script.hang_up {
        return;
    }
    if script.stall {
        tokio::time::sleep(Duration::from_secs(30)).await;
        return;
    }

    let mut account = Account::new(script.silent_pings);
    let mut reader = FrameReader::new();
    let mut buf = [0u8; 1024];
    loop {
        let n = match sock.read(&mut buf).await {
            Ok(0) | Err(_) => return,
            Ok(n) => n,
        };
        let Ok(frames) = reader.feed(&buf[..n]) else {
            return;
        };
        let mut out = Vec::new();
        for frame in frames {
            account.respond(&frame, &mut out);
            log.lock().unwrap().push(frame);
        }
        if !out.is_empty() && sock.write_all(&out).await.is_err() {
            return;
        }
    }
}
