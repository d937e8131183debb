//! Typed request helpers.
//!
//! Each helper builds one client message and sends it. None of them wait
//! for the answer; take a version baseline first and use
//! [`Connection::wait_for`] for that.

use mystwire_protocol::{client, ChatChannel, ItemId, PartyChange, Ping};

use crate::{Connection, MystwireError};

impl Connection {
    /// Logs in. The server expects `user:pass` as the token.
    pub async fn authenticate(&self, user: &str, pass: &str) -> Result<(), MystwireError> {
        self.send_packet(&client::Authenticate {
            token: format!("{user}:{pass}"),
            build_version: self.config().build_version,
            fingerprint: String::new(),
        })
        .await
    }

    pub async fn request_character_list(&self) -> Result<(), MystwireError> {
        self.send_packet(&client::CharacterList {}).await
    }

    pub async fn create_character(
        &self,
        name: &str,
        class_id: u8,
        gender: u8,
        portrait: i32,
    ) -> Result<(), MystwireError> {
        self.send_packet(&client::CharCreate {
            name: name.to_string(),
            class_id,
            gender,
            portrait,
        })
        .await
    }

    pub async fn delete_character(&self, guid: u32) -> Result<(), MystwireError> {
        self.send_packet(&client::DeleteCharacter { guid }).await
    }

    pub async fn enter_world(&self, guid: u32) -> Result<(), MystwireError> {
        self.send_packet(&client::EnterWorld { guid }).await
    }

    /// Asks the server to path our unit to `(x, y)`.
    pub async fn move_to(&self, x: f32, y: f32) -> Result<(), MystwireError> {
        self.send_packet(&client::RequestMove { wasd: 0, x, y }).await
    }

    pub async fn set_target(&self, guid: u32) -> Result<(), MystwireError> {
        self.send_packet(&client::SetSelected { guid }).await
    }

    /// Casts at a unit. A zero target lets the server pick.
    pub async fn cast_spell(&self, spell_id: i32, target: u32) -> Result<(), MystwireError> {
        self.send_packet(&client::CastSpell {
            spell_id,
            target,
            x: 0.0,
            y: 0.0,
        })
        .await
    }

    pub async fn say(&self, text: &str) -> Result<(), MystwireError> {
        self.chat(ChatChannel::Say, text, "").await
    }

    pub async fn whisper(&self, to: &str, text: &str) -> Result<(), MystwireError> {
        self.chat(ChatChannel::Whisper, text, to).await
    }

    /// Sends a chat line on any channel.
    pub async fn chat(
        &self,
        channel: ChatChannel,
        text: &str,
        target_name: &str,
    ) -> Result<(), MystwireError> {
        self.send_packet(&client::ChatMsg {
            channel,
            text: text.to_string(),
            target_name: target_name.to_string(),
            item: ItemId::default(),
        })
        .await
    }

    pub async fn invite_to_party(&self, player_name: &str) -> Result<(), MystwireError> {
        self.send_packet(&client::PartyInviteMember {
            player_name: player_name.to_string(),
        })
        .await
    }

    pub async fn respond_party_invite(&self, accept: bool) -> Result<(), MystwireError> {
        self.send_packet(&client::PartyInviteResponse { accept }).await
    }

    pub async fn leave_party(&self) -> Result<(), MystwireError> {
        self.send_packet(&client::PartyChanges {
            change: PartyChange::Leave,
            target_guid: 0,
        })
        .await
    }

    pub async fn create_guild(&self, guild_name: &str) -> Result<(), MystwireError> {
        self.send_packet(&client::GuildCreate {
            guild_name: guild_name.to_string(),
        })
        .await
    }

    pub async fn invite_to_guild(&self, player_name: &str) -> Result<(), MystwireError> {
        self.send_packet(&client::GuildInviteMember {
            player_name: player_name.to_string(),
        })
        .await
    }

    pub async fn respond_guild_invite(&self, guild_id: i32, accept: bool) -> Result<(), MystwireError> {
        self.send_packet(&client::GuildInviteResponse { guild_id, accept })
            .await
    }

    pub async fn request_guild_roster(&self) -> Result<(), MystwireError> {
        self.send_packet(&client::GuildRosterRequest {}).await
    }

    pub async fn respond_duel(&self, accept: bool) -> Result<(), MystwireError> {
        self.send_packet(&client::DuelResponse { accept }).await
    }

    /// Sends a keepalive. The server's answer is counted in
    /// [`SessionState::pings`](crate::SessionState) and not echoed.
    pub async fn ping(&self) -> Result<(), MystwireError> {
        self.send_packet(&Ping {}).await
    }
}
