//! The client's view of the world, as built from server pushes.
//!
//! Every field here is written by exactly one place: the router's handlers,
//! running on the connection's receive task. Callers get owned snapshots.

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use mystwire_protocol::server::{
    AuraInfo, CastStart, ChannelInfo, CharacterEntry, CombatMsg, EquipItem, GameObject,
    GossipMenu, GuildInvite, GuildRoster, InspectReveal, IntMap, ItemSlot, LvlResponse,
    NotifyItemAdd, Npc, OfferDuel, OfferParty, OnObjectWasLooted, OpenLootWindow, PartyList,
    Player, QuestEntry, QuestTally, RepairCost, SpellGo, SpellSlot, TradeUpdate,
    UpdateVendorStock, WorldError,
};
use mystwire_protocol::{AuthResult, CharCreateResult, ChatChannel, Frame, ItemId};
use serde::Serialize;

/// A frame no handler claimed, kept byte for byte.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RawPacket {
    pub opcode: u16,
    pub payload: Vec<u8>,
}

impl From<&Frame> for RawPacket {
    fn from(frame: &Frame) -> Self {
        Self {
            opcode: frame.opcode,
            payload: frame.payload.clone(),
        }
    }
}

/// Oldest frames are dropped from [`SessionState::received`] past this size.
pub const RECEIVED_LOG_CAPACITY: usize = 4096;

/// Keepalive bookkeeping.
///
/// A ping we sent is answered by the server's echo. That echo must be
/// consumed rather than echoed back, or the two sides would bounce a ping
/// forever.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Keepalive {
    /// Pings sent by this client and not yet answered.
    pub outstanding: u32,
    /// Answers received to our own pings.
    pub answered: u64,
    /// Server pings we echoed back.
    pub echoed: u64,
}

/// One received chat line.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatLine {
    pub channel: ChatChannel,
    pub from_guid: u32,
    pub from_name: String,
    pub text: String,
    pub item: ItemId,
}

/// Guild membership changes pushed while a roster is open.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum GuildEvent {
    Joined { guid: u32, name: String },
    Left { guid: u32, name: String },
    Online { name: String, online: bool },
    RoleChanged { name: String, role: u8 },
}

/// Experience, level and gold spending.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Progress {
    /// Sum of every experience award seen.
    pub exp_total: i64,
    /// Most recent experience award.
    pub last_exp: i32,
    /// Current level, once the server has told us.
    pub level: i32,
    pub gold_spent: i64,
    pub level_ups: Vec<LvlResponse>,
    /// Cost offered by the last respec prompt.
    pub respec_cost: Option<i32>,
}

/// Quest log plus the history of quest events.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct QuestLog {
    /// Active quests by id.
    pub active: BTreeMap<i32, QuestEntry>,
    pub accepted: Vec<i32>,
    pub completed: Vec<i32>,
    /// `(quest_id, reward_choice)` pairs.
    pub rewarded: Vec<(i32, i32)>,
    pub abandoned: Vec<i32>,
    pub tallies: Vec<QuestTally>,
    pub world_quests: Vec<i32>,
}

/// Arena queue and match state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ArenaState {
    pub queued: bool,
    pub ready: Option<i32>,
    pub begun: bool,
    /// `Some(true)` for a win.
    pub outcome: Option<bool>,
}

/// Everything a client has observed on one connection.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SessionState {
    // auth
    pub authenticated: bool,
    pub auth_result: Option<AuthResult>,
    pub server_time: i64,
    pub queue_position: Option<i32>,

    // characters
    pub characters: Vec<CharacterEntry>,
    pub last_create_result: Option<CharCreateResult>,

    // world
    pub in_world: bool,
    pub map_id: i32,
    /// Guid of the unit this client controls.
    pub my_guid: Option<u32>,
    pub channel: Option<ChannelInfo>,
    pub waypoints: Vec<i32>,
    pub discovered_waypoints: Vec<i32>,
    pub unlocked_objects: Vec<i32>,
    pub marked_npcs: Vec<i32>,
    pub respawn_result: Option<bool>,

    // entities
    /// The controlled player.
    pub me: Option<Player>,
    /// Other visible players by guid.
    pub players: BTreeMap<u32, Player>,
    pub npcs: BTreeMap<u32, Npc>,
    pub game_objects: BTreeMap<u32, GameObject>,

    // combat
    /// Casts in progress by caster guid.
    pub casts: BTreeMap<u32, CastStart>,
    pub spell_events: Vec<SpellGo>,
    pub combat_log: Vec<CombatMsg>,
    /// `(buffs, debuffs)` by unit guid.
    pub auras: BTreeMap<u32, (Vec<AuraInfo>, Vec<AuraInfo>)>,
    /// Total cooldown duration by spell or item id.
    pub cooldowns: BTreeMap<i32, i32>,
    /// Mobs currently aggroed on us.
    pub aggro: BTreeSet<u32>,

    // items
    pub gold: i32,
    pub inventory: BTreeMap<i32, ItemSlot>,
    pub bank: BTreeMap<i32, ItemSlot>,
    pub open_banker: Option<u32>,
    pub equip_events: Vec<EquipItem>,
    pub item_notifications: Vec<NotifyItemAdd>,
    pub loot_window: Option<OpenLootWindow>,
    pub looted: Vec<OnObjectWasLooted>,
    pub vendor_stock: Vec<UpdateVendorStock>,
    pub repair_cost: Option<RepairCost>,
    pub socket_results: Vec<bool>,
    pub empower_results: Vec<bool>,

    // spells
    pub spellbook: BTreeMap<i32, SpellSlot>,
    pub learned_spells: Vec<i32>,

    pub progress: Progress,
    pub quests: QuestLog,
    pub gossip: Option<GossipMenu>,

    // chat
    pub chat: Vec<ChatLine>,
    pub chat_errors: Vec<u8>,

    // guild
    /// `None` when not in a guild.
    pub guild: Option<GuildRoster>,
    pub guild_invites: Vec<GuildInvite>,
    pub guild_events: Vec<GuildEvent>,

    // party
    /// `None` when not in a party.
    pub party: Option<PartyList>,
    pub party_invites: Vec<OfferParty>,

    // trade
    pub trade: Option<TradeUpdate>,
    pub trades_canceled: u32,

    // pvp
    pub duel_offers: Vec<OfferDuel>,
    pub pk_notices: Vec<String>,
    pub arena: ArenaState,

    pub world_errors: Vec<WorldError>,
    pub inspect: Option<InspectReveal>,
    pub pings: Keepalive,

    /// Frames with no handler, in arrival order.
    pub unhandled: Vec<RawPacket>,
    /// Every frame received, handled or not, in arrival order. Bounded by
    /// [`RECEIVED_LOG_CAPACITY`].
    pub received: VecDeque<RawPacket>,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Finds a character on the account roster by name.
    pub fn character_named(&self, name: &str) -> Option<&CharacterEntry> {
        self.characters.iter().find(|c| c.name == name)
    }

    /// Finds a visible player, ourselves included, by name.
    pub fn player_named(&self, name: &str) -> Option<&Player> {
        self.me
            .iter()
            .chain(self.players.values())
            .find(|p| p.name == name)
    }

    /// Returns `true` if any chat line contains `needle`.
    pub fn chat_contains(&self, needle: &str) -> bool {
        self.chat.iter().any(|line| line.text.contains(needle))
    }

    /// Number of items of `item_id` across all inventory slots.
    pub fn inventory_count(&self, item_id: i32) -> i64 {
        self.inventory
            .values()
            .filter(|s| s.item.item_id == item_id)
            .map(|s| i64::from(s.stack.max(1)))
            .sum()
    }

    /// Last known `(x, y)` of any entity.
    pub fn position_of(&self, guid: u32) -> Option<(f32, f32)> {
        if let Some(p) = self.player(guid) {
            return Some((p.x, p.y));
        }
        if let Some(n) = self.npcs.get(&guid) {
            return Some((n.x, n.y));
        }
        self.game_objects.get(&guid).map(|o| (o.x, o.y))
    }

    /// Current value of a unit variable, if the unit is known.
    pub fn variable_of(&self, guid: u32, variable_id: i32) -> Option<i32> {
        let vars = if let Some(p) = self.player(guid) {
            &p.variables
        } else if let Some(n) = self.npcs.get(&guid) {
            &n.variables
        } else {
            &self.game_objects.get(&guid)?.variables
        };
        vars.get(&variable_id).copied()
    }

    pub fn player(&self, guid: u32) -> Option<&Player> {
        match &self.me {
            Some(me) if me.guid == guid => Some(me),
            _ => self.players.get(&guid),
        }
    }

    pub(crate) fn player_mut(&mut self, guid: u32) -> Option<&mut Player> {
        match &mut self.me {
            Some(me) if me.guid == guid => Some(me),
            _ => self.players.get_mut(&guid),
        }
    }

    pub(crate) fn variables_mut(&mut self, guid: u32) -> Option<&mut IntMap> {
        if self.player(guid).is_some() {
            return self.player_mut(guid).map(|p| &mut p.variables);
        }
        if let Some(n) = self.npcs.get_mut(&guid) {
            return Some(&mut n.variables);
        }
        self.game_objects.get_mut(&guid).map(|o| &mut o.variables)
    }

    /// Moves an entity. Returns `false` if the guid is unknown.
    pub(crate) fn set_position(&mut self, guid: u32, x: f32, y: f32, facing: Option<f32>) -> bool {
        if let Some(p) = self.player_mut(guid) {
            p.x = x;
            p.y = y;
            if let Some(o) = facing {
                p.orientation = o;
            }
            return true;
        }
        if let Some(n) = self.npcs.get_mut(&guid) {
            n.x = x;
            n.y = y;
            if let Some(o) = facing {
                n.orientation = o;
            }
            return true;
        }
        if let Some(g) = self.game_objects.get_mut(&guid) {
            g.x = x;
            g.y = y;
            return true;
        }
        false
    }

    /// Forgets every entity, e.g. on a map change.
    pub(crate) fn clear_entities(&mut self) {
        self.players.clear();
        self.npcs.clear();
        self.game_objects.clear();
        self.casts.clear();
        self.auras.clear();
        self.aggro.clear();
    }

    /// Drops the chat log and chat errors.
    pub fn clear_chat(&mut self) {
        self.chat.clear();
        self.chat_errors.clear();
    }

    /// Drops pending party, guild and duel offers and guild events.
    pub fn clear_social(&mut self) {
        self.party_invites.clear();
        self.guild_invites.clear();
        self.guild_events.clear();
        self.duel_offers.clear();
    }

    /// Drops combat messages and spell events.
    pub fn clear_combat_log(&mut self) {
        self.combat_log.clear();
        self.spell_events.clear();
    }

    /// Removes and returns the inspection log.
    pub fn take_unhandled(&mut self) -> Vec<RawPacket> {
        std::mem::take(&mut self.unhandled)
    }

    /// Records an outgoing ping so its echo is not answered.
    pub fn ping_sent(&mut self) {
        self.pings.outstanding += 1;
    }

    /// Forgets a ping that never made it onto the wire.
    pub fn ping_unsent(&mut self) {
        self.pings.outstanding = self.pings.outstanding.saturating_sub(1);
    }

    pub(crate) fn record_received(&mut self, packet: RawPacket) {
        if self.received.len() >= RECEIVED_LOG_CAPACITY {
            self.received.pop_front();
        }
        self.received.push_back(packet);
    }

    /// Removes and returns the oldest received frame with `opcode`.
    pub fn take_received(&mut self, opcode: u16) -> Option<RawPacket> {
        let pos = self.received.iter().position(|p| p.opcode == opcode)?;
        self.received.remove(pos)
    }

    /// Drops the received-frame log.
    pub fn clear_received(&mut self) {
        self.received.clear();
    }
}
