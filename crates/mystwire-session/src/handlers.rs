//! How each server message updates [`SessionState`].

use mystwire_protocol::server::*;
use mystwire_protocol::{AuthResult, Ping};

use crate::router::{Apply, Effects};
use crate::state::{ChatLine, GuildEvent};
use crate::{Category, SessionState};

// Tally types carried by `QuestTally`.
const TALLY_NPC: u8 = 0;
const TALLY_ITEM: u8 = 1;
const TALLY_GAME_OBJECT: u8 = 2;
const TALLY_SPELL: u8 = 3;

impl Apply for Ping {
    fn apply(self, state: &mut SessionState, fx: &mut Effects) {
        if state.pings.outstanding > 0 {
            // The answer to one of ours.
            state.pings.outstanding -= 1;
            state.pings.answered += 1;
        } else {
            state.pings.echoed += 1;
            fx.reply(&Ping {});
        }
        fx.bump(Category::Keepalive);
    }
}

// ---------------------------------------------------------------------------
// Account and world entry
// ---------------------------------------------------------------------------

impl Apply for Validate {
    fn apply(self, state: &mut SessionState, fx: &mut Effects) {
        state.authenticated = self.result == AuthResult::Validated;
        state.auth_result = Some(self.result);
        state.server_time = self.server_time;
        if !state.authenticated {
            tracing::info!(result = ?self.result, "authentication rejected");
        }
        fx.bump(Category::Auth);
    }
}

impl Apply for QueuePosition {
    fn apply(self, state: &mut SessionState, fx: &mut Effects) {
        state.queue_position = Some(self.position);
        fx.bump(Category::Auth);
    }
}

impl Apply for CharacterList {
    fn apply(self, state: &mut SessionState, fx: &mut Effects) {
        state.characters = self.characters;
        fx.bump(Category::Characters);
    }
}

impl Apply for CharaCreateResult {
    fn apply(self, state: &mut SessionState, fx: &mut Effects) {
        state.last_create_result = Some(self.result);
        fx.bump(Category::Characters);
    }
}

impl Apply for NewWorld {
    fn apply(self, state: &mut SessionState, fx: &mut Effects) {
        state.in_world = true;
        state.map_id = self.map_id;
        state.clear_entities();
        fx.bump(Category::World);
        fx.bump(Category::Entities);
    }
}

impl Apply for SetController {
    fn apply(self, state: &mut SessionState, fx: &mut Effects) {
        state.my_guid = Some(self.guid);
        // Our own player may have been spawned before we knew its guid.
        if let Some(me) = state.players.remove(&self.guid) {
            state.me = Some(me);
            fx.bump(Category::Entities);
        }
        fx.bump(Category::World);
    }
}

impl Apply for ChannelInfo {
    fn apply(self, state: &mut SessionState, fx: &mut Effects) {
        state.channel = Some(self);
        fx.bump(Category::World);
    }
}

impl Apply for ChannelChangeConfirm {
    fn apply(self, state: &mut SessionState, fx: &mut Effects) {
        if self.success {
            if let Some(channel) = state.channel.as_mut() {
                channel.my_channel = self.new_channel;
            }
        }
        fx.bump(Category::World);
    }
}

// ---------------------------------------------------------------------------
// Entities
// ---------------------------------------------------------------------------

impl Apply for Player {
    fn apply(self, state: &mut SessionState, fx: &mut Effects) {
        if state.my_guid == Some(self.guid) {
            state.me = Some(self);
        } else {
            state.players.insert(self.guid, self);
        }
        fx.bump(Category::Entities);
    }
}

impl Apply for Npc {
    fn apply(self, state: &mut SessionState, fx: &mut Effects) {
        state.npcs.insert(self.guid, self);
        fx.bump(Category::Entities);
    }
}

impl Apply for GameObject {
    fn apply(self, state: &mut SessionState, fx: &mut Effects) {
        state.game_objects.insert(self.guid, self);
        fx.bump(Category::Entities);
    }
}

impl Apply for DestroyObject {
    fn apply(self, state: &mut SessionState, fx: &mut Effects) {
        let guid = self.guid;
        state.players.remove(&guid);
        state.npcs.remove(&guid);
        state.game_objects.remove(&guid);
        state.casts.remove(&guid);
        state.auras.remove(&guid);
        state.aggro.remove(&guid);
        fx.bump(Category::Entities);
    }
}

impl Apply for SetSubname {
    fn apply(self, state: &mut SessionState, fx: &mut Effects) {
        if let Some(player) = state.player_mut(self.guid) {
            player.sub_name = self.name;
        }
        fx.bump(Category::Entities);
    }
}

impl Apply for UnitSpline {
    fn apply(self, state: &mut SessionState, fx: &mut Effects) {
        // Record where the unit ends up, not the path it takes.
        let (x, y) = self
            .points
            .last()
            .copied()
            .unwrap_or((self.start_x, self.start_y));
        state.set_position(self.guid, x, y, None);
        fx.bump(Category::Movement);
    }
}

impl Apply for UnitTeleport {
    fn apply(self, state: &mut SessionState, fx: &mut Effects) {
        state.set_position(self.guid, self.x, self.y, Some(self.orientation));
        fx.bump(Category::Movement);
    }
}

impl Apply for UnitOrientation {
    fn apply(self, state: &mut SessionState, fx: &mut Effects) {
        if let Some((x, y)) = state.position_of(self.guid) {
            state.set_position(self.guid, x, y, Some(self.orientation));
        }
        fx.bump(Category::Movement);
    }
}

impl Apply for ObjectVariable {
    fn apply(self, state: &mut SessionState, fx: &mut Effects) {
        match state.variables_mut(self.guid) {
            Some(vars) => {
                vars.insert(self.variable_id, self.value);
            }
            None => tracing::trace!(guid = self.guid, "variable for unknown unit"),
        }
        fx.bump(Category::Variables);
    }
}

// ---------------------------------------------------------------------------
// Combat
// ---------------------------------------------------------------------------

impl Apply for CastStart {
    fn apply(self, state: &mut SessionState, fx: &mut Effects) {
        state.casts.insert(self.guid, self);
        fx.bump(Category::Combat);
    }
}

impl Apply for CastStop {
    fn apply(self, state: &mut SessionState, fx: &mut Effects) {
        state.casts.remove(&self.guid);
        fx.bump(Category::Combat);
    }
}

impl Apply for SpellGo {
    fn apply(self, state: &mut SessionState, fx: &mut Effects) {
        state.casts.remove(&self.caster_guid);
        state.spell_events.push(self);
        fx.bump(Category::Combat);
    }
}

impl Apply for CombatMsg {
    fn apply(self, state: &mut SessionState, fx: &mut Effects) {
        state.combat_log.push(self);
        fx.bump(Category::Combat);
    }
}

impl Apply for UnitAuras {
    fn apply(self, state: &mut SessionState, fx: &mut Effects) {
        state.auras.insert(self.guid, (self.buffs, self.debuffs));
        fx.bump(Category::Auras);
    }
}

impl Apply for Cooldown {
    fn apply(self, state: &mut SessionState, fx: &mut Effects) {
        state.cooldowns.insert(self.id, self.total_duration);
        fx.bump(Category::Spells);
    }
}

impl Apply for AggroMob {
    fn apply(self, state: &mut SessionState, fx: &mut Effects) {
        if self.aggro {
            state.aggro.insert(self.guid);
        } else {
            state.aggro.remove(&self.guid);
        }
        fx.bump(Category::Combat);
    }
}

// ---------------------------------------------------------------------------
// Items
// ---------------------------------------------------------------------------

impl Apply for Inventory {
    fn apply(self, state: &mut SessionState, fx: &mut Effects) {
        state.gold = self.gold;
        state.inventory = self.slots.into_iter().map(|s| (s.slot, s)).collect();
        fx.bump(Category::Inventory);
    }
}

impl Apply for Bank {
    fn apply(self, state: &mut SessionState, fx: &mut Effects) {
        state.bank = self.slots.into_iter().map(|s| (s.slot, s)).collect();
        fx.bump(Category::Bank);
    }
}

impl Apply for OpenBank {
    fn apply(self, state: &mut SessionState, fx: &mut Effects) {
        state.open_banker = Some(self.banker_guid);
        fx.bump(Category::Bank);
    }
}

impl Apply for EquipItem {
    fn apply(self, state: &mut SessionState, fx: &mut Effects) {
        if let Some(player) = state.player_mut(self.guid) {
            if self.item.is_empty() {
                player.equipment.remove(&self.slot);
            } else {
                player.equipment.insert(self.slot, self.item.item_id);
            }
        }
        state.equip_events.push(self);
        fx.bump(Category::Inventory);
    }
}

impl Apply for NotifyItemAdd {
    fn apply(self, state: &mut SessionState, fx: &mut Effects) {
        state.item_notifications.push(self);
        fx.bump(Category::Inventory);
    }
}

impl Apply for OpenLootWindow {
    fn apply(self, state: &mut SessionState, fx: &mut Effects) {
        state.loot_window = Some(self);
        fx.bump(Category::Loot);
    }
}

impl Apply for OnObjectWasLooted {
    fn apply(self, state: &mut SessionState, fx: &mut Effects) {
        state.looted.push(self);
        fx.bump(Category::Loot);
    }
}

impl Apply for UpdateVendorStock {
    fn apply(self, state: &mut SessionState, fx: &mut Effects) {
        state.vendor_stock.push(self);
        fx.bump(Category::Vendor);
    }
}

impl Apply for RepairCost {
    fn apply(self, state: &mut SessionState, fx: &mut Effects) {
        state.repair_cost = Some(self);
        fx.bump(Category::Vendor);
    }
}

impl Apply for SocketResult {
    fn apply(self, state: &mut SessionState, fx: &mut Effects) {
        state.socket_results.push(self.success);
        fx.bump(Category::Inventory);
    }
}

impl Apply for EmpowerResult {
    fn apply(self, state: &mut SessionState, fx: &mut Effects) {
        state.empower_results.push(self.success);
        fx.bump(Category::Inventory);
    }
}

// ---------------------------------------------------------------------------
// Spells and progression
// ---------------------------------------------------------------------------

impl Apply for Spellbook {
    fn apply(self, state: &mut SessionState, fx: &mut Effects) {
        state.spellbook = self.slots.into_iter().map(|s| (s.spell_id, s)).collect();
        fx.bump(Category::Spells);
    }
}

impl Apply for SpellbookUpdate {
    fn apply(self, state: &mut SessionState, fx: &mut Effects) {
        state.spellbook.insert(
            self.spell_id,
            SpellSlot {
                spell_id: self.spell_id,
                level: self.level,
                base_points: self.base_points,
            },
        );
        fx.bump(Category::Spells);
    }
}

impl Apply for LearnedSpell {
    fn apply(self, state: &mut SessionState, fx: &mut Effects) {
        state.learned_spells.push(self.spell_id);
        fx.bump(Category::Spells);
    }
}

impl Apply for ExpNotify {
    fn apply(self, state: &mut SessionState, fx: &mut Effects) {
        let progress = &mut state.progress;
        progress.exp_total += i64::from(self.amount);
        progress.last_exp = self.amount;
        if self.new_level > 0 {
            progress.level = self.new_level;
        }
        fx.bump(Category::Exp);
    }
}

impl Apply for LvlResponse {
    fn apply(self, state: &mut SessionState, fx: &mut Effects) {
        if self.success {
            state.progress.level = self.new_level;
        }
        state.progress.level_ups.push(self);
        fx.bump(Category::Exp);
    }
}

impl Apply for SpentGold {
    fn apply(self, state: &mut SessionState, fx: &mut Effects) {
        state.progress.gold_spent += i64::from(self.amount);
        fx.bump(Category::Exp);
    }
}

impl Apply for PromptRespec {
    fn apply(self, state: &mut SessionState, fx: &mut Effects) {
        state.progress.respec_cost = Some(self.cost);
        fx.bump(Category::Exp);
    }
}

// ---------------------------------------------------------------------------
// Quests
// ---------------------------------------------------------------------------

impl Apply for QuestList {
    fn apply(self, state: &mut SessionState, fx: &mut Effects) {
        state.quests.active = self.quests.into_iter().map(|q| (q.id, q)).collect();
        fx.bump(Category::Quest);
    }
}

impl Apply for AcceptedQuest {
    fn apply(self, state: &mut SessionState, fx: &mut Effects) {
        state
            .quests
            .active
            .entry(self.quest_id)
            .or_insert_with(|| QuestEntry {
                id: self.quest_id,
                ..QuestEntry::default()
            });
        state.quests.accepted.push(self.quest_id);
        fx.bump(Category::Quest);
    }
}

impl Apply for QuestTally {
    fn apply(self, state: &mut SessionState, fx: &mut Effects) {
        if let Some(quest) = state.quests.active.get_mut(&self.quest_id) {
            let tallies = match self.tally_type {
                TALLY_NPC => Some(&mut quest.tally_npcs),
                TALLY_ITEM => Some(&mut quest.tally_items),
                TALLY_GAME_OBJECT => Some(&mut quest.tally_game_objects),
                TALLY_SPELL => Some(&mut quest.tally_spells),
                _ => None,
            };
            if let Some(tallies) = tallies {
                tallies.insert(self.entry, self.tally);
            }
        }
        state.quests.tallies.push(self);
        fx.bump(Category::Quest);
    }
}

impl Apply for QuestComplete {
    fn apply(self, state: &mut SessionState, fx: &mut Effects) {
        if let Some(quest) = state.quests.active.get_mut(&self.quest_id) {
            quest.done = self.done;
        }
        if self.done {
            state.quests.completed.push(self.quest_id);
        }
        fx.bump(Category::Quest);
    }
}

impl Apply for RewardedQuest {
    fn apply(self, state: &mut SessionState, fx: &mut Effects) {
        state.quests.active.remove(&self.quest_id);
        state.quests.rewarded.push((self.quest_id, self.reward_choice));
        fx.bump(Category::Quest);
    }
}

impl Apply for AbandonQuest {
    fn apply(self, state: &mut SessionState, fx: &mut Effects) {
        state.quests.active.remove(&self.quest_id);
        state.quests.abandoned.push(self.quest_id);
        fx.bump(Category::Quest);
    }
}

impl Apply for AvailableWorldQuests {
    fn apply(self, state: &mut SessionState, fx: &mut Effects) {
        state.quests.world_quests = self.quests;
        fx.bump(Category::Quest);
    }
}

// ---------------------------------------------------------------------------
// Chat and gossip
// ---------------------------------------------------------------------------

impl Apply for ChatMsg {
    fn apply(self, state: &mut SessionState, fx: &mut Effects) {
        state.chat.push(ChatLine {
            channel: self.channel,
            from_guid: self.from_guid,
            from_name: self.from_name,
            text: self.text,
            item: self.item,
        });
        fx.bump(Category::Chat);
    }
}

impl Apply for ChatError {
    fn apply(self, state: &mut SessionState, fx: &mut Effects) {
        state.chat_errors.push(self.code);
        fx.bump(Category::Chat);
    }
}

impl Apply for GossipMenu {
    fn apply(self, state: &mut SessionState, fx: &mut Effects) {
        state.gossip = Some(self);
        fx.bump(Category::Gossip);
    }
}

// ---------------------------------------------------------------------------
// Guild, party, trade
// ---------------------------------------------------------------------------

impl Apply for GuildRoster {
    fn apply(self, state: &mut SessionState, fx: &mut Effects) {
        state.guild = (self.guild_id != 0).then_some(self);
        fx.bump(Category::Guild);
    }
}

impl Apply for GuildInvite {
    fn apply(self, state: &mut SessionState, fx: &mut Effects) {
        state.guild_invites.push(self);
        fx.bump(Category::Guild);
    }
}

impl Apply for GuildAddMember {
    fn apply(self, state: &mut SessionState, fx: &mut Effects) {
        if let Some(guild) = state.guild.as_mut() {
            if !guild.members.iter().any(|m| m.guid == self.guid) {
                guild.members.push(GuildMember {
                    guid: self.guid,
                    name: self.name.clone(),
                    online: true,
                    ..GuildMember::default()
                });
            }
        }
        state.guild_events.push(GuildEvent::Joined {
            guid: self.guid,
            name: self.name,
        });
        fx.bump(Category::Guild);
    }
}

impl Apply for GuildRemoveMember {
    fn apply(self, state: &mut SessionState, fx: &mut Effects) {
        if let Some(guild) = state.guild.as_mut() {
            guild.members.retain(|m| m.guid != self.guid);
        }
        state.guild_events.push(GuildEvent::Left {
            guid: self.guid,
            name: self.name,
        });
        fx.bump(Category::Guild);
    }
}

impl Apply for GuildOnlineStatus {
    fn apply(self, state: &mut SessionState, fx: &mut Effects) {
        if let Some(member) = guild_member_named(state, &self.name) {
            member.online = self.online;
        }
        state.guild_events.push(GuildEvent::Online {
            name: self.name,
            online: self.online,
        });
        fx.bump(Category::Guild);
    }
}

impl Apply for GuildNotifyRoleChange {
    fn apply(self, state: &mut SessionState, fx: &mut Effects) {
        if let Some(member) = guild_member_named(state, &self.name) {
            member.rank = self.role;
        }
        state.guild_events.push(GuildEvent::RoleChanged {
            name: self.name,
            role: self.role,
        });
        fx.bump(Category::Guild);
    }
}

fn guild_member_named<'a>(state: &'a mut SessionState, name: &str) -> Option<&'a mut GuildMember> {
    state
        .guild
        .as_mut()?
        .members
        .iter_mut()
        .find(|m| m.name == name)
}

impl Apply for PartyList {
    fn apply(self, state: &mut SessionState, fx: &mut Effects) {
        let left = self.leader_guid == 0 && self.members.is_empty();
        state.party = (!left).then_some(self);
        fx.bump(Category::Party);
    }
}

impl Apply for OfferParty {
    fn apply(self, state: &mut SessionState, fx: &mut Effects) {
        state.party_invites.push(self);
        fx.bump(Category::Party);
    }
}

impl Apply for TradeUpdate {
    fn apply(self, state: &mut SessionState, fx: &mut Effects) {
        state.trade = Some(self);
        fx.bump(Category::Trade);
    }
}

impl Apply for TradeCanceled {
    fn apply(self, state: &mut SessionState, fx: &mut Effects) {
        state.trade = None;
        state.trades_canceled += 1;
        fx.bump(Category::Trade);
    }
}

// ---------------------------------------------------------------------------
// World, PvP, misc
// ---------------------------------------------------------------------------

impl Apply for QueryWaypointsResponse {
    fn apply(self, state: &mut SessionState, fx: &mut Effects) {
        state.waypoints = self.guids;
        fx.bump(Category::World);
    }
}

impl Apply for DiscoverWaypointNotify {
    fn apply(self, state: &mut SessionState, fx: &mut Effects) {
        state.discovered_waypoints.push(self.waypoint_id);
        fx.bump(Category::World);
    }
}

impl Apply for ArenaQueued {
    fn apply(self, state: &mut SessionState, fx: &mut Effects) {
        state.arena.queued = self.joined;
        fx.bump(Category::Arena);
    }
}

impl Apply for ArenaReady {
    fn apply(self, state: &mut SessionState, fx: &mut Effects) {
        state.arena.ready = Some(self.arena_id);
        fx.bump(Category::Arena);
    }
}

impl Apply for ArenaStatus {
    fn apply(self, state: &mut SessionState, fx: &mut Effects) {
        state.arena.begun = self.has_begun;
        fx.bump(Category::Arena);
    }
}

impl Apply for ArenaOutcome {
    fn apply(self, state: &mut SessionState, fx: &mut Effects) {
        let arena = &mut state.arena;
        arena.outcome = Some(self.won);
        arena.queued = false;
        arena.begun = false;
        arena.ready = None;
        fx.bump(Category::Arena);
    }
}

impl Apply for OfferDuel {
    fn apply(self, state: &mut SessionState, fx: &mut Effects) {
        state.duel_offers.push(self);
        fx.bump(Category::Duel);
    }
}

impl Apply for PkNotify {
    fn apply(self, state: &mut SessionState, fx: &mut Effects) {
        state.pk_notices.push(self.player_name);
        fx.bump(Category::Duel);
    }
}

impl Apply for WorldError {
    fn apply(self, state: &mut SessionState, fx: &mut Effects) {
        tracing::debug!(code = self.code, message = %self.message, "world error");
        state.world_errors.push(self);
        fx.bump(Category::WorldError);
    }
}

impl Apply for InspectReveal {
    fn apply(self, state: &mut SessionState, fx: &mut Effects) {
        state.inspect = Some(self);
        fx.bump(Category::Inspect);
    }
}

impl Apply for RespawnResponse {
    fn apply(self, state: &mut SessionState, fx: &mut Effects) {
        state.respawn_result = Some(self.success);
        fx.bump(Category::World);
    }
}

impl Apply for UnlockGameObj {
    fn apply(self, state: &mut SessionState, fx: &mut Effects) {
        state.unlocked_objects.push(self.entry);
        fx.bump(Category::World);
    }
}

impl Apply for MarkNpcsOnMap {
    fn apply(self, state: &mut SessionState, fx: &mut Effects) {
        state.marked_npcs = self.npcs;
        fx.bump(Category::World);
    }
}
