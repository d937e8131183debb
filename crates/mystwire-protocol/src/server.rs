//! Messages the server sends.
//!
//! Field order is wire order. Guids are `u32`; item, spell, quest and map
//! identifiers are `i32`.

use std::collections::BTreeMap;

use crate::{AuthResult, CharCreateResult, ChatChannel, ItemId};

/// Integer map as carried on the wire.
pub type IntMap = BTreeMap<i32, i32>;

// ---------------------------------------------------------------------------
// Account and world entry
// ---------------------------------------------------------------------------

packet! {
    /// Answer to an authentication attempt.
    Validate = ServerValidate {
        result: AuthResult,
        server_time: i64,
    }
}

packet! {
    QueuePosition = ServerQueuePosition { position: i32 }
}

wire_record! {
    CharacterEntry {
        guid: u32,
        name: String,
        class_id: u8,
        gender: u8,
        level: i32,
        portrait: i32,
    }
}

packet! {
    /// The full roster for the account. Replaces any earlier roster.
    CharacterList = ServerCharacterList { characters: Vec<CharacterEntry> }
}

packet! {
    CharaCreateResult = ServerCharaCreateResult { result: CharCreateResult }
}

packet! {
    /// The client has been placed on a map.
    NewWorld = ServerNewWorld { map_id: i32 }
}

packet! {
    /// Guid of the unit this client controls.
    SetController = ServerSetController { guid: u32 }
}

packet! {
    ChannelInfo = ServerChannelInfo {
        my_channel: i32,
        channel_size: i32,
        channels: Vec<i32>,
    }
}

packet! {
    ChannelChangeConfirm = ServerChannelChangeConfirm {
        new_channel: i32,
        success: bool,
    }
}

// ---------------------------------------------------------------------------
// Entities
// ---------------------------------------------------------------------------

packet! {
    Player = ServerPlayer {
        guid: u32,
        name: String,
        sub_name: String,
        class_id: u8,
        gender: u8,
        portrait: i32,
        x: f32,
        y: f32,
        orientation: f32,
        equipment: IntMap,
        variables: IntMap,
    }
}

packet! {
    Npc = ServerNpc {
        guid: u32,
        entry: i32,
        x: f32,
        y: f32,
        orientation: f32,
        variables: IntMap,
    }
}

packet! {
    GameObject = ServerGameObject {
        guid: u32,
        entry: i32,
        x: f32,
        y: f32,
        variables: IntMap,
    }
}

packet! {
    DestroyObject = ServerDestroyObject { guid: u32 }
}

packet! {
    SetSubname = ServerSetSubname { guid: u32, name: String }
}

packet! {
    /// Movement along a path of `(x, y)` points.
    UnitSpline = ServerUnitSpline {
        guid: u32,
        start_x: f32,
        start_y: f32,
        points: Vec<(f32, f32)>,
        slide: bool,
        silent: bool,
    }
}

packet! {
    UnitTeleport = ServerUnitTeleport {
        guid: u32,
        x: f32,
        y: f32,
        orientation: f32,
    }
}

packet! {
    UnitOrientation = ServerUnitOrientation { guid: u32, orientation: f32 }
}

packet! {
    /// One unit variable (health, level, ...) changed.
    ObjectVariable = ServerObjectVariable {
        guid: u32,
        variable_id: i32,
        value: i32,
    }
}

// ---------------------------------------------------------------------------
// Combat
// ---------------------------------------------------------------------------

packet! {
    CastStart = ServerCastStart { guid: u32, spell_id: i32, timer: i32 }
}

packet! {
    CastStop = ServerCastStop { guid: u32, spell_id: i32 }
}

packet! {
    /// A spell landed. `targets` pairs a guid with its hit result.
    SpellGo = ServerSpellGo {
        caster_guid: u32,
        spell_id: i32,
        targets: Vec<(u32, u8)>,
        ground_x: f32,
        ground_y: f32,
    }
}

packet! {
    CombatMsg = ServerCombatMsg {
        caster_guid: u32,
        target_guid: u32,
        spell_id: i32,
        amount: i32,
        spell_effect: u8,
        aura_effect: u8,
        spell_result: u8,
        periodic: bool,
        positive: bool,
    }
}

wire_record! {
    AuraInfo {
        spell_id: i32,
        caster_guid: u32,
        max_duration: i32,
        elapsed: i32,
        stacks: i32,
        positive: bool,
    }
}

packet! {
    UnitAuras = ServerUnitAuras {
        guid: u32,
        buffs: Vec<AuraInfo>,
        debuffs: Vec<AuraInfo>,
    }
}

packet! {
    Cooldown = ServerCooldown { id: i32, total_duration: i32 }
}

packet! {
    AggroMob = ServerAggroMob { guid: u32, aggro: bool }
}

// ---------------------------------------------------------------------------
// Items
// ---------------------------------------------------------------------------

wire_record! {
    ItemSlot {
        slot: i32,
        item: ItemId,
        stack: i32,
    }
}

packet! {
    /// Full inventory contents. Replaces any earlier inventory.
    Inventory = ServerInventory { gold: i32, slots: Vec<ItemSlot> }
}

packet! {
    /// Full bank contents. Replaces any earlier bank.
    Bank = ServerBank { slots: Vec<ItemSlot> }
}

packet! {
    OpenBank = ServerOpenBank { banker_guid: u32 }
}

packet! {
    EquipItem = ServerEquipItem {
        guid: u32,
        slot: i32,
        item: ItemId,
        silent: bool,
    }
}

packet! {
    NotifyItemAdd = ServerNotifyItemAdd {
        item: ItemId,
        amount: i32,
        looter_name: String,
    }
}

wire_record! {
    LootEntry { item: ItemId, count: i32 }
}

packet! {
    OpenLootWindow = ServerOpenLootWindow {
        guid: u32,
        money: i32,
        items: Vec<LootEntry>,
    }
}

packet! {
    OnObjectWasLooted = ServerOnObjectWasLooted { guid: u32, looter_guid: u32 }
}

packet! {
    UpdateVendorStock = ServerUpdateVendorStock {
        vendor_guid: u32,
        item: ItemId,
        amount: i32,
    }
}

packet! {
    RepairCost = ServerRepairCost { finished: bool, amount: i32 }
}

packet! {
    SocketResult = ServerSocketResult { success: bool }
}

packet! {
    EmpowerResult = ServerEmpowerResult { success: bool }
}

// ---------------------------------------------------------------------------
// Spells and progression
// ---------------------------------------------------------------------------

wire_record! {
    SpellSlot {
        spell_id: i32,
        level: u8,
        base_points: Vec<(i16, i16)>,
    }
}

packet! {
    Spellbook = ServerSpellbook { slots: Vec<SpellSlot> }
}

packet! {
    SpellbookUpdate = ServerSpellbookUpdate {
        spell_id: i32,
        level: u8,
        base_points: Vec<(i16, i16)>,
    }
}

packet! {
    LearnedSpell = ServerLearnedSpell { spell_id: i32 }
}

packet! {
    ExpNotify = ServerExpNotify { amount: i32, new_level: i32 }
}

packet! {
    LvlResponse = ServerLvlResponse { new_level: i32, success: bool }
}

packet! {
    SpentGold = ServerSpentGold { amount: i32 }
}

// ---------------------------------------------------------------------------
// Quests
// ---------------------------------------------------------------------------

wire_record! {
    QuestEntry {
        id: i32,
        done: bool,
        tally_items: IntMap,
        tally_npcs: IntMap,
        tally_game_objects: IntMap,
        tally_spells: IntMap,
    }
}

packet! {
    QuestList = ServerQuestList { quests: Vec<QuestEntry> }
}

packet! {
    AcceptedQuest = ServerAcceptedQuest { quest_id: i32 }
}

packet! {
    QuestTally = ServerQuestTally {
        quest_id: i32,
        tally_type: u8,
        entry: i32,
        tally: i32,
    }
}

packet! {
    QuestComplete = ServerQuestComplete { quest_id: i32, done: bool }
}

packet! {
    RewardedQuest = ServerRewardedQuest { quest_id: i32, reward_choice: i32 }
}

packet! {
    AbandonQuest = ServerAbandonQuest { quest_id: i32 }
}

packet! {
    AvailableWorldQuests = ServerAvailableWorldQuests { quests: Vec<i32> }
}

// ---------------------------------------------------------------------------
// Chat and gossip
// ---------------------------------------------------------------------------

packet! {
    ChatMsg = ServerChatMsg {
        channel: ChatChannel,
        from_guid: u32,
        from_name: String,
        text: String,
        item: ItemId,
    }
}

packet! {
    ChatError = ServerChatError { code: u8 }
}

wire_record! {
    VendorSlot { item: ItemId, cost: i32, supply: i32 }
}

packet! {
    GossipMenu = ServerGossipMenu {
        target_guid: u32,
        entry: i32,
        options: Vec<i32>,
        vendor_items: Vec<VendorSlot>,
        quest_offers: Vec<i32>,
        quest_completes: Vec<i32>,
    }
}

// ---------------------------------------------------------------------------
// Guild, party, trade
// ---------------------------------------------------------------------------

wire_record! {
    GuildMember {
        guid: u32,
        name: String,
        rank: u8,
        level: i32,
        class_id: u8,
        online: bool,
    }
}

packet! {
    /// `guild_id == 0` means the player is not in a guild.
    GuildRoster = ServerGuildRoster {
        guild_id: i32,
        name: String,
        motd: String,
        members: Vec<GuildMember>,
    }
}

packet! {
    GuildInvite = ServerGuildInvite {
        guild_id: i32,
        guild_name: String,
        inviter_name: String,
    }
}

packet! {
    GuildAddMember = ServerGuildAddMember { guid: u32, name: String }
}

packet! {
    GuildRemoveMember = ServerGuildRemoveMember { guid: u32, name: String }
}

packet! {
    GuildOnlineStatus = ServerGuildOnlineStatus { name: String, online: bool }
}

packet! {
    GuildNotifyRoleChange = ServerGuildNotifyRoleChange { name: String, role: u8 }
}

packet! {
    /// A zero leader with no members means the player left the party.
    PartyList = ServerPartyList { leader_guid: u32, members: Vec<i32> }
}

packet! {
    OfferParty = ServerOfferParty { inviter_guid: u32, inviter_name: String }
}

wire_record! {
    TradeItem { item: ItemId, stack: i32 }
}

wire_record! {
    TradeOffer { item_guid: i32, items: Vec<TradeItem> }
}

packet! {
    TradeUpdate = ServerTradeUpdate {
        partner_guid: u32,
        my_money: i32,
        his_money: i32,
        my_ready: bool,
        their_ready: bool,
        my_items: Vec<TradeOffer>,
        their_items: Vec<TradeOffer>,
    }
}

packet! {
    TradeCanceled = ServerTradeCanceled {}
}

// ---------------------------------------------------------------------------
// World, PvP, misc
// ---------------------------------------------------------------------------

packet! {
    QueryWaypointsResponse = ServerQueryWaypointsResponse { guids: Vec<i32> }
}

packet! {
    DiscoverWaypointNotify = ServerDiscoverWaypointNotify { waypoint_id: i32 }
}

packet! {
    ArenaQueued = ServerArenaQueued { joined: bool }
}

packet! {
    ArenaReady = ServerArenaReady { arena_id: i32 }
}

packet! {
    ArenaStatus = ServerArenaStatus { has_begun: bool }
}

packet! {
    ArenaOutcome = ServerArenaOutcome { won: bool }
}

packet! {
    OfferDuel = ServerOfferDuel { challenger_guid: u32, challenger_name: String }
}

packet! {
    PkNotify = ServerPkNotify { player_name: String }
}

packet! {
    WorldError = ServerWorldError { code: u8, message: String }
}

packet! {
    InspectReveal = ServerInspectReveal {
        target_guid: u32,
        class_id: u8,
        guild_name: String,
        equipment: IntMap,
        variables: IntMap,
    }
}

packet! {
    PromptRespec = ServerPromptRespec { cost: i32 }
}

packet! {
    RespawnResponse = ServerRespawnResponse { success: bool }
}

packet! {
    UnlockGameObj = ServerUnlockGameObj { entry: i32 }
}

packet! {
    MarkNpcsOnMap = ServerMarkNpcsOnMap { npcs: Vec<i32> }
}
