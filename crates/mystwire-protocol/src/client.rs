//! Messages the client sends.

use std::collections::BTreeMap;

use crate::{ChatChannel, ItemId, PartyChange};

packet! {
    /// `token` is `"username:password"` for local accounts.
    Authenticate = ClientAuthenticate {
        token: String,
        build_version: i32,
        fingerprint: String,
    }
}

packet! {
    CharacterList = ClientCharacterList {}
}

packet! {
    CharCreate = ClientCharCreate {
        name: String,
        class_id: u8,
        gender: u8,
        portrait: i32,
    }
}

packet! {
    DeleteCharacter = ClientDeleteCharacter { guid: u32 }
}

packet! {
    EnterWorld = ClientEnterWorld { guid: u32 }
}

packet! {
    RequestMove = ClientRequestMove { wasd: u8, x: f32, y: f32 }
}

packet! {
    RequestStop = ClientRequestStop {}
}

packet! {
    /// `target == 0` casts at the ground position instead.
    CastSpell = ClientCastSpell {
        spell_id: i32,
        target: u32,
        x: f32,
        y: f32,
    }
}

packet! {
    CancelCast = ClientCancelCast {}
}

packet! {
    /// `guid == 0` clears the selection.
    SetSelected = ClientSetSelected { guid: u32 }
}

packet! {
    CancelBuff = ClientCancelBuff { spell_id: i32, caster_guid: u32 }
}

packet! {
    EquipItem = ClientEquipItem {
        inventory_slot: i32,
        equip_slot: u8,
        item: ItemId,
    }
}

packet! {
    UnequipItem = ClientUnequipItem { equip_slot: i32 }
}

packet! {
    MoveItem = ClientMoveItem { from: i32, to: i32 }
}

packet! {
    SplitItemStack = ClientSplitItemStack { from: i32, to: i32, amount: i32 }
}

packet! {
    DestroyItem = ClientDestroyItem { slot: i32 }
}

packet! {
    UseItem = ClientUseItem {
        slot: i32,
        target: u32,
        item: ItemId,
        equip_slot: u8,
    }
}

packet! {
    SortInventory = ClientSortInventory {}
}

packet! {
    ReqAbilityList = ClientReqAbilityList {}
}

packet! {
    LootItem = ClientLootItem { source_guid: u32, item: ItemId }
}

packet! {
    OpenBank = ClientOpenBank { banker_guid: u32 }
}

packet! {
    MoveInventoryToBank = ClientMoveInventoryToBank {
        from: i32,
        to: i32,
        auto_slot: bool,
    }
}

packet! {
    MoveBankToBank = ClientMoveBankToBank { from: i32, to: i32 }
}

packet! {
    UnBankItem = ClientUnBankItem {
        slot: i32,
        inventory_slot: i32,
        auto_slot: bool,
    }
}

packet! {
    SortBank = ClientSortBank {}
}

packet! {
    BuyVendorItem = ClientBuyVendorItem {
        vendor_guid: u32,
        index: i32,
        count: i32,
    }
}

packet! {
    SellItem = ClientSellItem { vendor_guid: u32, inventory_slot: i32 }
}

packet! {
    Buyback = ClientBuyback { vendor_guid: u32, buyback_slot: i32 }
}

packet! {
    OpenTradeWith = ClientOpenTradeWith { target_guid: u32 }
}

packet! {
    TradeAddItem = ClientTradeAddItem { inventory_slot: i32 }
}

packet! {
    TradeRemoveItem = ClientTradeRemoveItem { item_guid: i32 }
}

packet! {
    TradeSetGold = ClientTradeSetGold { amount: i32 }
}

packet! {
    TradeConfirm = ClientTradeConfirm {}
}

packet! {
    TradeCancel = ClientTradeCancel {}
}

packet! {
    Repair = ClientRepair { confirmed: bool }
}

packet! {
    AcceptQuest = ClientAcceptQuest { giver_guid: u32, quest_id: i32 }
}

packet! {
    CompleteQuest = ClientCompleteQuest {
        giver_guid: u32,
        quest_id: i32,
        reward_choice: i32,
    }
}

packet! {
    AbandonQuest = ClientAbandonQuest { quest_id: i32 }
}

packet! {
    ClickedGossipOption = ClientClickedGossipOption { entry: i32 }
}

packet! {
    /// `target_name` is only read for whispers.
    ChatMsg = ClientChatMsg {
        channel: ChatChannel,
        text: String,
        target_name: String,
        item: ItemId,
    }
}

packet! {
    SetIgnorePlayer = ClientSetIgnorePlayer { player_name: String, ignore: bool }
}

packet! {
    GuildCreate = ClientGuildCreate { guild_name: String }
}

packet! {
    GuildInviteMember = ClientGuildInviteMember { player_name: String }
}

packet! {
    GuildInviteResponse = ClientGuildInviteResponse { guild_id: i32, accept: bool }
}

packet! {
    GuildQuit = ClientGuildQuit {}
}

packet! {
    GuildKickMember = ClientGuildKickMember { member_guid: u32 }
}

packet! {
    GuildPromoteMember = ClientGuildPromoteMember { member_guid: u32 }
}

packet! {
    GuildDemoteMember = ClientGuildDemoteMember { member_guid: u32 }
}

packet! {
    GuildDisband = ClientGuildDisband {}
}

packet! {
    GuildMotd = ClientGuildMotd { motd: String }
}

packet! {
    GuildRosterRequest = ClientGuildRosterRequest {}
}

packet! {
    PartyInviteMember = ClientPartyInviteMember { player_name: String }
}

packet! {
    PartyInviteResponse = ClientPartyInviteResponse { accept: bool }
}

packet! {
    PartyChanges = ClientPartyChanges { change: PartyChange, target_guid: u32 }
}

packet! {
    DuelResponse = ClientDuelResponse { accept: bool }
}

packet! {
    YieldDuel = ClientYieldDuel {}
}

packet! {
    TogglePvP = ClientTogglePvP { enabled: bool }
}

packet! {
    UpdateArenaStatus = ClientUpdateArenaStatus { enter_arena: bool }
}

packet! {
    Respec = ClientRespec { confirmed: bool }
}

packet! {
    /// Points invested per spell and per stat.
    LevelUp = ClientLevelUp {
        spell_investments: BTreeMap<i32, i32>,
        stat_investments: BTreeMap<i32, i32>,
    }
}

packet! {
    QueryWaypoints = ClientQueryWaypoints {}
}

packet! {
    ActivateWaypoint = ClientActivateWaypoint { waypoint_id: i32 }
}

packet! {
    RequestRespawn = ClientRequestRespawn {}
}

packet! {
    ResetDungeons = ClientResetDungeons {}
}

packet! {
    SocketItem = ClientSocketItem {
        target_slot: i32,
        gem_slot: i32,
        socket_index: i32,
    }
}

packet! {
    EmpowerItem = ClientEmpowerItem { target_slot: i32, material_slot: i32 }
}

packet! {
    RollDice = ClientRollDice { max_value: i32 }
}

packet! {
    ReportPlayer = ClientReportPlayer {
        target_guid: u32,
        reason: u8,
        description: String,
        player_name: String,
    }
}

packet! {
    /// Moderator command line.
    Mod = ClientMod { command: String }
}

packet! {
    RecoverMailLoot = ClientRecoverMailLoot { mail_id: i32 }
}

packet! {
    ReqTheoreticalSpell = ClientReqTheoreticalSpell { spell_id: i32, level: i32 }
}

packet! {
    SetToolbarSlot = ClientSetToolbarSlot { slot_index: i32, spell_id: i32 }
}
