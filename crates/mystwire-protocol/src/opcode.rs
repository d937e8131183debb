//! The flat opcode table shared by both directions.
//!
//! Ranges are a convention, not something the wire enforces:
//!
//! ```text
//!   0        Ping (either side sends, the other echoes)
//!   100-255  server → client
//!   300-423  client → server
//! ```

use std::fmt;

use crate::ProtocolError;

/// Upper bound of the opcode space. No opcode reaches it.
pub const MAX_OPCODE: u16 = 500;

macro_rules! define_opcodes {
    ( $( $(#[$meta:meta])* $variant:ident = $id:literal; )* ) => {
        /// A known message type.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[derive(serde::Serialize, serde::Deserialize)]
        #[repr(u16)]
        pub enum Opcode {
            $( $(#[$meta])* $variant = $id, )*
        }

        impl Opcode {
            /// Every defined opcode, in ascending order.
            pub const ALL: &'static [Opcode] = &[ $( Opcode::$variant, )* ];

            /// Decodes a raw opcode. Returns `None` for unknown values.
            pub fn from_u16(value: u16) -> Option<Self> {
                match value {
                    $( $id => Some(Self::$variant), )*
                    _ => None,
                }
            }

            /// Name for logs.
            pub fn name(self) -> &'static str {
                match self {
                    $( Self::$variant => stringify!($variant), )*
                }
            }
        }
    };
}

define_opcodes! {
    Ping = 0;

    // Session
    ServerValidate = 100;
    ServerQueuePosition = 101;
    ServerCharacterList = 102;
    ServerCharaCreateResult = 103;
    ServerNewWorld = 104;
    ServerSetController = 105;
    ServerChannelInfo = 106;
    ServerChannelChangeConfirm = 107;

    // Entities
    ServerPlayer = 110;
    ServerNpc = 111;
    ServerGameObject = 112;
    ServerDestroyObject = 113;
    ServerSetSubname = 114;
    ServerUnitSpline = 120;
    ServerUnitTeleport = 121;
    ServerUnitOrientation = 122;

    // Combat
    ServerCastStart = 130;
    ServerCastStop = 131;
    ServerSpellGo = 132;
    ServerCombatMsg = 133;
    ServerUnitAuras = 134;
    ServerCooldown = 135;
    ServerObjectVariable = 136;
    ServerAggroMob = 137;

    // Items
    ServerInventory = 140;
    ServerBank = 141;
    ServerOpenBank = 142;
    ServerEquipItem = 143;
    ServerNotifyItemAdd = 144;
    ServerOpenLootWindow = 145;
    ServerOnObjectWasLooted = 146;
    ServerUpdateVendorStock = 147;
    ServerRepairCost = 148;
    ServerSocketResult = 149;
    ServerEmpowerResult = 150;

    // Spells and progression
    ServerSpellbook = 160;
    ServerSpellbookUpdate = 161;
    ServerLearnedSpell = 162;
    ServerExpNotify = 170;
    ServerLvlResponse = 171;
    ServerSpentGold = 172;

    // Quests
    ServerQuestList = 180;
    ServerAcceptedQuest = 181;
    ServerQuestTally = 182;
    ServerQuestComplete = 183;
    ServerRewardedQuest = 184;
    ServerAbandonQuest = 185;
    ServerAvailableWorldQuests = 186;

    // Chat and gossip
    ServerChatMsg = 190;
    ServerChatError = 191;
    ServerGossipMenu = 192;

    // Social
    ServerGuildRoster = 200;
    ServerGuildInvite = 201;
    ServerGuildAddMember = 202;
    ServerGuildRemoveMember = 203;
    ServerGuildOnlineStatus = 204;
    ServerGuildNotifyRoleChange = 205;
    ServerPartyList = 210;
    ServerOfferParty = 211;
    ServerTradeUpdate = 220;
    ServerTradeCanceled = 221;

    // World
    ServerQueryWaypointsResponse = 230;
    ServerDiscoverWaypointNotify = 231;
    ServerArenaQueued = 240;
    ServerArenaReady = 241;
    ServerArenaStatus = 242;
    ServerArenaOutcome = 243;
    ServerOfferDuel = 244;
    ServerPkNotify = 245;
    ServerWorldError = 250;
    ServerInspectReveal = 251;
    ServerPromptRespec = 252;
    ServerRespawnResponse = 253;
    ServerUnlockGameObj = 254;
    ServerMarkNpcsOnMap = 255;

    // Client: account
    ClientAuthenticate = 300;
    ClientCharacterList = 301;
    ClientCharCreate = 302;
    ClientDeleteCharacter = 303;
    ClientEnterWorld = 304;

    // Client: movement and combat
    ClientRequestMove = 310;
    ClientRequestStop = 311;
    ClientCastSpell = 320;
    ClientCancelCast = 321;
    ClientSetSelected = 322;
    ClientCancelBuff = 323;

    // Client: items
    ClientEquipItem = 330;
    ClientUnequipItem = 331;
    ClientMoveItem = 332;
    ClientSplitItemStack = 333;
    ClientDestroyItem = 334;
    ClientUseItem = 335;
    ClientSortInventory = 336;
    ClientReqAbilityList = 337;
    ClientLootItem = 338;
    ClientOpenBank = 340;
    ClientMoveInventoryToBank = 341;
    ClientMoveBankToBank = 342;
    ClientUnBankItem = 343;
    ClientSortBank = 344;
    ClientBuyVendorItem = 350;
    ClientSellItem = 351;
    ClientBuyback = 352;
    ClientOpenTradeWith = 353;
    ClientTradeAddItem = 354;
    ClientTradeRemoveItem = 355;
    ClientTradeSetGold = 356;
    ClientTradeConfirm = 357;
    ClientTradeCancel = 358;
    ClientRepair = 359;

    // Client: quests and chat
    ClientAcceptQuest = 360;
    ClientCompleteQuest = 361;
    ClientAbandonQuest = 362;
    ClientClickedGossipOption = 363;
    ClientChatMsg = 370;
    ClientSetIgnorePlayer = 371;

    // Client: social
    ClientGuildCreate = 380;
    ClientGuildInviteMember = 381;
    ClientGuildInviteResponse = 382;
    ClientGuildQuit = 383;
    ClientGuildKickMember = 384;
    ClientGuildPromoteMember = 385;
    ClientGuildDemoteMember = 386;
    ClientGuildDisband = 387;
    ClientGuildMotd = 388;
    ClientGuildRosterRequest = 389;
    ClientPartyInviteMember = 390;
    ClientPartyInviteResponse = 391;
    ClientPartyChanges = 392;
    ClientDuelResponse = 400;
    ClientYieldDuel = 401;
    ClientTogglePvP = 402;
    ClientUpdateArenaStatus = 403;

    // Client: misc
    ClientRespec = 410;
    ClientLevelUp = 411;
    ClientQueryWaypoints = 412;
    ClientActivateWaypoint = 413;
    ClientRequestRespawn = 414;
    ClientResetDungeons = 415;
    ClientSocketItem = 416;
    ClientEmpowerItem = 417;
    ClientRollDice = 418;
    ClientReportPlayer = 419;
    ClientMod = 420;
    ClientRecoverMailLoot = 421;
    ClientReqTheoreticalSpell = 422;
    ClientSetToolbarSlot = 423;
}

impl Opcode {
    pub fn as_u16(self) -> u16 {
        self as u16
    }

    /// Opcodes the server originates.
    pub fn is_server(self) -> bool {
        (100..300).contains(&self.as_u16())
    }

    /// Opcodes the client originates.
    pub fn is_client(self) -> bool {
        (300..MAX_OPCODE).contains(&self.as_u16())
    }
}

impl TryFrom<u16> for Opcode {
    type Error = ProtocolError;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        Self::from_u16(value).ok_or(ProtocolError::UnknownOpcode(value))
    }
}

impl From<Opcode> for u16 {
    fn from(op: Opcode) -> Self {
        op.as_u16()
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.name(), self.as_u16())
    }
}
