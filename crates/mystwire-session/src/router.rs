//! Opcode dispatch.
//!
//! A [`Router`] is an immutable `Opcode → Handler` table built once per
//! connection. Dispatch decodes the payload, applies it to the session
//! state, and reports what changed through [`Effects`]: which version
//! counters to bump and which frames to send back. The caller bumps the
//! counters only after it has released its write lock on the state.

use std::collections::HashMap;
use std::marker::PhantomData;

use mystwire_protocol::{server, Frame, Opcode, Packet, Ping};

use crate::{Category, RawPacket, SessionState};

/// Side effects of handling one frame.
#[derive(Debug, Default, PartialEq)]
pub struct Effects {
    /// Categories whose state changed.
    pub bumps: Vec<Category>,
    /// Frames to send back to the server, in order.
    pub replies: Vec<Frame>,
}

impl Effects {
    pub fn bump(&mut self, category: Category) {
        self.bumps.push(category);
    }

    pub fn reply<P: Packet>(&mut self, packet: &P) {
        self.replies.push(Frame::new(P::OPCODE.as_u16(), packet.encode()));
    }
}

/// How a decoded message changes the session.
pub trait Apply {
    fn apply(self, state: &mut SessionState, fx: &mut Effects);
}

/// A type-erased entry in the routing table.
pub trait Handler: Send + Sync {
    fn handle(&self, payload: &[u8], state: &mut SessionState, fx: &mut Effects);
}

/// Decodes `M` and applies it.
struct Route<M>(PhantomData<fn() -> M>);

impl<M: Packet + Apply> Handler for Route<M> {
    fn handle(&self, payload: &[u8], state: &mut SessionState, fx: &mut Effects) {
        M::decode(payload).apply(state, fx);
    }
}

/// Maps opcodes to handlers.
pub struct Router {
    routes: HashMap<Opcode, Box<dyn Handler>>,
}

impl Router {
    /// An empty router: every frame lands in the inspection log.
    pub fn new() -> Self {
        Self {
            routes: HashMap::new(),
        }
    }

    /// Registers `M` under its own opcode, replacing any earlier handler.
    pub fn route<M>(mut self) -> Self
    where
        M: Packet + Apply + 'static,
    {
        self.routes.insert(M::OPCODE, Box::new(Route::<M>(PhantomData)));
        self
    }

    /// Registers a custom handler for `opcode`.
    pub fn with_handler(mut self, opcode: Opcode, handler: Box<dyn Handler>) -> Self {
        self.routes.insert(opcode, handler);
        self
    }

    /// The router every connection uses: one handler per server message,
    /// plus the keepalive echo.
    pub fn standard() -> Self {
        use server::*;

        Self::new()
            .route::<Ping>()
            // account and world entry
            .route::<Validate>()
            .route::<QueuePosition>()
            .route::<CharacterList>()
            .route::<CharaCreateResult>()
            .route::<NewWorld>()
            .route::<SetController>()
            .route::<ChannelInfo>()
            .route::<ChannelChangeConfirm>()
            // entities
            .route::<Player>()
            .route::<Npc>()
            .route::<GameObject>()
            .route::<DestroyObject>()
            .route::<SetSubname>()
            .route::<UnitSpline>()
            .route::<UnitTeleport>()
            .route::<UnitOrientation>()
            .route::<ObjectVariable>()
            // combat
            .route::<CastStart>()
            .route::<CastStop>()
            .route::<SpellGo>()
            .route::<CombatMsg>()
            .route::<UnitAuras>()
            .route::<Cooldown>()
            .route::<AggroMob>()
            // items
            .route::<Inventory>()
            .route::<Bank>()
            .route::<OpenBank>()
            .route::<EquipItem>()
            .route::<NotifyItemAdd>()
            .route::<OpenLootWindow>()
            .route::<OnObjectWasLooted>()
            .route::<UpdateVendorStock>()
            .route::<RepairCost>()
            .route::<SocketResult>()
            .route::<EmpowerResult>()
            // spells and progression
            .route::<Spellbook>()
            .route::<SpellbookUpdate>()
            .route::<LearnedSpell>()
            .route::<ExpNotify>()
            .route::<LvlResponse>()
            .route::<SpentGold>()
            .route::<PromptRespec>()
            // quests
            .route::<QuestList>()
            .route::<AcceptedQuest>()
            .route::<QuestTally>()
            .route::<QuestComplete>()
            .route::<RewardedQuest>()
            .route::<AbandonQuest>()
            .route::<AvailableWorldQuests>()
            // chat and gossip
            .route::<ChatMsg>()
            .route::<ChatError>()
            .route::<GossipMenu>()
            // social
            .route::<GuildRoster>()
            .route::<GuildInvite>()
            .route::<GuildAddMember>()
            .route::<GuildRemoveMember>()
            .route::<GuildOnlineStatus>()
            .route::<GuildNotifyRoleChange>()
            .route::<PartyList>()
            .route::<OfferParty>()
            .route::<TradeUpdate>()
            .route::<TradeCanceled>()
            // world, pvp, misc
            .route::<QueryWaypointsResponse>()
            .route::<DiscoverWaypointNotify>()
            .route::<ArenaQueued>()
            .route::<ArenaReady>()
            .route::<ArenaStatus>()
            .route::<ArenaOutcome>()
            .route::<OfferDuel>()
            .route::<PkNotify>()
            .route::<WorldError>()
            .route::<InspectReveal>()
            .route::<RespawnResponse>()
            .route::<UnlockGameObj>()
            .route::<MarkNpcsOnMap>()
    }

    /// Returns `true` if `opcode` has a handler.
    pub fn handles(&self, opcode: Opcode) -> bool {
        self.routes.contains_key(&opcode)
    }

    /// Number of registered handlers.
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Handles one frame.
    ///
    /// Every frame is appended to [`SessionState::received`]. Frames without
    /// a handler, including opcodes outside the known table, also go to
    /// [`SessionState::unhandled`].
    pub fn dispatch(&self, frame: &Frame, state: &mut SessionState) -> Effects {
        let mut fx = Effects::default();
        state.record_received(RawPacket::from(frame));
        let handler = frame
            .known_opcode()
            .and_then(|opcode| self.routes.get(&opcode));

        match handler {
            Some(handler) => {
                tracing::debug!(
                    opcode = frame.opcode,
                    len = frame.payload.len(),
                    "dispatching frame"
                );
                handler.handle(&frame.payload, state, &mut fx);
            }
            None => {
                tracing::debug!(
                    opcode = frame.opcode,
                    len = frame.payload.len(),
                    "no handler, logging frame"
                );
                state.unhandled.push(RawPacket::from(frame));
                fx.bump(Category::Unhandled);
            }
        }
        fx
    }
}

impl Default for Router {
    fn default() -> Self {
        Self::standard()
    }
}
