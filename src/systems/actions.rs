//! Script command surface for manual actions.
//!
//! The host's interpreter calls these hooks with exclusive world access while
//! executing `PlayAction` / `StopAction` commands. They mutate the target's
//! [`AnimationState`], toggle the movement lock and register blocking waits in
//! the [`WaitRegistry`]. The animation driver picks the new state up on the
//! next tick; [`poll_wait`](crate::systems::waitmode::poll_wait) resolves the
//! waits.
//!
//! # Targets
//!
//! | Argument              | Resolves to                                   |
//! |-----------------------|-----------------------------------------------|
//! | `player`              | the entity tagged [`Player`]                  |
//! | `thisEvent` / `this`  | the event running the command                 |
//! | `eventId` + id        | the event with that id (`0` matches nothing)  |
//!
//! Unknown target words and missing entities are logged and the command is
//! ignored.

use bevy_ecs::prelude::*;
use log::{info, warn};

use crate::components::animation::{ActionName, AnimationState};
use crate::components::animator::MemaoAnimator;
use crate::components::character::{Character, Direction, MapEvent, Player};
use crate::resources::waitregistry::{ActionWait, InterpreterId, WaitRegistry, WaitUntil};

/// Which character a command addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionTarget {
    Player,
    ThisEvent,
    EventId(u32),
}

impl ActionTarget {
    /// Parse the command's target word together with its event id argument.
    /// `None` for unknown words.
    pub fn parse(which: &str, event_id: u32) -> Option<Self> {
        match which.trim().to_ascii_lowercase().as_str() {
            "player" => Some(ActionTarget::Player),
            "thisevent" | "this" | "self" => Some(ActionTarget::ThisEvent),
            "eventid" | "event" => Some(ActionTarget::EventId(event_id)),
            other => {
                warn!("Unknown action target '{}', command ignored", other);
                None
            }
        }
    }
}

/// Direction argument: explicit, or the character's facing when the command runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DirectionArg {
    #[default]
    Current,
    Fixed(Direction),
}

impl DirectionArg {
    /// Accepts direction words, numpad codes (`2/4/6/8`) and `current` / `-1`.
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        if let Some(dir) = Direction::parse(raw) {
            return DirectionArg::Fixed(dir);
        }
        match raw.parse::<u8>() {
            Ok(code @ (2 | 4 | 6 | 8)) => DirectionArg::Fixed(Direction::from_numpad(code)),
            _ => DirectionArg::Current,
        }
    }
}

/// Who is executing the command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScriptContext {
    pub interpreter: InterpreterId,
    /// Event that owns the running script, if any.
    pub event_id: Option<u32>,
}

impl ScriptContext {
    pub fn new(interpreter: u32) -> Self {
        Self {
            interpreter: InterpreterId(interpreter),
            event_id: None,
        }
    }

    pub fn with_event(mut self, event_id: u32) -> Self {
        self.event_id = Some(event_id);
        self
    }
}

/// Arguments of a `PlayAction` command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayAction {
    pub target: ActionTarget,
    pub action: ActionName,
    pub direction: DirectionArg,
    pub looped: bool,
    pub wait: bool,
    /// With `looped` and `wait`, block until this many more wraps.
    pub wait_cycles: Option<u32>,
}

impl PlayAction {
    /// A non-looping, non-waiting action in the current facing. The name goes
    /// through alias resolution.
    pub fn new(target: ActionTarget, action: &str) -> Self {
        Self {
            target,
            action: ActionName::canonical(action),
            direction: DirectionArg::Current,
            looped: false,
            wait: false,
            wait_cycles: None,
        }
    }

    pub fn with_direction(mut self, direction: DirectionArg) -> Self {
        self.direction = direction;
        self
    }

    pub fn looped(mut self, looped: bool) -> Self {
        self.looped = looped;
        self
    }

    pub fn wait(mut self, wait: bool) -> Self {
        self.wait = wait;
        self
    }

    pub fn wait_cycles(mut self, cycles: u32) -> Self {
        self.wait_cycles = Some(cycles);
        self
    }

    fn wait_condition(&self, cycle_start: u32) -> Option<WaitUntil> {
        if !self.wait {
            return None;
        }
        if !self.looped {
            return Some(WaitUntil::Finished);
        }
        match self.wait_cycles {
            Some(count) if count > 0 => Some(WaitUntil::Cycles {
                start: cycle_start,
                count,
            }),
            _ => None,
        }
    }
}

fn find_event(world: &mut World, id: u32) -> Option<Entity> {
    let mut query = world.query::<(Entity, &MapEvent)>();
    query
        .iter(world)
        .find(|(_, event)| event.id == id)
        .map(|(entity, _)| entity)
}

/// Find the entity a command addresses. `None` when it does not exist.
pub fn resolve_target(world: &mut World, ctx: &ScriptContext, target: ActionTarget) -> Option<Entity> {
    match target {
        ActionTarget::Player => {
            let mut query = world.query_filtered::<Entity, With<Player>>();
            query.iter(world).next()
        }
        ActionTarget::ThisEvent => {
            let id = ctx.event_id?;
            find_event(world, id)
        }
        ActionTarget::EventId(0) => None,
        ActionTarget::EventId(id) => find_event(world, id),
    }
}

/// Start a manual action on the target.
///
/// Creates the target's [`AnimationState`] if needed, switches it to manual,
/// locks movement and, when asked, registers a wait for the calling
/// interpreter. Returns the target entity, or `None` if it could not be found.
pub fn play_action(world: &mut World, ctx: &ScriptContext, cmd: &PlayAction) -> Option<Entity> {
    let Some(entity) = resolve_target(world, ctx, cmd.target) else {
        warn!("PlayAction '{}': target {:?} not found", cmd.action, cmd.target);
        return None;
    };
    let mut entity_mut = world.get_entity_mut(entity).ok()?;
    let Some(facing) = entity_mut.get::<Character>().map(|c| c.direction) else {
        warn!("PlayAction '{}': {:?} is not a character", cmd.action, entity);
        return None;
    };
    let direction = match cmd.direction {
        DirectionArg::Current => facing,
        DirectionArg::Fixed(dir) => dir,
    };

    if !entity_mut.contains::<AnimationState>() {
        entity_mut.insert(AnimationState::default());
    }
    let cycle_start = {
        let mut state = entity_mut.get_mut::<AnimationState>()?;
        state.begin(cmd.action.clone(), direction, cmd.looped);
        state.cycle_count
    };
    if let Some(mut character) = entity_mut.get_mut::<Character>() {
        character.movement_locked = true;
    }
    // Replaying the same action restarts it from frame 0.
    if let Some(mut anim) = entity_mut.get_mut::<MemaoAnimator>() {
        anim.key = None;
    }

    if let Some(until) = cmd.wait_condition(cycle_start) {
        world
            .get_resource_or_insert_with(WaitRegistry::default)
            .register(ctx.interpreter, ActionWait { target: entity, until });
    }
    info!(
        "{:?}: play '{}' {:?} loop={} wait={}",
        entity, cmd.action, direction, cmd.looped, cmd.wait
    );
    Some(entity)
}

/// Force the target back to automatic animation and release its movement
/// lock. Waits on the target resolve at their next poll.
pub fn stop_action(world: &mut World, ctx: &ScriptContext, target: ActionTarget) -> Option<Entity> {
    let Some(entity) = resolve_target(world, ctx, target) else {
        warn!("StopAction: target {:?} not found", target);
        return None;
    };
    let mut entity_mut = world.get_entity_mut(entity).ok()?;
    if let Some(mut state) = entity_mut.get_mut::<AnimationState>() {
        state.stop();
    }
    if let Some(mut character) = entity_mut.get_mut::<Character>() {
        character.movement_locked = false;
    }
    info!("{:?}: stop action", entity);
    Some(entity)
}

/// Whether the host's movement layer must hold this character still.
pub fn is_movement_locked(world: &World, entity: Entity) -> bool {
    let manual = world
        .get::<AnimationState>(entity)
        .is_some_and(|state| state.is_manual());
    let locked = world
        .get::<Character>(entity)
        .is_some_and(|character| character.movement_locked);
    manual || locked
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_targets() {
        assert_eq!(ActionTarget::parse("Player", 3), Some(ActionTarget::Player));
        assert_eq!(ActionTarget::parse("thisEvent", 0), Some(ActionTarget::ThisEvent));
        assert_eq!(ActionTarget::parse("eventId", 7), Some(ActionTarget::EventId(7)));
        assert_eq!(ActionTarget::parse("evnt", 3), None);
        assert_eq!(ActionTarget::parse("", 3), None);
    }

    #[test]
    fn parse_direction_args() {
        assert_eq!(DirectionArg::parse("current"), DirectionArg::Current);
        assert_eq!(DirectionArg::parse("-1"), DirectionArg::Current);
        assert_eq!(DirectionArg::parse("Up"), DirectionArg::Fixed(Direction::Up));
        assert_eq!(DirectionArg::parse("4"), DirectionArg::Fixed(Direction::Left));
        assert_eq!(DirectionArg::parse("5"), DirectionArg::Current);
    }

    #[test]
    fn wait_condition_rules() {
        let cmd = PlayAction::new(ActionTarget::Player, "chop");
        assert_eq!(cmd.wait_condition(0), None);
        assert_eq!(cmd.clone().wait(true).wait_condition(2), Some(WaitUntil::Finished));
        let looping = cmd.looped(true).wait(true);
        assert_eq!(looping.wait_condition(2), None);
        assert_eq!(
            looping.wait_cycles(3).wait_condition(2),
            Some(WaitUntil::Cycles { start: 2, count: 3 })
        );
    }

    #[test]
    fn play_and_stop_toggle_lock() {
        let mut world = World::new();
        let player = world.spawn((Character::new("teo_$(memao)"), Player)).id();
        let ctx = ScriptContext::new(1);

        let cmd = PlayAction::new(ActionTarget::Player, "Chopping").wait(true);
        assert_eq!(play_action(&mut world, &ctx, &cmd), Some(player));
        let state = world.get::<AnimationState>(player).unwrap();
        assert!(state.is_manual());
        assert_eq!(state.action.as_str(), "axe_chop");
        assert!(is_movement_locked(&world, player));
        assert!(world.resource::<WaitRegistry>().is_waiting(ctx.interpreter));

        stop_action(&mut world, &ctx, ActionTarget::Player);
        assert!(!world.get::<AnimationState>(player).unwrap().is_manual());
        assert!(!is_movement_locked(&world, player));
    }

    #[test]
    fn event_zero_matches_nothing() {
        let mut world = World::new();
        let _other = world.spawn((Character::new("a"), MapEvent { id: 2 })).id();
        let me = world.spawn((Character::new("b"), MapEvent { id: 5 })).id();
        let ctx = ScriptContext::new(1).with_event(5);

        assert_eq!(resolve_target(&mut world, &ctx, ActionTarget::EventId(0)), None);
        assert_eq!(resolve_target(&mut world, &ctx, ActionTarget::EventId(5)), Some(me));
        assert_eq!(resolve_target(&mut world, &ctx, ActionTarget::ThisEvent), Some(me));
        assert_eq!(resolve_target(&mut world, &ctx, ActionTarget::EventId(9)), None);
        assert_eq!(
            resolve_target(&mut world, &ScriptContext::new(1), ActionTarget::ThisEvent),
            None
        );
    }

    #[test]
    fn missing_target_is_ignored() {
        let mut world = World::new();
        let cmd = PlayAction::new(ActionTarget::Player, "plant").wait(true);
        assert_eq!(play_action(&mut world, &ScriptContext::new(1), &cmd), None);
        assert!(world.get_resource::<WaitRegistry>().is_none());
    }

    #[test]
    fn mistyped_or_zero_event_target_leaves_player_alone() {
        let mut world = World::new();
        let player = world.spawn((Character::new("teo_$(memao)"), Player)).id();
        world.spawn((Character::new("b"), MapEvent { id: 3 }));
        let ctx = ScriptContext::new(1).with_event(3);

        assert!(ActionTarget::parse("evnt", 3).is_none());
        let cmd = PlayAction::new(ActionTarget::EventId(0), "chop").wait(true);
        assert_eq!(play_action(&mut world, &ctx, &cmd), None);
        assert!(!is_movement_locked(&world, player));
        assert!(world.get::<AnimationState>(player).is_none());
        assert!(world.get_resource::<WaitRegistry>().is_none());
    }
}
