//! Memao animation driver.
//!
//! [`memao_animation`] runs once per tick for every character that carries a
//! [`MemaoAnimator`]. It is a Mealy-style machine: the category is re-derived
//! from the character's inputs every tick instead of following explicit
//! transition edges.
//!
//! # Tick Flow
//!
//! 1. Skip the sprite until its texture reports ready. A sheet that failed to
//!    load ends any manual action so scripts and movement are not held forever.
//! 2. Copy position, z, visibility and opacity onto the [`Sprite`].
//! 3. Smooth the moving flag with a short hold so grid steps do not flicker
//!    back to idle between tiles.
//! 4. Resolve the [`AnimCategory`]: manual action, idle, run or walk.
//! 5. When the category or its fps changed, rebuild the [`FrameSequence`]
//!    from the [`RangeTable`] and draw frame 0 right away.
//! 6. Advance the frame every `ceil(60 / fps)` ticks. A wrap to frame 0 counts
//!    a cycle and ends a non-looping manual action.
//!
//! # Related
//!
//! - [`crate::components::animator::MemaoAnimator`] – per-sprite driver state
//! - [`crate::components::animation::AnimationState`] – per-character mode
//! - [`crate::resources::rangetable::RangeTable`] – clip lookup and picking

use bevy_ecs::prelude::*;
use log::{debug, warn};

use crate::components::animation::{AnimCategory, AnimationState};
use crate::components::animator::{FrameSequence, MemaoAnimator};
use crate::components::character::{Character, Direction};
use crate::components::sprite::Sprite;
use crate::resources::animatorconfig::AnimatorConfig;
use crate::resources::rangetable::RangeTable;
use crate::resources::texturestore::{TextureStatus, TextureStore};

/// Fixed game-loop rate the fps values are measured against.
pub const TICKS_PER_SECOND: u32 = 60;

/// Ticks each frame stays on screen at `fps`.
pub fn ticks_per_frame(fps: u32) -> u32 {
    TICKS_PER_SECOND.div_ceil(fps.max(1))
}

/// Pick the category for this tick.
pub fn resolve_category(
    state: Option<&AnimationState>,
    moving: bool,
    dashing: bool,
    direction: Direction,
) -> AnimCategory {
    match state {
        Some(st) if st.is_manual() => AnimCategory::Action(st.action.clone(), st.direction),
        _ if !moving => AnimCategory::Idle(direction),
        _ if dashing => AnimCategory::Run(direction),
        _ => AnimCategory::Walk(direction),
    }
}

fn draw_current(anim: &MemaoAnimator, sprite: &mut Sprite) {
    let cell = anim.current_cell();
    sprite.set_cell(cell.row, cell.col);
}

/// Advance every Memao sprite by one tick.
///
/// Contract
/// - Reads [`Character`] inputs and the optional [`AnimationState`].
/// - Mutates [`MemaoAnimator`] playback state and the [`Sprite`] frame.
/// - On natural completion of a non-looping manual action, switches the state
///   back to auto, raises `finished` and releases the movement lock.
pub fn memao_animation(
    mut query: Query<(
        Entity,
        &mut Character,
        Option<&mut AnimationState>,
        &mut MemaoAnimator,
        &mut Sprite,
    )>,
    table: Res<RangeTable>,
    config: Res<AnimatorConfig>,
    textures: Res<TextureStore>,
) {
    for (entity, mut character, mut state, mut anim, mut sprite) in query.iter_mut() {
        match textures.status(&sprite.tex_key) {
            Some(TextureStatus::Ready { .. }) => {}
            Some(TextureStatus::Failed) => {
                if let Some(st) = state.as_mut().filter(|st| st.is_manual()) {
                    warn!(
                        "{:?}: sheet '{}' failed to load, ending action '{}'",
                        entity, sprite.tex_key, st.action
                    );
                    if st.looped {
                        st.stop();
                    } else {
                        st.complete();
                    }
                    character.movement_locked = false;
                }
                continue;
            }
            _ => continue,
        }

        sprite.x = character.screen_x.round() + config.x_offset;
        sprite.y = character.screen_y.round() + config.scaled_y_offset();
        sprite.z = character.screen_z;
        sprite.visible = !character.transparent;
        sprite.opacity = character.opacity;

        if character.moving {
            anim.move_hold = config.move_hold_ticks;
        } else if anim.move_hold > 0 {
            anim.move_hold -= 1;
        }
        let moving = character.moving || anim.move_hold > 0;

        let category = resolve_category(
            state.as_deref(),
            moving,
            character.dashing,
            character.direction,
        );
        let fps = config.fps_for(&category).max(1);

        if anim.key.as_ref() != Some(&category) || anim.fps != fps {
            let picked = table.pick(&category);
            if picked.is_empty() {
                debug!("{:?}: no frames for {}, using fallback cell", entity, category);
            }
            let sequence = FrameSequence::build(&picked, config.transform_for(&category));
            debug!(
                "{:?}: {} at {} fps ({} frames)",
                entity,
                category,
                fps,
                sequence.len()
            );
            anim.reset_to(category, fps, sequence);
            draw_current(&anim, &mut sprite);
        }

        anim.timer += 1;
        if anim.timer < ticks_per_frame(anim.fps) {
            continue;
        }
        anim.timer = 0;
        anim.frame_index = (anim.frame_index + 1) % anim.sequence.len();

        if anim.frame_index == 0 {
            anim.wraps = anim.wraps.wrapping_add(1);
            if let Some(st) = state.as_mut() {
                st.cycle_count = st.cycle_count.saturating_add(1);
                if st.is_manual() && !st.looped {
                    st.complete();
                    character.movement_locked = false;
                    debug!("{:?}: action '{}' finished", entity, st.action);
                }
            }
        }
        draw_current(&anim, &mut sprite);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::animation::ActionName;

    #[test]
    fn ticks_per_frame_rounds_up() {
        assert_eq!(ticks_per_frame(8), 8);
        assert_eq!(ticks_per_frame(7), 9);
        assert_eq!(ticks_per_frame(3), 20);
        assert_eq!(ticks_per_frame(60), 1);
        assert_eq!(ticks_per_frame(0), 60);
    }

    #[test]
    fn manual_wins_over_movement() {
        let mut st = AnimationState::default();
        st.begin(ActionName::canonical("reap"), Direction::Left, false);
        let cat = resolve_category(Some(&st), true, true, Direction::Up);
        assert_eq!(
            cat,
            AnimCategory::Action(ActionName::canonical("reap"), Direction::Left)
        );
    }

    #[test]
    fn auto_categories_from_inputs() {
        let st = AnimationState::default();
        assert_eq!(
            resolve_category(Some(&st), false, true, Direction::Up),
            AnimCategory::Idle(Direction::Up)
        );
        assert_eq!(
            resolve_category(None, true, true, Direction::Left),
            AnimCategory::Run(Direction::Left)
        );
        assert_eq!(
            resolve_category(None, true, false, Direction::Right),
            AnimCategory::Walk(Direction::Right)
        );
    }
}
