//! Sprite hot-swap between the default renderer and the Memao animator.
//!
//! A character is animator-controlled when its graphic name ends with
//! [`MEMAO_SUFFIX`] (case-insensitive). [`memao_sprite_swap`] attaches a
//! [`MemaoAnimator`], a [`Sprite`] and a [`SoundCursor`] to newly spawned
//! matching characters, and every `swap_scan_interval` ticks rescans all
//! characters so graphic changes swap renderers in both directions.

use bevy_ecs::prelude::*;
use log::info;

use crate::components::animation::AnimationState;
use crate::components::animator::MemaoAnimator;
use crate::components::character::Character;
use crate::components::soundcursor::SoundCursor;
use crate::components::sprite::Sprite;
use crate::resources::animatorconfig::AnimatorConfig;
use crate::resources::texturestore::TextureStore;

/// Graphic name marker for Memao sheets, e.g. `teo_$(memao)`.
pub const MEMAO_SUFFIX: &str = "_$(memao)";

pub fn is_memao_graphic(name: &str) -> bool {
    !name.is_empty() && name.to_lowercase().ends_with(MEMAO_SUFFIX)
}

fn memao_sprite(graphic: &str, config: &AnimatorConfig) -> Sprite {
    Sprite::new(
        graphic,
        config.cell_width as f32,
        config.cell_height as f32,
    )
    .with_scale(config.scale(), config.crisp_pixels)
}

/// Attach or detach animator components based on the graphic name.
pub fn memao_sprite_swap(
    mut commands: Commands,
    mut query: Query<(
        Entity,
        Ref<Character>,
        Has<MemaoAnimator>,
        Has<AnimationState>,
        Option<&mut Sprite>,
    )>,
    config: Res<AnimatorConfig>,
    mut textures: ResMut<TextureStore>,
    mut ticker: Local<u32>,
) {
    *ticker += 1;
    let rescan = *ticker >= config.swap_scan_interval;
    if rescan {
        *ticker = 0;
    }

    for (entity, character, has_animator, has_state, sprite) in query.iter_mut() {
        if !rescan && !character.is_added() {
            continue;
        }
        let wants = is_memao_graphic(&character.graphic);

        if wants && !has_animator {
            textures.request(&character.graphic);
            let mut ec = commands.entity(entity);
            ec.insert((
                MemaoAnimator::new(),
                memao_sprite(&character.graphic, &config),
                SoundCursor::default(),
            ));
            if !has_state {
                ec.insert(AnimationState::default());
            }
            info!("{:?}: Memao animator attached ({})", entity, character.graphic);
        } else if wants {
            // Same renderer, different sheet.
            if let Some(mut sprite) = sprite {
                if sprite.tex_key != character.graphic {
                    textures.request(&character.graphic);
                    sprite.tex_key = character.graphic.clone();
                }
            }
        } else if has_animator {
            commands
                .entity(entity)
                .remove::<(MemaoAnimator, Sprite, SoundCursor)>();
            info!(
                "{:?}: Memao animator detached ({})",
                entity, character.graphic
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memao_suffix_is_case_insensitive() {
        assert!(is_memao_graphic("teo_$(memao)"));
        assert!(is_memao_graphic("$Teo_$(MEMAO)"));
        assert!(is_memao_graphic("!teo_$(Memao)"));
        assert!(!is_memao_graphic("teo"));
        assert!(!is_memao_graphic("teo_$(memao).png"));
        assert!(!is_memao_graphic(""));
    }
}
