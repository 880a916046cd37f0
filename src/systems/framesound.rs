//! Frame-triggered sound effects.
//!
//! [`frame_sound_system`] watches each animator's current frame and writes an
//! [`AudioCmd::PlaySe`] when the frame matches one of the clip's configured
//! trigger frames (see `[se.<clip>]` in
//! [`AnimatorConfig`](crate::resources::animatorconfig::AnimatorConfig)).
//! Each trigger frame fires at most once per cycle; the record resets when the
//! sequence wraps or the category changes.

use bevy_ecs::prelude::*;

use crate::components::animator::MemaoAnimator;
use crate::components::soundcursor::SoundCursor;
use crate::events::audio::AudioCmd;
use crate::resources::animatorconfig::AnimatorConfig;

/// Emit sound effects for frames reached this tick. Runs after the animator.
pub fn frame_sound_system(
    mut query: Query<(&MemaoAnimator, &mut SoundCursor)>,
    config: Res<AnimatorConfig>,
    mut audio_cmds: MessageWriter<AudioCmd>,
) {
    for (anim, mut cursor) in query.iter_mut() {
        let Some(key) = anim.key.as_ref() else {
            continue;
        };
        let index = anim.frame_index;
        let key_changed = cursor.key.as_ref() != Some(key);
        if key_changed || anim.wraps != cursor.wraps {
            cursor.fired.clear();
        }

        if let Some(sound) = config.sounds.get(key.clip()) {
            if !sound.only_manual || key.is_action() {
                let frame = (index % anim.sequence.len()) as u32 + 1;
                if sound.fires_on(frame) && cursor.fired.insert(frame) {
                    audio_cmds.write(AudioCmd::PlaySe(sound.se.clone()));
                }
            }
        }

        if key_changed {
            cursor.key = Some(key.clone());
        }
        cursor.wraps = anim.wraps;
    }
}
