use bevy_ecs::message::Message;

/// A sound effect request as the host audio backend understands it.
#[derive(Debug, Clone, PartialEq)]
pub struct SoundEffect {
    pub name: String,
    /// 0..=100
    pub volume: u8,
    /// 50..=150, 100 = unchanged
    pub pitch: u32,
    /// -100..=100
    pub pan: i32,
}

/// Commands sent *to* the host audio backend
#[derive(Message, Debug, Clone, PartialEq)]
pub enum AudioCmd {
    /// Frame-triggered sound effect of an animated character.
    PlaySe(SoundEffect),
}
