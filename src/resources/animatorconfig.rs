//! Animator configuration resource.
//!
//! Sheet geometry, playback speeds and per-clip sound effects, loaded from an
//! INI file. Missing keys keep their defaults, so an empty or absent file is a
//! valid configuration.
//!
//! # Configuration File Format
//!
//! ```ini
//! [sheet]
//! cell_width = 48
//! cell_height = 48
//! scale_percent = 200
//! crisp_pixels = true
//! x_offset = 0
//! y_offset = 8
//!
//! [fps]
//! idle = 3
//! walk = 7
//! run = 9
//! action = 8
//!
//! [animator]
//! move_hold_ticks = 6
//! idle_hold = true
//! pingpong_actions = water
//! swap_scan_interval = 20
//! row_map = ./rowmap.json
//!
//! [se.walk]
//! enabled = true
//! name = footstep
//! volume = 75
//! pitch = 100
//! pan = 0
//! frames = 2,5
//! only_manual = false
//! ```

use bevy_ecs::prelude::*;
use configparser::ini::Ini;
use log::{info, warn};
use rustc_hash::{FxHashMap, FxHashSet};
use std::path::PathBuf;

use crate::components::animation::{ActionName, AnimCategory};
use crate::components::animator::SequenceTransform;
use crate::events::audio::SoundEffect;

/// Default safe values for startup
const DEFAULT_CELL_WIDTH: u32 = 48;
const DEFAULT_CELL_HEIGHT: u32 = 48;
const DEFAULT_SCALE_PERCENT: u32 = 200;
const DEFAULT_CRISP_PIXELS: bool = true;
const DEFAULT_X_OFFSET: f32 = 0.0;
const DEFAULT_Y_OFFSET: f32 = 8.0;
const DEFAULT_IDLE_FPS: u32 = 3;
const DEFAULT_WALK_FPS: u32 = 7;
const DEFAULT_RUN_FPS: u32 = 9;
const DEFAULT_ACTION_FPS: u32 = 8;
const DEFAULT_MOVE_HOLD_TICKS: u32 = 6;
const DEFAULT_IDLE_HOLD: bool = true;
const DEFAULT_PINGPONG_ACTIONS: &str = "water";
const DEFAULT_SWAP_SCAN_INTERVAL: u32 = 20;
const DEFAULT_CONFIG_PATH: &str = "./memao.ini";

const SE_SECTION_PREFIX: &str = "se.";

/// Sound effect bound to frames of one clip.
#[derive(Debug, Clone, PartialEq)]
pub struct ClipSound {
    pub enabled: bool,
    pub se: SoundEffect,
    /// 1-based frame numbers within the clip's sequence.
    pub frames: FxHashSet<u32>,
    /// Only fire while the clip plays as a manual action.
    pub only_manual: bool,
}

impl ClipSound {
    pub fn fires_on(&self, frame: u32) -> bool {
        self.enabled && !self.se.name.is_empty() && self.frames.contains(&frame)
    }
}

/// Parse a `"2, 5"` style list of 1-based frames. Zero and junk are skipped.
pub fn parse_frame_list(raw: &str) -> FxHashSet<u32> {
    raw.split(',')
        .filter_map(|t| t.trim().parse::<u32>().ok())
        .filter(|n| *n >= 1)
        .collect()
}

/// Animator configuration resource.
#[derive(Resource, Debug, Clone)]
pub struct AnimatorConfig {
    /// Sheet cell width in pixels.
    pub cell_width: u32,
    /// Sheet cell height in pixels.
    pub cell_height: u32,
    /// Sprite scale, 100 = 1x.
    pub scale_percent: u32,
    /// Nearest-neighbour sampling and whole-pixel placement.
    pub crisp_pixels: bool,
    pub x_offset: f32,
    /// Unscaled; multiplied by the scale at runtime.
    pub y_offset: f32,
    pub idle_fps: u32,
    pub walk_fps: u32,
    pub run_fps: u32,
    pub action_fps: u32,
    /// Ticks a stopped character keeps its walk/run cycle.
    pub move_hold_ticks: u32,
    /// Repeat the first idle pose for a breathing pause.
    pub idle_hold: bool,
    /// Actions played forward then backward.
    pub pingpong_actions: Vec<ActionName>,
    /// Ticks between graphic-name rescans for sprite hot-swap.
    pub swap_scan_interval: u32,
    /// Optional row-map override JSON.
    pub row_map_path: Option<PathBuf>,
    /// Frame sound effects keyed by clip name.
    pub sounds: FxHashMap<String, ClipSound>,
    /// Path to the configuration file.
    pub config_path: PathBuf,
}

impl Default for AnimatorConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl AnimatorConfig {
    /// Create a new configuration with safe default values.
    pub fn new() -> Self {
        Self {
            cell_width: DEFAULT_CELL_WIDTH,
            cell_height: DEFAULT_CELL_HEIGHT,
            scale_percent: DEFAULT_SCALE_PERCENT,
            crisp_pixels: DEFAULT_CRISP_PIXELS,
            x_offset: DEFAULT_X_OFFSET,
            y_offset: DEFAULT_Y_OFFSET,
            idle_fps: DEFAULT_IDLE_FPS,
            walk_fps: DEFAULT_WALK_FPS,
            run_fps: DEFAULT_RUN_FPS,
            action_fps: DEFAULT_ACTION_FPS,
            move_hold_ticks: DEFAULT_MOVE_HOLD_TICKS,
            idle_hold: DEFAULT_IDLE_HOLD,
            pingpong_actions: parse_action_list(DEFAULT_PINGPONG_ACTIONS),
            swap_scan_interval: DEFAULT_SWAP_SCAN_INTERVAL,
            row_map_path: None,
            sounds: FxHashMap::default(),
            config_path: PathBuf::from(DEFAULT_CONFIG_PATH),
        }
    }

    /// Create a new configuration with a custom config file path.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: path.into(),
            ..Self::new()
        }
    }

    /// Load configuration from the INI file.
    ///
    /// Missing values retain their current (default) values.
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_from_file(&mut self) -> Result<(), String> {
        let mut config = Ini::new();
        config
            .load(&self.config_path)
            .map_err(|e| format!("Failed to load config file: {}", e))?;
        self.apply(&config);
        Ok(())
    }

    /// Load configuration from INI text.
    pub fn load_from_str(&mut self, text: &str) -> Result<(), String> {
        let mut config = Ini::new();
        config
            .read(text.to_string())
            .map_err(|e| format!("Failed to parse config: {}", e))?;
        self.apply(&config);
        Ok(())
    }

    fn apply(&mut self, config: &Ini) {
        // [sheet] section
        if let Some(w) = config.getuint("sheet", "cell_width").ok().flatten() {
            self.cell_width = saturate_u32(w).max(1);
        }
        if let Some(h) = config.getuint("sheet", "cell_height").ok().flatten() {
            self.cell_height = saturate_u32(h).max(1);
        }
        if let Some(pct) = config.getuint("sheet", "scale_percent").ok().flatten() {
            self.scale_percent = saturate_u32(pct).max(1);
        }
        if let Some(crisp) = config.getbool("sheet", "crisp_pixels").ok().flatten() {
            self.crisp_pixels = crisp;
        }
        if let Some(x) = config.getfloat("sheet", "x_offset").ok().flatten() {
            self.x_offset = x as f32;
        }
        if let Some(y) = config.getfloat("sheet", "y_offset").ok().flatten() {
            self.y_offset = y as f32;
        }

        // [fps] section
        let fps = |key: &str| config.getuint("fps", key).ok().flatten().map(|v| saturate_u32(v).clamp(1, 60));
        if let Some(v) = fps("idle") {
            self.idle_fps = v;
        }
        if let Some(v) = fps("walk") {
            self.walk_fps = v;
        }
        if let Some(v) = fps("run") {
            self.run_fps = v;
        }
        if let Some(v) = fps("action") {
            self.action_fps = v;
        }

        // [animator] section
        if let Some(t) = config.getuint("animator", "move_hold_ticks").ok().flatten() {
            self.move_hold_ticks = saturate_u32(t);
        }
        if let Some(hold) = config.getbool("animator", "idle_hold").ok().flatten() {
            self.idle_hold = hold;
        }
        if let Some(list) = config.get("animator", "pingpong_actions") {
            self.pingpong_actions = parse_action_list(&list);
        }
        if let Some(n) = config.getuint("animator", "swap_scan_interval").ok().flatten() {
            self.swap_scan_interval = saturate_u32(n).max(1);
        }
        if let Some(path) = config.get("animator", "row_map") {
            let path = path.trim();
            self.row_map_path = (!path.is_empty()).then(|| PathBuf::from(path));
        }

        // [se.<clip>] sections
        for section in config.sections() {
            let Some(clip) = section.strip_prefix(SE_SECTION_PREFIX) else {
                continue;
            };
            let sound = ClipSound {
                enabled: config.getbool(&section, "enabled").ok().flatten().unwrap_or(false),
                se: SoundEffect {
                    name: config.get(&section, "name").unwrap_or_default(),
                    volume: config
                        .getuint(&section, "volume")
                        .ok()
                        .flatten()
                        .map_or(90, |v| v.min(100) as u8),
                    pitch: config
                        .getuint(&section, "pitch")
                        .ok()
                        .flatten()
                        .map_or(100, |v| v.clamp(50, 150) as u32),
                    pan: config
                        .getint(&section, "pan")
                        .ok()
                        .flatten()
                        .map_or(0, |v| v.clamp(-100, 100) as i32),
                },
                frames: config
                    .get(&section, "frames")
                    .map(|f| parse_frame_list(&f))
                    .unwrap_or_default(),
                only_manual: config
                    .getbool(&section, "only_manual")
                    .ok()
                    .flatten()
                    .unwrap_or(false),
            };
            if sound.enabled && sound.se.name.is_empty() {
                warn!("Sound for clip '{}' is enabled but has no name", clip);
            }
            self.sounds.insert(clip.to_lowercase(), sound);
        }

        info!(
            "Loaded animator config: {}x{} cells @ {}%, fps idle={} walk={} run={} action={}, {} clip sounds",
            self.cell_width,
            self.cell_height,
            self.scale_percent,
            self.idle_fps,
            self.walk_fps,
            self.run_fps,
            self.action_fps,
            self.sounds.len()
        );
    }

    /// Save configuration to the INI file.
    ///
    /// Creates the file if it doesn't exist. Sound sections are not written.
    pub fn save_to_file(&self) -> Result<(), String> {
        let mut config = Ini::new();

        // [sheet] section
        config.set("sheet", "cell_width", Some(self.cell_width.to_string()));
        config.set("sheet", "cell_height", Some(self.cell_height.to_string()));
        config.set("sheet", "scale_percent", Some(self.scale_percent.to_string()));
        config.set("sheet", "crisp_pixels", Some(self.crisp_pixels.to_string()));
        config.set("sheet", "x_offset", Some(self.x_offset.to_string()));
        config.set("sheet", "y_offset", Some(self.y_offset.to_string()));

        // [fps] section
        config.set("fps", "idle", Some(self.idle_fps.to_string()));
        config.set("fps", "walk", Some(self.walk_fps.to_string()));
        config.set("fps", "run", Some(self.run_fps.to_string()));
        config.set("fps", "action", Some(self.action_fps.to_string()));

        // [animator] section
        config.set("animator", "move_hold_ticks", Some(self.move_hold_ticks.to_string()));
        config.set("animator", "idle_hold", Some(self.idle_hold.to_string()));
        let pingpong: Vec<&str> = self.pingpong_actions.iter().map(ActionName::as_str).collect();
        config.set("animator", "pingpong_actions", Some(pingpong.join(",")));
        config.set(
            "animator",
            "swap_scan_interval",
            Some(self.swap_scan_interval.to_string()),
        );
        if let Some(path) = &self.row_map_path {
            config.set("animator", "row_map", Some(path.display().to_string()));
        }

        config
            .write(&self.config_path)
            .map_err(|e| format!("Failed to save config file: {}", e))?;

        info!("Saved config to {:?}", self.config_path);

        Ok(())
    }

    /// Sprite scale factor.
    pub fn scale(&self) -> f32 {
        self.scale_percent as f32 / 100.0
    }

    /// Vertical pixel offset after scaling.
    pub fn scaled_y_offset(&self) -> f32 {
        self.y_offset * self.scale()
    }

    /// Playback speed for a category.
    pub fn fps_for(&self, category: &AnimCategory) -> u32 {
        match category {
            AnimCategory::Idle(_) => self.idle_fps,
            AnimCategory::Walk(_) => self.walk_fps,
            AnimCategory::Run(_) => self.run_fps,
            AnimCategory::Action(..) => self.action_fps,
        }
    }

    pub fn is_pingpong(&self, action: &ActionName) -> bool {
        self.pingpong_actions.contains(action)
    }

    /// Sequence transforms for a category: idle-hold for idle, ping-pong for
    /// the configured actions.
    pub fn transform_for(&self, category: &AnimCategory) -> SequenceTransform {
        match category {
            AnimCategory::Idle(_) => SequenceTransform {
                idle_hold: self.idle_hold,
                ping_pong: false,
            },
            AnimCategory::Action(action, _) => SequenceTransform {
                idle_hold: false,
                ping_pong: self.is_pingpong(action),
            },
            _ => SequenceTransform::default(),
        }
    }
}

// INI integers are u64; out-of-range values pin to the top instead of wrapping.
fn saturate_u32(v: u64) -> u32 {
    u32::try_from(v).unwrap_or(u32::MAX)
}

fn parse_action_list(raw: &str) -> Vec<ActionName> {
    raw.split(',').filter_map(ActionName::new).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::character::Direction;

    #[test]
    fn defaults_match_sheet_creator_layout() {
        let c = AnimatorConfig::new();
        assert_eq!((c.cell_width, c.cell_height), (48, 48));
        assert_eq!(c.scale(), 2.0);
        assert_eq!(c.scaled_y_offset(), 16.0);
        assert!(c.is_pingpong(&ActionName::canonical("water")));
        assert!(c.sounds.is_empty());
    }

    #[test]
    fn load_from_str_overrides_only_present_keys() {
        let mut c = AnimatorConfig::new();
        c.load_from_str(
            "[sheet]\ncell_width = 32\nscale_percent = 150\n\n[fps]\nwalk = 12\naction = 0\n\n[animator]\nidle_hold = false\npingpong_actions = Water, reap\n",
        )
        .unwrap();
        assert_eq!(c.cell_width, 32);
        assert_eq!(c.cell_height, 48);
        assert_eq!(c.scale(), 1.5);
        assert_eq!(c.walk_fps, 12);
        assert_eq!(c.action_fps, 1);
        assert_eq!(c.idle_fps, 3);
        assert!(!c.idle_hold);
        assert!(c.is_pingpong(&ActionName::canonical("reap")));
        assert!(c.is_pingpong(&ActionName::canonical("water")));
    }

    #[test]
    fn sound_sections_are_parsed() {
        let mut c = AnimatorConfig::new();
        c.load_from_str(
            "[se.walk]\nenabled = true\nname = step\nvolume = 75\nframes = 2, 5,x,0\n\n[se.axe_chop]\nenabled = true\nname = chop\nonly_manual = true\npan = -300\n",
        )
        .unwrap();
        let walk = &c.sounds["walk"];
        assert!(walk.fires_on(2));
        assert!(walk.fires_on(5));
        assert!(!walk.fires_on(1));
        assert_eq!(walk.frames.len(), 2);
        assert_eq!(walk.se.volume, 75);
        let chop = &c.sounds["axe_chop"];
        assert!(chop.only_manual);
        assert_eq!(chop.se.pan, -100);
        assert_eq!(chop.se.pitch, 100);
    }

    #[test]
    fn oversized_integers_saturate_instead_of_wrapping() {
        let mut c = AnimatorConfig::new();
        c.load_from_str(
            "[sheet]\ncell_width = 4294967296\n\n[fps]\nidle = 4294967297\n\n[animator]\nmove_hold_ticks = 99999999999\n",
        )
        .unwrap();
        assert_eq!(c.cell_width, u32::MAX);
        assert_eq!(c.idle_fps, 60);
        assert_eq!(c.move_hold_ticks, u32::MAX);
    }

    #[test]
    fn transform_selection_per_category() {
        let c = AnimatorConfig::new();
        assert!(c.transform_for(&AnimCategory::Idle(Direction::Down)).idle_hold);
        assert_eq!(
            c.transform_for(&AnimCategory::Walk(Direction::Down)),
            SequenceTransform::default()
        );
        let water = AnimCategory::Action(ActionName::canonical("watering"), Direction::Up);
        assert!(c.transform_for(&water).ping_pong);
        assert_eq!(c.fps_for(&water), 8);
    }
}
