//! Sprite-sheet range table.
//!
//! The range table maps clip names such as `idleDown` or `walkUp_a` to a sheet
//! row and the list of columns that make up that clip fragment. It is compiled
//! once at startup from a row-map document and is read-only afterwards.
//!
//! # Row-map format
//!
//! ```json
//! {
//!   "rows": [
//!     { "r": 1, "entries": [
//!       { "name": "idleDown", "start": 1, "end": 4 },
//!       { "name": "idleUp",   "start": 5, "end": 8 }
//!     ]}
//!   ]
//! }
//! ```
//!
//! Rows and columns are 1-based. Sheets pack 8 columns per row, so clips longer
//! than the space left on a row are split into `_a`/`_b` halves that the
//! picker stitches back together.
//!
//! # Picking
//!
//! [`RangeTable::pick`] turns an [`AnimCategory`] into the ordered list of
//! entries to play. Missing entries never fail: actions degrade to idle, and
//! an empty result is handled by the animator.

use std::collections::BTreeMap;
use std::path::Path;

use bevy_ecs::prelude::Resource;
use log::{info, warn};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::components::animation::AnimCategory;
use crate::components::character::Direction;

/// One `{name, start, end}` entry of a row-map row.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct RowEntryData {
    pub name: String,
    pub start: u32,
    pub end: u32,
}

/// One sheet row and the clip fragments it holds.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct RowData {
    pub r: u32,
    #[serde(default)]
    pub entries: Vec<RowEntryData>,
}

/// Declarative row/column description of a sprite sheet.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct RowMapData {
    #[serde(default)]
    pub rows: Vec<RowData>,
}

/// Widest sheet row a row map may address.
pub const MAX_COLUMNS: u32 = 64;

// Built-in 24-row layout: (row, [(name, start, end)]).
const DEFAULT_ROWS: &[(u32, &[(&str, u32, u32)])] = &[
    (1, &[("idleDown", 1, 4), ("idleUp", 5, 8)]),
    (2, &[("idleLeft", 1, 4), ("idleRight", 5, 8)]),
    (3, &[("walkDown", 1, 6), ("walkUp_a", 7, 8)]),
    (4, &[("walkUp_b", 1, 4), ("walkLeft_a", 5, 8)]),
    (5, &[("walkLeft_b", 1, 2), ("walkRight", 3, 8)]),
    (6, &[("runDown", 1, 6), ("runUp_a", 7, 8)]),
    (7, &[("runUp_b", 1, 4), ("runLeft_a", 5, 8)]),
    (8, &[("runLeft_b", 1, 2), ("runRight", 3, 8)]),
    (9, &[("pickupDown", 1, 4), ("pickupUp", 5, 8)]),
    (10, &[("pickupLeft", 1, 4), ("pickupRight", 5, 8)]),
    (11, &[("pickaxeDown", 1, 4), ("pickaxeUp", 5, 8)]),
    (12, &[("pickaxeLeft", 1, 4), ("pickaxeRight", 5, 8)]),
    (13, &[("axe_chopDown", 1, 4), ("axe_chopUp", 5, 8)]),
    (14, &[("axe_chopLeft", 1, 4), ("axe_chopRight", 5, 8)]),
    (
        15,
        &[("plantDown", 1, 3), ("plantUp", 4, 6), ("plantLeft_a", 7, 8)],
    ),
    (
        16,
        &[("plantLeft_b", 1, 1), ("plantRight", 2, 4), ("waterDown", 5, 8)],
    ),
    (17, &[("waterUp", 1, 4), ("waterLeft", 5, 8)]),
    (18, &[("waterRight", 1, 4), ("reapDown", 5, 8)]),
    (19, &[("reapUp", 1, 4), ("reapLeft", 5, 8)]),
    (20, &[("reapRight", 1, 4), ("unused", 5, 8)]),
    (21, &[("hoeDown", 1, 4), ("hoeUp", 5, 8)]),
    (22, &[("hoeLeft", 1, 4), ("hoeRight", 5, 8)]),
    (23, &[("axe_strikeDown", 1, 4), ("axe_strikeUp", 5, 8)]),
    (24, &[("axe_strikeLeft", 1, 4), ("axe_strikeRight", 5, 8)]),
];

impl RowMapData {
    /// The built-in sheet layout.
    pub fn default_layout() -> Self {
        Self {
            rows: DEFAULT_ROWS
                .iter()
                .map(|(r, entries)| RowData {
                    r: *r,
                    entries: entries
                        .iter()
                        .map(|(name, start, end)| RowEntryData {
                            name: (*name).to_string(),
                            start: *start,
                            end: *end,
                        })
                        .collect(),
                })
                .collect(),
        }
    }

    /// Parse and validate a row-map JSON document.
    pub fn from_json(raw: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let data: RowMapData = serde_json::from_str(raw)?;
        data.validate()?;
        Ok(data)
    }

    /// Load a row-map JSON document from disk.
    pub fn load_from_file(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Reject 0-based, inverted or oversized ranges.
    pub fn validate(&self) -> Result<(), String> {
        for row in &self.rows {
            if row.r == 0 {
                return Err("row index must be >= 1".to_string());
            }
            for e in &row.entries {
                if e.start == 0 || e.start > e.end || e.end > MAX_COLUMNS {
                    return Err(format!(
                        "entry '{}' on row {} has invalid range {}..{}",
                        e.name, row.r, e.start, e.end
                    ));
                }
            }
        }
        Ok(())
    }
}

/// Second half marker for clips split across a row boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SplitPart {
    A,
    B,
}

/// Typed key parsed from a row-map entry name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RangeKey {
    pub clip: String,
    pub direction: Option<Direction>,
    pub part: Option<SplitPart>,
}

impl RangeKey {
    pub fn new(clip: &str, direction: Direction, part: Option<SplitPart>) -> Self {
        Self {
            clip: clip.to_lowercase(),
            direction: Some(direction),
            part,
        }
    }

    /// Split `walkUp_a` into (`walk`, Up, A). Names without a direction suffix
    /// are kept whole.
    pub fn parse(name: &str) -> Self {
        let (stem, part) = if let Some(stem) = name.strip_suffix("_a") {
            (stem, Some(SplitPart::A))
        } else if let Some(stem) = name.strip_suffix("_b") {
            (stem, Some(SplitPart::B))
        } else {
            (name, None)
        };
        for dir in Direction::ALL {
            if let Some(clip) = stem.strip_suffix(dir.suffix()) {
                if !clip.is_empty() {
                    return Self::new(clip, dir, part);
                }
            }
        }
        Self {
            clip: name.to_lowercase(),
            direction: None,
            part: None,
        }
    }
}

impl std::fmt::Display for RangeKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.clip)?;
        if let Some(dir) = self.direction {
            f.write_str(dir.suffix())?;
        }
        match self.part {
            Some(SplitPart::A) => f.write_str("_a"),
            Some(SplitPart::B) => f.write_str("_b"),
            None => Ok(()),
        }
    }
}

/// A clip fragment: one sheet row and its ascending columns.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct RangeEntry {
    pub row: u32,
    pub frames: Vec<u32>,
}

/// Entries chosen for one category, in playback order.
pub type Picked<'a> = SmallVec<[&'a RangeEntry; 2]>;

/// Compiled lookup from clip key to range entry.
#[derive(Resource, Debug, Clone, Default)]
pub struct RangeTable {
    pub entries: FxHashMap<RangeKey, RangeEntry>,
}

impl RangeTable {
    /// Expand every `start..=end` into a column list. Later duplicates win.
    pub fn compile(data: &RowMapData) -> Self {
        let mut entries = FxHashMap::default();
        for row in &data.rows {
            for e in &row.entries {
                let frames: Vec<u32> = (e.start..=e.end).collect();
                entries.insert(RangeKey::parse(&e.name), RangeEntry { row: row.r, frames });
            }
        }
        Self { entries }
    }

    pub fn with_default_layout() -> Self {
        Self::compile(&RowMapData::default_layout())
    }

    /// Compile an override document, falling back to the default layout
    /// wholesale when it is missing or malformed.
    pub fn from_override(raw: Option<&str>) -> Self {
        let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
            return Self::with_default_layout();
        };
        match RowMapData::from_json(raw) {
            Ok(data) => {
                let table = Self::compile(&data);
                info!("Row map override loaded: {} entries", table.len());
                table
            }
            Err(e) => {
                warn!("Row map override parse failed, using default layout: {}", e);
                Self::with_default_layout()
            }
        }
    }

    /// Like [`RangeTable::from_override`] but reads the document from a file.
    pub fn load(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            return Self::with_default_layout();
        };
        match RowMapData::load_from_file(path) {
            Ok(data) => {
                let table = Self::compile(&data);
                info!("Row map {:?} loaded: {} entries", path, table.len());
                table
            }
            Err(e) => {
                warn!(
                    "Failed to load row map {:?}, using default layout: {}",
                    path, e
                );
                Self::with_default_layout()
            }
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, clip: &str, direction: Direction, part: Option<SplitPart>) -> Option<&RangeEntry> {
        self.entries.get(&RangeKey::new(clip, direction, part))
    }

    /// Look up an entry by its row-map name (`walkUp_a`).
    pub fn get_by_name(&self, name: &str) -> Option<&RangeEntry> {
        self.entries.get(&RangeKey::parse(name))
    }

    /// Entries to play for `category`, in order.
    pub fn pick(&self, category: &AnimCategory) -> Picked<'_> {
        match category {
            AnimCategory::Idle(d) => self.pick_idle(*d),
            AnimCategory::Walk(d) => self.pick_locomotion("walk", *d),
            AnimCategory::Run(d) => self.pick_locomotion("run", *d),
            AnimCategory::Action(action, d) => self.pick_action(action.as_str(), *d),
        }
    }

    pub fn pick_idle(&self, direction: Direction) -> Picked<'_> {
        self.get("idle", direction, None).into_iter().collect()
    }

    /// Walk/run: Up and Left may be split across two rows.
    pub fn pick_locomotion(&self, clip: &str, direction: Direction) -> Picked<'_> {
        if matches!(direction, Direction::Up | Direction::Left) {
            let a = self.get(clip, direction, Some(SplitPart::A));
            let b = self.get(clip, direction, Some(SplitPart::B));
            if let (Some(a), Some(b)) = (a, b) {
                return smallvec::smallvec![a, b];
            }
        }
        self.get(clip, direction, None).into_iter().collect()
    }

    pub fn pick_action(&self, action: &str, direction: Direction) -> Picked<'_> {
        let action = action.to_lowercase();
        let mut out = Picked::new();
        if action == "plant" && direction == Direction::Left {
            out.extend(self.get("plant", direction, Some(SplitPart::A)));
            out.extend(self.get("plant", direction, Some(SplitPart::B)));
        }
        if out.is_empty() {
            out.extend(self.get(&action, direction, None));
        }
        if out.is_empty() {
            out = self.pick_idle(direction);
        }
        if out.is_empty() {
            out = self.first_idle();
        }
        out
    }

    fn first_idle(&self) -> Picked<'_> {
        Direction::ALL
            .iter()
            .find_map(|d| self.get("idle", *d, None))
            .into_iter()
            .collect()
    }

    /// Name-sorted view for dumping as JSON.
    pub fn to_named_map(&self) -> BTreeMap<String, &RangeEntry> {
        self.entries
            .iter()
            .map(|(key, entry)| (key.to_string(), entry))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::animation::ActionName;

    fn table(json: &str) -> RangeTable {
        RangeTable::compile(&RowMapData::from_json(json).unwrap())
    }

    #[test]
    fn compile_expands_inclusive_ascending_ranges() {
        let t = table(r#"{"rows":[{"r":3,"entries":[{"name":"walkDown","start":2,"end":6}]}]}"#);
        let e = t.get_by_name("walkDown").unwrap();
        assert_eq!(e.row, 3);
        assert_eq!(e.frames, vec![2, 3, 4, 5, 6]);
    }

    #[test]
    fn compile_single_column_range() {
        let t = table(r#"{"rows":[{"r":16,"entries":[{"name":"plantLeft_b","start":1,"end":1}]}]}"#);
        assert_eq!(t.get_by_name("plantLeft_b").unwrap().frames, vec![1]);
    }

    #[test]
    fn default_layout_covers_all_clips() {
        let t = RangeTable::with_default_layout();
        for clip in [
            "idle", "pickup", "pickaxe", "axe_chop", "water", "reap", "hoe", "axe_strike",
        ] {
            for d in Direction::ALL {
                assert!(t.get(clip, d, None).is_some(), "{clip}{}", d.suffix());
            }
        }
        assert!(t.get_by_name("walkUp_a").is_some());
        assert!(t.get_by_name("runLeft_b").is_some());
        assert!(t.get_by_name("unused").is_some());
        assert_eq!(t.get_by_name("hoeRight").unwrap().row, 22);
    }

    #[test]
    fn malformed_override_falls_back_to_default() {
        let t = RangeTable::from_override(Some("{ not json"));
        assert_eq!(t.len(), RangeTable::with_default_layout().len());
        let t = RangeTable::from_override(Some(
            r#"{"rows":[{"r":1,"entries":[{"name":"idleDown","start":4,"end":1}]}]}"#,
        ));
        assert!(t.get_by_name("axe_chopDown").is_some());
        let t = RangeTable::from_override(Some("   "));
        assert!(t.get_by_name("reapUp").is_some());
    }

    #[test]
    fn valid_override_replaces_default_wholesale() {
        let t = RangeTable::from_override(Some(
            r#"{"rows":[{"r":1,"entries":[{"name":"idleDown","start":1,"end":4}]}]}"#,
        ));
        assert_eq!(t.len(), 1);
        assert!(t.get_by_name("walkDown").is_none());
    }

    #[test]
    fn parse_key_variants() {
        assert_eq!(
            RangeKey::parse("axe_chopLeft"),
            RangeKey::new("axe_chop", Direction::Left, None)
        );
        assert_eq!(
            RangeKey::parse("walkUp_b"),
            RangeKey::new("walk", Direction::Up, Some(SplitPart::B))
        );
        let raw = RangeKey::parse("unused");
        assert_eq!(raw.direction, None);
        assert_eq!(raw.to_string(), "unused");
        assert_eq!(RangeKey::parse("runLeft_a").to_string(), "runLeft_a");
    }

    #[test]
    fn locomotion_joins_split_halves_in_order() {
        let t = RangeTable::with_default_layout();
        let up = t.pick_locomotion("walk", Direction::Up);
        assert_eq!(up.len(), 2);
        assert_eq!(up[0].row, 3);
        assert_eq!(up[1].row, 4);
        let left = t.pick_locomotion("run", Direction::Left);
        assert_eq!((left[0].row, left[1].row), (7, 8));
        assert_eq!(t.pick_locomotion("walk", Direction::Right).len(), 1);
    }

    #[test]
    fn locomotion_uses_unsuffixed_when_half_missing() {
        let t = table(
            r#"{"rows":[{"r":1,"entries":[
                {"name":"walkUp_a","start":1,"end":2},
                {"name":"walkUp","start":3,"end":8}
            ]}]}"#,
        );
        let up = t.pick_locomotion("walk", Direction::Up);
        assert_eq!(up.len(), 1);
        assert_eq!(up[0].frames, vec![3, 4, 5, 6, 7, 8]);
        assert!(t.pick_locomotion("walk", Direction::Left).is_empty());
    }

    #[test]
    fn action_plant_left_spans_two_rows() {
        let t = RangeTable::with_default_layout();
        let picked = t.pick_action("Plant", Direction::Left);
        assert_eq!(picked.len(), 2);
        assert_eq!(picked[0].frames, vec![7, 8]);
        assert_eq!(picked[1].row, 16);
    }

    #[test]
    fn action_missing_degrades_to_idle() {
        let t = RangeTable::with_default_layout();
        let picked = t.pick(&AnimCategory::Action(
            ActionName::canonical("dance"),
            Direction::Right,
        ));
        assert_eq!(picked.len(), 1);
        assert_eq!(picked[0], t.get("idle", Direction::Right, None).unwrap());
    }

    #[test]
    fn action_fallback_uses_first_available_idle() {
        let t = table(r#"{"rows":[{"r":2,"entries":[{"name":"idleLeft","start":1,"end":4}]}]}"#);
        let picked = t.pick_action("hoe", Direction::Up);
        assert_eq!(picked.len(), 1);
        assert_eq!(picked[0].row, 2);
        assert!(t.pick_idle(Direction::Up).is_empty());
        assert!(RangeTable::default().pick_action("hoe", Direction::Up).is_empty());
    }

    #[test]
    fn oversized_range_is_rejected() {
        let huge = r#"{"rows":[{"r":1,"entries":[{"name":"idleDown","start":1,"end":4000000000}]}]}"#;
        assert!(RowMapData::from_json(huge).is_err());
        let t = RangeTable::from_override(Some(huge));
        assert_eq!(t.len(), RangeTable::with_default_layout().len());
        assert_eq!(t.get_by_name("idleDown").unwrap().frames, vec![1, 2, 3, 4]);

        let widest = format!(
            r#"{{"rows":[{{"r":1,"entries":[{{"name":"idleDown","start":1,"end":{}}}]}}]}}"#,
            MAX_COLUMNS
        );
        assert!(RowMapData::from_json(&widest).is_ok());
    }

    #[test]
    fn load_reads_row_map_file_and_falls_back_when_missing() {
        let dir = std::env::temp_dir().join(format!("memao_rowmap_{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("rowmap.json");
        std::fs::write(
            &path,
            r#"{"rows":[{"r":2,"entries":[{"name":"idleUp","start":1,"end":3}]}]}"#,
        )
        .unwrap();
        let t = RangeTable::load(Some(&path));
        assert_eq!(t.len(), 1);
        assert_eq!(t.get_by_name("idleUp").unwrap().row, 2);

        let missing = RangeTable::load(Some(&dir.join("nope.json")));
        assert_eq!(missing.len(), RangeTable::with_default_layout().len());
        std::fs::remove_dir_all(&dir).ok();
    }
}
