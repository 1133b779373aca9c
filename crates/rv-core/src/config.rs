//! Engine tuning constants.
//!
//! One struct instead of scattered globals so hosts and tests can vary
//! anchor density, snap radius and zoom limits without touching code.

use serde::{Deserialize, Serialize};

/// Size of the printable artboard used to centre the initial viewport.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Artboard {
    pub width: f64,
    pub height: f64,
}

impl Default for Artboard {
    /// A4 landscape at 96 dpi.
    fn default() -> Self {
        Self {
            width: 1123.0,
            height: 794.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Anchors per node edge, corners included.
    pub anchor_count: usize,
    /// World-space radius within which a dragged handle snaps to an anchor.
    pub snap_distance: f64,
    pub history_capacity: usize,
    /// Minimum width/height for single resize and property edits.
    pub min_node_size: f64,
    /// Minimum width/height a node may shrink to during group resize.
    pub group_min_node_size: f64,
    pub min_font_size: f64,
    pub min_label_font_size: f64,
    pub min_scale: f64,
    pub max_scale: f64,
    pub wheel_zoom_intensity: f64,
    /// Screen-edge margin (px) in which a dragged waypoint is deleted.
    pub waypoint_delete_margin: f64,
    pub duplicate_offset: f64,
    pub artboard: Artboard,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            anchor_count: 21,
            snap_distance: 30.0,
            history_capacity: 50,
            min_node_size: 30.0,
            group_min_node_size: 10.0,
            min_font_size: 4.0,
            min_label_font_size: 8.0,
            min_scale: 0.1,
            max_scale: 5.0,
            wheel_zoom_intensity: 0.001,
            waypoint_delete_margin: 50.0,
            duplicate_offset: 30.0,
            artboard: Artboard::default(),
        }
    }
}
