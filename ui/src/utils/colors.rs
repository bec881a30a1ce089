//! Shared color constants for the UI.

use egui::Color32;

/// Accent red for error text in the result area.
pub const COLOR_ERROR: Color32 = Color32::from_rgb(233, 69, 96);

/// Forest green for the copy confirmation.
pub const COLOR_GREEN: Color32 = Color32::from_rgb(34, 139, 34);

/// Amber for the "Failed!" copy label.
pub const COLOR_AMBER: Color32 = Color32::from_rgb(255, 193, 7);
