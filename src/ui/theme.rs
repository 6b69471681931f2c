use ratatui::style::Color;

// A small, dark palette (near-black surfaces + orange accent) with limited
// semantic colors.
//
// Keep this palette cohesive. Prefer adding new roles here instead of
// sprinkling colors through the UI.
pub const BG: Color = Color::Rgb(11, 13, 16);
pub const SURFACE: Color = Color::Rgb(17, 21, 27);
pub const BAR_BG: Color = Color::Rgb(14, 18, 24);

pub const FG: Color = Color::Rgb(229, 231, 235);
pub const MUTED: Color = Color::Rgb(156, 163, 175);
pub const DIM: Color = Color::Rgb(107, 114, 128);
pub const BORDER: Color = Color::Rgb(55, 65, 81);

pub const ACCENT: Color = Color::Rgb(255, 146, 43);
pub const ACCENT_BG: Color = Color::Rgb(42, 30, 14);

// Semantic colors (keep minimal).
pub const ERROR: Color = Color::Rgb(248, 113, 113); // soft red (launch/scan notices)
