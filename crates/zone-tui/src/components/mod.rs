pub mod access_prompt;
pub mod header;
pub mod help_overlay;
pub mod settings_overlay;
pub mod viewer_overlay;
pub mod zone_list;
