pub mod agent_panel;
pub mod app;
pub mod game_log;
pub mod home;
pub mod instructions;
pub mod play;
pub mod settings;
pub mod settings_io;
