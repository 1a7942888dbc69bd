pub mod agent;
pub mod game;
pub mod session;
pub mod turn;
