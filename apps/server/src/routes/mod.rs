pub mod difficulties;
pub mod game;
