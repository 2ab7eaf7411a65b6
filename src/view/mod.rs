pub mod board;
pub mod controls;
pub mod events;
pub mod theme;
