mod board_table;
mod scene;

pub use board_table::BoardTable;
pub use scene::BoardScene;
