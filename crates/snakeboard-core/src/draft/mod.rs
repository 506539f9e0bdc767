// Draft board model: player records, ranking parser, snake assignment,
// picked-state tracking, and the session that ties them together.

pub mod board;
pub mod parser;
pub mod picked;
pub mod player;
pub mod session;
