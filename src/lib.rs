mod board;
mod chess;
mod error;
mod movegen;
pub mod mylog;
mod piece;
mod position;
mod random;
pub mod rays;
mod superposition;

pub use self::board::*;
pub use self::chess::*;
pub use self::error::*;
pub use self::movegen::*;
pub use self::piece::*;
pub use self::position::*;
pub use self::random::*;
pub use self::superposition::*;
