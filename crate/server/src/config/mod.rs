mod command_line;
mod params;

pub use command_line::*;
pub use params::*;
