mod extract_command;
pub use extract_command::*;

mod lookup_command;
pub use lookup_command::*;
