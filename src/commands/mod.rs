pub mod check;
pub mod common;
pub mod due;
pub mod labels;
pub mod log;
pub mod publish;
pub mod watch;
