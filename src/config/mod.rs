// Configuration: command line options and board definitions

pub mod boards;
pub mod options;
