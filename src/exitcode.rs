//! Standard exit codes (BSD sysexits.h compatible)

/// Command line usage error, invalid parameters or parameter sets
pub const USAGE: i32 = 64;

/// Cannot open input (unknown environment)
pub const NOINPUT: i32 = 66;

/// Remote service unavailable or rejected the request
pub const UNAVAILABLE: i32 = 69;

/// Internal software error
pub const SOFTWARE: i32 = 70;

/// Input/output error
pub const IOERR: i32 = 74;

/// Configuration error
pub const CONFIG: i32 = 78;
