// src/constants.rs

/// Delimiter separating the elements of a serialized argument list.
pub const LIST_DELIMITER: char = ';';

/// Chunk size for reading a child's output stream.
pub const PIPE_CHUNK_SIZE: usize = 4096;

/// Poll interval while waiting on a child with an enforced timeout.
pub const WAIT_POLL_INTERVAL_MS: u64 = 50;

/// Prefix for the ephemeral capture file used by the temp-file runner.
pub const TEMP_OUTPUT_PREFIX: &str = "runcmd-out-";
