pub const DEFAULT_GUIDE_LENGTH: usize = 20;

pub const DEFAULT_MAX_INDEL: usize = 5;

// Number of bases on each side of a variant searched for gained or lost PAMs
pub const WINDOW_RADIUS: usize = 10;

// Placeholder for guides that have no counterpart on one of the alleles
pub const SENTINEL_BASE: u8 = b'G';

pub const INDEX_HEADER: &[u8] = b"PAMVAR";
pub const INDEX_VERSION: u8 = 1;
