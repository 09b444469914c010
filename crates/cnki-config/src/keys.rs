//! Preference keys shared with the persisted store.

pub const USE_SPLIT: &str = "cnkiUseSplit";
pub const SPLIT_SECOND: &str = "cnkiSplitSecond";
pub const MAX_LENGTH: &str = "cnkiMaxLength";
pub const REGEX: &str = "cnkiRegex";
pub const TOKEN: &str = "cnkiToken";
