/// Field names as they appear in the input and output documents.
/// The identifier keeps its external `_id` key everywhere, including error reasons.
pub const LEADS_KEY: &str = "leads";
pub const ID_FIELD: &str = "_id";
pub const EMAIL_FIELD: &str = "email";
pub const FIRST_NAME_FIELD: &str = "firstName";
pub const LAST_NAME_FIELD: &str = "lastName";
pub const ADDRESS_FIELD: &str = "address";
pub const ENTRY_DATE_FIELD: &str = "entryDate";

// Length bounds, counted in characters
pub const ID_MAX_LEN: usize = 50;
pub const NAME_MAX_LEN: usize = 50;
pub const ADDRESS_MIN_LEN: usize = 5;
pub const ADDRESS_MAX_LEN: usize = 200;

/// Canonical `entryDate` rendering, e.g. `2014-05-07T17:32:20+00:00`
pub const ENTRY_DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%:z";

// Defaults for the CLI and config file
pub const DEFAULT_CONFIG_FILE: &str = "leads_cleaner.toml";
pub const DEFAULT_LOG_FILE: &str = "processing.log";
pub const DEFAULT_LOG_FILTER: &str = "leads_cleaner=info";
