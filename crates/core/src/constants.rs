/// Page size used by every server-paginated report until the user picks another.
pub const DEFAULT_PAGE_LIMIT: u32 = 10;

/// Asset type label for snapshot rows that neither carry a type nor match the asset catalog.
pub const UNKNOWN_ASSET_TYPE: &str = "Unknown";

/// Layout of the calendar-date prefix of a snapshot date string.
pub const SNAPSHOT_DATE_FORMAT: &str = "%Y-%m-%d";
