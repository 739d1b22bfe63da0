use chrono_tz::Tz;

/// Reserved configuration file living next to the party files.
pub const MANIFEST_FILE: &str = "manifest.json";

/// Links to this aggregator mark a record as scraped rather than curated.
pub const SCRAPED_URL_MARKER: &str = "ra.co/";

/// Civil timezone the featured week is computed in.
pub const FEATURED_TZ: Tz = chrono_tz::Europe::Berlin;

/// Hour on Monday at which the featured view flips to the new week.
pub const FEATURED_CUTOVER_HOUR: u32 = 13;

/// Maximum number of events accepted in one submission.
pub const MAX_SUBMISSION_EVENTS: usize = 4;

/// Number of hex characters in a derived party id.
pub const STABLE_ID_LEN: usize = 8;
