/// Upstream case API used by the mobile app when no override is configured
pub const DEFAULT_CASE_API_URL: &str = "https://case-api-icfc.onrender.com";

pub const DEFAULT_UPSTREAM_USER_AGENT: &str = "forensic-case-gateway/0.1";

/// Number of characters of a report body shown in list excerpts
pub const REPORT_EXCERPT_CHARS: usize = 120;

