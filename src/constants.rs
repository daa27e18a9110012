/// Site layout constants for the CAL-ACCESS lobbying firm registry.
/// Every URL template and index literal lives here so layout drift
/// requires one edit point.

/// Index characters the registry paginates firms under. The trailing `0`
/// is the site's catch-all page for firms with non-alphabetic names.
pub const INDEX_LETTERS: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ0";

/// Starting year of the default two-year legislative session.
pub const DEFAULT_SESSION: i32 = 2023;

/// Simultaneous in-flight fetches per crawl phase.
pub const DEFAULT_CONCURRENCY: usize = 4;

/// The registry serves empty pages to clients without a browser-like agent.
pub const USER_AGENT: &str =
    "Mozilla/5.0 (Macintosh; Intel Mac OS X x.y; rv:42.0) Gecko/20100101 Firefox/42.0";

const LISTING_URL: &str = "https://cal-access.sos.ca.gov/Lobbying/Firms/list.aspx";
const DETAIL_URL: &str = "https://cal-access.sos.ca.gov/Lobbying/Firms/Detail.aspx";

/// Listing page for one index character within a session.
pub fn listing_url(letter: char, session: i32) -> String {
    format!("{LISTING_URL}?letter={letter}&session={session}")
}

/// Financial activity view of one firm's detail page.
pub fn detail_url(id: &str, session: i32) -> String {
    format!("{DETAIL_URL}?id={id}&view=activity&session={session}")
}
