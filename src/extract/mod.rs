//! Lot tile extraction
//!
//! This module parses raw catalog markup and extracts one record per lot
//! tile, in document order. Malformed tiles (missing title or link) are
//! skipped; the reserved sentinel tile stops extraction for the page.

use scraper::{ElementRef, Html, Selector};
use url::Url;

/// Tile title marking the catalog's not-yet-revealed placeholder.
/// A tile carrying this phrase is never a real record.
pub const SENTINEL_PHRASE: &str = "More Lots Will Be";

/// Status text confirming normal catalog exhaustion
const EXHAUSTED_PHRASE: &str = "check back soon";

/// One harvested listing.
///
/// Insertion order in the result sequence equals catalog document order.
/// Records are immutable once created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LotRecord {
    /// Lot number as displayed; empty if absent on the page
    pub lot_number: String,

    /// Lot title, always non-empty
    pub title: String,

    /// Absolute detail-page URL, resolved against the catalog base URL
    pub detail_url: String,

    /// Thumbnail image URL; empty if absent
    pub image_url: String,

    /// Current bid as display text; not parsed, format is locale-dependent
    pub current_bid: String,
}

/// Everything extracted from one page's markup
#[derive(Debug, Default)]
pub struct PageExtract {
    /// Records in document order
    pub lots: Vec<LotRecord>,

    /// Number of tile fragments found on the page, sentinel included
    pub tile_count: usize,

    /// Whether the sentinel tile was seen (stops the walk)
    pub sentinel_seen: bool,

    /// Text of the optional catalog status fragment, if present
    pub status_message: Option<String>,
}

impl PageExtract {
    /// True when the status text confirms the catalog is exhausted
    /// rather than broken. Informational only.
    pub fn status_confirms_exhaustion(&self) -> bool {
        self.status_message
            .as_ref()
            .map(|s| s.to_lowercase().contains(EXHAUSTED_PHRASE))
            .unwrap_or(false)
    }
}

/// CSS selectors for the catalog's tile structure
struct TileSelectors {
    tile: Selector,
    title: Selector,
    link: Selector,
    lot_number: Selector,
    image: Selector,
    bid: Selector,
    status: Selector,
}

impl TileSelectors {
    fn parse() -> Option<Self> {
        Some(Self {
            tile: Selector::parse("app-lot-tile").ok()?,
            title: Selector::parse("h2.lot-title").ok()?,
            link: Selector::parse("a.lot-link").ok()?,
            lot_number: Selector::parse("span.lot-number").ok()?,
            image: Selector::parse("img.lot-thumbnail").ok()?,
            bid: Selector::parse("span.d-sm-inline").ok()?,
            status: Selector::parse(".catalog-status").ok()?,
        })
    }
}

/// Parses one page of catalog markup and extracts lot records.
///
/// # Extraction rules
///
/// Per tile, in document order:
/// - Title is required; a tile without one is skipped.
/// - A title containing [`SENTINEL_PHRASE`] stops extraction for the
///   page; the sentinel tile itself produces no record.
/// - The detail link and its `href` are required; a tile without them
///   is skipped. Relative hrefs are resolved against `base_url`.
/// - Lot number, image source, and bid text are optional and default
///   to empty strings.
///
/// # Arguments
///
/// * `html` - Raw page markup
/// * `base_url` - Catalog base URL for resolving relative lot links
pub fn extract_page(html: &str, base_url: &Url) -> PageExtract {
    let Some(selectors) = TileSelectors::parse() else {
        return PageExtract::default();
    };

    let document = Html::parse_document(html);
    let mut extract = PageExtract::default();

    for tile in document.select(&selectors.tile) {
        extract.tile_count += 1;

        let Some(title) = first_text(tile, &selectors.title) else {
            tracing::debug!("Skipping tile without a title");
            continue;
        };

        if title.contains(SENTINEL_PHRASE) {
            extract.sentinel_seen = true;
            break;
        }

        let Some(href) = first_attr(tile, &selectors.link, "href") else {
            tracing::debug!("Skipping tile '{}' without a detail link", title);
            continue;
        };

        let detail_url = match base_url.join(&href) {
            Ok(url) => url.to_string(),
            Err(e) => {
                tracing::debug!("Skipping tile '{}' with unresolvable link '{}': {}", title, href, e);
                continue;
            }
        };

        extract.lots.push(LotRecord {
            lot_number: first_text(tile, &selectors.lot_number).unwrap_or_default(),
            title,
            detail_url,
            image_url: first_attr(tile, &selectors.image, "src").unwrap_or_default(),
            current_bid: first_text(tile, &selectors.bid).unwrap_or_default(),
        });
    }

    if extract.tile_count == 0 {
        extract.status_message = document
            .select(&selectors.status)
            .next()
            .map(element_text)
            .filter(|s| !s.is_empty());
    }

    extract
}

/// Trimmed text of the first matching sub-element, if any and non-empty
fn first_text(tile: ElementRef, selector: &Selector) -> Option<String> {
    tile.select(selector)
        .next()
        .map(element_text)
        .filter(|s| !s.is_empty())
}

/// Named attribute of the first matching sub-element, if present
fn first_attr(tile: ElementRef, selector: &Selector, attr: &str) -> Option<String> {
    tile.select(selector)
        .next()
        .and_then(|element| element.value().attr(attr))
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn element_text(element: ElementRef) -> String {
    element.text().collect::<String>().trim().to_string()
}
