//! Retailer constants and data structures for the harvest pipeline

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

// =============================================================================
// Retailer constants
// =============================================================================

/// Catalog listing for pour-over brewing methods
pub const CATALOG_URL: &str =
    "https://www.coffeedesk.pl/kawa/metoda-parzenia/przelewowe-metody-parzenia/";

/// Hides the marketing popup overlay for the whole session
pub const POPUP_SUPPRESSION_CSS: &str = "#snrs-popup-wrapper-ns {display: none !important;}";

/// "Allow all" button of the cookie consent dialog
pub const COOKIE_ACCEPT_SELECTOR: &str = "#CybotCookiebotDialogBodyLevelButtonLevelOptinAllowAll";

/// Producer multi-select dropdown
pub const PRODUCER_FILTER_SELECTOR: &str = ".filter-multi-select-manufacturer";

/// Sort order dropdown
pub const SORTING_FILTER_SELECTOR: &str = ".filter-multi-select-sorting";

/// Sort option text for ascending price
pub const SORT_PRICE_ASC_TEXT: &str = "Cena (rosnąco)";

/// Button text that opens the additional filter panel
pub const MORE_FILTERS_TEXT: &str = "Więcej filtrów";

/// Container of the additional filter panel
pub const MORE_FILTERS_CONTAINER_SELECTOR: &str = ".more-filters-container";

/// Text of the price control.
///
/// Also matches the "Ocena min." rating control; whichever comes first in
/// document order is used.
pub const PRICE_CONTROL_TEXT: &str = "Cena";

/// Upper bound input of the price range
pub const MAX_PRICE_INPUT_SELECTOR: &str = ".form-control.max-input";

/// Filter panel that holds the flavour dropdown
pub const FILTER_PANEL_SELECTOR: &str = ".filter-panel-items-container";

/// Text of the flavour-notes dropdown
pub const FLAVOUR_FILTER_TEXT: &str = "Nuty smakowe";

/// Option entries inside a multi-select dropdown
pub const OPTION_SELECTOR: &str = "li";

/// Checkbox of an option entry
pub const OPTION_INPUT_SELECTOR: &str = "input";

/// Clickable label of an option entry
pub const OPTION_LABEL_SELECTOR: &str = "label";

/// Busy indicator shown while the listing reloads
pub const LOADER_SELECTOR: &str = ".has-element-loader";

/// One product entry in the listing
pub const PRODUCT_SELECTOR: &str = ".product-box";

/// Marker rendered inside a product entry that cannot be ordered
pub const NOT_AVAILABLE_SELECTOR: &str = ".product-detail-not-available";

/// Roast date label inside a product entry
pub const ROAST_DATE_SELECTOR: &str = ".product-box__roasting-data";

/// Prefix of the roast date label text
pub const ROAST_DATE_LABEL: &str = "Data palenia:";

/// Link to the product detail page
pub const PRODUCT_LINK_SELECTOR: &str = ".product-info a";

/// Pagination control for the next results page
pub const NEXT_PAGE_SELECTOR: &str = ".page-next";

/// Upper price bound, in PLN
pub const MAX_PRICE: u32 = 80;

/// Roast dates older than this many calendar months are stale
pub const FRESHNESS_WINDOW_MONTHS: u32 = 2;

/// Output file, relative to the working directory
pub const OUTPUT_PATH: &str = "./hrefs.txt";

/// Producers selected in the producer filter
pub const PRODUCERS: &[&str] = &[
    "3FE",
    "BONANZA COFFEE",
    "BRACIA ZIÓŁKOWSCY",
    "CASINO MOCCA",
    "COFFEE PLANT",
    "COFFEELAB",
    "DAK COFFEE ROASTERS",
    "DOUBLESHOT",
    "FATHER'S COFFEE",
    "FIGA COFFEE",
    "FIVE ELEPHANT",
    "GARDELLI SPECIALITY COFFEES",
    "GOOD COFFEE",
    "HARD BEANS",
    "HAYB",
    "HERESY",
    "KAFAR",
    "KYOTO",
    "LA CABRA",
    "LYKKE",
    "MAMAM",
    "NOMAD COFFEE",
    "ONYX COFFEE LAB",
    "ROCKET BEAN",
    "SPOJKA",
    "STORY COFFEE ROASTERS",
    "THE COFFEE COLLECTIVE",
];

/// Flavour notes selected in the flavour filter
pub const FLAVOURS: &[&str] = &[
    "owoce cytrusowe",
    "owoce czerwone",
    "owoce leśne",
    "owoce suszone",
    "owoce tropikalne",
    "owoce żółte",
    "przyprawy",
    "słodkie",
];

/// Product slugs never written to the output
pub const EXCLUDED_HREF_PATTERNS: &[&str] = &["Sie-Przelewa", "Coffee-Plant-Flow-"];

// =============================================================================
// Data Structures
// =============================================================================

/// What one listing page contributed to the run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageScan {
    /// Page number (1-indexed)
    pub page_number: usize,

    /// Product entries listed on the page
    pub total: usize,

    /// Entries without the "not available" marker
    pub available: usize,

    /// Detail hrefs of available, fresh entries in listing order.
    /// `None` when the entry's link had no `href`.
    pub fresh_hrefs: Vec<Option<String>>,
}

impl PageScan {
    /// At least one listed entry could not be ordered
    #[must_use]
    pub fn has_unavailable(&self) -> bool {
        self.available < self.total
    }
}

/// Why pagination stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StopReason {
    /// The page listed an unavailable entry; the price-sorted listing has
    /// reached out-of-stock inventory
    UnavailableSeen,
    /// The next-page control is missing or disabled
    NoNextPage,
}

/// Summary of a completed run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HarvestReport {
    /// Listing pages scanned
    pub pages_visited: usize,

    /// Product entries seen across all pages
    pub products_seen: usize,

    /// Fresh hrefs collected before exclusions
    pub collected: usize,

    /// Hrefs dropped by the exclusion patterns
    pub excluded: usize,

    /// Lines written to the output file
    pub written: usize,

    /// Output file path
    pub output_path: PathBuf,

    /// Why pagination ended
    pub stop_reason: StopReason,
}
