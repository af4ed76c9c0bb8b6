use opr_core::models::Coordinate;
use serde::Serialize;

/// Maximum number of matches a search returns
pub const MAX_RESULTS: usize = 5;

/// One ranked place-search match
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeocodeResult {
    /// Full place name, e.g. "Iznart Street, Iloilo City, Iloilo, Philippines"
    pub display_name: String,
    /// Short label, e.g. "Iznart Street"
    pub short_label: String,
    pub coordinate: Coordinate,
}

impl GeocodeResult {
    pub fn new(display_name: impl Into<String>, short_label: impl Into<String>, coordinate: Coordinate) -> Self {
        Self { display_name: display_name.into(), short_label: short_label.into(), coordinate }
    }
}
