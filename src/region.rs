//! Region query: cities inside an axis-aligned rectangle.

use crate::catalog::CityCatalog;
use crate::{City, Rectangle};

/// Every city whose coordinates lie inside `rect`, edges included, in
/// catalog order.
///
/// The lookup goes through the catalog's R-tree; a zero-area rectangle
/// matches only cities at exactly that point.
pub fn within<'a>(catalog: &'a CityCatalog, rect: &Rectangle) -> Vec<&'a City> {
    catalog
        .positions_within(rect)
        .into_iter()
        .filter_map(|i| catalog.get(i))
        .collect()
}

/// Linear-scan variant of [`within`], kept for cross-checking the index.
pub fn within_scan<'a>(catalog: &'a CityCatalog, rect: &Rectangle) -> Vec<&'a City> {
    catalog
        .all()
        .iter()
        .filter(|city| rect.contains(&city.position()))
        .collect()
}
