//! Overpass QL query construction

use geo::{BoundingRect, Intersects, Polygon, Rect, coord};

/// Turn restriction relations which forbid a movement (`no_left_turn`,
/// `no_u_turn`, ...).
pub const RESTRICTION_FILTER: &str = r#"["type"="restriction"]["restriction"~"^no_"]"#;

/// Split a polygon into a grid of tiles no larger than `max_size` degrees on
/// a side. Tiles which do not touch the polygon are dropped.
pub fn polygon_tiles(polygon: &Polygon<f64>, max_size: f64) -> Vec<Polygon<f64>> {
    let Some(bounds) = polygon.bounding_rect() else {
        return Vec::new();
    };
    if max_size <= 0.0 || (bounds.width() <= max_size && bounds.height() <= max_size) {
        return vec![polygon.clone()];
    }

    let columns = tile_count(bounds.width(), max_size);
    let rows = tile_count(bounds.height(), max_size);
    #[allow(clippy::cast_precision_loss)]
    let (tile_width, tile_height) = (bounds.width() / columns as f64, bounds.height() / rows as f64);

    let mut tiles = Vec::with_capacity(columns * rows);
    for column in 0..columns {
        for row in 0..rows {
            #[allow(clippy::cast_precision_loss)]
            let min = coord! {
                x: bounds.min().x + tile_width * column as f64,
                y: bounds.min().y + tile_height * row as f64,
            };
            let tile = Rect::new(min, coord! { x: min.x + tile_width, y: min.y + tile_height });
            if tile.intersects(polygon) {
                tiles.push(tile.to_polygon());
            }
        }
    }
    tiles
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn tile_count(extent: f64, max_size: f64) -> usize {
    ((extent / max_size).ceil() as usize).max(1)
}

/// Exterior ring as Overpass `poly:` coordinates: `"lat lon lat lon ..."`.
pub fn poly_string(polygon: &Polygon<f64>) -> String {
    polygon
        .exterior()
        .coords()
        .map(|coord| format!("{:.6} {:.6}", coord.y, coord.x))
        .collect::<Vec<_>>()
        .join(" ")
}

fn settings(timeout_secs: u64) -> String {
    format!("[out:json][timeout:{timeout_secs}]")
}

/// Ways matching `filter` inside the polygon, plus the nodes they use.
pub fn ways_query(filter: &str, polygon: &Polygon<f64>, timeout_secs: u64) -> String {
    format!(
        "{};(way{filter}(poly:\"{}\");>;);out;",
        settings(timeout_secs),
        poly_string(polygon)
    )
}

/// Turn restriction relations inside the polygon.
pub fn restrictions_query(polygon: &Polygon<f64>, timeout_secs: u64) -> String {
    format!(
        "{};(relation{RESTRICTION_FILTER}(poly:\"{}\"););out;",
        settings(timeout_secs),
        poly_string(polygon)
    )
}
