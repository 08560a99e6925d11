//! What the page draws for a given search state.
//!
//! Everything here is in viewport pixels: `(0, 0)` is the top-left of the map
//! card and the resolved city sits at its center.

use crate::geo;
use crate::models::{CircleStyle, Coordinates};
use crate::search::SearchState;

pub const DEFAULT_TILE_TEMPLATE: &str = "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png";
pub const DEFAULT_SUBDOMAINS: &str = "abc";
pub const CIRCLE_RADIUS_M: f64 = 25_000.0;

/// Zoom at which the default 600px viewport spans about 50 km at mid latitudes.
pub const DEFAULT_ZOOM: f64 = 10.5;

#[derive(Debug, Clone, PartialEq)]
pub struct MapConfig {
    pub zoom: f64,
    pub viewport_width_px: f64,
    pub viewport_height_px: f64,
    pub tile_template: String,
    pub subdomains: String,
    pub circle_radius_m: f64,
    pub circle_style: CircleStyle,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            zoom: DEFAULT_ZOOM,
            viewport_width_px: 600.0,
            viewport_height_px: 400.0,
            tile_template: DEFAULT_TILE_TEMPLATE.to_string(),
            subdomains: DEFAULT_SUBDOMAINS.to_string(),
            circle_radius_m: CIRCLE_RADIUS_M,
            circle_style: CircleStyle::default(),
        }
    }
}

/// One background tile placed in the viewport.
#[derive(Debug, Clone, PartialEq)]
pub struct TileSpec {
    pub url: String,
    pub left: f64,
    pub top: f64,
    pub size: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Circle {
    pub center: Coordinates,
    pub radius_m: f64,
    pub radius_px: f64,
    pub style: CircleStyle,
}

/// A fully laid-out map: center, zoom, tiles, one marker, one circle.
#[derive(Debug, Clone, PartialEq)]
pub struct MapScene {
    pub center: Coordinates,
    pub zoom: f64,
    pub width: f64,
    pub height: f64,
    pub tiles: Vec<TileSpec>,
    pub markers: Vec<Coordinates>,
    pub circles: Vec<Circle>,
}

impl MapScene {
    pub fn new(center: Coordinates, config: &MapConfig) -> Self {
        let radius_px = geo::meters_to_px_distance(config.circle_radius_m, center.lat, config.zoom);
        Self {
            center,
            zoom: config.zoom,
            width: config.viewport_width_px,
            height: config.viewport_height_px,
            tiles: layout_tiles(center, config),
            markers: vec![center],
            circles: vec![Circle {
                center,
                radius_m: config.circle_radius_m,
                radius_px,
                style: config.circle_style.clone(),
            }],
        }
    }

    /// Viewport pixel position of a point on the map.
    pub fn to_viewport(&self, point: Coordinates) -> (f64, f64) {
        let (cx, cy) = geo::project(self.center.lat, self.center.lon, self.zoom);
        let (px, py) = geo::project(point.lat, point.lon, self.zoom);
        (px - cx + self.width / 2.0, py - cy + self.height / 2.0)
    }
}

/// Tiles needed to cover the viewport around `center`.
///
/// Fractional zooms use the tiles of the zoom below, scaled up.
pub fn layout_tiles(center: Coordinates, config: &MapConfig) -> Vec<TileSpec> {
    let zoom = config.zoom.max(0.0);
    let tile_zoom = zoom.floor() as u8;
    let tile_px = geo::TILE_SIZE_PX * (zoom - f64::from(tile_zoom)).exp2();

    let (cx, cy) = geo::project(center.lat, center.lon, zoom);
    let left = cx - config.viewport_width_px / 2.0;
    let top = cy - config.viewport_height_px / 2.0;

    let first_col = (left / tile_px).floor() as i64;
    let last_col = ((left + config.viewport_width_px) / tile_px).floor() as i64;
    let first_row = (top / tile_px).floor() as i64;
    let last_row = ((top + config.viewport_height_px) / tile_px).floor() as i64;
    let rows = geo::tile_count(tile_zoom);

    let mut tiles = Vec::new();
    for row in first_row..=last_row {
        if row < 0 || row >= rows {
            continue;
        }
        for col in first_col..=last_col {
            let x = geo::wrap_tile_x(col, tile_zoom);
            tiles.push(TileSpec {
                url: geo::expand_tile_template(
                    &config.tile_template,
                    &config.subdomains,
                    tile_zoom,
                    x,
                    row as u32,
                ),
                left: col as f64 * tile_px - left,
                top: row as f64 * tile_px - top,
                size: tile_px,
            });
        }
    }
    tiles
}

/// What the page shows below the form.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewModel {
    pub error: Option<&'static str>,
    pub map: Option<MapScene>,
}

impl ViewModel {
    pub fn from_state(state: &SearchState, config: &MapConfig) -> Self {
        Self {
            error: state.error_message(),
            map: state.coordinates().map(|c| MapScene::new(c, config)),
        }
    }
}
