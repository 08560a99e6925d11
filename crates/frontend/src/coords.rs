use citymap_shared::models::Coordinates;
use citymap_shared::scene::MapScene;

/// Format coordinates with hemisphere letters, e.g. `48.8566° N, 2.3522° E`.
pub fn format_lat_lon(c: Coordinates) -> String {
    let ns = if c.lat < 0.0 { 'S' } else { 'N' };
    let ew = if c.lon < 0.0 { 'W' } else { 'E' };
    format!("{:.4}° {ns}, {:.4}° {ew}", c.lat.abs(), c.lon.abs())
}

/// Viewport pixel positions of every marker in the scene.
pub fn marker_points(scene: &MapScene) -> Vec<(f64, f64)> {
    scene.markers.iter().map(|&m| scene.to_viewport(m)).collect()
}

/// Viewport center and pixel radius of every circle in the scene.
pub fn circle_shapes(scene: &MapScene) -> Vec<(f64, f64, f64)> {
    scene
        .circles
        .iter()
        .map(|c| {
            let (x, y) = scene.to_viewport(c.center);
            (x, y, c.radius_px)
        })
        .collect()
}
