/// Web Mercator (slippy map) math.
///
/// World pixel space at zoom `z` is a square of `256 * 2^z` pixels with the
/// origin at the north-west corner (lon -180, lat ~85.05). Tiles are 256x256
/// and addressed by integer `(z, x, y)`.
// Tile edge in pixels
pub const TILE_SIZE_PX: f64 = 256.0;

// Ground resolution at the equator for zoom 0, in meters per pixel
pub const METERS_PER_PIXEL_Z0: f64 = 156_543.033_92;

// Mercator is undefined at the poles; clamp to the square world
pub const MAX_LATITUDE: f64 = 85.051_128_78;

/// Side of the world square in pixels at `zoom`.
pub fn world_size_px(zoom: f64) -> f64 {
    TILE_SIZE_PX * zoom.exp2()
}

/// Project lat/lon (degrees) to world pixel coordinates at `zoom`.
pub fn project(lat: f64, lon: f64, zoom: f64) -> (f64, f64) {
    let size = world_size_px(zoom);
    let lat_rad = lat.clamp(-MAX_LATITUDE, MAX_LATITUDE).to_radians();
    let x = (lon + 180.0) / 360.0 * size;
    let y = (1.0 - (lat_rad.tan() + 1.0 / lat_rad.cos()).ln() / std::f64::consts::PI) / 2.0 * size;
    (x, y)
}

/// Tile containing the given point at integer zoom `z`.
#[cfg(test)]
fn tile_index(lat: f64, lon: f64, z: u8) -> (u32, u32) {
    let (x, y) = project(lat, lon, f64::from(z));
    let n = tile_count(z);
    let tx = wrap_tile_x((x / TILE_SIZE_PX).floor() as i64, z);
    let ty = ((y / TILE_SIZE_PX).floor() as i64).clamp(0, n - 1);
    (tx, ty as u32)
}

/// Number of tiles along one axis at zoom `z`.
pub fn tile_count(z: u8) -> i64 {
    1_i64 << z.min(30)
}

/// Wrap a tile column around the antimeridian.
pub fn wrap_tile_x(x: i64, z: u8) -> u32 {
    let n = tile_count(z);
    (((x % n) + n) % n) as u32
}

/// Ground distance covered by one pixel at `lat` and `zoom`.
pub fn meters_per_pixel(lat: f64, zoom: f64) -> f64 {
    let lat = lat.clamp(-MAX_LATITUDE, MAX_LATITUDE);
    METERS_PER_PIXEL_Z0 * lat.to_radians().cos() / zoom.exp2()
}

/// Convert a ground distance to a pixel distance at `lat` and `zoom`.
pub fn meters_to_px_distance(meters: f64, lat: f64, zoom: f64) -> f64 {
    meters / meters_per_pixel(lat, zoom)
}

/// Horizontal ground span of a viewport `width_px` wide.
#[cfg(test)]
pub(crate) fn visible_span_m(lat: f64, zoom: f64, width_px: f64) -> f64 {
    meters_per_pixel(lat, zoom) * width_px
}

/// Zoom at which a viewport `width_px` wide spans `span_m` at `lat`.
#[cfg(test)]
fn zoom_for_span(span_m: f64, lat: f64, width_px: f64) -> f64 {
    let lat = lat.clamp(-MAX_LATITUDE, MAX_LATITUDE);
    (METERS_PER_PIXEL_Z0 * lat.to_radians().cos() * width_px / span_m).log2()
}

/// Fill a `{s}/{z}/{x}/{y}` tile URL template.
///
/// `{s}` picks a subdomain from `subdomains` by `(x + y) % len`, so the same
/// tile always maps to the same host.
pub fn expand_tile_template(template: &str, subdomains: &str, z: u8, x: u32, y: u32) -> String {
    let mut url = template
        .replace("{z}", &z.to_string())
        .replace("{x}", &x.to_string())
        .replace("{y}", &y.to_string());
    if url.contains("{s}") {
        let subs: Vec<char> = subdomains.chars().collect();
        let s = if subs.is_empty() {
            String::new()
        } else {
            let idx = (u64::from(x) + u64::from(y)) % subs.len() as u64;
            subs[idx as usize].to_string()
        };
        url = url.replace("{s}", &s);
    }
    url
}
