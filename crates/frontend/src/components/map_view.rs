use citymap_shared::models::CircleStyle;
use citymap_shared::scene::{MapScene, TileSpec};
use dioxus::prelude::*;

use crate::coords;

const MARKER_ICON_URL: &str = "https://unpkg.com/leaflet@1.9.4/dist/images/marker-icon.png";
const MARKER_SHADOW_URL: &str = "https://unpkg.com/leaflet@1.9.4/dist/images/marker-shadow.png";

// Leaflet default icon geometry: 25x41, tip at (12, 41); shadow 41x41
const ICON_W: f64 = 25.0;
const ICON_H: f64 = 41.0;
const ICON_ANCHOR_X: f64 = 12.0;
const SHADOW_SIZE: f64 = 41.0;

const ATTRIBUTION: &str = "© OpenStreetMap contributors";

// ---------------------------------------------------------------------------
// SVG builder
// ---------------------------------------------------------------------------

/// Build the whole map (tiles, circle, marker) as one SVG string.
///
/// The SVG uses the scene's viewport as its viewBox and is cropped with
/// `slice` so the card can be any width.
fn build_svg_content(scene: &MapScene) -> String {
    let mut svg = String::with_capacity(4096);
    let (w, h) = (scene.width, scene.height);
    svg.push_str(&format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 {w} {h}" preserveAspectRatio="xMidYMid slice" width="100%" height="100%">"#
    ));

    build_tiles(&mut svg, &scene.tiles);
    for (i, (cx, cy, r)) in coords::circle_shapes(scene).into_iter().enumerate() {
        build_circle(&mut svg, cx, cy, r, &scene.circles[i].style);
    }
    for (x, y) in coords::marker_points(scene) {
        build_marker(&mut svg, x, y);
    }

    svg.push_str("</svg>");
    svg
}

fn build_tiles(svg: &mut String, tiles: &[TileSpec]) {
    for t in tiles {
        let (url, x, y, s) = (&t.url, t.left, t.top, t.size);
        svg.push_str(&format!(
            r#"<image href="{url}" x="{x}" y="{y}" width="{s}" height="{s}" preserveAspectRatio="none"/>"#
        ));
    }
}

fn build_circle(svg: &mut String, cx: f64, cy: f64, r: f64, style: &CircleStyle) {
    let color = &style.color;
    let fill_opacity = style.fill_opacity;
    svg.push_str(&format!(
        r#"<circle cx="{cx}" cy="{cy}" r="{r}" fill="{color}" fill-opacity="{fill_opacity}" stroke="{color}" stroke-width="3" stroke-opacity="1"/>"#
    ));
}

fn build_marker(svg: &mut String, x: f64, y: f64) {
    let left = x - ICON_ANCHOR_X;
    let top = y - ICON_H;
    let shadow_top = y - SHADOW_SIZE;
    svg.push_str(r#"<g role="img"><title>Marker</title>"#);
    svg.push_str(&format!(
        r#"<image href="{MARKER_SHADOW_URL}" x="{left}" y="{shadow_top}" width="{SHADOW_SIZE}" height="{SHADOW_SIZE}"/>"#
    ));
    svg.push_str(&format!(
        r#"<image href="{MARKER_ICON_URL}" x="{left}" y="{top}" width="{ICON_W}" height="{ICON_H}"/>"#
    ));
    svg.push_str("</g>");
}

#[component]
pub fn MapView(scene: MapScene) -> Element {
    let svg_html = build_svg_content(&scene);
    let readout = coords::format_lat_lon(scene.center);

    rsx! {
        div { class: "card map-card",
            div {
                class: "map-inner",
                dangerous_inner_html: "{svg_html}",
            }
            div { class: "coord-readout",
                span { class: "coord-tag", "{readout}" }
            }
            div { class: "attribution", "{ATTRIBUTION}" }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use citymap_shared::models::Coordinates;
    use citymap_shared::scene::MapConfig;

    fn paris_scene() -> MapScene {
        MapScene::new(Coordinates::new(48.8566, 2.3522), &MapConfig::default())
    }

    #[test]
    fn test_svg_has_one_marker_and_one_circle() {
        let svg = build_svg_content(&paris_scene());
        assert_eq!(svg.matches("<circle").count(), 1);
        assert_eq!(svg.matches(MARKER_ICON_URL).count(), 1);
        assert_eq!(svg.matches(MARKER_SHADOW_URL).count(), 1);
    }

    #[test]
    fn test_svg_viewbox_matches_viewport() {
        let svg = build_svg_content(&paris_scene());
        assert!(svg.starts_with("<svg"));
        assert!(svg.contains(r#"viewBox="0 0 600 400""#));
        assert!(svg.ends_with("</svg>"));
    }

    #[test]
    fn test_circle_centered_and_styled() {
        let svg = build_svg_content(&paris_scene());
        assert!(svg.contains(r#"cx="300" cy="200""#));
        assert!(svg.contains(r#"fill="blue" fill-opacity="0.2""#));
    }

    #[test]
    fn test_tiles_drawn_before_overlays() {
        let scene = paris_scene();
        let svg = build_svg_content(&scene);
        let last_tile = svg.rfind("tile.openstreetmap.org").unwrap();
        let circle = svg.find("<circle").unwrap();
        assert!(last_tile < circle);
        assert_eq!(svg.matches("tile.openstreetmap.org").count(), scene.tiles.len());
    }

    #[test]
    fn test_marker_tip_on_point() {
        let mut svg = String::new();
        build_marker(&mut svg, 300.0, 200.0);
        // Icon is 41 tall with its tip at the bottom, 12 px in from the left
        assert!(svg.contains(r#"x="288" y="159" width="25" height="41""#));
    }

    #[test]
    fn test_same_scene_same_svg() {
        assert_eq!(
            build_svg_content(&paris_scene()),
            build_svg_content(&paris_scene())
        );
    }
}
