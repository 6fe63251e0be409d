//! GeoJSON line layers used as the terminal backend's earth "textures".

use anyhow::{Context, Result};
use geojson::{GeoJson, Geometry, Value};
use std::fs;
use std::path::Path;

/// A geographic line (sequence of lon/lat coordinates)
pub type LineString = Vec<(f64, f64)>;

/// Source name that selects the coarse built-in continent outlines.
pub const BUILTIN_EARTH: &str = "builtin";

/// Read every line, polygon exterior and multi-geometry of a GeoJSON file.
pub fn load_lines(path: &Path) -> Result<Vec<LineString>> {
    let mut bytes = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    let geojson: GeoJson = simd_json::serde::from_slice(&mut bytes)
        .with_context(|| format!("parsing GeoJSON in {}", path.display()))?;

    let mut lines = Vec::new();
    collect_lines(&geojson, |line| lines.push(line));
    Ok(lines)
}

fn collect_lines<F>(geojson: &GeoJson, mut add_line: F)
where
    F: FnMut(LineString),
{
    match geojson {
        GeoJson::FeatureCollection(fc) => {
            for feature in &fc.features {
                if let Some(ref geometry) = feature.geometry {
                    collect_geometry_lines(geometry, &mut add_line);
                }
            }
        }
        GeoJson::Feature(f) => {
            if let Some(ref geometry) = f.geometry {
                collect_geometry_lines(geometry, &mut add_line);
            }
        }
        GeoJson::Geometry(geometry) => {
            collect_geometry_lines(geometry, &mut add_line);
        }
    }
}

#[inline]
fn to_line<P: AsRef<[f64]>>(coords: &[P]) -> LineString {
    coords
        .iter()
        .map(|c| c.as_ref())
        .filter(|c| c.len() >= 2)
        .map(|c| (c[0], c[1]))
        .collect()
}

fn collect_geometry_lines<F>(geometry: &Geometry, add_line: &mut F)
where
    F: FnMut(LineString),
{
    match &geometry.value {
        Value::LineString(coords) => add_line(to_line(coords)),
        Value::MultiLineString(lines) => {
            for coords in lines {
                add_line(to_line(coords));
            }
        }
        // Exterior rings only; holes are invisible at terminal resolution.
        Value::Polygon(rings) => {
            if let Some(exterior) = rings.first() {
                add_line(to_line(exterior));
            }
        }
        Value::MultiPolygon(polygons) => {
            for rings in polygons {
                if let Some(exterior) = rings.first() {
                    add_line(to_line(exterior));
                }
            }
        }
        Value::GeometryCollection(geometries) => {
            for g in geometries {
                collect_geometry_lines(g, add_line);
            }
        }
        _ => {}
    }
}

/// Simplified continent outlines for when no coastline file is available.
pub fn builtin_coastlines() -> Vec<LineString> {
    const OUTLINES: &[&[(f64, f64)]] = &[
        // North America
        &[
            (-168.0, 65.0), (-166.0, 60.0), (-141.0, 60.0), (-130.0, 55.0),
            (-125.0, 48.0), (-124.0, 40.0), (-117.0, 32.0), (-110.0, 25.0),
            (-97.0, 25.0), (-97.0, 28.0), (-82.0, 24.0), (-80.0, 25.0),
            (-81.0, 31.0), (-75.0, 35.0), (-70.0, 41.0), (-67.0, 45.0),
            (-55.0, 47.0), (-58.0, 55.0), (-64.0, 60.0), (-80.0, 63.0),
            (-95.0, 62.0), (-110.0, 68.0), (-130.0, 70.0), (-145.0, 70.0),
            (-168.0, 65.0),
        ],
        // South America
        &[
            (-80.0, 10.0), (-70.0, 5.0), (-60.0, 5.0), (-50.0, 0.0),
            (-35.0, -5.0), (-38.0, -15.0), (-40.0, -22.0), (-48.0, -25.0),
            (-55.0, -34.0), (-65.0, -42.0), (-68.0, -50.0), (-75.0, -52.0),
            (-72.0, -40.0), (-70.0, -20.0), (-80.0, -5.0), (-80.0, 10.0),
        ],
        // Europe
        &[
            (-10.0, 36.0), (0.0, 38.0), (5.0, 43.0), (15.0, 45.0),
            (20.0, 40.0), (25.0, 37.0), (30.0, 40.0), (40.0, 43.0),
            (40.0, 55.0), (30.0, 60.0), (20.0, 70.0), (10.0, 71.0),
            (5.0, 58.0), (-5.0, 58.0), (-10.0, 52.0), (-5.0, 43.0),
            (-10.0, 36.0),
        ],
        // Africa
        &[
            (-17.0, 15.0), (-17.0, 20.0), (-5.0, 35.0), (10.0, 37.0),
            (25.0, 32.0), (35.0, 30.0), (42.0, 12.0), (50.0, 12.0),
            (40.0, -5.0), (35.0, -25.0), (20.0, -35.0), (15.0, -30.0),
            (10.0, -15.0), (10.0, 0.0), (-5.0, 5.0), (-17.0, 15.0),
        ],
        // Asia
        &[
            (40.0, 43.0), (55.0, 37.0), (60.0, 25.0), (70.0, 20.0),
            (80.0, 8.0), (88.0, 22.0), (95.0, 16.0), (105.0, 10.0),
            (110.0, 20.0), (122.0, 25.0), (130.0, 35.0), (140.0, 40.0),
            (145.0, 50.0), (140.0, 55.0), (130.0, 52.0), (120.0, 40.0),
            (110.0, 45.0), (90.0, 50.0), (70.0, 55.0), (50.0, 50.0),
            (40.0, 43.0),
        ],
        // Australia
        &[
            (115.0, -20.0), (130.0, -12.0), (140.0, -12.0), (145.0, -15.0),
            (153.0, -30.0), (145.0, -38.0), (135.0, -35.0), (115.0, -35.0),
            (115.0, -20.0),
        ],
    ];

    OUTLINES.iter().map(|outline| outline.to_vec()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_lines_from_feature_collection() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        write!(
            file,
            r#"{{"type":"FeatureCollection","features":[
                {{"type":"Feature","properties":{{}},"geometry":{{"type":"LineString","coordinates":[[0,0],[10,5]]}}}},
                {{"type":"Feature","properties":{{}},"geometry":{{"type":"Polygon","coordinates":[[[1,1],[2,1],[2,2],[1,1]],[[1.2,1.2],[1.5,1.2],[1.2,1.2]]]}}}},
                {{"type":"Feature","properties":{{}},"geometry":{{"type":"Point","coordinates":[3,3]}}}}
            ]}}"#
        )
        .expect("write");

        let lines = load_lines(file.path()).expect("valid GeoJSON");
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], vec![(0.0, 0.0), (10.0, 5.0)]);
        assert_eq!(lines[1].len(), 4);
    }

    #[test]
    fn test_load_lines_reports_bad_json() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        write!(file, "not geojson").expect("write");
        assert!(load_lines(file.path()).is_err());
        assert!(load_lines(Path::new("/definitely/not/here.json")).is_err());
    }

    #[test]
    fn test_builtin_outlines_are_closed() {
        let outlines = builtin_coastlines();
        assert_eq!(outlines.len(), 6);
        for line in outlines {
            assert_eq!(line.first(), line.last());
        }
    }
}
