//! GeoJSON feature collections in and out.
//!
//! Peaks are `Point` features, contours are `Polygon` features. Every input
//! attribute is kept on the feature and written back out unchanged.

use crate::{Contour, ContourId, Elevation, FieldNames, Peak, ProminenceError, ProminentPeak, Result};
use geo::{Coord, LineString, Polygon};
use geojson::feature::Id;
use geojson::{Feature, FeatureCollection, GeoJson, Geometry, JsonObject, Value};
use serde_json::Value as JsonValue;
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::info;

const PEAKS: &str = "peak";
const CONTOURS: &str = "contour";

pub fn load_peaks(path: &Path, fields: &FieldNames) -> Result<Vec<Peak>> {
    info!("Loading peaks: {}", path.display());
    let collection = read_collection(path)?;
    let peaks = parse_peaks(collection, fields)?;
    info!("Loaded {} peaks", peaks.len());
    Ok(peaks)
}

pub fn load_contours(path: &Path, fields: &FieldNames) -> Result<Vec<Contour>> {
    info!("Loading contours: {}", path.display());
    let collection = read_collection(path)?;
    let contours = parse_contours(collection, fields)?;
    info!("Loaded {} contours", contours.len());
    Ok(contours)
}

pub fn parse_peaks(collection: FeatureCollection, fields: &FieldNames) -> Result<Vec<Peak>> {
    collection
        .features
        .into_iter()
        .enumerate()
        .map(|(index, feature)| {
            let properties = feature.properties.unwrap_or_default();
            let elevation = required_elevation(&properties, &fields.peak_elevation, PEAKS, index)?;
            let (x, y) = match feature.geometry.map(|g| g.value) {
                Some(Value::Point(position)) => to_xy(&position, PEAKS, index)?,
                other => return Err(unexpected_geometry("Point", other.as_ref(), PEAKS, index)),
            };
            Ok(Peak::new(index, x, y, elevation).with_properties(properties))
        })
        .collect()
}

/// Contour identifiers must be unique; a contour without one takes its load position.
pub fn parse_contours(collection: FeatureCollection, fields: &FieldNames) -> Result<Vec<Contour>> {
    let contours = collection
        .features
        .into_iter()
        .enumerate()
        .map(|(index, feature)| {
            let properties = feature.properties.unwrap_or_default();
            let elevation =
                required_elevation(&properties, &fields.contour_elevation, CONTOURS, index)?;
            let id = match properties.get(&fields.contour_id) {
                Some(value) => integral(value).ok_or_else(|| {
                    invalid(CONTOURS, index, &fields.contour_id, "expected an integer", value)
                })?,
                None => index as i64,
            };
            let polygon = match feature.geometry.map(|g| g.value) {
                Some(Value::Polygon(rings)) => to_polygon(&rings, CONTOURS, index)?,
                other => return Err(unexpected_geometry("Polygon", other.as_ref(), CONTOURS, index)),
            };

            let mut contour = Contour::new(id, elevation, polygon);
            if let Some(value) = properties.get(&fields.contour_length) {
                let length = value.as_f64().ok_or_else(|| {
                    invalid(CONTOURS, index, &fields.contour_length, "expected a number", value)
                })?;
                contour = contour.with_boundary_length(length);
            }
            Ok(contour.with_properties(properties))
        })
        .collect::<Result<Vec<_>>>()?;

    let mut first_seen: HashMap<ContourId, usize> = HashMap::new();
    for (index, contour) in contours.iter().enumerate() {
        if let Some(first) = first_seen.insert(contour.id, index) {
            return Err(ProminenceError::InvalidAttribute {
                collection: CONTOURS,
                index,
                field: fields.contour_id.clone(),
                reason: format!("identifier {} already used by contour {}", contour.id, first),
            });
        }
    }
    Ok(contours)
}

pub fn contours_to_collection(contours: &[Contour]) -> FeatureCollection {
    let features = contours
        .iter()
        .map(|contour| feature(None, polygon_value(&contour.polygon), contour.properties.clone()))
        .collect();
    collection(features)
}

pub fn peaks_to_collection(peaks: &[ProminentPeak], fields: &FieldNames) -> FeatureCollection {
    let features = peaks
        .iter()
        .map(|peak| {
            let mut properties = peak.properties.clone();
            properties.insert(fields.prominence.clone(), JsonValue::from(peak.prominence));
            properties.insert(
                fields.containing_contour.clone(),
                JsonValue::from(peak.containing_contour.0),
            );
            let position = vec![peak.location.x(), peak.location.y()];
            feature(Some(Id::Number(peak.id.into())), Value::Point(position), properties)
        })
        .collect();
    collection(features)
}

pub fn write_contours(path: &Path, contours: &[Contour]) -> Result<()> {
    write_collection(path, &contours_to_collection(contours))?;
    info!("Wrote {} working contours to {}", contours.len(), path.display());
    Ok(())
}

pub fn write_peaks(path: &Path, peaks: &[ProminentPeak], fields: &FieldNames) -> Result<()> {
    write_collection(path, &peaks_to_collection(peaks, fields))?;
    info!("Wrote {} peaks to {}", peaks.len(), path.display());
    Ok(())
}

pub fn read_collection(path: &Path) -> Result<FeatureCollection> {
    let text = std::fs::read_to_string(path)?;
    match text.parse::<GeoJson>()? {
        GeoJson::FeatureCollection(collection) => Ok(collection),
        _ => Err(ProminenceError::InvalidGeometry(format!(
            "{} is not a FeatureCollection",
            path.display()
        ))),
    }
}

fn write_collection(path: &Path, collection: &FeatureCollection) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer(&mut writer, collection)?;
    writer.flush()?;
    Ok(())
}

fn collection(features: Vec<Feature>) -> FeatureCollection {
    FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    }
}

fn feature(id: Option<Id>, value: Value, properties: JsonObject) -> Feature {
    Feature {
        bbox: None,
        geometry: Some(Geometry::new(value)),
        id,
        properties: Some(properties),
        foreign_members: None,
    }
}

fn polygon_value(polygon: &Polygon<f64>) -> Value {
    let ring = |line: &LineString<f64>| line.coords().map(|c| vec![c.x, c.y]).collect::<Vec<_>>();
    let mut rings = vec![ring(polygon.exterior())];
    rings.extend(polygon.interiors().iter().map(ring));
    Value::Polygon(rings)
}

fn required_elevation(
    properties: &JsonObject,
    field: &str,
    collection: &'static str,
    index: usize,
) -> Result<Elevation> {
    let value = properties
        .get(field)
        .ok_or_else(|| ProminenceError::MissingAttribute {
            collection,
            index,
            field: field.to_string(),
        })?;
    integral(value)
        .and_then(|v| Elevation::try_from(v).ok())
        .ok_or_else(|| invalid(collection, index, field, "expected an integral elevation", value))
}

/// Integers, or floats with no fractional part.
fn integral(value: &JsonValue) -> Option<i64> {
    if let Some(v) = value.as_i64() {
        return Some(v);
    }
    let v = value.as_f64()?;
    if v.fract() == 0.0 && v >= i64::MIN as f64 && v <= i64::MAX as f64 {
        Some(v as i64)
    } else {
        None
    }
}

fn to_xy(position: &[f64], collection: &'static str, index: usize) -> Result<(f64, f64)> {
    match position {
        [x, y, ..] => Ok((*x, *y)),
        _ => Err(ProminenceError::InvalidGeometry(format!(
            "{} feature {}: position needs two coordinates",
            collection, index
        ))),
    }
}

fn to_polygon(rings: &[Vec<Vec<f64>>], collection: &'static str, index: usize) -> Result<Polygon<f64>> {
    let mut lines = rings
        .iter()
        .map(|ring| {
            ring.iter()
                .map(|position| to_xy(position, collection, index).map(|(x, y)| Coord { x, y }))
                .collect::<Result<Vec<_>>>()
                .map(LineString::new)
        })
        .collect::<Result<Vec<_>>>()?;

    if lines.is_empty() {
        return Err(ProminenceError::InvalidGeometry(format!(
            "{} feature {}: polygon has no rings",
            collection, index
        )));
    }
    let exterior = lines.remove(0);
    Ok(Polygon::new(exterior, lines))
}

fn unexpected_geometry(
    expected: &str,
    found: Option<&Value>,
    collection: &'static str,
    index: usize,
) -> ProminenceError {
    let found = match found {
        Some(Value::Point(_)) => "Point",
        Some(Value::MultiPoint(_)) => "MultiPoint",
        Some(Value::LineString(_)) => "LineString",
        Some(Value::MultiLineString(_)) => "MultiLineString",
        Some(Value::Polygon(_)) => "Polygon",
        Some(Value::MultiPolygon(_)) => "MultiPolygon",
        Some(Value::GeometryCollection(_)) => "GeometryCollection",
        None => "no geometry",
    };
    ProminenceError::InvalidGeometry(format!(
        "{} feature {}: expected {}, found {}",
        collection, index, expected, found
    ))
}

fn invalid(
    collection: &'static str,
    index: usize,
    field: &str,
    reason: &str,
    value: &JsonValue,
) -> ProminenceError {
    ProminenceError::InvalidAttribute {
        collection,
        index,
        field: field.to_string(),
        reason: format!("{}, got {}", reason, value),
    }
}
