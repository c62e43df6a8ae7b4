//! GeoJSON renderings for inspecting traces and tidying results, e.g. on geojson.io

use crate::{TidyResult, Timestamp};
use geo_types::{Coordinate, LineString, Point};
use geojson::{Feature, FeatureCollection, Geometry, Value};
use serde_json::{json, Map};
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum GeoJsonDebugError {
    #[error("node {node_id} is unknown, there are {node_count} nodes")]
    UnknownNode { node_id: usize, node_count: usize },
}

/// Converts lists of node ids into `LineString` features.
///
/// A node id is the index of the node in `node_coordinates`.
pub struct NodeIdsToLineString<'a> {
    node_coordinates: &'a [Coordinate<f64>],
}

impl<'a> NodeIdsToLineString<'a> {
    pub fn new(node_coordinates: &'a [Coordinate<f64>]) -> Self {
        Self { node_coordinates }
    }

    pub fn to_feature(&self, node_ids: &[usize]) -> Result<Feature, GeoJsonDebugError> {
        let coordinates = node_ids
            .iter()
            .map(|&node_id| {
                self.node_coordinates.get(node_id).copied().ok_or(
                    GeoJsonDebugError::UnknownNode {
                        node_id,
                        node_count: self.node_coordinates.len(),
                    },
                )
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(feature(
            Value::from(&LineString::from(coordinates)),
            Map::new(),
        ))
    }
}

fn feature(value: Value, properties: Map<String, serde_json::Value>) -> Feature {
    Feature {
        bbox: None,
        geometry: Some(Geometry::new(value)),
        id: None,
        properties: Some(properties),
        foreign_members: None,
    }
}

/// Features describing a trace and the outcome of tidying it:
///
/// * the original trace as `LineString` with `"kind": "original"`
/// * the tidied trace as `LineString` with `"kind": "tidied"`
/// * a `Point` per retained sample with `"kind": "retained"`, its timestamp and the
///   number of original samples folded into it
pub fn tidy_result_features(coordinates: &[Coordinate<f64>], result: &TidyResult) -> Vec<Feature> {
    let mut features = Vec::with_capacity(result.len() + 2);

    let mut props = Map::new();
    props.insert("kind".to_string(), json!("original"));
    props.insert("samples".to_string(), json!(coordinates.len()));
    features.push(feature(
        Value::from(&LineString::from(coordinates.to_vec())),
        props,
    ));

    let mut props = Map::new();
    props.insert("kind".to_string(), json!("tidied"));
    props.insert("samples".to_string(), json!(result.len()));
    features.push(feature(
        Value::from(&LineString::from(result.tidied_coordinates.clone())),
        props,
    ));

    let retained = result
        .tidied_coordinates
        .iter()
        .zip(result.tidied_timestamps.iter())
        .zip(result.folded_counts());
    for (tidied_index, ((coordinate, timestamp), folded)) in retained.enumerate() {
        features.push(retained_feature(*coordinate, *timestamp, tidied_index, folded));
    }
    features
}

fn retained_feature(
    coordinate: Coordinate<f64>,
    timestamp: Timestamp,
    tidied_index: usize,
    folded: usize,
) -> Feature {
    let mut props = Map::new();
    props.insert("kind".to_string(), json!("retained"));
    props.insert("index".to_string(), json!(tidied_index));
    props.insert("timestamp".to_string(), json!(timestamp));
    props.insert("folded".to_string(), json!(folded));
    feature(Value::from(&Point::from(coordinate)), props)
}

pub fn tidy_result_to_geojson(
    coordinates: &[Coordinate<f64>],
    result: &TidyResult,
) -> FeatureCollection {
    FeatureCollection {
        bbox: None,
        features: tidy_result_features(coordinates, result),
        foreign_members: None,
    }
}
