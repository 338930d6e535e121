//! Turn restriction extraction from OSM relations

use geo::Polygon;
use log::{debug, info};

use super::GraphSource;
use super::overpass::OverpassResponse;
use crate::Error;
use crate::model::{Restriction, RestrictionSet};

/// Collect the restrictions described by the relations of a response.
///
/// Only relations with exactly one `via` node and at least one `from` and
/// one `to` way are used; via-way restrictions are not modeled.
pub fn osm_relations_to_restrictions(response: &OverpassResponse) -> RestrictionSet {
    response
        .relations()
        .filter_map(|relation| {
            let mut via_nodes = relation
                .members
                .iter()
                .filter(|member| member.is("via", "node"));
            let via = via_nodes.next()?;
            if via_nodes.next().is_some() {
                debug!("skipping restriction {} with several via nodes", relation.id);
                return None;
            }

            let ways = |role: &str| {
                relation
                    .members
                    .iter()
                    .filter(|member| member.is(role, "way"))
                    .map(|member| member.reference)
                    .collect::<Vec<_>>()
            };
            let (from_ways, to_ways) = (ways("from"), ways("to"));
            if from_ways.is_empty() || to_ways.is_empty() {
                return None;
            }
            Some(Restriction::new(via.reference, from_ways, to_ways))
        })
        .collect()
}

/// Fetch the turn restrictions inside a polygon.
///
/// # Errors
///
/// Returns an error if the source fails to return relations for any of the
/// areas covering the polygon.
pub fn restrictions_in_polygon(
    source: &impl GraphSource,
    polygon: &Polygon<f64>,
) -> Result<RestrictionSet, Error> {
    let mut restrictions = RestrictionSet::new();
    for area in source.restriction_areas(polygon) {
        match source.query_restrictions(&area) {
            Ok(response) => restrictions.extend(osm_relations_to_restrictions(&response)),
            Err(Error::NoData(_)) => {}
            Err(err) => return Err(err),
        }
    }
    info!(
        "found {} turn restrictions at {} nodes",
        restrictions.len(),
        restrictions.restricted_nodes().len()
    );
    Ok(restrictions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    fn response(json: serde_json::Value) -> OverpassResponse {
        serde_json::from_value(json).unwrap()
    }

    fn relation(id: i64, members: serde_json::Value) -> serde_json::Value {
        serde_json::json!({
            "type": "relation",
            "id": id,
            "members": members,
            "tags": {"type": "restriction", "restriction": "no_left_turn"}
        })
    }

    #[test]
    fn test_simple_restriction() {
        let response = response(serde_json::json!({"elements": [
            {"type": "way", "id": 1, "nodes": [10, 11]},
            relation(100, serde_json::json!([
                {"type": "way", "ref": 1, "role": "from"},
                {"type": "node", "ref": 11, "role": "via"},
                {"type": "way", "ref": 2, "role": "to"}
            ]))
        ]}));
        let restrictions = osm_relations_to_restrictions(&response);

        assert_eq!(
            restrictions.restricted_nodes().iter().copied().collect::<Vec<_>>(),
            vec![11]
        );
        assert_eq!(restrictions.restrictions(), &[Restriction::new(11, [1], [2])]);
    }

    #[test]
    fn test_same_way_u_turn_is_kept() {
        let response = response(serde_json::json!({"elements": [
            relation(100, serde_json::json!([
                {"type": "way", "ref": 1, "role": "from"},
                {"type": "node", "ref": 11, "role": "via"},
                {"type": "way", "ref": 1, "role": "to"}
            ]))
        ]}));
        let restrictions = osm_relations_to_restrictions(&response);

        assert_eq!(restrictions.len(), 1);
        let restriction = &restrictions.restrictions()[0];
        assert_eq!(restriction.from_ways, BTreeSet::from([1]));
        assert_eq!(restriction.to_ways, BTreeSet::from([1]));
    }

    #[test]
    fn test_malformed_relations_are_skipped() {
        let response = response(serde_json::json!({"elements": [
            // via is a way
            relation(100, serde_json::json!([
                {"type": "way", "ref": 1, "role": "from"},
                {"type": "way", "ref": 3, "role": "via"},
                {"type": "way", "ref": 2, "role": "to"}
            ])),
            // two via nodes
            relation(101, serde_json::json!([
                {"type": "way", "ref": 1, "role": "from"},
                {"type": "node", "ref": 11, "role": "via"},
                {"type": "node", "ref": 12, "role": "via"},
                {"type": "way", "ref": 2, "role": "to"}
            ])),
            // no to way
            relation(102, serde_json::json!([
                {"type": "way", "ref": 1, "role": "from"},
                {"type": "node", "ref": 11, "role": "via"}
            ]))
        ]}));
        assert!(osm_relations_to_restrictions(&response).is_empty());
    }
}
