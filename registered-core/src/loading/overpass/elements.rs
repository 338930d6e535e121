//! Overpass API JSON response (`[out:json]`)

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{NodeId, WayId};

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct OverpassResponse {
    #[serde(default)]
    pub elements: Vec<Element>,
}

impl OverpassResponse {
    pub fn new(elements: Vec<Element>) -> Self {
        Self { elements }
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn nodes(&self) -> impl Iterator<Item = &OsmNode> {
        self.elements.iter().filter_map(|element| match element {
            Element::Node(node) => Some(node),
            _ => None,
        })
    }

    pub fn ways(&self) -> impl Iterator<Item = &OsmWay> {
        self.elements.iter().filter_map(|element| match element {
            Element::Way(way) => Some(way),
            _ => None,
        })
    }

    pub fn relations(&self) -> impl Iterator<Item = &OsmRelation> {
        self.elements.iter().filter_map(|element| match element {
            Element::Relation(relation) => Some(relation),
            _ => None,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Element {
    Node(OsmNode),
    Way(OsmWay),
    Relation(OsmRelation),
    /// Areas, counts and anything else we never ask for
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct OsmNode {
    pub id: NodeId,
    pub lat: f64,
    pub lon: f64,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub tags: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct OsmWay {
    pub id: WayId,
    #[serde(default)]
    pub nodes: Vec<NodeId>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub tags: BTreeMap<String, String>,
}

impl OsmWay {
    pub fn tag(&self, key: &str) -> Option<&str> {
        self.tags.get(key).map(String::as_str)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct OsmRelation {
    pub id: i64,
    #[serde(default)]
    pub members: Vec<Member>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub tags: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Member {
    #[serde(rename = "type")]
    pub member_type: String,
    #[serde(rename = "ref")]
    pub reference: i64,
    #[serde(default)]
    pub role: String,
}

impl Member {
    pub fn is(&self, role: &str, member_type: &str) -> bool {
        self.role == role && self.member_type == member_type
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_mixed_elements() {
        let response: OverpassResponse = serde_json::from_str(
            r#"{
                "version": 0.6,
                "elements": [
                    {"type": "node", "id": 1, "lat": 42.0, "lon": -71.0},
                    {"type": "way", "id": 10, "nodes": [1, 2], "tags": {"highway": "primary"}},
                    {"type": "relation", "id": 100, "members": [
                        {"type": "node", "ref": 1, "role": "via"}
                    ], "tags": {"type": "restriction"}},
                    {"type": "area", "id": 5}
                ]
            }"#,
        )
        .unwrap();

        assert_eq!(response.elements.len(), 4);
        assert_eq!(response.nodes().count(), 1);
        assert_eq!(response.ways().next().unwrap().tag("highway"), Some("primary"));
        assert!(response.relations().next().unwrap().members[0].is("via", "node"));
        assert_eq!(response.elements[3], Element::Other);
    }
}
