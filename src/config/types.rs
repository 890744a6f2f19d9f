//! Peering document types - the on-disk YAML shape

use std::fmt;
use std::marker::PhantomData;

use indexmap::IndexMap;
use serde::de::{Deserializer, MapAccess, Visitor};
use serde::{Deserialize, Serialize};

/// A single peer entry in the YAML file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PeerEntry {
    /// VPC ID of this network zone
    #[serde(default)]
    pub vpc_id: String,

    /// AWS region; empty means the configured default region
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub region: String,

    /// IAM role ARN assumed when operating on this zone
    #[serde(default)]
    pub role_arn: String,

    /// Allow remote VPC DNS resolution across peerings requested by this zone
    #[serde(default)]
    pub dns_resolution: bool,

    /// Whether tagged subnet route tables also receive peering routes
    #[serde(default)]
    pub has_additional_routes: bool,
}

/// Top-level peering configuration document.
///
/// Both maps are `IndexMap` so iteration follows document order; generated
/// resource names are positional, so reordering entries changes the plan.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PeeringDoc {
    /// Map of peer name to its zone definition
    #[serde(default, deserialize_with = "ordered_unique")]
    pub peers: IndexMap<String, PeerEntry>,

    /// Map of source peer name to the targets it peers with
    #[serde(default, deserialize_with = "ordered_unique")]
    pub peering_matrix: IndexMap<String, Vec<String>>,
}

/// Deserialize a mapping preserving document order; duplicate keys are a
/// document error, never a silent overwrite.
fn ordered_unique<'de, D, V>(deserializer: D) -> Result<IndexMap<String, V>, D::Error>
where
    D: Deserializer<'de>,
    V: Deserialize<'de>,
{
    struct UniqueVisitor<V>(PhantomData<V>);

    impl<'de, V: Deserialize<'de>> Visitor<'de> for UniqueVisitor<V> {
        type Value = IndexMap<String, V>;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a mapping with unique keys")
        }

        fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
            let mut map = IndexMap::with_capacity(access.size_hint().unwrap_or(0));
            while let Some((key, value)) = access.next_entry::<String, V>()? {
                if map.insert(key.clone(), value).is_some() {
                    return Err(serde::de::Error::custom(format!(
                        "duplicate entry {key:?}"
                    )));
                }
            }
            Ok(map)
        }
    }

    deserializer.deserialize_map(UniqueVisitor(PhantomData))
}
