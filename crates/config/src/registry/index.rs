//! Layer resolution index: which layer answers each key.

use std::collections::BTreeSet;

use crate::layer::Layer;

/// Tuple order of resolution index entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IndexOrder {
    /// `(layer, key)`
    #[default]
    LayerFirst,
    /// `(key, layer)`
    KeyFirst,
}

/// Walk `layers` in priority order; each layer claims the keys no earlier
/// layer has claimed.
pub(super) fn build(layers: &[Box<dyn Layer>], order: IndexOrder) -> BTreeSet<(String, String)> {
    let mut claimed: BTreeSet<String> = BTreeSet::new();
    let mut index = BTreeSet::new();

    for layer in layers {
        let fresh: Vec<String> = layer
            .names()
            .into_iter()
            .filter(|key| !claimed.contains(key))
            .collect();
        for key in fresh {
            let pair = match order {
                IndexOrder::LayerFirst => (layer.name().to_string(), key.clone()),
                IndexOrder::KeyFirst => (key.clone(), layer.name().to_string()),
            };
            index.insert(pair);
            claimed.insert(key);
        }
    }

    index
}
