use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

use crate::node::BehaviorTreeNode;

#[derive(Debug, Error)]
pub enum HydrationError {
    #[error("Malformed parameter data: {0}")]
    Malformed(#[source] serde_json::Error),

    #[error("Parameter data is not an object")]
    NotAnObject,

    #[error("Invalid parameter value: {0}")]
    InvalidValue(#[source] serde_json::Error),
}

/// Fills a freshly instantiated node from its serialized parameter blob.
///
/// Hydration is best-effort: on error the node keeps whatever fields were already applied and
/// defaults for the rest.
pub trait Hydrator {
    fn hydrate(&self, node: &mut dyn BehaviorTreeNode, blob: &[u8]) -> Result<(), HydrationError>;
}

/// Parameters stored as a JSON object keyed by field name.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonHydrator;

impl Hydrator for JsonHydrator {
    fn hydrate(&self, node: &mut dyn BehaviorTreeNode, blob: &[u8]) -> Result<(), HydrationError> {
        if blob.iter().all(u8::is_ascii_whitespace) {
            return Ok(());
        }
        let params: serde_json::Value =
            serde_json::from_slice(blob).map_err(HydrationError::Malformed)?;
        if !params.is_object() {
            return Err(HydrationError::NotAnObject);
        }
        node.load_params(&params)
            .map_err(HydrationError::InvalidValue)
    }
}

/// Overlay the fields present in `params` onto `target`, one field at a time.
///
/// Unknown keys are ignored. A field whose value does not deserialize is left unchanged and the
/// first such error is returned after every other field has been applied.
pub fn overlay_params<T>(target: &mut T, params: &serde_json::Value) -> Result<(), serde_json::Error>
where
    T: Serialize + DeserializeOwned,
{
    let Some(patch) = params.as_object() else {
        return Ok(());
    };

    let mut merged = serde_json::to_value(&*target)?;
    let mut first_err = None;
    for (key, value) in patch {
        let previous = match merged.get_mut(key.as_str()) {
            Some(slot) => std::mem::replace(slot, value.clone()),
            None => continue,
        };
        if let Err(err) = serde_json::from_value::<T>(merged.clone()) {
            if let Some(slot) = merged.get_mut(key.as_str()) {
                *slot = previous;
            }
            first_err.get_or_insert(err);
        }
    }

    *target = serde_json::from_value(merged)?;
    match first_err {
        Some(err) => Err(err),
        None => Ok(()),
    }
}
