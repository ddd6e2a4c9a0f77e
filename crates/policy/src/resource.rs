//! Resource definitions handed to the engine by the provisioning host.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One declared infrastructure object: a type tag, a name used in
/// diagnostics, and the loosely typed properties its declaration carried.
///
/// Resources are immutable inputs. The host decodes them from its own
/// declaration language (anything serde can read works directly) or builds
/// them in code:
///
/// ```rust
/// use rampart_policy::resource::Resource;
/// use serde_json::json;
///
/// let volume = Resource::new("storage-volume", "data-disk")
///     .with_property("encrypted", true)
///     .with_property("size", 100);
///
/// assert_eq!(volume.resource_type(), "storage-volume");
/// assert_eq!(volume.properties().get("encrypted"), Some(&json!(true)));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resource {
    #[serde(rename = "type")]
    resource_type: String,
    name: String,
    #[serde(default)]
    properties: Map<String, Value>,
}

impl Resource {
    /// Creates a resource with no properties.
    pub fn new(resource_type: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            resource_type: resource_type.into(),
            name: name.into(),
            properties: Map::new(),
        }
    }

    /// Adds one property, keeping declaration order.
    #[must_use]
    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    /// Adds every property from `properties`, keeping declaration order.
    #[must_use]
    pub fn with_properties(mut self, properties: Map<String, Value>) -> Self {
        self.properties.extend(properties);
        self
    }

    /// The resource's type tag, e.g. `"storage-volume"`.
    #[must_use]
    pub fn resource_type(&self) -> &str {
        &self.resource_type
    }

    /// The resource's name; only ever used for diagnostics.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The declared property map.
    #[must_use]
    pub fn properties(&self) -> &Map<String, Value> {
        &self.properties
    }
}
