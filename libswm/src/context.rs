use serde_json::{Map, Value};

/// Last-known host-supplied contextual data.
///
/// Opaque to the engine apart from the `launchContext` projection below.
/// Absent (empty) at startup, created on the first context message and merged
/// in place thereafter: top-level keys of an incoming object payload replace
/// their previous values, keys not mentioned survive.
#[derive(Clone, Debug, Default)]
pub struct HostContext {
    values: Map<String, Value>,
}

impl HostContext {
    pub fn new() -> Self {
        HostContext::default()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn values(&self) -> &Map<String, Value> {
        &self.values
    }

    /// Merge an object payload in. Non-object payloads are ignored.
    pub fn merge(&mut self, payload: &Value) {
        if let Some(object) = payload.as_object() {
            for (key, value) in object {
                self.values.insert(key.clone(), value.clone());
            }
        }
    }

    /// Project the `launchContext` array into a `name → contentResource` map.
    ///
    /// Items missing either field are skipped rather than rejected, matching
    /// the tolerant reading hosts expect.
    pub fn launch_context(&self) -> Map<String, Value> {
        let mut resources = Map::new();
        let Some(items) = self.values.get("launchContext").and_then(Value::as_array) else {
            return resources;
        };
        for item in items {
            let (Some(name), Some(resource)) = (item.get("name").and_then(Value::as_str), item.get("contentResource"))
            else {
                continue;
            };
            resources.insert(name.to_string(), resource.clone());
        }
        resources
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn merge_keeps_keys_from_earlier_payloads() {
        let mut context = HostContext::new();
        context.merge(&json!({"launchContext": [{"name": "patient", "contentResource": {"resourceType": "Patient"}}]}));
        context.merge(&json!({"encounter": "e-123"}));
        assert!(context.values().contains_key("launchContext"));
        assert_eq!(context.values()["encounter"], "e-123");
    }

    #[test]
    fn merge_replaces_recurring_keys() {
        let mut context = HostContext::new();
        context.merge(&json!({"encounter": "e-1"}));
        context.merge(&json!({"encounter": "e-2"}));
        assert_eq!(context.values()["encounter"], "e-2");
    }

    #[test]
    fn non_object_payloads_are_ignored() {
        let mut context = HostContext::new();
        context.merge(&json!("not an object"));
        context.merge(&Value::Null);
        assert!(context.is_empty());
    }

    #[test]
    fn launch_context_maps_names_to_resources() {
        let mut context = HostContext::new();
        context.merge(&json!({
            "launchContext": [
                {"name": "patient", "contentResource": {"resourceType": "Patient", "id": "p-1"}},
                {"name": "encounter", "contentResource": {"resourceType": "Encounter"}},
                {"contentResource": {"resourceType": "Orphan"}},
                {"name": "incomplete"}
            ]
        }));
        let resources = context.launch_context();
        assert_eq!(resources.len(), 2);
        assert_eq!(resources["patient"]["id"], "p-1");
        assert_eq!(resources["encounter"]["resourceType"], "Encounter");
    }

    #[test]
    fn launch_context_is_empty_without_the_key() {
        let context = HostContext::new();
        assert!(context.launch_context().is_empty());
    }
}
