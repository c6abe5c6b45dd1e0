//! CDP deep-serialized values to BiDi remote values.
//!
//! CDP's `serialization: "deep"` already produces a tree that is almost a
//! BiDi RemoteValue; what remains is a structural rewrite: internal ids,
//! shared ids on nodes, platform objects, and a recursive pass over every
//! container kind.

use serde_json::{Map, Value, json};

use bidimux_cdp::protocol::runtime::RemoteObject;

use super::shared_id::SharedId;

/// Container types whose `value` is a flat list of serialized values.
const LIST_TYPES: &[&str] = &["array", "set", "htmlcollection", "nodelist"];

/// Container types whose `value` is a list of [key, value] pairs.
const MAPPING_TYPES: &[&str] = &["map", "object"];

/// Serialize a CDP remote object into a BiDi remote value.
///
/// `navigable_id` stamps shared ids onto node values; node values cannot
/// occur outside window realms, where it is always known.
pub fn serialize_remote_object(object: &RemoteObject, navigable_id: Option<&str>) -> Value {
    let mut value = match &object.deep_serialized_value {
        Some(deep) => {
            let raw = serde_json::to_value(deep).unwrap_or(Value::Null);
            transform(raw, navigable_id)
        }
        // Deep serialization is requested on every bridge crossing, but a
        // primitive-only result may come back bare.
        None => fallback_primitive(object),
    };

    // Generators and iterators serialize as plain objects; the remote
    // object's subtype is the authoritative type and their contents are
    // not observable.
    if let Some(subtype) = object.subtype.as_deref() {
        if subtype == "generator" || subtype == "iterator" {
            if let Some(map) = value.as_object_mut() {
                map.insert("type".to_string(), json!(subtype));
                map.remove("value");
            }
        }
    }

    value
}

/// Recursive post-processing of one deep-serialized tree node.
fn transform(raw: Value, navigable_id: Option<&str>) -> Value {
    let Value::Object(mut fields) = raw else {
        return raw;
    };
    let mut out = Map::new();

    let value_type = fields
        .get("type")
        .and_then(Value::as_str)
        .unwrap_or("object")
        .to_string();

    // weakLocalObjectReference marks a value already serialized in the
    // same result; BiDi spells it internalId.
    if let Some(weak_ref) = fields.remove("weakLocalObjectReference") {
        let internal_id = match weak_ref {
            Value::Number(n) => n.to_string(),
            other => other.to_string(),
        };
        out.insert("internalId".to_string(), json!(internal_id));
    }

    // Platform objects surface as bare objects with no contents.
    if value_type == "platformobject" {
        out.insert("type".to_string(), json!("object"));
        return Value::Object(out);
    }

    out.insert("type".to_string(), json!(value_type));

    let value = fields.remove("value");
    match (value_type.as_str(), value) {
        ("node", Some(node_value)) => {
            let (shared_id, node) = transform_node(node_value, navigable_id);
            if let Some(shared_id) = shared_id {
                out.insert("sharedId".to_string(), json!(shared_id));
            }
            out.insert("value".to_string(), node);
        }
        (t, Some(Value::Array(items))) if LIST_TYPES.contains(&t) => {
            let items: Vec<Value> = items
                .into_iter()
                .map(|item| transform(item, navigable_id))
                .collect();
            out.insert("value".to_string(), Value::Array(items));
        }
        (t, Some(Value::Array(entries))) if MAPPING_TYPES.contains(&t) => {
            let entries: Vec<Value> = entries
                .into_iter()
                .map(|entry| transform_entry(entry, navigable_id))
                .collect();
            out.insert("value".to_string(), Value::Array(entries));
        }
        (_, Some(other)) => {
            out.insert("value".to_string(), other);
        }
        (_, None) => {}
    }

    Value::Object(out)
}

/// Rewrite one map/object entry; keys may themselves be serialized values.
fn transform_entry(entry: Value, navigable_id: Option<&str>) -> Value {
    let Value::Array(mut pair) = entry else {
        return entry;
    };
    if pair.len() != 2 {
        return Value::Array(pair);
    }
    let value = transform(pair.pop().expect("len checked"), navigable_id);
    let key = pair.pop().expect("len checked");
    let key = match key {
        Value::String(plain) => Value::String(plain),
        serialized => transform(serialized, navigable_id),
    };
    Value::Array(vec![key, value])
}

/// Rewrite a node payload: mint the shared id, recurse into children and
/// shadow roots, normalise the namespace.
fn transform_node(node_value: Value, navigable_id: Option<&str>) -> (Option<String>, Value) {
    let Value::Object(mut node) = node_value else {
        return (None, node_value);
    };

    let shared_id = match (navigable_id, node.get("backendNodeId").and_then(Value::as_i64)) {
        (Some(navigable), Some(backend_node_id)) => {
            Some(SharedId::format(navigable, backend_node_id))
        }
        _ => None,
    };
    node.remove("backendNodeId");
    node.remove("loaderId");

    // An absent namespace serializes as the empty string on the CDP side.
    if node.get("namespaceURI").and_then(Value::as_str) == Some("") {
        node.insert("namespaceURI".to_string(), Value::Null);
    }

    if let Some(children) = node.remove("children") {
        let children = match children {
            Value::Array(items) => Value::Array(
                items
                    .into_iter()
                    .map(|child| transform(child, navigable_id))
                    .collect(),
            ),
            other => other,
        };
        node.insert("children".to_string(), children);
    }

    if let Some(shadow_root) = node.remove("shadowRoot") {
        let shadow_root = match shadow_root {
            Value::Null => Value::Null,
            other => transform(other, navigable_id),
        };
        node.insert("shadowRoot".to_string(), shadow_root);
    }

    (shared_id, Value::Object(node))
}

/// Build a remote value for a primitive result without a deep form.
fn fallback_primitive(object: &RemoteObject) -> Value {
    if let Some(unserializable) = &object.unserializable_value {
        return json!({"type": "number", "value": unserializable});
    }
    match &object.value {
        Some(Value::Null) | None => match object.object_type.as_str() {
            "undefined" => json!({"type": "undefined"}),
            _ => json!({"type": "null"}),
        },
        Some(Value::String(s)) => json!({"type": "string", "value": s}),
        Some(Value::Bool(b)) => json!({"type": "boolean", "value": b}),
        Some(Value::Number(n)) => json!({"type": "number", "value": n}),
        Some(other) => json!({"type": "object", "value": other}),
    }
}

#[cfg(test)]
mod tests;
