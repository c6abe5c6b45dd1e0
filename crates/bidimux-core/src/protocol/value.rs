//! Script value types shared across modules.
//!
//! Client-supplied values (`LocalValue` and remote references) deserialize
//! from command parameters; mediator-produced remote values are built by
//! the realm serializer as raw JSON, so no typed mirror exists for them
//! here.

use serde::Deserialize;
use serde_json::Value;

/// Who owns the lifetime of a returned remote object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ResultOwnership {
    /// The client claims the handle; the mediator records it for disown.
    Root,
    /// No handle is returned; the object is released immediately.
    #[default]
    None,
}

/// BiDi serialization options for results crossing the value bridge.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct SerializationOptions {
    /// Maximum DOM tree depth to serialize; null means the default.
    #[serde(default)]
    pub max_dom_depth: Option<u64>,
    /// Maximum object graph depth to serialize; null means unlimited.
    #[serde(default)]
    pub max_object_depth: Option<u64>,
    /// Which shadow trees to include: "none", "open" or "all".
    #[serde(default)]
    pub include_shadow_tree: Option<ShadowTreeInclusion>,
}

/// Shadow tree serialization choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ShadowTreeInclusion {
    /// Skip shadow trees entirely.
    #[default]
    None,
    /// Include open shadow trees.
    Open,
    /// Include open and closed shadow trees.
    All,
}

/// A JavaScript number that may have no JSON representation.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum JsNumber {
    /// A plain finite number.
    Finite(f64),
    /// One of the special values spelled as a string on the wire.
    Special(SpecialNumber),
}

/// Special numbers without a JSON form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum SpecialNumber {
    /// Not a number.
    NaN,
    /// Negative zero.
    #[serde(rename = "-0")]
    NegativeZero,
    /// Positive infinity.
    Infinity,
    /// Negative infinity.
    #[serde(rename = "-Infinity")]
    NegativeInfinity,
}

impl SpecialNumber {
    /// The JavaScript source spelling, as fed to CDP's
    /// `unserializableValue`.
    pub fn js_repr(self) -> &'static str {
        match self {
            Self::NaN => "NaN",
            Self::NegativeZero => "-0",
            Self::Infinity => "Infinity",
            Self::NegativeInfinity => "-Infinity",
        }
    }
}

/// A key in a serialized map or object: either a plain string or any
/// serializable value.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum EntryKey {
    /// Plain string key.
    String(String),
    /// Arbitrary value key (maps only).
    Value(LocalValue),
}

/// Regular expression literal components.
#[derive(Debug, Clone, Deserialize)]
pub struct RegExpValue {
    /// The pattern between the slashes.
    pub pattern: String,
    /// Flags, e.g. "gi".
    #[serde(default)]
    pub flags: Option<String>,
}

/// Properties of a channel argument.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelProperties {
    /// Client-chosen channel id, echoed on every message event.
    pub channel: String,
    /// Serialization options for values sent through the channel.
    #[serde(default)]
    pub serialization_options: Option<SerializationOptions>,
    /// Ownership of values sent through the channel.
    #[serde(default)]
    pub ownership: Option<ResultOwnership>,
}

/// A client-supplied value to reconstruct inside the target realm.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum LocalValue {
    /// `undefined`
    Undefined,
    /// `null`
    Null,
    /// A string.
    String {
        /// The string value.
        value: String,
    },
    /// A number, possibly special.
    Number {
        /// The numeric value.
        value: JsNumber,
    },
    /// A boolean.
    Boolean {
        /// The boolean value.
        value: bool,
    },
    /// A bigint, spelled in decimal.
    Bigint {
        /// Decimal digits.
        value: String,
    },
    /// An array of values.
    Array {
        /// Element values.
        value: Vec<ArgumentValue>,
    },
    /// A Date from its ISO string.
    Date {
        /// ISO 8601 date string.
        value: String,
    },
    /// A Map from its entry list.
    Map {
        /// Entries as [key, value] pairs.
        value: Vec<(EntryKey, ArgumentValue)>,
    },
    /// A plain object from its entry list.
    Object {
        /// Entries as [key, value] pairs.
        value: Vec<(EntryKey, ArgumentValue)>,
    },
    /// A RegExp literal.
    Regexp {
        /// Pattern and flags.
        value: RegExpValue,
    },
    /// A Set of values.
    Set {
        /// Element values.
        value: Vec<ArgumentValue>,
    },
    /// A channel: materialises a ChannelProxy and passes its send handle.
    Channel {
        /// Channel configuration.
        value: ChannelProperties,
    },
}

/// A reference to a value that already lives in the browser.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RemoteReference {
    /// A DOM node by its shared id (optionally with a handle fallback).
    Shared {
        /// Shared id of the form `<navigableId>_element_<backendNodeId>`.
        #[serde(rename = "sharedId")]
        shared_id: String,
        /// Object handle, ignored when the shared id resolves.
        handle: Option<String>,
    },
    /// A remote object by handle.
    Object {
        /// Object handle previously returned with root ownership.
        handle: String,
    },
}

/// Any value position in `script.callFunction` arguments: a reference to
/// an existing browser-side value or a local value to reconstruct.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ArgumentValue {
    /// A value reconstructed from its serialized form.
    Local(LocalValue),
    /// A reference to an existing remote value.
    Reference(RemoteReference),
}

/// The target a script command runs against.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Target {
    /// A browsing context target, optionally in a named sandbox.
    Context {
        /// Browsing context id.
        context: String,
        /// Sandbox name; the default realm when absent.
        #[serde(default)]
        sandbox: Option<String>,
    },
    /// A realm target.
    Realm {
        /// Realm id.
        realm: String,
    },
}

/// Raw BiDi remote value, produced by the realm serializer.
///
/// The serializer works structurally on JSON, so the remote value stays an
/// untyped document on this side of the bridge.
pub type RemoteValue = Value;

#[cfg(test)]
mod tests;
