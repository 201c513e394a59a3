use std::collections::HashMap;

use serde_json::Value;

/// Key-value pairs as exchanged with the storage gateway.
///
/// Values are arbitrary JSON; the gateway never interprets them.
pub type Entries = HashMap<String, Value>;
