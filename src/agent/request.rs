//! Pending input-request bookkeeping.

use serde::{Deserialize, Serialize};

use crate::agent::reply::ReplyChannel;

/// One named field the service wants filled in.
///
/// The descriptor is the attribute map that came over the wire, e.g.
/// `{"Type": "psk", "Requirement": "mandatory"}`; the agent relays it without
/// interpreting its contents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputField {
    pub name: String,
    pub descriptor: serde_json::Value,
}

impl InputField {
    pub fn new(name: impl Into<String>, descriptor: serde_json::Value) -> Self {
        Self {
            name: name.into(),
            descriptor,
        }
    }
}

/// The single in-flight input request the agent is allowed to hold.
///
/// Field order is the order the service submitted and is preserved when the
/// request is relayed to the application.
pub(crate) struct PendingRequest {
    pub service: String,
    pub fields: Vec<InputField>,
    pub reply: ReplyChannel,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_construction() {
        let field = InputField::new("Passphrase", serde_json::json!({"Type": "psk"}));
        assert_eq!(field.name, "Passphrase");
        assert_eq!(field.descriptor["Type"], "psk");
    }
}
