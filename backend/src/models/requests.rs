//! # API Request Models
//!
//! Structures for incoming API request bodies.

use serde::{Deserialize, Serialize};

use crate::services::FundingForm;

/// Request to open a channel from the faucet to a node.
///
/// Field names follow the faucet web form. Amounts are decimal coin
/// strings and are validated by the faucet, not by deserialization, so a
/// non-numeric amount yields an outcome rather than a 400.
///
/// ## Example JSON
///
/// ```json
/// {
///     "node": "02a1b2c3...",
///     "amt": "0.5",
///     "bal": "0.1"
/// }
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OpenChannelRequest {
    /// Public key of the node to open a channel to (hex).
    pub node: String,

    /// Channel capacity in coins.
    pub amt: String,

    /// Initial balance pushed to the node, in coins.
    pub bal: String,
}

impl From<OpenChannelRequest> for FundingForm {
    fn from(request: OpenChannelRequest) -> Self {
        FundingForm {
            node: request.node,
            amt: request.amt,
            bal: request.bal,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields_default_to_empty() {
        let request: OpenChannelRequest = serde_json::from_str(r#"{"node":"02ab"}"#).unwrap();
        let form = FundingForm::from(request);

        assert_eq!(form.node, "02ab");
        assert_eq!(form.amt, "");
        assert_eq!(form.bal, "");
    }
}
