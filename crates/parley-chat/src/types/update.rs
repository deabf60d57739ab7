use serde::{Deserialize, Serialize};

/// Update relayed to the caller while a generation runs
///
/// This is the transport contract: a run of `stream` updates followed by at
/// most one terminal `finalAnswer`. A sequence that ends without a
/// `finalAnswer` was aborted (or the backend went away), and the partial
/// text must not be treated as a completed message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum MessageUpdate {
    /// Incremental token of the in-progress answer
    Stream {
        /// Token text
        token: String,
    },
    /// Terminal update carrying the completed answer
    FinalAnswer {
        /// Final text, whitespace-trimmed and stop-sequence-stripped
        text: String,
        /// Generation ended without reaching a recognized boundary
        interrupted: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stream_update_wire_shape() {
        let update = MessageUpdate::Stream {
            token: "hel".to_owned(),
        };
        let json = serde_json::to_value(&update).unwrap();
        assert_eq!(json, serde_json::json!({"type": "stream", "token": "hel"}));
    }

    #[test]
    fn final_answer_wire_shape() {
        let update = MessageUpdate::FinalAnswer {
            text: "hello".to_owned(),
            interrupted: false,
        };
        let json = serde_json::to_value(&update).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"type": "finalAnswer", "text": "hello", "interrupted": false})
        );
    }

    #[test]
    fn updates_round_trip() {
        let update = MessageUpdate::FinalAnswer {
            text: "hi".to_owned(),
            interrupted: true,
        };
        let json = serde_json::to_string(&update).unwrap();
        let back: MessageUpdate = serde_json::from_str(&json).unwrap();
        assert_eq!(back, update);
    }
}
