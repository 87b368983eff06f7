use serde_json::{Map, Value};

use crate::types::InputFrame;

#[derive(Debug, PartialEq)]
pub enum ParsedClientMessage {
    Input(InputFrame),
    NewSession { seed: Option<u32> },
    Ping { t: f64 },
}

pub fn parse_client_message(raw: &str) -> Option<ParsedClientMessage> {
    let value: Value = serde_json::from_str(raw).ok()?;
    let object = value.as_object()?;
    let message_type = object.get("type")?.as_str()?;

    match message_type {
        "input" => Some(ParsedClientMessage::Input(InputFrame {
            move_x: parse_optional_f32(object, "moveX")?,
            move_z: parse_optional_f32(object, "moveZ")?,
            look_yaw: parse_optional_f32(object, "lookYaw")?,
            look_pitch: parse_optional_f32(object, "lookPitch")?,
            interact: parse_optional_bool(object, "interact")?,
            primary: parse_optional_bool(object, "primary")?,
            secondary: parse_optional_bool(object, "secondary")?,
            quick_use: parse_optional_bool(object, "quickUse")?,
        })),
        "new_session" => {
            let seed = match object.get("seed") {
                None | Some(Value::Null) => None,
                Some(value) => Some(u32::try_from(value.as_u64()?).ok()?),
            };
            Some(ParsedClientMessage::NewSession { seed })
        }
        "ping" => {
            let t = object.get("t")?.as_f64()?;
            if !t.is_finite() {
                return None;
            }
            Some(ParsedClientMessage::Ping { t })
        }
        _ => None,
    }
}

/// Missing fields default to zero; present fields must be numbers.
fn parse_optional_f32(object: &Map<String, Value>, key: &str) -> Option<f32> {
    let Some(value) = object.get(key) else {
        return Some(0.0);
    };
    let number = value.as_f64()? as f32;
    number.is_finite().then_some(number)
}

fn parse_optional_bool(object: &Map<String, Value>, key: &str) -> Option<bool> {
    match object.get(key) {
        None => Some(false),
        Some(value) => value.as_bool(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_input_message() {
        let parsed = parse_client_message(
            r#"{"type":"input","moveX":0.5,"moveZ":-1,"lookYaw":0.02,"interact":true,"quickUse":true}"#,
        )
        .expect("input message should parse");
        match parsed {
            ParsedClientMessage::Input(frame) => {
                assert_eq!(frame.move_x, 0.5);
                assert_eq!(frame.move_z, -1.0);
                assert_eq!(frame.look_pitch, 0.0);
                assert!(frame.interact);
                assert!(frame.quick_use);
                assert!(!frame.primary);
            }
            _ => panic!("expected input message"),
        }
    }

    #[test]
    fn parse_input_rejects_wrong_field_types() {
        assert!(parse_client_message(r#"{"type":"input","moveX":"fast"}"#).is_none());
        assert!(parse_client_message(r#"{"type":"input","interact":1}"#).is_none());
        assert!(parse_client_message(r#"{"type":"input","lookYaw":1e300}"#).is_none());
    }

    #[test]
    fn parse_new_session_with_and_without_seed() {
        assert_eq!(
            parse_client_message(r#"{"type":"new_session","seed":42}"#),
            Some(ParsedClientMessage::NewSession { seed: Some(42) })
        );
        assert_eq!(
            parse_client_message(r#"{"type":"new_session"}"#),
            Some(ParsedClientMessage::NewSession { seed: None })
        );
        assert!(parse_client_message(r#"{"type":"new_session","seed":-1}"#).is_none());
        assert!(parse_client_message(r#"{"type":"new_session","seed":4294967296}"#).is_none());
    }

    #[test]
    fn parse_ping_requires_number() {
        let parsed = parse_client_message(r#"{"type":"ping","t":12.5}"#);
        assert_eq!(parsed, Some(ParsedClientMessage::Ping { t: 12.5 }));
        assert!(parse_client_message(r#"{"type":"ping","t":"now"}"#).is_none());
    }

    #[test]
    fn unknown_types_and_garbage_are_ignored() {
        assert!(parse_client_message(r#"{"type":"hello"}"#).is_none());
        assert!(parse_client_message("not json").is_none());
        assert!(parse_client_message("[1,2]").is_none());
    }
}
