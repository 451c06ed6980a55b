use serde_json::{json, Value};
use std::sync::LazyLock;

pub static CONFIG_SCHEMA: LazyLock<Value> = LazyLock::new(|| {
    json!({
        "$schema": "http://json-schema.org/draft-07/schema#",
        "type": "object",
        "additionalProperties": false,
        "properties": {
            "heuristics": {
                "type": "object",
                "properties": {
                    "param_names": { "type": "array", "items": { "type": "string" } },
                    "extra_param_names": { "type": "array", "items": { "type": "string" } },
                    "value_shapes": { "type": "array", "items": { "type": "string" } }
                }
            },
            "probe": {
                "type": "object",
                "properties": {
                    "test_target": { "type": "string" },
                    "timeout_secs": { "type": "integer", "minimum": 1 },
                    "concurrency": { "type": "integer", "minimum": 1 },
                    "user_agent": { "type": "string" },
                    "accept_invalid_certs": { "type": "boolean" }
                }
            },
            "output": {
                "type": "object",
                "properties": {
                    "verdicts": { "type": "string" },
                    "findings_json": { "type": "string" }
                }
            },
            "corpus": {
                "type": "object",
                "properties": {
                    "commands": { "type": "array", "items": { "$ref": "#/definitions/command" } }
                }
            }
        },
        "definitions": {
            "command": {
                "type": "object",
                "required": ["program"],
                "properties": {
                    "program": { "type": "string" },
                    "args": { "type": "array", "items": { "type": "string" } },
                    "required": { "type": "boolean" }
                }
            }
        }
    })
});
