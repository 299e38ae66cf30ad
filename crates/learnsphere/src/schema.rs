//! Response schemas for the structured study operations.
//!
//! Written in the backend's OpenAPI subset (upper-case type names).

use serde_json::{Value, json};

fn quiz_question_object() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "question": { "type": "STRING" },
            "options": { "type": "ARRAY", "items": { "type": "STRING" } },
            "correctAnswer": { "type": "STRING" }
        },
        "required": ["question", "options", "correctAnswer"]
    })
}

pub(crate) fn quiz_question() -> Value {
    quiz_question_object()
}

pub(crate) fn quiz_list() -> Value {
    json!({ "type": "ARRAY", "items": quiz_question_object() })
}

pub(crate) fn daily_challenge() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "question": { "type": "STRING", "description": "The challenging question." },
            "options": {
                "type": "ARRAY",
                "items": { "type": "STRING" },
                "description": "An array of 4 options (1 correct, 3 incorrect)."
            },
            "correctAnswer": {
                "type": "STRING",
                "description": "The correct answer from the options."
            }
        },
        "required": ["question", "options", "correctAnswer"]
    })
}

pub(crate) fn flashcard_list() -> Value {
    json!({
        "type": "ARRAY",
        "items": {
            "type": "OBJECT",
            "properties": {
                "front": { "type": "STRING", "description": "The key term or question." },
                "back": { "type": "STRING", "description": "The definition or answer." }
            },
            "required": ["front", "back"]
        }
    })
}

pub(crate) fn study_plan() -> Value {
    json!({
        "type": "ARRAY",
        "items": {
            "type": "OBJECT",
            "properties": {
                "day": { "type": "STRING", "description": "e.g., Day 1: Monday" },
                "focus": { "type": "STRING", "description": "The main topic for the day." },
                "tasks": {
                    "type": "ARRAY",
                    "items": { "type": "STRING" },
                    "description": "Specific study tasks."
                }
            },
            "required": ["day", "focus", "tasks"]
        }
    })
}

pub(crate) fn explanation() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "script": {
                "type": "STRING",
                "description": "The educational script to be read aloud."
            },
            "image_prompt": {
                "type": "STRING",
                "description": "A prompt for an image generator."
            }
        },
        "required": ["script", "image_prompt"]
    })
}
