use axum::response::Json;
use serde_json::{json, Map, Value};

use crate::models::{GENDERS, REQUIRED_FIELDS};

const WHOLE_AMOUNT: &str =
    "Whole amount. Fractional numbers (including 5000.0) and numeric strings are rejected.";

const ERROR_STATUSES: [(&str, &str); 4] = [
    ("400", "Bad request"),
    ("401", "Not authenticated"),
    ("403", "Access denied"),
    ("500", "Internal server error"),
];

/// Responses block for one operation: the success entry plus the shared error entries.
fn responses(success: (&str, &str, Option<Value>), not_found: bool) -> Value {
    let mut out = Map::new();

    let (code, description, body) = success;
    let mut entry = json!({ "description": description });
    if let Some(schema) = body {
        entry["content"] = json!({ "application/json": { "schema": schema } });
    }
    out.insert(code.to_string(), entry);

    for (code, description) in ERROR_STATUSES {
        out.insert(code.to_string(), error_response(description));
    }
    if not_found {
        out.insert("404".to_string(), error_response("Not found"));
    }

    Value::Object(out)
}

fn error_response(description: &str) -> Value {
    json!({
        "description": description,
        "content": { "application/json": { "schema": { "$ref": "#/components/schemas/Error" } } }
    })
}

fn player_ref() -> Value {
    json!({ "$ref": "#/components/schemas/Player" })
}

fn player_body() -> Value {
    json!({
        "required": true,
        "content": {
            "application/json": {
                "schema": { "$ref": "#/components/schemas/PlayerInput" },
                "example": {
                    "name": "Vova",
                    "gender": "Male",
                    "own_money": 5000,
                    "credit": 0,
                    "bank": 1,
                    "shop": 1
                }
            }
        }
    })
}

fn query_param(name: &str, schema: Value, description: &str) -> Value {
    json!({ "name": name, "in": "query", "required": false, "schema": schema, "description": description })
}

fn collection_path() -> Value {
    json!({
        "get": {
            "operationId": "players_list",
            "summary": "List all players",
            "tags": ["Player"],
            "parameters": [
                query_param("limit", json!({ "type": "integer", "minimum": 1, "maximum": 100 }), "Page size; enables the page envelope"),
                query_param("offset", json!({ "type": "integer", "minimum": 0 }), "Index of the first result; enables the page envelope"),
                query_param("name", json!({ "type": "string" }), "Exact name match"),
                query_param("gender", json!({ "type": "string", "enum": GENDERS }), "Exact gender match"),
                query_param("bank", json!({ "type": "integer" }), "Bank id"),
                query_param("shop", json!({ "type": "integer" }), "Shop id")
            ],
            "responses": responses(("200", "OK", Some(player_list_schema())), false)
        },
        "post": {
            "operationId": "players_create",
            "summary": "Create a player",
            "tags": ["Player"],
            "security": [{ "bearer": [] }],
            "requestBody": player_body(),
            "responses": responses(("201", "Created", Some(player_ref())), false)
        }
    })
}

fn player_list_schema() -> Value {
    json!({
        "oneOf": [
            { "type": "array", "items": player_ref() },
            { "$ref": "#/components/schemas/PlayerPage" }
        ]
    })
}

fn item_path() -> Value {
    json!({
        "parameters": [{
            "name": "id",
            "in": "path",
            "required": true,
            "schema": { "type": "integer" }
        }],
        "get": {
            "operationId": "players_retrieve",
            "summary": "Get a single player",
            "tags": ["Player"],
            "responses": responses(("200", "OK", Some(player_ref())), true)
        },
        "put": {
            "operationId": "players_update",
            "summary": "Update a player",
            "tags": ["Player"],
            "security": [{ "bearer": [] }],
            "requestBody": player_body(),
            "responses": responses(("200", "OK", Some(player_ref())), true)
        },
        "patch": {
            "operationId": "players_partial_update",
            "summary": "Change some fields of a player",
            "tags": ["Player"],
            "security": [{ "bearer": [] }],
            "requestBody": player_body(),
            "responses": responses(("200", "OK", Some(player_ref())), true)
        },
        "delete": {
            "operationId": "players_destroy",
            "summary": "Delete a player",
            "tags": ["Player"],
            "security": [{ "bearer": [] }],
            "responses": responses(("204", "No content", None), true)
        }
    })
}

fn player_properties() -> Value {
    json!({
        "name": { "type": "string", "minLength": 1, "maxLength": 100 },
        "gender": { "type": "string", "enum": GENDERS },
        "own_money": { "type": "integer", "minimum": 0, "default": 0, "description": WHOLE_AMOUNT },
        "credit": { "type": "integer", "minimum": 0, "default": 0, "description": WHOLE_AMOUNT },
        "bank": { "type": "integer" },
        "shop": { "type": "integer" }
    })
}

fn components() -> Value {
    let mut player_properties_with_id = player_properties();
    player_properties_with_id["id"] = json!({ "type": "integer", "readOnly": true });

    json!({
        "schemas": {
            "Player": {
                "type": "object",
                "required": ["id", "name", "gender", "own_money", "credit", "bank", "shop"],
                "properties": player_properties_with_id
            },
            "PlayerInput": {
                "type": "object",
                "required": REQUIRED_FIELDS,
                "properties": player_properties()
            },
            "PlayerPage": {
                "type": "object",
                "required": ["count", "next", "previous", "results"],
                "properties": {
                    "count": { "type": "integer" },
                    "next": { "type": "string", "nullable": true },
                    "previous": { "type": "string", "nullable": true },
                    "results": { "type": "array", "items": player_ref() }
                }
            },
            "Error": {
                "type": "object",
                "required": ["error", "message"],
                "properties": {
                    "error": { "type": "string" },
                    "message": { "type": "string" },
                    "fields": {
                        "type": "object",
                        "additionalProperties": { "type": "array", "items": { "type": "string" } }
                    }
                }
            }
        },
        "securitySchemes": {
            "bearer": { "type": "http", "scheme": "bearer" }
        }
    })
}

/// OpenAPI 3.0 description of the player resource.
pub fn document() -> Value {
    json!({
        "openapi": "3.0.3",
        "info": {
            "title": "Player Registry API",
            "version": env!("CARGO_PKG_VERSION")
        },
        "paths": {
            "/players": collection_path(),
            "/players/{id}": item_path()
        },
        "components": components()
    })
}

// GET /schema - OpenAPI document
pub async fn openapi() -> Json<Value> {
    Json(document())
}
