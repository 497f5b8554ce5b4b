//! Health check and API description.

use axum::Json;
use serde_json::{Value, json};

use crate::error::ApiEnvelope;

pub async fn health() -> ApiEnvelope<Value> {
    ApiEnvelope::ok(
        "ok",
        json!({ "status": "healthy", "version": env!("CARGO_PKG_VERSION") }),
    )
}

pub async fn openapi() -> Json<Value> {
    Json(derive_openapi_document())
}

fn derive_envelope_schema(data: Value) -> Value {
    json!({
        "type": "object",
        "required": ["success", "message", "statusCode"],
        "properties": {
            "success": { "type": "boolean" },
            "message": { "type": "string" },
            "statusCode": { "type": "integer" },
            "data": data
        }
    })
}

pub fn derive_openapi_document() -> Value {
    let error_response = json!({
        "description": "Error envelope",
        "content": { "application/json": { "schema": derive_envelope_schema(json!({})) } }
    });

    json!({
        "openapi": "3.0.3",
        "info": {
            "title": "sheetkit",
            "version": env!("CARGO_PKG_VERSION"),
            "description": "Spreadsheet generation and web page reading."
        },
        "paths": {
            "/excel-generator/generate": {
                "post": {
                    "summary": "Render sheets of tables into an .xlsx file",
                    "requestBody": {
                        "required": true,
                        "content": { "application/json": { "schema": { "$ref": "#/components/schemas/GenerateRequest" } } }
                    },
                    "responses": {
                        "200": {
                            "description": "Workbook written",
                            "content": { "application/json": { "schema": derive_envelope_schema(json!({
                                "type": "object",
                                "properties": { "downloadUrl": { "type": "string", "format": "uri" } }
                            })) } }
                        },
                        "400": error_response.clone(),
                        "500": error_response.clone()
                    }
                }
            },
            "/excel-generator/downloads/{fileName}": {
                "get": {
                    "summary": "Download a generated workbook until the retention sweep removes it",
                    "parameters": [
                        { "name": "fileName", "in": "path", "required": true, "schema": { "type": "string" } }
                    ],
                    "responses": {
                        "200": {
                            "description": "Workbook bytes",
                            "content": { "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet": {} }
                        },
                        "404": { "description": "File missing or already reclaimed" }
                    }
                }
            },
            "/web-page-reader/get-content": {
                "get": {
                    "summary": "Fetch a page and extract its readable article",
                    "parameters": [
                        { "name": "url", "in": "query", "required": true, "schema": { "type": "string", "format": "uri" } }
                    ],
                    "responses": {
                        "200": {
                            "description": "Extracted article",
                            "content": { "application/json": { "schema": derive_envelope_schema(json!({
                                "type": "object",
                                "properties": {
                                    "title": { "type": "string" },
                                    "content": { "type": "string" }
                                }
                            })) } }
                        },
                        "400": error_response.clone(),
                        "500": error_response.clone()
                    }
                }
            }
        },
        "components": {
            "schemas": {
                "GenerateRequest": {
                    "type": "object",
                    "required": ["sheetsData"],
                    "properties": {
                        "sheetsData": { "type": "array", "minItems": 1, "items": { "$ref": "#/components/schemas/Sheet" } },
                        "excelConfigs": { "$ref": "#/components/schemas/ExcelConfig" }
                    }
                },
                "Sheet": {
                    "type": "object",
                    "required": ["sheetName", "tables"],
                    "properties": {
                        "sheetName": { "type": "string" },
                        "tables": { "type": "array", "items": { "$ref": "#/components/schemas/Table" } }
                    }
                },
                "Table": {
                    "type": "object",
                    "required": ["columns", "rows"],
                    "properties": {
                        "title": { "type": "string" },
                        "startCell": { "type": "string", "default": "A1" },
                        "skipHeader": { "type": "boolean", "default": false },
                        "columns": { "type": "array", "items": { "$ref": "#/components/schemas/Column" } },
                        "rows": {
                            "type": "array",
                            "items": { "type": "array", "items": { "$ref": "#/components/schemas/Cell" } }
                        }
                    }
                },
                "Column": {
                    "type": "object",
                    "required": ["name"],
                    "properties": {
                        "name": { "type": "string" },
                        "type": {
                            "type": "string",
                            "enum": ["text", "number", "percent", "currency", "date", "boolean"],
                            "default": "text"
                        },
                        "format": { "type": "string" }
                    }
                },
                "Cell": {
                    "type": "object",
                    "nullable": true,
                    "required": ["type"],
                    "properties": {
                        "type": { "type": "string", "enum": ["static_value", "formula"] },
                        "value": {}
                    }
                },
                "ExcelConfig": {
                    "type": "object",
                    "properties": {
                        "fontFamily": { "type": "string", "default": "Calibri" },
                        "titleFontSize": { "type": "number", "default": 14 },
                        "headerFontSize": { "type": "number", "default": 12 },
                        "fontSize": { "type": "number", "default": 11 },
                        "borderStyle": { "type": "string", "nullable": true, "default": "thin" },
                        "wrapText": { "type": "boolean", "default": false },
                        "autoFilter": { "type": "boolean", "default": false },
                        "autoFitColumnWidth": { "type": "boolean", "default": true }
                    }
                }
            }
        }
    })
}
