//! Extraction prompt and model reply parsing

use crate::core::ExtractionError;
use serde_json::Value;

/// JSON shape the model is asked to fill in
const INVOICE_SHAPE: &str = r#"{
  "vendor": { "name": "string", "address": "string", "taxId": "string", "customerCode": "string", "contactName": "string" },
  "invoice": { "number": "string", "date": "string", "currency": "string", "subtotal": "number", "taxPercent": "number", "total": "number", "poNumber": "string", "poDate": "string", "locale": "string" },
  "lineItems": [{ "description": "string", "unitPrice": "number", "quantity": "number", "total": "number", "discount": "number", "vat": "number" }]
}"#;

/// Build the instruction sent to the model for one invoice
pub fn build_prompt(pdf_text: &str) -> String {
    format!(
        "Based on the invoice text, extract data into a valid JSON object.\n\
         Only output the JSON object. The JSON structure is:\n\
         {shape}\n\
         Invoice Text: --- {text} ---\n",
        shape = INVOICE_SHAPE,
        text = pdf_text.trim(),
    )
}

/// Remove markdown code-fence markers (```` ```json ```` and ```` ``` ````)
/// anywhere in the reply, then trim surrounding whitespace.
pub fn strip_code_fences(reply: &str) -> String {
    reply
        .replace("```json", "")
        .replace("```", "")
        .trim()
        .to_string()
}

/// Strip fences and parse the reply as a JSON object
pub fn parse_model_reply(reply: &str) -> Result<Value, ExtractionError> {
    let cleaned = strip_code_fences(reply);
    let value: Value = serde_json::from_str(&cleaned)
        .map_err(|e| ExtractionError::InvalidReply(e.to_string()))?;

    if !value.is_object() {
        return Err(ExtractionError::InvalidReply(format!(
            "expected an object, got {}",
            json_kind(&value)
        )));
    }

    Ok(value)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
