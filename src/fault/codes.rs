use serde::Serialize;
use serde_json::Value;

/// Blocking-error codes. Anything here stops the run with exit 2.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FaultCode {
    /// Mandatory operator input missing or unusable (manifest, master,
    /// container, pattern, column selection, invalid regex).
    #[serde(rename = "E_BAD_INPUT")]
    BadInput,
    /// Reference table could not be opened or its sheet could not be read.
    #[serde(rename = "E_TABLE_UNREADABLE")]
    TableUnreadable,
    /// No column named "Folio" (case-insensitive, trimmed) in the sheet.
    #[serde(rename = "E_MISSING_KEY_COLUMN")]
    MissingKeyColumn,
    /// Report workbook could not be written.
    #[serde(rename = "E_REPORT_UNWRITABLE")]
    ReportUnwritable,
}

/// Body of a fault envelope.
#[derive(Debug, Serialize)]
pub struct FaultBody {
    pub code: FaultCode,
    pub message: String,
    pub detail: Value,
    pub next_step: Option<String>,
}

/// Fault envelope emitted to stdout on exit 2.
#[derive(Debug, Serialize)]
pub struct FaultEnvelope {
    pub version: String,
    pub outcome: String,
    pub fault: FaultBody,
}

/// Build a fault envelope with the fixed version/outcome header.
pub fn build_envelope(
    code: FaultCode,
    message: &str,
    detail: Value,
    next_step: Option<String>,
) -> FaultEnvelope {
    FaultEnvelope {
        version: "foliomatch.v0".to_owned(),
        outcome: "BLOCKED".to_owned(),
        fault: FaultBody {
            code,
            message: message.to_owned(),
            detail,
            next_step,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::{FaultCode, build_envelope};
    use serde_json::json;

    #[test]
    fn envelope_serializes_with_renamed_code() {
        let envelope = build_envelope(
            FaultCode::MissingKeyColumn,
            "No 'Folio' column in sheet",
            json!({ "sheet": "Registro", "columns": ["Lote", "Turno"] }),
            Some("foliomatch sheets master.xlsx --sheet Registro".to_owned()),
        );

        let value = serde_json::to_value(&envelope).expect("serialize envelope");
        assert_eq!(value["version"], "foliomatch.v0");
        assert_eq!(value["outcome"], "BLOCKED");
        assert_eq!(value["fault"]["code"], "E_MISSING_KEY_COLUMN");
        assert_eq!(value["fault"]["detail"]["sheet"], "Registro");
    }

    #[test]
    fn next_step_is_optional() {
        let envelope = build_envelope(FaultCode::BadInput, "Missing manifest", json!({}), None);
        let value = serde_json::to_value(&envelope).expect("serialize envelope");
        assert_eq!(value["fault"]["next_step"], serde_json::Value::Null);
    }
}
