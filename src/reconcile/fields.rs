/// QC columns offered as report defaults when present in the sheet, in the
/// order the lab expects them.
pub const SUGGESTED_COLUMNS: &[&str] = &[
    "Folio",
    "N° Semana",
    "Fecha Análisis",
    "Fecha Etiqueta",
    "Analista",
    "Turno",
    "Lote",
    "Cliente",
    "Tipo de producto",
    "Condición GF/convencional",
    "Espesor inferior",
    "Espesor superrior",
    "% Humedad inferior FT",
    "% Humedad superior FT",
    "Hora",
    "Cantidad sacos/maxisaco",
    "Peso saco/maxisaco",
    "Kilos producidos",
    "Humedad",
    "Temperatura producto",
    "Enzimática",
    "Peso hectolitro",
    "Filamentos",
    "Cáscaras",
    "Semillas Extrañas",
    "Gelatinas",
    "Quemadas",
    "Granos sin aplastar",
    "Granos Parcialmente Aplastados",
    "Trigos",
    "Cebada",
    "Centeno",
    "Materiales extraños",
    "Retención malla 7",
    "Bajo malla 25",
    "Espesor 1",
    "Espesor 2",
    "Espesor 3",
    "Espesor 4",
    "Espesor 5",
    "Espesor 6",
    "Espesor 7",
    "Espesor 8",
    "Espesor 9",
    "Espesor 10",
    "Promedio espesor",
    "Sacos detector de metales",
    "Verificación de patrones PCC",
    "ESTADO",
    "Motivo Retención",
];

/// Identifier-like columns that never belong in an average, even when their
/// cells happen to be numeric.
pub const AVERAGE_DENYLIST: &[&str] = &[
    "Folio",
    "N° Semana",
    "Hora",
    "Cliente",
    "Fecha Etiqueta",
    "Motivo Retención",
    "Verificación de patrones PCC",
];

/// Default report columns: the suggested list filtered down to what the
/// sheet actually has, in suggested order.
pub fn default_report_columns(available: &[String]) -> Vec<String> {
    SUGGESTED_COLUMNS
        .iter()
        .filter(|suggested| available.iter().any(|column| column == *suggested))
        .map(|suggested| (*suggested).to_owned())
        .collect()
}

/// True when a column is denylisted for averaging.
pub fn is_average_denylisted(column: &str) -> bool {
    AVERAGE_DENYLIST
        .iter()
        .any(|denied| denied.eq_ignore_ascii_case(column.trim()))
}
