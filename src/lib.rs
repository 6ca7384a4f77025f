#![forbid(unsafe_code)]

pub mod aggregate;
pub mod cli;
pub mod document;
pub mod fault;
pub mod progress;
pub mod reconcile;
pub mod report;
pub mod scan;

use crate::document::cache::{ExtractedManifest, ExtractionCache};
use crate::fault::{FaultCode, FaultEnvelope, build_envelope};
use crate::progress::reporter::{report_info, report_warning};
use crate::scan::ScanProfile;
use serde_json::json;
use std::path::{Path, PathBuf};

/// Run the foliomatch CLI. Returns an exit code (0, 1, or 2).
pub fn run() -> u8 {
    use clap::Parser;
    use cli::{Cli, Command};

    let cli = Cli::parse();

    match &cli.command {
        Some(Command::Infer {
            manifest,
            text,
            out,
        }) => handle_infer(manifest, text.as_deref(), out.as_deref()),
        Some(Command::Sheets { master, sheet }) => handle_sheets(master, sheet.as_deref()),
        None => handle_run_mode(&cli),
    }
}

/// Handle default run mode: extract, infer, apply operator overrides,
/// extract folios, reconcile, aggregate, report.
fn handle_run_mode(cli: &cli::Cli) -> u8 {
    use cli::Outcome;
    use std::io;

    let Some(manifest_path) = cli.manifest.as_deref() else {
        emit_envelope(&build_envelope(
            FaultCode::BadInput,
            "A transport manifest is required",
            json!({}),
            Some("foliomatch <MANIFEST.pdf> --master <TABLE.xlsx>".to_owned()),
        ));
        return Outcome::Refusal.exit_code();
    };
    let Some(master_path) = cli.master.as_deref() else {
        emit_envelope(&build_envelope(
            FaultCode::BadInput,
            "A QC master table is required",
            json!({ "manifest": manifest_path.display().to_string() }),
            Some("foliomatch <MANIFEST.pdf> --master <TABLE.xlsx>".to_owned()),
        ));
        return Outcome::Refusal.exit_code();
    };

    // Manifest extraction is memoized by content hash; a PDF that cannot be
    // decoded degrades to an empty container plus the error text so every
    // downstream step still receives a string.
    let mut cache = ExtractionCache::new();
    let extracted = match scan_manifest(manifest_path, cli.text.as_deref(), &mut cache) {
        Ok(extracted) => extracted,
        Err(error) => {
            emit_envelope(&build_envelope(
                FaultCode::BadInput,
                "Cannot read manifest",
                json!({ "path": manifest_path.display().to_string(), "error": error }),
                None,
            ));
            return Outcome::Refusal.exit_code();
        }
    };

    let inferred = scan::infer_pattern(&extracted.raw_text);
    let mut profile = ScanProfile {
        container: extracted.container.clone(),
        pattern: inferred.pattern,
        prefix: inferred.prefix,
        suffix: inferred.suffix,
        candidate_count: inferred.candidate_count,
    };

    if let Some(rule_path) = cli.rule.as_deref() {
        let reviewed = match load_scan_profile(rule_path) {
            Ok(reviewed) => reviewed,
            Err(error) => {
                emit_envelope(&build_envelope(
                    FaultCode::BadInput,
                    "Cannot load scan profile",
                    json!({ "path": rule_path.display().to_string(), "error": error }),
                    Some("foliomatch infer <MANIFEST> --out rule.yaml".to_owned()),
                ));
                return Outcome::Refusal.exit_code();
            }
        };
        merge_reviewed(&mut profile, reviewed);
    }
    if let Some(container) = &cli.container {
        profile.container = container.trim().to_owned();
    }
    if let Some(pattern) = &cli.pattern {
        profile.pattern = pattern.clone();
    }
    if let Some(prefix) = &cli.prefix {
        profile.prefix = prefix.clone();
    }
    if let Some(suffix) = &cli.suffix {
        profile.suffix = suffix.clone();
    }

    // Processing needs a container and a pattern; inference gaps must be
    // filled by the operator before the run can proceed.
    let mut missing_inputs = Vec::new();
    if profile.container.is_empty() {
        missing_inputs.push("container");
    }
    if profile.pattern.is_empty() {
        missing_inputs.push("pattern");
    }
    if !missing_inputs.is_empty() {
        emit_envelope(&build_envelope(
            FaultCode::BadInput,
            "Missing processing inputs",
            json!({ "missing": missing_inputs }),
            Some(format!(
                "foliomatch infer {} --out rule.yaml",
                manifest_path.display()
            )),
        ));
        return Outcome::Refusal.exit_code();
    }

    let table = match open_reference_table(master_path, cli.sheet.as_deref()) {
        Ok(table) => table,
        Err(error) => {
            emit_envelope(&build_envelope(
                FaultCode::TableUnreadable,
                "Cannot read the QC master table",
                json!({ "path": master_path.display().to_string(), "error": error }),
                Some(format!("foliomatch sheets {}", master_path.display())),
            ));
            return Outcome::Refusal.exit_code();
        }
    };

    let selected_columns: Vec<String> = if cli.columns.is_empty() {
        reconcile::fields::default_report_columns(&table.columns)
    } else {
        cli.columns
            .iter()
            .map(|column| column.trim().to_owned())
            .collect()
    };
    if selected_columns.is_empty() {
        emit_envelope(&build_envelope(
            FaultCode::BadInput,
            "No report columns selected and no suggested QC column is present",
            json!({ "sheet": table.sheet, "columns": table.columns }),
            Some("pass --column <NAME> for each report column".to_owned()),
        ));
        return Outcome::Refusal.exit_code();
    }

    let Some(key_column) = table.locate_key_column() else {
        emit_envelope(&build_envelope(
            FaultCode::MissingKeyColumn,
            "The selected sheet has no 'Folio' column",
            json!({ "sheet": table.sheet, "columns": table.columns }),
            Some(format!("foliomatch sheets {}", master_path.display())),
        ));
        return Outcome::Refusal.exit_code();
    };

    let rule = match scan::ExtractionRule::compile(&profile.pattern, &profile.prefix, &profile.suffix)
    {
        Ok(rule) => rule,
        Err(error) => {
            emit_envelope(&build_envelope(
                FaultCode::BadInput,
                "Extraction pattern does not compile",
                json!({ "pattern": profile.pattern, "error": error }),
                None,
            ));
            return Outcome::Refusal.exit_code();
        }
    };

    let (keys, sack_counts) = if cli.sacks {
        match rule.folio_keys_with_sacks(&extracted.raw_text) {
            Ok(extraction) => {
                for folio in &extraction.overwritten {
                    report_warning(
                        "W_DUPLICATE_SACK",
                        &format!(
                            "folio {folio} repeats in the manifest; keeping the last sack count"
                        ),
                    );
                }
                (extraction.keys, Some(extraction.counts))
            }
            Err(error) => {
                emit_envelope(&build_envelope(
                    FaultCode::BadInput,
                    "Sack-count pattern does not compile",
                    json!({ "pattern": profile.pattern, "error": error }),
                    None,
                ));
                return Outcome::Refusal.exit_code();
            }
        }
    } else {
        (rule.folio_keys(&extracted.raw_text), None)
    };

    if keys.is_empty() {
        report_warning(
            "W_NO_KEYS",
            "no valid folio codes extracted; review the pattern and the prefix/suffix trims",
        );
    }

    let reconciliation = reconcile::reconcile(
        &keys,
        sack_counts.as_ref(),
        &table,
        key_column,
        &profile.container,
        cli.progress,
    );
    if !reconciliation.missing.is_empty() {
        report_warning(
            "W_MISSING_FOLIOS",
            &format!(
                "{} of {} folios not found in sheet '{}'",
                reconciliation.missing.len(),
                reconciliation.total,
                table.sheet
            ),
        );
    }

    let average_columns = if cli.avg_columns.is_empty() {
        aggregate::default_average_columns(&reconciliation.found, &selected_columns)
    } else {
        cli.avg_columns.clone()
    };
    let averages = aggregate::column_means(&reconciliation.found, &average_columns);

    // The date column must exist among the full sheet columns, not just the
    // operator-selected subset.
    let mut daily = None;
    if cli.sacks && !reconciliation.found.is_empty() {
        if table.column_index(&cli.date_column).is_some() {
            daily = aggregate::daily_sack_totals(&reconciliation.found, &cli.date_column);
        } else {
            report_info(&format!(
                "daily sack summary skipped: column '{}' not present in sheet '{}'",
                cli.date_column, table.sheet
            ));
        }
    }

    let mut report_path = None;
    if reconciliation.found.is_empty() {
        if !keys.is_empty() {
            report_warning(
                "W_NO_MATCHES",
                "none of the extracted folios was found in the master; report not written",
            );
        }
    } else {
        let path = cli
            .out
            .clone()
            .unwrap_or_else(|| PathBuf::from(format!("Reporte_{}.xlsx", profile.container)));
        match report::write_report(&path, &reconciliation.found, &selected_columns, cli.sacks) {
            Ok(()) => report_path = Some(path),
            Err(error) => {
                emit_envelope(&build_envelope(
                    FaultCode::ReportUnwritable,
                    "Cannot write the report workbook",
                    json!({ "path": path.display().to_string(), "error": error }),
                    None,
                ));
                return Outcome::Refusal.exit_code();
            }
        }
    }

    let degraded = keys.is_empty()
        || !reconciliation.all_found()
        || reconciliation.found.is_empty()
        || (cli.sacks && daily.is_none());
    let outcome = if degraded {
        Outcome::Partial
    } else {
        Outcome::AllFound
    };

    let summary = report::build_summary(
        outcome_text(outcome),
        &profile,
        &reconciliation,
        &averages,
        daily.as_ref(),
        report_path.as_deref(),
    );
    let mut stdout = io::stdout();
    if let Err(error) = report::write_summary(&mut stdout, &summary) {
        eprintln!("Error writing run summary: {error}");
        return Outcome::Refusal.exit_code();
    }

    outcome.exit_code()
}

/// Handle the infer subcommand: scan only, emit a reviewable profile.
fn handle_infer(manifest_path: &Path, text_override: Option<&Path>, out_path: Option<&Path>) -> u8 {
    use std::fs;

    let mut cache = ExtractionCache::new();
    let extracted = match scan_manifest(manifest_path, text_override, &mut cache) {
        Ok(extracted) => extracted,
        Err(error) => {
            emit_envelope(&build_envelope(
                FaultCode::BadInput,
                "Cannot read manifest",
                json!({ "path": manifest_path.display().to_string(), "error": error }),
                None,
            ));
            return 2;
        }
    };

    if extracted.container.is_empty() {
        report_warning("W_NO_CONTAINER", "no container token found in manifest text");
    }
    let inferred = scan::infer_pattern(&extracted.raw_text);
    if inferred.is_empty() {
        report_warning(
            "W_NO_PATTERN",
            "no extraction pattern inferable from manifest text",
        );
    }

    let profile = ScanProfile {
        container: extracted.container,
        pattern: inferred.pattern,
        prefix: inferred.prefix,
        suffix: inferred.suffix,
        candidate_count: inferred.candidate_count,
    };
    let yaml = match profile.to_yaml() {
        Ok(yaml) => yaml,
        Err(error) => {
            emit_envelope(&build_envelope(
                FaultCode::BadInput,
                "Cannot render scan profile",
                json!({ "error": error }),
                None,
            ));
            return 2;
        }
    };

    if let Some(path) = out_path {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && let Err(error) = fs::create_dir_all(parent)
        {
            eprintln!(
                "Error: failed to create output directory '{}': {error}",
                parent.display()
            );
            return 2;
        }
        if let Err(error) = fs::write(path, &yaml) {
            eprintln!(
                "Error: failed writing output file '{}': {error}",
                path.display()
            );
            return 2;
        }
    } else {
        print!("{yaml}");
    }

    if profile.container.is_empty() || profile.pattern.is_empty() {
        1
    } else {
        0
    }
}

/// Handle the sheets subcommand: list sheet names, or one sheet's headers.
fn handle_sheets(master_path: &Path, sheet: Option<&str>) -> u8 {
    let document = match document::open_table(master_path) {
        Ok(document) => document,
        Err(error) => {
            emit_envelope(&table_unreadable_envelope(master_path, &error));
            return 2;
        }
    };

    match sheet {
        None => match document.sheet_names() {
            Ok(names) => {
                for name in names {
                    println!("{name}");
                }
                0
            }
            Err(error) => {
                emit_envelope(&table_unreadable_envelope(master_path, &error));
                2
            }
        },
        Some(name) => match reconcile::ReferenceTable::load(&document, Some(name)) {
            Ok(table) => {
                for column in &table.columns {
                    if !column.is_empty() {
                        println!("{column}");
                    }
                }
                0
            }
            Err(error) => {
                emit_envelope(&table_unreadable_envelope(master_path, &error));
                2
            }
        },
    }
}

/// Read the manifest and produce its `(container, raw text)` pair through
/// the extraction cache. Extraction failure degrades to an empty container
/// with the error text standing in for the raw text; only an unreadable or
/// unsupported file is an error here.
fn scan_manifest(
    path: &Path,
    text_override: Option<&Path>,
    cache: &mut ExtractionCache,
) -> Result<ExtractedManifest, String> {
    let bytes = std::fs::read(path)
        .map_err(|error| format!("failed reading manifest '{}': {error}", path.display()))?;
    let manifest = document::open_manifest(path)?;

    let mut extracted = cache.lookup_or_extract(&bytes, || match manifest.raw_text() {
        Ok(raw_text) => {
            let container = scan::find_container_id(&raw_text);
            ExtractedManifest {
                container,
                raw_text,
            }
        }
        Err(error) => {
            report_warning("W_EXTRACTION_FAILED", &error);
            ExtractedManifest {
                container: String::new(),
                raw_text: error,
            }
        }
    });

    if let Some(text_path) = text_override {
        let corrected = std::fs::read_to_string(text_path).map_err(|error| {
            format!(
                "failed reading corrected text '{}': {error}",
                text_path.display()
            )
        })?;
        extracted.raw_text = corrected;
        if extracted.container.is_empty() {
            extracted.container = scan::find_container_id(&extracted.raw_text);
        }
    }

    Ok(extracted)
}

/// Non-empty fields of a reviewed profile replace the inferred ones;
/// individual CLI flags still win afterwards.
fn merge_reviewed(profile: &mut ScanProfile, reviewed: ScanProfile) {
    if !reviewed.container.is_empty() {
        profile.container = reviewed.container;
    }
    if !reviewed.pattern.is_empty() {
        profile.pattern = reviewed.pattern;
    }
    if !reviewed.prefix.is_empty() {
        profile.prefix = reviewed.prefix;
    }
    if !reviewed.suffix.is_empty() {
        profile.suffix = reviewed.suffix;
    }
    if reviewed.candidate_count > 0 {
        profile.candidate_count = reviewed.candidate_count;
    }
}

fn load_scan_profile(path: &Path) -> Result<ScanProfile, String> {
    let yaml = std::fs::read_to_string(path)
        .map_err(|error| format!("failed reading scan profile '{}': {error}", path.display()))?;
    ScanProfile::from_yaml(&yaml)
}

fn open_reference_table(
    path: &Path,
    sheet: Option<&str>,
) -> Result<reconcile::ReferenceTable, String> {
    let document = document::open_table(path)?;
    reconcile::ReferenceTable::load(&document, sheet)
}

fn table_unreadable_envelope(path: &Path, error: &str) -> FaultEnvelope {
    build_envelope(
        FaultCode::TableUnreadable,
        "Cannot read the QC master table",
        json!({ "path": path.display().to_string(), "error": error }),
        None,
    )
}

fn outcome_text(outcome: cli::Outcome) -> &'static str {
    match outcome {
        cli::Outcome::AllFound => "ALL_FOUND",
        cli::Outcome::Partial => "PARTIAL",
        cli::Outcome::Refusal => "BLOCKED",
    }
}

/// Output a fault envelope to stdout.
fn emit_envelope(envelope: &FaultEnvelope) {
    if let Ok(json) = serde_json::to_string(envelope) {
        println!("{}", json);
    }
}
