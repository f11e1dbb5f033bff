//! Detection files: CSV (polars) or JSON (serde), chosen by extension.

use anyhow::{bail, Context, Result};
use polars::prelude::*;
use slqe::api::Detection;
use std::fs;
use std::path::Path;

/// Columns a detection CSV must carry, in any order.
pub const CSV_COLUMNS: [&str; 6] = ["label", "confidence", "center_x", "center_y", "width", "height"];

pub fn load_detections(path: &Path) -> Result<Vec<Detection>> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("csv") => load_csv(path),
        Some("json") => load_json(path),
        other => bail!("unsupported detection file extension: {other:?} ({})", path.display()),
    }
}

fn load_json(path: &Path) -> Result<Vec<Detection>> {
    let text = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parsing detections in {}", path.display()))
}

fn float_column(df: &DataFrame, name: &str) -> Result<Vec<f64>> {
    let series = df
        .column(name)
        .with_context(|| format!("missing column {name}"))?
        .cast(&DataType::Float64)?;
    series
        .f64()?
        .into_iter()
        .enumerate()
        .map(|(row, v)| v.with_context(|| format!("null {name} in row {row}")))
        .collect()
}

fn load_csv(path: &Path) -> Result<Vec<Detection>> {
    let df = LazyCsvReader::new(path)
        .with_has_header(true)
        .with_infer_schema_length(Some(100))
        .finish()
        .with_context(|| format!("opening {}", path.display()))?
        .select(CSV_COLUMNS.iter().map(|c| col(*c)).collect::<Vec<_>>())
        .collect()
        .with_context(|| format!("reading detection columns from {}", path.display()))?;
    tracing::debug!(rows = df.height(), cols = df.width(), "detections_csv_shape");

    let labels = df
        .column("label")?
        .cast(&DataType::String)?
        .str()?
        .into_iter()
        .enumerate()
        .map(|(row, v)| {
            v.map(str::to_string)
                .with_context(|| format!("null label in row {row}"))
        })
        .collect::<Result<Vec<_>>>()?;
    let confidence = float_column(&df, "confidence")?;
    let cx = float_column(&df, "center_x")?;
    let cy = float_column(&df, "center_y")?;
    let w = float_column(&df, "width")?;
    let h = float_column(&df, "height")?;

    Ok(labels
        .into_iter()
        .enumerate()
        .map(|(i, label)| Detection::new(label, confidence[i], (cx[i], cy[i], w[i], h[i])))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn csv_and_json_agree() {
        let dir = tempdir().unwrap();
        let csv = dir.path().join("d.csv");
        fs::write(
            &csv,
            "label,confidence,center_x,center_y,width,height\n\
             1,0.9,0.5,0.3,0.05,0.1\n\
             -,0.8,0.5,0.5,0.2,0.02\n\
             2,0.9,0.5,0.7,0.05,0.1\n",
        )
        .unwrap();
        let json = dir.path().join("d.json");
        fs::write(
            &json,
            r#"[
              {"label": "1", "confidence": 0.9, "bbox": {"center_x": 0.5, "center_y": 0.3, "width": 0.05, "height": 0.1}},
              {"label": "-", "confidence": 0.8, "bbox": {"center_x": 0.5, "center_y": 0.5, "width": 0.2, "height": 0.02}},
              {"label": "2", "confidence": 0.9, "bbox": {"center_x": 0.5, "center_y": 0.7, "width": 0.05, "height": 0.1}}
            ]"#,
        )
        .unwrap();
        let from_csv = load_detections(&csv).unwrap();
        let from_json = load_detections(&json).unwrap();
        assert_eq!(from_csv.len(), 3);
        assert_eq!(from_csv, from_json);
        assert_eq!(slqe::api::assemble(&from_csv).unwrap(), "1/2");
    }

    #[test]
    fn unknown_extension_is_rejected() {
        let err = load_detections(Path::new("detections.txt")).unwrap_err();
        assert!(err.to_string().contains("unsupported"));
    }
}
