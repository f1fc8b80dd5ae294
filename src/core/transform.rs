use crate::domain::model::{CoercionPolicy, LocationRecord, RawRow, TransformResult};
use crate::utils::error::{EtlError, Result};
use serde_json::Value;

/// 過濾缺少座標或城市/州的列，並將其餘列轉為 `LocationRecord`。
///
/// 缺欄位的列只計入 `skipped`。欄位存在但轉型失敗時依 `policy`
/// 決定中止 (`Fail`) 或同樣跳過 (`Skip`)。輸出保持輸入順序。
pub fn transform_rows(rows: Vec<RawRow>, policy: CoercionPolicy) -> Result<TransformResult> {
    let mut result = TransformResult::default();

    for (index, row) in rows.into_iter().enumerate() {
        if !is_truthy(row.get("lat")) || !is_truthy(row.get("lon")) {
            tracing::debug!("Row {} skipped: missing coordinates", index);
            result.skipped += 1;
            continue;
        }

        if !is_truthy(row.get("city")) || !is_truthy(row.get("state")) {
            tracing::debug!("Row {} skipped: missing city/state", index);
            result.skipped += 1;
            continue;
        }

        match coerce_row(&row) {
            Ok(record) => result.records.push(record),
            Err(e) => match policy {
                CoercionPolicy::Fail => return Err(e),
                CoercionPolicy::Skip => {
                    tracing::warn!("Row {} skipped: {}", index, e);
                    result.skipped += 1;
                }
            },
        }
    }

    Ok(result)
}

/// null、false、0、空字串、空陣列與空物件視為假值
pub fn is_truthy(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Array(items)) => !items.is_empty(),
        Some(Value::Object(map)) => !map.is_empty(),
    }
}

fn coerce_row(row: &RawRow) -> Result<LocationRecord> {
    Ok(LocationRecord {
        city: coerce_string(row, "city")?,
        state: coerce_string(row, "state")?,
        category: coerce_string(row, "category")?,
        lat: coerce_float(row, "lat")?,
        lon: coerce_float(row, "lon")?,
        interview_count: coerce_count(row, "interview_count")?,
    })
}

fn coercion_error(field: &str, value: Option<&Value>, reason: &str) -> EtlError {
    EtlError::CoercionError {
        field: field.to_string(),
        value: value.map(Value::to_string).unwrap_or_else(|| "<missing>".to_string()),
        reason: reason.to_string(),
    }
}

fn coerce_string(row: &RawRow, field: &str) -> Result<String> {
    match row.get(field) {
        Some(Value::String(s)) => Ok(s.clone()),
        other => Err(coercion_error(field, other, "expected a string")),
    }
}

fn coerce_float(row: &RawRow, field: &str) -> Result<f64> {
    let value = row.get(field);
    let parsed = match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    };

    match parsed {
        Some(f) if f.is_finite() => Ok(f),
        Some(_) => Err(coercion_error(field, value, "not a finite number")),
        None => Err(coercion_error(field, value, "not a number")),
    }
}

fn coerce_count(row: &RawRow, field: &str) -> Result<u64> {
    let value = row.get(field);
    let parsed = match value {
        Some(Value::Number(n)) => n.as_u64().or_else(|| {
            n.as_f64()
                .filter(|f| f.fract() == 0.0 && *f >= 0.0 && *f <= u64::MAX as f64)
                .map(|f| f as u64)
        }),
        Some(Value::String(s)) => s.trim().parse::<u64>().ok(),
        _ => None,
    };

    parsed.ok_or_else(|| coercion_error(field, value, "not a non-negative integer"))
}
