use archlens_core::columns::{BOUNDED_SCORE_COLUMNS, LAST_UPDATED, NON_NEGATIVE_COLUMNS};
use archlens_core::{Column, Table, Value};
use chrono::NaiveDate;

use crate::config::EngineConfig;
use crate::errors::EvalError;
use crate::load::parse_date;
use crate::metrics::{QualityIssue, QualityIssueKind, QualityLevel, QualityScore};
use crate::stats::ratio;

pub const EXCELLENT_MIN: f64 = 90.0;
pub const GOOD_MIN: f64 = 80.0;
pub const SATISFACTORY_MIN: f64 = 70.0;

const SCORE_MIN: f64 = 0.0;
const SCORE_MAX: f64 = 100.0;

impl QualityLevel {
    pub fn from_score(score: f64) -> Self {
        if score >= EXCELLENT_MIN {
            QualityLevel::Excellent
        } else if score >= GOOD_MIN {
            QualityLevel::Good
        } else if score >= SATISFACTORY_MIN {
            QualityLevel::Satisfactory
        } else {
            QualityLevel::NeedsImprovement
        }
    }
}

/// Score the table on completeness, consistency and accuracy.
///
/// Consistency penalizes negative values in the non-negative columns and
/// future-dated rows in the last-updated column. Accuracy penalizes scores
/// outside `[0, 100]`. Each penalty is `violating_rows / rows * weight`; both
/// sub-scores are floored at zero. Fails only when a monitored column exists
/// but is not numeric.
pub fn score_quality(
    table: &Table,
    config: &EngineConfig,
    completeness: f64,
) -> Result<QualityScore, EvalError> {
    let rows = table.row_count();
    let mut issues = Vec::new();

    let mut consistency = SCORE_MAX;
    for column in NON_NEGATIVE_COLUMNS {
        let Some(values) = table.numeric(column)? else {
            continue;
        };
        let negatives = values
            .iter()
            .flatten()
            .filter(|value| **value < 0.0)
            .count();
        if negatives > 0 {
            let penalty = ratio(negatives, rows) * config.penalty_weight;
            consistency -= penalty;
            issues.push(QualityIssue {
                column: column.to_string(),
                kind: QualityIssueKind::NegativeValues,
                rows: negatives,
                penalty,
            });
        }
    }

    if let Some(column) = table.column(LAST_UPDATED) {
        match check_dates(column, config.as_of) {
            DateCheck::Parsed { future } if future > 0 => {
                let penalty = ratio(future, rows) * config.penalty_weight;
                consistency -= penalty;
                issues.push(QualityIssue {
                    column: column.name.clone(),
                    kind: QualityIssueKind::FutureDated,
                    rows: future,
                    penalty,
                });
            }
            DateCheck::Parsed { .. } => {}
            DateCheck::Unparsable { rows: bad } => {
                consistency -= config.unparsable_date_penalty;
                issues.push(QualityIssue {
                    column: column.name.clone(),
                    kind: QualityIssueKind::UnparsableDates,
                    rows: bad,
                    penalty: config.unparsable_date_penalty,
                });
            }
        }
    }

    let mut accuracy = SCORE_MAX;
    for column in BOUNDED_SCORE_COLUMNS {
        let Some(values) = table.numeric(column)? else {
            continue;
        };
        let out_of_range = values
            .iter()
            .flatten()
            .filter(|value| **value < SCORE_MIN || **value > SCORE_MAX)
            .count();
        if out_of_range > 0 {
            let penalty = ratio(out_of_range, rows) * config.penalty_weight;
            accuracy -= penalty;
            issues.push(QualityIssue {
                column: column.to_string(),
                kind: QualityIssueKind::OutOfRange,
                rows: out_of_range,
                penalty,
            });
        }
    }

    let consistency = consistency.max(SCORE_MIN);
    let accuracy = accuracy.max(SCORE_MIN);
    let overall = (completeness + consistency + accuracy) / 3.0;

    tracing::debug!(
        event = "quality_scored",
        completeness,
        consistency,
        accuracy,
        overall,
        issues = issues.len()
    );

    Ok(QualityScore {
        completeness,
        consistency,
        accuracy,
        overall,
        level: QualityLevel::from_score(overall),
        issues,
    })
}

enum DateCheck {
    Parsed { future: usize },
    Unparsable { rows: usize },
}

/// Count future-dated rows, or report the column as unparsable when any
/// non-null value cannot be read as a date.
fn check_dates(column: &Column, as_of: NaiveDate) -> DateCheck {
    let mut future = 0usize;
    let mut unparsable = 0usize;

    for value in &column.values {
        let date = match value {
            _ if value.is_null() => continue,
            Value::Date(date) => Some(*date),
            Value::Text(text) => parse_date(text),
            Value::Number(_) | Value::Null => None,
        };
        match date {
            Some(date) if date > as_of => future += 1,
            Some(_) => {}
            None => unparsable += 1,
        }
    }

    if unparsable > 0 {
        DateCheck::Unparsable { rows: unparsable }
    } else {
        DateCheck::Parsed { future }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn as_of() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 1).expect("valid date")
    }

    #[test]
    fn level_bands_are_inclusive_at_lower_bound() {
        assert_eq!(QualityLevel::from_score(100.0), QualityLevel::Excellent);
        assert_eq!(QualityLevel::from_score(90.0), QualityLevel::Excellent);
        assert_eq!(QualityLevel::from_score(89.99), QualityLevel::Good);
        assert_eq!(QualityLevel::from_score(80.0), QualityLevel::Good);
        assert_eq!(QualityLevel::from_score(70.0), QualityLevel::Satisfactory);
        assert_eq!(
            QualityLevel::from_score(69.9),
            QualityLevel::NeedsImprovement
        );
    }

    #[test]
    fn date_check_counts_future_rows_in_text_columns() {
        let column = Column::categorical(
            LAST_UPDATED,
            [Some("2024-01-01"), Some("2025-01-01"), None],
        );
        match check_dates(&column, as_of()) {
            DateCheck::Parsed { future } => assert_eq!(future, 1),
            DateCheck::Unparsable { .. } => panic!("dates should parse"),
        }
    }

    #[test]
    fn date_check_flags_unparsable_text() {
        let column = Column::categorical(LAST_UPDATED, ["2024-01-01", "last tuesday"]);
        match check_dates(&column, as_of()) {
            DateCheck::Unparsable { rows } => assert_eq!(rows, 1),
            DateCheck::Parsed { .. } => panic!("text should not parse"),
        }
    }

    #[test]
    fn numeric_last_updated_is_unparsable() {
        let column = Column::numeric(LAST_UPDATED, [45000.0]);
        assert!(matches!(
            check_dates(&column, as_of()),
            DateCheck::Unparsable { rows: 1 }
        ));
    }
}
