// Record parser - turns edict unit strings into typed records
// One unit has the shape `<id>{<code>:<value>[=<code>:<value>];...}`

use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::diagnostics::Warnings;

use super::model::{Expression, Record, RecordKind, is_head_candidate};
use super::value_type::ValueType;

/// Outer unit shape. Ids and bodies never contain braces; anything outside
/// the braces is captured so it can be warned about.
static UNIT_SHAPE_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(.*?)([^{}]+)\{([^{}]*)\}(.*)$").expect("invalid unit regex"));

/// One expression: `<code>:<value>` optionally `=<code>:<value>`, terminated
/// by `;`.
static EXPRESSION_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(.):(.+?)(?:=(.):(.+?))?;").expect("invalid expression regex"));

/// Result of parsing one kind's unit strings.
#[derive(Debug, Clone, Default)]
pub struct ParsedRecords {
    pub records: IndexMap<String, Record>,
    pub head_id: Option<String>,
    pub warnings: Warnings,
}

/// Parse every unit string of one kind into records, detecting the head
/// candidate and reporting duplicates. Malformed units are discarded; all
/// other defects degrade to warnings on a best-effort record.
pub fn parse_records(units: &[String], kind: RecordKind) -> ParsedRecords {
    let mut parsed = ParsedRecords::default();

    for (unit_idx, unit) in units.iter().enumerate() {
        let Some(captures) = UNIT_SHAPE_REGEX.captures(unit) else {
            parsed
                .warnings
                .push(format!("Edict string at index {unit_idx} malformed"));
            continue;
        };

        let before = &captures[1];
        let id = &captures[2];
        let body = &captures[3];
        let after = &captures[4];

        if body.is_empty() {
            parsed
                .warnings
                .push(format!("Edict {id} body missing or empty"));
        }
        if !before.is_empty() {
            parsed
                .warnings
                .push(format!("Data found before edict {id} identifier"));
        }
        if !after.is_empty() {
            parsed
                .warnings
                .push(format!("Data found after edict {id} body"));
        }

        let mut record = Record::new(id, kind);
        parse_body(id, body, &mut record, &mut parsed.warnings);

        if parsed.records.contains_key(id) {
            parsed
                .warnings
                .push(format!("Edict {id} was defined multiple times"));
        }
        parsed.records.insert(id.to_string(), record);

        if is_head_candidate(id) {
            if parsed.head_id.is_some() {
                parsed.warnings.push(format!(
                    "Edict {id} looks like the head, but the head was already found"
                ));
            }
            parsed.head_id = Some(id.to_string());
        }
    }

    if parsed.head_id.is_none() {
        parsed.warnings.push(match kind {
            RecordKind::Entity => "Head entity not found",
            RecordKind::Constraint => "Head constraint not found",
        });
    }

    parsed
}

/// Assemble a record's expressions from its body text, in source order.
fn parse_body(id: &str, body: &str, record: &mut Record, warnings: &mut Warnings) {
    if body == ";" {
        warnings.push(format!("Edict {id} has no expressions. Is the edict necessary?"));
        record.add_expression(Expression::unset());
        return;
    }

    let matches: Vec<regex::Captures<'_>> = EXPRESSION_REGEX.captures_iter(body).collect();
    if matches.is_empty() {
        warnings.push(format!("Edict {id} body missing at least 1 separator"));
        record.add_expression(Expression::unset());
        return;
    }

    let first_start = matches[0].get(0).expect("whole match").start();
    if first_start > 0 {
        warnings.push(format!("Data found before edict {id} first expression"));
    }

    for (idx, captures) in matches.iter().enumerate() {
        let expr_num = idx + 1;
        let whole = captures.get(0).expect("whole match");

        // Unmatched text between this expression and the next (or the body
        // end) is dropped, with a warning naming the expression it follows
        let gap_end = matches
            .get(idx + 1)
            .map(|next| next.get(0).expect("whole match").start())
            .unwrap_or(body.len());
        if gap_end > whole.end() {
            warnings.push(format!("Data found after edict {id} expression {expr_num}"));
        }

        let left_code = captures[1].chars().next().expect("single-char code");
        let left_type = ValueType::from_code(left_code);
        let left_value = captures[2].to_string();
        if left_type == ValueType::Unset {
            warnings.push(format!("Edict {id} expression {expr_num} left type unsupported"));
        }
        if left_type == ValueType::DictionaryRefEscaped {
            warnings.push(format!("Edict {id} expression {expr_num} left type deprecated"));
        }

        // The right half is optional; when absent it stays Unset/"" with no
        // warning. Warnings fire only for a present but unresolvable code.
        let (right_type, right_value) = match (captures.get(3), captures.get(4)) {
            (Some(code), Some(value)) => {
                let right_code = code.as_str().chars().next().expect("single-char code");
                let right_type = ValueType::from_code(right_code);
                if right_type == ValueType::Unset {
                    warnings.push(format!(
                        "Edict {id} expression {expr_num} right type unsupported"
                    ));
                }
                if right_type == ValueType::DictionaryRefEscaped {
                    warnings.push(format!(
                        "Edict {id} expression {expr_num} right type deprecated"
                    ));
                }
                (right_type, value.as_str().to_string())
            }
            _ => (ValueType::Unset, String::new()),
        };

        record.add_expression(Expression::new(left_type, left_value, right_type, right_value));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn units(strings: &[&str]) -> Vec<String> {
        strings.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_single_record_single_expression() {
        let parsed = parse_records(&units(&["HA{T:1;}"]), RecordKind::Entity);
        assert!(parsed.warnings.is_empty(), "{:?}", parsed.warnings);
        assert_eq!(parsed.head_id.as_deref(), Some("HA"));

        let record = parsed.records.get("HA").unwrap();
        assert_eq!(record.kind(), RecordKind::Entity);
        assert_eq!(record.expressions().len(), 1);

        let expr = &record.expressions()[0];
        assert_eq!(expr.left_type(), ValueType::TableRef);
        assert_eq!(expr.left_value(), "1");
        assert_eq!(expr.right_type(), ValueType::Unset);
        assert_eq!(expr.right_value(), "");
    }

    #[test]
    fn test_paired_expression_sides() {
        let parsed = parse_records(&units(&["HA{Y:key=N:5;}"]), RecordKind::Entity);
        assert!(parsed.warnings.is_empty(), "{:?}", parsed.warnings);

        let expr = &parsed.records.get("HA").unwrap().expressions()[0];
        assert_eq!(expr.left_type(), ValueType::DictionaryRef);
        assert_eq!(expr.left_value(), "key");
        assert_eq!(expr.right_type(), ValueType::Number);
        assert_eq!(expr.right_value(), "5");
    }

    #[test]
    fn test_expressions_keep_source_order() {
        let parsed = parse_records(&units(&["HA{N:1;S:\"x\";B:t;}"]), RecordKind::Entity);
        let exprs = parsed.records.get("HA").unwrap().expressions();
        assert_eq!(exprs.len(), 3);
        assert_eq!(exprs[0].left_type(), ValueType::Number);
        assert_eq!(exprs[1].left_type(), ValueType::QuotedString);
        assert_eq!(exprs[2].left_type(), ValueType::Boolean);
    }

    #[test]
    fn test_malformed_unit_discarded() {
        let parsed = parse_records(&units(&["no braces"]), RecordKind::Entity);
        assert!(parsed.records.is_empty());
        assert!(
            parsed
                .warnings
                .iter()
                .any(|w| w == "Edict string at index 0 malformed")
        );
    }

    #[test]
    fn test_empty_body_still_produces_record() {
        let parsed = parse_records(&units(&["HA{}"]), RecordKind::Entity);
        let record = parsed.records.get("HA").unwrap();
        assert_eq!(record.expressions(), &[Expression::unset()]);
        assert!(
            parsed
                .warnings
                .iter()
                .any(|w| w == "Edict HA body missing or empty")
        );
        assert!(
            parsed
                .warnings
                .iter()
                .any(|w| w == "Edict HA body missing at least 1 separator")
        );
    }

    #[test]
    fn test_lone_semicolon_body() {
        let parsed = parse_records(&units(&["HA{;}"]), RecordKind::Entity);
        let record = parsed.records.get("HA").unwrap();
        assert_eq!(record.expressions(), &[Expression::unset()]);
        assert!(
            parsed
                .warnings
                .iter()
                .any(|w| w == "Edict HA has no expressions. Is the edict necessary?")
        );
    }

    #[test]
    fn test_missing_separator_body() {
        let parsed = parse_records(&units(&["HA{T:1}"]), RecordKind::Entity);
        let record = parsed.records.get("HA").unwrap();
        assert_eq!(record.expressions(), &[Expression::unset()]);
        assert!(
            parsed
                .warnings
                .iter()
                .any(|w| w == "Edict HA body missing at least 1 separator")
        );
    }

    #[test]
    fn test_unsupported_left_type_warns() {
        let parsed = parse_records(&units(&["HA{Q:1;}"]), RecordKind::Entity);
        let expr = &parsed.records.get("HA").unwrap().expressions()[0];
        assert_eq!(expr.left_type(), ValueType::Unset);
        assert!(
            parsed
                .warnings
                .iter()
                .any(|w| w == "Edict HA expression 1 left type unsupported")
        );
    }

    #[test]
    fn test_deprecated_type_warns_per_side() {
        let parsed = parse_records(&units(&["HA{Z:k=Z:j;}"]), RecordKind::Entity);
        assert!(
            parsed
                .warnings
                .iter()
                .any(|w| w == "Edict HA expression 1 left type deprecated")
        );
        assert!(
            parsed
                .warnings
                .iter()
                .any(|w| w == "Edict HA expression 1 right type deprecated")
        );
    }

    #[test]
    fn test_gap_after_expression_warns() {
        let parsed = parse_records(&units(&["HA{T:1;junk}"]), RecordKind::Entity);
        assert!(
            parsed
                .warnings
                .iter()
                .any(|w| w == "Data found after edict HA expression 1")
        );
        // The junk is dropped, not parsed
        assert_eq!(parsed.records.get("HA").unwrap().expressions().len(), 1);
    }

    #[test]
    fn test_trailing_data_after_body_warns() {
        let parsed = parse_records(&units(&["HA{T:1;}tail"]), RecordKind::Entity);
        assert!(
            parsed
                .warnings
                .iter()
                .any(|w| w == "Data found after edict HA body")
        );
        assert!(parsed.records.contains_key("HA"));
    }

    #[test]
    fn test_duplicate_id_last_wins() {
        let parsed = parse_records(&units(&["DUP{N:1;}", "DUP{N:2;}"]), RecordKind::Entity);
        assert!(
            parsed
                .warnings
                .iter()
                .any(|w| w == "Edict DUP was defined multiple times")
        );
        assert_eq!(parsed.records.len(), 1);
        assert_eq!(
            parsed.records.get("DUP").unwrap().expressions()[0].left_value(),
            "2"
        );
    }

    #[test]
    fn test_last_head_candidate_wins() {
        let parsed = parse_records(
            &units(&["H1{N:1;}", "A{N:2;}", "H2{N:3;}"]),
            RecordKind::Entity,
        );
        assert_eq!(parsed.head_id.as_deref(), Some("H2"));
        assert!(
            parsed
                .warnings
                .iter()
                .any(|w| w == "Edict H2 looks like the head, but the head was already found")
        );
    }

    #[test]
    fn test_missing_head_warns_per_kind() {
        let entities = parse_records(&units(&["A{N:1;}"]), RecordKind::Entity);
        assert!(entities.warnings.iter().any(|w| w == "Head entity not found"));

        let constraints = parse_records(&units(&["A{N:1;}"]), RecordKind::Constraint);
        assert!(
            constraints
                .warnings
                .iter()
                .any(|w| w == "Head constraint not found")
        );
    }

    #[test]
    fn test_type_codes_case_insensitive() {
        let parsed = parse_records(&units(&["HA{t:1;}"]), RecordKind::Entity);
        assert!(parsed.warnings.is_empty(), "{:?}", parsed.warnings);
        let expr = &parsed.records.get("HA").unwrap().expressions()[0];
        assert_eq!(expr.left_type(), ValueType::TableRef);
    }
}
