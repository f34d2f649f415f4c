// Reference validator - cross-checks expression values against the
// dictionary and the record graph. Pure counting pass, never mutates.

use indexmap::IndexMap;

use crate::diagnostics::Warnings;

use super::model::{Dictionary, RecordCollection};
use super::value_type::ValueType;

/// Validate every expression of every record (entities then constraints, in
/// insertion order) and report invalid values, dangling references, and
/// entries nothing points at. Returns warnings only; validation never fails
/// the pipeline.
pub fn validate_collection(collection: &RecordCollection, dictionary: &Dictionary) -> Vec<String> {
    let mut warnings = Warnings::new();

    let mut dict_refs: IndexMap<&str, u32> =
        dictionary.keys().map(|k| (k.as_str(), 0)).collect();
    let mut edict_refs: IndexMap<&str, u32> = collection
        .entity_ids()
        .chain(collection.constraint_ids())
        .map(|id| (id, 0))
        .collect();

    let all_records = collection.entities().chain(collection.constraints());
    for record in all_records {
        let id = record.id();
        for (idx, expr) in record.expressions().iter().enumerate() {
            let expr_num = idx + 1;

            if !expr.is_valid() {
                warnings.push(format!(
                    "Edict {id} expression {expr_num} value doesn't match type"
                ));
                continue;
            }

            for (side, value_type, value) in [
                ("left", expr.left_type(), expr.left_value()),
                ("right", expr.right_type(), expr.right_value()),
            ] {
                match value_type {
                    ValueType::TableRef => {
                        if collection.get_edict(value).is_none() {
                            warnings.push(format!(
                                "Edict {id} expression {expr_num} {side} value references a non-existent edict"
                            ));
                        } else if let Some(count) = edict_refs.get_mut(value) {
                            *count += 1;
                        }
                    }
                    ValueType::DictionaryRef | ValueType::DictionaryRefEscaped => {
                        if !dictionary.contains_key(value) {
                            warnings.push(format!(
                                "Edict {id} expression {expr_num} {side} value references a non-existent dictionary entry"
                            ));
                        } else if let Some(count) = dict_refs.get_mut(value) {
                            *count += 1;
                        }
                    }
                    _ => {}
                }
            }
        }
    }

    for (key, count) in &dict_refs {
        if *count == 0 {
            warnings.push(format!("Dictionary entry {key} is never referenced"));
        }
    }
    for (id, count) in &edict_refs {
        if *count == 0 {
            warnings.push(format!("Edict {id} is never referenced"));
        }
    }

    warnings.into_vec()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::model::RecordKind;
    use crate::parser::records::parse_records;

    fn collection_from(entities: &[&str], constraints: &[&str]) -> RecordCollection {
        let entity_units: Vec<String> = entities.iter().map(|s| s.to_string()).collect();
        let constraint_units: Vec<String> = constraints.iter().map(|s| s.to_string()).collect();

        let parsed_entities = parse_records(&entity_units, RecordKind::Entity);
        let parsed_constraints = parse_records(&constraint_units, RecordKind::Constraint);

        let mut collection = RecordCollection::new();
        collection.set_entities(parsed_entities.records, parsed_entities.head_id);
        collection.set_constraints(parsed_constraints.records, parsed_constraints.head_id);
        collection
    }

    fn dict(pairs: &[(&str, &str)]) -> Dictionary {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_invalid_value_skips_reference_checks() {
        // Boolean "x" fails its validator, so the dangling TableRef on the
        // right side must not be reported
        let collection = collection_from(&["HA{B:x=T:nope;}"], &["HB{N:1;}"]);
        let warnings = validate_collection(&collection, &Dictionary::new());

        assert!(warnings.contains(&"Edict HA expression 1 value doesn't match type".to_string()));
        assert!(!warnings.iter().any(|w| w.contains("non-existent edict")));
    }

    #[test]
    fn test_dangling_edict_reference() {
        let collection = collection_from(&["HA{T:ghost;}"], &["HB{N:1;}"]);
        let warnings = validate_collection(&collection, &Dictionary::new());
        assert!(warnings.contains(
            &"Edict HA expression 1 left value references a non-existent edict".to_string()
        ));
    }

    #[test]
    fn test_dangling_dictionary_reference_keeps_counter_at_zero() {
        let collection = collection_from(&["HA{Y:k;}"], &["HB{N:1;}"]);
        let dictionary = dict(&[("other", "value")]);
        let warnings = validate_collection(&collection, &dictionary);

        assert!(warnings.contains(
            &"Edict HA expression 1 left value references a non-existent dictionary entry"
                .to_string()
        ));
        // The miss must not count as a reference to anything
        assert!(warnings.contains(&"Dictionary entry other is never referenced".to_string()));
    }

    #[test]
    fn test_referenced_entries_not_reported() {
        let collection = collection_from(&["HA{T:HB;Y:k;}"], &["HB{T:HA;}"]);
        let dictionary = dict(&[("k", "display")]);
        let warnings = validate_collection(&collection, &dictionary);

        assert!(!warnings.iter().any(|w| w == "Edict HA is never referenced"));
        assert!(!warnings.iter().any(|w| w == "Edict HB is never referenced"));
        assert!(!warnings.iter().any(|w| w.contains("Dictionary entry k")));
    }

    #[test]
    fn test_unreferenced_entries_reported_in_order() {
        let collection = collection_from(&["HA{N:1;}"], &["HB{N:2;}"]);
        let dictionary = dict(&[("unused", "value")]);
        let warnings = validate_collection(&collection, &dictionary);

        assert_eq!(
            warnings,
            vec![
                "Dictionary entry unused is never referenced".to_string(),
                "Edict HA is never referenced".to_string(),
                "Edict HB is never referenced".to_string(),
            ]
        );
    }

    #[test]
    fn test_escaped_dictionary_ref_counts_like_plain() {
        let collection = collection_from(&["HA{Z:k;}"], &["HB{N:1;}"]);
        let dictionary = dict(&[("k", "display")]);
        let warnings = validate_collection(&collection, &dictionary);
        assert!(!warnings.iter().any(|w| w.contains("Dictionary entry k")));
    }

    #[test]
    fn test_right_side_checked_independently() {
        let collection = collection_from(&["HA{N:1=T:ghost;}"], &["HB{N:2;}"]);
        let warnings = validate_collection(&collection, &Dictionary::new());
        assert!(warnings.contains(
            &"Edict HA expression 1 right value references a non-existent edict".to_string()
        ));
    }

    #[test]
    fn test_deterministic_output() {
        let collection = collection_from(&["HA{T:HB;}"], &["HB{N:1;}"]);
        let dictionary = dict(&[("k", "v")]);
        let first = validate_collection(&collection, &dictionary);
        let second = validate_collection(&collection, &dictionary);
        assert_eq!(first, second);
    }

    #[test]
    fn test_self_reference_counts() {
        let collection = collection_from(&["HA{T:HA;}"], &["HB{N:1;}"]);
        let warnings = validate_collection(&collection, &Dictionary::new());
        assert!(!warnings.iter().any(|w| w == "Edict HA is never referenced"));
        assert!(warnings.contains(&"Edict HB is never referenced".to_string()));
    }
}
