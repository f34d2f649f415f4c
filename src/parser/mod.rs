// Save-file parser: sections, records, typed values, reference validation
// Parsing is lenient - defects accumulate as warnings, only missing
// sections reject the whole file

pub mod model;
pub mod records;
pub mod sections;
pub mod validator;
pub mod value_type;

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use crate::diagnostics::{Rejection, Warnings};

pub use model::{Dictionary, Expression, Record, RecordCollection, RecordKind, is_head_candidate};
pub use sections::SectionCollection;
pub use validator::validate_collection;
pub use value_type::ValueType;

use model::RecordKind::{Constraint, Entity};

/// Everything the pipeline hands to downstream consumers: the split
/// sections, the assembled record pools, and the parse warnings in
/// discovery order. Reference-validation warnings are produced separately
/// by [`validate_collection`].
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedSave {
    pub sections: SectionCollection,
    pub collection: RecordCollection,
    pub warnings: Vec<String>,
}

impl ParsedSave {
    pub fn dictionary(&self) -> &Dictionary {
        &self.sections.dict
    }
}

/// Parse raw save text into a usable model, or reject it with a single
/// reason. Never panics on malformed input; everything recoverable becomes
/// a warning.
pub fn parse_save_text(text: &str) -> Result<ParsedSave, Rejection> {
    let normalized = sections::normalize_text(text);
    let (section_collection, mut warnings) = sections::split_sections(&normalized)?;

    let entities = records::parse_records(&section_collection.save.entities, Entity);
    let constraints = records::parse_records(&section_collection.save.constraints, Constraint);

    warnings.extend(entities.warnings);
    warnings.extend(constraints.warnings);

    let mut collection = RecordCollection::new();
    collection.set_entities(entities.records, entities.head_id);
    collection.set_constraints(constraints.records, constraints.head_id);

    Ok(ParsedSave {
        sections: section_collection,
        collection,
        warnings: warnings.into_vec(),
    })
}

/// File-path convenience used by the CLI. IO failures surface as anyhow
/// errors; a rejection is reported as a value, not an error.
pub fn parse_save_file(path: &Path) -> Result<Result<ParsedSave, Rejection>> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read file: {}", path.display()))?;
    Ok(parse_save_text(&text))
}
