// Section splitter - carves raw save text into named sections
// Handles the generic key:value rule and the Save section's edict unit split

use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::diagnostics::{Rejection, Warnings};

/// Section header: a line of exactly `[<name>]`.
static SECTION_HEADER_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\[(.*)\]$").expect("invalid section header regex"));

/// One edict unit inside a Save value: `<anything>{<anything>}`, shortest
/// match, repeated across the string.
static EDICT_UNIT_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r".+?\{.*?\}").expect("invalid edict unit regex"));

/// Section names the format reserves. Anything else is retained under
/// `other_sections` with a warning.
pub const RECOGNIZED_SECTIONS: [&str; 4] = ["Info", "More Information", "Save", "Dict"];

/// The Save section after key extraction: raw edict unit strings, one per
/// record, still unparsed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SaveSection {
    pub entities: Vec<String>,
    pub constraints: Vec<String>,
}

/// All sections of one save file, split but not record-parsed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SectionCollection {
    pub info: IndexMap<String, String>,
    #[serde(rename = "More Information")]
    pub more_information: IndexMap<String, String>,
    pub save: SaveSection,
    pub dict: IndexMap<String, String>,
    pub other_sections: IndexMap<String, String>,
}

/// Collapse line endings to `\n` and squeeze out blank lines, in case the
/// file was hand-edited.
pub fn normalize_text(text: &str) -> String {
    static CRLF: Lazy<Regex> = Lazy::new(|| Regex::new(r"\r+\n").expect("invalid crlf regex"));
    static BLANK: Lazy<Regex> =
        Lazy::new(|| Regex::new(r"\n[ \t\r\n]*\n").expect("invalid blank-line regex"));

    let text = CRLF.replace_all(text, "\n");
    // A run of blank lines can hide another run behind it, so squeeze until
    // the text stops changing.
    let mut text = text.into_owned();
    loop {
        let squeezed = BLANK.replace_all(&text, "\n").into_owned();
        if squeezed == text {
            return text;
        }
        text = squeezed;
    }
}

/// Split normalized text into sections and extract the Save unit strings.
///
/// Missing recognized sections and a Save section without Entities or
/// Constraints keys are rejections; everything else degrades to warnings.
pub fn split_sections(text: &str) -> Result<(SectionCollection, Warnings), Rejection> {
    let mut warnings = Warnings::new();
    let mut sections = SectionCollection::default();

    let mut seen: Vec<String> = Vec::new();
    let mut save_has_entities = false;
    let mut save_has_constraints = false;

    for (name, body) in scan_sections(text, &mut warnings) {
        if seen.iter().any(|s| s == &name) {
            warnings.push(format!("Section \"{name}\" was defined multiple times"));
        } else if !RECOGNIZED_SECTIONS.contains(&name.as_str()) {
            warnings.push(format!("Unrecognized section \"{name}\""));
        }
        seen.push(name.clone());

        if !RECOGNIZED_SECTIONS.contains(&name.as_str()) {
            // Retained but unclassified; raw body, last occurrence wins
            sections.other_sections.insert(name, body);
            continue;
        }

        let (key_values, kv_warnings) = parse_key_values(&body);
        let mut section_warnings = kv_warnings;

        if name == "Save" {
            if let Some(entities_value) = key_values.get("Entities") {
                save_has_entities = true;
                let (units, unit_warnings) = split_edict_units(entities_value);
                sections.save.entities = units;
                section_warnings.extend_prefixed("Entities ", unit_warnings);
            }
            if let Some(constraints_value) = key_values.get("Constraints") {
                save_has_constraints = true;
                let (units, unit_warnings) = split_edict_units(constraints_value);
                sections.save.constraints = units;
                section_warnings.extend_prefixed("Constraints ", unit_warnings);
            }
        } else {
            let target = match name.as_str() {
                "Info" => &mut sections.info,
                "More Information" => &mut sections.more_information,
                "Dict" => &mut sections.dict,
                _ => unreachable!("recognized section without a slot"),
            };
            *target = key_values;
        }

        warnings.extend_prefixed(&format!("Section \"{name}\" "), section_warnings);
    }

    for required in RECOGNIZED_SECTIONS {
        if !seen.iter().any(|s| s == required) {
            return Err(Rejection::MissingSection {
                name: required.to_string(),
            });
        }
    }
    if !save_has_entities {
        return Err(Rejection::SaveMissingEntities);
    }
    if !save_has_constraints {
        return Err(Rejection::SaveMissingConstraints);
    }

    Ok((sections, warnings))
}

/// Scan for `[name]` header lines; everything between one header and the
/// next belongs to the preceding header. Content before the first header is
/// warned about and dropped.
fn scan_sections(text: &str, warnings: &mut Warnings) -> Vec<(String, String)> {
    let mut found: Vec<(String, String)> = Vec::new();
    let mut current: Option<(String, Vec<&str>)> = None;
    let mut preamble: Vec<&str> = Vec::new();

    for line in text.lines() {
        if let Some(captures) = SECTION_HEADER_REGEX.captures(line) {
            if let Some((name, body_lines)) = current.take() {
                found.push((name, body_lines.join("\n")));
            }
            current = Some((captures[1].to_string(), Vec::new()));
            continue;
        }

        match current {
            Some((_, ref mut body_lines)) => body_lines.push(line),
            None => preamble.push(line),
        }
    }

    if let Some((name, body_lines)) = current {
        found.push((name, body_lines.join("\n")));
    }

    if !preamble.join("\n").is_empty() {
        warnings.push("Data found before first section");
    }

    found
}

/// Generic key:value rule, one pair per non-empty line. The first colon
/// splits the line; surrounding double quotes on the value are stripped
/// when present at both ends; the last write wins on duplicate keys.
pub fn parse_key_values(body: &str) -> (IndexMap<String, String>, Warnings) {
    let mut key_values = IndexMap::new();
    let mut warnings = Warnings::new();

    for line in body.lines() {
        if line.is_empty() {
            continue;
        }

        let mut split_idx = line.find(':');
        if split_idx.is_none() || split_idx == Some(line.len() - 1) {
            warnings.push(format!("Key \"{line}\" has no value"));
        } else if split_idx == Some(0) {
            warnings.push(format!("Value \"{line}\" has no key"));
        }

        // A line without a colon is all key, empty value
        if split_idx.is_none() {
            split_idx = Some(line.len());
        }
        let split_idx = split_idx.expect("split index resolved above");

        let key = &line[..split_idx];
        let value = line.get(split_idx + 1..).unwrap_or("");
        if key_values.contains_key(key) {
            warnings.push(format!("Key \"{key}\" was defined multiple times"));
        }
        key_values.insert(key.to_string(), strip_surrounding_quotes(value).to_string());
    }

    (key_values, warnings)
}

fn strip_surrounding_quotes(value: &str) -> &str {
    if value.len() >= 2 && value.starts_with('"') && value.ends_with('"') {
        &value[1..value.len() - 1]
    } else {
        value
    }
}

/// Break a Save value into individual edict unit strings. Characters that
/// match no unit are dropped with a warning; a value with no unit at all is
/// kept whole so record parsing can report it.
pub fn split_edict_units(value: &str) -> (Vec<String>, Warnings) {
    let mut warnings = Warnings::new();

    let units: Vec<String> = EDICT_UNIT_REGEX
        .find_iter(value)
        .map(|m| m.as_str().to_string())
        .collect();

    if units.is_empty() {
        warnings.push("Edict string contained no edicts");
        return (vec![value.to_string()], warnings);
    }

    let matched_len: usize = units.iter().map(String::len).sum();
    if matched_len < value.len() {
        warnings.push("Edict string contained some junk data, which we removed");
    }

    (units, warnings)
}
