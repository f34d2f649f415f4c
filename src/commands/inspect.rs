// Inspect command - summarize the structure of one save file

use anyhow::Result;
use serde::Serialize;

use crate::cli::args::InspectArgs;
use crate::parser;

#[derive(Debug, Serialize)]
pub struct InspectReport {
    pub file: String,
    pub info_keys: usize,
    pub more_information_keys: usize,
    pub dict_entries: usize,
    pub entities: Vec<RecordInfo>,
    pub constraints: Vec<RecordInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub head_entity: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub head_constraint: Option<String>,
    pub warnings: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct RecordInfo {
    pub id: String,
    pub expressions: usize,
}

pub async fn handle_inspect(args: &InspectArgs) -> Result<()> {
    let file_path = &args.file;
    if !file_path.exists() {
        return Err(anyhow::anyhow!("File not found: {}", file_path.display()));
    }

    let parsed = match parser::parse_save_file(file_path)? {
        Ok(parsed) => parsed,
        Err(rejection) => {
            eprintln!("{} ... REJECTED: {}", file_path.display(), rejection);
            std::process::exit(1);
        }
    };

    let record_info = |r: &parser::Record| RecordInfo {
        id: r.id().to_string(),
        expressions: r.expressions().len(),
    };

    let report = InspectReport {
        file: file_path.to_string_lossy().to_string(),
        info_keys: parsed.sections.info.len(),
        more_information_keys: parsed.sections.more_information.len(),
        dict_entries: parsed.sections.dict.len(),
        entities: parsed.collection.entities().map(record_info).collect(),
        constraints: parsed.collection.constraints().map(record_info).collect(),
        head_entity: parsed.collection.head_entity().map(|r| r.id().to_string()),
        head_constraint: parsed
            .collection
            .head_constraint()
            .map(|r| r.id().to_string()),
        warnings: parsed.warnings,
    };

    if args.is_json() {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("Inspection of {}:", report.file);
        println!("{:=<60}", "");

        println!("\n[Sections]");
        println!("  Info: {} key(s)", report.info_keys);
        println!("  More Information: {} key(s)", report.more_information_keys);
        println!("  Dict: {} entry(ies)", report.dict_entries);

        println!("\n[Entities] ({})", report.entities.len());
        for r in &report.entities {
            let head = if report.head_entity.as_deref() == Some(r.id.as_str()) {
                " (head)"
            } else {
                ""
            };
            println!("  {:<20} {} expression(s){}", r.id, r.expressions, head);
        }

        println!("\n[Constraints] ({})", report.constraints.len());
        for r in &report.constraints {
            let head = if report.head_constraint.as_deref() == Some(r.id.as_str()) {
                " (head)"
            } else {
                ""
            };
            println!("  {:<20} {} expression(s){}", r.id, r.expressions, head);
        }

        println!("\n[Warnings] ({})", report.warnings.len());
        for w in &report.warnings {
            println!("  - {}", w);
        }
    }

    Ok(())
}
