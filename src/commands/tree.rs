// Tree command - build the edict tree off the main task and print it

use anyhow::Result;

use crate::cli::args::TreeArgs;
use crate::config::Config;
use crate::parser;
use crate::tree::{NodeTag, TreeNode, TreeWorker};

pub async fn handle_tree(args: &TreeArgs, config: &Config) -> Result<()> {
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

    let mut worker = TreeWorker::spawn(config.tree.progress_interval());
    let forest = worker.build(parsed.collection).await?;

    if args.is_json() {
        println!("{}", serde_json::to_string_pretty(&forest)?);
    } else {
        for root in &forest {
            print_node(root, 0);
        }
    }

    Ok(())
}

fn print_node(node: &TreeNode, depth: usize) {
    let marker = match node.tag {
        NodeTag::HeadEntity => " [head entity]",
        NodeTag::HeadConstraint => " [head constraint]",
        NodeTag::Circular => " [circular]",
        NodeTag::None => "",
    };
    println!("{}{}{}", "  ".repeat(depth), node.id, marker);
    for child in &node.children {
        print_node(child, depth + 1);
    }
}
