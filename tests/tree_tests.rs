use std::time::Duration;

use edictscope::parser;
use edictscope::tree::{NodeTag, TreeNode, TreeWorker, UNDEFINED_LABEL};

fn parse(entities: &str, constraints: &str) -> parser::RecordCollection {
    let text = format!(
        "[Info]\n[More Information]\n[Save]\nEntities:{entities}\nConstraints:{constraints}\n[Dict]\n"
    );
    parser::parse_save_text(&text).unwrap().collection
}

#[tokio::test]
async fn test_worker_builds_forest_from_parsed_save() {
    let collection = parse("HE{T:A;}A{T:B;}B{N:1;}", "HC{T:A;}");
    let mut worker = TreeWorker::spawn(Duration::from_millis(500));

    let forest = worker.build(collection).await.unwrap();
    assert_eq!(forest.len(), 2);

    let he = &forest[0];
    assert_eq!(he.id, "HE");
    assert_eq!(he.tag, NodeTag::HeadEntity);
    assert_eq!(he.children[0].id, "A");
    assert_eq!(he.children[0].children[0].id, "B");

    let hc = &forest[1];
    assert_eq!(hc.tag, NodeTag::HeadConstraint);
    // A expands again under the constraint head; paths are independent
    assert_eq!(hc.children[0].id, "A");
    assert_eq!(hc.children[0].children[0].id, "B");
}

#[tokio::test]
async fn test_worker_reusable_across_builds() {
    let mut worker = TreeWorker::spawn(Duration::from_millis(500));

    let first = worker.build(parse("HA{N:1;}", "HB{N:2;}")).await.unwrap();
    let second = worker.build(parse("HC{N:3;}", "HD{N:4;}")).await.unwrap();

    assert_eq!(first[0].id, "HA");
    assert_eq!(second[0].id, "HC");
}

#[tokio::test]
async fn test_missing_heads_produce_undefined_leaves() {
    let collection = parse("A{N:1;}", "B{N:2;}");
    let mut worker = TreeWorker::spawn(Duration::from_millis(500));

    let forest = worker.build(collection).await.unwrap();
    assert_eq!(forest.len(), 2);
    assert!(forest.iter().all(|n| n.id == UNDEFINED_LABEL));
    assert!(forest.iter().all(TreeNode::is_leaf));
}

#[tokio::test]
async fn test_cyclic_save_terminates_with_circular_leaf() {
    let collection = parse("HA{T:B;}B{T:HA;}", "HC{N:1;}");
    let mut worker = TreeWorker::spawn(Duration::from_millis(500));

    let forest = worker.build(collection).await.unwrap();
    let cut = &forest[0].children[0].children[0];
    assert_eq!(cut.id, "HA");
    assert_eq!(cut.tag, NodeTag::Circular);
    assert!(cut.is_leaf());
}

#[tokio::test]
async fn test_tree_nodes_serialize_with_kebab_case_tags() {
    let collection = parse("HA{T:HA;}", "HB{N:1;}");
    let mut worker = TreeWorker::spawn(Duration::from_millis(500));

    let forest = worker.build(collection).await.unwrap();
    let json = serde_json::to_string(&forest).unwrap();
    assert!(json.contains("\"head-entity\""));
    assert!(json.contains("\"circular\""));
}

#[tokio::test]
async fn test_submit_then_recv_protocol_shape() {
    let collection = parse("HA{T:B;}B{N:1;}", "HC{N:2;}");
    let mut worker = TreeWorker::spawn(Duration::from_millis(500));
    let request_id = worker.submit(collection).unwrap();

    let mut saw_terminal = false;
    let mut last_done = 0;
    while !saw_terminal {
        let response = worker.recv().await.unwrap();
        assert_eq!(response.request_id, request_id);
        assert!(response.done >= last_done);
        last_done = response.done;

        if response.finished {
            saw_terminal = true;
            assert_eq!(response.left, 0);
            let forest = response.result.unwrap();
            assert_eq!(forest.len(), 2);
        } else {
            assert!(response.result.is_none());
        }
    }
}
