use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use instruction_primitives::{Instruction, PlaceholderValues, default_instruction};
use instruction_store::{FileBackend, InstructionStore, MemoryBackend, StoreError};

fn valid(name: &str) -> Instruction {
    Instruction::draft(
        name,
        "Use these results:\n{web_results}\nDate: {current_date}\nAnswer: {query}",
    )
}

#[tokio::test]
async fn records_survive_reopening_the_store() {
    let dir = tempfile::tempdir().unwrap();

    let saved = {
        let store = InstructionStore::new(Arc::new(FileBackend::new(dir.path())));
        let first = store.save_instruction(&valid("first")).await.unwrap();
        let second = store.save_instruction(&valid("second")).await.unwrap();
        store.delete_instruction(&first).await.unwrap();
        second
    };

    let reopened = InstructionStore::new(Arc::new(FileBackend::new(dir.path())));
    let listed = reopened.list_with_default().await.unwrap();
    assert_eq!(listed, vec![default_instruction(), saved]);
}

#[tokio::test]
async fn persisted_document_uses_uuid_name_text_records() {
    let dir = tempfile::tempdir().unwrap();
    let store = InstructionStore::new(Arc::new(FileBackend::new(dir.path())));
    let saved = store.save_instruction(&valid("doc")).await.unwrap();

    let raw = std::fs::read_to_string(dir.path().join("instructions.json")).unwrap();
    let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
    let record = &json.as_array().unwrap()[0];
    assert_eq!(record["uuid"], saved.id().unwrap().to_string());
    assert_eq!(record["name"], "doc");
    assert!(record["text"].as_str().unwrap().contains("{query}"));
}

#[tokio::test]
async fn reads_are_idempotent_without_mutation() {
    let store = InstructionStore::new(Arc::new(MemoryBackend::new()));
    for name in ["a", "b", "c"] {
        store.save_instruction(&valid(name)).await.unwrap();
    }
    let first = store.saved_instructions().await.unwrap();
    let second = store.saved_instructions().await.unwrap();
    assert_eq!(first, second);
    let names: Vec<_> = first.iter().map(Instruction::name).collect();
    assert_eq!(names, ["a", "b", "c"]);
}

#[tokio::test]
async fn save_then_load_round_trips_name_and_text() {
    let store = InstructionStore::new(Arc::new(MemoryBackend::new()));
    let draft = valid("round");
    let saved = store.save_instruction(&draft).await.unwrap();

    let loaded = store.saved_instructions().await.unwrap();
    let found = loaded
        .iter()
        .find(|i| i.same_identity(&saved))
        .expect("saved record present");
    assert_eq!(found.name(), draft.name());
    assert_eq!(found.text(), draft.text());
}

#[tokio::test]
async fn concurrent_mutations_are_serialized() {
    let backend = Arc::new(MemoryBackend::new().with_write_latency(Duration::from_millis(5)));
    let store = Arc::new(InstructionStore::new(backend.clone()));

    let saves = (0..8).map(|n| {
        let store = Arc::clone(&store);
        async move { store.save_instruction(&valid(&format!("n{n}"))).await }
    });
    let results = join_all(saves).await;
    assert!(results.iter().all(Result::is_ok));

    let saved = store.saved_instructions().await.unwrap();
    assert_eq!(saved.len(), 8);
    assert_eq!(backend.write_count(), 8);

    let deletes = saved.iter().take(4).map(|instruction| {
        let store = Arc::clone(&store);
        let instruction = instruction.clone();
        async move { store.delete_instruction(&instruction).await }
    });
    assert!(join_all(deletes).await.into_iter().all(|r| r.unwrap()));
    assert_eq!(store.saved_instructions().await.unwrap(), saved[4..].to_vec());
}

#[tokio::test]
async fn concurrent_mutations_across_tasks() {
    let store = Arc::new(InstructionStore::new(Arc::new(
        MemoryBackend::new().with_write_latency(Duration::from_millis(2)),
    )));

    let handles: Vec<_> = (0..4)
        .map(|n| {
            let store = Arc::clone(&store);
            tokio::spawn(async move { store.save_instruction(&valid(&format!("t{n}"))).await })
        })
        .collect();
    for handle in handles {
        handle.await.unwrap().unwrap();
    }
    assert_eq!(store.saved_instructions().await.unwrap().len(), 4);
}

#[tokio::test]
async fn validation_error_names_failed_fields() {
    let store = InstructionStore::new(Arc::new(MemoryBackend::new()));
    let err = store
        .save_instruction(&Instruction::draft("", ""))
        .await
        .expect_err("invalid");
    let StoreError::Validation(report) = err else {
        panic!("expected validation error");
    };
    assert_eq!(report.failures(), ["name", "text", "{web_results}", "{query}"]);
}

#[tokio::test]
async fn saved_instruction_renders_for_the_consumer() {
    let store = InstructionStore::new(Arc::new(MemoryBackend::new()));
    store.save_instruction(&valid("render")).await.unwrap();
    let saved = store.saved_instructions().await.unwrap();

    let values = PlaceholderValues::new("[1] Rust 1.0 released", "when was rust released?")
        .with_current_date("5/15/2015");
    let prompt = saved[0].render(&values);
    assert_eq!(
        prompt,
        "Use these results:\n[1] Rust 1.0 released\nDate: 5/15/2015\nAnswer: when was rust released?"
    );
}
