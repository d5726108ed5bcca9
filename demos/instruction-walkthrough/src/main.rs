//! Walks through the editor flow against a file-backed instruction store.
//!
//! Set `INSTRUCTIONS_DATA_DIR` to choose where the collection is written and
//! `RUST_LOG` (or `INSTRUCTIONS_LOG`) to adjust logging.

use anyhow::Result;
use instruction_kit::config::ConfigLoader;
use instruction_kit::primitives::{Instruction, Placeholder, PlaceholderValues};
use instruction_kit::store::{DeleteOutcome, EditSession, InstructionStore, SaveOutcome};
use instruction_kit::{open_store, telemetry};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    let config = ConfigLoader::new()
        .with_file("instructions.config.json")
        .with_env()
        .load()?;
    telemetry::init_tracing(&config.log_filter)?;

    let store = open_store(&config)?;
    let data_dir = config.resolve_data_dir()?;
    info!(path = %config.collection_path(&data_dir).display(), "opened instruction store");

    println!("=== Instruction Store Walkthrough ===\n");

    print_list(&store).await?;
    let saved = draft_and_save(&store).await?;
    print_list(&store).await?;
    render_for_consumer(&saved);
    delete_with_confirmation(&store, saved).await?;
    print_list(&store).await?;

    Ok(())
}

async fn print_list(store: &InstructionStore) -> Result<()> {
    println!("--- Instructions ---");
    for instruction in store.list_with_default().await? {
        let marker = if instruction.is_default() { "*" } else { "-" };
        println!("{marker} {}", instruction.name());
    }
    println!();
    Ok(())
}

async fn draft_and_save(store: &InstructionStore) -> Result<Instruction> {
    println!("--- Drafting a new instruction ---");
    let mut session = EditSession::new_draft();
    session.set_name("Concise answer")?;
    session.set_text("Answer briefly using only these sources:\n")?;

    if let SaveOutcome::Blocked(report) = session.save(store).await? {
        println!("Save blocked: {report}");
    }

    let end = session.instruction().text().len();
    let cursor = session.insert_placeholder(Placeholder::WebResults, end..end)?;
    let text = format!("{}\nQuestion: ", session.instruction().text());
    session.set_text(text)?;
    let end = session.instruction().text().len();
    session.insert_placeholder(Placeholder::Query, end..end)?;
    println!("Inserted placeholders (web results ended at byte {cursor})");

    match session.save(store).await? {
        SaveOutcome::Saved(saved) => {
            if let Some(id) = saved.id() {
                println!("Saved `{}` as {id}\n", saved.name());
            }
            Ok(saved)
        }
        SaveOutcome::Blocked(report) => anyhow::bail!("unexpected validation failure: {report}"),
    }
}

fn render_for_consumer(instruction: &Instruction) {
    println!("--- Rendered prompt ---");
    let values = PlaceholderValues::new(
        "[1] \"The Rust Programming Language\" https://doc.rust-lang.org/book/",
        "Where can I learn Rust?",
    );
    println!("{}\n", instruction.render(&values));
}

async fn delete_with_confirmation(store: &InstructionStore, saved: Instruction) -> Result<()> {
    println!("--- Deleting with confirmation ---");
    let mut session = EditSession::select(saved);
    for _ in 0..2 {
        match session.delete(store).await? {
            DeleteOutcome::Armed => println!("Delete armed; confirm to remove."),
            DeleteOutcome::Deleted => println!("Deleted.\n"),
        }
    }
    Ok(())
}
