//! Demo CLI driving the verification engine against files on disk,
//! wired through an in-memory blob store and record store. Not a
//! production entry point — the Engine is meant to be embedded behind a
//! service boundary that owns real `BlobStore`/`RecordStore` backends.

use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::EnvFilter;
use verify_id::capabilities::Capabilities;
use verify_id::config::Config;
use verify_id::engine::VerificationEngine;
use verify_id::gateway::blobstore::InMemoryBlobStore;
use verify_id::ocr::DocumentType;
use verify_id::store::InMemoryRecordStore;

#[derive(Parser)]
#[command(about = "Run the identity verification pipeline against local files")]
struct Args {
    #[arg(long)]
    front: String,

    #[arg(long)]
    back: String,

    #[arg(long)]
    selfie: String,

    #[arg(long, default_value = "generic")]
    doc_type: String,

    #[arg(long, default_value = "demo-subject")]
    subject_id: String,
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();

    let front_bytes = match std::fs::read(&args.front) {
        Ok(b) => b,
        Err(err) => {
            eprintln!("failed to read front image {}: {err}", args.front);
            return ExitCode::FAILURE;
        }
    };
    let back_bytes = match std::fs::read(&args.back) {
        Ok(b) => b,
        Err(err) => {
            eprintln!("failed to read back image {}: {err}", args.back);
            return ExitCode::FAILURE;
        }
    };
    let selfie_bytes = match std::fs::read(&args.selfie) {
        Ok(b) => b,
        Err(err) => {
            eprintln!("failed to read selfie image {}: {err}", args.selfie);
            return ExitCode::FAILURE;
        }
    };

    let blobs = Arc::new(InMemoryBlobStore::new());
    blobs.put("front", front_bytes);
    blobs.put("back", back_bytes);
    blobs.put("selfie", selfie_bytes);

    let engine = VerificationEngine::new(
        Capabilities::real(),
        Config::from_env(),
        blobs,
        Arc::new(InMemoryRecordStore::new()),
    );

    let doc_type = DocumentType::from_str(&args.doc_type);

    let run = async {
        let request = engine.initialize(&args.subject_id, "demo-tenant").await?;
        engine.submit_front(request.id, "front", doc_type).await?;
        engine.submit_back(request.id, "back").await?;
        engine.cross_validate(request.id).await?;
        engine.submit_live(request.id, "selfie").await?;
        engine.finalize(request.id).await
    };

    match run.await {
        Ok(request) => {
            println!("status: {:?}", request.status);
            println!("documents_match: {}", request.documents_match);
            println!("face_passed: {}", request.face_passed);
            println!("liveness_passed: {}", request.liveness_passed);
            if let Some(reason) = &request.failure_reason {
                println!("failure_reason: {reason}");
            }
            if let Some(reason) = &request.manual_review_reason {
                println!("manual_review_reason: {reason}");
            }
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("verification run failed: {err}");
            ExitCode::FAILURE
        }
    }
}
