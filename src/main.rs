use std::path::PathBuf;

use anyhow::Result;
use bert_local::cli::{
    print_checkpoint_info, print_embedding, print_resolved_path, Spinner, DEFAULT_LOG_FILTER,
};
use bert_local::{resolver, CheckpointLocator, LoaderConfig};
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Checkpoint directory (defaults to BERT_BASE_UNCASED_PATH or third_party/bert-base-uncased)
    #[arg(short, long)]
    path: Option<PathBuf>,

    /// Model identifier to load
    #[arg(short, long, default_value = "bert-base-uncased")]
    model_type: String,

    /// Only print the resolved directory, do not load anything
    #[arg(long)]
    resolve_only: bool,

    /// Text to encode after loading (repeatable)
    #[arg(short, long)]
    text: Vec<String>,
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();
    let locator = CheckpointLocator::local(LoaderConfig::from_env());

    let explicit = args.path.as_deref();
    let (dir, source) = resolver::resolve_with_source(explicit, locator.config());

    println!();
    print_resolved_path(&dir, source.label(), dir.is_dir());

    if args.resolve_only {
        return Ok(());
    }

    let spinner = Spinner::new("Loading tokenizer...");
    let tokenizer = match locator.load_tokenizer(&args.model_type, explicit) {
        Ok(t) => {
            spinner.finish("Tokenizer loaded");
            t
        }
        Err(e) => {
            spinner.finish_with_error("Tokenizer failed");
            return Err(e);
        }
    };

    let spinner = Spinner::new("Loading model...");
    let model = match locator.load_model(&args.model_type, explicit) {
        Ok(m) => {
            spinner.finish(&format!("Model loaded ({})", args.model_type));
            m
        }
        Err(e) => {
            spinner.finish_with_error("Model failed");
            return Err(e);
        }
    };

    println!();
    print_checkpoint_info(model.metadata(), tokenizer.vocab_size());

    for text in &args.text {
        let encoding = tokenizer.encode(text)?;
        let cls = model.embed(&encoding)?;
        print_embedding(text, encoding.get_ids(), &cls);
    }

    Ok(())
}
