pub mod output;
pub mod spinner;
pub mod theme;

pub use output::{format_size, print_checkpoint_info, print_embedding, print_resolved_path};
pub use spinner::Spinner;
pub use theme::Theme;

/// Log filter used when `RUST_LOG` is unset. Keeps the checkpoint directory
/// messages visible without the loaders' detail.
pub const DEFAULT_LOG_FILTER: &str = "bert_local::checkpoint=info,bert_local=warn";
