use std::io;
use std::path::Path;

use crossterm::{
    execute,
    style::{Print, ResetColor, SetForegroundColor},
};

use super::theme::Theme;
use crate::model::CheckpointMetadata;

fn print_row(branch: &str, label: &str, value: &str, color: crossterm::style::Color) {
    let mut stdout = io::stdout();
    execute!(
        stdout,
        SetForegroundColor(Theme::TREE),
        Print(format!("  {} ", branch)),
        ResetColor,
        Print(format!("{:<10}", label)),
        SetForegroundColor(color),
        Print(value),
        ResetColor,
        Print("\n")
    )
    .ok();
}

pub fn print_resolved_path(path: &Path, source: &str, exists: bool) {
    let status = if exists { "present" } else { "missing" };
    let status_color = if exists {
        Theme::SUCCESS_GREEN
    } else {
        Theme::ERROR_RED
    };

    print_row("├─", "Path:", &path.display().to_string(), Theme::PATH);
    print_row("├─", "Source:", source, Theme::TEXT_SECONDARY);
    print_row("└─", "Status:", status, status_color);
    println!();
}

pub fn print_checkpoint_info(meta: &CheckpointMetadata, tokenizer_vocab: usize) {
    let weights = format!(
        "{} ({})",
        meta.weights_file
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("unknown"),
        format_size(meta.weights_size)
    );

    print_row("├─", "Model:", &meta.model_type, Theme::TEXT_PRIMARY);
    print_row("├─", "Weights:", &weights, Theme::TEXT_SECONDARY);
    print_row(
        "├─",
        "Layers:",
        &format!(
            "{} (hidden: {}, heads: {})",
            meta.num_layers, meta.hidden_size, meta.num_heads
        ),
        Theme::TEXT_SECONDARY,
    );
    print_row(
        "├─",
        "Vocab:",
        &format!("{} (tokenizer: {})", meta.vocab_size, tokenizer_vocab),
        Theme::TEXT_SECONDARY,
    );
    print_row(
        "└─",
        "Context:",
        &format!("{} tokens", meta.max_position_embeddings),
        Theme::TEXT_SECONDARY,
    );
    println!();
}

pub fn print_embedding(text: &str, ids: &[u32], cls: &[f32]) {
    print_row("├─", "Text:", text, Theme::TEXT_PRIMARY);
    print_row("├─", "Tokens:", &format!("{:?}", ids), Theme::ACCENT_CYAN);
    print_row(
        "└─",
        "[CLS]:",
        &format!("dim {}, L2 norm {:.4}", cls.len(), l2_norm(cls)),
        Theme::TEXT_SECONDARY,
    );
    println!();
}

pub fn format_size(size: u64) -> String {
    if size < 1_000 {
        format!("{}B", size)
    } else if size < 1_000_000 {
        format!("{:.1}KB", size as f64 / 1e3)
    } else if size < 1_000_000_000 {
        format!("{:.1}MB", size as f64 / 1e6)
    } else {
        format!("{:.1}GB", size as f64 / 1e9)
    }
}

fn l2_norm(values: &[f32]) -> f32 {
    values.iter().map(|v| v * v).sum::<f32>().sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sizes() {
        assert_eq!(format_size(512), "512B");
        assert_eq!(format_size(231_536), "231.5KB");
        assert_eq!(format_size(440_473_133), "440.5MB");
        assert_eq!(format_size(1_340_000_000), "1.3GB");
    }

    #[test]
    fn norm() {
        assert_eq!(l2_norm(&[3.0, 4.0]), 5.0);
        assert_eq!(l2_norm(&[]), 0.0);
    }
}
