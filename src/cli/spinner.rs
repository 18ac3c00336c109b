use std::io::{self, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossterm::{
    cursor::MoveToColumn,
    execute,
    style::{Attribute, Print, ResetColor, SetAttribute, SetForegroundColor},
    terminal::{Clear, ClearType},
};

use super::theme::Theme;

const FRAMES: [char; 10] = ['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏'];

/// Progress line shown while a checkpoint artifact is being read.
pub struct Spinner {
    running: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl Spinner {
    pub fn new(message: &str) -> Self {
        let running = Arc::new(AtomicBool::new(true));

        let handle = thread::spawn({
            let running = running.clone();
            let message = message.to_string();
            move || {
                let mut stdout = io::stdout();
                let mut i = 0usize;

                while running.load(Ordering::Relaxed) {
                    execute!(
                        stdout,
                        MoveToColumn(0),
                        Clear(ClearType::CurrentLine),
                        SetForegroundColor(Theme::ACCENT_CYAN),
                        Print(format!("  {} ", FRAMES[i % FRAMES.len()])),
                        ResetColor,
                        Print(&message)
                    )
                    .ok();
                    stdout.flush().ok();
                    thread::sleep(Duration::from_millis(80));
                    i = i.wrapping_add(1);
                }
            }
        });

        Self {
            running,
            handle: Some(handle),
        }
    }

    fn stop(&mut self) {
        self.running.store(false, Ordering::Relaxed);
        if let Some(h) = self.handle.take() {
            h.join().ok();
        }
    }

    pub fn finish(mut self, message: &str) {
        self.stop();
        print_status("✓ ", Theme::SUCCESS_GREEN, message);
    }

    pub fn finish_with_error(mut self, message: &str) {
        self.stop();
        print_status("✗ ", Theme::ERROR_RED, message);
    }
}

fn print_status(mark: &str, color: crossterm::style::Color, message: &str) {
    let mut stdout = io::stdout();
    execute!(
        stdout,
        MoveToColumn(0),
        Clear(ClearType::CurrentLine),
        Print("  "),
        SetForegroundColor(color),
        SetAttribute(Attribute::Bold),
        Print(mark),
        ResetColor,
        SetForegroundColor(Theme::TEXT_PRIMARY),
        Print(message),
        ResetColor,
        Print("\n")
    )
    .ok();
}

impl Drop for Spinner {
    fn drop(&mut self) {
        self.stop();
    }
}
