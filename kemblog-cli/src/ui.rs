use colored::Colorize;
use kemblog_client::render::NO_IMAGE_TEXT;
use kemblog_client::{FormView, ListView, Thumbnail, Ui};
use std::io::{self, BufRead, Write};

/// Prints alerts and lists to stdout and asks questions on stdin.
pub struct TerminalUi {
    assume_yes: bool,
}

impl TerminalUi {
    pub fn new(assume_yes: bool) -> Self {
        Self { assume_yes }
    }
}

impl Ui for TerminalUi {
    fn alert(&self, message: &str) {
        println!("{} {}", "»".bold(), message);
    }

    fn confirm(&self, message: &str) -> bool {
        if self.assume_yes {
            return true;
        }

        print!("❓ {} [y/N] ", message);
        if io::stdout().flush().is_err() {
            return false;
        }

        let mut answer = String::new();
        match io::stdin().lock().read_line(&mut answer) {
            Ok(_) => matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"),
            Err(e) => {
                tracing::warn!("Failed to read confirmation: {}", e);
                false
            }
        }
    }

    fn render(&self, view: &ListView) {
        println!();
        println!("{}", "📋 Posts".bold());

        if let Some(placeholder) = view.placeholder {
            println!("   {}", placeholder.dimmed());
        }

        for (i, card) in view.cards.iter().enumerate() {
            println!("   {}. [{}] {}", i + 1, card.id, card.title.bold());
            match &card.thumbnail {
                Thumbnail::Image(url) => println!("      Image: {}", url),
                Thumbnail::Placeholder => println!("      Image: {}", NO_IMAGE_TEXT.dimmed()),
            }
            println!("      {}", card.excerpt);
            println!();
        }
    }

    fn show_form(&self, form: &FormView) {
        println!("📝 {} [{}]", form.heading.bold(), form.save_label);
        if !form.title.is_empty() {
            println!("   Title: {}", form.title);
        }
    }
}
