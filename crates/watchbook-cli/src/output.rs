use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use owo_colors::OwoColorize;
use serde_json::json;
use watchbook_models::{MovieRef, WatchedRecord, MAX_RATING};

/// Longest comment shown in list views before it is cut with "..."
const COMMENT_PREVIEW_CHARS: usize = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Human,
    Json,
    #[value(name = "json-pretty")]
    JsonPretty,
}

pub struct Output {
    format: OutputFormat,
    quiet: bool,
}

impl Output {
    pub fn new(format: OutputFormat, quiet: bool) -> Self {
        Self { format, quiet }
    }

    pub fn is_human(&self) -> bool {
        self.format == OutputFormat::Human
    }

    pub fn success(&self, msg: impl AsRef<str>) {
        self.message("success", "✓".green().to_string(), msg.as_ref());
    }

    pub fn info(&self, msg: impl AsRef<str>) {
        if self.quiet {
            return;
        }
        match self.format {
            OutputFormat::Human => println!("{}", msg.as_ref()),
            OutputFormat::Json | OutputFormat::JsonPretty => {
                self.print_json(&json!({ "type": "info", "message": msg.as_ref() }));
            }
        }
    }

    pub fn warn(&self, msg: impl AsRef<str>) {
        self.message("warning", "⚠".yellow().to_string(), msg.as_ref());
    }

    fn message(&self, kind: &str, marker: String, msg: &str) {
        if self.quiet {
            return;
        }
        match self.format {
            OutputFormat::Human => println!("{} {}", marker, msg),
            OutputFormat::Json | OutputFormat::JsonPretty => {
                self.print_json(&json!({ "type": kind, "message": msg }));
            }
        }
    }

    /// Structured data; ignored in human mode, where callers render tables instead
    pub fn json(&self, data: &serde_json::Value) {
        if self.is_human() {
            return;
        }
        self.print_json(data);
    }

    fn print_json(&self, data: &serde_json::Value) {
        match self.format {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string(data).unwrap_or_default());
            }
            OutputFormat::JsonPretty => {
                println!("{}", serde_json::to_string_pretty(data).unwrap_or_default());
            }
            OutputFormat::Human => {
                println!("{}", data);
            }
        }
    }

    pub fn records_table(&self, records: &[WatchedRecord]) {
        if self.quiet {
            return;
        }
        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .set_content_arrangement(ContentArrangement::Dynamic)
            .set_header(vec!["ID", "Title", "Year", "Rating", "Comment"]);
        for record in records {
            table.add_row(vec![
                record.id.to_string(),
                record.title.clone(),
                record.release_year().unwrap_or("N/A").to_string(),
                if record.is_rated() {
                    format!("{} {}/{}", stars(record.rating), record.rating, MAX_RATING)
                } else {
                    String::new()
                },
                comment_preview(&record.comment),
            ]);
        }
        println!("{table}");
    }

    pub fn movies_table(&self, movies: &[MovieRef]) {
        if self.quiet {
            return;
        }
        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .set_content_arrangement(ContentArrangement::Dynamic)
            .set_header(vec!["ID", "Title", "Year"]);
        for movie in movies {
            table.add_row(vec![
                movie.id.to_string(),
                movie.title.clone(),
                movie.release_year().unwrap_or("N/A").to_string(),
            ]);
        }
        println!("{table}");
    }
}

/// Five-star bar, e.g. "★★★☆☆" for 3
pub fn stars(rating: u8) -> String {
    let filled = usize::from(rating.min(MAX_RATING));
    format!(
        "{}{}",
        "★".repeat(filled),
        "☆".repeat(usize::from(MAX_RATING) - filled)
    )
}

pub fn comment_preview(comment: &str) -> String {
    if comment.chars().count() > COMMENT_PREVIEW_CHARS {
        let cut: String = comment.chars().take(COMMENT_PREVIEW_CHARS).collect();
        format!("\"{}...\"", cut)
    } else if comment.is_empty() {
        String::new()
    } else {
        format!("\"{}\"", comment)
    }
}
