//! Table, JSON and tree output formatting for CLI commands.

use serde::Serialize;
use tabled::{Table, Tabled};

use paperhub_entity::folder::tree::FolderNode;

/// Output format selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table
    Table,
    /// JSON output
    Json,
}

impl Default for OutputFormat {
    fn default() -> Self {
        Self::Table
    }
}

/// Print a list of items in the selected format
pub fn print_list<T: Serialize + Tabled>(items: &[T], format: OutputFormat) {
    match format {
        OutputFormat::Table => {
            if items.is_empty() {
                println!("No results found.");
            } else {
                let table = Table::new(items).to_string();
                println!("{}", table);
            }
        }
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(items).unwrap_or_else(|_| "[]".to_string());
            println!("{}", json);
        }
    }
}

/// Print the folder forest with unread and file-count badges
pub fn print_tree(nodes: &[FolderNode], format: OutputFormat) {
    match format {
        OutputFormat::Table => {
            if nodes.is_empty() {
                println!("No folders.");
                return;
            }
            for node in nodes {
                print_tree_node(node, "");
            }
        }
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(nodes).unwrap_or_else(|_| "[]".to_string());
            println!("{}", json);
        }
    }
}

fn print_tree_node(node: &FolderNode, prefix: &str) {
    let mut badges = String::new();
    if node.unread > 0 {
        badges.push_str(&format!(" ({} unread)", node.unread));
    }
    if node.file_count > 0 {
        badges.push_str(&format!(" [{} files]", node.file_count));
    }
    println!("{}├── {}/{}", prefix, node.name, badges);
    let child_prefix = format!("{}│   ", prefix);
    for child in &node.children {
        print_tree_node(child, &child_prefix);
    }
}

/// Print a success message
pub fn print_success(msg: &str) {
    println!("✓ {}", msg);
}

/// Print a warning message
pub fn print_warning(msg: &str) {
    println!("⚠ {}", msg);
}

/// Print a key-value pair
pub fn print_kv(key: &str, value: &str) {
    println!("  {:<24} {}", format!("{}:", key), value);
}
