//! CLI tool for gridview - parses clipboard HTML payloads and prints the
//! resulting paste plan as JSON
//!
//! Usage:
//!   gridview_cli <payload.html>           # Print the parsed source table
//!   gridview_cli <payload.html> 5x6       # Print the write plan for a
//!                                         # 5-row x 6-column destination

#![allow(clippy::exit)]
#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::indexing_slicing)]

use std::env;
use std::fs;

use gridview::clipboard::plan_table_paste;
use gridview::html_table::parse_clipboard_table;
use gridview::range::{PasteTarget, Range};

fn parse_dest(spec: &str) -> Option<PasteTarget> {
    let (rows, cols) = spec.split_once('x')?;
    let rows: u32 = rows.parse().ok()?;
    let cols: u32 = cols.parse().ok()?;
    if rows == 0 || cols == 0 {
        return None;
    }
    Some(PasteTarget::from_range(&Range::new(0, rows - 1, 0, cols - 1)))
}

fn main() {
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: gridview_cli <payload.html> [ROWSxCOLS]");
        std::process::exit(1);
    }

    let input_path = &args[1];
    let html = match fs::read_to_string(input_path) {
        Ok(h) => h,
        Err(e) => {
            eprintln!("Error reading {}: {}", input_path, e);
            std::process::exit(1);
        }
    };

    let Some(source) = parse_clipboard_table(&html) else {
        eprintln!("No table found in {} (paste would fall back to plain text)", input_path);
        std::process::exit(1);
    };

    if let Some(spec) = args.get(2) {
        let Some(target) = parse_dest(spec) else {
            eprintln!("Bad destination spec '{}' (expected e.g. 5x6)", spec);
            std::process::exit(1);
        };
        let writes = plan_table_paste(&[target], &source);
        let plan: Vec<serde_json::Value> = writes
            .iter()
            .map(|w| {
                serde_json::json!({
                    "row": w.row,
                    "column": w.column,
                    "text": w.text,
                    "inMultiCellPaste": w.in_multi_cell_paste,
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&plan).unwrap());
    } else {
        println!("{}", serde_json::to_string_pretty(&source).unwrap());
    }
}
