//! # chatsieve CLI
//!
//! Runs the filtering pipeline over a file or stdin and prints the
//! lines that survive.

use std::cell::RefCell;
use std::fs;
use std::io::{self, BufRead, BufReader};
use std::process;
use std::rc::Rc;

use clap::Parser;

use chatsieve::cli::Args;
use chatsieve::engine::FilterEngine;
use chatsieve::filter::load_filters;
use chatsieve::history::{ChatHistory, HistoryConfig, UpdateType};
use chatsieve::line::ChatLine;
use chatsieve::processors::default_registry;
use chatsieve::SieveError;

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run() -> Result<(), SieveError> {
    let args = Args::parse();

    let registry = default_registry();
    let mut engine = FilterEngine::new();
    if let Some(ref path) = args.filters {
        let raw = fs::read_to_string(path)?;
        let value: serde_json::Value = serde_json::from_str(&raw)?;
        for filter in load_filters(&value, &registry)? {
            engine.add_filter(filter);
        }
        for filter in engine.filters() {
            if filter.is_active() {
                if let Err(e) = chatsieve::search::compile(filter.find_string(), filter.find_mode())
                {
                    eprintln!("Warning: filter '{}' will never match: {}", filter.name(), e);
                }
            }
        }
    }

    let mut history = ChatHistory::with_config(
        HistoryConfig::new()
            .with_max_lines(args.history)
            .with_stack_window(args.stack_window),
    );
    let stacked = Rc::new(RefCell::new(0usize));
    let stack_counter = Rc::clone(&stacked);
    history.on_update(move |line, update| match update {
        UpdateType::Added => println!("{}", line.display()),
        UpdateType::Stack => {
            *stack_counter.borrow_mut() += 1;
            println!("{} (x{})", line.display(), line.stacks());
        }
        UpdateType::New | UpdateType::Remove => {}
    });

    let reader: Box<dyn BufRead> = match args.input {
        Some(ref path) => Box::new(BufReader::new(fs::File::open(path)?)),
        None => Box::new(BufReader::new(io::stdin())),
    };

    let mut total = 0usize;
    let mut suppressed = 0usize;
    for line in reader.lines() {
        let line = line?;
        total += 1;
        let result = engine.evaluate(ChatLine::new(line));
        if result.forward {
            history.add(result.line);
        } else {
            suppressed += 1;
            if args.all {
                println!("- {}", result.line.display());
            }
        }
    }

    if args.stats {
        println!();
        println!("Summary:");
        println!("   Read:       {} lines", total);
        println!("   Filters:    {}", engine.filters().len());
        println!("   Suppressed: {} lines", suppressed);
        println!("   Stacked:    {} lines", *stacked.borrow());
        println!("   Retained:   {} lines", history.len());
    }

    Ok(())
}
