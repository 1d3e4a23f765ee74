//! Command-line interface definition using clap.
//!
//! The `chatsieve` binary runs the filtering pipeline over a text file
//! (or stdin), one chat line per input line, and prints the lines that
//! survive filtering. A filter set is loaded from the JSON format
//! produced by [`filter::save_filters`](crate::filter::save_filters).

use clap::Parser;

/// Filter chat lines through an ordered rule set: find/replace,
/// side-effect processors, and duplicate stacking.
#[derive(Parser, Debug, Clone)]
#[command(name = "chatsieve")]
#[command(version, about, long_about = None)]
#[command(after_help = "EXAMPLES:
    chatsieve chat.log
    chatsieve chat.log --filters filters.json
    cat chat.log | chatsieve --filters filters.json --stats
    chatsieve chat.log -f filters.json --all")]
pub struct Args {
    /// Path to input file, one chat line per line (stdin when omitted)
    pub input: Option<String>,

    /// Path to a filter-set JSON file
    #[arg(short, long, value_name = "FILE")]
    pub filters: Option<String>,

    /// Maximum lines retained in history
    #[arg(long, default_value_t = crate::history::DEFAULT_MAX_LINES)]
    pub history: usize,

    /// Number of recent lines checked for duplicate stacking
    #[arg(long, default_value_t = crate::history::DEFAULT_STACK_WINDOW)]
    pub stack_window: usize,

    /// Also print suppressed lines, prefixed with '-'
    #[arg(short, long)]
    pub all: bool,

    /// Print a processing summary at the end
    #[arg(short, long)]
    pub stats: bool,
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_args_parse() {
        let args = Args::parse_from(["chatsieve", "chat.log", "-f", "filters.json", "--stats"]);
        assert_eq!(args.input.as_deref(), Some("chat.log"));
        assert_eq!(args.filters.as_deref(), Some("filters.json"));
        assert!(args.stats);
        assert!(!args.all);
    }

    #[test]
    fn test_args_defaults() {
        let args = Args::parse_from(["chatsieve"]);
        assert!(args.input.is_none());
        assert_eq!(args.history, crate::history::DEFAULT_MAX_LINES);
        assert_eq!(args.stack_window, crate::history::DEFAULT_STACK_WINDOW);
    }

    #[test]
    fn test_command_is_well_formed() {
        Args::command().debug_assert();
    }
}
