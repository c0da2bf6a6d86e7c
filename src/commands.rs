//! Slash command parsing for the search box
//!
//! Parses commands like /all, /videos, /cat from user input. Anything else
//! is a regular image + video search.

/// Parsed command from user input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Search every source: /all <query>
    SearchAll { query: String },
    /// Video search: /videos [query]; without a query, general WW2 footage
    Videos { query: Option<String> },
    /// Open a category: /cat <slug>
    Category { slug: String },
    /// Local collection: /downloaded
    Downloaded,
    /// Favorites: /favorites
    Favorites,
    /// Reload search history: /history
    History,
    /// Reload the current view: /refresh
    Refresh,
    /// Show help: /help
    Help,
    /// Input that needs a correction, shown as a notice
    Invalid { message: String },
    /// Not a command (default - image + video search)
    Search { query: String },
}

/// Video query used when /videos has none
pub const DEFAULT_VIDEO_QUERY: &str = "world war 2";

impl Command {
    /// Parse user input into a command
    pub fn parse(input: &str) -> Self {
        let input = input.trim();

        if !input.starts_with('/') {
            return Command::Search {
                query: input.to_string(),
            };
        }

        let (cmd, args) = match input.split_once(' ') {
            Some((cmd, args)) => (cmd.to_lowercase(), args.trim()),
            None => (input.to_lowercase(), ""),
        };

        match cmd.as_str() {
            "/all" | "/a" => {
                if args.is_empty() {
                    Command::Invalid {
                        message: "Usage: /all <query>".to_string(),
                    }
                } else {
                    Command::SearchAll {
                        query: args.to_string(),
                    }
                }
            }
            "/videos" | "/video" | "/v" => Command::Videos {
                query: Some(args.to_string()).filter(|q| !q.is_empty()),
            },
            "/cat" | "/category" | "/c" => {
                if args.is_empty() {
                    Command::Invalid {
                        message: "Usage: /cat <slug>".to_string(),
                    }
                } else {
                    Command::Category {
                        slug: args.to_lowercase(),
                    }
                }
            }
            "/downloaded" | "/d" => Command::Downloaded,
            "/favorites" | "/fav" | "/f" => Command::Favorites,
            "/history" | "/hist" => Command::History,
            "/refresh" | "/r" => Command::Refresh,
            "/help" | "/h" | "/?" => Command::Help,
            _ => Command::Invalid {
                message: format!("Unknown command: {}. Type /help for available commands.", cmd),
            },
        }
    }

    /// Get help text for all commands
    pub fn help_text() -> &'static str {
        r#"Available Commands:
/all <query>     - Search images in every source
/videos [query]  - Search WW2 videos (or list them)
/cat <slug>      - Open a category
/downloaded      - Show downloaded images
/favorites       - Show favorites
/history         - Reload search history
/refresh         - Reload the current view
/help            - Show this help

Tip: Just type a term to search images and videos!"#
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_search() {
        match Command::parse("  tiger tank ") {
            Command::Search { query } => assert_eq!(query, "tiger tank"),
            _ => panic!("Expected Search"),
        }
    }

    #[test]
    fn test_parse_all() {
        match Command::parse("/all normandy") {
            Command::SearchAll { query } => assert_eq!(query, "normandy"),
            _ => panic!("Expected SearchAll command"),
        }
        assert!(matches!(Command::parse("/all"), Command::Invalid { .. }));
    }

    #[test]
    fn test_parse_videos() {
        assert_eq!(Command::parse("/videos"), Command::Videos { query: None });
        assert_eq!(
            Command::parse("/v d-day landing"),
            Command::Videos {
                query: Some("d-day landing".to_string())
            }
        );
    }

    #[test]
    fn test_parse_category() {
        match Command::parse("/CAT Tanklar") {
            Command::Category { slug } => assert_eq!(slug, "tanklar"),
            _ => panic!("Expected Category command"),
        }
    }

    #[test]
    fn test_parse_simple_commands() {
        assert_eq!(Command::parse("/downloaded"), Command::Downloaded);
        assert_eq!(Command::parse("/fav"), Command::Favorites);
        assert_eq!(Command::parse("/history"), Command::History);
        assert_eq!(Command::parse("/refresh"), Command::Refresh);
        assert_eq!(Command::parse("/?"), Command::Help);
    }

    #[test]
    fn test_parse_unknown() {
        match Command::parse("/bogus") {
            Command::Invalid { message } => assert!(message.contains("/bogus")),
            _ => panic!("Expected Invalid"),
        }
    }
}
