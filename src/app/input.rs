use crate::domain::weather::Units;

/// One line typed at the interactive prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Quit,
    Help,
    Refresh,
    Recent,
    SetUnits(Units),
    /// 1-based index into the recent locations list.
    PickRecent(usize),
    Search(String),
    Empty,
}

#[must_use]
pub fn parse_command(line: &str) -> Command {
    let line = line.trim();
    match line.to_ascii_lowercase().as_str() {
        "" => Command::Empty,
        "q" | "quit" | "exit" => Command::Quit,
        "?" | "h" | "help" => Command::Help,
        "r" | "refresh" => Command::Refresh,
        "l" | "recent" => Command::Recent,
        "c" | "celsius" => Command::SetUnits(Units::Celsius),
        "f" | "fahrenheit" => Command::SetUnits(Units::Fahrenheit),
        other => match other.parse::<usize>() {
            Ok(index) if index > 0 => Command::PickRecent(index),
            _ => Command::Search(line.to_string()),
        },
    }
}

pub const HELP_TEXT: &str = "Type a city to search. \
Commands: r refresh, c/f switch units, l recent locations, 1-5 pick a recent location, q quit.";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_original_case_for_searches() {
        assert_eq!(
            parse_command("  New York "),
            Command::Search("New York".to_string())
        );
    }

    #[test]
    fn recognizes_short_commands() {
        assert_eq!(parse_command("Q"), Command::Quit);
        assert_eq!(parse_command("f"), Command::SetUnits(Units::Fahrenheit));
        assert_eq!(parse_command("celsius"), Command::SetUnits(Units::Celsius));
        assert_eq!(parse_command("r"), Command::Refresh);
        assert_eq!(parse_command("   "), Command::Empty);
    }

    #[test]
    fn numbers_pick_recent_locations() {
        assert_eq!(parse_command("2"), Command::PickRecent(2));
        assert_eq!(parse_command("0"), Command::Search("0".to_string()));
    }
}
