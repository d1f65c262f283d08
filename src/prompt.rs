//! Manual entry after a miss
//!
//! The user types a scan code or part of a wine name. Input is tried as a
//! code first, then as a name search in the display language.

use crate::error::{Result, WeinScanError};
use dialoguer::Input;
use wein_scan_common::{Language, MatchResult, Matcher, Resolution};

pub enum ManualAction {
    Lookup(String),
    Quit,
}

pub fn parse_manual_input(input: &str) -> ManualAction {
    match input.trim() {
        "" | "q" | "Q" => ManualAction::Quit,
        text => ManualAction::Lookup(text.to_string()),
    }
}

pub fn resolve_manual<'a>(matcher: &Matcher<'a>, input: &str, lang: Language) -> MatchResult<'a> {
    matcher
        .match_by_code(input)
        .or_else(|_| matcher.match_first_by_name(input, lang))
}

/// Prompt until a wine is found or the user gives up
pub fn run_manual_fallback<'a>(matcher: &Matcher<'a>, lang: Language) -> Result<Option<Resolution<'a>>> {
    println!("Enter a scan code or wine name instead (empty or q to quit)");

    loop {
        let input: String = Input::new()
            .with_prompt("Code / name")
            .allow_empty(true)
            .interact_text()
            .map_err(|e| WeinScanError::Prompt(e.to_string()))?;

        match parse_manual_input(&input) {
            ManualAction::Quit => return Ok(None),
            ManualAction::Lookup(text) => match resolve_manual(matcher, &text, lang) {
                Ok(resolution) => return Ok(Some(resolution)),
                Err(miss) => println!("  → {}", miss),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wein_scan_common::{Catalog, MatchStage, MatchTables};

    #[test]
    fn test_parse_manual_input() {
        assert!(matches!(parse_manual_input(""), ManualAction::Quit));
        assert!(matches!(parse_manual_input("  q "), ManualAction::Quit));
        match parse_manual_input(" WEIN-012 ") {
            ManualAction::Lookup(text) => assert_eq!(text, "WEIN-012"),
            ManualAction::Quit => panic!("expected lookup"),
        }
    }

    #[test]
    fn test_code_before_name() {
        let catalog = Catalog::builtin().unwrap();
        let tables = MatchTables::builtin();
        let matcher = Matcher::new(&catalog, &tables);

        let by_code = resolve_manual(&matcher, "WEIN-012", Language::En).unwrap();
        assert_eq!(by_code.wine_id(), "12");
        assert_eq!(by_code.stage, MatchStage::Code);

        let by_name = resolve_manual(&matcher, "barolo", Language::En).unwrap();
        assert_eq!(by_name.wine_id(), "23");
        assert_eq!(by_name.stage, MatchStage::Name);

        assert!(resolve_manual(&matcher, "zzzz", Language::En).is_err());
    }
}
