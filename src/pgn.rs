//! Portable Game Notation export of a recorded game.
//!
//! Output has the seven tag roster headers, a blank line, then one numbered line per
//! move record followed by the result token.
//! <https://www.chessprogramming.org/Portable_Game_Notation>

use std::fmt::Write;

use scoresheet_core::{GameResult, MoveRecord};

/// Tag pair values written in the PGN header, except Result which comes from the game.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Tags {
    pub event: String,
    pub site: String,
    pub date: String,
    pub round: String,
    pub white: String,
    pub black: String,
}

/// Complete PGN text of a game, ending with a newline.
pub fn render(tags: &Tags, records: &[MoveRecord], result: GameResult) -> String {
    format!("{}\n\n{}\n", headers(tags, result), movetext(records, result))
}

/// PGN text framed by two rules of `=`, as shown before saving.
pub fn preview(tags: &Tags, records: &[MoveRecord], result: GameResult) -> String {
    let border = "=".repeat(50);
    format!("\n{border}\n{}{border}\n", render(tags, records, result))
}

fn headers(tags: &Tags, result: GameResult) -> String {
    let result = result.to_string();
    let roster = [
        ("Event", &tags.event),
        ("Site", &tags.site),
        ("Date", &tags.date),
        ("Round", &tags.round),
        ("White", &tags.white),
        ("Black", &tags.black),
        ("Result", &result),
    ];

    roster
        .iter()
        .map(|(tag, value)| format!("[{tag} \"{value}\"]"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Each record as `<n>. <white> <black> ` on its own line, then the result token.
fn movetext(records: &[MoveRecord], result: GameResult) -> String {
    let mut text = String::new();
    for (i, record) in records.iter().enumerate() {
        // Writing into a String cannot fail.
        let _ = writeln!(text, "{}. {} ", i + 1, record);
    }
    text.push_str(result.as_str());
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tags() -> Tags {
        Tags {
            event: "Club Championship".to_string(),
            site: "Honolulu".to_string(),
            date: "2024.03.09".to_string(),
            round: "4".to_string(),
            white: "Alice".to_string(),
            black: "Bob".to_string(),
        }
    }

    #[test]
    fn complete_game() {
        let records = [
            MoveRecord::new("e4", Some("e5")),
            MoveRecord::new("Nf3", Some("Nc6")),
        ];
        let expected = "[Event \"Club Championship\"]\n\
                        [Site \"Honolulu\"]\n\
                        [Date \"2024.03.09\"]\n\
                        [Round \"4\"]\n\
                        [White \"Alice\"]\n\
                        [Black \"Bob\"]\n\
                        [Result \"1/2-1/2\"]\n\
                        \n\
                        1. e4 e5 \n\
                        2. Nf3 Nc6 \n\
                        1/2-1/2\n";
        assert_eq!(render(&tags(), &records, GameResult::Draw), expected);
    }

    #[test]
    fn incomplete_last_record() {
        let records = [
            MoveRecord::new("e4", Some("e5")),
            MoveRecord::new("Qh5", None),
        ];
        let pgn = render(&tags(), &records, GameResult::Unknown);
        assert!(pgn.ends_with("\n\n1. e4 e5 \n2. Qh5 \n*\n"), "{pgn}");
        assert!(pgn.contains("[Result \"*\"]"));
    }

    #[test]
    fn no_moves() {
        let pgn = render(&tags(), &[], GameResult::WhiteWins);
        assert!(pgn.ends_with("[Result \"1-0\"]\n\n1-0\n"), "{pgn}");
    }

    #[test]
    fn preview_is_framed() {
        let framed = preview(&tags(), &[], GameResult::Unknown);
        let border = "=".repeat(50);
        assert!(framed.starts_with(&format!("\n{border}\n[Event")));
        assert!(framed.ends_with(&format!("*\n{border}\n")));
    }
}
