//! Line-oriented terminal input and the interactive selection strategy.
//!
//! The menu and the selection strategy read from one shared input handle so
//! that a disambiguation prompt consumes exactly the next line the user
//! types, with no second buffer competing for stdin.

use catalog::Entry;
use colored::Colorize;
use service::{Selection, SelectionStrategy};
use std::cell::RefCell;
use std::io::{self, BufRead, Write};
use std::rc::Rc;
use tracing::warn;

/// Input shared between the menu loop and the selection prompt
pub type SharedInput = Rc<RefCell<dyn BufRead>>;

pub fn stdin_input() -> SharedInput {
    Rc::new(RefCell::new(io::stdin().lock()))
}

/// Next line without its terminator, `None` at end of input
pub fn read_line(input: &SharedInput) -> io::Result<Option<String>> {
    let mut line = String::new();
    let read = input.borrow_mut().read_line(&mut line)?;
    if read == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
}

/// Print `question` without a newline and read the answer
pub fn ask(input: &SharedInput, question: &str) -> io::Result<Option<String>> {
    print!("{question}");
    io::stdout().flush()?;
    read_line(input)
}

/// Turn a typed 1-based number into a selection among `count` matches
pub fn parse_choice(answer: &str, count: usize) -> Selection {
    match answer.trim().parse::<usize>() {
        Ok(number) if (1..=count).contains(&number) => Selection::Chosen(number - 1),
        _ => Selection::Cancelled,
    }
}

/// Lists the matches with 1-based numbers and blocks for the user's pick
///
/// Anything other than an in-range number, including end of input, cancels.
pub struct InteractiveSelection {
    input: SharedInput,
}

impl InteractiveSelection {
    pub fn new(input: SharedInput) -> Self {
        Self { input }
    }
}

impl SelectionStrategy for InteractiveSelection {
    fn name(&self) -> &str {
        "InteractiveSelection"
    }

    fn choose_one(&mut self, query: &str, matches: &[&Entry]) -> Selection {
        println!("{}", format!("Multiple matches found for '{query}':").yellow());
        for (index, entry) in matches.iter().enumerate() {
            println!(
                "{}",
                format!("{}. '{}' (ID: {})", index + 1, entry.title(), entry.id()).cyan()
            );
        }

        match ask(&self.input, "Please enter the number of the movie: ") {
            Ok(Some(answer)) => parse_choice(&answer, matches.len()),
            Ok(None) => Selection::Cancelled,
            Err(err) => {
                warn!(%err, "could not read selection");
                Selection::Cancelled
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use catalog::EntryId;
    use std::io::Cursor;

    fn scripted(text: &str) -> SharedInput {
        Rc::new(RefCell::new(Cursor::new(text.as_bytes().to_vec())))
    }

    #[test]
    fn test_parse_choice() {
        assert_eq!(parse_choice("1", 3), Selection::Chosen(0));
        assert_eq!(parse_choice(" 3 ", 3), Selection::Chosen(2));
        assert_eq!(parse_choice("0", 3), Selection::Cancelled);
        assert_eq!(parse_choice("4", 3), Selection::Cancelled);
        assert_eq!(parse_choice("-1", 3), Selection::Cancelled);
        assert_eq!(parse_choice("two", 3), Selection::Cancelled);
        assert_eq!(parse_choice("", 3), Selection::Cancelled);
    }

    #[test]
    fn test_read_line_strips_terminators() {
        let input = scripted("first\r\nsecond\nlast");
        assert_eq!(read_line(&input).unwrap().as_deref(), Some("first"));
        assert_eq!(read_line(&input).unwrap().as_deref(), Some("second"));
        assert_eq!(read_line(&input).unwrap().as_deref(), Some("last"));
        assert_eq!(read_line(&input).unwrap(), None);
    }

    #[test]
    fn test_interactive_selection_reads_shared_input() {
        let input = scripted("2\nleft for the menu\n");
        let mut strategy = InteractiveSelection::new(Rc::clone(&input));

        let a = Entry::new(EntryId::parse("A1B2C3D4").unwrap(), "Matrix");
        let b = Entry::new(EntryId::parse("B1B2C3D4").unwrap(), "Matrix Reloaded");

        assert_eq!(strategy.choose_one("matrix", &[&a, &b]), Selection::Chosen(1));
        assert_eq!(
            read_line(&input).unwrap().as_deref(),
            Some("left for the menu")
        );
    }

    #[test]
    fn test_interactive_selection_cancels_at_end_of_input() {
        let mut strategy = InteractiveSelection::new(scripted(""));
        let a = Entry::new(EntryId::parse("A1B2C3D4").unwrap(), "Matrix");
        let b = Entry::new(EntryId::parse("B1B2C3D4").unwrap(), "Matrix Reloaded");

        assert_eq!(strategy.choose_one("matrix", &[&a, &b]), Selection::Cancelled);
    }
}
