//! The interactive menu loop.

use anyhow::{Context, Result};
use catalog::persistence;
use service::{CatalogService, Mode, SelectionStrategy};
use std::path::Path;

use crate::display;
use crate::prompt::{self, SharedInput};

/// Split "query rating" on the last run of whitespace
///
/// The query may itself contain spaces; the rating never does.
pub fn parse_rating_request(line: &str) -> Option<(&str, &str)> {
    let (query, rating) = line.trim().rsplit_once(char::is_whitespace)?;
    let query = query.trim();
    if query.is_empty() {
        return None;
    }
    Some((query, rating))
}

/// Run the menu until the user saves and exits or input ends
///
/// Option 7 writes the catalog to `db_path` before returning. End of input
/// returns without saving.
pub fn run_menu<S: SelectionStrategy>(
    service: &mut CatalogService<S>,
    input: &SharedInput,
    db_path: &Path,
) -> Result<()> {
    loop {
        display::print_catalog(&service.list_all());
        display::print_menu();

        let Some(option) = prompt::ask(input, "> ")? else {
            println!("\nInput closed, exiting without saving.");
            return Ok(());
        };

        match option.trim() {
            "1" => add_rating(service, input)?,
            "2" => {
                if let Some(query) = prompt::ask(input, "Enter movie ID or title: ")? {
                    match service.get_average(&query, Mode::Interactive) {
                        Ok(average) => display::average(&average),
                        Err(err) => display::error(&err),
                    }
                }
            }
            "3" => match service.get_top_rated() {
                Ok(top) => display::top_rated(&top),
                Err(err) => display::error(&err),
            },
            "4" => {
                if let Some(query) = prompt::ask(input, "Enter movie ID or title: ")? {
                    match service.get_all_ratings(&query, Mode::Interactive) {
                        Ok(history) => display::rating_history(&history),
                        Err(err) => display::error(&err),
                    }
                }
            }
            "5" => {
                if let Some(title) = prompt::ask(input, "Enter the title of the new movie: ")? {
                    match service.add_entry(&title) {
                        Ok(added) => display::entry_added(&added),
                        Err(err) => display::error(&err),
                    }
                }
            }
            "6" => {
                if let Some(query) = prompt::ask(input, "Enter movie ID or title to delete: ")? {
                    match service.delete_entry(&query, Mode::Interactive) {
                        Ok(deleted) => display::entry_deleted(&deleted),
                        Err(err) => display::error(&err),
                    }
                }
            }
            "7" => {
                persistence::save_file(service.store(), db_path)
                    .with_context(|| format!("Failed to save catalog to {}", db_path.display()))?;
                display::success("Movies saved to disk.");
                println!("Exiting movie rating system.");
                return Ok(());
            }
            _ => display::failure("Invalid option, please choose again."),
        }
    }
}

fn add_rating<S: SelectionStrategy>(
    service: &mut CatalogService<S>,
    input: &SharedInput,
) -> Result<()> {
    let Some(line) = prompt::ask(input, "Enter movie ID or title and rating (e.g. 'Matrix 5'): ")?
    else {
        return Ok(());
    };

    let Some((query, rating)) = parse_rating_request(&line) else {
        display::failure("Please enter a movie followed by a rating.");
        return Ok(());
    };
    let Ok(rating) = rating.parse::<i64>() else {
        display::failure("Rating must be a whole number between 1 and 5.");
        return Ok(());
    };

    match service.add_rating(query, rating, Mode::Interactive) {
        Ok(added) => display::rating_added(&added),
        Err(err) => display::error(&err),
    }
    Ok(())
}
