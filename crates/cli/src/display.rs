//! Terminal rendering for the interactive menu.
//!
//! Rating lists are shortened here, never in the service: the service always
//! returns full histories.

use catalog::{CatalogError, Entry, LoadReport, Rating};
use colored::Colorize;
use service::{AverageRating, EntryAdded, EntryDeleted, RatingAdded, RatingHistory, TopRated};
use std::path::Path;

/// How many ratings are shown before "... (and N more)"
pub const RATING_PREVIEW: usize = 10;

/// First `RATING_PREVIEW` ratings, comma separated, with a count of the rest
pub fn format_ratings(ratings: &[Rating]) -> String {
    if ratings.is_empty() {
        return "No ratings".to_string();
    }
    let shown = ratings
        .iter()
        .take(RATING_PREVIEW)
        .map(|r| r.to_string())
        .collect::<Vec<_>>()
        .join(", ");
    match ratings.len().checked_sub(RATING_PREVIEW) {
        Some(rest) if rest > 0 => format!("{shown}... (and {rest} more)"),
        _ => shown,
    }
}

pub fn format_listing(entry: &Entry) -> String {
    format!(
        "{}: {} (Ratings: {})",
        entry.id(),
        entry.title().cyan(),
        format_ratings(entry.ratings()).yellow()
    )
}

pub fn print_catalog(entries: &[&Entry]) {
    println!();
    println!("{}", "Current Movies:".bold().blue());
    if entries.is_empty() {
        println!("  (none yet)");
    }
    for entry in entries {
        println!("{}", format_listing(entry));
    }
}

pub fn print_menu() {
    println!(
        "
Choose an option:
1. Add Rating
2. Get Average Rating
3. Get Top Rated Movie
4. Get All Ratings
5. Add a Movie
6. Delete a Movie
7. Save and Exit"
    );
}

pub fn print_load_report(report: &LoadReport, path: &Path) {
    if report.file_missing {
        println!(
            "{}",
            format!(
                "No {} file found. Starting with an empty movie list.",
                path.display()
            )
            .yellow()
        );
        return;
    }
    println!("{}", format!("{} movies loaded from disk.", report.loaded).green());
    if !report.dropped.is_empty() {
        println!(
            "{}",
            format!(
                "Warning: invalid ratings were removed from {} movies.",
                report.dropped.len()
            )
            .yellow()
        );
    }
    if !report.overwritten.is_empty() {
        println!(
            "{}",
            format!(
                "Warning: {} duplicate movie ids; the later record was kept.",
                report.overwritten.len()
            )
            .yellow()
        );
    }
    if !report.backfilled_ids.is_empty() {
        println!(
            "{}",
            format!(
                "Warning: {} movies had no valid id and were given a new one.",
                report.backfilled_ids.len()
            )
            .yellow()
        );
    }
}

pub fn success(message: impl AsRef<str>) {
    println!("{}", message.as_ref().green());
}

pub fn failure(message: impl AsRef<str>) {
    println!("{}", message.as_ref().red());
}

pub fn error(err: &CatalogError) {
    failure(format!("Error: {err}"));
}

pub fn rating_added(added: &RatingAdded) {
    success(format!(
        "Rating '{}' added to '{}'. New average: {:.1} ({} ratings)",
        added.rating,
        added.entry.title(),
        added.entry.average_rating(),
        added.entry.rating_count()
    ));
}

pub fn average(average: &AverageRating) {
    println!(
        "Average rating for '{}' is {} based on {} ratings.",
        average.title,
        format!("{:.1}", average.average_rating).blue(),
        average.rating_count
    );
}

pub fn top_rated(top: &TopRated) {
    println!(
        "Top rated movie is '{}' with an average rating of {} based on {} ratings.",
        top.title,
        format!("{:.1}", top.average_rating).green(),
        top.rating_count
    );
}

pub fn rating_history(history: &RatingHistory) {
    let ratings = if history.ratings.is_empty() {
        "None".to_string()
    } else {
        format_ratings(&history.ratings)
    };
    println!("Ratings for '{}': {}", history.title, ratings);
}

pub fn entry_added(added: &EntryAdded) {
    success(format!("Movie '{}' added with ID {}.", added.title, added.id));
}

pub fn entry_deleted(deleted: &EntryDeleted) {
    success(format!(
        "Movie '{}' (ID: {}) deleted successfully.",
        deleted.title, deleted.id
    ));
}
