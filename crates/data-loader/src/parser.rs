//! Parser for MovieLens data files.
//!
//! Handles the two files the catalog needs:
//! - movies.dat: movieId::title::genres
//! - ratings.dat: userId::movieId::rating::timestamp
//!
//! Both files are ISO-8859-1 encoded and use "::" as the field separator.

use crate::error::{DataLoadError, Result};
use crate::types::*;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::str::Split;

const MOVIES_FILE: &str = "movies.dat";
const RATINGS_FILE: &str = "ratings.dat";

/// Articles MovieLens appends to titles ("Godfather, The")
const TRAILING_ARTICLES: [&str; 6] = ["The", "A", "An", "La", "Le", "Les"];

/// Read a file with ISO-8859-1 encoding (Latin-1)
///
/// Each Latin-1 byte maps directly to the Unicode code point of the same
/// value, so the conversion is a plain byte-to-char widening.
fn read_lines_latin1(path: &Path) -> Result<Vec<String>> {
    let mut file = File::open(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => DataLoadError::FileNotFound {
            path: path.display().to_string(),
        },
        _ => DataLoadError::IoError(e),
    })?;
    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes)?;

    let content: String = bytes.iter().map(|&b| b as char).collect();

    Ok(content.lines().map(|s| s.to_string()).collect())
}

/// Pull the next "::"-separated field or report which one is missing
fn next_field<'a>(
    parts: &mut Split<'a, &str>,
    file: &str,
    line: usize,
    name: &str,
) -> Result<&'a str> {
    parts.next().ok_or_else(|| DataLoadError::ParseError {
        file: file.to_string(),
        line,
        reason: format!("Missing {}", name),
    })
}

/// Parse a numeric field, attaching file/line context on failure
fn parse_field<T>(value: &str, file: &str, line: usize, name: &str) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value.trim().parse().map_err(|e| DataLoadError::ParseError {
        file: file.to_string(),
        line,
        reason: format!("Invalid {}: {}", name, e),
    })
}

/// Parse the movies.dat file
///
/// Format: movieId::title::genres
///
/// The title usually includes the year in parentheses: "Toy Story (1995)".
/// Genres are pipe-separated: "Animation|Children's|Comedy".
pub fn parse_movies(path: &Path) -> Result<Vec<Movie>> {
    let lines = read_lines_latin1(path)?;
    let mut movies = Vec::with_capacity(lines.len());

    for (idx, line) in lines.iter().enumerate() {
        let line_no = idx + 1;
        let line_trimmed = line.trim();
        if line_trimmed.is_empty() {
            continue;
        }

        let mut parts = line_trimmed.split("::");
        let movie_id = next_field(&mut parts, MOVIES_FILE, line_no, "movieId")?;
        let raw_title = next_field(&mut parts, MOVIES_FILE, line_no, "title")?;
        let genres_str = next_field(&mut parts, MOVIES_FILE, line_no, "genres")?;

        movies.push(Movie {
            id: parse_field(movie_id, MOVIES_FILE, line_no, "movieId")?,
            title: display_title(raw_title),
            year: extract_year_from_title(raw_title),
            genres: parse_genres(genres_str),
        });
    }
    Ok(movies)
}

/// Parse the ratings.dat file
///
/// Format: userId::movieId::rating::timestamp
pub fn parse_ratings(path: &Path) -> Result<Vec<Rating>> {
    let lines = read_lines_latin1(path)?;
    let mut ratings = Vec::with_capacity(lines.len());

    for (idx, line) in lines.iter().enumerate() {
        let line_no = idx + 1;
        let line_trimmed = line.trim();
        if line_trimmed.is_empty() {
            continue;
        }

        let mut parts = line_trimmed.split("::");
        let user_id = next_field(&mut parts, RATINGS_FILE, line_no, "userId")?;
        let movie_id = next_field(&mut parts, RATINGS_FILE, line_no, "movieId")?;
        let rating_value = next_field(&mut parts, RATINGS_FILE, line_no, "rating")?;
        let timestamp = next_field(&mut parts, RATINGS_FILE, line_no, "timestamp")?;

        ratings.push(Rating {
            user_id: parse_field(user_id, RATINGS_FILE, line_no, "userId")?,
            movie_id: parse_field(movie_id, RATINGS_FILE, line_no, "movieId")?,
            rating: parse_field(rating_value, RATINGS_FILE, line_no, "rating")?,
            timestamp: parse_field(timestamp, RATINGS_FILE, line_no, "timestamp")?,
        });
    }
    Ok(ratings)
}

/// Extract year from movie title
///
/// Example: "Toy Story (1995)" -> Some(1995)
///          "Movie Title" -> None
fn extract_year_from_title(title: &str) -> Option<u16> {
    let start = title.rfind('(')?;
    let end = title.rfind(')')?;
    if start < end {
        let year_str = &title[start + 1..end];
        if let Ok(year) = year_str.parse::<u16>() {
            return Some(year);
        }
    }
    None
}

/// Turn a raw MovieLens title into the form people actually say
///
/// Example: "Shawshank Redemption, The (1994)" -> "The Shawshank Redemption"
fn display_title(raw: &str) -> String {
    let mut title = raw.trim();
    if extract_year_from_title(title).is_some() {
        if let Some(start) = title.rfind('(') {
            title = title[..start].trim_end();
        }
    }

    if let Some((head, article)) = title.rsplit_once(", ") {
        if TRAILING_ARTICLES.contains(&article) {
            return format!("{} {}", article, head);
        }
    }
    title.to_string()
}

/// Split pipe-separated genres, keeping each label verbatim
///
/// Example: "Action|Adventure|Sci-Fi" -> ["Action", "Adventure", "Sci-Fi"]
/// Repeated labels on one line are kept once, in first-seen order.
fn parse_genres(s: &str) -> Vec<GenreLabel> {
    let mut genres: Vec<GenreLabel> = Vec::new();
    for genre in s.split('|').map(str::trim).filter(|g| !g.is_empty()) {
        if !genres.iter().any(|g| g == genre) {
            genres.push(genre.to_string());
        }
    }
    genres
}
